/// Which visual the player should be drawn with this frame.
///
/// Game Dev Pattern: Priority-based state selection. The player decides the
/// state, the frontend only maps it to a texture or a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    #[default]
    Running,
    Jumping,
    Shooting,
}

/// Tick-driven cyclic frame index.
///
/// Advances `current` by one every `ticks_per_frame` ticks and wraps at
/// `frame_count`. With zero or one frame loaded it never moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameCycle {
    frame_count: usize,
    ticks_per_frame: u32,
    current: usize,
    counter: u32,
}

impl FrameCycle {
    pub fn new(frame_count: usize, ticks_per_frame: u32) -> Self {
        FrameCycle {
            frame_count,
            ticks_per_frame: ticks_per_frame.max(1),
            current: 0,
            counter: 0,
        }
    }

    pub fn set_frame_count(&mut self, frame_count: usize) {
        self.frame_count = frame_count;
        self.reset();
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn tick(&mut self) {
        if self.frame_count <= 1 {
            return;
        }

        self.counter += 1;
        if self.counter >= self.ticks_per_frame {
            self.counter = 0;
            self.current = (self.current + 1) % self.frame_count;
        }
    }

    pub fn reset(&mut self) {
        self.current = 0;
        self.counter = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_running() {
        assert_eq!(AnimationState::default(), AnimationState::Running);
    }

    #[test]
    fn test_frame_advances_every_n_ticks() {
        let mut cycle = FrameCycle::new(3, 10);

        for _ in 0..9 {
            cycle.tick();
        }
        assert_eq!(cycle.current(), 0);

        cycle.tick();
        assert_eq!(cycle.current(), 1);
    }

    #[test]
    fn test_frame_wraps() {
        let mut cycle = FrameCycle::new(2, 1);
        cycle.tick();
        cycle.tick();
        assert_eq!(cycle.current(), 0);
    }

    #[test]
    fn test_single_frame_never_moves() {
        let mut cycle = FrameCycle::new(1, 1);
        for _ in 0..50 {
            cycle.tick();
        }
        assert_eq!(cycle.current(), 0);

        let mut empty = FrameCycle::new(0, 1);
        empty.tick();
        assert_eq!(empty.current(), 0);
    }
}

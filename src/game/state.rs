// Screen state machine for the game flow

/// Which screen the game is on
///
/// Transitions requested while handling input or ticking are stored as a
/// pending screen and applied at the start of the next update, so a tick never
/// runs half in one screen and half in another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Title,
    Menu,
    Shop,
    Playing,
    Paused,
    Battle,
    GameOver,
}

impl Screen {
    /// True for screens where the world simulation advances
    pub fn is_simulating(&self) -> bool {
        matches!(self, Screen::Playing | Screen::Battle)
    }

    /// True while a run is in progress (including paused and battles)
    pub fn in_run(&self) -> bool {
        matches!(self, Screen::Playing | Screen::Paused | Screen::Battle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Screen::Title => "Title",
            Screen::Menu => "Menu",
            Screen::Shop => "Shop",
            Screen::Playing => "Playing",
            Screen::Paused => "Paused",
            Screen::Battle => "Battle",
            Screen::GameOver => "Game Over",
        }
    }
}

use crate::game::{GameInput, Screen};
use sdl2::EventPump;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;

/// InputSystem turns SDL2 events into discrete GameInput values
///
/// The game core never sees raw keys. Translation depends only on which screen
/// is showing, so the same key can confirm a menu and jump during a run.
///
/// # Key Map
///
/// - Space / Up: jump (confirm outside a run)
/// - J / X: shoot
/// - P: pause
/// - Esc: back
/// - Return: confirm
/// - 1-3: select character or shop slot
/// - S: shop, N: new profile, R: restart
/// - Left click: click at the logical position
pub struct InputSystem;

impl InputSystem {
    /// Drains pending SDL2 events
    pub fn poll_events(event_pump: &mut EventPump, screen: Screen) -> Vec<GameInput> {
        event_pump
            .poll_iter()
            .filter_map(|event| Self::map_event(&event, screen))
            .collect()
    }

    pub fn map_event(event: &Event, screen: Screen) -> Option<GameInput> {
        match event {
            Event::Quit { .. } => Some(GameInput::Quit),
            Event::KeyDown {
                keycode: Some(keycode),
                repeat: false,
                ..
            } => Self::map_key(*keycode, screen),
            Event::MouseButtonDown {
                mouse_btn: MouseButton::Left,
                x,
                y,
                ..
            } => Some(GameInput::Click {
                x: *x as f32,
                y: *y as f32,
            }),
            _ => None,
        }
    }

    pub fn map_key(keycode: Keycode, screen: Screen) -> Option<GameInput> {
        let input = match keycode {
            Keycode::Space | Keycode::Up if screen.in_run() => GameInput::Jump,
            Keycode::Space | Keycode::Return => GameInput::Confirm,
            Keycode::J | Keycode::X => GameInput::Shoot,
            Keycode::P => GameInput::Pause,
            Keycode::Escape => GameInput::Back,
            Keycode::Num1 | Keycode::Kp1 => GameInput::Select(1),
            Keycode::Num2 | Keycode::Kp2 => GameInput::Select(2),
            Keycode::Num3 | Keycode::Kp3 => GameInput::Select(3),
            Keycode::S => GameInput::OpenShop,
            Keycode::N => GameInput::NewProfile,
            Keycode::R => GameInput::Restart,
            _ => return None,
        };
        Some(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_depends_on_screen() {
        assert_eq!(
            InputSystem::map_key(Keycode::Space, Screen::Playing),
            Some(GameInput::Jump)
        );
        assert_eq!(
            InputSystem::map_key(Keycode::Space, Screen::Title),
            Some(GameInput::Confirm)
        );
        assert_eq!(InputSystem::map_key(Keycode::Up, Screen::Menu), None);
    }

    #[test]
    fn test_number_keys_select() {
        assert_eq!(
            InputSystem::map_key(Keycode::Num2, Screen::Menu),
            Some(GameInput::Select(2))
        );
        assert_eq!(InputSystem::map_key(Keycode::Num4, Screen::Menu), None);
    }
}

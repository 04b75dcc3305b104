// Discrete input events and menu hit regions
//
// The core never looks at raw device state. The frontend turns key presses and
// mouse clicks into GameInput values and hands them to Game::handle_input.

use crate::collision::Rect;
use crate::player::Character;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameInput {
    Quit,
    Jump,
    Shoot,
    Pause,
    /// Leave the current screen (Esc)
    Back,
    Confirm,
    /// Numbered choice: character on the menu, item slot in the shop
    Select(u8),
    OpenShop,
    NewProfile,
    Restart,
    Click { x: f32, y: f32 },
}

/// What a click on the menu screen hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    StartWith(Character),
    Quit,
}

/// Clickable regions of the character menu and the shop
#[derive(Debug, Clone)]
pub struct MenuLayout {
    pub character_one: Rect,
    pub character_two: Rect,
    pub quit: Rect,
    pub shop_slots: Vec<Rect>,
}

impl Default for MenuLayout {
    fn default() -> Self {
        MenuLayout {
            character_one: Rect::new(250.0, 250.0, 100.0, 150.0),
            character_two: Rect::new(450.0, 250.0, 100.0, 150.0),
            quit: Rect::new(300.0, 450.0, 200.0, 60.0),
            shop_slots: (0..3)
                .map(|i| Rect::new(200.0, 180.0 + i as f32 * 90.0, 400.0, 70.0))
                .collect(),
        }
    }
}

impl MenuLayout {
    pub fn menu_action_at(&self, x: f32, y: f32) -> Option<MenuAction> {
        if self.character_one.contains_point(x, y) {
            Some(MenuAction::StartWith(Character::Single))
        } else if self.character_two.contains_point(x, y) {
            Some(MenuAction::StartWith(Character::Double))
        } else if self.quit.contains_point(x, y) {
            Some(MenuAction::Quit)
        } else {
            None
        }
    }

    /// 1-based shop slot under the point
    pub fn shop_slot_at(&self, x: f32, y: f32) -> Option<u8> {
        self.shop_slots
            .iter()
            .position(|slot| slot.contains_point(x, y))
            .map(|index| index as u8 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_regions() {
        let layout = MenuLayout::default();

        assert_eq!(
            layout.menu_action_at(300.0, 300.0),
            Some(MenuAction::StartWith(Character::Single))
        );
        assert_eq!(
            layout.menu_action_at(550.0, 400.0),
            Some(MenuAction::StartWith(Character::Double))
        );
        assert_eq!(layout.menu_action_at(400.0, 480.0), Some(MenuAction::Quit));
        assert_eq!(layout.menu_action_at(400.0, 300.0), None);
    }

    #[test]
    fn test_region_edges_are_inclusive() {
        let layout = MenuLayout::default();
        assert!(layout.menu_action_at(250.0, 250.0).is_some());
        assert!(layout.menu_action_at(249.0, 250.0).is_none());
    }

    #[test]
    fn test_shop_slots() {
        let layout = MenuLayout::default();
        assert_eq!(layout.shop_slot_at(300.0, 200.0), Some(1));
        assert_eq!(layout.shop_slot_at(300.0, 380.0), Some(3));
        assert_eq!(layout.shop_slot_at(100.0, 200.0), None);
    }
}

//! Player physics, buffs and draw-state selection
//!
//! The player never moves horizontally: the world scrolls past it. Vertical
//! motion is simple Euler integration against a flat ground line.

use crate::animation::{AnimationState, FrameCycle};
use crate::assets::Rgb;
use crate::collision::Rect;
use crate::config::PlayerConfig;
use serde::{Deserialize, Serialize};

/// Playable characters. The only gameplay difference is the jump count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Character {
    Single,
    Double,
}

impl Character {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Character::Single),
            2 => Some(Character::Double),
            _ => None,
        }
    }

    /// Numeric id used as the key in save-file character stats
    pub fn id(&self) -> u8 {
        match self {
            Character::Single => 1,
            Character::Double => 2,
        }
    }

    pub fn max_jump_count(&self) -> u32 {
        match self {
            Character::Single => 1,
            Character::Double => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Character::Single => "Single Jumper",
            Character::Double => "Double Jumper",
        }
    }

    pub fn placeholder_color(&self) -> Rgb {
        match self {
            Character::Single => Rgb(0, 0, 255),
            Character::Double => Rgb(0, 255, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuffKind {
    Invincible,
    SpeedBoost,
}

/// Timed buff. Holding at most one at a time keeps the states exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Buff {
    pub kind: BuffKind,
    pub ticks_left: u32,
}

/// Result of the draw-priority selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerDrawState {
    /// Invincibility flicker: skip drawing this frame
    Hidden,
    ShootPose,
    Frame(usize),
    Placeholder(Rgb),
}

const SPEED_BOOST_MULTIPLIER: f32 = 1.5;
const FLICKER_WINDOW: u32 = 5;

pub struct Player {
    pub rect: Rect,
    pub velocity_y: f32,
    pub on_ground: bool,
    pub jump_count: u32,
    pub max_jump_count: u32,
    pub health: u32,
    pub attack_power: i32,
    pub speed_multiplier: f32,
    pub character: Character,
    pub shoot_timer: u32,
    pub force_shoot_pose: bool,
    buff: Option<Buff>,
    animation: FrameCycle,
    ground_y: f32,
    gravity: f32,
    jump_power: f32,
    double_jump_factor: f32,
}

impl Player {
    /// Creates a player standing on `ground_y` at the configured start x
    pub fn new(character: Character, config: &PlayerConfig, ground_y: f32) -> Self {
        let mut rect = Rect::new(config.start_x, 0.0, config.width, config.height);
        rect.set_bottom(ground_y);

        Player {
            rect,
            velocity_y: 0.0,
            on_ground: true,
            jump_count: 0,
            max_jump_count: character.max_jump_count(),
            health: config.health,
            attack_power: config.attack_power,
            speed_multiplier: 1.0,
            character,
            shoot_timer: 0,
            force_shoot_pose: false,
            buff: None,
            animation: FrameCycle::new(0, config.ticks_per_frame),
            ground_y,
            gravity: config.gravity,
            jump_power: config.jump_power,
            double_jump_factor: config.double_jump_factor,
        }
    }

    /// Tells the player how many animation frames the frontend loaded
    pub fn set_frame_count(&mut self, frame_count: usize) {
        self.animation.set_frame_count(frame_count);
    }

    pub fn jump(&mut self) -> bool {
        if self.jump_count >= self.max_jump_count {
            return false;
        }

        self.jump_count += 1;
        self.on_ground = false;
        self.velocity_y = if self.jump_count == 2 {
            self.jump_power * self.double_jump_factor
        } else {
            self.jump_power
        };

        true
    }

    pub fn update(&mut self) {
        self.shoot_timer = self.shoot_timer.saturating_sub(1);

        self.velocity_y += self.gravity;
        self.rect.y += self.velocity_y;

        if self.rect.bottom() >= self.ground_y {
            self.rect.set_bottom(self.ground_y);
            self.velocity_y = 0.0;
            self.on_ground = true;
            self.jump_count = 0;
        }

        if let Some(buff) = self.buff.as_mut() {
            buff.ticks_left = buff.ticks_left.saturating_sub(1);
            if buff.ticks_left == 0 {
                self.buff = None;
                self.speed_multiplier = 1.0;
            }
        }

        self.animation.tick();
    }

    /// Starts `kind` for `ticks`, replacing whatever buff was active
    pub fn apply_buff(&mut self, kind: BuffKind, ticks: u32) {
        if ticks == 0 {
            return;
        }

        self.buff = Some(Buff { kind, ticks_left: ticks });
        self.speed_multiplier = match kind {
            BuffKind::SpeedBoost => SPEED_BOOST_MULTIPLIER,
            BuffKind::Invincible => 1.0,
        };
    }

    pub fn buff(&self) -> Option<Buff> {
        self.buff
    }

    pub fn is_invincible(&self) -> bool {
        matches!(self.buff, Some(Buff { kind: BuffKind::Invincible, .. }))
    }

    /// Applies one point of damage. Returns true when this hit was fatal.
    pub fn take_hit(&mut self) -> bool {
        if self.is_invincible() || self.health == 0 {
            return false;
        }

        self.health -= 1;
        self.health == 0
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    pub fn trigger_shooting_pose(&mut self, duration: u32) {
        self.shoot_timer = self.shoot_timer.max(duration);
    }

    pub fn set_force_shoot_pose(&mut self, forced: bool) {
        self.force_shoot_pose = forced;
    }

    pub fn animation_state(&self) -> AnimationState {
        if self.force_shoot_pose || self.shoot_timer > 0 {
            AnimationState::Shooting
        } else if !self.on_ground {
            AnimationState::Jumping
        } else {
            AnimationState::Running
        }
    }

    pub fn current_frame(&self) -> usize {
        self.animation.current()
    }

    pub fn draw_state(&self, has_shoot_sprite: bool) -> PlayerDrawState {
        if let Some(Buff { kind: BuffKind::Invincible, ticks_left }) = self.buff {
            if (ticks_left / FLICKER_WINDOW) % 2 == 1 {
                return PlayerDrawState::Hidden;
            }
        }

        if has_shoot_sprite && self.animation_state() == AnimationState::Shooting {
            PlayerDrawState::ShootPose
        } else if self.animation.frame_count() > 0 {
            PlayerDrawState::Frame(self.animation.current())
        } else {
            PlayerDrawState::Placeholder(self.character.placeholder_color())
        }
    }

    pub fn reset_position(&mut self, x: f32, bottom: f32) {
        self.rect.x = x;
        self.rect.set_bottom(bottom);
        self.velocity_y = 0.0;
        self.on_ground = true;
        self.jump_count = 0;
        self.animation.reset();
    }
}

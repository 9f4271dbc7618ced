//! Keyboard and on-screen touch button adapters

use std::collections::{BTreeSet, HashMap};

use glam::Vec2;

use crate::sim::{Aabb, InputState};

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    A,
    D,
    W,
    Space,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` / winit logical key name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "ArrowUp" => Some(Key::Up),
            "a" | "A" => Some(Key::A),
            "d" | "D" => Some(Key::D),
            "w" | "W" => Some(Key::W),
            " " | "Space" => Some(Key::Space),
            _ => None,
        }
    }
}

/// Currently held keys
#[derive(Debug, Clone, Default)]
pub struct KeyboardKeys {
    held: BTreeSet<Key>,
}

impl KeyboardKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Window lost focus: nothing is held anymore
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn to_input(&self) -> InputState {
        let any = |keys: &[Key]| keys.iter().any(|k| self.held.contains(k));
        InputState {
            move_left: any(&[Key::Left, Key::A]),
            move_right: any(&[Key::Right, Key::D]),
            jump_requested: any(&[Key::Up, Key::W, Key::Space]),
        }
    }
}

/// On-screen control buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchButton {
    Left,
    Right,
    Jump,
}

/// Where the on-screen buttons sit, in world coordinates
#[derive(Debug, Clone)]
pub struct TouchLayout {
    buttons: Vec<(TouchButton, Aabb)>,
}

impl Default for TouchLayout {
    fn default() -> Self {
        let size = Vec2::splat(64.0);
        Self {
            buttons: vec![
                (
                    TouchButton::Left,
                    Aabb::from_center(Vec2::new(50.0, 320.0), size),
                ),
                (
                    TouchButton::Right,
                    Aabb::from_center(Vec2::new(170.0, 320.0), size),
                ),
                (
                    TouchButton::Jump,
                    Aabb::from_center(Vec2::new(750.0, 320.0), size),
                ),
            ],
        }
    }
}

impl TouchLayout {
    pub fn new(buttons: Vec<(TouchButton, Aabb)>) -> Self {
        Self { buttons }
    }

    /// Button under a pointer position, edges inclusive
    pub fn button_at(&self, pos: Vec2) -> Option<TouchButton> {
        self.buttons
            .iter()
            .find(|(_, rect)| {
                pos.x >= rect.min.x
                    && pos.x <= rect.max.x
                    && pos.y >= rect.min.y
                    && pos.y <= rect.max.y
            })
            .map(|(button, _)| *button)
    }
}

/// Multi-touch tracker: each pointer holds at most one button
#[derive(Debug, Clone, Default)]
pub struct TouchButtons {
    layout: TouchLayout,
    pointers: HashMap<i32, TouchButton>,
}

impl TouchButtons {
    pub fn new(layout: TouchLayout) -> Self {
        Self {
            layout,
            pointers: HashMap::new(),
        }
    }

    /// Pointer pressed; returns the button it landed on
    pub fn pointer_down(&mut self, pointer_id: i32, pos: Vec2) -> Option<TouchButton> {
        let button = self.layout.button_at(pos)?;
        self.pointers.insert(pointer_id, button);
        Some(button)
    }

    /// Pointer released or left its button
    pub fn pointer_up(&mut self, pointer_id: i32) {
        self.pointers.remove(&pointer_id);
    }

    /// `touchcancel` / lost focus
    pub fn cancel_all(&mut self) {
        self.pointers.clear();
    }

    pub fn is_pressed(&self, button: TouchButton) -> bool {
        self.pointers.values().any(|b| *b == button)
    }

    pub fn to_input(&self) -> InputState {
        InputState {
            move_left: self.is_pressed(TouchButton::Left),
            move_right: self.is_pressed(TouchButton::Right),
            jump_requested: self.is_pressed(TouchButton::Jump),
        }
    }
}

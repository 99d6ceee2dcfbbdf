// Input manager - turns winit events into a keyboard vector and host commands

use super::action::{default_bindings, Action, InputSource};
use glam::Vec2;
use std::collections::{HashMap, HashSet};
use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::PhysicalKey;

/// Tracks held keys, one-shot commands and the pointer
#[derive(Debug)]
pub struct InputManager {
    /// Mapping from input sources to actions
    bindings: HashMap<InputSource, Action>,

    /// Actions currently held down
    pressed: HashSet<Action>,

    /// One-shot actions pressed since the last drain, in press order
    triggered: Vec<Action>,

    /// Last known cursor position in window pixels
    cursor: Vec2,
}

impl InputManager {
    /// Create an input manager with the default bindings
    pub fn new() -> Self {
        Self::from_bindings(default_bindings())
    }

    /// Create an input manager from a list of bindings
    pub fn from_bindings(bindings: Vec<(InputSource, Action)>) -> Self {
        Self {
            bindings: bindings.into_iter().collect(),
            pressed: HashSet::new(),
            triggered: Vec::new(),
            cursor: Vec2::ZERO,
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(key_code) = event.physical_key {
            self.process_source(InputSource::key(key_code), event.state, event.repeat);
        }
    }

    /// Process a mouse button event from winit
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        self.process_source(InputSource::mouse(button), state, false);
    }

    /// Record the cursor position in window pixels
    pub fn set_cursor(&mut self, position: Vec2) {
        self.cursor = position;
    }

    /// Last known cursor position in window pixels
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    fn process_source(&mut self, source: InputSource, state: ElementState, repeat: bool) {
        let Some(action) = self.bindings.get(&source).copied() else {
            return;
        };

        match state {
            ElementState::Pressed => {
                if !repeat && self.pressed.insert(action) && !action.is_axis() {
                    self.triggered.push(action);
                }
            }
            ElementState::Released => {
                self.pressed.remove(&action);
            }
        }
    }

    /// Check if an action is currently held
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Take the one-shot actions pressed since the last call
    pub fn drain_triggered(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.triggered)
    }

    /// Directional input, each axis in -1.0..=1.0 (x right, y up)
    pub fn keyboard_vector(&self) -> Vec2 {
        let mut direction = Vec2::ZERO;

        if self.is_pressed(Action::Left) {
            direction.x -= 1.0;
        }
        if self.is_pressed(Action::Right) {
            direction.x += 1.0;
        }
        if self.is_pressed(Action::Down) {
            direction.y -= 1.0;
        }
        if self.is_pressed(Action::Up) {
            direction.y += 1.0;
        }

        direction
    }

    /// Forget all held keys, e.g. when the window loses focus
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.triggered.clear();
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

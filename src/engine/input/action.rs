// Demo action definitions and mappings

use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Represents all actions the demo host understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Keyboard vector
    Left,
    Right,
    Up,
    Down,

    // Pointer
    Grab,

    // Host controls
    NextDemo,
    SelectDemo(usize),
    Reset,
    Pause,
    ToggleContacts,
    Quit,
}

impl Action {
    /// Whether the action feeds the keyboard vector (held) rather than
    /// triggering once per press
    pub fn is_axis(self) -> bool {
        matches!(self, Action::Left | Action::Right | Action::Up | Action::Down)
    }
}

/// Represents an input source (keyboard key or mouse button)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
    Mouse(MouseButton),
}

impl InputSource {
    /// Create a keyboard input source
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }

    /// Create a mouse button input source
    pub fn mouse(button: MouseButton) -> Self {
        Self::Mouse(button)
    }
}

/// Default bindings: arrows and WASD drive the keyboard vector
pub fn default_bindings() -> Vec<(InputSource, Action)> {
    vec![
        (InputSource::key(KeyCode::ArrowLeft), Action::Left),
        (InputSource::key(KeyCode::ArrowRight), Action::Right),
        (InputSource::key(KeyCode::ArrowUp), Action::Up),
        (InputSource::key(KeyCode::ArrowDown), Action::Down),
        (InputSource::key(KeyCode::KeyA), Action::Left),
        (InputSource::key(KeyCode::KeyD), Action::Right),
        (InputSource::key(KeyCode::KeyW), Action::Up),
        (InputSource::key(KeyCode::KeyS), Action::Down),
        (InputSource::mouse(MouseButton::Left), Action::Grab),
        (InputSource::key(KeyCode::Tab), Action::NextDemo),
        (InputSource::key(KeyCode::Digit1), Action::SelectDemo(0)),
        (InputSource::key(KeyCode::Digit2), Action::SelectDemo(1)),
        (InputSource::key(KeyCode::KeyR), Action::Reset),
        (InputSource::key(KeyCode::KeyP), Action::Pause),
        (InputSource::key(KeyCode::F1), Action::ToggleContacts),
        (InputSource::key(KeyCode::Escape), Action::Quit),
    ]
}

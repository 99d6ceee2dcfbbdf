// Input handling system
//
// - `action`: host actions and default key bindings
// - `manager`: turns winit events into a keyboard vector and one-shot commands
//
// The demos only ever see the keyboard vector; the host consumes the rest.

pub mod action;
pub mod manager;

pub use action::Action;
pub use manager::InputManager;

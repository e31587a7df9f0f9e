use std::collections::HashSet;

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, KeyboardInput, MouseButton, VirtualKeyCode};

/// Translates window events into viewer actions and remembers the last cursor
/// position, which winit only reports on movement.
pub struct InputHandler {
    pressed_keys: HashSet<VirtualKeyCode>,
    cursor: Option<(f64, f64)>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            cursor: None,
        }
    }

    pub fn cursor(&self) -> Option<(f64, f64)> {
        self.cursor
    }

    pub fn handle_keyboard_input(&mut self, input: &KeyboardInput) -> InputAction {
        let Some(key_code) = input.virtual_keycode else {
            return InputAction::None;
        };
        match input.state {
            ElementState::Pressed => {
                // Ignore key repeat.
                if !self.pressed_keys.insert(key_code) {
                    return InputAction::None;
                }
                self.handle_key_press(key_code)
            }
            ElementState::Released => {
                self.pressed_keys.remove(&key_code);
                InputAction::None
            }
        }
    }

    fn handle_key_press(&self, key_code: VirtualKeyCode) -> InputAction {
        match key_code {
            VirtualKeyCode::Key1 | VirtualKeyCode::Numpad1 => InputAction::SetBrushSize(1),
            VirtualKeyCode::Key2 | VirtualKeyCode::Numpad2 => InputAction::SetBrushSize(2),
            VirtualKeyCode::Key3 | VirtualKeyCode::Numpad3 => InputAction::SetBrushSize(3),
            VirtualKeyCode::R => InputAction::RevealAll,
            VirtualKeyCode::H => InputAction::HideAll,
            VirtualKeyCode::S => InputAction::Save,
            VirtualKeyCode::O => InputAction::Open,
            VirtualKeyCode::Escape => InputAction::Quit,
            _ => InputAction::None,
        }
    }

    pub fn handle_mouse_input(&mut self, state: ElementState, button: MouseButton) -> InputAction {
        if button != MouseButton::Left {
            return InputAction::None;
        }
        match (state, self.cursor) {
            (ElementState::Pressed, Some((x, y))) => InputAction::PointerDown { x, y },
            (ElementState::Pressed, None) => InputAction::None,
            (ElementState::Released, _) => InputAction::PointerUp,
        }
    }

    pub fn handle_cursor_moved(&mut self, position: PhysicalPosition<f64>) -> InputAction {
        self.cursor = Some((position.x, position.y));
        InputAction::PointerMoved {
            x: position.x,
            y: position.y,
        }
    }

    pub fn handle_cursor_left(&mut self) -> InputAction {
        self.cursor = None;
        InputAction::PointerLeft
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    None,
    PointerDown { x: f64, y: f64 },
    PointerMoved { x: f64, y: f64 },
    PointerUp,
    PointerLeft,
    SetBrushSize(u32),
    RevealAll,
    HideAll,
    Save,
    Open,
    Quit,
}

//=========================================================================
// Dialog Overlay System
//=========================================================================
//
// Modal dialogs layered over the active scene.
//
// Architecture:
//   DialogService
//     ├─ window: Option<DialogData>   (visible dialog)
//     ├─ stack: Vec<DialogData>       (saved dialogs, LIFO)
//     ├─ scene: Box<dyn WindowService>
//     └─ factory: Box<dyn DialogFactory>
//
// Flow:
//   show_*() → factory → show() → overlay up, blur on
//   submit() → filter check → close() → handler(result)
//
//=========================================================================

//=== Module Declarations =================================================

mod factory;
mod service;

//=== Public API ==========================================================

pub use factory::{DialogFactory, DialogPane};
pub use service::{DialogBox, DialogService};

//=== Dialog Result =======================================================

/// Outcome of a dialog, delivered to its registered handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResult {
    /// The dialog was acknowledged (message/error/custom/progress).
    Ack,

    /// Confirmation answer.
    Confirmed(bool),

    /// Accepted input value.
    Input(String),

    /// The dialog was cancelled.
    Cancelled,
}

//=== Keys ================================================================

/// Keyboard keys the overlay layer cares about.
///
/// Traversal keys are confined to the dialog while one is showing;
/// everything else passes through to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Tab,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
}

impl Key {
    /// Returns true for keys that move keyboard focus between widgets.
    pub fn is_traversal(self) -> bool {
        matches!(self, Key::Tab | Key::Up | Key::Down | Key::Left | Key::Right)
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_key_classification() {
        for key in [Key::Tab, Key::Up, Key::Down, Key::Left, Key::Right] {
            assert!(key.is_traversal());
        }
        for key in [Key::Enter, Key::Escape] {
            assert!(!key.is_traversal());
        }
    }
}

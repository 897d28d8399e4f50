//! Keyboard input: selection modifiers and shortcut mapping.
//!
//! On macOS `meta` is ⌘; elsewhere `ctrl` serves the same role, so both
//! count as the toggle modifier.

/// How a click combines with the existing selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Modifiers {
    /// Replace the selection.
    #[default]
    None,
    /// Toggle one shape.
    Ctrl,
    /// Replace the selection with a range from the anchor.
    Shift,
    /// Add a range from the anchor.
    CtrlShift,
}

impl Modifiers {
    pub fn from_keys(ctrl: bool, shift: bool, meta: bool) -> Self {
        match (ctrl || meta, shift) {
            (false, false) => Modifiers::None,
            (true, false) => Modifiers::Ctrl,
            (false, true) => Modifiers::Shift,
            (true, true) => Modifiers::CtrlShift,
        }
    }

    pub fn toggles(self) -> bool {
        matches!(self, Modifiers::Ctrl | Modifiers::CtrlShift)
    }
}

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Remove the selected shapes from the page.
    DeleteSelected,
    /// Reopen the document with only the selected shapes.
    KeepSelected,
    ShowProperties,
    ClearSelection,
    Save,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"k"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if cmd && !shift {
            return match key {
                "k" | "K" => Some(ShortcutAction::KeepSelected),
                "i" | "I" => Some(ShortcutAction::ShowProperties),
                "s" | "S" => Some(ShortcutAction::Save),
                _ => None,
            };
        }

        if cmd || shift {
            return None;
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::DeleteSelected),
            "Escape" => Some(ShortcutAction::ClearSelection),
            _ => None,
        }
    }
}

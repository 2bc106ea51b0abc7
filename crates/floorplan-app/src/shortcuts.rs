//! Keyboard shortcut registry and documentation.

use crate::actions::UiAction;

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
    pub action: UiAction,
}

impl Shortcut {
    pub fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
        action: UiAction,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
            action,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    fn matches(&self, key: &str, ctrl: bool, shift: bool) -> bool {
        self.key.eq_ignore_ascii_case(key) && self.ctrl == ctrl && self.shift == shift
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("R", false, false, "Rotate selected element", UiAction::Rotate),
            Shortcut::new("D", true, false, "Duplicate selected element", UiAction::Duplicate),
            Shortcut::new("Delete", false, false, "Delete selected element", UiAction::Delete),
            Shortcut::new("Backspace", false, false, "Delete selected element", UiAction::Delete),
            Shortcut::new("Escape", false, false, "Cancel current action", UiAction::Cancel),
            Shortcut::new("G", false, false, "Toggle grid", UiAction::ToggleGrid),
            Shortcut::new("S", true, false, "Save plan", UiAction::Save),
        ]
    }

    /// The action bound to a key combination.
    pub fn action_for(key: &str, ctrl: bool, shift: bool) -> Option<UiAction> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(key, ctrl, shift))
            .map(|shortcut| shortcut.action)
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}

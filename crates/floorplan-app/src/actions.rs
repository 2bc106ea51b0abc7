//! Actions the shell can perform on an open plan.
//!
//! Replay scripts are JSON arrays of these, e.g.
//! `[{"action": "select_tool", "element_type": "desk"}, {"action": "click", "position": {"x": 53, "y": 107}}]`.

use floorplan_core::input::PointerEvent;
use floorplan_core::plan::{ElementPatch, PlanSettings};
use kurbo::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UiAction {
    /// Forward a raw pointer event to the canvas.
    Pointer { event: PointerEvent },
    /// Pointer down then up at the same spot.
    Click { position: Point },
    /// Press at `from`, move to `to`, release.
    Drag { from: Point, to: Point },
    /// Arm (or disarm) a placement tool.
    SelectTool { element_type: String },
    /// Abort the current gesture.
    Cancel,
    Rotate,
    Duplicate,
    Delete,
    /// Patch the selected element's properties.
    EditSelected { patch: ElementPatch },
    UpdatePlan { settings: PlanSettings },
    SetReadOnly { read_only: bool },
    ToggleGrid,
    /// A keyboard shortcut, resolved through the shortcut registry.
    Key {
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        shift: bool,
    },
    /// Persist pending edits.
    Save,
}

impl UiAction {
    /// Parse a replay script.
    pub fn parse_script(json: &str) -> Result<Vec<UiAction>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_core::plan::Status;

    #[test]
    fn test_parse_script() {
        let script = r#"[
            {"action": "select_tool", "element_type": "desk"},
            {"action": "click", "position": {"x": 53, "y": 107}},
            {"action": "drag", "from": {"x": 70, "y": 110}, "to": {"x": 145, "y": 212}},
            {"action": "pointer", "event": {"kind": "move", "position": {"x": 1, "y": 2}}},
            {"action": "edit_selected", "patch": {"status": "occupied"}},
            {"action": "key", "key": "R"},
            {"action": "save"}
        ]"#;
        let actions = UiAction::parse_script(script).unwrap();
        assert_eq!(actions.len(), 7);
        assert_eq!(
            actions[1],
            UiAction::Click {
                position: Point::new(53.0, 107.0)
            }
        );
        assert_eq!(
            actions[3],
            UiAction::Pointer {
                event: PointerEvent::moved(Point::new(1.0, 2.0))
            }
        );
        match &actions[4] {
            UiAction::EditSelected { patch } => assert_eq!(patch.status, Some(Status::Occupied)),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            actions[5],
            UiAction::Key {
                key: "R".into(),
                ctrl: false,
                shift: false
            }
        );
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        assert!(UiAction::parse_script(r#"[{"action": "undo"}]"#).is_err());
    }
}

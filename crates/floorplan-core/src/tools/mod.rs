//! Tool palette and selection panel models.
//!
//! These are plain data snapshots of the editor for a toolbar to draw. Both
//! disappear in read-only mode.

use crate::color::SerializableColor;
use crate::interaction::Editor;
use crate::plan::{ElementId, Status};
use crate::registry::{self, Category};
use serde::{Deserialize, Serialize};

/// One placement tool button.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolButton {
    pub element_type: &'static str,
    pub label: &'static str,
    pub color: SerializableColor,
    /// Whether this tool is currently armed.
    pub armed: bool,
}

/// Tools of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolGroup {
    pub category: Category,
    pub label: &'static str,
    pub tools: Vec<ToolButton>,
}

/// The placement palette, grouped by category in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolPalette {
    pub groups: Vec<ToolGroup>,
}

impl ToolPalette {
    /// Build the palette for `editor`, or `None` when it is read-only.
    pub fn for_editor(editor: &Editor) -> Option<Self> {
        if editor.is_read_only() {
            return None;
        }
        let armed = editor.armed_tool();
        let groups = Category::ALL
            .iter()
            .map(|&category| ToolGroup {
                category,
                label: category.label(),
                tools: registry::by_category(category)
                    .map(|d| ToolButton {
                        element_type: d.key,
                        label: d.label,
                        color: d.color,
                        armed: armed == Some(d.key),
                    })
                    .collect(),
            })
            .collect();
        Some(Self { groups })
    }

    pub fn tools(&self) -> impl Iterator<Item = &ToolButton> {
        self.groups.iter().flat_map(|g| g.tools.iter())
    }

    pub fn armed(&self) -> Option<&ToolButton> {
        self.tools().find(|t| t.armed)
    }
}

/// Actions offered for the selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelAction {
    Rotate,
    Duplicate,
    Delete,
}

impl PanelAction {
    pub const ALL: [PanelAction; 3] = [PanelAction::Rotate, PanelAction::Duplicate, PanelAction::Delete];

    /// Run the action against the editor's current selection.
    pub fn apply(self, editor: &mut Editor) {
        match self {
            PanelAction::Rotate => {
                editor.rotate_selected();
            }
            PanelAction::Duplicate => {
                editor.duplicate_selected();
            }
            PanelAction::Delete => {
                editor.delete_selected();
            }
        }
    }
}

/// Details of the selected element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionPanel {
    pub id: ElementId,
    pub name: String,
    pub type_label: &'static str,
    pub status: Status,
    pub status_label: &'static str,
    pub status_color: SerializableColor,
    pub assigned_to: Option<String>,
    /// Rotation in `0..360`.
    pub rotation: i64,
    pub actions: [PanelAction; 3],
}

impl SelectionPanel {
    /// Panel for the current selection, or `None` when nothing is selected
    /// or the editor is read-only.
    pub fn for_editor(editor: &Editor) -> Option<Self> {
        if editor.is_read_only() {
            return None;
        }
        let element = editor.selected_element()?;
        Some(Self {
            id: element.id,
            name: element.name.clone(),
            type_label: element.descriptor().label,
            status: element.status,
            status_label: element.status.label(),
            status_color: element.status.color(),
            assigned_to: element.assigned_to.clone(),
            rotation: element.display_rotation(),
            actions: PanelAction::ALL,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Plan;
    use kurbo::Point;

    fn editor_with_desk() -> Editor {
        let mut editor = Editor::new(Plan::default(), Vec::new()).unwrap();
        editor.select_tool("desk");
        editor.pointer_down(Point::new(53.0, 107.0));
        editor.pointer_up(Point::new(53.0, 107.0));
        editor
    }

    #[test]
    fn test_palette_groups_follow_catalog() {
        let mut editor = Editor::new(Plan::default(), Vec::new()).unwrap();
        let palette = ToolPalette::for_editor(&editor).unwrap();
        assert_eq!(palette.groups.len(), 3);
        assert_eq!(palette.groups[0].label, "Mobilier");
        assert_eq!(palette.groups[0].tools[0].element_type, "desk");
        assert_eq!(palette.tools().count(), registry::all().len());
        assert!(palette.armed().is_none());

        editor.select_tool("wall");
        let palette = ToolPalette::for_editor(&editor).unwrap();
        assert_eq!(palette.armed().unwrap().label, "Mur");
    }

    #[test]
    fn test_selection_panel_and_actions() {
        let mut editor = editor_with_desk();
        assert!(SelectionPanel::for_editor(&editor).is_none());

        let id = editor.document().elements()[0].id;
        editor.select_element(Some(id));
        let panel = SelectionPanel::for_editor(&editor).unwrap();
        assert_eq!(panel.name, "Bureau 1");
        assert_eq!(panel.type_label, "Bureau");
        assert_eq!(panel.status_label, "Disponible");

        PanelAction::Rotate.apply(&mut editor);
        assert_eq!(SelectionPanel::for_editor(&editor).unwrap().rotation, 90);
        PanelAction::Duplicate.apply(&mut editor);
        assert_eq!(editor.document().len(), 2);
        PanelAction::Delete.apply(&mut editor);
        assert_eq!(editor.document().len(), 1);
        assert!(SelectionPanel::for_editor(&editor).is_none());
    }

    #[test]
    fn test_read_only_hides_toolbar() {
        let mut editor = editor_with_desk();
        let id = editor.document().elements()[0].id;
        editor.select_element(Some(id));
        editor.set_read_only(true);
        assert!(ToolPalette::for_editor(&editor).is_none());
        assert!(SelectionPanel::for_editor(&editor).is_none());
    }
}

//! Canvas view: composes what the editor shows into a [`Scene`].
//!
//! The view owns display-only state (the grid toggle). Pointer events go to
//! the editor untouched; snapping and hit-testing stay there.

use crate::renderer::{GridStyle, Layer, Scene};
use floorplan_core::input::PointerEvent;
use floorplan_core::interaction::Editor;
use floorplan_core::plan::{Element, Plan};
use floorplan_core::selection::element_transform;
use floorplan_core::shapes::{self, render_selection};
use floorplan_core::tools::{SelectionPanel, ToolPalette};
use kurbo::{Line, Point, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasView {
    grid: GridStyle,
}

impl CanvasView {
    /// A view with grid visibility taken from the editor's configuration.
    pub fn new(editor: &Editor) -> Self {
        Self {
            grid: GridStyle::from_visible(editor.config().show_grid),
        }
    }

    pub fn grid_style(&self) -> GridStyle {
        self.grid
    }

    /// Show or hide the grid. Returns the new style.
    pub fn toggle_grid(&mut self) -> GridStyle {
        self.grid = self.grid.next();
        log::debug!("grid: {}", self.grid.name());
        self.grid
    }

    pub fn handle_pointer(&self, editor: &mut Editor, event: PointerEvent) {
        editor.handle_pointer(event);
    }

    /// Tool palette, hidden in read-only mode.
    pub fn toolbar(&self, editor: &Editor) -> Option<ToolPalette> {
        ToolPalette::for_editor(editor)
    }

    /// Panel for the selected element, hidden in read-only mode.
    pub fn panel(&self, editor: &Editor) -> Option<SelectionPanel> {
        SelectionPanel::for_editor(editor)
    }

    /// Compose the frame: background, grid, elements in paint order, then
    /// the selection decoration.
    pub fn scene(&self, editor: &Editor) -> Scene {
        let plan = editor.plan();
        let grid = match self.grid {
            GridStyle::Lines => grid_lines(plan),
            GridStyle::None => Vec::new(),
        };

        let mut layers: Vec<Layer> = editor
            .displayed_elements()
            .map(|element| element_layer(&element))
            .collect();

        let decoration = editor
            .selected_element()
            .filter(|_| !editor.is_read_only())
            .map(|selected| Layer {
                element_id: None,
                transform: element_transform(&selected),
                rotation: selected.display_rotation(),
                primitives: render_selection(selected.size()),
            });
        layers.extend(decoration);

        Scene {
            size: Size::new(f64::from(plan.width), f64::from(plan.height)),
            background: plan.background_color,
            grid,
            layers,
        }
    }
}

fn element_layer(element: &Element) -> Layer {
    Layer {
        element_id: Some(element.id),
        transform: element_transform(element),
        rotation: element.display_rotation(),
        primitives: shapes::render(element).into_primitives(),
    }
}

/// Vertical lines at every pitch step across the width, then horizontal
/// lines down the height. Both edges are included when they fall on a step.
pub fn grid_lines(plan: &Plan) -> Vec<Line> {
    let width = f64::from(plan.width);
    let height = f64::from(plan.height);
    let step = plan.grid_size.max(1) as usize;

    let vertical = (0..=plan.width)
        .step_by(step)
        .map(|x| Line::new(Point::new(f64::from(x), 0.0), Point::new(f64::from(x), height)));
    let horizontal = (0..=plan.height)
        .step_by(step)
        .map(|y| Line::new(Point::new(0.0, f64::from(y)), Point::new(width, f64::from(y))));
    vertical.chain(horizontal).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_core::config::EditorConfig;
    use floorplan_core::plan::PlanDocument;
    use kurbo::Vec2;

    fn editor() -> Editor {
        Editor::new(Plan::new("RDC"), Vec::new()).unwrap()
    }

    fn place(view: &CanvasView, editor: &mut Editor, tool: &str, at: Point) {
        editor.select_tool(tool);
        view.handle_pointer(editor, PointerEvent::down(at));
        view.handle_pointer(editor, PointerEvent::up(at));
    }

    #[test]
    fn test_grid_lines_cover_plan() {
        let plan = Plan::new("RDC");
        let lines = grid_lines(&plan);
        // 1200 / 20 + 1 vertical, 800 / 20 + 1 horizontal.
        assert_eq!(lines.len(), 61 + 41);
        assert_eq!(lines[60], Line::new((1200.0, 0.0), (1200.0, 800.0)));
        assert_eq!(lines.last(), Some(&Line::new((0.0, 800.0), (1200.0, 800.0))));
    }

    #[test]
    fn test_grid_skips_partial_step() {
        let mut plan = Plan::new("RDC");
        plan.width = 50;
        plan.height = 20;
        let xs: Vec<f64> = grid_lines(&plan).iter().take(3).map(|l| l.p0.x).collect();
        assert_eq!(xs, vec![0.0, 20.0, 40.0]);
    }

    #[test]
    fn test_toggle_grid() {
        let editor = editor();
        let mut view = CanvasView::new(&editor);
        assert!(!view.scene(&editor).grid.is_empty());
        assert_eq!(view.toggle_grid(), GridStyle::None);
        assert!(view.scene(&editor).grid.is_empty());

        let config = EditorConfig {
            show_grid: false,
            ..Default::default()
        };
        let hidden = Editor::with_config(PlanDocument::new(Plan::new("RDC")), config).unwrap();
        assert_eq!(CanvasView::new(&hidden).grid_style(), GridStyle::None);
    }

    #[test]
    fn test_scene_layers_follow_paint_order() {
        let mut editor = editor();
        let view = CanvasView::new(&editor);
        place(&view, &mut editor, "desk", Point::new(53.0, 107.0));
        place(&view, &mut editor, "plant", Point::new(400.0, 400.0));

        let scene = view.scene(&editor);
        assert_eq!(scene.size, Size::new(1200.0, 800.0));
        let ids: Vec<_> = scene.element_layers().filter_map(|l| l.element_id).collect();
        let expected: Vec<_> = editor.document().elements().iter().map(|e| e.id).collect();
        assert_eq!(ids, expected);
        assert_eq!(
            scene.layers[0].transform.translation(),
            Vec2::new(60.0, 100.0)
        );
        // Placing does not select.
        assert!(scene.selection_layer().is_none());
    }

    #[test]
    fn test_selection_layer_tracks_drag_preview() {
        let mut editor = editor();
        let view = CanvasView::new(&editor);
        place(&view, &mut editor, "desk", Point::new(53.0, 107.0));

        view.handle_pointer(&mut editor, PointerEvent::down(Point::new(70.0, 110.0)));
        view.handle_pointer(&mut editor, PointerEvent::moved(Point::new(145.0, 212.0)));

        let scene = view.scene(&editor);
        let selection = scene.selection_layer().unwrap();
        assert_eq!(selection.transform.translation(), Vec2::new(140.0, 200.0));
        assert_eq!(scene.layers[0].transform.translation(), Vec2::new(140.0, 200.0));
        // Outline, four corners, resize grip.
        assert_eq!(selection.primitives.len(), 6);
    }

    #[test]
    fn test_read_only_hides_decoration_and_toolbar() {
        let mut editor = editor();
        let view = CanvasView::new(&editor);
        place(&view, &mut editor, "desk", Point::new(53.0, 107.0));
        let id = editor.document().elements()[0].id;
        editor.select_element(Some(id));
        assert!(view.scene(&editor).selection_layer().is_some());
        assert!(view.panel(&editor).is_some());

        editor.set_read_only(true);
        let scene = view.scene(&editor);
        assert!(scene.selection_layer().is_none());
        assert_eq!(scene.element_layers().count(), 1);
        assert!(view.toolbar(&editor).is_none());
        assert!(view.panel(&editor).is_none());
    }

    #[test]
    fn test_rotation_is_normalized_for_display() {
        let mut editor = editor();
        let view = CanvasView::new(&editor);
        place(&view, &mut editor, "desk", Point::new(53.0, 107.0));
        let id = editor.document().elements()[0].id;
        editor.select_element(Some(id));
        for _ in 0..5 {
            editor.rotate_selected();
        }
        assert_eq!(editor.document().get(id).unwrap().rotation, 450);
        assert_eq!(view.scene(&editor).layers[0].rotation, 90);
    }
}

//! Application shell: one open plan, its canvas view, and action dispatch.

use crate::actions::UiAction;
use crate::shortcuts::ShortcutRegistry;
use floorplan_core::config::{ConfigError, EditorConfig};
use floorplan_core::input::PointerEvent;
use floorplan_core::interaction::Editor;
use floorplan_core::plan::{Plan, PlanError, PlanSettings};
use floorplan_core::session::{PlanSession, SyncFailure};
use floorplan_core::storage::{PlanStore, StorageError};
use floorplan_core::tools::PanelAction;
use floorplan_render::{CanvasView, RendererError, SvgRenderer};
use std::sync::Arc;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error("invalid script: {0}")]
    Script(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Create and store a new plan with the product defaults.
pub async fn create_plan<S: PlanStore>(
    store: &S,
    name: &str,
    width: i64,
    height: i64,
    config: &EditorConfig,
) -> Result<Plan, AppError> {
    let mut plan = Plan::new(name);
    plan.grid_size = config.default_grid_size;
    plan.apply_settings(&PlanSettings {
        width: Some(width),
        height: Some(height),
        ..Default::default()
    })?;
    let plan = store.create_plan(&plan).await?;
    log::info!("created plan '{}' ({})", plan.name, plan.id);
    Ok(plan)
}

/// An open plan.
pub struct App<S: PlanStore> {
    session: PlanSession<S>,
    view: CanvasView,
    failures: Vec<SyncFailure>,
}

impl<S: PlanStore> App<S> {
    /// Open a stored plan.
    pub async fn open(store: Arc<S>, plan_id: &str, config: EditorConfig) -> Result<Self, AppError> {
        let session = PlanSession::open(store, plan_id, config).await?;
        Ok(Self::with_session(session))
    }

    /// Start on a plan that is not stored yet.
    pub fn unsaved(store: Arc<S>, plan: Plan, config: EditorConfig) -> Result<Self, AppError> {
        Ok(Self::with_session(PlanSession::new_unsaved(store, plan, config)?))
    }

    fn with_session(session: PlanSession<S>) -> Self {
        let view = CanvasView::new(session.editor());
        Self {
            session,
            view,
            failures: Vec::new(),
        }
    }

    pub fn editor(&self) -> &Editor {
        self.session.editor()
    }

    pub fn session(&self) -> &PlanSession<S> {
        &self.session
    }

    pub fn view(&self) -> &CanvasView {
        &self.view
    }

    /// Persistence failures reported so far.
    pub fn failures(&self) -> &[SyncFailure] {
        &self.failures
    }

    pub async fn handle_action(&mut self, action: UiAction) -> Result<(), AppError> {
        let action = match action {
            UiAction::Key { key, ctrl, shift } => match ShortcutRegistry::action_for(&key, ctrl, shift) {
                Some(action) => action,
                None => {
                    log::debug!("no shortcut bound to {key}");
                    return Ok(());
                }
            },
            other => other,
        };

        let editor = self.session.editor_mut();
        match action {
            UiAction::Pointer { event } => self.view.handle_pointer(editor, event),
            UiAction::Click { position } => {
                self.view.handle_pointer(editor, PointerEvent::down(position));
                self.view.handle_pointer(editor, PointerEvent::up(position));
            }
            UiAction::Drag { from, to } => {
                self.view.handle_pointer(editor, PointerEvent::down(from));
                self.view.handle_pointer(editor, PointerEvent::moved(to));
                self.view.handle_pointer(editor, PointerEvent::up(to));
            }
            UiAction::SelectTool { element_type } => editor.select_tool(&element_type),
            UiAction::Cancel => editor.cancel_gesture(),
            UiAction::Rotate => PanelAction::Rotate.apply(editor),
            UiAction::Duplicate => PanelAction::Duplicate.apply(editor),
            UiAction::Delete => PanelAction::Delete.apply(editor),
            UiAction::EditSelected { patch } => match editor.selection() {
                Some(id) => editor.edit_element(id, patch)?,
                None => log::warn!("edit ignored: nothing selected"),
            },
            UiAction::UpdatePlan { settings } => editor.update_plan_settings(&settings)?,
            UiAction::SetReadOnly { read_only } => editor.set_read_only(read_only),
            UiAction::ToggleGrid => {
                self.view.toggle_grid();
            }
            UiAction::Key { .. } => {}
            UiAction::Save => {
                let failures = self.session.save().await?;
                self.record(failures);
            }
        }
        Ok(())
    }

    /// Run a script, then push whatever it left unsaved.
    pub async fn run_script(&mut self, actions: impl IntoIterator<Item = UiAction>) -> Result<(), AppError> {
        for action in actions {
            log::debug!("replay: {action:?}");
            self.handle_action(action).await?;
        }
        if self.session.has_unsaved_changes() || !self.session.is_persisted() {
            let failures = self.session.save().await?;
            self.record(failures);
        }
        Ok(())
    }

    pub fn render_svg(&self) -> Result<String, AppError> {
        let scene = self.view.scene(self.session.editor());
        Ok(SvgRenderer::render_to_string(&scene)?)
    }

    fn record(&mut self, failures: Vec<SyncFailure>) {
        for failure in &failures {
            log::warn!("{failure}");
        }
        self.failures.extend(failures);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_core::plan::Status;
    use floorplan_core::storage::{FileStore, MemoryStore};
    use kurbo::Point;
    use pollster::block_on;
    use tempfile::tempdir;

    const SCRIPT: &str = r#"[
        {"action": "select_tool", "element_type": "desk"},
        {"action": "click", "position": {"x": 53, "y": 107}},
        {"action": "drag", "from": {"x": 70, "y": 110}, "to": {"x": 145, "y": 212}},
        {"action": "edit_selected", "patch": {"status": "occupied", "assigned_to": "Alice"}},
        {"action": "key", "key": "r"}
    ]"#;

    #[test]
    fn test_replay_persists_edits() {
        let dir = tempdir().unwrap();
        let store = Arc::new(FileStore::new(dir.path()).unwrap());
        let config = EditorConfig::default();
        let plan = block_on(create_plan(&*store, "RDC", 1200, 800, &config)).unwrap();

        let mut app = block_on(App::open(store.clone(), &plan.id, config.clone())).unwrap();
        block_on(app.run_script(UiAction::parse_script(SCRIPT).unwrap())).unwrap();
        assert!(app.failures().is_empty());

        let reopened = block_on(App::open(store, &plan.id, config)).unwrap();
        let elements = reopened.editor().document().elements();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].position(), Point::new(140.0, 200.0));
        assert_eq!(elements[0].status, Status::Occupied);
        assert_eq!(elements[0].assigned_to.as_deref(), Some("Alice"));
        assert_eq!(elements[0].rotation, 90);
    }

    #[test]
    fn test_unsaved_plan_is_created_on_save() {
        let store = Arc::new(MemoryStore::new());
        let mut app =
            App::unsaved(store.clone(), Plan::default(), EditorConfig::default()).unwrap();
        block_on(app.handle_action(UiAction::SelectTool {
            element_type: "plant".into(),
        }))
        .unwrap();
        block_on(app.handle_action(UiAction::Click {
            position: Point::new(200.0, 200.0),
        }))
        .unwrap();
        assert!(block_on(store.list_plans()).unwrap().is_empty());

        block_on(app.handle_action(UiAction::Key {
            key: "S".into(),
            ctrl: true,
            shift: false,
        }))
        .unwrap();
        assert!(app.session().is_persisted());
        let plans = block_on(store.list_plans()).unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].name, "Nouveau Plan");
        assert_eq!(block_on(store.list_elements(&plans[0].id)).unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_plan_settings_abort_script() {
        let store = Arc::new(MemoryStore::new());
        let mut app = App::unsaved(store, Plan::default(), EditorConfig::default()).unwrap();
        let result = block_on(app.handle_action(UiAction::UpdatePlan {
            settings: PlanSettings {
                grid_size: Some(0),
                ..Default::default()
            },
        }));
        assert!(matches!(result, Err(AppError::Plan(PlanError::InvalidDimension { .. }))));
        assert_eq!(app.editor().plan().grid_size, 20);
    }

    #[test]
    fn test_create_plan_rejects_zero_width() {
        let store = MemoryStore::new();
        let result = block_on(create_plan(&store, "Bad", 0, 800, &EditorConfig::default()));
        assert!(matches!(result, Err(AppError::Plan(_))));
        assert!(block_on(store.list_plans()).unwrap().is_empty());
    }

    #[test]
    fn test_unsaved_plan_needs_grid_pitch() {
        let mut plan = Plan::new("RDC");
        plan.grid_size = 0;
        let result = App::unsaved(Arc::new(MemoryStore::new()), plan, EditorConfig::default());
        assert!(matches!(result, Err(AppError::Plan(PlanError::InvalidDimension { .. }))));
    }

    #[test]
    fn test_render_reflects_grid_toggle() {
        let store = Arc::new(MemoryStore::new());
        let mut app = App::unsaved(store, Plan::default(), EditorConfig::default()).unwrap();
        assert!(app.render_svg().unwrap().contains(r#"class="grid""#));
        block_on(app.handle_action(UiAction::Key {
            key: "g".into(),
            ctrl: false,
            shift: false,
        }))
        .unwrap();
        assert!(!app.render_svg().unwrap().contains(r#"class="grid""#));
    }
}

//! Editing session: connects an [`Editor`] to a [`PlanStore`].
//!
//! Editor callbacks land in an outbox. A plan that has never been saved keeps
//! every edit local until [`PlanSession::save`] creates it in the store. For a
//! persisted plan, [`PlanSession::flush`] forwards queued mutations. Writes
//! are fire-and-forget: local state is never rolled back, and failures are
//! handed back as [`SyncFailure`] values for the application to show.

use crate::config::EditorConfig;
use crate::interaction::{Editor, EditorListener};
use crate::plan::{
    Element, ElementDraft, ElementId, ElementPatch, Plan, PlanDocument, PlanResult, PlanSettings,
};
use crate::storage::{PlanStore, StorageError, StorageResult};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use thiserror::Error;

/// A mutation waiting to be forwarded to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingOp {
    Create {
        local_id: ElementId,
        draft: ElementDraft,
    },
    Update {
        id: ElementId,
        patch: ElementPatch,
    },
    Delete {
        id: ElementId,
    },
    UpdatePlan(PlanSettings),
}

impl PendingOp {
    pub fn describe(&self) -> String {
        match self {
            PendingOp::Create { draft, .. } => format!("create '{}'", draft.name),
            PendingOp::Update { id, .. } => format!("update element {id}"),
            PendingOp::Delete { id } => format!("delete element {id}"),
            PendingOp::UpdatePlan(_) => "update plan settings".to_string(),
        }
    }

    fn remap(&mut self, ids: &HashMap<ElementId, ElementId>) {
        let id = match self {
            PendingOp::Update { id, .. } | PendingOp::Delete { id } => id,
            PendingOp::Create { .. } | PendingOp::UpdatePlan(_) => return,
        };
        if let Some(server) = ids.get(id) {
            *id = *server;
        }
    }
}

/// A persistence write that failed. Local state keeps the change.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("failed to {}: {}", .op.describe(), .error)]
pub struct SyncFailure {
    pub op: PendingOp,
    pub error: StorageError,
}

#[derive(Debug, Clone, Default)]
struct Outbox(Rc<RefCell<Vec<PendingOp>>>);

impl Outbox {
    fn push(&self, op: PendingOp) {
        self.0.borrow_mut().push(op);
    }

    fn take(&self) -> Vec<PendingOp> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    fn len(&self) -> usize {
        self.0.borrow().len()
    }
}

impl EditorListener for Outbox {
    fn on_element_add(&mut self, draft: &ElementDraft, element: &Element) {
        self.push(PendingOp::Create {
            local_id: element.id,
            draft: draft.clone(),
        });
    }

    fn on_element_update(&mut self, id: ElementId, patch: &ElementPatch) {
        self.push(PendingOp::Update {
            id,
            patch: patch.clone(),
        });
    }

    fn on_element_delete(&mut self, id: ElementId) {
        self.push(PendingOp::Delete { id });
    }

    fn on_plan_update(&mut self, settings: &PlanSettings) {
        self.push(PendingOp::UpdatePlan(settings.clone()));
    }
}

/// An editor bound to a store.
pub struct PlanSession<S: PlanStore> {
    store: Arc<S>,
    editor: Editor,
    outbox: Outbox,
    persisted: bool,
}

impl<S: PlanStore> PlanSession<S> {
    /// Start a session on a plan that does not exist in the store yet.
    pub fn new_unsaved(store: Arc<S>, plan: Plan, config: EditorConfig) -> PlanResult<Self> {
        Self::build(store, PlanDocument::new(plan), config, false)
    }

    /// Open a stored plan with its elements.
    pub async fn open(store: Arc<S>, plan_id: &str, config: EditorConfig) -> StorageResult<Self> {
        let plan = store.load_plan(plan_id).await?;
        let elements = store.list_elements(plan_id).await?;
        log::info!("opened plan '{}' ({} elements)", plan.name, elements.len());
        let document = PlanDocument::with_elements(plan, elements)?;
        Ok(Self::build(store, document, config, true)?)
    }

    fn build(
        store: Arc<S>,
        document: PlanDocument,
        config: EditorConfig,
        persisted: bool,
    ) -> PlanResult<Self> {
        let outbox = Outbox::default();
        let mut editor = Editor::with_config(document, config)?;
        editor.set_listener(outbox.clone());
        Ok(Self {
            store,
            editor,
            outbox,
            persisted,
        })
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Whether the plan exists in the store.
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Whether there are edits the store has not seen.
    pub fn has_unsaved_changes(&self) -> bool {
        self.outbox.len() > 0
    }

    /// Persist the session.
    ///
    /// An unsaved plan is created first, then every element in paint order;
    /// local ids are reconciled to the stored ones. A persisted plan is
    /// flushed. Failing to create the plan leaves everything local.
    pub async fn save(&mut self) -> StorageResult<Vec<SyncFailure>> {
        if self.persisted {
            return Ok(self.flush().await);
        }

        let plan = self.store.create_plan(self.editor.plan()).await?;
        let plan_id = plan.id.clone();
        self.editor.apply_remote_plan(plan)?;
        self.persisted = true;
        // The current document already reflects every queued edit.
        self.outbox.take();

        let mut failures = Vec::new();
        let elements = self.editor.document().elements().to_vec();
        for element in elements {
            let draft = element.to_draft();
            match self.store.create_element(&plan_id, &draft).await {
                Ok(created) => {
                    if let Err(err) = self.editor.reconcile_element_id(element.id, created.id) {
                        log::warn!("could not reconcile {}: {err}", element.id);
                    }
                }
                Err(error) => {
                    log::warn!("failed to save '{}': {error}", draft.name);
                    failures.push(SyncFailure {
                        op: PendingOp::Create {
                            local_id: element.id,
                            draft,
                        },
                        error,
                    });
                }
            }
        }
        log::info!("saved plan '{}' as {plan_id}", self.editor.plan().name);
        Ok(failures)
    }

    /// Forward queued mutations of a persisted plan.
    ///
    /// Each write is attempted once; failures are returned, not retried, and
    /// the editor keeps its optimistic state. Nothing happens for an unsaved
    /// plan.
    pub async fn flush(&mut self) -> Vec<SyncFailure> {
        if !self.persisted {
            return Vec::new();
        }
        let plan_id = self.editor.plan().id.clone();
        let mut ids = HashMap::new();
        let mut failures = Vec::new();

        for mut op in self.outbox.take() {
            op.remap(&ids);
            let result = match &op {
                PendingOp::Create { local_id, draft } => {
                    match self.store.create_element(&plan_id, draft).await {
                        Ok(created) => {
                            ids.insert(*local_id, created.id);
                            // The element may already be gone locally; the
                            // mapping still redirects later operations.
                            if let Err(err) = self.editor.reconcile_element_id(*local_id, created.id) {
                                log::debug!("reconcile skipped: {err}");
                            }
                            Ok(())
                        }
                        Err(err) => Err(err),
                    }
                }
                PendingOp::Update { id, patch } => self
                    .store
                    .update_element(&plan_id, *id, patch)
                    .await
                    .map(|_| ()),
                PendingOp::Delete { id } => self.store.delete_element(&plan_id, *id).await,
                PendingOp::UpdatePlan(settings) => {
                    self.store.update_plan(&plan_id, settings).await.map(|_| ())
                }
            };
            if let Err(error) = result {
                log::warn!("failed to {}: {error}", op.describe());
                failures.push(SyncFailure { op, error });
            }
        }
        failures
    }

    /// Copy the stored plan under a new name.
    pub async fn duplicate(&self, new_name: &str, owner: Option<&str>) -> StorageResult<Plan> {
        if !self.persisted {
            return Err(StorageError::NotFound(format!(
                "plan {} is not saved",
                self.editor.plan().id
            )));
        }
        self.store
            .duplicate_plan(&self.editor.plan().id, new_name, owner)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BoxFuture, MemoryStore};
    use kurbo::Point;
    use pollster::block_on;

    fn place(editor: &mut Editor, tool: &str, at: Point) -> ElementId {
        editor.select_tool(tool);
        editor.pointer_down(at);
        editor.pointer_up(at);
        editor.document().elements().last().unwrap().id
    }

    fn drag(editor: &mut Editor, from: Point, to: Point) {
        editor.pointer_down(from);
        editor.pointer_move(to);
        editor.pointer_up(to);
    }

    #[test]
    fn test_unsaved_plan_stays_local_until_save() {
        let store = Arc::new(MemoryStore::new());
        let mut session =
            PlanSession::new_unsaved(store.clone(), Plan::default(), EditorConfig::default())
                .unwrap();

        let local = place(session.editor_mut(), "desk", Point::new(53.0, 107.0));
        drag(session.editor_mut(), Point::new(70.0, 110.0), Point::new(145.0, 212.0));
        assert!(session.has_unsaved_changes());
        assert!(block_on(session.flush()).is_empty());
        assert!(block_on(store.list_plans()).unwrap().is_empty());

        let failures = block_on(session.save()).unwrap();
        assert!(failures.is_empty());
        assert!(session.is_persisted());
        assert!(!session.has_unsaved_changes());

        let plan_id = session.editor().plan().id.clone();
        let stored = block_on(store.list_elements(&plan_id)).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].position(), Point::new(140.0, 200.0));
        assert_ne!(stored[0].id, local);
        assert_eq!(session.editor().document().elements()[0].id, stored[0].id);
    }

    #[test]
    fn test_flush_reconciles_created_ids() {
        let store = Arc::new(MemoryStore::new());
        let plan = block_on(store.create_plan(&Plan::new("RDC"))).unwrap();
        let mut session = block_on(PlanSession::open(store.clone(), &plan.id, EditorConfig::default())).unwrap();

        let local = place(session.editor_mut(), "desk", Point::new(53.0, 107.0));
        // Moved before the create reached the store.
        drag(session.editor_mut(), Point::new(70.0, 110.0), Point::new(145.0, 212.0));
        session.editor_mut().select_element(Some(local));
        assert!(block_on(session.flush()).is_empty());

        let stored = block_on(store.list_elements(&plan.id)).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].position(), Point::new(140.0, 200.0));
        assert_eq!(session.editor().selection(), Some(stored[0].id));
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn test_create_then_delete_before_flush() {
        let store = Arc::new(MemoryStore::new());
        let plan = block_on(store.create_plan(&Plan::new("RDC"))).unwrap();
        let mut session = block_on(PlanSession::open(store.clone(), &plan.id, EditorConfig::default())).unwrap();

        let local = place(session.editor_mut(), "plant", Point::new(200.0, 200.0));
        session.editor_mut().delete_element(local);
        assert!(block_on(session.flush()).is_empty());
        assert!(block_on(store.list_elements(&plan.id)).unwrap().is_empty());
    }

    #[test]
    fn test_plan_settings_are_forwarded() {
        let store = Arc::new(MemoryStore::new());
        let plan = block_on(store.create_plan(&Plan::new("RDC"))).unwrap();
        let mut session = block_on(PlanSession::open(store.clone(), &plan.id, EditorConfig::default())).unwrap();
        session
            .editor_mut()
            .update_plan_settings(&PlanSettings {
                grid_size: Some(40),
                ..Default::default()
            })
            .unwrap();
        block_on(session.flush());
        assert_eq!(block_on(store.load_plan(&plan.id)).unwrap().grid_size, 40);
    }

    /// Store whose element updates always fail.
    struct FlakyStore(MemoryStore);

    impl PlanStore for FlakyStore {
        fn create_plan(&self, plan: &Plan) -> BoxFuture<'_, StorageResult<Plan>> {
            self.0.create_plan(plan)
        }
        fn load_plan(&self, plan_id: &str) -> BoxFuture<'_, StorageResult<Plan>> {
            self.0.load_plan(plan_id)
        }
        fn list_plans(&self) -> BoxFuture<'_, StorageResult<Vec<Plan>>> {
            self.0.list_plans()
        }
        fn update_plan(&self, plan_id: &str, settings: &PlanSettings) -> BoxFuture<'_, StorageResult<Plan>> {
            self.0.update_plan(plan_id, settings)
        }
        fn delete_plan(&self, plan_id: &str) -> BoxFuture<'_, StorageResult<()>> {
            self.0.delete_plan(plan_id)
        }
        fn duplicate_plan(
            &self,
            plan_id: &str,
            new_name: &str,
            owner: Option<&str>,
        ) -> BoxFuture<'_, StorageResult<Plan>> {
            self.0.duplicate_plan(plan_id, new_name, owner)
        }
        fn list_elements(&self, plan_id: &str) -> BoxFuture<'_, StorageResult<Vec<Element>>> {
            self.0.list_elements(plan_id)
        }
        fn create_element(&self, plan_id: &str, draft: &ElementDraft) -> BoxFuture<'_, StorageResult<Element>> {
            self.0.create_element(plan_id, draft)
        }
        fn update_element(
            &self,
            _plan_id: &str,
            _id: ElementId,
            _patch: &ElementPatch,
        ) -> BoxFuture<'_, StorageResult<Element>> {
            Box::pin(async { Err(StorageError::Io("connection reset".into())) })
        }
        fn delete_element(&self, plan_id: &str, id: ElementId) -> BoxFuture<'_, StorageResult<()>> {
            self.0.delete_element(plan_id, id)
        }
    }

    #[test]
    fn test_failed_write_keeps_local_state() {
        let store = Arc::new(FlakyStore(MemoryStore::new()));
        let plan = block_on(store.create_plan(&Plan::new("RDC"))).unwrap();
        let mut session = block_on(PlanSession::open(store.clone(), &plan.id, EditorConfig::default())).unwrap();

        let id = place(session.editor_mut(), "desk", Point::new(53.0, 107.0));
        block_on(session.flush());
        let id = session.editor().document().elements().last().map_or(id, |e| e.id);

        session.editor_mut().select_element(Some(id));
        session.editor_mut().rotate_selected();
        let failures = block_on(session.flush());

        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0].op, PendingOp::Update { .. }));
        assert!(failures[0].to_string().contains("connection reset"));
        assert_eq!(session.editor().document().get(id).unwrap().rotation, 90);
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn test_duplicate_requires_saved_plan() {
        let store = Arc::new(MemoryStore::new());
        let session =
            PlanSession::new_unsaved(store, Plan::default(), EditorConfig::default()).unwrap();
        assert!(matches!(
            block_on(session.duplicate("Copie", None)),
            Err(StorageError::NotFound(_))
        ));
    }
}

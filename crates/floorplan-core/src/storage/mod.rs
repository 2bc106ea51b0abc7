//! Persistence collaborator for plans and their elements.
//!
//! The editor never talks to storage directly; a [`PlanSession`] forwards
//! its callbacks here. Backends only have to honor the [`PlanStore`] trait,
//! so an HTTP client can sit behind it as easily as the bundled
//! [`MemoryStore`] and [`FileStore`].
//!
//! [`PlanSession`]: crate::session::PlanSession

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::plan::{
    Element, ElementDraft, ElementId, ElementPatch, Plan, PlanDocument, PlanError, PlanSettings,
};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;
use uuid::Uuid;

/// Storage errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("rejected: {0}")]
    Invalid(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("storage error: {0}")]
    Other(String),
}

impl From<PlanError> for StorageError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::NotFound(id) => StorageError::NotFound(format!("element {id}")),
            other => StorageError::Invalid(other.to_string()),
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for store operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Plan and element persistence.
///
/// Identifiers are assigned by the store: `create_plan` and `create_element`
/// return the stored entity with its final id.
pub trait PlanStore: Send + Sync {
    /// Persist a new plan. The plan's id is replaced by a store-assigned one.
    fn create_plan(&self, plan: &Plan) -> BoxFuture<'_, StorageResult<Plan>>;

    fn load_plan(&self, plan_id: &str) -> BoxFuture<'_, StorageResult<Plan>>;

    /// All stored plans.
    fn list_plans(&self) -> BoxFuture<'_, StorageResult<Vec<Plan>>>;

    /// Apply a settings patch. Invalid dimensions leave the plan untouched.
    fn update_plan(&self, plan_id: &str, settings: &PlanSettings) -> BoxFuture<'_, StorageResult<Plan>>;

    /// Delete a plan together with its elements.
    fn delete_plan(&self, plan_id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Copy a plan and all its elements under a new name and owner.
    ///
    /// Fails with [`StorageError::Conflict`] when `owner` already has a plan
    /// called `new_name`.
    fn duplicate_plan(
        &self,
        plan_id: &str,
        new_name: &str,
        owner: Option<&str>,
    ) -> BoxFuture<'_, StorageResult<Plan>>;

    /// Elements of a plan in paint order.
    fn list_elements(&self, plan_id: &str) -> BoxFuture<'_, StorageResult<Vec<Element>>>;

    fn create_element(&self, plan_id: &str, draft: &ElementDraft) -> BoxFuture<'_, StorageResult<Element>>;

    fn update_element(
        &self,
        plan_id: &str,
        id: ElementId,
        patch: &ElementPatch,
    ) -> BoxFuture<'_, StorageResult<Element>>;

    fn delete_element(&self, plan_id: &str, id: ElementId) -> BoxFuture<'_, StorageResult<()>>;
}

/// Build the stored record for a new plan.
fn new_record(plan: &Plan) -> StorageResult<PlanDocument> {
    let mut plan = plan.clone();
    plan.id = Uuid::new_v4().to_string();
    Ok(PlanDocument::with_elements(plan, Vec::new())?)
}

/// Build a copy of `source` with fresh ids, rejecting a name the owner
/// already uses.
fn duplicate_record<'a>(
    source: &PlanDocument,
    new_name: &str,
    owner: Option<&str>,
    existing: impl IntoIterator<Item = &'a Plan>,
) -> StorageResult<PlanDocument> {
    let taken = existing
        .into_iter()
        .any(|plan| plan.name == new_name && plan.created_by.as_deref() == owner);
    if taken {
        return Err(StorageError::Conflict(format!(
            "a plan named '{new_name}' already exists"
        )));
    }

    let mut plan = source.plan.clone();
    plan.id = Uuid::new_v4().to_string();
    plan.name = new_name.to_string();
    plan.created_by = owner.map(str::to_string);

    let elements = source
        .elements()
        .iter()
        .map(|element| Element::from_draft(Uuid::new_v4(), element.to_draft()))
        .collect();
    Ok(PlanDocument::with_elements(plan, elements)?)
}

fn plan_not_found(plan_id: &str) -> StorageError {
    StorageError::NotFound(format!("plan {plan_id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    /// Behavior every store must share.
    pub(super) fn exercise_store(store: &dyn PlanStore) {
        pollster::block_on(async {
            let plan = store.create_plan(&Plan::new("RDC")).await.unwrap();
            assert!(!plan.id.starts_with("local-"));
            assert_eq!(store.load_plan(&plan.id).await.unwrap(), plan);

            let draft = ElementDraft::from_type("desk", "Bureau 1", Point::new(60.0, 100.0));
            let desk = store.create_element(&plan.id, &draft).await.unwrap();
            let chair = store
                .create_element(&plan.id, &ElementDraft::from_type("chair", "Chaise 2", Point::ZERO))
                .await
                .unwrap();
            assert_eq!(desk.name, "Bureau 1");

            let moved = store
                .update_element(&plan.id, desk.id, &ElementPatch::position(Point::new(140.0, 200.0)))
                .await
                .unwrap();
            assert_eq!(moved.position(), Point::new(140.0, 200.0));

            let ids: Vec<_> = store
                .list_elements(&plan.id)
                .await
                .unwrap()
                .into_iter()
                .map(|e| e.id)
                .collect();
            assert_eq!(ids, vec![desk.id, chair.id]);

            store.delete_element(&plan.id, chair.id).await.unwrap();
            assert!(matches!(
                store.delete_element(&plan.id, chair.id).await,
                Err(StorageError::NotFound(_))
            ));

            let bad = PlanSettings {
                width: Some(0),
                ..Default::default()
            };
            assert!(matches!(
                store.update_plan(&plan.id, &bad).await,
                Err(StorageError::Invalid(_))
            ));
            let renamed = store
                .update_plan(
                    &plan.id,
                    &PlanSettings {
                        name: Some("Étage 1".into()),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            assert_eq!(renamed.name, "Étage 1");

            let copy = store
                .duplicate_plan(&plan.id, "Étage 1 bis", Some("alice"))
                .await
                .unwrap();
            assert_ne!(copy.id, plan.id);
            let copied = store.list_elements(&copy.id).await.unwrap();
            assert_eq!(copied.len(), 1);
            assert_ne!(copied[0].id, desk.id);
            assert_eq!(copied[0].position(), Point::new(140.0, 200.0));
            assert!(matches!(
                store.duplicate_plan(&plan.id, "Étage 1 bis", Some("alice")).await,
                Err(StorageError::Conflict(_))
            ));
            // Another owner may reuse the name.
            store
                .duplicate_plan(&plan.id, "Étage 1 bis", Some("bob"))
                .await
                .unwrap();

            assert_eq!(store.list_plans().await.unwrap().len(), 3);
            store.delete_plan(&plan.id).await.unwrap();
            assert!(matches!(
                store.list_elements(&plan.id).await,
                Err(StorageError::NotFound(_))
            ));
            assert_eq!(store.list_plans().await.unwrap().len(), 2);
        });
    }

    #[test]
    fn test_new_record_rejects_zero_pitch() {
        let mut plan = Plan::new("Bad");
        plan.grid_size = 0;
        assert!(matches!(new_record(&plan), Err(StorageError::Invalid(_))));
    }

    #[test]
    fn test_plan_error_mapping() {
        let id = Uuid::nil();
        assert_eq!(
            StorageError::from(PlanError::NotFound(id)),
            StorageError::NotFound(format!("element {id}"))
        );
    }
}

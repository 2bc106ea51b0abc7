//! In-memory plan store.

use super::{
    BoxFuture, PlanStore, StorageError, StorageResult, duplicate_record, new_record, plan_not_found,
};
use crate::plan::{Element, ElementDraft, ElementId, ElementPatch, Plan, PlanDocument, PlanSettings};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// In-memory store for tests and unsaved sessions.
#[derive(Default)]
pub struct MemoryStore {
    plans: RwLock<HashMap<String, PlanDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, HashMap<String, PlanDocument>>> {
        self.plans
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {e}")))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, HashMap<String, PlanDocument>>> {
        self.plans
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {e}")))
    }

    /// Run `f` against one stored plan.
    fn with_plan<T>(
        &self,
        plan_id: &str,
        f: impl FnOnce(&mut PlanDocument) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let mut plans = self.write()?;
        let document = plans.get_mut(plan_id).ok_or_else(|| plan_not_found(plan_id))?;
        f(document)
    }
}

impl PlanStore for MemoryStore {
    fn create_plan(&self, plan: &Plan) -> BoxFuture<'_, StorageResult<Plan>> {
        let plan = plan.clone();
        Box::pin(async move {
            let record = new_record(&plan)?;
            let stored = record.plan.clone();
            self.write()?.insert(stored.id.clone(), record);
            Ok(stored)
        })
    }

    fn load_plan(&self, plan_id: &str) -> BoxFuture<'_, StorageResult<Plan>> {
        let plan_id = plan_id.to_string();
        Box::pin(async move {
            self.read()?
                .get(&plan_id)
                .map(|doc| doc.plan.clone())
                .ok_or_else(|| plan_not_found(&plan_id))
        })
    }

    fn list_plans(&self) -> BoxFuture<'_, StorageResult<Vec<Plan>>> {
        Box::pin(async move {
            let mut plans: Vec<Plan> = self.read()?.values().map(|doc| doc.plan.clone()).collect();
            plans.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
            Ok(plans)
        })
    }

    fn update_plan(&self, plan_id: &str, settings: &PlanSettings) -> BoxFuture<'_, StorageResult<Plan>> {
        let plan_id = plan_id.to_string();
        let settings = settings.clone();
        Box::pin(async move {
            self.with_plan(&plan_id, |doc| Ok(doc.update_plan_settings(&settings)?.clone()))
        })
    }

    fn delete_plan(&self, plan_id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let plan_id = plan_id.to_string();
        Box::pin(async move {
            self.write()?
                .remove(&plan_id)
                .map(|_| ())
                .ok_or_else(|| plan_not_found(&plan_id))
        })
    }

    fn duplicate_plan(
        &self,
        plan_id: &str,
        new_name: &str,
        owner: Option<&str>,
    ) -> BoxFuture<'_, StorageResult<Plan>> {
        let plan_id = plan_id.to_string();
        let new_name = new_name.to_string();
        let owner = owner.map(str::to_string);
        Box::pin(async move {
            let mut plans = self.write()?;
            let source = plans.get(&plan_id).ok_or_else(|| plan_not_found(&plan_id))?;
            let copy = duplicate_record(
                source,
                &new_name,
                owner.as_deref(),
                plans.values().map(|doc| &doc.plan),
            )?;
            let stored = copy.plan.clone();
            plans.insert(stored.id.clone(), copy);
            Ok(stored)
        })
    }

    fn list_elements(&self, plan_id: &str) -> BoxFuture<'_, StorageResult<Vec<Element>>> {
        let plan_id = plan_id.to_string();
        Box::pin(async move {
            self.read()?
                .get(&plan_id)
                .map(|doc| doc.elements().to_vec())
                .ok_or_else(|| plan_not_found(&plan_id))
        })
    }

    fn create_element(&self, plan_id: &str, draft: &ElementDraft) -> BoxFuture<'_, StorageResult<Element>> {
        let plan_id = plan_id.to_string();
        let draft = draft.clone();
        Box::pin(async move {
            self.with_plan(&plan_id, |doc| {
                Ok(doc.insert_element(Uuid::new_v4(), draft)?.clone())
            })
        })
    }

    fn update_element(
        &self,
        plan_id: &str,
        id: ElementId,
        patch: &ElementPatch,
    ) -> BoxFuture<'_, StorageResult<Element>> {
        let plan_id = plan_id.to_string();
        let patch = patch.clone();
        Box::pin(async move {
            self.with_plan(&plan_id, |doc| Ok(doc.update_element(id, &patch)?.clone()))
        })
    }

    fn delete_element(&self, plan_id: &str, id: ElementId) -> BoxFuture<'_, StorageResult<()>> {
        let plan_id = plan_id.to_string();
        Box::pin(async move {
            self.with_plan(&plan_id, |doc| {
                doc.remove_element(id)?;
                Ok(())
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_contract() {
        super::super::tests::exercise_store(&MemoryStore::new());
    }

    #[test]
    fn test_missing_plan() {
        let store = MemoryStore::new();
        pollster::block_on(async {
            assert!(matches!(
                store.load_plan("nope").await,
                Err(StorageError::NotFound(_))
            ));
            assert!(matches!(
                store.delete_plan("nope").await,
                Err(StorageError::NotFound(_))
            ));
        });
    }
}

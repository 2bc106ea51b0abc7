//! File-based plan store.

use super::{
    BoxFuture, PlanStore, StorageError, StorageResult, duplicate_record, new_record, plan_not_found,
};
use crate::plan::{
    DocumentError, Element, ElementDraft, ElementId, ElementPatch, Plan, PlanDocument, PlanSettings,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Stores each plan, elements included, as one JSON file in a directory.
pub struct FileStore {
    base_path: PathBuf,
    /// Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {e}"))
            })?;
        }
        Ok(Self {
            base_path,
            write_lock: Mutex::new(()),
        })
    }

    /// Create a store in the default location.
    ///
    /// On Unix: `~/.local/share/floorplan/plans/`
    /// On Windows: `%LOCALAPPDATA%\floorplan\plans\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("floorplan").join("plans"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn plan_path(&self, plan_id: &str) -> PathBuf {
        let safe_id: String = plan_id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{safe_id}.json"))
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| StorageError::Other(format!("Lock error: {e}")))
    }

    fn read_record(&self, plan_id: &str) -> StorageResult<PlanDocument> {
        let path = self.plan_path(plan_id);
        if !path.exists() {
            return Err(plan_not_found(plan_id));
        }
        read_document(&path)
    }

    fn write_record(&self, document: &PlanDocument) -> StorageResult<()> {
        let path = self.plan_path(&document.plan.id);
        let json = document
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&path, json)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {e}", path.display())))
    }

    fn read_all(&self) -> StorageResult<Vec<PlanDocument>> {
        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StorageError::Io(format!("Failed to read directory: {e}")))?;
        let mut documents = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            match read_document(&path) {
                Ok(document) => documents.push(document),
                Err(err) => log::warn!("skipping {}: {err}", path.display()),
            }
        }
        Ok(documents)
    }

    /// Load, modify and write back one plan.
    fn modify<T>(
        &self,
        plan_id: &str,
        f: impl FnOnce(&mut PlanDocument) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let _guard = self.lock()?;
        let mut document = self.read_record(plan_id)?;
        let result = f(&mut document)?;
        self.write_record(&document)?;
        Ok(result)
    }
}

fn read_document(path: &Path) -> StorageResult<PlanDocument> {
    let json = fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {e}", path.display())))?;
    PlanDocument::from_json(&json).map_err(|e| match e {
        DocumentError::Json(e) => {
            StorageError::Serialization(format!("Failed to parse {}: {e}", path.display()))
        }
        DocumentError::Plan(e) => StorageError::Invalid(format!("{}: {e}", path.display())),
    })
}

impl PlanStore for FileStore {
    fn create_plan(&self, plan: &Plan) -> BoxFuture<'_, StorageResult<Plan>> {
        let plan = plan.clone();
        Box::pin(async move {
            let record = new_record(&plan)?;
            let _guard = self.lock()?;
            self.write_record(&record)?;
            log::debug!("created plan {} in {}", record.plan.id, self.base_path.display());
            Ok(record.plan)
        })
    }

    fn load_plan(&self, plan_id: &str) -> BoxFuture<'_, StorageResult<Plan>> {
        let plan_id = plan_id.to_string();
        Box::pin(async move { Ok(self.read_record(&plan_id)?.plan) })
    }

    fn list_plans(&self) -> BoxFuture<'_, StorageResult<Vec<Plan>>> {
        Box::pin(async move {
            let mut plans: Vec<Plan> = self.read_all()?.into_iter().map(|doc| doc.plan).collect();
            plans.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
            Ok(plans)
        })
    }

    fn update_plan(&self, plan_id: &str, settings: &PlanSettings) -> BoxFuture<'_, StorageResult<Plan>> {
        let plan_id = plan_id.to_string();
        let settings = settings.clone();
        Box::pin(async move {
            self.modify(&plan_id, |doc| Ok(doc.update_plan_settings(&settings)?.clone()))
        })
    }

    fn delete_plan(&self, plan_id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.plan_path(plan_id);
        let plan_id = plan_id.to_string();
        Box::pin(async move {
            let _guard = self.lock()?;
            if !path.exists() {
                return Err(plan_not_found(&plan_id));
            }
            fs::remove_file(&path)
                .map_err(|e| StorageError::Io(format!("Failed to delete {}: {e}", path.display())))
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
            let _guard = self.lock()?;
            let source = self.read_record(&plan_id)?;
            let all = self.read_all()?;
            let copy = duplicate_record(
                &source,
                &new_name,
                owner.as_deref(),
                all.iter().map(|doc| &doc.plan),
            )?;
            self.write_record(&copy)?;
            Ok(copy.plan)
        })
    }

    fn list_elements(&self, plan_id: &str) -> BoxFuture<'_, StorageResult<Vec<Element>>> {
        let plan_id = plan_id.to_string();
        Box::pin(async move { Ok(self.read_record(&plan_id)?.elements().to_vec()) })
    }

    fn create_element(&self, plan_id: &str, draft: &ElementDraft) -> BoxFuture<'_, StorageResult<Element>> {
        let plan_id = plan_id.to_string();
        let draft = draft.clone();
        Box::pin(async move {
            self.modify(&plan_id, |doc| {
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
            self.modify(&plan_id, |doc| Ok(doc.update_element(id, &patch)?.clone()))
        })
    }

    fn delete_element(&self, plan_id: &str, id: ElementId) -> BoxFuture<'_, StorageResult<()>> {
        let plan_id = plan_id.to_string();
        Box::pin(async move {
            self.modify(&plan_id, |doc| {
                doc.remove_element(id)?;
                Ok(())
            })
        })
    }
}

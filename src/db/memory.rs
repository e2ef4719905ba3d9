use anyhow::Result;
use tokio::sync::Mutex;

use super::{ProjectStore, StoreError};
use crate::models::Project;

/// Volatile store used by `--memory` runs and tests. Ids start at 1 and are
/// never reused, matching a serial column.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: i32,
    projects: Vec<Project>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectStore for MemoryStore {
    async fn get_projects(&self) -> Result<Vec<Project>> {
        let inner = self.inner.lock().await;
        let mut projects = inner.projects.clone();
        projects.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(projects)
    }

    async fn get_project(&self, id: i32) -> Result<Project> {
        let inner = self.inner.lock().await;
        let project = inner
            .projects
            .iter()
            .find(|p| p.id == Some(id))
            .cloned()
            .ok_or(StoreError::NotFound(id))?;
        Ok(project)
    }

    async fn create_project(&self, project: &Project) -> Result<i32> {
        project.validate().map_err(StoreError::from)?;

        let mut inner = self.inner.lock().await;
        inner.last_id += 1;
        let id = inner.last_id;
        inner.projects.push(Project {
            id: Some(id),
            ..project.clone()
        });

        tracing::debug!(id, name = %project.name, "project created in memory");
        Ok(id)
    }

    async fn update_project(&self, project: &Project) -> Result<()> {
        let id = project.id.ok_or(StoreError::Unsaved)?;
        project.validate().map_err(StoreError::from)?;

        let mut inner = self.inner.lock().await;
        let slot = inner
            .projects
            .iter_mut()
            .find(|p| p.id == Some(id))
            .ok_or(StoreError::NotFound(id))?;
        *slot = project.clone();
        Ok(())
    }

    async fn delete_project(&self, id: i32) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let index = inner
            .projects
            .iter()
            .position(|p| p.id == Some(id))
            .ok_or(StoreError::NotFound(id))?;
        inner.projects.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn project(name: &str) -> Project {
        Project::new(
            name,
            "Health",
            BigDecimal::from_str("50000.00").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
        )
    }

    fn store_error(err: &anyhow::Error) -> &StoreError {
        err.downcast_ref::<StoreError>().expect("store error")
    }

    #[tokio::test]
    async fn save_assigns_id_and_reads_back() {
        let store = MemoryStore::new();
        let mut clinic = project("Clinic");

        let id = store.save_project(&mut clinic).await.unwrap();

        assert_eq!(clinic.id, Some(id));
        assert_eq!(store.get_project(id).await.unwrap(), clinic);
    }

    #[tokio::test]
    async fn identical_values_become_distinct_records() {
        let store = MemoryStore::new();
        let first = store.create_project(&project("Twin")).await.unwrap();
        let second = store.create_project(&project("Twin")).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.get_projects().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn create_ignores_existing_id() {
        let store = MemoryStore::new();
        let mut copy = project("Copy");
        copy.id = Some(99);

        let id = store.create_project(&copy).await.unwrap();

        assert_eq!(id, 1);
        assert!(store.get_project(99).await.is_err());
    }

    #[tokio::test]
    async fn lists_by_name() {
        let store = MemoryStore::new();
        for name in ["Water", "Airport", "Metro"] {
            store.create_project(&project(name)).await.unwrap();
        }

        let names: Vec<String> = store
            .get_projects()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["Airport", "Metro", "Water"]);
    }

    #[tokio::test]
    async fn save_updates_existing_record() {
        let store = MemoryStore::new();
        let mut school = project("School");
        store.save_project(&mut school).await.unwrap();

        school.sector = "Education".to_string();
        school.budget = BigDecimal::from_str("75000.25").unwrap();
        let id = store.save_project(&mut school).await.unwrap();

        let stored = store.get_project(id).await.unwrap();
        assert_eq!(stored.sector, "Education");
        assert_eq!(stored.budget, BigDecimal::from_str("75000.25").unwrap());
        assert_eq!(store.get_projects().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejects_invalid_record_at_save_time() {
        let store = MemoryStore::new();
        let mut long = project(&"a".repeat(201));

        let err = store.save_project(&mut long).await.unwrap_err();

        assert!(matches!(store_error(&err), StoreError::Validation(_)));
        assert_eq!(long.id, None);
        assert!(store.get_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_requires_a_saved_record() {
        let store = MemoryStore::new();

        let err = store.update_project(&project("Draft")).await.unwrap_err();
        assert!(matches!(store_error(&err), StoreError::Unsaved));

        let mut ghost = project("Ghost");
        ghost.id = Some(7);
        let err = store.update_project(&ghost).await.unwrap_err();
        assert!(matches!(store_error(&err), StoreError::NotFound(7)));
    }

    #[tokio::test]
    async fn delete_removes_record_and_ids_are_not_reused() {
        let store = MemoryStore::new();
        let id = store.create_project(&project("Bridge")).await.unwrap();

        store.delete_project(id).await.unwrap();
        let err = store.get_project(id).await.unwrap_err();
        assert!(matches!(store_error(&err), StoreError::NotFound(_)));

        let err = store.delete_project(id).await.unwrap_err();
        assert!(matches!(store_error(&err), StoreError::NotFound(_)));

        let next = store.create_project(&project("Tunnel")).await.unwrap();
        assert_eq!(next, id + 1);
    }
}

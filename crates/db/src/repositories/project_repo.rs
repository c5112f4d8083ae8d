//! Repository for project records (`project:{id}` plus the `projects` set).

use studioflow_core::project::Project;

use crate::error::StoreError;
use crate::keys::{project_key, PROJECTS_SET};
use crate::store::{self, KeyValueStore};

pub struct ProjectRepo;

impl ProjectRepo {
    /// Find a project by id.
    pub async fn find_by_id(
        store: &dyn KeyValueStore,
        project_id: &str,
    ) -> Result<Option<Project>, StoreError> {
        store::load(store, &project_key(project_id)).await
    }

    /// Store a new project and register it in the project index.
    pub async fn insert(store: &dyn KeyValueStore, project: &Project) -> Result<(), StoreError> {
        store::save(store, &project_key(&project.id), project).await?;
        store.add_member(PROJECTS_SET, &project.id).await?;
        Ok(())
    }

    /// Overwrite an existing project record.
    pub async fn update(store: &dyn KeyValueStore, project: &Project) -> Result<(), StoreError> {
        store::save(store, &project_key(&project.id), project).await
    }

    /// Every indexed project, newest first.
    ///
    /// Index entries whose record is missing are skipped with a warning.
    pub async fn list(store: &dyn KeyValueStore) -> Result<Vec<Project>, StoreError> {
        let ids = store.list_members(PROJECTS_SET).await?;
        let mut projects = Vec::with_capacity(ids.len());
        for id in ids {
            match Self::find_by_id(store, &id).await? {
                Some(project) => projects.push(project),
                None => tracing::warn!(project_id = %id, "Indexed project has no record"),
            }
        }
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }
}

//! The four issue operations: create, list, update, delete.
//!
//! Each call loads the full dataset, works on one project's list and, for
//! mutations, saves the full dataset back. Mutations are serialized through
//! a single writer lock so two requests in this process cannot overwrite
//! each other's changes. Separate processes sharing one file are not
//! coordinated.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{IssueError, Result, StoreError};
use crate::model::{Datastore, Issue};
use crate::query::{IssueRef, IssueUpdate, ListFilters, NewIssue};
use crate::store::DataStore;
use crate::util;

/// Issue operations over a shared [`DataStore`].
pub struct IssueService {
    store: Arc<dyn DataStore>,
    write_lock: Mutex<()>,
}

impl IssueService {
    #[must_use]
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn DataStore> {
        &self.store
    }

    async fn load(&self) -> std::result::Result<Datastore, StoreError> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.load())
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }

    async fn save(&self, data: Datastore) -> std::result::Result<(), StoreError> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.save(&data))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))??;
        debug!(store = %self.store.describe(), "dataset saved");
        Ok(())
    }

    /// Create an issue in `project` and return the stored record.
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredFields` without touching storage if
    /// `issue_title`, `issue_text` or `created_by` is absent or empty, and
    /// `Store` if the dataset cannot be loaded or saved.
    pub async fn create(&self, project: &str, input: NewIssue) -> Result<Issue> {
        let (title, text, created_by) = input
            .required()
            .ok_or(IssueError::MissingRequiredFields)?;
        let (title, text, created_by) = (title.to_string(), text.to_string(), created_by.to_string());

        let _guard = self.write_lock.lock().await;
        let mut data = self.load().await?;

        let issues = data.project_entry(project);
        let now = util::now();
        let issue = Issue {
            id: util::generate_id(|id| issues.iter().any(|i| i.id == id)),
            issue_title: title,
            issue_text: text,
            created_by,
            assigned_to: input.assigned_to.unwrap_or_default(),
            status_text: input.status_text.unwrap_or_default(),
            open: true,
            created_on: now,
            updated_on: now,
        };
        issues.push(issue.clone());

        self.save(data).await?;
        info!(project, id = %issue.id, "issue created");
        Ok(issue)
    }

    /// Issues of `project` passing every filter, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `Store` if the dataset cannot be loaded.
    pub async fn list(&self, project: &str, filters: &ListFilters) -> Result<Vec<Issue>> {
        let data = self.load().await?;
        let issues: Vec<Issue> = data
            .project(project)
            .iter()
            .filter(|issue| filters.matches(issue))
            .cloned()
            .collect();
        debug!(project, count = issues.len(), "issues listed");
        Ok(issues)
    }

    /// Merge `update` into the issue it names and return that id.
    ///
    /// # Errors
    ///
    /// Returns, in this order of precedence: `MissingId` if no `_id` was
    /// sent, `NoUpdateFields` if nothing else was sent, `CouldNotUpdate` if
    /// the issue is not in `project`, or `Store` on load/save failure.
    pub async fn update(&self, project: &str, mut update: IssueUpdate) -> Result<String> {
        let id = update
            .id
            .take()
            .filter(|id| !id.is_empty())
            .ok_or(IssueError::MissingId)?;
        if update.is_empty() {
            return Err(IssueError::NoUpdateFields { id });
        }

        let _guard = self.write_lock.lock().await;
        let mut data = self.load().await?;

        let Some(issue) = data
            .project_mut(project)
            .and_then(|issues| issues.iter_mut().find(|i| i.id == id))
        else {
            return Err(IssueError::CouldNotUpdate { id });
        };
        update.apply_to(issue);
        issue.updated_on = util::now().max(issue.updated_on);

        self.save(data).await?;
        info!(project, %id, "issue updated");
        Ok(id)
    }

    /// Remove the issue named by `target` and return its id.
    ///
    /// # Errors
    ///
    /// Returns `MissingId` if no `_id` was sent, `CouldNotDelete` if the
    /// issue is not in `project`, or `Store` on load/save failure.
    pub async fn delete(&self, project: &str, target: IssueRef) -> Result<String> {
        let id = target
            .id
            .filter(|id| !id.is_empty())
            .ok_or(IssueError::MissingId)?;

        let _guard = self.write_lock.lock().await;
        let mut data = self.load().await?;

        let Some(issues) = data.project_mut(project) else {
            return Err(IssueError::CouldNotDelete { id });
        };
        let Some(index) = issues.iter().position(|i| i.id == id) else {
            return Err(IssueError::CouldNotDelete { id });
        };
        issues.remove(index);

        self.save(data).await?;
        info!(project, %id, "issue deleted");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, JsonFileStore};

    fn service() -> (IssueService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (IssueService::new(store.clone()), store)
    }

    fn new_issue(title: &str, assigned_to: Option<&str>) -> NewIssue {
        NewIssue {
            issue_title: Some(title.to_string()),
            issue_text: Some(format!("{title} text")),
            created_by: Some("tester".to_string()),
            assigned_to: assigned_to.map(str::to_string),
            status_text: None,
        }
    }

    #[tokio::test]
    async fn test_create_sets_defaults() {
        let (svc, _) = service();
        let issue = svc.create("apitest", new_issue("First", None)).await.unwrap();
        assert!(!issue.id.is_empty());
        assert!(issue.open);
        assert_eq!(issue.assigned_to, "");
        assert_eq!(issue.status_text, "");
        assert_eq!(issue.created_on, issue.updated_on);
    }

    #[tokio::test]
    async fn test_create_missing_required_does_not_touch_storage() {
        let (svc, store) = service();
        let input = NewIssue {
            issue_text: None,
            ..new_issue("Broken", None)
        };
        let err = svc.create("apitest", input).await.unwrap_err();
        assert!(matches!(err, IssueError::MissingRequiredFields));
        assert_eq!(store.load().unwrap(), Datastore::new());
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order_per_project() {
        let (svc, _) = service();
        let a = svc.create("p1", new_issue("A", None)).await.unwrap();
        svc.create("p2", new_issue("Other", None)).await.unwrap();
        let b = svc.create("p1", new_issue("B", None)).await.unwrap();

        let listed = svc.list("p1", &ListFilters::new()).await.unwrap();
        assert_eq!(listed, vec![a, b]);
        assert!(svc.list("unknown", &ListFilters::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_with_and_semantics() {
        let (svc, _) = service();
        let keep = svc.create("p", new_issue("Keep", Some("moi"))).await.unwrap();
        let closed = svc.create("p", new_issue("Closed", Some("moi"))).await.unwrap();
        svc.create("p", new_issue("Other", Some("toi"))).await.unwrap();
        svc.update(
            "p",
            IssueUpdate {
                id: Some(closed.id.clone()),
                open: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let open_only = svc
            .list("p", &ListFilters::new().with("open", "true"))
            .await
            .unwrap();
        assert_eq!(open_only.len(), 2);
        assert!(open_only.iter().all(|i| i.open));

        let both = svc
            .list(
                "p",
                &ListFilters::new().with("open", "true").with("assigned_to", "moi"),
            )
            .await
            .unwrap();
        assert_eq!(both, vec![keep]);
    }

    #[tokio::test]
    async fn test_update_validation_order() {
        let (svc, _) = service();
        let err = svc.update("p", IssueUpdate::default()).await.unwrap_err();
        assert!(matches!(err, IssueError::MissingId));

        let err = svc
            .update(
                "p",
                IssueUpdate {
                    id: Some("nope".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, IssueError::NoUpdateFields { ref id } if id == "nope"));

        let err = svc
            .update(
                "p",
                IssueUpdate {
                    id: Some("nope".into()),
                    status_text: Some("x".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, IssueError::CouldNotUpdate { ref id } if id == "nope"));
    }

    #[tokio::test]
    async fn test_update_with_only_id_keeps_updated_on() {
        let (svc, _) = service();
        let created = svc.create("p", new_issue("A", None)).await.unwrap();
        let result = svc
            .update(
                "p",
                IssueUpdate {
                    id: Some(created.id.clone()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(IssueError::NoUpdateFields { .. })));
        let listed = svc.list("p", &ListFilters::new()).await.unwrap();
        assert_eq!(listed[0].updated_on, created.updated_on);
    }

    #[tokio::test]
    async fn test_update_merges_and_refreshes_timestamp() {
        let (svc, _) = service();
        let created = svc.create("p", new_issue("A", Some("bob"))).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let id = svc
            .update(
                "p",
                IssueUpdate {
                    id: Some(created.id.clone()),
                    status_text: Some("in review".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(id, created.id);

        let updated = &svc.list("p", &ListFilters::new()).await.unwrap()[0];
        assert_eq!(updated.status_text, "in review");
        assert_eq!(updated.assigned_to, "bob");
        assert_eq!(updated.issue_title, created.issue_title);
        assert_eq!(updated.created_on, created.created_on);
        assert!(updated.updated_on > created.updated_on);
    }

    #[tokio::test]
    async fn test_update_unknown_id_leaves_storage_unchanged() {
        let (svc, store) = service();
        svc.create("p", new_issue("A", None)).await.unwrap();
        let before = store.load().unwrap();
        let err = svc
            .update(
                "p",
                IssueUpdate {
                    id: Some("missing".into()),
                    open: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.load().unwrap(), before);
    }

    #[tokio::test]
    async fn test_update_is_scoped_to_project() {
        let (svc, _) = service();
        let created = svc.create("p1", new_issue("A", None)).await.unwrap();
        let err = svc
            .update(
                "p2",
                IssueUpdate {
                    id: Some(created.id),
                    open: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, IssueError::CouldNotUpdate { .. }));
    }

    #[tokio::test]
    async fn test_delete_removes_issue() {
        let (svc, _) = service();
        let a = svc.create("p", new_issue("A", None)).await.unwrap();
        let b = svc.create("p", new_issue("B", None)).await.unwrap();

        let id = svc
            .delete("p", IssueRef { id: Some(a.id.clone()) })
            .await
            .unwrap();
        assert_eq!(id, a.id);
        assert_eq!(svc.list("p", &ListFilters::new()).await.unwrap(), vec![b]);
    }

    #[tokio::test]
    async fn test_delete_errors() {
        let (svc, store) = service();
        svc.create("p", new_issue("A", None)).await.unwrap();

        let err = svc.delete("p", IssueRef::default()).await.unwrap_err();
        assert!(matches!(err, IssueError::MissingId));

        let err = svc
            .delete("p", IssueRef { id: Some("nope".into()) })
            .await
            .unwrap_err();
        assert!(matches!(err, IssueError::CouldNotDelete { ref id } if id == "nope"));

        let err = svc
            .delete("empty-project", IssueRef { id: Some("nope".into()) })
            .await
            .unwrap_err();
        assert!(matches!(err, IssueError::CouldNotDelete { .. }));
        assert_eq!(store.load().unwrap().issue_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_datastore_is_a_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let svc = IssueService::new(Arc::new(JsonFileStore::new(dir.path().join("db.json"))));
        let err = svc.list("p", &ListFilters::new()).await.unwrap_err();
        assert!(matches!(err, IssueError::Store(StoreError::FileNotFound(_))));
        let err = svc.create("p", new_issue("A", None)).await.unwrap_err();
        assert!(matches!(err, IssueError::Store(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let file = JsonFileStore::new(dir.path().join("db.json"));
        file.init(false).unwrap();
        let svc = Arc::new(IssueService::new(Arc::new(file)));

        let mut handles = Vec::new();
        for n in 0..20 {
            let svc = Arc::clone(&svc);
            let project = if n % 2 == 0 { "even" } else { "odd" };
            handles.push(tokio::spawn(async move {
                svc.create(project, new_issue(&format!("Issue {n}"), None))
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let data = svc.store().load().unwrap();
        assert_eq!(data.issue_count(), 20);
        assert_eq!(data.project("even").len(), 10);
    }

    #[tokio::test]
    async fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = JsonFileStore::new(dir.path().join("db.json"));
        file.init(false).unwrap();
        let svc = IssueService::new(Arc::new(file));

        let input = NewIssue {
            issue_title: Some("Title".into()),
            issue_text: Some("Body".into()),
            created_by: Some("alice".into()),
            assigned_to: Some("bob".into()),
            status_text: Some("new".into()),
        };
        let created = svc.create("apitest", input).await.unwrap();
        let listed = svc.list("apitest", &ListFilters::new()).await.unwrap();
        assert_eq!(listed, vec![created.clone()]);
        assert_eq!(listed[0].issue_title, "Title");
        assert_eq!(listed[0].issue_text, "Body");
        assert_eq!(listed[0].created_by, "alice");
        assert_eq!(listed[0].assigned_to, "bob");
        assert_eq!(listed[0].status_text, "new");
    }
}

use super::parse_id;
use crate::db::models::account_models::{Account, AccountRole};
use crate::db::models::issue_models::{Issue, IssueEvent, IssueFilter, IssueStatus, NewIssue};
use crate::db::repositories::accounts::AccountsRepository;
use crate::db::repositories::issues::IssuesRepository;
use crate::db::repositories::machines::MachinesRepository;
use crate::db::StoreHandle;
use crate::error::Error;
use crate::security::policy::{authorize, Operation};
use crate::uploads::{BlobStore, Upload};
use anyhow::Result;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Issue workflow engine: creation, assignment, status transitions,
/// resolution and closing, plus role-narrowed listing
pub struct IssueService {
    issues_repo: IssuesRepository,
    machines_repo: MachinesRepository,
    accounts_repo: AccountsRepository,
    blobs: Arc<dyn BlobStore>,
}

impl IssueService {
    /// Create a new issue service
    pub fn new(store: StoreHandle, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            issues_repo: IssuesRepository::new(store.clone()),
            machines_repo: MachinesRepository::new(store.clone()),
            accounts_repo: AccountsRepository::new(store),
            blobs,
        }
    }

    /// Save evidence photos before the database write. If any upload
    /// fails the whole batch is abandoned: already-saved blobs get a
    /// best-effort delete and the caller sees the upload error, so no
    /// partially-created issue ever reaches the store.
    fn save_photos(&self, photos: &[Upload]) -> Result<Vec<String>> {
        let mut references = Vec::with_capacity(photos.len());
        for photo in photos {
            match self.blobs.save(photo) {
                Ok(reference) => references.push(reference),
                Err(e) => {
                    for reference in &references {
                        self.blobs.delete(reference);
                    }
                    return Err(e);
                }
            }
        }
        Ok(references)
    }

    async fn get_issue(&self, issue_id: &str) -> Result<Issue> {
        let id = parse_id(issue_id, "issue")?;
        self.issues_repo
            .get_by_id(&id)
            .await?
            .ok_or_else(|| Error::NotFound("Issue not found".to_string()).into())
    }

    /// Report a new issue against a machine
    pub async fn create(
        &self,
        actor: &Account,
        new_issue: NewIssue,
        photos: Vec<Upload>,
    ) -> Result<Issue> {
        authorize(actor, &Operation::CreateIssue)?;

        if self
            .machines_repo
            .get_by_code(&new_issue.machine_code)
            .await?
            .is_none()
        {
            return Err(Error::NotFound("Machine not found".to_string()).into());
        }

        let photo_refs = self.save_photos(&photos)?;

        let now = Utc::now();
        let issue = Issue {
            id: Uuid::new_v4(),
            title: new_issue.title,
            description: new_issue.description,
            machine_code: new_issue.machine_code,
            priority: new_issue.priority,
            status: IssueStatus::Open,
            reported_by: actor.id,
            assigned_to: None,
            resolution_notes: None,
            photos: photo_refs,
            resolution_photos: vec![],
            created_at: now,
            updated_at: now,
            resolved_at: None,
        };

        self.issues_repo.create(&issue).await
    }

    /// Get issue by id, subject to the actor's visibility rules
    pub async fn get(&self, actor: &Account, issue_id: &str) -> Result<Issue> {
        let issue = self.get_issue(issue_id).await?;

        authorize(actor, &Operation::ViewIssue { issue: &issue })?;

        Ok(issue)
    }

    /// List issues. Maintenance accounts see only their assigned issues
    /// and employees only their reported ones, regardless of the filters
    /// supplied.
    pub async fn list(&self, actor: &Account, filter: &IssueFilter) -> Result<Vec<Issue>> {
        authorize(actor, &Operation::ListIssues)?;

        let mut filter = filter.clone();
        if actor.role == AccountRole::Maintenance {
            filter.assigned_to = Some(actor.id);
        }

        let mut query = IssuesRepository::build_filter(&filter);
        if actor.role == AccountRole::Employee {
            query = query.eq("reported_by", json!(actor.id));
        }

        self.issues_repo.list(&query).await
    }

    /// Issues currently assigned to the acting account (maintenance only)
    pub async fn list_assigned(&self, actor: &Account) -> Result<Vec<Issue>> {
        authorize(actor, &Operation::ListAssignedIssues)?;

        let filter = crate::db::Filter::new().eq("assigned_to", json!(actor.id));
        self.issues_repo.list(&filter).await
    }

    /// Issues reported by the acting account
    pub async fn list_reported(&self, actor: &Account) -> Result<Vec<Issue>> {
        let filter = crate::db::Filter::new().eq("reported_by", json!(actor.id));
        self.issues_repo.list(&filter).await
    }

    /// Assign or re-assign an issue to an active maintenance account
    /// (admin only). Always resets status to assigned.
    pub async fn assign(
        &self,
        actor: &Account,
        issue_id: &str,
        assignee_id: &str,
    ) -> Result<Issue> {
        let issue = self.get_issue(issue_id).await?;

        authorize(actor, &Operation::AssignIssue)?;

        let assignee_id = parse_id(assignee_id, "account")?;
        let assignee = self
            .accounts_repo
            .get_by_id(&assignee_id)
            .await?
            .ok_or_else(|| Error::NotFound("Assigned account not found".to_string()))?;

        if assignee.role != AccountRole::Maintenance {
            return Err(
                Error::InvalidInput("Can only assign to maintenance personnel".to_string()).into(),
            );
        }
        if !assignee.active {
            return Err(
                Error::InvalidInput("Cannot assign to a deactivated account".to_string()).into(),
            );
        }

        let next = issue
            .status
            .transition(IssueEvent::Assign)
            .ok_or_else(|| Error::Conflict("Cannot assign a resolved or closed issue".to_string()))?;

        let mut updated = issue.clone();
        updated.assigned_to = Some(assignee.id);
        updated.status = next;
        updated.updated_at = Utc::now();

        info!(
            "Issue {} assigned to {} by {}",
            issue.id, assignee.username, actor.username
        );

        self.issues_repo.update(&updated).await
    }

    /// Generic status transition between the active statuses. Moving to
    /// in_progress is restricted to the current assignee; resolved and
    /// closed are reached through resolve/close only.
    pub async fn set_status(
        &self,
        actor: &Account,
        issue_id: &str,
        target: IssueStatus,
    ) -> Result<Issue> {
        let issue = self.get_issue(issue_id).await?;

        authorize(
            actor,
            &Operation::SetIssueStatus {
                issue: &issue,
                target,
            },
        )?;

        let next = issue
            .status
            .transition(IssueEvent::SetStatus(target))
            .ok_or_else(|| {
                Error::Conflict(format!(
                    "Illegal transition from {} to {}",
                    issue.status.as_str(),
                    target.as_str()
                ))
            })?;

        let mut updated = issue.clone();
        updated.status = next;
        updated.updated_at = Utc::now();

        self.issues_repo.update(&updated).await
    }

    /// Resolve an issue (current assignee only), attaching notes and
    /// resolution evidence and stamping resolved_at
    pub async fn resolve(
        &self,
        actor: &Account,
        issue_id: &str,
        resolution_notes: &str,
        photos: Vec<Upload>,
    ) -> Result<Issue> {
        let issue = self.get_issue(issue_id).await?;

        authorize(actor, &Operation::ResolveIssue { issue: &issue })?;

        let next = issue
            .status
            .transition(IssueEvent::Resolve)
            .ok_or_else(|| Error::Conflict("Issue already resolved or closed".to_string()))?;

        let photo_refs = self.save_photos(&photos)?;

        let now = Utc::now();
        let mut updated = issue.clone();
        updated.status = next;
        updated.resolution_notes = Some(resolution_notes.to_string());
        updated.resolution_photos = photo_refs;
        updated.resolved_at = Some(now);
        updated.updated_at = now;

        info!("Issue {} resolved by {}", issue.id, actor.username);

        self.issues_repo.update(&updated).await
    }

    /// Close a resolved issue (admin only); resolved_at is preserved
    pub async fn close(&self, actor: &Account, issue_id: &str) -> Result<Issue> {
        let issue = self.get_issue(issue_id).await?;

        authorize(actor, &Operation::CloseIssue)?;

        let next = issue
            .status
            .transition(IssueEvent::Close)
            .ok_or_else(|| Error::Conflict("Can only close resolved issues".to_string()))?;

        let mut updated = issue.clone();
        updated.status = next;
        updated.updated_at = Utc::now();

        info!("Issue {} closed by {}", issue.id, actor.username);

        self.issues_repo.update(&updated).await
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Safety issue reported against a machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// External code of the machine this issue is reported against
    pub machine_code: String,
    pub priority: IssuePriority,
    pub status: IssueStatus,
    pub reported_by: Uuid,
    pub assigned_to: Option<Uuid>,
    pub resolution_notes: Option<String>,
    /// Evidence photo references, in upload order
    pub photos: Vec<String>,
    pub resolution_photos: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set exactly when the issue reaches resolved; preserved by close
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IssuePriority {
    Low,
    Medium,
    High,
    Critical,
}

/// Issue lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Open,
    Assigned,
    InProgress,
    Resolved,
    Closed,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Open => "open",
            IssueStatus::Assigned => "assigned",
            IssueStatus::InProgress => "in_progress",
            IssueStatus::Resolved => "resolved",
            IssueStatus::Closed => "closed",
        }
    }

    /// An issue is open while it has not been resolved or closed
    pub fn is_open(&self) -> bool {
        !matches!(self, IssueStatus::Resolved | IssueStatus::Closed)
    }
}

/// Workflow event applied to an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueEvent {
    /// Admin assigns or re-assigns to a maintenance account
    Assign,
    /// Generic status change between the active statuses
    SetStatus(IssueStatus),
    /// Assignee resolves with notes and evidence
    Resolve,
    /// Admin closes a resolved issue
    Close,
}

impl IssueStatus {
    /// Transition table: current state x event -> next state.
    /// `None` means the transition is illegal (surfaced as Conflict).
    /// Resolved and closed are terminal; there is no reopen path.
    pub fn transition(self, event: IssueEvent) -> Option<IssueStatus> {
        use IssueEvent::*;
        use IssueStatus::*;
        match (self, event) {
            (Open | Assigned | InProgress, Assign) => Some(Assigned),
            // Moving to resolved/closed goes through Resolve/Close so that
            // resolved_at is always stamped alongside the status
            (Open | Assigned | InProgress, SetStatus(target)) if target.is_open() => Some(target),
            (Assigned | InProgress, Resolve) => Some(Resolved),
            (Resolved, Close) => Some(Closed),
            _ => None,
        }
    }
}

/// Fields for issue creation
#[derive(Debug, Clone, Deserialize)]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    pub machine_code: String,
    #[serde(default = "default_priority")]
    pub priority: IssuePriority,
}

fn default_priority() -> IssuePriority {
    IssuePriority::Medium
}

/// Listing filters for issue queries; role-based narrowing is applied on top
#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    pub status: Option<IssueStatus>,
    pub priority: Option<IssuePriority>,
    pub machine_code: Option<String>,
    pub assigned_to: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table_legal_moves() {
        use IssueStatus::*;
        assert_eq!(Open.transition(IssueEvent::Assign), Some(Assigned));
        assert_eq!(Assigned.transition(IssueEvent::Assign), Some(Assigned));
        assert_eq!(InProgress.transition(IssueEvent::Assign), Some(Assigned));
        assert_eq!(
            Assigned.transition(IssueEvent::SetStatus(InProgress)),
            Some(InProgress)
        );
        assert_eq!(
            InProgress.transition(IssueEvent::SetStatus(Assigned)),
            Some(Assigned)
        );
        assert_eq!(Assigned.transition(IssueEvent::Resolve), Some(Resolved));
        assert_eq!(InProgress.transition(IssueEvent::Resolve), Some(Resolved));
        assert_eq!(Resolved.transition(IssueEvent::Close), Some(Closed));
    }

    #[test]
    fn test_transition_table_rejections() {
        use IssueStatus::*;
        // Terminal states: no reopen path in this workflow
        assert_eq!(Resolved.transition(IssueEvent::Assign), None);
        assert_eq!(Closed.transition(IssueEvent::Assign), None);
        assert_eq!(Closed.transition(IssueEvent::Resolve), None);
        assert_eq!(Resolved.transition(IssueEvent::SetStatus(Open)), None);
        // Close only applies to resolved issues
        assert_eq!(Open.transition(IssueEvent::Close), None);
        assert_eq!(InProgress.transition(IssueEvent::Close), None);
        // Resolved/closed are reached via Resolve/Close, never SetStatus
        assert_eq!(InProgress.transition(IssueEvent::SetStatus(Resolved)), None);
        assert_eq!(Assigned.transition(IssueEvent::SetStatus(Closed)), None);
    }
}

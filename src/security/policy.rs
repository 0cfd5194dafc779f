use crate::db::models::account_models::{Account, AccountRole};
use crate::db::models::issue_models::{Issue, IssueStatus};
use crate::error::Error;
use anyhow::Result;

/// Descriptor of the operation an actor is attempting. Issue operations
/// carry the fetched resource so ownership rules can be evaluated; callers
/// resolve the resource first, so a missing target surfaces as NotFound
/// before the policy ever runs.
#[derive(Debug)]
pub enum Operation<'a> {
    // Account management
    ListAccounts,
    CreateAccount,
    ViewAccount,
    UpdateAccount,
    DeleteAccount { target: &'a Account },
    SetAccountActive { target: &'a Account },
    ResetPassword,
    ListAccountsByRole,
    ViewAccountStats,

    // Machine management
    CreateMachine,
    ViewMachine,
    ListMachines,
    UpdateMachine,
    UpdateMachineStatus,
    DeleteMachine,
    ViewMachineStats,

    // Issue workflow
    CreateIssue,
    ViewIssue { issue: &'a Issue },
    ListIssues,
    ListAssignedIssues,
    AssignIssue,
    SetIssueStatus { issue: &'a Issue, target: IssueStatus },
    ResolveIssue { issue: &'a Issue },
    CloseIssue,
}

/// Policy outcome: allow, or deny with the reason surfaced to the caller
#[derive(Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(&'static str),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

fn is_assignee(actor: &Account, issue: &Issue) -> bool {
    issue.assigned_to == Some(actor.id)
}

/// Pure role/ownership decision for one operation
pub fn decide(actor: &Account, operation: &Operation<'_>) -> Decision {
    use AccountRole::*;
    use Decision::*;

    match operation {
        Operation::ListAccounts
        | Operation::CreateAccount
        | Operation::ViewAccount
        | Operation::UpdateAccount
        | Operation::ResetPassword => match actor.role {
            Admin => Allow,
            _ => Deny("Account management requires the admin role"),
        },

        Operation::DeleteAccount { target } => match actor.role {
            Admin if target.id == actor.id => Deny("Cannot delete your own account"),
            Admin => Allow,
            _ => Deny("Account management requires the admin role"),
        },

        Operation::SetAccountActive { target } => match actor.role {
            Admin if target.id == actor.id => Deny("Cannot deactivate your own account"),
            Admin => Allow,
            _ => Deny("Account management requires the admin role"),
        },

        Operation::ListAccountsByRole | Operation::ViewAccountStats => match actor.role {
            Admin | SafetyOfficer => Allow,
            _ => Deny("Account summaries require the admin or safety officer role"),
        },

        Operation::CreateMachine | Operation::UpdateMachine | Operation::DeleteMachine => {
            match actor.role {
                Admin => Allow,
                _ => Deny("Machine management requires the admin role"),
            }
        }

        Operation::UpdateMachineStatus => match actor.role {
            Admin | Maintenance => Allow,
            _ => Deny("Machine status updates require the admin or maintenance role"),
        },

        Operation::ViewMachine | Operation::ListMachines | Operation::ListIssues => Allow,

        Operation::ViewMachineStats => match actor.role {
            Admin | SafetyOfficer => Allow,
            _ => Deny("Machine summaries require the admin or safety officer role"),
        },

        Operation::CreateIssue => match actor.role {
            SafetyOfficer | Employee => Allow,
            _ => Deny("Issues are reported by safety officers and employees"),
        },

        Operation::ViewIssue { issue } => match actor.role {
            Admin | SafetyOfficer => Allow,
            Maintenance if is_assignee(actor, issue) => Allow,
            Maintenance => Deny("Issue is not assigned to you"),
            Employee if issue.reported_by == actor.id => Allow,
            Employee => Deny("Issue was not reported by you"),
        },

        Operation::ListAssignedIssues => match actor.role {
            Maintenance => Allow,
            _ => Deny("Assigned listings are for maintenance accounts"),
        },

        Operation::AssignIssue | Operation::CloseIssue => match actor.role {
            Admin => Allow,
            _ => Deny("Issue routing requires the admin role"),
        },

        Operation::SetIssueStatus { issue, target } => match (actor.role, target) {
            // Only the current assignee may start work
            (Maintenance, IssueStatus::InProgress) if is_assignee(actor, issue) => Allow,
            (_, IssueStatus::InProgress) => {
                Deny("Only the assigned maintenance account can mark an issue in progress")
            }
            (Admin, _) => Allow,
            (Maintenance, _) if is_assignee(actor, issue) => Allow,
            (Maintenance, _) => Deny("Issue is not assigned to you"),
            _ => Deny("Issue status updates require the admin or maintenance role"),
        },

        Operation::ResolveIssue { issue } => match actor.role {
            Maintenance if is_assignee(actor, issue) => Allow,
            _ => Deny("Issue is not assigned to you"),
        },
    }
}

/// Apply the policy, converting a deny into a Forbidden error
pub fn authorize(actor: &Account, operation: &Operation<'_>) -> Result<()> {
    match decide(actor, operation) {
        Decision::Allow => Ok(()),
        Decision::Deny(reason) => Err(Error::Forbidden(reason.to_string()).into()),
    }
}

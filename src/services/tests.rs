use crate::config::Config;
use crate::db::memory::MemoryStore;
use crate::db::models::account_models::{
    Account, AccountFilter, AccountRole, LoginCredentials, NewAccount,
};
use crate::db::models::issue_models::{IssueFilter, IssueStatus, NewIssue};
use crate::db::models::machine_models::{Machine, MachineStatus, NewMachine};
use crate::db::StoreHandle;
use crate::error::Error;
use crate::security::auth::AuthService;
use crate::services::accounts::AccountService;
use crate::services::issues::IssueService;
use crate::services::machines::MachineService;
use crate::uploads::{MemoryBlobStore, Upload};
use anyhow::Result;
use std::sync::Arc;

struct TestEnv {
    auth: AuthService,
    accounts: AccountService,
    machines: MachineService,
    issues: IssueService,
    blobs: Arc<MemoryBlobStore>,
}

fn test_env() -> TestEnv {
    test_env_with_blobs(MemoryBlobStore::new())
}

fn test_env_with_blobs(blobs: MemoryBlobStore) -> TestEnv {
    let store: StoreHandle = Arc::new(MemoryStore::new());
    let blobs = Arc::new(blobs);
    let config = Config::default();

    TestEnv {
        auth: AuthService::new(store.clone(), &config.security),
        accounts: AccountService::new(store.clone()),
        machines: MachineService::new(store.clone()),
        issues: IssueService::new(store, blobs.clone()),
        blobs,
    }
}

fn kind(err: &anyhow::Error) -> &Error {
    err.downcast_ref::<Error>().expect("expected a core error")
}

async fn register(env: &TestEnv, username: &str, role: AccountRole) -> Result<Account> {
    env.auth
        .register(&NewAccount {
            username: username.to_string(),
            email: format!("{}@plant.example", username),
            full_name: format!("{} account", username),
            password: "hunter22".to_string(),
            role,
        })
        .await
}

async fn create_machine(env: &TestEnv, admin: &Account, code: &str) -> Result<Machine> {
    env.machines
        .create(
            admin,
            NewMachine {
                code: code.to_string(),
                name: format!("Press {}", code),
                description: None,
                location: "Hall A".to_string(),
                status: MachineStatus::Operational,
                last_maintenance: None,
            },
        )
        .await
}

fn new_issue(machine_code: &str, title: &str) -> NewIssue {
    NewIssue {
        title: title.to_string(),
        description: "Observed during inspection".to_string(),
        machine_code: machine_code.to_string(),
        priority: crate::db::models::issue_models::IssuePriority::High,
    }
}

fn photo(name: &str) -> Upload {
    Upload {
        filename: name.to_string(),
        bytes: vec![0xAB; 16],
    }
}

#[tokio::test]
async fn test_login_failures_are_uniform() -> Result<()> {
    let env = test_env();
    register(&env, "officer", AccountRole::SafetyOfficer).await?;

    let ok = env
        .auth
        .login(&LoginCredentials {
            username: "officer".to_string(),
            password: "hunter22".to_string(),
        })
        .await;
    assert!(ok.is_ok());

    let wrong_password = env
        .auth
        .login(&LoginCredentials {
            username: "officer".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();
    let unknown_user = env
        .auth
        .login(&LoginCredentials {
            username: "nobody".to_string(),
            password: "hunter22".to_string(),
        })
        .await
        .unwrap_err();

    // Unknown user and wrong password are indistinguishable to the caller
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    assert!(matches!(kind(&wrong_password), Error::Unauthenticated(_)));

    Ok(())
}

#[tokio::test]
async fn test_token_resolves_to_active_account() -> Result<()> {
    let env = test_env();
    let admin = register(&env, "admin", AccountRole::Admin).await?;
    let target = register(&env, "mnt1", AccountRole::Maintenance).await?;

    let (_, token) = env
        .auth
        .login(&LoginCredentials {
            username: "mnt1".to_string(),
            password: "hunter22".to_string(),
        })
        .await?;

    let resolved = env.auth.authenticate(&token.access_token).await?;
    assert_eq!(resolved.id, target.id);

    // Deactivating the account turns a still-valid token into Inactive
    env.accounts
        .toggle_active(&admin, &target.id.to_string())
        .await?;
    let err = env.auth.authenticate(&token.access_token).await.unwrap_err();
    assert!(matches!(kind(&err), Error::Inactive(_)));

    let err = env.auth.authenticate("not-a-token").await.unwrap_err();
    assert!(matches!(kind(&err), Error::Unauthenticated(_)));

    Ok(())
}

#[tokio::test]
async fn test_issue_create_fetch_round_trip() -> Result<()> {
    let env = test_env();
    let admin = register(&env, "admin", AccountRole::Admin).await?;
    let officer = register(&env, "officer", AccountRole::SafetyOfficer).await?;
    create_machine(&env, &admin, "M-1").await?;

    let created = env
        .issues
        .create(
            &officer,
            new_issue("M-1", "Guard rail loose"),
            vec![photo("evidence.jpg")],
        )
        .await?;

    assert_eq!(created.status, IssueStatus::Open);
    assert_eq!(created.reported_by, officer.id);
    assert_eq!(created.photos.len(), 1);
    assert!(created.resolved_at.is_none());

    let fetched = env.issues.get(&officer, &created.id.to_string()).await?;
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.title, created.title);
    assert_eq!(fetched.machine_code, created.machine_code);
    assert_eq!(fetched.priority, created.priority);
    assert_eq!(fetched.photos, created.photos);

    Ok(())
}

#[tokio::test]
async fn test_issue_create_against_unknown_machine() -> Result<()> {
    let env = test_env();
    let officer = register(&env, "officer", AccountRole::SafetyOfficer).await?;

    let err = env
        .issues
        .create(&officer, new_issue("NO-SUCH", "Phantom"), vec![])
        .await
        .unwrap_err();
    assert!(matches!(kind(&err), Error::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn test_upload_failure_aborts_issue_creation() -> Result<()> {
    let env = test_env_with_blobs(MemoryBlobStore::failing_on("broken"));
    let admin = register(&env, "admin", AccountRole::Admin).await?;
    let officer = register(&env, "officer", AccountRole::SafetyOfficer).await?;
    create_machine(&env, &admin, "M-1").await?;

    let err = env
        .issues
        .create(
            &officer,
            new_issue("M-1", "Guard rail loose"),
            vec![photo("first.jpg"), photo("broken.jpg")],
        )
        .await
        .unwrap_err();
    assert!(matches!(kind(&err), Error::Dependency(_)));

    // The blob saved before the failure was cleaned up, and no issue
    // was inserted
    assert_eq!(env.blobs.saved().len(), 1);
    assert_eq!(env.blobs.deleted(), env.blobs.saved());
    let all = env.issues.list(&admin, &IssueFilter::default()).await?;
    assert!(all.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_full_workflow_scenario() -> Result<()> {
    let env = test_env();
    let admin = register(&env, "admin", AccountRole::Admin).await?;
    let officer = register(&env, "officer", AccountRole::SafetyOfficer).await?;
    let mnt1 = register(&env, "mnt1", AccountRole::Maintenance).await?;
    let mnt2 = register(&env, "mnt2", AccountRole::Maintenance).await?;
    create_machine(&env, &admin, "M-1").await?;

    let issue = env
        .issues
        .create(&officer, new_issue("M-1", "Hydraulic leak"), vec![])
        .await?;
    assert_eq!(issue.status, IssueStatus::Open);
    assert_eq!(issue.reported_by, officer.id);
    let id = issue.id.to_string();

    // Admin assigns to mnt1
    let issue = env.issues.assign(&admin, &id, &mnt1.id.to_string()).await?;
    assert_eq!(issue.status, IssueStatus::Assigned);
    assert_eq!(issue.assigned_to, Some(mnt1.id));

    // A different maintenance account cannot start the work
    let err = env
        .issues
        .set_status(&mnt2, &id, IssueStatus::InProgress)
        .await
        .unwrap_err();
    assert!(matches!(kind(&err), Error::Forbidden(_)));

    // The assignee can
    let issue = env
        .issues
        .set_status(&mnt1, &id, IssueStatus::InProgress)
        .await?;
    assert_eq!(issue.status, IssueStatus::InProgress);

    // Assignee resolves with notes
    let issue = env
        .issues
        .resolve(&mnt1, &id, "Replaced the hose", vec![photo("after.jpg")])
        .await?;
    assert_eq!(issue.status, IssueStatus::Resolved);
    assert_eq!(issue.resolution_notes.as_deref(), Some("Replaced the hose"));
    let resolved_at = issue.resolved_at.expect("resolved_at stamped");

    // Admin closes; resolved_at is preserved
    let issue = env.issues.close(&admin, &id).await?;
    assert_eq!(issue.status, IssueStatus::Closed);
    assert_eq!(issue.resolved_at, Some(resolved_at));

    // Any further resolve attempt conflicts
    let err = env
        .issues
        .resolve(&mnt1, &id, "again", vec![])
        .await
        .unwrap_err();
    assert!(matches!(kind(&err), Error::Conflict(_)));

    Ok(())
}

#[tokio::test]
async fn test_resolve_requires_assignee() -> Result<()> {
    let env = test_env();
    let admin = register(&env, "admin", AccountRole::Admin).await?;
    let officer = register(&env, "officer", AccountRole::SafetyOfficer).await?;
    let mnt1 = register(&env, "mnt1", AccountRole::Maintenance).await?;
    let mnt2 = register(&env, "mnt2", AccountRole::Maintenance).await?;
    create_machine(&env, &admin, "M-1").await?;

    let issue = env
        .issues
        .create(&officer, new_issue("M-1", "Belt worn"), vec![])
        .await?;
    let id = issue.id.to_string();
    env.issues.assign(&admin, &id, &mnt1.id.to_string()).await?;

    let err = env
        .issues
        .resolve(&mnt2, &id, "not mine", vec![])
        .await
        .unwrap_err();
    assert!(matches!(kind(&err), Error::Forbidden(_)));

    Ok(())
}

#[tokio::test]
async fn test_close_requires_resolved_status() -> Result<()> {
    let env = test_env();
    let admin = register(&env, "admin", AccountRole::Admin).await?;
    let officer = register(&env, "officer", AccountRole::SafetyOfficer).await?;
    create_machine(&env, &admin, "M-1").await?;

    let issue = env
        .issues
        .create(&officer, new_issue("M-1", "Belt worn"), vec![])
        .await?;

    let err = env
        .issues
        .close(&admin, &issue.id.to_string())
        .await
        .unwrap_err();
    assert!(matches!(kind(&err), Error::Conflict(_)));

    Ok(())
}

#[tokio::test]
async fn test_set_status_cannot_reach_resolved() -> Result<()> {
    let env = test_env();
    let admin = register(&env, "admin", AccountRole::Admin).await?;
    let officer = register(&env, "officer", AccountRole::SafetyOfficer).await?;
    let mnt1 = register(&env, "mnt1", AccountRole::Maintenance).await?;
    create_machine(&env, &admin, "M-1").await?;

    let issue = env
        .issues
        .create(&officer, new_issue("M-1", "Belt worn"), vec![])
        .await?;
    let id = issue.id.to_string();
    env.issues.assign(&admin, &id, &mnt1.id.to_string()).await?;

    // resolved is only reachable through resolve(), so resolved_at can
    // never be skipped
    let err = env
        .issues
        .set_status(&mnt1, &id, IssueStatus::Resolved)
        .await
        .unwrap_err();
    assert!(matches!(kind(&err), Error::Conflict(_)));

    Ok(())
}

#[tokio::test]
async fn test_reassignment_resets_to_assigned() -> Result<()> {
    let env = test_env();
    let admin = register(&env, "admin", AccountRole::Admin).await?;
    let officer = register(&env, "officer", AccountRole::SafetyOfficer).await?;
    let mnt1 = register(&env, "mnt1", AccountRole::Maintenance).await?;
    let mnt2 = register(&env, "mnt2", AccountRole::Maintenance).await?;
    create_machine(&env, &admin, "M-1").await?;

    let issue = env
        .issues
        .create(&officer, new_issue("M-1", "Belt worn"), vec![])
        .await?;
    let id = issue.id.to_string();

    env.issues.assign(&admin, &id, &mnt1.id.to_string()).await?;
    env.issues
        .set_status(&mnt1, &id, IssueStatus::InProgress)
        .await?;

    let issue = env.issues.assign(&admin, &id, &mnt2.id.to_string()).await?;
    assert_eq!(issue.status, IssueStatus::Assigned);
    assert_eq!(issue.assigned_to, Some(mnt2.id));

    Ok(())
}

#[tokio::test]
async fn test_assign_validates_the_assignee() -> Result<()> {
    let env = test_env();
    let admin = register(&env, "admin", AccountRole::Admin).await?;
    let officer = register(&env, "officer", AccountRole::SafetyOfficer).await?;
    let employee = register(&env, "emp1", AccountRole::Employee).await?;
    let mnt1 = register(&env, "mnt1", AccountRole::Maintenance).await?;
    create_machine(&env, &admin, "M-1").await?;

    let issue = env
        .issues
        .create(&officer, new_issue("M-1", "Belt worn"), vec![])
        .await?;
    let id = issue.id.to_string();

    let err = env
        .issues
        .assign(&admin, &id, &employee.id.to_string())
        .await
        .unwrap_err();
    assert!(matches!(kind(&err), Error::InvalidInput(_)));

    let err = env
        .issues
        .assign(&admin, &id, &uuid::Uuid::new_v4().to_string())
        .await
        .unwrap_err();
    assert!(matches!(kind(&err), Error::NotFound(_)));

    env.accounts
        .toggle_active(&admin, &mnt1.id.to_string())
        .await?;
    let err = env
        .issues
        .assign(&admin, &id, &mnt1.id.to_string())
        .await
        .unwrap_err();
    assert!(matches!(kind(&err), Error::InvalidInput(_)));

    Ok(())
}

#[tokio::test]
async fn test_machine_delete_guarded_by_open_issues() -> Result<()> {
    let env = test_env();
    let admin = register(&env, "admin", AccountRole::Admin).await?;
    let officer = register(&env, "officer", AccountRole::SafetyOfficer).await?;
    let mnt1 = register(&env, "mnt1", AccountRole::Maintenance).await?;
    let machine = create_machine(&env, &admin, "M-1").await?;
    let machine_id = machine.id.to_string();

    let issue = env
        .issues
        .create(&officer, new_issue("M-1", "Belt worn"), vec![])
        .await?;
    let issue_id = issue.id.to_string();

    let err = env.machines.delete(&admin, &machine_id).await.unwrap_err();
    assert!(matches!(kind(&err), Error::Conflict(_)));

    // Close out the issue, then deletion succeeds
    env.issues
        .assign(&admin, &issue_id, &mnt1.id.to_string())
        .await?;
    env.issues.resolve(&mnt1, &issue_id, "done", vec![]).await?;
    env.issues.close(&admin, &issue_id).await?;

    env.machines.delete(&admin, &machine_id).await?;
    let err = env.machines.get(&admin, &machine_id).await.unwrap_err();
    assert!(matches!(kind(&err), Error::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn test_employee_listing_is_narrowed() -> Result<()> {
    let env = test_env();
    let admin = register(&env, "admin", AccountRole::Admin).await?;
    let officer = register(&env, "officer", AccountRole::SafetyOfficer).await?;
    let employee = register(&env, "emp1", AccountRole::Employee).await?;
    create_machine(&env, &admin, "M-1").await?;

    let mine = env
        .issues
        .create(&employee, new_issue("M-1", "Mine"), vec![])
        .await?;
    for title in ["Other 1", "Other 2", "Other 3"] {
        env.issues
            .create(&officer, new_issue("M-1", title), vec![])
            .await?;
    }

    // Regardless of the filters supplied, an employee only sees issues
    // they reported
    let listed = env.issues.list(&employee, &IssueFilter::default()).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, mine.id);

    let filtered = env
        .issues
        .list(
            &employee,
            &IssueFilter {
                machine_code: Some("M-1".to_string()),
                ..IssueFilter::default()
            },
        )
        .await?;
    assert_eq!(filtered.len(), 1);

    let all = env.issues.list(&admin, &IssueFilter::default()).await?;
    assert_eq!(all.len(), 4);

    let reported = env.issues.list_reported(&employee).await?;
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0].id, mine.id);

    Ok(())
}

#[tokio::test]
async fn test_change_own_password() -> Result<()> {
    let env = test_env();
    let officer = register(&env, "officer", AccountRole::SafetyOfficer).await?;

    let err = env
        .auth
        .change_password(&officer.id, "wrong", "a_new_password")
        .await
        .unwrap_err();
    assert!(matches!(kind(&err), Error::Unauthenticated(_)));

    let err = env
        .auth
        .change_password(&officer.id, "hunter22", "short")
        .await
        .unwrap_err();
    assert!(matches!(kind(&err), Error::InvalidInput(_)));

    env.auth
        .change_password(&officer.id, "hunter22", "a_new_password")
        .await?;
    let ok = env
        .auth
        .login(&LoginCredentials {
            username: "officer".to_string(),
            password: "a_new_password".to_string(),
        })
        .await;
    assert!(ok.is_ok());

    Ok(())
}

#[tokio::test]
async fn test_maintenance_listing_is_narrowed() -> Result<()> {
    let env = test_env();
    let admin = register(&env, "admin", AccountRole::Admin).await?;
    let officer = register(&env, "officer", AccountRole::SafetyOfficer).await?;
    let mnt1 = register(&env, "mnt1", AccountRole::Maintenance).await?;
    let mnt2 = register(&env, "mnt2", AccountRole::Maintenance).await?;
    create_machine(&env, &admin, "M-1").await?;

    let a = env
        .issues
        .create(&officer, new_issue("M-1", "For mnt1"), vec![])
        .await?;
    let b = env
        .issues
        .create(&officer, new_issue("M-1", "For mnt2"), vec![])
        .await?;
    env.issues
        .assign(&admin, &a.id.to_string(), &mnt1.id.to_string())
        .await?;
    env.issues
        .assign(&admin, &b.id.to_string(), &mnt2.id.to_string())
        .await?;

    // Even asking for another assignee's issues returns only your own
    let listed = env
        .issues
        .list(
            &mnt1,
            &IssueFilter {
                assigned_to: Some(mnt2.id),
                ..IssueFilter::default()
            },
        )
        .await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, a.id);

    let assigned = env.issues.list_assigned(&mnt2).await?;
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].id, b.id);

    // The assigned listing is a maintenance-only view
    let err = env.issues.list_assigned(&officer).await.unwrap_err();
    assert!(matches!(kind(&err), Error::Forbidden(_)));

    Ok(())
}

#[tokio::test]
async fn test_not_found_is_reported_before_forbidden() -> Result<()> {
    let env = test_env();
    register(&env, "admin", AccountRole::Admin).await?;
    let employee = register(&env, "emp1", AccountRole::Employee).await?;

    // A malformed id fails as InvalidInput before anything else
    let err = env
        .machines
        .delete(&employee, "not-a-uuid")
        .await
        .unwrap_err();
    assert!(matches!(kind(&err), Error::InvalidInput(_)));

    // Existence is checked before role policy: a disallowed actor probing
    // a nonexistent machine learns it does not exist. This deliberately
    // trades information hiding for predictable errors.
    let err = env
        .machines
        .delete(&employee, &uuid::Uuid::new_v4().to_string())
        .await
        .unwrap_err();
    assert!(matches!(kind(&err), Error::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn test_account_delete_guards() -> Result<()> {
    let env = test_env();
    let admin = register(&env, "admin", AccountRole::Admin).await?;
    let officer = register(&env, "officer", AccountRole::SafetyOfficer).await?;
    let mnt1 = register(&env, "mnt1", AccountRole::Maintenance).await?;
    create_machine(&env, &admin, "M-1").await?;

    // Admins never remove their own acting account
    let err = env
        .accounts
        .delete(&admin, &admin.id.to_string())
        .await
        .unwrap_err();
    assert!(matches!(kind(&err), Error::Forbidden(_)));
    let err = env
        .accounts
        .toggle_active(&admin, &admin.id.to_string())
        .await
        .unwrap_err();
    assert!(matches!(kind(&err), Error::Forbidden(_)));

    // Open work blocks deletion of the assignee
    let issue = env
        .issues
        .create(&officer, new_issue("M-1", "Belt worn"), vec![])
        .await?;
    let issue_id = issue.id.to_string();
    env.issues
        .assign(&admin, &issue_id, &mnt1.id.to_string())
        .await?;

    let err = env
        .accounts
        .delete(&admin, &mnt1.id.to_string())
        .await
        .unwrap_err();
    assert!(matches!(kind(&err), Error::Conflict(_)));

    env.issues.resolve(&mnt1, &issue_id, "done", vec![]).await?;
    env.issues.close(&admin, &issue_id).await?;
    env.accounts.delete(&admin, &mnt1.id.to_string()).await?;

    Ok(())
}

#[tokio::test]
async fn test_duplicate_keys_conflict() -> Result<()> {
    let env = test_env();
    let admin = register(&env, "admin", AccountRole::Admin).await?;
    create_machine(&env, &admin, "M-1").await?;

    let err = create_machine(&env, &admin, "M-1").await.unwrap_err();
    assert!(matches!(kind(&err), Error::Conflict(_)));

    let err = register(&env, "admin", AccountRole::Employee)
        .await
        .unwrap_err();
    assert!(matches!(kind(&err), Error::Conflict(_)));

    Ok(())
}

#[tokio::test]
async fn test_machine_status_update_refreshes_maintenance_stamp() -> Result<()> {
    let env = test_env();
    let admin = register(&env, "admin", AccountRole::Admin).await?;
    let mnt1 = register(&env, "mnt1", AccountRole::Maintenance).await?;
    let machine = create_machine(&env, &admin, "M-1").await?;
    let id = machine.id.to_string();

    let updated = env
        .machines
        .update_status(&mnt1, &id, MachineStatus::OutOfOrder)
        .await?;
    assert_eq!(updated.status, MachineStatus::OutOfOrder);
    assert!(updated.last_maintenance.is_none());

    let updated = env
        .machines
        .update_status(&mnt1, &id, MachineStatus::Operational)
        .await?;
    assert!(updated.last_maintenance.is_some());

    Ok(())
}

#[tokio::test]
async fn test_summary_statistics() -> Result<()> {
    let env = test_env();
    let admin = register(&env, "admin", AccountRole::Admin).await?;
    let officer = register(&env, "officer", AccountRole::SafetyOfficer).await?;
    register(&env, "mnt1", AccountRole::Maintenance).await?;
    register(&env, "mnt2", AccountRole::Maintenance).await?;

    create_machine(&env, &admin, "M-1").await?;
    let m2 = create_machine(&env, &admin, "M-2").await?;
    env.machines
        .update_status(&admin, &m2.id.to_string(), MachineStatus::OutOfOrder)
        .await?;

    let stats = env.machines.stats(&officer).await?;
    assert_eq!(stats.total, 2);
    assert_eq!(stats.needs_attention, 1);

    let stats = env.accounts.stats(&officer).await?;
    assert_eq!(stats.total, 4);
    assert_eq!(stats.total_active, 4);
    let maintenance = stats
        .by_role
        .iter()
        .find(|(role, _)| role == "maintenance")
        .map(|(_, count)| *count);
    assert_eq!(maintenance, Some(2));

    // Employees see neither summary
    let employee = register(&env, "emp1", AccountRole::Employee).await?;
    assert!(env.machines.stats(&employee).await.is_err());
    assert!(env.accounts.stats(&employee).await.is_err());

    Ok(())
}

#[tokio::test]
async fn test_account_listing_filters() -> Result<()> {
    let env = test_env();
    let admin = register(&env, "admin", AccountRole::Admin).await?;
    let officer = register(&env, "officer", AccountRole::SafetyOfficer).await?;
    register(&env, "mnt1", AccountRole::Maintenance).await?;

    let maintenance = env
        .accounts
        .list(
            &admin,
            &AccountFilter {
                role: Some(AccountRole::Maintenance),
                ..AccountFilter::default()
            },
        )
        .await?;
    assert_eq!(maintenance.len(), 1);

    // Safety officers may list by role but not run the full listing
    let by_role = env
        .accounts
        .list_by_role(&officer, AccountRole::Maintenance)
        .await?;
    assert_eq!(by_role.len(), 1);

    let err = env
        .accounts
        .list(&officer, &AccountFilter::default())
        .await
        .unwrap_err();
    assert!(matches!(kind(&err), Error::Forbidden(_)));

    Ok(())
}

use chrono::{NaiveDate, NaiveDateTime};

use super::error::LeaveError;
use super::service::LeaveService;
use super::validator::LeaveApplication;
use crate::model::employee::{EmployeePatch, NewEmployee};
use crate::model::leave_request::{LeaveStatus, Returned};
use crate::store::{LeaveStore, MemoryStore, StoreTx};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn at(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(9, 30, 0).expect("valid time")
}

fn new_employee(name: &str) -> NewEmployee {
    NewEmployee {
        name: name.to_string(),
        gender: "Female".to_string(),
        age: 34,
        position: "Accountant".to_string(),
        department: "Finance".to_string(),
        phone: "+923004445556".to_string(),
        email: format!("{}@company.com", name.to_lowercase()),
        status: "Active".to_string(),
    }
}

fn application(employee_id: u64, start: &str, end: &str) -> LeaveApplication {
    LeaveApplication {
        employee_id,
        start_date: start.to_string(),
        end_date: end.to_string(),
        reason: "Personal".to_string(),
    }
}

async fn service_with_employee() -> (LeaveService<MemoryStore>, MemoryStore, u64) {
    let store = MemoryStore::new();
    let service = LeaveService::new(store.clone());
    let created = service
        .add_employee(new_employee("Hina"))
        .await
        .expect("employee created");
    (service, store, created.employee.id)
}

#[actix_web::test]
async fn new_employee_starts_with_full_entitlement() {
    let (service, _, id) = service_with_employee().await;
    assert_eq!(service.get_balance(id).await.unwrap(), 20);
    assert_eq!(service.profile(id).await.unwrap().leave_balance, 20);
}

#[actix_web::test]
async fn add_employee_issues_a_working_credential() {
    let store = MemoryStore::new();
    let service = LeaveService::new(store.clone());
    let created = service.add_employee(new_employee("Hina")).await.unwrap();

    assert_eq!(created.credential.username, format!("user{}", created.employee.id));

    let credential = service
        .authenticate(&created.credential.username, &created.credential.password)
        .await
        .expect("issued password logs in");
    assert_eq!(credential.employee_id, created.employee.id);

    assert!(matches!(
        service
            .authenticate(&created.credential.username, "not-it")
            .await,
        Err(LeaveError::InvalidCredentials)
    ));
    assert!(matches!(
        service.authenticate("nobody", "x").await,
        Err(LeaveError::InvalidCredentials)
    ));
}

#[actix_web::test]
async fn full_lifecycle_scenario() {
    let (service, _, id) = service_with_employee().await;
    let applied = at(day(2023, 12, 20));

    let first = service
        .apply_leave(application(id, "2024-01-01", "2024-01-05"), applied)
        .await
        .unwrap();
    assert_eq!(first.leave_days, 5);
    assert_eq!(first.remaining_days, 15);
    assert_eq!(first.status, LeaveStatus::Pending);
    assert_eq!(first.returned, Returned::No);
    assert_eq!(first.applied_on, day(2023, 12, 20));
    assert_eq!(service.get_balance(id).await.unwrap(), 15);

    match service
        .apply_leave(application(id, "2024-02-01", "2024-02-20"), applied)
        .await
    {
        Err(LeaveError::InsufficientBalance {
            requested,
            available,
        }) => {
            assert_eq!(requested, 20);
            assert_eq!(available, 15);
        }
        other => panic!("expected insufficient balance, got {other:?}"),
    }
    assert_eq!(service.get_balance(id).await.unwrap(), 15);

    let approved = service.approve_leave(first.id).await.unwrap();
    assert_eq!(approved.status, LeaveStatus::Approved);
    assert_eq!(approved.returned, Returned::No);

    let today = day(2024, 1, 10);
    let overdue = service.list_overdue(today).await.unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].leave.id, first.id);

    let on_leave = service.list_on_leave().await.unwrap();
    assert_eq!(on_leave.len(), 1);

    let present = service.list_present(today).await.unwrap();
    assert!(present.iter().any(|p| p.employee.id == id));
}

#[actix_web::test]
async fn balance_is_deducted_in_sequence() {
    let (service, _, id) = service_with_employee().await;
    let now = at(day(2024, 1, 1));

    let a = service
        .apply_leave(application(id, "2024-03-01", "2024-03-03"), now)
        .await
        .unwrap();
    let b = service
        .apply_leave(application(id, "2024-04-01", "2024-04-10"), now)
        .await
        .unwrap();
    assert_eq!(a.remaining_days, 17);
    assert_eq!(b.remaining_days, 7);
    assert!(b.id > a.id);
    assert_eq!(service.get_balance(id).await.unwrap(), 7);
}

#[actix_web::test]
async fn rejecting_does_not_restore_balance() {
    let (service, _, id) = service_with_employee().await;
    let leave = service
        .apply_leave(application(id, "2024-01-01", "2024-01-04"), at(day(2023, 12, 1)))
        .await
        .unwrap();

    let rejected = service.reject_leave(leave.id).await.unwrap();
    assert_eq!(rejected.status, LeaveStatus::Rejected);
    assert_eq!(rejected.returned, Returned::Yes);
    assert_eq!(service.get_balance(id).await.unwrap(), 16);
}

#[actix_web::test]
async fn decided_requests_cannot_be_decided_again() {
    let (service, _, id) = service_with_employee().await;
    let leave = service
        .apply_leave(application(id, "2024-01-01", "2024-01-02"), at(day(2023, 12, 1)))
        .await
        .unwrap();
    service.approve_leave(leave.id).await.unwrap();

    for result in [
        service.reject_leave(leave.id).await,
        service.approve_leave(leave.id).await,
    ] {
        assert!(matches!(
            result,
            Err(LeaveError::InvalidStateTransition {
                current: LeaveStatus::Approved,
                ..
            })
        ));
    }

    let history = service.leave_history(id).await.unwrap();
    assert_eq!(history[0].status, LeaveStatus::Approved);
    assert_eq!(history[0].returned, Returned::No);
}

#[actix_web::test]
async fn deciding_an_unknown_request_is_not_found() {
    let (service, _, _) = service_with_employee().await;
    assert!(matches!(
        service.approve_leave(404).await,
        Err(LeaveError::LeaveNotFound(404))
    ));
}

#[actix_web::test]
async fn unknown_employee_cannot_apply() {
    let (service, _, id) = service_with_employee().await;
    assert!(matches!(
        service
            .apply_leave(application(id + 1, "2024-01-01", "2024-01-02"), at(day(2024, 1, 1)))
            .await,
        Err(LeaveError::EmployeeNotFound(_))
    ));
}

#[actix_web::test]
async fn employee_without_credential_cannot_apply() {
    let store = MemoryStore::new();
    let service = LeaveService::new(store.clone());

    let mut tx = store.begin().await.unwrap();
    let employee = tx.insert_employee(&new_employee("Orphan")).await.unwrap();
    tx.commit().await.unwrap();

    assert!(matches!(
        service
            .apply_leave(
                application(employee.id, "2024-01-01", "2024-01-02"),
                at(day(2024, 1, 1))
            )
            .await,
        Err(LeaveError::EmployeeNotFound(_))
    ));
}

#[actix_web::test]
async fn bad_dates_write_nothing() {
    let (service, _, id) = service_with_employee().await;
    let now = at(day(2024, 1, 1));

    assert!(matches!(
        service
            .apply_leave(application(id, "01/01/2024", "2024-01-02"), now)
            .await,
        Err(LeaveError::InvalidDateFormat(_))
    ));
    assert!(matches!(
        service
            .apply_leave(application(id, "2024-01-09", "2024-01-02"), now)
            .await,
        Err(LeaveError::InvalidDateRange { .. })
    ));
    assert!(service.leave_history(id).await.unwrap().is_empty());
    assert_eq!(service.get_balance(id).await.unwrap(), 20);
}

#[actix_web::test]
async fn failed_commit_rolls_back_the_application() {
    let (service, store, id) = service_with_employee().await;
    store.fail_commits(true);

    assert!(matches!(
        service
            .apply_leave(application(id, "2024-01-01", "2024-01-05"), at(day(2024, 1, 1)))
            .await,
        Err(LeaveError::StoreUnavailable(_))
    ));

    store.fail_commits(false);
    assert_eq!(service.get_balance(id).await.unwrap(), 20);
    assert!(service.leave_history(id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn history_is_most_recent_first() {
    let (service, _, id) = service_with_employee().await;
    let now = at(day(2024, 1, 1));
    for (start, end) in [("2024-05-01", "2024-05-01"), ("2024-02-01", "2024-02-02")] {
        service
            .apply_leave(application(id, start, end), now)
            .await
            .unwrap();
    }

    let history = service.leave_history(id).await.unwrap();
    let starts: Vec<NaiveDate> = history.iter().map(|l| l.start_date).collect();
    assert_eq!(starts, vec![day(2024, 2, 1), day(2024, 5, 1)]);

    let details = service.employee(id).await.unwrap();
    assert_eq!(details.leave_history, history);
}

#[actix_web::test]
async fn delete_cascades_and_balance_becomes_not_found() {
    let (service, store, id) = service_with_employee().await;
    let leave = service
        .apply_leave(application(id, "2024-01-01", "2024-01-05"), at(day(2023, 12, 20)))
        .await
        .unwrap();
    service.approve_leave(leave.id).await.unwrap();

    let deleted = service.delete_employee(id).await.unwrap();
    assert_eq!(deleted.id, id);

    assert!(matches!(
        service.get_balance(id).await,
        Err(LeaveError::EmployeeNotFound(_))
    ));

    let mut tx = store.begin().await.unwrap();
    assert!(tx.leaves_for(id).await.unwrap().is_empty());
    assert!(tx.credential(id).await.unwrap().is_none());
    assert!(tx.latest_ledger_entry(id).await.unwrap().is_none());
    drop(tx);

    assert!(matches!(
        service.delete_employee(id).await,
        Err(LeaveError::EmployeeNotFound(_))
    ));
}

#[actix_web::test]
async fn edit_applies_only_given_fields() {
    let (service, _, id) = service_with_employee().await;

    assert!(matches!(
        service.edit_employee(id, EmployeePatch::default()).await,
        Err(LeaveError::NoFieldsToUpdate)
    ));

    let updated = service
        .edit_employee(
            id,
            EmployeePatch {
                department: Some("Audit".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.department, "Audit");
    assert_eq!(updated.name, "Hina");

    assert!(matches!(
        service
            .edit_employee(
                id + 100,
                EmployeePatch {
                    age: Some(50),
                    ..Default::default()
                }
            )
            .await,
        Err(LeaveError::EmployeeNotFound(_))
    ));
}

#[actix_web::test]
async fn status_and_notification_follow_latest_request() {
    let (service, _, id) = service_with_employee().await;
    assert!(service.notification(id).await.unwrap().is_none());
    assert_eq!(service.leave_status(id).await.unwrap().remaining_days, 20);

    let leave = service
        .apply_leave(application(id, "2024-01-01", "2024-01-05"), at(day(2023, 12, 20)))
        .await
        .unwrap();
    service.approve_leave(leave.id).await.unwrap();

    let status = service.leave_status(id).await.unwrap();
    assert_eq!(status.status, Some(LeaveStatus::Approved));
    assert_eq!(status.remaining_days, 15);
    assert_eq!(status.expected_return, Some(day(2024, 1, 5)));

    let notice = service.notification(id).await.unwrap().unwrap();
    assert_eq!(notice.return_on, Some(day(2024, 1, 6)));
}

#[actix_web::test]
async fn pending_and_tally_reports_cover_all_employees() {
    let store = MemoryStore::new();
    let service = LeaveService::new(store);
    let a = service.add_employee(new_employee("Hina")).await.unwrap().employee.id;
    let b = service.add_employee(new_employee("Omar")).await.unwrap().employee.id;
    let now = at(day(2024, 1, 1));

    let first = service
        .apply_leave(application(a, "2024-02-01", "2024-02-02"), now)
        .await
        .unwrap();
    service
        .apply_leave(application(b, "2024-03-01", "2024-03-04"), now)
        .await
        .unwrap();
    service.approve_leave(first.id).await.unwrap();

    let pending = service.list_pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].employee.id, b);

    let tally = service.leave_tally().await.unwrap();
    assert_eq!(tally.rows.len(), 2);
    assert_eq!(tally.totals[0].total_days, 2);
    assert_eq!(tally.totals[1].total_days, 4);

    let named = service.list_all_leaves().await.unwrap();
    assert_eq!(named[1].employee_name, "Omar");
}

#[actix_web::test]
async fn concurrent_applies_cannot_both_spend_the_balance() {
    let (service, _, id) = service_with_employee().await;
    let now = at(day(2023, 12, 1));

    let (a, b) = futures::join!(
        service.apply_leave(application(id, "2024-01-01", "2024-01-15"), now),
        service.apply_leave(application(id, "2024-02-01", "2024-02-15"), now),
    );

    let (accepted, refused) = match (a, b) {
        (Ok(leave), Err(e)) | (Err(e), Ok(leave)) => (leave, e),
        (a, b) => panic!("expected exactly one admission, got {a:?} and {b:?}"),
    };
    assert_eq!(accepted.remaining_days, 5);
    assert!(matches!(
        refused,
        LeaveError::InsufficientBalance {
            requested: 15,
            available: 5
        }
    ));
    assert_eq!(service.get_balance(id).await.unwrap(), 5);
    assert_eq!(service.leave_history(id).await.unwrap().len(), 1);
}

use super::*;

fn user(id: i64) -> UserRecord {
    UserRecord {
        id: UserId(id),
        name: format!("user-{id}"),
        tel: "555-0100".to_string(),
        address: "1 Main St".to_string(),
        intro: "hello".to_string(),
    }
}

fn loaded(ids: &[i64]) -> ListController {
    let mut controller = ListController::new();
    controller.load_succeeded(ids.iter().map(|id| user(*id)).collect());
    controller
}

#[test]
fn starts_loading_and_replaces_rows_wholesale() {
    let mut controller = ListController::new();
    assert_eq!(controller.phase(), &ListPhase::Loading);

    controller.load_succeeded(vec![user(1), user(2)]);
    assert_eq!(controller.phase(), &ListPhase::Loaded);
    assert_eq!(controller.rows().len(), 2);

    controller.load_succeeded(vec![user(3)]);
    assert_eq!(controller.rows().len(), 1);
    assert_eq!(controller.rows()[0].id, UserId(3));
}

#[test]
fn load_failure_replaces_table_and_retry_reloads() {
    let mut controller = loaded(&[1, 2]);
    controller.load_failed("HTTP error! status: 502");

    assert_eq!(
        controller.phase(),
        &ListPhase::Failed("HTTP error! status: 502".to_string())
    );
    assert!(controller.rows().is_empty());

    controller.begin_load();
    assert_eq!(controller.phase(), &ListPhase::Loading);
}

#[test]
fn delete_goes_through_explicit_confirmation() {
    let mut controller = loaded(&[1, 2]);

    assert!(controller.request_delete(UserId(1)));
    assert_eq!(controller.row_action(UserId(1)), RowAction::PendingConfirmation);
    assert_eq!(controller.pending_delete(), Some(UserId(1)));

    assert!(controller.confirm_delete(UserId(1)));
    assert_eq!(controller.row_action(UserId(1)), RowAction::Deleting);
    assert_eq!(controller.pending_delete(), None);
}

#[test]
fn cancelling_confirmation_returns_row_to_idle() {
    let mut controller = loaded(&[1]);
    controller.request_delete(UserId(1));
    controller.cancel_delete(UserId(1));

    assert_eq!(controller.row_action(UserId(1)), RowAction::Idle);
    assert!(!controller.confirm_delete(UserId(1)));
}

#[test]
fn confirmed_delete_prunes_target_and_preserves_order() {
    let mut controller = loaded(&[1, 2, 3]);
    controller.request_delete(UserId(2));
    controller.confirm_delete(UserId(2));
    controller.delete_succeeded(UserId(2));

    assert_eq!(
        controller.rows().iter().map(|row| row.id).collect::<Vec<_>>(),
        vec![UserId(1), UserId(3)]
    );
}

#[test]
fn two_row_listing_after_deleting_first_holds_only_second() {
    let mut controller = loaded(&[1, 2]);
    controller.request_delete(UserId(1));
    controller.confirm_delete(UserId(1));
    controller.delete_succeeded(UserId(1));

    assert_eq!(
        controller.rows().iter().map(|row| row.id).collect::<Vec<_>>(),
        vec![UserId(2)]
    );
}

#[test]
fn failed_delete_leaves_rows_identical_and_row_interactive() {
    let mut controller = loaded(&[1, 2, 3]);
    let rows_before = controller.rows().to_vec();

    controller.request_delete(UserId(2));
    controller.confirm_delete(UserId(2));
    controller.delete_failed(UserId(2), "Failed to delete user. Please try again.");

    assert_eq!(controller.rows(), rows_before.as_slice());
    assert_eq!(controller.row_action(UserId(2)), RowAction::Idle);
    assert_eq!(
        controller.delete_error(),
        Some("Failed to delete user. Please try again.")
    );
    assert!(controller.request_delete(UserId(2)));
}

#[test]
fn other_rows_stay_interactive_while_one_delete_is_in_flight() {
    let mut controller = loaded(&[1, 2]);
    controller.request_delete(UserId(1));
    controller.confirm_delete(UserId(1));

    assert!(controller.request_delete(UserId(2)));
    assert_eq!(controller.row_action(UserId(1)), RowAction::Deleting);
    assert_eq!(controller.row_action(UserId(2)), RowAction::PendingConfirmation);
}

#[test]
fn request_delete_rejected_for_unknown_or_busy_rows() {
    let mut controller = loaded(&[1]);
    assert!(!controller.request_delete(UserId(9)));

    controller.request_delete(UserId(1));
    assert!(!controller.request_delete(UserId(1)));

    controller.confirm_delete(UserId(1));
    assert!(!controller.request_delete(UserId(1)));
}

/// Form and deletion flow tests
///
/// Drive the form session, view router and deletion confirmation against
/// a repository backed by the in-memory store.
/// Run with: cargo test --test flow_tests
use std::sync::Arc;

use villa_agent::dashboard::{
    DeletionFlow, DeletionState, FieldInput, FormMode, FormSession, Level, NumericField,
    TextField, View, ViewRouter,
};
use villa_agent::store::MemoryStore;
use villa_agent::{DashboardError, NewVilla, Villa, VillaRepository};

fn setup() -> (Arc<MemoryStore>, VillaRepository) {
    let store = Arc::new(MemoryStore::new());
    let repo = VillaRepository::new(store.clone());
    (store, repo)
}

async fn seed(repo: &VillaRepository, name: &str) -> Villa {
    let draft = NewVilla {
        name: name.to_string(),
        price: 750_000.0,
        commission: 75_000.0,
        facilities: vec!["Wi-Fi".to_string()],
        ..NewVilla::default()
    };
    repo.create(draft).await.unwrap()
}

#[tokio::test]
async fn test_create_form_submits_new_villa() {
    let (_store, repo) = setup();
    let mut form = FormSession::open(None);
    form.set_field(FieldInput::Text(TextField::Name, "Villa Sunset".to_string()));
    form.set_field(FieldInput::Numeric(NumericField::Price, "500000".to_string()));
    form.set_field(FieldInput::Numeric(NumericField::Commission, "50000".to_string()));
    form.toggle_facility("Private Pool");

    let submitted = form.submit(&repo).await.unwrap();

    assert_eq!(submitted.notification.level, Level::Success);
    assert_eq!(submitted.notification.message, "Villa added successfully!");
    assert_eq!(repo.villas()[0], submitted.villa);
    assert_eq!(submitted.villa.price, 500_000.0);
    assert_eq!(submitted.villa.facilities, vec!["Private Pool"]);
    assert!(submitted.villa.is_available);
}

#[tokio::test]
async fn test_edit_form_updates_existing_villa() {
    let (_store, repo) = setup();
    let villa = seed(&repo, "Villa Dawn").await;

    let mut form = FormSession::open(Some(&villa));
    form.set_field(FieldInput::Text(
        TextField::MarketingCaption,
        "Sunrise over the paddies".to_string(),
    ));
    form.set_field(FieldInput::Availability(false));
    let expected = form.draft().clone();

    let submitted = form.submit(&repo).await.unwrap();

    assert_eq!(submitted.notification.message, "Villa updated successfully!");
    assert_eq!(submitted.villa.id, villa.id);
    assert_eq!(repo.get(villa.id).unwrap().to_new(), expected);
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn test_edit_draft_does_not_leak_into_collection() {
    let (_store, repo) = setup();
    let villa = seed(&repo, "Villa Dawn").await;

    let mut form = FormSession::open(repo.get(villa.id).as_ref());
    form.toggle_facility("Gym");
    form.set_field(FieldInput::Text(TextField::Name, "Changed".to_string()));

    assert_eq!(repo.get(villa.id), Some(villa));
    form.discard();
}

#[tokio::test]
async fn test_rejected_submit_returns_session_intact() {
    let (store, repo) = setup();
    let mut form = FormSession::open(None);
    form.set_field(FieldInput::Text(TextField::Name, "Villa Sunset".to_string()));
    form.set_field(FieldInput::Text(TextField::OwnerPhone, "+62 812 3456".to_string()));
    let typed = form.draft().clone();

    store.fail_next("duplicate key value violates unique constraint").await;
    let rejected = form.submit(&repo).await.unwrap_err();

    assert!(matches!(rejected.error, DashboardError::WriteFailed(_)));
    assert_eq!(
        rejected.notification().message,
        "duplicate key value violates unique constraint"
    );
    assert_eq!(rejected.session.draft(), &typed);
    assert_eq!(rejected.session.mode(), FormMode::Create);
    assert!(repo.is_empty());

    // amend nothing, just retry
    let submitted = rejected.session.submit(&repo).await.unwrap();
    assert_eq!(submitted.villa.name, "Villa Sunset");
}

#[tokio::test]
async fn test_blank_name_is_validation_failure() {
    let (store, repo) = setup();
    let form = FormSession::open(None);

    let rejected = form.submit(&repo).await.unwrap_err();

    assert_eq!(
        rejected.error,
        DashboardError::ValidationFailed("name required".to_string())
    );
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn test_router_returns_to_list_after_submit() {
    let (_store, repo) = setup();
    let mut router = ViewRouter::new();
    router.show_create();
    router
        .form_mut()
        .unwrap()
        .set_field(FieldInput::Text(TextField::Name, "Villa Sunset".to_string()));

    let notification = router.submit(&repo).await.unwrap();

    assert_eq!(notification.level, Level::Success);
    assert_eq!(router.view(), View::List);
    assert!(router.form().is_none());
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn test_router_keeps_form_open_on_failure() {
    let (store, repo) = setup();
    let villa = seed(&repo, "Villa Dawn").await;
    let mut router = ViewRouter::new();
    router.show_edit(&villa);
    router
        .form_mut()
        .unwrap()
        .set_field(FieldInput::Numeric(NumericField::Price, "900000".to_string()));

    store.fail_next("network unreachable").await;
    let notification = router.submit(&repo).await.unwrap();

    assert!(notification.is_error());
    assert_eq!(router.view(), View::Edit);
    assert_eq!(router.form().unwrap().draft().price, 900_000.0);
    assert_eq!(repo.get(villa.id).unwrap().price, 750_000.0);
}

#[tokio::test]
async fn test_second_request_supersedes_first() {
    let (_store, repo) = setup();
    let a = seed(&repo, "Villa A").await;
    let b = seed(&repo, "Villa B").await;
    let mut flow = DeletionFlow::new();

    flow.request(&a);
    flow.request(&b);

    assert_eq!(flow.pending(), Some(b.id));
    assert_eq!(flow.state(), DeletionState::AwaitingConfirmation(b.id));

    flow.confirm(&repo).await.unwrap();
    assert!(repo.get(a.id).is_some());
    assert!(repo.get(b.id).is_none());
}

#[tokio::test]
async fn test_confirm_removes_and_returns_to_idle() {
    let (_store, repo) = setup();
    let villa = seed(&repo, "Villa Sunset").await;
    let mut flow = DeletionFlow::new();
    flow.request(&villa);

    assert_eq!(
        flow.prompt(&repo).unwrap(),
        "Are you sure you want to delete \"Villa Sunset\"? This action cannot be undone."
    );

    let notification = flow.confirm(&repo).await.unwrap();

    assert_eq!(notification.level, Level::Success);
    assert_eq!(notification.message, "Villa Sunset deleted successfully.");
    assert_eq!(flow.state(), DeletionState::Idle);
    assert!(repo.is_empty());
    assert_eq!(repo.aggregates().total, 0);
}

#[tokio::test]
async fn test_failed_confirm_still_returns_to_idle() {
    let (store, repo) = setup();
    let villa = seed(&repo, "Villa Sunset").await;
    let mut flow = DeletionFlow::new();
    flow.request(&villa);

    store.fail_next("row level security").await;
    let notification = flow.confirm(&repo).await.unwrap();

    assert!(notification.is_error());
    assert_eq!(notification.message, "Failed to delete Villa Sunset.");
    assert_eq!(flow.state(), DeletionState::Idle);
    assert_eq!(repo.get(villa.id), Some(villa));

    // nothing is retried behind the operator's back
    assert!(flow.confirm(&repo).await.is_none());
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn test_cancel_has_no_side_effect() {
    let (_store, repo) = setup();
    let villa = seed(&repo, "Villa Sunset").await;
    let mut flow = DeletionFlow::new();

    flow.request(&villa);
    flow.cancel();

    assert_eq!(flow.state(), DeletionState::Idle);
    assert_eq!(repo.len(), 1);
    assert!(flow.prompt(&repo).is_none());
}

#[tokio::test]
async fn test_confirm_re_resolves_target() {
    let (store, repo) = setup();
    let villa = seed(&repo, "Villa Sunset").await;
    let mut flow = DeletionFlow::new();
    flow.request(&villa);

    // the record disappears underneath the pending request
    repo.remove(villa.id).await.unwrap();
    let notification = flow.confirm(&repo).await.unwrap();

    assert!(notification.is_error());
    assert_eq!(flow.state(), DeletionState::Idle);
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn test_flow_is_reusable() {
    let (_store, repo) = setup();
    let mut flow = DeletionFlow::new();
    for i in 0..3 {
        let villa = seed(&repo, &format!("Villa {}", i)).await;
        flow.request(&villa);
        flow.confirm(&repo).await.unwrap();
        assert_eq!(flow.state(), DeletionState::Idle);
    }
    assert!(repo.is_empty());
}

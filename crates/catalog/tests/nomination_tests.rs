//! Nomination pipeline tests: approval, storage creation, and the
//! status transition choke point.

mod common;

use common::{fixtures, Harness};
use curator_catalog::{CatalogError, StorageRequest};
use curator_core::{ContainerAttachment, NominationId, NominationStatus};
use curator_storage::ObjectStore;

#[tokio::test]
async fn test_missing_nomination_is_not_found() {
    let h = Harness::new();
    let err = h
        .nominations
        .approve(NominationId::new(), &fixtures::curator(), &h.cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}

#[tokio::test]
async fn test_approve_without_storage_waits_in_approved() {
    let h = Harness::new();
    let nomination = fixtures::pending_nomination();
    h.metadata.seed_nomination(&nomination);

    let approved = h
        .nominations
        .approve(nomination.id, &fixtures::curator(), &h.cancel)
        .await
        .unwrap();
    assert_eq!(approved.status, NominationStatus::Approved);
    assert_eq!(approved.modified_by.as_deref(), Some("casey@example.org"));
}

#[tokio::test]
async fn test_approve_with_existing_storage_skips_to_uploading() {
    let h = Harness::new();
    h.store
        .create_container(fixtures::ACCOUNT, "rivergauges")
        .await
        .unwrap();

    let mut nomination = fixtures::pending_nomination();
    nomination.attachment = Some(ContainerAttachment::new(
        fixtures::ACCOUNT,
        "rivergauges",
        "https://testaccount.store.invalid/rivergauges",
    ));
    h.metadata.seed_nomination(&nomination);

    let approved = h
        .nominations
        .approve(nomination.id, &fixtures::curator(), &h.cancel)
        .await
        .unwrap();
    assert_eq!(approved.status, NominationStatus::Uploading);
}

#[tokio::test]
async fn test_approve_with_attached_but_missing_container() {
    let h = Harness::new();
    let mut nomination = fixtures::pending_nomination();
    nomination.attachment = Some(ContainerAttachment::new(
        fixtures::ACCOUNT,
        "rivergauges",
        "https://testaccount.store.invalid/rivergauges",
    ));
    h.metadata.seed_nomination(&nomination);

    // The attachment points nowhere yet, so approval cannot skip ahead.
    let approved = h
        .nominations
        .approve(nomination.id, &fixtures::curator(), &h.cancel)
        .await
        .unwrap();
    assert_eq!(approved.status, NominationStatus::Approved);
}

#[tokio::test]
async fn test_approve_rejects_unsupported_storage_type() {
    let h = Harness::new();
    let mut nomination = fixtures::pending_nomination();
    let mut attachment = ContainerAttachment::new(
        fixtures::ACCOUNT,
        "rivergauges",
        "https://testaccount.store.invalid/rivergauges",
    );
    attachment.storage_type = "table".to_string();
    nomination.attachment = Some(attachment);
    h.metadata.seed_nomination(&nomination);

    let err = h
        .nominations
        .approve(nomination.id, &fixtures::curator(), &h.cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::StorageInconsistency(_)));
}

#[tokio::test]
async fn test_approve_twice_is_already_processed() {
    let h = Harness::new();
    let nomination = fixtures::pending_nomination();
    h.metadata.seed_nomination(&nomination);
    let casey = fixtures::curator();

    h.nominations
        .approve(nomination.id, &casey, &h.cancel)
        .await
        .unwrap();
    let err = h
        .nominations
        .approve(nomination.id, &casey, &h.cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::AlreadyProcessed(_)));
}

#[tokio::test]
async fn test_reject_is_always_legal() {
    let h = Harness::new();
    let mut nomination = fixtures::pending_nomination();
    nomination.status = NominationStatus::Uploading;
    h.metadata.seed_nomination(&nomination);

    let rejected = h
        .nominations
        .reject(nomination.id, &fixtures::curator(), &h.cancel)
        .await
        .unwrap();
    assert_eq!(rejected.status, NominationStatus::Rejected);
}

#[tokio::test]
async fn test_create_storage_attaches_container() {
    let h = Harness::new();
    let nomination = fixtures::pending_nomination();
    h.metadata.seed_nomination(&nomination);
    let casey = fixtures::curator();

    h.nominations
        .approve(nomination.id, &casey, &h.cancel)
        .await
        .unwrap();
    let uploaded = h
        .nominations
        .create_storage(
            StorageRequest {
                nomination_id: nomination.id,
                dataset_name: nomination.name.clone(),
            },
            &casey,
            &h.cancel,
        )
        .await
        .unwrap();

    assert_eq!(uploaded.status, NominationStatus::Uploading);
    let attachment = uploaded.attachment.expect("attachment set");
    assert_eq!(attachment.account, fixtures::ACCOUNT);
    assert_eq!(attachment.container, "rivergauges");
    assert!(attachment.validate_storage_type().is_ok());
    assert!(attachment.media_link.contains("rivergauges"));
    assert!(h
        .store
        .container_exists(&attachment.account, &attachment.container)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_create_storage_disambiguates_taken_names() {
    let h = Harness::new();
    h.store
        .create_container(fixtures::ACCOUNT, "rivergauges")
        .await
        .unwrap();

    let nomination = fixtures::pending_nomination();
    h.metadata.seed_nomination(&nomination);
    let casey = fixtures::curator();

    let uploaded = h
        .nominations
        .create_storage(
            StorageRequest {
                nomination_id: nomination.id,
                dataset_name: nomination.name.clone(),
            },
            &casey,
            &h.cancel,
        )
        .await
        .unwrap();
    assert_eq!(
        uploaded.attachment.expect("attachment set").container,
        "rivergauges-2"
    );
}

#[tokio::test]
async fn test_create_storage_refuses_midstream_nominations() {
    let h = Harness::new();
    let mut nomination = fixtures::pending_nomination();
    nomination.status = NominationStatus::Importing;
    h.metadata.seed_nomination(&nomination);

    let err = h
        .nominations
        .create_storage(
            StorageRequest {
                nomination_id: nomination.id,
                dataset_name: nomination.name.clone(),
            },
            &fixtures::curator(),
            &h.cancel,
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogError::InvalidTransition {
            from: NominationStatus::Importing,
            to: NominationStatus::Uploading,
        }
    ));
    // No container was allocated for the refused request.
    assert!(h.store.container_names(fixtures::ACCOUNT).is_empty());
}

#[tokio::test]
async fn test_update_status_enforces_pipeline_order() {
    let h = Harness::new();
    let casey = fixtures::curator();

    let mut uploading = fixtures::pending_nomination();
    uploading.status = NominationStatus::Uploading;
    h.metadata.seed_nomination(&uploading);

    let n = h
        .nominations
        .update_status(uploading.id, NominationStatus::Importing, &casey, &h.cancel)
        .await
        .unwrap();
    assert_eq!(n.status, NominationStatus::Importing);

    let n = h
        .nominations
        .update_status(uploading.id, NominationStatus::Complete, &casey, &h.cancel)
        .await
        .unwrap();
    assert_eq!(n.status, NominationStatus::Complete);
}

#[tokio::test]
async fn test_update_status_allows_retry_after_error() {
    let h = Harness::new();
    let casey = fixtures::curator();

    let mut errored = fixtures::pending_nomination();
    errored.status = NominationStatus::Error;
    h.metadata.seed_nomination(&errored);

    // A re-run import that succeeds completes straight from Error.
    let n = h
        .nominations
        .update_status(errored.id, NominationStatus::Complete, &casey, &h.cancel)
        .await
        .unwrap();
    assert_eq!(n.status, NominationStatus::Complete);
}

#[tokio::test]
async fn test_update_status_rejects_skipped_stages() {
    let h = Harness::new();
    let nomination = fixtures::pending_nomination();
    h.metadata.seed_nomination(&nomination);

    let err = h
        .nominations
        .update_status(
            nomination.id,
            NominationStatus::Complete,
            &fixtures::curator(),
            &h.cancel,
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogError::InvalidTransition {
            from: NominationStatus::PendingApproval,
            to: NominationStatus::Complete,
        }
    ));

    // The record is untouched after a refused transition.
    let kept = h.nominations.pending(&h.cancel).await.unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].id, nomination.id);
}

#[tokio::test]
async fn test_pending_lists_only_awaiting_review() {
    let h = Harness::new();
    let casey = fixtures::curator();

    let first = fixtures::pending_nomination();
    let second = fixtures::pending_nomination();
    h.metadata.seed_nomination(&first);
    h.metadata.seed_nomination(&second);
    h.nominations
        .approve(first.id, &casey, &h.cancel)
        .await
        .unwrap();

    let pending = h.nominations.pending(&h.cancel).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, second.id);
}

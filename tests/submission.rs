mod common;

use std::collections::HashMap;

use anyhow::Result;
use serde_json::json;

use badgr_cli::api::{ApiOutcome, CollectionKey, CollectionStore, HttpMethod};
use badgr_cli::forms::{
    ActionState, FieldValue, FormChange, FormStore, GENERIC_FAILURE_MESSAGE, ImageSource,
    SubmissionController, SubmitOutcome,
};
use badgr_cli::forms::submit::apply_outcome;
use badgr_cli::panels::catalog;

use common::FakeTransport;

fn text_values(pairs: &[(&str, &str)]) -> HashMap<String, FieldValue> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), FieldValue::text(*v)))
        .collect()
}

#[tokio::test]
async fn test_badge_class_creation_round_trip() -> Result<()> {
    let config = catalog::badge_class_create("chess-club");
    let mut forms = FormStore::new();
    let mut collections = CollectionStore::new();
    let controller = SubmissionController::new(FakeTransport::scripted(vec![
        ApiOutcome::Success {
            status: 201,
            record: json!({"slug": "grandmaster", "name": "Grandmaster"}),
        },
    ]));

    forms.get_or_init(&config.form_id, config.initial_values());
    forms.patch(
        &config.form_id,
        text_values(&[
            ("name", "Grandmaster"),
            ("description", "Awarded for winning the club championship"),
            ("criteria", "Win the yearly championship"),
        ]),
    )?;

    let outcome = controller
        .submit(&config, &mut forms, &mut collections)
        .await?;

    assert_eq!(outcome, SubmitOutcome::Completed);
    let state = forms.get(&config.form_id).unwrap();
    assert_eq!(state.action_state, ActionState::Complete);
    assert_eq!(state.message, "New badge class created");
    assert_eq!(state.result.as_ref().unwrap()["slug"], "grandmaster");
    assert_eq!(collections.len(CollectionKey::IssuerBadgeClasses), 1);

    let requests = controller.transport().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(requests[0].url, "/v1/issuer/issuers/chess-club/badges");
    assert!(
        requests[0]
            .fields
            .contains(&("name".to_string(), "Grandmaster".to_string()))
    );
    Ok(())
}

#[tokio::test]
async fn test_missing_required_field_blocks_the_network_call() -> Result<()> {
    let config = catalog::badge_class_create("chess-club");
    let mut forms = FormStore::new();
    let mut collections = CollectionStore::new();
    let controller = SubmissionController::new(FakeTransport::unreachable());

    forms.get_or_init(&config.form_id, config.initial_values());
    forms.patch(
        &config.form_id,
        text_values(&[
            ("name", ""),
            ("description", "desc"),
            ("criteria", "criteria"),
        ]),
    )?;

    let outcome = controller
        .submit(&config, &mut forms, &mut collections)
        .await?;

    assert_eq!(
        outcome,
        SubmitOutcome::Invalid {
            missing: vec!["Badge Name".to_string()]
        }
    );
    let state = forms.get(&config.form_id).unwrap();
    assert_eq!(state.action_state, ActionState::Error);
    assert_eq!(state.message, "Missing required fields: Badge Name");
    assert_eq!(controller.transport().call_count(), 0);
    assert_eq!(collections.len(CollectionKey::IssuerBadgeClasses), 0);
    Ok(())
}

#[tokio::test]
async fn test_server_error_without_body_falls_back_to_generic_text() -> Result<()> {
    let config = catalog::issuer_create();
    let mut forms = FormStore::new();
    let mut collections = CollectionStore::new();
    let controller = SubmissionController::new(FakeTransport::scripted(vec![
        ApiOutcome::Rejected {
            status: 500,
            detail: None,
        },
    ]));

    forms.get_or_init(&config.form_id, config.initial_values());
    forms.patch(
        &config.form_id,
        text_values(&[
            ("name", "Chess Club"),
            ("description", "A club"),
            ("url", "https://chess.example.org"),
            ("email", "club@example.org"),
        ]),
    )?;

    let outcome = controller
        .submit(&config, &mut forms, &mut collections)
        .await?;

    assert_eq!(
        outcome,
        SubmitOutcome::Rejected {
            message: GENERIC_FAILURE_MESSAGE.to_string()
        }
    );
    let state = forms.get(&config.form_id).unwrap();
    assert_eq!(state.action_state, ActionState::Error);
    assert_eq!(state.message, GENERIC_FAILURE_MESSAGE);
    assert_eq!(collections.len(CollectionKey::IssuerIssuers), 0);
    Ok(())
}

#[tokio::test]
async fn test_server_rejection_surfaces_its_own_message() -> Result<()> {
    let config = catalog::issuer_notification();
    let mut forms = FormStore::new();
    let mut collections = CollectionStore::new();
    let controller = SubmissionController::new(FakeTransport::scripted(vec![
        ApiOutcome::Rejected {
            status: 404,
            detail: Some("No badge found at that URL".to_string()),
        },
    ]));

    forms.get_or_init(&config.form_id, config.initial_values());
    forms.patch(
        &config.form_id,
        text_values(&[("email", "earner@example.org"), ("url", "https://x")]),
    )?;

    controller
        .submit(&config, &mut forms, &mut collections)
        .await?;

    assert_eq!(
        forms.get(&config.form_id).unwrap().message,
        "No badge found at that URL"
    );
    Ok(())
}

#[tokio::test]
async fn test_unparsable_success_body_is_an_error_not_a_complete() -> Result<()> {
    let config = catalog::issuer_notification();
    let mut forms = FormStore::new();
    let mut collections = CollectionStore::new();
    let controller =
        SubmissionController::new(FakeTransport::scripted(vec![ApiOutcome::Unparsable {
            status: 200,
        }]));

    forms.get_or_init(&config.form_id, config.initial_values());
    forms.patch(
        &config.form_id,
        text_values(&[("email", "earner@example.org"), ("url", "https://x")]),
    )?;

    let outcome = controller
        .submit(&config, &mut forms, &mut collections)
        .await?;

    assert_eq!(
        outcome,
        SubmitOutcome::Rejected {
            message: GENERIC_FAILURE_MESSAGE.to_string()
        }
    );
    let state = forms.get(&config.form_id).unwrap();
    assert_eq!(state.action_state, ActionState::Error);
    assert!(state.result.is_none());
    assert_eq!(collections.len(CollectionKey::EarnerNotifications), 0);
    Ok(())
}

#[tokio::test]
async fn test_transport_failure_is_retryable_after_reset() -> Result<()> {
    let config = catalog::issuer_notification();
    let mut forms = FormStore::new();
    let mut collections = CollectionStore::new();
    let controller = SubmissionController::new(FakeTransport::scripted(vec![
        ApiOutcome::TransportFailed {
            detail: "connection refused".to_string(),
        },
        ApiOutcome::Success {
            status: 201,
            record: json!({"slug": "n1"}),
        },
    ]));

    forms.get_or_init(&config.form_id, config.initial_values());
    forms.patch(
        &config.form_id,
        text_values(&[("email", "earner@example.org"), ("url", "https://x")]),
    )?;

    let first = controller
        .submit(&config, &mut forms, &mut collections)
        .await?;
    assert_eq!(
        first,
        SubmitOutcome::Rejected {
            message: GENERIC_FAILURE_MESSAGE.to_string()
        }
    );

    // Terminal states require an explicit reset before resubmitting.
    let values = forms.get(&config.form_id).unwrap().values.clone();
    forms.reset(&config.form_id, values);
    let second = controller
        .submit(&config, &mut forms, &mut collections)
        .await?;

    assert_eq!(second, SubmitOutcome::Completed);
    assert_eq!(controller.transport().call_count(), 2);
    assert_eq!(collections.len(CollectionKey::EarnerNotifications), 1);
    Ok(())
}

#[tokio::test]
async fn test_submit_while_waiting_is_ignored_without_network() -> Result<()> {
    let config = catalog::issuer_notification();
    let mut forms = FormStore::new();
    let mut collections = CollectionStore::new();
    let controller = SubmissionController::new(FakeTransport::unreachable());

    forms.get_or_init(&config.form_id, config.initial_values());
    forms.patch(
        &config.form_id,
        text_values(&[("email", "earner@example.org"), ("url", "https://x")]),
    )?;
    forms.begin_submission(&config.form_id)?;

    let outcome = controller
        .submit(&config, &mut forms, &mut collections)
        .await?;

    assert_eq!(outcome, SubmitOutcome::AlreadyInFlight);
    assert_eq!(controller.transport().call_count(), 0);
    assert_eq!(
        forms.get(&config.form_id).unwrap().action_state,
        ActionState::Waiting
    );
    Ok(())
}

#[tokio::test]
async fn test_late_completion_after_close_is_a_noop() -> Result<()> {
    let config = catalog::issuer_create();
    let mut forms = FormStore::new();
    let mut collections = CollectionStore::new();

    forms.get_or_init(&config.form_id, config.initial_values());
    forms.begin_submission(&config.form_id)?;
    // The panel closes while the request is in flight.
    forms.discard(&config.form_id);

    let outcome = apply_outcome(
        &config,
        &mut forms,
        &mut collections,
        ApiOutcome::Success {
            status: 201,
            record: json!({"slug": "chess-club"}),
        },
    )?;

    assert_eq!(outcome, SubmitOutcome::Discarded);
    assert!(forms.get(&config.form_id).is_none());
    assert_eq!(collections.len(CollectionKey::IssuerIssuers), 0);
    Ok(())
}

#[tokio::test]
async fn test_watcher_sees_waiting_before_complete() -> Result<()> {
    let config = catalog::issuer_notification();
    let mut forms = FormStore::new();
    let mut collections = CollectionStore::new();
    let controller = SubmissionController::new(FakeTransport::scripted(vec![
        ApiOutcome::Success {
            status: 200,
            record: json!({"slug": "n1"}),
        },
    ]));

    forms.get_or_init(&config.form_id, config.initial_values());
    forms.patch(
        &config.form_id,
        text_values(&[("email", "earner@example.org"), ("url", "https://x")]),
    )?;
    let watcher = forms.watch(&config.form_id);

    controller
        .submit(&config, &mut forms, &mut collections)
        .await?;

    let changes: Vec<FormChange> = watcher.try_iter().map(|e| e.change).collect();
    assert_eq!(
        changes,
        vec![
            FormChange::ActionState(ActionState::Waiting),
            FormChange::ActionState(ActionState::Complete),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_put_submission_upserts_instead_of_appending() -> Result<()> {
    let config = catalog::badge_class_edit("chess-club", "grandmaster");
    let mut forms = FormStore::new();
    let mut collections = CollectionStore::new();
    collections.seed(&json!({
        "issuer_badgeclasses": [{"slug": "grandmaster", "name": "Grandmaster"}]
    }))?;
    let controller = SubmissionController::new(FakeTransport::scripted(vec![
        ApiOutcome::Success {
            status: 200,
            record: json!({"slug": "grandmaster", "name": "Grandmaster II"}),
        },
    ]));

    forms.get_or_init(&config.form_id, config.initial_values());
    forms.patch(
        &config.form_id,
        text_values(&[
            ("name", "Grandmaster II"),
            ("description", "Updated"),
            ("criteria", "Win twice"),
        ]),
    )?;

    let outcome = controller
        .submit(&config, &mut forms, &mut collections)
        .await?;

    assert_eq!(outcome, SubmitOutcome::Completed);
    assert_eq!(forms.get(&config.form_id).unwrap().message, "Badge class updated");
    assert_eq!(collections.len(CollectionKey::IssuerBadgeClasses), 1);
    let record = collections
        .find(CollectionKey::IssuerBadgeClasses, "grandmaster")
        .unwrap();
    assert_eq!(record["name"], "Grandmaster II");

    let requests = controller.transport().requests();
    assert_eq!(requests[0].method, HttpMethod::Put);
    assert_eq!(
        requests[0].url,
        "/v1/issuer/issuers/chess-club/badges/grandmaster"
    );
    Ok(())
}

#[tokio::test]
async fn test_unchecked_checkbox_passes_validation_and_is_sent() -> Result<()> {
    let config = catalog::assertion_issue("chess-club", "grandmaster");
    let mut forms = FormStore::new();
    let mut collections = CollectionStore::new();
    let controller = SubmissionController::new(FakeTransport::scripted(vec![
        ApiOutcome::Success {
            status: 201,
            record: json!({"slug": "a1", "email": "earner@example.org"}),
        },
    ]));

    forms.get_or_init(&config.form_id, config.initial_values());
    forms.patch(
        &config.form_id,
        text_values(&[("email", "earner@example.org")]),
    )?;

    let outcome = controller
        .submit(&config, &mut forms, &mut collections)
        .await?;

    assert_eq!(outcome, SubmitOutcome::Completed);
    assert_eq!(collections.len(CollectionKey::IssuerBadges), 1);
    let requests = controller.transport().requests();
    assert!(
        requests[0]
            .fields
            .contains(&("create_notification".to_string(), "false".to_string()))
    );
    Ok(())
}

#[tokio::test]
async fn test_uploaded_image_travels_as_a_binary_part() -> Result<()> {
    let config = catalog::earner_badge_upload(&["earner@example.org".to_string()]);
    let mut forms = FormStore::new();
    let mut collections = CollectionStore::new();
    let controller = SubmissionController::new(FakeTransport::scripted(vec![
        ApiOutcome::Success {
            status: 200,
            record: json!({"slug": "b1"}),
        },
    ]));

    forms.get_or_init(&config.form_id, config.initial_values());
    forms.patch(
        &config.form_id,
        HashMap::from([(
            "image".to_string(),
            FieldValue::Image(ImageSource::File {
                file_name: "my-badge.png".to_string(),
                bytes: vec![0x89, 0x50, 0x4e, 0x47],
            }),
        )]),
    )?;

    let outcome = controller
        .submit(&config, &mut forms, &mut collections)
        .await?;

    assert_eq!(outcome, SubmitOutcome::Completed);
    let requests = controller.transport().requests();
    assert_eq!(requests[0].files.len(), 1);
    assert_eq!(requests[0].files[0].field, "image");
    // The catalog's configured upload name wins over the local file name.
    assert_eq!(requests[0].files[0].file_name, "earner_badge_upload.png");
    assert_eq!(collections.len(CollectionKey::EarnerBadges), 1);
    Ok(())
}

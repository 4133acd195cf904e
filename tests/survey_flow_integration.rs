//! Integration tests for running surveys end to end.
//!
//! These tests verify the full path from a stored definition to a stored
//! response:
//! 1. Definitions decode from the API's JSON shape
//! 2. Handlers wire readers, submitters and fingerprints together
//! 3. Submissions land in the store with the expected answers

use serde_json::json;
use std::sync::Arc;

use survey_flow::adapters::{FileSurveyStore, HashedFingerprint, InMemorySurveyStore, StaticFingerprint};
use survey_flow::application::{StartSurveyCommand, StartSurveyHandler};
use survey_flow::domain::foundation::{Fingerprint, NodeId, SurveyId, SurveySlug};
use survey_flow::domain::survey::{
    Advance, Answer, NavigationState, Respondent, SurveyDefinition, SurveyNavigator,
};
use survey_flow::ports::{ResponseSubmitter, SubmitError};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn id(s: &str) -> NodeId {
    NodeId::new(s).unwrap()
}

fn slug(s: &str) -> SurveySlug {
    SurveySlug::new(s).unwrap()
}

/// Onboarding survey as the API serves it: a legacy yes/no root, a
/// multi-select with a `contains` branch and a result node.
fn onboarding() -> SurveyDefinition {
    serde_json::from_value(json!({
        "survey": {
            "id": "srv-onboarding",
            "slug": "onboarding",
            "title": "Getting started",
            "successMessage": "Thanks for helping us improve!"
        },
        "nodes": [
            {
                "id": "used-before",
                "questionType": "yes_no",
                "title": "Have you used a product like ours before?",
                "answerYesNodeId": "which",
                "answerNoNodeId": "welcome"
            },
            {
                "id": "which",
                "parentId": "used-before",
                "questionType": "checkboxes",
                "sortOrder": 1,
                "options": [
                    { "value": "acme", "label": "Acme" },
                    { "value": "globex", "label": "Globex" },
                    { "value": "other", "label": "Something else" }
                ],
                "branches": [
                    { "condition": { "type": "contains", "value": "other" }, "nextNodeId": "other-name" }
                ],
                "nextNodeId": "switch-reason"
            },
            {
                "id": "other-name",
                "parentId": "which",
                "questionType": "short_answer",
                "sortOrder": 2,
                "isRequired": false,
                "nextNodeId": "switch-reason"
            },
            {
                "id": "switch-reason",
                "parentId": "which",
                "questionType": "paragraph",
                "sortOrder": 3
            },
            {
                "id": "welcome",
                "parentId": "used-before",
                "questionType": "short_answer",
                "sortOrder": 4,
                "resultMessage": "Welcome aboard! We'll show you around."
            }
        ]
    }))
    .unwrap()
}

fn handler_for(store: &InMemorySurveyStore) -> StartSurveyHandler {
    StartSurveyHandler::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(StaticFingerprint::new(Fingerprint::new("fp-integration").unwrap())),
    )
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn returning_user_path_is_submitted_with_all_answers() {
    let store = InMemorySurveyStore::with_surveys([onboarding()]).await;
    let mut session = handler_for(&store)
        .handle(StartSurveyCommand::new(slug("onboarding")).with_external_user_id("u-42"))
        .await
        .unwrap();

    session.answer(id("used-before"), true);
    assert_eq!(session.advance().await, Advance::Moved(id("which")));

    session.answer(id("which"), vec!["acme".to_string(), "other".to_string()]);
    assert_eq!(session.advance().await, Advance::Moved(id("other-name")));

    // Optional question may be skipped.
    assert_eq!(session.advance().await, Advance::Moved(id("switch-reason")));

    session.answer(id("switch-reason"), "Pricing");
    assert!(matches!(session.advance().await, Advance::Submit(_)));

    assert_eq!(
        session.state(),
        &NavigationState::Submitted("Thanks for helping us improve!".into())
    );

    let responses = store
        .responses_for(&SurveyId::new("srv-onboarding").unwrap())
        .await;
    assert_eq!(responses.len(), 1);
    let body = serde_json::to_value(&responses[0]).unwrap();
    assert_eq!(
        body,
        json!({
            "surveyId": "srv-onboarding",
            "fingerprint": "fp-integration",
            "externalUserId": "u-42",
            "answers": [
                { "nodeId": "switch-reason", "answerText": "Pricing" },
                { "nodeId": "used-before", "answer": true },
                { "nodeId": "which", "answerOptions": ["acme", "other"] }
            ]
        })
    );
}

#[tokio::test]
async fn new_user_reaches_result_and_finishes() {
    let store = InMemorySurveyStore::with_surveys([onboarding()]).await;
    let mut session = handler_for(&store)
        .handle(StartSurveyCommand::new(slug("onboarding")))
        .await
        .unwrap();

    session.answer(id("used-before"), false);
    assert_eq!(
        session.advance().await,
        Advance::Finished("Welcome aboard! We'll show you around.".into())
    );
    assert_eq!(store.response_count().await, 0);

    assert!(session.finish().await);
    assert!(matches!(session.state(), NavigationState::Submitted(_)));
    assert_eq!(store.response_count().await, 1);
}

#[tokio::test]
async fn back_then_new_branch_keeps_abandoned_answers() {
    let store = InMemorySurveyStore::with_surveys([onboarding()]).await;
    let mut session = handler_for(&store)
        .handle(StartSurveyCommand::new(slug("onboarding")))
        .await
        .unwrap();

    session.answer(id("used-before"), true);
    session.advance().await;
    session.answer(id("which"), vec!["globex".to_string()]);

    assert!(session.back());
    session.answer(id("used-before"), false);
    session.advance().await;
    assert!(session.finish().await);

    let responses = store
        .responses_for(&SurveyId::new("srv-onboarding").unwrap())
        .await;
    let node_ids: Vec<&str> = responses[0]
        .answers
        .iter()
        .map(|a| a.node_id.as_str())
        .collect();
    assert_eq!(node_ids, vec!["used-before", "which"]);
}

#[tokio::test]
async fn rejected_submission_can_be_retried() {
    let store = InMemorySurveyStore::with_surveys([onboarding()]).await;
    store
        .set_submit_failure(Some(SubmitError::network("offline")))
        .await;

    let mut session = handler_for(&store)
        .handle(StartSurveyCommand::new(slug("onboarding")))
        .await
        .unwrap();
    session.answer(id("used-before"), false);
    session.advance().await;
    session.finish().await;
    assert!(matches!(session.state(), NavigationState::Failed(_)));

    store.set_submit_failure(None).await;
    assert!(session.retry().await);
    assert!(matches!(session.state(), NavigationState::Submitted(_)));
    assert_eq!(store.response_count().await, 1);
}

#[tokio::test]
async fn outcome_arriving_after_detach_is_ignored() {
    let store = InMemorySurveyStore::with_surveys([onboarding()]).await;
    let respondent = Respondent::anonymous(Fingerprint::new("fp").unwrap());
    let mut navigator = SurveyNavigator::new(onboarding(), respondent).unwrap();

    navigator.answer(id("used-before"), false);
    navigator.advance();
    let request = navigator.finish().unwrap();
    assert_eq!(navigator.state(), &NavigationState::Submitting);

    // The view closes while the request is still on the wire.
    navigator.detach();
    let receipt = store
        .submit_response(&SurveyId::new("srv-onboarding").unwrap(), &request.payload)
        .await
        .unwrap();

    assert!(!navigator.complete_submission(request.ticket, Ok(receipt)));
    assert_eq!(navigator.state(), &NavigationState::Submitting);
    assert_eq!(navigator.advance(), Advance::Ignored);
}

#[tokio::test]
async fn file_store_round_trip_with_hashed_fingerprint() {
    let dir = tempfile::tempdir().unwrap();
    let definition = serde_json::to_string_pretty(&onboarding()).unwrap();
    tokio::fs::write(dir.path().join("onboarding.json"), definition)
        .await
        .unwrap();

    let store = Arc::new(FileSurveyStore::new(dir.path()));
    let fingerprint = HashedFingerprint::from_traits(["Mozilla/5.0", "1440x900", "UTC"]).unwrap();
    let handler = StartSurveyHandler::new(store.clone(), store.clone(), Arc::new(fingerprint.clone()));

    let mut session = handler
        .handle(StartSurveyCommand::new(slug("onboarding")))
        .await
        .unwrap();
    session.answer(id("used-before"), Answer::YesNo(false));
    session.advance().await;
    assert!(session.finish().await);

    let stored = store
        .responses(&SurveyId::new("srv-onboarding").unwrap())
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(&stored[0].fingerprint, fingerprint.as_fingerprint());
}

use crate::ai_sdk_core::outcome::{outcome_channel, FinishSummary, StreamOutcome};
use crate::ai_sdk_core::SdkError;
use crate::ai_sdk_types::v2::{FinishReason, Usage};

#[tokio::test]
async fn wait_resolves_after_close() {
    let (tx, outcome) = outcome_channel();
    let waiter = {
        let outcome = outcome.clone();
        tokio::spawn(async move { outcome.usage().await })
    };
    tx.set_summary(FinishSummary {
        usage: Usage {
            total_tokens: Some(9),
            ..Default::default()
        },
        finish_reason: FinishReason::Stop,
        provider_metadata: None,
    });
    tx.update_summary(|s| s.usage.input_tokens = Some(4));
    tx.close();
    let usage = waiter.await.expect("join").expect("usage");
    assert_eq!(usage.total_tokens, Some(9));
    assert_eq!(usage.input_tokens, Some(4));
    assert_eq!(outcome.finish_reason().await.unwrap(), FinishReason::Stop);
}

#[tokio::test]
async fn dropped_sender_without_summary_is_cancelled() {
    let (tx, outcome) = outcome_channel();
    drop(tx);
    assert!(matches!(outcome.wait().await, Err(SdkError::Cancelled)));
}

#[tokio::test]
async fn update_before_summary_is_ignored() {
    let (tx, outcome) = outcome_channel();
    tx.update_summary(|s| s.finish_reason = FinishReason::Length);
    assert!(outcome.snapshot().is_none());
    tx.close();
    assert!(matches!(outcome.wait().await, Err(SdkError::Cancelled)));
}

#[tokio::test]
async fn resolved_outcome_is_immediately_available() {
    let outcome = StreamOutcome::resolved(FinishSummary {
        finish_reason: FinishReason::ToolCalls,
        ..Default::default()
    });
    assert_eq!(
        outcome.finish_reason().await.unwrap(),
        FinishReason::ToolCalls
    );
    assert!(outcome.provider_metadata().await.unwrap().is_none());
}

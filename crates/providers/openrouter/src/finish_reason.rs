use crate::ai_sdk_types::v2::FinishReason;

/// Map a chat-completions `finish_reason` onto the unified enum.
///
/// Unrecognized strings become `Other`; an absent reason is `Unknown`.
pub fn map_finish_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        None => FinishReason::Unknown,
        Some("stop") | Some("end_turn") | Some("stop_sequence") => FinishReason::Stop,
        Some("length") | Some("max_tokens") | Some("max_output_tokens") => FinishReason::Length,
        Some("content_filter") => FinishReason::ContentFilter,
        Some("tool_calls") | Some("function_call") | Some("tool_use") => FinishReason::ToolCalls,
        Some("error") => FinishReason::Error,
        Some(_) => FinishReason::Other,
    }
}

/// Map a responses-API terminal `status` (plus `incomplete_details.reason`).
///
/// A completed response that produced function calls finishes with
/// `ToolCalls`.
pub fn map_responses_finish_reason(
    status: Option<&str>,
    incomplete_reason: Option<&str>,
    has_function_calls: bool,
) -> FinishReason {
    match status {
        Some("completed") if has_function_calls => FinishReason::ToolCalls,
        Some("completed") => FinishReason::Stop,
        Some("incomplete") => match incomplete_reason {
            None => FinishReason::Length,
            Some(reason) => map_finish_reason(Some(reason)),
        },
        Some("failed") | Some("cancelled") => FinishReason::Error,
        other => map_finish_reason(other),
    }
}

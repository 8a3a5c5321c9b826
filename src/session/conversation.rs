//! Ephemeral, per-session aggregated view of one conversation, derived
//! entirely from inbound envelopes.

use std::collections::BTreeMap;

use crate::catalogue::bodies::{Commentary, ErrorMessage, MemoryTrace, ReasoningStep, ToolUseRequest, ToolUseResult};

/// One tool invocation, tracked from request through to its (possibly
/// still-pending) result.
#[derive(Debug, Clone)]
pub struct ToolUsage {
    pub request: ToolUseRequest,
    pub result: Option<ToolUseResult>,
}

/// Aggregated, observable state for a single active or recently-active
/// conversation. Rebuilt from scratch on `activate`/`loadConversation`;
/// torn down on `deactivate`/`shutdown`.
#[derive(Debug, Clone)]
pub struct ConversationView {
    pub conversation_id: String,
    pub last_client_stanza: i64,
    pub last_seen_server_stanza: i64,
    pub pending_control_acks: std::collections::BTreeSet<i64>,
    /// sequence -> text, cleared once the stream completes.
    pub streaming_sentences: BTreeMap<i32, String>,
    pub current_transcription: String,
    /// The most recent finalized transcription, held as the turn's user text
    /// until it is paired with a completed assistant answer and persisted.
    pub pending_user_text: Option<String>,
    pub generating: bool,
    /// Ordered by request id's first appearance.
    pub tool_usages: Vec<ToolUsage>,
    /// Ordered by `sequence`, deduplicated by id.
    pub reasoning_steps: Vec<ReasoningStep>,
    pub memory_traces: Vec<MemoryTrace>,
    pub commentaries: Vec<Commentary>,
    pub errors: Vec<ErrorMessage>,
}

impl ConversationView {
    pub fn new(conversation_id: impl Into<String>) -> Self {
        ConversationView {
            conversation_id: conversation_id.into(),
            last_client_stanza: 0,
            last_seen_server_stanza: 0,
            pending_control_acks: Default::default(),
            streaming_sentences: BTreeMap::new(),
            current_transcription: String::new(),
            pending_user_text: None,
            generating: false,
            tool_usages: Vec::new(),
            reasoning_steps: Vec::new(),
            memory_traces: Vec::new(),
            commentaries: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Full answer reconstruction for persistence: concatenate texts in
    /// `sequence` order. `BTreeMap` already iterates in key order so this is
    /// a direct fold.
    pub fn reconstruct_answer(&self) -> String {
        self.streaming_sentences.values().map(String::as_str).collect()
    }

    pub fn insert_sentence(&mut self, sequence: i32, text: String) {
        self.streaming_sentences.insert(sequence, text);
    }

    pub fn clear_stream(&mut self) {
        self.streaming_sentences.clear();
        self.generating = false;
    }

    pub fn dedupe_insert_reasoning_step(&mut self, step: ReasoningStep) {
        if self.reasoning_steps.iter().any(|s| s.id == step.id) {
            return;
        }
        let pos = self.reasoning_steps.partition_point(|s| s.sequence <= step.sequence);
        self.reasoning_steps.insert(pos, step);
    }

    pub fn record_tool_request(&mut self, request: ToolUseRequest) {
        self.tool_usages.push(ToolUsage { request, result: None });
    }

    pub fn record_tool_result(&mut self, result: ToolUseResult) {
        if let Some(usage) = self.tool_usages.iter_mut().find(|u| u.request.id == result.request_id) {
            usage.result = Some(result);
        }
    }

    pub fn dedupe_append_memory_trace(&mut self, trace: MemoryTrace) {
        if !self.memory_traces.iter().any(|t| t.id == trace.id) {
            self.memory_traces.push(trace);
        }
    }

    pub fn dedupe_append_commentary(&mut self, commentary: Commentary) {
        if !self.commentaries.iter().any(|c| c.id == commentary.id) {
            self.commentaries.push(commentary);
        }
    }

    pub fn append_error(&mut self, error: ErrorMessage) {
        self.errors.push(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(id: &str, sequence: i32) -> ReasoningStep {
        ReasoningStep {
            id: id.to_owned(),
            message_id: "m1".to_owned(),
            conversation_id: "c1".to_owned(),
            sequence,
            content: format!("step {sequence}"),
        }
    }

    #[test]
    fn reconstruct_answer_orders_by_sequence_not_insertion_order() {
        let mut view = ConversationView::new("c1");
        view.insert_sentence(2, " world.".to_owned());
        view.insert_sentence(1, "Hello".to_owned());
        assert_eq!(view.reconstruct_answer(), "Hello world.");
    }

    #[test]
    fn reasoning_steps_are_ordered_and_deduplicated() {
        let mut view = ConversationView::new("c1");
        view.dedupe_insert_reasoning_step(step("s2", 2));
        view.dedupe_insert_reasoning_step(step("s1", 1));
        view.dedupe_insert_reasoning_step(step("s1", 1));
        assert_eq!(view.reasoning_steps.len(), 2);
        assert_eq!(view.reasoning_steps[0].id, "s1");
        assert_eq!(view.reasoning_steps[1].id, "s2");
    }

    #[test]
    fn tool_result_attaches_to_its_pending_request() {
        let mut view = ConversationView::new("c1");
        view.record_tool_request(ToolUseRequest {
            id: "req1".into(),
            message_id: "m1".into(),
            conversation_id: "c1".into(),
            tool_name: "search".into(),
            parameters: crate::value::Value::Nil,
            execution: crate::catalogue::enums::ToolExecution::Server,
            timeout_ms: None,
        });
        view.record_tool_result(ToolUseResult {
            id: "res1".into(),
            request_id: "req1".into(),
            conversation_id: "c1".into(),
            success: true,
            result: None,
            error_code: None,
            error_message: None,
        });
        assert_eq!(view.tool_usages.len(), 1);
        assert!(view.tool_usages[0].result.is_some());
    }
}

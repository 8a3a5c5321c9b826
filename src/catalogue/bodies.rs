//! Per-type body shapes and their fixed-arity wire codecs.
//!
//! Each body type owns its own encode (`Vec<(&str, Value)>` field list, always
//! written in full with `Value::Nil` for absent optionals) and decode (pull
//! typed fields out of a [`FieldTable`], checking arity first).

use std::collections::BTreeMap;

use crate::catalogue::enums::{
    AnswerType, FeedbackTarget, MemoryActionKind, MemoryCategory, NoteCategory, Severity, StopType, ToolExecution,
    Vote,
};
use crate::error::DecodeError;
use crate::value::Value;
use crate::wire::{encode_fields, FieldList, FieldTable};

fn nested_map(v: &Value, field: &'static str) -> Result<BTreeMap<String, Value>, DecodeError> {
    v.as_map().cloned().ok_or(DecodeError::FieldTypeMismatch {
        field,
        expected: "map",
    })
}

fn field_str(m: &BTreeMap<String, Value>, key: &'static str) -> Result<String, DecodeError> {
    m.get(key)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(DecodeError::MissingRequiredField(key))
}

fn field_i64(m: &BTreeMap<String, Value>, key: &'static str) -> Result<i64, DecodeError> {
    m.get(key).and_then(Value::as_i64).ok_or(DecodeError::MissingRequiredField(key))
}

fn field_f32(m: &BTreeMap<String, Value>, key: &'static str) -> Result<f32, DecodeError> {
    match m.get(key) {
        Some(Value::Float(f)) => Ok(*f as f32),
        Some(Value::Int(i)) => Ok(*i as f32),
        _ => Err(DecodeError::MissingRequiredField(key)),
    }
}

// ---------------------------------------------------------------------
// 1. ErrorMessage
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorMessage {
    pub id: String,
    pub conversation_id: String,
    pub code: i32,
    pub message: String,
    pub severity: Severity,
    pub recoverable: bool,
    pub originating_id: Option<String>,
}

impl ErrorMessage {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("id", Value::Str(self.id.clone())),
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("code", Value::Int(self.code as i64)),
            ("message", Value::Str(self.message.clone())),
            ("severity", Value::Int(self.severity.to_wire() as i64)),
            ("recoverable", Value::Bool(self.recoverable)),
            ("originatingId", self.originating_id.clone().map(Value::Str).unwrap_or(Value::Nil)),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(7, "ErrorMessage")?;
        Ok(ErrorMessage {
            id: t.required_str("id")?,
            conversation_id: t.required_str("conversationId")?,
            code: t.required_i32("code")?,
            message: t.required_str("message")?,
            severity: Severity::from_wire(t.required_i32("severity")?),
            recoverable: t.required_bool("recoverable")?,
            originating_id: t.optional_str("originatingId")?,
        })
    }
}

// ---------------------------------------------------------------------
// 2/3. UserMessage / AssistantMessage (identical shape)
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub previous_id: Option<String>,
    pub conversation_id: String,
    pub content: String,
    pub timestamp: Option<i64>,
}

impl ChatMessage {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("id", Value::Str(self.id.clone())),
            ("previousId", self.previous_id.clone().map(Value::Str).unwrap_or(Value::Nil)),
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("content", Value::Str(self.content.clone())),
            ("timestamp", self.timestamp.map(Value::Int).unwrap_or(Value::Nil)),
        ])
    }

    pub(crate) fn decode(t: &FieldTable, type_name: &'static str) -> Result<Self, DecodeError> {
        t.require_arity(5, type_name)?;
        Ok(ChatMessage {
            id: t.required_str("id")?,
            previous_id: t.optional_str("previousId")?,
            conversation_id: t.required_str("conversationId")?,
            content: t.required_str("content")?,
            timestamp: t.optional_i64("timestamp")?,
        })
    }
}

// ---------------------------------------------------------------------
// 4. AudioChunk
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AudioChunk {
    pub conversation_id: String,
    pub format: String,
    pub sequence: i32,
    pub duration_ms: i32,
    pub track_sid: Option<String>,
    pub data: Option<Vec<u8>>,
    pub is_last: Option<bool>,
    pub timestamp: Option<i64>,
}

impl AudioChunk {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("format", Value::Str(self.format.clone())),
            ("sequence", Value::Int(self.sequence as i64)),
            ("durationMs", Value::Int(self.duration_ms as i64)),
            ("trackSid", self.track_sid.clone().map(Value::Str).unwrap_or(Value::Nil)),
            ("data", self.data.clone().map(Value::Bin).unwrap_or(Value::Nil)),
            ("isLast", self.is_last.map(Value::Bool).unwrap_or(Value::Nil)),
            ("timestamp", self.timestamp.map(Value::Int).unwrap_or(Value::Nil)),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(8, "AudioChunk")?;
        Ok(AudioChunk {
            conversation_id: t.required_str("conversationId")?,
            format: t.required_str("format")?,
            sequence: t.required_i32("sequence")?,
            duration_ms: t.required_i32("durationMs")?,
            track_sid: t.optional_str("trackSid")?,
            data: t.optional_bin("data")?,
            is_last: t.optional_bool("isLast")?,
            timestamp: t.optional_i64("timestamp")?,
        })
    }
}

// ---------------------------------------------------------------------
// 5. ReasoningStep
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ReasoningStep {
    pub id: String,
    pub message_id: String,
    pub conversation_id: String,
    pub sequence: i32,
    pub content: String,
}

impl ReasoningStep {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("id", Value::Str(self.id.clone())),
            ("messageId", Value::Str(self.message_id.clone())),
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("sequence", Value::Int(self.sequence as i64)),
            ("content", Value::Str(self.content.clone())),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(5, "ReasoningStep")?;
        Ok(ReasoningStep {
            id: t.required_str("id")?,
            message_id: t.required_str("messageId")?,
            conversation_id: t.required_str("conversationId")?,
            sequence: t.required_i32("sequence")?,
            content: t.required_str("content")?,
        })
    }
}

// ---------------------------------------------------------------------
// 6. ToolUseRequest
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ToolUseRequest {
    pub id: String,
    pub message_id: String,
    pub conversation_id: String,
    pub tool_name: String,
    pub parameters: Value,
    pub execution: ToolExecution,
    pub timeout_ms: Option<i32>,
}

impl ToolUseRequest {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("id", Value::Str(self.id.clone())),
            ("messageId", Value::Str(self.message_id.clone())),
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("toolName", Value::Str(self.tool_name.clone())),
            ("parameters", self.parameters.clone()),
            ("execution", Value::Str(self.execution.to_wire().to_owned())),
            ("timeoutMs", self.timeout_ms.map(|i| Value::Int(i as i64)).unwrap_or(Value::Nil)),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(7, "ToolUseRequest")?;
        let execution = match t.optional_str("execution")? {
            Some(s) => ToolExecution::from_wire(&s),
            None => ToolExecution::default(),
        };
        Ok(ToolUseRequest {
            id: t.required_str("id")?,
            message_id: t.required_str("messageId")?,
            conversation_id: t.required_str("conversationId")?,
            tool_name: t.required_str("toolName")?,
            parameters: t.required_value("parameters")?,
            execution,
            timeout_ms: t.optional_i32("timeoutMs")?,
        })
    }
}

// ---------------------------------------------------------------------
// 7. ToolUseResult
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ToolUseResult {
    pub id: String,
    pub request_id: String,
    pub conversation_id: String,
    pub success: bool,
    pub result: Option<Value>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

impl ToolUseResult {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("id", Value::Str(self.id.clone())),
            ("requestId", Value::Str(self.request_id.clone())),
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("success", Value::Bool(self.success)),
            ("result", self.result.clone().unwrap_or(Value::Nil)),
            ("errorCode", self.error_code.clone().map(Value::Str).unwrap_or(Value::Nil)),
            (
                "errorMessage",
                self.error_message.clone().map(Value::Str).unwrap_or(Value::Nil),
            ),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(7, "ToolUseResult")?;
        Ok(ToolUseResult {
            id: t.required_str("id")?,
            request_id: t.required_str("requestId")?,
            conversation_id: t.required_str("conversationId")?,
            success: t.required_bool("success")?,
            result: t.optional_value("result")?,
            error_code: t.optional_str("errorCode")?,
            error_message: t.optional_str("errorMessage")?,
        })
    }
}

// ---------------------------------------------------------------------
// 8. Acknowledgement
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Acknowledgement {
    pub conversation_id: String,
    pub acknowledged_stanza_id: i32,
    pub success: bool,
}

impl Acknowledgement {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("acknowledgedStanzaId", Value::Int(self.acknowledged_stanza_id as i64)),
            ("success", Value::Bool(self.success)),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(3, "Acknowledgement")?;
        Ok(Acknowledgement {
            conversation_id: t.required_str("conversationId")?,
            acknowledged_stanza_id: t.required_i32("acknowledgedStanzaId")?,
            success: t.required_bool("success")?,
        })
    }
}

// ---------------------------------------------------------------------
// 9. Transcription
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    pub id: String,
    pub previous_id: Option<String>,
    pub conversation_id: String,
    pub text: String,
    pub is_final: bool,
    pub confidence: Option<f32>,
    pub language: Option<String>,
}

impl Transcription {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("id", Value::Str(self.id.clone())),
            ("previousId", self.previous_id.clone().map(Value::Str).unwrap_or(Value::Nil)),
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("text", Value::Str(self.text.clone())),
            ("final", Value::Bool(self.is_final)),
            ("confidence", self.confidence.map(|f| Value::Float(f as f64)).unwrap_or(Value::Nil)),
            ("language", self.language.clone().map(Value::Str).unwrap_or(Value::Nil)),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(7, "Transcription")?;
        Ok(Transcription {
            id: t.required_str("id")?,
            previous_id: t.optional_str("previousId")?,
            conversation_id: t.required_str("conversationId")?,
            text: t.required_str("text")?,
            is_final: t.required_bool("final")?,
            confidence: t.optional_f32("confidence")?,
            language: t.optional_str("language")?,
        })
    }
}

// ---------------------------------------------------------------------
// 10. ControlStop
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ControlStop {
    pub conversation_id: String,
    pub target_id: Option<String>,
    pub reason: Option<String>,
    pub stop_type: StopType,
}

impl ControlStop {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("targetId", self.target_id.clone().map(Value::Str).unwrap_or(Value::Nil)),
            ("reason", self.reason.clone().map(Value::Str).unwrap_or(Value::Nil)),
            ("stopType", Value::Str(self.stop_type.to_wire().to_owned())),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(4, "ControlStop")?;
        let stop_type = match t.optional_str("stopType")? {
            Some(s) => StopType::from_wire(&s),
            None => StopType::default(),
        };
        Ok(ControlStop {
            conversation_id: t.required_str("conversationId")?,
            target_id: t.optional_str("targetId")?,
            reason: t.optional_str("reason")?,
            stop_type,
        })
    }
}

// ---------------------------------------------------------------------
// 11. ControlVariation
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ControlVariation {
    pub conversation_id: String,
    pub target_id: String,
    pub mode: crate::catalogue::enums::VariationMode,
    pub new_content: Option<String>,
}

impl ControlVariation {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("targetId", Value::Str(self.target_id.clone())),
            ("mode", Value::Str(self.mode.to_wire().to_owned())),
            ("newContent", self.new_content.clone().map(Value::Str).unwrap_or(Value::Nil)),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(4, "ControlVariation")?;
        let mode_str = t.required_str("mode")?;
        Ok(ControlVariation {
            conversation_id: t.required_str("conversationId")?,
            target_id: t.required_str("targetId")?,
            mode: crate::catalogue::enums::VariationMode::from_wire_strict(&mode_str)?,
            new_content: t.optional_str("newContent")?,
        })
    }
}

// ---------------------------------------------------------------------
// 12. Configuration
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Configuration {
    pub conversation_id: Option<String>,
    pub last_sequence_seen: Option<i32>,
    pub client_version: Option<String>,
    pub preferred_language: Option<String>,
    pub device: Option<String>,
    pub features: Option<Vec<String>>,
}

impl Configuration {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            (
                "conversationId",
                self.conversation_id.clone().map(Value::Str).unwrap_or(Value::Nil),
            ),
            (
                "lastSequenceSeen",
                self.last_sequence_seen.map(|i| Value::Int(i as i64)).unwrap_or(Value::Nil),
            ),
            (
                "clientVersion",
                self.client_version.clone().map(Value::Str).unwrap_or(Value::Nil),
            ),
            (
                "preferredLanguage",
                self.preferred_language.clone().map(Value::Str).unwrap_or(Value::Nil),
            ),
            ("device", self.device.clone().map(Value::Str).unwrap_or(Value::Nil)),
            (
                "features",
                self.features
                    .clone()
                    .map(|fs| Value::Array(fs.into_iter().map(Value::Str).collect()))
                    .unwrap_or(Value::Nil),
            ),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(6, "Configuration")?;
        Ok(Configuration {
            conversation_id: t.optional_str("conversationId")?,
            last_sequence_seen: t.optional_i32("lastSequenceSeen")?,
            client_version: t.optional_str("clientVersion")?,
            preferred_language: t.optional_str("preferredLanguage")?,
            device: t.optional_str("device")?,
            features: t.optional_str_array("features")?,
        })
    }
}

// ---------------------------------------------------------------------
// 13. StartAnswer
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct StartAnswer {
    pub id: String,
    pub previous_id: String,
    pub conversation_id: String,
    pub answer_type: AnswerType,
    pub planned_sentence_count: Option<i32>,
}

impl StartAnswer {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("id", Value::Str(self.id.clone())),
            ("previousId", Value::Str(self.previous_id.clone())),
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("answerType", Value::Str(self.answer_type.to_wire().to_owned())),
            (
                "plannedSentenceCount",
                self.planned_sentence_count.map(|i| Value::Int(i as i64)).unwrap_or(Value::Nil),
            ),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(5, "StartAnswer")?;
        let answer_type = match t.optional_str("answerType")? {
            Some(s) => AnswerType::from_wire(&s),
            None => AnswerType::default(),
        };
        Ok(StartAnswer {
            id: t.required_str("id")?,
            previous_id: t.required_str("previousId")?,
            conversation_id: t.required_str("conversationId")?,
            answer_type,
            planned_sentence_count: t.optional_i32("plannedSentenceCount")?,
        })
    }
}

// ---------------------------------------------------------------------
// 14. MemoryTrace
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryTrace {
    pub id: String,
    pub message_id: String,
    pub conversation_id: String,
    pub memory_id: String,
    pub content: String,
    pub relevance: f32,
}

impl MemoryTrace {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("id", Value::Str(self.id.clone())),
            ("messageId", Value::Str(self.message_id.clone())),
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("memoryId", Value::Str(self.memory_id.clone())),
            ("content", Value::Str(self.content.clone())),
            ("relevance", Value::Float(self.relevance as f64)),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(6, "MemoryTrace")?;
        Ok(MemoryTrace {
            id: t.required_str("id")?,
            message_id: t.required_str("messageId")?,
            conversation_id: t.required_str("conversationId")?,
            memory_id: t.required_str("memoryId")?,
            content: t.required_str("content")?,
            relevance: t.required_f32("relevance")?,
        })
    }
}

// ---------------------------------------------------------------------
// 15. Commentary
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Commentary {
    pub id: String,
    pub message_id: String,
    pub conversation_id: String,
    pub content: String,
    pub commentary_type: Option<String>,
}

impl Commentary {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("id", Value::Str(self.id.clone())),
            ("messageId", Value::Str(self.message_id.clone())),
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("content", Value::Str(self.content.clone())),
            (
                "commentaryType",
                self.commentary_type.clone().map(Value::Str).unwrap_or(Value::Nil),
            ),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(5, "Commentary")?;
        Ok(Commentary {
            id: t.required_str("id")?,
            message_id: t.required_str("messageId")?,
            conversation_id: t.required_str("conversationId")?,
            content: t.required_str("content")?,
            commentary_type: t.optional_str("commentaryType")?,
        })
    }
}

// ---------------------------------------------------------------------
// 16. AssistantSentence
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AssistantSentence {
    pub id: Option<String>,
    pub previous_id: String,
    pub conversation_id: String,
    pub sequence: i32,
    pub text: String,
    pub is_final: Option<bool>,
    pub audio: Option<Vec<u8>>,
}

impl AssistantSentence {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("id", self.id.clone().map(Value::Str).unwrap_or(Value::Nil)),
            ("previousId", Value::Str(self.previous_id.clone())),
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("sequence", Value::Int(self.sequence as i64)),
            ("text", Value::Str(self.text.clone())),
            ("isFinal", self.is_final.map(Value::Bool).unwrap_or(Value::Nil)),
            ("audio", self.audio.clone().map(Value::Bin).unwrap_or(Value::Nil)),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(7, "AssistantSentence")?;
        Ok(AssistantSentence {
            id: t.optional_str("id")?,
            previous_id: t.required_str("previousId")?,
            conversation_id: t.required_str("conversationId")?,
            sequence: t.required_i32("sequence")?,
            text: t.required_str("text")?,
            is_final: t.optional_bool("isFinal")?,
            audio: t.optional_bin("audio")?,
        })
    }
}

// ---------------------------------------------------------------------
// 17/18. SyncRequest / SyncResponse
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SyncRequest {
    pub conversation_id: String,
    pub from_sequence: Option<i32>,
}

impl SyncRequest {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("conversationId", Value::Str(self.conversation_id.clone())),
            (
                "fromSequence",
                self.from_sequence.map(|i| Value::Int(i as i64)).unwrap_or(Value::Nil),
            ),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(2, "SyncRequest")?;
        Ok(SyncRequest {
            conversation_id: t.required_str("conversationId")?,
            from_sequence: t.optional_i32("fromSequence")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncResponse {
    pub conversation_id: String,
    pub messages: Vec<Value>,
    pub last_sequence: i32,
}

impl SyncResponse {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("messages", Value::Array(self.messages.clone())),
            ("lastSequence", Value::Int(self.last_sequence as i64)),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(3, "SyncResponse")?;
        let messages = match t.required_value("messages")? {
            Value::Array(items) => items,
            _ => return Err(DecodeError::FieldTypeMismatch {
                field: "messages",
                expected: "array",
            }),
        };
        Ok(SyncResponse {
            conversation_id: t.required_str("conversationId")?,
            messages,
            last_sequence: t.required_i32("lastSequence")?,
        })
    }
}

// ---------------------------------------------------------------------
// 20/21. Feedback / FeedbackConfirmation
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub id: String,
    pub conversation_id: String,
    pub target_id: String,
    pub target: FeedbackTarget,
    pub vote: Vote,
    pub category: Option<NoteCategory>,
    pub comment: Option<String>,
}

impl Feedback {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("id", Value::Str(self.id.clone())),
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("targetId", Value::Str(self.target_id.clone())),
            ("target", Value::Str(self.target.to_wire().to_owned())),
            ("vote", Value::Str(self.vote.to_wire().to_owned())),
            (
                "category",
                self.category.map(|c| Value::Str(c.to_wire().to_owned())).unwrap_or(Value::Nil),
            ),
            ("comment", self.comment.clone().map(Value::Str).unwrap_or(Value::Nil)),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(7, "Feedback")?;
        Ok(Feedback {
            id: t.required_str("id")?,
            conversation_id: t.required_str("conversationId")?,
            target_id: t.required_str("targetId")?,
            target: FeedbackTarget::from_wire(&t.required_str("target")?),
            vote: Vote::from_wire(&t.required_str("vote")?),
            category: t.optional_str("category")?.map(|s| NoteCategory::from_wire(&s)),
            comment: t.optional_str("comment")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackConfirmation {
    pub id: String,
    pub conversation_id: String,
    pub upvotes: i64,
    pub downvotes: i64,
    pub special_votes: BTreeMap<String, i64>,
}

impl FeedbackConfirmation {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("id", Value::Str(self.id.clone())),
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("upvotes", Value::Int(self.upvotes)),
            ("downvotes", Value::Int(self.downvotes)),
            (
                "specialVotes",
                Value::Map(self.special_votes.iter().map(|(k, v)| (k.clone(), Value::Int(*v))).collect()),
            ),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(5, "FeedbackConfirmation")?;
        let special_votes = match t.required_value("specialVotes")? {
            Value::Map(m) => m
                .into_iter()
                .map(|(k, v)| {
                    v.as_i64()
                        .map(|i| (k.clone(), i))
                        .ok_or(DecodeError::FieldTypeMismatch {
                            field: "specialVotes",
                            expected: "integer",
                        })
                })
                .collect::<Result<_, _>>()?,
            _ => {
                return Err(DecodeError::FieldTypeMismatch {
                    field: "specialVotes",
                    expected: "map",
                })
            }
        };
        Ok(FeedbackConfirmation {
            id: t.required_str("id")?,
            conversation_id: t.required_str("conversationId")?,
            upvotes: t.required_i64("upvotes")?,
            downvotes: t.required_i64("downvotes")?,
            special_votes,
        })
    }
}

// ---------------------------------------------------------------------
// 22/23. UserNote / NoteConfirmation
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct UserNote {
    pub id: String,
    pub conversation_id: String,
    pub content: String,
    pub category: Option<NoteCategory>,
}

impl UserNote {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("id", Value::Str(self.id.clone())),
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("content", Value::Str(self.content.clone())),
            (
                "category",
                self.category.map(|c| Value::Str(c.to_wire().to_owned())).unwrap_or(Value::Nil),
            ),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(4, "UserNote")?;
        Ok(UserNote {
            id: t.required_str("id")?,
            conversation_id: t.required_str("conversationId")?,
            content: t.required_str("content")?,
            category: t.optional_str("category")?.map(|s| NoteCategory::from_wire(&s)),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteConfirmation {
    pub id: String,
    pub conversation_id: String,
    pub note_id: String,
    pub success: bool,
}

impl NoteConfirmation {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("id", Value::Str(self.id.clone())),
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("noteId", Value::Str(self.note_id.clone())),
            ("success", Value::Bool(self.success)),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(4, "NoteConfirmation")?;
        Ok(NoteConfirmation {
            id: t.required_str("id")?,
            conversation_id: t.required_str("conversationId")?,
            note_id: t.required_str("noteId")?,
            success: t.required_bool("success")?,
        })
    }
}

// ---------------------------------------------------------------------
// 24/25. MemoryAction / MemoryConfirmation
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryPayload {
    pub content: String,
    pub category: MemoryCategory,
    pub pinned: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryAction {
    pub id: String,
    pub action: MemoryActionKind,
    pub memory: Option<MemoryPayload>,
    pub timestamp: i64,
}

impl MemoryAction {
    pub(crate) fn encode(&self) -> rmpv::Value {
        let memory_value = self.memory.as_ref().map(|m| {
            let mut map = BTreeMap::new();
            map.insert("content".to_owned(), Value::Str(m.content.clone()));
            map.insert("category".to_owned(), Value::Str(m.category.to_wire().to_owned()));
            map.insert("pinned".to_owned(), m.pinned.map(Value::Bool).unwrap_or(Value::Nil));
            Value::Map(map)
        });
        encode_fields(vec![
            ("id", Value::Str(self.id.clone())),
            ("action", Value::Str(self.action.to_wire().to_owned())),
            ("memory", memory_value.unwrap_or(Value::Nil)),
            ("timestamp", Value::Int(self.timestamp)),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(4, "MemoryAction")?;
        let memory = match t.optional_value("memory")? {
            None => None,
            Some(v) => {
                let m = nested_map(&v, "memory")?;
                Some(MemoryPayload {
                    content: field_str(&m, "content")?,
                    category: MemoryCategory::from_wire(&field_str(&m, "category")?),
                    pinned: m.get("pinned").and_then(|v| match v {
                        Value::Bool(b) => Some(*b),
                        _ => None,
                    }),
                })
            }
        };
        Ok(MemoryAction {
            id: t.required_str("id")?,
            action: MemoryActionKind::from_wire(&t.required_str("action")?),
            memory,
            timestamp: t.required_i64("timestamp")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryConfirmation {
    pub id: String,
    pub conversation_id: String,
    pub memory_id: Option<String>,
    pub success: bool,
}

impl MemoryConfirmation {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("id", Value::Str(self.id.clone())),
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("memoryId", self.memory_id.clone().map(Value::Str).unwrap_or(Value::Nil)),
            ("success", Value::Bool(self.success)),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(4, "MemoryConfirmation")?;
        Ok(MemoryConfirmation {
            id: t.required_str("id")?,
            conversation_id: t.required_str("conversationId")?,
            memory_id: t.optional_str("memoryId")?,
            success: t.required_bool("success")?,
        })
    }
}

// ---------------------------------------------------------------------
// 26. ServerInfo
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct McpServerEntry {
    pub name: String,
    pub status: crate::catalogue::enums::McpServerStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerInfo {
    pub connection_status: crate::catalogue::enums::ConnectionStatus,
    pub connection_latency: i64,
    pub model_name: String,
    pub model_provider: String,
    pub mcp_servers: Vec<McpServerEntry>,
}

impl ServerInfo {
    pub(crate) fn encode(&self) -> rmpv::Value {
        let mut connection = BTreeMap::new();
        connection.insert(
            "status".to_owned(),
            Value::Str(self.connection_status.to_wire().to_owned()),
        );
        connection.insert("latency".to_owned(), Value::Int(self.connection_latency));

        let mut model = BTreeMap::new();
        model.insert("name".to_owned(), Value::Str(self.model_name.clone()));
        model.insert("provider".to_owned(), Value::Str(self.model_provider.clone()));

        let mcp_servers = Value::Array(
            self.mcp_servers
                .iter()
                .map(|entry| {
                    let mut m = BTreeMap::new();
                    m.insert("name".to_owned(), Value::Str(entry.name.clone()));
                    m.insert("status".to_owned(), Value::Str(entry.status.to_wire().to_owned()));
                    Value::Map(m)
                })
                .collect(),
        );

        encode_fields(vec![
            ("connection", Value::Map(connection)),
            ("model", Value::Map(model)),
            ("mcpServers", mcp_servers),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(3, "ServerInfo")?;
        let connection = nested_map(&t.required_value("connection")?, "connection")?;
        let model = nested_map(&t.required_value("model")?, "model")?;
        let mcp_servers = match t.required_value("mcpServers")? {
            Value::Array(items) => items
                .into_iter()
                .map(|v| {
                    let m = nested_map(&v, "mcpServers")?;
                    Ok(McpServerEntry {
                        name: field_str(&m, "name")?,
                        status: crate::catalogue::enums::McpServerStatus::from_wire(&field_str(&m, "status")?),
                    })
                })
                .collect::<Result<_, DecodeError>>()?,
            _ => {
                return Err(DecodeError::FieldTypeMismatch {
                    field: "mcpServers",
                    expected: "array",
                })
            }
        };
        Ok(ServerInfo {
            connection_status: crate::catalogue::enums::ConnectionStatus::from_wire(&field_str(&connection, "status")?),
            connection_latency: field_i64(&connection, "latency")?,
            model_name: field_str(&model, "name")?,
            model_provider: field_str(&model, "provider")?,
            mcp_servers,
        })
    }
}

// ---------------------------------------------------------------------
// 27. SessionStats
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    pub message_count: i64,
    pub tool_call_count: i64,
    pub memories_used: i64,
    pub session_duration: i64,
}

impl SessionStats {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("messageCount", Value::Int(self.message_count)),
            ("toolCallCount", Value::Int(self.tool_call_count)),
            ("memoriesUsed", Value::Int(self.memories_used)),
            ("sessionDuration", Value::Int(self.session_duration)),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(4, "SessionStats")?;
        Ok(SessionStats {
            message_count: t.required_i64("messageCount")?,
            tool_call_count: t.required_i64("toolCallCount")?,
            memories_used: t.required_i64("memoriesUsed")?,
            session_duration: t.required_i64("sessionDuration")?,
        })
    }
}

// ---------------------------------------------------------------------
// 28. ConversationUpdate
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ConversationUpdate {
    pub conversation_id: String,
    pub title: Option<String>,
    pub updated_at: i64,
}

impl ConversationUpdate {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("title", self.title.clone().map(Value::Str).unwrap_or(Value::Nil)),
            ("updatedAt", Value::Int(self.updated_at)),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(3, "ConversationUpdate")?;
        Ok(ConversationUpdate {
            conversation_id: t.required_str("conversationId")?,
            title: t.optional_str("title")?,
            updated_at: t.required_i64("updatedAt")?,
        })
    }
}

// ---------------------------------------------------------------------
// 30. DimensionPreference
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DimensionWeights {
    pub success_rate: f32,
    pub quality: f32,
    pub efficiency: f32,
    pub robustness: f32,
    pub generalization: f32,
    pub diversity: f32,
    pub innovation: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DimensionPreference {
    pub conversation_id: String,
    pub weights: DimensionWeights,
    pub preset: Option<String>,
    pub timestamp: i64,
}

impl DimensionWeights {
    fn to_value(&self) -> Value {
        let mut m = BTreeMap::new();
        m.insert("successRate".to_owned(), Value::Float(self.success_rate as f64));
        m.insert("quality".to_owned(), Value::Float(self.quality as f64));
        m.insert("efficiency".to_owned(), Value::Float(self.efficiency as f64));
        m.insert("robustness".to_owned(), Value::Float(self.robustness as f64));
        m.insert("generalization".to_owned(), Value::Float(self.generalization as f64));
        m.insert("diversity".to_owned(), Value::Float(self.diversity as f64));
        m.insert("innovation".to_owned(), Value::Float(self.innovation as f64));
        Value::Map(m)
    }

    fn from_map(m: &BTreeMap<String, Value>) -> Result<Self, DecodeError> {
        Ok(DimensionWeights {
            success_rate: field_f32(m, "successRate")?,
            quality: field_f32(m, "quality")?,
            efficiency: field_f32(m, "efficiency")?,
            robustness: field_f32(m, "robustness")?,
            generalization: field_f32(m, "generalization")?,
            diversity: field_f32(m, "diversity")?,
            innovation: field_f32(m, "innovation")?,
        })
    }
}

impl DimensionPreference {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("weights", self.weights.to_value()),
            ("preset", self.preset.clone().map(Value::Str).unwrap_or(Value::Nil)),
            ("timestamp", Value::Int(self.timestamp)),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(4, "DimensionPreference")?;
        let weights_map = nested_map(&t.required_value("weights")?, "weights")?;
        Ok(DimensionPreference {
            conversation_id: t.required_str("conversationId")?,
            weights: DimensionWeights::from_map(&weights_map)?,
            preset: t.optional_str("preset")?,
            timestamp: t.required_i64("timestamp")?,
        })
    }
}

// ---------------------------------------------------------------------
// 31. EliteOptions
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct EliteScores {
    pub success_rate: f32,
    pub quality: f32,
    pub efficiency: f32,
    pub robustness: f32,
    pub generalization: f32,
    pub diversity: f32,
    pub innovation: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Elite {
    pub id: String,
    pub label: String,
    pub scores: EliteScores,
    pub description: String,
    pub best_for: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EliteOptions {
    pub conversation_id: String,
    pub elites: Vec<Elite>,
    pub current_elite_id: String,
    pub timestamp: i64,
}

impl EliteOptions {
    pub(crate) fn encode(&self) -> rmpv::Value {
        let elites = Value::Array(
            self.elites
                .iter()
                .map(|e| {
                    let mut scores = BTreeMap::new();
                    scores.insert("successRate".to_owned(), Value::Float(e.scores.success_rate as f64));
                    scores.insert("quality".to_owned(), Value::Float(e.scores.quality as f64));
                    scores.insert("efficiency".to_owned(), Value::Float(e.scores.efficiency as f64));
                    scores.insert("robustness".to_owned(), Value::Float(e.scores.robustness as f64));
                    scores.insert("generalization".to_owned(), Value::Float(e.scores.generalization as f64));
                    scores.insert("diversity".to_owned(), Value::Float(e.scores.diversity as f64));
                    scores.insert("innovation".to_owned(), Value::Float(e.scores.innovation as f64));

                    let mut m = BTreeMap::new();
                    m.insert("id".to_owned(), Value::Str(e.id.clone()));
                    m.insert("label".to_owned(), Value::Str(e.label.clone()));
                    m.insert("scores".to_owned(), Value::Map(scores));
                    m.insert("description".to_owned(), Value::Str(e.description.clone()));
                    m.insert("bestFor".to_owned(), Value::Str(e.best_for.clone()));
                    Value::Map(m)
                })
                .collect(),
        );
        encode_fields(vec![
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("elites", elites),
            ("currentEliteId", Value::Str(self.current_elite_id.clone())),
            ("timestamp", Value::Int(self.timestamp)),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(4, "EliteOptions")?;
        let elites = match t.required_value("elites")? {
            Value::Array(items) => items
                .into_iter()
                .map(|v| {
                    let m = nested_map(&v, "elites")?;
                    let scores_map = nested_map(m.get("scores").ok_or(DecodeError::MissingRequiredField("scores"))?, "scores")?;
                    Ok(Elite {
                        id: field_str(&m, "id")?,
                        label: field_str(&m, "label")?,
                        scores: EliteScores {
                            success_rate: field_f32(&scores_map, "successRate")?,
                            quality: field_f32(&scores_map, "quality")?,
                            efficiency: field_f32(&scores_map, "efficiency")?,
                            robustness: field_f32(&scores_map, "robustness")?,
                            generalization: field_f32(&scores_map, "generalization")?,
                            diversity: field_f32(&scores_map, "diversity")?,
                            innovation: field_f32(&scores_map, "innovation")?,
                        },
                        description: field_str(&m, "description")?,
                        best_for: field_str(&m, "bestFor")?,
                    })
                })
                .collect::<Result<_, DecodeError>>()?,
            _ => {
                return Err(DecodeError::FieldTypeMismatch {
                    field: "elites",
                    expected: "array",
                })
            }
        };
        Ok(EliteOptions {
            conversation_id: t.required_str("conversationId")?,
            elites,
            current_elite_id: t.required_str("currentEliteId")?,
            timestamp: t.required_i64("timestamp")?,
        })
    }
}

// ---------------------------------------------------------------------
// 32. OptimizationProgress
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationProgress {
    pub run_id: String,
    pub status: String,
    pub iteration: i32,
    pub max_iterations: i32,
    pub current_score: f32,
    pub best_score: f32,
    pub dimension_scores: Option<BTreeMap<String, f32>>,
    pub message: Option<String>,
    pub timestamp: i64,
}

impl OptimizationProgress {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("runId", Value::Str(self.run_id.clone())),
            ("status", Value::Str(self.status.clone())),
            ("iteration", Value::Int(self.iteration as i64)),
            ("maxIterations", Value::Int(self.max_iterations as i64)),
            ("currentScore", Value::Float(self.current_score as f64)),
            ("bestScore", Value::Float(self.best_score as f64)),
            (
                "dimensionScores",
                self.dimension_scores
                    .clone()
                    .map(|m| Value::Map(m.into_iter().map(|(k, v)| (k, Value::Float(v as f64))).collect()))
                    .unwrap_or(Value::Nil),
            ),
            ("message", self.message.clone().map(Value::Str).unwrap_or(Value::Nil)),
            ("timestamp", Value::Int(self.timestamp)),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(9, "OptimizationProgress")?;
        let dimension_scores = match t.optional_value("dimensionScores")? {
            None => None,
            Some(Value::Map(m)) => Some(
                m.into_iter()
                    .map(|(k, v)| {
                        v.as_i64()
                            .map(|i| i as f32)
                            .or(match v {
                                Value::Float(f) => Some(f as f32),
                                _ => None,
                            })
                            .map(|f| (k.clone(), f))
                            .ok_or(DecodeError::FieldTypeMismatch {
                                field: "dimensionScores",
                                expected: "float",
                            })
                    })
                    .collect::<Result<_, DecodeError>>()?,
            ),
            Some(_) => {
                return Err(DecodeError::FieldTypeMismatch {
                    field: "dimensionScores",
                    expected: "map",
                })
            }
        };
        Ok(OptimizationProgress {
            run_id: t.required_str("runId")?,
            status: t.required_str("status")?,
            iteration: t.required_i32("iteration")?,
            max_iterations: t.required_i32("maxIterations")?,
            current_score: t.required_f32("currentScore")?,
            best_score: t.required_f32("bestScore")?,
            dimension_scores,
            message: t.optional_str("message")?,
            timestamp: t.required_i64("timestamp")?,
        })
    }
}

// ---------------------------------------------------------------------
// 33. EliteSelect
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct EliteSelect {
    pub conversation_id: String,
    pub elite_id: String,
    pub timestamp: i64,
}

impl EliteSelect {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("eliteId", Value::Str(self.elite_id.clone())),
            ("timestamp", Value::Int(self.timestamp)),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(3, "EliteSelect")?;
        Ok(EliteSelect {
            conversation_id: t.required_str("conversationId")?,
            elite_id: t.required_str("eliteId")?,
            timestamp: t.required_i64("timestamp")?,
        })
    }
}

// ---------------------------------------------------------------------
// 40-43. Subscribe / Unsubscribe / SubscribeAck / UnsubscribeAck
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Subscribe {
    pub conversation_id: String,
    pub from_sequence: Option<i32>,
}

impl Subscribe {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("conversationId", Value::Str(self.conversation_id.clone())),
            (
                "fromSequence",
                self.from_sequence.map(|i| Value::Int(i as i64)).unwrap_or(Value::Nil),
            ),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(2, "Subscribe")?;
        Ok(Subscribe {
            conversation_id: t.required_str("conversationId")?,
            from_sequence: t.optional_i32("fromSequence")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unsubscribe {
    pub conversation_id: String,
}

impl Unsubscribe {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![("conversationId", Value::Str(self.conversation_id.clone()))])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(1, "Unsubscribe")?;
        Ok(Unsubscribe {
            conversation_id: t.required_str("conversationId")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubscribeAck {
    pub conversation_id: String,
    pub success: bool,
    pub missed_messages: Option<i32>,
    pub error: Option<String>,
}

impl SubscribeAck {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("success", Value::Bool(self.success)),
            (
                "missedMessages",
                self.missed_messages.map(|i| Value::Int(i as i64)).unwrap_or(Value::Nil),
            ),
            ("error", self.error.clone().map(Value::Str).unwrap_or(Value::Nil)),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(4, "SubscribeAck")?;
        Ok(SubscribeAck {
            conversation_id: t.required_str("conversationId")?,
            success: t.required_bool("success")?,
            missed_messages: t.optional_i32("missedMessages")?,
            error: t.optional_str("error")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnsubscribeAck {
    pub conversation_id: String,
    pub success: bool,
}

impl UnsubscribeAck {
    pub(crate) fn encode(&self) -> rmpv::Value {
        encode_fields(vec![
            ("conversationId", Value::Str(self.conversation_id.clone())),
            ("success", Value::Bool(self.success)),
        ])
    }

    pub(crate) fn decode(t: &FieldTable) -> Result<Self, DecodeError> {
        t.require_arity(2, "UnsubscribeAck")?;
        Ok(UnsubscribeAck {
            conversation_id: t.required_str("conversationId")?,
            success: t.required_bool("success")?,
        })
    }
}

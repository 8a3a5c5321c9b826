//! The closed message catalogue: numeric type codes, per-type body shapes,
//! and the tagged-sum [`Message`] that dispatches between them.
//!
//! The registry is fixed at compile time — adding a type means adding a
//! catalogue entry here, not registering one at runtime.

pub mod bodies;
pub mod enums;

use crate::error::DecodeError;
use crate::wire::FieldTable;

use bodies::*;

/// Numeric wire codes for every catalogue entry.
///
/// Codes 30-33 (the optimization family) are locked per the resolved
/// ambiguity recorded in the design notes: this repo's source-of-truth
/// table, not the alternate 29-32 numbering a second protocol table used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i64)]
pub enum MessageType {
    ErrorMessage = 1,
    UserMessage = 2,
    AssistantMessage = 3,
    AudioChunk = 4,
    ReasoningStep = 5,
    ToolUseRequest = 6,
    ToolUseResult = 7,
    Acknowledgement = 8,
    Transcription = 9,
    ControlStop = 10,
    ControlVariation = 11,
    Configuration = 12,
    StartAnswer = 13,
    MemoryTrace = 14,
    Commentary = 15,
    AssistantSentence = 16,
    SyncRequest = 17,
    SyncResponse = 18,
    Feedback = 20,
    FeedbackConfirmation = 21,
    UserNote = 22,
    NoteConfirmation = 23,
    MemoryAction = 24,
    MemoryConfirmation = 25,
    ServerInfo = 26,
    SessionStats = 27,
    ConversationUpdate = 28,
    DimensionPreference = 30,
    EliteOptions = 31,
    OptimizationProgress = 32,
    EliteSelect = 33,
    Subscribe = 40,
    Unsubscribe = 41,
    SubscribeAck = 42,
    UnsubscribeAck = 43,
}

impl MessageType {
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            1 => Self::ErrorMessage,
            2 => Self::UserMessage,
            3 => Self::AssistantMessage,
            4 => Self::AudioChunk,
            5 => Self::ReasoningStep,
            6 => Self::ToolUseRequest,
            7 => Self::ToolUseResult,
            8 => Self::Acknowledgement,
            9 => Self::Transcription,
            10 => Self::ControlStop,
            11 => Self::ControlVariation,
            12 => Self::Configuration,
            13 => Self::StartAnswer,
            14 => Self::MemoryTrace,
            15 => Self::Commentary,
            16 => Self::AssistantSentence,
            17 => Self::SyncRequest,
            18 => Self::SyncResponse,
            20 => Self::Feedback,
            21 => Self::FeedbackConfirmation,
            22 => Self::UserNote,
            23 => Self::NoteConfirmation,
            24 => Self::MemoryAction,
            25 => Self::MemoryConfirmation,
            26 => Self::ServerInfo,
            27 => Self::SessionStats,
            28 => Self::ConversationUpdate,
            30 => Self::DimensionPreference,
            31 => Self::EliteOptions,
            32 => Self::OptimizationProgress,
            33 => Self::EliteSelect,
            40 => Self::Subscribe,
            41 => Self::Unsubscribe,
            42 => Self::SubscribeAck,
            43 => Self::UnsubscribeAck,
            _ => return None,
        })
    }
}

/// Polymorphic envelope body, modeled as a tagged sum over the type code
/// rather than a runtime-cast base class.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    ErrorMessage(ErrorMessage),
    UserMessage(ChatMessage),
    AssistantMessage(ChatMessage),
    AudioChunk(AudioChunk),
    ReasoningStep(ReasoningStep),
    ToolUseRequest(ToolUseRequest),
    ToolUseResult(ToolUseResult),
    Acknowledgement(Acknowledgement),
    Transcription(Transcription),
    ControlStop(ControlStop),
    ControlVariation(ControlVariation),
    Configuration(Configuration),
    StartAnswer(StartAnswer),
    MemoryTrace(MemoryTrace),
    Commentary(Commentary),
    AssistantSentence(AssistantSentence),
    SyncRequest(SyncRequest),
    SyncResponse(SyncResponse),
    Feedback(Feedback),
    FeedbackConfirmation(FeedbackConfirmation),
    UserNote(UserNote),
    NoteConfirmation(NoteConfirmation),
    MemoryAction(MemoryAction),
    MemoryConfirmation(MemoryConfirmation),
    ServerInfo(ServerInfo),
    SessionStats(SessionStats),
    ConversationUpdate(ConversationUpdate),
    DimensionPreference(DimensionPreference),
    EliteOptions(EliteOptions),
    OptimizationProgress(OptimizationProgress),
    EliteSelect(EliteSelect),
    Subscribe(Subscribe),
    Unsubscribe(Unsubscribe),
    SubscribeAck(SubscribeAck),
    UnsubscribeAck(UnsubscribeAck),
}

impl Message {
    pub fn type_code(&self) -> i64 {
        let t = match self {
            Message::ErrorMessage(_) => MessageType::ErrorMessage,
            Message::UserMessage(_) => MessageType::UserMessage,
            Message::AssistantMessage(_) => MessageType::AssistantMessage,
            Message::AudioChunk(_) => MessageType::AudioChunk,
            Message::ReasoningStep(_) => MessageType::ReasoningStep,
            Message::ToolUseRequest(_) => MessageType::ToolUseRequest,
            Message::ToolUseResult(_) => MessageType::ToolUseResult,
            Message::Acknowledgement(_) => MessageType::Acknowledgement,
            Message::Transcription(_) => MessageType::Transcription,
            Message::ControlStop(_) => MessageType::ControlStop,
            Message::ControlVariation(_) => MessageType::ControlVariation,
            Message::Configuration(_) => MessageType::Configuration,
            Message::StartAnswer(_) => MessageType::StartAnswer,
            Message::MemoryTrace(_) => MessageType::MemoryTrace,
            Message::Commentary(_) => MessageType::Commentary,
            Message::AssistantSentence(_) => MessageType::AssistantSentence,
            Message::SyncRequest(_) => MessageType::SyncRequest,
            Message::SyncResponse(_) => MessageType::SyncResponse,
            Message::Feedback(_) => MessageType::Feedback,
            Message::FeedbackConfirmation(_) => MessageType::FeedbackConfirmation,
            Message::UserNote(_) => MessageType::UserNote,
            Message::NoteConfirmation(_) => MessageType::NoteConfirmation,
            Message::MemoryAction(_) => MessageType::MemoryAction,
            Message::MemoryConfirmation(_) => MessageType::MemoryConfirmation,
            Message::ServerInfo(_) => MessageType::ServerInfo,
            Message::SessionStats(_) => MessageType::SessionStats,
            Message::ConversationUpdate(_) => MessageType::ConversationUpdate,
            Message::DimensionPreference(_) => MessageType::DimensionPreference,
            Message::EliteOptions(_) => MessageType::EliteOptions,
            Message::OptimizationProgress(_) => MessageType::OptimizationProgress,
            Message::EliteSelect(_) => MessageType::EliteSelect,
            Message::Subscribe(_) => MessageType::Subscribe,
            Message::Unsubscribe(_) => MessageType::Unsubscribe,
            Message::SubscribeAck(_) => MessageType::SubscribeAck,
            Message::UnsubscribeAck(_) => MessageType::UnsubscribeAck,
        };
        t as i64
    }

    pub(crate) fn encode(&self) -> rmpv::Value {
        match self {
            Message::ErrorMessage(b) => b.encode(),
            Message::UserMessage(b) => b.encode(),
            Message::AssistantMessage(b) => b.encode(),
            Message::AudioChunk(b) => b.encode(),
            Message::ReasoningStep(b) => b.encode(),
            Message::ToolUseRequest(b) => b.encode(),
            Message::ToolUseResult(b) => b.encode(),
            Message::Acknowledgement(b) => b.encode(),
            Message::Transcription(b) => b.encode(),
            Message::ControlStop(b) => b.encode(),
            Message::ControlVariation(b) => b.encode(),
            Message::Configuration(b) => b.encode(),
            Message::StartAnswer(b) => b.encode(),
            Message::MemoryTrace(b) => b.encode(),
            Message::Commentary(b) => b.encode(),
            Message::AssistantSentence(b) => b.encode(),
            Message::SyncRequest(b) => b.encode(),
            Message::SyncResponse(b) => b.encode(),
            Message::Feedback(b) => b.encode(),
            Message::FeedbackConfirmation(b) => b.encode(),
            Message::UserNote(b) => b.encode(),
            Message::NoteConfirmation(b) => b.encode(),
            Message::MemoryAction(b) => b.encode(),
            Message::MemoryConfirmation(b) => b.encode(),
            Message::ServerInfo(b) => b.encode(),
            Message::SessionStats(b) => b.encode(),
            Message::ConversationUpdate(b) => b.encode(),
            Message::DimensionPreference(b) => b.encode(),
            Message::EliteOptions(b) => b.encode(),
            Message::OptimizationProgress(b) => b.encode(),
            Message::EliteSelect(b) => b.encode(),
            Message::Subscribe(b) => b.encode(),
            Message::Unsubscribe(b) => b.encode(),
            Message::SubscribeAck(b) => b.encode(),
            Message::UnsubscribeAck(b) => b.encode(),
        }
    }

    pub(crate) fn decode(type_code: i64, body_raw: rmpv::Value) -> Result<Self, DecodeError> {
        let message_type = MessageType::from_code(type_code).ok_or(DecodeError::UnknownType(type_code))?;
        let entries = match body_raw {
            rmpv::Value::Map(entries) => entries,
            _ => return Err(DecodeError::FieldTypeMismatch {
                field: "body",
                expected: "map",
            }),
        };
        let t = FieldTable::from_rmpv_map(entries, "body")?;
        Ok(match message_type {
            MessageType::ErrorMessage => Message::ErrorMessage(ErrorMessage::decode(&t)?),
            MessageType::UserMessage => Message::UserMessage(ChatMessage::decode(&t, "UserMessage")?),
            MessageType::AssistantMessage => Message::AssistantMessage(ChatMessage::decode(&t, "AssistantMessage")?),
            MessageType::AudioChunk => Message::AudioChunk(AudioChunk::decode(&t)?),
            MessageType::ReasoningStep => Message::ReasoningStep(ReasoningStep::decode(&t)?),
            MessageType::ToolUseRequest => Message::ToolUseRequest(ToolUseRequest::decode(&t)?),
            MessageType::ToolUseResult => Message::ToolUseResult(ToolUseResult::decode(&t)?),
            MessageType::Acknowledgement => Message::Acknowledgement(Acknowledgement::decode(&t)?),
            MessageType::Transcription => Message::Transcription(Transcription::decode(&t)?),
            MessageType::ControlStop => Message::ControlStop(ControlStop::decode(&t)?),
            MessageType::ControlVariation => Message::ControlVariation(ControlVariation::decode(&t)?),
            MessageType::Configuration => Message::Configuration(Configuration::decode(&t)?),
            MessageType::StartAnswer => Message::StartAnswer(StartAnswer::decode(&t)?),
            MessageType::MemoryTrace => Message::MemoryTrace(MemoryTrace::decode(&t)?),
            MessageType::Commentary => Message::Commentary(Commentary::decode(&t)?),
            MessageType::AssistantSentence => Message::AssistantSentence(AssistantSentence::decode(&t)?),
            MessageType::SyncRequest => Message::SyncRequest(SyncRequest::decode(&t)?),
            MessageType::SyncResponse => Message::SyncResponse(SyncResponse::decode(&t)?),
            MessageType::Feedback => Message::Feedback(Feedback::decode(&t)?),
            MessageType::FeedbackConfirmation => Message::FeedbackConfirmation(FeedbackConfirmation::decode(&t)?),
            MessageType::UserNote => Message::UserNote(UserNote::decode(&t)?),
            MessageType::NoteConfirmation => Message::NoteConfirmation(NoteConfirmation::decode(&t)?),
            MessageType::MemoryAction => Message::MemoryAction(MemoryAction::decode(&t)?),
            MessageType::MemoryConfirmation => Message::MemoryConfirmation(MemoryConfirmation::decode(&t)?),
            MessageType::ServerInfo => Message::ServerInfo(ServerInfo::decode(&t)?),
            MessageType::SessionStats => Message::SessionStats(SessionStats::decode(&t)?),
            MessageType::ConversationUpdate => Message::ConversationUpdate(ConversationUpdate::decode(&t)?),
            MessageType::DimensionPreference => Message::DimensionPreference(DimensionPreference::decode(&t)?),
            MessageType::EliteOptions => Message::EliteOptions(EliteOptions::decode(&t)?),
            MessageType::OptimizationProgress => Message::OptimizationProgress(OptimizationProgress::decode(&t)?),
            MessageType::EliteSelect => Message::EliteSelect(EliteSelect::decode(&t)?),
            MessageType::Subscribe => Message::Subscribe(Subscribe::decode(&t)?),
            MessageType::Unsubscribe => Message::Unsubscribe(Unsubscribe::decode(&t)?),
            MessageType::SubscribeAck => Message::SubscribeAck(SubscribeAck::decode(&t)?),
            MessageType::UnsubscribeAck => Message::UnsubscribeAck(UnsubscribeAck::decode(&t)?),
        })
    }
}

//! Observable session state: a single-writer, many-reader broadcast of
//! everything the UI (or any other observer) needs to react to, replacing
//! the platform-specific state-flow primitives the redesign note calls out.

use tokio::sync::broadcast;

use crate::catalogue::bodies::{Commentary, ErrorMessage, MemoryTrace, ReasoningStep};
use crate::error::SessionError;
use crate::session::state::SessionState;

/// Default capacity for the session's broadcast channel. A slow or absent
/// subscriber simply misses older events rather than backpressuring the
/// session loop, which must never block on UI consumption.
pub const RUNTIME_EVENT_CHANNEL_CAPACITY: usize = 256;

/// One published change to session-observable state.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    StateChanged { from: SessionState, to: SessionState },
    TranscriptionUpdated { conversation_id: String, text: String, is_final: bool },
    /// A finalized transcription was held for its grace period and is now
    /// the official user message for the turn (no separate `UserMessage` is
    /// synthesised).
    UserMessageFinalized { conversation_id: String, text: String },
    StreamSentenceAssembled { conversation_id: String, message_id: String, sequence: i32 },
    StreamCompleted { conversation_id: String, message_id: String, full_text: String },
    ReasoningStepRecorded { conversation_id: String, step: ReasoningStep },
    ToolUsageUpdated { conversation_id: String, request_id: String },
    MemoryTraceRecorded { conversation_id: String, trace: MemoryTrace },
    CommentaryRecorded { conversation_id: String, commentary: Commentary },
    /// A previously-sent user message was superseded by a new one as the
    /// result of a `sendEdit` edit flow (testable scenario 3's "emitted
    /// side-effect hook").
    MessageSuperseded { previous_id: String, new_id: String },
    ControlAckReceived { stanza_id: i64, success: bool },
    ServerErrorReported { error: ErrorMessage },
    SessionErrorReported { error: SessionError },
}

pub fn channel() -> (broadcast::Sender<RuntimeEvent>, broadcast::Receiver<RuntimeEvent>) {
    broadcast::channel(RUNTIME_EVENT_CHANNEL_CAPACITY)
}

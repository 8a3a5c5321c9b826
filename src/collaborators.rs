//! External collaborators, passed to [`crate::session::controller::VoiceController`]
//! as explicit constructor parameters rather than resolved through a global
//! service locator.
//!
//! Each trait is a thin interface: the concrete audio hardware, wake-word
//! model, persistence layer, and settings store all live outside this
//! crate's scope (see the non-goals) and are supplied by the host app.

use std::pin::Pin;

use async_trait::async_trait;
use tokio_stream::Stream;

use crate::error::{SessionError, TransportError};

/// One inbound media-link event.
#[derive(Debug, Clone)]
pub enum MediaLinkEvent {
    Connected,
    Reconnecting,
    Disconnected,
    /// A full envelope's raw bytes arrived on the reliable channel.
    DataReceived(Vec<u8>),
    /// The remote side started or stopped producing audible speech.
    RemoteSpeechStarted,
    RemoteSpeechEnded,
}

/// One captured frame of microphone audio, already encoded by the
/// platform's audio pipeline (opus or equivalent) — DSP itself is out of
/// scope here.
#[derive(Debug, Clone)]
pub struct AudioFrame {
    pub sequence: i32,
    pub data: Vec<u8>,
    pub is_last: bool,
}

/// The real-time media transport: reliable binary datagrams plus audio
/// track publication and reconnection events.
#[async_trait]
pub trait MediaLink: Send + Sync {
    async fn connect(&self, conversation_id: &str, token: &str, room_name: &str) -> Result<(), TransportError>;
    async fn disconnect(&self);
    async fn send_bytes(&self, bytes: Vec<u8>) -> Result<(), TransportError>;
    async fn publish_audio_frame(&self, frame: AudioFrame) -> Result<(), TransportError>;
    /// Pull the next event off the link. Returns `None` once the link has
    /// been permanently closed (never after `disconnect` is later reused).
    async fn next_event(&self) -> Option<MediaLinkEvent>;
    fn is_connected(&self) -> bool;
}

/// On-device wake-phrase detector.
#[async_trait]
pub trait WakeSource: Send + Sync {
    async fn start(&self, wake_word: &str, sensitivity: f32);
    async fn pause(&self);
    async fn resume(&self);
    /// Resolves the next time the configured wake phrase is detected.
    async fn next_detection(&self);
}

/// A freshly issued conversation token, scoped to one `MediaLink` session.
#[derive(Debug, Clone)]
pub struct ConversationToken {
    pub token: String,
    pub room_name: String,
    pub expires_at: i64,
}

/// An opaque persisted conversation record returned by `createConversation`.
#[derive(Debug, Clone)]
pub struct ConversationRecord {
    pub id: String,
    pub title: Option<String>,
}

/// One persisted turn, as handed back by `messagesFor`.
#[derive(Debug, Clone)]
pub struct ConversationMessage {
    pub role: String,
    pub content: String,
    pub timestamp: i64,
}

/// A `messagesFor` result: an ordered stream of previously persisted turns.
pub type MessageStream = Pin<Box<dyn Stream<Item = ConversationMessage> + Send>>;

/// Persistence of conversation history and message records. Concrete
/// storage (schema, migrations) is out of scope; this crate only needs the
/// read/write surface the session loop depends on.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn create_conversation(&self, title: Option<String>) -> Result<ConversationRecord, SessionError>;
    async fn get_conversation_token(&self, conversation_id: &str) -> Result<ConversationToken, SessionError>;
    async fn insert_message(&self, conversation_id: &str, role: &str, content: &str) -> Result<(), SessionError>;
    /// Previously persisted turns for a conversation, oldest first.
    fn messages_for(&self, conversation_id: &str) -> MessageStream;
    async fn send_text_message(&self, conversation_id: &str, content: &str) -> Result<(), SessionError>;
}

/// User-configurable settings the session consults on `activate`/reconnect.
#[async_trait]
pub trait Settings: Send + Sync {
    async fn wake_word(&self) -> String;
    /// Clamped to `[0.0, 1.0]` by the caller before being handed to
    /// [`WakeSource::start`].
    async fn wake_word_sensitivity(&self) -> f32;
    async fn server_url(&self) -> String;
    async fn audio_output_enabled(&self) -> bool;
}

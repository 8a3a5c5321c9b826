//! Wire protocol codec and session orchestrator for a voice-and-text
//! conversational assistant's Android client.
//!
//! # Architecture
//!
//! Five components, in dependency order (leaves first):
//! - **Envelope codec** ([`envelope`], [`wire`], [`value`]): bijective
//!   MessagePack serialisation for the 5-field envelope and its per-type
//!   bodies.
//! - **Message catalogue** ([`catalogue`]): the closed registry of numeric
//!   type codes to body shapes, including wire-aliased enums.
//! - **Stanza sequencer** ([`sequencer`]): outbound/inbound stanza id
//!   bookkeeping and reconnect resume tracking.
//! - **Session state machine** ([`session`]): the `VoiceController`
//!   orchestrator — voice-state transitions, stream assembly, control flows.
//! - **Subscription manager** ([`subscription`]): per-conversation
//!   Subscribe/Unsubscribe lifecycle on multiplexed transports.
//!
//! External collaborators ([`collaborators`]) are passed into the session as
//! explicit constructor parameters: `MediaLink`, `WakeSource`,
//! `ConversationStore`, `Settings`.

pub mod catalogue;
pub mod collaborators;
pub mod config;
pub mod envelope;
pub mod error;
pub mod runtime;
pub mod sequencer;
pub mod session;
pub mod subscription;
pub mod value;
pub mod wire;

pub use catalogue::{Message, MessageType};
pub use collaborators::{ConversationStore, MediaLink, Settings, WakeSource};
pub use envelope::Envelope;
pub use error::{DecodeError, EncodeError, SessionError, TransportError};
pub use runtime::RuntimeEvent;
pub use session::{ConversationView, SessionState, VoiceController};

//! The `VoiceController` session core: voice-state machine, per-conversation
//! view, the orchestrator loop, and its internal timers.

pub mod controller;
pub mod conversation;
pub mod state;
pub mod timers;

pub use controller::VoiceController;
pub use conversation::ConversationView;
pub use state::SessionState;

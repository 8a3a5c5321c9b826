//! `VoiceController`: the session orchestrator. Owns all mutable session
//! state on a single `tokio::task`; every other entry point is a message
//! sent across a channel into that task's `tokio::select!` loop.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::catalogue::bodies::{
    ChatMessage, ControlStop, ControlVariation, Configuration as ConfigurationBody,
};
use crate::catalogue::enums::{StopType, VariationMode};
use crate::catalogue::Message;
use crate::collaborators::{ConversationStore, MediaLink, MediaLinkEvent, Settings, WakeSource};
use crate::config::{ClientIdentity, SessionTiming, SettingsSnapshot, DEFAULT_FEATURES};
use crate::envelope::Envelope;
use crate::error::SessionError;
use crate::runtime::{self, RuntimeEvent};
use crate::sequencer::StanzaSequencer;
use crate::session::conversation::ConversationView;
use crate::session::state::SessionState;
use crate::session::timers::Deadline;
use crate::subscription::SubscriptionManager;

/// Requests the session loop processes. Every suspending public operation on
/// [`VoiceController`] is a thin wrapper that sends one of these and, where
/// the caller needs a result, awaits a oneshot reply.
enum Command {
    Activate,
    Deactivate,
    Shutdown,
    SendText(String),
    SendStop,
    SendRegenerate { target_id: String },
    SendEdit { target_id: String, new_content: String },
    Subscribe { conversation_id: String, from_sequence: Option<i32> },
    Unsubscribe { conversation_id: String },
}

/// Handle to a running session. Cheap to clone; every clone shares the same
/// underlying loop task.
#[derive(Clone)]
pub struct VoiceController {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<RuntimeEvent>,
}

impl VoiceController {
    /// Spawn the session loop task and return a handle to it.
    pub fn spawn(
        media_link: Arc<dyn MediaLink>,
        wake_source: Arc<dyn WakeSource>,
        store: Arc<dyn ConversationStore>,
        settings: Arc<dyn Settings>,
    ) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel(32);
        let (events_tx, _) = runtime::channel();
        let loop_events_tx = events_tx.clone();

        let session_loop = SessionLoop {
            state: SessionState::Idle,
            conversation: None,
            sequencer: StanzaSequencer::new(),
            subscriptions: SubscriptionManager::new(),
            settings_snapshot: SettingsSnapshot::default(),
            identity: ClientIdentity::default(),
            timing: SessionTiming::default(),
            events: loop_events_tx,
            media_link,
            wake_source,
            store,
            settings,
            silence_deadline: Deadline::disarmed(),
            end_of_conversation_deadline: Deadline::disarmed(),
            edit_follow_up_deadline: Deadline::disarmed(),
            transcription_final_deadline: Deadline::disarmed(),
            stream_final_deadline: Deadline::disarmed(),
            pending_edit: None,
            pending_final_transcription: None,
            pending_stream_completion: None,
            silence_elapsed: std::time::Duration::ZERO,
            decode_error_log: VecDeque::new(),
        };

        tokio::spawn(session_loop.run(commands_rx));

        VoiceController {
            commands: commands_tx,
            events: events_tx,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.events.subscribe()
    }

    pub async fn activate(&self) {
        let _ = self.commands.send(Command::Activate).await;
    }

    pub async fn deactivate(&self) {
        let _ = self.commands.send(Command::Deactivate).await;
    }

    pub async fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown).await;
    }

    pub async fn send_text(&self, content: impl Into<String>) {
        let _ = self.commands.send(Command::SendText(content.into())).await;
    }

    pub async fn send_stop(&self) {
        let _ = self.commands.send(Command::SendStop).await;
    }

    pub async fn send_regenerate(&self, target_id: impl Into<String>) {
        let _ = self
            .commands
            .send(Command::SendRegenerate { target_id: target_id.into() })
            .await;
    }

    pub async fn send_edit(&self, target_id: impl Into<String>, new_content: impl Into<String>) {
        let _ = self
            .commands
            .send(Command::SendEdit {
                target_id: target_id.into(),
                new_content: new_content.into(),
            })
            .await;
    }

    pub async fn subscribe_conversation(&self, conversation_id: impl Into<String>, from_sequence: Option<i32>) {
        let _ = self
            .commands
            .send(Command::Subscribe {
                conversation_id: conversation_id.into(),
                from_sequence,
            })
            .await;
    }

    pub async fn unsubscribe_conversation(&self, conversation_id: impl Into<String>) {
        let _ = self
            .commands
            .send(Command::Unsubscribe {
                conversation_id: conversation_id.into(),
            })
            .await;
    }
}

struct SessionLoop {
    state: SessionState,
    conversation: Option<ConversationView>,
    sequencer: StanzaSequencer,
    subscriptions: SubscriptionManager,
    settings_snapshot: SettingsSnapshot,
    identity: ClientIdentity,
    timing: SessionTiming,
    events: broadcast::Sender<RuntimeEvent>,
    media_link: Arc<dyn MediaLink>,
    wake_source: Arc<dyn WakeSource>,
    store: Arc<dyn ConversationStore>,
    settings: Arc<dyn Settings>,
    silence_deadline: Deadline,
    end_of_conversation_deadline: Deadline,
    edit_follow_up_deadline: Deadline,
    transcription_final_deadline: Deadline,
    stream_final_deadline: Deadline,
    /// The id of the message being edited, while a `sendEdit` awaits its
    /// follow-up `UserMessage`.
    pending_edit: Option<String>,
    /// Text of a `Transcription{final=true}` held during its grace period,
    /// before it becomes the turn's official user message.
    pending_final_transcription: Option<String>,
    /// `(conversation_id, message_id)` of the stream whose final sentence
    /// was seen and is now waiting out its 500ms grace for gap-filling
    /// sentences before `reconstruct_answer`/`clear_stream` runs.
    pending_stream_completion: Option<(String, String)>,
    /// Accumulated no-voice-activity duration against the 1500ms silence
    /// threshold; advanced by `silence_watchdog_tick` (200ms) ticks and
    /// reset whenever voice activity is observed.
    silence_elapsed: std::time::Duration,
    decode_error_log: VecDeque<Instant>,
}

impl SessionLoop {
    async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        loop {
            tokio::select! {
                cmd = commands.recv() => {
                    match cmd {
                        Some(Command::Shutdown) => {
                            self.deactivate().await;
                            self.transition(SessionState::Idle);
                            return;
                        }
                        Some(cmd) => self.handle_command(cmd).await,
                        None => return,
                    }
                }
                event = self.media_link.next_event() => {
                    match event {
                        Some(ev) => self.handle_media_link_event(ev).await,
                        None => return,
                    }
                }
                _ = self.wake_source.next_detection(), if self.state == SessionState::ListeningForWakeWord => {
                    self.on_wake_detected().await;
                }
                _ = self.silence_deadline.wait(), if self.silence_deadline.is_armed() => {
                    self.on_silence_tick().await;
                }
                _ = self.end_of_conversation_deadline.wait(), if self.end_of_conversation_deadline.is_armed() => {
                    self.on_end_of_conversation().await;
                }
                _ = self.edit_follow_up_deadline.wait(), if self.edit_follow_up_deadline.is_armed() => {
                    self.on_edit_follow_up_timeout();
                }
                _ = self.transcription_final_deadline.wait(), if self.transcription_final_deadline.is_armed() => {
                    self.on_transcription_final_grace_elapsed();
                }
                _ = self.stream_final_deadline.wait(), if self.stream_final_deadline.is_armed() => {
                    self.on_stream_final_grace_elapsed().await;
                }
            }
        }
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Activate => self.activate().await,
            Command::Deactivate => self.deactivate().await,
            Command::Shutdown => unreachable!("handled in run()"),
            Command::SendText(content) => self.send_text(content).await,
            Command::SendStop => self.send_stop().await,
            Command::SendRegenerate { target_id } => self.send_regenerate(target_id).await,
            Command::SendEdit { target_id, new_content } => self.send_edit(target_id, new_content).await,
            Command::Subscribe { conversation_id, from_sequence } => self.subscribe(conversation_id, from_sequence).await,
            Command::Unsubscribe { conversation_id } => self.unsubscribe(conversation_id).await,
        }
    }

    fn transition(&mut self, to: SessionState) {
        if self.state == to {
            return;
        }
        match self.state.validate_transition(to) {
            Ok(()) => {
                let from = self.state;
                self.state = to;
                let _ = self.events.send(RuntimeEvent::StateChanged { from, to });
            }
            Err(err) => {
                warn!(?err, "illegal state transition suppressed");
                let _ = self.events.send(RuntimeEvent::SessionErrorReported { error: err });
            }
        }
    }

    // -- Activation / teardown -------------------------------------------------

    async fn activate(&mut self) {
        self.settings_snapshot = SettingsSnapshot {
            wake_word: self.settings.wake_word().await,
            wake_word_sensitivity: self.settings.wake_word_sensitivity().await,
            server_url: self.settings.server_url().await,
            audio_output_enabled: self.settings.audio_output_enabled().await,
        };
        self.transition(SessionState::ListeningForWakeWord);
        self.wake_source
            .start(&self.settings_snapshot.wake_word, self.settings_snapshot.clamped_sensitivity())
            .await;
    }

    async fn deactivate(&mut self) {
        self.wake_source.pause().await;
        self.media_link.disconnect().await;
        self.silence_deadline.cancel();
        self.silence_elapsed = std::time::Duration::ZERO;
        self.end_of_conversation_deadline.cancel();
        self.edit_follow_up_deadline.cancel();
        self.transcription_final_deadline.cancel();
        self.stream_final_deadline.cancel();
        self.pending_edit = None;
        self.pending_final_transcription = None;
        self.pending_stream_completion = None;
        if let Some(conv) = self.conversation.take() {
            self.subscriptions.unsubscribe(&conv.conversation_id);
        }
        self.transition(SessionState::ListeningForWakeWord);
    }

    async fn on_wake_detected(&mut self) {
        self.wake_source.pause().await;
        self.transition(SessionState::Activated);

        let record = match self.store.create_conversation(None).await {
            Ok(r) => r,
            Err(err) => {
                warn!(?err, "conversation creation failed, deactivating");
                self.report_session_error(err);
                self.deactivate().await;
                return;
            }
        };
        let token = match self.store.get_conversation_token(&record.id).await {
            Ok(t) => t,
            Err(err) => {
                warn!(?err, "conversation token acquisition failed, deactivating");
                self.report_session_error(err);
                self.deactivate().await;
                return;
            }
        };
        if let Err(err) = self.media_link.connect(&record.id, &token.token, &token.room_name).await {
            warn!(?err, "media link connect failed, deactivating");
            self.deactivate().await;
            return;
        }

        self.conversation = Some(ConversationView::new(record.id.clone()));
        self.transition(SessionState::Listening);
        self.arm_silence_watchdog();
        self.send_configuration(&record.id, 0).await;
    }

    /// (Re-)start the 200ms watchdog tick with the accumulated no-voice-activity
    /// duration reset to zero. The watchdog only transitions `Listening ->
    /// Processing` once `silence_threshold` (1500ms) worth of ticks have
    /// accumulated without an intervening voice-activity reset.
    fn arm_silence_watchdog(&mut self) {
        self.silence_elapsed = std::time::Duration::ZERO;
        self.silence_deadline.arm(self.timing.silence_watchdog_tick);
    }

    async fn send_configuration(&mut self, conversation_id: &str, last_sequence_seen: i32) {
        let body = ConfigurationBody {
            conversation_id: Some(conversation_id.to_owned()),
            last_sequence_seen: Some(last_sequence_seen),
            client_version: Some(self.identity.client_version.clone()),
            preferred_language: self.identity.preferred_language.clone(),
            device: Some(self.identity.device.clone()),
            features: Some(DEFAULT_FEATURES.iter().map(|s| (*s).to_owned()).collect()),
        };
        self.send_envelope(conversation_id, Message::Configuration(body)).await;
    }

    // -- Outbound control operations --------------------------------------------

    async fn send_text(&mut self, content: String) {
        let Some(conv) = self.conversation.as_ref().map(|c| c.conversation_id.clone()) else {
            self.report_session_error(SessionError::NoActiveConversation);
            return;
        };
        let new_id = uuid::Uuid::new_v4().to_string();
        if let Some(superseded) = self.pending_edit.take() {
            self.edit_follow_up_deadline.cancel();
            let _ = self.events.send(RuntimeEvent::MessageSuperseded {
                previous_id: superseded,
                new_id: new_id.clone(),
            });
        }
        let body = ChatMessage {
            id: new_id,
            previous_id: None,
            conversation_id: conv.clone(),
            content,
            timestamp: None,
        };
        self.send_envelope(&conv, Message::UserMessage(body)).await;
    }

    async fn send_stop(&mut self) {
        let Some(conv) = self.conversation.as_ref().map(|c| c.conversation_id.clone()) else {
            warn!("sendStop with no active conversation, dropped");
            return;
        };
        let body = ControlStop {
            conversation_id: conv.clone(),
            target_id: None,
            reason: Some("User requested stop".to_owned()),
            stop_type: StopType::All,
        };
        self.send_envelope(&conv, Message::ControlStop(body)).await;
    }

    async fn send_regenerate(&mut self, target_id: String) {
        let Some(conv) = self.conversation.as_ref().map(|c| c.conversation_id.clone()) else {
            warn!("sendRegenerate with no active conversation, dropped");
            return;
        };
        let body = ControlVariation {
            conversation_id: conv.clone(),
            target_id,
            mode: VariationMode::Regenerate,
            new_content: None,
        };
        self.send_envelope(&conv, Message::ControlVariation(body)).await;
    }

    async fn send_edit(&mut self, target_id: String, new_content: String) {
        let Some(conv) = self.conversation.as_ref().map(|c| c.conversation_id.clone()) else {
            warn!("sendEdit with no active conversation, dropped");
            return;
        };
        let body = ControlVariation {
            conversation_id: conv.clone(),
            target_id: target_id.clone(),
            mode: VariationMode::Edit,
            new_content: Some(new_content),
        };
        self.send_envelope(&conv, Message::ControlVariation(body)).await;
        self.pending_edit = Some(target_id);
        self.edit_follow_up_deadline.arm(self.timing.edit_follow_up_timeout);
    }

    /// A finalized transcription's 1000ms grace has elapsed: clear the live
    /// transcription and hand the held text off as the turn's official user
    /// message. No separate `UserMessage` is synthesised per spec.
    fn on_transcription_final_grace_elapsed(&mut self) {
        self.transcription_final_deadline.cancel();
        let Some(text) = self.pending_final_transcription.take() else {
            return;
        };
        let Some(conv) = self.conversation.as_mut() else {
            return;
        };
        conv.current_transcription.clear();
        conv.pending_user_text = Some(text.clone());
        let _ = self.events.send(RuntimeEvent::UserMessageFinalized {
            conversation_id: conv.conversation_id.clone(),
            text,
        });
    }

    /// Pair the turn's held user text (if any) with a completed assistant
    /// answer and persist both through `ConversationStore`. Mirrors the
    /// teacher's `append_conversation_turn`/snapshot-entry pairing, minus the
    /// in-memory turn list this crate has no further use for (`insert_message`
    /// is the persistence boundary here, not an in-process history vector).
    async fn persist_conversation_turn(&mut self, conversation_id: &str, assistant_text: &str) {
        let user_text = self.conversation.as_mut().and_then(|c| c.pending_user_text.take());
        if let Some(user_text) = user_text.as_deref().filter(|t| !t.trim().is_empty()) {
            if let Err(err) = self.store.insert_message(conversation_id, "user", user_text).await {
                warn!(?err, "failed to persist user turn");
            }
        }
        if !assistant_text.trim().is_empty() {
            if let Err(err) = self.store.insert_message(conversation_id, "assistant", assistant_text).await {
                warn!(?err, "failed to persist assistant turn");
            }
        }
    }

    fn on_edit_follow_up_timeout(&mut self) {
        self.edit_follow_up_deadline.cancel();
        if self.pending_edit.take().is_some() {
            self.report_session_error(SessionError::EditFollowUpTimeout);
        }
    }

    async fn send_envelope(&mut self, conversation_id: &str, body: Message) {
        if !self.media_link.is_connected() {
            self.report_session_error(SessionError::NoActiveConversation);
            return;
        }
        let stanza_id = self.sequencer.next_outbound_id();
        let envelope = Envelope::new(stanza_id, conversation_id, body);
        match envelope.encode() {
            Ok(bytes) => {
                if let Err(err) = self.media_link.send_bytes(bytes).await {
                    warn!(?err, "send over media link failed");
                }
            }
            Err(err) => warn!(?err, "failed to encode outbound envelope"),
        }
    }

    // -- Subscriptions -----------------------------------------------------------

    async fn subscribe(&mut self, conversation_id: String, from_sequence: Option<i32>) {
        match self.subscriptions.subscribe(&conversation_id, from_sequence) {
            crate::subscription::SubscribeOutcome::Emit(message) => {
                self.send_envelope(&conversation_id, message).await;
            }
            crate::subscription::SubscribeOutcome::NoOp => {
                debug!(%conversation_id, "subscribe is a no-op, already pending or active");
            }
        }
    }

    async fn unsubscribe(&mut self, conversation_id: String) {
        let message = self.subscriptions.unsubscribe(&conversation_id);
        self.send_envelope(&conversation_id, message).await;
    }

    // -- Inbound dispatch ----------------------------------------------------

    async fn handle_media_link_event(&mut self, event: MediaLinkEvent) {
        match event {
            MediaLinkEvent::Connected => {
                let reconnecting = self.state == SessionState::Connecting;
                self.transition(SessionState::Listening);
                if reconnecting {
                    if let Some(conversation_id) = self.conversation.as_ref().map(|c| c.conversation_id.clone()) {
                        let last_sequence_seen = self.sequencer.last_sequence_seen_magnitude();
                        self.send_configuration(&conversation_id, last_sequence_seen).await;
                    }
                }
            }
            MediaLinkEvent::Reconnecting => self.transition(SessionState::Connecting),
            MediaLinkEvent::Disconnected => {
                self.transition(SessionState::Disconnected);
            }
            MediaLinkEvent::DataReceived(bytes) => self.handle_inbound_bytes(&bytes).await,
            MediaLinkEvent::RemoteSpeechStarted => self.transition(SessionState::Speaking),
            MediaLinkEvent::RemoteSpeechEnded => self.transition(SessionState::Listening),
        }
    }

    async fn handle_inbound_bytes(&mut self, bytes: &[u8]) {
        let envelope = match Envelope::decode(bytes) {
            Ok(e) => e,
            Err(err) => {
                self.record_decode_error();
                warn!(?err, "dropping malformed inbound envelope");
                return;
            }
        };

        if envelope.stanza_id < 0 {
            if !self.sequencer.observe_server_stanza(envelope.stanza_id) {
                debug!(stanza_id = envelope.stanza_id, "dropping duplicate/stale server stanza");
                return;
            }
        }

        if !self.subscriptions.accepts(&envelope.conversation_id)
            && self.conversation.as_ref().map(|c| c.conversation_id.as_str()) != Some(envelope.conversation_id.as_str())
        {
            debug!(conversation_id = %envelope.conversation_id, "dropping envelope for inactive conversation");
            return;
        }

        self.dispatch_message(envelope).await;
    }

    fn record_decode_error(&mut self) {
        let now = Instant::now();
        self.decode_error_log.push_back(now);
        while let Some(&front) = self.decode_error_log.front() {
            if now.duration_since(front) > self.timing.decode_error_burst_window {
                self.decode_error_log.pop_front();
            } else {
                break;
            }
        }
        if self.decode_error_log.len() > self.timing.decode_error_burst_threshold {
            warn!("malformed envelope burst threshold exceeded, entering Error state");
            self.transition(SessionState::Error);
        }
    }

    async fn dispatch_message(&mut self, envelope: Envelope) {
        let conversation_id = envelope.conversation_id.clone();
        match envelope.body {
            Message::StartAnswer(body) => {
                if let Some(conv) = self.conversation.as_mut() {
                    conv.clear_stream();
                    conv.generating = true;
                }
                self.stream_final_deadline.cancel();
                self.pending_stream_completion = None;
                self.transition(SessionState::Processing);
                debug!(id = %body.id, "StartAnswer received");
            }
            Message::AssistantSentence(body) => {
                if let Some(conv) = self.conversation.as_mut() {
                    conv.insert_sentence(body.sequence, body.text.clone());
                }
                if body.audio.is_some() && self.state == SessionState::Processing {
                    self.transition(SessionState::Speaking);
                }
                let _ = self.events.send(RuntimeEvent::StreamSentenceAssembled {
                    conversation_id: conversation_id.clone(),
                    message_id: body.previous_id.clone(),
                    sequence: body.sequence,
                });
                if body.is_final == Some(true) {
                    self.start_stream_completion_grace(&conversation_id, &body.previous_id);
                }
            }
            Message::AssistantMessage(body) => {
                self.persist_conversation_turn(&conversation_id, &body.content).await;
                let _ = self.events.send(RuntimeEvent::StreamCompleted {
                    conversation_id: conversation_id.clone(),
                    message_id: body.id,
                    full_text: body.content,
                });
                self.transition(SessionState::Listening);
            }
            Message::Transcription(body) => {
                if let Some(conv) = self.conversation.as_mut() {
                    conv.current_transcription = body.text.clone();
                }
                if body.is_final {
                    self.pending_final_transcription = Some(body.text.clone());
                    self.transcription_final_deadline.arm(self.timing.transcription_final_grace);
                } else {
                    self.transcription_final_deadline.cancel();
                    self.pending_final_transcription = None;
                }
                let _ = self.events.send(RuntimeEvent::TranscriptionUpdated {
                    conversation_id: conversation_id.clone(),
                    text: body.text,
                    is_final: body.is_final,
                });
            }
            Message::ErrorMessage(body) => {
                let recoverable = body.recoverable;
                if let Some(conv) = self.conversation.as_mut() {
                    conv.append_error(body.clone());
                }
                let _ = self.events.send(RuntimeEvent::ServerErrorReported { error: body });
                if !recoverable {
                    self.transition(SessionState::Error);
                    self.deactivate().await;
                }
            }
            Message::ReasoningStep(body) => {
                if let Some(conv) = self.conversation.as_mut() {
                    conv.dedupe_insert_reasoning_step(body.clone());
                }
                let _ = self.events.send(RuntimeEvent::ReasoningStepRecorded {
                    conversation_id,
                    step: body,
                });
            }
            Message::ToolUseRequest(body) => {
                let request_id = body.id.clone();
                if let Some(conv) = self.conversation.as_mut() {
                    conv.record_tool_request(body);
                }
                let _ = self.events.send(RuntimeEvent::ToolUsageUpdated { conversation_id, request_id });
            }
            Message::ToolUseResult(body) => {
                let request_id = body.request_id.clone();
                if let Some(conv) = self.conversation.as_mut() {
                    conv.record_tool_result(body);
                }
                let _ = self.events.send(RuntimeEvent::ToolUsageUpdated { conversation_id, request_id });
            }
            Message::MemoryTrace(body) => {
                if let Some(conv) = self.conversation.as_mut() {
                    conv.dedupe_append_memory_trace(body.clone());
                }
                let _ = self.events.send(RuntimeEvent::MemoryTraceRecorded { conversation_id, trace: body });
            }
            Message::Commentary(body) => {
                if let Some(conv) = self.conversation.as_mut() {
                    conv.dedupe_append_commentary(body.clone());
                }
                let _ = self.events.send(RuntimeEvent::CommentaryRecorded { conversation_id, commentary: body });
            }
            Message::Acknowledgement(body) => {
                let _ = self.events.send(RuntimeEvent::ControlAckReceived {
                    stanza_id: body.acknowledged_stanza_id as i64,
                    success: body.success,
                });
            }
            Message::SubscribeAck(ack) => self.subscriptions.on_subscribe_ack(&ack),
            Message::UnsubscribeAck(ack) => self.subscriptions.on_unsubscribe_ack(&ack),
            other => {
                debug!(type_code = other.type_code(), "no session-side handler for message type");
            }
        }
    }

    /// The final `AssistantSentence` for a stream has been seen. Arms the
    /// 500ms grace instead of blocking inline: gap-filling sentences with a
    /// lower `sequence` may still be in flight on the media link, and the
    /// session loop must keep dispatching them while the grace elapses, not
    /// stall the single task inside an inline sleep.
    fn start_stream_completion_grace(&mut self, conversation_id: &str, message_id: &str) {
        self.pending_stream_completion = Some((conversation_id.to_owned(), message_id.to_owned()));
        if !self.stream_final_deadline.is_armed() {
            self.stream_final_deadline.arm(self.timing.stream_final_grace);
        }
    }

    /// The 500ms post-final-sentence grace has elapsed: any gap-filling
    /// sentences that arrived during the grace have already been folded into
    /// `streaming_sentences` by the ordinary `AssistantSentence` dispatch arm,
    /// so reconstruction now reads the complete, correctly-ordered answer.
    async fn on_stream_final_grace_elapsed(&mut self) {
        self.stream_final_deadline.cancel();
        let Some((conversation_id, message_id)) = self.pending_stream_completion.take() else {
            return;
        };
        let full_text = self
            .conversation
            .as_ref()
            .map(ConversationView::reconstruct_answer)
            .unwrap_or_default();
        if let Some(conv) = self.conversation.as_mut() {
            conv.clear_stream();
        }
        self.persist_conversation_turn(&conversation_id, &full_text).await;
        let _ = self.events.send(RuntimeEvent::StreamCompleted {
            conversation_id,
            message_id,
            full_text,
        });
        self.transition(SessionState::Speaking);
        self.end_of_conversation_deadline.arm(self.timing.end_of_conversation_silence);
    }

    /// One 200ms watchdog tick while `Listening`. Re-arms itself until
    /// `silence_threshold` (1500ms) worth of ticks have accumulated with no
    /// intervening voice activity, only then transitioning to `Processing`.
    async fn on_silence_tick(&mut self) {
        self.silence_deadline.cancel();
        if self.state != SessionState::Listening {
            self.silence_elapsed = std::time::Duration::ZERO;
            return;
        }
        self.silence_elapsed += self.timing.silence_watchdog_tick;
        if self.silence_elapsed >= self.timing.silence_threshold {
            self.silence_elapsed = std::time::Duration::ZERO;
            self.transition(SessionState::Processing);
        } else {
            self.silence_deadline.arm(self.timing.silence_watchdog_tick);
        }
    }

    async fn on_end_of_conversation(&mut self) {
        self.end_of_conversation_deadline.cancel();
        if self.state == SessionState::Speaking {
            self.deactivate().await;
        }
    }

    fn report_session_error(&mut self, error: SessionError) {
        let _ = self.events.send(RuntimeEvent::SessionErrorReported { error });
    }
}

#[allow(dead_code)]
fn assert_controller_is_send_and_sync() {
    fn check<T: Send + Sync>() {}
    check::<VoiceController>();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_enum_is_exhaustively_handled_by_handle_command() {
        // A compile-time check: handle_command's match has no wildcard arm
        // (other than the unreachable Shutdown case), so every Command
        // variant added here must be handled explicitly.
        let _ = std::mem::size_of::<Command>();
    }
}

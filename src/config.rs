//! Configuration for the voice session: a serde-backed mirror of the
//! `Settings` collaborator plus the internal timing tunables the session
//! loop runs on.

use serde::{Deserialize, Serialize};

use crate::session::timers;

/// Static mirror of the `Settings` collaborator's current values, snapshot
/// at `activate()`/reconnect time rather than read live on every decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsSnapshot {
    pub wake_word: String,
    pub wake_word_sensitivity: f32,
    pub server_url: String,
    pub audio_output_enabled: bool,
}

impl Default for SettingsSnapshot {
    fn default() -> Self {
        SettingsSnapshot {
            wake_word: "hey_assistant".to_owned(),
            wake_word_sensitivity: 0.5,
            server_url: String::new(),
            audio_output_enabled: true,
        }
    }
}

impl SettingsSnapshot {
    /// Clamp sensitivity into the `[0.0, 1.0]` range the `Settings`
    /// collaborator's contract promises but does not itself enforce.
    pub fn clamped_sensitivity(&self) -> f32 {
        self.wake_word_sensitivity.clamp(0.0, 1.0)
    }

    /// Derive the `wss://…/livekit` media endpoint from an http(s) base URL.
    pub fn media_endpoint(&self) -> String {
        let without_scheme = self
            .server_url
            .strip_prefix("https://")
            .or_else(|| self.server_url.strip_prefix("http://"))
            .unwrap_or(&self.server_url);
        format!("wss://{}/livekit", without_scheme.trim_end_matches('/'))
    }
}

/// Session-internal timing tunables. Defaults mirror the values the
/// concurrency model names explicitly; overriding them is meant for tests,
/// not runtime reconfiguration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTiming {
    #[serde(with = "duration_millis")]
    pub silence_watchdog_tick: std::time::Duration,
    #[serde(with = "duration_millis")]
    pub silence_threshold: std::time::Duration,
    #[serde(with = "duration_millis")]
    pub end_of_conversation_silence: std::time::Duration,
    #[serde(with = "duration_millis")]
    pub edit_follow_up_timeout: std::time::Duration,
    #[serde(with = "duration_millis")]
    pub tool_request_timeout_default: std::time::Duration,
    #[serde(with = "duration_millis")]
    pub transcription_final_grace: std::time::Duration,
    #[serde(with = "duration_millis")]
    pub stream_final_grace: std::time::Duration,
    #[serde(with = "duration_millis")]
    pub decode_error_burst_window: std::time::Duration,
    pub decode_error_burst_threshold: usize,
}

impl Default for SessionTiming {
    fn default() -> Self {
        SessionTiming {
            silence_watchdog_tick: timers::SILENCE_WATCHDOG_TICK,
            silence_threshold: timers::SILENCE_THRESHOLD,
            end_of_conversation_silence: timers::END_OF_CONVERSATION_SILENCE,
            edit_follow_up_timeout: timers::EDIT_FOLLOW_UP_TIMEOUT,
            tool_request_timeout_default: timers::TOOL_REQUEST_TIMEOUT_DEFAULT,
            transcription_final_grace: timers::TRANSCRIPTION_FINAL_GRACE,
            stream_final_grace: timers::STREAM_FINAL_GRACE,
            decode_error_burst_window: timers::DECODE_ERROR_BURST_WINDOW,
            decode_error_burst_threshold: timers::DECODE_ERROR_BURST_THRESHOLD,
        }
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

/// Client identity sent in `Configuration` on connect/reconnect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientIdentity {
    pub client_version: String,
    pub device: String,
    pub preferred_language: Option<String>,
}

impl Default for ClientIdentity {
    fn default() -> Self {
        ClientIdentity {
            client_version: env!("CARGO_PKG_VERSION").to_owned(),
            device: "android-equivalent".to_owned(),
            preferred_language: None,
        }
    }
}

/// Feature flags advertised in every `Configuration` message.
pub const DEFAULT_FEATURES: &[&str] = &["streaming", "audio_output", "partial_responses", "reasoning_steps", "tool_use"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_endpoint_strips_scheme_and_trailing_slash() {
        let settings = SettingsSnapshot {
            server_url: "https://assistant.example.com/".to_owned(),
            ..Default::default()
        };
        assert_eq!(settings.media_endpoint(), "wss://assistant.example.com/livekit");
    }

    #[test]
    fn sensitivity_clamps_out_of_range_values() {
        let settings = SettingsSnapshot {
            wake_word_sensitivity: 1.8,
            ..Default::default()
        };
        assert_eq!(settings.clamped_sensitivity(), 1.0);
    }
}

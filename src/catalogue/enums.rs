//! Wire-aliased enums: each carries an in-memory name distinct from its
//! wire string or numeric form, with `from_wire`/`to_wire` round-tripping
//! per the enum-aliasing-symmetry property.

use crate::error::DecodeError;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident default $default_variant:ident {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn to_wire(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }

            /// Unknown strings fall back to the declared default per the
            /// decoding contract, except where a type overrides this with a
            /// strict parse (see [`VariationMode::from_wire_strict`]).
            pub fn from_wire(s: &str) -> Self {
                match s {
                    $($wire => Self::$variant,)+
                    _ => Self::$default_variant,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default_variant
            }
        }
    };
}

wire_enum! {
    pub enum StopType default All {
        Generation => "generation",
        Speech => "speech",
        All => "all",
    }
}

/// `ControlVariation.mode` has no safe default: an unrecognized wire value
/// is a fatal `UnknownEnumStrict` decode error rather than silently aliasing
/// to one of the known modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariationMode {
    Regenerate,
    Edit,
    Continue,
}

impl VariationMode {
    pub fn to_wire(self) -> &'static str {
        match self {
            Self::Regenerate => "regenerate",
            Self::Edit => "edit",
            Self::Continue => "continue",
        }
    }

    pub fn from_wire_strict(s: &str) -> Result<Self, DecodeError> {
        match s {
            "regenerate" => Ok(Self::Regenerate),
            "edit" => Ok(Self::Edit),
            "continue" => Ok(Self::Continue),
            _ => Err(DecodeError::UnknownEnumStrict("mode")),
        }
    }
}

wire_enum! {
    /// The `"+"` in `text+voice` is load-bearing, not a typo: it is the
    /// actual wire string the server expects.
    pub enum AnswerType default Text {
        Text => "text",
        Voice => "voice",
        TextVoice => "text+voice",
    }
}

wire_enum! {
    pub enum ToolExecution default Server {
        Server => "server",
        Client => "client",
        Either => "either",
    }
}

wire_enum! {
    pub enum FeedbackTarget default Answer {
        Answer => "answer",
        Turn => "turn",
        Conversation => "conversation",
    }
}

wire_enum! {
    pub enum Vote default Neutral {
        Up => "up",
        Down => "down",
        Neutral => "neutral",
    }
}

wire_enum! {
    pub enum NoteCategory default General {
        General => "general",
        Correction => "correction",
        Preference => "preference",
    }
}

wire_enum! {
    pub enum MemoryActionKind default Update {
        Create => "create",
        Update => "update",
        Delete => "delete",
        Pin => "pin",
        Archive => "archive",
    }
}

wire_enum! {
    pub enum MemoryCategory default Fact {
        Preference => "preference",
        Fact => "fact",
        Context => "context",
        Instruction => "instruction",
    }
}

wire_enum! {
    pub enum ConnectionStatus default Disconnected {
        Connected => "connected",
        Connecting => "connecting",
        Disconnected => "disconnected",
        Reconnecting => "reconnecting",
    }
}

wire_enum! {
    pub enum McpServerStatus default Disconnected {
        Connected => "connected",
        Disconnected => "disconnected",
        Error => "error",
    }
}

/// `ErrorMessage.severity` is a small numeric category (0..=3), not a wire
/// string; unknown values map to `Info` per the decoding contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
    Critical,
}

impl Severity {
    pub fn to_wire(self) -> i32 {
        match self {
            Self::Info => 0,
            Self::Warn => 1,
            Self::Error => 2,
            Self::Critical => 3,
        }
    }

    pub fn from_wire(code: i32) -> Self {
        match code {
            1 => Self::Warn,
            2 => Self::Error,
            3 => Self::Critical,
            _ => Self::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_type_text_voice_alias_round_trips() {
        let parsed = AnswerType::from_wire("text+voice");
        assert_eq!(parsed, AnswerType::TextVoice);
        assert_eq!(parsed.to_wire(), "text+voice");
    }

    #[test]
    fn unknown_stop_type_aliases_to_default() {
        assert_eq!(StopType::from_wire("bogus"), StopType::All);
    }

    #[test]
    fn variation_mode_strict_rejects_unknown() {
        assert_eq!(VariationMode::from_wire_strict("continue").unwrap(), VariationMode::Continue);
        assert!(matches!(
            VariationMode::from_wire_strict("foobar"),
            Err(DecodeError::UnknownEnumStrict("mode"))
        ));
    }

    #[test]
    fn severity_unknown_code_defaults_to_info() {
        assert_eq!(Severity::from_wire(99), Severity::Info);
        assert_eq!(Severity::from_wire(3), Severity::Critical);
    }
}

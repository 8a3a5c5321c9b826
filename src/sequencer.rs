//! Stanza ID production and tracking.
//!
//! Outbound ids are positive and monotonically increasing; inbound server
//! ids are negative and monotonically decreasing. The two counters are
//! independent and never reset across a reconnect within the same session.

/// Which side originated a stanza, per the sign convention in the envelope's
/// `stanzaId`. Not itself wire-visible — derived from the sign for callers
/// (and tests) that want to branch on origin without repeating `< 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ClientOriginated,
    ServerOriginated,
}

impl Direction {
    /// `stanza_id == 0` is reserved/invalid per the data model and has no
    /// direction; callers are expected to have already rejected it.
    pub fn of_stanza(stanza_id: i64) -> Option<Self> {
        match stanza_id.cmp(&0) {
            std::cmp::Ordering::Greater => Some(Direction::ClientOriginated),
            std::cmp::Ordering::Less => Some(Direction::ServerOriginated),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Per-conversation stanza bookkeeping.
#[derive(Debug, Default)]
pub struct StanzaSequencer {
    next_outbound: i64,
    last_seen_server_stanza: Option<i64>,
}

impl StanzaSequencer {
    pub fn new() -> Self {
        StanzaSequencer {
            next_outbound: 1,
            last_seen_server_stanza: None,
        }
    }

    /// Allocate the next outbound stanza id. Starts at 1, never resets.
    pub fn next_outbound_id(&mut self) -> i64 {
        let id = self.next_outbound;
        self.next_outbound += 1;
        id
    }

    /// Record an inbound server stanza id.
    ///
    /// Returns `true` if it was accepted (strictly more negative than
    /// anything seen so far), `false` if it's a duplicate or stale replay
    /// and should be dropped silently. Gaps between accepted ids are
    /// tolerated — the sequencer does not require contiguity.
    pub fn observe_server_stanza(&mut self, id: i64) -> bool {
        match self.last_seen_server_stanza {
            Some(last) if id >= last => false,
            _ => {
                self.last_seen_server_stanza = Some(id);
                true
            }
        }
    }

    pub fn last_seen_server_stanza(&self) -> Option<i64> {
        self.last_seen_server_stanza
    }

    /// `Configuration.lastSequenceSeen` per the resolved open question: the
    /// magnitude of the most-negative server stanza id seen, or 0 if none
    /// has been observed yet (first connect).
    pub fn last_sequence_seen_magnitude(&self) -> i32 {
        match self.last_seen_server_stanza {
            None => 0,
            Some(id) => i32::try_from(id.unsigned_abs()).unwrap_or(i32::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outbound_ids_increase_without_resetting_across_reconnect() {
        let mut seq = StanzaSequencer::new();
        assert_eq!(seq.next_outbound_id(), 1);
        assert_eq!(seq.next_outbound_id(), 2);
        // simulate a reconnect: sequencer is not recreated
        assert_eq!(seq.next_outbound_id(), 3);
    }

    #[test]
    fn duplicate_and_stale_server_ids_are_dropped() {
        let mut seq = StanzaSequencer::new();
        assert!(seq.observe_server_stanza(-1));
        assert!(seq.observe_server_stanza(-5));
        assert!(!seq.observe_server_stanza(-5));
        assert!(!seq.observe_server_stanza(-3));
        assert_eq!(seq.last_seen_server_stanza(), Some(-5));
    }

    #[test]
    fn last_sequence_seen_is_a_magnitude_matching_scenario_four() {
        let mut seq = StanzaSequencer::new();
        assert_eq!(seq.last_sequence_seen_magnitude(), 0);
        seq.observe_server_stanza(-42);
        assert_eq!(seq.last_sequence_seen_magnitude(), 42);
    }

    #[test]
    fn gaps_between_server_ids_are_tolerated() {
        let mut seq = StanzaSequencer::new();
        assert!(seq.observe_server_stanza(-1));
        assert!(seq.observe_server_stanza(-10));
        assert_eq!(seq.last_sequence_seen_magnitude(), 10);
    }

    #[test]
    fn direction_follows_the_sign_convention() {
        assert_eq!(Direction::of_stanza(1), Some(Direction::ClientOriginated));
        assert_eq!(Direction::of_stanza(-1), Some(Direction::ServerOriginated));
        assert_eq!(Direction::of_stanza(0), None);
    }
}

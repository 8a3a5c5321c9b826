//! Per-conversation subscription lifecycle over a multiplexed transport.

use std::collections::HashMap;

use crate::catalogue::bodies::{Subscribe, SubscribeAck, Unsubscribe, UnsubscribeAck};
use crate::catalogue::Message;

/// Lifecycle state of one conversation's subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionState {
    Pending,
    Active { missed_messages: Option<i32> },
    Rejected { error: Option<String> },
}

/// Tracks Subscribe/Unsubscribe/Ack correlation for every conversation the
/// session has touched on a multiplexed link.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    states: HashMap<String, SubscriptionState>,
}

/// Outcome of calling [`SubscriptionManager::subscribe`].
pub enum SubscribeOutcome {
    /// A `Subscribe` frame was emitted; caller should send it.
    Emit(Message),
    /// Already pending or active: exactly-one-subscribe invariant, no frame
    /// is emitted.
    NoOp,
}

impl SubscriptionManager {
    pub fn new() -> Self {
        SubscriptionManager::default()
    }

    pub fn state(&self, conversation_id: &str) -> Option<&SubscriptionState> {
        self.states.get(conversation_id)
    }

    pub fn is_active(&self, conversation_id: &str) -> bool {
        matches!(self.states.get(conversation_id), Some(SubscriptionState::Active { .. }))
    }

    /// Begin subscribing to `conversation_id`. Re-subscribing while
    /// `Pending` or `Active` is a no-op per the exactly-one-subscribe
    /// invariant.
    pub fn subscribe(&mut self, conversation_id: &str, from_sequence: Option<i32>) -> SubscribeOutcome {
        match self.states.get(conversation_id) {
            Some(SubscriptionState::Pending) | Some(SubscriptionState::Active { .. }) => SubscribeOutcome::NoOp,
            _ => {
                self.states.insert(conversation_id.to_owned(), SubscriptionState::Pending);
                SubscribeOutcome::Emit(Message::Subscribe(Subscribe {
                    conversation_id: conversation_id.to_owned(),
                    from_sequence,
                }))
            }
        }
    }

    pub fn unsubscribe(&mut self, conversation_id: &str) -> Message {
        Message::Unsubscribe(Unsubscribe {
            conversation_id: conversation_id.to_owned(),
        })
    }

    pub fn on_subscribe_ack(&mut self, ack: &SubscribeAck) {
        let state = if ack.success {
            SubscriptionState::Active {
                missed_messages: ack.missed_messages,
            }
        } else {
            SubscriptionState::Rejected {
                error: ack.error.clone(),
            }
        };
        self.states.insert(ack.conversation_id.clone(), state);
    }

    pub fn on_unsubscribe_ack(&mut self, ack: &UnsubscribeAck) {
        if ack.success {
            self.states.remove(&ack.conversation_id);
        }
    }

    /// Whether an inbound envelope for `conversation_id` should be
    /// dispatched. Envelopes for conversations not in `Active` state are
    /// dropped with a debug log by the caller.
    pub fn accepts(&self, conversation_id: &str) -> bool {
        self.is_active(conversation_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resubscribing_while_active_produces_no_additional_frame() {
        let mut mgr = SubscriptionManager::new();
        assert!(matches!(mgr.subscribe("c1", None), SubscribeOutcome::Emit(_)));
        mgr.on_subscribe_ack(&SubscribeAck {
            conversation_id: "c1".into(),
            success: true,
            missed_messages: None,
            error: None,
        });
        assert!(mgr.is_active("c1"));
        assert!(matches!(mgr.subscribe("c1", None), SubscribeOutcome::NoOp));
    }

    #[test]
    fn resubscribing_while_pending_is_also_a_no_op() {
        let mut mgr = SubscriptionManager::new();
        assert!(matches!(mgr.subscribe("c1", None), SubscribeOutcome::Emit(_)));
        assert!(matches!(mgr.subscribe("c1", None), SubscribeOutcome::NoOp));
    }

    #[test]
    fn rejected_subscribe_records_the_error() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe("c1", None);
        mgr.on_subscribe_ack(&SubscribeAck {
            conversation_id: "c1".into(),
            success: false,
            missed_messages: None,
            error: Some("quota exceeded".into()),
        });
        assert!(matches!(
            mgr.state("c1"),
            Some(SubscriptionState::Rejected { error: Some(e) }) if e == "quota exceeded"
        ));
        assert!(!mgr.accepts("c1"));
    }

    #[test]
    fn envelopes_for_unknown_conversations_are_not_accepted() {
        let mgr = SubscriptionManager::new();
        assert!(!mgr.accepts("never-subscribed"));
    }
}

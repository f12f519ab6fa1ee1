//! Identity resolution over the four event variants.
//!
//! Every accessor tries its per-variant rules in a fixed order; the first rule
//! that yields a value wins. A missing value is an ordinary `None`, never an error.

use crate::{
    domain::{ChatId, MessageId, UserId},
    event::{Chat, Event},
};

/// Where a callback's originating message lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageHandle {
    /// A regular message inside a chat.
    Chat(MessageId),
    /// A message sent in inline mode, addressed by its opaque id.
    Inline(String),
}

/// Chat the event happened in: direct message chat, then the chat of the
/// message a callback belongs to.
pub fn chat(event: &Event) -> Option<&Chat> {
    direct_message_chat(event).or_else(|| callback_message_chat(event))
}

/// Inline queries and chosen inline results carry no chat.
pub fn chat_id(event: &Event) -> Option<ChatId> {
    chat(event).map(|c| c.id)
}

pub fn user_id(event: &Event) -> Option<UserId> {
    direct_message_user(event)
        .or_else(|| inline_query_user(event))
        .or_else(|| chosen_inline_result_user(event))
        .or_else(|| callback_user(event))
}

/// Only callbacks resolve a message id; direct messages are not covered.
pub fn message_id(event: &Event) -> Option<MessageHandle> {
    callback_message_id(event).or_else(|| callback_inline_message_id(event))
}

pub fn message_text(event: &Event) -> Option<&str> {
    direct_message_text(event).or_else(|| callback_message_text(event))
}

/// True iff the event is a callback on a message sent in inline mode.
pub fn is_inline(event: &Event) -> bool {
    callback_inline_message_id(event).is_some()
}

/// Raw action token of a callback.
pub fn callback_data(event: &Event) -> Option<&str> {
    match event {
        Event::CallbackInteraction(cb) => cb.data.as_deref(),
        _ => None,
    }
}

fn direct_message_chat(event: &Event) -> Option<&Chat> {
    match event {
        Event::DirectMessage(dm) => Some(&dm.chat),
        _ => None,
    }
}

fn callback_message_chat(event: &Event) -> Option<&Chat> {
    match event {
        Event::CallbackInteraction(cb) => cb.message.as_ref().map(|m| &m.chat),
        _ => None,
    }
}

fn direct_message_user(event: &Event) -> Option<UserId> {
    match event {
        Event::DirectMessage(dm) => dm.user.as_ref().map(|u| u.id),
        _ => None,
    }
}

fn inline_query_user(event: &Event) -> Option<UserId> {
    match event {
        Event::InlineQuery(q) => Some(q.user.id),
        _ => None,
    }
}

fn chosen_inline_result_user(event: &Event) -> Option<UserId> {
    match event {
        Event::ChosenInlineResult(r) => Some(r.user.id),
        _ => None,
    }
}

fn callback_user(event: &Event) -> Option<UserId> {
    match event {
        Event::CallbackInteraction(cb) => Some(cb.user.id),
        _ => None,
    }
}

fn callback_message_id(event: &Event) -> Option<MessageHandle> {
    match event {
        Event::CallbackInteraction(cb) => cb
            .message
            .as_ref()
            .map(|m| MessageHandle::Chat(m.message_id)),
        _ => None,
    }
}

fn callback_inline_message_id(event: &Event) -> Option<MessageHandle> {
    match event {
        Event::CallbackInteraction(cb) => cb
            .inline_message_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| MessageHandle::Inline(id.to_string())),
        _ => None,
    }
}

fn direct_message_text(event: &Event) -> Option<&str> {
    match event {
        Event::DirectMessage(dm) => dm.text.as_deref(),
        _ => None,
    }
}

fn callback_message_text(event: &Event) -> Option<&str> {
    match event {
        Event::CallbackInteraction(cb) => cb.message.as_ref().and_then(|m| m.text.as_deref()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ChatKind;
    use crate::testing::{
        callback, chat, chosen_inline_result, direct_message, inline_query, message,
    };

    #[test]
    fn direct_message_resolves_chat_and_user() {
        let event = direct_message(chat(100, ChatKind::Private), 42, "hello");
        assert_eq!(chat_id(&event), Some(ChatId(100)));
        assert_eq!(user_id(&event), Some(UserId(42)));
        assert_eq!(message_text(&event), Some("hello"));
        assert!(!is_inline(&event));
    }

    #[test]
    fn direct_message_has_no_message_id() {
        let event = direct_message(chat(100, ChatKind::Private), 42, "hello");
        assert_eq!(message_id(&event), None);
    }

    #[test]
    fn channel_post_without_sender_has_no_user() {
        let mut event = direct_message(chat(-100, ChatKind::Channel), 1, "post");
        if let Event::DirectMessage(dm) = &mut event {
            dm.user = None;
        }
        assert_eq!(user_id(&event), None);
        assert_eq!(chat_id(&event), Some(ChatId(-100)));
    }

    #[test]
    fn callback_with_message_and_empty_inline_id() {
        let msg = message(chat(-5, ChatKind::Group), 77, Some("pick one"));
        let event = callback(Some(msg), Some(""), 9);
        assert_eq!(chat_id(&event), Some(ChatId(-5)));
        assert_eq!(user_id(&event), Some(UserId(9)));
        assert_eq!(message_id(&event), Some(MessageHandle::Chat(MessageId(77))));
        assert_eq!(message_text(&event), Some("pick one"));
        assert!(!is_inline(&event));
    }

    #[test]
    fn inline_callback_resolves_inline_message_id() {
        let event = callback(None, Some("abc123"), 9);
        assert!(is_inline(&event));
        assert_eq!(
            message_id(&event),
            Some(MessageHandle::Inline("abc123".to_string()))
        );
        assert_eq!(chat_id(&event), None);
        assert_eq!(message_text(&event), None);
    }

    #[test]
    fn callback_message_id_takes_priority_over_inline_id() {
        let msg = message(chat(1, ChatKind::Private), 3, None);
        let event = callback(Some(msg), Some("abc123"), 9);
        assert_eq!(message_id(&event), Some(MessageHandle::Chat(MessageId(3))));
    }

    #[test]
    fn callback_without_message_or_inline_id_resolves_nothing() {
        let event = callback(None, None, 9);
        assert_eq!(message_id(&event), None);
        assert!(!is_inline(&event));
        assert_eq!(user_id(&event), Some(UserId(9)));
    }

    #[test]
    fn inline_variants_carry_user_but_no_chat() {
        for event in [inline_query(11), chosen_inline_result(12)] {
            assert!(user_id(&event).is_some());
            assert_eq!(chat_id(&event), None);
            assert_eq!(message_id(&event), None);
            assert_eq!(message_text(&event), None);
            assert!(!is_inline(&event));
        }
        assert_eq!(user_id(&inline_query(11)), Some(UserId(11)));
        assert_eq!(user_id(&chosen_inline_result(12)), Some(UserId(12)));
    }

    #[test]
    fn callback_data_only_on_callbacks() {
        let mut event = callback(None, Some("x"), 1);
        if let Event::CallbackInteraction(cb) = &mut event {
            cb.data = Some(r#"{"a":"fg"}"#.to_string());
        }
        assert_eq!(callback_data(&event), Some(r#"{"a":"fg"}"#));
        assert_eq!(callback_data(&inline_query(1)), None);
    }
}

//! Telegram `Update` → core `Event` conversion.

use teloxide::types::{self as tg, Update, UpdateKind};

use botlist_core::{
    domain::{ChatId, MessageId, UserId},
    event::{
        CallbackInteraction, Chat, ChatKind, ChosenInlineResult, DirectMessage, Event, InlineQuery,
        Message, User,
    },
};

/// Convert an update the core understands. Other update kinds yield `None`.
///
/// Edits are dropped: an edited `/groups` message must not resend the list.
pub fn from_update(update: &Update) -> Option<Event> {
    match &update.kind {
        UpdateKind::Message(msg) | UpdateKind::ChannelPost(msg) => {
            Some(Event::DirectMessage(direct_message(msg)))
        }
        UpdateKind::CallbackQuery(q) => callback(q).map(Event::CallbackInteraction),
        UpdateKind::InlineQuery(q) => Some(Event::InlineQuery(InlineQuery {
            id: q.id.clone(),
            user: user(&q.from)?,
            query_text: q.query.clone(),
        })),
        UpdateKind::ChosenInlineResult(r) => Some(Event::ChosenInlineResult(ChosenInlineResult {
            user: user(&r.from)?,
            result_id: r.result_id.clone(),
            query: r.query.clone(),
        })),
        _ => None,
    }
}

fn direct_message(msg: &tg::Message) -> DirectMessage {
    DirectMessage {
        chat: chat(&msg.chat),
        user: msg.from().and_then(user),
        message_id: MessageId(msg.id.0),
        text: msg.text().map(str::to_string),
        new_chat_members: msg
            .new_chat_members()
            .map(|members| members.iter().filter_map(user).collect())
            .unwrap_or_default(),
    }
}

fn callback(q: &tg::CallbackQuery) -> Option<CallbackInteraction> {
    Some(CallbackInteraction {
        id: q.id.clone(),
        message: q.message.as_ref().map(message),
        inline_message_id: q.inline_message_id.clone(),
        user: user(&q.from)?,
        data: q.data.clone(),
    })
}

fn message(msg: &tg::Message) -> Message {
    Message {
        chat: chat(&msg.chat),
        message_id: MessageId(msg.id.0),
        text: msg.text().map(str::to_string),
    }
}

fn chat(c: &tg::Chat) -> Chat {
    let kind = if c.is_private() {
        ChatKind::Private
    } else if c.is_supergroup() {
        ChatKind::Supergroup
    } else if c.is_group() {
        ChatKind::Group
    } else {
        ChatKind::Channel
    };
    Chat {
        id: ChatId(c.id.0),
        kind,
        title: c.title().map(str::to_string),
        username: c.username().map(str::to_string),
    }
}

/// Telegram user ids are `u64`; ids outside `i64` are dropped rather than wrapped.
fn user(u: &tg::User) -> Option<User> {
    let Ok(id) = i64::try_from(u.id.0) else {
        tracing::debug!(user_id = u.id.0, "user id out of range");
        return None;
    };
    Some(User {
        id: UserId(id),
        username: u.username.clone(),
        is_bot: u.is_bot,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use botlist_core::identity;

    // `Update` only deserializes its kind correctly from text, not from a `Value`.
    fn update(raw: serde_json::Value) -> Update {
        serde_json::from_str(&raw.to_string()).unwrap()
    }

    #[test]
    fn converts_group_message() {
        let upd = update(serde_json::json!({
            "update_id": 1,
            "message": {
                "message_id": 10,
                "date": 1700000000,
                "chat": {"id": -555, "type": "group", "title": "Rustaceans"},
                "from": {"id": 42, "is_bot": false, "first_name": "A", "username": "alice"},
                "text": "/groups"
            }
        }));
        let event = from_update(&upd).unwrap();
        assert_eq!(identity::chat_id(&event), Some(ChatId(-555)));
        assert_eq!(identity::user_id(&event), Some(UserId(42)));
        assert_eq!(identity::message_text(&event), Some("/groups"));
        let chat = identity::chat(&event).unwrap();
        assert_eq!(chat.kind, ChatKind::Group);
        assert_eq!(chat.title.as_deref(), Some("Rustaceans"));
    }

    #[test]
    fn converts_inline_callback() {
        let upd = update(serde_json::json!({
            "update_id": 2,
            "callback_query": {
                "id": "cb",
                "from": {"id": 7, "is_bot": false, "first_name": "B"},
                "chat_instance": "ci",
                "inline_message_id": "abc123",
                "data": "{\"a\":\"fg\",\"id\":\"-555\"}"
            }
        }));
        let event = from_update(&upd).unwrap();
        assert!(identity::is_inline(&event));
        assert_eq!(identity::chat_id(&event), None);
        assert_eq!(
            identity::callback_data(&event),
            Some("{\"a\":\"fg\",\"id\":\"-555\"}")
        );
    }

    #[test]
    fn records_bot_join_members() {
        let upd = update(serde_json::json!({
            "update_id": 3,
            "message": {
                "message_id": 11,
                "date": 1700000000,
                "chat": {"id": -100123, "type": "supergroup", "title": "Lobby"},
                "from": {"id": 42, "is_bot": false, "first_name": "A"},
                "new_chat_members": [{"id": 999, "is_bot": true, "first_name": "botlist"}]
            }
        }));
        let Some(Event::DirectMessage(dm)) = from_update(&upd) else {
            panic!("expected a direct message");
        };
        assert_eq!(dm.chat.kind, ChatKind::Supergroup);
        assert_eq!(dm.new_chat_members.len(), 1);
        assert_eq!(dm.new_chat_members[0].id, UserId(999));
        assert!(dm.new_chat_members[0].is_bot);
    }

    #[test]
    fn converts_inline_query() {
        let upd = update(serde_json::json!({
            "update_id": 4,
            "inline_query": {
                "id": "iq",
                "from": {"id": 5, "is_bot": false, "first_name": "C"},
                "query": "rust",
                "offset": ""
            }
        }));
        let event = from_update(&upd).unwrap();
        assert_eq!(identity::user_id(&event), Some(UserId(5)));
        assert_eq!(identity::chat_id(&event), None);
    }

    #[test]
    fn edited_messages_are_ignored() {
        let upd = update(serde_json::json!({
            "update_id": 5,
            "edited_message": {
                "message_id": 12,
                "date": 1700000000,
                "edit_date": 1700000100,
                "chat": {"id": 42, "type": "private", "first_name": "A"},
                "from": {"id": 42, "is_bot": false, "first_name": "A"},
                "text": "/groups"
            }
        }));
        assert!(from_update(&upd).is_none());
    }

    #[test]
    fn channel_post_without_sender_converts() {
        let upd = update(serde_json::json!({
            "update_id": 6,
            "channel_post": {
                "message_id": 13,
                "date": 1700000000,
                "chat": {"id": -100777, "type": "channel", "title": "News"},
                "text": "hello"
            }
        }));
        let event = from_update(&upd).unwrap();
        assert_eq!(identity::chat_id(&event), Some(ChatId(-100777)));
        assert_eq!(identity::user_id(&event), None);
    }

    #[test]
    fn user_id_beyond_i64_is_not_wrapped() {
        let upd = update(serde_json::json!({
            "update_id": 7,
            "inline_query": {
                "id": "iq",
                "from": {"id": 18446744073709551615u64, "is_bot": false, "first_name": "D"},
                "query": "",
                "offset": ""
            }
        }));
        assert!(from_update(&upd).is_none());
    }
}

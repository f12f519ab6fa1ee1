//! Event builders shared by unit tests.

use crate::{
    domain::{ChatId, MessageId, UserId},
    event::*,
};

pub fn user(id: i64) -> User {
    User {
        id: UserId(id),
        username: Some(format!("user{id}")),
        is_bot: false,
    }
}

pub fn chat(id: i64, kind: ChatKind) -> Chat {
    Chat {
        id: ChatId(id),
        kind,
        title: kind.is_group().then(|| format!("group {id}")),
        username: None,
    }
}

pub fn direct_message(chat: Chat, user_id: i64, text: &str) -> Event {
    Event::DirectMessage(DirectMessage {
        chat,
        user: Some(user(user_id)),
        message_id: MessageId(1),
        text: Some(text.to_string()),
        new_chat_members: Vec::new(),
    })
}

pub fn callback(message: Option<Message>, inline_message_id: Option<&str>, user_id: i64) -> Event {
    Event::CallbackInteraction(CallbackInteraction {
        id: "cb-1".to_string(),
        message,
        inline_message_id: inline_message_id.map(str::to_string),
        user: user(user_id),
        data: None,
    })
}

pub fn message(chat: Chat, message_id: i32, text: Option<&str>) -> Message {
    Message {
        chat,
        message_id: MessageId(message_id),
        text: text.map(str::to_string),
    }
}

pub fn inline_query(user_id: i64) -> Event {
    Event::InlineQuery(InlineQuery {
        id: "iq-1".to_string(),
        user: user(user_id),
        query_text: "search".to_string(),
    })
}

pub fn chosen_inline_result(user_id: i64) -> Event {
    Event::ChosenInlineResult(ChosenInlineResult {
        user: user(user_id),
        result_id: "r-1".to_string(),
        query: "search".to_string(),
    })
}

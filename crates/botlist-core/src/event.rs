//! Messenger-agnostic inbound update model.
//!
//! The adapter builds one `Event` per inbound update. Exactly one variant is
//! populated; Telegram-specific fields that the core never reads stay in the
//! adapter.

use serde::{Deserialize, Serialize};

use crate::domain::{ChatId, MessageId, UserId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    DirectMessage(DirectMessage),
    CallbackInteraction(CallbackInteraction),
    InlineQuery(InlineQuery),
    ChosenInlineResult(ChosenInlineResult),
}

/// A plain message sent into a chat the bot can see.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectMessage {
    pub chat: Chat,
    /// `None` for channel posts, which have no sender.
    pub user: Option<User>,
    pub message_id: MessageId,
    pub text: Option<String>,
    /// Members that joined with this message (service message).
    #[serde(default)]
    pub new_chat_members: Vec<User>,
}

/// A press on an inline keyboard button.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackInteraction {
    /// Callback id, needed to acknowledge the press.
    pub id: String,
    /// Message carrying the keyboard. Absent for inline-mode messages.
    pub message: Option<Message>,
    /// Set when the keyboard belongs to a message sent in inline mode.
    pub inline_message_id: Option<String>,
    pub user: User,
    /// Raw action token attached to the button.
    pub data: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineQuery {
    pub id: String,
    pub user: User,
    pub query_text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChosenInlineResult {
    pub user: User,
    pub result_id: String,
    pub query: String,
}

/// A message the bot previously sent, as referenced by a callback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub message_id: MessageId,
    pub text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: ChatId,
    pub kind: ChatKind,
    pub title: Option<String>,
    pub username: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    pub fn is_private(self) -> bool {
        matches!(self, ChatKind::Private)
    }

    /// Basic groups and supergroups.
    pub fn is_group(self) -> bool {
        matches!(self, ChatKind::Group | ChatKind::Supergroup)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChatKind::Private => "private",
            ChatKind::Group => "group",
            ChatKind::Supergroup => "supergroup",
            ChatKind::Channel => "channel",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: Option<String>,
    #[serde(default)]
    pub is_bot: bool,
}

impl Event {
    /// Short variant label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::DirectMessage(_) => "direct_message",
            Event::CallbackInteraction(_) => "callback_interaction",
            Event::InlineQuery(_) => "inline_query",
            Event::ChosenInlineResult(_) => "chosen_inline_result",
        }
    }
}

use crate::{
    action::{encode, Action},
    domain::{ChatId, MessageRef},
    identity::MessageHandle,
    Result,
};

/// Message to edit: a chat message or one sent in inline mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageTarget {
    Chat(MessageRef),
    Inline(String),
}

impl MessageTarget {
    /// Combine a resolved message handle with the chat it belongs to.
    ///
    /// Chat messages need a chat id; inline messages don't.
    pub fn from_handle(handle: MessageHandle, chat_id: Option<ChatId>) -> Option<Self> {
        match handle {
            MessageHandle::Inline(id) => Some(MessageTarget::Inline(id)),
            MessageHandle::Chat(message_id) => chat_id.map(|chat_id| {
                MessageTarget::Chat(MessageRef {
                    chat_id,
                    message_id,
                })
            }),
        }
    }
}

/// Inline keyboard, rows of buttons in caller order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub callback_data: String,
}

impl InlineButton {
    /// Button whose callback data is the encoded `action`.
    ///
    /// Fails before anything is sent if the action does not fit the 64-byte budget.
    pub fn action(label: impl Into<String>, action: &Action) -> Result<Self> {
        Ok(Self {
            label: label.into(),
            callback_data: encode(action)?,
        })
    }
}

impl InlineKeyboard {
    pub fn new(rows: Vec<Vec<InlineButton>>) -> Self {
        Self { rows }
    }

    /// Convenience for "one button per row" layouts.
    pub fn one_per_row(buttons: Vec<InlineButton>) -> Self {
        Self {
            rows: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|r| r.is_empty())
    }
}

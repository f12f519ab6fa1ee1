use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::{InlineKeyboard, MessageTarget},
    Result,
};

/// Outbound port implemented by messenger adapters.
///
/// Texts are Telegram-flavoured HTML; escape user content with
/// `formatting::escape_html`.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_html(
        &self,
        chat_id: ChatId,
        html: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<MessageRef>;

    async fn edit_html(
        &self,
        target: MessageTarget,
        html: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<()>;

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()>;
}

use std::sync::Arc;

use botlist_core::{
    action::{self, Action},
    domain::ChatId,
    event::Event,
    formatting::{failure, success},
    group::GroupStore,
    guards::{restrict_access, AuthorizedUsers, Handler},
    identity,
    messaging::{port::MessagingPort, types::MessageTarget},
    Result,
};

use super::{commands::render_group_list, Reply};

/// Action name of the "forget group" button.
pub const FORGET: &str = "fg";

pub fn forget_action(chat_id: ChatId) -> Action {
    Action::new(FORGET).param("id", chat_id.0)
}

/// Forget a group from the list keyboard. Admins only.
pub fn forget(
    messenger: Arc<dyn MessagingPort>,
    store: Arc<dyn GroupStore>,
    admins: Arc<AuthorizedUsers>,
) -> impl Handler<Output = Reply> {
    restrict_access(admins, move |event: &Event| -> Option<Reply> {
        let Event::CallbackInteraction(cb) = event else {
            return None;
        };
        let group = action::decode(cb.data.as_deref())
            .get("id")
            .and_then(|id| id.parse::<i64>().ok())
            .map(ChatId);
        let target = identity::message_id(event)
            .and_then(|handle| MessageTarget::from_handle(handle, identity::chat_id(event)));

        let reply: Reply = Box::pin(forget_group(
            messenger.clone(),
            store.clone(),
            cb.id.clone(),
            group,
            target,
        ));
        Some(reply)
    })
}

/// Answer presses on buttons nobody handles (stale keyboards, unreadable tokens).
pub fn acknowledge(messenger: Arc<dyn MessagingPort>) -> impl Handler<Output = Reply> {
    move |event: &Event| -> Option<Reply> {
        let Event::CallbackInteraction(cb) = event else {
            return None;
        };
        tracing::debug!(data = ?cb.data, "acknowledging unhandled callback");
        let messenger = messenger.clone();
        let callback_id = cb.id.clone();
        let reply: Reply =
            Box::pin(async move { messenger.answer_callback(&callback_id, None).await });
        Some(reply)
    }
}

async fn forget_group(
    messenger: Arc<dyn MessagingPort>,
    store: Arc<dyn GroupStore>,
    callback_id: String,
    group: Option<ChatId>,
    target: Option<MessageTarget>,
) -> Result<()> {
    let Some(group) = group else {
        messenger
            .answer_callback(&callback_id, Some(&failure("Invalid button")))
            .await?;
        return Ok(());
    };

    let note = if store.remove(group)? {
        tracing::info!(chat_id = group.0, "group forgotten");
        success("Group forgotten")
    } else {
        failure("Group was already gone")
    };
    messenger.answer_callback(&callback_id, Some(&note)).await?;

    if let Some(target) = target {
        let (text, keyboard) = render_group_list(&store.list()?)?;
        messenger.edit_html(target, &text, keyboard).await?;
    }
    Ok(())
}

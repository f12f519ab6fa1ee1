use std::sync::Arc;

use botlist_core::{
    domain::ChatId,
    event::Event,
    formatting::{action_hint, escape_html},
    group::{Group, GroupStore},
    guards::{private_only, restrict_access, AuthorizedUsers, Handler},
    identity,
    messaging::{
        port::MessagingPort,
        types::{InlineButton, InlineKeyboard},
    },
    Result,
};

use super::{callback::forget_action, Reply};

const BUTTON_LABEL_MAX_LEN: usize = 24;

/// Split `/cmd@botname args` into a lowercase command and the rest.
pub(crate) fn parse_command(text: &str) -> Option<(String, String)> {
    let text = text.trim();
    if !text.starts_with('/') {
        return None;
    }
    let mut parts = text.splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    if cmd.is_empty() {
        return None;
    }
    Some((cmd, rest))
}

/// `/start`, private chats only.
pub fn start(messenger: Arc<dyn MessagingPort>) -> impl Handler<Output = Reply> {
    private_only(move |event: &Event| -> Option<Reply> {
        let chat_id = identity::chat_id(event)?;
        let reply: Reply = Box::pin(send_greeting(messenger.clone(), chat_id));
        Some(reply)
    })
}

/// `/groups`, admins in private chats only.
pub fn groups(
    messenger: Arc<dyn MessagingPort>,
    store: Arc<dyn GroupStore>,
    admins: Arc<AuthorizedUsers>,
) -> impl Handler<Output = Reply> {
    private_only(restrict_access(
        admins,
        move |event: &Event| -> Option<Reply> {
            let chat_id = identity::chat_id(event)?;
            let reply: Reply = Box::pin(send_group_list(messenger.clone(), store.clone(), chat_id));
            Some(reply)
        },
    ))
}

async fn send_greeting(messenger: Arc<dyn MessagingPort>, chat_id: ChatId) -> Result<()> {
    let text = action_hint(
        "Hi! I keep track of the groups I'm added to. Admins can review them with /groups.",
    );
    messenger.send_html(chat_id, &text, None).await?;
    Ok(())
}

async fn send_group_list(
    messenger: Arc<dyn MessagingPort>,
    store: Arc<dyn GroupStore>,
    chat_id: ChatId,
) -> Result<()> {
    let (text, keyboard) = render_group_list(&store.list()?)?;
    messenger.send_html(chat_id, &text, keyboard).await?;
    Ok(())
}

/// Group list message with one "forget" button per group.
pub(crate) fn render_group_list(groups: &[Group]) -> Result<(String, Option<InlineKeyboard>)> {
    if groups.is_empty() {
        return Ok((action_hint("I have not been added to any group yet."), None));
    }

    let mut lines = vec![format!("<b>Known groups ({})</b>", groups.len())];
    let mut buttons = Vec::with_capacity(groups.len());
    for group in groups {
        let name = group.display_name();
        lines.push(format!(
            "• {} <code>{}</code> ({})",
            escape_html(&name),
            group.chat_id.0,
            group.kind.as_str()
        ));
        buttons.push(InlineButton::action(
            format!("Forget {}", truncate(&name, BUTTON_LABEL_MAX_LEN)),
            &forget_action(group.chat_id),
        )?);
    }

    Ok((lines.join("\n"), Some(InlineKeyboard::one_per_row(buttons))))
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    format!("{}...", s.chars().take(max_chars).collect::<String>())
}

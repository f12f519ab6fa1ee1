use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use botlist_core::{
    config::Config,
    domain::UserId,
    group::{GroupStore, JsonGroupStore},
    messaging::port::MessagingPort,
};

use crate::event;
use crate::handlers::{self, BoxHandler, Deps};
use crate::TelegramMessenger;

pub struct AppState {
    pub handler: BoxHandler,
}

pub async fn run_polling(cfg: Arc<Config>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    let bot_id = match cfg.self_bot_id {
        Some(id) => Some(UserId(id)),
        None => match bot.get_me().await {
            Ok(me) => {
                tracing::info!(username = me.username(), "resolved bot identity");
                i64::try_from(me.id.0).ok().map(UserId)
            }
            Err(e) => {
                tracing::warn!(error = %e, "getMe failed; joined-chat detection disabled");
                None
            }
        },
    };

    let groups: Arc<dyn GroupStore> = Arc::new(JsonGroupStore::open(&cfg.group_store_path)?);
    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let admins = Arc::new(cfg.authorized_users());

    tracing::info!(
        admins = admins.len(),
        known_groups = groups.list()?.len(),
        store = %cfg.group_store_path.display(),
        "botlist started"
    );

    let state = Arc::new(AppState {
        handler: handlers::build(Deps {
            messenger,
            groups,
            admins,
            bot_id,
        }),
    });

    let handler = dptree::entry().endpoint(handle_update);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_update(update: Update, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(event) = event::from_update(&update) else {
        return Ok(());
    };
    let Some(reply) = state.handler.handle(&event) else {
        return Ok(());
    };
    if let Err(e) = reply.await {
        tracing::error!(kind = event.kind(), error = %e, "handler failed");
    }
    Ok(())
}

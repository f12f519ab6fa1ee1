//! Handler table.
//!
//! Each handler is a guarded `Handler` whose output is a boxed future: the
//! guards decide synchronously, the dispatcher awaits the reply.
//!
//! The whole table sits behind the group observer, so every update from a
//! group is recorded before routing.

use std::{future::Future, pin::Pin, sync::Arc};

use botlist_core::{
    action::{self, Action},
    domain::UserId,
    event::Event,
    group::GroupStore,
    guards::{observe_groups, AuthorizedUsers, Handler},
    identity,
    messaging::port::MessagingPort,
    Result,
};

mod callback;
mod commands;

/// Pending response of a handler.
pub type Reply = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

pub type BoxHandler = Box<dyn Handler<Output = Reply>>;

pub struct Deps {
    pub messenger: Arc<dyn MessagingPort>,
    pub groups: Arc<dyn GroupStore>,
    pub admins: Arc<AuthorizedUsers>,
    /// Our own user id, for the "added to a chat" signal.
    pub bot_id: Option<UserId>,
}

struct HandlerTable {
    start: BoxHandler,
    groups: BoxHandler,
    forget: BoxHandler,
    acknowledge: BoxHandler,
}

enum Route {
    Command(String),
    Action(Action),
    Ignore,
}

fn route(event: &Event) -> Route {
    match event {
        Event::DirectMessage(_) => identity::message_text(event)
            .and_then(commands::parse_command)
            .map_or(Route::Ignore, |(cmd, _)| Route::Command(cmd)),
        Event::CallbackInteraction(_) => Route::Action(action::decode(identity::callback_data(event))),
        Event::InlineQuery(_) | Event::ChosenInlineResult(_) => Route::Ignore,
    }
}

impl Handler for HandlerTable {
    type Output = Reply;

    fn handle(&self, event: &Event) -> Option<Reply> {
        match route(event) {
            Route::Command(cmd) => match cmd.as_str() {
                "start" => self.start.handle(event),
                "groups" => self.groups.handle(event),
                _ => None,
            },
            Route::Action(action) => match action.name() {
                Some(callback::FORGET) => self.forget.handle(event),
                _ => self.acknowledge.handle(event),
            },
            Route::Ignore => None,
        }
    }
}

pub fn build(deps: Deps) -> BoxHandler {
    let table = HandlerTable {
        start: Box::new(commands::start(deps.messenger.clone())),
        groups: Box::new(commands::groups(
            deps.messenger.clone(),
            deps.groups.clone(),
            deps.admins.clone(),
        )),
        forget: Box::new(callback::forget(
            deps.messenger.clone(),
            deps.groups.clone(),
            deps.admins.clone(),
        )),
        acknowledge: Box::new(callback::acknowledge(deps.messenger.clone())),
    };
    Box::new(observe_groups(deps.groups, deps.bot_id, table))
}

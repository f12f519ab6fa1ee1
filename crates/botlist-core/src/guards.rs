//! Handler wrappers that gate execution on who sent an event and where.
//!
//! Guards are plain values wrapping a `Handler`; compose them by nesting:
//!
//! ```ignore
//! let handler = observe_groups(store, bot_id, private_only(restrict_access(admins, inner)));
//! ```
//!
//! A guard that denies returns `None` and produces no response.

use std::{collections::HashSet, sync::Arc};

use crate::{
    domain::UserId,
    event::Event,
    group::GroupStore,
    identity,
};

/// Something that may respond to an event. `None` means no response.
pub trait Handler: Send + Sync {
    type Output;

    fn handle(&self, event: &Event) -> Option<Self::Output>;
}

impl<F, O> Handler for F
where
    F: Fn(&Event) -> Option<O> + Send + Sync,
{
    type Output = O;

    fn handle(&self, event: &Event) -> Option<O> {
        self(event)
    }
}

/// Fixed set of users allowed through `restrict_access`.
#[derive(Clone, Debug, Default)]
pub struct AuthorizedUsers {
    ids: HashSet<UserId>,
}

impl AuthorizedUsers {
    pub fn contains(&self, user_id: UserId) -> bool {
        self.ids.contains(&user_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<UserId> for AuthorizedUsers {
    fn from_iter<I: IntoIterator<Item = UserId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

// ============== Group observation ==============

pub struct GroupObserver<H> {
    store: Arc<dyn GroupStore>,
    bot_id: Option<UserId>,
    inner: H,
}

/// Record group chats the event comes from, then always run `inner`.
///
/// A message announcing that `bot_id` joined a chat records that chat too.
pub fn observe_groups<H: Handler>(
    store: Arc<dyn GroupStore>,
    bot_id: Option<UserId>,
    inner: H,
) -> GroupObserver<H> {
    GroupObserver {
        store,
        bot_id,
        inner,
    }
}

impl<H: Handler> GroupObserver<H> {
    fn observe(&self, event: &Event) {
        let Some(chat) = identity::chat(event) else {
            tracing::debug!(kind = event.kind(), "no chat available in update");
            return;
        };
        if !chat.kind.is_group() && !self.bot_joined(event) {
            return;
        }
        if let Err(e) = self.store.from_source(chat) {
            tracing::warn!(chat_id = chat.id.0, error = %e, "failed to record group");
        }
    }

    fn bot_joined(&self, event: &Event) -> bool {
        let (Some(bot_id), Event::DirectMessage(dm)) = (self.bot_id, event) else {
            return false;
        };
        dm.new_chat_members.iter().any(|u| u.id == bot_id)
    }
}

impl<H: Handler> Handler for GroupObserver<H> {
    type Output = H::Output;

    fn handle(&self, event: &Event) -> Option<H::Output> {
        self.observe(event);
        self.inner.handle(event)
    }
}

// ============== Access restriction ==============

pub struct AccessRestrictor<H> {
    admins: Arc<AuthorizedUsers>,
    inner: H,
}

/// Run `inner` only for events sent by an authorized user. Denial is silent.
pub fn restrict_access<H: Handler>(admins: Arc<AuthorizedUsers>, inner: H) -> AccessRestrictor<H> {
    AccessRestrictor { admins, inner }
}

impl<H: Handler> Handler for AccessRestrictor<H> {
    type Output = H::Output;

    fn handle(&self, event: &Event) -> Option<H::Output> {
        match identity::user_id(event) {
            Some(user_id) if self.admins.contains(user_id) => self.inner.handle(event),
            user_id => {
                tracing::info!(user_id = ?user_id.map(|u| u.0), "unauthorized access denied");
                None
            }
        }
    }
}

// ============== Scope restriction ==============

pub struct PrivateOnly<H> {
    inner: H,
}

/// Run `inner` only for events from a one-to-one chat; drop everything else.
pub fn private_only<H: Handler>(inner: H) -> PrivateOnly<H> {
    PrivateOnly { inner }
}

impl<H: Handler> Handler for PrivateOnly<H> {
    type Output = H::Output;

    fn handle(&self, event: &Event) -> Option<H::Output> {
        let is_private = identity::chat(event).is_some_and(|c| c.kind.is_private());
        if !is_private {
            return None;
        }
        self.inner.handle(event)
    }
}

//! Groups the bot has been seen in.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use serde::{Deserialize, Serialize};

use crate::{
    domain::ChatId,
    errors::Error,
    event::{Chat, ChatKind},
    Result,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub chat_id: ChatId,
    pub kind: ChatKind,
    pub title: Option<String>,
    pub username: Option<String>,
    /// RFC3339, UTC.
    pub last_seen: String,
}

impl Group {
    fn from_chat(chat: &Chat) -> Self {
        Self {
            chat_id: chat.id,
            kind: chat.kind,
            title: chat.title.clone(),
            username: chat.username.clone(),
            last_seen: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Same chat with the same visible details; `last_seen` is ignored.
    fn same_details(&self, other: &Group) -> bool {
        self.kind == other.kind && self.title == other.title && self.username == other.username
    }

    pub fn display_name(&self) -> String {
        match (&self.title, &self.username) {
            (Some(title), _) => title.clone(),
            (None, Some(username)) => format!("@{username}"),
            (None, None) => self.chat_id.0.to_string(),
        }
    }
}

/// Group persistence port used by the group observer.
///
/// `from_source` is an idempotent upsert keyed by chat id.
pub trait GroupStore: Send + Sync {
    fn from_source(&self, chat: &Chat) -> Result<Group>;
    fn list(&self) -> Result<Vec<Group>>;
    fn remove(&self, chat_id: ChatId) -> Result<bool>;
}

/// `GroupStore` kept in memory and mirrored to a JSON file.
///
/// The file is rewritten only when a group is added, removed, or changes its
/// kind, title or username. A refreshed `last_seen` alone stays in memory
/// until the next write. A failed write leaves memory as it was.
pub struct JsonGroupStore {
    path: Option<PathBuf>,
    groups: Mutex<BTreeMap<i64, Group>>,
}

impl JsonGroupStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            groups: Mutex::new(BTreeMap::new()),
        }
    }

    /// Open (or start) the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let groups = load_groups_file(&path)?
            .into_iter()
            .map(|g| (g.chat_id.0, g))
            .collect();
        Ok(Self {
            path: Some(path),
            groups: Mutex::new(groups),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<i64, Group>>> {
        self.groups
            .lock()
            .map_err(|_| Error::External("group store lock poisoned".to_string()))
    }

    fn persist(&self, groups: &BTreeMap<i64, Group>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        save_groups_file(path, &groups.values().cloned().collect::<Vec<_>>())
    }
}

impl GroupStore for JsonGroupStore {
    fn from_source(&self, chat: &Chat) -> Result<Group> {
        let group = Group::from_chat(chat);
        let mut groups = self.lock()?;
        let previous = groups.insert(chat.id.0, group.clone());
        let changed = previous
            .as_ref()
            .map_or(true, |old| !old.same_details(&group));

        if changed {
            if let Err(e) = self.persist(&groups) {
                match previous {
                    Some(old) => groups.insert(chat.id.0, old),
                    None => groups.remove(&chat.id.0),
                };
                return Err(e);
            }
        }
        if previous.is_none() {
            tracing::info!(chat_id = chat.id.0, title = ?chat.title, "recorded new group");
        }
        Ok(group)
    }

    fn list(&self) -> Result<Vec<Group>> {
        Ok(self.lock()?.values().cloned().collect())
    }

    fn remove(&self, chat_id: ChatId) -> Result<bool> {
        let mut groups = self.lock()?;
        let Some(old) = groups.remove(&chat_id.0) else {
            return Ok(false);
        };
        if let Err(e) = self.persist(&groups) {
            groups.insert(chat_id.0, old);
            return Err(e);
        }
        Ok(true)
    }
}

fn load_groups_file(path: &Path) -> Result<Vec<Group>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let txt = fs::read_to_string(path)?;
    if txt.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&txt)?)
}

fn save_groups_file(path: &Path, groups: &[Group]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let txt = serde_json::to_string_pretty(groups)?;
    fs::write(path, txt)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::chat;

    fn tmp(prefix: &str) -> PathBuf {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let pid = std::process::id();
        PathBuf::from(format!("/tmp/{prefix}-{pid}-{ts}"))
    }

    #[test]
    fn upsert_is_idempotent() {
        let store = JsonGroupStore::in_memory();
        let mut c = chat(-555, ChatKind::Group);
        store.from_source(&c).unwrap();
        c.title = Some("renamed".to_string());
        store.from_source(&c).unwrap();

        let groups = store.list().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].title.as_deref(), Some("renamed"));
    }

    #[test]
    fn remove_reports_presence() {
        let store = JsonGroupStore::in_memory();
        store.from_source(&chat(-1, ChatKind::Supergroup)).unwrap();
        assert!(store.remove(ChatId(-1)).unwrap());
        assert!(!store.remove(ChatId(-1)).unwrap());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tmp("botlist-groups");
        let path = dir.join("nested/groups.json");

        let store = JsonGroupStore::open(&path).unwrap();
        store.from_source(&chat(-10, ChatKind::Group)).unwrap();
        store.from_source(&chat(-20, ChatKind::Supergroup)).unwrap();
        store.remove(ChatId(-10)).unwrap();
        drop(store);

        let reopened = JsonGroupStore::open(&path).unwrap();
        let ids: Vec<ChatId> = reopened.list().unwrap().iter().map(|g| g.chat_id).collect();
        assert_eq!(ids, vec![ChatId(-20)]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn unchanged_group_is_not_rewritten() {
        let dir = tmp("botlist-rewrite");
        let path = dir.join("groups.json");
        let store = JsonGroupStore::open(&path).unwrap();

        let mut c = chat(-30, ChatKind::Group);
        store.from_source(&c).unwrap();
        assert!(path.exists());

        fs::remove_file(&path).unwrap();
        store.from_source(&c).unwrap();
        assert!(!path.exists());

        c.title = Some("renamed".to_string());
        store.from_source(&c).unwrap();
        assert!(path.exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn failed_write_leaves_store_unchanged() {
        let blocker = tmp("botlist-blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let store = JsonGroupStore::open(blocker.join("groups.json")).unwrap();

        assert!(store.from_source(&chat(-40, ChatKind::Group)).is_err());
        assert!(store.list().unwrap().is_empty());

        let _ = fs::remove_file(&blocker);
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let mut group = Group::from_chat(&chat(-7, ChatKind::Group));
        assert_eq!(group.display_name(), "group -7");
        group.title = None;
        group.username = Some("devs".to_string());
        assert_eq!(group.display_name(), "@devs");
        group.username = None;
        assert_eq!(group.display_name(), "-7");
    }
}

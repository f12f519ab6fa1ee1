use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{domain::UserId, errors::Error, guards::AuthorizedUsers, Result};

/// Typed configuration, read from the environment (and `.env` if present).
#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_bot_token: String,
    /// Users allowed through admin-only handlers.
    pub admins: Vec<i64>,
    /// The bot's own user id; resolved through `getMe` when unset.
    pub self_bot_id: Option<i64>,
    pub group_store_path: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(env_str)
    }

    /// Build the config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let telegram_bot_token = lookup("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let admins = parse_csv_i64(lookup("BOT_ADMINS"));
        if admins.is_empty() {
            return Err(Error::Config(
                "BOT_ADMINS environment variable is required".to_string(),
            ));
        }

        let self_bot_id = lookup("SELF_BOT_ID").and_then(|s| s.trim().parse::<i64>().ok());

        let group_store_path = match lookup("GROUP_STORE_PATH").and_then(non_empty) {
            Some(p) => PathBuf::from(p),
            None => {
                let home = lookup("HOME")
                    .and_then(non_empty)
                    .ok_or_else(|| Error::Config("HOME is not set".to_string()))?;
                PathBuf::from(home).join("data/botlist-groups.json")
            }
        };

        Ok(Self {
            telegram_bot_token,
            admins,
            self_bot_id,
            group_store_path,
        })
    }

    pub fn authorized_users(&self) -> AuthorizedUsers {
        self.admins.iter().copied().map(UserId).collect()
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn parse_csv_i64(v: Option<String>) -> Vec<i64> {
    v.unwrap_or_default()
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<i64>().ok())
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

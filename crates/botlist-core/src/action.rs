//! Callback action codec.
//!
//! Actions ride inside inline keyboard buttons, whose callback data is capped
//! at 64 bytes by Telegram. Encoding checks that cap after serializing and
//! fails loudly; decoding never fails and degrades to an empty action.

use serde_json::{Map, Value};

/// Telegram's hard limit on `callback_data`, in bytes.
pub const MAX_TOKEN_LEN: usize = 64;

/// Reserved token key holding the action name.
pub const NAME_KEY: &str = "a";

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("encoded action is {len} bytes, limit is {limit}")]
    Oversize { len: usize, limit: usize },

    #[error("parameter key `{NAME_KEY}` is reserved for the action name")]
    ReservedKey,

    #[error("failed to serialize action: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A structured button intent: short name plus ordered string parameters.
///
/// Parameter keys are unique; build actions through `param`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Action {
    name: Option<String>,
    params: Vec<(String, String)>,
}

impl Action {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            params: Vec::new(),
        }
    }

    /// The no-op action produced for unreadable tokens.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.params.is_empty()
    }

    /// Set a parameter. An existing key keeps its position and gets the new value.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let key = key.into();
        let value = value.to_string();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.params.push((key, value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Serialize an action into compact JSON, `"a"` first, params in order.
pub fn encode(action: &Action) -> Result<String, CodecError> {
    let mut obj = Map::new();
    if let Some(name) = &action.name {
        obj.insert(NAME_KEY.to_string(), Value::String(name.clone()));
    }
    for (key, value) in &action.params {
        if key == NAME_KEY {
            return Err(CodecError::ReservedKey);
        }
        obj.insert(key.clone(), Value::String(value.clone()));
    }

    let token = serde_json::to_string(&Value::Object(obj))?;
    if token.len() > MAX_TOKEN_LEN {
        return Err(CodecError::Oversize {
            len: token.len(),
            limit: MAX_TOKEN_LEN,
        });
    }
    Ok(token)
}

/// Parse a token back into an action. Anything unreadable yields `Action::empty()`.
pub fn decode(token: Option<&str>) -> Action {
    let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
        return Action::empty();
    };
    match parse(token) {
        Some(action) => action,
        None => {
            tracing::debug!(token, "ignoring malformed callback token");
            Action::empty()
        }
    }
}

fn parse(token: &str) -> Option<Action> {
    let Value::Object(obj) = serde_json::from_str::<Value>(token).ok()? else {
        return None;
    };

    let mut action = Action::empty();
    for (key, value) in obj {
        if key == NAME_KEY {
            action.name = Some(value.as_str()?.to_string());
            continue;
        }
        let value = match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null | Value::Array(_) | Value::Object(_) => return None,
        };
        action.params.push((key, value));
    }
    Some(action)
}

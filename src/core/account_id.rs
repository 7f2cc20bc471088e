use std::fmt;

use serde::{Serialize, Deserialize};

/// Key of an account in the store. Immutable once the account exists.
#[derive(Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId {
    name: String,
}

impl AccountId {
    pub fn new(name: impl Into<String>) -> AccountId {
        AccountId { name: name.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl From<&str> for AccountId {
    fn from(name: &str) -> Self {
        AccountId::new(name)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId {}", self.name)
    }
}

use serde::{Deserialize, Serialize};

/// Authenticated caller, decoded from the bearer token.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl Principal {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Principal {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

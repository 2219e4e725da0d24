use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Per-user document mirrored in the `user_docs` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDoc {
    pub user_id: String,
    pub counter: i64,
    pub updated_at: Option<String>,
}

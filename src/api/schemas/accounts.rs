use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserList {
    pub users: Vec<String>,
}

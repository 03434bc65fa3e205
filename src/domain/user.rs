/// A registered account. The password is only ever held as an Argon2 PHC string.
#[derive(Debug, Clone)]
pub struct User {
    pub(crate) username: String,
    #[allow(dead_code)]
    pub(crate) password_hash: String,
}

impl User {
    #[must_use]
    pub const fn new(username: String, password_hash: String) -> Self {
        Self { username, password_hash }
    }
}

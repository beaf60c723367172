use sqlx::FromRow;

/// A stored login: username plus bcrypt hash.
///
/// Never serialized into responses.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Credential {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
}

use serde::{Deserialize, Serialize};
use time::Date;

pub const DEFAULT_AVATAR: &str = "assets/images/default-avatar.png";

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// User record as stored under `registeredUsers`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,                  // timestamp id
    pub name: String,
    pub email: String,            // unique, exact match
    pub password_hash: String,    // argon2 PHC string
    #[serde(default)]
    pub phone: String,
    #[serde(with = "iso_date")]
    pub join_date: Date,
    #[serde(default = "default_avatar")]
    pub avatar: String,
}

fn default_avatar() -> String {
    DEFAULT_AVATAR.to_string()
}

/// Everything about a user that may leave the registry; also the session
/// record under `user`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(with = "iso_date")]
    pub join_date: Date,
    #[serde(default = "default_avatar")]
    pub avatar: String,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            phone: u.phone.clone(),
            join_date: u.join_date,
            avatar: u.avatar.clone(),
        }
    }
}

/// Validated registration input.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

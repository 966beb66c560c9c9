/// Authenticated principal
///
/// The dashboard has exactly one account, configured at startup. `User` is
/// its public projection: what goes into tokens and login responses. The
/// password never leaves `auth::credentials`.

use serde::{Deserialize, Serialize};

/// Public projection of the configured account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// Successful login payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Signed bearer token
    pub token: String,

    /// The authenticated account
    pub user: User,
}

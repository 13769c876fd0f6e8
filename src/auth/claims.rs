use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::Role;

/// Access-token claims. Tokens are issued by the external identity system
/// sharing this secret; this service only validates them. Authorization
/// decisions use the `IdentityDirectory` collaborator, not the token's
/// role snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user id)
    pub username: String,
    pub role: Role,
    pub exp: usize, // Expiration time (as UTC timestamp)
    pub iat: usize, // Issued at (as UTC timestamp)
}

impl Claims {
    pub fn new(user_id: &str, username: &str, role: Role, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours);

        Self {
            sub: user_id.to_string(),
            username: username.to_string(),
            role,
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated provider session.
///
/// Passed around explicitly as context; there is no ambient "current user"
/// singleton, which keeps authenticated and unauthenticated flows testable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// Provider-assigned user id
    pub local_id: String,
    pub email: String,
    /// Short-lived token attached to authenticated calls
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

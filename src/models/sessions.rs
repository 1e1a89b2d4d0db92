use serde::{Deserialize, Serialize};

/// Session payload written under the `"user"` key by the account service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: uuid::Uuid,
}

/// Trusted caller id, inserted into request extensions by `auth_middleware`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub uuid::Uuid);

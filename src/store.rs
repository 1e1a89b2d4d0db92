//! Storage contract for groups, memberships and invitations.
//!
//! The membership logic only needs the handful of lookups and writes below;
//! `PgGroupStore` is the production backend, `MemoryGroupStore` runs the same
//! rules without a database.

mod memory;
mod postgres;

pub use memory::MemoryGroupStore;
pub use postgres::PgGroupStore;

use thiserror::Error;
use uuid::Uuid;

use crate::models::groups::{GroupFacts, NewGroup};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A row with the same (group, user) key is already present.
    #[error("row already exists")]
    AlreadyExists,
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => StoreError::AlreadyExists,
            _ => StoreError::Backend(e.to_string()),
        }
    }
}

#[async_trait::async_trait]
pub trait GroupStore: Send + Sync {
    async fn insert_group(&self, group: &NewGroup) -> Result<(), StoreError>;

    /// The group row plus the membership flag and invitation existence for
    /// `user_id`. `None` if the group does not exist.
    async fn group_facts(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<GroupFacts>, StoreError>;

    /// Same lookup for every group, in the store's natural order.
    async fn all_group_facts(&self, user_id: Uuid) -> Result<Vec<GroupFacts>, StoreError>;

    async fn insert_membership(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        accepted: bool,
    ) -> Result<(), StoreError>;

    /// Deleting a missing row is not an error.
    async fn delete_membership(&self, group_id: Uuid, user_id: Uuid) -> Result<(), StoreError>;

    async fn insert_invitation(&self, group_id: Uuid, user_id: Uuid) -> Result<(), StoreError>;
}

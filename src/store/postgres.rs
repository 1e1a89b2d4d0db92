use sqlx::{pool::PoolConnection, PgPool, Postgres};
use uuid::Uuid;

use super::{GroupStore, StoreError};
use crate::{
    models::groups::{GroupFacts, NewGroup},
    queries::groups,
};


/// `GroupStore` over a Postgres pool. Each call takes its own connection;
/// nothing here opens a transaction.
#[derive(Clone)]
pub struct PgGroupStore {
    pool: PgPool,
}

impl PgGroupStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> Result<PoolConnection<Postgres>, StoreError> {
        self.pool.acquire().await.map_err(|e| {
            StoreError::Backend(format!("Failed to acquire database connection: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl GroupStore for PgGroupStore {
    async fn insert_group(&self, group: &NewGroup) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;
        groups::insert_group(&mut conn, group).await
    }

    async fn group_facts(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<GroupFacts>, StoreError> {
        let mut conn = self.conn().await?;
        groups::get_group_facts(&mut conn, group_id, user_id).await
    }

    async fn all_group_facts(&self, user_id: Uuid) -> Result<Vec<GroupFacts>, StoreError> {
        let mut conn = self.conn().await?;
        groups::get_all_group_facts(&mut conn, user_id).await
    }

    async fn insert_membership(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        accepted: bool,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;
        groups::insert_group_member(&mut conn, group_id, user_id, accepted).await
    }

    async fn delete_membership(&self, group_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;
        groups::delete_group_member(&mut conn, group_id, user_id).await
    }

    async fn insert_invitation(&self, group_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;
        groups::insert_group_invitation(&mut conn, group_id, user_id).await
    }
}

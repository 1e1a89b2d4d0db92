use std::sync::Arc;

use uuid::Uuid;

use super::{MembershipError, MembershipResult};
use crate::{
    models::groups::{GroupSummary, GroupView, JoinStatus},
    store::GroupStore,
};

/// Read side: derives a user's status from ownership, membership and
/// invitation rows. Never writes.
#[derive(Clone)]
pub struct Resolver {
    store: Arc<dyn GroupStore>,
}

impl Resolver {
    pub fn new(store: Arc<dyn GroupStore>) -> Self {
        Self { store }
    }

    pub async fn resolve_status(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> MembershipResult<JoinStatus> {
        Ok(self.resolve_group(group_id, user_id).await?.join_status)
    }

    pub async fn resolve_group(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> MembershipResult<GroupView> {
        let facts = self
            .store
            .group_facts(group_id, user_id)
            .await?
            .ok_or(MembershipError::NotFound)?;

        Ok(GroupView {
            join_status: facts.status_for(user_id),
            id: facts.id,
            title: facts.title,
            description: facts.description,
            owner_id: facts.owner_id,
            creation_date: facts.creation_date,
        })
    }

    /// One entry per existing group, in storage order.
    pub async fn resolve_all_for_user(
        &self,
        user_id: Uuid,
    ) -> MembershipResult<Vec<GroupSummary>> {
        let groups = self.store.all_group_facts(user_id).await?;

        Ok(groups
            .into_iter()
            .map(|facts| GroupSummary {
                join_status: facts.status_for(user_id),
                id: facts.id,
                title: facts.title,
            })
            .collect())
    }
}

use dashmap::{mapref::entry::Entry, DashMap, DashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{GroupStore, StoreError};
use crate::models::groups::{GroupFacts, NewGroup};

/// In-process `GroupStore`. Groups keep insertion order; the (group, user)
/// keyed tables reject duplicates the way the Postgres primary keys do.
#[derive(Default)]
pub struct MemoryGroupStore {
    groups: RwLock<Vec<NewGroup>>,
    members: DashMap<(Uuid, Uuid), bool>,
    invitations: DashSet<(Uuid, Uuid)>,
}

impl MemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepted flag of the membership row, if any.
    pub fn membership(&self, group_id: Uuid, user_id: Uuid) -> Option<bool> {
        self.members.get(&(group_id, user_id)).map(|row| *row)
    }

    pub fn membership_count(&self, group_id: Uuid) -> usize {
        self.members
            .iter()
            .filter(|row| row.key().0 == group_id)
            .count()
    }

    pub fn is_invited(&self, group_id: Uuid, user_id: Uuid) -> bool {
        self.invitations.contains(&(group_id, user_id))
    }

    pub fn invitation_count(&self, group_id: Uuid) -> usize {
        self.invitations
            .iter()
            .filter(|row| row.key().0 == group_id)
            .count()
    }

    fn facts(&self, group: &NewGroup, user_id: Uuid) -> GroupFacts {
        GroupFacts {
            id: group.id,
            title: group.title.clone(),
            description: group.description.clone(),
            owner_id: group.owner_id,
            creation_date: group.creation_date,
            membership: self.membership(group.id, user_id),
            invited: self.is_invited(group.id, user_id),
        }
    }
}

#[async_trait::async_trait]
impl GroupStore for MemoryGroupStore {
    async fn insert_group(&self, group: &NewGroup) -> Result<(), StoreError> {
        let mut groups = self.groups.write().await;
        if groups.iter().any(|g| g.id == group.id) {
            return Err(StoreError::AlreadyExists);
        }
        groups.push(group.clone());
        Ok(())
    }

    async fn group_facts(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<GroupFacts>, StoreError> {
        let groups = self.groups.read().await;
        Ok(groups
            .iter()
            .find(|g| g.id == group_id)
            .map(|g| self.facts(g, user_id)))
    }

    async fn all_group_facts(&self, user_id: Uuid) -> Result<Vec<GroupFacts>, StoreError> {
        let groups = self.groups.read().await;
        Ok(groups.iter().map(|g| self.facts(g, user_id)).collect())
    }

    async fn insert_membership(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        accepted: bool,
    ) -> Result<(), StoreError> {
        match self.members.entry((group_id, user_id)) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(accepted);
                Ok(())
            }
        }
    }

    async fn delete_membership(&self, group_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        self.members.remove(&(group_id, user_id));
        Ok(())
    }

    async fn insert_invitation(&self, group_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        if self.invitations.insert((group_id, user_id)) {
            Ok(())
        } else {
            Err(StoreError::AlreadyExists)
        }
    }
}

use std::{collections::HashSet, sync::Arc};

use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{MembershipError, MembershipResult, Resolver};
use crate::{
    models::groups::{GroupRecord, GroupSummary, GroupView, JoinAction, JoinStatus, NewGroup},
    store::{GroupStore, StoreError},
};

/// Write side: group creation, invitations and join/leave requests.
#[derive(Clone)]
pub struct MembershipEngine {
    store: Arc<dyn GroupStore>,
    resolver: Resolver,
}

impl MembershipEngine {
    pub fn new(store: Arc<dyn GroupStore>) -> Self {
        Self {
            resolver: Resolver::new(store.clone()),
            store,
        }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    #[instrument(skip(self, title, description))]
    pub async fn create_group(
        &self,
        title: String,
        description: String,
        owner_id: Uuid,
    ) -> MembershipResult<GroupRecord> {
        let group = NewGroup {
            id: Uuid::new_v4(),
            owner_id,
            title,
            description,
            creation_date: Utc::now().timestamp_millis(),
        };

        self.store.insert_group(&group).await?;
        info!(group_id = %group.id, "group created");

        Ok(group.into())
    }

    pub async fn list_groups(&self, user_id: Uuid) -> MembershipResult<Vec<GroupSummary>> {
        self.resolver.resolve_all_for_user(user_id).await
    }

    pub async fn get_group(&self, group_id: Uuid, user_id: Uuid) -> MembershipResult<GroupView> {
        self.resolver.resolve_group(group_id, user_id).await
    }

    /// Invites every target that is currently unrelated to the group and
    /// returns those ids in input order. Targets that are already members,
    /// requesters or invitees are skipped.
    #[instrument(skip(self, user_ids), fields(targets = user_ids.len()))]
    pub async fn invite_users(
        &self,
        group_id: Uuid,
        caller_id: Uuid,
        user_ids: &[Uuid],
    ) -> MembershipResult<Vec<Uuid>> {
        if self.resolver.resolve_status(group_id, caller_id).await? != JoinStatus::Member {
            return Err(MembershipError::NoAccess);
        }

        let mut seen = HashSet::with_capacity(user_ids.len());
        let mut invited = Vec::new();

        for &user_id in user_ids {
            if !seen.insert(user_id) {
                continue;
            }

            let status = self.resolver.resolve_status(group_id, user_id).await?;
            if status != JoinStatus::NotRelated {
                debug!(%user_id, ?status, "skipping invitation");
                continue;
            }

            match self.store.insert_invitation(group_id, user_id).await {
                Ok(()) => invited.push(user_id),
                Err(StoreError::AlreadyExists) => {
                    debug!(%user_id, "invitation already present");
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!(invited = invited.len(), "invitations sent");
        Ok(invited)
    }

    /// Applies a join (`want_join = true`) or leave/cancel request and returns
    /// the resulting status.
    ///
    /// Accepting an invitation is a plain join request: it lands in
    /// `PendingRequest` and the invitation row stays in place.
    #[instrument(skip(self))]
    pub async fn set_join_intent(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        want_join: bool,
    ) -> MembershipResult<JoinStatus> {
        let group = self.resolver.resolve_group(group_id, user_id).await?;
        let current = group.join_status;

        // Ownership is not a membership row and cannot be given up.
        if group.owner_id == user_id {
            return Ok(current);
        }

        let action = current.join_action(want_join);
        match action {
            JoinAction::Keep => {}
            JoinAction::InsertRequest => {
                match self.store.insert_membership(group_id, user_id, false).await {
                    Ok(()) | Err(StoreError::AlreadyExists) => {}
                    Err(e) => return Err(e.into()),
                }
            }
            JoinAction::DeleteMembership => {
                self.store.delete_membership(group_id, user_id).await?;
            }
        }

        let next = current.after(action);
        debug!(?current, ?next, "join intent applied");
        Ok(next)
    }
}

use serde::{Serialize, Serializer};
use uuid::Uuid;

/// A user's relationship to one group.
///
/// Never persisted. It is derived on every read from ownership, the
/// `group_members` row and the `group_invitation` row for the pair. The
/// discriminants are the codes sent over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum JoinStatus {
    NotRelated = 1,
    PendingRequest = 2,
    Member = 3,
    PendingInvite = 4,
}

/// The three persisted facts about a (group, user) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelationFacts {
    pub is_owner: bool,
    /// `None` when there is no `group_members` row, otherwise its accepted flag.
    pub membership: Option<bool>,
    pub invited: bool,
}

/// What a join/leave request does to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinAction {
    InsertRequest,
    DeleteMembership,
    Keep,
}

impl JoinStatus {
    /// Collapses the facts into one status.
    ///
    /// Precedence: Member > PendingRequest > PendingInvite > NotRelated.
    pub fn derive(facts: &RelationFacts) -> Self {
        match (facts.is_owner, facts.membership, facts.invited) {
            (true, _, _) | (_, Some(true), _) => JoinStatus::Member,
            (_, Some(false), _) => JoinStatus::PendingRequest,
            (_, None, true) => JoinStatus::PendingInvite,
            (_, None, false) => JoinStatus::NotRelated,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Joining from a state that already implies presence, or leaving from a
    /// state with no membership row, is a no-op.
    pub fn join_action(self, want_join: bool) -> JoinAction {
        match (self, want_join) {
            (JoinStatus::NotRelated | JoinStatus::PendingInvite, true) => JoinAction::InsertRequest,
            (JoinStatus::PendingRequest | JoinStatus::Member, false) => {
                JoinAction::DeleteMembership
            }
            _ => JoinAction::Keep,
        }
    }

    /// Status reported after `action` was applied from `self`.
    pub fn after(self, action: JoinAction) -> Self {
        match action {
            JoinAction::InsertRequest => JoinStatus::PendingRequest,
            JoinAction::DeleteMembership => JoinStatus::NotRelated,
            JoinAction::Keep => self,
        }
    }
}

impl Serialize for JoinStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Row shape returned by the correlated lookup over `groups`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct GroupFacts {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub owner_id: Uuid,
    pub creation_date: i64,
    pub membership: Option<bool>,
    pub invited: bool,
}

impl GroupFacts {
    pub fn relation(&self, user_id: Uuid) -> RelationFacts {
        RelationFacts {
            is_owner: self.owner_id == user_id,
            membership: self.membership,
            invited: self.invited,
        }
    }

    pub fn status_for(&self, user_id: Uuid) -> JoinStatus {
        JoinStatus::derive(&self.relation(user_id))
    }
}

#[derive(Debug, Clone)]
pub struct NewGroup {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub creation_date: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub creation_date: i64,
    pub owner_id: Uuid,
}

impl From<NewGroup> for GroupRecord {
    fn from(group: NewGroup) -> Self {
        GroupRecord {
            id: group.id,
            title: group.title,
            description: group.description,
            creation_date: group.creation_date,
            owner_id: group.owner_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub id: Uuid,
    pub title: String,
    pub join_status: JoinStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub owner_id: Uuid,
    pub creation_date: i64,
    pub join_status: JoinStatus,
}

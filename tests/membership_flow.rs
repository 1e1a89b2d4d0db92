use std::sync::Arc;

use groups_backend::{
    membership::{MembershipEngine, MembershipError},
    models::groups::{GroupFacts, JoinStatus, NewGroup},
    store::{GroupStore, MemoryGroupStore, StoreError},
};
use uuid::Uuid;

fn engine() -> (Arc<MemoryGroupStore>, MembershipEngine) {
    let store = Arc::new(MemoryGroupStore::new());
    let engine = MembershipEngine::new(store.clone());
    (store, engine)
}

async fn chess_club(engine: &MembershipEngine, owner: Uuid) -> Uuid {
    engine
        .create_group("Chess Club".into(), "Weekly games".into(), owner)
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn chess_club_scenario() {
    let (store, engine) = engine();
    let (u1, u2, u3) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

    let record = engine
        .create_group("Chess Club".into(), "Weekly games".into(), u1)
        .await
        .unwrap();
    assert_eq!(record.owner_id, u1);
    assert_eq!(record.title, "Chess Club");
    assert!(record.creation_date > 0);
    let g = record.id;

    assert_eq!(
        engine.get_group(g, u1).await.unwrap().join_status,
        JoinStatus::Member
    );

    let invited = engine.invite_users(g, u1, &[u2]).await.unwrap();
    assert_eq!(invited, vec![u2]);
    assert_eq!(
        engine.get_group(g, u2).await.unwrap().join_status,
        JoinStatus::PendingInvite
    );

    let status = engine.set_join_intent(g, u2, true).await.unwrap();
    assert_eq!(status, JoinStatus::PendingRequest);
    assert_eq!(store.membership(g, u2), Some(false));
    assert_eq!(store.membership_count(g), 1);
    // the invitation is left in place after acceptance
    assert!(store.is_invited(g, u2));

    assert_eq!(
        engine.get_group(g, u3).await.unwrap().join_status,
        JoinStatus::NotRelated
    );
}

#[tokio::test]
async fn owner_resolves_to_member_regardless_of_rows() {
    let (store, engine) = engine();
    let owner = Uuid::new_v4();
    let g = chess_club(&engine, owner).await;

    store.insert_invitation(g, owner).await.unwrap();
    store.insert_membership(g, owner, false).await.unwrap();

    assert_eq!(
        engine.resolver().resolve_status(g, owner).await.unwrap(),
        JoinStatus::Member
    );
}

#[tokio::test]
async fn join_twice_keeps_one_pending_row() {
    let (store, engine) = engine();
    let g = chess_club(&engine, Uuid::new_v4()).await;
    let user = Uuid::new_v4();

    assert_eq!(
        engine.set_join_intent(g, user, true).await.unwrap(),
        JoinStatus::PendingRequest
    );
    assert_eq!(
        engine.set_join_intent(g, user, true).await.unwrap(),
        JoinStatus::PendingRequest
    );
    assert_eq!(store.membership_count(g), 1);
}

#[tokio::test]
async fn leaving_when_unrelated_is_a_no_op() {
    let (store, engine) = engine();
    let g = chess_club(&engine, Uuid::new_v4()).await;
    let user = Uuid::new_v4();

    assert_eq!(
        engine.set_join_intent(g, user, false).await.unwrap(),
        JoinStatus::NotRelated
    );
    assert_eq!(store.membership_count(g), 0);
}

#[tokio::test]
async fn join_then_leave_removes_the_row() {
    let (store, engine) = engine();
    let g = chess_club(&engine, Uuid::new_v4()).await;
    let user = Uuid::new_v4();

    engine.set_join_intent(g, user, true).await.unwrap();
    assert_eq!(
        engine.set_join_intent(g, user, false).await.unwrap(),
        JoinStatus::NotRelated
    );
    assert_eq!(store.membership(g, user), None);
    assert_eq!(
        engine.resolver().resolve_status(g, user).await.unwrap(),
        JoinStatus::NotRelated
    );
}

#[tokio::test]
async fn accepted_member_can_leave() {
    let (store, engine) = engine();
    let g = chess_club(&engine, Uuid::new_v4()).await;
    let user = Uuid::new_v4();
    store.insert_membership(g, user, true).await.unwrap();

    assert_eq!(
        engine.set_join_intent(g, user, true).await.unwrap(),
        JoinStatus::Member
    );
    assert_eq!(
        engine.set_join_intent(g, user, false).await.unwrap(),
        JoinStatus::NotRelated
    );
    assert_eq!(store.membership_count(g), 0);
}

#[tokio::test]
async fn declining_an_invitation_changes_nothing() {
    let (store, engine) = engine();
    let owner = Uuid::new_v4();
    let g = chess_club(&engine, owner).await;
    let user = Uuid::new_v4();
    engine.invite_users(g, owner, &[user]).await.unwrap();

    assert_eq!(
        engine.set_join_intent(g, user, false).await.unwrap(),
        JoinStatus::PendingInvite
    );
    assert!(store.is_invited(g, user));
    assert_eq!(store.membership_count(g), 0);
}

#[tokio::test]
async fn owner_cannot_leave() {
    let (store, engine) = engine();
    let owner = Uuid::new_v4();
    let g = chess_club(&engine, owner).await;

    assert_eq!(
        engine.set_join_intent(g, owner, false).await.unwrap(),
        JoinStatus::Member
    );
    assert_eq!(
        engine.set_join_intent(g, owner, true).await.unwrap(),
        JoinStatus::Member
    );
    assert_eq!(store.membership_count(g), 0);
}

#[tokio::test]
async fn non_member_cannot_invite() {
    let (store, engine) = engine();
    let owner = Uuid::new_v4();
    let g = chess_club(&engine, owner).await;
    let requester = Uuid::new_v4();
    engine.set_join_intent(g, requester, true).await.unwrap();

    for caller in [Uuid::new_v4(), requester] {
        let err = engine
            .invite_users(g, caller, &[Uuid::new_v4()])
            .await
            .unwrap_err();
        assert!(matches!(err, MembershipError::NoAccess));
    }
    assert_eq!(store.invitation_count(g), 0);
}

#[tokio::test]
async fn accepted_member_can_invite() {
    let (store, engine) = engine();
    let g = chess_club(&engine, Uuid::new_v4()).await;
    let member = Uuid::new_v4();
    store.insert_membership(g, member, true).await.unwrap();
    let target = Uuid::new_v4();

    assert_eq!(
        engine.invite_users(g, member, &[target]).await.unwrap(),
        vec![target]
    );
}

#[tokio::test]
async fn invite_skips_related_targets() {
    let (store, engine) = engine();
    let owner = Uuid::new_v4();
    let g = chess_club(&engine, owner).await;

    let member = Uuid::new_v4();
    store.insert_membership(g, member, true).await.unwrap();
    let requester = Uuid::new_v4();
    engine.set_join_intent(g, requester, true).await.unwrap();
    let invitee = Uuid::new_v4();
    engine.invite_users(g, owner, &[invitee]).await.unwrap();
    assert_eq!(store.invitation_count(g), 1);

    let fresh = Uuid::new_v4();
    let invited = engine
        .invite_users(g, owner, &[member, requester, invitee, owner, fresh, fresh])
        .await
        .unwrap();

    assert_eq!(invited, vec![fresh]);
    assert_eq!(store.invitation_count(g), 2);
    assert!(!store.is_invited(g, member));
    assert!(!store.is_invited(g, requester));
}

#[tokio::test]
async fn unknown_group_is_not_found() {
    let (_store, engine) = engine();
    let missing = Uuid::new_v4();
    let user = Uuid::new_v4();

    assert!(matches!(
        engine.get_group(missing, user).await,
        Err(MembershipError::NotFound)
    ));
    assert!(matches!(
        engine.invite_users(missing, user, &[Uuid::new_v4()]).await,
        Err(MembershipError::NotFound)
    ));
    assert!(matches!(
        engine.set_join_intent(missing, user, true).await,
        Err(MembershipError::NotFound)
    ));
}

#[tokio::test]
async fn list_has_one_entry_per_group_in_creation_order() {
    let (_store, engine) = engine();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let chess = chess_club(&engine, alice).await;
    let go = engine
        .create_group("Go Club".into(), String::new(), bob)
        .await
        .unwrap()
        .id;
    let poker = engine
        .create_group("Poker Night".into(), String::new(), bob)
        .await
        .unwrap()
        .id;
    engine.invite_users(go, bob, &[alice]).await.unwrap();
    engine.set_join_intent(poker, alice, true).await.unwrap();

    let listed = engine.list_groups(alice).await.unwrap();
    let summary: Vec<_> = listed
        .iter()
        .map(|g| (g.id, g.title.as_str(), g.join_status))
        .collect();

    assert_eq!(
        summary,
        vec![
            (chess, "Chess Club", JoinStatus::Member),
            (go, "Go Club", JoinStatus::PendingInvite),
            (poker, "Poker Night", JoinStatus::PendingRequest),
        ]
    );

    let for_stranger = engine.list_groups(Uuid::new_v4()).await.unwrap();
    assert_eq!(for_stranger.len(), 3);
    assert!(for_stranger
        .iter()
        .all(|g| g.join_status == JoinStatus::NotRelated));
}

/// Reports every pair as unrelated, like a read that lost a race with a
/// concurrent write.
struct StaleReads(MemoryGroupStore);

#[async_trait::async_trait]
impl GroupStore for StaleReads {
    async fn insert_group(&self, group: &NewGroup) -> Result<(), StoreError> {
        self.0.insert_group(group).await
    }

    async fn group_facts(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<GroupFacts>, StoreError> {
        Ok(self
            .0
            .group_facts(group_id, user_id)
            .await?
            .map(|facts| GroupFacts {
                membership: None,
                invited: false,
                ..facts
            }))
    }

    async fn all_group_facts(&self, user_id: Uuid) -> Result<Vec<GroupFacts>, StoreError> {
        self.0.all_group_facts(user_id).await
    }

    async fn insert_membership(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        accepted: bool,
    ) -> Result<(), StoreError> {
        self.0.insert_membership(group_id, user_id, accepted).await
    }

    async fn delete_membership(&self, group_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        self.0.delete_membership(group_id, user_id).await
    }

    async fn insert_invitation(&self, group_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        self.0.insert_invitation(group_id, user_id).await
    }
}

#[tokio::test]
async fn duplicate_inserts_from_lost_races_are_benign() {
    let store = Arc::new(StaleReads(MemoryGroupStore::new()));
    let engine = MembershipEngine::new(store.clone());
    let owner = Uuid::new_v4();
    let g = chess_club(&engine, owner).await;
    let user = Uuid::new_v4();

    assert_eq!(
        engine.set_join_intent(g, user, true).await.unwrap(),
        JoinStatus::PendingRequest
    );
    assert_eq!(
        engine.set_join_intent(g, user, true).await.unwrap(),
        JoinStatus::PendingRequest
    );
    assert_eq!(store.0.membership_count(g), 1);

    let target = Uuid::new_v4();
    assert_eq!(
        engine.invite_users(g, owner, &[target]).await.unwrap(),
        vec![target]
    );
    assert!(engine
        .invite_users(g, owner, &[target])
        .await
        .unwrap()
        .is_empty());
    assert_eq!(store.0.invitation_count(g), 1);
}

struct BrokenStore;

#[async_trait::async_trait]
impl GroupStore for BrokenStore {
    async fn insert_group(&self, _group: &NewGroup) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn group_facts(
        &self,
        _group_id: Uuid,
        _user_id: Uuid,
    ) -> Result<Option<GroupFacts>, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn all_group_facts(&self, _user_id: Uuid) -> Result<Vec<GroupFacts>, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn insert_membership(
        &self,
        _group_id: Uuid,
        _user_id: Uuid,
        _accepted: bool,
    ) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn delete_membership(&self, _group_id: Uuid, _user_id: Uuid) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn insert_invitation(&self, _group_id: Uuid, _user_id: Uuid) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }
}

#[tokio::test]
async fn storage_failures_pass_through() {
    let engine = MembershipEngine::new(Arc::new(BrokenStore));
    let user = Uuid::new_v4();

    assert!(matches!(
        engine.create_group("x".into(), String::new(), user).await,
        Err(MembershipError::Storage(StoreError::Backend(_)))
    ));
    assert!(matches!(
        engine.list_groups(user).await,
        Err(MembershipError::Storage(_))
    ));
    assert!(matches!(
        engine.set_join_intent(Uuid::new_v4(), user, true).await,
        Err(MembershipError::Storage(_))
    ));
}

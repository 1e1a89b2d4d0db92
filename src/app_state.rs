use crate::membership::MembershipEngine;

#[derive(Clone)]
pub struct AppState {
    pub membership: MembershipEngine,
}

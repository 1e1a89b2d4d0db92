//! Group membership rules.
//!
//! [`Resolver`] turns stored facts into a [`JoinStatus`]; [`MembershipEngine`]
//! reads that status and decides which insert or delete, if any, a request
//! leads to.
//!
//! Reads and writes are separate storage round-trips with no transaction
//! around them. Two overlapping requests for the same pair resolve to
//! whichever write lands last, and a duplicate insert rejected by the
//! (group, user) key is treated as already being in the target state.
//!
//! [`JoinStatus`]: crate::models::groups::JoinStatus

mod engine;
mod resolver;

pub use engine::MembershipEngine;
pub use resolver::Resolver;

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum MembershipError {
    #[error("group not found")]
    NotFound,
    #[error("no access to this action")]
    NoAccess,
    #[error(transparent)]
    Storage(#[from] StoreError),
}

pub type MembershipResult<T> = Result<T, MembershipError>;

//! Failure taxonomy for the menu orchestration core.

use thiserror::Error;

use crate::{session::SessionState, slots::SlotName};

#[derive(Debug, Error)]
pub enum MenuError {
    /// Sign-in check returned false or could not be performed.
    #[error("authorization denied")]
    AuthorizationDenied,
    #[error("failed to fetch playlist info")]
    FetchFailed(#[source] anyhow::Error),
    #[error("{slot} mutation failed")]
    MutationFailed {
        slot: SlotName,
        #[source]
        source: anyhow::Error,
    },
    /// Superseded by a later claim on the same slot, or torn down with the session.
    #[error("{0} operation cancelled")]
    Cancelled(SlotName),
    #[error("no menu entry at index {0}")]
    NoSuchEntry(usize),
    #[error("menu entry {index} is not a {expected} entry")]
    WrongEntryKind {
        index: usize,
        expected: &'static str,
    },
    #[error("menu is not built (state: {0:?})")]
    NotBuilt(SessionState),
}

impl MenuError {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

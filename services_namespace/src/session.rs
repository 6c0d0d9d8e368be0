//! Caller position in the namespace

use block_store::BlockId;

/// Where a caller currently is
///
/// Sessions are plain values: the service never stores one. Operations read
/// the caller's session and return a new one when the caller moves.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    /// Nothing selected yet
    #[default]
    NoUser,
    /// A user is selected and the caller sits on one of its blocks
    UserSelected { user: String, block: BlockId },
}

impl Session {
    /// Session positioned on a user's root block
    pub fn at_root(user: impl Into<String>) -> Self {
        Session::UserSelected {
            user: user.into(),
            block: BlockId::ROOT,
        }
    }

    /// Selected user, if any
    pub fn user(&self) -> Option<&str> {
        match self {
            Session::NoUser => None,
            Session::UserSelected { user, .. } => Some(user),
        }
    }

    /// Current block, if a user is selected
    pub fn block(&self) -> Option<BlockId> {
        match self {
            Session::NoUser => None,
            Session::UserSelected { block, .. } => Some(*block),
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Session::UserSelected { .. })
    }

    /// Same user, different block
    pub fn moved_to(&self, block: BlockId) -> Self {
        match self {
            Session::NoUser => Session::NoUser,
            Session::UserSelected { user, .. } => Session::UserSelected {
                user: user.clone(),
                block,
            },
        }
    }
}

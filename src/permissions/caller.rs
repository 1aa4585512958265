//! Request callers and acting users

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::User;
use crate::permissions::policy::{authorize, Operation};
use crate::service::error::AccessControlResult;
use crate::types::{Role, UserId};

/// An authenticated user performing an operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    /// Id of the acting user
    pub user_id: UserId,
    /// Username, used in event descriptions
    pub username: String,
    /// Role at the time of the request
    pub role: Role,
}

impl Actor {
    /// Create an actor
    pub fn new(user_id: UserId, username: impl Into<String>, role: Role) -> Self {
        Self { user_id, username: username.into(), role }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.username.clone(), user.role)
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.username, self.role)
    }
}

/// Whoever submitted a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Caller {
    /// No credentials were presented
    Anonymous,
    /// A resolved, active user
    Authenticated(Actor),
}

impl Caller {
    /// Role of the caller, `None` when anonymous
    pub fn role(&self) -> Option<Role> {
        match self {
            Caller::Anonymous => None,
            Caller::Authenticated(actor) => Some(actor.role),
        }
    }

    /// Acting user, `None` when anonymous
    pub fn actor(&self) -> Option<&Actor> {
        match self {
            Caller::Anonymous => None,
            Caller::Authenticated(actor) => Some(actor),
        }
    }

    /// Check the policy for `operation`
    pub fn require(&self, operation: Operation) -> AccessControlResult<()> {
        authorize(self.role(), operation).into_result(operation)
    }
}

impl From<Actor> for Caller {
    fn from(actor: Actor) -> Self {
        Caller::Authenticated(actor)
    }
}

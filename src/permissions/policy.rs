//! Role-based authorization policy
//!
//! This module contains the [`Operation`] catalogue, its grouping into
//! operation classes, and the pure [`authorize`] function mapping a caller
//! role and an operation to an allow or deny decision.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::service::error::{AccessControlError, AccessControlResult};
use crate::types::{EntityKind, Role};

/// Operations subject to authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// List or inspect records of a kind
    Read(EntityKind),
    /// Create a record of a kind
    Create(EntityKind),
    /// Modify a record of a kind
    Update(EntityKind),
    /// Delete or deactivate a record of a kind
    Delete(EntityKind),
    /// Set a sensor ACTIVE
    ActivateSensor,
    /// Set a sensor INACTIVE
    DeactivateSensor,
    /// Manually open a barrier
    OpenBarrier,
    /// Manually close a barrier
    CloseBarrier,
    /// Evaluate a presented credential
    VerifyAccess,
    /// Read the event log
    QueryEvents,
}

/// Authorization classes that operations fall into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationClass {
    /// Listing or inspecting; any authenticated role
    Read,
    /// Creating, updating, deleting, activating, deactivating; ADMIN only
    Mutate,
    /// Manual barrier open/close; any authenticated role
    ManualBarrierCommand,
    /// Credential verification; any authenticated role
    VerifyAccess,
}

impl Operation {
    /// Class deciding which roles may perform this operation
    pub fn class(&self) -> OperationClass {
        match self {
            Operation::Read(_) | Operation::QueryEvents => OperationClass::Read,
            Operation::Create(_)
            | Operation::Update(_)
            | Operation::Delete(_)
            | Operation::ActivateSensor
            | Operation::DeactivateSensor => OperationClass::Mutate,
            Operation::OpenBarrier | Operation::CloseBarrier => OperationClass::ManualBarrierCommand,
            Operation::VerifyAccess => OperationClass::VerifyAccess,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read(kind) => write!(f, "read {}", kind),
            Operation::Create(kind) => write!(f, "create {}", kind),
            Operation::Update(kind) => write!(f, "update {}", kind),
            Operation::Delete(kind) => write!(f, "delete {}", kind),
            Operation::ActivateSensor => write!(f, "activate sensor"),
            Operation::DeactivateSensor => write!(f, "deactivate sensor"),
            Operation::OpenBarrier => write!(f, "open barrier"),
            Operation::CloseBarrier => write!(f, "close barrier"),
            Operation::VerifyAccess => write!(f, "verify access"),
            Operation::QueryEvents => write!(f, "query events"),
        }
    }
}

/// Why an operation was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DenyReason {
    /// No authenticated caller
    Unauthenticated,
    /// The caller's role does not cover the operation class
    InsufficientRole,
}

/// Outcome of an authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Authorization {
    /// The operation may proceed
    Allow,
    /// The operation is refused
    Deny(DenyReason),
}

impl Authorization {
    /// Whether the operation may proceed
    pub fn is_allowed(&self) -> bool {
        matches!(self, Authorization::Allow)
    }

    /// Convert into a result carrying the matching error for `operation`
    pub fn into_result(self, operation: Operation) -> AccessControlResult<()> {
        match self {
            Authorization::Allow => Ok(()),
            Authorization::Deny(DenyReason::Unauthenticated) => Err(AccessControlError::Unauthenticated),
            Authorization::Deny(DenyReason::InsufficientRole) => Err(AccessControlError::forbidden(operation)),
        }
    }
}

/// Decide whether a caller with `role` may perform `operation`
///
/// `None` is an unauthenticated caller and is always denied. Manual barrier
/// commands are open to operators even though every other mutation is
/// reserved for administrators.
pub fn authorize(role: Option<Role>, operation: Operation) -> Authorization {
    let Some(role) = role else {
        return Authorization::Deny(DenyReason::Unauthenticated);
    };
    match (operation.class(), role) {
        (OperationClass::Mutate, Role::Admin) => Authorization::Allow,
        (OperationClass::Mutate, Role::Operator) => Authorization::Deny(DenyReason::InsufficientRole),
        (OperationClass::Read, _) | (OperationClass::ManualBarrierCommand, _) | (OperationClass::VerifyAccess, _) => {
            Authorization::Allow
        }
    }
}

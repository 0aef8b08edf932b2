//! Resource-level authorization predicates.
//!
//! Every protected operation reduces its rule to one of the functions below,
//! each of the shape `(identity, resource owner(s)) -> Access`. Handlers and
//! extractors call [`Access::ensure`] to turn a decision into a result, so a
//! denial always surfaces as the same `Unauthorized` error regardless of which
//! resource type was being checked.

use crate::error::{CoreError, CoreResult};

/// Message returned to callers that are not associated with a resource.
pub const NOT_ASSOCIATED: &str = "Must be an associated user";

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Authorized,
    Forbidden,
}

impl Access {
    fn from_bool(allowed: bool) -> Self {
        if allowed {
            Access::Authorized
        } else {
            Access::Forbidden
        }
    }

    /// Convert the decision into a result.
    ///
    /// `Forbidden` maps to [`CoreError::Unauthorized`] with a fixed message so
    /// the response never hints at whether the resource exists.
    pub fn ensure(self) -> CoreResult<()> {
        match self {
            Access::Authorized => Ok(()),
            Access::Forbidden => Err(denied()),
        }
    }
}

/// The error produced for any denied resource check.
pub fn denied() -> CoreError {
    CoreError::Unauthorized(NOT_ASSOCIATED.into())
}

/// The caller must be the owner of the resource (e.g. `/users/{username}`).
pub fn self_only(identity: &str, owner: &str) -> Access {
    Access::from_bool(identity == owner)
}

/// The caller must be either the sender or the recipient of a message.
pub fn participant(identity: &str, sender: &str, recipient: &str) -> Access {
    Access::from_bool(identity == sender || identity == recipient)
}

/// The caller must be the recipient of a message.
pub fn recipient_only(identity: &str, recipient: &str) -> Access {
    self_only(identity, recipient)
}

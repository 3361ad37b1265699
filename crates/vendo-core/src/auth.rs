//! # Identity & Authorization Contract
//!
//! Vendo does not authenticate anyone itself — token issuance and password
//! hashing live in an external collaborator. What the stores and the engine
//! need is the *result* of authentication: which account is calling and with
//! which role. This module is that contract.
//!
//! The engine trusts that [`authorize`] ran before it was invoked; it does
//! not re-check ownership or roles, only the validity of its own inputs.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::Role;

/// A resolved caller identity, produced by the external auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// The authenticated account's id.
    pub account_id: String,
    /// The role the credential resolved to.
    pub role: Role,
}

impl Identity {
    pub fn new(account_id: impl Into<String>, role: Role) -> Self {
        Identity {
            account_id: account_id.into(),
            role,
        }
    }
}

/// Role gate: fails `Forbidden` unless the identity's role is allowed.
///
/// ## Example
/// ```rust
/// use vendo_core::auth::{authorize, Identity};
/// use vendo_core::Role;
///
/// let buyer = Identity::new("acc-1", Role::Buyer);
/// assert!(authorize(&buyer, &[Role::Buyer]).is_ok());
/// assert!(authorize(&buyer, &[Role::Seller]).is_err());
/// ```
pub fn authorize(identity: &Identity, allowed: &[Role]) -> CoreResult<()> {
    if allowed.contains(&identity.role) {
        Ok(())
    } else {
        Err(CoreError::Forbidden {
            required: allowed.to_vec(),
        })
    }
}

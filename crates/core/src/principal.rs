//! Principals, owners, and the ownership predicate.

use serde::{Deserialize, Serialize};

/// An authenticated caller, as surfaced by the (excluded) HTTP layer.
///
/// Authorization in the portal is determined entirely by the normalized
/// email claim; the display name is carried only for audit fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Display name.
    pub name: String,
    /// Email claim.
    pub email: String,
}

impl Principal {
    /// Create a principal from name and email claims.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// The normalized (trimmed, lowercased) email used for ownership checks.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_ascii_lowercase()
    }
}

/// A (name, email) pair authorized to edit a dataset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Owner display name.
    pub name: String,
    /// Owner email; matched case-insensitively against the acting principal.
    pub email: String,
}

impl Owner {
    /// Create an owner entry.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Check whether a principal may edit a dataset with the given owners.
///
/// A pure predicate over (owner list, principal): the principal's
/// normalized email must match one owner's email, case-insensitively.
/// An empty email claim never matches.
pub fn is_owner(owners: &[Owner], principal: &Principal) -> bool {
    let email = principal.normalized_email();
    if email.is_empty() {
        return false;
    }
    owners
        .iter()
        .any(|owner| owner.email.trim().eq_ignore_ascii_case(&email))
}

//! Container references and attachments.

use serde::{Deserialize, Serialize};

/// The only storage type the portal knows how to import from.
pub const SUPPORTED_STORAGE_TYPE: &str = "blob";

/// The (account, container-name) pair identifying where bulk content lives.
///
/// At most one container is active per dataset from the caller's
/// perspective; a content edit is the only window where an original and
/// a shadow container legitimately coexist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRef {
    /// Storage account name.
    pub account: String,
    /// Container name within the account.
    pub container: String,
}

impl ContainerRef {
    /// Create a container reference.
    pub fn new(account: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            container: container.into(),
        }
    }
}

/// Attachment-style pointer from a nomination to its content container.
///
/// `storage_type` is recorded as a string because it round-trips through
/// the document store; consumers must validate it with
/// [`ContainerAttachment::validate_storage_type`] before acting on it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerAttachment {
    /// Storage type discriminator (expected: `"blob"`).
    pub storage_type: String,
    /// Storage account name.
    pub account: String,
    /// Container name within the account.
    pub container: String,
    /// Resolved public locator for the container.
    pub media_link: String,
}

impl ContainerAttachment {
    /// Create an attachment for the supported storage type.
    pub fn new(
        account: impl Into<String>,
        container: impl Into<String>,
        media_link: impl Into<String>,
    ) -> Self {
        Self {
            storage_type: SUPPORTED_STORAGE_TYPE.to_string(),
            account: account.into(),
            container: container.into(),
            media_link: media_link.into(),
        }
    }

    /// The (account, container) pair of this attachment.
    pub fn container_ref(&self) -> ContainerRef {
        ContainerRef::new(&self.account, &self.container)
    }

    /// Validate the storage type discriminator.
    ///
    /// A mismatch indicates corrupted external data, not a caller error.
    pub fn validate_storage_type(&self) -> crate::Result<()> {
        if self.storage_type == SUPPORTED_STORAGE_TYPE {
            Ok(())
        } else {
            Err(crate::Error::InvalidStorageType(
                self.storage_type.clone(),
            ))
        }
    }
}

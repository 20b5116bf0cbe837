//! Access token issuing, validation, and revocation.
//!
//! Grants are HMAC-SHA256 signed bearer tokens scoped to one container
//! (or one object) with a bounded lifetime. Read grants rely on expiry
//! alone. Edit grants are signed against a *named policy* stored on the
//! container, so removing the policy invalidates every outstanding edit
//! token immediately; this is what makes publish/cancel able to fence
//! off a client that still holds a token from an earlier browser
//! session.

use crate::error::{StorageError, StorageResult};
use crate::traits::{AccessPolicy, ObjectStore, Permissions};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use std::sync::Arc;
use time::OffsetDateTime;

type HmacSha256 = Hmac<Sha256>;

/// Name of the revocable policy backing edit tokens.
///
/// One content edit per dataset at a time means one edit policy per
/// container; a fixed name keeps revocation a single idempotent call.
pub const EDIT_POLICY_NAME: &str = "edit-session";

/// Wire format version tag.
const TOKEN_VERSION: &str = "v1";

/// What a token is scoped to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenScope {
    /// Whole container.
    Container,
    /// A single object within a container.
    Object,
}

impl TokenScope {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Object => "object",
        }
    }

    fn parse(s: &str) -> StorageResult<Self> {
        match s {
            "container" => Ok(Self::Container),
            "object" => Ok(Self::Object),
            _ => Err(StorageError::InvalidToken(format!("unknown scope: {s}"))),
        }
    }
}

/// The validated contents of an access token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenClaims {
    /// Token scope.
    pub scope: TokenScope,
    /// Storage account.
    pub account: String,
    /// Container name.
    pub container: String,
    /// Object name, for object-scoped tokens.
    pub object: Option<String>,
    /// Named policy the token is bound to, if revocable.
    pub policy: Option<String>,
    /// Granted permissions.
    pub permissions: Permissions,
    /// Expiry instant.
    pub expires_at: OffsetDateTime,
}

impl TokenClaims {
    fn canonical(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}",
            TOKEN_VERSION,
            self.scope.as_str(),
            self.account,
            self.container,
            self.object.as_deref().unwrap_or(""),
            self.policy.as_deref().unwrap_or(""),
            self.permissions.token_string(),
            self.expires_at.unix_timestamp(),
        )
    }
}

/// A time-limited, scope-limited credential handed to a client.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessGrant {
    /// Locator of the granted resource.
    pub resource: String,
    /// The signed bearer token.
    pub token: String,
    /// Permissions the token carries.
    pub permissions: Permissions,
    /// When the token expires.
    pub expires_at: OffsetDateTime,
}

impl fmt::Debug for AccessGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessGrant")
            .field("resource", &self.resource)
            .field("token", &"<redacted>")
            .field("permissions", &self.permissions)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Mints and revokes access tokens against an object store.
pub struct TokenIssuer {
    store: Arc<dyn ObjectStore>,
    key: Vec<u8>,
    read_ttl: time::Duration,
    edit_ttl: time::Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("backend", &self.store.backend_name())
            .field("key", &"<redacted>")
            .field("read_ttl", &self.read_ttl)
            .field("edit_ttl", &self.edit_ttl)
            .finish()
    }
}

impl TokenIssuer {
    /// Create an issuer with the given signing key and lifetimes.
    pub fn new(
        store: Arc<dyn ObjectStore>,
        key: impl Into<Vec<u8>>,
        read_ttl: time::Duration,
        edit_ttl: time::Duration,
    ) -> StorageResult<Self> {
        let key = key.into();
        if key.len() < 32 {
            return Err(StorageError::Config(format!(
                "signing key must be at least 32 bytes, got {}",
                key.len()
            )));
        }
        Ok(Self {
            store,
            key,
            read_ttl,
            edit_ttl,
        })
    }

    /// Create an issuer with a fixed key and the default lifetimes.
    ///
    /// **For testing only.**
    pub fn for_testing(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            key: vec![7u8; 32],
            read_ttl: time::Duration::days(30),
            edit_ttl: time::Duration::days(7),
        }
    }

    /// Issue a read + list token for a container.
    ///
    /// Long-lived (30 days by default) and not individually revocable;
    /// read-only access relies on expiry.
    pub fn issue_read_token(&self, account: &str, container: &str) -> StorageResult<AccessGrant> {
        let claims = TokenClaims {
            scope: TokenScope::Container,
            account: account.to_string(),
            container: container.to_string(),
            object: None,
            policy: None,
            permissions: Permissions::read_only(),
            expires_at: OffsetDateTime::now_utc() + self.read_ttl,
        };
        self.sign(claims, self.store.container_url(account, container))
    }

    /// Issue a read token scoped to a single object.
    pub fn issue_file_read_token(
        &self,
        account: &str,
        container: &str,
        file_name: &str,
    ) -> StorageResult<AccessGrant> {
        let claims = TokenClaims {
            scope: TokenScope::Object,
            account: account.to_string(),
            container: container.to_string(),
            object: Some(file_name.to_string()),
            policy: None,
            permissions: Permissions::read_only(),
            expires_at: OffsetDateTime::now_utc() + self.read_ttl,
        };
        let resource = format!(
            "{}/{file_name}",
            self.store.container_url(account, container)
        );
        self.sign(claims, resource)
    }

    /// Issue a full-access edit token for a container.
    ///
    /// Stores a named policy on the container and signs against it, so
    /// [`TokenIssuer::revoke_edit_token`] invalidates all outstanding
    /// edit tokens at once.
    pub async fn issue_edit_token(
        &self,
        account: &str,
        container: &str,
    ) -> StorageResult<AccessGrant> {
        let expires_at = OffsetDateTime::now_utc() + self.edit_ttl;
        let policy = AccessPolicy {
            name: EDIT_POLICY_NAME.to_string(),
            permissions: Permissions::full(),
            expires_at,
        };
        self.store
            .set_access_policy(account, container, policy)
            .await?;
        tracing::debug!(account, container, policy = EDIT_POLICY_NAME, "edit policy stored");

        let claims = TokenClaims {
            scope: TokenScope::Container,
            account: account.to_string(),
            container: container.to_string(),
            object: None,
            policy: Some(EDIT_POLICY_NAME.to_string()),
            permissions: Permissions::full(),
            expires_at,
        };
        self.sign(claims, self.store.container_url(account, container))
    }

    /// Revoke all outstanding edit tokens for a container.
    ///
    /// Idempotent: a container without the edit policy is left as-is.
    pub async fn revoke_edit_token(&self, account: &str, container: &str) -> StorageResult<()> {
        let removed = self
            .store
            .remove_access_policy(account, container, EDIT_POLICY_NAME)
            .await?;
        tracing::debug!(account, container, removed, "edit policy revoked");
        Ok(())
    }

    /// Validate a token: signature, expiry, and (for policy-bound
    /// tokens) continued existence of the named policy.
    pub async fn validate(&self, token: &str) -> StorageResult<TokenClaims> {
        let claims = self.verify_signature(token)?;

        if OffsetDateTime::now_utc() > claims.expires_at {
            return Err(StorageError::InvalidToken("token expired".to_string()));
        }

        if let Some(policy_name) = &claims.policy {
            let policy = self
                .store
                .get_access_policy(&claims.account, &claims.container, policy_name)
                .await?
                .ok_or_else(|| StorageError::InvalidToken("policy revoked".to_string()))?;
            if OffsetDateTime::now_utc() > policy.expires_at {
                return Err(StorageError::InvalidToken("policy expired".to_string()));
            }
        }

        Ok(claims)
    }

    fn sign(&self, claims: TokenClaims, resource: String) -> StorageResult<AccessGrant> {
        let payload = claims.canonical();
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| StorageError::Config(format!("invalid signing key: {e}")))?;
        mac.update(payload.as_bytes());
        let signature = mac.finalize().into_bytes();

        let token = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(payload.as_bytes()),
            URL_SAFE_NO_PAD.encode(signature),
        );
        Ok(AccessGrant {
            resource,
            token,
            permissions: claims.permissions,
            expires_at: claims.expires_at,
        })
    }

    fn verify_signature(&self, token: &str) -> StorageResult<TokenClaims> {
        let (payload_b64, signature_b64) = token
            .split_once('.')
            .ok_or_else(|| StorageError::InvalidToken("malformed token".to_string()))?;
        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|e| StorageError::InvalidToken(format!("invalid payload encoding: {e}")))?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|e| StorageError::InvalidToken(format!("invalid signature encoding: {e}")))?;

        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| StorageError::Config(format!("invalid signing key: {e}")))?;
        mac.update(&payload);
        mac.verify_slice(&signature)
            .map_err(|_| StorageError::InvalidToken("signature mismatch".to_string()))?;

        let payload = String::from_utf8(payload)
            .map_err(|_| StorageError::InvalidToken("payload not utf-8".to_string()))?;
        parse_claims(&payload)
    }
}

fn parse_claims(payload: &str) -> StorageResult<TokenClaims> {
    let fields: Vec<&str> = payload.split('\n').collect();
    if fields.len() != 8 {
        return Err(StorageError::InvalidToken(format!(
            "expected 8 token fields, got {}",
            fields.len()
        )));
    }
    if fields[0] != TOKEN_VERSION {
        return Err(StorageError::InvalidToken(format!(
            "unsupported token version: {}",
            fields[0]
        )));
    }

    let expires_unix: i64 = fields[7]
        .parse()
        .map_err(|_| StorageError::InvalidToken("invalid expiry".to_string()))?;
    let expires_at = OffsetDateTime::from_unix_timestamp(expires_unix)
        .map_err(|_| StorageError::InvalidToken("expiry out of range".to_string()))?;

    Ok(TokenClaims {
        scope: TokenScope::parse(fields[1])?,
        account: fields[2].to_string(),
        container: fields[3].to_string(),
        object: non_empty(fields[4]),
        policy: non_empty(fields[5]),
        permissions: parse_permissions(fields[6])?,
        expires_at,
    })
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn parse_permissions(s: &str) -> StorageResult<Permissions> {
    let mut permissions = Permissions {
        read: false,
        list: false,
        write: false,
        delete: false,
    };
    for c in s.chars() {
        match c {
            'r' => permissions.read = true,
            'w' => permissions.write = true,
            'd' => permissions.delete = true,
            'l' => permissions.list = true,
            _ => {
                return Err(StorageError::InvalidToken(format!(
                    "unknown permission flag: {c}"
                )))
            }
        }
    }
    Ok(permissions)
}

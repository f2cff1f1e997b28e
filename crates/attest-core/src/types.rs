use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::CoreError;

macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random id (UUID v7 — time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Create from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(UserId, "Unique identifier for a user (student, issuer, admin).");
id_newtype!(EvidenceId, "Unique identifier for an evidence record.");
id_newtype!(CredentialId, "Unique identifier for a credential.");

/// Roles recognised by the authorization layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Issuer,
    Verifier,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Issuer => write!(f, "issuer"),
            Self::Verifier => write!(f, "verifier"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// The acting principal for an operation.
///
/// Threaded explicitly through every mutating call — there is no ambient
/// "current user" inside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User id of the principal.
    pub id: UserId,
    /// Roles held by the principal.
    pub roles: Vec<Role>,
}

impl Actor {
    /// Create a new actor with the given roles.
    pub fn new(id: UserId, roles: Vec<Role>) -> Self {
        Self { id, roles }
    }

    /// Check whether the actor holds a role.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Admin-equivalent principals may act on any credential.
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

/// Read-access level of an evidence record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Private,
    Public,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Private => write!(f, "private"),
            Self::Public => write!(f, "public"),
        }
    }
}

/// A sha256 content fingerprint.
///
/// Stored and displayed as 64 lowercase hex characters; transmitted to the
/// ledger as a `0x`-prefixed 32-byte hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Compute the sha256 digest of the given bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        Self(digest.into())
    }

    /// Parse from a 64-character lowercase hex string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if s.len() != 64 {
            return Err(CoreError::InvalidContentHash(format!(
                "expected 64 hex characters, got {}",
                s.len()
            )));
        }
        if s.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(CoreError::InvalidContentHash(
                "hash must be lowercase hex".into(),
            ));
        }
        let mut out = [0u8; 32];
        hex::decode_to_slice(s, &mut out)
            .map_err(|e| CoreError::InvalidContentHash(e.to_string()))?;
        Ok(Self(out))
    }

    /// Lowercase hex representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// `0x`-prefixed hex form used on the wire to the ledger.
    pub fn prefixed_hex(&self) -> String {
        format!("0x{}", self.to_hex())
    }

    /// The raw 32 bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for ContentHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

//! Content-derived product identity

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Length of a hex-encoded SHA-256 digest.
const IDENTITY_LEN: usize = 64;

/// Primary key of a product record, derived from its descriptive attributes
/// rather than minted by the store.
///
/// Always 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductIdentity(String);

impl ProductIdentity {
    /// Derive the identity for a (product name, brand name) pair.
    ///
    /// The two strings are concatenated without a separator before hashing,
    /// so `("AB", "C")` and `("A", "BC")` share an identity. Persisted data
    /// depends on this encoding; changing it re-keys every existing record.
    pub fn derive(product_name: &str, brand_name: &str) -> Self {
        let digest = Sha256::digest(format!("{}{}", product_name, brand_name));
        Self(format!("{:x}", digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ProductIdentity {
    type Error = Error;

    /// Accepts identities arriving from seed data or external callers;
    /// anything but 64 lowercase hex characters is rejected.
    fn try_from(value: String) -> Result<Self> {
        let well_formed = value.len() == IDENTITY_LEN
            && value
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if well_formed {
            Ok(Self(value))
        } else {
            Err(Error::InvalidInput(format!(
                "malformed product identity: {:?}",
                value
            )))
        }
    }
}

impl From<ProductIdentity> for String {
    fn from(identity: ProductIdentity) -> String {
        identity.0
    }
}

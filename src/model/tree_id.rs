//! Tree identity backed by a random 128-bit token

use crate::{Error, Result};
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const TOKEN_LEN: usize = 16;

/// Identifies one accessibility tree (snapshot) for the lifetime of a process.
///
/// A `TreeId` is either [`TreeId::unknown()`] or backed by a random token
/// drawn from a 128-bit space, so ids minted concurrently on different
/// threads do not need to coordinate. The string form is lowercase hex for
/// known ids and the empty string for the unknown id, which lets a tree id
/// travel inside an ordinary string attribute.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TreeId(Option<[u8; TOKEN_LEN]>);

impl TreeId {
    /// Mint a fresh id
    pub fn new() -> Self {
        let mut token = [0u8; TOKEN_LEN];
        rand::thread_rng().fill_bytes(&mut token);
        TreeId(Some(token))
    }

    /// The sentinel used when no tree is known
    pub const fn unknown() -> Self {
        TreeId(None)
    }

    /// Build an id from a raw token
    pub fn from_token(token: [u8; TOKEN_LEN]) -> Self {
        TreeId(Some(token))
    }

    pub fn is_unknown(&self) -> bool {
        self.0.is_none()
    }

    /// Get a short prefix for display (first 7 chars)
    pub fn short(&self) -> String {
        match self.0 {
            Some(token) => hex::encode(token)[..7].to_string(),
            None => "unknown".to_string(),
        }
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(token) => write!(f, "{}", hex::encode(token)),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TreeId({})", self.short())
    }
}

impl FromStr for TreeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(TreeId::unknown());
        }
        let bytes = hex::decode(s).map_err(|_| Error::InvalidTreeId(s.to_string()))?;
        let token: [u8; TOKEN_LEN] = bytes
            .try_into()
            .map_err(|_| Error::InvalidTreeId(s.to_string()))?;
        Ok(TreeId::from_token(token))
    }
}

impl Serialize for TreeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TreeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

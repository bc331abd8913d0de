//! Identifier schemes carried in a user id's opaque payload

use crate::grpc::proto::UserId;

/// Prefix marking an opaque id that holds a raw provider uid
pub const UID_SCHEME_PREFIX: &str = "uid:";

/// Opaque key under which a raw uid is passed to the provider
pub const UID_LOOKUP_KEY: &str = "uid";

/// How an opaque id must be interpreted before it can be used as a lookup key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIdScheme {
    /// Already provider-validated
    Canonical,
    /// `uid:<raw>`; the raw uid still needs resolving through the provider
    UidEncoded(String),
}

impl UserIdScheme {
    /// Classify an opaque id. Only a leading prefix counts.
    pub fn parse(opaque_id: &str) -> Self {
        match opaque_id.strip_prefix(UID_SCHEME_PREFIX) {
            Some(raw) => Self::UidEncoded(raw.to_string()),
            None => Self::Canonical,
        }
    }

    pub fn of(user_id: &UserId) -> Self {
        Self::parse(&user_id.opaque_id)
    }

    pub fn is_canonical(&self) -> bool {
        matches!(self, Self::Canonical)
    }
}

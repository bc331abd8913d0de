//! User provider wire messages
//!
//! Generated from `proto/user_provider.proto`, plus helpers on the generated
//! types.

use std::collections::HashMap;

/// Decoder hint for opaque entries holding raw UTF-8 text
pub const PLAIN_DECODER: &str = "plain";

tonic::include_proto!("identity.user.v1beta1");

/// Outcome carried inside every response envelope
pub use self::Status as RpcStatus;

impl Opaque {
    /// Build a map holding a single `plain` entry
    pub fn plain(key: impl Into<String>, value: &str) -> Self {
        let mut map = HashMap::with_capacity(1);
        map.insert(
            key.into(),
            OpaqueEntry {
                decoder: PLAIN_DECODER.to_string(),
                value: value.as_bytes().to_vec(),
            },
        );
        Self { map }
    }

    /// Read back a `plain` entry as text.
    ///
    /// Returns `None` when the key is absent, the decoder is not `plain`, or
    /// the bytes are not valid UTF-8.
    pub fn plain_value(&self, key: &str) -> Option<String> {
        self.map
            .get(key)
            .filter(|entry| entry.decoder == PLAIN_DECODER)
            .and_then(|entry| String::from_utf8(entry.value.clone()).ok())
    }
}

impl UserId {
    pub fn new(idp: impl Into<String>, opaque_id: impl Into<String>) -> Self {
        Self {
            idp: idp.into(),
            opaque_id: opaque_id.into(),
        }
    }
}

/// Response envelopes that carry an [`RpcStatus`] next to their payload
pub trait StatusEnvelope: Default {
    /// An envelope with an empty payload and the given status
    fn with_status(status: RpcStatus) -> Self;

    fn status(&self) -> Option<&RpcStatus>;
}

macro_rules! impl_status_envelope {
    ($($response:ty),+ $(,)?) => {
        $(
            impl StatusEnvelope for $response {
                fn with_status(status: RpcStatus) -> Self {
                    Self {
                        status: Some(status),
                        ..Default::default()
                    }
                }

                fn status(&self) -> Option<&RpcStatus> {
                    self.status.as_ref()
                }
            }
        )+
    };
}

impl_status_envelope!(
    GetUserResponse,
    FindUsersResponse,
    GetUserGroupsResponse,
    IsInGroupResponse,
);

//! Gateway entry points for user provider operations

mod userprovider;

use crate::config::Config;
use crate::pool::UserProviderResolver;
use std::fmt;
use std::sync::Arc;

/// User provider operation, used to label dispatch failures and metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetUser,
    FindUsers,
    GetUserGroups,
    IsInGroup,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetUser => "GetUser",
            Operation::FindUsers => "FindUsers",
            Operation::GetUserGroups => "GetUserGroups",
            Operation::IsInGroup => "IsInGroup",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Forwards identity requests to the configured user provider.
///
/// Holds no per-request state; one instance serves all in-flight calls.
pub struct UserProviderGateway<R>
where
    R: UserProviderResolver,
{
    resolver: Arc<R>,
    endpoint: String,
}

impl<R> UserProviderGateway<R>
where
    R: UserProviderResolver,
{
    pub fn new(resolver: Arc<R>, endpoint: impl Into<String>) -> Self {
        Self {
            resolver,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(resolver: Arc<R>, config: &Config) -> Self {
        Self::new(resolver, config.user_provider_endpoint.clone())
    }

    /// Endpoint every dispatch is sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

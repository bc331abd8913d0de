//! User provider clients and the pool that hands them out

use crate::config::PoolConfig;
use crate::grpc::proto::{
    FindUsersRequest, FindUsersResponse, GetUserGroupsRequest, GetUserGroupsResponse,
    GetUserRequest, GetUserResponse, IsInGroupRequest, IsInGroupResponse,
};
use crate::grpc::UserApiClient;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tonic::transport::{Channel, Endpoint};
use tonic::{Request, Response, Status};

/// Backend identity provider reachable through a shared handle
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProvider: Send + Sync {
    async fn get_user(
        &self,
        request: Request<GetUserRequest>,
    ) -> Result<Response<GetUserResponse>, Status>;

    async fn find_users(
        &self,
        request: Request<FindUsersRequest>,
    ) -> Result<Response<FindUsersResponse>, Status>;

    async fn get_user_groups(
        &self,
        request: Request<GetUserGroupsRequest>,
    ) -> Result<Response<GetUserGroupsResponse>, Status>;

    async fn is_in_group(
        &self,
        request: Request<IsInGroupRequest>,
    ) -> Result<Response<IsInGroupResponse>, Status>;
}

/// Maps an endpoint to a user provider handle.
///
/// Handles are shared; callers borrow them for one call and drop them.
#[cfg_attr(test, mockall::automock)]
pub trait UserProviderResolver: Send + Sync {
    fn user_provider(&self, endpoint: &str) -> Result<Arc<dyn UserProvider>, PoolError>;
}

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("user provider endpoint is empty")]
    EmptyEndpoint,

    #[error("invalid user provider endpoint {endpoint}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: tonic::transport::Error,
    },
}

/// [`UserProvider`] backed by a gRPC channel
#[derive(Debug, Clone)]
pub struct GrpcUserProvider {
    client: UserApiClient<Channel>,
}

impl GrpcUserProvider {
    pub fn new(client: UserApiClient<Channel>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserProvider for GrpcUserProvider {
    async fn get_user(
        &self,
        request: Request<GetUserRequest>,
    ) -> Result<Response<GetUserResponse>, Status> {
        self.client.clone().get_user(request).await
    }

    async fn find_users(
        &self,
        request: Request<FindUsersRequest>,
    ) -> Result<Response<FindUsersResponse>, Status> {
        self.client.clone().find_users(request).await
    }

    async fn get_user_groups(
        &self,
        request: Request<GetUserGroupsRequest>,
    ) -> Result<Response<GetUserGroupsResponse>, Status> {
        self.client.clone().get_user_groups(request).await
    }

    async fn is_in_group(
        &self,
        request: Request<IsInGroupRequest>,
    ) -> Result<Response<IsInGroupResponse>, Status> {
        self.client.clone().is_in_group(request).await
    }
}

/// Lazily connected gRPC clients, one per endpoint.
///
/// Channels are created on first use and must be requested from inside a
/// Tokio runtime.
pub struct Pool {
    connect_timeout: Duration,
    clients: Mutex<HashMap<String, Arc<GrpcUserProvider>>>,
}

impl Pool {
    pub fn new(config: &PoolConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout(),
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Number of endpoints with an open channel
    pub fn len(&self) -> usize {
        self.clients
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn connect(&self, endpoint: &str) -> Result<GrpcUserProvider, PoolError> {
        let uri = if endpoint.contains("://") {
            endpoint.to_string()
        } else {
            format!("http://{}", endpoint)
        };

        let channel = Endpoint::from_shared(uri)
            .map_err(|source| PoolError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                source,
            })?
            .connect_timeout(self.connect_timeout)
            .connect_lazy();

        Ok(GrpcUserProvider::new(UserApiClient::new(channel)))
    }
}

impl UserProviderResolver for Pool {
    fn user_provider(&self, endpoint: &str) -> Result<Arc<dyn UserProvider>, PoolError> {
        if endpoint.is_empty() {
            return Err(PoolError::EmptyEndpoint);
        }

        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = clients.get(endpoint) {
            return Ok(client.clone());
        }

        let client = Arc::new(self.connect(endpoint)?);
        tracing::debug!(endpoint, "Opened user provider channel");
        clients.insert(endpoint.to_string(), client.clone());
        Ok(client)
    }
}

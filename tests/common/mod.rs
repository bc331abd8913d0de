//! Shared fakes for gateway integration tests
//!
//! `TestUserProvider` records every request it receives and answers with
//! whatever the test configured. `TestResolver` hands it out, or fails the
//! way an unreachable pool would.

#![allow(dead_code)]

use async_trait::async_trait;
use idgw_core::grpc::proto::{
    FindUsersRequest, FindUsersResponse, GetUserGroupsRequest, GetUserGroupsResponse,
    GetUserRequest, GetUserResponse, IsInGroupRequest, IsInGroupResponse, User, UserId,
};
use idgw_core::grpc::status;
use idgw_core::pool::{PoolError, UserProvider, UserProviderResolver};
use idgw_core::UserProviderGateway;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tonic::metadata::MetadataMap;
use tonic::{Request, Response, Status};

pub const TEST_ENDPOINT: &str = "users.test:9144";

/// Request as seen by the backend
#[derive(Debug, Clone)]
pub struct Recorded<T> {
    pub metadata: MetadataMap,
    pub message: T,
}

impl<T> Recorded<T> {
    fn from_request(request: Request<T>) -> Self {
        let metadata = request.metadata().clone();
        Self {
            metadata,
            message: request.into_inner(),
        }
    }
}

// ============================================================================
// Test User Provider
// ============================================================================

#[derive(Default)]
pub struct TestUserProvider {
    pub user_response: RwLock<GetUserResponse>,
    pub users_response: RwLock<FindUsersResponse>,
    pub groups_response: RwLock<GetUserGroupsResponse>,
    pub in_group_response: RwLock<IsInGroupResponse>,
    /// When set, every call fails with this status
    pub failure: RwLock<Option<Status>>,

    pub get_user_calls: RwLock<Vec<Recorded<GetUserRequest>>>,
    pub find_users_calls: RwLock<Vec<Recorded<FindUsersRequest>>>,
    pub get_user_groups_calls: RwLock<Vec<Recorded<GetUserGroupsRequest>>>,
    pub is_in_group_calls: RwLock<Vec<Recorded<IsInGroupRequest>>>,
    pub call_count: AtomicU32,
}

impl TestUserProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that knows exactly one user
    pub async fn with_user(idp: &str, opaque_id: &str, username: &str) -> Self {
        let provider = Self::new();
        *provider.user_response.write().await = GetUserResponse {
            status: Some(status::new_ok()),
            user: Some(User {
                id: Some(UserId::new(idp, opaque_id)),
                username: username.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        provider
    }

    pub async fn fail_with(&self, status: Status) {
        *self.failure.write().await = Some(status);
    }

    pub fn calls(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    async fn begin(&self) -> Result<(), Status> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        match self.failure.read().await.as_ref() {
            Some(status) => Err(status.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserProvider for TestUserProvider {
    async fn get_user(
        &self,
        request: Request<GetUserRequest>,
    ) -> Result<Response<GetUserResponse>, Status> {
        self.get_user_calls
            .write()
            .await
            .push(Recorded::from_request(request));
        self.begin().await?;
        Ok(Response::new(self.user_response.read().await.clone()))
    }

    async fn find_users(
        &self,
        request: Request<FindUsersRequest>,
    ) -> Result<Response<FindUsersResponse>, Status> {
        self.find_users_calls
            .write()
            .await
            .push(Recorded::from_request(request));
        self.begin().await?;
        Ok(Response::new(self.users_response.read().await.clone()))
    }

    async fn get_user_groups(
        &self,
        request: Request<GetUserGroupsRequest>,
    ) -> Result<Response<GetUserGroupsResponse>, Status> {
        self.get_user_groups_calls
            .write()
            .await
            .push(Recorded::from_request(request));
        self.begin().await?;
        Ok(Response::new(self.groups_response.read().await.clone()))
    }

    async fn is_in_group(
        &self,
        request: Request<IsInGroupRequest>,
    ) -> Result<Response<IsInGroupResponse>, Status> {
        self.is_in_group_calls
            .write()
            .await
            .push(Recorded::from_request(request));
        self.begin().await?;
        Ok(Response::new(self.in_group_response.read().await.clone()))
    }
}

// ============================================================================
// Test Resolver
// ============================================================================

pub struct TestResolver {
    provider: Option<Arc<TestUserProvider>>,
    pub lookups: AtomicU32,
    pub endpoints: std::sync::Mutex<Vec<String>>,
}

impl TestResolver {
    pub fn serving(provider: Arc<TestUserProvider>) -> Self {
        Self {
            provider: Some(provider),
            lookups: AtomicU32::new(0),
            endpoints: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Resolver whose every lookup fails
    pub fn unavailable() -> Self {
        Self {
            provider: None,
            lookups: AtomicU32::new(0),
            endpoints: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn lookups(&self) -> u32 {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl UserProviderResolver for TestResolver {
    fn user_provider(&self, endpoint: &str) -> Result<Arc<dyn UserProvider>, PoolError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.endpoints.lock().unwrap().push(endpoint.to_string());
        match &self.provider {
            Some(provider) => Ok(provider.clone() as Arc<dyn UserProvider>),
            None => Err(PoolError::EmptyEndpoint),
        }
    }
}

// ============================================================================
// Builders
// ============================================================================

pub fn gateway(resolver: &Arc<TestResolver>) -> UserProviderGateway<TestResolver> {
    UserProviderGateway::new(resolver.clone(), TEST_ENDPOINT)
}

/// Gateway wired to `provider`, plus the resolver for call accounting
pub fn gateway_for(
    provider: &Arc<TestUserProvider>,
) -> (UserProviderGateway<TestResolver>, Arc<TestResolver>) {
    let resolver = Arc::new(TestResolver::serving(provider.clone()));
    (gateway(&resolver), resolver)
}

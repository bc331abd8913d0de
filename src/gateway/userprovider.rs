//! User provider dispatch and uid resolution

use super::{Operation, UserProviderGateway};
use crate::error::{GatewayError, Result};
use crate::grpc::proto::{
    FindUsersRequest, FindUsersResponse, GetUserGroupsRequest, GetUserGroupsResponse,
    GetUserRequest, GetUserResponse, IsInGroupRequest, IsInGroupResponse, Opaque,
    StatusEnvelope, UserId,
};
use crate::grpc::status;
use crate::identity::{UserIdScheme, UID_LOOKUP_KEY};
use crate::pool::{UserProvider, UserProviderResolver};
use crate::telemetry::metrics::{self, DispatchOutcome};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tonic::{Request, Response};

impl<R> UserProviderGateway<R>
where
    R: UserProviderResolver,
{
    pub async fn get_user(
        &self,
        request: Request<GetUserRequest>,
    ) -> Result<Response<GetUserResponse>> {
        self.forward(Operation::GetUser, request, |client, request| async move {
            client.get_user(request).await
        })
        .await
    }

    pub async fn find_users(
        &self,
        request: Request<FindUsersRequest>,
    ) -> Result<Response<FindUsersResponse>> {
        self.forward(Operation::FindUsers, request, |client, request| async move {
            client.find_users(request).await
        })
        .await
    }

    pub async fn get_user_groups(
        &self,
        request: Request<GetUserGroupsRequest>,
    ) -> Result<Response<GetUserGroupsResponse>> {
        self.forward(Operation::GetUserGroups, request, |client, request| async move {
            client.get_user_groups(request).await
        })
        .await
    }

    pub async fn is_in_group(
        &self,
        request: Request<IsInGroupRequest>,
    ) -> Result<Response<IsInGroupResponse>> {
        self.forward(Operation::IsInGroup, request, |client, request| async move {
            client.is_in_group(request).await
        })
        .await
    }

    /// Turn a `uid:`-encoded user id into the provider's canonical id.
    ///
    /// Canonical ids are returned as-is without contacting the provider.
    /// Encoded ids are looked up through [`Self::get_user`] with the raw uid
    /// in the request's opaque map; the request context travels with it.
    /// Only one level is resolved: the provider's answer is not re-parsed.
    pub async fn resolve_user_id(&self, request: Request<UserId>) -> Result<UserId> {
        let (metadata, extensions, user_id) = request.into_parts();

        let raw_uid = match UserIdScheme::of(&user_id) {
            UserIdScheme::Canonical => {
                tracing::debug!(opaque_id = %user_id.opaque_id, "User id already canonical");
                metrics::record_uid_resolution("canonical");
                return Ok(user_id);
            }
            UserIdScheme::UidEncoded(raw_uid) => raw_uid,
        };

        let lookup = GetUserRequest {
            opaque: Some(Opaque::plain(UID_LOOKUP_KEY, &raw_uid)),
            user_id: None,
        };
        let response = self
            .get_user(Request::from_parts(metadata, extensions, lookup))
            .await
            .inspect_err(|_| metrics::record_uid_resolution("failed"))?
            .into_inner();

        if !status::is_ok(response.status()) {
            let reason = match &response.status {
                Some(s) => format!("provider returned {:?}: {}", s.code(), s.message),
                None => "provider returned no status".to_string(),
            };
            tracing::warn!(opaque_id = %user_id.opaque_id, %reason, "Failed to resolve uid");
            metrics::record_uid_resolution("failed");
            return Err(GatewayError::resolution(user_id.opaque_id, reason));
        }

        match response.user.and_then(|user| user.id) {
            Some(resolved) => {
                tracing::debug!(uid = %raw_uid, opaque_id = %resolved.opaque_id, "Resolved uid");
                metrics::record_uid_resolution("resolved");
                Ok(resolved)
            }
            None => {
                metrics::record_uid_resolution("failed");
                Err(GatewayError::resolution(
                    user_id.opaque_id,
                    "provider returned no user id",
                ))
            }
        }
    }

    /// Obtain a client and hand it the request.
    ///
    /// A client that cannot be obtained is reported in the response status;
    /// a failing call is raised.
    async fn forward<Req, Resp, F, Fut>(
        &self,
        operation: Operation,
        request: Request<Req>,
        call: F,
    ) -> Result<Response<Resp>>
    where
        Resp: StatusEnvelope,
        F: FnOnce(Arc<dyn UserProvider>, Request<Req>) -> Fut,
        Fut: Future<Output = std::result::Result<Response<Resp>, tonic::Status>>,
    {
        let started = Instant::now();

        let client = match self.resolver.user_provider(&self.endpoint) {
            Ok(client) => client,
            Err(err) => {
                tracing::warn!(%operation, endpoint = %self.endpoint, error = %err, "User provider client unavailable");
                metrics::record_dispatch(
                    operation.as_str(),
                    DispatchOutcome::ClientUnavailable,
                    started.elapsed(),
                );
                let status = status::new_internal(&err, "error getting user provider client");
                return Ok(Response::new(Resp::with_status(status)));
            }
        };

        tracing::debug!(%operation, endpoint = %self.endpoint, "Forwarding to user provider");

        match call(client, request).await {
            Ok(response) => {
                let outcome = if status::is_ok(response.get_ref().status()) {
                    DispatchOutcome::Ok
                } else {
                    DispatchOutcome::BackendStatus
                };
                metrics::record_dispatch(operation.as_str(), outcome, started.elapsed());
                Ok(response)
            }
            Err(source) => {
                tracing::error!(%operation, code = ?source.code(), error = %source.message(), "User provider call failed");
                metrics::record_dispatch(
                    operation.as_str(),
                    DispatchOutcome::TransportError,
                    started.elapsed(),
                );
                Err(GatewayError::dispatch(operation, source))
            }
        }
    }
}

//! gRPC plumbing for the user provider backend

pub mod proto;
pub mod status;

pub use proto::user_api_client::UserApiClient;

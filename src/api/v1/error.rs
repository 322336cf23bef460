use crate::api::v1::handler::ApiResponse;
use crate::application_port::{AuthFlowError, PollError};
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use tracing::warn;
use warp::http::StatusCode;
use warp::{Rejection, reject};

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    if let Some(failure) = err.find::<ApiFailure>() {
        let json = warp::reply::json(&ApiResponse::<()>::err(
            failure.code.clone(),
            failure.message.clone(),
        ));
        Ok(warp::reply::with_status(json, StatusCode::OK))
    } else {
        let json = warp::reply::json(&ApiResponse::<()>::err(
            ApiErrorCode::InternalError,
            format!("Unhandled error: {:?}", err),
        ));
        Ok(warp::reply::with_status(
            json,
            StatusCode::INTERNAL_SERVER_ERROR,
        ))
    }
}

#[derive(Debug, Clone, Error, Serialize)]
pub enum ApiErrorCode {
    #[error("Authorization state is invalid, already used or expired")]
    InvalidState,
    #[error("The provider denied authorization")]
    AuthorizationDenied,
    #[error("Not authenticated")]
    Unauthenticated,
    #[error("Upstream provider error")]
    UpstreamError,
    #[error("Malformed input")]
    MalformedInput,
    #[error("Internal error")]
    InternalError,
}

/// Code plus a user-renderable message; the message keeps upstream detail
/// (status, body) that the bare code drops.
#[derive(Debug, Clone, Serialize)]
pub struct ApiFailure {
    pub code: ApiErrorCode,
    pub message: String,
}

impl ApiFailure {
    pub fn internal<E: std::fmt::Display>(error: E) -> ApiFailure {
        warn!("Internal error: {}", error);
        ApiFailure {
            code: ApiErrorCode::InternalError,
            message: ApiErrorCode::InternalError.to_string(),
        }
    }
}

impl reject::Reject for ApiFailure {}

impl From<AuthFlowError> for ApiFailure {
    fn from(error: AuthFlowError) -> Self {
        let code = match &error {
            AuthFlowError::ProviderDenied { .. } => ApiErrorCode::AuthorizationDenied,
            AuthFlowError::InvalidState => ApiErrorCode::InvalidState,
            AuthFlowError::MissingParam(_) => ApiErrorCode::MalformedInput,
            AuthFlowError::TokenExchange { .. } | AuthFlowError::Unreachable(_) => {
                ApiErrorCode::UpstreamError
            }
            AuthFlowError::Internal(_) => return ApiFailure::internal(error),
        };
        ApiFailure {
            code,
            message: error.to_string(),
        }
    }
}

impl From<PollError> for ApiFailure {
    fn from(error: PollError) -> Self {
        let code = match &error {
            PollError::Unauthenticated => ApiErrorCode::Unauthenticated,
            PollError::MalformedInput(_) => ApiErrorCode::MalformedInput,
            PollError::Upstream { .. } | PollError::Unreachable(_) => ApiErrorCode::UpstreamError,
            PollError::Internal(_) => return ApiFailure::internal(error),
        };
        ApiFailure {
            code,
            message: error.to_string(),
        }
    }
}

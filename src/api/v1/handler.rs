use super::error::*;
use crate::application_port::{AuthFlowService, CallbackParams, PollInput, PollService};
use crate::domain_model::{SearchFilters, SessionId, SiteId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiFailure>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiFailure {
                code,
                message: message.into(),
            }),
        }
    }
}

pub async fn begin_login(
    auth_flow: Arc<dyn AuthFlowService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let redirect = auth_flow
        .begin()
        .await
        .map_err(ApiFailure::from)
        .map_err(reject::custom)?;

    let location: warp::http::Uri = redirect
        .location
        .parse()
        .map_err(ApiFailure::internal)
        .map_err(reject::custom)?;
    Ok(warp::redirect::found(location))
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CallbackResponse {
    pub authorized: bool,
}

pub async fn finish_login(
    query: CallbackQuery,
    auth_flow: Arc<dyn AuthFlowService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    auth_flow
        .complete(CallbackParams {
            code: query.code,
            state: query.state,
            error: query.error,
            error_description: query.error_description,
        })
        .await
        .map_err(ApiFailure::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(CallbackResponse {
        authorized: true,
    })))
}

#[derive(Debug, Deserialize)]
pub struct PollQuery {
    pub q: Option<String>,
    pub site: Option<String>,
    pub session_id: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub condition: Option<String>,
    pub shipping: Option<String>,
}

pub async fn poll(
    query: PollQuery,
    poll_service: Arc<dyn PollService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let input = PollInput {
        session_id: query.session_id.map(SessionId),
        query: query.q.unwrap_or_default(),
        site: query.site.map(SiteId),
        filters: SearchFilters {
            min_price: query.min_price,
            max_price: query.max_price,
            condition: query.condition,
            shipping: query.shipping,
        },
    };

    let delta = poll_service
        .poll(input)
        .await
        .map_err(ApiFailure::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(delta)))
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub authorized: bool,
}

pub async fn status(
    auth_flow: Arc<dyn AuthFlowService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&ApiResponse::ok(StatusResponse {
        authorized: auth_flow.authenticated().await,
    })))
}

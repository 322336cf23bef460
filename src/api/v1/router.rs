use super::handler;
use super::handler::PollQuery;
use crate::server::Server;
use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let login = warp::get()
        .and(warp::path("login"))
        .and(warp::path::end())
        .and(with(server.auth_flow_service.clone()))
        .and_then(handler::begin_login);

    let callback = warp::get()
        .and(warp::path("callback"))
        .and(warp::path::end())
        .and(warp::query::<handler::CallbackQuery>())
        .and(with(server.auth_flow_service.clone()))
        .and_then(handler::finish_login);

    let poll = warp::get()
        .and(warp::path("poll"))
        .and(warp::path::end())
        .and(warp::query::<PollQuery>())
        .and(with(server.poll_service.clone()))
        .and_then(handler::poll);

    let status = warp::get()
        .and(warp::path("status"))
        .and(warp::path::end())
        .and(with(server.auth_flow_service.clone()))
        .and_then(handler::status);

    login.or(callback).or(poll).or(status)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

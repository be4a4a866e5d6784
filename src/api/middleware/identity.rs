//! Request identity: client address and optional authenticated user.
//!
//! [`layer`] runs in front of every route. It records the client address and,
//! when a valid bearer token is presented, the owning user as request
//! extensions. It never rejects; routes that need a user extract
//! [`CurrentUser`], which answers 401 when none is attached, or [`AdminUser`],
//! which additionally answers 403 for users outside `ADMIN_EMAILS`.

use axum::{
    extract::{ConnectInfo, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use tracing::{debug, warn};

use crate::domain::entities::User;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::resolve_client_ip;

/// Resolved client address, if any is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(pub Option<IpAddr>);

/// The user behind a verified bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// A verified user listed as an administrator.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

/// Attaches [`ClientIp`] and, for a valid token, [`CurrentUser`].
pub async fn layer(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip = resolve_client_ip(&parts.headers, peer, state.behind_proxy);
    parts.extensions.insert(ClientIp(ip));

    if let Ok(AuthBearer(token)) = AuthBearer::from_request_parts(&mut parts, &()).await {
        match state.auth_service.authenticate(&token).await {
            Ok(user) => {
                parts.extensions.insert(CurrentUser(user));
            }
            Err(AppError::Unauthorized { .. }) => debug!("Rejected bearer token"),
            Err(e) => warn!(error = %e, "Token verification failed"),
        }
    }

    next.run(Request::from_parts(parts, body)).await
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentUser>().cloned().ok_or_else(|| {
            AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Authorization header is missing or invalid"}),
            )
        })
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !state.is_admin(&user.email) {
            debug!(user_id = user.id, "Non-admin denied administrative route");
            return Err(AppError::forbidden(
                "Forbidden",
                json!({"reason": "Administrator access required"}),
            ));
        }
        Ok(AdminUser(user))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<ClientIp>()
            .copied()
            .unwrap_or(ClientIp(None)))
    }
}

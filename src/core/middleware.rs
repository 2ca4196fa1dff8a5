use crate::features::auth::SessionManager;
use crate::features::users::UserService;
use crate::shared::constants::SESSION_COOKIE;
use crate::shared::cookies::read_cookie;
use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

/// State for the session middleware
#[derive(Clone)]
pub struct SessionState {
    pub sessions: Arc<SessionManager>,
    pub users: Arc<UserService>,
}

/// Resolve the session cookie into an `AuthenticatedUser` request extension.
///
/// Missing, tampered or expired cookies leave the request anonymous; route
/// extractors decide whether that is acceptable. The token only names the
/// account: the user row is re-read on every request, so a revoked staff flag
/// takes effect immediately and a deleted account is anonymous.
pub async fn session_middleware(
    State(state): State<SessionState>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(token) = read_cookie(req.headers(), SESSION_COOKIE) {
        match state.sessions.validate(&token) {
            Ok(claimed) => match state.users.find_by_id(claimed.user_id).await {
                Ok(Some(user)) => {
                    req.extensions_mut().insert(user.to_principal());
                }
                Ok(None) => {
                    tracing::debug!("Session names missing user {}", claimed.user_id);
                }
                Err(e) => return e.into_response(),
            },
            Err(e) => {
                tracing::debug!("Ignoring invalid session cookie: {}", e);
            }
        }
    }

    next.run(req).await
}

//! Session cookie middleware and the forgery-protected form extractor.
//!
//! Every request passes through [`attach_session`], which resolves the
//! caller's session cookie without creating anything. A session is only
//! opened when a handler asks for a [`SessionContext`] to hand out a token;
//! the middleware then sets the cookie on the way out. State-changing
//! handlers take a [`ProtectedForm`], which refuses the request unless the
//! submitted token matches the one bound to the caller's live session.

use std::sync::{Arc, OnceLock};

use axum::{
    Form,
    body::{Body, Bytes},
    extract::{FromRequest, FromRequestParts, Request, State},
    http::{
        HeaderMap, HeaderValue, Method,
        header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
        request::Parts,
    },
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    error::AppError,
    state::{SessionContext, SharedState},
};

/// Name of the cookie carrying the session identifier.
pub const SESSION_COOKIE: &str = "game_catalog_session";
/// Header that may carry the forgery token instead of the form field.
pub const CSRF_HEADER: &str = "x-csrf-token";
/// Form field carrying the forgery token.
pub const CSRF_FIELD: &str = "csrf_token";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Per-request view of the caller's session, shared between the middleware
/// and the extractors.
#[derive(Clone)]
struct SessionSlot {
    existing: Option<SessionContext>,
    opened: Arc<OnceLock<SessionContext>>,
}

/// Resolve the caller's session cookie and, if a handler opened a session,
/// send its cookie back.
pub async fn attach_session(
    State(state): State<SharedState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let slot = SessionSlot {
        existing: session_cookie(req.headers()).and_then(|id| state.sessions().lookup(&id)),
        opened: Arc::default(),
    };

    req.extensions_mut().insert(slot.clone());
    let mut response = next.run(req).await;

    if let Some(session) = slot.opened.get() {
        let cookie = format!(
            "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Strict",
            session.session_id
        );
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
                debug!("opened new session");
            }
            Err(err) => warn!(error = %err, "failed to encode session cookie"),
        }
    }

    response
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_owned())
}

fn session_slot(parts: &Parts) -> Result<&SessionSlot, AppError> {
    parts
        .extensions
        .get::<SessionSlot>()
        .ok_or_else(|| AppError::Internal("session middleware is not installed".into()))
}

/// Resolves the caller's session, opening one if the request carried none.
/// Only handlers that hand a token to the client extract this.
impl FromRequestParts<SharedState> for SessionContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let slot = session_slot(parts)?;
        if let Some(session) = &slot.existing {
            return Ok(session.clone());
        }
        Ok(slot
            .opened
            .get_or_init(|| state.sessions().issue())
            .clone())
    }
}

/// Form input that arrived with a valid forgery token for the caller's session.
pub struct ProtectedForm<T> {
    /// Session the token was verified against.
    pub session: SessionContext,
    /// Decoded form body.
    pub input: T,
}

#[derive(Deserialize)]
struct TokenField {
    #[serde(default, rename = "csrf_token")]
    token: Option<String>,
}

impl<T> FromRequest<SharedState> for ProtectedForm<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &SharedState) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();
        // Never open a session here: a fresh session cannot hold a submitted token.
        let Some(session) = session_slot(&parts)?.existing.clone() else {
            warn!("rejected state-changing request without a live session");
            return Err(AppError::Forbidden(
                "no live session; load the form again".into(),
            ));
        };
        let content_type = parts.headers.get(CONTENT_TYPE).cloned();
        let header_token = parts
            .headers
            .get(CSRF_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let bytes = Bytes::from_request(Request::from_parts(parts, body), state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        let token = match header_token {
            Some(token) => Some(token),
            None => decode_form::<TokenField>(content_type.as_ref(), bytes.clone(), state)
                .await
                .ok()
                .and_then(|field| field.token),
        };

        let Some(token) = token else {
            warn!("rejected state-changing request without forgery token");
            return Err(AppError::Forbidden(format!(
                "missing forgery token (`{CSRF_FIELD}` field or `X-CSRF-Token` header)"
            )));
        };
        if !state.sessions().verify(&session.session_id, &token) {
            warn!("rejected state-changing request with invalid forgery token");
            return Err(AppError::Forbidden("invalid forgery token".into()));
        }

        let input = decode_form::<T>(content_type.as_ref(), bytes, state).await?;
        Ok(Self { session, input })
    }
}

/// Decode a buffered form body, replaying it through axum's `Form` extractor.
async fn decode_form<T>(
    content_type: Option<&HeaderValue>,
    bytes: Bytes,
    state: &SharedState,
) -> Result<T, AppError>
where
    T: DeserializeOwned,
{
    // A bodiless submission (token in the header) is read as an empty form.
    let content_type = content_type
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(FORM_CONTENT_TYPE));
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(bytes))
        .map_err(|err| AppError::Internal(err.to_string()))?;

    let Form(value) = Form::<T>::from_request(request, state)
        .await
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_session_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; game_catalog_session=abc123; lang=fr"),
        );
        assert_eq!(session_cookie(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn no_cookie_header_means_no_session() {
        assert_eq!(session_cookie(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(session_cookie(&headers), None);
    }
}

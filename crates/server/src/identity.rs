// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller identity and request cause extraction.
//!
//! The gateway in front of the server authenticates users and forwards the
//! user id in the `X-User-Id` header. The id is trusted as-is; it only has to
//! name an active user.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use leadflow_api::{AuthenticatedActor, AuthenticationService};
use leadflow_audit::Cause;
use tracing::{debug, warn};

use crate::{AppState, HttpError};

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Header carrying an optional caller-supplied request id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Extractor for the authenticated caller.
///
/// # Errors
///
/// Rejects with HTTP 401 if:
/// - The `X-User-Id` header is missing
/// - The header is not a numeric id
/// - The user does not exist or is inactive
pub struct CallerIdentity(pub AuthenticatedActor);

impl FromRequestParts<AppState> for CallerIdentity {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw: &str = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| {
                debug!("Missing {USER_ID_HEADER} header");
                unauthenticated(format!("Missing {USER_ID_HEADER} header"))
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid {USER_ID_HEADER} header encoding");
                unauthenticated(format!("Invalid {USER_ID_HEADER} header"))
            })?;

        let user_id: i64 = raw.trim().parse().map_err(|_| {
            warn!(value = raw, "Non-numeric user id");
            unauthenticated(format!("Invalid {USER_ID_HEADER} header"))
        })?;

        let mut persistence = state.persistence.lock().await;
        let actor: AuthenticatedActor =
            AuthenticationService::authenticate(&mut persistence, user_id)?;

        Ok(Self(actor))
    }
}

fn unauthenticated(message: String) -> HttpError {
    HttpError {
        status: StatusCode::UNAUTHORIZED,
        message,
    }
}

/// Extractor for the audit cause of a request.
///
/// The cause id is the `X-Request-Id` header when present, otherwise the
/// method and path. The description is always the method and path.
pub struct RequestCause(pub Cause);

impl<S: Send + Sync> FromRequestParts<S> for RequestCause {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let description: String = format!("{} {}", parts.method, parts.uri.path());
        let id: String = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map_or_else(|| description.clone(), String::from);

        Ok(Self(Cause::new(id, description)))
    }
}

use actix_web::{dev::Payload, http::header, FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::services::ExporterSession;

impl FromRequest for ExporterSession {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(session_from_request(req)))
    }
}

/// Build the caller's session from an `Authorization: Bearer` header
///
/// A missing, malformed or empty header yields an anonymous session.
pub fn session_from_request(req: &HttpRequest) -> ExporterSession {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .map(ExporterSession::with_token)
        .unwrap_or_else(ExporterSession::anonymous)
}

fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

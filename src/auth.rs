//! Admin session gate: password login issuing a JWT session cookie, an
//! extractor for handlers that require an admin, and a path-based middleware.
//! Session state is carried explicitly in the request, never in globals.

use std::env;
use std::future::Future;

use axum::{
    body::Body,
    extract::{FromRequestParts, Json, Request},
    http::{header, request::Parts, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const AUTH_COOKIE_NAME: &str = "auth_token";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    password: String,
}

/// Proof of an authenticated admin session. Handlers that take this as an
/// argument reject unauthenticated requests before running.
pub struct AdminSession {
    pub subject: String,
}

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync + 'static,
{
    type Rejection = (StatusCode, String);

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let token = extract_token_from_headers(&parts.headers)
                .ok_or((StatusCode::UNAUTHORIZED, "Missing auth token".to_string()))?;
            let claims = validate_token_str(&token).map_err(|e| {
                tracing::error!("Token error: {}", e);
                (StatusCode::UNAUTHORIZED, "Invalid token".to_string())
            })?;
            Ok(AdminSession {
                subject: claims.sub,
            })
        }
    }
}

pub fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    if let Some(cookie_header) = headers.get(header::COOKIE).and_then(|h| h.to_str().ok()) {
        for cookie in cookie_header.split(';') {
            if let Some((k, v)) = cookie.trim().split_once('=') {
                if k == AUTH_COOKIE_NAME {
                    return Some(v.to_string());
                }
            }
        }
    }
    None
}

fn validate_token_str(token: &str) -> anyhow::Result<Claims> {
    let secret = env::var("JWT_SECRET")
        .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;
    let mut validation = Validation::default();
    validation.validate_exp = true;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )?;
    Ok(data.claims)
}

/// Whether the request carries a valid admin session.
pub fn is_authenticated(headers: &HeaderMap) -> bool {
    extract_token_from_headers(headers)
        .map(|token| validate_token_str(&token).is_ok())
        .unwrap_or(false)
}

fn create_session_token() -> anyhow::Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(1))
        .expect("valid timestamp")
        .timestamp();

    let claims = Claims {
        sub: "admin".to_string(),
        exp: expiration as usize,
    };

    let secret = env::var("JWT_SECRET")
        .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;
    Ok(token)
}

fn build_auth_cookie(token: &str) -> String {
    let secure = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()) == "production";
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age=86400",
        AUTH_COOKIE_NAME, token
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn clear_auth_cookie() -> String {
    let secure = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()) == "production";
    let mut cookie = format!(
        "{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0",
        AUTH_COOKIE_NAME
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub async fn login(Json(payload): Json<LoginRequest>) -> impl IntoResponse {
    let admin_password = match env::var("ADMIN_PASSWORD") {
        Ok(p) => p,
        Err(_) => {
            tracing::error!("ADMIN_PASSWORD not set");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server configuration error",
            )
                .into_response();
        }
    };

    if admin_password == "password" || admin_password.is_empty() {
        tracing::warn!("Default ADMIN_PASSWORD is not allowed");
        return (StatusCode::FORBIDDEN, "Login misconfigured").into_response();
    }

    if payload.password != admin_password {
        return (StatusCode::UNAUTHORIZED, "Invalid credentials").into_response();
    }

    match create_session_token() {
        Ok(token) => {
            let cookie = build_auth_cookie(&token);
            let mut response = Json(serde_json::json!({ "status": "ok" })).into_response();
            response
                .headers_mut()
                .insert(header::SET_COOKIE, HeaderValue::from_str(&cookie).unwrap());
            response
        }
        Err(e) => {
            tracing::error!("JWT creation failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to create token").into_response()
        }
    }
}

pub async fn logout() -> impl IntoResponse {
    let cookie = clear_auth_cookie();
    let mut response = (StatusCode::OK, "OK").into_response();
    response
        .headers_mut()
        .insert(header::SET_COOKIE, HeaderValue::from_str(&cookie).unwrap());
    response
}

/// Guards the admin surfaces. The dashboard page redirects to the login
/// surface; API and fragment endpoints get a plain 401.
pub async fn require_auth(req: Request<Body>, next: Next) -> impl IntoResponse {
    let path = req.uri().path();
    let is_admin_page = path == "/admin";
    let is_admin_api = path.starts_with("/api/admin") || path.starts_with("/admin/");

    if req.method() == axum::http::Method::OPTIONS || !(is_admin_page || is_admin_api) {
        return next.run(req).await;
    }

    if is_authenticated(req.headers()) {
        return next.run(req).await;
    }

    if is_admin_page {
        Redirect::to("/login.html").into_response()
    } else {
        (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
    }
}

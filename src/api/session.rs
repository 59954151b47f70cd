//! Admin authentication and one-shot flash messages, both carried in cookies.
//!
//! The admin cookie holds `<expiry>.<hex HMAC-SHA256("admin:<expiry>")>` keyed by the
//! configured session secret, so no server-side session table is needed.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tower_cookies::cookie::time::Duration as CookieDuration;
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};

use crate::error::{AppError, AppResult};
use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "facefind_admin";
pub const FLASH_COOKIE: &str = "facefind_flash";
pub const SESSION_TTL_SECS: i64 = 12 * 60 * 60;

fn session_mac(secret: &str, expires_at: i64) -> AppResult<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Config(format!("invalid session secret: {}", e)))?;
    mac.update(format!("admin:{}", expires_at).as_bytes());
    Ok(mac)
}

pub fn sign_session(secret: &str, expires_at: i64) -> AppResult<String> {
    let sig = session_mac(secret, expires_at)?.finalize().into_bytes();
    Ok(format!("{}.{}", expires_at, hex::encode(sig)))
}

pub fn verify_session(secret: &str, token: &str, now: i64) -> bool {
    let Some((expiry, sig)) = token.split_once('.') else {
        return false;
    };
    let Ok(expires_at) = expiry.parse::<i64>() else {
        return false;
    };
    if expires_at <= now {
        return false;
    }
    let Ok(sig) = hex::decode(sig) else {
        return false;
    };
    session_mac(secret, expires_at).map_or(false, |mac| mac.verify_slice(&sig).is_ok())
}

/// Who is making the request, resolved from the session cookie on every request.
#[derive(Clone, Copy, Debug)]
pub struct AuthContext {
    is_admin: bool,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthContext {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state).await?;
        let now = chrono::Utc::now().timestamp();
        let is_admin = cookies
            .get(SESSION_COOKIE)
            .map(|c| verify_session(&state.config.session_secret, c.value(), now))
            .unwrap_or(false);
        Ok(Self { is_admin })
    }
}

pub fn start_admin_session(cookies: &Cookies, secret: &str) -> AppResult<()> {
    let expires_at = chrono::Utc::now().timestamp() + SESSION_TTL_SECS;
    let cookie = Cookie::build((SESSION_COOKIE, sign_session(secret, expires_at)?))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(SESSION_TTL_SECS))
        .build();
    cookies.add(cookie);
    Ok(())
}

pub fn end_admin_session(cookies: &Cookies) {
    cookies.remove(Cookie::build(SESSION_COOKIE).path("/").build());
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flash {
    pub category: String,
    pub message: String,
}

pub fn set_flash(cookies: &Cookies, category: &str, message: &str) {
    let value = urlencoding::encode(&format!("{}|{}", category, message)).into_owned();
    let cookie = Cookie::build((FLASH_COOKIE, value)).path("/").http_only(true).same_site(SameSite::Lax).build();
    cookies.add(cookie);
}

/// Read and clear the pending flash message, if any.
pub fn take_flash(cookies: &Cookies) -> Option<Flash> {
    let raw = cookies.get(FLASH_COOKIE)?.value().to_string();
    cookies.remove(Cookie::build(FLASH_COOKIE).path("/").build());
    parse_flash(&raw)
}

fn parse_flash(raw: &str) -> Option<Flash> {
    let decoded = urlencoding::decode(raw).ok()?;
    let (category, message) = decoded.split_once('|')?;
    Some(Flash { category: category.to_string(), message: message.to_string() })
}

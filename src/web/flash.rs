// src/web/flash.rs
//! One-shot messages carried across a redirect in a short-lived cookie.
use axum::http::{header, HeaderMap};
use axum::response::Response;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use super::cookies::{self, FLASH_COOKIE};

const FLASH_MAX_AGE_SECS: i64 = 300;

/// Attaches `message` to the response so the next page can show it.
pub fn push(response: &mut Response, message: &str) {
    let encoded = URL_SAFE_NO_PAD.encode(message.as_bytes());
    if let Some(value) = cookies::set(FLASH_COOKIE, &encoded, FLASH_MAX_AGE_SECS) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
}

/// Pending message, if the request carries one.
pub fn peek(headers: &HeaderMap) -> Option<String> {
    let raw = cookies::get(headers, FLASH_COOKIE)?;
    let bytes = URL_SAFE_NO_PAD.decode(raw.as_bytes()).ok()?;
    String::from_utf8(bytes).ok()
}

/// Expires the flash cookie once its message was displayed.
pub fn consume(response: &mut Response) {
    if let Some(value) = cookies::clear(FLASH_COOKIE) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
}

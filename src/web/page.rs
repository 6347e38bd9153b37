// src/web/page.rs
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use super::flash;
use crate::dtos::form::FieldErrors;
use crate::error::AppError;
use crate::state::AppState;

/// `302 Found` to `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// `302 Found` carrying a flash message for the next page.
pub fn found_with_flash(location: &str, message: &str) -> Response {
    let mut response = found(location);
    flash::push(&mut response, message);
    response
}

pub fn is_ajax(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
}

pub fn render(state: &AppState, template: &str, context: &Value) -> Result<Response, AppError> {
    let html = state.templates.render(template, context)?;
    Ok(Html(html).into_response())
}

/// Renders a page that shows the pending flash message, then expires it.
pub fn render_with_messages(
    state: &AppState,
    headers: &HeaderMap,
    template: &str,
    mut context: Value,
) -> Result<Response, AppError> {
    let message = flash::peek(headers);
    if let (Some(message), Some(map)) = (&message, context.as_object_mut()) {
        map.insert("messages".to_string(), json!([message]));
    }
    let mut response = render(state, template, &context)?;
    if message.is_some() {
        flash::consume(&mut response);
    }
    Ok(response)
}

/// Response for a rejected form submission: a `400` JSON body of field
/// errors for AJAX callers, otherwise the form page re-rendered with them.
pub fn form_invalid(
    state: &AppState,
    headers: &HeaderMap,
    template: &str,
    mut context: Value,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    if is_ajax(headers) {
        return Ok((StatusCode::BAD_REQUEST, Json(errors)).into_response());
    }
    if let Some(map) = context.as_object_mut() {
        map.insert("errors".to_string(), json!(errors));
    }
    render(state, template, &context)
}

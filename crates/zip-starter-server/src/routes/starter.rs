//! Starter archive endpoint.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use percent_encoding::percent_decode_str;
use zip_starter_core::{assemble, resolve_name, Archive, Payload, ARCHIVE_CONTENT_TYPE};

use super::AppState;
use crate::error::AppError;

/// Body for every request that is not a JSON POST.
const JSON_POST_ONLY: &str = "this server only accepts JSON POST requests";

/// Any method, any path.
///
/// `POST` with `Content-Type: application/json` and a JSON object body
/// returns the starter archive named after the `uuid` field or the path.
/// `OPTIONS` returns an empty 200. Everything else is a 400.
pub async fn create_starter(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    tracing::info!("{} {}", method, uri.path());

    if method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }
    if method != Method::POST {
        return Err(AppError::BadRequest(JSON_POST_ONLY.to_string()));
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if content_type != "application/json" {
        tracing::info!("Bad Content-Type: '{}'", content_type);
        return Err(AppError::BadRequest(JSON_POST_ONLY.to_string()));
    }

    let payload: Payload =
        serde_json::from_slice(&body).map_err(|e| AppError::BadRequest(e.to_string()))?;

    // Resolution is a precondition; nothing is fetched for an unnamed archive.
    let path = decoded_path(&uri)?;
    let name = resolve_name(&path, &payload)?;

    // The fetch blocks, so assembly runs off the async workers.
    let fetcher = state.fetcher.clone();
    let archive = tokio::task::spawn_blocking(move || assemble(&name, &payload, fetcher.as_ref()))
        .await
        .map_err(|e| AppError::Internal(format!("archive task failed: {}", e)))??;

    archive_response(archive)
}

/// The request path with percent-escapes decoded.
fn decoded_path(uri: &Uri) -> Result<String, AppError> {
    percent_decode_str(uri.path())
        .decode_utf8()
        .map(|path| path.into_owned())
        .map_err(|_| AppError::BadRequest(format!("path '{}' is not valid UTF-8", uri.path())))
}

/// `Content-Disposition` for the archive, if its name fits in a quoted filename.
fn content_disposition(archive: &Archive) -> Option<HeaderValue> {
    let filename = archive.filename();
    if filename.contains(['"', '\\']) {
        return None;
    }
    HeaderValue::from_str(&format!("inline; filename=\"{}\"", filename)).ok()
}

fn archive_response(archive: Archive) -> Result<Response, AppError> {
    let disposition = content_disposition(&archive).ok_or_else(|| {
        AppError::BadRequest(format!(
            "archive name '{}' cannot be used as a filename",
            archive.name()
        ))
    })?;

    tracing::info!(
        archive = %archive.name(),
        size = archive.bytes().len(),
        fetched = archive.fetch_outcome().attempted(),
        "starter archive built"
    );

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(ARCHIVE_CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        archive.into_bytes(),
    )
        .into_response())
}

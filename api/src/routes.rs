/// Route handlers for the Daybook web service.
///
/// Failures are reported in the response body with status 200; callers
/// inspect `error` / `message` rather than the status code.
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tracing::{info, warn};

use daybook_fetcher::SUCCESS_MESSAGE;
use daybook_shared::errors::{FetchError, StoreError};
use daybook_shared::models::ListingPage;
use daybook_shared::store;

use crate::render;
use crate::AppState;

// ====== REQUEST / RESPONSE TYPES ======

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Deserialize)]
pub struct FilesQuery {
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

#[derive(Deserialize)]
pub struct DownloadFileQuery {
    pub filename: String,
}

fn error_json(error: impl ToString) -> Response {
    Json(ErrorBody {
        error: error.to_string(),
    })
    .into_response()
}

// ====== DOWNLOAD TRIGGER ======

/// GET /download - Fetch today's file from the configured URL
pub async fn trigger_download(State(state): State<Arc<AppState>>) -> Response {
    match state.fetcher.fetch().await {
        Ok(path) => {
            info!("Download stored at {}", path.display());
            Json(MessageResponse {
                message: SUCCESS_MESSAGE.to_string(),
            })
            .into_response()
        }
        Err(e @ FetchError::MissingSetting(_)) => {
            warn!("Download requested but {}", e);
            error_json(e)
        }
        Err(e) => Json(MessageResponse {
            message: format!("error: {}", e),
        })
        .into_response(),
    }
}

// ====== LISTING ======

/// GET / and GET /files - Paginated HTML listing of stored files
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilesQuery>,
) -> Html<String> {
    let Some(folder) = state.settings.destination_folder.as_deref() else {
        return Html(render::notice(
            &StoreError::MissingSetting("DESTINATION_FOLDER").to_string(),
        ));
    };

    match store::list_files(folder).await {
        Ok(files) => {
            let page = ListingPage::paginate(files, query.page, state.settings.page_size);
            Html(render::listing(&state.settings.page_title, &page))
        }
        Err(e) => {
            warn!("Listing {} failed: {}", folder.display(), e);
            Html(render::notice(&e.to_string()))
        }
    }
}

// ====== FILE DOWNLOAD ======

/// GET /download_file?filename=... - Stream a stored file as an attachment
pub async fn download_file_by_name(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DownloadFileQuery>,
) -> Response {
    let Some(folder) = state.settings.destination_folder.as_deref() else {
        return error_json(StoreError::MissingSetting("DESTINATION_FOLDER"));
    };

    let path = match store::resolve_file(folder, &query.filename).await {
        Ok(p) => p,
        Err(e) => {
            info!("download_file: {}", e);
            return error_json(e);
        }
    };

    let file = match tokio::fs::File::open(&path).await {
        Ok(f) => f,
        Err(e) => {
            warn!("Cannot open {}: {}", path.display(), e);
            return error_json(StoreError::Io(e));
        }
    };
    let length = file.metadata().await.map(|m| m.len()).ok();

    let mut response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&query.filename)),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response();

    if let Some(len) = length {
        response
            .headers_mut()
            .insert(header::CONTENT_LENGTH, header::HeaderValue::from(len));
    }
    response
}

/// `attachment` disposition keeping the original name.
///
/// Names that are not plain printable ASCII get an ASCII fallback plus an
/// RFC 5987 `filename*` parameter.
pub fn content_disposition(filename: &str) -> String {
    let plain = filename
        .chars()
        .all(|c| (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ');
    if plain {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let fallback: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() || c == ' ') && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(filename)
    )
}

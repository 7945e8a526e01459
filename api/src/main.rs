/// Daybook API Server
///
/// Web front for the Daybook archive: triggers the daily download, lists
/// stored files page by page, and serves them back as attachments.
mod render;
mod routes;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use daybook_fetcher::Fetcher;
use daybook_shared::Settings;

/// Shared application state for all handlers.
pub struct AppState {
    pub settings: Settings,
    pub fetcher: Fetcher,
}

impl AppState {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let fetcher = Fetcher::new(&settings)?;
        Ok(Self { settings, fetcher })
    }
}

/// Build the router with every Daybook route.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/download", get(routes::trigger_download))
        .route("/", get(routes::list_files))
        .route("/files", get(routes::list_files))
        .route("/download_file", get(routes::download_file_by_name))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Init tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "daybook_api=info,daybook_fetcher=info,daybook_shared=info,tower_http=info".into()
            }),
        )
        .init();

    // Config
    let settings = Settings::from_env();
    match &settings.destination_folder {
        Some(folder) => info!("Destination folder: {}", folder.display()),
        None => tracing::warn!("DESTINATION_FOLDER not set; listing and file downloads are disabled"),
    }
    if settings.download_page.is_none() {
        tracing::warn!("DOWNLOAD_PAGE not set; /download will report an error");
    }
    info!(
        "Page size {}, fetch timeout {}s",
        settings.page_size,
        settings.request_timeout.as_secs()
    );

    let addr = settings.bind_address();
    let state = Arc::new(AppState::new(settings)?);
    let app = create_router(state);

    // Bind
    info!("Daybook API listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

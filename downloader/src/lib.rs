/// Daybook fetcher
///
/// Downloads the configured page once and stores it under a date-stamped
/// name in the destination folder. The body is buffered in memory and moved
/// into place with a rename, so readers never see a half-written file.
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};

use daybook_shared::errors::FetchError;
use daybook_shared::store::dated_filename;
use daybook_shared::Settings;

/// Message reported after a successful fetch.
pub const SUCCESS_MESSAGE: &str = "File downloaded successfully.";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// HTTP fetcher bound to one set of settings.
///
/// Holds a pooled `reqwest::Client`; create it once and share it.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    url: Option<String>,
    prefix: String,
    postfix: String,
    folder: PathBuf,
}

impl Fetcher {
    /// Build a fetcher with the timeouts from `settings`.
    pub fn new(settings: &Settings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .connect_timeout(settings.connect_timeout)
            .user_agent(concat!("daybook/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: settings.download_page.clone(),
            prefix: settings.page_prefix.clone(),
            postfix: settings.page_postfix.clone(),
            folder: settings.fetch_folder(),
        })
    }

    /// Path the download for `date` is written to.
    pub fn destination_for(&self, date: NaiveDate) -> PathBuf {
        self.folder
            .join(dated_filename(&self.prefix, date, &self.postfix))
    }

    /// Fetch using today's local date.
    pub async fn fetch(&self) -> Result<PathBuf, FetchError> {
        self.fetch_for(Local::now().date_naive()).await
    }

    /// Fetch the configured URL and store it under the name for `date`.
    pub async fn fetch_for(&self, date: NaiveDate) -> Result<PathBuf, FetchError> {
        let url = self
            .url
            .as_deref()
            .ok_or(FetchError::MissingSetting("DOWNLOAD_PAGE"))?;
        let destination = self.destination_for(date);

        tokio::fs::create_dir_all(&self.folder)
            .await
            .map_err(|source| FetchError::CreateFolder {
                path: self.folder.clone(),
                source,
            })?;

        info!("Fetching {} -> {}", url, destination.display());

        let result = self.download(url, &destination).await;
        match &result {
            Ok(size) => info!("Saved {} bytes to {}", size, destination.display()),
            Err(e) if e.is_upstream() => warn!("Fetch of {} failed: {}", url, e),
            Err(e) => warn!("Could not store {}: {}", destination.display(), e),
        }
        result.map(|_| destination)
    }

    async fn download(&self, url: &str, destination: &Path) -> Result<usize, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        write_atomically(destination, &body).await?;
        Ok(body.len())
    }
}

/// Write `bytes` to a unique sibling temp file, then rename it over `path`.
async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), FetchError> {
    let temp = temp_path(path);
    let write_err = |source| FetchError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Err(e) = tokio::fs::write(&temp, bytes).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(write_err(e));
    }
    if let Err(e) = tokio::fs::rename(&temp, path).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(write_err(e));
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(".{}.{}-{}.part", name, std::process::id(), n))
}

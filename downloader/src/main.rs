/// Daybook one-shot fetch
///
/// Downloads today's file with the same settings as the web service and
/// exits. Meant for cron or a systemd timer.
use daybook_fetcher::{Fetcher, SUCCESS_MESSAGE};
use daybook_shared::Settings;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daybook_fetcher=info".into()),
        )
        .init();

    let settings = Settings::from_env();
    let fetcher = Fetcher::new(&settings)?;
    let saved = fetcher.fetch().await?;

    info!("{} ({})", SUCCESS_MESSAGE, saved.display());
    Ok(())
}

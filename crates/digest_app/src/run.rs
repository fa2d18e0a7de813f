use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use digest_core::{render_report, BoardKind, Config, RenderOptions};
use digest_engine::{
    BrowserlessFetcher, DigestRunner, FetchSettings, GitPublisher, HttpFetcher, PageFetcher,
    PublishOutcome, ReportWriter,
};
use digest_logging::{digest_error, digest_info, digest_warn};

/// One full digest: scrape, render, write, then publish if enabled.
///
/// Only setup and the report write are fatal; section and publish failures
/// are logged and the run still succeeds.
pub async fn run(config: Config) -> Result<()> {
    digest_info!("Starting Bahamut digest");
    for kind in [BoardKind::Hot, BoardKind::Cold] {
        let (boards, limit) = config.boards(kind);
        digest_info!(
            "{} boards: [{}] (limit {})",
            kind.label(),
            boards.join(", "),
            limit
        );
    }

    let fetcher = build_fetcher(&config)?;
    let runner = DigestRunner::new(config.clone(), fetcher);
    let generated_at = Local::now().format("%Y/%m/%d %H:%M:%S").to_string();
    let data = runner.run(generated_at).await;

    let markdown = render_report(
        &data,
        &RenderOptions {
            forum_base_url: config.forum_base_url.clone(),
        },
    );
    let path = ReportWriter
        .write(&config.output_path, &markdown)
        .with_context(|| format!("writing report to {}", config.output_path.display()))?;
    digest_info!("Report written to {}", path.display());

    if config.publish.enabled {
        let message = config
            .publish
            .commit_message(&Utc::now().format("%Y-%m-%d").to_string());
        publish(path, message).await;
    } else {
        digest_info!("GIT_PUBLISH is off; skipping git push");
    }

    digest_info!("Digest finished");
    Ok(())
}

fn build_fetcher(config: &Config) -> Result<Arc<dyn PageFetcher>> {
    let settings = FetchSettings::from_browser(&config.browser);
    match &config.browser.browserless_url {
        Some(url) => {
            digest_info!("Rendering pages through Browserless at {}", url);
            let fetcher = BrowserlessFetcher::new(
                url,
                config.browser.browserless_token.as_deref(),
                settings,
            )
            .context("creating Browserless client")?;
            Ok(Arc::new(fetcher))
        }
        None => {
            digest_warn!("BROWSERLESS_URL not set; fetching static HTML without a browser");
            let fetcher = HttpFetcher::new(settings).context("creating HTTP client")?;
            Ok(Arc::new(fetcher))
        }
    }
}

async fn publish(path: PathBuf, message: String) {
    let outcome =
        tokio::task::spawn_blocking(move || GitPublisher::new(None).publish(&path, &message))
            .await;

    match outcome {
        Ok(Ok(PublishOutcome::Pushed)) => digest_info!("Report pushed"),
        Ok(Ok(PublishOutcome::NothingToCommit)) => {
            digest_info!("Report unchanged; nothing to commit")
        }
        Ok(Ok(PublishOutcome::CompletedWithWarnings(warnings))) => {
            digest_warn!("Publish finished with {} warning(s)", warnings.len())
        }
        Ok(Err(err)) => digest_error!("Publish failed: {}", err),
        Err(err) => digest_error!("Publish task failed: {}", err),
    }
}

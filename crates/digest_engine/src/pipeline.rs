use std::sync::Arc;

use digest_core::{BoardKind, BoardResult, Config, HomepageSection, ReportData};
use digest_logging::{digest_info, digest_warn};

use crate::extract::{
    extract_board_posts, extract_headlines, BOARD_ROW_SELECTOR, HEADLINE_CONTAINER_SELECTOR,
};
use crate::fetch::PageFetcher;
use crate::{DigestEvent, PageRequest, WaitUntil};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: DigestEvent);
}

/// Reports progress through the logger.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: DigestEvent) {
        match event {
            DigestEvent::HomepageScraped { headlines } => {
                digest_info!("Homepage: {} headlines", headlines)
            }
            DigestEvent::HomepageFailed { reason } => {
                digest_warn!("Homepage failed: {}", reason)
            }
            DigestEvent::BoardScraped {
                kind,
                board_id,
                name,
                posts,
            } => digest_info!(
                "[{}] board {} ({}): {} posts",
                kind.label(),
                board_id,
                name,
                posts
            ),
            DigestEvent::BoardFailed {
                kind,
                board_id,
                reason,
            } => digest_warn!("[{}] board {} failed: {}", kind.label(), board_id, reason),
        }
    }
}

/// Walks the homepage and every configured board, one page at a time.
///
/// A page that fails to load or lacks its expected container degrades to a
/// placeholder section; the run always completes.
pub struct DigestRunner {
    config: Config,
    fetcher: Arc<dyn PageFetcher>,
    sink: Arc<dyn ProgressSink>,
}

impl DigestRunner {
    pub fn new(config: Config, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            config,
            fetcher,
            sink: Arc::new(LogProgressSink),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    pub async fn run(&self, generated_at: impl Into<String>) -> ReportData {
        let homepage = self.scrape_homepage().await;
        let hot = self.scrape_category(BoardKind::Hot).await;
        let cold = self.scrape_category(BoardKind::Cold).await;

        ReportData {
            generated_at: generated_at.into(),
            homepage,
            hot,
            cold,
        }
    }

    async fn scrape_homepage(&self) -> HomepageSection {
        let request = PageRequest::new(self.config.base_url.clone())
            .wait_until(WaitUntil::NetworkIdle2)
            .wait_for(
                HEADLINE_CONTAINER_SELECTOR,
                self.config.browser.selector_timeout,
            );

        let outcome = match self.fetcher.fetch_page(&request).await {
            Ok(page) => extract_headlines(&page.html, &page.url).map_err(|err| err.to_string()),
            Err(err) => Err(err.to_string()),
        };

        match outcome {
            Ok(headlines) => {
                self.sink.emit(DigestEvent::HomepageScraped {
                    headlines: headlines.len(),
                });
                HomepageSection::Extracted(headlines)
            }
            Err(reason) => {
                self.sink.emit(DigestEvent::HomepageFailed { reason });
                HomepageSection::Failed
            }
        }
    }

    async fn scrape_category(&self, kind: BoardKind) -> Option<Vec<BoardResult>> {
        let (board_ids, limit) = self.config.boards(kind);
        if board_ids.is_empty() {
            return None;
        }

        let mut results = Vec::with_capacity(board_ids.len());
        for board_id in board_ids {
            results.push(self.scrape_board(kind, board_id, limit).await);
        }
        Some(results)
    }

    async fn scrape_board(&self, kind: BoardKind, board_id: &str, limit: usize) -> BoardResult {
        let request = PageRequest::new(self.config.board_url(board_id))
            .wait_until(WaitUntil::DomContentLoaded)
            .wait_for(BOARD_ROW_SELECTOR, self.config.browser.selector_timeout);

        let outcome = match self.fetcher.fetch_page(&request).await {
            Ok(page) => extract_board_posts(&page.html, board_id, limit, &self.config.filter)
                .map_err(|err| err.to_string()),
            Err(err) => Err(err.to_string()),
        };

        match outcome {
            Ok(board) => {
                self.sink.emit(DigestEvent::BoardScraped {
                    kind,
                    board_id: board_id.to_string(),
                    name: board.name.clone(),
                    posts: board.posts.len(),
                });
                board
            }
            Err(reason) => {
                self.sink.emit(DigestEvent::BoardFailed {
                    kind,
                    board_id: board_id.to_string(),
                    reason,
                });
                BoardResult::fallback(board_id)
            }
        }
    }
}

//! Digest engine: page fetching, extraction, the run pipeline and publishing.
mod browserless;
mod decode;
mod extract;
mod fetch;
mod persist;
mod pipeline;
mod publish;
mod types;

pub use browserless::BrowserlessFetcher;
pub use decode::{decode_html, DecodeError, DecodedHtml};
pub use extract::{
    extract_board_posts, extract_headlines, ExtractError, BOARD_ROW_SELECTOR,
    HEADLINE_CONTAINER_SELECTOR,
};
pub use fetch::{FetchSettings, HttpFetcher, PageFetcher};
pub use persist::{ensure_output_dir, PersistError, ReportWriter};
pub use pipeline::{DigestRunner, LogProgressSink, ProgressSink};
pub use publish::{
    CommandOutput, CommandRunner, GitPublisher, PublishError, PublishOutcome, SystemCommandRunner,
};
pub use types::{
    DigestEvent, FailureKind, FetchError, FetchedPage, PageRequest, WaitForSelector, WaitUntil,
};

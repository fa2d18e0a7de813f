mod env;
mod logging;
mod run;

use std::process::ExitCode;

use digest_logging::{digest_error, digest_info, digest_warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let dotenv = env::load_dotenv();
    let config = env::config_from_process();
    logging::initialize(&config.logging);

    match dotenv {
        Ok(Some(path)) => digest_info!("Loaded environment from {}", path.display()),
        Ok(None) => {}
        Err(err) => digest_warn!("Ignoring unreadable .env file: {}", err),
    }

    match run::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            digest_error!("Digest run failed: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

use std::process::ExitCode;

use clap::Parser;
use tracing::{event, Level};

use vatlink::util::{cli::Options, logging};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    let opts = Options::parse();

    match vatlink::daemon::vatlinkd(opts).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            event!(Level::ERROR, error = %e, "vatlinkd failed");
            ExitCode::FAILURE
        }
    }
}

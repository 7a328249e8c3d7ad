use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[clap(
    name = "vatlinkd",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Walks a user through HMRC's OAuth 2.0 consent and prints the token"
)]
pub struct Options {
    /// JSON object whose keys seed the environment when NODE_PROCESS is not "production"
    #[clap(long, env = "ENV_FILE", default_value = "env.json")]
    pub env_file: PathBuf,
}

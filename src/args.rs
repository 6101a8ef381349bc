use clap::Parser;
use std::path::PathBuf;

use crate::config::DEFAULT_API_URL;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    disable_help_flag = true,
    about = "Command-line client for the Mozilla HTTP Observatory website security scanner"
)]
pub struct Args {
    #[arg(long, value_name = "URL", default_value = DEFAULT_API_URL, help = "API base URL")]
    pub api_url: String,

    #[arg(
        long,
        value_name = "FILE",
        help = "Read an HTTP proxy (host:port) from FILE (default: ./proxy if present)"
    )]
    pub proxy_file: Option<PathBuf>,

    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 30,
        help = "HTTP request timeout in seconds"
    )]
    pub timeout: u64,

    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 10,
        help = "Seconds to wait between assessment polls"
    )]
    pub poll_interval: u64,

    #[arg(
        long,
        value_name = "SECS",
        help = "Give up polling after SECS without a terminal scan state"
    )]
    pub poll_deadline: Option<u64>,

    #[arg(long, help = "Submit the assessment without waiting for the scan to finish")]
    pub no_poll: bool,

    #[arg(short, long, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = "Command followed by key=value arguments, e.g. --retrieveAssessment host=example.com"
    )]
    pub tokens: Vec<String>,
}

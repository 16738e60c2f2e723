use std::env;

use recruitsim::config::AppConfig;
use recruitsim::{cli, logging};

fn main() {
    logging::init_tracing();
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            std::process::exit(1);
        }
    };
    let args: Vec<String> = env::args().collect();
    std::process::exit(cli::run_with_args(&args, &config));
}

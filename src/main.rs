use clap::Parser;
use deck_tracker_lib::cli::CliArgs;

fn main() {
    let args = CliArgs::parse();

    // Logs go to stderr; stdout carries the JSON protocol
    let default_filter = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(e) = deck_tracker_lib::run(args) {
        log::error!("Deck tracker failed: {:#}", e);
        std::process::exit(1);
    }
}

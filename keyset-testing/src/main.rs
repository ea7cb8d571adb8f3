use clap::Parser;
use keyset_testing::cli::CliArgs;

/// Catches errors, prints them through the logger, then exits
pub fn main() {
    // parse CLI arguments
    let args = CliArgs::parse();

    let config = match args.serve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:?}");
            std::process::exit(1);
        }
    };

    // init logging; command line flags win over the config file
    let log_level = args
        .get_log_level()
        .or_else(|| config.as_ref().map(|c| c.verbosity.log_level_filter()))
        .unwrap_or(log::LevelFilter::Warn);
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    match args.run(config) {
        Ok(_) => {}
        Err(e) => {
            log::error!("{e:?}");
            std::process::exit(1);
        }
    }
}

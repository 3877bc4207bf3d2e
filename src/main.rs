use buildchain::cli::commands::{CliArgs, Commands};
use buildchain::cli::handlers::{handle_plan, handle_run, EXIT_CONFIG_ERROR};
use buildchain::util::logging::{init_logging, json_from_env, LoggingConfig};
use buildchain::{BuildchainConfig, VERSION};

use clap::Parser;
use tracing::debug;

fn main() {
    let args = CliArgs::parse();

    let config = BuildchainConfig::from_env_with(&args.overrides());
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(EXIT_CONFIG_ERROR);
    }

    init_logging(LoggingConfig {
        level: config.level(),
        use_json: json_from_env(),
        ..Default::default()
    });

    debug!("buildchain v{} starting", VERSION);
    debug!("Arguments: {:?}", args);
    debug!("{}", config);

    let exit_code = match &args.command {
        Commands::Run(run_args) => handle_run(run_args, &config),
        Commands::Plan(plan_args) => handle_plan(plan_args, &config),
    };

    std::process::exit(exit_code);
}

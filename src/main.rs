use anyhow::Result;
use qtlint::cli::{self, Cli, Commands};
use qtlint::commands;
use std::process;

fn main() {
    let cli = cli::parse_args();

    let code = match run(cli) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            eprintln!("qtlint: {e:#}");
            2
        }
    };
    process::exit(code);
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Check {
            paths,
            format,
            output,
            fix,
            errcheck_fix,
            lib_path,
            no_parallel,
            verbosity,
        } => {
            init_logging(verbosity);
            commands::run_check(commands::CheckConfig {
                paths,
                format,
                output,
                fix,
                errcheck_fix,
                lib_path,
                no_parallel,
            })
        }
        Commands::Init { force } => {
            init_logging(0);
            commands::init_config(force)?;
            Ok(true)
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init()
        .ok();
}

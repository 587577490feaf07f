use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use tengok_installer::cli::cmd_enums::{Cli, option_error};
use tengok_installer::commands::install;
use tengok_installer::{log_error, logger};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match option_error(&err) {
            Some(error) => {
                log_error!("[{}] {}", error.stage(), error);
                eprintln!("Run {} for usage.", "tengok-install --help".bold());
                return exit_code(error.exit_code());
            }
            // --help / --version
            None => err.exit(),
        },
    };

    logger::init(cli.debug);

    // `install::run` has dropped the staging directory by the time it returns.
    match install::run(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            log_error!("[{}] {}", error.stage(), error);
            exit_code(error.exit_code())
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

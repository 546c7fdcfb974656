//! `fdbvault`: one FoundationDB backup run, meant to be started by cron or a systemd timer.
//!
//! Exit codes: `0` run completed (backup stored or backup failed and reported), `1` backup
//! agent not running, `2` a supporting stage failed, `78` startup/configuration error.
use clap::Parser;

mod app;
mod args;
mod settings;

use crate::{app::EXIT_CONFIG, args::Args, settings::Settings};

fn main() {
    let args = Args::parse();

    let settings = match Settings::load(&args) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("fdbvault: {err:#}");
            std::process::exit(EXIT_CONFIG);
        }
    };

    if args.check_config {
        match settings.to_redacted_yaml() {
            Ok(yaml) => {
                print!("{yaml}");
                std::process::exit(0);
            }
            Err(err) => {
                eprintln!("fdbvault: {err:#}");
                std::process::exit(EXIT_CONFIG);
            }
        }
    }

    let code = app::run(settings).unwrap_or_else(|err| {
        eprintln!("fdbvault: {err:#}");
        EXIT_CONFIG
    });
    std::process::exit(code);
}

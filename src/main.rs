mod catalog;
mod cli;
mod cloud;
mod config;
mod error;
mod exec;
mod features;
mod interrupt;
mod logging;
mod plan;
mod platform;
mod prompts;
mod report;
mod secrets;
#[cfg(test)]
mod test_support;
mod tooling;
mod util;
mod workflow;

use clap::Parser;
use cli::{Command, RootArgs};

fn main() {
    let args = RootArgs::parse();
    let outcome = match args.command {
        Command::Install(args) => workflow::run_install(args),
        Command::Uninstall(args) => workflow::run_uninstall(args),
        Command::Verify(args) => workflow::run_verify(args),
    };
    if let Err(err) = outcome {
        let code = error::exit_code_for(&err);
        tracing::info!(code, error = %format!("{err:#}"), "run failed");
        eprintln!("error: {err:#}");
        std::process::exit(code);
    }
}

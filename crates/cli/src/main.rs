mod config;
mod shell;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use q3rcon::RconClient;

use config::FileConfig;

#[derive(Parser)]
#[command(name = "q3rcon")]
#[command(about = "Remote console client for Quake 3 engine servers")]
struct Args {
    #[arg(
        short,
        long,
        default_value = "config.json",
        help = "JSON file with address, password and timings"
    )]
    config: PathBuf,

    #[arg(short, long, help = "Log every packet sent and received")]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Read commands from stdin until `exit` (default)
    Shell,
    /// Send `status` once and print the reply
    Status,
    /// Send one command and print the reply
    Exec {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let file = FileConfig::load(&args.config)?;
    let debug = args.debug || file.debug;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(debug)))
        .init();

    let client = RconClient::open(
        &file.address,
        file.password.as_str(),
        file.client_config().with_debug(debug),
    )?;

    let result = match args.command.unwrap_or(Command::Shell) {
        Command::Shell => shell::run(io::stdin().lock(), io::stdout().lock(), |command| {
            client.send(command)
        }),
        Command::Status => one_shot(&client, "status"),
        Command::Exec { command } => one_shot(&client, &command.join(" ")),
    };

    client.close()?;
    result
}

fn log_filter(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

fn one_shot(client: &RconClient, command: &str) -> Result<()> {
    let reply = client
        .send(command)
        .with_context(|| format!("command {:?} failed", command))?;

    // A truncated reply is still printed, then reported as a failure.
    println!("{}", reply.text);
    reply.into_result()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter() {
        assert_eq!(log_filter(false), "info");
        assert_eq!(log_filter(true), "debug");
    }
}

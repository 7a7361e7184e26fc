//! rediswire CLI Client
//!
//! Command-line interface for talking to a Redis-compatible server.

use std::io::{self, BufRead};
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use rediswire::{Client, Command, Config, Reply};
use tracing_subscriber::{fmt, EnvFilter};

/// rediswire CLI
#[derive(Parser, Debug)]
#[command(name = "rediswire-cli")]
#[command(about = "CLI for Redis-compatible servers")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:6379")]
    server: String,

    /// Connect timeout in milliseconds (0 = block)
    #[arg(long, default_value = "0")]
    connect_timeout_ms: u64,

    /// Read timeout in milliseconds (0 = block)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ping the server
    Ping,

    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete one or more keys
    Del {
        /// The keys to delete
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Send an arbitrary command, e.g. `raw LPUSH list a b c`
    Raw {
        /// Verb followed by its arguments
        #[arg(required = true, num_args = 1..)]
        args: Vec<String>,
    },

    /// Read one command per stdin line and send them all as one pipeline
    Pipeline,
}

fn build_config(args: &Args) -> Config {
    let mut builder = Config::builder();
    if args.connect_timeout_ms > 0 {
        builder = builder.connect_timeout(Duration::from_millis(args.connect_timeout_ms));
    }
    if args.read_timeout_ms > 0 {
        builder = builder.read_timeout(Duration::from_millis(args.read_timeout_ms));
    }
    builder.build()
}

fn read_pipeline() -> rediswire::Result<Vec<Command>> {
    let mut commands = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }
        commands.push(Command::from_args(words)?);
    }
    Ok(commands)
}

fn run(args: Args) -> rediswire::Result<Vec<Reply>> {
    let config = build_config(&args);
    let mut client = Client::open_with_config(&args.server, config)?;

    let command = match args.command {
        Commands::Ping => Command::ping(),
        Commands::Get { key } => Command::get(key),
        Commands::Set { key, value } => Command::set(key, value),
        Commands::Del { keys } => Command::del(keys),
        Commands::Raw { args } => Command::from_args(args)?,
        Commands::Pipeline => {
            let commands = read_pipeline()?;
            tracing::info!("Sending {} pipelined commands", commands.len());
            return client.send_commands(&commands);
        }
    };

    Ok(vec![client.send_command(&command)?])
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,rediswire=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!("rediswire-cli v{} -> {}", rediswire::VERSION, args.server);

    match run(args) {
        Ok(replies) => {
            for reply in replies {
                println!("{}", reply);
            }
        }
        Err(e) => {
            tracing::error!("{}", e);
            process::exit(1);
        }
    }
}

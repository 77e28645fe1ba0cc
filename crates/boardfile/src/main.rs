use boardfile_core::boards::BoardIter;
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::*;

use std::io::Write;

use crate::{
    describe::describe,
    inspect::{check, find, list, pins},
};

mod describe;
mod inspect;

#[derive(Parser, Debug)]
enum Command {
    /// Validate a board and emit its descriptor as JSON
    #[command(arg_required_else_help = true)]
    Describe {
        /// Board (mdbt42q, etc.)
        #[clap(short, long, value_parser = board_parser)]
        board: String,

        /// Output JSON file, stdout when left out
        #[clap(short, long)]
        output: Option<String>,

        /// Indent the JSON
        #[clap(short, long)]
        pretty: bool,
    },
    /// Print the pin table with the functions of each pin
    #[command(arg_required_else_help = true)]
    Pins {
        /// Board (mdbt42q, etc.)
        #[clap(short, long, value_parser = board_parser)]
        board: String,

        /// Only list pins with this function, e.g. ADC1_IN4 or USART1_TX
        #[clap(short, long)]
        function: Option<String>,
    },
    /// Look up a single pin, failing if it does not exist
    #[command(arg_required_else_help = true)]
    Find {
        /// Board (mdbt42q, etc.)
        #[clap(short, long, value_parser = board_parser)]
        board: String,

        /// Pin name, e.g. D21 or PD21
        pin: String,
    },
    /// Check devices, layouts and flash partitions of a board
    #[command(arg_required_else_help = true)]
    Check {
        /// Board (mdbt42q, etc.)
        #[clap(short, long, value_parser = board_parser)]
        board: String,
    },
    /// List the known boards
    List,
}

fn board_parser(s: &str) -> Result<String, String> {
    if let Some(board) = BoardIter::find_by_name(s) {
        Ok(board.board_name().to_string())
    } else {
        Err(format!("Unknown board '{}'", s))
    }
}

#[derive(Parser, Debug, Default)]
#[clap(version, about, long_about = None, author = "Jonathan Nilsson")]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Set the logging verbosity
    #[clap(short, long, value_enum, global = true, default_value_t = LogLevel::Info)]
    verbose: LogLevel,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Off => LevelFilter::Off,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so a descriptor on stdout stays clean JSON
    env_logger::Builder::from_env(Env::default())
        .filter_level(cli.verbose.into())
        .target(env_logger::Target::Stderr)
        .format(|buf, record| {
            let level = record.level();
            if level == Level::Info {
                writeln!(buf, "{}", record.args())
            } else {
                writeln!(buf, "{}: {}", record.level(), record.args())
            }
        })
        .init();

    let command = match cli.command {
        Some(command) => command,
        None => return Ok(()),
    };

    let find_board = |name: &str| {
        BoardIter::find_by_name(name).ok_or_else(|| format!("Unknown board '{}'", name))
    };

    match command {
        Command::Describe {
            board,
            output,
            pretty,
        } => {
            let board = find_board(&board)?;
            describe(output.as_deref(), board.as_ref(), pretty)
        }
        Command::Pins { board, function } => {
            let board = find_board(&board)?;
            pins(board.as_ref(), function.as_deref())
        }
        Command::Find { board, pin } => {
            let board = find_board(&board)?;
            find(board.as_ref(), &pin)
        }
        Command::Check { board } => {
            let board = find_board(&board)?;
            check(board.as_ref())
        }
        Command::List => list(),
    }
}

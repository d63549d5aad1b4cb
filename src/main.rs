use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use minipy::ast::Ast;
use minipy::error::MinipyError;
use minipy::parser::Parser;
use minipy::scanner::Scanner;
use minipy::token::Token;

#[derive(ClapParser, Debug)]
#[command(version, about = "minipy language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Dump the token stream as JSON instead of one token per line
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file and prints the program's AST
    Parse { filename: PathBuf },

    /// Runs input from a file as a minipy program
    Run { filename: PathBuf },
}

/// Reads the contents of a file into a Vec<u8>
fn read_file(filename: &PathBuf) -> Result<Vec<u8>> {
    info!("Reading file: {:?}", filename);

    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    Ok(buf)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    // Write to file with module path and source line
    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("minipy::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));

            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .init();

    info!("Logger initialized, writing to app.log");

    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        // Minimal logger so log macros have a sink
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Commands::Tokenize { filename, json } => {
            info!("Running Tokenize subcommand");

            let buf = read_file(&filename)?;
            let mut tokens: Vec<Token<'_>> = Vec::new();
            let mut tokenized = true;

            for item in Scanner::new(&buf) {
                match item {
                    Ok(token) => {
                        debug!("Scanned token: {}", token);

                        tokens.push(token);
                    }

                    Err(e) => {
                        tokenized = false;

                        eprintln!("{}", e);
                    }
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&tokens)?);
            } else {
                for token in &tokens {
                    println!("{}", token);
                }
            }

            if !tokenized {
                debug!("Tokenization failed, exiting with code 65");

                std::process::exit(65);
            }

            info!("Tokenization completed successfully");
        }

        Commands::Parse { filename } => {
            info!("Running Parse subcommand");

            let buf = read_file(&filename)?;
            let tokens: Vec<Token<'_>> = Scanner::new(&buf)
                .filter_map(|item| match item {
                    Ok(token) => Some(token),
                    Err(e) => {
                        eprintln!("{}", e);
                        None
                    }
                })
                .collect();

            let mut parser = Parser::new(&tokens);
            let (statements, errors) = parser.parse();

            for e in &errors {
                eprintln!("{}", e);
            }

            println!("{}", Ast.print_program(&statements));

            if !errors.is_empty() {
                std::process::exit(65);
            }

            info!("Parse subcommand completed");
        }

        Commands::Run { filename } => {
            info!("Running Run subcommand");

            let buf = read_file(&filename)?;

            let mut stdout = std::io::stdout().lock();

            if let Err(e) = minipy::run_source(&buf, &mut stdout) {
                debug!("Execution failed: {}", e);

                // 65 for malformed programs, 70 for runtime failures.
                // Scan and parse diagnostics were already reported by
                // run_source.
                match e {
                    MinipyError::Lex { .. } | MinipyError::Parse { .. } => {
                        std::process::exit(65)
                    }
                    other => {
                        eprintln!("{}", other);
                        std::process::exit(70);
                    }
                }
            }

            info!("Program executed successfully");
        }
    }

    Ok(())
}

use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use memmap2::Mmap;

use loxide::error::LoxError;
use loxide::interpreter::Interpreter;
use loxide::parser::Parser;
use loxide::resolver::Resolver;
use loxide::scanner::Scanner;
use loxide::token::Token;

#[derive(ClapParser, Debug)]
#[command(version, about = "Loxide language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes a script, printing each token
    Tokenize { filename: PathBuf },

    /// Runs a script
    Run { filename: PathBuf },
}

/// Memory-map a script file.
fn map_file(filename: &PathBuf) -> Result<Mmap> {
    info!("Mapping file: {:?}", filename);

    let file: File =
        File::open(filename).context(format!("Failed to open file {:?}", filename))?;

    // SAFETY: the mapping is read-only and lives for the whole run.
    let mmap: Mmap =
        unsafe { Mmap::map(&file) }.context(format!("Failed to map file {:?}", filename))?;

    info!("Mapped {} bytes from {:?}", mmap.len(), filename);

    Ok(mmap)
}

fn init_logger() -> Result<()> {
    // Create or open the log file
    let log_file: File = File::create("app.log").context("Failed to create app.log")?;

    // Configure env_logger to write to file with module path and source line
    Builder::new()
        .format(|buf, record| {
            // Strip 'loxide::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("loxide::")
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
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .init();

    info!("Logger initialized, writing to app.log");

    Ok(())
}

/// Outcome of pushing one source buffer through the whole pipeline.
enum RunOutcome {
    Ok,
    CompileError,
    RuntimeError,
}

/// Scan → parse → resolve → interpret.  Compile-time errors (lexical,
/// syntactic, static) are all reported before deciding whether to execute;
/// nothing runs if any were found.  Returns the outcome plus the next free
/// node id, so the prompt loop can keep ids unique across lines.
fn run_source(source: &[u8], interpreter: &mut Interpreter, base_id: usize) -> (RunOutcome, usize) {
    let mut had_error: bool = false;

    let mut tokens: Vec<Token> = Vec::new();
    for result in Scanner::new(source) {
        match result {
            Ok(token) => tokens.push(token),

            Err(e) => {
                had_error = true;

                eprintln!("{}", e);
            }
        }
    }

    let mut parser: Parser<'_> = Parser::with_base_id(&tokens, base_id);
    let statements = parser.parse();
    let next_id: usize = parser.next_id();

    for e in parser.errors() {
        had_error = true;

        eprintln!("{}", e);
    }

    let (resolutions, resolve_errors): (_, Vec<LoxError>) = Resolver::new().resolve(&statements);

    for e in &resolve_errors {
        had_error = true;

        eprintln!("{}", e);
    }

    // fail fast: never execute a program that failed any earlier stage
    if had_error {
        debug!("Compile-time errors reported; skipping execution");

        return (RunOutcome::CompileError, next_id);
    }

    interpreter.add_resolutions(resolutions);

    match interpreter.interpret(&statements) {
        Ok(()) => (RunOutcome::Ok, next_id),

        Err(e) => {
            eprintln!("{}", e);

            (RunOutcome::RuntimeError, next_id)
        }
    }
}

/// Line-at-a-time prompt against one persistent interpreter.  Errors are
/// reported but do not end the session.
fn run_prompt() -> Result<()> {
    let stdin = io::stdin();
    let mut interpreter: Interpreter = Interpreter::new();
    let mut base_id: usize = 0;

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line: String = String::new();
        let read: usize = stdin.lock().read_line(&mut line)?;

        // Control-D
        if read == 0 {
            break;
        }

        let (_, next_id) = run_source(line.as_bytes(), &mut interpreter, base_id);
        base_id = next_id;
    }

    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.command {
        Some(Commands::Tokenize { filename }) => {
            info!("Running Tokenize subcommand");

            let mmap: Mmap = map_file(&filename)?;
            let mut tokenized: bool = true;

            for result in Scanner::new(&mmap) {
                match result {
                    Ok(token) => {
                        debug!("Scanned token: {}", token);

                        println!("{}", token);
                    }

                    Err(e) => {
                        tokenized = false;

                        eprintln!("{}", e);
                    }
                }
            }

            if !tokenized {
                debug!("Tokenization failed, exiting with code 65");

                std::process::exit(65);
            }

            info!("Tokenization completed successfully");
        }

        Some(Commands::Run { filename }) => {
            info!("Running Run subcommand");

            let mmap: Mmap = map_file(&filename)?;
            let mut interpreter: Interpreter = Interpreter::new();

            match run_source(&mmap, &mut interpreter, 0) {
                (RunOutcome::Ok, _) => {
                    info!("Program executed successfully");
                }

                (RunOutcome::CompileError, _) => {
                    std::process::exit(65);
                }

                (RunOutcome::RuntimeError, _) => {
                    std::process::exit(70);
                }
            }
        }

        None => {
            info!("No subcommand, starting prompt");

            run_prompt()?;
        }
    }

    Ok(())
}

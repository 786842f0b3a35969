//! CLI tool for scripted zip archive patching.

mod exit_codes;
mod output;

use clap::{CommandFactory, Parser, ValueEnum};
use std::path::PathBuf;

use exit_codes::ExitCode;
use zippatch::command::{ALL_KINDS, CommandKind};
use zippatch::{
    ArityPolicy, BatchReport, BatchRunner, CommandSet, Compiler, Destination, WriteOptions,
};

/// Batch editing of zip archives
#[derive(Parser)]
#[command(name = "zippatch")]
#[command(author, version, about = "Batch editing of zip archives", long_about = None)]
#[command(disable_help_flag = true)]
#[command(override_usage = "zippatch [OPTIONS] [COMMAND ARGS...] [ARCHIVES...]")]
pub struct Cli {
    /// Print help, or help for the command named by the first argument
    #[arg(short = 'h', long = "help")]
    help: bool,

    /// Archive to process (positional archives are ignored)
    #[arg(short = 'n', long = "name", value_name = "ARCHIVE")]
    name: Option<PathBuf>,

    /// Destination path; a trailing separator makes it a directory
    #[arg(short = 'd', long = "dest", value_name = "PATH")]
    dest: Option<String>,

    /// Single command line to apply
    #[arg(short = 'c', long = "cmd", value_name = "COMMAND", conflicts_with = "file")]
    cmd: Option<String>,

    /// File with one command per line
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    file: Option<PathBuf>,

    /// What to do with commands that lack required arguments
    #[arg(long, value_enum, env = "ZIPPATCH_ARITY", default_value = "legacy")]
    arity: Arity,

    /// Compression method of written archives
    #[arg(short = 'm', long, value_enum, default_value = "deflate")]
    method: CompressionMethod,

    /// Compression level (0-9)
    #[arg(short = 'l', long)]
    level: Option<u32>,

    /// Summary format
    #[arg(long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Only log warnings and errors
    #[arg(long, short = 'q')]
    quiet: bool,

    /// A command followed by archives, or only archives with -c/-f
    args: Vec<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Arity {
    /// Skip short commands silently
    Legacy,
    /// Reject short commands
    Strict,
}

impl From<Arity> for ArityPolicy {
    fn from(arity: Arity) -> Self {
        match arity {
            Arity::Legacy => ArityPolicy::Legacy,
            Arity::Strict => ArityPolicy::Strict,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum CompressionMethod {
    Deflate,
    Store,
}

impl From<CompressionMethod> for zippatch::CompressionMethod {
    fn from(method: CompressionMethod) -> Self {
        match method {
            CompressionMethod::Deflate => zippatch::CompressionMethod::Deflate,
            CompressionMethod::Store => zippatch::CompressionMethod::Store,
        }
    }
}

fn print_help(topic: Option<&str>) {
    if let Some(kind) = topic.and_then(CommandKind::from_alias) {
        println!("{}", kind.help());
        return;
    }

    println!("{}", Cli::command().render_help());
    println!("Commands (case-insensitive, patterns match from the start of entry names):");
    for kind in ALL_KINDS {
        println!("  {}", kind.usage());
    }
    println!();
    println!("Run 'zippatch --help <command>' for details on one command.");
}

fn init_logging(quiet: bool) {
    let default_filter = if quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Compiles the commands and picks the archives they apply to.
///
/// `-c` and `-f` leave every positional word to archives. Otherwise a
/// leading command is compiled from the positional words and the rest are
/// archives. `-n` replaces the positional archives either way.
fn commands_and_archives(cli: &Cli) -> zippatch::Result<(CommandSet, Vec<PathBuf>)> {
    let compiler = Compiler::new(cli.arity.into());

    let (commands, used) = if let Some(line) = &cli.cmd {
        (CommandSet::from_line(line, &compiler)?, 0)
    } else if let Some(path) = &cli.file {
        (CommandSet::from_file(path, &compiler)?, 0)
    } else {
        CommandSet::from_args(&cli.args, &compiler)?
    };

    let archives = match &cli.name {
        Some(name) => vec![name.clone()],
        None => cli
            .args
            .get(used..)
            .unwrap_or(&[])
            .iter()
            .map(PathBuf::from)
            .collect(),
    };
    Ok((commands, archives))
}

fn run(cli: &Cli) -> zippatch::Result<BatchReport> {
    let (commands, archives) = commands_and_archives(cli)?;
    if commands.is_empty() {
        log::warn!("No commands given, archives are rewritten unchanged");
    }
    if archives.is_empty() {
        log::warn!("No archives given");
    }

    let mut options = WriteOptions::new().method(cli.method.into());
    if let Some(level) = cli.level {
        options = options.level(level)?;
    }

    let mut runner = BatchRunner::new(&commands).with_options(options);
    if let Some(dest) = &cli.dest {
        runner = runner.destination(Destination::from_arg(dest));
    }
    runner.run(&archives)
}

fn main() {
    // Set up Ctrl+C handler
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted");
        std::process::exit(exit_codes::USER_INTERRUPT);
    })
    .ok();

    if std::env::args_os().len() <= 1 {
        print_help(None);
        std::process::exit(exit_codes::SUCCESS);
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() {
                exit_codes::BAD_ARGS
            } else {
                exit_codes::SUCCESS
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    if cli.help {
        print_help(cli.args.first().map(String::as_str));
        std::process::exit(exit_codes::SUCCESS);
    }

    init_logging(cli.quiet);

    let exit_code = match run(&cli) {
        Ok(report) => {
            let formatter = output::create_formatter(cli.format);
            print!("{}", formatter.format_report(&report));
            exit_codes::report_to_exit_code(&report)
        }
        Err(err) => {
            log::error!("{}", err);
            exit_codes::error_to_exit_code(&err)
        }
    };

    std::process::exit(exit_code.code());
}

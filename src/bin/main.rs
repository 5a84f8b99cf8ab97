use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use derisian_core::config::TranslatorConfig;
use derisian_core::runtime::{bootstrap, NativeLoader, Runtime};
use derisian_core::terminal::TerminalApp;
use derisian_core::{Direction, Mappings};
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Translate between English and Derisian", long_about = None)]
struct Args {
    /// Path to a JSON configuration file.
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Require this passphrase before the translator opens.
    #[arg(long, global = true)]
    passphrase: Option<String>,

    /// Disable coloured output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the interactive translator (the default).
    Repl,

    /// Translate a phrase and print the result.
    Translate {
        #[arg(long, value_enum, default_value_t = Target::Derisian)]
        to: Target,

        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Print the symbol tables.
    Table {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Target {
    Derisian,
    English,
}

impl From<Target> for Direction {
    fn from(target: Target) -> Self {
        match target {
            Target::Derisian => Direction::EnglishToDerisian,
            Target::English => Direction::DerisianToEnglish,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    match &args.command {
        None | Some(Command::Repl) => repl(&args),
        Some(Command::Translate { to, text }) => {
            let config = load_config(&args)?;
            let runtime = bootstrap(&mut NativeLoader::new(), &config.retry_policy())?;
            println!("{}", runtime.translate(&text.join(" "), (*to).into())?);
            Ok(())
        }
        Some(Command::Table { json }) => print_table(*json),
    }
}

fn load_config(args: &Args) -> Result<TranslatorConfig> {
    let mut config = TranslatorConfig::load_or_default(args.config.as_deref())
        .with_context(|| format!("reading configuration {:?}", args.config))?;
    if let Some(passphrase) = &args.passphrase {
        config.passphrase = Some(passphrase.clone());
    }
    if args.no_color {
        config.color = false;
    }
    config.validate()?;
    Ok(config)
}

fn repl(args: &Args) -> Result<()> {
    let interactive = io::stdin().is_terminal() && io::stdout().is_terminal();
    let mut app = TerminalApp::new(BufReader::new(io::stdin()), io::stdout(), interactive);

    app.run(|| {
        let config = load_config(args)
            .map_err(|e| derisian_core::TranslatorError::Config(format!("{e:#}")))?;
        Ok((config, NativeLoader::new()))
    })?;
    Ok(())
}

fn print_table(json: bool) -> Result<()> {
    let mappings = Mappings::build();
    if json {
        println!("{}", serde_json::to_string_pretty(&mappings)?);
        return Ok(());
    }

    for (kind, table) in mappings.forward_tables() {
        println!("{kind:?}:");
        for (source, target) in table.pairs() {
            println!("  {source:?} -> {target:?}");
        }
    }
    if !mappings.unpaired().is_empty() {
        println!("Unpaired (pass through): {:?}", mappings.unpaired());
    }
    Ok(())
}

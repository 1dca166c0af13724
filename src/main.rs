use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use scriptgen::config::Config;
use scriptgen::{sglog, sglog_error, Registry, Result, ScriptDefinition, ScriptGenerator};

/// Scriptgen - compose script fragments into one ordered script
#[derive(Parser, Debug)]
#[command(name = "scriptgen")]
#[command(version, about, long_about = None)]
#[command(
    after_help = "ENVIRONMENT:\n    SCRIPTGEN_DEBUG=1     Enable debug logging (alternative to --debug)"
)]
pub struct Cli {
    /// Enable debug logging (writes to ~/.scriptgen/scriptgen.log)
    #[arg(short = 'd', long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Generate the script described by a definition file
    Generate {
        /// Path to the TOML definition
        definition: PathBuf,

        /// Annotate imports and task bodies with debug comments
        #[arg(long)]
        debug_comments: bool,

        /// Write the script here instead of standard output
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Validate a definition and print the order tasks would be emitted in
    Check {
        /// Path to the TOML definition
        definition: PathBuf,
    },

    /// Print the dependency graph of a definition
    Graph {
        /// Path to the TOML definition
        definition: PathBuf,

        /// Print nodes and edges as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    scriptgen::log::init_with_debug(cli.debug);
    sglog!("Command: {:?}", cli.command);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            sglog_error!("{}", err);
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    let config = Config::load()?;

    match command {
        Command::Generate {
            definition,
            debug_comments,
            output,
        } => run_generate(&config, &definition, debug_comments, output),
        Command::Check { definition } => run_check(&config, &definition),
        Command::Graph { definition, json } => run_graph(&config, &definition, json),
    }
}

fn load_generator(config: &Config, definition: &Path) -> Result<ScriptGenerator> {
    ScriptDefinition::load(definition)?.into_generator(&Registry::default(), config.validators())
}

fn run_generate(
    config: &Config,
    definition: &Path,
    debug_comments: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let generator = load_generator(config, definition)?;
    let script = generator.code(debug_comments || config.debug_comments)?;

    let target = output.or_else(|| {
        config.output_dir().map(|dir| {
            let stem = definition
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "script".to_string());
            dir.join(format!("{}.py", stem))
        })
    });

    match target {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(&path, format!("{}\n", script))?;
            sglog!("Script written to {}", path.display());
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", script),
    }
    Ok(())
}

fn run_check(config: &Config, definition: &Path) -> Result<()> {
    let generator = load_generator(config, definition)?;
    let order = generator.emission_order()?;

    println!("OK: {} tasks will be emitted", order.len());
    for (i, name) in order.iter().enumerate() {
        println!("  {:>3}. {}", i + 1, name);
    }
    Ok(())
}

fn run_graph(config: &Config, definition: &Path, json: bool) -> Result<()> {
    let generator = load_generator(config, definition)?;
    let plan = generator.plan()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan.graph.summary())?);
    } else {
        for line in plan.graph.adjacency_list() {
            println!("{}", line);
        }
    }
    Ok(())
}

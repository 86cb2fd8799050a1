use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::Result;
use jaif::config::Config;
use jaif::parser::{parse_fragments, parse_index};
use std::fs;

#[derive(Parser)]
#[command(name = "jaif")]
#[command(about = "External annotation index tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lexically analyze an index file
    Lex {
        /// Input .jaif file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Show token locations
        #[arg(short, long)]
        locations: bool,
    },

    /// Parse an index file and list its entries
    Parse {
        /// Input .jaif file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Show the full entry structures
        #[arg(short, long)]
        detailed: bool,
    },

    /// Load index files or directories and report diagnostics
    Check {
        /// Index files or directories scanned for *.jaif
        #[arg(value_name = "PATH", required = true)]
        inputs: Vec<PathBuf>,

        /// Exit with an error when any entry is malformed
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Lex { input, locations } => lex_file(input, *locations)?,
        Commands::Parse { input, detailed } => parse_file(input, *detailed)?,
        Commands::Check { inputs, strict } => check(inputs, *strict)?,
    }

    Ok(())
}

fn lex_file(input: &PathBuf, locations: bool) -> Result<()> {
    let source = fs::read_to_string(input)?;
    let lexer = jaif::parser::Lexer::new(&source);

    for token in lexer.tokenize() {
        if locations {
            println!("{:?} at {}", token.token, token.location);
        } else {
            println!("{:?}: '{}'", token.token, token.lexeme);
        }
    }

    Ok(())
}

fn parse_file(input: &PathBuf, detailed: bool) -> Result<()> {
    let source = fs::read_to_string(input)?;
    let out = parse_index(&source);

    for decl in out.index.declarations() {
        println!("annotation @{} ({} elements)", decl.name, decl.elements.len());
    }
    for entry in out.index.entries() {
        if detailed {
            println!("{:#?}", entry);
        } else {
            println!("{}", entry);
        }
    }
    for diagnostic in &out.diagnostics {
        eprintln!("warning: {}", diagnostic);
    }

    Ok(())
}

fn check(inputs: &[PathBuf], strict: bool) -> Result<()> {
    let config = inputs.iter().fold(Config::from_env()?, |config, path| config.with_index_path(path));
    let texts = config.load_sources()?;
    let out = parse_fragments(texts.iter().map(|(_, text)| text.as_str()));

    for diagnostic in &out.diagnostics {
        eprintln!("warning: {}", diagnostic);
    }
    println!(
        "{} file(s), {} entries, {} annotation declarations, {} diagnostics",
        texts.len(),
        out.index.len(),
        out.index.declarations().len(),
        out.diagnostics.len()
    );

    if strict && out.diagnostics.iter().any(|d| d.is_malformed_entry()) {
        anyhow::bail!("malformed index entries found");
    }
    Ok(())
}

mod workspace;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use sprig_core::{FileUri, Location};
use sprig_ide::{BeanFilter, BeanInfo, CompletionContext, RankedCandidate};
use sprig_index::IndexedSymbol;

use crate::workspace::Workspace;

#[derive(Parser)]
#[command(name = "sprig", version, about = "Spring bean index (beans, symbols, completions)")]
struct Cli {
    /// Config file to use instead of the discovered `sprig.toml`
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Index a source tree and print a summary
    Index(IndexArgs),
    /// List beans, optionally filtered
    Beans(BeansArgs),
    /// Fuzzy search over indexed symbols
    Symbols(SymbolsArgs),
    /// Rank beans for injection at a position
    Complete(CompleteArgs),
    /// Find every use of a bean name or qualifier value
    References(ReferencesArgs),
    /// Print the JSON schema of `sprig.toml`
    ConfigSchema,
}

#[derive(Args)]
struct IndexArgs {
    /// Source tree (or a file within it)
    path: PathBuf,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct BeansArgs {
    /// Source tree (defaults to current directory)
    #[arg(long, default_value = ".")]
    path: PathBuf,
    /// Only beans with this name
    #[arg(long)]
    name: Option<String>,
    /// Only beans assignable to this qualified type
    #[arg(long = "type")]
    type_name: Option<String>,
    /// Only beans of this configured project
    #[arg(long)]
    project: Option<String>,
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SymbolsArgs {
    query: String,
    #[arg(long, default_value = ".")]
    path: PathBuf,
    #[arg(long, default_value_t = 50)]
    limit: usize,
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct CompleteArgs {
    /// Typed prefix of the bean name
    prefix: String,
    #[arg(long, default_value = ".")]
    path: PathBuf,
    /// File the completion is requested in
    #[arg(long, requires = "offset")]
    file: Option<PathBuf>,
    /// Byte offset of the cursor in `--file`
    #[arg(long, requires = "file")]
    offset: Option<usize>,
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ReferencesArgs {
    value: String,
    #[arg(long, default_value = ".")]
    path: PathBuf,
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    let config = cli.config.as_deref();
    match cli.command {
        Command::Index(args) => {
            let ws = Workspace::open(&args.path, config)?;
            let summary = IndexSummary::new(&ws);
            let exit = if summary.failed.is_empty() { 0 } else { 1 };
            print_output(&summary, args.json, print_summary)?;
            Ok(exit)
        }
        Command::Beans(args) => {
            let ws = Workspace::open(&args.path, config)?;
            let filter = BeanFilter {
                name: args.name,
                type_name: args.type_name,
                project: args.project,
            };
            let beans = ws.ide().query_beans(&filter);
            print_output(&beans, args.json, |beans: &Vec<BeanInfo>| {
                for bean in beans {
                    println!("{}  {}", bean.label, display_location(&bean.location));
                }
            })?;
            Ok(0)
        }
        Command::Symbols(args) => {
            let ws = Workspace::open(&args.path, config)?;
            let ide = ws.ide();
            let symbols: Vec<IndexedSymbol> = ide
                .workspace_symbols(&args.query, args.limit)
                .into_iter()
                .cloned()
                .collect();
            print_output(&symbols, args.json, |symbols: &Vec<IndexedSymbol>| {
                for symbol in symbols {
                    println!("{}  {}", symbol.label, display_location(&symbol.location));
                }
            })?;
            Ok(0)
        }
        Command::Complete(args) => {
            let ws = Workspace::open(&args.path, config)?;
            let ide = ws.ide();
            // No context means the cursor is not inside a component: nothing to offer.
            let context = match (&args.file, args.offset) {
                (Some(file), Some(offset)) => {
                    let source = std::fs::read_to_string(file)
                        .with_context(|| format!("failed to read {}", file.display()))?;
                    ide.completion_context_at(&FileUri::from_path(file), &source, offset)
                }
                _ => Some(CompletionContext::default()),
            };
            let candidates = context
                .map(|context| ide.provide_completions(&args.prefix, &context))
                .unwrap_or_default();
            print_output(&candidates, args.json, |candidates: &Vec<RankedCandidate>| {
                for candidate in candidates {
                    println!(
                        "{}\t{}\t{}",
                        candidate.name,
                        candidate.type_name.as_deref().unwrap_or("?"),
                        candidate.score
                    );
                }
            })?;
            Ok(0)
        }
        Command::References(args) => {
            let ws = Workspace::open(&args.path, config)?;
            let locations = ws.ide().provide_references(&args.value);
            print_output(&locations, args.json, |locations: &Vec<Location>| {
                for location in locations {
                    println!("{}", display_location(location));
                }
            })?;
            Ok(0)
        }
        Command::ConfigSchema => {
            let schema = sprig_config::json_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(0)
        }
    }
}

#[derive(Serialize)]
struct IndexSummary {
    root: PathBuf,
    files: usize,
    beans: usize,
    symbols: usize,
    passes: u8,
    deferred: usize,
    deferral_exhausted: Vec<FileUri>,
    failed: Vec<FileUri>,
}

impl IndexSummary {
    fn new(ws: &Workspace) -> Self {
        let ide = ws.ide();
        let view = ide.view();
        Self {
            root: ws.root.clone(),
            files: view.len(),
            beans: view.beans().count(),
            symbols: view.symbols().count(),
            passes: ws.report.passes,
            deferred: ws.report.deferred,
            deferral_exhausted: ws.report.deferral_exhausted.clone(),
            failed: ws.report.failed.clone(),
        }
    }
}

fn print_summary(summary: &IndexSummary) {
    println!("indexed: {}", summary.root.display());
    println!("  files: {}", summary.files);
    println!("  beans: {}", summary.beans);
    println!("  symbols: {}", summary.symbols);
    println!("  passes: {}", summary.passes);
    println!("  deferred: {}", summary.deferred);
    for uri in &summary.deferral_exhausted {
        println!("  gave up waiting on: {uri}");
    }
    for uri in &summary.failed {
        println!("  failed: {uri}");
    }
}

/// `path:line:column`, one-based.
fn display_location(location: &Location) -> String {
    let uri = location.uri.as_str();
    let path = uri.strip_prefix("file://").unwrap_or(uri);
    format!(
        "{}:{}:{}",
        Path::new(path).display(),
        location.range.start.line + 1,
        location.range.start.character + 1
    )
}

fn print_output<T: Serialize>(value: &T, json: bool, text: impl FnOnce(&T)) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(value)?;
        println!("{out}");
    } else {
        text(value);
    }
    Ok(())
}

//! Cellbook CLI - worksheet inspection and editing tool

use anyhow::{bail, Context, Result};
use cellbook::prelude::*;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "cellbook")]
#[command(author, version, about = "Worksheet inspection and editing tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty worksheet file
    New {
        /// Worksheet file to create
        file: PathBuf,
    },

    /// Show the cells of a worksheet
    Info {
        /// Worksheet file
        file: PathBuf,
    },

    /// Insert a cell and save the worksheet
    Add {
        /// Worksheet file
        file: PathBuf,

        /// App type of the new cell (default: note)
        #[arg(short = 't', long = "type")]
        type_name: Option<String>,

        /// Position to insert at (default: append)
        #[arg(short, long)]
        at: Option<usize>,

        /// Initial text of the cell
        #[arg(long)]
        text: Option<String>,
    },

    /// Print the logic context visible at a cell
    Context {
        /// Worksheet file
        file: PathBuf,

        /// Cell locator (e.g. c3)
        locator: CellLocator,
    },

    /// Check every cell and print the verdicts
    Verify {
        /// Worksheet file
        file: PathBuf,

        /// Store the verdicts in the file
        #[arg(short, long)]
        write: bool,
    },

    /// Resolve a repository browser path (e.g. blob/main/a.workbook)
    Route {
        /// Path following the repository name
        url_path: String,

        /// Repository name used to build the link
        #[arg(short, long)]
        repo: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::New { file } => create(&file).await,
        Commands::Info { file } => show_info(&file).await,
        Commands::Add {
            file,
            type_name,
            at,
            text,
        } => add_cell(&file, type_name.as_deref(), at, text).await,
        Commands::Context { file, locator } => show_context(&file, locator).await,
        Commands::Verify { file, write } => verify(&file, write).await,
        Commands::Route { url_path, repo } => route(&url_path, &repo),
    }
}

/// A client serving `file` and the reference naming it
fn open_target(file: &Path) -> Result<(SyncClient<FileSource>, DocumentRef)> {
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Not a file path: '{}'", file.display()))?;
    let root = file.parent().unwrap_or_else(|| Path::new(""));
    Ok((
        SyncClient::new(FileSource::new(root)),
        DocumentRef::file(name),
    ))
}

async fn load(file: &Path) -> Result<(Sheet, SyncClient<FileSource>, DocumentRef)> {
    let (client, target) = open_target(file)?;
    let mut sheet = Sheet::new(AppRegistry::new());
    client
        .load_into(&mut sheet, &target)
        .await
        .with_context(|| format!("Failed to open '{}'", file.display()))?;
    tracing::debug!("Loaded {} cells from {}", sheet.len(), file.display());
    Ok((sheet, client, target))
}

async fn save(sheet: &mut Sheet, client: &SyncClient<FileSource>, target: &DocumentRef) -> Result<()> {
    client
        .save_from(sheet, target)
        .await
        .with_context(|| format!("Failed to save '{}'", target))?;
    Ok(())
}

async fn create(file: &Path) -> Result<()> {
    if file.exists() {
        bail!("'{}' already exists", file.display());
    }
    let (client, target) = open_target(file)?;
    if !target.is_worksheet() {
        eprintln!("Warning: worksheet files usually end in .workbook");
    }

    let mut sheet = Sheet::new(AppRegistry::new());
    save(&mut sheet, &client, &target).await?;
    eprintln!("Created '{}'", file.display());
    Ok(())
}

async fn show_info(file: &Path) -> Result<()> {
    let (mut sheet, _, _) = load(file).await?;

    println!("File: {}", file.display());
    println!("Cells: {}", sheet.len());
    println!(
        "Proven: {}",
        sheet.cells().iter().filter(|c| c.is_proven()).count()
    );

    for cell in sheet.render_all() {
        println!();
        println!("  {} [{}]", cell.locator, cell.type_name);
        if let Some(warning) = &cell.warning {
            println!("    Warning: {}", warning);
        }
        for line in cell.view.to_string().lines() {
            println!("    {}", line);
        }
    }

    Ok(())
}

async fn add_cell(
    file: &Path,
    type_name: Option<&str>,
    at: Option<usize>,
    text: Option<String>,
) -> Result<()> {
    let (mut sheet, client, target) = load(file).await?;

    let at = at.unwrap_or(sheet.len());
    if at > sheet.len() {
        bail!("Position {} is past the end ({} cells)", at, sheet.len());
    }
    let locator = match type_name {
        Some(type_name) => {
            if !sheet.registry().contains(type_name) {
                eprintln!("Warning: no app is registered for type '{}'", type_name);
            }
            sheet.insert_cell(at, type_name)
        }
        None => sheet.insert_default_cell(at),
    };

    if let Some(text) = text {
        sheet.begin_editing(locator)?;
        let events = sheet.handle_input(locator, &AppInput::Text(text))?;
        if events.is_empty() {
            eprintln!("Warning: cell {} did not accept the text", locator);
        }
        sheet.end_editing();
    }

    save(&mut sheet, &client, &target).await?;
    println!("{}", locator);
    Ok(())
}

async fn show_context(file: &Path, locator: CellLocator) -> Result<()> {
    let (mut sheet, _, _) = load(file).await?;
    let context = sheet
        .context(locator)
        .with_context(|| format!("No cell {} in '{}'", locator, file.display()))?;

    for entry in context.entries() {
        let verdict = match &entry.proof {
            Some(proof) if proof.verdict => "proved",
            Some(_) => "refuted",
            None => "-",
        };
        println!(
            "{}\t{}\t{}\t{}",
            entry.locator,
            entry.type_name,
            verdict,
            serde_json::to_string(&entry.payload)?
        );
    }

    Ok(())
}

async fn verify(file: &Path, write: bool) -> Result<()> {
    let (mut sheet, client, target) = load(file).await?;
    let locators: Vec<CellLocator> = sheet.cells().iter().map(|c| c.locator).collect();

    let mut checked = 0;
    let mut failed = 0;
    for locator in locators {
        for event in sheet.handle_input(locator, &AppInput::Verify)? {
            if let AppEvent::Verdict(outcome) = event {
                checked += 1;
                if !outcome.verdict {
                    failed += 1;
                }
                println!(
                    "{}\t{}",
                    locator,
                    if outcome.verdict { "proved" } else { "refuted" }
                );
            }
        }
    }

    eprintln!("Checked {} cells ({} refuted)", checked, failed);
    if write && sheet.is_dirty() {
        save(&mut sheet, &client, &target).await?;
    }
    Ok(())
}

fn route(url_path: &str, repo: &str) -> Result<()> {
    let target = DocumentRef::parse_url_path(url_path)
        .with_context(|| format!("Invalid path '{}'", url_path))?;

    println!("Kind: {:?}", target.kind);
    println!("Branch: {}", target.branch.as_deref().unwrap_or("(default)"));
    println!("Path: {}", target.path);
    println!("Worksheet: {}", target.is_worksheet());
    println!("Link: {}", target.link(repo));
    Ok(())
}

//! unflat CLI - document structure inference tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use unflat::analysis::TocExtractor;
use unflat::{
    load_source, AnalysisOptions, Document, FontStrategy, JsonFormat, RenderOptions,
    StructureAnalyzer,
};

#[derive(Parser)]
#[command(name = "unflat")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Infer chapters, headings and paragraphs from extracted text blocks", long_about = None)]
struct Cli {
    /// Analysis options file (JSON)
    #[arg(long, global = true, value_name = "FILE", env = "UNFLAT_CONFIG")]
    config: Option<PathBuf>,

    /// Heading font strategy (overrides the options file)
    #[arg(long, global = true, value_enum)]
    strategy: Option<StrategyArg>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a block file and print the document model as JSON
    Analyze {
        /// Input block file (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Analyze a block file and render Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input block file (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Include YAML frontmatter
        #[arg(short, long)]
        frontmatter: bool,

        /// Include each chapter's heading outline
        #[arg(long)]
        outline: bool,

        /// Include detected table-of-contents entries
        #[arg(long)]
        toc: bool,

        /// Deepest heading level shown in outlines (1-6)
        #[arg(long, default_value = "6")]
        max_heading: u8,
    },

    /// Write one XHTML file per chapter plus a navigation file
    Chapters {
        /// Input block file (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// List table-of-contents entries and how they match the structure
    Toc {
        /// Input block file (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show document structure statistics
    Info {
        /// Input block file (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Analyze many block files in parallel
    Batch {
        /// Input block files (JSON)
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory for <stem>.json files
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Least frequent font keys are headings
    Frequency,
    /// Largest font-size cluster holds the headings
    Clustering,
}

impl From<StrategyArg> for FontStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Frequency => FontStrategy::frequency(),
            StrategyArg::Clustering => FontStrategy::size_clustering(),
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match build_options(cli.config.as_deref(), cli.strategy) {
        Ok(options) => run(cli.command, options),
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(
    command: Option<Commands>,
    options: AnalysisOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Some(Commands::Analyze {
            input,
            output,
            compact,
        }) => cmd_analyze(&input, output.as_deref(), compact, options),
        Some(Commands::Markdown {
            input,
            output,
            frontmatter,
            outline,
            toc,
            max_heading,
        }) => {
            let render_options = RenderOptions::new()
                .with_frontmatter(frontmatter)
                .with_outline(outline)
                .with_toc(toc)
                .with_max_heading(max_heading);
            cmd_markdown(&input, output.as_deref(), &render_options, options)
        }
        Some(Commands::Chapters { input, output }) => {
            cmd_chapters(&input, output.as_deref(), options)
        }
        Some(Commands::Toc { input }) => cmd_toc(&input, options),
        Some(Commands::Info { input }) => cmd_info(&input, options),
        Some(Commands::Batch {
            inputs,
            output,
            compact,
        }) => cmd_batch(&inputs, &output, compact, options),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: unflat <COMMAND> <FILE>".yellow());
            println!("       unflat --help for more information");
            Ok(())
        }
    }
}

fn build_options(
    config: Option<&Path>,
    strategy: Option<StrategyArg>,
) -> Result<AnalysisOptions, Box<dyn std::error::Error>> {
    let mut options = match config {
        Some(path) => {
            log::debug!("Loading analysis options from {}", path.display());
            let json = fs::read_to_string(path)?;
            serde_json::from_str::<AnalysisOptions>(&json)
                .map_err(|e| format!("Invalid options file {}: {}", path.display(), e))?
        }
        None => AnalysisOptions::default(),
    };

    if let Some(strategy) = strategy {
        options = options.with_font_strategy(strategy.into());
    }

    options.validate()?;
    Ok(options)
}

fn analyze_input(
    input: &Path,
    options: AnalysisOptions,
) -> Result<Document, Box<dyn std::error::Error>> {
    let source = load_source(input)?;
    log::debug!("Loaded {} pages from {}", source.pages.len(), input.display());
    let analyzer = StructureAnalyzer::new(options)?;
    Ok(analyzer.analyze(&source)?)
}

fn write_or_print(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_analyze(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    options: AnalysisOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = analyze_input(input, options)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = unflat::render::to_json(&doc, format)?;
    write_or_print(output, &json)
}

fn cmd_markdown(
    input: &Path,
    output: Option<&Path>,
    render_options: &RenderOptions,
    options: AnalysisOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = analyze_input(input, options)?;
    let markdown = unflat::render::to_markdown(&doc, render_options)?;
    write_or_print(output, &markdown)
}

fn cmd_chapters(
    input: &Path,
    output: Option<&Path>,
    options: AnalysisOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_chapters", stem))
    });
    fs::create_dir_all(&output_dir)?;

    let doc = analyze_input(input, options)?;

    for (index, chapter) in doc.chapters.iter().enumerate() {
        let name = unflat::render::chapter_file_name(index, chapter);
        log::debug!("Writing chapter {} to {}", index + 1, name);
        fs::write(output_dir.join(&name), unflat::render::chapter_html(chapter))?;
    }

    let nav = unflat::render::navigation(&doc);
    fs::write(
        output_dir.join("nav.json"),
        serde_json::to_string_pretty(&nav)?,
    )?;

    println!("\n{}", "Output files:".green().bold());
    for (index, chapter) in doc.chapters.iter().enumerate() {
        println!(
            "  {} {}",
            "├─".dimmed(),
            unflat::render::chapter_file_name(index, chapter)
        );
    }
    println!("  {} nav.json", "└─".dimmed());

    Ok(())
}

fn cmd_toc(input: &Path, options: AnalysisOptions) -> Result<(), Box<dyn std::error::Error>> {
    let doc = analyze_input(input, options)?;

    if doc.toc.is_empty() {
        println!("{}", "No table-of-contents entries detected".yellow());
        return Ok(());
    }

    let coverage = TocExtractor::new().cross_check(&doc);
    for entry in &doc.toc {
        let matched = coverage.matched.iter().any(|m| m == entry);
        let marker = if matched { "✓".green() } else { "·".dimmed() };
        println!("{} {} {}", marker, entry.label, entry.page.to_string().dimmed());
    }

    println!();
    println!(
        "{}: {}/{} ({:.0}%)",
        "Matched".bold(),
        coverage.matched.len(),
        doc.toc.len(),
        coverage.ratio() * 100.0
    );

    Ok(())
}

fn cmd_info(input: &Path, options: AnalysisOptions) -> Result<(), Box<dyn std::error::Error>> {
    let source = load_source(input)?;
    let doc = StructureAnalyzer::new(options)?.analyze(&source)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Title".bold(), doc.title);
    println!("{}: {}", "Author".bold(), doc.author);
    println!("{}: {}", "Pages".bold(), source.pages.len());
    println!("{}: {}", "Blocks".bold(), source.block_count());

    println!();
    println!("{}", "Structure".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let text = doc.plain_text();
    let words: usize = text.split_whitespace().count();
    let paragraphs: usize = doc.chapters.iter().map(|c| c.content.len()).sum();

    println!("{}: {}", "Chapters".bold(), doc.chapter_count());
    println!("{}: {}", "Headings".bold(), doc.heading_count());
    println!("{}: {}", "Paragraphs".bold(), paragraphs);
    println!("{}: {}", "Words".bold(), words);
    println!("{}: {}", "TOC entries".bold(), doc.toc.len());

    if doc.diagnostics.is_empty() {
        println!("{}: {}", "Diagnostics".bold(), "none".green());
    } else {
        println!(
            "{}: {}",
            "Diagnostics".bold(),
            doc.diagnostics.len().to_string().yellow()
        );
        for diagnostic in &doc.diagnostics {
            println!("  {} {}", "!".yellow(), diagnostic);
        }
    }

    Ok(())
}

fn cmd_batch(
    inputs: &[PathBuf],
    output_dir: &Path,
    compact: bool,
    options: AnalysisOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output_dir)?;

    let analyzer = StructureAnalyzer::new(options)?;
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let failures: Vec<(PathBuf, String)> = inputs
        .par_iter()
        .filter_map(|input| {
            let result = load_source(input)
                .and_then(|source| analyzer.analyze(&source))
                .and_then(|doc| unflat::render::to_json(&doc, format))
                .and_then(|json| {
                    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
                    let path = output_dir.join(format!("{}.json", stem));
                    fs::write(path, json).map_err(unflat::Error::from)
                });
            pb.inc(1);
            result.err().map(|e| {
                log::warn!("Failed to analyze {}: {}", input.display(), e);
                (input.clone(), e.to_string())
            })
        })
        .collect();

    pb.finish_with_message("Done!");

    let succeeded = inputs.len() - failures.len();
    println!(
        "\n{} {} of {} documents analyzed",
        "Done!".green().bold(),
        succeeded,
        inputs.len()
    );
    for (input, error) in &failures {
        println!("  {} {}: {}", "✗".red(), input.display(), error);
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(format!("{} documents failed", failures.len()).into())
    }
}

fn cmd_version() {
    println!("{} {}", "unflat".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document structure inference tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/unflat".dimmed());
    println!("License: MIT");
}

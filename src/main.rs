//! # PDF Quiz CLI (`pdf-quiz`)
//!
//! Prompts for a PDF path, indexes the document, generates questions with
//! the configured model and runs the quiz on the terminal.
//!
//! ## Usage
//!
//! ```bash
//! pdf-quiz                              # built-in defaults
//! pdf-quiz --config ./pdf-quiz.toml     # override models, paths, sizes
//! ```
//!
//! The quiz dialogue goes to stdout. Logs go to stderr and are controlled
//! with `RUST_LOG` (default `warn`).

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pdf_quiz::chunk::RecursiveSplitter;
use pdf_quiz::config;
use pdf_quiz::embedding::OllamaEmbedder;
use pdf_quiz::extract;
use pdf_quiz::index::{IndexOrigin, VectorIndex};
use pdf_quiz::llm::OllamaLlm;
use pdf_quiz::questions::{build_excerpt, generate_questions};
use pdf_quiz::quiz::QuizSession;

/// Generate a quiz from a PDF and grade your answers with a local model.
#[derive(Parser)]
#[command(name = "pdf-quiz", version)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Optional: when the file does not exist the built-in defaults are used.
    #[arg(long, default_value = "./pdf-quiz.toml")]
    config: PathBuf,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let cfg = config::load_or_default(&cli.config)?;

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    write!(out, "Enter PDF path: ")?;
    out.flush()?;
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read PDF path")?;
    let pdf_path = PathBuf::from(line.trim());

    let pages = extract::load_pdf(&pdf_path)?;
    let splitter = RecursiveSplitter::from_config(&cfg.chunking)?;
    let chunks = splitter.split_pages(&pages);

    let embedder = OllamaEmbedder::new(&cfg.ollama)?;
    if cfg.index.path.exists() {
        writeln!(out, "Loading existing index from {}...", cfg.index.path.display())?;
    } else {
        writeln!(out, "Creating index at {}...", cfg.index.path.display())?;
    }
    out.flush()?;
    let (index, origin) = VectorIndex::load_or_create(&chunks, &embedder, &cfg.index).await?;
    match origin {
        IndexOrigin::Loaded => writeln!(
            out,
            "Loaded existing index from {} ({} chunks).",
            cfg.index.path.display(),
            index.len()
        )?,
        IndexOrigin::Created => writeln!(
            out,
            "Created index at {} ({} chunks).",
            cfg.index.path.display(),
            index.len()
        )?,
    }

    let llm = OllamaLlm::new(&cfg.ollama)?;
    let excerpt = build_excerpt(&chunks, cfg.quiz.excerpt_chars);

    writeln!(out, "Generating quiz questions...\n")?;
    out.flush()?;
    let questions = generate_questions(&llm, &excerpt, cfg.quiz.num_questions).await?;

    let Some(session) = QuizSession::new(&llm, questions, &mut rand::thread_rng()) else {
        writeln!(out, "No questions generated. Exiting.")?;
        return Ok(());
    };

    writeln!(out, "Quiz time! Answer briefly. Type 'end' to quit anytime.\n")?;
    session.run(input, &mut out).await?;

    Ok(())
}

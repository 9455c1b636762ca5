//! recordlink CLI - fuzzy record-linkage matching engine

mod cli;
mod input;
mod labeler;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use recordlink_core::{HeuristicLinker, Importance, PlanFile};
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use cli::Args;
use labeler::TerminalLabeler;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("recordlink: error: {e:#}");
            ExitCode::from(1)
        }
    }
}

/// A [`recordlink_core::Progress`] that prints each stage's label to
/// stderr once, ignoring individual ticks (milestone counts are coarse
/// enough that per-tick output would just be noise on a terminal).
struct StderrProgress {
    quiet: bool,
}

impl recordlink_core::Progress for StderrProgress {
    fn begin(&mut self, label: &str, _total: usize) {
        if !self.quiet {
            eprintln!("recordlink: running {label}...");
        }
    }
    fn tick(&mut self) {}
}

fn stderr_alert(quiet: bool) -> impl FnMut(&str, Importance) {
    move |message: &str, importance: Importance| {
        if quiet {
            return;
        }
        let prefix = match importance {
            Importance::Info => "info",
            Importance::Warning => "warning",
        };
        eprintln!("recordlink: {prefix}: {message}");
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let left = input::read_table(&args.left)?;
    let right = input::read_table(&args.right)?;

    let plan_text = fs::read_to_string(&args.plan)
        .with_context(|| format!("failed to read plan file {}", args.plan.display()))?;
    let plan: PlanFile = serde_json::from_str(&plan_text)
        .with_context(|| format!("{}: invalid matching plan", args.plan.display()))?;

    let mut progress = StderrProgress { quiet: args.quiet };
    let mut alert = stderr_alert(args.quiet);
    let mut labeler = TerminalLabeler::stdio();
    let mut linker = HeuristicLinker::new();

    let batch = recordlink_core::run(left, right, &plan, &mut progress, &mut alert, &mut labeler, &mut linker)
        .context("matching failed")?;

    let rendered = output::render(&batch, args.format, args.compact)?;
    write_output(&args.output, &rendered)
}

fn write_output(path: &Option<std::path::PathBuf>, content: &[u8]) -> Result<()> {
    if let Some(path) = path {
        fs::write(path, content).with_context(|| format!("failed to write to {}", path.display()))
    } else {
        io::stdout().write_all(content).context("failed to write to stdout")
    }
}

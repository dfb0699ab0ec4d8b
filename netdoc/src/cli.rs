//!
//! This module implements the CLI for netdoc: command parsing, orchestration of the core
//! pipeline, and writing reports to disk.
//!
//! All analysis (normalising, extraction, audit, topology, rendering) lives in
//! [`netdoc_core`]. This module is glue: read files, call the pipeline, fetch narrative
//! when configured, write or print the results.
//!
//! ## How To Use
//! - For command-line users: run the `netdoc` binary with `--help`.
//! - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
use crate::load_config::{load_config, CliConfig};
use crate::narrative::ChatNarrator;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use netdoc_core::narrative::resolve_narrative;
use netdoc_core::normalize::bundle;
use netdoc_core::pipeline::{analyze, Analysis};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::Instrument;

/// CLI for netdoc: document and audit network devices from their configuration dumps.
#[derive(Parser)]
#[clap(
    name = "netdoc",
    version,
    about = "Analyse router/switch configuration dumps and produce audit and topology reports"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write full reports in every configured format
    Report {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Configuration dump files; several files are analysed as one device
        #[clap(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the audit report as JSON
    Audit {
        #[clap(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the neighbor topology as Mermaid source
    Topology {
        #[clap(required = true)]
        files: Vec<PathBuf>,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Report { .. } => "report",
            Commands::Audit { .. } => "audit",
            Commands::Topology { .. } => "topology",
        }
    }
}

/// Read every file and bundle them under `# FILE:` markers.
fn read_upload(files: &[PathBuf]) -> Result<Vec<u8>> {
    let mut named = Vec::with_capacity(files.len());
    for path in files {
        let content =
            fs::read(path).with_context(|| format!("Failed to read configuration file {path:?}"))?;
        tracing::info!(file = ?path, bytes = content.len(), "Read configuration file");
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        named.push((name, content));
    }
    Ok(bundle(named))
}

/// File stem for a device: hostname reduced to filename-safe characters.
fn report_stem(analysis: &Analysis) -> String {
    let stem: String = analysis
        .model
        .hostname
        .as_deref()
        .unwrap_or("device")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("{stem}-report")
}

/// Write `bytes` to `path` via a temporary file in the same directory.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {dir:?}"))?;
    tmp.write_all(bytes)
        .with_context(|| format!("Failed to write report {path:?}"))?;
    tmp.persist(path)
        .with_context(|| format!("Failed to move report into place at {path:?}"))?;
    Ok(())
}

async fn report(config: CliConfig, files: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let raw = read_upload(files)?;
    let analysis = analyze(&raw);

    let narrative = if config.narrative.enabled {
        let narrator = ChatNarrator::new(&config.narrative)?;
        Some(resolve_narrative(&narrator, &analysis.model).await)
    } else {
        None
    };

    fs::create_dir_all(&config.output.dir)
        .with_context(|| format!("Failed to create output directory {:?}", config.output.dir))?;

    let stem = report_stem(&analysis);
    let mut written = Vec::with_capacity(config.output.formats.len());
    for format in &config.output.formats {
        let bytes = analysis
            .render(*format, &config.report, narrative.as_ref())
            .with_context(|| format!("Failed to render {format} report"))?;
        let path = config.output.dir.join(format!("{stem}.{}", format.extension()));
        write_atomically(&path, &bytes)?;
        tracing::info!(%format, path = ?path, bytes = bytes.len(), "Report written");
        written.push(path);
    }
    Ok(written)
}

async fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Report { config, files } => {
            let config = load_config(config)?;
            let written = report(config, &files).await?;
            for path in &written {
                println!("Report written: {}", path.display());
            }
            Ok(())
        }
        Commands::Audit { files } => {
            let analysis = analyze(&read_upload(&files)?);
            let json = serde_json::to_string_pretty(&analysis.audit)
                .context("Failed to serialise audit report")?;
            println!("{json}");
            Ok(())
        }
        Commands::Topology { files } => {
            let analysis = analyze(&read_upload(&files)?);
            print!("{}", analysis.diagram());
            Ok(())
        }
    }
}

/// Async CLI entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    let run_id = uuid::Uuid::new_v4();
    let command = cli.command.name();
    let span = tracing::info_span!("netdoc", %run_id, command);

    let result = execute(cli.command).instrument(span).await;
    match &result {
        Ok(()) => tracing::info!(%run_id, command, "Command complete"),
        Err(e) => tracing::error!(%run_id, command, error = %e, "Command failed"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_is_filename_safe() {
        let analysis = analyze(b"hostname core/sw 01\n");
        assert_eq!(report_stem(&analysis), "core_sw-report");

        let unnamed = analyze(b"");
        assert_eq!(report_stem(&unnamed), "device-report");
    }
}

//! xlreport CLI - build reports from JSON and parse them back

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use xlreport::{ReportConfig, ReportService};

#[derive(Parser)]
#[command(name = "xlreport")]
#[command(
    author,
    version,
    about = "Build spreadsheet reports from JSON documents and extract them back"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an XLSX report from a JSON document
    Build {
        /// Input JSON document
        input: PathBuf,

        /// Output XLSX file
        #[arg(short, long, default_value = "reporte_generado.xlsx")]
        output: PathBuf,

        /// JSON configuration file (missing fields take defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Extract a JSON document from an XLSX file
    Parse {
        /// Input XLSX file
        input: PathBuf,

        /// Output JSON file ("-" or absent: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            output,
            config,
        } => build(&input, &output, config.as_deref()),
        Commands::Parse {
            input,
            output,
            pretty,
        } => parse(&input, output.as_deref(), pretty),
    }
}

fn load_config(path: Option<&Path>) -> Result<ReportConfig> {
    let Some(path) = path else {
        return Ok(ReportConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config '{}'", path.display()))?;
    ReportConfig::from_json(&text)
        .with_context(|| format!("Invalid config '{}'", path.display()))
}

fn build(input: &Path, output: &Path, config: Option<&Path>) -> Result<()> {
    let service = ReportService::new(load_config(config)?);

    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read '{}'", input.display()))?;
    let report = service
        .build_json(&text)
        .with_context(|| format!("Failed to build report from '{}'", input.display()))?;

    for warning in &report.warnings {
        eprintln!("Warning: {warning}");
    }

    std::fs::write(output, &report.bytes)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;
    eprintln!(
        "Wrote {} bytes to '{}' ({} skipped)",
        report.bytes.len(),
        output.display(),
        report.warnings.len()
    );

    Ok(())
}

fn parse(input: &Path, output: Option<&Path>, pretty: bool) -> Result<()> {
    let service = ReportService::new(ReportConfig::default());

    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to open '{}'", input.display()))?;
    let document = service
        .parse(&bytes)
        .with_context(|| format!("Failed to parse '{}'", input.display()))?;

    let mut json = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    json.push('\n');

    match output.filter(|p| *p != Path::new("-")) {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            eprintln!("Wrote {} sheets to '{}'", document.sheets.len(), path.display());
        }
        None => io::stdout()
            .write_all(json.as_bytes())
            .context("Failed to write to stdout")?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn test_build_then_parse_files() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("doc.json");
        let config = dir.path().join("config.json");
        let xlsx = dir.path().join("out.xlsx");
        let out = dir.path().join("out.json");

        std::fs::write(
            &doc,
            json!({
                "analysisData": [[{"address": "A1", "value": "Total"}, {"address": "B1", "value": 42}]],
                "charts": [{"type": "radar", "data_range": "B1:B1"}]
            })
            .to_string(),
        )
        .unwrap();
        std::fs::write(&config, r#"{"sheet_title": "Resumen"}"#).unwrap();

        build(&doc, &xlsx, Some(&config)).unwrap();
        parse(&xlsx, Some(&out), true).unwrap();

        let parsed: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(parsed["sheets"][0]["name"], "Resumen");
        assert_eq!(parsed["sheets"][0]["data"][0][1]["value"], 42);
    }

    #[test]
    fn test_missing_input_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = build(&missing, &dir.path().join("x.xlsx"), None).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.json");
        std::fs::write(&config, r#"{"max_column_width": "wide"}"#).unwrap();
        assert!(load_config(Some(&config)).is_err());
        assert_eq!(load_config(None).unwrap(), ReportConfig::default());
    }
}

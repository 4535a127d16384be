use clap::Parser;
use std::path::PathBuf;

use crate::models::DuplicatePolicy;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Academic results report generator
#[derive(Parser, Debug, Clone)]
#[command(
    name = "grades-report",
    about = "Aggregate per-subject grade spreadsheets into a LaTeX results report",
    version
)]
pub struct Settings {
    /// Directory holding one sub-folder per period (1Q1, 1Q2, ...)
    #[arg(long, default_value = "excels")]
    pub input_dir: PathBuf,

    /// Output directory; emptied at the start of every run
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Configuration file (JSON). Defaults to ~/.grades-report/config.json when present
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report layout
    #[arg(long, default_value = "bars", value_parser = ["bars", "sectors", "both"])]
    pub style: String,

    /// Handling of two files for the same subject, group and period
    #[arg(long, default_value = "overwrite", value_parser = ["overwrite", "fail"])]
    pub on_duplicate: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`load`](Self::load) but from an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    fn resolve(mut settings: Settings) -> Settings {
        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        match self.on_duplicate.as_str() {
            "fail" => DuplicatePolicy::Fail,
            _ => DuplicatePolicy::Overwrite,
        }
    }

    /// Whether the compact stacked-bar document is requested.
    pub fn wants_bars(&self) -> bool {
        matches!(self.style.as_str(), "bars" | "both")
    }

    /// Whether the detailed per-file document is requested.
    pub fn wants_sectors(&self) -> bool {
        matches!(self.style.as_str(), "sectors" | "both")
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

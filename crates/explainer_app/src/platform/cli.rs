use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use explainer_core::{GenerationOptions, PdfSelection};
use explainer_engine::{BackendSettings, SettingsError, DEFAULT_BASE_URL};
use explainer_logging::explainer_warn;

use super::logging::LogDestination;

/// Turn a PDF into an explainer video and follow the job until it finishes.
#[derive(Debug, Parser)]
#[command(name = "explainer", version)]
pub struct Cli {
    /// PDF research paper or document to explain.
    #[arg(long)]
    pub pdf: Option<PathBuf>,

    /// Credential forwarded to the generator.
    #[arg(long, env = "EXPLAINER_API_KEY", hide_env_values = true, default_value = "")]
    pub api_key: String,

    /// Base URL of the generation backend.
    #[arg(long, env = "EXPLAINER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Delay between status polls, in milliseconds.
    #[arg(long, env = "EXPLAINER_POLL_INTERVAL_MS", default_value_t = 4000)]
    pub poll_interval_ms: u64,

    /// Ask the generator to use retrieval-augmented generation.
    #[arg(long)]
    pub use_rag: bool,

    /// Model used for the main generation.
    #[arg(long)]
    pub model: Option<String>,

    /// Model used for helper steps.
    #[arg(long)]
    pub helper_model: Option<String>,

    /// Where diagnostic logs go.
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    /// Include debug-level diagnostics.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn backend_settings(&self) -> Result<BackendSettings, SettingsError> {
        BackendSettings::with_base_url(&self.base_url)?
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
    }

    pub fn options(&self) -> GenerationOptions {
        GenerationOptions {
            use_rag: self.use_rag,
            model: self.model.clone(),
            helper_model: self.helper_model.clone(),
        }
    }

    /// The selected PDF, or `None` when no usable file was given. A missing
    /// selection is reported by the submission itself.
    pub fn pdf_selection(&self) -> Option<PdfSelection> {
        let path = self.pdf.as_ref()?;
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => Some(PdfSelection {
                path: path.clone(),
                file_name: path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string()),
                size_bytes: meta.len(),
            }),
            Ok(_) => {
                explainer_warn!("{} is not a file", path.display());
                None
            }
            Err(err) => {
                explainer_warn!("Cannot open {}: {}", path.display(), err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_the_backend_contract() {
        let cli = Cli::try_parse_from(["explainer", "--api-key", "k"]).unwrap();
        let settings = cli.backend_settings().unwrap();

        assert_eq!(settings.base_url.as_str(), "http://127.0.0.1:8000/");
        assert_eq!(settings.poll_interval, Duration::from_millis(4000));
        assert_eq!(cli.log, LogDestination::File);
        assert_eq!(cli.options(), GenerationOptions::default());
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let cli = Cli::try_parse_from(["explainer", "--poll-interval-ms", "0"]).unwrap();
        assert!(cli.backend_settings().is_err());
    }

    #[test]
    fn pdf_selection_reads_name_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.pdf");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(&[0u8; 2048])
            .unwrap();

        let cli = Cli::try_parse_from([
            "explainer".into(),
            "--pdf".into(),
            path.clone().into_os_string(),
        ])
        .unwrap();

        assert_eq!(
            cli.pdf_selection(),
            Some(PdfSelection {
                path,
                file_name: "paper.pdf".to_string(),
                size_bytes: 2048,
            })
        );
    }

    #[test]
    fn missing_pdf_yields_no_selection() {
        let cli = Cli::try_parse_from(["explainer", "--pdf", "/nope/paper.pdf"]).unwrap();
        assert_eq!(cli.pdf_selection(), None);
    }
}

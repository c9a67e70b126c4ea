use std::io::{self, Write};

use explainer_core::{AppViewModel, Preview, Status};
use url::Url;

/// Prints view model changes as an append-only terminal report.
pub struct TerminalRenderer<W: Write> {
    out: W,
    base_url: Url,
    started: bool,
    last_status: Option<(Status, String)>,
    last_seq: u64,
    last_artifacts: Vec<String>,
    preview_shown: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, base_url: Url) -> Self {
        Self {
            out,
            base_url,
            started: false,
            last_status: None,
            last_seq: 0,
            last_artifacts: Vec::new(),
            preview_shown: false,
        }
    }

    pub fn render(&mut self, view: &AppViewModel) -> io::Result<()> {
        if !self.started {
            writeln!(self.out, "{}", view.pdf_summary)?;
            self.started = true;
        }

        let status = (view.status, view.status_message.clone());
        if self.last_status.as_ref() != Some(&status) {
            writeln!(self.out, "[{}] {}", view.status_label, view.status_message)?;
            if !view.status.is_terminal() {
                self.preview_shown = false;
            }
            self.last_status = Some(status);
        }

        for row in view.logs.iter().filter(|row| row.seq > self.last_seq) {
            writeln!(self.out, "    {}", row.text)?;
        }
        if let Some(last) = view.logs.last() {
            self.last_seq = self.last_seq.max(last.seq);
        }

        if view.artifacts != self.last_artifacts && !view.artifacts.is_empty() {
            writeln!(
                self.out,
                "Latest outputs ({} total):",
                view.artifact_count
            )?;
            for artifact in &view.artifacts {
                writeln!(self.out, "  - {artifact}")?;
            }
        }
        self.last_artifacts.clone_from(&view.artifacts);

        if view.status.is_terminal() && !self.preview_shown {
            match &view.preview {
                Preview::Video { url } => {
                    writeln!(self.out, "Video: {}", resolve(&self.base_url, url))?
                }
                Preview::Message(message) => writeln!(self.out, "{message}")?,
            }
            self.preview_shown = true;
        }

        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Backend video URLs are usually server-relative; make them clickable.
fn resolve(base_url: &Url, url: &str) -> String {
    base_url
        .join(url)
        .map(String::from)
        .unwrap_or_else(|_| url.to_string())
}

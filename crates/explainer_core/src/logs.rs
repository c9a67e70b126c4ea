use std::collections::VecDeque;

/// Upper bound on the combined log view. Older lines are dropped for good.
pub const MAX_LOG_LINES: usize = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSource {
    /// Events raised by this client.
    Client,
    /// Script output reported by the backend.
    Generator,
}

impl LogSource {
    pub fn tag(self) -> &'static str {
        match self {
            LogSource::Client => "client",
            LogSource::Generator => "generator",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// Monotonic across both streams and across resets.
    pub seq: u64,
    pub source: LogSource,
    pub timestamp: String,
    pub text: String,
}

impl LogLine {
    /// Display form: client lines carry their time, generator lines their tag.
    pub fn render(&self) -> String {
        match self.source {
            LogSource::Client => format!("[{}] {}", self.timestamp, self.text),
            LogSource::Generator => format!("[{}] {}", self.source.tag(), self.text),
        }
    }
}

/// Result of merging a cumulative generator log snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Unchanged,
    Appended(usize),
    /// The snapshot was shorter than what was already seen, or its seen part
    /// changed. Lines already recorded are never rewritten.
    Diverged { appended: usize },
}

impl MergeOutcome {
    pub fn appended(self) -> usize {
        match self {
            MergeOutcome::Unchanged => 0,
            MergeOutcome::Appended(count) | MergeOutcome::Diverged { appended: count } => count,
        }
    }
}

/// Merges client events and backend script output into one bounded view.
///
/// Generator logs arrive as cumulative snapshots; only the suffix beyond the
/// previously seen length is appended. This relies on the backend keeping its
/// log array append-only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogAggregator {
    client: VecDeque<LogLine>,
    generator: VecDeque<LogLine>,
    generator_seen: usize,
    next_seq: u64,
}

impl LogAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_client(&mut self, timestamp: impl Into<String>, text: impl Into<String>) {
        let line = self.next_line(LogSource::Client, timestamp.into(), text.into());
        push_bounded(&mut self.client, line);
    }

    pub fn merge_generator(&mut self, snapshot: &[String], timestamp: &str) -> MergeOutcome {
        if snapshot.len() < self.generator_seen {
            return MergeOutcome::Diverged { appended: 0 };
        }

        // The newest retained line must still sit at its old index.
        let diverged = self
            .generator
            .back()
            .is_some_and(|last| snapshot[self.generator_seen - 1] != last.text);

        let fresh = &snapshot[self.generator_seen..];
        for text in fresh {
            let line = self.next_line(LogSource::Generator, timestamp.to_string(), text.clone());
            push_bounded(&mut self.generator, line);
        }
        self.generator_seen = snapshot.len();

        match (diverged, fresh.len()) {
            (true, appended) => MergeOutcome::Diverged { appended },
            (false, 0) => MergeOutcome::Unchanged,
            (false, appended) => MergeOutcome::Appended(appended),
        }
    }

    /// Client lines followed by generator lines, limited to the most recent
    /// [`MAX_LOG_LINES`].
    pub fn combined(&self) -> Vec<&LogLine> {
        let total = self.client.len() + self.generator.len();
        self.client
            .iter()
            .chain(self.generator.iter())
            .skip(total.saturating_sub(MAX_LOG_LINES))
            .collect()
    }

    pub fn client_lines(&self) -> impl Iterator<Item = &LogLine> {
        self.client.iter()
    }

    pub fn generator_lines(&self) -> impl Iterator<Item = &LogLine> {
        self.generator.iter()
    }

    /// Number of generator lines consumed so far, including trimmed ones.
    pub fn generator_seen(&self) -> usize {
        self.generator_seen
    }

    pub fn is_empty(&self) -> bool {
        self.client.is_empty() && self.generator.is_empty()
    }

    /// Drops all lines. Sequence numbers keep increasing.
    pub fn clear(&mut self) {
        self.client.clear();
        self.generator.clear();
        self.generator_seen = 0;
    }

    fn next_line(&mut self, source: LogSource, timestamp: String, text: String) -> LogLine {
        self.next_seq += 1;
        LogLine {
            seq: self.next_seq,
            source,
            timestamp,
            text,
        }
    }
}

// Each stream keeps at most MAX_LOG_LINES, which is all the combined view
// can ever show from it.
fn push_bounded(lines: &mut VecDeque<LogLine>, line: LogLine) {
    if lines.len() == MAX_LOG_LINES {
        lines.pop_front();
    }
    lines.push_back(line);
}

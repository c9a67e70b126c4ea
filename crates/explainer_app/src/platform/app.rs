use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use explainer_core::{update, AppState, Msg, Status};
use explainer_logging::{explainer_error, explainer_info};

use super::cli::Cli;
use super::effects::EffectRunner;
use super::logging;
use super::render::TerminalRenderer;

/// How long to wait for an engine event before ticking.
const TICK: Duration = Duration::from_millis(250);

pub fn run_app() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::initialize(cli.log, cli.verbose);

    let settings = cli.backend_settings()?;
    explainer_info!(
        "Starting explainer base_url={} poll_interval_ms={}",
        settings.base_url,
        settings.poll_interval.as_millis()
    );
    let renderer = TerminalRenderer::new(io::stdout().lock(), settings.base_url.clone());
    let runner = EffectRunner::new(settings).context("could not create HTTP client")?;

    let mut session = Session::new(AppState::new(), runner, renderer);
    let status = session.run(vec![
        Msg::ApiKeyChanged(cli.api_key.clone()),
        Msg::PdfSelected(cli.pdf_selection()),
        Msg::OptionsChanged(cli.options()),
        Msg::SubmitClicked,
    ])?;

    Ok(match status {
        Status::Done => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

/// One client session: owns the state and serializes every mutation through
/// `update`.
struct Session<W: Write> {
    state: AppState,
    runner: EffectRunner,
    renderer: TerminalRenderer<W>,
}

impl<W: Write> Session<W> {
    fn new(state: AppState, runner: EffectRunner, renderer: TerminalRenderer<W>) -> Self {
        Self {
            state,
            runner,
            renderer,
        }
    }

    /// Dispatches `initial`, then feeds engine events until nothing is in
    /// flight. Returns the final status.
    fn run(&mut self, initial: Vec<Msg>) -> anyhow::Result<Status> {
        for msg in initial {
            self.dispatch(msg)?;
        }
        while self.state.is_busy() {
            let msg = self
                .runner
                .next_msg(TICK)
                .context("engine stopped while a job was in flight")?
                .unwrap_or(Msg::Tick);
            self.dispatch(msg)?;
        }
        self.dispatch(Msg::Teardown)?;

        if self.state.status() == Status::Error {
            explainer_error!("Job ended in error: {}", self.state.status_message());
        }
        Ok(self.state.status())
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.enqueue(effects);

        let was_dirty = state.consume_dirty();
        let view = was_dirty.then(|| state.view());
        self.state = state;

        match view {
            Some(view) => self.renderer.render(&view),
            None => Ok(()),
        }
    }

    #[cfg(test)]
    fn into_renderer(self) -> TerminalRenderer<W> {
        self.renderer
    }
}

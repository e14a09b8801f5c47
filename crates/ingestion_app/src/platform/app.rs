use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use ingestion_core::{update, AppState, Msg, SelectionHolder};
use ingestion_logging::{ingest_debug, ingest_info};
use log::LevelFilter;

use super::config::{self, UploadSettings};
use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::ui::commands::{self, ShellCommand, HELP};
use super::ui::render;

/// How often the shell drains engine events while waiting for input.
const TICK: Duration = Duration::from_millis(75);

pub fn run_app() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("resolve working directory")?;
    logging::initialize(LogDestination::from_env(), LevelFilter::Info, &cwd);

    let settings = config::load_settings(&cwd);
    let effects = EffectRunner::new().context("start job engine")?;
    let mut shell = Shell::new(settings, effects, io::stdout());
    ingest_info!("Ingestion shell initialized.");

    let (cmd_tx, cmd_rx) = mpsc::channel::<ShellCommand>();
    // Input thread; the shell thread itself never blocks on stdin or the worker.
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if let Some(command) = commands::parse_line(&line) {
                if cmd_tx.send(command).is_err() {
                    break;
                }
            }
        }
    });

    shell.say(HELP)?;
    shell.render()?;
    loop {
        match cmd_rx.recv_timeout(TICK) {
            Ok(command) => {
                if shell.handle_command(command)? == Flow::Quit {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => shell.dispatch(Msg::Tick)?,
            Err(RecvTimeoutError::Disconnected) => break,
        }
        shell.process_pending_messages()?;
    }

    shell.shutdown();
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// The interactive side: owns state, selection and output. Engine events
/// and selection changes reach it as messages on its own thread.
struct Shell<W: Write> {
    state: AppState,
    selection: SelectionHolder,
    effects: EffectRunner,
    msg_tx: mpsc::Sender<Msg>,
    msg_rx: mpsc::Receiver<Msg>,
    out: W,
}

impl<W: Write> Shell<W> {
    fn new(settings: UploadSettings, effects: EffectRunner, out: W) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        let mut selection = SelectionHolder::new();
        let observer_tx = msg_tx.clone();
        selection.subscribe(move |change| {
            let _ = observer_tx.send(Msg::SelectionChanged(change.current.clone()));
        });

        Self {
            state: settings.initial_state(),
            selection,
            effects,
            msg_tx,
            msg_rx,
            out,
        }
    }

    fn handle_command(&mut self, command: ShellCommand) -> io::Result<Flow> {
        match command {
            ShellCommand::Drop(payload) => {
                if !self.selection.accept_drop(payload) {
                    self.say("Drop ignored: only files can be dropped here.")?;
                }
            }
            ShellCommand::Start => self.send(Msg::StartClicked),
            ShellCommand::Cancel => self.send(Msg::CancelClicked),
            ShellCommand::Status => self.render()?,
            ShellCommand::Help => self.say(HELP)?,
            ShellCommand::Quit => return Ok(Flow::Quit),
            ShellCommand::Unknown(text) => {
                ingest_debug!("Unknown command {:?}", text);
                self.say(&format!("Unknown command: {text}"))?;
            }
        }
        Ok(Flow::Continue)
    }

    fn send(&self, msg: Msg) {
        let _ = self.msg_tx.send(msg);
    }

    fn process_pending_messages(&mut self) -> io::Result<()> {
        let mut inbox = self.effects.poll();
        while let Ok(msg) = self.msg_rx.try_recv() {
            inbox.push(msg);
        }
        for msg in inbox {
            self.dispatch(msg)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        let feedback = self.effects.run(effects);
        for notice in &feedback.notices {
            self.say(notice)?;
        }
        for msg in feedback.msgs {
            self.dispatch(msg)?;
        }

        if self.state.consume_dirty() {
            self.render()?;
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        let line = render::render(&self.state.view());
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    fn shutdown(&self) {
        self.effects.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Instant;

    use ingestion_core::{DropPayload, JobPhase};

    use super::*;

    fn shell(total_steps: u32, step_delay_ms: u64) -> Shell<Vec<u8>> {
        let settings = UploadSettings {
            total_steps,
            step_delay_ms,
        };
        Shell::new(settings, EffectRunner::new().unwrap(), Vec::new())
    }

    fn pump_until(shell: &mut Shell<Vec<u8>>, done: impl Fn(JobPhase) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while !done(shell.state.phase()) {
            assert!(Instant::now() < deadline, "shell never reached the phase");
            shell.process_pending_messages().unwrap();
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn output(shell: &Shell<Vec<u8>>) -> String {
        String::from_utf8(shell.out.clone()).unwrap()
    }

    #[test]
    fn drop_updates_the_displayed_selection() {
        let mut shell = shell(3, 0);
        shell
            .handle_command(ShellCommand::Drop(DropPayload::FileList(vec![
                PathBuf::from("/data/first.csv"),
                PathBuf::from("/data/second.csv"),
            ])))
            .unwrap();
        shell.process_pending_messages().unwrap();

        assert_eq!(
            shell.state.view().selected_path,
            Some(PathBuf::from("/data/first.csv"))
        );
        assert!(output(&shell).contains("Selected: /data/first.csv"));
    }

    #[test]
    fn unsupported_drop_is_reported_and_ignored() {
        let mut shell = shell(3, 0);
        shell
            .handle_command(ShellCommand::Drop(DropPayload::Unsupported {
                format: "text/plain".to_string(),
            }))
            .unwrap();
        shell.process_pending_messages().unwrap();

        assert_eq!(shell.state.view().selected_path, None);
        assert!(output(&shell).contains("Drop ignored"));
    }

    #[test]
    fn start_runs_to_completion_and_shows_notice() {
        let mut shell = shell(3, 0);
        shell.handle_command(ShellCommand::Start).unwrap();
        pump_until(&mut shell, |phase| phase == JobPhase::Completed);

        let text = output(&shell);
        assert!(text.contains("100% done..."));
        assert!(text.contains("Demo finished."));
        assert_eq!(shell.state.view().job.step, 3);
    }

    #[test]
    fn cancel_stops_a_running_upload() {
        let mut shell = shell(50, 50);
        shell.handle_command(ShellCommand::Start).unwrap();
        pump_until(&mut shell, |phase| phase == JobPhase::Running);

        shell.handle_command(ShellCommand::Cancel).unwrap();
        pump_until(&mut shell, |phase| phase == JobPhase::Cancelled);

        let view = shell.state.view();
        assert!(view.job.step < 50);
        assert!(!output(&shell).contains("Demo finished."));
    }

    #[test]
    fn quit_ends_the_loop() {
        let mut shell = shell(3, 0);
        assert_eq!(shell.handle_command(ShellCommand::Quit).unwrap(), Flow::Quit);
        assert_eq!(shell.handle_command(ShellCommand::Help).unwrap(), Flow::Continue);
    }
}

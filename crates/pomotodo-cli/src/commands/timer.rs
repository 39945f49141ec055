use std::time::Duration;

use clap::Subcommand;
use pomotodo_core::{format_clock, Config, CoreError, Event, Phase, Result};
use serde::Serialize;
use tokio::time::MissedTickBehavior;

use super::{open_app, print_json, CliApp};

/// Poll cadence while running. Accuracy does not depend on it.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current session state as JSON
    Status,
    /// Run the countdown in the foreground until Ctrl-C or the session pauses itself
    Run,
    /// Rewind the current phase to its full duration and pause
    ResetPhase,
    /// Clear the pomodoro count and return to a fresh focus phase
    Reset,
}

#[derive(Serialize)]
struct StatusView {
    phase: Phase,
    remaining_secs: f64,
    display: String,
    progress: f64,
    running: bool,
    completed_pomodoro_count: u32,
    target_pomodoro_count: u32,
    auto_chain: bool,
}

fn status(app: &CliApp) -> StatusView {
    let state = app.state();
    let config = app.config();
    StatusView {
        phase: state.phase,
        remaining_secs: state.remaining_secs,
        display: format_clock(state.remaining_secs),
        progress: state.progress(),
        running: state.running,
        completed_pomodoro_count: state.completed_pomodoro_count,
        target_pomodoro_count: config.target_pomodoro_count,
        auto_chain: config.auto_chain,
    }
}

/// One compact JSON line per event, skipping the per-poll snapshots.
fn print_events(events: &[Event]) -> Result<()> {
    for event in events {
        if matches!(event, Event::StateSnapshot { .. }) {
            continue;
        }
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}

fn run_foreground(app: &mut CliApp) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        if !app.is_running() {
            print_events(&app.toggle_run())?;
        }

        let mut interval = tokio::time::interval(POLL_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let mut shown = String::new();
        while let Some(handle) = app.active_poll() {
            tokio::select! {
                _ = &mut ctrl_c => {
                    tracing::debug!("interrupted");
                    break;
                }
                _ = interval.tick() => {
                    print_events(&app.poll(handle))?;
                    let line = format!("{} {}", app.state().phase, format_clock(app.state().remaining_secs));
                    if line != shown {
                        eprint!("\r{line}  ");
                        shown = line;
                    }
                }
            }
        }
        eprintln!();
        Ok::<(), CoreError>(())
    })?;

    print_events(&app.teardown())
}

pub fn run(action: TimerAction, config: &Config) -> Result<()> {
    let mut app = open_app(config)?;

    match action {
        TimerAction::Status => {}
        TimerAction::Run => run_foreground(&mut app)?,
        TimerAction::ResetPhase => {
            app.reset_current_phase();
        }
        TimerAction::Reset => {
            app.reset_session();
        }
    }

    print_json(&status(&app))
}

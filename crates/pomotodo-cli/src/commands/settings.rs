use clap::Subcommand;
use pomotodo_core::{Config, Result, Setting};

use super::{open_app, print_json};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the session settings as JSON
    Show,
    /// Set the focus phase length in seconds
    Work { value: String },
    /// Set the break length in seconds
    Break { value: String },
    /// Set the number of pomodoros after which auto-chain switches off
    Target { value: String },
    /// Turn auto-chain on or off
    AutoChain { value: String },
}

pub fn run(action: SettingsAction, config: &Config) -> Result<()> {
    let mut app = open_app(config)?;

    let edit = match action {
        SettingsAction::Show => None,
        SettingsAction::Work { value } => Some((Setting::WorkDuration, value)),
        SettingsAction::Break { value } => Some((Setting::BreakDuration, value)),
        SettingsAction::Target { value } => Some((Setting::TargetPomodoroCount, value)),
        SettingsAction::AutoChain { value } => Some((Setting::AutoChain, value)),
    };
    if let Some((setting, value)) = edit {
        app.update_setting(setting, &value)?;
    }

    print_json(app.config())
}

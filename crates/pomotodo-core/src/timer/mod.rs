mod engine;
pub mod machine;
pub mod settings;
mod state;

pub use engine::SessionEngine;
pub use machine::{transition, Effect, PollHandle, Session, SessionInput};
pub use settings::{Setting, SettingEdit, SessionConfig};
pub use state::{format_clock, Phase, SessionState};

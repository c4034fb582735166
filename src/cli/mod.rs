//! Interactive command shell and the wizard front end.

pub mod context;
pub mod controller;
pub mod input;
pub mod output;
pub mod shell;
pub mod view;

pub use context::{CliError, CliMode, CommandError, ShellContext};
pub use controller::{WizardController, WizardOutcome};
pub use shell::run_cli;

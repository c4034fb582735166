//! Shell context: the command table, dispatch, and the state shared across
//! commands.

use std::io;

use dialoguer::{theme::ColorfulTheme, Confirm};
use strsim::levenshtein;
use thiserror::Error;

use crate::config::{Config, ConfigManager};
use crate::errors::QuoteError;
use crate::questionnaire::{estimate_cost, question, TOTAL_STEPS};
use crate::session::SessionStore;

use super::controller::{WizardController, WizardOutcome};
use super::input::TerminalInput;
use super::output;
use super::view::{format_answer, TerminalView};

/// Fatal shell-level failures.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Core(#[from] QuoteError),
}

/// Recoverable per-command failures, reported and swallowed by the loop.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] QuoteError),
    #[error("exit requested")]
    ExitRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// Static description of a shell command.
pub struct CommandEntry {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
}

pub const COMMANDS: &[CommandEntry] = &[
    CommandEntry {
        name: "start",
        usage: "start",
        summary: "Begin a new quote questionnaire.",
    },
    CommandEntry {
        name: "resume",
        usage: "resume [session-id]",
        summary: "Continue a saved session (defaults to the last one).",
    },
    CommandEntry {
        name: "sessions",
        usage: "sessions",
        summary: "List saved sessions.",
    },
    CommandEntry {
        name: "show",
        usage: "show <session-id>",
        summary: "Print a saved session's answers and estimate.",
    },
    CommandEntry {
        name: "delete",
        usage: "delete <session-id>",
        summary: "Remove a saved session.",
    },
    CommandEntry {
        name: "config",
        usage: "config [key value]",
        summary: "Show or change configuration.",
    },
    CommandEntry {
        name: "help",
        usage: "help [command]",
        summary: "Show command help.",
    },
    CommandEntry {
        name: "exit",
        usage: "exit",
        summary: "Leave the shell.",
    },
];

pub struct ShellContext {
    mode: CliMode,
    store: SessionStore,
    config_manager: ConfigManager,
    config: Config,
    pub(crate) running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let store = SessionStore::new_default()?;
        let config_manager = ConfigManager::new_default()?;
        let config = config_manager.load()?;
        Ok(Self {
            mode,
            store,
            config_manager,
            config,
            running: true,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_root(mode: CliMode, root: std::path::PathBuf) -> Result<Self, CliError> {
        let store = SessionStore::new(Some(root.clone()))?;
        let config_manager = ConfigManager::new(Some(root))?;
        let config = config_manager.load()?;
        Ok(Self {
            mode,
            store,
            config_manager,
            config,
            running: true,
        })
    }

    pub(crate) fn prompt(&self) -> String {
        "quote> ".into()
    }

    pub(crate) fn command_names() -> Vec<&'static str> {
        COMMANDS.iter().map(|entry| entry.name).collect()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let result = match command {
            "start" => self.cmd_start(),
            "resume" => self.cmd_resume(args),
            "sessions" => self.cmd_sessions(),
            "show" => self.cmd_show(args),
            "delete" => self.cmd_delete(args),
            "config" => self.cmd_config(args),
            "help" => self.cmd_help(args),
            "exit" | "quit" => Err(CommandError::ExitRequested),
            _ => {
                self.suggest_command(raw);
                return Ok(LoopControl::Continue);
            }
        };
        match result {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = COMMANDS
            .iter()
            .map(|entry| (levenshtein(entry.name, input), entry.name))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::hint(format!("Did you mean `{}`?", best));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            other => output::error(other.to_string()),
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        confirm_action("Exit shell?").map_err(CliError::from)
    }

    fn require_interactive(&self, action: &str) -> Result<(), CommandError> {
        if self.mode == CliMode::Interactive {
            Ok(())
        } else {
            Err(CommandError::InvalidArguments(format!(
                "{action} requires an interactive terminal"
            )))
        }
    }

    fn cmd_start(&mut self) -> Result<(), CommandError> {
        self.require_interactive("`start`")?;
        self.run_wizard(None)
    }

    fn cmd_resume(&mut self, args: &[&str]) -> Result<(), CommandError> {
        self.require_interactive("`resume`")?;
        let session_id = args
            .first()
            .map(|raw| raw.to_string())
            .or_else(|| self.config.last_session.clone())
            .ok_or_else(|| {
                CommandError::InvalidArguments(
                    "usage: resume <session-id> (no previous session recorded)".into(),
                )
            })?;
        self.run_wizard(Some(&session_id))
    }

    /// Mounts the wizard, optionally restoring a saved session first, and
    /// records the session id for the next `resume`.
    pub(crate) fn run_wizard(&mut self, session_id: Option<&str>) -> Result<(), CommandError> {
        let input = TerminalInput::activate()?;
        let view = TerminalView::new();
        let mut controller =
            WizardController::new(self.store.clone(), self.config.clone(), input, view);
        if let Some(id) = session_id {
            controller.restore(id);
        }
        let outcome = controller.run()?;
        println!();
        match &outcome {
            WizardOutcome::Completed(result) => {
                output::success(format!(
                    "Quote request recorded. Estimated cost: ${}.",
                    result.estimated_cost
                ));
            }
            WizardOutcome::Left => {
                output::info("Wizard closed. Use `resume` to pick up where you left off.");
            }
        }
        if let Some(id) = controller.session_id() {
            self.config.last_session = Some(id.to_string());
            if let Err(err) = self.config_manager.save(&self.config) {
                tracing::warn!(error = %err, "failed to persist configuration");
            }
        }
        Ok(())
    }

    fn cmd_sessions(&mut self) -> Result<(), CommandError> {
        let sessions = self.store.list();
        if sessions.is_empty() {
            output::warning("No saved sessions.");
            return Ok(());
        }
        output::info("Saved sessions:");
        for (idx, summary) in sessions.iter().enumerate() {
            output::info(format!(
                "  {:>2}. {}  step {}/{}  {}  {}",
                idx + 1,
                summary.id,
                summary.current_step.min(TOTAL_STEPS),
                TOTAL_STEPS,
                if summary.is_complete {
                    "complete"
                } else {
                    "in progress"
                },
                summary.modified.format("%Y-%m-%d %H:%M"),
            ));
        }
        Ok(())
    }

    fn cmd_show(&mut self, args: &[&str]) -> Result<(), CommandError> {
        let id = args
            .first()
            .ok_or_else(|| CommandError::InvalidArguments("usage: show <session-id>".into()))?;
        let Some(state) = self.store.load(id) else {
            return Err(CommandError::InvalidArguments(format!(
                "no session found for `{}`",
                id
            )));
        };
        output::section(format!("Session {}", id));
        for (step, question) in question::all().iter().enumerate() {
            let rendered = state
                .answers
                .get(question.id)
                .map(format_answer)
                .unwrap_or_else(|| "(unanswered)".into());
            output::info(format!("  {}. {}: {}", step + 1, question.title, rendered));
        }
        output::info(format!(
            "Estimated cost: ${}",
            estimate_cost(&state.answers)
        ));
        if state.is_complete {
            output::success("This quote request was finalized.");
        }
        Ok(())
    }

    fn cmd_delete(&mut self, args: &[&str]) -> Result<(), CommandError> {
        let id = args
            .first()
            .ok_or_else(|| CommandError::InvalidArguments("usage: delete <session-id>".into()))?;
        if self.mode == CliMode::Interactive
            && !confirm_action(&format!("Delete session `{}`?", id))?
        {
            output::info("Operation cancelled.");
            return Ok(());
        }
        self.store.clear(id);
        if self.config.last_session.as_deref() == Some(*id) {
            self.config.last_session = None;
            if let Err(err) = self.config_manager.save(&self.config) {
                tracing::warn!(error = %err, "failed to persist configuration");
            }
        }
        output::success(format!("Session `{}` removed.", id));
        Ok(())
    }

    fn cmd_config(&mut self, args: &[&str]) -> Result<(), CommandError> {
        match args {
            [] => {
                output::section("Configuration");
                output::info(format!("  autosave_secs: {}", self.config.autosave_secs));
                output::info(format!("  history_limit: {}", self.config.history_limit));
                output::info(format!("  notice_secs: {}", self.config.notice_secs));
                output::info(format!(
                    "  last_session: {}",
                    self.config.last_session.as_deref().unwrap_or("(none)")
                ));
                Ok(())
            }
            [key, value] => self.set_config_value(key, value),
            _ => Err(CommandError::InvalidArguments(
                "usage: config [key value]".into(),
            )),
        }
    }

    fn set_config_value(&mut self, key: &str, value: &str) -> Result<(), CommandError> {
        match key.to_lowercase().as_str() {
            "autosave_secs" => {
                self.config.autosave_secs = parse_positive(key, value)?;
            }
            "history_limit" => {
                self.config.history_limit = parse_positive(key, value)? as usize;
            }
            "notice_secs" => {
                self.config.notice_secs = value.parse().map_err(|_| {
                    CommandError::InvalidArguments(format!("{key} must be numeric"))
                })?;
            }
            "last_session" => {
                if value.eq_ignore_ascii_case("none") || value.is_empty() {
                    self.config.last_session = None;
                } else {
                    self.config.last_session = Some(value.to_string());
                }
            }
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown config key `{}`",
                    other
                )))
            }
        }
        self.config_manager.save(&self.config)?;
        output::success("Configuration updated.");
        Ok(())
    }

    fn cmd_help(&self, args: &[&str]) -> Result<(), CommandError> {
        match args.first() {
            Some(name) => {
                let Some(entry) = COMMANDS.iter().find(|entry| entry.name == *name) else {
                    return Err(CommandError::InvalidArguments(format!(
                        "unknown command `{}`",
                        name
                    )));
                };
                output::info(format!("usage: {}", entry.usage));
                output::info(entry.summary);
            }
            None => {
                output::section("Commands");
                for entry in COMMANDS {
                    output::info(format!("  {:<24} {}", entry.usage, entry.summary));
                }
            }
        }
        Ok(())
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u64, CommandError> {
    let parsed: u64 = value
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("{key} must be numeric")))?;
    if parsed == 0 {
        return Err(CommandError::InvalidArguments(format!(
            "{key} must be at least 1"
        )));
    }
    Ok(parsed)
}

fn confirm_action(prompt: &str) -> io::Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))
}

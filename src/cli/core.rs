//! Shell construction, dispatch, and helpers shared by command handlers.

use std::{env, io, path::PathBuf, sync::Arc};

use chrono::NaiveDate;
use dialoguer::theme::ColorfulTheme;
use spendsmart_assistant::{Assistant, ChatSession};
use spendsmart_config::{ConfigError, ConfigManager};
use spendsmart_core::{Clock, CoreError, FinanceState, FixedClock, LoadOptions, SplitPlan};
use spendsmart_domain::{Alert, AlertSeverity, Category, YearMonth};
use spendsmart_storage_json::JsonFileStorage;

use super::commands;
use super::io as cli_io;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};
use super::system_clock::SystemClock;
pub use crate::cli::shell_context::{CliMode, ShellContext};
pub use crate::errors::CliError;

/// Set to run commands from stdin without prompts.
pub const SCRIPT_ENV: &str = "SPENDSMART_CLI_SCRIPT";
/// Overrides the home directory holding config and data.
pub const HOME_ENV: &str = "SPENDSMART_HOME";
/// Pins "today" to a `YYYY-MM-DD` date instead of the system clock.
pub const FIXED_DATE_ENV: &str = "SPENDSMART_FIXED_DATE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let home = env::var_os(HOME_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(ConfigManager::default_home);
        let config_manager = ConfigManager::with_base_dir(&home)?;
        let config = config_manager.load()?;
        output::set_color_enabled(config.ui_color_enabled);

        let data_dir = config.resolve_data_dir(&home);
        let storage = JsonFileStorage::new(&data_dir)?;
        let clock = clock_from_env()?;
        let finance = FinanceState::load(
            Box::new(storage),
            clock.clone(),
            LoadOptions {
                seed_sample_data: config.seed_sample_data,
            },
        )?;
        let assistant = Assistant::from_settings(&config.assistant);
        let split_plan = SplitPlan::with_friends(config.friends.iter().cloned());

        tracing::info!(
            home = %home.display(),
            data_dir = %data_dir.display(),
            ?mode,
            "shell ready"
        );

        Ok(ShellContext {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            finance,
            clock,
            assistant,
            chat: ChatSession::new(),
            split_plan,
            config_manager,
            config,
            home,
            data_dir,
            last_command: None,
            running: true,
        })
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        format!("spendsmart [{}]> ", self.current_month())
    }

    pub(crate) fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub(crate) fn current_month(&self) -> YearMonth {
        self.finance.current_month()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            tracing::debug!(command, args = args.len(), "dispatching command");
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.registry.suggest(input) {
            cli_io::print_info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit SpendSmart?", true).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(CoreError::Validation(message)) => {
                cli_io::print_error(format!("Rejected: {message}"));
                Ok(())
            }
            other => {
                tracing::warn!(error = %other, "command failed");
                cli_io::print_error(other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    /// Prints alerts raised by the last mutation, most severe first.
    pub(crate) fn announce_alerts(&self, alerts: &[Alert]) {
        let mut alerts: Vec<&Alert> = alerts.iter().collect();
        alerts.sort_by_key(|alert| alert.severity != AlertSeverity::Danger);
        for alert in alerts {
            output::print(output::alert_kind(alert.severity), &alert.message);
        }
    }

    pub(crate) fn report_persistence(&self, persisted: bool) {
        if !persisted {
            cli_io::print_warning(
                "Changes could not be saved to disk; they are kept for this session only.",
            );
        }
    }

    pub(crate) fn save_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn rebuild_assistant(&mut self) {
        self.assistant = Assistant::from_settings(&self.config.assistant);
        self.chat = ChatSession::new();
    }
}

fn clock_from_env() -> Result<Arc<dyn Clock>, CliError> {
    match env::var(FIXED_DATE_ENV) {
        Ok(raw) if !raw.trim().is_empty() => {
            let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                CliError::Input(format!("{FIXED_DATE_ENV} must be YYYY-MM-DD, got `{raw}`"))
            })?;
            tracing::info!(%date, "using fixed clock");
            Ok(Arc::new(FixedClock::at_date(date)))
        }
        _ => Ok(Arc::new(SystemClock)),
    }
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

/// Accepts `12`, `12.5`, or `$12.50`.
pub(crate) fn parse_amount(input: &str) -> Result<f64, CommandError> {
    let trimmed = input.trim().trim_start_matches('$').replace(',', "");
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(CommandError::InvalidArguments(format!(
            "invalid amount `{}` (use a non-negative number)",
            input
        ))),
    }
}

pub(crate) fn parse_category(input: &str) -> Result<Category, CommandError> {
    input.parse().map_err(|_| {
        CommandError::InvalidArguments(format!(
            "unknown category `{}` (choose from: {})",
            input,
            Category::names()
        ))
    })
}

/// Parses `YYYY-MM`; `None` means the current month.
pub(crate) fn parse_month(
    context: &ShellContext,
    input: Option<&str>,
) -> Result<YearMonth, CommandError> {
    match input {
        None => Ok(context.current_month()),
        Some(raw) if raw.eq_ignore_ascii_case("current") => Ok(context.current_month()),
        Some(raw) => raw.parse().map_err(|_| {
            CommandError::InvalidArguments(format!("invalid month `{}` (use YYYY-MM)", raw))
        }),
    }
}

/// Splits `--flag value` pairs out of `args`, returning the flag values and the rest.
pub(crate) fn take_flags<'a>(
    args: &[&'a str],
    flags: &[&str],
) -> Result<(Vec<(String, &'a str)>, Vec<&'a str>), CommandError> {
    let mut found = Vec::new();
    let mut rest = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match flags.iter().find(|flag| arg.eq_ignore_ascii_case(flag)) {
            Some(flag) => {
                let value = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments(format!("{flag} expects a value"))
                })?;
                found.push((flag.to_string(), *value));
            }
            None => rest.push(*arg),
        }
    }
    Ok((found, rest))
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

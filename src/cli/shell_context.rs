//! Shared runtime state for CLI interactions and command execution.

use std::{path::PathBuf, sync::Arc};

use dialoguer::theme::ColorfulTheme;
use spendsmart_assistant::{Assistant, ChatSession};
use spendsmart_config::{Config, ConfigManager};
use spendsmart_core::{Clock, FinanceState, SplitPlan};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub finance: FinanceState,
    pub clock: Arc<dyn Clock>,
    pub assistant: Assistant,
    pub chat: ChatSession,
    pub split_plan: SplitPlan,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub home: PathBuf,
    pub data_dir: PathBuf,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn status(&self) -> String {
        format!(
            "ShellContext {{ running: {}, last_command: {:?}, data_dir: {} }}",
            self.running,
            self.last_command,
            self.data_dir.display()
        )
    }
}

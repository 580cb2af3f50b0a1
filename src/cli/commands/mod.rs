pub mod alert;
pub mod assistant;
pub mod budget;
pub mod config;
pub mod expense;
pub mod report;
pub mod split;
pub mod system;

use crate::cli::registry::{CommandEntry, CommandRegistry};

/// Order in which commands appear in `help`.
const ROOT_COMMAND_ORDER: &[&str] = &[
    "add",
    "smart-add",
    "list",
    "delete",
    "set-budget",
    "budgets",
    "alerts",
    "dismiss",
    "report",
    "friends",
    "split",
    "insights",
    "chat",
    "config",
    "help",
    "version",
    "exit",
];

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(expense::definitions());
    commands.extend(budget::definitions());
    commands.extend(alert::definitions());
    commands.extend(report::definitions());
    commands.extend(split::definitions());
    commands.extend(assistant::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let mut definitions = all_definitions();
    definitions.sort_by_key(|entry| {
        ROOT_COMMAND_ORDER
            .iter()
            .position(|name| *name == entry.name)
            .unwrap_or(ROOT_COMMAND_ORDER.len())
    });
    for entry in definitions {
        registry.register(entry);
    }
}

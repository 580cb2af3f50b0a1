use spendsmart_config::CONFIG_KEYS;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change preferences",
        "config [show|<key>|set <key> <value>|<key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => show_config(context),
        [first] if first.eq_ignore_ascii_case("show") => show_config(context),
        [key] => {
            let value = context.config.value(key)?;
            io::print_info(format!("{key} = {value}"));
            Ok(())
        }
        [set, key, value @ ..] if set.eq_ignore_ascii_case("set") && !value.is_empty() => {
            set_config_value(context, key, &value.join(" "))
        }
        [key, value @ ..] => set_config_value(context, key, &value.join(" ")),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    output::section("Configuration");
    for key in CONFIG_KEYS {
        let value = context.config.value(key)?;
        io::print_info(format!("  {key:<28} {value}"));
    }
    io::print_info(format!(
        "  {:<28} {}",
        "friends",
        context.config.friends.join(", ")
    ));
    io::print_hint(format!(
        "Stored in {}",
        context.config_manager.config_path().display()
    ));
    Ok(())
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    if key.eq_ignore_ascii_case("friends") {
        return Err(CommandError::InvalidArguments(
            "use `friends add <name>` or `friends remove <name>` to edit friends".into(),
        ));
    }
    context.config.set_value(key, value)?;
    context.save_config()?;

    match key {
        "ui_color_enabled" => output::set_color_enabled(context.config.ui_color_enabled),
        "data_dir" | "seed_sample_data" => {
            io::print_hint("Takes effect the next time SpendSmart starts.")
        }
        assistant if assistant.starts_with("assistant.") => context.rebuild_assistant(),
        _ => {}
    }

    io::print_success(format!("{key} = {}", context.config.value(key)?));
    Ok(())
}

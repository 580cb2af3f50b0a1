use spendsmart_core::CURRENT_USER;
use spendsmart_domain::format_money;

use crate::cli::core::{parse_amount, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "friends",
            "List or edit the people bills are split with",
            "friends [add <name>|remove <name>]",
            cmd_friends,
        ),
        CommandEntry::new(
            "split",
            "Split a bill evenly between you and your friends",
            "split <amount> [payer]",
            cmd_split,
        ),
    ]
}

fn cmd_friends(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(action) = args.first() else {
        let friends = context.split_plan.friends();
        if friends.is_empty() {
            io::print_info("No friends yet. Add one with `friends add <name>`.");
        } else {
            io::print_info(format!("Friends: {}", friends.join(", ")));
        }
        return Ok(());
    };

    let name = args[1..].join(" ");
    if name.trim().is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: friends [add <name>|remove <name>]".into(),
        ));
    }

    let changed = match action.to_ascii_lowercase().as_str() {
        "add" => context.split_plan.add_friend(name.as_str()),
        "remove" | "rm" => context.split_plan.remove_friend(name.trim()),
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown friends action `{other}` (use add or remove)"
            )))
        }
    };
    if !changed {
        io::print_warning(format!("Friends list unchanged for `{}`", name.trim()));
        return Ok(());
    }

    context.config.friends = context.split_plan.friends().to_vec();
    context.save_config()?;
    io::print_success(format!(
        "Friends: {}",
        context.split_plan.friends().join(", ")
    ));
    Ok(())
}

fn cmd_split(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw_amount) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: split <amount> [payer]".into(),
        ));
    };
    let total = parse_amount(raw_amount)?;
    let requested = if args.len() > 1 {
        args[1..].join(" ")
    } else {
        CURRENT_USER.to_string()
    };
    let payer = context
        .split_plan
        .participants()
        .into_iter()
        .find(|person| person.eq_ignore_ascii_case(requested.trim()))
        .map(str::to_string)
        .unwrap_or(requested);

    let result = context.split_plan.split(total, &payer)?;
    output::section(format!(
        "Split {} between {} people",
        format_money(result.total),
        result.lines.len()
    ));
    io::print_info(format!("Each share: {}", format_money(result.share)));
    for line in &result.lines {
        io::print_info(format!("  {line}"));
    }
    Ok(())
}

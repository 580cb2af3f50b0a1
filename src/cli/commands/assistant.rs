use spendsmart_assistant::Role;

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "insights",
            "Ask the assistant for saving tips on recent spending",
            "insights",
            cmd_insights,
        ),
        CommandEntry::new(
            "chat",
            "Talk to the assistant about your finances",
            "chat [message...|reset]",
            cmd_chat,
        ),
    ]
}

fn ensure_available(context: &ShellContext) -> bool {
    match context.assistant.unavailable_reason() {
        Some(reason) => {
            io::print_warning(format!("Assistant unavailable: {reason}"));
            false
        }
        None => true,
    }
}

fn cmd_insights(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !ensure_available(context) {
        return Ok(());
    }
    io::print_info("Analyzing your recent spending...");
    let text = context.assistant.insights(context.finance.expenses());
    output::section("Insights");
    io::print_info(text.trim());
    Ok(())
}

fn cmd_chat(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            for message in context.chat.messages() {
                let speaker = match message.role {
                    Role::User => "you",
                    Role::Model => "assistant",
                };
                io::print_info(format!("{speaker}> {}", message.text));
            }
            Ok(())
        }
        [single] if single.eq_ignore_ascii_case("reset") => {
            context.chat.reset();
            io::print_success("Conversation cleared.");
            Ok(())
        }
        words => {
            if !ensure_available(context) {
                return Ok(());
            }
            let message = words.join(" ");
            let reply = context.assistant.chat(
                &mut context.chat,
                &message,
                context.finance.expenses(),
                context.finance.budgets(),
            );
            io::print_info(format!("assistant> {reply}"));
            Ok(())
        }
    }
}

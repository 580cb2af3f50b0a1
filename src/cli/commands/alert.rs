use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("alerts", "Show active budget alerts", "alerts", cmd_alerts),
        CommandEntry::new(
            "dismiss",
            "Dismiss an alert for this session",
            "dismiss <alert-id>",
            cmd_dismiss,
        ),
    ]
}

fn cmd_alerts(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let alerts = context.finance.alerts();
    if alerts.is_empty() {
        io::print_info("No active alerts.");
        return Ok(());
    }
    output::section(format!("Alerts ({})", alerts.len()));
    for alert in alerts {
        output::print(
            output::alert_kind(alert.severity),
            format!("{}  {}", alert.id, alert.message),
        );
    }
    io::print_hint("Dismiss with `dismiss <alert-id>`.");
    Ok(())
}

fn cmd_dismiss(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: dismiss <alert-id>".into(),
        ));
    };
    if context.finance.dismiss_alert(id) {
        io::print_success(format!("Dismissed {id}"));
    } else {
        io::print_warning(format!("No active alert `{id}`"));
    }
    Ok(())
}

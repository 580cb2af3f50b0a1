use spendsmart_core::{BudgetStatus, ReportService};
use spendsmart_domain::{format_money, Budget};

use crate::cli::core::{
    parse_amount, parse_category, parse_month, CommandError, CommandResult, ShellContext,
};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "set-budget",
            "Create or replace a monthly category budget",
            "set-budget <category> <YYYY-MM|current> <limit> [threshold%]",
            cmd_set_budget,
        ),
        CommandEntry::new(
            "budgets",
            "Show budgets and spending for a month",
            "budgets [YYYY-MM]",
            cmd_budgets,
        ),
    ]
}

fn cmd_set_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !(3..=4).contains(&args.len()) {
        return Err(CommandError::InvalidArguments(
            "usage: set-budget <category> <YYYY-MM|current> <limit> [threshold%]".into(),
        ));
    }
    let category = parse_category(args[0])?;
    let month = parse_month(context, Some(args[1]))?;
    let limit = parse_amount(args[2])?;
    let threshold = match args.get(3) {
        Some(raw) => raw.trim_end_matches('%').parse::<f64>().map_err(|_| {
            CommandError::InvalidArguments(format!("invalid threshold `{raw}` (use 1-100)"))
        })?,
        None => context.config.default_alert_threshold,
    };

    let mutation = context
        .finance
        .set_budget(Budget::new(category, month, limit, threshold))?;
    let verb = if mutation.value { "Updated" } else { "Set" };
    io::print_success(format!(
        "{verb} {category} budget for {month}: {} (alert at {threshold}%)",
        format_money(limit)
    ));
    context.announce_alerts(&mutation.raised_alerts);
    context.report_persistence(mutation.persisted);
    Ok(())
}

fn cmd_budgets(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() > 1 {
        return Err(CommandError::InvalidArguments(
            "usage: budgets [YYYY-MM]".into(),
        ));
    }
    let month = parse_month(context, args.first().copied())?;
    let rows = ReportService::category_breakdown(
        context.finance.expenses(),
        context.finance.budgets(),
        month,
    );
    let budgeted: Vec<_> = rows.iter().filter(|row| row.budget.is_some()).collect();

    output::section(format!("Budgets for {month}"));
    if budgeted.is_empty() {
        io::print_info("No budgets set for this month.");
        io::print_hint("Use `set-budget <category> <YYYY-MM> <limit>` to add one.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::left("Category"),
        TableColumn::right("Spent"),
        TableColumn::right("Limit"),
        TableColumn::right("Used"),
        TableColumn::left("Status"),
    ]);
    for row in budgeted {
        let limit = row.budget.unwrap_or_default();
        let status = row.status.unwrap_or(BudgetStatus::OnTrack { percent_used: None });
        table.push_row(vec![
            row.category.to_string(),
            format_money(row.spent),
            format_money(limit),
            used_column(row.spent, limit),
            status_column(&status),
        ]);
    }
    io::print_info(table.render());
    Ok(())
}

fn used_column(spent: f64, limit: f64) -> String {
    if limit > 0.0 {
        format!("{:.0}%", spent / limit * 100.0)
    } else {
        "-".into()
    }
}

fn status_column(status: &BudgetStatus) -> String {
    match status {
        BudgetStatus::OverLimit { overage } => {
            format!("{} by {}", status.label(), format_money(*overage))
        }
        other => other.label().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_and_status_columns() {
        assert_eq!(used_column(85.0, 100.0), "85%");
        assert_eq!(used_column(5.0, 0.0), "-");
        assert_eq!(
            status_column(&BudgetStatus::OverLimit { overage: 20.0 }),
            "Over budget by $20.00"
        );
        assert_eq!(
            status_column(&BudgetStatus::NearLimit { percent_used: 85.0 }),
            "Near limit"
        );
    }
}

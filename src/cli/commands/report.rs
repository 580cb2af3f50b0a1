use spendsmart_core::{MonthSummary, ReportService};
use spendsmart_domain::format_money;

use crate::cli::core::{parse_month, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};

/// Width of the share bar at 100%.
const BAR_WIDTH: usize = 20;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "report",
        "Summarize a month's spending against budgets",
        "report [YYYY-MM]",
        cmd_report,
    )]
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() > 1 {
        return Err(CommandError::InvalidArguments("usage: report [YYYY-MM]".into()));
    }
    let month = parse_month(context, args.first().copied())?;
    let expenses = context.finance.expenses();
    let budgets = context.finance.budgets();

    let summary = ReportService::month_summary(expenses, budgets, month);
    output::section(format!("Report for {month}"));
    for line in summary_lines(&summary) {
        io::print_info(format!("  {line}"));
    }

    let shares = ReportService::spending_shares(expenses, month);
    if shares.is_empty() {
        io::print_info("No spending recorded this month.");
        return Ok(());
    }

    output::section("Spending by category");
    let mut table = Table::new(vec![
        TableColumn::left("Category"),
        TableColumn::right("Spent"),
        TableColumn::right("Share"),
        TableColumn::left(""),
    ]);
    for share in &shares {
        table.push_row(vec![
            share.category.to_string(),
            format_money(share.spent),
            format!("{:.1}%", share.share_percent),
            bar(share.share_percent),
        ]);
    }
    io::print_info(table.render());
    Ok(())
}

fn summary_lines(summary: &MonthSummary) -> Vec<String> {
    let mut lines = vec![
        format!("Expenses : {}", summary.expense_count),
        format!("Spent    : {}", format_money(summary.total_spent)),
        format!("Budgeted : {}", format_money(summary.total_budget)),
    ];
    if summary.total_budget > 0.0 {
        lines.push(format!("Used     : {:.1}%", summary.percent_spent));
    }
    let position = if summary.over_budget {
        "over budget"
    } else {
        "remaining"
    };
    lines.push(format!("{} {position}", format_money(summary.difference)));
    lines
}

fn bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled.min(BAR_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use spendsmart_domain::YearMonth;

    #[test]
    fn summary_mentions_overspend() {
        let summary = MonthSummary {
            month: YearMonth::new(2024, 5).unwrap(),
            total_spent: 120.0,
            total_budget: 100.0,
            expense_count: 3,
            percent_spent: 120.0,
            over_budget: true,
            difference: 20.0,
        };
        insta::assert_snapshot!(summary_lines(&summary).join("\n"), @r###"
        Expenses : 3
        Spent    : $120.00
        Budgeted : $100.00
        Used     : 120.0%
        $20.00 over budget
        "###);
    }

    #[test]
    fn bars_scale_to_width() {
        assert_eq!(bar(50.0), "#".repeat(10));
        assert_eq!(bar(0.0), "");
        assert_eq!(bar(100.0).len(), BAR_WIDTH);
    }
}

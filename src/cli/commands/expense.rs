use spendsmart_assistant::ExpenseDraft;
use spendsmart_core::ExpenseFilter;
use spendsmart_domain::{format_money, Expense, NewExpense};

use crate::cli::core::{
    parse_amount, parse_category, parse_date, parse_month, take_flags, CommandError,
    CommandResult, ShellContext,
};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{flexible_width, Table, TableColumn};

/// Characters of an expense id shown in listings.
const SHORT_ID_LEN: usize = 8;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Record an expense",
            "add <amount> <category> <description...> [--date YYYY-MM-DD]",
            cmd_add,
        ),
        CommandEntry::new(
            "smart-add",
            "Record an expense described in plain words",
            "smart-add <text...>",
            cmd_smart_add,
        ),
        CommandEntry::new(
            "list",
            "List expenses, newest first",
            "list [--category <category>] [--search <text>] [--month <YYYY-MM>]",
            cmd_list,
        ),
        CommandEntry::new(
            "delete",
            "Delete an expense by id or unique id prefix",
            "delete <id>",
            cmd_delete,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (flags, rest) = take_flags(args, &["--date"])?;
    if rest.len() < 3 {
        return Err(CommandError::InvalidArguments(
            "usage: add <amount> <category> <description...> [--date YYYY-MM-DD]".into(),
        ));
    }
    let amount = parse_amount(rest[0])?;
    let category = parse_category(rest[1])?;
    let description = rest[2..].join(" ");
    let date = match flags.first() {
        Some((_, raw)) => parse_date(raw)?,
        None => context.today(),
    };
    record(context, NewExpense::new(date, amount, category, description))
}

fn cmd_smart_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: smart-add <text...>".into(),
        ));
    }
    if let Some(reason) = context.assistant.unavailable_reason() {
        io::print_warning(format!("Assistant unavailable: {reason}"));
        return Ok(());
    }

    let text = args.join(" ");
    let today = context.today();
    let Some(draft) = context.assistant.parse_expense(&text, today) else {
        io::print_warning("Could not understand that expense. Try `add` instead.");
        return Ok(());
    };
    print_draft(&draft);

    let data = draft
        .into_new_expense(today)
        .map_err(|err| CommandError::Message(err.to_string()))?;

    if context.can_prompt()
        && !io::confirm_action(&context.theme, "Record this expense?", true)?
    {
        io::print_info("Discarded.");
        return Ok(());
    }
    record(context, data)
}

fn print_draft(draft: &ExpenseDraft) {
    let shown = |value: Option<String>| value.unwrap_or_else(|| "?".into());
    io::print_info(format!(
        "Understood: {} | {} | {} | {}",
        shown(draft.date.map(|d| d.to_string())),
        shown(draft.amount.map(format_money)),
        shown(draft.category.map(|c| c.to_string())),
        shown(draft.description.clone()),
    ));
}

fn record(context: &mut ShellContext, data: NewExpense) -> CommandResult {
    let mutation = context.finance.add_expense(data)?;
    let expense = &mutation.value;
    io::print_success(format!(
        "Added {} {} for {} on {} ({})",
        format_money(expense.amount),
        expense.category,
        expense.description,
        expense.date,
        short_id(&expense.id)
    ));
    context.announce_alerts(&mutation.raised_alerts);
    context.report_persistence(mutation.persisted);
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (flags, rest) = take_flags(args, &["--category", "--search", "--month"])?;
    if let Some(extra) = rest.first() {
        return Err(CommandError::InvalidArguments(format!(
            "unexpected argument `{extra}`"
        )));
    }

    let mut filter = ExpenseFilter::default();
    let mut month = None;
    for (flag, value) in flags {
        match flag.as_str() {
            "--category" => filter = filter.with_category(parse_category(value)?),
            "--search" => filter = filter.with_search(value),
            _ => month = Some(parse_month(context, Some(value))?),
        }
    }

    let matches: Vec<&Expense> = filter
        .apply(context.finance.expenses())
        .into_iter()
        .filter(|expense| month.map_or(true, |m| m.contains(expense.date)))
        .collect();

    if matches.is_empty() {
        io::print_info("No expenses found.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::left("Id"),
        TableColumn::left("Date"),
        TableColumn::left("Category"),
        TableColumn::left("Description").max_width(flexible_width(50)),
        TableColumn::right("Amount"),
    ]);
    for expense in &matches {
        table.push_row(vec![
            short_id(&expense.id).to_string(),
            expense.date.to_string(),
            expense.category.to_string(),
            expense.description.clone(),
            format_money(expense.amount),
        ]);
    }
    io::print_info(table.render());

    let total: f64 = matches.iter().map(|expense| expense.amount).sum();
    output::hint(format!(
        "{} expense(s), total {}",
        matches.len(),
        format_money(total)
    ));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [needle] = args else {
        return Err(CommandError::InvalidArguments("usage: delete <id>".into()));
    };
    let id = resolve_id(context.finance.expenses(), needle)?;
    let mutation = context.finance.delete_expense(&id);
    if mutation.value {
        io::print_success(format!("Deleted expense {}", short_id(&id)));
    }
    context.announce_alerts(&mutation.raised_alerts);
    context.report_persistence(mutation.persisted);
    Ok(())
}

/// Finds the single expense whose id equals or starts with `needle`.
fn resolve_id(expenses: &[Expense], needle: &str) -> Result<String, CommandError> {
    if let Some(exact) = expenses.iter().find(|expense| expense.id == needle) {
        return Ok(exact.id.clone());
    }
    let candidates: Vec<&Expense> = expenses
        .iter()
        .filter(|expense| expense.id.starts_with(needle))
        .collect();
    match candidates.as_slice() {
        [only] => Ok(only.id.clone()),
        [] => Err(CommandError::Message(format!("No expense with id `{needle}`"))),
        _ => Err(CommandError::InvalidArguments(format!(
            "id prefix `{needle}` matches {} expenses; use more characters",
            candidates.len()
        ))),
    }
}

fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use spendsmart_domain::Category;

    fn expense(id: &str) -> Expense {
        Expense {
            id: id.into(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            amount: 10.0,
            category: Category::Food,
            description: "Lunch".into(),
            split_group_id: None,
        }
    }

    #[test]
    fn resolves_exact_ids_and_unique_prefixes() {
        let expenses = vec![expense("abc123"), expense("abd456"), expense("abc")];
        assert_eq!(resolve_id(&expenses, "abc").unwrap(), "abc");
        assert_eq!(resolve_id(&expenses, "abd").unwrap(), "abd456");
        assert!(matches!(
            resolve_id(&expenses, "ab"),
            Err(CommandError::InvalidArguments(_))
        ));
        assert!(matches!(
            resolve_id(&expenses, "zz"),
            Err(CommandError::Message(_))
        ));
    }

    #[test]
    fn short_ids_tolerate_short_input() {
        assert_eq!(short_id("1234567890"), "12345678");
        assert_eq!(short_id("12"), "12");
    }
}

use std::{
    borrow::Cow,
    fmt,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Context as ReadlineContext, Editor, Helper,
};
use shell_words::split;
use spendsmart_domain::Category;

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext, SCRIPT_ENV};
use crate::cli::io as cli_io;

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    let result = match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    };
    tracing::debug!(status = %context.status(), "shell finished");
    result
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_names())));

    cli_io::print_info("SpendSmart. Type `help` to list commands.");
    if !context.finance.alerts().is_empty() {
        cli_io::print_warning(format!(
            "{} active alert(s). Run `alerts` to review them.",
            context.finance.alerts().len()
        ));
    }

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                match handle_line(context, trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                cli_io::print_info("Goodbye.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.print_warning(&err.to_string());
            return Ok(LoopControl::Continue);
        }
    };

    let Some(raw) = tokens.first() else {
        return Ok(LoopControl::Continue);
    };
    if raw.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let command = raw.to_lowercase();
    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
    context.last_command = Some(line.trim().to_string());

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

/// Completes command names, plus category names where a command expects one.
struct CommandHelper {
    commands: Vec<String>,
    categories: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names.into_iter().map(str::to_ascii_lowercase).collect();
        commands.sort();
        commands.dedup();
        let categories = Category::ALL.iter().map(|c| c.as_str().to_string()).collect();
        Self {
            commands,
            categories,
        }
    }

    fn candidates_for(&self, previous: &[&str]) -> Option<&[String]> {
        match previous {
            [] => Some(&self.commands),
            ["help"] => Some(&self.commands),
            ["set-budget"] | [_, "--category"] | ["add", _] => Some(&self.categories),
            _ => None,
        }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let lowered = prefix[..start].to_ascii_lowercase();
        let previous: Vec<&str> = lowered.split_whitespace().collect();
        let Some(pool) = self.candidates_for(&previous) else {
            return Ok((start, Vec::new()));
        };

        let needle = prefix[start..].to_ascii_lowercase();
        let candidates = pool
            .iter()
            .filter(|name| name.to_ascii_lowercase().starts_with(&needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = parse_command_line(r#"add 12 Food "Lunch with team""#).unwrap();
        assert_eq!(tokens, vec!["add", "12", "Food", "Lunch with team"]);
        assert!(parse_command_line("add \"unterminated").is_err());
    }

    #[test]
    fn completion_pool_depends_on_position() {
        let helper = CommandHelper::new(vec!["add", "help", "set-budget"]);
        assert_eq!(helper.candidates_for(&[]).map(<[String]>::len), Some(3));
        assert!(helper
            .candidates_for(&["set-budget"])
            .is_some_and(|pool| pool.contains(&"Food".to_string())));
        assert!(helper.candidates_for(&["add", "12"]).is_some());
        assert!(helper.candidates_for(&["delete"]).is_none());
    }
}

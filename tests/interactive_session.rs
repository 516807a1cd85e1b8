// Scripted sessions through the interactive loop.
use agenda::cli::{CliArgs, Command, Repl, parse_filter};
use agenda::context::TestContext;
use agenda::controller::TaskController;
use agenda::model::validate::DATE_FORMAT;
use agenda::storage::LocalStorage;
use agenda::store::TaskFilter;
use chrono::{Duration, Local};
use std::path::PathBuf;
use std::str::FromStr;

fn in_days(days: i64) -> String {
    (Local::now() + Duration::days(days))
        .format(DATE_FORMAT)
        .to_string()
}

fn run_script(ctx: &TestContext, lines: &[&str]) -> String {
    run_script_with(ctx, lines, true)
}

fn run_script_with(ctx: &TestContext, lines: &[&str], confirm: bool) -> String {
    let script = lines.join("\n") + "\n";
    let controller = TaskController::new(LocalStorage::from_context(ctx).unwrap());
    let mut repl = Repl::new(script.as_bytes(), Vec::new(), controller).confirm_delete(confirm);
    repl.run().unwrap();
    String::from_utf8(repl.into_output()).unwrap()
}

fn add_lines(title: &str, deadline: &str) -> Vec<String> {
    vec![
        "add".to_string(),
        title.to_string(),
        format!("{} notes", title),
        deadline.to_string(),
        "01-03-2024 09:00".to_string(),
        "01-03-2024 10:00".to_string(),
        "medium".to_string(),
    ]
}

#[test]
fn test_add_list_and_exit() {
    let ctx = TestContext::new();
    let deadline = in_days(3);
    let mut lines = add_lines("Water plants", &deadline);
    lines.extend(["list".to_string(), "exit".to_string()]);
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();

    let out = run_script(&ctx, &lines);
    assert!(out.contains("Task #1 created."));
    assert!(out.contains("[ ] #1 | Water plants [MEDIUM]"));
    assert!(out.contains(&format!("Deadline:    {}", deadline)));
    assert!(out.contains("Scheduled:   01-03-2024 09:00 -> 01-03-2024 10:00"));
    assert!(out.trim_end().ends_with("Goodbye!"));
}

#[test]
fn test_add_reprompts_until_valid() {
    let ctx = TestContext::new();
    let deadline = in_days(5);
    let out = run_script(
        &ctx,
        &[
            "add",
            "",
            "Title after blank",
            "desc",
            "01-01-2000 00:00",
            "tomorrow-ish",
            &deadline,
            "1-3-2024 9:00",
            "01-03-2024 09:00",
            "01-03-2024 10:00",
            "urgent",
            "LOW",
            "show 1",
            "quit",
        ],
    );
    assert!(out.contains("Title cannot be empty"));
    assert!(out.contains("must be in the future"));
    assert!(out.contains("Invalid format 'tomorrow-ish'"));
    assert!(out.contains("Invalid format '1-3-2024 9:00'"));
    assert!(out.contains("Invalid priority 'urgent'"));
    assert!(out.contains("#1 | Title after blank [LOW]"));
}

#[test]
fn test_bad_interval_aborts_add() {
    let ctx = TestContext::new();
    let deadline = in_days(5);
    let out = run_script(
        &ctx,
        &[
            "add",
            "t",
            "d",
            &deadline,
            "01-03-2024 10:00",
            "01-03-2024 09:00",
            "list",
            "exit",
        ],
    );
    assert!(out.contains("must be after start time"));
    assert!(out.contains("No tasks."));
}

#[test]
fn test_done_delete_and_usage_messages() {
    let ctx = TestContext::new();
    let deadline = in_days(2);
    let mut lines = add_lines("Call mom", &deadline);
    lines.extend(
        [
            "done",
            "done x",
            "done 7",
            "done 1",
            "done 1",
            "delete 1",
            "no",
            "list done",
            "delete 1",
            "yes",
            "list",
            "frobnicate",
            "exit",
        ]
        .map(String::from),
    );
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    let out = run_script(&ctx, &lines);

    assert!(out.contains("Usage: done <id>"));
    assert!(out.contains("The id must be a number."));
    assert!(out.contains("Error: Task #7 not found"));
    assert!(out.contains("Task #1 marked as done."));
    assert!(out.contains("Error: Task #1 is already done"));
    assert!(out.contains("Are you sure you want to delete 'Call mom'?"));
    assert!(out.contains("Deletion cancelled."));
    assert!(out.contains("[x] #1 | Call mom [MEDIUM]"));
    assert!(out.contains("Task #1 deleted."));
    assert!(out.contains("No tasks."));
    assert!(out.contains("Unknown command 'frobnicate'"));
}

#[test]
fn test_delete_without_confirmation() {
    let ctx = TestContext::new();
    let deadline = in_days(2);
    let mut lines = add_lines("Quick", &deadline);
    lines.extend(["delete 1", "list", "exit"].map(String::from));
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    let out = run_script_with(&ctx, &lines, false);
    assert!(!out.contains("Are you sure"));
    assert!(out.contains("Task #1 deleted."));
    assert!(out.contains("No tasks."));
}

#[test]
fn test_edit_keeps_rejected_fields() {
    let ctx = TestContext::new();
    let deadline = in_days(4);
    let mut lines = add_lines("Old title", &deadline);
    lines.extend(
        [
            "edit 1",
            "New title",
            "",
            "01-01-2000 00:00",
            "",
            "01-03-2024 08:00",
            "HIGH",
            "show 1",
            "exit",
        ]
        .map(String::from),
    );
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    let out = run_script(&ctx, &lines);

    assert!(out.contains("Title [Old title]:"));
    assert!(out.contains("must be in the future - deadline kept."));
    assert!(out.contains("must be after start time '01-03-2024 09:00' - schedule kept."));
    assert!(out.contains("Task #1 updated."));
    assert!(out.contains("#1 | New title [HIGH]"));
    assert!(out.contains(&format!("Deadline:    {}", deadline)));
    assert!(out.contains("Scheduled:   01-03-2024 09:00 -> 01-03-2024 10:00"));
}

#[test]
fn test_edit_with_only_rejected_fields_changes_nothing() {
    let ctx = TestContext::new();
    let deadline = in_days(4);
    let mut lines = add_lines("Stays", &deadline);
    lines.extend(
        ["edit 1", "", "", "01-01-2000 00:00", "", "", "", "exit"].map(String::from),
    );
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    let out = run_script(&ctx, &lines);

    assert!(out.contains("must be in the future - deadline kept."));
    assert!(out.contains("Nothing changed."));
    assert!(!out.contains("Task #1 updated."));
}

#[test]
fn test_list_arguments() {
    let ctx = TestContext::new();
    let deadline = in_days(6);
    let mut lines = add_lines("Ranged", &deadline);
    lines.extend(
        [
            "list 01-03-2024 01-03-2024",
            "list 05-03-2024 01-03-2024",
            "list 10-03-2024 12-03-2024",
            "list sometime",
            "exit",
        ]
        .map(String::from),
    );
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    let out = run_script(&ctx, &lines);

    assert!(out.contains("#1 | Ranged [MEDIUM]"));
    assert!(out.contains("Range end '01-03-2024' must not be before range start '05-03-2024'"));
    assert!(out.contains("No tasks match."));
    assert!(out.contains("Unknown argument."));
}

#[test]
fn test_end_of_input_says_goodbye() {
    let ctx = TestContext::new();
    let out = run_script(&ctx, &["help"]);
    assert!(out.contains("Available commands:"));
    assert!(out.trim_end().ends_with("Goodbye!"));
}

#[test]
fn test_parse_filter_and_commands() {
    assert_eq!(parse_filter(&[]), Some(Ok(TaskFilter::All)));
    assert_eq!(parse_filter(&["today"]), Some(Ok(TaskFilter::Today)));
    assert_eq!(parse_filter(&["pending"]), Some(Ok(TaskFilter::Pending)));
    assert!(matches!(
        parse_filter(&["01-03-2024", "05-03-2024"]),
        Some(Ok(TaskFilter::DateRange { .. }))
    ));
    assert!(matches!(parse_filter(&["01-03-2024", "bad"]), Some(Err(_))));
    assert_eq!(parse_filter(&["a", "b", "c"]), None);

    assert_eq!(Command::from_str("QUIT").unwrap(), Command::Exit);
    assert_eq!(Command::from_str("exit").unwrap(), Command::Exit);
    assert_eq!(Command::from_str("Add").unwrap(), Command::Add);
    assert!(Command::from_str("remove").is_err());
}

#[test]
fn test_cli_args() {
    let parsed = CliArgs::parse(&["--root", "/tmp/agenda", "-f", "mine.json"]).unwrap();
    assert_eq!(parsed.root, Some(PathBuf::from("/tmp/agenda")));
    assert_eq!(parsed.file, Some(PathBuf::from("mine.json")));
    assert!(!parsed.help);

    assert!(CliArgs::parse(&["-h"]).unwrap().help);
    assert!(CliArgs::parse(&["--root"]).is_err());
    assert!(CliArgs::parse(&["--verbose"]).is_err());
    let none: [&str; 0] = [];
    assert_eq!(CliArgs::parse(&none).unwrap(), CliArgs::default());
}

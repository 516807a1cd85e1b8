// File: ./src/cli.rs
//! Command-line surface: process arguments, help text and the interactive
//! `todo>` loop.
//!
//! The loop reads from any `BufRead` and writes to any `Write`, so it runs the
//! same against a terminal or a scripted buffer.
use crate::controller::TaskController;
use crate::error::{CommandError, CommandResult, TaskResult};
use crate::model::validate::{
    format_date, parse_date, require_text, validate_future_date, validate_priority,
    validate_time_interval,
};
use crate::model::{NewTask, TaskDisplay, TaskEdit};
use crate::store::TaskFilter;
use anyhow::{Result, bail};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use strum::EnumString;

const COMMAND_HELP: &str = "
  Available commands:
    add                          - Create a new task
    list                         - List all tasks
    list today                   - Tasks starting or due today
    list done                    - Completed tasks
    list pending                 - Open tasks
    list DD-MM-YYYY DD-MM-YYYY   - Tasks starting or due in a date range
    show <id>                    - Show one task
    done <id>                    - Mark a task as done
    delete <id>                  - Delete a task
    edit <id>                    - Edit a task
    help                         - Show this message
    exit / quit                  - Leave
";

pub fn print_help(binary_name: &str) {
    println!(
        "Agenda v{} - A small command-line TODO manager",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [--root <path>] [--file <path>]", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config, data and logs.");
    println!("    -f, --file <path>     Read and write tasks from this JSON file.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("Dates are entered as DD-MM-YYYY HH:MM (e.g. 25-02-2026 14:30).");
    println!("Priorities are low, medium or high.");
    println!("{}", COMMAND_HELP.trim_end());
}

/// Parsed process arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub file: Option<PathBuf>,
    pub help: bool,
}

impl CliArgs {
    /// Parses everything after the binary name.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let mut parsed = CliArgs::default();
        let mut iter = args.iter().map(|a| a.as_ref());
        while let Some(arg) = iter.next() {
            match arg {
                "-h" | "--help" | "help" => parsed.help = true,
                "-r" | "--root" => match iter.next() {
                    Some(p) => parsed.root = Some(PathBuf::from(p)),
                    None => bail!("{} requires a path", arg),
                },
                "-f" | "--file" => match iter.next() {
                    Some(p) => parsed.file = Some(PathBuf::from(p)),
                    None => bail!("{} requires a path", arg),
                },
                other => bail!("Unknown argument '{}'. Try --help.", other),
            }
        }
        Ok(parsed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Command {
    Add,
    List,
    Show,
    Done,
    Delete,
    Edit,
    Help,
    #[strum(serialize = "exit", serialize = "quit")]
    Exit,
}

/// Maps `list` arguments to a filter. `None` means the arguments were not
/// understood at all.
pub fn parse_filter(args: &[&str]) -> Option<TaskResult<TaskFilter>> {
    match args {
        [] => Some(Ok(TaskFilter::All)),
        ["today"] => Some(Ok(TaskFilter::Today)),
        ["done"] => Some(Ok(TaskFilter::Done)),
        ["pending"] => Some(Ok(TaskFilter::Pending)),
        [from, to] => Some(TaskFilter::date_range(from, to)),
        _ => None,
    }
}

enum Flow {
    Continue,
    Quit,
}

pub struct Repl<R, W> {
    input: R,
    output: W,
    controller: TaskController,
    confirm_delete: bool,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(input: R, output: W, controller: TaskController) -> Self {
        Self {
            input,
            output,
            controller,
            confirm_delete: true,
        }
    }

    pub fn confirm_delete(mut self, confirm: bool) -> Self {
        self.confirm_delete = confirm;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Reads one trimmed line. `None` on end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim().to_string()))
    }

    fn print(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    fn say(&mut self, msg: &str) -> Result<()> {
        self.print(&format!("  {}", msg))
    }

    /// Asks until the answer is non-empty and passes `check`.
    fn prompt_field(
        &mut self,
        label: &'static str,
        check: impl Fn(&str) -> TaskResult<()>,
    ) -> Result<Option<String>> {
        loop {
            let Some(value) = self.read_line(&format!("  {}: ", label))? else {
                return Ok(None);
            };
            if let Err(e) = require_text(&value, label) {
                self.say(&e.to_string())?;
                continue;
            }
            if let Err(e) = check(&value) {
                self.say(&format!("Error: {}", e))?;
                continue;
            }
            return Ok(Some(value));
        }
    }

    /// Runs until `exit`, `quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "TODO List CLI - Type 'help' for available commands."
        )?;
        loop {
            let Some(line) = self.read_line("todo> ")? else {
                writeln!(self.output, "\nGoodbye!")?;
                break;
            };
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split_whitespace();
            let name = parts.next().unwrap_or_default();
            let args: Vec<&str> = parts.collect();

            let Ok(command) = Command::from_str(name) else {
                self.say(&format!(
                    "Unknown command '{}'. Type 'help' for the list of commands.",
                    name.to_lowercase()
                ))?;
                continue;
            };

            match self.dispatch(command, &args) {
                Ok(Flow::Quit) => {
                    writeln!(self.output, "Goodbye!")?;
                    break;
                }
                Ok(Flow::Continue) => {}
                Err(CommandError::Task(e)) => self.say(&format!("Error: {}", e))?,
                Err(CommandError::Storage(e)) => {
                    log::error!("Command '{}' failed: {:#}", name, e);
                    self.say(&format!("Unexpected error: {:#}", e))?;
                }
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, command: Command, args: &[&str]) -> CommandResult<Flow> {
        log::debug!("Running {:?} {:?}", command, args);
        match command {
            Command::Add => self.cmd_add()?,
            Command::List => self.cmd_list(args)?,
            Command::Show => self.cmd_show(args)?,
            Command::Done => self.cmd_done(args)?,
            Command::Delete => self.cmd_delete(args)?,
            Command::Edit => self.cmd_edit(args)?,
            Command::Help => self.print(COMMAND_HELP.trim_end())?,
            Command::Exit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Reads the numeric id argument, printing usage when it is missing or bad.
    fn parse_id(&mut self, args: &[&str], usage: &str) -> Result<Option<u32>> {
        let Some(raw) = args.first() else {
            self.say(&format!("Usage: {}", usage))?;
            return Ok(None);
        };
        match raw.parse::<u32>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                self.say("The id must be a number.")?;
                Ok(None)
            }
        }
    }

    fn cmd_add(&mut self) -> CommandResult<()> {
        self.print("Create a new task:")?;
        let Some(fields) = self.collect_new_task()? else {
            return Ok(());
        };
        let task = self.controller.add_task(&fields)?;
        self.say(&format!("Task #{} created.", task.id))?;
        Ok(())
    }

    fn collect_new_task(&mut self) -> Result<Option<NewTask>> {
        let Some(title) = self.prompt_field("Title", |_| Ok(()))? else {
            return Ok(None);
        };
        let Some(description) = self.prompt_field("Description", |_| Ok(()))? else {
            return Ok(None);
        };
        let Some(deadline) = self.prompt_field(
            "Deadline (DD-MM-YYYY HH:MM)",
            |s| validate_future_date(s).map(|_| ()),
        )?
        else {
            return Ok(None);
        };
        let Some(start_time) =
            self.prompt_field("Start (DD-MM-YYYY HH:MM)", |s| parse_date(s).map(|_| ()))?
        else {
            return Ok(None);
        };
        let Some(end_time) = self.prompt_field("End (DD-MM-YYYY HH:MM)", |_| Ok(()))? else {
            return Ok(None);
        };
        // An invalid interval abandons the whole add.
        if let Err(e) = validate_time_interval(&start_time, &end_time) {
            self.say(&format!("Error: {}", e))?;
            return Ok(None);
        }
        let Some(priority) = self.prompt_field(
            "Priority (low/medium/high)",
            |s| validate_priority(s).map(|_| ()),
        )?
        else {
            return Ok(None);
        };
        Ok(Some(NewTask {
            title,
            description,
            deadline,
            start_time,
            end_time,
            priority,
        }))
    }

    fn cmd_list(&mut self, args: &[&str]) -> CommandResult<()> {
        let store = self.controller.snapshot()?;
        if store.is_empty() {
            self.say("No tasks.")?;
            return Ok(());
        }
        let Some(filter) = parse_filter(args) else {
            self.say(
                "Unknown argument. Use: list / list today / list done / list pending / list DD-MM-YYYY DD-MM-YYYY",
            )?;
            return Ok(());
        };
        let tasks = store.filter(&filter?)?;
        if tasks.is_empty() {
            self.say("No tasks match.")?;
            return Ok(());
        }
        for task in tasks {
            self.print(&task.to_display_string())?;
        }
        Ok(())
    }

    fn cmd_show(&mut self, args: &[&str]) -> CommandResult<()> {
        let Some(id) = self.parse_id(args, "show <id>")? else {
            return Ok(());
        };
        let task = self.controller.show(id)?;
        self.print(&task.to_display_string())?;
        Ok(())
    }

    fn cmd_done(&mut self, args: &[&str]) -> CommandResult<()> {
        let Some(id) = self.parse_id(args, "done <id>")? else {
            return Ok(());
        };
        self.controller.mark_done(id)?;
        self.say(&format!("Task #{} marked as done.", id))?;
        Ok(())
    }

    fn cmd_delete(&mut self, args: &[&str]) -> CommandResult<()> {
        let Some(id) = self.parse_id(args, "delete <id>")? else {
            return Ok(());
        };
        let task = self.controller.show(id)?;
        if self.confirm_delete {
            let answer = self
                .read_line(&format!(
                    "  Are you sure you want to delete '{}'? (yes/no): ",
                    task.title
                ))?
                .unwrap_or_default()
                .to_lowercase();
            if answer != "yes" && answer != "y" {
                self.say("Deletion cancelled.")?;
                return Ok(());
            }
        }
        self.controller.delete_task(id)?;
        self.say(&format!("Task #{} deleted.", id))?;
        Ok(())
    }

    fn cmd_edit(&mut self, args: &[&str]) -> CommandResult<()> {
        let Some(id) = self.parse_id(args, "edit <id>")? else {
            return Ok(());
        };
        let task = self.controller.show(id)?;
        self.say(&format!(
            "Editing task #{} (press Enter to keep the current value):",
            id
        ))?;

        let current = [
            ("Title", task.title.clone()),
            ("Description", task.description.clone()),
            ("Deadline", format_date(&task.deadline)),
            ("Start", format_date(&task.start_time)),
            ("End", format_date(&task.end_time)),
            ("Priority", task.priority.to_string()),
        ];
        let mut answers = Vec::with_capacity(current.len());
        for (label, value) in &current {
            let answer = self
                .read_line(&format!("  {} [{}]: ", label, value))?
                .filter(|a| !a.is_empty());
            answers.push(answer);
        }
        let mut answers = answers.into_iter();
        let mut next = || answers.next().flatten();
        let changes = TaskEdit {
            title: next(),
            description: next(),
            deadline: next(),
            start_time: next(),
            end_time: next(),
            priority: next(),
        };

        if changes.is_empty() {
            self.say("Nothing changed.")?;
            return Ok(());
        }
        let report = self.controller.edit_task(id, &changes)?;
        for (field, err) in &report.rejected {
            self.say(&format!("Error: {} - {} kept.", err, field))?;
        }
        if report.applied.is_empty() {
            self.say("Nothing changed.")?;
        } else {
            self.say(&format!("Task #{} updated.", id))?;
        }
        Ok(())
    }
}

mod cli;
mod logging;
mod model;
mod notifier;
mod output;
mod project;
mod reminder;
mod storage;
mod store;
mod tui;
mod watch;

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;

use cli::{Cli, Command};
use model::{parse_deadline, Category, Priority};
use storage::Storage;
use store::TaskStore;

fn default_store_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".nudge").join("tasks.json"))
}

fn resolve_store_path(cli_file: Option<String>) -> Result<PathBuf> {
    match cli_file {
        Some(p) => Ok(PathBuf::from(p)),
        None => default_store_path(),
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{prompt}");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let path = resolve_store_path(cli.file)?;
    ensure_parent_dir(&path)?;

    // Logs live next to the task file; failing to set them up is not fatal.
    let _logger = path.parent().and_then(|dir| logging::init(&dir.join("logs")).ok());

    let mut store = TaskStore::open(Storage::new(&path))?;

    match cli.command {
        Command::Add {
            text,
            deadline,
            priority,
            category,
        } => {
            let deadline = parse_deadline(&deadline)?;
            let priority = Priority::parse(&priority)?;
            let category = Category::parse(&category)?;
            let task = store.create(&text, Some(deadline), priority, category, Local::now())?;
            eprintln!("Added task {} '{}'", task.id, task.text);
        }

        Command::Edit {
            id,
            text,
            deadline,
            priority,
            category,
        } => {
            let current = match store.get(id) {
                Some(t) => t.clone(),
                None => bail!("no task with id {id}"),
            };
            let text = text.unwrap_or(current.text);
            let deadline = match deadline {
                Some(s) => Some(parse_deadline(&s)?),
                None => current.deadline,
            };
            let priority = match priority {
                Some(s) => Priority::parse(&s)?,
                None => current.priority,
            };
            let category = match category {
                Some(s) => Category::parse(&s)?,
                None => current.category,
            };
            store.update(id, &text, deadline, priority, category)?;
            eprintln!("Updated task {id}");
        }

        Command::Toggle { id } => {
            store.toggle_done(id)?;
            let state = if store.get(id).is_some_and(|t| t.done) {
                "done"
            } else {
                "not done"
            };
            eprintln!("Task {id} is now {state}");
        }

        Command::Rm { id, yes } => {
            let text = match store.get(id) {
                Some(t) => t.text.clone(),
                None => bail!("no task with id {id}"),
            };
            if !yes && !confirm(&format!("Delete task '{text}'? [y/N] "))? {
                eprintln!("Canceled");
                return Ok(());
            }
            store.delete(id)?;
            eprintln!("Deleted task {id}");
        }

        Command::Show { id } => {
            let task = match store.get(id) {
                Some(t) => t,
                None => bail!("no task with id {id}"),
            };
            print!(
                "{}",
                output::format_task_detail(task, project::due_status(task, Local::now()))
            );
        }

        Command::List { search, json } => {
            let rows = project::project(store.tasks(), &search, Local::now());
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                eprintln!("No tasks found.");
            } else {
                print!("{}", output::format_task_list(&rows));
            }
        }

        Command::Remind { interval, once } => {
            let interval = interval
                .map(Duration::from_millis)
                .unwrap_or(reminder::POLL_INTERVAL);
            let mut notifier = notifier::detect();
            reminder::run(&mut store, notifier.as_mut(), interval, once)?;
        }

        Command::Tui => {
            tui::run(&mut store)?;
        }
    }

    Ok(())
}

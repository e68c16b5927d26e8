use std::process::Command;

use anyhow::{bail, Context, Result};
use log::warn;

use crate::model::Task;

/// Delivery seam for the reminder scheduler.
pub trait Notifier {
    fn deliver(&mut self, task: &Task) -> Result<()>;
}

/// Guaranteed channel: terminal bell plus a message on stderr.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn deliver(&mut self, task: &Task) -> Result<()> {
        eprintln!("\x07Reminder: task \"{}\" is due!", task.text);
        Ok(())
    }
}

/// Best-effort channel: spawns an external notifier command per reminder.
/// The command receives a summary and a body argument, matching the
/// `notify-send` convention.
pub struct CommandNotifier {
    argv: Vec<String>,
}

impl CommandNotifier {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    /// Command string from `NUDGE_NOTIFY_CMD`, defaulting to `notify-send`.
    pub fn from_env() -> Option<Self> {
        let raw = std::env::var("NUDGE_NOTIFY_CMD").unwrap_or_else(|_| "notify-send".to_string());
        let argv = shlex::split(&raw)?;
        if argv.is_empty() {
            return None;
        }
        Some(Self::new(argv))
    }
}

impl Notifier for CommandNotifier {
    fn deliver(&mut self, task: &Task) -> Result<()> {
        let body = format!("Task \"{}\" is due!", task.text);
        let status = Command::new(&self.argv[0])
            .args(&self.argv[1..])
            .arg("Reminder")
            .arg(&body)
            .status()
            .with_context(|| format!("failed to run notifier '{}'", self.argv[0]))?;
        if !status.success() {
            bail!("notifier '{}' exited with status {status}", self.argv[0]);
        }
        Ok(())
    }
}

/// Tries the best-effort channel, falling back to the guaranteed one when it
/// fails. The failure is logged, not retried.
pub struct WithFallback {
    primary: CommandNotifier,
    fallback: ConsoleNotifier,
}

impl Notifier for WithFallback {
    fn deliver(&mut self, task: &Task) -> Result<()> {
        if let Err(e) = self.primary.deliver(task) {
            warn!("desktop notification failed, falling back to console: {e:#}");
            return self.fallback.deliver(task);
        }
        Ok(())
    }
}

fn display_available() -> bool {
    std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some()
}

/// Channel selection: the external command when a graphical session is
/// detectable and a command is configured, otherwise the console. A headless
/// host never attempts the desktop channel.
pub fn detect() -> Box<dyn Notifier> {
    if display_available() {
        if let Some(primary) = CommandNotifier::from_env() {
            return Box::new(WithFallback {
                primary,
                fallback: ConsoleNotifier,
            });
        }
    }
    Box::new(ConsoleNotifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Priority};

    fn make_task(text: &str) -> Task {
        Task {
            id: 1,
            text: text.to_string(),
            done: false,
            deadline: None,
            priority: Priority::default(),
            category: Category::default(),
            reminded_at: false,
        }
    }

    #[test]
    fn console_always_delivers() {
        assert!(ConsoleNotifier.deliver(&make_task("t")).is_ok());
    }

    #[test]
    fn failing_command_is_an_error() {
        let mut notifier = CommandNotifier::new(vec!["false".to_string()]);
        assert!(notifier.deliver(&make_task("t")).is_err());
    }

    #[test]
    fn missing_command_is_an_error() {
        let mut notifier = CommandNotifier::new(vec!["nudge-no-such-notifier".to_string()]);
        assert!(notifier.deliver(&make_task("t")).is_err());
    }

    #[test]
    fn fallback_absorbs_primary_failure() {
        let mut notifier = WithFallback {
            primary: CommandNotifier::new(vec!["false".to_string()]),
            fallback: ConsoleNotifier,
        };
        assert!(notifier.deliver(&make_task("t")).is_ok());
    }
}

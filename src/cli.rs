use clap::{Parser, Subcommand};

use crate::model::TaskId;

#[derive(Parser)]
#[command(name = "nudge", about = "Personal task tracker with deadline reminders")]
pub struct Cli {
    /// Path to the task file [default: ~/.nudge/tasks.json]
    #[arg(long, env = "NUDGE_FILE", global = true)]
    pub file: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add a task
    Add {
        /// Task text
        text: String,
        /// Deadline (YYYY-MM-DD [HH:MM])
        #[arg(short, long)]
        deadline: String,
        /// Priority (high, medium, low)
        #[arg(short, long, default_value = "low")]
        priority: String,
        /// Category (work, personal, college, other)
        #[arg(short, long, default_value = "work")]
        category: String,
    },

    /// Edit a task; omitted fields keep their current value
    Edit {
        /// Task id
        id: TaskId,
        /// New text
        #[arg(short, long)]
        text: Option<String>,
        /// New deadline (may be in the past)
        #[arg(short, long)]
        deadline: Option<String>,
        /// New priority
        #[arg(short, long)]
        priority: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Toggle a task between done and not done
    Toggle {
        /// Task id
        id: TaskId,
    },

    /// Remove a task
    Rm {
        /// Task id
        id: TaskId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show task details
    Show {
        /// Task id
        id: TaskId,
    },

    /// List tasks, sorted and annotated
    List {
        /// Case-insensitive substring filter
        #[arg(short, long, default_value = "")]
        search: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the reminder loop in the foreground
    Remind {
        /// Scan period in milliseconds [default: 5000]
        #[arg(long)]
        interval: Option<u64>,
        /// Run a single scan and exit
        #[arg(long)]
        once: bool,
    },

    /// Launch the interactive TUI
    Tui,
}

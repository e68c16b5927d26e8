mod app;
mod event;
mod render;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Local;
use crossterm::event::{self as ct_event, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::prelude::*;

use crate::model::Task;
use crate::notifier::Notifier;
use crate::reminder;
use crate::store::TaskStore;
use crate::watch;
use app::App;
use event::KeyAction;

/// Collects reminders fired during a scheduler tick. The modal popup is the
/// guaranteed delivery channel while the TUI owns the terminal.
struct Inbox {
    lines: Vec<String>,
}

impl Notifier for Inbox {
    fn deliver(&mut self, task: &Task) -> Result<()> {
        self.lines.push(format!("Task \"{}\" is due!", task.text));
        Ok(())
    }
}

pub fn run(store: &mut TaskStore) -> Result<()> {
    let mut app = App::new(store);

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, store);

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    store: &mut TaskStore,
) -> Result<()> {
    // Watch for writes from concurrent nudge processes
    let (_watcher, rx) = watch::watch_store(store.path())?;

    let mut inbox = Inbox { lines: Vec::new() };
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if ct_event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = ct_event::read()? {
                if key.kind == KeyEventKind::Press {
                    match event::handle_key(app, key) {
                        KeyAction::Quit => return Ok(()),
                        KeyAction::Submit => app.submit_form(store),
                        KeyAction::Edit => app.enter_edit_form(store),
                        KeyAction::Toggle => app.toggle_selected(store),
                        KeyAction::ConfirmDelete => app.confirm_delete(store),
                        KeyAction::Refresh => app.refresh(store),
                        KeyAction::Continue => {}
                    }
                }
            }
        }

        // External edits to the task file refresh the view.
        if watch::changed(&rx) {
            store.reload()?;
            app.refresh(store);
        }

        // Scheduler tick on the poll period, against the live store state.
        if last_tick.elapsed() >= reminder::POLL_INTERVAL {
            last_tick = Instant::now();
            if reminder::tick(store, Local::now(), &mut inbox) > 0 {
                app.refresh(store);
            }
        }

        // Fired reminders surface as the modal popup once the list view is
        // idle; a form or dialog in progress is never interrupted.
        if !inbox.lines.is_empty() && app.idle() {
            let lines = std::mem::take(&mut inbox.lines);
            app.show_reminders(lines);
        }
    }
}

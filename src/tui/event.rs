use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, Mode};

/// What the caller should do after a key press. Actions that touch the
/// store are returned instead of handled here.
pub enum KeyAction {
    Quit,
    Submit,
    Edit,
    Toggle,
    ConfirmDelete,
    Refresh,
    Continue,
}

pub fn handle_key(app: &mut App, key: KeyEvent) -> KeyAction {
    match app.mode {
        Mode::Normal => match key.code {
            KeyCode::Char('q') => KeyAction::Quit,
            KeyCode::Char('j') | KeyCode::Down => {
                app.move_down();
                KeyAction::Continue
            }
            KeyCode::Char('k') | KeyCode::Up => {
                app.move_up();
                KeyAction::Continue
            }
            KeyCode::Char('/') => {
                app.mode = Mode::Search;
                KeyAction::Continue
            }
            KeyCode::Char('a') => {
                app.enter_add_form();
                KeyAction::Continue
            }
            KeyCode::Char('e') => KeyAction::Edit,
            KeyCode::Char(' ') | KeyCode::Enter => KeyAction::Toggle,
            KeyCode::Char('d') => {
                app.request_delete();
                KeyAction::Continue
            }
            KeyCode::Char('r') => KeyAction::Refresh,
            KeyCode::Char('?') => {
                app.toggle_help();
                KeyAction::Continue
            }
            _ => KeyAction::Continue,
        },

        Mode::Search => match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                app.mode = Mode::Normal;
                KeyAction::Continue
            }
            KeyCode::Char(c) => {
                app.search.push(c);
                KeyAction::Refresh
            }
            KeyCode::Backspace => {
                app.search.pop();
                KeyAction::Refresh
            }
            _ => KeyAction::Continue,
        },

        Mode::Form => {
            if key.code == KeyCode::Esc {
                app.cancel_form();
                return KeyAction::Continue;
            }
            if key.code == KeyCode::Enter {
                return KeyAction::Submit;
            }
            let Some(form) = app.form.as_mut() else {
                app.mode = Mode::Normal;
                return KeyAction::Continue;
            };
            match key.code {
                KeyCode::Tab | KeyCode::Down => form.next_field(),
                KeyCode::BackTab | KeyCode::Up => form.prev_field(),
                KeyCode::Right => form.cycle_forward(),
                KeyCode::Left => form.cycle_back(),
                KeyCode::Char(c) => match form.focused_buf_mut() {
                    Some(buf) => buf.push(c),
                    None if c == ' ' => form.cycle_forward(),
                    None => {}
                },
                KeyCode::Backspace => {
                    if let Some(buf) = form.focused_buf_mut() {
                        buf.pop();
                    }
                }
                _ => {}
            }
            KeyAction::Continue
        }

        Mode::Confirm => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => KeyAction::ConfirmDelete,
            _ => {
                app.cancel_delete();
                KeyAction::Continue
            }
        },

        Mode::Message => {
            app.dismiss_message();
            KeyAction::Continue
        }

        Mode::Help => {
            app.toggle_help();
            KeyAction::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage;
    use crate::store::TaskStore;

    fn empty_app() -> (App, tempfile::TempDir) {
        let (st, dir) = storage::temp();
        let store = TaskStore::open(st).unwrap();
        (App::new(&store), dir)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn q_quits_from_normal_mode() {
        let (mut app, _dir) = empty_app();
        assert!(matches!(
            handle_key(&mut app, press(KeyCode::Char('q'))),
            KeyAction::Quit
        ));
    }

    #[test]
    fn search_mode_collects_typed_characters() {
        let (mut app, _dir) = empty_app();
        handle_key(&mut app, press(KeyCode::Char('/')));
        assert_eq!(app.mode, Mode::Search);
        handle_key(&mut app, press(KeyCode::Char('m')));
        handle_key(&mut app, press(KeyCode::Char('i')));
        handle_key(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.search, "m");
        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn n_in_confirm_mode_cancels() {
        let (mut app, _dir) = empty_app();
        app.pending_delete = Some((1, "t".to_string()));
        app.mode = Mode::Confirm;
        handle_key(&mut app, press(KeyCode::Char('n')));
        assert!(app.pending_delete.is_none());
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn y_in_confirm_mode_requests_deletion() {
        let (mut app, _dir) = empty_app();
        app.mode = Mode::Confirm;
        assert!(matches!(
            handle_key(&mut app, press(KeyCode::Char('y'))),
            KeyAction::ConfirmDelete
        ));
    }
}

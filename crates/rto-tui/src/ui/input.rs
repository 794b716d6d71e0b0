//! Keyboard input handling for the TUI.
//!
//! Translates key events into `App` method calls.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, View};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Any keypress clears the previous status message
    app.status_message = None;

    // Form and search overlays take every key, including the global ones
    if matches!(app.state, AppState::Editing) {
        handle_form_input(app, key);
        return Ok(false);
    }
    if matches!(app.state, AppState::SearchingEvents) {
        handle_search_input(app, key);
        return Ok(false);
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.request_quit();
            return Ok(matches!(app.state, AppState::Quitting));
        }
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('c') => app.set_view(View::Calendar),
        KeyCode::Char('v') => app.set_view(View::Vacations),
        KeyCode::Char('o') => app.set_view(View::Holidays),
        KeyCode::Char('y') => app.set_view(View::Year),
        KeyCode::Char('p') => app.set_view(View::Settings),
        KeyCode::Char('[') => app.prev_period(),
        KeyCode::Char(']') => app.next_period(),
        KeyCode::Char('t') => app.jump_to_today(),
        KeyCode::Tab => app.cycle_period_file(),
        KeyCode::Char('s') => app.save(),
        KeyCode::Char('g') => app.backup(),
        _ => match app.view {
            View::Calendar => handle_calendar_input(app, key),
            View::Vacations | View::Holidays | View::Settings => handle_list_input(app, key),
            View::Year => {}
        },
    }

    Ok(false)
}

fn handle_calendar_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => app.move_selection(-1),
        KeyCode::Right | KeyCode::Char('l') => app.move_selection(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-7),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(7),
        KeyCode::Char('b') => app.toggle_badge(),
        KeyCode::Char('f') => app.toggle_flex(),
        KeyCode::Char('w') => app.toggle_what_if(),
        KeyCode::Esc if app.in_what_if() => app.toggle_what_if(),
        KeyCode::Char('a') => app.start_add_event(),
        KeyCode::Char('d') => app.start_delete_event(),
        KeyCode::Char('/') => app.start_search(),
        _ => {}
    }
}

fn handle_list_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.list_up(),
        KeyCode::Down | KeyCode::Char('j') => app.list_down(),
        KeyCode::Char('a') => app.start_add(),
        KeyCode::Char('e') | KeyCode::Enter => app.start_edit(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Esc => app.set_view(View::Calendar),
        _ => {}
    }
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Enter => app.submit_form(),
        code => {
            let Some(form) = app.form.as_mut() else {
                app.state = AppState::Normal;
                return;
            };
            match code {
                KeyCode::Tab | KeyCode::Down => form.next_field(),
                KeyCode::BackTab | KeyCode::Up => form.prev_field(),
                KeyCode::Backspace => form.pop(),
                KeyCode::Char(c) => form.push(c),
                _ => {}
            }
        }
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_search(),
        KeyCode::Enter => app.finish_search(),
        KeyCode::Up => app.search_up(),
        KeyCode::Down => app.search_down(),
        KeyCode::Backspace => app.search_pop(),
        KeyCode::Char(c) => app.search_push(c),
        _ => {}
    }
}

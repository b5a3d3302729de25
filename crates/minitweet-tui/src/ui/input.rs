//! Keyboard input handling for the TUI.
//!
//! This module translates key events into application state changes. Each
//! view has its own handler; overlays take precedence.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{
    can_add_email_char, can_add_password_char, can_add_post_char, can_add_username_char, App,
    AppState, LoginFocus, SignupFocus, View,
};

/// Number of lines to scroll on page up/down
const PAGE_SCROLL_SIZE: u16 = 10;

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return false;
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return false;
    }

    // A status message lasts until the next key press
    app.status_message = None;

    match app.view {
        View::Login if !app.is_authenticated() => handle_login_input(app, key),
        View::Signup if !app.is_authenticated() => handle_signup_input(app, key),
        _ if app.is_authenticated() => handle_feed_input(app, key),
        _ => handle_anonymous_input(app, key),
    }
    false
}

fn handle_anonymous_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('l') => app.start_login(),
        KeyCode::Char('s') => app.start_signup(),
        KeyCode::Char('f') => app.show_feed(),
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('q') | KeyCode::Esc => app.state = AppState::ConfirmingQuit,
        _ => {}
    }
}

fn handle_feed_input(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('r') if ctrl => app.request_feed(),
        KeyCode::Char('o') if ctrl => app.logout(),
        KeyCode::Esc => app.state = AppState::ConfirmingQuit,
        // '?' opens help only when it would not be part of a sentence
        KeyCode::Char('?') if app.composer.draft().is_empty() => app.state = AppState::ShowingHelp,
        KeyCode::Up => app.scroll_feed_up(1),
        KeyCode::Down => app.scroll_feed_down(1),
        KeyCode::PageUp => app.scroll_feed_up(PAGE_SCROLL_SIZE),
        KeyCode::PageDown => app.scroll_feed_down(PAGE_SCROLL_SIZE),
        // Drafts are frozen while a post is in flight
        _ if app.post_in_flight => {}
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
            app.composer.push_char('\n');
        }
        KeyCode::Enter => app.submit_post(),
        KeyCode::Backspace => {
            app.composer.pop_char();
        }
        KeyCode::Char(c) if !ctrl => {
            if can_add_post_char(c) {
                app.composer.push_char(c);
            }
        }
        _ => {}
    }
}

fn handle_login_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.show_feed(),
        KeyCode::Down | KeyCode::Tab => app.login_focus = app.login_focus.next(),
        KeyCode::Up | KeyCode::BackTab => app.login_focus = app.login_focus.prev(),
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Email => app.login_focus = LoginFocus::Password,
            LoginFocus::Password | LoginFocus::Button => app.submit_login(),
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Email => {
                app.login_email.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Email => {
                if can_add_email_char(app.login_email.len(), c) {
                    app.login_email.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.len(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
}

fn handle_signup_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.show_feed(),
        KeyCode::Down | KeyCode::Tab => app.signup_focus = app.signup_focus.next(),
        KeyCode::Up | KeyCode::BackTab => app.signup_focus = app.signup_focus.prev(),
        KeyCode::Enter => match app.signup_focus {
            SignupFocus::Username | SignupFocus::Email => {
                app.signup_focus = app.signup_focus.next();
            }
            SignupFocus::Password | SignupFocus::Button => app.submit_signup(),
        },
        KeyCode::Backspace => match app.signup_focus {
            SignupFocus::Username => {
                app.signup_username.pop();
            }
            SignupFocus::Email => {
                app.signup_email.pop();
            }
            SignupFocus::Password => {
                app.signup_password.pop();
            }
            SignupFocus::Button => {}
        },
        KeyCode::Char(c) => match app.signup_focus {
            SignupFocus::Username => {
                if can_add_username_char(app.signup_username.len(), c) {
                    app.signup_username.push(c);
                }
            }
            SignupFocus::Email => {
                if can_add_email_char(app.signup_email.len(), c) {
                    app.signup_email.push(c);
                }
            }
            SignupFocus::Password => {
                if can_add_password_char(app.signup_password.len(), c) {
                    app.signup_password.push(c);
                }
            }
            SignupFocus::Button => {}
        },
        _ => {}
    }
}

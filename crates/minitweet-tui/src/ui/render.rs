use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use minitweet_core::MAX_POST_LENGTH;

use crate::app::{App, AppState, LoginFocus, SignupFocus, View};
use crate::utils::{format_timestamp, mask, relative_age, truncate_string};

use super::styles;

/// Width of text inputs in the login/signup dialogs
const FIELD_WIDTH: usize = 24;

/// Height of the compose box including borders
const COMPOSE_HEIGHT: u16 = 6;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(8),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::Normal | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Mini Twitter";

    // Navigation mirrors the session: feed/logout when signed in,
    // login/signup otherwise
    let nav: Vec<(&str, bool)> = if app.is_authenticated() {
        vec![("[^R] Refresh", false), ("[^O] Logout", false)]
    } else {
        vec![
            ("[f] Feed", app.view == View::Feed),
            ("[l] Login", app.view == View::Login),
            ("[s] Signup", app.view == View::Signup),
        ]
    };

    let nav_width: usize = nav.iter().map(|(l, _)| l.len()).sum::<usize>() + (nav.len() - 1) * 3;
    let padding = (area.width as usize).saturating_sub(title.len() + nav_width + 2);

    let mut spans = vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(padding)),
    ];
    for (i, (label, selected)) in nav.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        spans.push(Span::styled(*label, styles::nav_style(*selected)));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.view {
        View::Login if !app.is_authenticated() => render_login_form(frame, app, area),
        View::Signup if !app.is_authenticated() => render_signup_form(frame, app, area),
        _ if app.is_authenticated() => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(COMPOSE_HEIGHT), Constraint::Min(3)])
                .split(area);
            render_compose_box(frame, app, chunks[0]);
            render_feed(frame, app, chunks[1]);
        }
        _ => {
            let prompt = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("  Login to view tweets.", styles::muted_style())),
            ]);
            frame.render_widget(prompt, area);
        }
    }
}

fn render_compose_box(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    if let Some(ref error) = app.compose_error {
        lines.push(Line::from(Span::styled(error.clone(), styles::error_style())));
    }

    if app.composer.draft().is_empty() {
        lines.push(Line::from(Span::styled("What's happening?", styles::muted_style())));
    } else {
        let mut draft_lines = app.composer.draft().split('\n').peekable();
        while let Some(text) = draft_lines.next() {
            let cursor = if draft_lines.peek().is_none() { "▌" } else { "" };
            lines.push(Line::from(Span::styled(
                format!("{}{}", text, cursor),
                styles::text_style(),
            )));
        }
    }

    let counter = if app.post_in_flight {
        " posting... ".to_string()
    } else {
        format!(" {}/{} ", MAX_POST_LENGTH - app.composer.remaining(), MAX_POST_LENGTH)
    };

    let block = Block::default()
        .title(Span::styled(" Tweet [Enter] ", styles::title_style()))
        .title_bottom(Line::from(Span::styled(counter, styles::muted_style())).right_aligned())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_feed(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Span::styled(" Latest Tweets ", styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let posts = app.feed.posts();
    if posts.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            " No tweets yet.",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for post in posts {
        lines.push(Line::from(vec![
            Span::styled(post.handle(), styles::author_style()),
            Span::styled(" — ", styles::muted_style()),
            Span::styled(format_timestamp(&post.created_at), styles::muted_style()),
        ]));
        for text in post.content.lines() {
            lines.push(Line::from(Span::styled(text.to_string(), styles::text_style())));
        }
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.feed_scroll, 0));
    frame.render_widget(paragraph, area);
}

/// Render a labelled text field line
fn field_line<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::text_style()
    };
    let cursor = if focused { "▌" } else { " " };
    let shown = truncate_string(&value, FIELD_WIDTH);
    Line::from(vec![
        Span::styled(format!("  {:>9}: [", label), styles::muted_style()),
        Span::styled(format!("{:<width$}{}", shown, cursor, width = FIELD_WIDTH), style),
        Span::styled("]", styles::muted_style()),
    ])
}

fn button_line(label: &str, focused: bool, busy: bool) -> Line<'static> {
    let text = if busy {
        "   ...   ".to_string()
    } else if focused {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    let style = if focused {
        styles::selected_style()
    } else {
        styles::text_style()
    };
    Line::from(vec![
        Span::raw("               ["),
        Span::styled(text, style),
        Span::raw("]"),
    ])
}

fn form_block(title: &str) -> Block<'_> {
    Block::default()
        .title(Span::styled(format!(" {} ", title), styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default())
}

fn render_login_form(frame: &mut Frame, app: &App, area: Rect) {
    let height = if app.login_error.is_some() { 9 } else { 7 };
    let area = centered_rect_fixed(46, height, area);
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(""),
        field_line("Email", app.login_email.clone(), app.login_focus == LoginFocus::Email),
        field_line(
            "Password",
            mask(&app.login_password, FIELD_WIDTH),
            app.login_focus == LoginFocus::Password,
        ),
        Line::from(""),
        button_line("Login", app.login_focus == LoginFocus::Button, app.auth_in_flight),
    ];

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", error), styles::error_style())));
    }

    frame.render_widget(Paragraph::new(lines).block(form_block("Login")), area);
}

fn render_signup_form(frame: &mut Frame, app: &App, area: Rect) {
    let height = if app.signup_error.is_some() { 10 } else { 8 };
    let area = centered_rect_fixed(46, height, area);
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(""),
        field_line(
            "Username",
            app.signup_username.clone(),
            app.signup_focus == SignupFocus::Username,
        ),
        field_line("Email", app.signup_email.clone(), app.signup_focus == SignupFocus::Email),
        field_line(
            "Password",
            mask(&app.signup_password, FIELD_WIDTH),
            app.signup_focus == SignupFocus::Password,
        ),
        Line::from(""),
        button_line("Signup", app.signup_focus == SignupFocus::Button, app.auth_in_flight),
    ];

    if let Some(ref error) = app.signup_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", error), styles::error_style())));
    }

    frame.render_widget(Paragraph::new(lines).block(form_block("Signup")), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else if app.feed_in_flight > 0 {
        " Refreshing...".to_string()
    } else if let Some(ref at) = app.last_refreshed {
        format!(" Updated {} ", relative_age(at, &chrono::Local::now()))
    } else {
        format!(" {} ", app.api.base_url())
    };
    let right_text = " [?] help | [Esc] quit ";

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(status_line).style(styles::status_bar_style()), area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(50, 19, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");
    let lines = vec![
        Line::from(Span::styled(
            format!("  minitweet {}", version),
            styles::title_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Signed out", styles::highlight_style())),
        help_line("f / l / s", "Feed / login / signup"),
        help_line("Tab", "Next field"),
        help_line("Enter", "Next field or submit"),
        Line::from(""),
        Line::from(Span::styled(" Signed in", styles::highlight_style())),
        help_line("Enter", "Post tweet"),
        help_line("Alt+Enter", "New line in tweet"),
        help_line("Ctrl+R", "Refresh feed"),
        help_line("↑/↓ PgUp", "Scroll feed"),
        help_line("Ctrl+O", "Logout"),
        Line::from(""),
        help_line("Esc", "Back / quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(40, 5, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(
            "  Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

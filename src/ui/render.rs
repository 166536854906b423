//! Pure presentation: everything on screen is re-derived from the current
//! [`App`] state on every draw. The only state this module touches is the
//! interaction chrome ([`ChatUi`]) it is handed, and the one write-back is
//! the measured thread area the scroll math needs.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::app::{App, Notice, View};
use crate::core::message::Message;
use crate::core::session::ChatSession;
use crate::ui::chat_loop::ChatUi;
use crate::ui::theme::Theme;
use crate::utils::sanitize::clean_text;

const USER_PREFIX: &str = "You ▸ ";
const HOME_HINT: &str = "Ctrl+N: new session · ↑/↓ + Enter: open · Ctrl+C: quit";
const CHAT_HINT: &str = "↑/↓: scroll · Esc: home · Ctrl+C: quit";
const WAITING_TEXT: &str = "Waiting for the assistant…";

pub fn draw(f: &mut Frame, app: &App, ui: &mut ChatUi) {
    let background = Block::default().style(ratatui::style::Style::default().bg(ui.theme.background_color));
    f.render_widget(background, f.area());

    match app.view() {
        View::EnterKey => draw_key_entry(f, app, ui),
        View::Home | View::Chat => draw_main(f, app, ui),
    }
}

fn draw_key_entry(f: &mut Frame, app: &App, ui: &ChatUi) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    let title = format!("kaiwa v{}", env!("CARGO_PKG_VERSION"));
    let prompt = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Enter your API key to start chatting.",
            ui.theme.info_style,
        )),
        Line::from(Span::styled(
            "The key is held in memory only and never written to disk.",
            ui.theme.hint_style,
        )),
        Line::from(Span::styled(
            "Press Enter to confirm, Ctrl+C to quit.",
            ui.theme.hint_style,
        )),
    ])
    .block(
        Block::default()
            .title(Span::styled(title, ui.theme.title_style)),
    );
    f.render_widget(prompt, chunks[0]);
    f.render_widget(&ui.key_entry, chunks[1]);
    f.render_widget(
        Paragraph::new(status_line(app, ui, HOME_HINT)),
        chunks[2],
    );
}

fn draw_main(f: &mut Frame, app: &App, ui: &mut ChatUi) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(ui.sidebar_width), Constraint::Min(1)])
        .split(f.area());

    draw_sidebar(f, app, ui, columns[0]);

    match app.view() {
        View::Chat => draw_thread(f, app, ui, columns[1]),
        _ => draw_home(f, app, ui, columns[1]),
    }
}

fn draw_sidebar(f: &mut Frame, app: &App, ui: &ChatUi, area: Rect) {
    let mut lines = Vec::new();

    if app.store.is_empty() {
        lines.push(Line::from(Span::styled(
            "No sessions yet",
            ui.theme.hint_style,
        )));
    }

    let on_home = app.view() == View::Home;
    for (index, session) in app.store.iter().enumerate() {
        let is_active = app.store.active_id() == Some(&session.id);
        let marker = if is_active { "▌ " } else { "  " };
        let mut style = if is_active {
            ui.theme.sidebar_active_style
        } else {
            ui.theme.sidebar_item_style
        };
        if on_home && index == ui.selected {
            style = style.patch(ui.theme.sidebar_selected_style);
        }
        lines.push(Line::from(vec![
            Span::styled(marker.to_string(), style),
            Span::styled(session_label(session), style),
        ]));
    }

    let sidebar = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::RIGHT)
            .border_style(ui.theme.input_border_style)
            .title(Span::styled("Sessions", ui.theme.title_style)),
    );
    f.render_widget(sidebar, area);
}

fn draw_home(f: &mut Frame, app: &App, ui: &ChatUi, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let welcome = Paragraph::new(home_lines(app, &ui.theme)).block(
        Block::default().title(Span::styled(
            format!("kaiwa v{}", env!("CARGO_PKG_VERSION")),
            ui.theme.title_style,
        )),
    );
    f.render_widget(welcome, chunks[0]);
    f.render_widget(Paragraph::new(status_line(app, ui, HOME_HINT)), chunks[1]);
}

fn draw_thread(f: &mut Frame, app: &App, ui: &mut ChatUi, area: Rect) {
    let input_height = composer_height(ui);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(input_height),
        ])
        .split(area);

    let Some(session) = app.store.active_session() else {
        return;
    };

    // The block title consumes the top row; record the text area the scroll
    // math has to work against.
    ui.thread_area = Rect {
        x: chunks[0].x,
        y: chunks[0].y.saturating_add(1),
        width: chunks[0].width,
        height: chunks[0].height.saturating_sub(1),
    };

    let lines = conversation_lines(&session.messages, &ui.theme, ui.thread_area.width);
    let max_offset = (lines.len() as u16).saturating_sub(ui.thread_area.height);
    let offset = if ui.auto_scroll {
        max_offset
    } else {
        ui.scroll_offset.min(max_offset)
    };

    let title = format!(
        "Session {} · {} · logging {}",
        session.id.short(),
        app.settings.model,
        app.logging.status_string()
    );
    let thread = Paragraph::new(lines)
        .block(Block::default().title(Span::styled(title, ui.theme.title_style)))
        .scroll((offset, 0));
    f.render_widget(thread, chunks[0]);

    f.render_widget(Paragraph::new(status_line(app, ui, CHAT_HINT)), chunks[1]);
    f.render_widget(&ui.composer, chunks[2]);
}

/// The thread as styled lines, pre-wrapped to the given width: user turns
/// right-aligned with a prefix, assistant turns left-aligned, one blank line
/// between messages. Content is sanitized before it touches the terminal.
pub fn conversation_lines(messages: &[Message], theme: &Theme, width: u16) -> Vec<Line<'static>> {
    let width = (width as usize).max(10);
    // Two thirds of the view, but never wider than the view itself on
    // narrow terminals.
    let bubble_width = (width * 2 / 3).max(20).min(width.saturating_sub(2));

    let mut lines = Vec::new();
    for message in messages {
        let content = clean_text(&message.content);
        if message.is_user() {
            let text_width = bubble_width.saturating_sub(USER_PREFIX.width()).max(1);
            let mut first = true;
            for part in content.split('\n') {
                for wrapped in wrap_text(part, text_width) {
                    let mut spans = Vec::new();
                    if first {
                        spans.push(Span::styled(USER_PREFIX.to_string(), theme.user_prefix_style));
                        first = false;
                    }
                    spans.push(Span::styled(wrapped, theme.user_text_style));
                    lines.push(Line::from(spans).alignment(Alignment::Right));
                }
            }
        } else {
            for part in content.split('\n') {
                for wrapped in wrap_text(part, bubble_width) {
                    lines.push(Line::from(Span::styled(
                        wrapped,
                        theme.assistant_text_style,
                    )));
                }
            }
        }
        lines.push(Line::from(""));
    }

    lines
}

/// Sidebar label: truncated id plus creation time.
pub fn session_label(session: &ChatSession) -> String {
    format!(
        "{} · {}",
        session.id.short(),
        session.created_at.format("%H:%M")
    )
}

pub fn home_lines(app: &App, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Welcome to kaiwa",
            theme.title_style.add_modifier(ratatui::style::Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Chat with an AI assistant across multiple independent sessions.",
            theme.info_style,
        )),
        Line::from(Span::styled(
            "Each session keeps its own conversation history.",
            theme.info_style,
        )),
        Line::from(""),
    ];

    if app.store.is_empty() {
        lines.push(Line::from(Span::styled(
            "Press Ctrl+N to start your first session.",
            theme.hint_style,
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Pick a session with ↑/↓ and Enter, or press Ctrl+N for a new one.",
            theme.hint_style,
        )));
    }

    lines
}

fn status_line(app: &App, ui: &ChatUi, hint: &str) -> Line<'static> {
    if ui.awaiting_reply {
        return Line::from(Span::styled(
            WAITING_TEXT.to_string(),
            ui.theme.info_style,
        ));
    }
    match app.notice() {
        Some(notice) => notice_line(notice, &ui.theme),
        None => Line::from(Span::styled(hint.to_string(), ui.theme.hint_style)),
    }
}

pub fn notice_line(notice: &Notice, theme: &Theme) -> Line<'static> {
    let (style, text) = match notice {
        Notice::Info(text) => (theme.info_style, text),
        Notice::Warning(text) => (theme.warning_style, text),
        Notice::Error(text) => (theme.error_style, text),
    };
    Line::from(Span::styled(text.clone(), style))
}

fn composer_height(ui: &ChatUi) -> u16 {
    let rows = ui.composer.lines().len().clamp(1, 6) as u16;
    rows + 2
}

/// Width-aware word wrap. Long words are hard-broken; empty input yields a
/// single empty line so blank lines inside messages survive.
pub(crate) fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in text.split_whitespace() {
        let word_width = word.width();

        if !current.is_empty() && current_width + 1 + word_width > max_width {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if current.is_empty() {
            if word_width > max_width {
                (current, current_width) = hard_break(word, max_width, &mut lines);
            } else {
                current = word.to_string();
                current_width = word_width;
            }
        } else {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn hard_break(word: &str, max_width: usize, lines: &mut Vec<String>) -> (String, usize) {
    let mut current = String::new();
    let mut current_width = 0usize;

    for ch in word.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if current_width + ch_width > max_width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        current.push(ch);
        current_width += ch_width;
    }

    (current, current_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Message;

    fn theme() -> Theme {
        Theme::dark_default()
    }

    fn rendered_text(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn wrap_respects_width() {
        let wrapped = wrap_text("one two three four", 9);
        assert_eq!(wrapped, vec!["one two", "three", "four"]);
    }

    #[test]
    fn wrap_hard_breaks_long_words() {
        let wrapped = wrap_text("abcdefghij", 4);
        assert_eq!(wrapped, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_preserves_empty_input_as_blank_line() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
        assert_eq!(wrap_text("   ", 10), vec![String::new()]);
    }

    #[test]
    fn user_lines_are_right_aligned_with_prefix() {
        let messages = vec![Message::user("hello")];
        let lines = conversation_lines(&messages, &theme(), 60);

        assert_eq!(lines[0].alignment, Some(Alignment::Right));
        let text = rendered_text(&lines);
        assert_eq!(text[0], format!("{USER_PREFIX}hello"));
    }

    #[test]
    fn assistant_lines_are_left_aligned() {
        let messages = vec![Message::assistant("hi there")];
        let lines = conversation_lines(&messages, &theme(), 60);

        assert_eq!(lines[0].alignment, None);
        assert_eq!(rendered_text(&lines)[0], "hi there");
    }

    #[test]
    fn thread_orders_turns_with_spacing() {
        let messages = vec![
            Message::user("hello"),
            Message::assistant("hi"),
            Message::user("bye"),
            Message::assistant("later"),
        ];
        let lines = conversation_lines(&messages, &theme(), 60);
        let text = rendered_text(&lines);

        assert_eq!(
            text,
            vec![
                format!("{USER_PREFIX}hello"),
                String::new(),
                "hi".to_string(),
                String::new(),
                format!("{USER_PREFIX}bye"),
                String::new(),
                "later".to_string(),
                String::new(),
            ]
        );
    }

    #[test]
    fn message_content_is_sanitized_before_rendering() {
        let messages = vec![Message::assistant("\x1b[31mplain\x1b[0m")];
        let lines = conversation_lines(&messages, &theme(), 60);
        let text = rendered_text(&lines);

        assert_eq!(text[0], "plain");
        assert!(!text.iter().any(|line| line.contains('\x1b')));
    }

    #[test]
    fn session_labels_start_with_the_short_id() {
        use crate::api::ChatMessage;
        use crate::core::session::SessionStore;

        let mut store = SessionStore::new();
        let id = store.create_session(crate::api::client::Conversation::new(&[
            ChatMessage::new("system", "Be helpful."),
        ]));

        let label = session_label(store.session(&id).expect("session"));
        assert!(label.starts_with(id.short()));
        assert!(label.contains(" · "));
    }

    #[test]
    fn multiline_messages_keep_blank_lines() {
        let messages = vec![Message::assistant("first\n\nsecond")];
        let lines = conversation_lines(&messages, &theme(), 60);
        let text = rendered_text(&lines);

        assert_eq!(
            text,
            vec![
                "first".to_string(),
                String::new(),
                "second".to_string(),
                String::new(),
            ]
        );
    }
}

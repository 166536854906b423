//! The interactive event loop that drives user input and display updates.
//!
//! One loop, one thread of mutation: every pass draws the whole screen from
//! the current [`App`] state, then applies at most one interaction. The only
//! suspend point is the outbound provider call inside `send_message`, which
//! blocks the loop until the reply (or an error, or the timeout) arrives.

use std::error::Error;
use std::io;
use std::time::Duration;

use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseEventKind,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};
use ratatui::Terminal;
use tui_textarea::TextArea;

use crate::core::app::{App, Notice, View};
use crate::core::config::Settings;
use crate::core::credentials::Credential;
use crate::ui::render;
use crate::ui::theme::Theme;
use crate::utils::logging::LoggingState;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const SIDEBAR_WIDTH: u16 = 28;

type Backend = CrosstermBackend<io::Stdout>;

/// Interaction chrome owned by the event loop: input widgets, scroll state,
/// and the sidebar selection. Everything that matters lives in [`App`]; this
/// is only how the user is currently poking at it.
pub struct ChatUi {
    pub composer: TextArea<'static>,
    pub key_entry: TextArea<'static>,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    pub selected: usize,
    pub awaiting_reply: bool,
    pub theme: Theme,
    pub sidebar_width: u16,
    /// Text area of the thread view as of the last draw, for scroll math.
    pub thread_area: Rect,
}

impl ChatUi {
    fn new(theme: Theme) -> Self {
        Self {
            composer: composer_widget(&theme),
            key_entry: key_entry_widget(&theme),
            scroll_offset: 0,
            auto_scroll: true,
            selected: 0,
            awaiting_reply: false,
            theme,
            sidebar_width: SIDEBAR_WIDTH,
            thread_area: Rect::default(),
        }
    }
}

fn composer_widget(theme: &Theme) -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_cursor_line_style(Style::default());
    textarea.set_style(theme.input_text_style);
    textarea.set_placeholder_text("Type your message…");
    textarea.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.input_border_style)
            .title("Message (Enter to send, Alt+Enter for new line)"),
    );
    textarea
}

fn key_entry_widget(theme: &Theme) -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_cursor_line_style(Style::default());
    textarea.set_style(theme.input_text_style);
    textarea.set_mask_char('•');
    textarea.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.input_border_style)
            .title("API key"),
    );
    textarea
}

/// Set up the terminal, run the event loop, and always restore the terminal
/// before propagating the result.
pub async fn run_chat(settings: Settings, log_file: Option<String>) -> Result<(), Box<dyn Error>> {
    let logging = LoggingState::new(log_file)?;
    let theme = Theme::from_name(settings.theme.as_deref().unwrap_or("dark"));
    let mut app = App::new(settings, logging);

    // Environment credential takes effect before the first draw; otherwise
    // the UI starts on the masked entry field.
    if let Some(credential) = Credential::from_env() {
        app.connect(credential)?;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut ui = ChatUi::new(theme);
    let result = event_loop(&mut terminal, &mut app, &mut ui).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    ui: &mut ChatUi,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| render::draw(f, app, ui))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }
                match app.view() {
                    View::EnterKey => handle_key_entry(app, ui, key),
                    View::Home => handle_home(app, ui, key).await,
                    View::Chat => handle_chat(terminal, app, ui, key).await?,
                }
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => scroll_up(app, ui, 3),
                MouseEventKind::ScrollDown => scroll_down(app, ui, 3),
                _ => {}
            },
            _ => {}
        }
    }
}

fn handle_key_entry(app: &mut App, ui: &mut ChatUi, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            let entered = ui.key_entry.lines().join("");
            match Credential::new(entered) {
                Some(credential) => match app.connect(credential) {
                    Ok(()) => ui.key_entry = key_entry_widget(&ui.theme),
                    Err(err) => app.set_notice(Notice::Error(format!(
                        "Could not initialize the API client: {err}"
                    ))),
                },
                None => app.set_notice(Notice::Warning(
                    "Enter an API key to start chatting.".to_string(),
                )),
            }
        }
        _ => {
            ui.key_entry.input(tui_textarea::Input::from(key));
        }
    }
}

async fn handle_home(app: &mut App, ui: &mut ChatUi, key: KeyEvent) {
    match key.code {
        KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            create_session(app, ui).await;
        }
        KeyCode::Up => ui.selected = ui.selected.saturating_sub(1),
        KeyCode::Down => {
            ui.selected = (ui.selected + 1).min(app.store.len().saturating_sub(1));
        }
        KeyCode::Enter => {
            let picked = app.store.iter().nth(ui.selected).map(|s| s.id.clone());
            if let Some(id) = picked {
                app.select_session(&id);
                ui.scroll_offset = 0;
                ui.auto_scroll = true;
            }
        }
        _ => {}
    }
}

async fn handle_chat(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    ui: &mut ChatUi,
    key: KeyEvent,
) -> Result<(), Box<dyn Error>> {
    match key.code {
        KeyCode::Esc => {
            app.return_home();
            ui.selected = 0;
        }
        KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            create_session(app, ui).await;
        }
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
            ui.composer.insert_newline();
        }
        KeyCode::Enter => {
            let text = ui.composer.lines().join("\n");
            if text.trim().is_empty() {
                return Ok(());
            }
            ui.composer = composer_widget(&ui.theme);
            ui.auto_scroll = true;

            // One extra frame so the waiting indicator is on screen while the
            // interaction blocks on the provider.
            ui.awaiting_reply = true;
            terminal.draw(|f| render::draw(f, app, ui))?;
            let outcome = app.send_message(text).await;
            ui.awaiting_reply = false;

            if let Err(err) = outcome {
                app.set_notice(Notice::Error(err.to_string()));
            }
        }
        KeyCode::Up => scroll_up(app, ui, 1),
        KeyCode::Down => scroll_down(app, ui, 1),
        KeyCode::PageUp => scroll_up(app, ui, 10),
        KeyCode::PageDown => scroll_down(app, ui, 10),
        _ => {
            ui.composer.input(tui_textarea::Input::from(key));
        }
    }
    Ok(())
}

async fn create_session(app: &mut App, ui: &mut ChatUi) {
    match app.create_session().await {
        Ok(_) => {
            ui.composer = composer_widget(&ui.theme);
            ui.scroll_offset = 0;
            ui.auto_scroll = true;
            ui.selected = app.store.len().saturating_sub(1);
        }
        Err(err) => app.set_notice(Notice::Error(err.to_string())),
    }
}

fn scroll_up(app: &App, ui: &mut ChatUi, amount: u16) {
    // Leaving auto-scroll starts from the bottom, not from a stale offset.
    if ui.auto_scroll {
        ui.scroll_offset = max_scroll_offset(app, ui);
        ui.auto_scroll = false;
    }
    ui.scroll_offset = ui.scroll_offset.saturating_sub(amount);
}

fn scroll_down(app: &App, ui: &mut ChatUi, amount: u16) {
    let max_offset = max_scroll_offset(app, ui);
    ui.scroll_offset = ui.scroll_offset.saturating_add(amount).min(max_offset);
    if ui.scroll_offset >= max_offset {
        ui.auto_scroll = true;
    }
}

fn max_scroll_offset(app: &App, ui: &ChatUi) -> u16 {
    let Some(session) = app.store.active_session() else {
        return 0;
    };
    let lines = render::conversation_lines(&session.messages, &ui.theme, ui.thread_area.width);
    (lines.len() as u16).saturating_sub(ui.thread_area.height)
}

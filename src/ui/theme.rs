use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,
    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_text_style: Style,

    // Chrome
    pub title_style: Style,
    pub hint_style: Style,
    pub sidebar_item_style: Style,
    pub sidebar_active_style: Style,
    pub sidebar_selected_style: Style,

    // Notices
    pub info_style: Style,
    pub warning_style: Style,
    pub error_style: Style,

    // Input area
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub input_text_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            background_color: Color::Black,
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_text_style: Style::default().fg(Color::White),

            title_style: Style::default().fg(Color::Gray),
            hint_style: Style::default().fg(Color::DarkGray),
            sidebar_item_style: Style::default().fg(Color::Gray),
            sidebar_active_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            sidebar_selected_style: Style::default().add_modifier(Modifier::REVERSED),

            info_style: Style::default().fg(Color::Gray),
            warning_style: Style::default().fg(Color::Yellow),
            error_style: Style::default().fg(Color::Red),

            input_border_style: Style::default().fg(Color::Gray),
            input_title_style: Style::default().fg(Color::Gray),
            input_text_style: Style::default().fg(Color::White),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::White,
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            assistant_text_style: Style::default().fg(Color::Black),

            title_style: Style::default().fg(Color::DarkGray),
            hint_style: Style::default().fg(Color::Gray),
            sidebar_item_style: Style::default().fg(Color::DarkGray),
            sidebar_active_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            sidebar_selected_style: Style::default().add_modifier(Modifier::REVERSED),

            info_style: Style::default().fg(Color::DarkGray),
            warning_style: Style::default().fg(Color::Yellow),
            error_style: Style::default().fg(Color::Red),

            input_border_style: Style::default().fg(Color::Black),
            input_title_style: Style::default().fg(Color::DarkGray),
            input_text_style: Style::default().fg(Color::Black),
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "light" => Self::light(),
            // Fallback
            _ => Self::dark_default(),
        }
    }
}

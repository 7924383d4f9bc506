use ratatui::style::{Color, Modifier, Style};

/// Catppuccin Mocha subset used by the dialog
#[derive(Debug, Clone)]
pub struct Theme {
    pub red: Color,
    pub green: Color,
    pub yellow: Color,
    pub blue: Color,
    pub lavender: Color,
    pub mauve: Color,
    pub text: Color,
    pub subtext0: Color,
    pub overlay0: Color,
    pub surface1: Color,
    pub surface0: Color,
    pub base: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

impl Theme {
    pub fn mocha() -> Self {
        Self {
            red: Color::Rgb(0xf3, 0x8b, 0xa8),
            green: Color::Rgb(0xa6, 0xe3, 0xa1),
            yellow: Color::Rgb(0xf9, 0xe2, 0xaf),
            blue: Color::Rgb(0x89, 0xb4, 0xfa),
            lavender: Color::Rgb(0xb4, 0xbe, 0xfe),
            mauve: Color::Rgb(0xcb, 0xa6, 0xf7),
            text: Color::Rgb(0xcd, 0xd6, 0xf4),
            subtext0: Color::Rgb(0xa6, 0xad, 0xc8),
            overlay0: Color::Rgb(0x6c, 0x70, 0x86),
            surface1: Color::Rgb(0x45, 0x47, 0x5a),
            surface0: Color::Rgb(0x31, 0x32, 0x44),
            base: Color::Rgb(0x1e, 0x1e, 0x2e),
        }
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.red)
    }

    pub fn label_style(&self) -> Style {
        Style::default().fg(self.subtext0)
    }

    pub fn placeholder_style(&self) -> Style {
        Style::default().fg(self.overlay0).add_modifier(Modifier::ITALIC)
    }

    pub fn title_style(&self) -> Style {
        Style::default().fg(self.mauve).add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.lavender)
        } else {
            Style::default().fg(self.surface1)
        }
    }

    pub fn button_style(&self, focused: bool, enabled: bool) -> Style {
        match (enabled, focused) {
            (false, _) => Style::default().fg(self.overlay0),
            (true, true) => Style::default()
                .fg(self.base)
                .bg(self.blue)
                .add_modifier(Modifier::BOLD),
            (true, false) => Style::default().fg(self.blue),
        }
    }
}

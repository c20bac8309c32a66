use crate::classify::Severity;
use crate::util::doc::Tone;
use crossterm::style::{ContentStyle, Stylize};
use ratatui::style::{Color, Modifier, Style};

// ── Terminal colour table (plain stdout output) ───────────────────────

/// crossterm style for a tone; `None` for unstyled text.
pub fn term_style(tone: Tone) -> Option<ContentStyle> {
    let base = ContentStyle::new();
    match tone {
        Tone::Plain                        => None,
        Tone::Bold                         => Some(base.bold()),
        Tone::Accent                       => Some(base.blue()),
        Tone::Dim                          => Some(base.dim()),
        Tone::Level(Severity::Healthy)     => Some(base.green()),
        Tone::Level(Severity::Warning)     => Some(base.yellow()),
        Tone::Level(Severity::Critical)    => Some(base.red()),
    }
}

// ── Pager themes ──────────────────────────────────────────────────────

const fn rgb(hex: u32) -> Color {
    Color::Rgb(
        ((hex >> 16) & 0xFF) as u8,
        ((hex >>  8) & 0xFF) as u8,
        ( hex        & 0xFF) as u8,
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThemeVariant {
    Default,
    Dracula,
    Gruvbox,
    Nord,
}

impl ThemeVariant {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Dracula => "Dracula",
            Self::Gruvbox => "Gruvbox",
            Self::Nord    => "Nord",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Default => Self::Dracula,
            Self::Dracula => Self::Gruvbox,
            Self::Gruvbox => Self::Nord,
            Self::Nord    => Self::Default,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "dracula" => Self::Dracula,
            "gruvbox" => Self::Gruvbox,
            "nord"    => Self::Nord,
            _         => Self::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub text:        Style,
    pub text_dim:    Style,
    pub title:       Style,
    pub accent:      Style,
    pub ok:          Style,
    pub warn:        Style,
    pub crit:        Style,
    pub footer_bg:   Style,
    pub footer_key:  Style,
    pub footer_text: Style,
}

impl Theme {
    pub fn for_variant(v: ThemeVariant) -> Self {
        match v {
            ThemeVariant::Default => Self::default(),
            ThemeVariant::Dracula => Self::dracula(),
            ThemeVariant::Gruvbox => Self::gruvbox(),
            ThemeVariant::Nord    => Self::nord(),
        }
    }

    pub fn default() -> Self {
        Self {
            text:        Style::default().fg(Color::White),
            text_dim:    Style::default().fg(Color::DarkGray),
            title:       Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            accent:      Style::default().fg(Color::LightBlue),
            ok:          Style::default().fg(Color::LightGreen),
            warn:        Style::default().fg(Color::LightYellow),
            crit:        Style::default().fg(Color::LightRed),
            footer_bg:   Style::default().bg(Color::DarkGray).fg(Color::White),
            footer_key:  Style::default().bg(Color::DarkGray).fg(Color::Cyan).add_modifier(Modifier::BOLD),
            footer_text: Style::default().bg(Color::DarkGray).fg(Color::Gray),
        }
    }

    fn dracula() -> Self {
        // fg #f8f8f2, comment #6272a4, purple #bd93f9, green #50fa7b,
        // yellow #f1fa8c, red #ff5555, current-line #44475a
        Self {
            text:        Style::default().fg(rgb(0xf8f8f2)),
            text_dim:    Style::default().fg(rgb(0x6272a4)),
            title:       Style::default().fg(rgb(0xf8f8f2)).add_modifier(Modifier::BOLD),
            accent:      Style::default().fg(rgb(0xbd93f9)),
            ok:          Style::default().fg(rgb(0x50fa7b)),
            warn:        Style::default().fg(rgb(0xf1fa8c)),
            crit:        Style::default().fg(rgb(0xff5555)).add_modifier(Modifier::BOLD),
            footer_bg:   Style::default().bg(rgb(0x44475a)).fg(rgb(0xf8f8f2)),
            footer_key:  Style::default().bg(rgb(0x44475a)).fg(rgb(0xbd93f9)).add_modifier(Modifier::BOLD),
            footer_text: Style::default().bg(rgb(0x44475a)).fg(rgb(0x6272a4)),
        }
    }

    fn gruvbox() -> Self {
        // fg1 #ebdbb2, fg4 #a89984, aqua #83a598, green #b8bb26,
        // yellow #fabd2f, red #fb4934, bg1 #3c3836
        Self {
            text:        Style::default().fg(rgb(0xebdbb2)),
            text_dim:    Style::default().fg(rgb(0xa89984)),
            title:       Style::default().fg(rgb(0xebdbb2)).add_modifier(Modifier::BOLD),
            accent:      Style::default().fg(rgb(0x83a598)),
            ok:          Style::default().fg(rgb(0xb8bb26)),
            warn:        Style::default().fg(rgb(0xfabd2f)),
            crit:        Style::default().fg(rgb(0xfb4934)).add_modifier(Modifier::BOLD),
            footer_bg:   Style::default().bg(rgb(0x3c3836)).fg(rgb(0xebdbb2)),
            footer_key:  Style::default().bg(rgb(0x3c3836)).fg(rgb(0x83a598)).add_modifier(Modifier::BOLD),
            footer_text: Style::default().bg(rgb(0x3c3836)).fg(rgb(0xa89984)),
        }
    }

    fn nord() -> Self {
        // snow #e5e9f0 #eceff4, polar #3b4252 #4c566a, frost #88c0d0,
        // aurora #a3be8c #ebcb8b #bf616a
        Self {
            text:        Style::default().fg(rgb(0xe5e9f0)),
            text_dim:    Style::default().fg(rgb(0x4c566a)),
            title:       Style::default().fg(rgb(0xeceff4)).add_modifier(Modifier::BOLD),
            accent:      Style::default().fg(rgb(0x88c0d0)),
            ok:          Style::default().fg(rgb(0xa3be8c)),
            warn:        Style::default().fg(rgb(0xebcb8b)),
            crit:        Style::default().fg(rgb(0xbf616a)).add_modifier(Modifier::BOLD),
            footer_bg:   Style::default().bg(rgb(0x3b4252)).fg(rgb(0xd8dee9)),
            footer_key:  Style::default().bg(rgb(0x3b4252)).fg(rgb(0x88c0d0)).add_modifier(Modifier::BOLD),
            footer_text: Style::default().bg(rgb(0x3b4252)).fg(rgb(0x4c566a)),
        }
    }

    pub fn style(&self, tone: Tone) -> Style {
        match tone {
            Tone::Plain                     => self.text,
            Tone::Bold                      => self.title,
            Tone::Accent                    => self.accent,
            Tone::Dim                       => self.text_dim,
            Tone::Level(Severity::Healthy)  => self.ok,
            Tone::Level(Severity::Warning)  => self.warn,
            Tone::Level(Severity::Critical) => self.crit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities_map_to_distinct_terminal_colours() {
        use crossterm::style::Color as TermColor;
        let colours: Vec<_> = [Severity::Healthy, Severity::Warning, Severity::Critical]
            .iter()
            .map(|s| term_style(Tone::Level(*s)).and_then(|st| st.foreground_color))
            .collect();
        assert_eq!(
            colours,
            vec![Some(TermColor::Green), Some(TermColor::Yellow), Some(TermColor::Red)]
        );
        assert!(term_style(Tone::Plain).is_none());
        assert!(term_style(Tone::Bold).is_some_and(|st| st.foreground_color.is_none()));
    }

    #[test]
    fn variant_names_round_trip() {
        let mut v = ThemeVariant::Default;
        for _ in 0..4 {
            assert_eq!(ThemeVariant::from_name(v.name()), v);
            v = v.next();
        }
        assert_eq!(v, ThemeVariant::Default);
    }
}

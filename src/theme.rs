//! Colour schemes the player can switch between
use enum_map::{enum_map, Enum, EnumMap};
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;
use std::fmt;

/// Named colour scheme.  Cycling goes `default → neon → retro → contrast`
/// and back around.
#[derive(Clone, Copy, Debug, Default, Deserialize, Enum, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Theme {
    #[default]
    Default,
    Neon,
    Retro,
    Contrast,
}

/// Something drawn on screen whose style depends on the theme
#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(crate) enum Element {
    SnakeHead,
    SnakeBody,
    Food,
    Bonus,
    Obstacle,

    /// Dots marking empty cells when the grid overlay is on
    Grid,

    /// The snake's head after it has run into something
    Collision,

    /// Board border while a haptic pulse is active
    Flash,

    /// Values in the score panel
    Badge,

    /// Message shown over the board while the snake isn't moving
    Banner,

    /// On-screen buttons
    Button,
}

const AMBER: Color = Color::Rgb(255, 176, 0);
const DIM_AMBER: Color = Color::Rgb(204, 136, 0);
const PALE_AMBER: Color = Color::Rgb(255, 220, 120);
const DARK_AMBER: Color = Color::Rgb(120, 80, 0);

impl Theme {
    /// The theme after this one, looping around after the last
    pub(crate) fn cycle(self) -> Theme {
        Theme::from_usize((self.into_usize() + 1) % Theme::LENGTH)
    }

    pub(crate) fn palette(self) -> EnumMap<Element, Style> {
        let bold = Style::new().add_modifier(Modifier::BOLD);
        match self {
            Theme::Default => enum_map! {
                Element::SnakeHead => bold.fg(Color::LightGreen),
                Element::SnakeBody => Style::new().fg(Color::Green),
                Element::Food => Style::new().fg(Color::LightRed),
                Element::Bonus => bold.fg(Color::Yellow),
                Element::Obstacle => Style::new().fg(Color::Red),
                Element::Grid => Style::new().fg(Color::DarkGray),
                Element::Collision => Style::new()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::REVERSED),
                Element::Flash => bold.fg(Color::Yellow),
                Element::Badge => bold,
                Element::Banner => bold.fg(Color::White),
                Element::Button => Style::new().add_modifier(Modifier::REVERSED),
            },
            Theme::Neon => enum_map! {
                Element::SnakeHead => bold.fg(Color::LightCyan),
                Element::SnakeBody => Style::new().fg(Color::Cyan),
                Element::Food => Style::new().fg(Color::LightMagenta),
                Element::Bonus => bold.fg(Color::LightYellow),
                Element::Obstacle => Style::new().fg(Color::Magenta),
                Element::Grid => Style::new().fg(Color::Blue),
                Element::Collision => Style::new()
                    .fg(Color::LightMagenta)
                    .add_modifier(Modifier::REVERSED),
                Element::Flash => bold.fg(Color::LightCyan),
                Element::Badge => bold.fg(Color::LightCyan),
                Element::Banner => bold.fg(Color::LightMagenta),
                Element::Button => Style::new().fg(Color::Black).bg(Color::Cyan),
            },
            Theme::Retro => enum_map! {
                Element::SnakeHead => bold.fg(AMBER),
                Element::SnakeBody => Style::new().fg(DIM_AMBER),
                Element::Food => Style::new().fg(PALE_AMBER),
                Element::Bonus => bold.fg(PALE_AMBER),
                Element::Obstacle => Style::new().fg(DARK_AMBER),
                Element::Grid => Style::new().fg(DARK_AMBER),
                Element::Collision => Style::new()
                    .fg(AMBER)
                    .add_modifier(Modifier::REVERSED),
                Element::Flash => bold.fg(PALE_AMBER),
                Element::Badge => bold.fg(AMBER),
                Element::Banner => bold.fg(AMBER),
                Element::Button => Style::new().fg(Color::Black).bg(AMBER),
            },
            Theme::Contrast => enum_map! {
                Element::SnakeHead => bold.fg(Color::White),
                Element::SnakeBody => Style::new().fg(Color::Gray),
                Element::Food => bold.fg(Color::LightYellow),
                Element::Bonus => bold.fg(Color::LightCyan),
                Element::Obstacle => Style::new().fg(Color::LightRed),
                Element::Grid => Style::new().fg(Color::Gray),
                Element::Collision => bold.fg(Color::Black).bg(Color::LightRed),
                Element::Flash => bold.fg(Color::White),
                Element::Badge => bold.fg(Color::White),
                Element::Banner => bold.fg(Color::Black).bg(Color::White),
                Element::Button => bold.fg(Color::Black).bg(Color::White),
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Theme::Default => "Default",
            Theme::Neon => "Neon",
            Theme::Retro => "Retro",
            Theme::Contrast => "Contrast",
        };
        f.pad(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cycle_order() {
        assert_eq!(Theme::Default.cycle(), Theme::Neon);
        assert_eq!(Theme::Neon.cycle(), Theme::Retro);
        assert_eq!(Theme::Retro.cycle(), Theme::Contrast);
        assert_eq!(Theme::Contrast.cycle(), Theme::Default);
    }

    #[test]
    fn themes_differ() {
        let themes = [Theme::Default, Theme::Neon, Theme::Retro, Theme::Contrast];
        for (i, a) in themes.iter().enumerate() {
            for b in &themes[i + 1..] {
                assert_ne!(
                    a.palette()[Element::SnakeHead],
                    b.palette()[Element::SnakeHead],
                    "{a} vs {b}"
                );
            }
        }
    }

    #[test]
    fn deserialize() {
        #[derive(Debug, Deserialize)]
        struct Wrapper {
            theme: Theme,
        }
        let w = toml::from_str::<Wrapper>("theme = \"retro\"").unwrap();
        assert_eq!(w.theme, Theme::Retro);
        assert!(toml::from_str::<Wrapper>("theme = \"plaid\"").is_err());
    }
}

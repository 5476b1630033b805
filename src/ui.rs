//! UI rendering helpers for the kiosk displays.
//!
//! Everything here draws into a `ratatui` frame; nothing touches the terminal
//! directly, so the same code renders into a test backend.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

mod cover;
mod idle;

pub use cover::CoverArt;
pub use idle::IdleScreen;

use crate::playback::PlayState;

const TEXT: ratatui::style::Color = ratatui::style::Color::LightBlue;
const ALERT: ratatui::style::Color = ratatui::style::Color::Red;

/// Shown once the main tracks have played out and bonus tracks are waiting.
pub const BONUS_HINT: &str = "Main complete - press PLAY for bonus tracks";

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("space/p", "play/pause");
    map.insert("s", "stop");
    map.insert("h/l", "prev/next track");
    map.insert("esc", "exit");
    map
});

/// Render the controls help text.
fn controls_text() -> String {
    let order = ["space/p", "s", "h/l", "esc"];
    order
        .iter()
        .filter_map(|k| CONTROLS_MAP.get(k).map(|v| format!("[{}] {}", k, v)))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
pub fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Snapshot of what the player display shows for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct NowPlaying {
    /// 1-based track number.
    pub number: usize,
    pub title: String,
    pub elapsed: Duration,
    pub total: Option<Duration>,
    pub album: String,
    pub artist: String,
    pub state: PlayState,
}

impl NowPlaying {
    /// `N. Title  mm:ss`, with ` / mm:ss` appended when the length is known.
    pub fn track_line(&self) -> String {
        let mut line = format!(
            "{}. {}  {}",
            self.number,
            self.title,
            format_mmss(self.elapsed)
        );
        if let Some(total) = self.total {
            line.push_str(" / ");
            line.push_str(&format_mmss(total));
        }
        line
    }
}

/// Split `area` into a vertically centered band of `rows` lines.
fn centered_rows(area: Rect, rows: u16) -> Rect {
    let rows = rows.min(area.height);
    let y = area.y + (area.height - rows) / 2;
    Rect {
        x: area.x,
        y,
        width: area.width,
        height: rows,
    }
}

/// Idle screen: the typed welcome line and the blinking prompt below it.
pub fn draw_idle(frame: &mut Frame, idle: &IdleScreen) {
    let band = centered_rows(frame.area(), 3);
    let mut lines = vec![
        Line::from(idle.typed().to_string()).fg(TEXT).bold(),
        Line::from(""),
    ];
    if idle.prompt_visible() {
        lines.push(Line::from(IdleScreen::PROMPT).fg(ALERT).bold());
    }
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), band);
}

/// Player display: now-playing line, album, artist, bonus hint and controls.
pub fn draw_player(frame: &mut Frame, now: &NowPlaying) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(frame.area());

    let mut lines = vec![
        Line::from(now.track_line()).fg(TEXT).bold(),
        Line::from(now.album.clone()).fg(TEXT),
        Line::from(now.artist.clone()).fg(TEXT).add_modifier(Modifier::DIM),
        Line::from(""),
    ];
    match now.state {
        PlayState::MainEndedAwaitingBonus => lines.push(Line::from(BONUS_HINT).fg(ALERT).bold()),
        PlayState::Playing(_) | PlayState::BonusPlaying(_) => lines.push(Line::from("")),
        other => lines.push(Line::from(other.to_string()).fg(TEXT).italic()),
    }

    let band = centered_rows(chunks[0], lines.len() as u16);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        band,
    );

    let footer = Paragraph::new(controls_text())
        .style(Style::default().fg(TEXT))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[1]);
}

/// A single centered line, used for missing covers and load errors.
pub fn draw_message(frame: &mut Frame, message: &str) {
    let band = centered_rows(frame.area(), 1);
    frame.render_widget(
        Paragraph::new(Line::from(message.to_string()).fg(TEXT)).alignment(Alignment::Center),
        band,
    );
}

/// Cover display: the letterboxed image over the whole frame.
pub fn draw_cover(frame: &mut Frame, art: &mut CoverArt) {
    let area = frame.area();
    art.render(area, frame.buffer_mut());
}

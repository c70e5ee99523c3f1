use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{Clear, ClearType};

use stopwatch_core::{format_lap_time, LapEntry, Snapshot, TimerState};

const WHITE: Color = Color::Rgb { r: 0xFF, g: 0xFF, b: 0xFF };
const GREY: Color = Color::Rgb { r: 0x3D, g: 0x3D, b: 0x3D };
const GREEN: Color = Color::Rgb { r: 0x50, g: 0xD1, b: 0x67 };
const DARK_GREEN: Color = Color::Rgb { r: 0x1B, g: 0x36, b: 0x1F };
const RED: Color = Color::Rgb { r: 0xE3, g: 0x39, b: 0x35 };
const DARK_RED: Color = Color::Rgb { r: 0x3C, g: 0x15, b: 0x17 };
const FASTEST: Color = Color::Rgb { r: 0x4B, g: 0xC0, b: 0x5F };
const SLOWEST: Color = Color::Rgb { r: 0xCC, g: 0x35, b: 0x31 };

const LAP_TOP: u16 = 6;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RoundButton {
    pub title: &'static str,
    pub color: Color,
    pub background: Color,
    pub enabled: bool,
}

impl RoundButton {
    const fn new(title: &'static str, color: Color, background: Color) -> Self {
        Self {
            title,
            color,
            background,
            enabled: true,
        }
    }

    const fn disabled(self) -> Self {
        Self {
            enabled: false,
            ..self
        }
    }
}

/// Left and right buttons for each state.
pub fn button_row(state: TimerState) -> [RoundButton; 2] {
    match state {
        TimerState::Idle => [
            RoundButton::new("Lap", WHITE, GREY).disabled(),
            RoundButton::new("Start", GREEN, DARK_GREEN),
        ],
        TimerState::Running => [
            RoundButton::new("Lap", WHITE, GREY),
            RoundButton::new("Stop", RED, DARK_RED),
        ],
        TimerState::Paused => [
            RoundButton::new("Reset", WHITE, GREY),
            RoundButton::new("Resume", GREEN, DARK_GREEN),
        ],
    }
}

pub fn lap_color(entry: &LapEntry) -> Color {
    if entry.fastest {
        FASTEST
    } else if entry.slowest {
        SLOWEST
    } else {
        WHITE
    }
}

/// "Lap N" on the left, the time flush right within `width`.
pub fn lap_line(entry: &LapEntry, width: usize) -> String {
    let label = format!("Lap {}", entry.number);
    let time = format_lap_time(entry.duration_ms);
    let gap = width.saturating_sub(label.len()).max(time.len() + 1);
    format!("{}{:>gap$}", label, time, gap = gap)
}

/// How many lap rows fit on a screen of `rows` lines.
pub fn visible_laps(rows: u16) -> usize {
    rows.saturating_sub(LAP_TOP + 2) as usize
}

pub fn footer(state: TimerState) -> &'static str {
    match state {
        TimerState::Idle => "ENTER=start  h=help  q=quit",
        TimerState::Running => "ENTER=stop  l=lap  h=help  q=quit",
        TimerState::Paused => "ENTER=resume  r=reset  h=help  q=quit",
    }
}

pub fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(out, ResetColor, Clear(ClearType::All), MoveTo(0, 0))
}

pub fn draw_stopwatch<W: Write>(
    out: &mut W,
    screensize: (u16, u16),
    snapshot: &Snapshot,
    lap_scroll: usize,
) -> io::Result<()> {
    let (cols, rows) = screensize;
    clear_screen(out)?;

    // Header
    queue!(
        out,
        MoveTo(2, 0),
        SetAttribute(Attribute::Bold),
        Print("STOPWATCH"),
        SetAttribute(Attribute::Reset),
    )?;

    // Time display
    let total = format_lap_time(snapshot.total_ms);
    let x = cols.saturating_sub(total.len() as u16) / 2;
    queue!(
        out,
        MoveTo(x, 2),
        SetAttribute(Attribute::Bold),
        Print(&total),
        SetAttribute(Attribute::Reset),
    )?;

    // Buttons
    let [left, right] = button_row(snapshot.state);
    draw_button(out, 2, 4, &left)?;
    let right_x = cols.saturating_sub(right.title.len() as u16 + 6);
    draw_button(out, right_x, 4, &right)?;

    // Lap list (most recent first)
    let width = cols.saturating_sub(4) as usize;
    for (i, entry) in snapshot
        .laps
        .iter()
        .skip(lap_scroll)
        .take(visible_laps(rows))
        .enumerate()
    {
        queue!(
            out,
            MoveTo(2, LAP_TOP + i as u16),
            SetForegroundColor(lap_color(entry)),
            Print(lap_line(entry, width)),
            ResetColor,
        )?;
    }

    // Footer
    queue!(
        out,
        MoveTo(2, rows.saturating_sub(1)),
        SetAttribute(Attribute::Dim),
        Print(footer(snapshot.state)),
        SetAttribute(Attribute::Reset),
    )?;

    out.flush()
}

fn draw_button<W: Write>(out: &mut W, x: u16, y: u16, button: &RoundButton) -> io::Result<()> {
    if !button.enabled {
        queue!(out, SetAttribute(Attribute::Dim))?;
    }
    queue!(
        out,
        MoveTo(x, y),
        SetForegroundColor(button.color),
        SetBackgroundColor(button.background),
        Print(format!("(  {}  )", button.title)),
        ResetColor,
        SetAttribute(Attribute::Reset),
    )
}

pub fn draw_help<W: Write>(out: &mut W, help_text: &str) -> io::Result<()> {
    clear_screen(out)?;
    for (i, line) in help_text.lines().enumerate() {
        queue!(out, MoveTo(2, 1 + i as u16), Print(line))?;
    }
    out.flush()
}

pub fn draw_confirm_exit<W: Write>(out: &mut W, screensize: (u16, u16)) -> io::Result<()> {
    let (_, rows) = screensize;
    clear_screen(out)?;
    let y = rows / 2;
    queue!(
        out,
        MoveTo(2, y.saturating_sub(1)),
        SetAttribute(Attribute::Bold),
        Print("Stopwatch is running."),
        SetAttribute(Attribute::Reset),
        MoveTo(2, y + 1),
        Print("Quit anyway?  y=yes  n=no"),
    )?;
    out.flush()
}

mod cli;
mod clock;
mod pump;
mod stopwatch;
mod ui;

use std::fs::File;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::mpsc::{self, Sender};
use std::thread;

use clap::Parser;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use stopwatch_core::TimerState;

use crate::cli::Arguments;
use crate::clock::{Clock, MonotonicClock};
use crate::pump::{PumpConfig, PumpHandle};
use crate::stopwatch::Stopwatch;

const APP_NAME: &str = "Lapwatch";

const KEY_ENTER: char = '\r';
const KEY_ESC: char = '\u{001b}';
const KEY_CTRL_C: char = '\u{0003}';
const KEY_UP: char = '↑';
const KEY_DOWN: char = '↓';

const DEFAULT_SCREENSIZE: (u16, u16) = (80, 24);

const HELP_TEXT: &str = "STOPWATCH HELP\n\n\
    Enter  Start/Stop/Resume\n\
    Space  Start/Stop/Resume\n\
    l      Record lap (running)\n\
    r      Reset (stopped)\n\
    Up/Dn  Scroll laps\n\
    h      Help\n\
    q      Quit\n\n\
    Any key closes this screen";

#[derive(Clone, Debug)]
enum AppEvent {
    Key(char),
    Pump,
    Resize(u16, u16),
    Quit,
}

struct LapwatchApp<W, C> {
    out: W,
    screensize: (u16, u16),
    stopwatch: Stopwatch<C, AppEvent>,
    pump: Option<PumpHandle>,
    lap_scroll: usize,
    help_visible: bool,
    confirm_exit: bool,
    quit: bool,
}

impl<W: Write, C: Clock> LapwatchApp<W, C> {
    fn new(out: W, screensize: (u16, u16), stopwatch: Stopwatch<C, AppEvent>) -> Self {
        Self {
            out,
            screensize,
            stopwatch,
            pump: None,
            lap_scroll: 0,
            help_visible: false,
            confirm_exit: false,
            quit: false,
        }
    }

    fn redraw(&mut self) {
        let result = if self.help_visible {
            ui::draw_help(&mut self.out, HELP_TEXT)
        } else if self.confirm_exit {
            ui::draw_confirm_exit(&mut self.out, self.screensize)
        } else {
            let snapshot = self.stopwatch.snapshot();
            ui::draw_stopwatch(&mut self.out, self.screensize, &snapshot, self.lap_scroll)
        };
        if let Err(e) = result {
            log::error!("redraw failed: {}", e);
        }
    }

    fn handle_pump(&mut self) {
        self.stopwatch.tick();
        if !self.help_visible && !self.confirm_exit {
            self.redraw();
        }
    }

    fn handle_resize(&mut self, cols: u16, rows: u16) {
        self.screensize = (cols, rows);
        self.clamp_scroll();
        self.redraw();
    }

    fn handle_key(&mut self, key: char) -> anyhow::Result<()> {
        if key == KEY_CTRL_C {
            self.quit = true;
            return Ok(());
        }

        // If help screen is showing, any key dismisses it
        if self.help_visible {
            self.help_visible = false;
            self.redraw();
            return Ok(());
        }

        if self.confirm_exit {
            match key {
                'y' => self.quit = true,
                'n' | KEY_ESC => {
                    self.confirm_exit = false;
                    self.redraw();
                }
                _ => {}
            }
            return Ok(());
        }

        match key {
            KEY_ENTER | ' ' => self.press_primary()?,
            'l' => {
                if self.stopwatch.lap().is_some() {
                    self.lap_scroll = 0;
                }
            }
            'r' => {
                if self.stopwatch.reset().is_some() {
                    self.lap_scroll = 0;
                }
            }
            'h' | '?' => self.help_visible = true,
            KEY_UP | 'k' => self.lap_scroll = self.lap_scroll.saturating_sub(1),
            KEY_DOWN | 'j' => {
                self.lap_scroll += 1;
                self.clamp_scroll();
            }
            'q' | KEY_ESC => {
                if self.stopwatch.state() == TimerState::Running {
                    self.confirm_exit = true;
                } else {
                    self.quit = true;
                    return Ok(());
                }
            }
            _ => return Ok(()),
        }
        self.redraw();
        Ok(())
    }

    /// The right-hand button: Start, Stop or Resume.
    fn press_primary(&mut self) -> anyhow::Result<()> {
        match self.stopwatch.state() {
            TimerState::Idle => {
                if let Some(started) = self.stopwatch.start()? {
                    self.pump = Some(started.pump);
                    self.lap_scroll = 0;
                }
            }
            TimerState::Running => match self.pump.take() {
                Some(pump) => {
                    self.stopwatch.stop(pump);
                }
                None => log::warn!("running without a pump"),
            },
            TimerState::Paused => {
                if let Some(started) = self.stopwatch.resume()? {
                    self.pump = Some(started.pump);
                }
            }
        }
        Ok(())
    }

    fn clamp_scroll(&mut self) {
        let laps = self.stopwatch.snapshot().laps.len();
        let max = laps.saturating_sub(ui::visible_laps(self.screensize.1));
        self.lap_scroll = self.lap_scroll.min(max);
    }

    fn teardown(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.cancel();
        }
    }
}

fn key_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(KEY_CTRL_C),
        KeyCode::Char(c) => Some(c),
        KeyCode::Enter => Some(KEY_ENTER),
        KeyCode::Esc => Some(KEY_ESC),
        KeyCode::Up => Some(KEY_UP),
        KeyCode::Down => Some(KEY_DOWN),
        _ => None,
    }
}

fn input_thread(events: Sender<AppEvent>) {
    loop {
        let app_event = match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                key_char(&key).map(AppEvent::Key)
            }
            Ok(Event::Resize(cols, rows)) => Some(AppEvent::Resize(cols, rows)),
            Ok(_) => None,
            Err(e) => {
                log::error!("can't read terminal input: {}", e);
                Some(AppEvent::Quit)
            }
        };

        if let Some(app_event) = app_event {
            let quit = matches!(app_event, AppEvent::Quit);
            if events.send(app_event).is_err() || quit {
                break;
            }
        }
    }
}

/// Raw mode and the alternate screen for as long as it lives.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> anyhow::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        execute!(io::stdout(), Show, LeaveAlternateScreen).ok();
        terminal::disable_raw_mode().ok();
    }
}

fn init_logging(arguments: &Arguments) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(arguments.level_filter());
    // RUST_LOG still wins over the verbosity flag.
    builder.parse_default_env();

    if let Some(path) = &arguments.log_file {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.try_init()?;
    Ok(())
}

fn run(arguments: &Arguments) -> anyhow::Result<()> {
    let (sender, receiver) = mpsc::channel();
    let screensize = terminal::size().unwrap_or(DEFAULT_SCREENSIZE);

    let _terminal = TerminalGuard::enter()?;

    let input_events = sender.clone();
    thread::Builder::new()
        .name("input".into())
        .spawn(move || input_thread(input_events))?;

    let pumps = PumpConfig::new(arguments.tick_period(), sender, AppEvent::Pump);
    let stopwatch = Stopwatch::new(MonotonicClock::new(), pumps);
    let mut app = LapwatchApp::new(io::stdout(), screensize, stopwatch);
    app.redraw();

    while !app.quit {
        let Ok(event) = receiver.recv() else {
            break;
        };
        match event {
            AppEvent::Key(key) => app.handle_key(key)?,
            AppEvent::Pump => app.handle_pump(),
            AppEvent::Resize(cols, rows) => app.handle_resize(cols, rows),
            AppEvent::Quit => break,
        }
    }

    // Clean up
    app.teardown();
    Ok(())
}

fn main() -> ExitCode {
    let arguments = Arguments::parse();
    if let Err(e) = init_logging(&arguments) {
        eprintln!("can't set up logging: {:#}", e);
        return ExitCode::FAILURE;
    }
    log::info!("{} starting, tick period {:?}", APP_NAME, arguments.tick_period());

    match run(&arguments) {
        Ok(()) => {
            log::info!("{} exiting", APP_NAME);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{} failed: {:#}", APP_NAME, e);
            eprintln!("{}: {:#}", APP_NAME, e);
            ExitCode::FAILURE
        }
    }
}

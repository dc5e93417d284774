use std::io::stdout;
use std::time::{Duration, Instant};

use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
};
use ratatui::{
    DefaultTerminal, Frame,
    layout::Rect,
    style::{Color, Stylize},
    text::Line,
};
use tessera_canvas::TerminalSurface;
use tessera_core::{ColorScheme, Point};

mod config;
mod host;
mod logging;

use config::{Config, StrategyKind};
use host::{Background, FrameClock, cell_center, run_session};

/// Event poll timeout, roughly one display refresh.
const FRAME_POLL: Duration = Duration::from_millis(16);

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = Config::load()?;
    logging::init(&config)?;

    let terminal = ratatui::init();
    run_session(
        || execute!(stdout(), EnableMouseCapture, EnableFocusChange),
        || App::new(config).run(terminal),
        || execute!(stdout(), DisableFocusChange, DisableMouseCapture),
        ratatui::restore,
    )
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    config: Config,
    surface: TerminalSurface,
    frames: FrameClock,
    /// Mounted background; `None` before the first frame.
    background: Option<Background>,
    color_scheme: ColorScheme,
    strategy: StrategyKind,
    pointer: Option<Point>,
    /// Mount time of the current background. Frame timestamps count from here.
    mounted_at: Instant,
    show_help: bool,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config) -> Self {
        Self {
            running: false,
            color_scheme: config.color_scheme,
            strategy: config.strategy,
            config,
            surface: TerminalSurface::new(0, 0),
            frames: FrameClock::new(),
            background: None,
            pointer: None,
            mounted_at: Instant::now(),
            show_help: true,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let size = terminal.size()?;
        self.surface = TerminalSurface::new(size.width, size.height);
        self.mount();
        self.running = true;

        while self.running {
            let now = self.elapsed_ms();
            if let Some(background) = self.background.as_mut() {
                background.poll_activation(now);
            }
            if self.frames.take_due() {
                self.draw_frame(now);
                terminal.draw(|frame| self.render(frame))?;
            }
            self.handle_crossterm_events()?;
        }

        if let Some(mut background) = self.background.take() {
            background.teardown(&mut self.frames);
        }
        Ok(())
    }

    fn elapsed_ms(&self) -> f64 {
        self.mounted_at.elapsed().as_secs_f64() * 1000.0
    }

    /// Construct and mount a fresh background of the selected kind.
    fn mount(&mut self) {
        self.mounted_at = Instant::now();
        let background = Background::mount(
            self.strategy,
            &self.config,
            self.color_scheme,
            self.pointer,
            &mut self.surface,
            &mut self.frames,
            0.0,
        );
        self.background = Some(background);
    }

    fn draw_frame(&mut self, timestamp: f64) {
        let Some(background) = self.background.as_mut() else {
            return;
        };
        self.surface.set_backdrop(background.colors().page);
        background.run(&mut self.surface, timestamp, &mut self.frames);
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(&self.surface, area);

        if !self.show_help || area.height == 0 {
            return;
        }
        let accent = self
            .background
            .as_ref()
            .map(|background| {
                let rgb = background.colors().hover;
                Color::Rgb(rgb.r, rgb.g, rgb.b)
            })
            .unwrap_or(Color::Gray);

        let help = Line::from(vec![
            "q".bold().fg(accent),
            " quit  ".dark_gray(),
            "s".bold().fg(accent),
            format!(" scheme: {}  ", self.color_scheme.name()).dark_gray(),
            "b".bold().fg(accent),
            format!(" grid: {}  ", self.strategy.name()).dark_gray(),
            "h".bold().fg(accent),
            " hide help".dark_gray(),
        ])
        .centered();
        let bottom = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
        frame.render_widget(help, bottom);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(FRAME_POLL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::Resize(cols, rows) => self.on_resize(cols, rows),
                Event::FocusLost => self.set_pointer(None),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('s')) => self.toggle_color_scheme(),
            (_, KeyCode::Char('b')) => self.switch_strategy(),
            (_, KeyCode::Char('h')) => self.show_help = !self.show_help,
            _ => {}
        }
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        if let MouseEventKind::Moved | MouseEventKind::Drag(_) = mouse.kind {
            self.set_pointer(Some(cell_center(mouse.column, mouse.row)));
        }
    }

    fn on_resize(&mut self, cols: u16, rows: u16) {
        self.surface.resize(cols, rows);
        if let Some(background) = self.background.as_mut() {
            background.resize(&mut self.surface);
        }
    }

    fn set_pointer(&mut self, pointer: Option<Point>) {
        self.pointer = pointer;
        if let Some(background) = self.background.as_mut() {
            background.set_pointer(pointer);
        }
    }

    fn toggle_color_scheme(&mut self) {
        self.color_scheme = self.color_scheme.toggle();
        if let Some(background) = self.background.as_mut() {
            background.set_color_scheme(self.color_scheme);
        }
    }

    /// Tear down the current background and mount a fresh one of the other kind.
    fn switch_strategy(&mut self) {
        if let Some(mut background) = self.background.take() {
            background.teardown(&mut self.frames);
        }
        self.strategy = self.strategy.toggle();
        self.surface.resize(self.surface.cols(), self.surface.rows());
        self.mount();
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

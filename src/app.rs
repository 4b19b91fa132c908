//! App: terminal init, main loop, tick and key handling.

use crate::GameConfig;
use crate::game::GameSession;
use crate::highscores;
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    GameOver,
}

pub struct App {
    config: GameConfig,
    theme: Theme,
    session: GameSession,
    screen: Screen,
    /// When the last accepted move happened; drives the slide animation.
    last_move_at: Option<Instant>,
    /// Last value successfully written to disk, to avoid redundant saves.
    saved_high_score: u32,
    /// TachyonFX fade for the game-over screen (created when it starts).
    game_over_effect: Option<Effect>,
    game_over_effect_time: Option<Instant>,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Self {
        let high_score = highscores::load_high_score();
        let session = GameSession::new(high_score, &config);
        Self {
            config,
            theme,
            session,
            screen: Screen::Playing,
            last_move_at: None,
            saved_high_score: high_score,
            game_over_effect: None,
            game_over_effect_time: None,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    self.screen,
                    &self.session,
                    &self.theme,
                    self.last_move_at,
                    now,
                    self.config.spawn_delay_ms,
                    self.config.no_animation,
                    &mut self.game_over_effect,
                    &mut self.game_over_effect_time,
                    f.area(),
                );
            })?;

            // Phase (b) of the move protocol: spawn commit + terminal check.
            self.session.tick(now);
            if self.session.game_over && self.screen == Screen::Playing {
                self.screen = Screen::GameOver;
                self.persist_high_score();
            }

            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match key_to_action(key) {
                        Action::Quit => {
                            self.persist_high_score();
                            return Ok(());
                        }
                        Action::Reset => self.reset_game(),
                        action => {
                            if self.screen == Screen::Playing {
                                if let Some(dir) = action.direction() {
                                    let pressed = Instant::now();
                                    if self.session.apply_move(dir, pressed) {
                                        self.last_move_at = Some(pressed);
                                        self.persist_high_score();
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// New session keeping the high score; accepted from any screen.
    fn reset_game(&mut self) {
        self.persist_high_score();
        self.session.reset();
        self.screen = Screen::Playing;
        self.last_move_at = None;
        self.game_over_effect = None;
        self.game_over_effect_time = None;
    }

    /// Best-effort save; a storage failure never affects the session.
    fn persist_high_score(&mut self) {
        if self.session.high_score > self.saved_high_score
            && highscores::save_high_score(self.session.high_score).is_ok()
        {
            self.saved_high_score = self.session.high_score;
        }
    }
}

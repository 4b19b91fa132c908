//! Twenty48tui — 2048-style sliding tile puzzle in the terminal.

mod app;
mod game;
mod grid;
mod highscores;
mod input;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};

/// Options derived from CLI that affect game behaviour.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Delay between a move landing and the new tile appearing. Gates
    /// phase (b) of the move protocol; also the slide animation length.
    pub spawn_delay_ms: u64,
    pub no_animation: bool,
    /// Fixed RNG seed for a reproducible session.
    pub seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_default();
    let config = GameConfig {
        spawn_delay_ms: if args.no_animation { 0 } else { args.spawn_delay_ms },
        no_animation: args.no_animation,
        seed: args.seed,
    };
    let mut app = App::new(config, theme);
    app.run()
}

/// 2048-style sliding tile puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "twenty48tui",
    version,
    about = "2048-style sliding tile puzzle in the terminal. Merge equal tiles to reach 2048.",
    long_about = "Twenty48tui is a terminal rendition of the classic 2048 puzzle.\n\n\
        Slide all tiles in one of four directions; equal neighbours merge into their sum \
        and every move spawns one new tile. Reach 2048 to win, keep playing for score, \
        and the game ends when no move changes the board.\n\n\
        CONTROLS:\n  Arrows / hjkl / wasd  Move    R  New game    Q / Esc  Quit"
)]
pub struct Args {
    /// Path to theme file (btop-style theme[key]="value"). Uses the built-in slate theme if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Delay in ms before the new tile spawns after a move (the slide animation window).
    #[arg(long, default_value = "120", value_name = "MS")]
    pub spawn_delay_ms: u64,

    /// Disable animation: tiles jump and the new tile appears immediately.
    #[arg(long)]
    pub no_animation: bool,

    /// Seed the RNG for a reproducible session.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

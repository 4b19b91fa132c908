//! Game session: score, high score, move lock, two-phase move/spawn protocol.

use crate::grid::{self, Direction, Grid, TileIds};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::{Duration, Instant};

/// One self-contained game session. Two sessions share no state; the id
/// counter and RNG are owned here rather than being process-wide.
#[derive(Debug)]
pub struct GameSession {
    pub grid: Grid,
    pub score: u32,
    pub high_score: u32,
    /// Points earned by the last accepted move (for transient UI feedback).
    pub score_delta: u32,
    pub game_over: bool,
    /// Monotonic within a session: once true, stays true until reset.
    pub has_won: bool,
    ids: TileIds,
    rng: StdRng,
    /// Move lock: while Some, the slide/merge result is committed but the
    /// spawn is still pending; direction input is ignored (not queued).
    spawn_ready_at: Option<Instant>,
    spawn_delay_ms: u64,
}

impl GameSession {
    pub fn new(high_score: u32, config: &crate::GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut session = Self {
            grid: Grid::empty(),
            score: 0,
            high_score,
            score_delta: 0,
            game_over: false,
            has_won: false,
            ids: TileIds::default(),
            rng,
            spawn_ready_at: None,
            spawn_delay_ms: config.spawn_delay_ms,
        };
        session.seed_board();
        session
    }

    /// Start a session with two spawned tiles on an empty board.
    fn seed_board(&mut self) {
        let mut grid = Grid::empty();
        for _ in 0..2 {
            grid = grid::spawn_tile(&grid, &mut self.rng, &mut self.ids);
        }
        self.grid = grid;
    }

    /// True while the spawn for the last accepted move is still pending.
    pub fn is_locked(&self) -> bool {
        self.spawn_ready_at.is_some()
    }

    /// Phase (a) of the move protocol. Commits the slide/merge result and
    /// score, then engages the move lock until the spawn delay elapses.
    /// Returns false for ignored input: game over, lock held, or a no-op
    /// move (grid unchanged; no spawn, no score, no lock).
    pub fn apply_move(&mut self, dir: Direction, now: Instant) -> bool {
        if self.game_over || self.is_locked() {
            return false;
        }
        let result = grid::apply_move(&self.grid, dir);
        if result.grid.same_layout(&self.grid) {
            return false;
        }
        self.grid = result.grid;
        self.score += result.score_delta;
        self.score_delta = result.score_delta;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
        self.spawn_ready_at = Some(now + Duration::from_millis(self.spawn_delay_ms));
        true
    }

    /// Phase (b): once the delay has elapsed, commit the spawn and
    /// re-evaluate win/game-over. The lock releases unconditionally,
    /// whether or not the session ends. Call every frame.
    pub fn tick(&mut self, now: Instant) {
        let Some(ready_at) = self.spawn_ready_at else {
            return;
        };
        if now < ready_at {
            return;
        }
        self.spawn_ready_at = None;
        self.grid = grid::spawn_tile(&self.grid, &mut self.rng, &mut self.ids);
        if grid::has_won(&self.grid) {
            self.has_won = true;
        }
        self.game_over = !grid::can_move(&self.grid);
    }

    /// Fresh grid, score, id counter and win flag; the high score carries
    /// over. Accepted from any state and clears the lock immediately.
    pub fn reset(&mut self) {
        self.ids = TileIds::default();
        self.score = 0;
        self.score_delta = 0;
        self.game_over = false;
        self.has_won = false;
        self.spawn_ready_at = None;
        self.seed_board();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;

    fn config(spawn_delay_ms: u64) -> GameConfig {
        GameConfig {
            spawn_delay_ms,
            no_animation: false,
            seed: Some(42),
        }
    }

    fn stuck_grid() -> Grid {
        Grid::from_values(
            [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]],
            &mut TileIds::default(),
        )
    }

    #[test]
    fn new_session_has_two_tiles_and_zero_score() {
        let session = GameSession::new(0, &config(120));
        assert_eq!(session.grid.occupied_count(), 2);
        assert_eq!(session.score, 0);
        assert!(!session.game_over);
        assert!(!session.has_won);
        assert!(!session.is_locked());
    }

    #[test]
    fn accepted_move_locks_until_spawn_commits() {
        let mut session = GameSession::new(0, &config(120));
        session.grid =
            Grid::from_values([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]], &mut TileIds::default());
        let now = Instant::now();

        assert!(session.apply_move(Direction::Left, now));
        assert_eq!(session.score, 4);
        // Phase (a) only: merged down to one tile, no spawn yet.
        assert_eq!(session.grid.occupied_count(), 1);
        assert!(session.is_locked());

        // Input during the lock window is ignored, not queued.
        assert!(!session.apply_move(Direction::Right, now));
        assert_eq!(session.score, 4);

        // Before the deadline the tick is a no-op.
        session.tick(now);
        assert!(session.is_locked());

        session.tick(now + Duration::from_millis(120));
        assert!(!session.is_locked());
        assert_eq!(session.grid.occupied_count(), 2);
    }

    #[test]
    fn noop_move_is_rejected_without_lock_or_score() {
        let mut session = GameSession::new(0, &config(120));
        session.grid =
            Grid::from_values([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]], &mut TileIds::default());
        let before = session.grid.clone();

        assert!(!session.apply_move(Direction::Left, Instant::now()));
        assert_eq!(session.score, 0);
        assert!(!session.is_locked());
        assert!(session.grid.same_layout(&before));
    }

    #[test]
    fn moves_are_ignored_after_game_over() {
        let mut session = GameSession::new(0, &config(0));
        session.grid = stuck_grid();
        session.game_over = true;
        assert!(!session.apply_move(Direction::Left, Instant::now()));
    }

    #[test]
    fn tick_detects_game_over_after_spawn() {
        let mut session = GameSession::new(0, &config(0));
        // One hole; the move fills the line and the spawn takes the last cell.
        session.grid = Grid::from_values(
            [[0, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]],
            &mut TileIds::default(),
        );
        let now = Instant::now();
        // The spawn value decides whether a mergeable pair remains, so only
        // check that the evaluator and the flag agree.
        if session.apply_move(Direction::Left, now) {
            session.tick(now);
            assert!(!session.is_locked());
            assert_eq!(session.game_over, !grid::can_move(&session.grid));
        }
    }

    #[test]
    fn has_won_is_set_in_phase_b_and_play_continues() {
        let mut session = GameSession::new(0, &config(0));
        session.grid = Grid::from_values(
            [[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]],
            &mut TileIds::default(),
        );
        let now = Instant::now();
        assert!(session.apply_move(Direction::Left, now));
        // Win is evaluated with the spawn commit, not in phase (a).
        assert!(!session.has_won);
        session.tick(now);
        assert!(session.has_won);
        assert!(!session.game_over);

        // Further moves are still accepted and the flag never clears.
        let later = now + Duration::from_millis(1);
        assert!(session.apply_move(Direction::Down, later));
        session.tick(later);
        assert!(session.has_won);
    }

    #[test]
    fn reset_produces_fresh_session_keeping_high_score() {
        let mut session = GameSession::new(0, &config(120));
        session.grid =
            Grid::from_values([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]], &mut TileIds::default());
        let now = Instant::now();
        assert!(session.apply_move(Direction::Left, now));
        assert!(session.is_locked());
        session.game_over = true;

        let high = session.high_score;
        assert_eq!(high, 4);
        session.reset();

        assert_eq!(session.grid.occupied_count(), 2);
        assert_eq!(session.score, 0);
        assert!(!session.game_over);
        assert!(!session.has_won);
        // Reset bypasses and clears the lock.
        assert!(!session.is_locked());
        assert_eq!(session.high_score, high);
        // Fresh id counter: only the two seed tiles have been minted.
        assert!(session.grid.tiles().all(|t| t.id <= 2));
    }

    #[test]
    fn high_score_follows_score_improvements() {
        let mut session = GameSession::new(10, &config(0));
        session.grid =
            Grid::from_values([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]], &mut TileIds::default());
        assert!(session.apply_move(Direction::Left, Instant::now()));
        // 4 points does not beat the stored 10.
        assert_eq!(session.high_score, 10);

        session.score = 100;
        session.grid =
            Grid::from_values([[8, 8, 0, 0], [0; 4], [0; 4], [0; 4]], &mut TileIds::default());
        session.spawn_ready_at = None;
        assert!(session.apply_move(Direction::Left, Instant::now()));
        assert_eq!(session.high_score, 116);
    }
}

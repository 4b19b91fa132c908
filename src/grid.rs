//! Board model and pure move logic: slide/merge, tile identity, spawn, terminal checks.

use rand::Rng;

/// Board is a fixed 4x4.
pub const GRID_SIZE: usize = 4;

/// First tile value that counts as a win.
pub const WIN_VALUE: u32 = 2048;

/// Move directions accepted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];
}

/// One tile on the board. The id is stable across moves so a renderer can
/// animate the same tile sliding between cells; `prev_row`/`prev_col` hold
/// the position before the last move (own position for a fresh spawn).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub id: u64,
    pub value: u32,
    pub row: usize,
    pub col: usize,
    pub prev_row: usize,
    pub prev_col: usize,
    /// Set only by the spawner, cleared on the next move.
    pub is_new: bool,
    /// Set only on the tile created by a merge in the last move.
    pub is_merged: bool,
}

/// Session-scoped id mint. Monotonic; ids are never reused.
#[derive(Debug, Clone, Default)]
pub struct TileIds(u64);

impl TileIds {
    pub fn next(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }
}

/// 4x4 grid of cells, each empty or holding one tile. Treated as an
/// immutable value: every operation returns a new grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: [[Option<Tile>; GRID_SIZE]; GRID_SIZE],
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl Grid {
    pub fn empty() -> Self {
        Self {
            cells: [[None; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Build a grid from plain values (0 = empty), minting fresh ids in
    /// row-major order. Used by tests and debug setups.
    pub fn from_values(values: [[u32; GRID_SIZE]; GRID_SIZE], ids: &mut TileIds) -> Self {
        let mut grid = Self::empty();
        for (row, row_values) in values.iter().enumerate() {
            for (col, &value) in row_values.iter().enumerate() {
                if value != 0 {
                    grid.cells[row][col] = Some(Tile {
                        id: ids.next(),
                        value,
                        row,
                        col,
                        prev_row: row,
                        prev_col: col,
                        is_new: false,
                        is_merged: false,
                    });
                }
            }
        }
        grid
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&Tile> {
        self.cells[row][col].as_ref()
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().flatten().filter_map(Option::as_ref)
    }

    pub fn occupied_count(&self) -> usize {
        self.tiles().count()
    }

    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                if self.cells[row][col].is_none() {
                    out.push((row, col));
                }
            }
        }
        out
    }

    /// Plain value view (0 = empty); handy for assertions.
    pub fn values(&self) -> [[u32; GRID_SIZE]; GRID_SIZE] {
        let mut out = [[0; GRID_SIZE]; GRID_SIZE];
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                out[row][col] = self.cells[row][col].map_or(0, |t| t.value);
            }
        }
        out
    }

    /// Cell-for-cell equality of occupancy and values, ignoring ids and
    /// animation bookkeeping. This is the no-op test for move rejection.
    pub fn same_layout(&self, other: &Self) -> bool {
        (0..GRID_SIZE).all(|row| {
            (0..GRID_SIZE).all(|col| {
                self.cells[row][col].map(|t| t.value) == other.cells[row][col].map(|t| t.value)
            })
        })
    }

    fn set(&mut self, row: usize, col: usize, tile: Tile) {
        self.cells[row][col] = Some(tile);
    }
}

/// Outcome of one move: the new grid and the points earned by merges.
#[derive(Debug, Clone)]
pub struct MoveResult {
    pub grid: Grid,
    pub score_delta: u32,
}

/// Cell coordinates of one line along the move axis, ordered from the
/// target edge inward (index 0 is where tiles compact toward).
fn line_coords(dir: Direction, line: usize) -> [(usize, usize); GRID_SIZE] {
    let mut coords = [(0, 0); GRID_SIZE];
    for (k, coord) in coords.iter_mut().enumerate() {
        *coord = match dir {
            Direction::Left => (line, k),
            Direction::Right => (line, GRID_SIZE - 1 - k),
            Direction::Up => (k, line),
            Direction::Down => (GRID_SIZE - 1 - k, line),
        };
    }
    coords
}

/// Slide all tiles toward `dir`, merging equal neighbours once per pair.
///
/// Pure and deterministic. Each line is compacted toward the target edge;
/// a single scan from that edge merges each tile with the next equal one,
/// and a tile created by a merge never merges again in the same move. The
/// merge survivor is the tile nearer the target edge and keeps its id.
/// Every tile records its pre-move position in `prev_row`/`prev_col`.
pub fn apply_move(grid: &Grid, dir: Direction) -> MoveResult {
    let mut out = Grid::empty();
    let mut score_delta = 0;

    for line in 0..GRID_SIZE {
        let coords = line_coords(dir, line);

        // Occupied tiles in scan order, with per-move flags reset and the
        // pre-move position recorded.
        let mut tiles: Vec<Tile> = coords
            .iter()
            .filter_map(|&(row, col)| grid.get(row, col).copied())
            .collect();
        for tile in &mut tiles {
            tile.prev_row = tile.row;
            tile.prev_col = tile.col;
            tile.is_new = false;
            tile.is_merged = false;
        }

        let mut placed = 0;
        let mut i = 0;
        while i < tiles.len() {
            let mut tile = tiles[i];
            if i + 1 < tiles.len() && tiles[i + 1].value == tile.value {
                tile.value *= 2;
                tile.is_merged = true;
                score_delta += tile.value;
                i += 2;
            } else {
                i += 1;
            }
            let (row, col) = coords[placed];
            tile.row = row;
            tile.col = col;
            out.set(row, col, tile);
            placed += 1;
        }
    }

    MoveResult {
        grid: out,
        score_delta,
    }
}

/// Add one tile on a uniformly random empty cell: value 2 with probability
/// 0.9, else 4. Returns the grid unchanged if the board is full (should not
/// happen under correct sequencing, but must not fault).
pub fn spawn_tile<R: Rng + ?Sized>(grid: &Grid, rng: &mut R, ids: &mut TileIds) -> Grid {
    let empty = grid.empty_cells();
    if empty.is_empty() {
        return grid.clone();
    }
    let (row, col) = empty[rng.gen_range(0..empty.len())];
    let value = if rng.gen_range(0..10) < 9 { 2 } else { 4 };
    let mut out = grid.clone();
    out.set(
        row,
        col,
        Tile {
            id: ids.next(),
            value,
            row,
            col,
            prev_row: row,
            prev_col: col,
            is_new: true,
            is_merged: false,
        },
    );
    out
}

/// True if at least one direction changes the grid.
pub fn can_move(grid: &Grid) -> bool {
    Direction::ALL
        .iter()
        .any(|&dir| !apply_move(grid, dir).grid.same_layout(grid))
}

/// True once any tile has reached the win value. Does not end the session.
pub fn has_won(grid: &Grid) -> bool {
    grid.tiles().any(|t| t.value >= WIN_VALUE)
}

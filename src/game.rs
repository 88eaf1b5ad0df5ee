//! Core game state and the event-driven update function
//!
//! Every event consumes the previous [`Model`] and yields the next one together
//! with a [`Command`] for the scheduler. Nothing here touches the terminal, the
//! clock or the random number generator directly.

use crate::board::Board;
use crate::piece;
use crate::score;
use crate::tetromino::{Tetromino, TetrominoType};

/// Where new pieces appear
const SPAWN_ROW: i32 = 0;
const SPAWN_COL: i32 = 4;

/// Off-board pose a fresh spawn is validated against. It shares no cells with
/// the board, so spawning is a plain occupancy check.
const SPAWN_GHOST: Tetromino = Tetromino {
    kind: TetrominoType::I,
    rotation: 0,
    row: SPAWN_ROW - 1,
    col: SPAWN_COL,
};

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Falling,
    Landing,
    GameOver,
}

/// Player actions recognised by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    RotateCcw,
    RotateCw,
    MoveLeft,
    MoveRight,
}

impl Action {
    pub fn from_key(key: char) -> Option<Action> {
        match key.to_ascii_lowercase() {
            'a' => Some(Action::RotateCcw),
            's' => Some(Action::RotateCw),
            'j' => Some(Action::MoveLeft),
            'k' => Some(Action::MoveRight),
            _ => None,
        }
    }
}

/// Inputs to [`update`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Milliseconds since the previous tick
    Tick(f64),
    Key(char),
    /// A random piece id in 1..=7, answering an earlier `Command::RequestPiece`
    PieceReady(u8),
    NewGame,
}

/// Side effects the scheduler must carry out after an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    None,
    /// Draw a uniform id in 1..=7 and feed it back as `Event::PieceReady`
    RequestPiece,
}

/// One immutable snapshot of a game
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub board: Board,
    /// Pieces placed so far
    pub pieces: u32,
    pub score: u64,
    /// Total rows cleared
    pub lines: u32,
    /// None between a lock and the next spawn
    pub active: Option<Tetromino>,
    /// Milliseconds spent in the current state
    pub elapsed: f64,
    pub state: GameState,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Empty board, nothing placed, waiting for the first piece
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            pieces: 0,
            score: 0,
            lines: 0,
            active: None,
            elapsed: 0.0,
            state: GameState::Falling,
        }
    }

    /// A fresh model plus the request for its first piece
    pub fn start() -> (Self, Command) {
        (Self::new(), Command::RequestPiece)
    }

    pub fn level(&self) -> u32 {
        score::level(self.pieces)
    }

    pub fn is_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    /// Move the active piece to a new pose if the board allows it.
    /// Illegal targets, or no active piece, leave the model as it was.
    pub fn move_piece(self, rotation: u8, row: i32, col: i32) -> Self {
        let mut model = self;
        model.try_move(rotation, row, col);
        model
    }

    /// Commit a pose change in place, reporting whether it happened
    fn try_move(&mut self, rotation: u8, row: i32, col: i32) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let candidate = active.with_pose(rotation, row, col);
        match piece::try_move(&self.board, &active, &candidate) {
            Some(board) => {
                self.board = board;
                self.active = Some(candidate);
                true
            }
            None => false,
        }
    }

    fn apply_action(self, action: Action) -> Self {
        let Some(active) = self.active else {
            return self;
        };
        let (rotation, row, col) = (active.rotation, active.row, active.col);
        match action {
            Action::RotateCcw => self.move_piece((rotation + 1) % 4, row, col),
            Action::RotateCw => self.move_piece((rotation + 3) % 4, row, col),
            Action::MoveLeft => self.move_piece(rotation, row, col - 1),
            Action::MoveRight => self.move_piece(rotation, row, col + 1),
        }
    }

    /// Place a freshly drawn piece at the top of the board, or end the game
    /// if its spawn cells are taken.
    pub fn spawn_piece(self, id: u8) -> Self {
        let mut model = self;
        let Some(kind) = TetrominoType::from_id(id) else {
            tracing::warn!(id, "ignoring spawn of unknown piece id");
            return model;
        };

        let candidate = Tetromino::new(kind, 0, SPAWN_ROW, SPAWN_COL);
        if !piece::can_move(&SPAWN_GHOST, &candidate, &model.board) {
            tracing::info!(score = model.score, pieces = model.pieces, "game over");
            model.state = GameState::GameOver;
            model.active = None;
            return model;
        }

        model.board.fill(&candidate.cells(), kind.id());
        model.active = Some(candidate);
        model.pieces += 1;
        tracing::debug!(?kind, pieces = model.pieces, "spawned piece");
        model
    }

    /// Collapse complete rows and score them at the current level
    pub fn clear_lines(self) -> Self {
        let mut model = self;
        let level = model.level();
        let rows = model.board.collapse();
        if rows > 0 {
            let points = score::clear_score(rows, level);
            model.score += points;
            model.lines += rows as u32;
            tracing::debug!(rows, level, points, score = model.score, "cleared rows");
            if model.board.is_empty() {
                tracing::debug!("board cleared completely");
            }
        }
        model
    }

    fn tick(self, delta: f64) -> (Self, Command) {
        let mut model = self;
        let Some(active) = model.active else {
            return (model, Command::None);
        };
        model.elapsed += delta;

        match model.state {
            GameState::Falling => {
                if model.elapsed < score::drop_period(model.level()) {
                    return (model, Command::None);
                }
                model.elapsed = 0.0;
                if !model.try_move(active.rotation, active.row + 1, active.col) {
                    tracing::debug!(row = active.row, col = active.col, "piece grounded");
                    model.state = GameState::Landing;
                }
                (model, Command::None)
            }
            GameState::Landing => {
                if model.elapsed < score::LANDING_MS {
                    // Re-validate the current pose; a no-op on a consistent board
                    model.try_move(active.rotation, active.row, active.col);
                    return (model, Command::None);
                }
                tracing::debug!(kind = ?active.kind, row = active.row, col = active.col, "piece locked");
                let mut model = model.clear_lines();
                model.active = None;
                model.elapsed = 0.0;
                model.state = GameState::Falling;
                (model, Command::RequestPiece)
            }
            GameState::GameOver => (model, Command::None),
        }
    }
}

/// Advance the game by one event
pub fn update(model: Model, event: Event) -> (Model, Command) {
    if let Event::NewGame = event {
        tracing::info!(final_score = model.score, "starting new game");
        return Model::start();
    }
    if model.is_over() {
        return (model, Command::None);
    }

    match event {
        Event::Tick(delta) => {
            let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
            model.tick(delta)
        }
        Event::Key(key) => match Action::from_key(key) {
            Some(action) => (model.apply_action(action), Command::None),
            None => (model, Command::None),
        },
        Event::PieceReady(id) => {
            if model.active.is_some() {
                tracing::warn!(id, "piece already active, dropping spawn");
                return (model, Command::None);
            }
            (model.spawn_piece(id), Command::None)
        }
        Event::NewGame => Model::start(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BOARD_HEIGHT, BOARD_WIDTH};

    fn started(id: u8) -> Model {
        let (model, command) = Model::start();
        assert_eq!(command, Command::RequestPiece);
        let (model, command) = update(model, Event::PieceReady(id));
        assert_eq!(command, Command::None);
        model
    }

    fn fill_row(board: &mut Board, row: i32, id: u8) {
        for col in 0..BOARD_WIDTH as i32 {
            board.set(row, col, id);
        }
    }

    #[test]
    fn test_start_state() {
        let (model, command) = Model::start();
        assert_eq!(command, Command::RequestPiece);
        assert_eq!(model.state, GameState::Falling);
        assert_eq!(model.score, 0);
        assert_eq!(model.pieces, 0);
        assert!(model.board.is_empty());
        assert!(model.active.is_none());
    }

    #[test]
    fn test_spawn_writes_piece() {
        let model = started(1);
        assert_eq!(model.pieces, 1);
        assert_eq!(model.active, Some(Tetromino::new(TetrominoType::I, 0, 0, 4)));
        for col in 3..=6 {
            assert_eq!(model.board.read(0, col), 1);
        }
        assert_eq!(model.board.occupied(), 4);
    }

    #[test]
    fn test_spawn_blocked_is_game_over() {
        let mut model = Model::new();
        model.board.set(0, 5, 3);
        model.board.set(4, 4, 2);
        let board = model.board;

        let model = model.spawn_piece(1);
        assert_eq!(model.state, GameState::GameOver);
        assert_eq!(model.board, board);
        assert_eq!(model.pieces, 0);
    }

    #[test]
    fn test_spawn_unknown_id_is_ignored() {
        let model = Model::new();
        let (next, _) = update(model.clone(), Event::PieceReady(0));
        assert_eq!(next, model);
        let (next, _) = update(model.clone(), Event::PieceReady(8));
        assert_eq!(next, model);
    }

    #[test]
    fn test_second_spawn_while_active_is_ignored() {
        let model = started(7);
        let (next, _) = update(model.clone(), Event::PieceReady(1));
        assert_eq!(next, model);
    }

    #[test]
    fn test_illegal_move_is_noop() {
        let model = started(1);
        // Anchor column 8 pushes the last cell to column 10
        let moved = model.clone().move_piece(0, 0, 8);
        assert_eq!(moved, model);
    }

    #[test]
    fn test_move_keys() {
        let model = started(2);
        let (left, _) = update(model.clone(), Event::Key('j'));
        assert_eq!(left.active.unwrap().col, 3);
        let (right, _) = update(model.clone(), Event::Key('K'));
        assert_eq!(right.active.unwrap().col, 5);
        let (same, _) = update(model.clone(), Event::Key('x'));
        assert_eq!(same, model);
    }

    #[test]
    fn test_rotation_keys() {
        // T piece away from the top so every orientation fits
        let mut model = started(2).move_piece(0, 5, 4);
        assert_eq!(model.active.unwrap().row, 5);

        model = update(model, Event::Key('a')).0;
        assert_eq!(model.active.unwrap().rotation, 1);
        model = update(model, Event::Key('s')).0;
        assert_eq!(model.active.unwrap().rotation, 0);
        model = update(model, Event::Key('s')).0;
        assert_eq!(model.active.unwrap().rotation, 3);
        assert_eq!(model.board.occupied(), 4);
    }

    #[test]
    fn test_action_keys_ignore_case() {
        assert_eq!(Action::from_key('A'), Some(Action::RotateCcw));
        assert_eq!(Action::from_key('s'), Some(Action::RotateCw));
        assert_eq!(Action::from_key('J'), Some(Action::MoveLeft));
        assert_eq!(Action::from_key('k'), Some(Action::MoveRight));
        assert_eq!(Action::from_key('q'), None);
        assert_eq!(Action::from_key(' '), None);
    }

    #[test]
    fn test_falling_waits_for_drop_period() {
        let model = started(1);
        let (model, _) = update(model, Event::Tick(400.0));
        assert_eq!(model.active.unwrap().row, 0);
        assert_eq!(model.elapsed, 400.0);

        let (model, command) = update(model, Event::Tick(600.0));
        assert_eq!(command, Command::None);
        assert_eq!(model.active.unwrap().row, 1);
        assert_eq!(model.elapsed, 0.0);
        assert_eq!(model.state, GameState::Falling);
        assert_eq!(model.board.read(0, 4), 0);
        assert_eq!(model.board.read(1, 4), 1);
    }

    #[test]
    fn test_negative_tick_is_clamped() {
        let model = started(1);
        let (model, _) = update(model, Event::Tick(-50.0));
        assert_eq!(model.elapsed, 0.0);
        let (model, _) = update(model, Event::Tick(f64::NAN));
        assert_eq!(model.elapsed, 0.0);
    }

    #[test]
    fn test_blocked_fall_enters_landing() {
        let model = started(1).move_piece(0, BOARD_HEIGHT as i32 - 1, 4);
        let (model, command) = update(model, Event::Tick(1000.0));
        assert_eq!(command, Command::None);
        assert_eq!(model.state, GameState::Landing);
        assert_eq!(model.elapsed, 0.0);
    }

    #[test]
    fn test_landing_allows_sideways_moves_then_locks() {
        let model = started(1).move_piece(0, 19, 4);
        let (model, _) = update(model, Event::Tick(1000.0));
        assert_eq!(model.state, GameState::Landing);

        let (model, _) = update(model, Event::Key('j'));
        let (model, command) = update(model, Event::Tick(200.0));
        assert_eq!(command, Command::None);
        assert_eq!(model.state, GameState::Landing);
        assert_eq!(model.active.unwrap().col, 3);
        assert_eq!(model.active.unwrap().row, 19);

        let (model, command) = update(model, Event::Tick(300.0));
        assert_eq!(command, Command::RequestPiece);
        assert_eq!(model.state, GameState::Falling);
        assert!(model.active.is_none());
        assert_eq!(model.elapsed, 0.0);
        for col in 2..=5 {
            assert_eq!(model.board.read(19, col), 1);
        }
    }

    #[test]
    fn test_ticks_without_active_piece_are_noops() {
        let (model, _) = Model::start();
        let (next, command) = update(model.clone(), Event::Tick(5000.0));
        assert_eq!(command, Command::None);
        assert_eq!(next, model);
    }

    #[test]
    fn test_lock_clears_completed_row() {
        let mut model = started(1).move_piece(0, 19, 4);
        // Leave exactly the I piece's four cells open in row 19
        for col in [0, 1, 2, 7, 8, 9] {
            model.board.set(19, col, 5);
        }
        model.board.set(18, 0, 6);

        let (model, _) = update(model, Event::Tick(1000.0));
        assert_eq!(model.state, GameState::Landing);
        let (model, command) = update(model, Event::Tick(500.0));
        assert_eq!(command, Command::RequestPiece);
        assert_eq!(model.score, 1);
        assert_eq!(model.lines, 1);
        assert_eq!(model.board.read(19, 0), 6);
        assert_eq!(model.board.occupied(), 1);
    }

    #[test]
    fn test_clear_lines_single_bottom_row() {
        let mut model = Model::new();
        model.pieces = 140;
        fill_row(&mut model.board, 19, 4);

        let model = model.clear_lines();
        assert!(model.board.is_empty());
        assert_eq!(model.score, 3);
    }

    #[test]
    fn test_clear_lines_without_full_rows() {
        let mut model = Model::new();
        model.board.set(19, 0, 1);
        model.score = 12;
        let before = model.clone();
        assert_eq!(model.clear_lines(), before);
    }

    #[test]
    fn test_four_row_clear_scores_fifteen() {
        let mut model = Model::new();
        for row in 16..20 {
            fill_row(&mut model.board, row, 2);
        }
        let model = model.clear_lines();
        assert_eq!(model.score, 15);
        assert_eq!(model.lines, 4);
        assert!(model.board.is_empty());
    }

    #[test]
    fn test_game_over_ignores_everything_but_new_game() {
        let mut model = Model::new();
        fill_row(&mut model.board, 0, 3);
        let (model, _) = update(model, Event::PieceReady(1));
        assert!(model.is_over());

        for event in [Event::Tick(10_000.0), Event::Key('j'), Event::PieceReady(2)] {
            let (next, command) = update(model.clone(), event);
            assert_eq!(next, model);
            assert_eq!(command, Command::None);
        }

        let (fresh, command) = update(model, Event::NewGame);
        assert_eq!(command, Command::RequestPiece);
        assert_eq!(fresh, Model::new());
    }

    #[test]
    fn test_level_follows_piece_count() {
        let mut model = Model::new();
        model.pieces = 69;
        assert_eq!(model.level(), 0);
        model.pieces = 70;
        assert_eq!(model.level(), 1);
    }

    #[test]
    fn test_full_game_reaches_game_over() {
        // Drop O pieces straight down until the spawn area is blocked
        let (mut model, mut command) = Model::start();
        for _ in 0..10_000 {
            if model.is_over() {
                break;
            }
            if command == Command::RequestPiece {
                (model, command) = update(model, Event::PieceReady(7));
                continue;
            }
            (model, command) = update(model, Event::Tick(1000.0));
        }
        assert!(model.is_over());
        // Ten 2-row O pieces fill the single column pair under the spawn point
        assert_eq!(model.pieces, 10);
        assert_eq!(model.score, 0);
    }
}

//! Tetromino catalog and the rotate-then-translate shape transform
//!
//! Shapes are stored once, in their spawn orientation. Every other orientation
//! is derived by rotating the offsets a quarter turn at a time.

use ratatui::style::Color;

/// The 7 tetromino types, numbered the way they are stored on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TetrominoType {
    I = 1, // Cyan - long bar
    T = 2, // Purple - T-shape
    S = 3, // Green - S-shape
    Z = 4, // Red - Z-shape
    J = 5, // Blue - J-shape
    L = 6, // Orange - L-shape
    O = 7, // Yellow - square
}

/// One catalog entry: four (row, col) offsets around the anchor plus a color
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub offsets: &'static [(i32, i32)],
    pub color: Color,
}

/// Entry for id 0 and any id outside the catalog
const EMPTY_ENTRY: CatalogEntry = CatalogEntry {
    offsets: &[],
    color: Color::Reset,
};

/// Indexed by board id; slot 0 is the empty sentinel.
/// Rows grow downward, so a piece falls by increasing its row.
const CATALOG: [CatalogEntry; 8] = [
    EMPTY_ENTRY,
    CatalogEntry {
        offsets: &[(0, -1), (0, 0), (0, 1), (0, 2)],
        color: Color::Cyan,
    },
    CatalogEntry {
        offsets: &[(0, -1), (0, 0), (0, 1), (1, 0)],
        color: Color::Magenta,
    },
    CatalogEntry {
        offsets: &[(0, 0), (0, 1), (1, -1), (1, 0)],
        color: Color::Green,
    },
    CatalogEntry {
        offsets: &[(0, -1), (0, 0), (1, 0), (1, 1)],
        color: Color::Red,
    },
    CatalogEntry {
        offsets: &[(0, -1), (0, 0), (0, 1), (1, 1)],
        color: Color::Blue,
    },
    CatalogEntry {
        offsets: &[(0, -1), (0, 0), (0, 1), (1, -1)],
        color: Color::Rgb(255, 165, 0), // Orange
    },
    CatalogEntry {
        offsets: &[(0, 0), (0, 1), (1, 0), (1, 1)],
        color: Color::Yellow,
    },
];

impl TetrominoType {
    /// Map a board id back to a piece type
    pub fn from_id(id: u8) -> Option<TetrominoType> {
        match id {
            1 => Some(TetrominoType::I),
            2 => Some(TetrominoType::T),
            3 => Some(TetrominoType::S),
            4 => Some(TetrominoType::Z),
            5 => Some(TetrominoType::J),
            6 => Some(TetrominoType::L),
            7 => Some(TetrominoType::O),
            _ => None,
        }
    }

    /// The id written into board cells this piece occupies
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Spawn-orientation offsets; always exactly four
    pub fn offsets(self) -> [(i32, i32); 4] {
        let o = shape_of(self.id());
        [o[0], o[1], o[2], o[3]]
    }
}

/// Catalog lookup by raw id; unknown ids yield the empty sentinel
pub fn catalog_entry(id: u8) -> &'static CatalogEntry {
    CATALOG.get(id as usize).unwrap_or(&EMPTY_ENTRY)
}

/// Offsets for a raw board id, empty for 0 and unknown ids
pub fn shape_of(id: u8) -> &'static [(i32, i32)] {
    catalog_entry(id).offsets
}

/// Display color for a raw board id
pub fn color_of(id: u8) -> Color {
    catalog_entry(id).color
}

/// A quarter turn about the anchor: (r, c) -> (-c, r)
fn rotate_once((r, c): (i32, i32)) -> (i32, i32) {
    (-c, r)
}

/// The active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tetromino {
    pub kind: TetrominoType,
    /// Quarter turns from spawn, kept in 0..4
    pub rotation: u8,
    pub row: i32,
    pub col: i32,
}

impl Tetromino {
    pub fn new(kind: TetrominoType, rotation: u8, row: i32, col: i32) -> Self {
        Self {
            kind,
            rotation: rotation % 4,
            row,
            col,
        }
    }

    /// Same piece, different pose
    pub fn with_pose(&self, rotation: u8, row: i32, col: i32) -> Self {
        Self::new(self.kind, rotation, row, col)
    }

    /// Absolute board cells covered by this pose
    pub fn cells(&self) -> [(i32, i32); 4] {
        transform_shape(self)
    }
}

/// Rotate the catalog offsets `rotation mod 4` times, then translate by the anchor
pub fn transform_shape(piece: &Tetromino) -> [(i32, i32); 4] {
    let turns = piece.rotation % 4;
    piece.kind.offsets().map(|offset| {
        let mut rotated = offset;
        for _ in 0..turns {
            rotated = rotate_once(rotated);
        }
        (piece.row + rotated.0, piece.col + rotated.1)
    })
}

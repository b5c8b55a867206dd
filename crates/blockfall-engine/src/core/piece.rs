use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Column of the spawn anchor.
pub const SPAWN_X: i32 = 5;
/// Row of the spawn anchor. Every spawned piece sits entirely above the visible field.
pub const SPAWN_Y: i32 = 0;

/// A candidate pose for a piece: anchor column, anchor row and rotation index.
///
/// # Coordinate System
///
/// - `x` grows to the right, `y` grows downward, `(0, 0)` is the top-left visible cell
/// - The anchor sits one row below the piece's 5×5 template, so every occupied
///   cell has `dx ∈ [-2, 2]` and `dy ∈ [-4, -1]` relative to it
/// - A piece at the spawn pose `(5, 0)` occupies only rows above the visible field
///
/// The same type doubles as the search-level "placement": a pose a strategy
/// wants the active piece to come to rest at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub rotation: u8,
}

impl Placement {
    pub const SPAWN: Self = Self::new(SPAWN_X, SPAWN_Y, 0);

    #[must_use]
    pub const fn new(x: i32, y: i32, rotation: u8) -> Self {
        Self { x, y, rotation }
    }

    #[must_use]
    pub const fn left(self) -> Self {
        Self::new(self.x - 1, self.y, self.rotation)
    }

    #[must_use]
    pub const fn right(self) -> Self {
        Self::new(self.x + 1, self.y, self.rotation)
    }

    #[must_use]
    pub const fn down(self) -> Self {
        Self::new(self.x, self.y + 1, self.rotation)
    }

    #[must_use]
    pub const fn up(self) -> Self {
        Self::new(self.x, self.y - 1, self.rotation)
    }

    /// Rotates clockwise, wrapping within the `rotations` states of the piece kind.
    #[must_use]
    pub const fn rotated_right(self, rotations: u8) -> Self {
        Self::new(self.x, self.y, (self.rotation + 1) % rotations)
    }

    /// Rotates counter-clockwise, wrapping within the `rotations` states of the piece kind.
    #[must_use]
    pub const fn rotated_left(self, rotations: u8) -> Self {
        Self::new(self.x, self.y, (self.rotation + rotations - 1) % rotations)
    }
}

/// A piece kind placed at a specific pose.
///
/// Pieces are plain values; moving or rotating returns a new `Piece`.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Piece, PieceKind};
///
/// let piece = Piece::spawn(PieceKind::T);
/// let moved = piece.left();
/// assert_eq!(moved.placement().x, piece.placement().x - 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    placement: Placement,
}

impl Piece {
    #[must_use]
    pub fn spawn(kind: PieceKind) -> Self {
        Self::new(kind, Placement::SPAWN)
    }

    /// Creates a piece at the given pose.
    ///
    /// # Panics
    ///
    /// Panics if the rotation index is out of range for the kind.
    #[must_use]
    pub fn new(kind: PieceKind, placement: Placement) -> Self {
        assert!(
            placement.rotation < kind.rotations(),
            "rotation {} out of range for {kind:?} ({} states)",
            placement.rotation,
            kind.rotations()
        );
        Self { kind, placement }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    #[must_use]
    pub fn with_placement(&self, placement: Placement) -> Self {
        Self::new(self.kind, placement)
    }

    /// Returns an iterator over the absolute cells covered by this piece.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let Placement { x, y, .. } = self.placement;
        self.kind
            .cell_offsets(self.placement.rotation)
            .iter()
            .map(move |&(dx, dy)| (x + dx, y + dy))
    }

    #[must_use]
    pub fn left(&self) -> Self {
        self.with_placement(self.placement.left())
    }

    #[must_use]
    pub fn right(&self) -> Self {
        self.with_placement(self.placement.right())
    }

    #[must_use]
    pub fn down(&self) -> Self {
        self.with_placement(self.placement.down())
    }

    #[must_use]
    pub fn rotated_right(&self) -> Self {
        self.with_placement(self.placement.rotated_right(self.kind.rotations()))
    }
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// S-piece.
    S = 0,
    /// Z-piece.
    Z = 1,
    /// I-piece.
    I = 2,
    /// O-piece.
    O = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::S,
        PieceKind::Z,
        PieceKind::I,
        PieceKind::O,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    /// Number of distinct rotation states: 1 for O, 2 for I/S/Z, 4 for J/L/T.
    #[must_use]
    pub const fn rotations(self) -> u8 {
        #[expect(clippy::cast_possible_truncation)]
        let len = SHAPE_OFFSETS[self as usize].len() as u8;
        len
    }

    /// Returns the four cell offsets of this kind in the given rotation.
    ///
    /// # Panics
    ///
    /// Panics if `rotation` is not below [`Self::rotations`].
    #[must_use]
    pub fn cell_offsets(self, rotation: u8) -> &'static [(i32, i32); 4] {
        let rotations = SHAPE_OFFSETS[self as usize];
        assert!(
            usize::from(rotation) < rotations.len(),
            "rotation {rotation} out of range for {self:?}"
        );
        &rotations[usize::from(rotation)]
    }

    /// Display color of the kind, as an RGB triple.
    #[must_use]
    pub const fn color(self) -> (u8, u8, u8) {
        match self {
            PieceKind::S => (0, 255, 0),
            PieceKind::Z => (255, 0, 0),
            PieceKind::I => (0, 255, 255),
            PieceKind::O => (255, 255, 0),
            PieceKind::J => (255, 165, 0),
            PieceKind::L => (0, 0, 255),
            PieceKind::T => (128, 0, 128),
        }
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

type RotationOffsets = [(i32, i32); 4];

// Offsets are relative to the anchor, listed row by row from the top.
const SHAPE_OFFSETS: [&[RotationOffsets]; PieceKind::LEN] = [
    // S-piece
    &[
        [(0, -2), (1, -2), (-1, -1), (0, -1)],
        [(0, -3), (0, -2), (1, -2), (1, -1)],
    ],
    // Z-piece
    &[
        [(-1, -2), (0, -2), (0, -1), (1, -1)],
        [(0, -3), (-1, -2), (0, -2), (-1, -1)],
    ],
    // I-piece
    &[
        [(0, -4), (0, -3), (0, -2), (0, -1)],
        [(-2, -3), (-1, -3), (0, -3), (1, -3)],
    ],
    // O-piece
    &[[(-1, -2), (0, -2), (-1, -1), (0, -1)]],
    // J-piece
    &[
        [(-1, -3), (-1, -2), (0, -2), (1, -2)],
        [(0, -3), (1, -3), (0, -2), (0, -1)],
        [(-1, -2), (0, -2), (1, -2), (1, -1)],
        [(0, -3), (0, -2), (-1, -1), (0, -1)],
    ],
    // L-piece
    &[
        [(1, -3), (-1, -2), (0, -2), (1, -2)],
        [(0, -3), (0, -2), (0, -1), (1, -1)],
        [(-1, -2), (0, -2), (1, -2), (-1, -1)],
        [(-1, -3), (0, -3), (0, -2), (0, -1)],
    ],
    // T-piece
    &[
        [(0, -3), (-1, -2), (0, -2), (1, -2)],
        [(0, -3), (0, -2), (1, -2), (0, -1)],
        [(-1, -2), (0, -2), (1, -2), (0, -1)],
        [(0, -3), (-1, -2), (0, -2), (0, -1)],
    ],
];

use std::{collections::VecDeque, ops::RangeInclusive};

use blockfall_engine::{Board, COLS, Placement, ROWS};

/// Anchor columns covered by the search domain.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const X_RANGE: RangeInclusive<i32> = -2..=COLS as i32 + 2;
/// Anchor rows covered by the search domain.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const Y_RANGE: RangeInclusive<i32> = 0..=ROWS as i32 + 4;

const WIDTH: usize = COLS + 5;
const HEIGHT: usize = ROWS + 5;

/// Dense per-pose table over the search domain for one piece kind.
///
/// Poses are stored x-major, then y, then rotation, which is also the order
/// [`PoseGrid::placements`] yields them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PoseGrid<T> {
    rotations: u8,
    cells: Vec<T>,
}

impl<T: Clone> PoseGrid<T> {
    pub(crate) fn new(rotations: u8, value: T) -> Self {
        Self {
            rotations,
            cells: vec![value; WIDTH * HEIGHT * usize::from(rotations)],
        }
    }
}

impl<T> PoseGrid<T> {
    fn index(&self, placement: Placement) -> Option<usize> {
        if !X_RANGE.contains(&placement.x)
            || !Y_RANGE.contains(&placement.y)
            || placement.rotation >= self.rotations
        {
            return None;
        }
        let x = usize::try_from(placement.x - X_RANGE.start()).ok()?;
        let y = usize::try_from(placement.y - Y_RANGE.start()).ok()?;
        let rotations = usize::from(self.rotations);
        Some((x * HEIGHT + y) * rotations + usize::from(placement.rotation))
    }

    pub(crate) fn get(&self, placement: Placement) -> Option<&T> {
        self.index(placement).map(|i| &self.cells[i])
    }

    pub(crate) fn get_mut(&mut self, placement: Placement) -> Option<&mut T> {
        self.index(placement).map(|i| &mut self.cells[i])
    }

    pub(crate) fn rotations(&self) -> u8 {
        self.rotations
    }

    /// Every pose of the domain in storage order.
    pub(crate) fn placements(&self) -> impl Iterator<Item = Placement> + use<T> {
        let rotations = self.rotations;
        X_RANGE.flat_map(move |x| {
            Y_RANGE.flat_map(move |y| (0..rotations).map(move |r| Placement::new(x, y, r)))
        })
    }
}

impl PoseGrid<bool> {
    pub(crate) fn is_set(&self, placement: Placement) -> bool {
        self.get(placement).copied().unwrap_or(false)
    }
}

/// Computes which poses of the active piece's kind fit on the board.
pub(crate) fn validity_map(board: &Board) -> PoseGrid<bool> {
    let rotations = board.active_piece().kind().rotations();
    let mut validity = PoseGrid::new(rotations, false);
    for placement in validity.placements() {
        let valid = board.is_valid_placement(placement);
        if let Some(cell) = validity.get_mut(placement) {
            *cell = valid;
        }
    }
    validity
}

/// Floods the pose space from the active piece's live pose.
///
/// A valid pose becomes accessible once a horizontal neighbor, the pose one
/// row above, or either rotation neighbor is accessible. The fill runs until
/// nothing new can be reached. Returns `None` when the live pose itself is
/// invalid.
fn accessible_map(board: &Board, validity: &PoseGrid<bool>) -> Option<PoseGrid<bool>> {
    let start = board.active_piece().placement();
    if !validity.is_set(start) {
        return None;
    }

    let rotations = validity.rotations();
    let mut accessible = PoseGrid::new(rotations, false);
    *accessible.get_mut(start)? = true;

    let mut frontier = VecDeque::from([start]);
    while let Some(placement) = frontier.pop_front() {
        let neighbors = [
            placement.right(),
            placement.left(),
            placement.down(),
            placement.rotated_right(rotations),
            placement.rotated_left(rotations),
        ];
        for neighbor in neighbors {
            if !validity.is_set(neighbor) || accessible.is_set(neighbor) {
                continue;
            }
            if let Some(cell) = accessible.get_mut(neighbor) {
                *cell = true;
                frontier.push_back(neighbor);
            }
        }
    }
    Some(accessible)
}

/// Lists every pose the active piece can reach and come to rest at.
///
/// A pose is resting when the piece can get there from its live pose by moving
/// sideways, dropping and rotating, and the pose one row below is blocked. The
/// result is ordered by `x`, then `y`, then rotation. An empty list means the
/// piece has nowhere to go, which only happens on a topped-out board.
///
/// # Example
///
/// ```
/// use blockfall_ai::reachability;
/// use blockfall_engine::Board;
///
/// let board = Board::new(0);
/// let placements = reachability::enumerate(&board);
/// assert!(!placements.is_empty());
/// assert!(placements.iter().all(|&p| board.is_valid_placement(p)));
/// ```
#[must_use]
pub fn enumerate(board: &Board) -> Vec<Placement> {
    let validity = validity_map(board);
    let Some(accessible) = accessible_map(board, &validity) else {
        return vec![];
    };
    validity
        .placements()
        .filter(|&p| accessible.is_set(p) && validity.is_set(p))
        .filter(|&p| p.y == *Y_RANGE.end() || !validity.is_set(p.down()))
        .collect()
}

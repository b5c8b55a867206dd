use std::collections::BTreeMap;

use blockfall_engine::{Board, Command, Placement};

use crate::reachability::{self, PoseGrid};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PathError {
    #[display("no path found from {start:?} to {target:?}")]
    NoPath { start: Placement, target: Placement },
}

/// How the cheapest known route entered a pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Start,
    /// Moved right from the pose on the left.
    FromLeft,
    /// Moved left from the pose on the right.
    FromRight,
    /// Rotated clockwise from the previous rotation state.
    FromRotation,
    /// Soft-dropped from the pose one row above.
    FromAbove,
}

impl Origin {
    /// The pose the move started from and the command that performs it.
    fn step_back(self, placement: Placement, rotations: u8) -> Option<(Placement, Command)> {
        match self {
            Origin::Start => None,
            Origin::FromLeft => Some((placement.left(), Command::Right)),
            Origin::FromRight => Some((placement.right(), Command::Left)),
            Origin::FromRotation => Some((placement.rotated_left(rotations), Command::Rotate)),
            Origin::FromAbove => Some((placement.up(), Command::Drop)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Step {
    distance: u32,
    origin: Origin,
}

/// Command sequence that moves the active piece from its live pose to a target.
///
/// Besides the forward sequence, the plan remembers which command to issue at
/// every pose on the route, so a controller can look up the next move from
/// wherever the piece currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPlan {
    target: Placement,
    commands: Vec<Command>,
    next: BTreeMap<Placement, Command>,
}

impl PathPlan {
    /// Finds a shortest route for the active piece to `target`.
    ///
    /// Moves are tried in the order right, left, clockwise rotation, soft drop;
    /// among equally short routes the earlier move kind wins.
    pub fn find(board: &Board, target: Placement) -> Result<Self, PathError> {
        let start = board.active_piece().placement();
        let no_path = PathError::NoPath { start, target };

        let validity = reachability::validity_map(board);
        if !validity.is_set(start) || !validity.is_set(target) {
            return Err(no_path);
        }
        let rotations = validity.rotations();
        let steps = shortest_steps(start, &validity);

        let mut commands = vec![];
        let mut next = BTreeMap::new();
        let mut current = target;
        let Some(mut step) = steps.get(current).copied().flatten() else {
            return Err(no_path);
        };
        while let Some((previous, command)) = step.origin.step_back(current, rotations) {
            let Some(previous_step) = steps.get(previous).copied().flatten() else {
                return Err(no_path);
            };
            if previous_step.distance >= step.distance {
                return Err(no_path);
            }
            next.insert(previous, command);
            commands.push(command);
            current = previous;
            step = previous_step;
        }
        if current != start {
            return Err(no_path);
        }
        commands.reverse();

        Ok(Self {
            target,
            commands,
            next,
        })
    }

    #[must_use]
    pub fn target(&self) -> Placement {
        self.target
    }

    /// The full command sequence from the starting pose, in order.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Command to issue when the piece is at `placement`.
    ///
    /// Returns `None` off the planned route, and at the target itself.
    #[must_use]
    pub fn next_command(&self, placement: Placement) -> Option<Command> {
        self.next.get(&placement).copied()
    }
}

/// Relaxes move distances from `start` over every valid pose until stable.
fn shortest_steps(start: Placement, validity: &PoseGrid<bool>) -> PoseGrid<Option<Step>> {
    let rotations = validity.rotations();
    let mut steps = PoseGrid::new(rotations, None);
    if let Some(cell) = steps.get_mut(start) {
        *cell = Some(Step {
            distance: 0,
            origin: Origin::Start,
        });
    }

    let origins = [
        Origin::FromLeft,
        Origin::FromRight,
        Origin::FromRotation,
        Origin::FromAbove,
    ];
    let mut changed = true;
    while changed {
        changed = false;
        for placement in validity.placements() {
            if !validity.is_set(placement) {
                continue;
            }
            for origin in origins {
                let Some((previous, _)) = origin.step_back(placement, rotations) else {
                    continue;
                };
                let Some(previous_step) = steps.get(previous).copied().flatten() else {
                    continue;
                };
                let distance = previous_step.distance + 1;
                let Some(cell) = steps.get_mut(placement) else {
                    continue;
                };
                if cell.is_none_or(|step| distance < step.distance) {
                    *cell = Some(Step { distance, origin });
                    changed = true;
                }
            }
        }
    }
    steps
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{Grid, Piece, PieceKind, ROWS};

    use super::*;

    fn board_with(kind: PieceKind, grid: Grid) -> Board {
        let mut board = Board::new(0).with_grid(grid);
        board.set_active_piece_unchecked(Piece::spawn(kind));
        board
    }

    fn replay(board: &mut Board, plan: &PathPlan) {
        for command in plan.commands() {
            let moved = match command {
                Command::Left => board.move_left(),
                Command::Right => board.move_right(),
                Command::Rotate => board.rotate(),
                Command::Drop => board.soft_drop(),
                Command::Lock => panic!("plans never lock"),
            };
            assert!(moved, "{command} was blocked");
        }
    }

    #[test]
    fn test_spawn_to_spawn_is_empty() {
        let board = board_with(PieceKind::T, Grid::new());
        let plan = PathPlan::find(&board, Placement::SPAWN).unwrap();
        assert!(plan.commands().is_empty());
        assert_eq!(plan.next_command(Placement::SPAWN), None);
    }

    #[test]
    fn test_straight_drop() {
        let board = board_with(PieceKind::O, Grid::new());
        let target = Placement::new(5, ROWS as i32, 0);
        let plan = PathPlan::find(&board, target).unwrap();
        assert_eq!(plan.commands(), vec![Command::Drop; ROWS]);
        assert_eq!(plan.next_command(Placement::SPAWN), Some(Command::Drop));
        assert_eq!(plan.next_command(target), None);
    }

    #[test]
    fn test_replay_reaches_every_placement() {
        for kind in PieceKind::ALL {
            let board = board_with(kind, Grid::new());
            for target in reachability::enumerate(&board) {
                let plan = PathPlan::find(&board, target).unwrap();
                let mut live = board.clone();
                replay(&mut live, &plan);
                assert_eq!(live.active_piece().placement(), target, "{kind:?}");
            }
        }
    }

    #[test]
    fn test_next_command_follows_route() {
        let board = board_with(PieceKind::L, Grid::new());
        let target = Placement::new(1, ROWS as i32, 3);
        let plan = PathPlan::find(&board, target).unwrap();
        let mut live = board.clone();
        let mut issued = vec![];
        while let Some(command) = plan.next_command(live.active_piece().placement()) {
            match command {
                Command::Left => live.move_left(),
                Command::Right => live.move_right(),
                Command::Rotate => live.rotate(),
                Command::Drop => live.soft_drop(),
                Command::Lock => unreachable!(),
            };
            issued.push(command);
        }
        assert_eq!(issued, plan.commands());
        assert_eq!(live.active_piece().placement(), target);
    }

    #[test]
    fn test_slide_under_overhang() {
        let grid = Grid::from_ascii(
            "
            ####......
            ..........
            ..........
            ",
        );
        let board = board_with(PieceKind::I, grid);
        let target = Placement::new(2, ROWS as i32 + 2, 1);
        let plan = PathPlan::find(&board, target).unwrap();
        let mut live = board.clone();
        replay(&mut live, &plan);
        assert_eq!(live.active_piece().placement(), target);
        // The piece has to pass the ledge on the right and slide back under it.
        assert!(plan.commands().contains(&Command::Right));
        assert!(plan.commands().contains(&Command::Left));
    }

    #[test]
    fn test_unreachable_target() {
        let grid = Grid::from_ascii(
            "
            ##########
            ..........
            ",
        );
        let board = board_with(PieceKind::O, grid);
        let sealed = Placement::new(5, ROWS as i32, 0);
        let err = PathPlan::find(&board, sealed).unwrap_err();
        assert!(matches!(err, PathError::NoPath { target, .. } if target == sealed));
        assert!(err.to_string().starts_with("no path found"));
    }
}

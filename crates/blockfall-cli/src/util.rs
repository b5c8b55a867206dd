use std::{fs::File, io, path::Path};

use anyhow::Context as _;
use blockfall_ai::heuristic::BoardMetrics;
use blockfall_engine::{COLS, GameSession, ROWS};

pub(crate) fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Renders the visible field as text, one string per row.
///
/// Locked and active cells show their piece letter, the AI's target `+`,
/// empty cells `.`.
pub(crate) fn board_lines(session: &GameSession) -> Vec<String> {
    let cells = session.cells();
    let overlay = session.overlay();
    (0..ROWS)
        .map(|y| {
            let row: String = (0..COLS)
                .map(|x| match cells.get(&(x, y)) {
                    Some(kind) => kind.as_char(),
                    None if overlay.contains(&(x, y)) => '+',
                    None => '.',
                })
                .collect();
            format!("|{row}|")
        })
        .chain([format!("+{}+", "-".repeat(COLS))])
        .collect()
}

pub(crate) fn print_board(session: &GameSession) {
    for line in board_lines(session) {
        println!("{line}");
    }
}

/// Final statistics and stack shape of a session, one string per line.
pub(crate) fn summary_lines(name: &str, session: &GameSession) -> Vec<String> {
    let stats = session.stats();
    let metrics = BoardMetrics::measure(session.board().grid().accepted());
    let upcoming: String = session.upcoming().map(|kind| kind.as_char()).collect();
    let mut lines = vec![
        name.to_owned(),
        format!("  score:        {}", stats.score()),
        format!("  pieces:       {}", stats.completed_pieces()),
        format!("  rows cleared: {}", stats.total_cleared_rows()),
    ];
    for (rows, count) in stats.row_cleared_counter().iter().enumerate().skip(1) {
        lines.push(format!("    {rows} at once: {count}"));
    }
    lines.extend([
        format!("  max height:   {}", metrics.max_height()),
        format!("  holes:        {}", metrics.holes),
        format!("  bumpiness:    {}", metrics.bumpiness),
        format!("  next pieces:  {upcoming}"),
        format!(
            "  result:       {}",
            if session.is_lost() { "topped out" } else { "alive" }
        ),
    ]);
    lines
}

pub(crate) fn print_summary(name: &str, session: &GameSession) {
    for line in summary_lines(name, session) {
        println!("{line}");
    }
}

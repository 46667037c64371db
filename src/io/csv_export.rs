use crate::model::Board;
use std::path::Path;

/// Export every period on the board to a semicolon-delimited CSV file.
///
/// Columns: Task ; Period ; Start ; End ; Color
/// Dates are formatted as DD/MM/YYYY; `End` is exclusive.
/// Returns the number of periods written.
pub fn export_periods_csv(board: &Board, path: &Path) -> Result<usize, String> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_path(path)
        .map_err(|e| format!("Failed to create CSV file: {}", e))?;

    wtr.write_record(["Task", "Period", "Start", "End", "Color"])
        .map_err(|e| format!("Failed to write header: {}", e))?;

    let mut written = 0;
    for task in &board.tasks {
        let mut periods: Vec<_> = task.periods.iter().collect();
        periods.sort_by_key(|p| p.start);
        for period in periods {
            wtr.write_record([
                &task.name,
                &period.name,
                &period.start.format("%d/%m/%Y").to_string(),
                &period.end.format("%d/%m/%Y").to_string(),
                &period.color,
            ])
            .map_err(|e| format!("Failed to write period '{}': {}", period.id, e))?;
            written += 1;
        }
    }

    wtr.flush().map_err(|e| format!("Failed to flush CSV: {}", e))?;
    Ok(written)
}

use std::path::Path;

use crate::tabulation::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

/// The columns holding scores: everything from the first vote column, except
/// the id and count columns.
pub fn score_columns(num_cols: usize, cfs: &FileSource) -> TabResult<Vec<usize>> {
    let first = cfs.first_vote_column_index()?;
    let id_idx_o = cfs.id_column_index_int()?;
    let count_idx_o = cfs.count_column_index_int()?;
    Ok((first..num_cols)
        .filter(|c| Some(*c) != id_idx_o && Some(*c) != count_idx_o)
        .collect())
}

/// An empty cell is no mark. Anything else must be an integer.
pub fn parse_score(cell: &str, lineno: usize) -> TabResult<Option<i64>> {
    let s = cell.trim();
    if s.is_empty() {
        return Ok(None);
    }
    s.parse::<i64>()
        .ok()
        .map(Some)
        .context(InvalidScoreSnafu {
            lineno,
            content: cell,
        })
}

pub fn parse_count(cell: &str, lineno: usize) -> TabResult<u64> {
    cell.trim().parse::<u64>().ok().context(InvalidCountSnafu {
        lineno,
        content: cell,
    })
}

// Primitives for reading CSV files.

use crate::tabulation::{
    io_common::{make_default_id, parse_count, parse_score, score_columns},
    *,
};

pub fn read_csv_scores(path: String, cfs: &FileSource) -> BTabResult<BallotTable> {
    let default_id = make_default_id(&path);

    let id_idx_o = cfs.id_column_index_int()?;
    let count_idx_o = cfs.count_column_index_int()?;
    let first_row = cfs.first_vote_row_index()?;

    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&path)
        .context(CsvOpenSnafu { path: path.clone() })?;
    let mut records = rdr.into_records();

    let header = records
        .next()
        .context(EmptyFileSnafu { path: path.clone() })?
        .context(CsvLineParseSnafu { lineno: 1_usize })?;
    let cols = score_columns(header.len(), cfs)?;
    let names: Vec<String> = cols
        .iter()
        .map(|&c| header.get(c).unwrap_or("").trim().to_string())
        .collect();
    debug!("read_csv_scores: header: {:?}", names);

    // The index starts at 1 to respect most conventions in the excel world
    for _ in 1..first_row {
        _ = records.next();
    }

    let mut ballots: Vec<ParsedBallot> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        let lineno = idx + first_row + 1;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let id = match id_idx_o {
            Some(id_idx) => line
                .get(id_idx)
                .context(CsvLineTooShortSnafu { lineno })?
                .to_string(),
            None => default_id(lineno),
        };
        let count = match count_idx_o {
            Some(count_idx) => parse_count(
                line.get(count_idx)
                    .context(CsvLineTooShortSnafu { lineno })?,
                lineno,
            )?,
            None => 1,
        };

        // Every cell is kept: a record shorter or longer than the header
        // becomes a wrong-length ballot.
        let mut scores: Vec<Option<i64>> = Vec::new();
        for c in score_columns(line.len(), cfs)? {
            scores.push(parse_score(line.get(c).unwrap_or(""), lineno)?);
        }
        debug!("read_csv_scores: lineno: {:?} scores: {:?}", lineno, &scores);

        ballots.push(ParsedBallot { id, count, scores });
    }
    Ok(BallotTable {
        header: names,
        ballots,
    })
}

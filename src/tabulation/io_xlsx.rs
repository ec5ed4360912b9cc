use calamine::DataType;

use crate::tabulation::{
    io_common::{make_default_id, parse_count, parse_score, score_columns},
    *,
};

/// Same layout as the CSV files: a header row with the candidate names, then
/// one ballot per row.
pub fn read_excel_scores(path: String, cfs: &FileSource) -> BTabResult<BallotTable> {
    let default_id = make_default_id(&path);
    let wrange = get_range(&path, cfs)?;

    let id_idx_o = cfs.id_column_index_int()?;
    let count_idx_o = cfs.count_column_index_int()?;
    let first_row = cfs.first_vote_row_index()?;

    let mut rows = wrange.rows();
    let header = rows.next().context(EmptyExcelSnafu {})?;
    debug!("read_excel_scores: header: {:?}", header);
    let cols = score_columns(header.len(), cfs)?;
    let names: Vec<String> = cols
        .iter()
        .map(|&c| header.get(c).map(cell_to_string).unwrap_or_default())
        .collect();

    let mut ballots: Vec<ParsedBallot> = Vec::new();
    for (idx, row) in rows.enumerate().skip(first_row.saturating_sub(1)) {
        let lineno = idx + 2;
        debug!("read_excel_scores: lineno: {:?} row: {:?}", lineno, row);
        let id = match id_idx_o {
            Some(id_idx) => row.get(id_idx).map(cell_to_string).unwrap_or_default(),
            None => default_id(lineno),
        };
        let count = match count_idx_o {
            Some(count_idx) => match row.get(count_idx) {
                Some(DataType::Int(i)) if *i >= 0 => *i as u64,
                Some(DataType::Float(f)) if *f >= 0.0 && f.fract() == 0.0 => *f as u64,
                Some(DataType::String(s)) => parse_count(s, lineno)?,
                x => return Err(wrong_cell(lineno, &x)),
            },
            None => 1,
        };

        let mut scores: Vec<Option<i64>> = Vec::new();
        for &c in cols.iter() {
            let score = match row.get(c) {
                None | Some(DataType::Empty) => None,
                Some(DataType::Int(i)) => Some(*i),
                Some(DataType::Float(f)) if f.fract() == 0.0 => Some(*f as i64),
                Some(DataType::String(s)) => parse_score(s, lineno)?,
                x => return Err(wrong_cell(lineno, &x)),
            };
            scores.push(score);
        }
        ballots.push(ParsedBallot { id, count, scores });
    }
    Ok(BallotTable {
        header: names,
        ballots,
    })
}

fn wrong_cell(lineno: usize, cell: &Option<&DataType>) -> Box<TabError> {
    Box::new(TabError::ExcelWrongCellType {
        lineno,
        content: format!("{:?}", cell),
    })
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.trim().to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) => f.to_string(),
        _ => String::new(),
    }
}

fn get_range(path: &String, cfs: &FileSource) -> BTabResult<calamine::Range<DataType>> {
    let worksheet_name_o = cfs.excel_worksheet_name.clone();
    debug!(
        "read_excel_scores: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> =
        open_workbook(path).context(OpeningExcelSnafu { path: path.clone() })?;

    let wrange = match worksheet_name_o {
        // A worksheet name was provided, use it.
        Some(worksheet_name) => workbook
            .worksheet_range(&worksheet_name)
            .context(MissingWorksheetSnafu {
                name: worksheet_name.clone(),
            })?
            .context(OpeningExcelSnafu { path: path.clone() })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu {})?
            .context(OpeningExcelSnafu { path: path.clone() })?,
    };
    Ok(wrange)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workbook() -> String {
        format!(
            "{}/tests/data/star_excel/star_excel_ballots.xlsx",
            env!("CARGO_MANIFEST_DIR")
        )
    }

    fn worksheet(name: &str) -> FileSource {
        let mut cfs = FileSource::simple("xlsx", &workbook());
        cfs.excel_worksheet_name = Some(name.to_string());
        cfs
    }

    #[test]
    fn first_worksheet_by_default() {
        let mut cfs = FileSource::simple("xlsx", &workbook());
        cfs.count_column_index = Some(serde_json::json!("C"));
        let table = read_excel_scores(workbook(), &cfs).unwrap();
        assert_eq!(table.header, vec!["Alice", "Bob"]);
        let counts: Vec<u64> = table.ballots.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 2, 1]);
        assert_eq!(table.ballots[0].scores, vec![Some(5), Some(0)]);
        assert_eq!(table.ballots[3].scores, vec![None, Some(2)]);
        assert_eq!(table.ballots[0].id, "star_excel_ballots.xlsx-00000002");
    }

    #[test]
    fn fractional_score() {
        let res = read_excel_scores(workbook(), &worksheet("Fractions"));
        assert!(matches!(
            res.map_err(|e| *e),
            Err(TabError::ExcelWrongCellType { lineno: 2, .. })
        ));
    }

    #[test]
    fn boolean_cell() {
        let res = read_excel_scores(workbook(), &worksheet("Flags"));
        assert!(matches!(
            res.map_err(|e| *e),
            Err(TabError::ExcelWrongCellType { lineno: 2, .. })
        ));
    }

    #[test]
    fn missing_worksheet() {
        let res = read_excel_scores(workbook(), &worksheet("Results"));
        assert!(matches!(
            res.map_err(|e| *e),
            Err(TabError::MissingWorksheet { .. })
        ));
    }
}

// Ballots stored directly as JSON:
// {"candidates": ["A", "B"], "ballots": [[5, 0], [null, 3]]}

use serde::Deserialize;

use crate::tabulation::{io_common::make_default_id, *};

#[derive(Debug, Clone, Deserialize)]
struct JsonBallots {
    candidates: Vec<String>,
    ballots: Vec<Vec<Option<i64>>>,
}

pub fn read_json_scores(path: String) -> BTabResult<BallotTable> {
    let default_id = make_default_id(&path);
    let contents = fs::read_to_string(&path).context(OpeningJsonSnafu { path: path.clone() })?;
    let js: JsonBallots = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    debug!(
        "read_json_scores: {} candidates, {} ballots",
        js.candidates.len(),
        js.ballots.len()
    );
    let ballots = js
        .ballots
        .into_iter()
        .enumerate()
        .map(|(idx, scores)| ParsedBallot {
            id: default_id(idx + 1),
            count: 1,
            scores,
        })
        .collect();
    Ok(BallotTable {
        header: js.candidates,
        ballots,
    })
}

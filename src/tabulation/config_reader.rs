use crate::tabulation::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
    #[serde(rename = "contestJurisdiction")]
    pub contest_jurisdiction: Option<String>,
    #[serde(rename = "contestOffice")]
    pub contest_office: Option<String>,
}

/// The `config` section of the summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct OutputConfig {
    pub contest: String,
    pub date: Option<String>,
    pub jurisdiction: Option<String>,
    pub office: Option<String>,
    pub method: VotingMethod,
    pub winners: u32,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "firstVoteColumnIndex")]
    pub _first_vote_column_index: Option<JSValue>,
    #[serde(rename = "firstVoteRowIndex")]
    pub _first_vote_row_index: Option<JSValue>,
    #[serde(rename = "idColumnIndex")]
    pub id_column_index: Option<JSValue>,
    #[serde(rename = "countColumnIndex")]
    pub count_column_index: Option<JSValue>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl FileSource {
    /// A source with all the defaults, as built from the command line.
    pub fn simple(provider: &str, file_path: &str) -> FileSource {
        FileSource {
            provider: provider.to_string(),
            file_path: file_path.to_string(),
            _first_vote_column_index: None,
            _first_vote_row_index: None,
            id_column_index: None,
            count_column_index: None,
            excel_worksheet_name: None,
        }
    }

    /// 0-based. Defaults to the first column.
    pub fn first_vote_column_index(&self) -> TabResult<usize> {
        match &self._first_vote_column_index {
            None => Ok(0),
            x => Ok(read_js_int(x)? - 1),
        }
    }

    /// 0-based. Defaults to the row right after the header.
    pub fn first_vote_row_index(&self) -> TabResult<usize> {
        match &self._first_vote_row_index {
            None => Ok(1),
            x => Ok(read_js_int(x)? - 1),
        }
    }

    pub fn id_column_index_int(&self) -> TabResult<Option<usize>> {
        match &self.id_column_index {
            None => Ok(None),
            x => read_js_int(x).map(|i| Some(i - 1)),
        }
    }

    pub fn count_column_index_int(&self) -> TabResult<Option<usize>> {
        match &self.count_column_index {
            None => Ok(None),
            x => read_js_int(x).map(|i| Some(i - 1)),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TabCandidate {
    pub name: String,
    #[serde(rename = "tieBreakOrder")]
    pub tie_break_order: Option<u32>,
    pub excluded: Option<bool>,
}

impl TabCandidate {
    pub fn is_excluded(&self) -> bool {
        self.excluded.unwrap_or(false)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TabRules {
    #[serde(rename = "votingMethod")]
    pub voting_method: String,
    #[serde(rename = "numberOfWinners")]
    pub number_of_winners: Option<u32>,
    #[serde(rename = "randomSeed")]
    pub random_seed: Option<String>,
    #[serde(rename = "breakTiesByOrder")]
    pub break_ties_by_order: Option<bool>,
}

impl TabRules {
    pub fn voting_method(&self) -> TabResult<VotingMethod> {
        match self.voting_method.as_str() {
            "star" => Ok(VotingMethod::Star),
            "approval" => Ok(VotingMethod::Approval),
            "plurality" => Ok(VotingMethod::Plurality),
            x => whatever!("unknown voting method: {}", x),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TabConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "cvrFileSources")]
    pub cvr_file_sources: Vec<FileSource>,
    /// If empty, the candidates are read from the header of the first source.
    #[serde(default)]
    pub candidates: Vec<TabCandidate>,
    pub rules: TabRules,
}

pub fn read_summary(path: String) -> BTabResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

// 1-based indexes, as numbers, numeric strings or Excel-style column letters.
fn read_js_int(x: &Option<JSValue>) -> TabResult<usize> {
    let res = match x {
        Some(JSValue::Number(n)) => n.as_u64().map(|x| x as usize),
        Some(JSValue::String(s)) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => {
            s.to_ascii_lowercase().chars().try_fold(0_usize, |acc, c| {
                acc.checked_mul(26)?
                    .checked_add(c as usize - 'a' as usize + 1)
            })
        }
        Some(JSValue::String(s)) => s.parse::<usize>().ok(),
        _ => None,
    };
    res.filter(|i| *i > 0).context(ParsingJsonNumberSnafu {})
}

use log::{debug, info, warn};

use score_voting::permutation::tie_break_order_from_seed;
use score_voting::*;
use snafu::{prelude::*, ErrorCompat, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Reader, Xlsx};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::tabulation::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_json;
mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum TabError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Expected a positive number or a column letter"))]
    ParsingJsonNumber {},
    #[snafu(display("Cannot find the directory of the configuration file"))]
    MissingParentDir {},
    #[snafu(display("No ballot source in the configuration"))]
    NoFileSource {},
    #[snafu(display("Unknown ballot provider {provider}"))]
    UnknownProvider { provider: String },

    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading CSV line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("CSV line {lineno} is too short"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("File {path} has no header"))]
    EmptyFile { path: String },
    #[snafu(display("Line {lineno}: expected an integer score or an empty cell, found {content:?}"))]
    InvalidScore { lineno: usize, content: String },
    #[snafu(display("Line {lineno}: expected a ballot count, found {content:?}"))]
    InvalidCount { lineno: usize, content: String },

    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook has no worksheet"))]
    EmptyExcel {},
    #[snafu(display("Cannot find worksheet {name}"))]
    MissingWorksheet { name: String },
    #[snafu(display("Line {lineno}: unexpected cell {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },

    #[snafu(display("Candidate {candidate_name} is not in the header of {path}"))]
    CandidateNotInHeader {
        candidate_name: String,
        path: String,
    },
    #[snafu(display("Voting error: {source}"))]
    Voting { source: VotingErrors },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between calculated summary and reference summary {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type TabResult<T> = Result<T, TabError>;
pub type BTabResult<T> = Result<T, Box<TabError>>;

/// One record of a ballot file.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedBallot {
    pub id: String,
    /// The number of identical ballots this record stands for.
    pub count: u64,
    /// One slot per score column of the file.
    pub scores: Vec<Option<i64>>,
}

/// The content of a ballot file: the names in the header of the score
/// columns, and the ballots.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct BallotTable {
    pub header: Vec<String>,
    pub ballots: Vec<ParsedBallot>,
}

fn read_ballot_data(root_path: &Path, cfs: &FileSource) -> BTabResult<BallotTable> {
    let p: PathBuf = root_path.join(&cfs.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read ballot file {:?}", p2);
    match cfs.provider.as_str() {
        "csv" => io_csv::read_csv_scores(p2, cfs),
        "json" => io_json::read_json_scores(p2),
        "xlsx" => io_xlsx::read_excel_scores(p2, cfs),
        x => Err(Box::new(TabError::UnknownProvider {
            provider: x.to_string(),
        })),
    }
}

// Lines up the columns of a file with the candidates. Excluded candidates are
// not in `names`, so their column is dropped.
fn align_ballots(
    names: &[String],
    table: &BallotTable,
    path: &str,
) -> TabResult<Vec<Vec<Option<i64>>>> {
    let mut col_indexes: Vec<usize> = Vec::new();
    for cname in names.iter() {
        let idx = table
            .header
            .iter()
            .position(|h| h == cname)
            .context(CandidateNotInHeaderSnafu {
                candidate_name: cname,
                path,
            })?;
        col_indexes.push(idx);
    }

    let mut res: Vec<Vec<Option<i64>>> = Vec::new();
    for pb in table.ballots.iter() {
        let scores: Vec<Option<i64>> = if pb.scores.len() == table.header.len() {
            col_indexes.iter().map(|&idx| pb.scores[idx]).collect()
        } else {
            // Keeps the record countable as malformed.
            debug!("align_ballots: ballot {} has the wrong length", pb.id);
            Vec::new()
        };
        for _ in 0..pb.count {
            res.push(scores.clone());
        }
    }
    Ok(res)
}

// An order on every candidate wins over the seed.
fn resolve_tie_break_order(config: &TabConfig, names: &[String]) -> Vec<u32> {
    let explicit: Option<Vec<u32>> = config
        .candidates
        .iter()
        .filter(|c| !c.is_excluded())
        .map(|c| c.tie_break_order)
        .collect();
    match (explicit, &config.rules.random_seed) {
        (Some(order), _) if !order.is_empty() => order,
        (_, Some(seed)) => tie_break_order_from_seed(names, seed),
        _ => Vec::new(),
    }
}

fn validate_rules(config: &TabConfig, names: &[String]) -> TabResult<VoteRules> {
    let rules = &config.rules;
    Ok(VoteRules {
        voting_method: rules.voting_method()?,
        number_of_winners: rules.number_of_winners.unwrap_or(1),
        tie_break_order: resolve_tie_break_order(config, names),
        break_ties_by_order: rules.break_ties_by_order.unwrap_or(true),
    })
}

fn candidate_names(cands: &[Candidate]) -> Vec<String> {
    cands.iter().map(|c| c.name.clone()).collect()
}

fn build_summary_js(config: &TabConfig, rules: &VoteRules, res: &ElectionResult) -> JSValue {
    let c = OutputConfig {
        contest: config.output_settings.contest_name.clone(),
        date: config.output_settings.contest_date.clone(),
        jurisdiction: config.output_settings.contest_jurisdiction.clone(),
        office: config.output_settings.contest_office.clone(),
        method: rules.voting_method,
        winners: rules.number_of_winners,
    };

    let rounds: Vec<JSValue> = res
        .round_results
        .iter()
        .enumerate()
        .map(|(idx, rr)| {
            json!({
                "round": idx + 1,
                "winners": candidate_names(&rr.winners),
                "runnerUp": candidate_names(&rr.runner_up),
                "tied": candidate_names(&rr.tied),
                "tieBreakType": rr.tie_break_type,
                "logs": rr.logs,
            })
        })
        .collect();

    let sd = &res.summary_data;
    let mut tally: JSMap<String, JSValue> = JSMap::new();
    for (cand, total) in sd.candidates.iter().zip(sd.total_scores.iter()) {
        tally.insert(cand.name.clone(), json!(total.score));
    }

    json!({
        "config": c,
        "results": {
            "elected": candidate_names(&res.elected),
            "tied": candidate_names(&res.tied),
            "other": candidate_names(&res.other),
            "rounds": rounds,
            "tally": tally,
            "ballots": {
                "tally": sd.n_tally_votes,
                "outOfBounds": sd.n_out_of_bounds_votes,
                "abstentions": sd.n_abstentions,
                "bullet": sd.n_bullet_votes,
            },
            "noPreferenceStars": sd.no_preference_stars,
        }
    })
}

/// Reads all the ballots of an election description and tabulates them.
///
/// Relative file paths are resolved against `root_path`.
pub fn tabulate(config: &TabConfig, root_path: &Path) -> BTabResult<JSValue> {
    if config.cvr_file_sources.is_empty() {
        return Err(Box::new(TabError::NoFileSource {}));
    }

    let mut tables: Vec<(String, BallotTable)> = Vec::new();
    for cfs in config.cvr_file_sources.iter() {
        let table = read_ballot_data(root_path, cfs)?;
        tables.push((cfs.file_path.clone(), table));
    }

    let names: Vec<String> = if config.candidates.is_empty() {
        tables[0].1.header.clone()
    } else {
        config
            .candidates
            .iter()
            .filter(|c| !c.is_excluded())
            .map(|c| c.name.clone())
            .collect()
    };
    info!("candidates: {:?}", names);

    let mut ballots: Vec<Vec<Option<i64>>> = Vec::new();
    for (path, table) in tables.iter() {
        ballots.extend(align_ballots(&names, table, path)?);
    }
    debug!("ballots: {:?}", ballots);

    let rules = validate_rules(config, &names)?;
    let res = run_election(&names, &ballots, &rules).context(VotingSnafu {})?;
    info!("res {:?}", res);

    Ok(build_summary_js(config, &rules, &res))
}

/// Runs the election described in a JSON configuration file.
pub fn run_election_config(
    config_path: String,
    check_summary_path: Option<String>,
    out: Option<String>,
) -> BTabResult<()> {
    let config_p = Path::new(config_path.as_str());
    let config_str = fs::read_to_string(config_path.clone()).context(OpeningJsonSnafu {
        path: config_path.clone(),
    })?;
    let config: TabConfig = serde_json::from_str(&config_str).context(ParsingJsonSnafu {})?;
    info!("config: {:?}", config);

    let root_p = config_p.parent().context(MissingParentDirSnafu {})?;
    let result_js = tabulate(&config, root_p)?;

    let default_out = config
        .output_settings
        .output_directory
        .as_ref()
        .map(|dir| root_p.join(dir).join("summary.json"));
    write_and_check(&result_js, out, default_out, check_summary_path)
}

/// Runs the election described by the command line arguments.
pub fn run_election_cli(args: &Args) -> BTabResult<()> {
    if let Some(config_path) = args.config.clone() {
        return run_election_config(config_path, args.reference.clone(), args.out.clone());
    }
    let result_js = summary_from_args(args)?;
    write_and_check(&result_js, args.out.clone(), None, args.reference.clone())
}

// Without a configuration file, the candidates come from the header of the
// input file.
fn summary_from_args(args: &Args) -> BTabResult<JSValue> {
    let config = config_from_args(args)?;
    tabulate(&config, Path::new(""))
}

fn config_from_args(args: &Args) -> TabResult<TabConfig> {
    let input = match args.input.clone() {
        Some(x) => x,
        None => whatever!("either --config or --input must be provided"),
    };
    let mut source = FileSource::simple(
        args.input_type.as_deref().unwrap_or("csv"),
        input.as_str(),
    );
    source.excel_worksheet_name = args.excel_worksheet_name.clone();
    Ok(TabConfig {
        output_settings: OutputSettings {
            contest_name: io_common::simplify_file_name(input.as_str()),
            output_directory: None,
            contest_date: None,
            contest_jurisdiction: None,
            contest_office: None,
        },
        cvr_file_sources: vec![source],
        candidates: Vec::new(),
        rules: TabRules {
            voting_method: args.method.clone().unwrap_or_else(|| "star".to_string()),
            number_of_winners: args.winners,
            random_seed: args.seed.clone(),
            break_ties_by_order: None,
        },
    })
}

fn write_and_check(
    result_js: &JSValue,
    out: Option<String>,
    default_out: Option<PathBuf>,
    check_summary_path: Option<String>,
) -> BTabResult<()> {
    let pretty_js_stats = serde_json::to_string_pretty(result_js).context(ParsingJsonSnafu {})?;

    match (out.as_deref(), default_out) {
        (Some("stdout"), _) | (None, None) => println!("{}", pretty_js_stats),
        (Some(path), _) => write_file(path, &pretty_js_stats)?,
        (None, Some(path)) => write_file(&path.display().to_string(), &pretty_js_stats)?,
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(summary_p.clone())?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            return Err(Box::new(TabError::ReferenceMismatch { path: summary_p }));
        }
    }
    Ok(())
}

fn write_file(path: &str, contents: &str) -> TabResult<()> {
    info!("Writing summary to {:?}", path);
    fs::write(path, contents).context(WritingOutputSnafu { path })
}

#[cfg(test)]
fn run_election_test(test_name: &str, config_lpath: &str, summary_lpath: &str) -> BTabResult<()> {
    let test_dir = format!("{}/tests/data", env!("CARGO_MANIFEST_DIR"));
    info!("Running test {}", test_name);
    let res = run_election_config(
        format!("{}/{}/{}", test_dir, test_name, config_lpath),
        Some(format!("{}/{}/{}", test_dir, test_name, summary_lpath)),
        None,
    );
    if let Err(e) = &res {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured {}", e);
        if let Some(bt) = ErrorCompat::backtrace(e.as_ref()) {
            eprintln!("trace: {}", bt);
        }
    }
    res
}

#[cfg(test)]
pub fn test_wrapper(test_name: &str) {
    let res = run_election_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_summary.json", test_name).as_str(),
    );
    assert!(res.is_ok(), "test {} failed: {:?}", test_name, res);
}

#[cfg(test)]
mod tests {

    use super::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn star_three_candidates() {
        init_logger();
        test_wrapper("star_three_candidates");
    }

    #[test]
    fn approval_two_seats() {
        init_logger();
        test_wrapper("approval_two_seats");
    }

    #[test]
    fn plurality_excluded() {
        init_logger();
        test_wrapper("plurality_excluded");
    }

    #[test]
    fn star_long_row() {
        init_logger();
        test_wrapper("star_long_row");
    }

    #[test]
    fn star_excel() {
        init_logger();
        test_wrapper("star_excel");
    }

    #[test]
    fn mismatched_reference() {
        init_logger();
        let res = run_election_test(
            "star_three_candidates",
            "star_three_candidates_config.json",
            "../approval_two_seats/approval_two_seats_expected_summary.json",
        );
        assert!(matches!(
            res.map_err(|e| *e),
            Err(TabError::ReferenceMismatch { .. })
        ));
    }

    #[test]
    fn invalid_score_cell() {
        init_logger();
        let res = run_election_test(
            "invalid_score",
            "invalid_score_config.json",
            "invalid_score_config.json",
        );
        assert!(matches!(
            res.map_err(|e| *e),
            Err(TabError::InvalidScore { lineno: 3, .. })
        ));
    }

    #[test]
    fn from_command_line() {
        init_logger();
        let args = Args {
            config: None,
            reference: None,
            out: None,
            input: Some(format!(
                "{}/tests/data/approval_two_seats/approval_two_seats_ballots.json",
                env!("CARGO_MANIFEST_DIR")
            )),
            input_type: Some("json".to_string()),
            method: Some("approval".to_string()),
            winners: Some(2),
            seed: None,
            excel_worksheet_name: None,
            verbose: false,
        };
        let js = summary_from_args(&args).unwrap();
        // Without an explicit order, Bob is ahead of Carol in the input.
        assert_eq!(js["results"]["elected"], json!(["Dave", "Bob"]));
        assert_eq!(js["config"]["method"], json!("approval"));
        assert_eq!(js["results"]["ballots"]["bullet"], json!(1));
    }

    #[test]
    fn config_needs_input() {
        let args = Args {
            config: None,
            reference: None,
            out: None,
            input: None,
            input_type: None,
            method: None,
            winners: None,
            seed: None,
            excel_worksheet_name: None,
            verbose: false,
        };
        assert!(config_from_args(&args).is_err());
    }

    #[test]
    fn explicit_order_wins_over_seed() {
        let config: TabConfig = serde_json::from_str(
            r#"{
            "outputSettings": {"contestName": "Test"},
            "cvrFileSources": [],
            "candidates": [
                {"name": "A", "tieBreakOrder": 2},
                {"name": "B", "tieBreakOrder": 1, "excluded": true},
                {"name": "C", "tieBreakOrder": 0}
            ],
            "rules": {"votingMethod": "star", "randomSeed": "2024"}
        }"#,
        )
        .unwrap();
        let names = vec!["A".to_string(), "C".to_string()];
        assert_eq!(resolve_tie_break_order(&config, &names), vec![2, 0]);
    }
}

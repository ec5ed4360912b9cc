use log::{debug, info};

use std::collections::HashSet;

use crate::approval::run_single_round;
use crate::ballot::parse_ballots;
use crate::config::*;
use crate::star::run_star_round;
use crate::summary::*;

/// Runs an election and returns the placement of every candidate.
///
/// Arguments:
/// * `candidates` the names of the candidates, in ballot column order. Names must be unique.
/// * `ballots` one score per candidate on each ballot. `None` is an empty slot.
/// * `rules` the rules that govern this election
///
/// Ballots that do not fit the voting method are counted in
/// `n_out_of_bounds_votes` and otherwise ignored.
pub fn run_election(
    candidates: &[String],
    ballots: &[Vec<Option<i64>>],
    rules: &VoteRules,
) -> Result<ElectionResult, VotingErrors> {
    info!(
        "Processing {:?} ballots, candidates: {:?}, rules: {:?}",
        ballots.len(),
        candidates,
        rules
    );
    checks(candidates, rules)?;

    let method = rules.voting_method;
    let parsed = parse_ballots(ballots, candidates.len(), method);
    info!(
        "run_election: {} valid ballots, {} out of bounds, {} abstentions",
        parsed.n_valid(),
        parsed.n_invalid,
        parsed.n_abstentions
    );

    let cands = make_candidates(candidates, &rules.tie_break_order);
    let mut summary = get_summary_data(cands, &parsed, method);

    let n_winners = rules.number_of_winners as usize;
    let placed = match method {
        VotingMethod::Star => place_candidates(&summary, n_winners, run_star_round)?,
        VotingMethod::Approval | VotingMethod::Plurality => {
            place_candidates(&summary, n_winners, |s, remaining| {
                run_single_round(s, remaining, rules.break_ties_by_order)
            })?
        }
    };

    if method == VotingMethod::Star {
        if let Some((i, j)) = first_round_pair(&placed.round_results) {
            summary.no_preference_stars = get_no_preference_stars(&parsed, i, j, method);
        }
    }

    let order: Vec<usize> = placed
        .elected
        .iter()
        .chain(placed.tied.iter())
        .chain(placed.other.iter())
        .copied()
        .collect();
    let lookup = |cands: &[usize]| -> Vec<Candidate> {
        cands.iter().map(|&c| summary.candidates[c].clone()).collect()
    };
    let (elected, tied, other) = (
        lookup(&placed.elected),
        lookup(&placed.tied),
        lookup(&placed.other),
    );

    Ok(ElectionResult {
        elected,
        tied,
        other,
        round_results: placed.round_results,
        summary_data: sort_data(summary, &order),
    })
}

/// Runs a STAR election.
///
/// `tie_break_order` may be empty, in which case the input order is used.
pub fn star(
    candidates: &[String],
    ballots: &[Vec<Option<i64>>],
    n_winners: u32,
    tie_break_order: &[u32],
) -> Result<ElectionResult, VotingErrors> {
    run_election(
        candidates,
        ballots,
        &rules_for(VotingMethod::Star, n_winners, tie_break_order),
    )
}

/// Runs an approval election.
pub fn approval(
    candidates: &[String],
    ballots: &[Vec<Option<i64>>],
    n_winners: u32,
    tie_break_order: &[u32],
) -> Result<ElectionResult, VotingErrors> {
    run_election(
        candidates,
        ballots,
        &rules_for(VotingMethod::Approval, n_winners, tie_break_order),
    )
}

/// Runs a plurality election.
pub fn plurality(
    candidates: &[String],
    ballots: &[Vec<Option<i64>>],
    n_winners: u32,
    tie_break_order: &[u32],
) -> Result<ElectionResult, VotingErrors> {
    run_election(
        candidates,
        ballots,
        &rules_for(VotingMethod::Plurality, n_winners, tie_break_order),
    )
}

fn rules_for(method: VotingMethod, n_winners: u32, tie_break_order: &[u32]) -> VoteRules {
    VoteRules {
        number_of_winners: n_winners,
        tie_break_order: tie_break_order.to_vec(),
        ..VoteRules::with_method(method)
    }
}

fn checks(candidates: &[String], rules: &VoteRules) -> Result<(), VotingErrors> {
    if candidates.is_empty() {
        return Err(VotingErrors::EmptyElection);
    }
    let mut seen: HashSet<&str> = HashSet::new();
    for name in candidates.iter() {
        if !seen.insert(name.as_str()) {
            return Err(VotingErrors::DuplicateCandidate { name: name.clone() });
        }
    }
    let n = rules.number_of_winners;
    if n == 0 || n as usize > candidates.len() {
        return Err(VotingErrors::InvalidNumberOfWinners {
            requested: n,
            candidates: candidates.len(),
        });
    }
    Ok(())
}

// Positions in the input order.
#[derive(Debug, Default)]
struct Placement {
    elected: Vec<usize>,
    tied: Vec<usize>,
    other: Vec<usize>,
    round_results: Vec<RoundResult>,
}

// Runs rounds until every candidate is placed.
fn place_candidates<F>(
    summary: &SummaryData,
    n_winners: usize,
    run_round: F,
) -> Result<Placement, VotingErrors>
where
    F: Fn(&SummaryData, &[usize]) -> Result<RoundResult, VotingErrors>,
{
    let n = summary.candidates.len();
    let mut remaining: Vec<usize> = (0..n).collect();
    let mut placement = Placement::default();

    // Each round places at least one candidate, so n rounds are enough.
    for round_id in 1..=n {
        if remaining.is_empty() {
            break;
        }
        let round = run_round(summary, &remaining)?;
        let winners: Vec<usize> = round.winners.iter().map(|c| c.index).collect();
        debug!(
            "place_candidates: round {}: winners {:?}, remaining {:?}",
            round_id, winners, remaining
        );

        let n_placed = placement.elected.len() + placement.tied.len();
        if n_placed + winners.len() <= n_winners {
            placement.elected.extend(winners.iter().copied());
        } else if placement.tied.is_empty() && placement.elected.len() < n_winners {
            placement.tied.extend(winners.iter().copied());
        } else {
            placement.other.extend(winners.iter().copied());
        }
        placement.round_results.push(round);

        let before = remaining.len();
        remaining.retain(|c| !winners.contains(c));
        if remaining.len() == before {
            return Err(VotingErrors::NoConvergence {
                remaining: candidate_names(summary, &remaining),
            });
        }
    }

    if !remaining.is_empty() {
        return Err(VotingErrors::NoConvergence {
            remaining: candidate_names(summary, &remaining),
        });
    }
    info!(
        "place_candidates: elected: {:?}, tied: {:?}, other: {:?}",
        candidate_names(summary, &placement.elected),
        candidate_names(summary, &placement.tied),
        candidate_names(summary, &placement.other)
    );
    Ok(placement)
}

fn candidate_names(summary: &SummaryData, cands: &[usize]) -> Vec<String> {
    cands
        .iter()
        .map(|&c| summary.candidates[c].name.clone())
        .collect()
}

// The two finalists of the first round: the winner, and the other finalist
// if there was a runoff.
fn first_round_pair(rounds: &[RoundResult]) -> Option<(usize, usize)> {
    let first = rounds.first()?;
    let winner = first.winners.first()?;
    let other = first
        .winners
        .get(1)
        .or_else(|| first.runner_up.first())?;
    Some((winner.index, other.index))
}

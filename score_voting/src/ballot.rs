// Ballot classification.
// A raw ballot holds one optional integer per candidate. It is either counted,
// rejected as invalid or set aside as an abstention.

use log::debug;

use crate::config::VotingMethod;

/// Why a ballot was rejected.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum InvalidReason {
    /// The ballot does not have exactly one slot per candidate.
    WrongLength { expected: usize, found: usize },
    /// A slot holds a value outside the bounds of the method.
    OutOfBounds { slot: usize, value: i64 },
    /// More candidates are supported than the method allows.
    TooManySelections { selected: usize, allowed: usize },
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum BallotStatus {
    Valid,
    Invalid(InvalidReason),
    /// Every slot is empty or zero.
    Abstention,
}

impl BallotStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, BallotStatus::Valid)
    }

    pub fn is_abstention(&self) -> bool {
        matches!(self, BallotStatus::Abstention)
    }
}

/// Decides the status of a single ballot for the given method.
///
/// Bounds are checked before the selection cap, and both before the
/// abstention check: a ballot with an out-of-range value is invalid even if
/// it supports nobody.
pub fn classify(ballot: &[Option<i64>], n_candidates: usize, method: VotingMethod) -> BallotStatus {
    if ballot.len() != n_candidates {
        return BallotStatus::Invalid(InvalidReason::WrongLength {
            expected: n_candidates,
            found: ballot.len(),
        });
    }
    let (min, max) = (method.min_score(), method.max_score());
    let mut selected = 0;
    for (slot, value) in ballot.iter().enumerate() {
        match *value {
            Some(v) if v < min || v > max => {
                return BallotStatus::Invalid(InvalidReason::OutOfBounds { slot, value: v });
            }
            Some(v) if v > min => {
                selected += 1;
            }
            _ => {}
        }
    }
    if let Some(allowed) = method.max_selections() {
        if selected > allowed {
            return BallotStatus::Invalid(InvalidReason::TooManySelections { selected, allowed });
        }
    }
    if selected == 0 {
        return BallotStatus::Abstention;
    }
    BallotStatus::Valid
}

/// The ballots of an election, sorted by status.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedBallots {
    /// Valid ballots with empty slots replaced by the minimum score.
    pub scores: Vec<Vec<u32>>,
    pub n_invalid: u64,
    pub n_abstentions: u64,
}

impl ParsedBallots {
    pub fn n_valid(&self) -> u64 {
        self.scores.len() as u64
    }
}

/// Classifies every ballot exactly once.
pub fn parse_ballots(
    ballots: &[Vec<Option<i64>>],
    n_candidates: usize,
    method: VotingMethod,
) -> ParsedBallots {
    let mut res = ParsedBallots {
        scores: Vec::with_capacity(ballots.len()),
        n_invalid: 0,
        n_abstentions: 0,
    };
    for (idx, ballot) in ballots.iter().enumerate() {
        match classify(ballot, n_candidates, method) {
            BallotStatus::Valid => {
                let min = method.min_score();
                res.scores.push(
                    ballot
                        .iter()
                        .map(|v| (v.unwrap_or(min) - min) as u32)
                        .collect(),
                );
            }
            BallotStatus::Invalid(reason) => {
                debug!("parse_ballots: ballot {} is invalid: {:?}", idx, reason);
                res.n_invalid += 1;
            }
            BallotStatus::Abstention => {
                res.n_abstentions += 1;
            }
        }
    }
    debug!(
        "parse_ballots: {} valid, {} invalid, {} abstentions",
        res.scores.len(),
        res.n_invalid,
        res.n_abstentions
    );
    res
}

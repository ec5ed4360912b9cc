// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;
use std::ops::{Index, IndexMut};

use serde::{Serialize, Serializer};

use crate::logs::TabulationLog;

/// The voting methods understood by the tabulator.
///
/// Each method fixes the range of values a ballot slot may hold and
/// whether the number of supported candidates is capped.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VotingMethod {
    /// Score then automatic runoff. Slots hold 0 to 5 stars.
    Star,
    /// Any number of candidates may be approved (1) or not (0).
    Approval,
    /// At most one candidate may be marked.
    Plurality,
}

impl VotingMethod {
    pub fn min_score(&self) -> i64 {
        0
    }

    pub fn max_score(&self) -> i64 {
        match self {
            VotingMethod::Star => 5,
            VotingMethod::Approval | VotingMethod::Plurality => 1,
        }
    }

    /// The maximum number of candidates that may receive a non-zero mark, if capped.
    pub fn max_selections(&self) -> Option<usize> {
        match self {
            VotingMethod::Plurality => Some(1),
            VotingMethod::Star | VotingMethod::Approval => None,
        }
    }

    /// Number of buckets in a score histogram (one per possible score).
    pub fn score_range(&self) -> usize {
        (self.max_score() - self.min_score() + 1) as usize
    }
}

/// The rules that govern one tabulation.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VoteRules {
    pub voting_method: VotingMethod,
    pub number_of_winners: u32,
    /// One value per candidate, lower values win final ties.
    /// If shorter than the candidate list, the input order is used instead.
    pub tie_break_order: Vec<u32>,
    /// Approval and plurality only: separate candidates tied on score using
    /// the tie-break order. When false, a tied group is placed together.
    pub break_ties_by_order: bool,
}

impl VoteRules {
    pub const DEFAULT_RULES: VoteRules = VoteRules {
        voting_method: VotingMethod::Star,
        number_of_winners: 1,
        tie_break_order: Vec::new(),
        break_ties_by_order: true,
    };

    pub fn with_method(method: VotingMethod) -> VoteRules {
        VoteRules {
            voting_method: method,
            ..VoteRules::DEFAULT_RULES
        }
    }
}

// ******** Output data structures *********

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct Candidate {
    /// Position of the candidate in the input list.
    pub index: usize,
    pub name: String,
    pub tie_break_order: u32,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize)]
pub struct TotalScore {
    pub index: usize,
    pub score: u64,
}

/// Square matrix stored row-major in a single allocation.
///
/// Serialized as a list of rows.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Matrix {
    size: usize,
    values: Vec<u64>,
}

impl Matrix {
    pub fn new(size: usize) -> Matrix {
        Matrix {
            size,
            values: vec![0; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn row(&self, i: usize) -> &[u64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }

    /// Returns a copy with rows and columns permuted: entry (a, b) of the
    /// result is entry (order[a], order[b]) of this matrix.
    pub fn permuted(&self, order: &[usize]) -> Matrix {
        let mut res = Matrix::new(order.len());
        for (a, &i) in order.iter().enumerate() {
            for (b, &j) in order.iter().enumerate() {
                res[(a, b)] = self[(i, j)];
            }
        }
        res
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = u64;
    fn index(&self, (i, j): (usize, usize)) -> &u64 {
        &self.values[i * self.size + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut u64 {
        &mut self.values[i * self.size + j]
    }
}

impl Serialize for Matrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq((0..self.size).map(|i| self.row(i)))
    }
}

/// The aggregate statistics of an election.
///
/// Before final placement, every array is indexed by input position.
/// In an `ElectionResult`, the arrays follow the placement order
/// `elected ++ tied ++ other` while each `Candidate` and `TotalScore`
/// keeps its input `index`.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct SummaryData {
    pub candidates: Vec<Candidate>,
    pub total_scores: Vec<TotalScore>,
    pub score_hist: Vec<Vec<u64>>,
    /// `preference_matrix[(i, j)]`: ballots scoring i strictly above j.
    pub preference_matrix: Matrix,
    /// `pairwise_matrix[(i, j)] == 1` iff i beats j head to head.
    pub pairwise_matrix: Matrix,
    pub n_tally_votes: u64,
    pub n_out_of_bounds_votes: u64,
    pub n_abstentions: u64,
    pub n_bullet_votes: u64,
    /// For the two candidates of the first round: how many ballots gave
    /// them the same score, per score value.
    pub no_preference_stars: Vec<u64>,
}

/// The tie-break criterion that decided a round, if any.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreakType {
    None,
    Score,
    FiveStar,
    /// Resolved by the tie-break order. It is named after the source of
    /// the order, which is typically drawn at random before tabulation.
    Random,
}

/// Statistics for one round
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct RoundResult {
    pub winners: Vec<Candidate>,
    pub runner_up: Vec<Candidate>,
    pub tied: Vec<Candidate>,
    pub tie_break_type: TieBreakType,
    pub logs: Vec<TabulationLog>,
}

impl RoundResult {
    pub(crate) fn empty() -> RoundResult {
        RoundResult {
            winners: Vec::new(),
            runner_up: Vec::new(),
            tied: Vec::new(),
            tie_break_type: TieBreakType::None,
            logs: Vec::new(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct ElectionResult {
    pub elected: Vec<Candidate>,
    pub tied: Vec<Candidate>,
    pub other: Vec<Candidate>,
    pub round_results: Vec<RoundResult>,
    pub summary_data: SummaryData,
}

impl ElectionResult {
    /// All the candidates in final placement order.
    pub fn placement(&self) -> Vec<&Candidate> {
        self.elected
            .iter()
            .chain(self.tied.iter())
            .chain(self.other.iter())
            .collect()
    }
}

/// Errors that prevent the algorithm from completing successfully.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum VotingErrors {
    EmptyElection,
    DuplicateCandidate { name: String },
    InvalidNumberOfWinners { requested: u32, candidates: usize },
    /// A round was requested without any candidate left.
    EmptyRound,
    /// The set of remaining candidates did not shrink between two rounds.
    NoConvergence { remaining: Vec<String> },
}

impl Error for VotingErrors {}

impl Display for VotingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VotingErrors::EmptyElection => write!(f, "the election has no candidate"),
            VotingErrors::DuplicateCandidate { name } => {
                write!(f, "candidate {:?} is declared more than once", name)
            }
            VotingErrors::InvalidNumberOfWinners {
                requested,
                candidates,
            } => write!(
                f,
                "cannot elect {} winner(s) among {} candidate(s)",
                requested, candidates
            ),
            VotingErrors::EmptyRound => write!(f, "a round was run without candidates"),
            VotingErrors::NoConvergence { remaining } => write!(
                f,
                "the remaining candidates did not change after a round: {:?}",
                remaining
            ),
        }
    }
}

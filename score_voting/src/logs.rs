use serde::Serialize;

/// One step of the audit trail of a round.
///
/// Entries are recorded in the order the decisions are taken. They name
/// the candidates involved and the values that were compared, so that the
/// outcome of a round can be replayed by hand.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
#[serde(tag = "key", rename_all = "snake_case")]
pub enum TabulationLog {
    /// Only one candidate is left: it wins the round without a runoff.
    SoleRemainingCandidate { name: String },

    // Score round
    ScoreRoundAdvanceToRunoff { name: String, score: u64 },
    ScoringRoundTiebreakerStart { names: Vec<String> },
    ScoreTiebreakEnd { names: Vec<String>, score: u64 },
    PairwiseTiebreakRemoveCandidate {
        name: String,
        losses: u64,
        n_tied_candidates: usize,
    },
    PairwiseTiebreakAdvanceToRunoff {
        name: String,
        losses: u64,
        n_tied_candidates: usize,
    },
    PairwiseTiebreakEnd { names: Vec<String>, losses: u64 },
    FiveStarTiebreakAdvanceToRunoff { name: String, five_star_count: u64 },
    FiveStarTiebreakRemoveCandidate { name: String, five_star_count: u64 },
    FiveStarTiebreakEnd {
        names: Vec<String>,
        five_star_count: u64,
    },
    RandomTiebreakAdvanceToRunoff { name: String },
    /// All the other tied candidates were removed by a tie-break criterion.
    LastTiedCandidateAdvanceToRunoff { name: String },

    // Automatic runoff
    AutomaticRunoffStart {
        candidate_a: String,
        candidate_b: String,
    },
    AutomaticRunoffWin {
        winner: String,
        loser: String,
        winner_votes: u64,
        loser_votes: u64,
        equal_votes: u64,
    },
    AutomaticRunoffTie {
        names: Vec<String>,
        tied_votes: u64,
        equal_votes: u64,
    },
    RunoffRoundTiebreakerStart { names: Vec<String> },
    ScoreTiebreakWinRunoff {
        winner: String,
        loser: String,
        winner_score: u64,
        loser_score: u64,
    },
    FiveStarTiebreakWinRunoff {
        winner: String,
        loser: String,
        winner_five_star_count: u64,
        loser_five_star_count: u64,
    },
    RandomTiebreakWinRunoff { winner: String, loser: String },

    // Single round methods
    HighestScore { names: Vec<String>, score: u64 },
    TieBreakOrderSelect {
        winner: String,
        tie_break_order: u32,
        names: Vec<String>,
    },
}

// Single round methods: approval and plurality.
// Candidates are placed by decreasing total score, one group at a time.

use log::debug;

use crate::config::*;
use crate::logs::TabulationLog;
use crate::tiebreak::*;

/// Selects the next group of candidates among the remaining ones.
///
/// The group is every candidate tied for the highest total. When
/// `break_ties` is set, only the first of them in tie-break order is kept.
pub fn run_single_round(
    summary: &SummaryData,
    remaining: &[usize],
    break_ties: bool,
) -> Result<RoundResult, VotingErrors> {
    if remaining.is_empty() {
        return Err(VotingErrors::EmptyRound);
    }
    let mut res = RoundResult::empty();
    let leaders = score_leaders(summary, remaining);
    res.logs.push(TabulationLog::HighestScore {
        names: names(summary, &leaders),
        score: total_score(summary, leaders[0]),
    });

    if leaders.len() == 1 {
        res.winners.push(summary.candidates[leaders[0]].clone());
        return Ok(res);
    }

    res.tied = leaders
        .iter()
        .map(|&c| summary.candidates[c].clone())
        .collect();
    if !break_ties {
        debug!("run_single_round: keeping tied group {:?}", leaders);
        res.winners = res.tied.clone();
        return Ok(res);
    }

    let winner = sort_by_tie_break_order(summary, &leaders)[0];
    res.logs.push(TabulationLog::TieBreakOrderSelect {
        winner: summary.candidates[winner].name.clone(),
        tie_break_order: summary.candidates[winner].tie_break_order,
        names: names(summary, &leaders),
    });
    res.winners.push(summary.candidates[winner].clone());
    res.tie_break_type = TieBreakType::Random;
    Ok(res)
}

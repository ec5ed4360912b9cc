use log::{debug, info};

use crate::config::*;
use crate::logs::TabulationLog;
use crate::tiebreak::*;

fn candidate(summary: &SummaryData, cand: usize) -> Candidate {
    summary.candidates[cand].clone()
}

/// Runs one STAR round over the remaining candidates.
///
/// The score round picks two finalists, resolving ties as they occur. The
/// automatic runoff then elects the finalist preferred by more voters. A tie
/// in the runoff falls back to total score, then five-star count, then the
/// tie-break order.
pub fn run_star_round(
    summary: &SummaryData,
    remaining: &[usize],
) -> Result<RoundResult, VotingErrors> {
    let mut res = RoundResult::empty();

    match remaining {
        [] => return Err(VotingErrors::EmptyRound),
        [only] => {
            debug!("run_star_round: only one candidate left: {:?}", only);
            res.logs.push(TabulationLog::SoleRemainingCandidate {
                name: summary.candidates[*only].name.clone(),
            });
            res.winners.push(candidate(summary, *only));
            return Ok(res);
        }
        _ => {}
    }

    let finalists = select_finalists(summary, remaining, &mut res.logs);
    let (f0, f1) = (finalists[0], finalists[1]);
    run_runoff(summary, f0, f1, &mut res);
    info!(
        "run_star_round: winner: {:?}, tie break: {:?}",
        names(summary, &res.winners.iter().map(|c| c.index).collect::<Vec<_>>()),
        res.tie_break_type
    );
    Ok(res)
}

// Score round
// In most elections this is a simple pick of the two highest scores. When
// there are ties, candidates are advanced one group at a time.
fn select_finalists(
    summary: &SummaryData,
    remaining: &[usize],
    logs: &mut Vec<TabulationLog>,
) -> Vec<usize> {
    let mut finalists: Vec<usize> = Vec::new();
    // Every pass advances at least one candidate.
    while finalists.len() < 2 {
        let n_needed = 2 - finalists.len();
        let eligible: Vec<usize> = remaining
            .iter()
            .filter(|c| !finalists.contains(c))
            .cloned()
            .collect();
        let score_winners = score_leaders(summary, &eligible);
        debug!(
            "select_finalists: needed: {} score winners: {:?}",
            n_needed, score_winners
        );

        if score_winners.len() <= n_needed {
            for &c in score_winners.iter() {
                logs.push(TabulationLog::ScoreRoundAdvanceToRunoff {
                    name: summary.candidates[c].name.clone(),
                    score: total_score(summary, c),
                });
            }
            finalists.extend(score_winners);
            continue;
        }

        logs.push(TabulationLog::ScoringRoundTiebreakerStart {
            names: names(summary, &eligible),
        });
        logs.push(TabulationLog::ScoreTiebreakEnd {
            names: names(summary, &score_winners),
            score: total_score(summary, score_winners[0]),
        });
        let resolution = resolve(summary, &score_winners, n_needed);
        logs.extend(resolution.logs);
        finalists.extend(resolution.advance);
    }
    finalists
}

fn run_runoff(summary: &SummaryData, f0: usize, f1: usize, res: &mut RoundResult) {
    let name0 = summary.candidates[f0].name.clone();
    let name1 = summary.candidates[f1].name.clone();
    // Ballots preferring f0 over f1, and the reverse.
    let left_votes = summary.preference_matrix[(f0, f1)];
    let right_votes = summary.preference_matrix[(f1, f0)];
    let equal_votes = summary.n_tally_votes - left_votes - right_votes;

    res.logs.push(TabulationLog::AutomaticRunoffStart {
        candidate_a: name0.clone(),
        candidate_b: name1.clone(),
    });

    if left_votes != right_votes {
        let (w, l, wv, lv) = if left_votes > right_votes {
            (f0, f1, left_votes, right_votes)
        } else {
            (f1, f0, right_votes, left_votes)
        };
        res.winners.push(candidate(summary, w));
        res.runner_up.push(candidate(summary, l));
        res.logs.push(TabulationLog::AutomaticRunoffWin {
            winner: summary.candidates[w].name.clone(),
            loser: summary.candidates[l].name.clone(),
            winner_votes: wv,
            loser_votes: lv,
            equal_votes,
        });
        return;
    }

    let finalist_names = vec![name0, name1];
    res.logs.push(TabulationLog::AutomaticRunoffTie {
        names: finalist_names.clone(),
        tied_votes: right_votes,
        equal_votes,
    });
    res.logs.push(TabulationLog::RunoffRoundTiebreakerStart {
        names: finalist_names.clone(),
    });
    res.tied = vec![candidate(summary, f0), candidate(summary, f1)];

    let (s0, s1) = (total_score(summary, f0), total_score(summary, f1));
    if s0 != s1 {
        let (w, l) = if s0 > s1 { (f0, f1) } else { (f1, f0) };
        set_runoff_outcome(summary, res, w, l, TieBreakType::Score);
        res.logs.push(TabulationLog::ScoreTiebreakWinRunoff {
            winner: summary.candidates[w].name.clone(),
            loser: summary.candidates[l].name.clone(),
            winner_score: total_score(summary, w),
            loser_score: total_score(summary, l),
        });
        return;
    }
    res.logs.push(TabulationLog::ScoreTiebreakEnd {
        names: finalist_names.clone(),
        score: s0,
    });

    let (c0, c1) = (top_score_count(summary, f0), top_score_count(summary, f1));
    if c0 != c1 {
        let (w, l) = if c0 > c1 { (f0, f1) } else { (f1, f0) };
        set_runoff_outcome(summary, res, w, l, TieBreakType::FiveStar);
        res.logs.push(TabulationLog::FiveStarTiebreakWinRunoff {
            winner: summary.candidates[w].name.clone(),
            loser: summary.candidates[l].name.clone(),
            winner_five_star_count: top_score_count(summary, w),
            loser_five_star_count: top_score_count(summary, l),
        });
        return;
    }
    res.logs.push(TabulationLog::FiveStarTiebreakEnd {
        names: finalist_names,
        five_star_count: c0,
    });

    let sorted = sort_by_tie_break_order(summary, &[f0, f1]);
    set_runoff_outcome(summary, res, sorted[0], sorted[1], TieBreakType::Random);
    res.logs.push(TabulationLog::RandomTiebreakWinRunoff {
        winner: summary.candidates[sorted[0]].name.clone(),
        loser: summary.candidates[sorted[1]].name.clone(),
    });
}

fn set_runoff_outcome(
    summary: &SummaryData,
    res: &mut RoundResult,
    winner: usize,
    loser: usize,
    tie_break_type: TieBreakType,
) {
    res.winners = vec![candidate(summary, winner)];
    res.runner_up = vec![candidate(summary, loser)];
    res.tie_break_type = tie_break_type;
}

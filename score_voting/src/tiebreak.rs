// Tie-break criteria.
//
// Every criterion is a pure function over the summary data and a set of
// candidate positions. `resolve` chains them for the score round of STAR:
// score, then head-to-head losses, then top-score counts, then the
// tie-break order.

use log::debug;

use crate::config::SummaryData;
use crate::logs::TabulationLog;

/// The candidates that advance out of a tie, with the trail that justifies it.
#[derive(Eq, PartialEq, Debug, Clone)]
pub(crate) struct Resolution {
    pub advance: Vec<usize>,
    pub logs: Vec<TabulationLog>,
}

pub(crate) fn names(summary: &SummaryData, cands: &[usize]) -> Vec<String> {
    cands
        .iter()
        .map(|&c| summary.candidates[c].name.clone())
        .collect()
}

pub(crate) fn total_score(summary: &SummaryData, cand: usize) -> u64 {
    summary.total_scores[cand].score
}

/// Number of ballots giving the maximum score (five stars for STAR).
pub(crate) fn top_score_count(summary: &SummaryData, cand: usize) -> u64 {
    summary.score_hist[cand].last().cloned().unwrap_or(0)
}

/// All the candidates tied for the highest total score, in the given order.
pub(crate) fn score_leaders(summary: &SummaryData, eligible: &[usize]) -> Vec<usize> {
    let top = eligible
        .iter()
        .map(|&c| total_score(summary, c))
        .max()
        .unwrap_or(0);
    eligible
        .iter()
        .filter(|&&c| total_score(summary, c) == top)
        .cloned()
        .collect()
}

/// The candidates with the most head-to-head losses against the other tied
/// candidates, and that number of losses.
pub(crate) fn head_to_head_losers(summary: &SummaryData, tied: &[usize]) -> (Vec<usize>, u64) {
    let mut losers: Vec<usize> = Vec::new();
    let mut max_losses: u64 = 0;
    for &a in tied.iter() {
        let losses: u64 = tied
            .iter()
            .map(|&b| summary.pairwise_matrix[(b, a)])
            .sum();
        if losses > max_losses {
            max_losses = losses;
            losers = vec![a];
        } else if losses == max_losses {
            losers.push(a);
        }
    }
    (losers, max_losses)
}

/// Top-score counts, from most to least. Equal counts keep the given order.
pub(crate) fn five_star_counts(summary: &SummaryData, tied: &[usize]) -> Vec<(usize, u64)> {
    let mut counts: Vec<(usize, u64)> = tied
        .iter()
        .map(|&c| (c, top_score_count(summary, c)))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// The candidates sharing the lowest count. `counts` must be sorted as
/// returned by `five_star_counts`.
pub(crate) fn five_star_losers(counts: &[(usize, u64)]) -> Vec<(usize, u64)> {
    match counts.last() {
        Some(&(_, min_count)) => counts
            .iter()
            .filter(|(_, c)| *c == min_count)
            .cloned()
            .collect(),
        None => Vec::new(),
    }
}

/// Lowest tie-break value first. The input position settles equal values so
/// that the order is always total.
pub(crate) fn sort_by_tie_break_order(summary: &SummaryData, cands: &[usize]) -> Vec<usize> {
    let mut res = cands.to_vec();
    res.sort_by_key(|&c| (summary.candidates[c].tie_break_order, c));
    res
}

/// Cuts a set of candidates tied in the score round down to the ones that
/// advance to the runoff.
///
/// `n_needed` is the number of open finalist slots (1 or 2). The result holds
/// at least one and at most `n_needed` candidates. When a single candidate
/// advances while two were needed, the caller runs the score round again for
/// the last slot.
pub(crate) fn resolve(summary: &SummaryData, tied: &[usize], n_needed: usize) -> Resolution {
    let mut logs: Vec<TabulationLog> = Vec::new();
    let initial = score_leaders(summary, tied);
    let mut tied = initial.clone();

    while tied.len() > 1 {
        debug!("resolve: tied candidates: {:?}", names(summary, &tied));
        if tied.len() < initial.len() {
            logs.push(TabulationLog::ScoringRoundTiebreakerStart {
                names: names(summary, &tied),
            });
        }

        let (h2h_losers, losses) = head_to_head_losers(summary, &tied);
        if h2h_losers.len() < tied.len() {
            for &c in h2h_losers.iter() {
                logs.push(TabulationLog::PairwiseTiebreakRemoveCandidate {
                    name: summary.candidates[c].name.clone(),
                    losses,
                    n_tied_candidates: tied.len(),
                });
            }
            tied.retain(|c| !h2h_losers.contains(c));
            continue;
        }

        // Everybody has the same number of head-to-head losses.
        if n_needed == 2 && tied.len() == 2 {
            for &c in tied.iter() {
                logs.push(TabulationLog::PairwiseTiebreakAdvanceToRunoff {
                    name: summary.candidates[c].name.clone(),
                    losses,
                    n_tied_candidates: tied.len(),
                });
            }
            return Resolution {
                advance: tied,
                logs,
            };
        }
        logs.push(TabulationLog::PairwiseTiebreakEnd {
            names: names(summary, &tied),
            losses,
        });

        let counts = five_star_counts(summary, &tied);
        if n_needed == 2 && counts.len() > 2 && counts[1].1 > counts[2].1 {
            for &(c, count) in counts[..2].iter() {
                logs.push(TabulationLog::FiveStarTiebreakAdvanceToRunoff {
                    name: summary.candidates[c].name.clone(),
                    five_star_count: count,
                });
            }
            return Resolution {
                advance: vec![counts[0].0, counts[1].0],
                logs,
            };
        }
        if counts[0].1 > counts[1].1 {
            logs.push(TabulationLog::FiveStarTiebreakAdvanceToRunoff {
                name: summary.candidates[counts[0].0].name.clone(),
                five_star_count: counts[0].1,
            });
            return Resolution {
                advance: vec![counts[0].0],
                logs,
            };
        }

        let fs_losers = five_star_losers(&counts);
        if fs_losers.len() < tied.len() {
            for &(c, count) in fs_losers.iter() {
                logs.push(TabulationLog::FiveStarTiebreakRemoveCandidate {
                    name: summary.candidates[c].name.clone(),
                    five_star_count: count,
                });
            }
            tied.retain(|c| !fs_losers.iter().any(|(l, _)| l == c));
            continue;
        }
        logs.push(TabulationLog::FiveStarTiebreakEnd {
            names: names(summary, &tied),
            five_star_count: counts[0].1,
        });

        // True tie, the tie-break order decides.
        let winner = sort_by_tie_break_order(summary, &tied)[0];
        logs.push(TabulationLog::RandomTiebreakAdvanceToRunoff {
            name: summary.candidates[winner].name.clone(),
        });
        return Resolution {
            advance: vec![winner],
            logs,
        };
    }

    // Everybody else was removed.
    let survivors = tied;
    for &c in survivors.iter() {
        logs.push(TabulationLog::LastTiedCandidateAdvanceToRunoff {
            name: summary.candidates[c].name.clone(),
        });
    }
    Resolution {
        advance: survivors,
        logs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ballot::parse_ballots;
    use crate::config::VotingMethod;
    use crate::summary::{get_summary_data, make_candidates};

    fn summary(names: &[&str], ballots: &[Vec<Option<i64>>], order: &[u32]) -> SummaryData {
        let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        let parsed = parse_ballots(ballots, names.len(), VotingMethod::Star);
        get_summary_data(make_candidates(&names, order), &parsed, VotingMethod::Star)
    }

    #[test]
    fn score_leaders_keeps_all_ties() {
        let s = summary(
            &["A", "B", "C"],
            &[vec![Some(3), Some(5), Some(5)], vec![Some(2), Some(0), Some(0)]],
            &[],
        );
        assert_eq!(score_leaders(&s, &[0, 1, 2]), vec![0, 1, 2]);
        let s = summary(
            &["A", "B", "C"],
            &[vec![Some(3), Some(5), Some(5)], vec![Some(3), Some(1), Some(0)]],
            &[],
        );
        assert_eq!(score_leaders(&s, &[0, 1, 2]), vec![0, 1]);
        assert_eq!(score_leaders(&s, &[2]), vec![2]);
    }

    #[test]
    fn head_to_head_loser_is_removed() {
        // A, B and C all have 5 points. A beats B and C head to head.
        let s = summary(
            &["A", "B", "C"],
            &[
                vec![Some(3), Some(2), Some(1)],
                vec![Some(2), Some(0), Some(1)],
                vec![Some(0), Some(3), Some(3)],
            ],
            &[],
        );
        let (losers, losses) = head_to_head_losers(&s, &[0, 1, 2]);
        // B and C each lose to A and tie each other.
        assert_eq!(losers, vec![1, 2]);
        assert_eq!(losses, 1);

        let res = resolve(&s, &[0, 1, 2], 1);
        assert_eq!(res.advance, vec![0]);
        assert!(res.logs.contains(&TabulationLog::PairwiseTiebreakRemoveCandidate {
            name: "B".to_string(),
            losses: 1,
            n_tied_candidates: 3
        }));
        assert_eq!(
            res.logs.last(),
            Some(&TabulationLog::LastTiedCandidateAdvanceToRunoff {
                name: "A".to_string()
            })
        );
    }

    #[test]
    fn two_even_candidates_both_advance() {
        let s = summary(
            &["A", "B"],
            &[vec![Some(5), Some(4)], vec![Some(4), Some(5)]],
            &[],
        );
        let res = resolve(&s, &[0, 1], 2);
        assert_eq!(res.advance, vec![0, 1]);
    }

    // Three way tie on score (8 each) with a head-to-head cycle:
    // A beats B, B beats C, C beats A. A and B have one five star rating each.
    fn cycle() -> SummaryData {
        summary(
            &["A", "B", "C"],
            &[
                vec![Some(5), Some(3), Some(1)],
                vec![Some(2), Some(5), Some(3)],
                vec![Some(1), Some(0), Some(4)],
            ],
            &[],
        )
    }

    #[test]
    fn five_star_counts_after_pairwise_cycle() {
        let s = cycle();
        assert_eq!(score_leaders(&s, &[0, 1, 2]), vec![0, 1, 2]);
        let (losers, losses) = head_to_head_losers(&s, &[0, 1, 2]);
        assert_eq!(losers.len(), 3);
        assert_eq!(losses, 1);
        assert_eq!(five_star_counts(&s, &[0, 1, 2]), vec![(0, 1), (1, 1), (2, 0)]);

        let res = resolve(&s, &[0, 1, 2], 2);
        assert_eq!(res.advance, vec![0, 1]);
        assert_eq!(
            res.logs.last(),
            Some(&TabulationLog::FiveStarTiebreakAdvanceToRunoff {
                name: "B".to_string(),
                five_star_count: 1
            })
        );
    }

    #[test]
    fn five_star_loser_removed_then_pairwise_again() {
        let res = resolve(&cycle(), &[0, 1, 2], 1);
        // C goes out on five star counts, then A beats B head to head.
        assert_eq!(res.advance, vec![0]);
        assert!(res.logs.contains(&TabulationLog::FiveStarTiebreakRemoveCandidate {
            name: "C".to_string(),
            five_star_count: 0
        }));
        assert!(res.logs.contains(&TabulationLog::PairwiseTiebreakRemoveCandidate {
            name: "B".to_string(),
            losses: 1,
            n_tied_candidates: 2
        }));
    }

    #[test]
    fn tie_break_order_settles_a_true_tie() {
        let s = summary(
            &["A", "B", "C"],
            &[vec![Some(5), Some(5), Some(5)]],
            &[2, 0, 1],
        );
        let res = resolve(&s, &[0, 1, 2], 1);
        assert_eq!(res.advance, vec![1]);
        assert_eq!(
            res.logs.last(),
            Some(&TabulationLog::RandomTiebreakAdvanceToRunoff {
                name: "B".to_string()
            })
        );
    }

    #[test]
    fn sort_by_tie_break_order_is_total() {
        let s = summary(&["A", "B", "C"], &[], &[1, 0, 1]);
        assert_eq!(sort_by_tie_break_order(&s, &[2, 0, 1]), vec![1, 0, 2]);
    }

    #[test]
    fn resolve_is_deterministic() {
        let s = summary(
            &["A", "B", "C", "D"],
            &[
                vec![Some(5), Some(5), Some(4), Some(4)],
                vec![Some(4), Some(4), Some(5), Some(5)],
            ],
            &[3, 2, 1, 0],
        );
        assert_eq!(resolve(&s, &[0, 1, 2, 3], 2), resolve(&s, &[0, 1, 2, 3], 2));
    }
}

use log::debug;

use crate::ballot::ParsedBallots;
use crate::config::*;

/// Attaches positions and tie-break values to the candidate names.
///
/// A tie-break order shorter than the candidate list is ignored in favor of
/// the input order. Extra values are dropped.
pub fn make_candidates(names: &[String], tie_break_order: &[u32]) -> Vec<Candidate> {
    let use_order = tie_break_order.len() >= names.len();
    if !tie_break_order.is_empty() && !use_order {
        debug!(
            "make_candidates: tie break order {:?} is too short for {} candidates, using input order",
            tie_break_order,
            names.len()
        );
    }
    names
        .iter()
        .enumerate()
        .map(|(index, name)| Candidate {
            index,
            name: name.clone(),
            tie_break_order: if use_order {
                tie_break_order[index]
            } else {
                index as u32
            },
        })
        .collect()
}

/// Compresses the valid ballots into the data needed to run the election.
///
/// One pass over the ballots fills the total scores, the score histograms and
/// the preference matrix. The pairwise matrix is derived afterwards.
pub fn get_summary_data(
    candidates: Vec<Candidate>,
    parsed: &ParsedBallots,
    method: VotingMethod,
) -> SummaryData {
    let n = candidates.len();
    let mut total_scores: Vec<TotalScore> = (0..n)
        .map(|index| TotalScore { index, score: 0 })
        .collect();
    let mut score_hist: Vec<Vec<u64>> = vec![vec![0; method.score_range()]; n];
    let mut preference_matrix = Matrix::new(n);
    let mut n_bullet_votes: u64 = 0;

    for vote in parsed.scores.iter() {
        let mut n_supported = 0;
        for i in 0..n {
            let si = vote[i];
            total_scores[i].score += si as u64;
            score_hist[i][si as usize] += 1;
            for j in 0..n {
                if i != j && si > vote[j] {
                    preference_matrix[(i, j)] += 1;
                }
            }
            if si > 0 {
                n_supported += 1;
            }
        }
        if n_supported == 1 {
            n_bullet_votes += 1;
        }
    }

    let pairwise_matrix = get_pairwise_matrix(&preference_matrix);
    debug!("get_summary_data: total scores: {:?}", total_scores);
    debug!("get_summary_data: preferences: {:?}", preference_matrix);

    SummaryData {
        candidates,
        total_scores,
        score_hist,
        preference_matrix,
        pairwise_matrix,
        n_tally_votes: parsed.n_valid(),
        n_out_of_bounds_votes: parsed.n_invalid,
        n_abstentions: parsed.n_abstentions,
        n_bullet_votes,
        no_preference_stars: Vec::new(),
    }
}

// Ties in preference give 0 in both directions.
fn get_pairwise_matrix(preference_matrix: &Matrix) -> Matrix {
    let n = preference_matrix.size();
    let mut pairwise = Matrix::new(n);
    for i in 0..n {
        for j in (i + 1)..n {
            let (ij, ji) = (preference_matrix[(i, j)], preference_matrix[(j, i)]);
            if ij > ji {
                pairwise[(i, j)] = 1;
            } else if ji > ij {
                pairwise[(j, i)] = 1;
            }
        }
    }
    pairwise
}

/// For two candidates, counts the valid ballots giving both the same score,
/// bucketed by that score.
pub fn get_no_preference_stars(
    parsed: &ParsedBallots,
    i: usize,
    j: usize,
    method: VotingMethod,
) -> Vec<u64> {
    let mut stars = vec![0; method.score_range()];
    for vote in parsed.scores.iter() {
        if vote[i] == vote[j] {
            stars[vote[i] as usize] += 1;
        }
    }
    stars
}

/// Rearranges every per-candidate array and matrix to follow `order`, a
/// permutation of the input positions.
///
/// Candidates and total scores keep their input `index`.
pub fn sort_data(summary: SummaryData, order: &[usize]) -> SummaryData {
    SummaryData {
        candidates: order.iter().map(|&i| summary.candidates[i].clone()).collect(),
        total_scores: order.iter().map(|&i| summary.total_scores[i]).collect(),
        score_hist: order.iter().map(|&i| summary.score_hist[i].clone()).collect(),
        preference_matrix: summary.preference_matrix.permuted(order),
        pairwise_matrix: summary.pairwise_matrix.permuted(order),
        ..summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ballot::parse_ballots;

    fn names(ns: &[&str]) -> Vec<String> {
        ns.iter().map(|s| s.to_string()).collect()
    }

    fn summary(ballots: &[Vec<Option<i64>>], n: usize) -> SummaryData {
        let cands = make_candidates(&names(&["A", "B", "C"][..n]), &[]);
        let parsed = parse_ballots(ballots, n, VotingMethod::Star);
        get_summary_data(cands, &parsed, VotingMethod::Star)
    }

    #[test]
    fn tie_break_order_defaults_to_input_order() {
        let cands = make_candidates(&names(&["A", "B", "C"]), &[7, 3]);
        let orders: Vec<u32> = cands.iter().map(|c| c.tie_break_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);

        let cands = make_candidates(&names(&["A", "B", "C"]), &[7, 3, 5, 9]);
        let orders: Vec<u32> = cands.iter().map(|c| c.tie_break_order).collect();
        assert_eq!(orders, vec![7, 3, 5]);
    }

    #[test]
    fn totals_histograms_and_matrices() {
        let s = summary(
            &[
                vec![Some(5), Some(3), Some(0)],
                vec![Some(4), Some(4), None],
                vec![Some(0), Some(5), Some(1)],
            ],
            3,
        );
        let totals: Vec<u64> = s.total_scores.iter().map(|t| t.score).collect();
        assert_eq!(totals, vec![9, 12, 1]);
        assert_eq!(s.score_hist[0], vec![1, 0, 0, 0, 1, 1]);
        assert_eq!(s.score_hist[2], vec![2, 1, 0, 0, 0, 0]);

        assert_eq!(s.preference_matrix[(0, 1)], 1);
        assert_eq!(s.preference_matrix[(1, 0)], 1);
        assert_eq!(s.preference_matrix[(0, 2)], 2);
        assert_eq!(s.preference_matrix[(2, 0)], 1);
        assert_eq!(s.preference_matrix[(1, 2)], 3);

        // A and B are even head to head.
        assert_eq!(s.pairwise_matrix[(0, 1)], 0);
        assert_eq!(s.pairwise_matrix[(1, 0)], 0);
        assert_eq!(s.pairwise_matrix[(0, 2)], 1);
        assert_eq!(s.pairwise_matrix[(2, 0)], 0);
        assert_eq!(s.pairwise_matrix[(1, 2)], 1);
        assert_eq!(s.n_tally_votes, 3);
    }

    #[test]
    fn bullet_votes() {
        let s = summary(
            &[
                vec![Some(5), None, None],
                vec![Some(0), Some(2), Some(0)],
                vec![Some(1), Some(2), Some(0)],
            ],
            3,
        );
        assert_eq!(s.n_bullet_votes, 2);
    }

    #[test]
    fn no_preference_stars_counts_equal_scores() {
        let ballots = vec![
            vec![Some(5), Some(5)],
            vec![Some(3), Some(3)],
            vec![Some(3), Some(3)],
            vec![Some(1), Some(4)],
            vec![None, Some(0)],
            vec![None, None],
        ];
        let parsed = parse_ballots(&ballots, 2, VotingMethod::Star);
        let stars = get_no_preference_stars(&parsed, 0, 1, VotingMethod::Star);
        // Empty or all zero ballots abstain and are not looked at.
        assert_eq!(stars, vec![0, 0, 0, 2, 0, 1]);
    }

    #[test]
    fn sort_data_permutes_consistently() {
        let s = summary(
            &[
                vec![Some(5), Some(3), Some(0)],
                vec![Some(4), Some(4), None],
                vec![Some(0), Some(5), Some(1)],
            ],
            3,
        );
        let sorted = sort_data(s.clone(), &[1, 0, 2]);
        assert_eq!(sorted.candidates[0].name, "B");
        assert_eq!(sorted.candidates[0].index, 1);
        assert_eq!(sorted.total_scores[0].score, 12);
        assert_eq!(sorted.total_scores[0].index, 1);
        assert_eq!(sorted.score_hist[0], s.score_hist[1]);
        for (a, &i) in [1, 0, 2].iter().enumerate() {
            for (b, &j) in [1, 0, 2].iter().enumerate() {
                assert_eq!(sorted.preference_matrix[(a, b)], s.preference_matrix[(i, j)]);
                assert_eq!(sorted.pairwise_matrix[(a, b)], s.pairwise_matrix[(i, j)]);
            }
        }
        assert_eq!(sorted.n_tally_votes, s.n_tally_votes);
    }
}

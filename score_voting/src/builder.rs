pub use crate::config::*;

/// A builder for adding ballots.
///
/// ```
/// pub use score_voting::builder::Builder;
/// pub use score_voting::VoteRules;
/// # use score_voting::VotingErrors;
///
/// let mut builder = Builder::new(&VoteRules::DEFAULT_RULES)?
///     .candidates(&["Anna".to_string(), "Bob".to_string()])?;
///
/// builder.add_ballot(&[Some(2), Some(5)])?;
/// builder.add_ballot_weighted(&[Some(1), None], 2)?;
///
/// // Bob has the highest score, Anna is preferred by more voters.
/// let result = builder.tabulate()?;
/// assert_eq!(result.elected[0].name, "Anna");
///
/// # Ok::<(), VotingErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: VoteRules,
    pub(crate) _candidates: Option<Vec<String>>,
    pub(crate) _ballots: Vec<Vec<Option<i64>>>,
}

impl Builder {
    pub fn new(rules: &VoteRules) -> Result<Builder, VotingErrors> {
        Ok(Builder {
            _rules: rules.clone(),
            _candidates: None,
            _ballots: Vec::new(),
        })
    }

    pub fn candidates(self, cands: &[String]) -> Result<Builder, VotingErrors> {
        if cands.is_empty() {
            return Err(VotingErrors::EmptyElection);
        }
        Ok(Builder {
            _rules: self._rules,
            _candidates: Some(cands.to_vec()),
            _ballots: Vec::new(),
        })
    }

    /// Adds a ballot: one score per candidate, `None` for an empty slot.
    ///
    /// The ballot is not checked here. Ballots that do not fit the voting
    /// method are counted as out of bounds during tabulation.
    pub fn add_ballot(&mut self, scores: &[Option<i64>]) -> Result<(), VotingErrors> {
        self.add_ballot_weighted(scores, 1)
    }

    /// Adds the same ballot `count` times.
    pub fn add_ballot_weighted(
        &mut self,
        scores: &[Option<i64>],
        count: u32,
    ) -> Result<(), VotingErrors> {
        for _ in 0..count {
            self._ballots.push(scores.to_vec());
        }
        Ok(())
    }

    pub fn tabulate(&self) -> Result<ElectionResult, VotingErrors> {
        let cands = self
            ._candidates
            .as_deref()
            .ok_or(VotingErrors::EmptyElection)?;
        crate::run_election(cands, &self._ballots, &self._rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_ballots_are_repeated() {
        let rules = VoteRules::with_method(VotingMethod::Approval);
        let mut builder = Builder::new(&rules)
            .unwrap()
            .candidates(&["A".to_string(), "B".to_string()])
            .unwrap();
        builder.add_ballot(&[Some(1), Some(0)]).unwrap();
        builder.add_ballot_weighted(&[Some(0), Some(1)], 3).unwrap();
        let res = builder.tabulate().unwrap();
        assert_eq!(res.elected[0].name, "B");
        assert_eq!(res.summary_data.n_tally_votes, 4);
    }

    #[test]
    fn candidates_are_required() {
        let builder = Builder::new(&VoteRules::DEFAULT_RULES).unwrap();
        assert_eq!(builder.tabulate(), Err(VotingErrors::EmptyElection));
    }
}

use log::debug;

/// Draws a tie-break order for the candidates from a seed.
///
/// The result holds one value per candidate, in input order: the position of
/// that candidate in the draw. The draw sorts the candidates by the SHA-256
/// digest of the seed followed by the candidate name. It is hard to guess
/// without the seed and can be replayed by anyone who knows it.
pub fn tie_break_order_from_seed(candidates: &[String], seed: &str) -> Vec<u32> {
    let mut keyed: Vec<(String, usize)> = candidates
        .iter()
        .enumerate()
        .map(|(idx, name)| (sha256::digest(format!("{}{}", seed, name)), idx))
        .collect();
    keyed.sort();

    let mut order = vec![0; candidates.len()];
    for (pos, (_, idx)) in keyed.iter().enumerate() {
        order[*idx] = pos as u32;
    }
    debug!(
        "tie_break_order_from_seed: seed {:?}, order {:?}",
        seed, order
    );
    order
}

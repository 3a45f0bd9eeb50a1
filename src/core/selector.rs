use crate::domain::model::Candidate;
use rand::seq::SliceRandom;
use rand::Rng;

/// Uniform sampling without replacement. Asking for more than is available
/// returns every candidate in random order.
pub fn select<R: Rng + ?Sized>(
    rng: &mut R,
    candidates: &[Candidate],
    sample_count: usize,
) -> Vec<Candidate> {
    let amount = sample_count.min(candidates.len());
    candidates.choose_multiple(rng, amount).cloned().collect()
}

/// One throwaway draw for the spin animation.
pub fn spin_frame<'a, R: Rng + ?Sized>(rng: &mut R, candidates: &'a [Candidate]) -> Option<&'a Candidate> {
    candidates.choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn seeded_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn pool(n: usize) -> Vec<Candidate> {
        (0..n)
            .filter_map(|i| Candidate::parse(&format!("item {}", i)))
            .collect()
    }

    #[test]
    fn test_select_never_exceeds_pool_or_repeats() {
        let mut rng = seeded_rng();
        let candidates = pool(5);
        for requested in 0..10 {
            let picks = select(&mut rng, &candidates, requested);
            assert_eq!(picks.len(), requested.min(5));
            let unique: HashSet<&str> = picks.iter().map(|c| c.text.as_str()).collect();
            assert_eq!(unique.len(), picks.len());
        }
    }

    #[test]
    fn test_select_from_empty() {
        let mut rng = seeded_rng();
        assert!(select(&mut rng, &[], 3).is_empty());
        assert!(spin_frame(&mut rng, &[]).is_none());
    }

    #[test]
    fn test_select_is_roughly_uniform() {
        let mut rng = seeded_rng();
        let candidates = pool(4);
        let mut counts = [0usize; 4];
        for _ in 0..4000 {
            let pick = &select(&mut rng, &candidates, 1)[0];
            let idx = candidates.iter().position(|c| c == pick).unwrap();
            counts[idx] += 1;
        }
        for count in counts {
            assert!((800..1200).contains(&count), "count {} far from 1000", count);
        }
    }

    #[test]
    fn test_spin_frame_draws_from_pool() {
        let mut rng = seeded_rng();
        let candidates = pool(3);
        for _ in 0..20 {
            assert!(candidates.contains(spin_frame(&mut rng, &candidates).unwrap()));
        }
    }
}

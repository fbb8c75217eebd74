use rand::Rng;
use rand::seq::SliceRandom;

use super::config::SessionConfig;

/// Assign a target difficulty level to each question slot.
///
/// With `balance_difficulty` on, slots are spread evenly across
/// `1..=max_level` (`count / max_level` per level, remainder going to the
/// lowest levels first) and the resulting level list is shuffled — the order
/// is random, the per-level counts are not. Otherwise each slot draws its
/// level uniformly at random.
pub(crate) fn distribute_levels<R: Rng + ?Sized>(
    config: &SessionConfig,
    rng: &mut R,
) -> Vec<u32> {
    if !config.balance_difficulty() {
        return (0..config.count())
            .map(|_| rng.random_range(1..=config.max_level()))
            .collect();
    }

    let max_level = usize::try_from(config.max_level()).unwrap_or(usize::MAX);
    let per_level = config.count() / max_level;
    let mut extras = config.count() % max_level;

    let mut levels = Vec::with_capacity(config.count());
    for level in 1..=config.max_level() {
        levels.extend(std::iter::repeat(level).take(per_level));
        if extras > 0 {
            levels.push(level);
            extras -= 1;
        }
    }

    levels.shuffle(rng);
    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn config(count: usize, max_level: u32, balance: bool) -> SessionConfig {
        SessionConfig::new(count, max_level, balance, false).unwrap()
    }

    fn level_counts(levels: &[u32], max_level: u32) -> Vec<usize> {
        (1..=max_level)
            .map(|l| levels.iter().filter(|&&x| x == l).count())
            .collect()
    }

    #[test]
    fn balanced_plan_spreads_slots_evenly() {
        let mut rng = StdRng::seed_from_u64(3);
        let levels = distribute_levels(&config(10, 5, true), &mut rng);
        assert_eq!(levels.len(), 10);
        assert_eq!(level_counts(&levels, 5), vec![2, 2, 2, 2, 2]);
    }

    #[test]
    fn remainder_slots_go_to_the_lowest_levels() {
        let mut rng = StdRng::seed_from_u64(3);
        // 7 slots over 5 levels: one each, extras on levels 1 and 2.
        let levels = distribute_levels(&config(7, 5, true), &mut rng);
        assert_eq!(level_counts(&levels, 5), vec![2, 2, 1, 1, 1]);
    }

    #[test]
    fn unbalanced_plan_stays_within_level_bounds() {
        let mut rng = StdRng::seed_from_u64(9);
        let levels = distribute_levels(&config(50, 3, false), &mut rng);
        assert_eq!(levels.len(), 50);
        assert!(levels.iter().all(|&l| (1..=3).contains(&l)));
    }

    #[test]
    fn fewer_slots_than_levels_fill_from_level_one() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut levels = distribute_levels(&config(3, 5, true), &mut rng);
        levels.sort_unstable();
        assert_eq!(levels, vec![1, 2, 3]);
    }

    #[test]
    fn same_seed_yields_the_same_order() {
        let cfg = config(10, 5, true);
        let a = distribute_levels(&cfg, &mut StdRng::seed_from_u64(11));
        let b = distribute_levels(&cfg, &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }
}

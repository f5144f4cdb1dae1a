use rand::Rng;

/// Picks one element using an externally supplied draw.
///
/// The index is `floor(draw * len)`; the draw is clamped into `[0, 1)`.
pub fn pick_with_draw<S: AsRef<str>>(items: &[S], draw: f64) -> Option<&str> {
    if items.is_empty() {
        return None;
    }
    let draw = if draw.is_finite() {
        draw.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let index = ((draw * items.len() as f64).floor() as usize).min(items.len() - 1);
    items.get(index).map(|s| s.as_ref())
}

/// Picks one element uniformly at random.
///
/// # Arguments
/// * `items` - candidates, usually the loaded corpus.
/// * `rng` - randomness source, a seeded rng replays the same picks.
///
/// # Returns
/// * `None` when `items` is empty.
pub fn pick_random<'a, S, R>(items: &'a [S], rng: &mut R) -> Option<&'a str>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    pick_with_draw(items, rng.random::<f64>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn items(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("review {i}")).collect()
    }

    #[test]
    fn test_empty_returns_none() {
        let empty: Vec<String> = Vec::new();
        assert_eq!(pick_with_draw(&empty, 0.5), None);
        assert_eq!(pick_random(&empty, &mut StdRng::seed_from_u64(7)), None);
    }

    #[test]
    fn test_draw_maps_to_floor_index() {
        let items = items(4);
        assert_eq!(pick_with_draw(&items, 0.0), Some("review 0"));
        assert_eq!(pick_with_draw(&items, 0.24), Some("review 0"));
        assert_eq!(pick_with_draw(&items, 0.25), Some("review 1"));
        assert_eq!(pick_with_draw(&items, 0.99), Some("review 3"));
    }

    #[test]
    fn test_out_of_range_draws_are_clamped() {
        let items = items(3);
        assert_eq!(pick_with_draw(&items, 1.0), Some("review 2"));
        assert_eq!(pick_with_draw(&items, 7.5), Some("review 2"));
        assert_eq!(pick_with_draw(&items, -1.0), Some("review 0"));
        assert_eq!(pick_with_draw(&items, f64::NAN), Some("review 0"));
    }

    #[test]
    fn test_seeded_rng_replays() {
        let items = items(50);
        let first: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..20).map(|_| pick_random(&items, &mut rng)).collect()
        };
        let second: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..20).map(|_| pick_random(&items, &mut rng)).collect()
        };
        assert_eq!(first, second);
    }

    #[test]
    fn test_every_element_reachable_and_roughly_uniform() {
        let n = 8;
        let items = items(n);
        let draws = 80_000;
        let mut counts = vec![0usize; n];
        let mut rng = StdRng::seed_from_u64(2024);

        for _ in 0..draws {
            let picked = pick_random(&items, &mut rng).unwrap();
            let index = items.iter().position(|i| i == picked).unwrap();
            counts[index] += 1;
        }

        let expected = draws / n;
        for (i, count) in counts.iter().enumerate() {
            assert!(*count > 0, "index {i} never picked");
            let deviation = (*count as f64 - expected as f64).abs() / expected as f64;
            assert!(deviation < 0.05, "index {i} picked {count} times");
        }
    }

    #[test]
    fn test_evenly_spaced_draws_cover_all_indices() {
        let n = 5;
        let items = items(n);
        for i in 0..n {
            let draw = (i as f64 + 0.5) / n as f64;
            assert_eq!(pick_with_draw(&items, draw), Some(items[i].as_str()));
        }
    }
}

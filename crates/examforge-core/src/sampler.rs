//! Distribution-constrained sampling.
//!
//! For each difficulty tier the sampler draws the required number of
//! representatives, uniformly without replacement, from the category-filtered
//! candidate pool. Buckets are processed in the fixed order
//! Trivial through VeryHard and all draws consume the same generator
//! instance, so the outcome is fully determined by the variant's seed.

use std::collections::HashSet;

use rand::Rng;

use crate::error::EngineError;
use crate::model::{Difficulty, Question, SelectionConfig};

/// Draw one variant's worth of questions from the representative set.
///
/// A bucket that cannot be filled is fatal: the error carries the exact
/// required and available counts so the configuration can be corrected.
pub fn sample<R: Rng>(
    representatives: &[Question],
    config: &SelectionConfig,
    rng: &mut R,
) -> Result<Vec<Question>, EngineError> {
    let mut selected: Vec<Question> = Vec::with_capacity(config.questions_per_variant());
    let mut taken: HashSet<&str> = HashSet::new();

    for difficulty in Difficulty::ALL {
        let required = match config.distribution.get(&difficulty) {
            Some(&n) if n > 0 => n,
            _ => continue,
        };

        // Candidates arrive in identity order because the bank iterates in
        // identity order.
        let mut pool: Vec<&Question> = representatives
            .iter()
            .filter(|q| q.difficulty == difficulty)
            .filter(|q| config.category_allowed(&q.category))
            .filter(|q| config.allow_duplicates || !taken.contains(q.identity.as_str()))
            .collect();

        if pool.len() < required {
            return Err(EngineError::InsufficientQuestions {
                difficulty,
                required,
                available: pool.len(),
            });
        }

        for _ in 0..required {
            let choice = rng.gen_range(0..pool.len());
            let question = pool.swap_remove(choice);
            taken.insert(question.identity.as_str());
            selected.push(question.clone());
        }
    }

    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeliveryType;
    use crate::rng::rng_for_seed;
    use std::collections::BTreeMap;

    fn question(id: &str, category: &str, difficulty: Difficulty) -> Question {
        Question {
            identity: id.to_string(),
            category: category.to_string(),
            difficulty,
            delivery_type: DeliveryType::ShortAnswer,
            text: format!("question {id}"),
            options: vec![],
            correct_answer: None,
        }
    }

    fn config(distribution: &[(Difficulty, usize)]) -> SelectionConfig {
        let mut c = SelectionConfig::default();
        c.distribution = distribution.iter().copied().collect::<BTreeMap<_, _>>();
        c
    }

    fn pool(n_per_tier: &[(Difficulty, usize)]) -> Vec<Question> {
        let mut out = Vec::new();
        for (difficulty, n) in n_per_tier {
            for i in 0..*n {
                out.push(question(&format!("{difficulty}-{i:02}"), "cat", *difficulty));
            }
        }
        out
    }

    #[test]
    fn counts_match_distribution_exactly() {
        let reps = pool(&[(Difficulty::Trivial, 8), (Difficulty::Hard, 8)]);
        let config = config(&[(Difficulty::Trivial, 3), (Difficulty::Hard, 2)]);

        let selected = sample(&reps, &config, &mut rng_for_seed(1)).unwrap();
        assert_eq!(selected.len(), 5);
        assert_eq!(
            selected.iter().filter(|q| q.difficulty == Difficulty::Trivial).count(),
            3
        );
        assert_eq!(
            selected.iter().filter(|q| q.difficulty == Difficulty::Hard).count(),
            2
        );
    }

    #[test]
    fn no_replacement_within_bucket() {
        let reps = pool(&[(Difficulty::Easy, 10)]);
        let config = config(&[(Difficulty::Easy, 10)]);

        let selected = sample(&reps, &config, &mut rng_for_seed(3)).unwrap();
        let distinct: HashSet<_> = selected.iter().map(|q| &q.identity).collect();
        assert_eq!(distinct.len(), 10);
    }

    #[test]
    fn insufficient_bucket_reports_true_counts() {
        let reps = pool(&[(Difficulty::Trivial, 5)]);
        let config = config(&[(Difficulty::Trivial, 6)]);

        let err = sample(&reps, &config, &mut rng_for_seed(1)).unwrap_err();
        match err {
            EngineError::InsufficientQuestions {
                difficulty,
                required,
                available,
            } => {
                assert_eq!(difficulty, Difficulty::Trivial);
                assert_eq!(required, 6);
                assert_eq!(available, 5);
            }
            other => panic!("expected InsufficientQuestions, got {other:?}"),
        }
    }

    #[test]
    fn category_filter_shrinks_pool() {
        let mut reps = pool(&[(Difficulty::Easy, 4)]);
        reps.push(question("other-0", "excluded", Difficulty::Easy));

        let mut config = config(&[(Difficulty::Easy, 5)]);
        config.categories = vec!["cat".into()];

        let err = sample(&reps, &config, &mut rng_for_seed(1)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientQuestions { available: 4, .. }
        ));
    }

    #[test]
    fn forced_selection_takes_everything() {
        // Required counts equal available counts: selection is forced and
        // deterministic regardless of seed.
        let reps = pool(&[
            (Difficulty::Trivial, 5),
            (Difficulty::Easy, 7),
            (Difficulty::Medium, 8),
            (Difficulty::Hard, 2),
            (Difficulty::VeryHard, 2),
        ]);
        let config = config(&[
            (Difficulty::Trivial, 5),
            (Difficulty::Easy, 7),
            (Difficulty::Medium, 8),
            (Difficulty::Hard, 2),
            (Difficulty::VeryHard, 2),
        ]);

        let a = sample(&reps, &config, &mut rng_for_seed(1)).unwrap();
        let b = sample(&reps, &config, &mut rng_for_seed(999)).unwrap();
        assert_eq!(a.len(), 24);

        let ids = |v: &[Question]| {
            let mut ids: Vec<_> = v.iter().map(|q| q.identity.clone()).collect();
            ids.sort();
            ids
        };
        assert_eq!(ids(&a), ids(&b));
        assert_eq!(ids(&a).len(), reps.len());
    }

    #[test]
    fn same_seed_same_draw() {
        let reps = pool(&[(Difficulty::Easy, 20)]);
        let config = config(&[(Difficulty::Easy, 5)]);

        let a = sample(&reps, &config, &mut rng_for_seed(42)).unwrap();
        let b = sample(&reps, &config, &mut rng_for_seed(42)).unwrap();
        let a_ids: Vec<_> = a.iter().map(|q| &q.identity).collect();
        let b_ids: Vec<_> = b.iter().map(|q| &q.identity).collect();
        assert_eq!(a_ids, b_ids);
    }

    #[test]
    fn allow_duplicates_bypasses_taken_guard() {
        // One identity listed under two tiers. With the guard on, the Hard
        // bucket has nothing left; with duplicates allowed, both draws land
        // on the same identity.
        let reps = vec![
            question("dup", "cat", Difficulty::Easy),
            question("dup", "cat", Difficulty::Hard),
        ];
        let mut config = config(&[(Difficulty::Easy, 1), (Difficulty::Hard, 1)]);

        let err = sample(&reps, &config, &mut rng_for_seed(1)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientQuestions {
                difficulty: Difficulty::Hard,
                available: 0,
                ..
            }
        ));

        config.allow_duplicates = true;
        let selected = sample(&reps, &config, &mut rng_for_seed(1)).unwrap();
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].identity, selected[1].identity);
    }

    #[test]
    fn duplicate_guard_across_buckets() {
        // A representative already taken for an earlier tier is not eligible
        // again.
        let reps = pool(&[(Difficulty::Easy, 3)]);
        let mut config = config(&[(Difficulty::Easy, 3)]);
        config.allow_duplicates = false;

        let selected = sample(&reps, &config, &mut rng_for_seed(1)).unwrap();
        let distinct: HashSet<_> = selected.iter().map(|q| &q.identity).collect();
        assert_eq!(distinct.len(), selected.len());
    }
}

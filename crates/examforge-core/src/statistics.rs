//! Per-variant and batch-level statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, Question, Variant};

/// Counts and point totals for one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantStats {
    /// Per-difficulty breakdown, in tier order.
    pub per_difficulty: BTreeMap<Difficulty, TierStats>,
    /// Total question count.
    pub total_questions: usize,
    /// Total points.
    pub total_points: u32,
}

/// Breakdown for one difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierStats {
    pub count: usize,
    pub points: u32,
}

impl VariantStats {
    /// Compute statistics for a selected question list.
    pub fn compute(questions: &[Question], points_per_question: u32) -> Self {
        let mut per_difficulty: BTreeMap<Difficulty, TierStats> = BTreeMap::new();
        for question in questions {
            let tier = per_difficulty
                .entry(question.difficulty)
                .or_insert(TierStats { count: 0, points: 0 });
            tier.count += 1;
            tier.points += points_per_question;
        }
        Self {
            per_difficulty,
            total_questions: questions.len(),
            total_points: questions.len() as u32 * points_per_question,
        }
    }
}

/// Aggregate statistics across a whole batch of variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchStats {
    /// How many times each category was used, across all variants.
    pub category_usage: BTreeMap<String, usize>,
    /// Distinct questions used at least once across the batch.
    pub distinct_questions: usize,
}

impl BatchStats {
    pub fn compute(variants: &[Variant]) -> Self {
        let mut category_usage: BTreeMap<String, usize> = BTreeMap::new();
        let mut seen = std::collections::BTreeSet::new();
        for variant in variants {
            for question in &variant.questions {
                *category_usage.entry(question.category.clone()).or_default() += 1;
                seen.insert(question.identity.clone());
            }
        }
        Self {
            category_usage,
            distinct_questions: seen.len(),
        }
    }
}

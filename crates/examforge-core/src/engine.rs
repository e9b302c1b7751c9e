//! Variant orchestration.
//!
//! Drives sampling and sequencing once per requested variant, derives a
//! per-variant seed from the base seed, builds the answer key alongside each
//! variant, and packages everything into an [`ExamBatch`]. Variants are
//! validated as a batch: any failure aborts the whole run and no partial
//! variant set is returned.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bank::QuestionBank;
use crate::error::EngineError;
use crate::model::{AnswerKey, AnswerKeyEntry, Question, SelectionConfig, Variant};
use crate::resolver;
use crate::rng::{derive_stream, derive_variant_seed, rng_for_seed, OPTION_SHUFFLE_STREAM};
use crate::sampler;
use crate::sequencer;
use crate::statistics::{BatchStats, VariantStats};

/// The complete output of one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamBatch {
    /// Unique batch identifier.
    pub id: Uuid,
    /// When the batch was generated.
    pub created_at: DateTime<Utc>,
    /// The base seed the run used (configured or drawn from OS entropy).
    pub base_seed: u64,
    /// Whether the base seed came from configuration (reproducible) or
    /// from entropy (advisory: regenerating requires recording this seed).
    pub seeded: bool,
    /// Generated variants, in index order.
    pub variants: Vec<Variant>,
    /// One answer key per variant, parallel to `variants`.
    pub answer_keys: Vec<AnswerKey>,
    /// Aggregate statistics across the batch.
    pub stats: BatchStats,
}

impl ExamBatch {
    /// Save the batch as JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize batch")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write batch to {}", path.display()))?;
        Ok(())
    }

    /// Load a batch from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read batch from {}", path.display()))?;
        let batch: ExamBatch =
            serde_json::from_str(&content).context("failed to parse batch JSON")?;
        Ok(batch)
    }
}

/// Generate all requested variants from a bank and selection config.
///
/// Pure function of `(bank, config, base seed)`: with a configured seed,
/// regenerating yields byte-identical variants. Without one, a fresh base
/// seed is drawn from OS entropy and recorded on the batch so the run is at
/// least explainable after the fact.
pub fn generate(bank: &QuestionBank, config: &SelectionConfig) -> Result<ExamBatch, EngineError> {
    validate_config(config)?;

    let resolved = resolver::resolve(bank, config);
    let representatives: Vec<Question> =
        resolved.representatives().into_iter().cloned().collect();

    tracing::info!(
        bank_size = bank.len(),
        representatives = representatives.len(),
        variants = config.variants,
        "starting generation"
    );

    let (base_seed, seeded) = match config.seed {
        Some(seed) => (seed, true),
        None => (rand::rngs::OsRng.gen::<u64>(), false),
    };

    let mut variants = Vec::with_capacity(config.variants);
    let mut answer_keys = Vec::with_capacity(config.variants);

    for index in 1..=config.variants {
        let seed = derive_variant_seed(base_seed, index as u64);
        let mut rng = rng_for_seed(seed);

        let sampled = sampler::sample(&representatives, config, &mut rng)?;
        let questions = sequencer::sequence(sampled, config.min_category_spacing);
        let stats = VariantStats::compute(&questions, config.points_per_question);

        let answer_key = build_answer_key(index, seed, &questions, config.points_per_question);

        tracing::debug!(
            variant = index,
            seed,
            questions = questions.len(),
            points = stats.total_points,
            "variant generated"
        );

        variants.push(Variant {
            index,
            seed,
            questions,
            stats,
        });
        answer_keys.push(answer_key);
    }

    let stats = BatchStats::compute(&variants);

    Ok(ExamBatch {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        base_seed,
        seeded,
        variants,
        answer_keys,
        stats,
    })
}

fn validate_config(config: &SelectionConfig) -> Result<(), EngineError> {
    if config.variants == 0 {
        return Err(EngineError::InvalidConfig(
            "variants must be at least 1".into(),
        ));
    }
    if config.questions_per_variant() == 0 {
        return Err(EngineError::InvalidConfig(
            "difficulty distribution requires at least one question".into(),
        ));
    }
    if config.categories.is_empty() {
        return Err(EngineError::InvalidConfig(
            "category filter must not be empty (use [\"*\"] for all)".into(),
        ));
    }
    Ok(())
}

/// Build the answer key for one variant. Option order is shuffled with a
/// child generator derived from the variant seed, so presentation order is
/// reproducible but independent of the selection draws.
fn build_answer_key(
    variant_index: usize,
    variant_seed: u64,
    questions: &[Question],
    points_per_question: u32,
) -> AnswerKey {
    let mut shuffle_rng =
        rand::rngs::StdRng::seed_from_u64(derive_stream(variant_seed, OPTION_SHUFFLE_STREAM));

    let entries = questions
        .iter()
        .enumerate()
        .map(|(i, question)| {
            let mut options = question.options.clone();
            options.shuffle(&mut shuffle_rng);

            let correct_option = question.correct_answer.as_ref().and_then(|answer| {
                options.iter().position(|o| o == answer)
            });

            AnswerKeyEntry {
                position: i + 1,
                identity: question.identity.clone(),
                points: points_per_question,
                options,
                correct_answer: question.correct_answer.clone(),
                correct_option,
            }
        })
        .collect();

    AnswerKey {
        variant_index,
        entries,
    }
}

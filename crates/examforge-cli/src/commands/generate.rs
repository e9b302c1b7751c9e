//! The `examforge generate` command.

use std::path::{Path, PathBuf};

use anyhow::Result;

use examforge_core::config::{load_config, ExamConfig};
use examforge_core::engine::{self, ExamBatch};
use examforge_core::parser;
use examforge_render::{html, markdown};

pub fn execute(
    bank_path: PathBuf,
    config_path: PathBuf,
    output: PathBuf,
    format: String,
    seed: Option<u64>,
    variants: Option<usize>,
) -> Result<()> {
    // Load bank
    let bank = if bank_path.is_dir() {
        parser::load_bank_directory(&bank_path)?
    } else {
        parser::parse_bank(&bank_path)?
    };

    // Surface advisory warnings before generating
    let warnings = parser::validate_bank(&bank);
    for w in &warnings {
        eprintln!("Warning: {}", w.message);
    }

    // Load config, apply flag overrides
    let mut config = load_config(&config_path)?;
    if let Some(seed) = seed {
        config.selection.seed = Some(seed);
    }
    if let Some(variants) = variants {
        config.selection.variants = variants;
    }

    eprintln!(
        "examforge — generating {} variant(s) x {} questions from a bank of {}",
        config.selection.variants,
        config.selection.questions_per_variant(),
        bank.len()
    );

    let batch = engine::generate(&bank, &config.selection)?;
    tracing::info!(
        batch = %batch.id,
        variants = batch.variants.len(),
        seeded = batch.seeded,
        "batch generated"
    );

    print_summary(&batch);
    if !batch.seeded {
        eprintln!(
            "Note: no seed configured; base seed {} was drawn from OS entropy. \
             Record it to reproduce this batch.",
            batch.base_seed
        );
    }

    // Save outputs
    std::fs::create_dir_all(&output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

    let formats: Vec<&str> = if format == "all" {
        vec!["markdown", "html", "json"]
    } else {
        format.split(',').collect()
    };

    for fmt in &formats {
        match *fmt {
            "markdown" => write_markdown(&batch, &bank, &config, &output)?,
            "html" => write_html(&batch, &bank, &config, &output)?,
            "json" => {
                let path = output.join(format!("batch-{timestamp}.json"));
                batch.save_json(&path)?;
                eprintln!("Batch saved to: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}

fn write_markdown(
    batch: &ExamBatch,
    bank: &examforge_core::bank::QuestionBank,
    config: &ExamConfig,
    output: &Path,
) -> Result<()> {
    for (variant, key) in batch.variants.iter().zip(&batch.answer_keys) {
        let path = output.join(format!("exam-variant-{}.md", variant.index));
        let sheet = markdown::render_exam(variant, key, bank, &config.exam);
        std::fs::write(&path, sheet)?;
        eprintln!("Exam sheet: {}", path.display());

        if config.exam.include_answers {
            let key_path = output.join(format!("answer-key-variant-{}.md", variant.index));
            let rendered = markdown::render_answer_key(variant, key, &config.exam);
            std::fs::write(&key_path, rendered)?;
            eprintln!("Answer key: {}", key_path.display());
        }
    }
    Ok(())
}

fn write_html(
    batch: &ExamBatch,
    bank: &examforge_core::bank::QuestionBank,
    config: &ExamConfig,
    output: &Path,
) -> Result<()> {
    for (variant, key) in batch.variants.iter().zip(&batch.answer_keys) {
        let path = output.join(format!("exam-variant-{}.html", variant.index));
        html::write_exam(variant, key, bank, &config.exam, &path)?;
        eprintln!("Exam sheet: {}", path.display());
    }
    Ok(())
}

fn print_summary(batch: &ExamBatch) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Variant", "Seed", "Questions", "Points", "Trivial", "Easy", "Medium", "Hard",
        "Very Hard",
    ]);

    for variant in &batch.variants {
        let tier = |d| {
            variant
                .stats
                .per_difficulty
                .get(&d)
                .map(|t| t.count)
                .unwrap_or(0)
        };
        use examforge_core::model::Difficulty::*;
        table.add_row(vec![
            Cell::new(variant.index),
            Cell::new(format!("{:016x}", variant.seed)),
            Cell::new(variant.stats.total_questions),
            Cell::new(variant.stats.total_points),
            Cell::new(tier(Trivial)),
            Cell::new(tier(Easy)),
            Cell::new(tier(Medium)),
            Cell::new(tier(Hard)),
            Cell::new(tier(VeryHard)),
        ]);
    }

    eprintln!("\n{table}");
    eprintln!(
        "Distinct questions used: {} | Base seed: {:016x}",
        batch.stats.distinct_questions, batch.base_seed
    );
}

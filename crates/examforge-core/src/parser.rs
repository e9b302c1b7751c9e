//! TOML question bank parser.
//!
//! Loads question banks from TOML files and directories, and produces
//! advisory validation warnings. Record fields stay optional at this layer;
//! the bank loader owns required-field and enumeration validation so that
//! errors carry record positions.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::bank::{QuestionBank, RawRecord};
use crate::model::DeliveryType;
use crate::resolver::equivalence_key;

/// Intermediate TOML structure for bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    categories: std::collections::BTreeMap<String, String>,
    #[serde(default)]
    questions: Vec<TomlQuestionRecord>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    #[allow(dead_code)]
    id: String,
    name: String,
    #[serde(default)]
    #[allow(dead_code)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestionRecord {
    #[serde(default)]
    category: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct_answer: Option<String>,
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bank file: {}", path.display()))?;
    parse_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let records = parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(position, q)| RawRecord {
            position,
            category: q.category,
            kind: q.kind,
            difficulty: q.difficulty,
            text: q.question,
            options: q.options,
            correct_answer: q.correct_answer,
        });

    let mut bank = QuestionBank::from_records(records)
        .with_context(|| format!("invalid bank: {}", source_path.display()))?;
    bank.category_names = parsed.categories;

    tracing::debug!(
        bank = %parsed.bank.name,
        questions = bank.len(),
        "bank loaded"
    );

    Ok(bank)
}

/// Recursively load and merge all `.toml` bank files from a directory.
pub fn load_bank_directory(dir: &Path) -> Result<QuestionBank> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut merged = QuestionBank::default();
    let mut loaded = 0usize;
    load_into(dir, &mut merged, &mut loaded)?;

    if loaded == 0 {
        anyhow::bail!("no bank files found in {}", dir.display());
    }

    Ok(merged)
}

fn load_into(dir: &Path, merged: &mut QuestionBank, loaded: &mut usize) -> Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            load_into(&path, merged, loaded)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_bank(&path) {
                Ok(bank) => {
                    merged
                        .merge(bank)
                        .with_context(|| format!("conflicting bank: {}", path.display()))?;
                    *loaded += 1;
                }
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }
    Ok(())
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Identity of the question (if applicable).
    pub identity: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a bank for common issues. Advisory only; never an error.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Multiple choice without options cannot be rendered as a choice list.
    for question in bank.questions() {
        if question.delivery_type == DeliveryType::MultipleChoice && question.options.is_empty() {
            warnings.push(ValidationWarning {
                identity: Some(question.identity.clone()),
                message: "multiple choice question has no options".into(),
            });
        }
    }

    // A recorded correct answer that is not one of the options is
    // unresolvable when lettering the answer key; a missing one leaves the
    // key entry blank.
    for question in bank.questions() {
        if question.delivery_type == DeliveryType::MultipleChoice {
            match &question.correct_answer {
                Some(answer) if !question.options.iter().any(|o| o == answer) => {
                    warnings.push(ValidationWarning {
                        identity: Some(question.identity.clone()),
                        message: format!("correct answer '{answer}' is not among the options"),
                    });
                }
                None => {
                    warnings.push(ValidationWarning {
                        identity: Some(question.identity.clone()),
                        message: "multiple choice question has no recorded correct answer".into(),
                    });
                }
                _ => {}
            }
        }
    }

    // Near-duplicate text across delivery types is expected (the resolver
    // collapses it) but worth surfacing when the members disagree on
    // difficulty, since only one of them can ever be selected.
    let mut by_equiv: std::collections::BTreeMap<String, Vec<&crate::model::Question>> =
        std::collections::BTreeMap::new();
    for question in bank.questions() {
        by_equiv
            .entry(equivalence_key(question))
            .or_default()
            .push(question);
    }
    for members in by_equiv.values() {
        if members.len() > 1 {
            let first = members[0].difficulty;
            if members.iter().any(|m| m.difficulty != first) {
                warnings.push(ValidationWarning {
                    identity: Some(members[0].identity.clone()),
                    message: format!(
                        "equivalent renditions disagree on difficulty ({} members)",
                        members.len()
                    ),
                });
            }
        }
    }

    warnings
}

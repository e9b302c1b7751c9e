//! Question bank loading and content-addressed identity.
//!
//! The loader turns raw records into typed [`Question`]s keyed by a
//! content-derived identity. The identity is a SHA-256 over canonicalized
//! field bytes, so reloading the same logical bank yields identical keys
//! regardless of record order or incidental whitespace.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use crate::error::EngineError;
use crate::model::{DeliveryType, Difficulty, Question};

/// A raw question record as handed over by the parsing layer.
///
/// Content fields are optional here so that validation, not deserialization,
/// owns the error reporting: a missing field becomes a
/// [`EngineError::MalformedRecord`] with the record's position.
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    /// 0-based position of the record in its source, for error reporting.
    pub position: usize,
    pub category: Option<String>,
    pub kind: Option<String>,
    pub difficulty: Option<String>,
    pub text: Option<String>,
    pub options: Vec<String>,
    pub correct_answer: Option<String>,
}

/// The loaded question bank, keyed by identity.
///
/// Iteration order is identity order (via `BTreeMap`), so nothing downstream
/// can depend on the order records arrived in.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: BTreeMap<String, Question>,
    /// Source position of each question's record, for conflict reporting.
    positions: BTreeMap<String, usize>,
    /// Optional category tag -> display name mapping.
    pub category_names: BTreeMap<String, String>,
}

impl QuestionBank {
    /// Build a bank from raw records.
    ///
    /// Two records with identical identity and identical fields collapse to
    /// one question (hard dedup). Identical identity with differing fields is
    /// a [`EngineError::ConflictingIdentity`].
    pub fn from_records(
        records: impl IntoIterator<Item = RawRecord>,
    ) -> Result<Self, EngineError> {
        let mut questions: BTreeMap<String, Question> = BTreeMap::new();
        let mut positions: BTreeMap<String, usize> = BTreeMap::new();

        for record in records {
            let position = record.position;
            let question = validate_record(record)?;

            if let Some(existing) = questions.get(&question.identity) {
                if *existing == question {
                    tracing::debug!(
                        identity = %question.identity,
                        "exact duplicate record, deduplicated"
                    );
                    continue;
                }
                return Err(EngineError::ConflictingIdentity {
                    identity: question.identity.clone(),
                    first: positions[&question.identity],
                    second: position,
                });
            }

            positions.insert(question.identity.clone(), position);
            questions.insert(question.identity.clone(), question);
        }

        Ok(Self {
            questions,
            positions,
            category_names: BTreeMap::new(),
        })
    }

    /// Number of distinct questions in the bank.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Look up a question by identity key.
    pub fn get(&self, identity: &str) -> Option<&Question> {
        self.questions.get(identity)
    }

    /// All questions in identity order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.values()
    }

    /// Display name for a category tag, falling back to the tag itself.
    pub fn category_name<'a>(&'a self, tag: &'a str) -> &'a str {
        self.category_names.get(tag).map(String::as_str).unwrap_or(tag)
    }

    /// Merge another bank into this one, checking identity conflicts.
    /// A conflict reports both records' source positions.
    pub fn merge(&mut self, other: QuestionBank) -> Result<(), EngineError> {
        for (identity, question) in other.questions {
            let position = other.positions.get(&identity).copied().unwrap_or_default();
            if let Some(existing) = self.questions.get(&identity) {
                if *existing != question {
                    return Err(EngineError::ConflictingIdentity {
                        first: self.positions.get(&identity).copied().unwrap_or_default(),
                        second: position,
                        identity,
                    });
                }
                continue;
            }
            self.positions.insert(identity.clone(), position);
            self.questions.insert(identity, question);
        }
        self.category_names.extend(other.category_names);
        Ok(())
    }
}

/// Collapse runs of whitespace into single spaces, trimming the ends.
/// Case is preserved: `"What is   C?"` and `"what is c?"` are different text.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compute the content-derived identity key for a question.
///
/// SHA-256 over category, delivery type, whitespace-collapsed text, and each
/// option, joined by unit separators. Pure function of content: stable across
/// record order, platforms, and locales.
pub fn identity_key(
    category: &str,
    kind: DeliveryType,
    text: &str,
    options: &[String],
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(category.as_bytes());
    hasher.update([0x1f]);
    hasher.update(kind.to_string().as_bytes());
    hasher.update([0x1f]);
    hasher.update(collapse_whitespace(text).as_bytes());
    for option in options {
        hasher.update([0x1f]);
        hasher.update(collapse_whitespace(option).as_bytes());
    }
    let digest = hasher.finalize();
    let mut rendered = String::with_capacity(digest.len() * 2);
    for byte in digest {
        rendered.push_str(&format!("{byte:02x}"));
    }
    rendered
}

fn validate_record(record: RawRecord) -> Result<Question, EngineError> {
    let position = record.position;
    let missing = |field: &str| EngineError::MalformedRecord {
        position,
        reason: format!("missing required field `{field}`"),
    };

    let category = record.category.filter(|c| !c.trim().is_empty()).ok_or_else(|| missing("category"))?;
    let kind_raw = record.kind.ok_or_else(|| missing("type"))?;
    let difficulty_raw = record.difficulty.ok_or_else(|| missing("difficulty"))?;
    let text = record.text.filter(|t| !t.trim().is_empty()).ok_or_else(|| missing("question"))?;

    let delivery_type: DeliveryType =
        kind_raw
            .parse()
            .map_err(|reason: String| EngineError::MalformedRecord { position, reason })?;
    let difficulty: Difficulty =
        difficulty_raw
            .parse()
            .map_err(|reason: String| EngineError::MalformedRecord { position, reason })?;

    let category = category.trim().to_string();
    let identity = identity_key(&category, delivery_type, &text, &record.options);

    Ok(Question {
        identity,
        category,
        difficulty,
        delivery_type,
        text,
        options: record.options,
        correct_answer: record.correct_answer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: &str, kind: &str, difficulty: &str, text: &str) -> RawRecord {
        RawRecord {
            position: 0,
            category: Some(category.into()),
            kind: Some(kind.into()),
            difficulty: Some(difficulty.into()),
            text: Some(text.into()),
            options: vec![],
            correct_answer: None,
        }
    }

    #[test]
    fn identity_ignores_incidental_whitespace() {
        let a = identity_key("loops", DeliveryType::ShortAnswer, "What  does\nthis do?", &[]);
        let b = identity_key("loops", DeliveryType::ShortAnswer, "What does this do?", &[]);
        assert_eq!(a, b);
    }

    #[test]
    fn identity_preserves_case() {
        let a = identity_key("loops", DeliveryType::ShortAnswer, "What is C?", &[]);
        let b = identity_key("loops", DeliveryType::ShortAnswer, "what is c?", &[]);
        assert_ne!(a, b);
    }

    #[test]
    fn identity_depends_on_category_type_and_options() {
        let base = identity_key("loops", DeliveryType::ShortAnswer, "Q", &[]);
        assert_ne!(base, identity_key("arrays", DeliveryType::ShortAnswer, "Q", &[]));
        assert_ne!(base, identity_key("loops", DeliveryType::Essay, "Q", &[]));
        assert_ne!(
            base,
            identity_key("loops", DeliveryType::ShortAnswer, "Q", &["a".into()])
        );
    }

    #[test]
    fn load_is_order_independent() {
        let r1 = record("loops", "short_answer", "easy", "First question?");
        let r2 = record("arrays", "code", "hard", "Second question?");

        let bank_a = QuestionBank::from_records(vec![r1.clone(), r2.clone()]).unwrap();
        let bank_b = QuestionBank::from_records(vec![r2, r1]).unwrap();

        let ids_a: Vec<_> = bank_a.questions().map(|q| q.identity.clone()).collect();
        let ids_b: Vec<_> = bank_b.questions().map(|q| q.identity.clone()).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn exact_duplicates_collapse() {
        let r = record("loops", "short_answer", "easy", "Same question?");
        let bank = QuestionBank::from_records(vec![r.clone(), r]).unwrap();
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn conflicting_identity_is_fatal() {
        let mut r1 = record("loops", "short_answer", "easy", "Same question?");
        r1.position = 1;
        let mut r2 = r1.clone();
        r2.position = 7;
        // Same content hash inputs, different non-hashed field.
        r2.correct_answer = Some("different".into());

        let err = QuestionBank::from_records(vec![r1, r2]).unwrap_err();
        match err {
            EngineError::ConflictingIdentity { first, second, .. } => {
                assert_eq!(first, 1);
                assert_eq!(second, 7);
            }
            other => panic!("expected ConflictingIdentity, got {other:?}"),
        }
    }

    #[test]
    fn merge_conflict_reports_source_positions() {
        let mut r1 = record("loops", "short_answer", "easy", "Same question?");
        r1.position = 3;
        let mut r2 = r1.clone();
        r2.position = 9;
        r2.correct_answer = Some("different".into());

        let mut first_bank = QuestionBank::from_records(vec![r1]).unwrap();
        let second_bank = QuestionBank::from_records(vec![r2]).unwrap();

        let err = first_bank.merge(second_bank).unwrap_err();
        match err {
            EngineError::ConflictingIdentity { first, second, .. } => {
                assert_eq!(first, 3);
                assert_eq!(second, 9);
            }
            other => panic!("expected ConflictingIdentity, got {other:?}"),
        }
    }

    #[test]
    fn merge_keeps_positions_for_later_conflicts() {
        let mut r1 = record("loops", "short_answer", "easy", "Carried over?");
        r1.position = 5;
        let mut conflicting = r1.clone();
        conflicting.position = 2;
        conflicting.correct_answer = Some("different".into());

        // Merge r1 into an empty bank, then conflict against the merged copy.
        let mut merged = QuestionBank::default();
        merged
            .merge(QuestionBank::from_records(vec![r1]).unwrap())
            .unwrap();
        let err = merged
            .merge(QuestionBank::from_records(vec![conflicting]).unwrap())
            .unwrap_err();
        match err {
            EngineError::ConflictingIdentity { first, second, .. } => {
                assert_eq!(first, 5);
                assert_eq!(second, 2);
            }
            other => panic!("expected ConflictingIdentity, got {other:?}"),
        }
    }

    #[test]
    fn missing_field_is_malformed() {
        let mut r = record("loops", "short_answer", "easy", "Q?");
        r.position = 4;
        r.text = None;

        let err = QuestionBank::from_records(vec![r]).unwrap_err();
        match err {
            EngineError::MalformedRecord { position, reason } => {
                assert_eq!(position, 4);
                assert!(reason.contains("question"));
            }
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn invalid_enumeration_is_malformed() {
        let r = record("loops", "telepathy", "easy", "Q?");
        let err = QuestionBank::from_records(vec![r]).unwrap_err();
        assert!(matches!(err, EngineError::MalformedRecord { .. }));
        assert!(err.to_string().contains("telepathy"));
    }
}

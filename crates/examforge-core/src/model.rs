//! Core data model types for examforge.
//!
//! These are the fundamental types that the entire examforge system uses
//! to represent questions, selection configuration, and generated variants.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Difficulty tier of a question, ordered easiest to hardest.
///
/// The derived `Ord` gives the tier order used for bucket iteration and
/// final sequencing: `Trivial < Easy < Medium < Hard < VeryHard`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Trivial,
    Easy,
    Medium,
    Hard,
    VeryHard,
}

impl Difficulty {
    /// All tiers in ascending order. Sampling consumes the generator in
    /// exactly this order, so results are a pure function of the seed.
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Trivial,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::VeryHard,
    ];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Trivial => write!(f, "trivial"),
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
            Difficulty::VeryHard => write!(f, "very_hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(' ', "_").as_str() {
            "trivial" => Ok(Difficulty::Trivial),
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "very_hard" => Ok(Difficulty::VeryHard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// How a question is delivered to (and answered by) the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    MultipleChoice,
    ShortAnswer,
    FreeText,
    Code,
    Essay,
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryType::MultipleChoice => write!(f, "multiple_choice"),
            DeliveryType::ShortAnswer => write!(f, "short_answer"),
            DeliveryType::FreeText => write!(f, "free_text"),
            DeliveryType::Code => write!(f, "code"),
            DeliveryType::Essay => write!(f, "essay"),
        }
    }
}

impl FromStr for DeliveryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(' ', "_").as_str() {
            "multiple_choice" => Ok(DeliveryType::MultipleChoice),
            "short_answer" => Ok(DeliveryType::ShortAnswer),
            // Legacy banks carry both spellings.
            "free_text" | "free_text_answer" => Ok(DeliveryType::FreeText),
            "code" => Ok(DeliveryType::Code),
            "essay" => Ok(DeliveryType::Essay),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// A single question from the bank. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Content-derived identity key (hex SHA-256), unique within the bank.
    pub identity: String,
    /// Category tag (e.g. "pointers").
    pub category: String,
    /// Difficulty tier.
    pub difficulty: Difficulty,
    /// Delivery type.
    pub delivery_type: DeliveryType,
    /// The question text as shown to the student.
    pub text: String,
    /// Answer options, in bank order. Only meaningful for multiple choice.
    #[serde(default)]
    pub options: Vec<String>,
    /// The correct answer, when the bank records one.
    #[serde(default)]
    pub correct_answer: Option<String>,
}

/// Selection configuration: what to pick and how.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Category tags to draw from. `["*"]` means all categories.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    /// Delivery-type preference order used when resolving equivalence
    /// groups. Empty means the resolver falls back to identity-key order.
    #[serde(default)]
    pub preferred_types: Vec<DeliveryType>,
    /// Required question count per difficulty tier.
    pub distribution: BTreeMap<Difficulty, usize>,
    /// Points awarded per question.
    #[serde(default = "default_points")]
    pub points_per_question: u32,
    /// Allow the same representative in more than one bucket of a variant.
    #[serde(default)]
    pub allow_duplicates: bool,
    /// Minimum positional distance between same-category questions in the
    /// final order. 0 disables spacing enforcement.
    #[serde(default)]
    pub min_category_spacing: usize,
    /// Base seed for reproducible generation. Absent means each run draws a
    /// fresh seed from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Number of variants to generate.
    #[serde(default = "default_variants")]
    pub variants: usize,
}

fn default_categories() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_points() -> u32 {
    5
}

fn default_variants() -> usize {
    1
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            preferred_types: Vec::new(),
            distribution: BTreeMap::new(),
            points_per_question: default_points(),
            allow_duplicates: false,
            min_category_spacing: 0,
            seed: None,
            variants: default_variants(),
        }
    }
}

impl SelectionConfig {
    /// Whether the category filter admits `category`.
    pub fn category_allowed(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == "*" || c == category)
    }

    /// Total questions a single variant must contain.
    pub fn questions_per_variant(&self) -> usize {
        self.distribution.values().sum()
    }
}

/// One complete, independently valid exam instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    /// 1-based variant index.
    pub index: usize,
    /// The derived seed this variant was generated with.
    pub seed: u64,
    /// Questions in final presentation order.
    pub questions: Vec<Question>,
    /// Per-difficulty counts and point totals.
    pub stats: crate::statistics::VariantStats,
}

/// The answer key for one variant, in the same question order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerKey {
    /// Index of the variant this key belongs to.
    pub variant_index: usize,
    /// One entry per question, parallel to `Variant::questions`.
    pub entries: Vec<AnswerKeyEntry>,
}

/// A single answer key entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerKeyEntry {
    /// 1-based position on the exam sheet.
    pub position: usize,
    /// Identity key of the question.
    pub identity: String,
    /// Points this question is worth.
    pub points: u32,
    /// Options in presentation order (shuffled per variant). Empty for
    /// non-multiple-choice questions.
    pub options: Vec<String>,
    /// The correct answer text, if the bank records one.
    pub correct_answer: Option<String>,
    /// For multiple choice: 0-based index of the correct answer within the
    /// presentation order (renderers letter it a, b, c, ...).
    pub correct_option: Option<usize>,
}

//! Markdown exam sheet and answer key rendering.

use examforge_core::bank::QuestionBank;
use examforge_core::config::ExamSettings;
use examforge_core::model::{AnswerKey, AnswerKeyEntry, DeliveryType, Question, Variant};

/// Letter for a 0-based option index: a, b, c, ...
fn option_letter(index: usize) -> char {
    (b'a' + (index % 26) as u8) as char
}

/// Options in the order the sheet presents them: the answer key's shuffled
/// order when `shuffle_options` is set, bank order otherwise.
fn presented_options<'a>(
    question: &'a Question,
    entry: &'a AnswerKeyEntry,
    settings: &ExamSettings,
) -> &'a [String] {
    if settings.shuffle_options {
        &entry.options
    } else {
        &question.options
    }
}

/// Render one variant as a markdown exam sheet.
pub fn render_exam(
    variant: &Variant,
    answer_key: &AnswerKey,
    bank: &QuestionBank,
    settings: &ExamSettings,
) -> String {
    let mut out = Vec::new();

    out.push(format!("# {}", settings.title));
    if !settings.subtitle.is_empty() {
        out.push(format!("## {}", settings.subtitle));
    }
    out.push(format!(
        "**Working time:** {} minutes     **Total points:** {}     **Variant:** {}",
        settings.time_limit_minutes, variant.stats.total_points, variant.index
    ));
    out.push(String::new());
    out.push("---".to_string());
    out.push(String::new());

    for (i, question) in variant.questions.iter().enumerate() {
        let entry = &answer_key.entries[i];
        let mut line = format!("{}. {}", i + 1, question.text);

        let mut labels = Vec::new();
        if settings.include_difficulty_label {
            labels.push(format!("[{}]", question.difficulty));
        }
        if settings.include_category_label {
            labels.push(format!("[{}]", bank.category_name(&question.category)));
        }
        if !labels.is_empty() {
            line.push(' ');
            line.push_str(&labels.join(" "));
        }
        line.push_str(&format!(" **({} points)**", entry.points));
        out.push(line);

        if question.delivery_type == DeliveryType::MultipleChoice {
            out.push(String::new());
            for (j, option) in presented_options(question, entry, settings).iter().enumerate() {
                out.push(format!("   {}) {}", option_letter(j), option));
            }
        }
        out.push(String::new());
    }

    out.join("\n")
}

/// Render the answer key for one variant. Multiple choice answers are
/// lettered against the same option order the exam sheet printed.
pub fn render_answer_key(
    variant: &Variant,
    answer_key: &AnswerKey,
    settings: &ExamSettings,
) -> String {
    let mut out = Vec::new();

    out.push(format!(
        "# {} — Answer Key (Variant {})",
        settings.title, answer_key.variant_index
    ));
    out.push(String::new());

    for (i, entry) in answer_key.entries.iter().enumerate() {
        let question = &variant.questions[i];
        let answer = match &entry.correct_answer {
            Some(text) if question.delivery_type == DeliveryType::MultipleChoice => {
                match presented_options(question, entry, settings)
                    .iter()
                    .position(|o| o == text)
                {
                    Some(index) => format!("{}) {}", option_letter(index), text),
                    None => text.clone(),
                }
            }
            Some(text) => text.clone(),
            None => "Open answer".to_string(),
        };
        out.push(format!(
            "{}. {} ({} points)",
            entry.position, answer, entry.points
        ));
    }

    out.join("\n")
}

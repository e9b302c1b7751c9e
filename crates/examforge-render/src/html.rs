//! HTML exam sheet generator.
//!
//! Produces a self-contained printable HTML file with all CSS inlined.

use anyhow::Result;
use std::path::Path;

use examforge_core::bank::QuestionBank;
use examforge_core::config::ExamSettings;
use examforge_core::model::{AnswerKey, AnswerKeyEntry, DeliveryType, Question, Variant};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn option_letter(index: usize) -> char {
    (b'a' + (index % 26) as u8) as char
}

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

/// Generate a printable HTML exam sheet for one variant. When
/// `settings.include_answers` is set, the answer key is appended on a
/// separate print page.
pub fn render_exam(
    variant: &Variant,
    answer_key: &AnswerKey,
    bank: &QuestionBank,
    settings: &ExamSettings,
) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>{} — Variant {}</title>\n",
        html_escape(&settings.title),
        variant.index
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&settings.title)));
    if !settings.subtitle.is_empty() {
        html.push_str(&format!("<h2>{}</h2>\n", html_escape(&settings.subtitle)));
    }
    html.push_str(&format!(
        "<p class=\"meta\">Working time: <strong>{} minutes</strong> | Total points: <strong>{}</strong> | Variant: <strong>{}</strong></p>\n",
        settings.time_limit_minutes, variant.stats.total_points, variant.index
    ));
    html.push_str("</header>\n");

    // Questions
    html.push_str("<ol class=\"questions\">\n");
    for (i, question) in variant.questions.iter().enumerate() {
        let entry = &answer_key.entries[i];
        html.push_str("<li class=\"question\">\n");

        let mut labels = String::new();
        if settings.include_difficulty_label {
            labels.push_str(&format!(
                " <span class=\"label\">{}</span>",
                question.difficulty
            ));
        }
        if settings.include_category_label {
            labels.push_str(&format!(
                " <span class=\"label\">{}</span>",
                html_escape(bank.category_name(&question.category))
            ));
        }
        html.push_str(&format!(
            "<p class=\"text\">{}{} <span class=\"points\">({} points)</span></p>\n",
            html_escape(&question.text),
            labels,
            entry.points
        ));

        match question.delivery_type {
            DeliveryType::MultipleChoice => {
                html.push_str("<ul class=\"options\">\n");
                for (j, option) in presented_options(question, entry, settings).iter().enumerate()
                {
                    html.push_str(&format!(
                        "<li>{}) {}</li>\n",
                        option_letter(j),
                        html_escape(option)
                    ));
                }
                html.push_str("</ul>\n");
            }
            DeliveryType::ShortAnswer => {
                html.push_str("<div class=\"answer-line\"></div>\n");
            }
            _ => {
                html.push_str("<div class=\"answer-box\"></div>\n");
            }
        }

        html.push_str("</li>\n");
    }
    html.push_str("</ol>\n");

    // Answer key on its own print page
    if settings.include_answers {
        html.push_str("<section class=\"answer-key\">\n");
        html.push_str(&format!(
            "<h2>Answer Key — Variant {}</h2>\n",
            answer_key.variant_index
        ));
        html.push_str("<ol>\n");
        for (i, entry) in answer_key.entries.iter().enumerate() {
            let question = &variant.questions[i];
            let answer = match &entry.correct_answer {
                Some(text) if question.delivery_type == DeliveryType::MultipleChoice => {
                    match presented_options(question, entry, settings)
                        .iter()
                        .position(|o| o == text)
                    {
                        Some(index) => {
                            format!("{}) {}", option_letter(index), html_escape(text))
                        }
                        None => html_escape(text),
                    }
                }
                Some(text) => html_escape(text),
                None => "Open answer".to_string(),
            };
            html.push_str(&format!("<li>{} ({} points)</li>\n", answer, entry.points));
        }
        html.push_str("</ol>\n</section>\n");
    }

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML exam sheet to a file.
pub fn write_exam(
    variant: &Variant,
    answer_key: &AnswerKey,
    bank: &QuestionBank,
    settings: &ExamSettings,
    path: &Path,
) -> Result<()> {
    let html = render_exam(variant, answer_key, bank, settings);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
:root { --fg: #1a1a1a; --muted: #6b7280; --border: #d1d5db; }
body { font-family: Georgia, 'Times New Roman', serif; margin: 0 auto; max-width: 48rem; padding: 2rem; color: var(--fg); }
header { border-bottom: 2px solid var(--fg); padding-bottom: 1rem; }
h1 { margin: 0; }
h2 { margin: 0.25rem 0 0; font-weight: normal; color: var(--muted); }
.meta { color: var(--muted); }
.questions { padding-left: 1.5rem; }
.question { margin: 1.5rem 0; page-break-inside: avoid; }
.points { color: var(--muted); white-space: nowrap; }
.label { font-size: 0.8rem; border: 1px solid var(--border); border-radius: 4px; padding: 0 0.3rem; color: var(--muted); }
.options { list-style: none; padding-left: 1rem; }
.answer-line { border-bottom: 1px solid var(--border); height: 2rem; margin: 0.5rem 0; }
.answer-box { border: 1px solid var(--border); height: 8rem; margin: 0.5rem 0; border-radius: 4px; }
.answer-key { page-break-before: always; border-top: 2px solid var(--fg); margin-top: 2rem; }
@media print { body { padding: 0; } }
"#;

//! The `examforge init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create examforge.toml
    if std::path::Path::new("examforge.toml").exists() {
        println!("examforge.toml already exists, skipping.");
    } else {
        std::fs::write("examforge.toml", SAMPLE_CONFIG)?;
        println!("Created examforge.toml");
    }

    // Create example question bank
    std::fs::create_dir_all("question-banks")?;
    let example_path = std::path::Path::new("question-banks/example.toml");
    if example_path.exists() {
        println!("question-banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created question-banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit examforge.toml with your exam settings");
    println!("  2. Run: examforge validate --bank question-banks/example.toml");
    println!("  3. Run: examforge generate --bank question-banks/example.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# examforge configuration

[exam]
title = "Example Exam"
subtitle = ""
time_limit_minutes = 60
include_answers = true
shuffle_options = false
include_difficulty_label = false
include_category_label = false

[selection]
# Category tags to draw from; ["*"] selects everything.
categories = ["*"]
# Preferred delivery types when equivalent renditions exist.
preferred_types = ["multiple_choice"]
points_per_question = 5
min_category_spacing = 1
# Uncomment to pin the base seed for reproducible batches.
# seed = 42
variants = 1

[selection.distribution]
trivial = 1
easy = 2
medium = 1
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example Bank"
description = "A small example bank to get started"

[categories]
loops = "Loops & Control Flow"
pointers = "Pointers & Memory"

[[questions]]
category = "loops"
type = "multiple_choice"
difficulty = "trivial"
question = "Which loop always executes its body at least once?"
options = ["do-while", "while", "for", "goto"]
correct_answer = "do-while"

[[questions]]
category = "loops"
type = "short_answer"
difficulty = "easy"
question = "What does the `break` statement do inside a loop?"
correct_answer = "Exits the innermost enclosing loop immediately"

[[questions]]
category = "pointers"
type = "multiple_choice"
difficulty = "easy"
question = "What does `&x` evaluate to?"
options = ["The address of x", "The value of x", "A copy of x", "Undefined behavior"]
correct_answer = "The address of x"

[[questions]]
category = "pointers"
type = "free_text"
difficulty = "medium"
question = "Explain the difference between `int *a` and `int **a`."
"#;

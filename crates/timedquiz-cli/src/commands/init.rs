//! The `timedquiz init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("timedquiz.toml").exists() {
        println!("timedquiz.toml already exists, skipping.");
    } else {
        std::fs::write("timedquiz.toml", SAMPLE_CONFIG)?;
        println!("Created timedquiz.toml");
    }

    if Path::new("questions.json").exists() {
        println!("questions.json already exists, skipping.");
    } else {
        std::fs::write("questions.json", SAMPLE_BANK)?;
        println!("Created questions.json");
    }

    println!("\nNext steps:");
    println!("  1. Add your own questions to questions.json");
    println!("  2. Run: timedquiz validate");
    println!("  3. Run: timedquiz take");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# timedquiz configuration

# Path or http(s) URL of the question bank. ${ENV_VAR} references are expanded.
bank = "questions.json"

question_count = 10
time_limit_secs = 20
advance_delay_ms = 1500
pass_threshold = 70.0
auto_advance_after_answer = false
dark_mode = false
"#;

const SAMPLE_BANK: &str = r#"[
  {
    "question": "Which planet is known as the Red Planet?",
    "answers": ["Venus", "Mars", "Jupiter", "Mercury"],
    "correct": 1
  },
  {
    "question": "What is the chemical symbol for gold?",
    "answers": ["Ag", "Gd", "Au", "Go"],
    "correct": 2
  },
  {
    "question": "How many sides does a hexagon have?",
    "answers": ["5", "6", "7", "8"],
    "correct": 1
  },
  {
    "question": "Which gas do plants absorb from the air?",
    "answers": ["Oxygen", "Nitrogen", "Carbon dioxide", "Helium"],
    "correct": 2
  }
]
"#;

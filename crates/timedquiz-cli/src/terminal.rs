//! Terminal presenter.

use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use comfy_table::{Cell, Table};

use timedquiz_core::error::Notice;
use timedquiz_core::model::{Resolution, SessionQuestion, Verdict};
use timedquiz_core::report::ExamReport;
use timedquiz_core::traits::Presenter;

/// ANSI colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    accent: &'static str,
    correct: &'static str,
    wrong: &'static str,
    muted: &'static str,
    reset: &'static str,
}

impl Palette {
    pub const DARK: Palette = Palette {
        accent: "\x1b[96m",
        correct: "\x1b[92m",
        wrong: "\x1b[91m",
        muted: "\x1b[90m",
        reset: "\x1b[0m",
    };

    pub const LIGHT: Palette = Palette {
        accent: "\x1b[34m",
        correct: "\x1b[32m",
        wrong: "\x1b[31m",
        muted: "\x1b[2m",
        reset: "\x1b[0m",
    };

    pub const PLAIN: Palette = Palette {
        accent: "",
        correct: "",
        wrong: "",
        muted: "",
        reset: "",
    };

    /// The palette for the saved theme, or no colors when stdout is not a
    /// terminal or `NO_COLOR` is set.
    pub fn for_theme(dark_mode: bool) -> Self {
        if std::env::var_os("NO_COLOR").is_some() || !std::io::stdout().is_terminal() {
            Self::PLAIN
        } else if dark_mode {
            Self::DARK
        } else {
            Self::LIGHT
        }
    }
}

/// Prints the exam to stdout.
pub struct TerminalPresenter {
    palette: Palette,
    show_review: bool,
    auto_advance_after_answer: bool,
    /// A countdown line is on screen without a trailing newline.
    timer_line: AtomicBool,
}

impl TerminalPresenter {
    pub fn new(palette: Palette, show_review: bool, auto_advance_after_answer: bool) -> Self {
        Self {
            palette,
            show_review,
            auto_advance_after_answer,
            timer_line: AtomicBool::new(false),
        }
    }

    /// Instructions shown before each exam.
    pub fn render_intro(&self, count: usize, time_limit: u32) {
        let p = &self.palette;
        println!(
            "{}Exam: up to {count} questions, {time_limit}s each.{}",
            p.accent, p.reset
        );
        println!(
            "{}Type a choice number to answer, n (or Enter) for next, r to restart, q to quit.{}",
            p.muted, p.reset
        );
    }

    fn end_timer_line(&self) {
        if self.timer_line.swap(false, Ordering::Relaxed) {
            println!();
        }
    }
}

impl Presenter for TerminalPresenter {
    fn render_notice(&self, notice: &Notice) {
        self.end_timer_line();
        println!("{}Note:{} {notice}", self.palette.accent, self.palette.reset);
    }

    fn render_question(&self, item: &SessionQuestion, position: usize, total: usize) {
        self.end_timer_line();
        let p = &self.palette;
        println!();
        println!("{}Question {position} of {total}{}", p.accent, p.reset);
        println!("{}", item.text());
        if let Some(image) = item.image() {
            println!("{}[image: {image}]{}", p.muted, p.reset);
        }
    }

    fn render_choices(&self, choices: &[&str]) {
        for (i, choice) in choices.iter().enumerate() {
            println!("  {}) {choice}", i + 1);
        }
    }

    fn render_timer(&self, remaining: u32) {
        let p = &self.palette;
        print!("\r{}Time left: {remaining:>3}s{} ", p.muted, p.reset);
        let _ = std::io::stdout().flush();
        self.timer_line.store(true, Ordering::Relaxed);
    }

    fn render_locked(&self, item: &SessionQuestion) {
        self.end_timer_line();
        let p = &self.palette;
        let correct = item.correct_display();
        let correct_text = item.choice_text(correct).unwrap_or_default();

        match (item.resolution(), item.is_correct()) {
            (Resolution::Answered, true) => {
                println!("{}Correct!{}", p.correct, p.reset);
            }
            (Resolution::Answered, false) => {
                println!(
                    "{}Wrong.{} Correct answer: {}) {correct_text}",
                    p.wrong,
                    p.reset,
                    correct + 1
                );
            }
            _ => {
                println!(
                    "{}Time's up!{} Correct answer: {}) {correct_text}",
                    p.wrong,
                    p.reset,
                    correct + 1
                );
            }
        }

        let waits_for_next =
            item.resolution() == Resolution::Answered && !self.auto_advance_after_answer;
        if waits_for_next {
            println!("{}Press n for the next question.{}", p.muted, p.reset);
        } else {
            println!("{}Moving on...{}", p.muted, p.reset);
        }
    }

    fn render_result(&self, report: &ExamReport) {
        self.end_timer_line();
        let p = &self.palette;
        let verdict_color = match report.verdict {
            Verdict::Pass => p.correct,
            Verdict::Fail => p.wrong,
        };

        println!();
        println!(
            "Score: {}/{} ({:.2}%)",
            report.score, report.total, report.percentage
        );
        println!(
            "Result: {verdict_color}{}{} (pass mark {:.2}%)",
            report.verdict, p.reset, report.pass_threshold
        );
        println!(
            "Average time per question: {:.2}s",
            report.avg_seconds_per_item
        );

        if self.show_review && !report.review.is_empty() {
            println!("\n{}", review_table(report));
        }
    }
}

fn review_table(report: &ExamReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Correct Answer", "Your Answer", "Time"]);

    for r in &report.review {
        let mark = if r.is_correct { "✓" } else { "✗" };
        table.add_row(vec![
            Cell::new(r.number),
            Cell::new(&r.question_text),
            Cell::new(&r.correct_choice_text),
            Cell::new(format!("{mark} {}", r.user_choice_display())),
            Cell::new(format!("{}s", r.seconds_used)),
        ]);
    }

    table
}

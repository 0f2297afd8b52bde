//! Terminal rendering and line input
use std::io::{self, BufRead, Write};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use crate::bank::{known_topics, QuizSpec};
use crate::history::ResultRecord;
use crate::session::{QuizSession, QuizSummary};

/// At or under this many seconds the timer is flagged as running low
const LOW_TIME_SECS: u32 = 60;

pub fn is_low_time(remaining: u32) -> bool {
    remaining <= LOW_TIME_SECS
}

/// Reads stdin on its own thread and forwards trimmed lines.
///
/// Lines that are not valid UTF-8 are skipped. The channel closes at end of
/// input.
pub fn spawn_input_reader() -> UnboundedReceiver<String> {
    let (tx, rx) = unbounded_channel();
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    log::warn!("skipping unreadable input line: {e}");
                    eprintln!("Could not read that line, please try again.");
                    continue;
                }
                Err(e) => {
                    log::error!("stdin closed: {e}");
                    break;
                }
            };
            if tx.send(line.trim().to_string()).is_err() {
                break;
            }
        }
    });
    rx
}

pub fn prompt(label: &str) {
    print!("{label}");
    io::stdout().flush().ok();
}

/// `m:ss`
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

pub fn print_menu_help() {
    println!("Commands:");
    println!("  new     -> create a quiz on any topic");
    println!("  topics  -> show topics with a dedicated question bank");
    println!("  history -> show your recent results");
    println!("  logout  -> switch user");
    println!("  quit    -> exit");
    println!();
}

pub fn print_topics() {
    println!("Topics with their own question bank:");
    for topic in known_topics() {
        println!(" - {topic}");
    }
    println!("Any other topic gets a general question set.");
    println!();
}

pub fn print_ready(quiz: &QuizSpec, time_limit: u32) {
    println!();
    println!("=== QUIZ READY ===");
    println!("Topic: {}", quiz.topic);
    println!(
        "{} questions | {} | {} to finish",
        quiz.question_count(),
        quiz.difficulty,
        format_time(time_limit)
    );
    println!("Read each question, pick one of the 4 options, and move with next/prev.");
    println!("Type 'start' to begin or 'back' to choose another topic.");
}

pub fn print_quiz_help() {
    println!("  1-4 -> select an option   next/n -> next question   prev/p -> previous");
    println!("  submit -> finish now   time -> time left   abandon -> back to menu   quit -> exit");
}

pub fn print_question(session: &QuizSession) {
    let Some(question) = session.current_question() else {
        return;
    };
    let remaining = session.remaining_seconds();
    let low = if is_low_time(remaining) { " (hurry!)" } else { "" };

    println!();
    println!(
        "--- {} | Question {} of {} ({}%) | Time left {}{} ---",
        session.quiz().topic,
        session.current_index() + 1,
        session.quiz().question_count(),
        session.progress_percent(),
        format_time(remaining),
        low
    );
    println!("{}", question.prompt);
    for (i, option) in question.options.iter().enumerate() {
        let marker = if session.selected_option() == Some(i) { "*" } else { " " };
        println!(" {marker}{}) {option}", i + 1);
    }
    let next = if session.is_last_question() { "submit" } else { "next" };
    println!("(1-4 to answer, '{next}' to continue, 'help' for commands)");
}

pub fn print_summary(summary: &QuizSummary) {
    println!();
    println!("=== QUIZ COMPLETE ===");
    println!("Score: {}/{}", summary.score.correct, summary.score.total);
    println!("{}%", summary.percentage);
    println!("{}", summary.message);
    println!(
        "✓ {} Correct   ✗ {} Incorrect",
        summary.score.correct,
        summary.score.incorrect()
    );
    println!("Topic: {}", summary.topic);
    println!("Difficulty: {}", summary.difficulty);
    println!("Questions: {}", summary.score.total);
    println!("Time used: {}", format_time(summary.time_used_seconds));
    println!();
    println!("Type 'retake' to try this quiz again, 'new' for another topic,");
    println!("'history', 'logout' or 'quit'.");
}

pub fn print_history(records: &[ResultRecord]) {
    if records.is_empty() {
        println!("No results yet. Type 'new' to take a quiz.");
        println!();
        return;
    }
    println!("=== RECENT RESULTS ===");
    for record in records {
        println!(
            "{} | {} ({}) | {}/{} ({}%) | {}",
            record.submitted_at.format("%Y-%m-%d %H:%M"),
            record.topic,
            record.difficulty,
            record.correct,
            record.total,
            record.percentage,
            format_time(record.time_used_seconds)
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(300), "5:00");
        assert_eq!(format_time(59), "0:59");
        assert_eq!(format_time(61), "1:01");
        assert_eq!(format_time(0), "0:00");
    }

    #[test]
    fn test_low_time_includes_the_last_minute() {
        assert!(!is_low_time(61));
        assert!(is_low_time(60));
        assert!(is_low_time(2));
    }
}

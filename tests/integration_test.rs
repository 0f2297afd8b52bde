#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::process::Stdio;
use std::time::Duration;

const LOGIN: &str = "ada\nada@example.com\n";

fn quiz_cmd() -> Command {
    let mut cmd = Command::cargo_bin("topic_quiz").unwrap();
    cmd.args(["--db", ":memory:", "--seed", "7"]);
    cmd
}

fn script(lines: &str) -> String {
    format!("{LOGIN}{lines}")
}

// Test that the program starts and shows welcome message
#[test]
fn test_program_starts() {
    quiz_cmd()
        .write_stdin("quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome to Topic Quiz"))
        .stdout(predicate::str::contains("Goodbye!"));
}

#[test]
fn test_login_requires_all_fields() {
    quiz_cmd()
        .write_stdin("\nada@example.com\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Please fill in all fields"));
}

#[test]
fn test_login_rejects_bad_email() {
    quiz_cmd()
        .write_stdin("ada\nada.example.com\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Please enter a valid email address"))
        .stdout(predicate::str::contains("Welcome, ada!").not());
}

#[test]
fn test_login_then_menu() {
    quiz_cmd()
        .write_stdin(script("quit\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome, ada!"))
        .stdout(predicate::str::contains("Commands:"));
}

// End of input behaves like quit
#[test]
fn test_end_of_input_exits() {
    quiz_cmd()
        .write_stdin(LOGIN)
        .assert()
        .success()
        .stdout(predicate::str::contains("Goodbye!"));
}

#[test]
fn test_topics_command() {
    quiz_cmd()
        .write_stdin(script("topics\nquit\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains("javascript"))
        .stdout(predicate::str::contains("python"))
        .stdout(predicate::str::contains("react"));
}

#[test]
fn test_invalid_command() {
    quiz_cmd()
        .write_stdin(script("notacommand\nquit\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown command: 'notacommand'"));
}

// Test case insensitivity for commands
#[test]
fn test_case_insensitive_commands() {
    quiz_cmd()
        .write_stdin(script("TOPICS\nQUIT\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Topics with their own question bank:"));
}

#[test]
fn test_empty_topic_is_reprompted() {
    quiz_cmd()
        .write_stdin(script("new\n   \nreact\n3\neasy\nback\nquit\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Please enter a topic for the quiz"))
        .stdout(predicate::str::contains("QUIZ READY"));
}

#[test]
fn test_invalid_question_count_is_reprompted() {
    quiz_cmd()
        .write_stdin(script("new\nreact\n7\n5\n\nback\nquit\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Number of questions must be one of 3, 5, 10 or 15",
        ))
        .stdout(predicate::str::contains("5 questions | Medium"));
}

#[test]
fn test_ready_screen_shows_quiz_details() {
    quiz_cmd()
        .write_stdin(script("new\nPython\n10\nhard\nback\nquit\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Topic: Python"))
        .stdout(predicate::str::contains("5 questions | Hard | 5:00 to finish"));
}

// Every react answer is option 2
#[test]
fn test_perfect_react_quiz() {
    quiz_cmd()
        .write_stdin(script(
            "new\nreact\n3\neasy\nstart\n2\nnext\n2\nnext\n2\nnext\nquit\n",
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1 of 3"))
        .stdout(predicate::str::contains("Score: 3/3"))
        .stdout(predicate::str::contains("100%"))
        .stdout(predicate::str::contains("Excellent! Outstanding performance!"))
        .stdout(predicate::str::contains("Difficulty: Easy"));
}

#[test]
fn test_next_requires_an_answer() {
    quiz_cmd()
        .write_stdin(script("new\nreact\n3\neasy\nstart\nnext\nquit\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Please select an answer before moving on.",
        ));
}

#[test]
fn test_prev_on_first_question() {
    quiz_cmd()
        .write_stdin(script("new\nreact\n3\neasy\nstart\nprev\nquit\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Already at the first question."));
}

#[test]
fn test_option_out_of_range() {
    quiz_cmd()
        .write_stdin(script("new\nreact\n3\neasy\nstart\n5\nquit\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Choose an option between 1 and 4."));
}

#[test]
fn test_submit_early_on_generic_topic() {
    quiz_cmd()
        .write_stdin(script("new\nastrophysics\n5\nhard\nstart\nsubmit\nquit\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains("astrophysics"))
        .stdout(predicate::str::contains("Score: 0/5"))
        .stdout(predicate::str::contains("Keep studying! You can do better!"))
        .stdout(predicate::str::contains("0 Correct"))
        .stdout(predicate::str::contains("5 Incorrect"));
}

#[test]
fn test_retake_uses_a_fresh_session() {
    quiz_cmd()
        .write_stdin(script(
            "new\nreact\n3\neasy\nstart\nsubmit\nretake\nstart\n2\nnext\n2\nnext\n2\nnext\nquit\n",
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains("QUIZ READY").count(2))
        .stdout(predicate::str::contains("Score: 0/3"))
        .stdout(predicate::str::contains("Score: 3/3"));
}

#[test]
fn test_history_lists_results() {
    quiz_cmd()
        .write_stdin(script(
            "history\nnew\nreact\n3\neasy\nstart\n2\nnext\n2\nnext\n1\nnext\nhistory\nquit\n",
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains("No results yet."))
        .stdout(predicate::str::contains("RECENT RESULTS"))
        .stdout(predicate::str::contains("react (easy) | 2/3 (67%)"));
}

#[test]
fn test_new_from_results_starts_another_quiz() {
    quiz_cmd()
        .write_stdin(script(
            "new\nreact\n3\neasy\nstart\nsubmit\nnew\nGardening\n3\n\nback\nquit\n",
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains("Topic: Gardening"));
}

#[test]
fn test_abandon_returns_to_menu() {
    quiz_cmd()
        .write_stdin(script("new\nreact\n3\neasy\nstart\nabandon\ntopics\nquit\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Quiz abandoned."))
        .stdout(predicate::str::contains("Topics with their own question bank:"))
        .stdout(predicate::str::contains("QUIZ COMPLETE").not());
}

#[test]
fn test_logout_returns_to_login() {
    quiz_cmd()
        .write_stdin(script("logout\nbob\nbob@example.com\nquit\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."))
        .stdout(predicate::str::contains("Welcome, bob!"));
}

#[test]
fn test_zero_time_limit_rejected() {
    Command::cargo_bin("topic_quiz")
        .unwrap()
        .args(["--db", ":memory:", "--time-limit", "0"])
        .assert()
        .failure();
}

// Stdin stays open past the limit so the countdown, not input, ends the quiz
#[test]
fn test_timeout_submits_quiz() {
    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("topic_quiz"))
        .args(["--db", ":memory:", "--time-limit", "1"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    stdin
        .write_all(script("new\nreact\n3\neasy\nstart\n").as_bytes())
        .unwrap();
    stdin.flush().unwrap();
    std::thread::sleep(Duration::from_millis(2500));
    stdin.write_all(b"quit\n").unwrap();
    drop(stdin);

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Time's up! Submitting your answers."));
    assert!(stdout.contains("Score: 0/3"));
    assert!(stdout.contains("Time used: 0:01"));
}

#[test]
fn test_time_command_shows_remaining() {
    quiz_cmd()
        .write_stdin(script("new\nreact\n3\neasy\nstart\ntime\nquit\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Time left: 5:00"));
}

// A limit already under a minute still warns, once, on the first tick
#[test]
fn test_low_time_warning_fires_once() {
    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("topic_quiz"))
        .args(["--db", ":memory:", "--time-limit", "4"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    stdin
        .write_all(script("new\nreact\n3\neasy\nstart\n").as_bytes())
        .unwrap();
    stdin.flush().unwrap();
    std::thread::sleep(Duration::from_millis(2500));
    stdin.write_all(b"show\nquit\n").unwrap();
    drop(stdin);

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert_eq!(stdout.matches("One minute left!").count(), 1);
    assert!(stdout.contains("(hurry!)"));
    assert!(!stdout.contains("QUIZ COMPLETE"));
}

// A line of invalid UTF-8 is skipped and reading carries on
#[test]
fn test_invalid_utf8_line_is_skipped() {
    let mut input = b"\xff\xfe\n".to_vec();
    input.extend_from_slice(script("topics\nquit\n").as_bytes());
    quiz_cmd()
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome, ada!"))
        .stdout(predicate::str::contains("Topics with their own question bank:"))
        .stderr(predicate::str::contains("Could not read that line"));
}

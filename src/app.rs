//! Interactive flow: login, quiz setup, the running quiz and its results.
//!
//! `App` is the only owner of quiz state. Each attempt gets a fresh
//! `QuizSession` and `Countdown`; timer ticks and typed commands are handled
//! one at a time from a single event loop.
use anyhow::Result;
use rand::rngs::StdRng;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::bank::{self, QuizSpec};
use crate::config::Cli;
use crate::console;
use crate::error::{HistoryError, SessionError, ValidationError};
use crate::forms::{self, TopicRequest, User};
use crate::history::HistoryStore;
use crate::session::{Phase, QuizSession};
use crate::timer::Countdown;

/// Results listed by the `history` command
const HISTORY_LIMIT: usize = 10;

/// Where control goes after leaving a screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Menu,
    NewQuiz,
    Logout,
    Quit,
}

enum QuizEnd {
    Completed,
    Left(Flow),
}

enum Step {
    Continue,
    Completed,
    Leave(Flow),
}

pub struct App {
    store: HistoryStore,
    rng: StdRng,
    time_limit: u32,
    input: UnboundedReceiver<String>,
}

fn is_quit(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("quit") || raw.eq_ignore_ascii_case("exit")
}

fn report_storage_error(e: &HistoryError) {
    log::error!("history store: {e}");
    eprintln!("Could not access quiz history: {e}");
}

impl App {
    pub fn new(cli: &Cli, store: HistoryStore, input: UnboundedReceiver<String>) -> Self {
        Self {
            store,
            rng: cli.rng(),
            time_limit: cli.time_limit,
            input,
        }
    }

    /// Prompts and waits for the next line. `None` once input has ended.
    async fn read_line(&mut self, label: &str) -> Option<String> {
        console::prompt(label);
        self.input.recv().await
    }

    pub async fn run(&mut self) -> Result<()> {
        println!("Welcome to Topic Quiz");
        while let Some(user) = self.login().await {
            match self.menu(&user).await? {
                Flow::Quit => break,
                _ => {
                    log::info!("{} logged out", user.email);
                    println!("Logged out.");
                    println!();
                }
            }
        }
        println!("Goodbye!");
        Ok(())
    }

    async fn login(&mut self) -> Option<User> {
        println!("Please log in to continue (type 'quit' to exit).");
        loop {
            let username = self.read_line("Username: ").await?;
            if is_quit(&username) {
                return None;
            }
            let email = self.read_line("Email: ").await?;

            match User::new(&username, &email) {
                Ok(user) => {
                    if let Err(e) = self.store.record_login(&user) {
                        report_storage_error(&e);
                    }
                    log::info!("{} logged in", user.email);
                    println!("Welcome, {}!", user.username);
                    println!();
                    console::print_menu_help();
                    return Some(user);
                }
                Err(e) => {
                    log::warn!("login rejected: {e}");
                    println!("{e}");
                }
            }
        }
    }

    async fn menu(&mut self, user: &User) -> Result<Flow> {
        let mut queued: Option<String> = None;
        loop {
            let raw = match queued.take() {
                Some(cmd) => cmd,
                None => match self.read_line("> ").await {
                    Some(line) => line,
                    None => return Ok(Flow::Quit),
                },
            };

            match raw.to_lowercase().as_str() {
                "" => continue,
                "new" => {
                    let Some(request) = self.read_topic_request().await else {
                        return Ok(Flow::Quit);
                    };
                    let quiz = bank::generate(
                        &request.topic,
                        request.count,
                        request.difficulty,
                        &mut self.rng,
                    );
                    if let Err(e) = self.store.record_quiz(user, &quiz) {
                        report_storage_error(&e);
                    }
                    match self.play(user, quiz).await? {
                        Flow::Menu => console::print_menu_help(),
                        Flow::NewQuiz => queued = Some("new".to_string()),
                        other => return Ok(other),
                    }
                }
                "topics" => console::print_topics(),
                "history" => self.show_history(user),
                "help" => console::print_menu_help(),
                "logout" => return Ok(Flow::Logout),
                "quit" | "exit" => return Ok(Flow::Quit),
                other => {
                    log::warn!("unknown menu command '{other}'");
                    println!("Unknown command: '{other}'");
                    println!("Type 'help' to see available commands.");
                    println!();
                }
            }
        }
    }

    /// Asks for topic, question count and difficulty, re-asking each field
    /// until it is valid.
    async fn read_topic_request(&mut self) -> Option<TopicRequest> {
        loop {
            let topic = self.read_field("Topic: ", forms::validate_topic).await?;
            let count = self
                .read_field(
                    "Number of questions [3/5/10/15] (default 5): ",
                    forms::parse_count,
                )
                .await?;
            let difficulty = self
                .read_field(
                    "Difficulty [easy/medium/hard] (default medium): ",
                    forms::parse_difficulty,
                )
                .await?;
            match TopicRequest::new(&topic, &count, &difficulty) {
                Ok(request) => return Some(request),
                Err(e) => println!("{e}"),
            }
        }
    }

    /// Re-prompts until `check` accepts the input, then returns it as typed.
    async fn read_field<T>(
        &mut self,
        label: &str,
        check: fn(&str) -> Result<T, ValidationError>,
    ) -> Option<String> {
        loop {
            let raw = self.read_line(label).await?;
            match check(&raw) {
                Ok(_) => return Some(raw),
                Err(e) => println!("{e}"),
            }
        }
    }

    fn show_history(&self, user: &User) {
        match self.store.recent_results(&user.email, HISTORY_LIMIT) {
            Ok(records) => console::print_history(&records),
            Err(e) => report_storage_error(&e),
        }
    }

    /// Ready screen, attempts and results for one generated quiz. A retake
    /// replays the same questions in a new session.
    async fn play(&mut self, user: &User, quiz: QuizSpec) -> Result<Flow> {
        'attempt: loop {
            let mut session = QuizSession::with_time_limit(quiz.clone(), self.time_limit);
            console::print_ready(&quiz, self.time_limit);

            loop {
                let Some(raw) = self.read_line("> ").await else {
                    return Ok(Flow::Quit);
                };
                match raw.to_lowercase().as_str() {
                    "start" => break,
                    "" => {}
                    "back" => return Ok(Flow::Menu),
                    "logout" => return Ok(Flow::Logout),
                    "quit" | "exit" => return Ok(Flow::Quit),
                    _ => println!("Type 'start' to begin or 'back' to choose another topic."),
                }
            }

            if let QuizEnd::Left(flow) = self.run_session(&mut session).await? {
                return Ok(flow);
            }

            let summary = session.summary()?;
            console::print_summary(&summary);
            if let Err(e) = self
                .store
                .record_result(user, &quiz, &summary, session.answers())
            {
                report_storage_error(&e);
            }

            loop {
                let Some(raw) = self.read_line("> ").await else {
                    return Ok(Flow::Quit);
                };
                match raw.to_lowercase().as_str() {
                    "retake" => continue 'attempt,
                    "new" | "another" => return Ok(Flow::NewQuiz),
                    "menu" | "back" => return Ok(Flow::Menu),
                    "history" => self.show_history(user),
                    "logout" => return Ok(Flow::Logout),
                    "quit" | "exit" => return Ok(Flow::Quit),
                    "" => {}
                    other => println!("Unknown command: '{other}'"),
                }
            }
        }
    }

    async fn run_session(&mut self, session: &mut QuizSession) -> Result<QuizEnd> {
        session.start()?;
        let mut countdown = Countdown::start(Duration::from_secs(1));
        let mut warned = false;
        console::print_question(session);
        console::prompt("> ");

        loop {
            tokio::select! {
                _ = countdown.tick() => {
                    if session.tick()? == Phase::Completed {
                        countdown.cancel();
                        println!();
                        println!("Time's up! Submitting your answers.");
                        return Ok(QuizEnd::Completed);
                    }
                    if !warned && console::is_low_time(session.remaining_seconds()) {
                        warned = true;
                        log::debug!("quiz {}: one minute left", session.quiz().id);
                        println!();
                        println!("One minute left!");
                        console::prompt("> ");
                    }
                }
                line = self.input.recv() => {
                    let step = match line {
                        Some(line) => Self::quiz_command(session, &line)?,
                        None => Step::Leave(Flow::Quit),
                    };
                    match step {
                        Step::Continue => console::prompt("> "),
                        Step::Completed => {
                            countdown.cancel();
                            return Ok(QuizEnd::Completed);
                        }
                        Step::Leave(flow) => {
                            countdown.cancel();
                            log::info!(
                                "quiz {} left while {} with {} answer(s)",
                                session.quiz().id,
                                session.phase(),
                                session.answers().len()
                            );
                            return Ok(QuizEnd::Left(flow));
                        }
                    }
                }
            }
        }
    }

    fn quiz_command(session: &mut QuizSession, line: &str) -> Result<Step, SessionError> {
        let cmd = line.to_lowercase();

        if let Ok(choice) = cmd.parse::<usize>() {
            match choice.checked_sub(1).map(|option| session.select_answer(option)) {
                Some(Ok(())) => console::print_question(session),
                Some(Err(SessionError::OptionOutOfRange { .. })) | None => {
                    println!("Choose an option between 1 and 4.")
                }
                Some(Err(e)) => return Err(e),
            }
            return Ok(Step::Continue);
        }

        match cmd.as_str() {
            "" => {}
            "next" | "n" => match session.advance() {
                Ok(Phase::Completed) => return Ok(Step::Completed),
                Ok(_) => console::print_question(session),
                Err(SessionError::UnansweredQuestion { index }) => {
                    log::warn!("advance refused: question {} unanswered", index + 1);
                    println!("Please select an answer before moving on.");
                }
                Err(e) => return Err(e),
            },
            "prev" | "p" => {
                if session.current_index() == 0 {
                    println!("Already at the first question.");
                } else {
                    session.retreat()?;
                    console::print_question(session);
                }
            }
            "submit" => {
                session.submit()?;
                return Ok(Step::Completed);
            }
            "time" => println!(
                "Time left: {}",
                console::format_time(session.remaining_seconds())
            ),
            "show" => console::print_question(session),
            "help" => console::print_quiz_help(),
            "abandon" => {
                println!("Quiz abandoned.");
                return Ok(Step::Leave(Flow::Menu));
            }
            "quit" | "exit" => return Ok(Step::Leave(Flow::Quit)),
            other => {
                log::warn!("unknown quiz command '{other}'");
                println!("Unknown command: '{other}'. Type 'help' for quiz commands.");
            }
        }
        Ok(Step::Continue)
    }
}

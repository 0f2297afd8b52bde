//! Quiz session state machine and scoring.
//!
//! A `QuizSession` owns one attempt at a `QuizSpec`. It moves from
//! `NotStarted` to `InProgress` on `start`, and to the terminal `Completed`
//! phase when the last question is advanced past, the quiz is submitted, or
//! the countdown runs out. A retake is a new session over the same `QuizSpec`.
use std::collections::BTreeMap;
use std::fmt;

use crate::bank::{Difficulty, Question, QuizSpec, OPTION_COUNT};
use crate::error::SessionError;

/// Default time allowed for one quiz, in seconds (5 minutes)
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 300;

/// Lifecycle stage of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress,
    Completed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::NotStarted => "not started",
            Phase::InProgress => "in progress",
            Phase::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// Correct answers out of the number of questions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl Score {
    /// `round(100 * correct / total)` with halves rounded up
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((200 * self.correct + self.total) / (2 * self.total)) as u32
    }

    /// Feedback line for the percentage band the score falls in
    pub fn message(&self) -> &'static str {
        score_message(self.percentage())
    }

    pub fn incorrect(&self) -> usize {
        self.total - self.correct
    }
}

/// Maps a percentage to its feedback text, highest band first.
pub fn score_message(percentage: u32) -> &'static str {
    const BANDS: [(u32, &str); 4] = [
        (90, "Excellent! Outstanding performance!"),
        (80, "Great job! Well done!"),
        (70, "Good work! Keep it up!"),
        (60, "Not bad! Room for improvement."),
    ];
    BANDS
        .iter()
        .find(|(min, _)| percentage >= *min)
        .map(|(_, msg)| *msg)
        .unwrap_or("Keep studying! You can do better!")
}

/// Everything the results screen shows for a completed session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    pub topic: String,
    pub difficulty: Difficulty,
    pub score: Score,
    pub percentage: u32,
    pub message: &'static str,
    pub time_used_seconds: u32,
}

/// One attempt at a quiz
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz: QuizSpec,
    time_limit: u32,
    current_index: usize,
    answers: BTreeMap<usize, usize>,
    remaining_seconds: u32,
    phase: Phase,
}

impl QuizSession {
    /// A session over `quiz` that is not started yet. `start` refuses a quiz
    /// with no questions.
    pub fn with_time_limit(quiz: QuizSpec, time_limit: u32) -> Self {
        Self {
            quiz,
            time_limit,
            current_index: 0,
            answers: BTreeMap::new(),
            remaining_seconds: time_limit,
            phase: Phase::NotStarted,
        }
    }

    fn require(&self, op: &'static str, phase: Phase) -> Result<(), SessionError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                op,
                phase: self.phase,
            })
        }
    }

    fn complete(&mut self) {
        self.phase = Phase::Completed;
        log::debug!(
            "quiz {} completed with {} of {} answered, {}s left",
            self.quiz.id,
            self.answers.len(),
            self.quiz.question_count(),
            self.remaining_seconds
        );
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        self.require("start", Phase::NotStarted)?;
        if self.quiz.questions.is_empty() {
            return Err(SessionError::EmptyQuiz);
        }
        self.phase = Phase::InProgress;
        self.current_index = 0;
        self.answers.clear();
        self.remaining_seconds = self.time_limit;
        log::debug!("quiz {} started", self.quiz.id);
        Ok(())
    }

    /// Records (or replaces) the answer for the current question.
    pub fn select_answer(&mut self, option: usize) -> Result<(), SessionError> {
        self.require("select an answer", Phase::InProgress)?;
        if option >= OPTION_COUNT {
            return Err(SessionError::OptionOutOfRange { option });
        }
        self.answers.insert(self.current_index, option);
        Ok(())
    }

    /// Moves to the next question, or completes the quiz from the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnansweredQuestion` if the current question has
    /// no answer yet.
    pub fn advance(&mut self) -> Result<Phase, SessionError> {
        self.require("advance", Phase::InProgress)?;
        if !self.answers.contains_key(&self.current_index) {
            return Err(SessionError::UnansweredQuestion {
                index: self.current_index,
            });
        }
        if self.is_last_question() {
            self.complete();
        } else {
            self.current_index += 1;
        }
        Ok(self.phase)
    }

    /// Steps back one question. Does nothing on the first question.
    pub fn retreat(&mut self) -> Result<(), SessionError> {
        self.require("go back", Phase::InProgress)?;
        self.current_index = self.current_index.saturating_sub(1);
        Ok(())
    }

    /// One second of the countdown. Completes the quiz when time runs out,
    /// unanswered questions counting as wrong.
    pub fn tick(&mut self) -> Result<Phase, SessionError> {
        self.require("tick", Phase::InProgress)?;
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.complete();
        }
        Ok(self.phase)
    }

    pub fn submit(&mut self) -> Result<(), SessionError> {
        self.require("submit", Phase::InProgress)?;
        self.complete();
        Ok(())
    }

    pub fn score(&self) -> Result<Score, SessionError> {
        self.require("score", Phase::Completed)?;
        let correct = self
            .quiz
            .questions
            .iter()
            .enumerate()
            .filter(|(i, q)| self.answers.get(i) == Some(&q.correct))
            .count();
        Ok(Score {
            correct,
            total: self.quiz.question_count(),
        })
    }

    pub fn score_percentage(&self) -> Result<u32, SessionError> {
        Ok(self.score()?.percentage())
    }

    pub fn score_message(&self) -> Result<&'static str, SessionError> {
        Ok(self.score()?.message())
    }

    pub fn summary(&self) -> Result<QuizSummary, SessionError> {
        let score = self.score()?;
        Ok(QuizSummary {
            topic: self.quiz.topic.clone(),
            difficulty: self.quiz.difficulty,
            score,
            percentage: self.score_percentage()?,
            message: self.score_message()?,
            time_used_seconds: self.time_used_seconds(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn quiz(&self) -> &QuizSpec {
        &self.quiz
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.questions.get(self.current_index)
    }

    /// Option chosen for the current question, if any
    pub fn selected_option(&self) -> Option<usize> {
        self.answers.get(&self.current_index).copied()
    }

    pub fn answers(&self) -> &BTreeMap<usize, usize> {
        &self.answers
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn time_used_seconds(&self) -> u32 {
        self.time_limit - self.remaining_seconds
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.quiz.question_count()
    }

    pub fn progress_percent(&self) -> u32 {
        let total = self.quiz.question_count().max(1);
        ((self.current_index + 1) * 100 / total) as u32
    }
}

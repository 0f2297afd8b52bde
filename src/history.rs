//! SQLite history of logins, generated quizzes and submitted results
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::bank::QuizSpec;
use crate::error::HistoryError;
use crate::forms::User;
use crate::session::QuizSummary;

/// Default path of the history database file
pub const DB_PATH: &str = "quiz_history.sqlite";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    email         TEXT PRIMARY KEY,
    username      TEXT NOT NULL,
    last_login_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS quizzes (
    quiz_id         TEXT PRIMARY KEY,
    user_email      TEXT NOT NULL,
    topic           TEXT NOT NULL,
    difficulty      TEXT NOT NULL,
    total_questions INTEGER NOT NULL,
    questions       TEXT NOT NULL,
    created_at      TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS responses (
    response_id       TEXT PRIMARY KEY,
    quiz_id           TEXT NOT NULL REFERENCES quizzes(quiz_id),
    user_email        TEXT NOT NULL,
    topic             TEXT NOT NULL,
    difficulty        TEXT NOT NULL,
    answers           TEXT NOT NULL,
    correct           INTEGER NOT NULL,
    total             INTEGER NOT NULL,
    percentage        INTEGER NOT NULL,
    time_used_seconds INTEGER NOT NULL,
    submitted_at      TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS responses_by_user ON responses(user_email, submitted_at);
";

/// A stored quiz result, as listed by the `history` command
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub topic: String,
    pub difficulty: String,
    pub correct: u32,
    pub total: u32,
    pub percentage: u32,
    pub time_used_seconds: u32,
    pub submitted_at: DateTime<Utc>,
}

pub struct HistoryStore {
    conn: Connection,
}

impl HistoryStore {
    /// Opens (creating if needed) the database at `path`. `:memory:` works too.
    pub fn open(path: &str) -> Result<Self, HistoryError> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, HistoryError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, HistoryError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn record_login(&self, user: &User) -> Result<(), HistoryError> {
        self.conn.execute(
            "INSERT INTO users (email, username, last_login_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(email) DO UPDATE SET
                 username = excluded.username,
                 last_login_at = excluded.last_login_at",
            params![user.email, user.username, Utc::now()],
        )?;
        Ok(())
    }

    pub fn record_quiz(&self, user: &User, quiz: &QuizSpec) -> Result<(), HistoryError> {
        let questions = serde_json::to_string(&quiz.questions)?;
        self.conn.execute(
            "INSERT INTO quizzes
                 (quiz_id, user_email, topic, difficulty, total_questions, questions, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                quiz.id.to_string(),
                user.email,
                quiz.topic,
                quiz.difficulty.as_str(),
                quiz.question_count() as i64,
                questions,
                quiz.requested_at,
            ],
        )?;
        Ok(())
    }

    /// Stores a completed attempt and returns its response id.
    pub fn record_result(
        &self,
        user: &User,
        quiz: &QuizSpec,
        summary: &QuizSummary,
        answers: &BTreeMap<usize, usize>,
    ) -> Result<Uuid, HistoryError> {
        let response_id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO responses
                 (response_id, quiz_id, user_email, topic, difficulty, answers,
                  correct, total, percentage, time_used_seconds, submitted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                response_id.to_string(),
                quiz.id.to_string(),
                user.email,
                summary.topic,
                summary.difficulty.as_str(),
                serde_json::to_string(answers)?,
                summary.score.correct as i64,
                summary.score.total as i64,
                summary.percentage,
                summary.time_used_seconds,
                Utc::now(),
            ],
        )?;
        log::info!(
            "saved result {} for quiz {}: {}/{}",
            response_id,
            quiz.id,
            summary.score.correct,
            summary.score.total
        );
        Ok(response_id)
    }

    /// Most recent results for `email`, newest first.
    pub fn recent_results(&self, email: &str, limit: usize) -> Result<Vec<ResultRecord>, HistoryError> {
        let mut stmt = self.conn.prepare(
            "SELECT topic, difficulty, correct, total, percentage,
                    time_used_seconds, submitted_at
             FROM responses
             WHERE user_email = ?1
             ORDER BY submitted_at DESC, rowid DESC
             LIMIT ?2",
        )?;

        let rows_iter = stmt.query_map(params![email, limit as i64], |row| {
            Ok(ResultRecord {
                topic: row.get(0)?,
                difficulty: row.get(1)?,
                correct: row.get(2)?,
                total: row.get(3)?,
                percentage: row.get(4)?,
                time_used_seconds: row.get(5)?,
                submitted_at: row.get(6)?,
            })
        })?;

        let mut records = Vec::new();
        for row_res in rows_iter {
            records.push(row_res?);
        }
        Ok(records)
    }
}

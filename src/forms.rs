//! Validation of what the user types at the login and new-quiz prompts.
use crate::bank::Difficulty;
use crate::error::ValidationError;

/// Allowed numbers of questions per quiz
pub const QUESTION_COUNTS: [usize; 4] = [3, 5, 10, 15];

/// Used when the count prompt is left empty
pub const DEFAULT_QUESTION_COUNT: usize = 5;

/// Logged-in identity. Nothing is authenticated; the pair is only recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub email: String,
}

impl User {
    pub fn new(username: &str, email: &str) -> Result<Self, ValidationError> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() || email.is_empty() {
            return Err(ValidationError::MissingCredentials);
        }
        if !email.contains('@') {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(Self {
            username: username.to_string(),
            email: email.to_string(),
        })
    }
}

/// A validated request for a new quiz
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRequest {
    pub topic: String,
    pub count: usize,
    pub difficulty: Difficulty,
}

impl TopicRequest {
    /// Validates the three raw prompt answers together. Empty count and
    /// difficulty fall back to their defaults.
    pub fn new(topic: &str, count: &str, difficulty: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            topic: validate_topic(topic)?,
            count: parse_count(count)?,
            difficulty: parse_difficulty(difficulty)?,
        })
    }
}

/// Returns the trimmed topic, rejecting blank input.
pub fn validate_topic(raw: &str) -> Result<String, ValidationError> {
    let topic = raw.trim();
    if topic.is_empty() {
        return Err(ValidationError::EmptyTopic);
    }
    Ok(topic.to_string())
}

pub fn parse_count(raw: &str) -> Result<usize, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DEFAULT_QUESTION_COUNT);
    }
    raw.parse::<usize>()
        .ok()
        .filter(|n| QUESTION_COUNTS.contains(n))
        .ok_or_else(|| ValidationError::QuestionCount {
            given: raw.to_string(),
        })
}

pub fn parse_difficulty(raw: &str) -> Result<Difficulty, ValidationError> {
    if raw.trim().is_empty() {
        return Ok(Difficulty::default());
    }
    raw.parse()
}

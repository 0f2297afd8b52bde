//! Built-in question banks and quiz generation.
//!
//! This module holds the fixed question banks keyed by topic, the generic
//! templates used for any other topic, and the shuffle-then-slice selection
//! that turns them into a `QuizSpec`.
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ValidationError;

/// Every question offers exactly this many options
pub const OPTION_COUNT: usize = 4;

/// A bank question as it is written in source
#[derive(Debug, Clone, Copy)]
pub struct BankQuestion {
    pub prompt: &'static str,
    pub options: [&'static str; OPTION_COUNT],
    pub correct: usize,
}

/// Generic question template; `{topic}` in the prompt is replaced by the topic
struct Template {
    prompt: &'static str,
    options: [&'static str; OPTION_COUNT],
    correct: usize,
}

const JAVASCRIPT: [BankQuestion; 5] = [
    BankQuestion {
        prompt: "What is the correct way to declare a variable in JavaScript?",
        options: [
            "var name = \"John\"",
            "variable name = \"John\"",
            "v name = \"John\"",
            "declare name = \"John\"",
        ],
        correct: 0,
    },
    BankQuestion {
        prompt: "Which method is used to add an element to the end of an array?",
        options: ["push()", "add()", "append()", "insert()"],
        correct: 0,
    },
    BankQuestion {
        prompt: "What does JSON stand for?",
        options: [
            "JavaScript Object Notation",
            "Java Standard Object Notation",
            "JavaScript Oriented Notation",
            "Java Script Object Network",
        ],
        correct: 0,
    },
    BankQuestion {
        prompt: "Which operator is used for strict equality in JavaScript?",
        options: ["==", "===", "=", "!="],
        correct: 1,
    },
    BankQuestion {
        prompt: "What is the result of typeof null in JavaScript?",
        options: ["null", "undefined", "object", "string"],
        correct: 2,
    },
];

const REACT: [BankQuestion; 5] = [
    BankQuestion {
        prompt: "What is React?",
        options: [
            "A database",
            "A JavaScript library for building user interfaces",
            "A server-side framework",
            "A programming language",
        ],
        correct: 1,
    },
    BankQuestion {
        prompt: "What is JSX?",
        options: [
            "A JavaScript extension",
            "A syntax extension for JavaScript",
            "A CSS framework",
            "A database query language",
        ],
        correct: 1,
    },
    BankQuestion {
        prompt: "What is the purpose of useState in React?",
        options: [
            "To create global state",
            "To manage component state",
            "To fetch data",
            "To handle events",
        ],
        correct: 1,
    },
    BankQuestion {
        prompt: "What is the virtual DOM?",
        options: [
            "A real DOM element",
            "A JavaScript representation of the DOM",
            "A CSS framework",
            "A database",
        ],
        correct: 1,
    },
    BankQuestion {
        prompt: "What is the correct way to pass data to a child component?",
        options: [
            "Through global variables",
            "Through props",
            "Through CSS",
            "Through localStorage",
        ],
        correct: 1,
    },
];

const PYTHON: [BankQuestion; 5] = [
    BankQuestion {
        prompt: "What is the correct way to create a list in Python?",
        options: ["list = []", "list = {}", "list = ()", "list = <>"],
        correct: 0,
    },
    BankQuestion {
        prompt: "Which keyword is used to define a function in Python?",
        options: ["function", "def", "func", "define"],
        correct: 1,
    },
    BankQuestion {
        prompt: "What is the result of 3 ** 2 in Python?",
        options: ["6", "9", "5", "1"],
        correct: 1,
    },
    BankQuestion {
        prompt: "Which method is used to add an item to a list?",
        options: ["add()", "insert()", "append()", "Both append() and insert()"],
        correct: 3,
    },
    BankQuestion {
        prompt: "What is PEP 8?",
        options: [
            "A Python library",
            "A Python Enhancement Proposal for code style",
            "A Python framework",
            "A Python database",
        ],
        correct: 1,
    },
];

const GENERIC: [Template; 5] = [
    Template {
        prompt: "What is the most important aspect of {topic}?",
        options: ["Theory", "Practice", "Both theory and practice", "Memorization"],
        correct: 2,
    },
    Template {
        prompt: "Which of the following is NOT related to {topic}?",
        options: [
            "Basic concepts",
            "Advanced techniques",
            "Cooking recipes",
            "Best practices",
        ],
        correct: 2,
    },
    Template {
        prompt: "How would you best learn {topic}?",
        options: [
            "Reading only",
            "Practice only",
            "Combination of reading and practice",
            "Watching videos only",
        ],
        correct: 2,
    },
    Template {
        prompt: "What is the primary goal when studying {topic}?",
        options: [
            "To memorize everything",
            "To understand concepts",
            "To pass exams",
            "To impress others",
        ],
        correct: 1,
    },
    Template {
        prompt: "Which skill is most important for {topic}?",
        options: ["Speed", "Accuracy", "Creativity", "All of the above"],
        correct: 3,
    },
];

/// Difficulty label chosen for a quiz. It is recorded and displayed but does
/// not change which questions are selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Lowercase key, as stored in history
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(label)
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ValidationError::Difficulty {
                given: s.trim().to_string(),
            }),
        }
    }
}

/// A multiple-choice question handed to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: [String; OPTION_COUNT],
    pub correct: usize,
}

impl From<&BankQuestion> for Question {
    fn from(q: &BankQuestion) -> Self {
        Question {
            prompt: q.prompt.to_string(),
            options: q.options.map(str::to_string),
            correct: q.correct,
        }
    }
}

impl Template {
    fn render(&self, topic: &str) -> Question {
        Question {
            prompt: self.prompt.replace("{topic}", topic),
            options: self.options.map(str::to_string),
            correct: self.correct,
        }
    }
}

/// Generated questions plus the metadata of one quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSpec {
    pub id: Uuid,
    pub topic: String,
    pub difficulty: Difficulty,
    pub questions: Vec<Question>,
    pub requested_at: DateTime<Utc>,
}

impl QuizSpec {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

/// Builds the registry mapping lowercase topic keys to their banks
pub fn build_registry() -> HashMap<&'static str, &'static [BankQuestion]> {
    let mut m: HashMap<&'static str, &'static [BankQuestion]> = HashMap::new();
    m.insert("javascript", &JAVASCRIPT);
    m.insert("react", &REACT);
    m.insert("python", &PYTHON);
    m
}

/// Topics that have a dedicated bank, sorted
pub fn known_topics() -> Vec<&'static str> {
    let mut topics: Vec<_> = build_registry().into_keys().collect();
    topics.sort_unstable();
    topics
}

/// Candidate questions for a topic before selection.
///
/// The lookup is case-insensitive; unknown topics get the generic templates
/// with the topic text embedded as given.
fn candidates_for(topic: &str) -> Vec<Question> {
    let registry = build_registry();
    match registry.get(topic.to_lowercase().as_str()) {
        Some(bank) => bank.iter().map(Question::from).collect(),
        None => GENERIC.iter().map(|t| t.render(topic)).collect(),
    }
}

/// Generates a quiz for `topic`.
///
/// Candidates are shuffled with `rng` and the first `min(count, available)`
/// are kept. The topic must already be validated as non-empty.
pub fn generate<R: Rng + ?Sized>(
    topic: &str,
    count: usize,
    difficulty: Difficulty,
    rng: &mut R,
) -> QuizSpec {
    let topic = topic.trim();
    let mut questions = candidates_for(topic);
    questions.shuffle(rng);
    questions.truncate(count.min(questions.len()));

    log::info!(
        "generated {} {} question(s) for topic '{}'",
        questions.len(),
        difficulty.as_str(),
        topic
    );

    QuizSpec {
        id: Uuid::new_v4(),
        topic: topic.to_string(),
        difficulty,
        questions,
        requested_at: Utc::now(),
    }
}

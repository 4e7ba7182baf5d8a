use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikertLabel {
    Never,
    AlmostNever,
    Sometimes,
    FairlyOften,
    VeryOften,
}

impl LikertLabel {
    pub const ALL: [Self; 5] = [
        Self::Never,
        Self::AlmostNever,
        Self::Sometimes,
        Self::FairlyOften,
        Self::VeryOften,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Never => "Never",
            Self::AlmostNever => "Almost Never",
            Self::Sometimes => "Sometimes",
            Self::FairlyOften => "Fairly Often",
            Self::VeryOften => "Very Often",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.as_str() == label)
    }

    pub fn value(self) -> u32 {
        self as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scoring {
    Forward,
    Reverse,
    Informational,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub position: u32,
    pub text: String,
    pub scoring: Scoring,
}

#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("instrument has no questions")]
    Empty,
    #[error("duplicate question position {0}")]
    DuplicatePosition(u32),
    #[error("question positions must be 1..={expected} with no gaps, found {found}")]
    BadPosition { expected: usize, found: u32 },
    #[error("instrument has no scored questions")]
    NoScoredQuestions,
}

#[derive(Debug, Clone)]
pub struct Instrument {
    questions: Vec<Question>,
    score_ceiling: u32,
}

impl Instrument {
    pub fn new(mut questions: Vec<Question>) -> Result<Self, InstrumentError> {
        if questions.is_empty() {
            return Err(InstrumentError::Empty);
        }
        questions.sort_by_key(|question| question.position);
        let mut previous = 0;
        for question in &questions {
            if question.position == previous {
                return Err(InstrumentError::DuplicatePosition(question.position));
            }
            if question.position != previous + 1 {
                return Err(InstrumentError::BadPosition {
                    expected: questions.len(),
                    found: question.position,
                });
            }
            previous = question.position;
        }
        let scored = questions
            .iter()
            .filter(|question| question.scoring != Scoring::Informational)
            .count() as u32;
        if scored == 0 {
            return Err(InstrumentError::NoScoredQuestions);
        }
        Ok(Self {
            score_ceiling: scored * 4,
            questions,
        })
    }

    pub fn canonical() -> Self {
        let questions = CANONICAL_QUESTIONS
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let position = index as u32 + 1;
                Question {
                    position,
                    text: (*text).to_string(),
                    scoring: canonical_scoring(position),
                }
            })
            .collect();
        // The published range of the canonical instrument is 0-48 even though
        // its informational item caps the attainable total at 44; keeping the
        // published ceiling keeps the historical band cutoffs.
        Self {
            questions,
            score_ceiling: CANONICAL_CEILING,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn score_ceiling(&self) -> u32 {
        self.score_ceiling
    }

    pub fn scoring_at(&self, position: u32) -> Option<Scoring> {
        let index = position.checked_sub(1)? as usize;
        self.questions.get(index).map(|question| question.scoring)
    }

    pub fn scored_positions(&self) -> impl Iterator<Item = u32> + '_ {
        self.questions
            .iter()
            .filter(|question| question.scoring != Scoring::Informational)
            .map(|question| question.position)
    }
}

const CANONICAL_CEILING: u32 = 48;

fn canonical_scoring(position: u32) -> Scoring {
    match position {
        4 | 5 | 7 | 8 | 12 => Scoring::Reverse,
        11 => Scoring::Informational,
        _ => Scoring::Forward,
    }
}

const CANONICAL_QUESTIONS: [&str; 12] = [
    "How often have you been upset because of something that happened unexpectedly?",
    "How often have you felt that you were unable to control the important things in your life?",
    "How often have you felt nervous and stressed?",
    "How often have you felt confident about your ability to handle your personal problems?",
    "How often have you felt that things were going your way?",
    "How often have you found that you could not cope with all the things that you had to do?",
    "How often have you been able to control irritations in your life?",
    "How often have you felt that you were on top of things?",
    "How often have you been angered because of things that were outside of your control?",
    "How often have you felt difficulties were piling up so high that you could not overcome them?",
    "How often have you found yourself thinking about things that you have to accomplish?",
    "How often have you been able to control the way you spend your time?",
];

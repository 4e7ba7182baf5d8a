use crate::models::{AnswerSelection, AssessmentAnswer, StressLevel, StressScore};
use crate::questionnaire::{Instrument, LikertLabel, Scoring};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("unrecognized answer label \"{0}\"")]
    InvalidAnswerLabel(String),
    #[error("incomplete assessment: {0}")]
    IncompleteAssessment(String),
}

pub fn encode(scoring: Scoring, label: LikertLabel) -> u32 {
    match scoring {
        Scoring::Forward => label.value(),
        Scoring::Reverse => 4 - label.value(),
        Scoring::Informational => 0,
    }
}

pub fn encode_answers(
    instrument: &Instrument,
    selections: &[AnswerSelection],
) -> Result<Vec<AssessmentAnswer>, ScoreError> {
    selections
        .iter()
        .map(|selection| {
            let scoring = instrument.scoring_at(selection.position).ok_or_else(|| {
                ScoreError::IncompleteAssessment(format!(
                    "question {} is not part of the instrument",
                    selection.position
                ))
            })?;
            let label = LikertLabel::parse(&selection.label)
                .ok_or_else(|| ScoreError::InvalidAnswerLabel(selection.label.clone()))?;
            Ok(AssessmentAnswer {
                position: selection.position,
                label: label.as_str().to_string(),
                value: encode(scoring, label),
            })
        })
        .collect()
}

pub fn evaluate(
    instrument: &Instrument,
    answers: &[AssessmentAnswer],
) -> Result<StressScore, ScoreError> {
    let mut seen = BTreeSet::new();
    for answer in answers {
        if instrument.scoring_at(answer.position).is_none() {
            return Err(ScoreError::IncompleteAssessment(format!(
                "question {} is not part of the instrument",
                answer.position
            )));
        }
        if !seen.insert(answer.position) {
            return Err(ScoreError::IncompleteAssessment(format!(
                "question {} answered more than once",
                answer.position
            )));
        }
    }
    for position in instrument.scored_positions() {
        if !seen.contains(&position) {
            return Err(ScoreError::IncompleteAssessment(format!(
                "question {position} is unanswered"
            )));
        }
    }

    let total: u32 = answers.iter().map(|answer| answer.value).sum();
    Ok(StressScore {
        total,
        level: classify(total, instrument.score_ceiling()),
    })
}

// Quartile bands with inclusive lower bounds; exact integer arithmetic so the
// canonical 0-48 ceiling yields the cutoffs 0-12 / 13-24 / 25-36 / 37-48.
fn classify(total: u32, ceiling: u32) -> StressLevel {
    if total * 4 <= ceiling {
        StressLevel::Low
    } else if total * 2 <= ceiling {
        StressLevel::Mild
    } else if total * 4 <= ceiling * 3 {
        StressLevel::Moderate
    } else {
        StressLevel::High
    }
}

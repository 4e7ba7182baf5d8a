use crate::models::StreakState;
use chrono::{Duration, NaiveDate};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StreakError {
    #[error("invalid streak state: {0}")]
    InvalidStreakState(String),
}

fn validate(state: &StreakState, today: NaiveDate) -> Result<(), StreakError> {
    if let Some(last) = state.last_activity_date {
        if last > today {
            return Err(StreakError::InvalidStreakState(format!(
                "last activity {last} is after today {today}"
            )));
        }
    }
    if state.current_streak > state.longest_streak {
        return Err(StreakError::InvalidStreakState(format!(
            "current streak {} exceeds longest streak {}",
            state.current_streak, state.longest_streak
        )));
    }
    Ok(())
}

pub fn record_activity(state: &StreakState, today: NaiveDate) -> Result<StreakState, StreakError> {
    validate(state, today)?;

    let yesterday = today - Duration::days(1);
    let updated = match state.last_activity_date {
        Some(last) if last == today => state.clone(),
        Some(last) if last == yesterday => {
            let current = state.current_streak + 1;
            StreakState {
                current_streak: current,
                longest_streak: state.longest_streak.max(current),
                last_activity_date: Some(today),
            }
        }
        // Lapsed, first ever activity, or a cleared date with a leftover
        // count: the streak starts over at 1.
        _ => StreakState {
            current_streak: 1,
            longest_streak: state.longest_streak.max(1),
            last_activity_date: Some(today),
        },
    };
    Ok(updated)
}

pub fn effective_streak(state: &StreakState, today: NaiveDate) -> Result<u32, StreakError> {
    validate(state, today)?;

    let yesterday = today - Duration::days(1);
    match state.last_activity_date {
        Some(last) if last == today || last == yesterday => Ok(state.current_streak),
        _ => Ok(0),
    }
}

pub fn reset(state: &StreakState) -> StreakState {
    StreakState {
        current_streak: 0,
        longest_streak: state.longest_streak,
        last_activity_date: None,
    }
}

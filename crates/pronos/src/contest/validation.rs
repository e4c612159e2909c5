use super::domain::{Outcome, TeamId};

/// Validation errors raised before a result or fixture reaches storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OutcomeViolation {
    #[error("a finished match needs a full-time score")]
    MissingFullTime,
    #[error("penalties recorded although full time ended {home}-{away}")]
    PenaltiesWithoutDraw { home: u32, away: u32 },
    #[error("penalty shootout cannot end level ({goals}-{goals})")]
    LevelShootout { goals: u32 },
    #[error("a team cannot play itself ({0})")]
    SameTeams(TeamId),
}

pub(crate) fn check_outcome(outcome: &Outcome) -> Result<(), OutcomeViolation> {
    let full_time = outcome.full_time.ok_or(OutcomeViolation::MissingFullTime)?;

    if let Some(shootout) = outcome.after_penalties {
        if !full_time.is_level() {
            return Err(OutcomeViolation::PenaltiesWithoutDraw {
                home: full_time.home,
                away: full_time.away,
            });
        }
        if shootout.is_level() {
            return Err(OutcomeViolation::LevelShootout {
                goals: shootout.home,
            });
        }
    }

    Ok(())
}

pub(crate) fn check_fixture(home: &TeamId, away: &TeamId) -> Result<(), OutcomeViolation> {
    if home == away {
        return Err(OutcomeViolation::SameTeams(home.clone()));
    }
    Ok(())
}

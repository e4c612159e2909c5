use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier wrapper for teams.
    TeamId
);
string_id!(
    /// Identifier wrapper for participants (the people submitting predictions).
    ParticipantId
);
string_id!(TournamentId);
string_id!(MatchId);
string_id!(PredictionId);

/// Goals scored by each side at a given point of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    pub const fn new(home: u32, away: u32) -> Self {
        Self { home, away }
    }

    /// Widened so that any pair of `u32` goal counts sums without overflow.
    pub const fn total_goals(self) -> u64 {
        self.home as u64 + self.away as u64
    }

    pub const fn is_level(self) -> bool {
        self.home == self.away
    }

    pub fn winner(self) -> Winner {
        match self.home.cmp(&self.away) {
            std::cmp::Ordering::Greater => Winner::Home,
            std::cmp::Ordering::Less => Winner::Away,
            std::cmp::Ordering::Equal => Winner::Draw,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Home,
    Away,
    Draw,
}

impl Winner {
    pub const fn label(self) -> &'static str {
        match self {
            Winner::Home => "home",
            Winner::Away => "away",
            Winner::Draw => "draw",
        }
    }

    pub const fn is_draw(self) -> bool {
        matches!(self, Winner::Draw)
    }
}

/// Final result of a match. Only present once the match is finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub half_time: Option<Score>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_time: Option<Score>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_penalties: Option<Score>,
}

impl Outcome {
    pub fn new(half_time: Option<Score>, full_time: Score) -> Self {
        Self {
            half_time,
            full_time: Some(full_time),
            after_penalties: None,
        }
    }

    pub fn with_penalties(mut self, after_penalties: Score) -> Self {
        self.after_penalties = Some(after_penalties);
        self
    }

    /// Penalties only decide the winner when full time ended level.
    pub fn winner(&self) -> Option<Winner> {
        let full_time = self.full_time?;
        match self.after_penalties {
            Some(shootout) if full_time.is_level() => Some(shootout.winner()),
            _ => Some(full_time.winner()),
        }
    }
}

/// What a participant expects to happen in a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictedOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Winner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub half_time: Option<Score>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_time: Option<Score>,
}

impl PredictedOutcome {
    /// The explicit pick wins; otherwise the winner implied by the full-time score.
    pub fn winner(&self) -> Option<Winner> {
        self.winner.or_else(|| self.full_time.map(Score::winner))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    Upcoming,
    InProgress,
    Finished,
}

impl TournamentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            TournamentStatus::Upcoming => "upcoming",
            TournamentStatus::InProgress => "in_progress",
            TournamentStatus::Finished => "finished",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub status: TournamentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Open,
    Finished,
}

impl MatchStatus {
    pub const fn label(self) -> &'static str {
        match self {
            MatchStatus::Open => "open",
            MatchStatus::Finished => "finished",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub home: TeamId,
    pub away: TeamId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl Match {
    pub fn status(&self) -> MatchStatus {
        if self.outcome.is_some() {
            MatchStatus::Finished
        } else {
            MatchStatus::Open
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status() == MatchStatus::Finished
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: PredictionId,
    pub participant_id: ParticipantId,
    pub match_id: MatchId,
    pub forecast: PredictedOutcome,
    /// Recorded once the match is finished; never reset afterwards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<i32>,
}

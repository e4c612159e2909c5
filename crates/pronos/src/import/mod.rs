//! Offline result import: applies a CSV of final scores to a contest.

mod parser;

pub use parser::ResultRowError;

use crate::contest::{ContestError, ContestRepository, ContestService, MatchId};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug)]
pub enum ResultImportError {
    Io(std::io::Error),
    Row(ResultRowError),
    Contest(ContestError),
}

impl std::fmt::Display for ResultImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultImportError::Io(err) => write!(f, "failed to read results file: {}", err),
            ResultImportError::Row(err) => write!(f, "invalid results CSV data: {}", err),
            ResultImportError::Contest(err) => {
                write!(f, "could not apply results to the contest: {}", err)
            }
        }
    }
}

impl std::error::Error for ResultImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResultImportError::Io(err) => Some(err),
            ResultImportError::Row(err) => Some(err),
            ResultImportError::Contest(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ResultImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ResultRowError> for ResultImportError {
    fn from(err: ResultRowError) -> Self {
        Self::Row(err)
    }
}

impl From<ContestError> for ResultImportError {
    fn from(err: ContestError) -> Self {
        Self::Contest(err)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub recorded: Vec<MatchId>,
    pub already_finished: Vec<MatchId>,
    pub unknown_matches: Vec<MatchId>,
    pub rejected: Vec<MatchId>,
    pub predictions_scored: usize,
}

pub struct ResultImporter;

impl ResultImporter {
    pub fn from_path<P, R>(
        path: P,
        service: &ContestService<R>,
    ) -> Result<ImportSummary, ResultImportError>
    where
        P: AsRef<Path>,
        R: ContestRepository + 'static,
    {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, service)
    }

    /// Rows are parsed up front; an unreadable score aborts before anything is recorded.
    pub fn from_reader<T, R>(
        reader: T,
        service: &ContestService<R>,
    ) -> Result<ImportSummary, ResultImportError>
    where
        T: Read,
        R: ContestRepository + 'static,
    {
        let records = parser::parse_records(reader)?;
        let mut summary = ImportSummary::default();

        for record in records {
            match service.record_outcome(&record.match_id, record.outcome) {
                Ok(scored) => {
                    summary.predictions_scored += scored.len();
                    summary.recorded.push(record.match_id);
                }
                Err(ContestError::MatchFinished(id)) => summary.already_finished.push(id),
                Err(ContestError::UnknownMatch(id)) => {
                    warn!(line = record.line, match_id = %id, "result for unknown match skipped");
                    summary.unknown_matches.push(id);
                }
                Err(ContestError::InvalidOutcome(violation)) => {
                    warn!(
                        line = record.line,
                        match_id = %record.match_id,
                        %violation,
                        "result rejected"
                    );
                    summary.rejected.push(record.match_id);
                }
                Err(other) => return Err(other.into()),
            }
        }

        info!(
            recorded = summary.recorded.len(),
            skipped = summary.already_finished.len()
                + summary.unknown_matches.len()
                + summary.rejected.len(),
            "results import finished"
        );
        Ok(summary)
    }
}

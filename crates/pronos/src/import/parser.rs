use crate::contest::{MatchId, Outcome, Score};
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct ResultRecord {
    pub(crate) line: u64,
    pub(crate) match_id: MatchId,
    pub(crate) outcome: Outcome,
}

#[derive(Debug, thiserror::Error)]
pub enum ResultRowError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("line {line}: '{value}' is not a score like 2-1")]
    Score { line: u64, value: String },
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<ResultRecord>, ResultRowError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut raw = csv::StringRecord::new();
    let mut records = Vec::new();

    while csv_reader.read_record(&mut raw)? {
        // First physical line of the record, so quoted multi-line fields keep counts right.
        let line = raw.position().map_or(0, |position| position.line());
        let row: ResultRow = raw.deserialize(Some(&headers))?;
        let outcome = Outcome {
            half_time: parse_optional(line, row.half_time.as_deref())?,
            full_time: parse_optional(line, row.full_time.as_deref())?,
            after_penalties: parse_optional(line, row.penalties.as_deref())?,
        };

        records.push(ResultRecord {
            line,
            match_id: MatchId(row.match_id),
            outcome,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct ResultRow {
    #[serde(rename = "Match ID")]
    match_id: String,
    #[serde(rename = "Half Time", default, deserialize_with = "empty_string_as_none")]
    half_time: Option<String>,
    #[serde(rename = "Full Time", default, deserialize_with = "empty_string_as_none")]
    full_time: Option<String>,
    #[serde(rename = "Penalties", default, deserialize_with = "empty_string_as_none")]
    penalties: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_optional(line: u64, value: Option<&str>) -> Result<Option<Score>, ResultRowError> {
    value
        .map(|raw| {
            parse_score(raw).ok_or_else(|| ResultRowError::Score {
                line,
                value: raw.to_string(),
            })
        })
        .transpose()
}

/// Accepts `2-1`, `2 - 1` and `2:1`.
pub(crate) fn parse_score(raw: &str) -> Option<Score> {
    let (home, away) = raw.trim().split_once(['-', ':'])?;
    let home = home.trim().parse().ok()?;
    let away = away.trim().parse().ok()?;
    Some(Score::new(home, away))
}

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::domain::{Match, MatchId, Participant, Prediction, Team, Tournament, TournamentId};
use super::repository::{upsert, ContestRepository, ContestSnapshot, RepositoryError};

const TOURNAMENTS: &str = "tournaments.json";
const TEAMS: &str = "teams.json";
const PARTICIPANTS: &str = "participants.json";
const MATCHES: &str = "matches.json";
const PREDICTIONS: &str = "predictions.json";

/// Repository keeping each collection as a JSON array file inside `root`.
///
/// Every call reads the collection from disk, so external edits are picked up.
/// The mutex only serializes writers within this process.
#[derive(Debug)]
pub struct JsonFileRepository {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileRepository {
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, RepositoryError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Loads all collections at once, e.g. for offline ranking.
    pub fn snapshot(&self) -> Result<ContestSnapshot, RepositoryError> {
        Ok(ContestSnapshot {
            tournaments: self.read(TOURNAMENTS)?,
            teams: self.read(TEAMS)?,
            participants: self.read(PARTICIPANTS)?,
            matches: self.read(MATCHES)?,
            predictions: self.read(PREDICTIONS)?,
        })
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, RepositoryError> {
        let path = self.root.join(file);
        match fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write<T: Serialize>(&self, file: &str, records: &[T]) -> Result<(), RepositoryError> {
        let path = self.root.join(file);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, serde_json::to_vec_pretty(records)?)?;
        fs::rename(&staging, &path)?;
        debug!(file, records = records.len(), "collection written");
        Ok(())
    }

    /// Upserts one record into a single collection file; other collections are not read.
    fn save<T>(
        &self,
        file: &str,
        record: T,
        same: impl Fn(&T, &T) -> bool,
    ) -> Result<(), RepositoryError>
    where
        T: Serialize + DeserializeOwned,
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))?;
        let mut records: Vec<T> = self.read(file)?;
        upsert(&mut records, record, same);
        self.write(file, &records)
    }
}

impl ContestRepository for JsonFileRepository {
    fn tournaments(&self) -> Result<Vec<Tournament>, RepositoryError> {
        self.read(TOURNAMENTS)
    }

    fn save_tournament(&self, tournament: Tournament) -> Result<(), RepositoryError> {
        self.save(TOURNAMENTS, tournament, |a, b| a.id == b.id)
    }

    fn teams(&self) -> Result<Vec<Team>, RepositoryError> {
        self.read(TEAMS)
    }

    fn save_team(&self, team: Team) -> Result<(), RepositoryError> {
        self.save(TEAMS, team, |a, b| a.id == b.id)
    }

    fn participants(&self) -> Result<Vec<Participant>, RepositoryError> {
        self.read(PARTICIPANTS)
    }

    fn save_participant(&self, participant: Participant) -> Result<(), RepositoryError> {
        self.save(PARTICIPANTS, participant, |a, b| a.id == b.id)
    }

    fn matches(&self, tournament_id: &TournamentId) -> Result<Vec<Match>, RepositoryError> {
        let matches: Vec<Match> = self.read(MATCHES)?;
        Ok(matches
            .into_iter()
            .filter(|fixture| &fixture.tournament_id == tournament_id)
            .collect())
    }

    fn fetch_match(&self, id: &MatchId) -> Result<Option<Match>, RepositoryError> {
        let matches: Vec<Match> = self.read(MATCHES)?;
        Ok(matches.into_iter().find(|fixture| &fixture.id == id))
    }

    fn save_match(&self, fixture: Match) -> Result<(), RepositoryError> {
        self.save(MATCHES, fixture, |a, b| a.id == b.id)
    }

    fn predictions(&self) -> Result<Vec<Prediction>, RepositoryError> {
        self.read(PREDICTIONS)
    }

    fn save_prediction(&self, prediction: Prediction) -> Result<(), RepositoryError> {
        self.save(PREDICTIONS, prediction, |a, b| a.id == b.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contest::domain::{
        Outcome, ParticipantId, PredictedOutcome, PredictionId, Score, TeamId,
    };
    use tempfile::TempDir;

    fn fixture(id: &str) -> Match {
        Match {
            id: MatchId::from(id),
            tournament_id: TournamentId::from("t-1"),
            home: TeamId::from("france"),
            away: TeamId::from("brazil"),
            name: None,
            scheduled_for: None,
            outcome: None,
        }
    }

    #[test]
    fn missing_collections_read_as_empty() {
        let dir = TempDir::new().expect("temp dir");
        let store = JsonFileRepository::open(dir.path()).expect("store opens");

        assert!(store.tournaments().expect("reads").is_empty());
        assert!(store.predictions().expect("reads").is_empty());
    }

    #[test]
    fn save_match_upserts_by_id() {
        let dir = TempDir::new().expect("temp dir");
        let store = JsonFileRepository::open(dir.path()).expect("store opens");

        store.save_match(fixture("m-1")).expect("first save");
        store.save_match(fixture("m-2")).expect("second save");

        let mut finished = fixture("m-1");
        finished.outcome = Some(Outcome::new(None, Score::new(2, 1)));
        store.save_match(finished.clone()).expect("overwrite");

        let matches = store.matches(&TournamentId::from("t-1")).expect("reads");
        assert_eq!(matches.len(), 2);
        assert_eq!(
            store.fetch_match(&MatchId::from("m-1")).expect("reads"),
            Some(finished)
        );

        let on_disk = fs::read_to_string(dir.path().join(MATCHES)).expect("file exists");
        assert!(on_disk.trim_start().starts_with('['));
    }

    #[test]
    fn corrupt_collection_surfaces_json_error() {
        let dir = TempDir::new().expect("temp dir");
        let store = JsonFileRepository::open(dir.path()).expect("store opens");
        fs::write(dir.path().join(TEAMS), "{not json").expect("write");

        match store.teams() {
            Err(RepositoryError::Json(_)) => {}
            other => panic!("expected json error, got {other:?}"),
        }
    }

    #[test]
    fn saves_touch_only_their_own_collection() {
        let dir = TempDir::new().expect("temp dir");
        let store = JsonFileRepository::open(dir.path()).expect("store opens");
        fs::write(dir.path().join(TEAMS), "{not json").expect("write");

        let prediction = Prediction {
            id: PredictionId::from("p-1"),
            participant_id: ParticipantId::from("ana"),
            match_id: MatchId::from("m-1"),
            forecast: PredictedOutcome::default(),
            points: Some(2),
        };
        store
            .save_prediction(prediction.clone())
            .expect("prediction saves despite corrupt teams");
        store.save_match(fixture("m-1")).expect("match saves");

        assert_eq!(store.predictions().expect("reads"), vec![prediction]);
        assert!(store.teams().is_err());
    }
}

use crate::infra::{parse_json_arg, InMemoryContestRepository};
use clap::Args;
use pronos::contest::{
    ContestRepository, ContestService, JsonFileRepository, Leaderboard, Match, MatchDraft,
    Outcome, PositionPolicy, PredictedOutcome, Prediction, PredictionDraft, Score,
    ScoringEngine, ScoringRules, TournamentId, Winner,
};
use pronos::error::AppError;
use pronos::import::{ImportSummary, ResultImporter};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Directory holding the contest JSON collections
    #[arg(long)]
    pub(crate) data_dir: PathBuf,
    /// Tournament to rank
    #[arg(long)]
    pub(crate) tournament: String,
    /// Give equal totals the same position ("1, 2, 2, 4")
    #[arg(long)]
    pub(crate) shared_ties: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Prediction as a JSON object
    #[arg(long, value_parser = parse_json_arg::<Prediction>)]
    pub(crate) prediction: Prediction,
    /// Match as a JSON object, outcome included once it is finished
    #[arg(long = "match", value_parser = parse_json_arg::<Match>)]
    pub(crate) fixture: Match,
}

#[derive(Args, Debug)]
pub(crate) struct ResultsImportArgs {
    /// Directory holding the contest JSON collections
    #[arg(long)]
    pub(crate) data_dir: PathBuf,
    /// CSV export with `Match ID, Half Time, Full Time, Penalties` columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Give equal totals the same position in the final table.
    #[arg(long)]
    pub(crate) shared_ties: bool,
    /// Print each participant's per-match breakdown after the table.
    #[arg(long)]
    pub(crate) breakdown: bool,
}

fn position_policy(shared_ties: bool) -> PositionPolicy {
    if shared_ties {
        PositionPolicy::SharedTies
    } else {
        PositionPolicy::Sequential
    }
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        data_dir,
        tournament,
        shared_ties,
    } = args;

    let repository = Arc::new(JsonFileRepository::open(&data_dir)?);
    let service = ContestService::new(repository, ScoringRules::default())
        .with_position_policy(position_policy(shared_ties));
    let leaderboard = service.leaderboard(&TournamentId::new(tournament))?;
    render_leaderboard(&leaderboard);
    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let points = ScoringEngine::default().score(&args.prediction, &args.fixture);
    println!("{}", serde_json::to_string_pretty(&points)?);
    Ok(())
}

pub(crate) fn run_results_import(args: ResultsImportArgs) -> Result<(), AppError> {
    let repository = Arc::new(JsonFileRepository::open(&args.data_dir)?);
    let service = ContestService::new(repository, ScoringRules::default());
    let summary = ResultImporter::from_path(&args.csv, &service)?;
    render_import_summary(&summary);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        shared_ties,
        breakdown,
    } = args;

    let repository = Arc::new(InMemoryContestRepository::default());
    let service = ContestService::new(repository.clone(), ScoringRules::default())
        .with_position_policy(position_policy(shared_ties));

    println!("Prediction contest demo");
    let tournament = service.create_tournament("Coupe du Monde")?;
    let france = service.register_team("France")?;
    let argentina = service.register_team("Argentine")?;
    let croatia = service.register_team("Croatie")?;
    let morocco = service.register_team("Maroc")?;

    let fixtures = [
        ("Demi-finale 1", &argentina, &croatia),
        ("Demi-finale 2", &france, &morocco),
        ("Finale", &argentina, &france),
    ];
    let mut matches = Vec::with_capacity(fixtures.len());
    for (name, home, away) in fixtures {
        let fixture = service.schedule_match(
            &tournament.id,
            MatchDraft {
                home: home.id.clone(),
                away: away.id.clone(),
                name: Some(name.to_string()),
                scheduled_for: None,
            },
        )?;
        println!("- Scheduled {name}: {} vs {}", home.name, away.name);
        matches.push(fixture);
    }

    let participants = [
        service.register_participant("Camille")?,
        service.register_participant("Malik")?,
        service.register_participant("Sofia")?,
    ];

    // (participant, match, winner, half time, full time)
    let picks: [(usize, usize, Winner, Option<(u32, u32)>, Option<(u32, u32)>); 8] = [
        (0, 0, Winner::Home, Some((2, 0)), Some((3, 0))),
        (0, 1, Winner::Home, Some((1, 0)), Some((2, 0))),
        (0, 2, Winner::Away, Some((0, 1)), Some((1, 2))),
        (1, 0, Winner::Home, None, Some((2, 1))),
        (1, 1, Winner::Away, Some((0, 0)), Some((0, 1))),
        (1, 2, Winner::Draw, Some((2, 0)), Some((3, 3))),
        (2, 0, Winner::Away, Some((0, 1)), Some((0, 5))),
        (2, 2, Winner::Home, Some((1, 1)), Some((2, 1))),
    ];
    for (who, which, winner, half_time, full_time) in picks {
        service.submit_prediction(PredictionDraft {
            participant_id: participants[who].id.clone(),
            match_id: matches[which].id.clone(),
            forecast: PredictedOutcome {
                winner: Some(winner),
                half_time: half_time.map(|(home, away)| Score::new(home, away)),
                full_time: full_time.map(|(home, away)| Score::new(home, away)),
            },
        })?;
    }
    println!(
        "- {} predictions submitted by {} participants",
        repository.predictions()?.len(),
        participants.len()
    );

    let results = [
        Outcome::new(Some(Score::new(2, 0)), Score::new(3, 0)),
        Outcome::new(Some(Score::new(1, 0)), Score::new(2, 0)),
        Outcome::new(Some(Score::new(2, 0)), Score::new(3, 3)).with_penalties(Score::new(4, 2)),
    ];
    println!("\nResults");
    for (fixture, outcome) in matches.iter().zip(results) {
        let scored = service.record_outcome(&fixture.id, outcome)?;
        println!(
            "- {}: {} ({} predictions scored)",
            fixture.name.as_deref().unwrap_or(fixture.id.as_str()),
            describe_outcome(&outcome),
            scored.len()
        );
    }

    let leaderboard = service.leaderboard(&tournament.id)?;
    println!();
    render_leaderboard(&leaderboard);

    if breakdown {
        for entry in &leaderboard.entries {
            println!("\n{} ({} pts)", entry.participant.name, entry.total_points);
            let report = service.participant_report(&tournament.id, &entry.participant.id)?;
            for scored in report {
                let pick = scored
                    .prediction
                    .forecast
                    .winner()
                    .map_or("none", |winner| winner.label());
                println!(
                    "  - {} [picked {pick}]: {:+} (winner {:+}, half time {:+}, full time {:+})",
                    scored
                        .fixture
                        .name
                        .as_deref()
                        .unwrap_or(scored.fixture.id.as_str()),
                    scored.points.total,
                    scored.points.winner_points(),
                    scored.points.half_time_exact + scored.points.half_time_goals_malus,
                    scored.points.full_time_exact + scored.points.full_time_goals_malus,
                );
            }
        }
    }

    Ok(())
}

fn describe_outcome(outcome: &Outcome) -> String {
    let mut parts = Vec::new();
    if let Some(full_time) = outcome.full_time {
        parts.push(full_time.to_string());
    }
    if let Some(half_time) = outcome.half_time {
        parts.push(format!("half time {half_time}"));
    }
    if let Some(penalties) = outcome.after_penalties {
        parts.push(format!("penalties {penalties}"));
    }
    parts.join(", ")
}

fn render_leaderboard(leaderboard: &Leaderboard) {
    println!(
        "Leaderboard for {} ({})",
        leaderboard.tournament.name,
        leaderboard.tournament.status.label()
    );
    if leaderboard.entries.is_empty() {
        println!("- No participants registered yet");
        return;
    }
    for entry in &leaderboard.entries {
        println!(
            "{:>3}. {:<20} {:>4} pts | {} of {} predictions scored",
            entry.position,
            entry.participant.name,
            entry.total_points,
            entry.scored,
            entry.predictions
        );
    }
}

fn render_import_summary(summary: &ImportSummary) {
    println!("Results import");
    println!(
        "- {} matches recorded | {} predictions scored",
        summary.recorded.len(),
        summary.predictions_scored
    );
    let skipped = [
        ("already finished", &summary.already_finished),
        ("unknown match", &summary.unknown_matches),
        ("rejected", &summary.rejected),
    ];
    for (reason, ids) in skipped {
        if ids.is_empty() {
            continue;
        }
        let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        println!("- skipped ({reason}): {}", ids.join(", "));
    }
}

use crate::infra::{deserialize_answers, ConfiguredSource, InMemoryProfileRepository};
use clap::Args;
use risk_advisor::config::AdvisorConfig;
use risk_advisor::error::AppError;
use risk_advisor::workflows::profiling::{
    build_proposal, evaluate_answers, AnswerSheet, InstrumentSource, InvestmentProposal,
    ProfileEvaluation, ProfileServiceError, ProposalError, RiskProfileService, ScoringEngine,
    SubjectId,
};
use serde::Deserialize;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct AnswerInput {
    /// Questionnaire answer as KEY=VALUE (repeatable)
    #[arg(long, value_parser = crate::infra::parse_answer)]
    pub(crate) answer: Vec<(String, String)>,
    /// JSON object of answers; `--answer` values take precedence
    #[arg(long)]
    pub(crate) answers_file: Option<PathBuf>,
}

impl AnswerInput {
    fn answer_sheet(&self) -> Result<AnswerSheet, AppError> {
        let mut answers = match &self.answers_file {
            Some(path) => {
                let AnswerFile(answers) = serde_json::from_reader(File::open(path)?)?;
                answers
            }
            None => AnswerSheet::new(),
        };
        answers.extend(self.answer.iter().cloned());
        Ok(answers)
    }
}

#[derive(Deserialize)]
struct AnswerFile(#[serde(deserialize_with = "deserialize_answers")] AnswerSheet);

#[derive(Args, Debug, Default)]
pub(crate) struct ScoringOverrides {
    /// Weight table JSON (overrides ADVISOR_WEIGHTS_PATH)
    #[arg(long)]
    pub(crate) weights: Option<PathBuf>,
    /// Archetype directory JSON (overrides ADVISOR_ARCHETYPES_PATH)
    #[arg(long)]
    pub(crate) archetypes: Option<PathBuf>,
}

impl ScoringOverrides {
    fn advisor_config(&self) -> AdvisorConfig {
        let mut advisor = AdvisorConfig::load();
        if let Some(path) = &self.weights {
            advisor.weights_path = Some(path.clone());
        }
        if let Some(path) = &self.archetypes {
            advisor.archetypes_path = Some(path.clone());
        }
        advisor
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    #[command(flatten)]
    pub(crate) input: AnswerInput,
    #[command(flatten)]
    pub(crate) scoring: ScoringOverrides,
    /// Print the evaluation as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ProposeArgs {
    #[command(flatten)]
    pub(crate) input: AnswerInput,
    #[command(flatten)]
    pub(crate) scoring: ScoringOverrides,
    /// Holdings CSV export (overrides ADVISOR_HOLDINGS_PATH)
    #[arg(long)]
    pub(crate) holdings: Option<PathBuf>,
    /// Print the proposal as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    #[command(flatten)]
    pub(crate) scoring: ScoringOverrides,
    /// Holdings CSV export to propose against (defaults to the built-in universe)
    #[arg(long)]
    pub(crate) holdings: Option<PathBuf>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let advisor = args.scoring.advisor_config();
    let engine = ScoringEngine::new(advisor.weight_table()?);
    let directory = advisor.archetype_directory()?;
    let answers = args.input.answer_sheet()?;

    let evaluation =
        evaluate_answers(&engine, &directory, &answers).map_err(ProfileServiceError::from)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
    } else {
        render_evaluation(&evaluation);
    }
    Ok(())
}

pub(crate) fn run_propose(args: ProposeArgs) -> Result<(), AppError> {
    let advisor = args.scoring.advisor_config();
    let engine = ScoringEngine::new(advisor.weight_table()?);
    let directory = advisor.archetype_directory()?;
    let answers = args.input.answer_sheet()?;
    let source = ConfiguredSource::from_path(args.holdings.or(advisor.holdings_path));

    let evaluation =
        evaluate_answers(&engine, &directory, &answers).map_err(ProfileServiceError::from)?;
    let universe = source.universe().map_err(ProfileServiceError::from)?;
    let proposal = build_proposal(evaluation.archetype.as_ref(), &universe)
        .map_err(ProfileServiceError::from)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&proposal)?);
    } else {
        render_evaluation(&evaluation);
        println!("Universe: {}", source.describe());
        render_proposal(&proposal);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let advisor = args.scoring.advisor_config();
    let source = ConfiguredSource::from_path(args.holdings.or(advisor.holdings_path.clone()));
    let service = RiskProfileService::new(
        ScoringEngine::new(advisor.weight_table()?),
        advisor.archetype_directory()?,
        Arc::new(InMemoryProfileRepository::default()),
        Arc::new(source.clone()),
    );

    println!("Risk advisor demo");
    println!("Universe: {}", source.describe());

    for (subject, answers) in scripted_clients() {
        let subject = SubjectId(subject.to_string());
        let assessment = service.assess(subject.clone(), &answers)?;

        println!("\n== {subject} ==");
        render_evaluation(&assessment.evaluation);

        match service.propose(&subject) {
            Ok(proposal) => render_proposal(&proposal),
            Err(ProfileServiceError::Proposal(ProposalError::MissingArchetype)) => {
                println!("No proposal: score falls outside every archetype band");
            }
            Err(other) => return Err(other.into()),
        }
    }

    Ok(())
}

const QUESTIONS: [&str; 7] = [
    "investment_horizon",
    "risk_tolerance",
    "loss_reaction",
    "investment_experience",
    "income_stability",
    "liquidity_needs",
    "age_band",
];

fn uniform_answers(value: &str) -> AnswerSheet {
    QUESTIONS
        .iter()
        .map(|key| (key.to_string(), value.to_string()))
        .collect()
}

fn scripted_clients() -> Vec<(&'static str, AnswerSheet)> {
    let mut balanced = uniform_answers("2");
    balanced.insert("risk_tolerance".to_string(), "4".to_string());
    balanced.insert("client_name".to_string(), "Balanced Example".to_string());

    vec![
        ("client-cautious", uniform_answers("1")),
        ("client-steady", uniform_answers("2")),
        ("client-balanced", balanced),
        ("client-bold", uniform_answers("4")),
        ("client-off-scale", uniform_answers("9")),
    ]
}

fn render_evaluation(evaluation: &ProfileEvaluation) {
    println!("Risk score: {:.2}", evaluation.risk_score());
    match &evaluation.archetype {
        Some(archetype) => println!(
            "Archetype: {} [{:.2}, {:.2})",
            archetype.name, archetype.min_score, archetype.max_score
        ),
        None => println!("Archetype: none (unmatched)"),
    }
    for component in &evaluation.outcome.components {
        println!(
            "  - {}: {} x {:.2} = {:.3}",
            component.question_key, component.value, component.weight, component.contribution
        );
    }
    if !evaluation.outcome.unscored_keys.is_empty() {
        println!(
            "Unscored answers: {}",
            evaluation.outcome.unscored_keys.join(", ")
        );
    }
}

fn render_proposal(proposal: &InvestmentProposal) {
    println!(
        "Proposal: {} ({})",
        proposal.archetype_name, proposal.archetype_id
    );
    println!(
        "  {:<10} {:>5} {:>10} {:>8} {:>9}",
        "Bucket", "Count", "Avg yield", "Target", "Realized"
    );
    for bucket in &proposal.buckets {
        println!(
            "  {:<10} {:>5} {:>9.2}% {:>7.1}% {:>8.1}%",
            bucket.name,
            bucket.count,
            bucket.avg_yield,
            bucket.target_percentage,
            bucket.realized_percentage
        );
    }
    println!(
        "  Total bonds: {} | Expected yield: {:.2}%",
        proposal.total_bonds, proposal.expected_yield
    );
}

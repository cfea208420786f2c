use crate::infra::{deserialize_answers, AppState};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use risk_advisor::error::AppError;
use risk_advisor::workflows::profiling::{
    AnswerSheet, ArchetypeRecord, Instrument, InstrumentSource, InvestmentProposal,
    ProfileEvaluation, ProfileRecord, ProfileRepository, RiskAssessment, RiskProfileService,
    ScoreComponent, SubjectId,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct AssessmentRequest {
    #[serde(deserialize_with = "deserialize_answers")]
    pub(crate) answers: AnswerSheet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProposalPreviewRequest {
    #[serde(deserialize_with = "deserialize_answers")]
    pub(crate) answers: AnswerSheet,
    #[serde(default)]
    pub(crate) universe: Vec<Instrument>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ArchetypeSummary {
    pub(crate) id: String,
    pub(crate) name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct EvaluationView {
    pub(crate) risk_score: f64,
    pub(crate) status: &'static str,
    pub(crate) archetype: Option<ArchetypeSummary>,
    pub(crate) components: Vec<ScoreComponent>,
    pub(crate) unscored_keys: Vec<String>,
}

impl From<ProfileEvaluation> for EvaluationView {
    fn from(evaluation: ProfileEvaluation) -> Self {
        Self {
            risk_score: evaluation.outcome.risk_score,
            status: if evaluation.archetype.is_some() {
                "matched"
            } else {
                "unmatched"
            },
            archetype: evaluation.archetype.map(|archetype| ArchetypeSummary {
                id: archetype.id,
                name: archetype.name,
            }),
            components: evaluation.outcome.components,
            unscored_keys: evaluation.outcome.unscored_keys,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AssessmentResponse {
    pub(crate) subject_id: SubjectId,
    pub(crate) assessed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub(crate) evaluation: EvaluationView,
}

impl From<RiskAssessment> for AssessmentResponse {
    fn from(assessment: RiskAssessment) -> Self {
        Self {
            subject_id: assessment.subject_id,
            assessed_at: assessment.assessed_at,
            evaluation: assessment.evaluation.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ProfileView {
    pub(crate) subject_id: SubjectId,
    pub(crate) risk_score: f64,
    pub(crate) status: &'static str,
    pub(crate) archetype_id: Option<String>,
    pub(crate) assessed_at: DateTime<Utc>,
}

impl From<ProfileRecord> for ProfileView {
    fn from(record: ProfileRecord) -> Self {
        Self {
            status: record.status_label(),
            subject_id: record.subject_id,
            risk_score: record.risk_score,
            archetype_id: record.archetype_id,
            assessed_at: record.assessed_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ProposalPreviewResponse {
    pub(crate) evaluation: EvaluationView,
    pub(crate) proposal: InvestmentProposal,
}

/// Profile endpoints plus the operational routes.
pub(crate) fn profile_router<R, S>(service: Arc<RiskProfileService<R, S>>) -> Router
where
    R: ProfileRepository + 'static,
    S: InstrumentSource + 'static,
{
    Router::new()
        .route("/api/v1/archetypes", get(archetypes_handler::<R, S>))
        .route(
            "/api/v1/profiles/:subject_id",
            get(profile_handler::<R, S>),
        )
        .route(
            "/api/v1/profiles/:subject_id/assessment",
            post(assessment_handler::<R, S>),
        )
        .route(
            "/api/v1/profiles/:subject_id/proposal",
            post(proposal_handler::<R, S>),
        )
        .route("/api/v1/proposals", post(preview_handler::<R, S>))
        .with_state(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn assessment_handler<R, S>(
    State(service): State<Arc<RiskProfileService<R, S>>>,
    Path(subject_id): Path<String>,
    Json(request): Json<AssessmentRequest>,
) -> Result<Json<AssessmentResponse>, AppError>
where
    R: ProfileRepository + 'static,
    S: InstrumentSource + 'static,
{
    let assessment = service.assess(SubjectId(subject_id), &request.answers)?;
    Ok(Json(assessment.into()))
}

pub(crate) async fn profile_handler<R, S>(
    State(service): State<Arc<RiskProfileService<R, S>>>,
    Path(subject_id): Path<String>,
) -> Result<Json<ProfileView>, AppError>
where
    R: ProfileRepository + 'static,
    S: InstrumentSource + 'static,
{
    let record = service.get(&SubjectId(subject_id))?;
    Ok(Json(record.into()))
}

pub(crate) async fn proposal_handler<R, S>(
    State(service): State<Arc<RiskProfileService<R, S>>>,
    Path(subject_id): Path<String>,
) -> Result<Json<InvestmentProposal>, AppError>
where
    R: ProfileRepository + 'static,
    S: InstrumentSource + 'static,
{
    let proposal = service.propose(&SubjectId(subject_id))?;
    Ok(Json(proposal))
}

pub(crate) async fn preview_handler<R, S>(
    State(service): State<Arc<RiskProfileService<R, S>>>,
    Json(request): Json<ProposalPreviewRequest>,
) -> Result<Json<ProposalPreviewResponse>, AppError>
where
    R: ProfileRepository + 'static,
    S: InstrumentSource + 'static,
{
    let (evaluation, proposal) = service.preview(&request.answers, &request.universe)?;
    Ok(Json(ProposalPreviewResponse {
        evaluation: evaluation.into(),
        proposal,
    }))
}

pub(crate) async fn archetypes_handler<R, S>(
    State(service): State<Arc<RiskProfileService<R, S>>>,
) -> Json<Vec<ArchetypeRecord>>
where
    R: ProfileRepository + 'static,
    S: InstrumentSource + 'static,
{
    let records = service
        .directory()
        .archetypes()
        .iter()
        .map(ArchetypeRecord::from)
        .collect();
    Json(records)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

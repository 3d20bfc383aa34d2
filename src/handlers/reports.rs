//! Report endpoints: computed result/merit/behavior data as JSON, plus the
//! printable HTML renditions.

use axum::extract::{Path, Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;

use crate::entities::{academic_year, class_config, exam, student};
use crate::errors::ServiceError;
use crate::services::printing;
use crate::services::results::{self, BehaviorSheet, ClassResults, StudentResult};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/result-sheet", get(result_sheet))
        .route("/reports/result-sheet/print", get(result_sheet_print))
        .route("/reports/merit-list", get(merit_list))
        .route("/reports/merit-list/print", get(merit_list_print))
        .route("/reports/mark-sheet/:student_id", get(mark_sheet))
        .route("/reports/behavior-sheet", get(behavior_sheet))
        .route("/reports/behavior-sheet/print", get(behavior_sheet_print))
        .route("/reports/admit-cards/print", get(admit_cards_print))
        .route("/reports/seat-plan/print", get(seat_plan_print))
}

/// Every report is parameterized by an exam/class cohort.
#[derive(Debug, Deserialize)]
pub struct CohortParams {
    pub exam_id: i64,
    pub class_config_id: i64,
}

pub async fn result_sheet(
    State(state): State<AppState>,
    Query(params): Query<CohortParams>,
) -> Result<Json<ClassResults>, ServiceError> {
    let sheet =
        results::class_results(state.db.as_ref(), params.exam_id, params.class_config_id).await?;
    Ok(Json(sheet))
}

pub async fn merit_list(
    State(state): State<AppState>,
    Query(params): Query<CohortParams>,
) -> Result<Json<ClassResults>, ServiceError> {
    let mut sheet =
        results::class_results(state.db.as_ref(), params.exam_id, params.class_config_id).await?;
    sheet.results.sort_by_key(|r| r.merit_position);
    Ok(Json(sheet))
}

pub async fn mark_sheet(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
    Query(params): Query<CohortParams>,
) -> Result<Json<StudentResult>, ServiceError> {
    let result = results::student_mark_sheet(
        state.db.as_ref(),
        params.exam_id,
        params.class_config_id,
        student_id,
    )
    .await?;
    Ok(Json(result))
}

pub async fn behavior_sheet(
    State(state): State<AppState>,
    Query(params): Query<CohortParams>,
) -> Result<Json<BehaviorSheet>, ServiceError> {
    let sheet =
        results::behavior_sheet(state.db.as_ref(), params.exam_id, params.class_config_id).await?;
    Ok(Json(sheet))
}

pub async fn result_sheet_print(
    State(state): State<AppState>,
    Query(params): Query<CohortParams>,
) -> Result<Html<String>, ServiceError> {
    let sheet =
        results::class_results(state.db.as_ref(), params.exam_id, params.class_config_id).await?;
    Ok(Html(printing::result_sheet_document(
        &state.config.school_name,
        &sheet,
    )))
}

pub async fn merit_list_print(
    State(state): State<AppState>,
    Query(params): Query<CohortParams>,
) -> Result<Html<String>, ServiceError> {
    let sheet =
        results::class_results(state.db.as_ref(), params.exam_id, params.class_config_id).await?;
    Ok(Html(printing::merit_list_document(
        &state.config.school_name,
        &sheet,
    )))
}

pub async fn behavior_sheet_print(
    State(state): State<AppState>,
    Query(params): Query<CohortParams>,
) -> Result<Html<String>, ServiceError> {
    let sheet =
        results::behavior_sheet(state.db.as_ref(), params.exam_id, params.class_config_id).await?;
    Ok(Html(printing::behavior_sheet_document(
        &state.config.school_name,
        &sheet,
    )))
}

/// Exam, class, roll-ordered students, and the exam's year label.
async fn load_cohort(
    state: &AppState,
    params: &CohortParams,
) -> Result<
    (
        exam::Model,
        class_config::Model,
        Vec<student::Model>,
        String,
    ),
    ServiceError,
> {
    let exam = exam::Entity::find_by_id(params.exam_id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Exam {} not found", params.exam_id)))?;

    let class = class_config::Entity::find_by_id(params.class_config_id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("Class config {} not found", params.class_config_id))
        })?;

    let students = student::Entity::find()
        .filter(student::Column::ClassConfigId.eq(params.class_config_id))
        .order_by_asc(student::Column::RollNo)
        .all(state.db.as_ref())
        .await?;

    let year_label = academic_year::Entity::find_by_id(exam.academic_year_id)
        .one(state.db.as_ref())
        .await?
        .map(|y| y.year)
        .unwrap_or_default();

    Ok((exam, class, students, year_label))
}

pub async fn admit_cards_print(
    State(state): State<AppState>,
    Query(params): Query<CohortParams>,
) -> Result<Html<String>, ServiceError> {
    let (exam, class, students, year_label) = load_cohort(&state, &params).await?;
    Ok(Html(printing::admit_cards_document(
        &state.config.school_name,
        &year_label,
        &exam,
        &class,
        &students,
    )))
}

pub async fn seat_plan_print(
    State(state): State<AppState>,
    Query(params): Query<CohortParams>,
) -> Result<Html<String>, ServiceError> {
    let (exam, class, students, _) = load_cohort(&state, &params).await?;
    Ok(Html(printing::seat_plan_document(
        &state.config.school_name,
        &exam,
        &class,
        &students,
    )))
}

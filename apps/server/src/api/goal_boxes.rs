use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use caixinha_core::{
    accounts::{AccountServiceTrait, GoalBoxSummary},
    Account, GoalCategory,
};

use crate::{
    auth::AuthSession,
    error::ApiResult,
    main_lib::AppState,
    models::{GoalCategoryInfo, NewGoalBox},
};

async fn list_goal_boxes(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
) -> ApiResult<Json<Vec<GoalBoxSummary>>> {
    let boxes = state
        .account_service
        .list_goal_boxes_by_user(&session.username)?;
    Ok(Json(boxes))
}

async fn list_categories() -> Json<Vec<GoalCategoryInfo>> {
    Json(GoalCategory::ALL.into_iter().map(Into::into).collect())
}

async fn create_goal_box(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
    Json(body): Json<NewGoalBox>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    let category = body.category()?;
    let account = state
        .account_service
        .create_goal_box(&session.username, category)
        .await?;
    Ok((StatusCode::CREATED, Json(account)))
}

async fn delete_goal_box(
    Path(number): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
) -> ApiResult<StatusCode> {
    state
        .account_service
        .delete_goal_box(&session.username, &number)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/goal-boxes", get(list_goal_boxes).post(create_goal_box))
        .route("/goal-boxes/categories", get(list_categories))
        .route("/goal-boxes/{number}", delete(delete_goal_box))
}

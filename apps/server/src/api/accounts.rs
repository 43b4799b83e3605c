use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Html,
    routing::{get, post},
    Extension, Json, Router,
};
use caixinha_core::{
    accounts::{checked_total, AccountServiceTrait, AccountSummary},
    reports::render_account_summary,
    users::UserServiceTrait,
    Account, Error as CoreError,
};

use crate::{
    auth::AuthSession,
    error::ApiResult,
    main_lib::AppState,
    models::{AmountRequest, Profile},
};

async fn me(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
) -> ApiResult<Json<Profile>> {
    let user = state.user_service.get_user(&session.username)?;
    let accounts = state.account_service.list_by_user(&session.username)?;
    let goal_boxes = state
        .account_service
        .list_goal_boxes_by_user(&session.username)?;
    let total_balance = checked_total(
        &user.display_name,
        accounts
            .iter()
            .map(|a| a.balance)
            .chain(goal_boxes.iter().map(|b| b.balance)),
    )
    .map_err(CoreError::from)?;
    Ok(Json(Profile {
        user,
        accounts,
        goal_boxes,
        total_balance,
        withdrawal_limit: Account::withdrawal_limit(),
    }))
}

async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
) -> ApiResult<Json<Vec<AccountSummary>>> {
    let accounts = state.account_service.list_by_user(&session.username)?;
    Ok(Json(accounts))
}

async fn get_account(
    Path(number): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
) -> ApiResult<Json<Account>> {
    let account = state
        .account_service
        .get_owned_account(&session.username, &number)?;
    Ok(Json(account))
}

async fn account_report(
    Path(number): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
) -> ApiResult<Html<String>> {
    let account = state
        .account_service
        .get_owned_account(&session.username, &number)?;
    Ok(Html(render_account_summary(&account)))
}

async fn deposit(
    Path(number): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
    Json(body): Json<AmountRequest>,
) -> ApiResult<Json<Account>> {
    let account = state
        .account_service
        .deposit(&session.username, &number, body.amount)
        .await?;
    Ok(Json(account))
}

async fn withdraw(
    Path(number): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
    Json(body): Json<AmountRequest>,
) -> ApiResult<Json<Account>> {
    let account = state
        .account_service
        .withdraw(&session.username, &number, body.amount)
        .await?;
    Ok(Json(account))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(me))
        .route("/accounts", get(list_accounts))
        .route("/accounts/{number}", get(get_account))
        .route("/accounts/{number}/report", get(account_report))
        .route("/accounts/{number}/deposit", post(deposit))
        .route("/accounts/{number}/withdraw", post(withdraw))
}

//! Form endpoint behind the dashboard page.
//!
//! Accepts `application/x-www-form-urlencoded` posts whose `action` field
//! picks the operation, and always answers with a [`FormOutcome`].

use std::sync::Arc;

use axum::{
    extract::{RawForm, State},
    http::StatusCode,
    routing::post,
    Extension, Json, Router,
};
use caixinha_core::accounts::AccountServiceTrait;
use serde::Deserialize;

use crate::{
    auth::AuthSession,
    error::ApiError,
    main_lib::AppState,
    models::{parse_amount, parse_goal_category, FormOutcome},
};

#[derive(Deserialize, Debug, PartialEq)]
#[serde(tag = "action")]
enum DashboardAction {
    #[serde(rename = "depositar", alias = "deposit")]
    Deposit {
        #[serde(alias = "accountNumber")]
        numero: String,
        #[serde(alias = "amount")]
        valor: String,
    },
    #[serde(rename = "sacar", alias = "withdraw")]
    Withdraw {
        #[serde(alias = "accountNumber")]
        numero: String,
        #[serde(alias = "amount")]
        valor: String,
    },
    #[serde(rename = "criar_caixinha", alias = "create_goal_box")]
    CreateGoalBox {
        #[serde(alias = "goalType")]
        tipo_caixinha: String,
    },
    #[serde(rename = "excluir_caixinha", alias = "delete_goal_box")]
    DeleteGoalBox {
        #[serde(alias = "accountNumber")]
        numero: String,
    },
}

fn parse_action(body: &[u8]) -> Result<DashboardAction, ApiError> {
    serde_urlencoded::from_bytes(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid dashboard action: {e}")))
}

async fn perform(
    state: &AppState,
    username: &str,
    action: DashboardAction,
) -> Result<String, ApiError> {
    let accounts = &state.account_service;
    match action {
        DashboardAction::Deposit { numero, valor } => {
            accounts
                .deposit(username, &numero, parse_amount(&valor)?)
                .await?;
            Ok("Depósito realizado!".to_string())
        }
        DashboardAction::Withdraw { numero, valor } => {
            accounts
                .withdraw(username, &numero, parse_amount(&valor)?)
                .await?;
            Ok("Saque realizado!".to_string())
        }
        DashboardAction::CreateGoalBox { tipo_caixinha } => {
            let category = parse_goal_category(&tipo_caixinha)?;
            accounts.create_goal_box(username, category).await?;
            Ok("Caixinha criada com sucesso!".to_string())
        }
        DashboardAction::DeleteGoalBox { numero } => {
            accounts.delete_goal_box(username, &numero).await?;
            Ok("Caixinha excluída com sucesso!".to_string())
        }
    }
}

async fn submit(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
    RawForm(body): RawForm,
) -> (StatusCode, Json<FormOutcome>) {
    let result = match parse_action(&body) {
        Ok(action) => perform(&state, &session.username, action).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(message) => (StatusCode::OK, Json(FormOutcome::ok(message))),
        Err(err) => (err.status(), Json(FormOutcome::failed(err.public_message()))),
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/dashboard", post(submit))
}

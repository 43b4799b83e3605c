use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Router,
};
use caixinha_core::{
    accounts::AccountServiceTrait,
    reports::{self, ReportFormat},
};

use crate::{auth::AuthSession, error::ApiResult, main_lib::AppState, models::ExportQuery};

async fn export_report(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
    Query(query): Query<ExportQuery>,
) -> ApiResult<Response> {
    let format = match query.format.as_deref() {
        Some(raw) => raw.parse::<ReportFormat>()?,
        None => ReportFormat::Csv,
    };
    let data = state.account_service.report_for_user(&session.username)?;
    let body = reports::render(format, &data)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        format.filename(&data.generated_at)
    );
    tracing::info!(
        "Exported {} report for '{}'",
        format.extension(),
        session.username
    );
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/reports/export", get(export_report))
}

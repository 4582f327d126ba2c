use std::sync::Arc;

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use reports::{export_csv, render_view, ExportError, RankMode, ViewFilter};
use shared_types::{ErrorResponse, GeneralReportQuery, GeneralReportResponse, ReportError};

use crate::helpers::auth_context::{AuthContext, EMAIL_HEADER, PASSWORD_HEADER};
use crate::jobs::{RefreshOutcome, ReportManager, ReportSnapshot};

fn auth_from_request(req: &HttpRequest) -> Option<AuthContext> {
    let header = |name: &str| req.headers().get(name).and_then(|v| v.to_str().ok());
    AuthContext::from_header_values(header(EMAIL_HEADER), header(PASSWORD_HEADER))
}

/// Credentials from the request, or the 401 to send when they are missing
fn require_auth(req: &HttpRequest) -> Result<AuthContext, HttpResponse> {
    auth_from_request(req).ok_or_else(|| report_error_response(&ReportError::NotAuthenticated))
}

pub fn report_error_response(err: &ReportError) -> HttpResponse {
    let body = ErrorResponse::from(err);
    match err {
        ReportError::NotAuthenticated | ReportError::Unauthorized(_) => {
            HttpResponse::Unauthorized().json(body)
        }
        ReportError::MembersUnavailable(_) => HttpResponse::BadGateway().json(body),
        ReportError::Aggregation(_) => HttpResponse::InternalServerError().json(body),
    }
}

pub fn export_error_response(err: &ExportError) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: err.to_string(),
        retryable: true,
    })
}

/// Either the snapshot to render, or the response to send instead
async fn snapshot_or_response(
    manager: &ReportManager,
    req: &HttpRequest,
) -> Result<Arc<ReportSnapshot>, HttpResponse> {
    let auth = require_auth(req)?;

    match manager.ensure_snapshot(auth).await {
        Ok(Some(snapshot)) => Ok(snapshot),
        Ok(None) => Err(HttpResponse::Accepted().json(manager.status().await)),
        Err(e) => Err(report_error_response(&e)),
    }
}

pub async fn get_general_report(
    manager: web::Data<Arc<ReportManager>>,
    query: web::Query<GeneralReportQuery>,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    let snapshot = match snapshot_or_response(&manager, &req).await {
        Ok(snapshot) => snapshot,
        Err(response) => return Ok(response),
    };

    let view = render_view(
        &snapshot.members,
        RankMode::from(&*query),
        &ViewFilter::from(&*query),
    );

    Ok(HttpResponse::Ok().json(GeneralReportResponse {
        members: view.owned_rows(),
        totals: view.totals,
        empty_state: view.empty_state,
        generated_at: snapshot.generated_at.to_rfc3339(),
        degraded_sources: snapshot.degraded_sources.clone(),
    }))
}

pub async fn export_general_report(
    manager: web::Data<Arc<ReportManager>>,
    query: web::Query<GeneralReportQuery>,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    let snapshot = match snapshot_or_response(&manager, &req).await {
        Ok(snapshot) => snapshot,
        Err(response) => return Ok(response),
    };

    let view = render_view(
        &snapshot.members,
        RankMode::from(&*query),
        &ViewFilter::from(&*query),
    );

    let export = match export_csv(&view.rows, Utc::now().date_naive()) {
        Ok(export) => export,
        Err(e) => {
            tracing::error!("General report export failed: {}", e);
            return Ok(export_error_response(&e));
        }
    };

    tracing::info!("Exported {} members to {}", view.rows.len(), export.filename);

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(export.filename)],
        })
        .body(export.content))
}

pub async fn refresh_general_report(
    manager: web::Data<Arc<ReportManager>>,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    let auth = match require_auth(&req) {
        Ok(auth) => auth,
        Err(response) => return Ok(response),
    };

    if manager.is_loading() {
        return Ok(HttpResponse::Conflict().json(manager.status().await));
    }

    let manager = manager.get_ref().clone();
    tokio::spawn(async move {
        match manager.refresh(Some(auth)).await {
            Ok(RefreshOutcome::Completed(snapshot)) => {
                tracing::debug!("Background refresh stored generation {}", snapshot.generation);
            }
            Ok(RefreshOutcome::AlreadyRunning) | Ok(RefreshOutcome::Discarded) => {}
            Err(e) => tracing::warn!("Background refresh failed: {}", e),
        }
    });

    Ok(HttpResponse::Accepted().json(serde_json::json!({ "status": "started" })))
}

pub async fn report_status(
    manager: web::Data<Arc<ReportManager>>,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(response) = require_auth(&req) {
        return Ok(response);
    }

    Ok(HttpResponse::Ok().json(manager.status().await))
}

pub async fn abandon_general_report(
    manager: web::Data<Arc<ReportManager>>,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(response) = require_auth(&req) {
        return Ok(response);
    }

    manager.abandon();
    Ok(HttpResponse::NoContent().finish())
}

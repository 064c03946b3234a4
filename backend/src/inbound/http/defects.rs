//! Defect handlers.
//!
//! ```text
//! GET /api/v1/defects
//! POST /api/v1/defects {"title":"Login fails","priority":"High","assignee":"engineer"}
//! GET /api/v1/defects/{id}
//! PUT /api/v1/defects/{id}/status {"status":"InProgress"}
//! GET /api/v1/stats
//! ```

use std::str::FromStr;

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{DefectDraft, DefectId, DefectStatus, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{DefectResponse, StatsResponse};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request payload for filing a defect.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDefectRequest {
    #[schema(example = "Login fails")]
    pub title: String,
    pub description: Option<String>,
    /// `Low`, `Medium`, or `High`; defaults to `Medium`.
    #[schema(example = "High")]
    pub priority: Option<String>,
    /// Username of an engineer. Honoured only for managers.
    #[schema(example = "engineer")]
    pub assignee: Option<String>,
}

impl From<CreateDefectRequest> for DefectDraft {
    fn from(value: CreateDefectRequest) -> Self {
        Self {
            title: value.title,
            description: value.description,
            priority: value.priority,
            assignee_username: value.assignee,
        }
    }
}

/// Request payload for changing a defect's status.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    /// `New`, `InProgress`, `InReview`, or `Closed`.
    #[schema(example = "InProgress")]
    pub status: String,
}

fn parse_status(raw: &str) -> Result<DefectStatus, Error> {
    DefectStatus::from_str(raw).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": "status",
            "value": raw,
            "code": "unknown_status",
        }))
    })
}

/// Path ids that cannot have been issued read as missing.
fn parse_defect_id(raw: i64) -> Result<DefectId, Error> {
    DefectId::new(raw).map_err(|_| Error::not_found(format!("defect {raw} not found")))
}

/// List every defect ordered by id.
#[utoipa::path(
    get,
    path = "/api/v1/defects",
    responses(
        (status = 200, description = "All defects", body = [DefectResponse]),
        (status = 401, description = "No session", body = ErrorSchema)
    ),
    tags = ["defects"],
    operation_id = "listDefects"
)]
#[get("/defects")]
pub async fn list_defects(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<DefectResponse>>> {
    state.require_actor(&session).await?;
    let defects = state.defects_query.list_all().await?;
    Ok(web::Json(
        defects.into_iter().map(DefectResponse::from).collect(),
    ))
}

/// File a new defect authored by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/defects",
    request_body = CreateDefectRequest,
    responses(
        (status = 201, description = "Defect created", body = DefectResponse),
        (status = 400, description = "Invalid title or priority", body = ErrorSchema),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 403, description = "Caller may not file defects", body = ErrorSchema)
    ),
    tags = ["defects"],
    operation_id = "createDefect"
)]
#[post("/defects")]
pub async fn create_defect(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateDefectRequest>,
) -> ApiResult<HttpResponse> {
    let actor = state.require_actor(&session).await?;
    let defect = state
        .defects_command
        .create(&actor, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(DefectResponse::from(defect)))
}

/// Fetch one defect.
#[utoipa::path(
    get,
    path = "/api/v1/defects/{id}",
    params(("id" = i64, Path, description = "Defect identifier")),
    responses(
        (status = 200, description = "Defect", body = DefectResponse),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 404, description = "Unknown defect", body = ErrorSchema)
    ),
    tags = ["defects"],
    operation_id = "getDefect"
)]
#[get("/defects/{id}")]
pub async fn get_defect(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<DefectResponse>> {
    state.require_actor(&session).await?;
    let id = parse_defect_id(path.into_inner())?;
    let defect = state.defects_query.get(id).await?;
    Ok(web::Json(DefectResponse::from(defect)))
}

/// Change a defect's status. Only the author or the assignee may do this.
#[utoipa::path(
    put,
    path = "/api/v1/defects/{id}/status",
    params(("id" = i64, Path, description = "Defect identifier")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated defect", body = DefectResponse),
        (status = 400, description = "Unknown status", body = ErrorSchema),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 403, description = "Caller is neither author nor assignee", body = ErrorSchema),
        (status = 404, description = "Unknown defect", body = ErrorSchema),
        (status = 409, description = "Participants changed during the update", body = ErrorSchema)
    ),
    tags = ["defects"],
    operation_id = "updateDefectStatus"
)]
#[put("/defects/{id}/status")]
pub async fn update_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<UpdateStatusRequest>,
) -> ApiResult<web::Json<DefectResponse>> {
    let actor = state.require_actor(&session).await?;
    let id = parse_defect_id(path.into_inner())?;
    let status = parse_status(&payload.status)?;
    let defect = state
        .defects_command
        .set_status(&actor, id, status)
        .await?;
    Ok(web::Json(DefectResponse::from(defect)))
}

/// Aggregate counts across all defects. Leaders only.
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    responses(
        (status = 200, description = "Defect statistics", body = StatsResponse),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 403, description = "Caller is not a leader", body = ErrorSchema)
    ),
    tags = ["stats"],
    operation_id = "defectStats"
)]
#[get("/stats")]
pub async fn stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<StatsResponse>> {
    let actor = state.require_actor(&session).await?;
    let stats = state.defects_query.stats(&actor).await?;
    Ok(web::Json(StatsResponse::from(stats)))
}

#[cfg(test)]
#[path = "defects_tests.rs"]
mod tests;

//! JSON response bodies shared by the users and defects handlers.
//!
//! Domain types carry no serde wire contract of their own; these DTOs fix the
//! camelCase shape clients see.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Defect, DefectStats, User, UserSummary};

/// Public view of an account. The password hash is never serialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "engineer")]
    pub username: String,
    /// One of `engineer`, `manager`, `leader`.
    #[schema(example = "engineer")]
    pub role: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            role: user.role().to_string(),
        }
    }
}

impl From<UserSummary> for UserResponse {
    fn from(summary: UserSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            username: summary.username.to_string(),
            role: summary.role.to_string(),
        }
    }
}

/// A tracked defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DefectResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Login fails")]
    pub title: String,
    pub description: Option<String>,
    /// One of `Low`, `Medium`, `High`.
    #[schema(example = "High")]
    pub priority: String,
    /// One of `New`, `InProgress`, `InReview`, `Closed`.
    #[schema(example = "New")]
    pub status: String,
    pub author: UserResponse,
    pub assignee: Option<UserResponse>,
    /// RFC 3339 creation timestamp.
    #[schema(example = "2026-03-01T09:30:00+00:00")]
    pub created_at: String,
}

impl From<Defect> for DefectResponse {
    fn from(defect: Defect) -> Self {
        Self {
            id: defect.id.get(),
            title: defect.title.as_ref().to_owned(),
            description: defect.description,
            priority: defect.priority.to_string(),
            status: defect.status.to_string(),
            author: defect.author.into(),
            assignee: defect.assignee.map(UserResponse::from),
            created_at: defect.created_at.to_rfc3339(),
        }
    }
}

/// Aggregate defect counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total: u64,
    pub unassigned: u64,
    /// Count per status, every status listed.
    pub by_status: Vec<StatusCountResponse>,
    /// Count per priority, every priority listed.
    pub by_priority: Vec<PriorityCountResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusCountResponse {
    #[schema(example = "InProgress")]
    pub status: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PriorityCountResponse {
    #[schema(example = "High")]
    pub priority: String,
    pub count: u64,
}

impl From<DefectStats> for StatsResponse {
    fn from(stats: DefectStats) -> Self {
        Self {
            total: stats.total,
            unassigned: stats.unassigned,
            by_status: stats
                .by_status
                .into_iter()
                .map(|entry| StatusCountResponse {
                    status: entry.status.to_string(),
                    count: entry.count,
                })
                .collect(),
            by_priority: stats
                .by_priority
                .into_iter()
                .map(|entry| PriorityCountResponse {
                    priority: entry.priority.to_string(),
                    count: entry.count,
                })
                .collect(),
        }
    }
}

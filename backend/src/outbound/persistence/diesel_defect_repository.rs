//! PostgreSQL-backed `DefectRepository` implementation using Diesel ORM.
//!
//! Defect rows reference users by id; reads hydrate the author and assignee
//! summaries with a second `users` query keyed by the referenced ids.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{DefectPersistenceError, DefectRepository};
use crate::domain::{
    Defect, DefectId, DefectStatus, DefectTitle, NewDefect, Priority, StatusUpdate, UserSummary,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_user_repository::row_to_user;
use super::models::{DefectRow, NewDefectRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{defects, users};

/// Diesel-backed implementation of the `DefectRepository` port.
#[derive(Clone)]
pub struct DieselDefectRepository {
    pool: DbPool,
}

impl DieselDefectRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DefectPersistenceError {
    map_basic_pool_error(error, |message| DefectPersistenceError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> DefectPersistenceError {
    map_basic_diesel_error(
        error,
        DefectPersistenceError::query,
        DefectPersistenceError::connection,
    )
}

fn corrupt(defect_id: i64, what: &str, detail: impl std::fmt::Display) -> DefectPersistenceError {
    warn!(defect_id, what, %detail, "stored defect is invalid");
    DefectPersistenceError::query(format!("stored defect {defect_id} has an invalid {what}"))
}

type Participants = HashMap<Uuid, UserSummary>;

fn participant(
    participants: &Participants,
    defect_id: i64,
    user_id: Uuid,
) -> Result<UserSummary, DefectPersistenceError> {
    participants
        .get(&user_id)
        .cloned()
        .ok_or_else(|| corrupt(defect_id, "user reference", user_id))
}

fn row_to_defect(
    row: DefectRow,
    participants: &Participants,
) -> Result<Defect, DefectPersistenceError> {
    let id = DefectId::new(row.id).map_err(|err| corrupt(row.id, "id", err))?;
    let title = DefectTitle::new(&row.title).map_err(|err| corrupt(row.id, "title", err))?;
    let priority: Priority = row
        .priority
        .parse()
        .map_err(|err| corrupt(row.id, "priority", err))?;
    let status: DefectStatus = row
        .status
        .parse()
        .map_err(|err| corrupt(row.id, "status", err))?;
    let author = participant(participants, row.id, row.author_id)?;
    let assignee = row
        .assignee_id
        .map(|assignee_id| participant(participants, row.id, assignee_id))
        .transpose()?;

    Ok(Defect {
        id,
        title,
        description: row.description,
        priority,
        status,
        author,
        assignee,
        created_at: row.created_at,
    })
}

/// Load the users referenced by `rows` and convert every row.
async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<DefectRow>,
) -> Result<Vec<Defect>, DefectPersistenceError> {
    let mut ids: Vec<Uuid> = rows
        .iter()
        .flat_map(|row| std::iter::once(row.author_id).chain(row.assignee_id))
        .collect();
    ids.sort_unstable();
    ids.dedup();

    let user_rows: Vec<UserRow> = if ids.is_empty() {
        Vec::new()
    } else {
        users::table
            .filter(users::id.eq_any(ids))
            .select(UserRow::as_select())
            .load(conn)
            .await
            .map_err(map_diesel_error)?
    };

    let mut participants = Participants::with_capacity(user_rows.len());
    for user_row in user_rows {
        let user = row_to_user(user_row)
            .map_err(|err| DefectPersistenceError::query(err.to_string()))?;
        participants.insert(*user.id().as_uuid(), UserSummary::from(&user));
    }

    rows.into_iter()
        .map(|row| row_to_defect(row, &participants))
        .collect()
}

async fn hydrate_one(
    conn: &mut AsyncPgConnection,
    row: Option<DefectRow>,
) -> Result<Option<Defect>, DefectPersistenceError> {
    let Some(row) = row else {
        return Ok(None);
    };
    Ok(hydrate(conn, vec![row]).await?.into_iter().next())
}

#[async_trait]
impl DefectRepository for DieselDefectRepository {
    async fn insert(&self, defect: &NewDefect) -> Result<Defect, DefectPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewDefectRow {
            title: defect.title.as_ref(),
            description: defect.description.as_deref(),
            priority: defect.priority.as_str(),
            status: defect.status.as_str(),
            author_id: *defect.author_id.as_uuid(),
            assignee_id: defect.assignee_id.map(|id| *id.as_uuid()),
            created_at: defect.created_at,
        };

        let stored: DefectRow = diesel::insert_into(defects::table)
            .values(&row)
            .returning(DefectRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        hydrate_one(&mut conn, Some(stored))
            .await?
            .ok_or_else(|| DefectPersistenceError::query("inserted defect could not be read back"))
    }

    async fn find_by_id(&self, id: DefectId) -> Result<Option<Defect>, DefectPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<DefectRow> = defects::table
            .filter(defects::id.eq(id.get()))
            .select(DefectRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        hydrate_one(&mut conn, row).await
    }

    async fn list_all(&self) -> Result<Vec<Defect>, DefectPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<DefectRow> = defects::table
            .order(defects::id.asc())
            .select(DefectRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        hydrate(&mut conn, rows).await
    }

    async fn update_status(
        &self,
        update: &StatusUpdate,
    ) -> Result<Option<Defect>, DefectPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Zero rows means the defect vanished or its participants moved on.
        let row: Option<DefectRow> = diesel::update(
            defects::table
                .filter(defects::id.eq(update.defect_id.get()))
                .filter(defects::author_id.eq(*update.expected_author.as_uuid()))
                .filter(
                    defects::assignee_id
                        .is_not_distinct_from(update.expected_assignee.map(|id| *id.as_uuid())),
                ),
        )
        .set(defects::status.eq(update.status.as_str()))
        .returning(DefectRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        hydrate_one(&mut conn, row).await
    }
}

//! In-process repositories used when no database is configured.
//!
//! State lives behind `std::sync::Mutex` and is lost on restart. The defect
//! store keeps user ids only and joins summaries from the user store on every
//! read, mirroring the relational adapter.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    DefectPersistenceError, DefectRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Defect, DefectId, NewDefect, Role, StatusUpdate, User, UserId, UserSummary, Username,
};

fn lock<'a, T, E>(
    mutex: &'a Mutex<T>,
    on_poison: impl FnOnce(&'static str) -> E,
) -> Result<MutexGuard<'a, T>, E> {
    mutex
        .lock()
        .map_err(|_| on_poison("in-memory store lock poisoned"))
}

/// Mutex-guarded user accounts.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl MemoryUserRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn summary(&self, id: &UserId) -> Result<Option<UserSummary>, UserPersistenceError> {
        let users = lock(&self.users, UserPersistenceError::query)?;
        Ok(users
            .iter()
            .find(|user| user.id() == id)
            .map(UserSummary::from))
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = lock(&self.users, UserPersistenceError::query)?;
        if users
            .iter()
            .any(|existing| existing.username() == user.username())
        {
            return Err(UserPersistenceError::duplicate_username(
                user.username().as_ref(),
            ));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let users = lock(&self.users, UserPersistenceError::query)?;
        Ok(users.iter().find(|user| user.id() == id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let users = lock(&self.users, UserPersistenceError::query)?;
        Ok(users
            .iter()
            .find(|user| user.username() == username)
            .cloned())
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserPersistenceError> {
        let users = lock(&self.users, UserPersistenceError::query)?;
        let mut matching: Vec<User> = users
            .iter()
            .filter(|user| user.role() == role)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.username().as_ref().cmp(b.username().as_ref()));
        Ok(matching)
    }
}

/// Stored defect row: participants by id only.
#[derive(Debug, Clone)]
struct DefectRecord {
    id: DefectId,
    fields: NewDefect,
}

#[derive(Default)]
struct DefectTable {
    next_id: i64,
    rows: Vec<DefectRecord>,
}

/// Mutex-guarded defects joined against a [`MemoryUserRepository`].
pub struct MemoryDefectRepository {
    users: Arc<MemoryUserRepository>,
    table: Mutex<DefectTable>,
}

impl MemoryDefectRepository {
    /// Create an empty store resolving participants through `users`.
    pub fn new(users: Arc<MemoryUserRepository>) -> Self {
        Self {
            users,
            table: Mutex::new(DefectTable::default()),
        }
    }

    fn participant(&self, id: &UserId) -> Result<UserSummary, DefectPersistenceError> {
        self.users
            .summary(id)
            .map_err(|err| DefectPersistenceError::query(err.to_string()))?
            .ok_or_else(|| DefectPersistenceError::query(format!("dangling user reference {id}")))
    }

    fn hydrate(&self, record: DefectRecord) -> Result<Defect, DefectPersistenceError> {
        let author = self.participant(&record.fields.author_id)?;
        let assignee = record
            .fields
            .assignee_id
            .as_ref()
            .map(|id| self.participant(id))
            .transpose()?;
        Ok(Defect {
            id: record.id,
            title: record.fields.title,
            description: record.fields.description,
            priority: record.fields.priority,
            status: record.fields.status,
            author,
            assignee,
            created_at: record.fields.created_at,
        })
    }

    fn snapshot(&self) -> Result<Vec<DefectRecord>, DefectPersistenceError> {
        Ok(lock(&self.table, DefectPersistenceError::query)?.rows.clone())
    }
}

#[async_trait]
impl DefectRepository for MemoryDefectRepository {
    async fn insert(&self, defect: &NewDefect) -> Result<Defect, DefectPersistenceError> {
        self.participant(&defect.author_id)?;
        if let Some(assignee) = &defect.assignee_id {
            self.participant(assignee)?;
        }
        let record = {
            let mut table = lock(&self.table, DefectPersistenceError::query)?;
            table.next_id += 1;
            let id = DefectId::new(table.next_id)
                .map_err(|err| DefectPersistenceError::query(err.to_string()))?;
            let record = DefectRecord {
                id,
                fields: defect.clone(),
            };
            table.rows.push(record.clone());
            record
        };
        self.hydrate(record)
    }

    async fn find_by_id(&self, id: DefectId) -> Result<Option<Defect>, DefectPersistenceError> {
        self.snapshot()?
            .into_iter()
            .find(|record| record.id == id)
            .map(|record| self.hydrate(record))
            .transpose()
    }

    async fn list_all(&self) -> Result<Vec<Defect>, DefectPersistenceError> {
        self.snapshot()?
            .into_iter()
            .map(|record| self.hydrate(record))
            .collect()
    }

    async fn update_status(
        &self,
        update: &StatusUpdate,
    ) -> Result<Option<Defect>, DefectPersistenceError> {
        let updated = {
            let mut table = lock(&self.table, DefectPersistenceError::query)?;
            table
                .rows
                .iter_mut()
                .find(|record| {
                    record.id == update.defect_id
                        && record.fields.author_id == update.expected_author
                        && record.fields.assignee_id == update.expected_assignee
                })
                .map(|record| {
                    record.fields.status = update.status;
                    record.clone()
                })
        };
        updated.map(|record| self.hydrate(record)).transpose()
    }
}

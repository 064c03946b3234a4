//! Defect records and their value types.
//!
//! A defect has a priority, a status, an immutable author, and an optional
//! engineer assignee. Status ordering is unconstrained: any status may follow
//! any other, and who may change it is decided by [`crate::domain::policy`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Role, User, UserId, Username};

/// Validation errors raised while building defect values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefectValidationError {
    InvalidId,
    EmptyTitle,
    TitleTooLong { max: usize },
    UnknownPriority { value: String },
    UnknownStatus { value: String },
}

impl fmt::Display for DefectValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "defect id must be a positive integer"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::UnknownPriority { value } => write!(
                f,
                "unknown priority '{value}'; expected Low, Medium, or High"
            ),
            Self::UnknownStatus { value } => write!(
                f,
                "unknown status '{value}'; expected New, InProgress, InReview, or Closed"
            ),
        }
    }
}

impl std::error::Error for DefectValidationError {}

/// Store-assigned defect identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct DefectId(i64);

impl DefectId {
    /// Validate a raw identifier; only positive values are issued by stores.
    pub fn new(raw: i64) -> Result<Self, DefectValidationError> {
        if raw <= 0 {
            return Err(DefectValidationError::InvalidId);
        }
        Ok(Self(raw))
    }

    /// Raw integer value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for DefectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<DefectId> for i64 {
    fn from(value: DefectId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for DefectId {
    type Error = DefectValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum title length in characters.
pub const TITLE_MAX: usize = 100;

/// Short summary of a defect: trimmed, non-empty, at most [`TITLE_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DefectTitle(String);

impl DefectTitle {
    /// Validate and construct a title.
    ///
    /// # Examples
    /// ```
    /// use defect_tracker::domain::DefectTitle;
    ///
    /// let title = DefectTitle::new("  Login fails ").expect("valid title");
    /// assert_eq!(title.as_ref(), "Login fails");
    /// assert!(DefectTitle::new("   ").is_err());
    /// ```
    pub fn new(title: impl AsRef<str>) -> Result<Self, DefectValidationError> {
        let trimmed = title.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DefectValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(DefectValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DefectTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<DefectTitle> for String {
    fn from(value: DefectTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for DefectTitle {
    type Error = DefectValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Normalise free-text descriptions: blank input is stored as absent.
pub fn normalise_description(raw: Option<String>) -> Option<String> {
    raw.filter(|text| !text.trim().is_empty())
}

fn normalise_token(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Defect priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Every priority, lowest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Wire and storage name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = DefectValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise_token(s).as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(DefectValidationError::UnknownPriority {
                value: s.to_owned(),
            }),
        }
    }
}

/// Defect workflow status. Any status may follow any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefectStatus {
    #[default]
    New,
    InProgress,
    InReview,
    Closed,
}

impl DefectStatus {
    /// Every status in workflow order.
    pub const ALL: [Self; 4] = [Self::New, Self::InProgress, Self::InReview, Self::Closed];

    /// Wire and storage name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::InProgress => "InProgress",
            Self::InReview => "InReview",
            Self::Closed => "Closed",
        }
    }
}

impl fmt::Display for DefectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DefectStatus {
    type Err = DefectValidationError;

    /// Case-insensitive; `_`, `-`, and spaces are ignored so `in_progress`
    /// and `In Review` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise_token(s).as_str() {
            "new" => Ok(Self::New),
            "inprogress" => Ok(Self::InProgress),
            "inreview" => Ok(Self::InReview),
            "closed" => Ok(Self::Closed),
            _ => Err(DefectValidationError::UnknownStatus {
                value: s.to_owned(),
            }),
        }
    }
}

/// Public identity of a defect participant (author or assignee).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: UserId,
    pub username: Username,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id(),
            username: user.username().clone(),
            role: user.role(),
        }
    }
}

/// A tracked defect.
///
/// ## Invariants
/// - `author` is set at creation and never changes.
/// - `assignee`, when present, has role engineer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defect {
    pub id: DefectId,
    pub title: DefectTitle,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: DefectStatus,
    pub author: UserSummary,
    pub assignee: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
}

impl Defect {
    /// Return `true` when `user_id` is the author or the assignee.
    pub fn involves(&self, user_id: &UserId) -> bool {
        self.author.id == *user_id
            || self
                .assignee
                .as_ref()
                .is_some_and(|assignee| assignee.id == *user_id)
    }

    /// Guard describing the participants observed when this defect was read.
    pub fn status_update(&self, status: DefectStatus) -> StatusUpdate {
        StatusUpdate {
            defect_id: self.id,
            status,
            expected_author: self.author.id,
            expected_assignee: self.assignee.as_ref().map(|assignee| assignee.id),
        }
    }
}

/// Unvalidated creation input as supplied by an inbound adapter.
///
/// Fields stay raw so validation can run after the permission check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefectDraft {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub assignee_username: Option<String>,
}

/// Validated record handed to the repository for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDefect {
    pub title: DefectTitle,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: DefectStatus,
    pub author_id: UserId,
    pub assignee_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// Conditional status write.
///
/// The write applies only while the defect still has the author and assignee
/// the permission check observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    pub defect_id: DefectId,
    pub status: DefectStatus,
    pub expected_author: UserId,
    pub expected_assignee: Option<UserId>,
}

impl StatusUpdate {
    /// Return `true` when `defect` still matches the observed participants.
    pub fn matches(&self, defect: &Defect) -> bool {
        defect.id == self.defect_id
            && defect.author.id == self.expected_author
            && defect.assignee.as_ref().map(|assignee| assignee.id) == self.expected_assignee
    }
}

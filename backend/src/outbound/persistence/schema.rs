//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// User accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login name.
        username -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        /// `engineer`, `manager`, or `leader`.
        role -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tracked defects. Rows are never deleted.
    defects (id) {
        /// Primary key assigned by a sequence.
        id -> Int8,
        /// Trimmed, non-empty title.
        title -> Varchar,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// `Low`, `Medium`, or `High`.
        priority -> Varchar,
        /// `New`, `InProgress`, `InReview`, or `Closed`.
        status -> Varchar,
        /// Immutable author reference.
        author_id -> Uuid,
        /// Optional engineer assignee.
        assignee_id -> Nullable<Uuid>,
        /// Creation timestamp supplied by the service clock.
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, defects);

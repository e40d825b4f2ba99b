//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly.

diesel::table! {
    /// Registered accounts and their password credentials.
    accounts (id) {
        id -> Uuid,
        /// Display name (max 64 characters).
        name -> Varchar,
        /// Lower-cased, unique login email.
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        /// One of `admin`, `editor`, `viewer`.
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per calendar day.
    ///
    /// `author_id` has no foreign key; records survive account deletion.
    checklists (id) {
        id -> Uuid,
        /// Unique per table (`checklists_checklist_date_key`).
        checklist_date -> Date,
        name -> Text,
        author_id -> Uuid,
        /// Every sub-section, serialised as one JSON object.
        sections -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(accounts, checklists);

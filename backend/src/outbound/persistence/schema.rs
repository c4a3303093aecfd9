//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (user_id) {
        user_id -> Uuid,
        first_name -> Varchar,
        last_name -> Varchar,
        /// Unique login key (`users_email_key`).
        email -> Varchar,
        phone -> Nullable<Varchar>,
        /// Argon2id PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    organisations (org_id) {
        org_id -> Uuid,
        name -> Varchar,
        description -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Many-to-many membership between users and organisations.
    organisation_members (org_id, user_id) {
        org_id -> Uuid,
        user_id -> Uuid,
        joined_at -> Timestamptz,
    }
}

diesel::joinable!(organisation_members -> organisations (org_id));
diesel::joinable!(organisation_members -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(organisation_members, organisations, users);

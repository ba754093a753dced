//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered members and their running experience total.
    users (id) {
        id -> Uuid,
        /// Lower-cased, unique.
        email -> Varchar,
        /// Unique.
        nickname -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        email_consent -> Bool,
        /// Never negative; written only with a ledger entry.
        total_experience -> Int4,
        /// Rank recorded by the last snapshot.
        previous_rank -> Nullable<Int4>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    questions (id) {
        id -> Uuid,
        author_id -> Uuid,
        title -> Varchar,
        body -> Text,
        /// `draft` or `published`.
        status -> Varchar,
        approve_count -> Int4,
        reject_count -> Int4,
        views -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Answers cascade with their question.
    answers (id) {
        id -> Uuid,
        question_id -> Uuid,
        author_id -> Uuid,
        body -> Text,
        approve_count -> Int4,
        reject_count -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Exactly one of `question_id` and `answer_id` is set. A voter holds at
    /// most one row per target.
    votes (id) {
        id -> Uuid,
        voter_id -> Uuid,
        question_id -> Nullable<Uuid>,
        answer_id -> Nullable<Uuid>,
        /// `approve` or `reject`.
        vote_type -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only experience ledger.
    experience_entries (id) {
        id -> Int8,
        user_id -> Uuid,
        change -> Int4,
        /// `question`, `answer`, or `approve_vote`.
        cause -> Varchar,
        recorded_at -> Timestamptz,
    }
}

diesel::table! {
    notifications (id) {
        id -> Uuid,
        recipient_id -> Uuid,
        question_id -> Uuid,
        answer_id -> Nullable<Uuid>,
        message -> Text,
        is_read -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    announcements (id) {
        id -> Uuid,
        title -> Varchar,
        content -> Text,
        is_visible -> Bool,
        views -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(questions -> users (author_id));
diesel::joinable!(answers -> questions (question_id));
diesel::joinable!(experience_entries -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    questions,
    answers,
    votes,
    experience_entries,
    notifications,
    announcements,
);

//! SQLite schema definition.

/// Schema for the client-local key/value store.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Local Storage
-- ============================================================================

CREATE TABLE IF NOT EXISTS local_storage (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

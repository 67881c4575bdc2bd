//! SQL DDL for initializing the database schema.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema includes:
/// - `dog_breeds` table (one (breed, sub_breed) per row)
/// - `metadata` table (string key/value, one row per key)
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Dog breeds
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS dog_breeds (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    breed TEXT NOT NULL,
    sub_breed TEXT NULL,
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL, -- RFC3339
    UNIQUE(breed, sub_breed)
);

-- UNIQUE treats NULLs as distinct, so bare breeds need their own index.
CREATE UNIQUE INDEX IF NOT EXISTS ux_dog_breeds_bare ON dog_breeds(breed) WHERE sub_breed IS NULL;

-- ---------------------------------------------------------------------------
-- Application metadata (e.g. the seed flag)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS metadata (
    meta_key TEXT PRIMARY KEY NOT NULL,
    meta_value TEXT NOT NULL
);
"#;

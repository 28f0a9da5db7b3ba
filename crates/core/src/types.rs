/// User primary keys are SQLite `INTEGER PRIMARY KEY` rowids.
pub type DbId = i64;

/// Sessions are keyed by a random UUID minted before the token is issued.
pub type SessionId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

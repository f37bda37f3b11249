use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of `import_batches`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BatchRecord {
    pub id: i64,
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

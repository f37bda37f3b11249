use serde::{Deserialize, Serialize};
use vinolab_common::{Features, WineClass};

use crate::features::shared::validation::{validate_sample, SampleValidationError};

/// One row of `wine`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SampleRecord {
    pub id: i64,
    pub alcohol: f64,
    pub malic_acid: f64,
    pub color_intensity: f64,
    pub target: i64,
    pub batch_id: Option<i64>,
}

/// Unvalidated sample fields as received from a client or a CSV row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleInput {
    #[serde(default)]
    pub alcohol: Option<f64>,
    #[serde(default)]
    pub malic_acid: Option<f64>,
    #[serde(default)]
    pub color_intensity: Option<f64>,
    #[serde(default)]
    pub target: Option<i64>,
}

impl SampleInput {
    pub fn new(alcohol: f64, malic_acid: f64, color_intensity: f64, target: i64) -> Self {
        Self {
            alcohol: Some(alcohol),
            malic_acid: Some(malic_acid),
            color_intensity: Some(color_intensity),
            target: Some(target),
        }
    }

    pub fn validate(&self) -> Result<ValidSample, SampleValidationError> {
        let (features, class) = validate_sample(
            self.alcohol,
            self.malic_acid,
            self.color_intensity,
            self.target,
        )?;
        Ok(ValidSample { features, class })
    }
}

/// Sample fields that passed validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidSample {
    pub features: Features,
    pub class: WineClass,
}

/// Insert one validated sample on the caller's connection
pub(crate) async fn insert_row(
    conn: &mut sqlx::SqliteConnection,
    sample: &ValidSample,
    batch_id: Option<i64>,
) -> Result<SampleRecord, sqlx::Error> {
    sqlx::query_as::<_, SampleRecord>(
        r#"
        INSERT INTO wine (alcohol, malic_acid, color_intensity, target, batch_id)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, alcohol, malic_acid, color_intensity, target, batch_id
        "#,
    )
    .bind(sample.features.alcohol)
    .bind(sample.features.malic_acid)
    .bind(sample.features.color_intensity)
    .bind(i64::from(sample.class))
    .bind(batch_id)
    .fetch_one(conn)
    .await
}

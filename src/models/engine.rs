use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Missing JSON fields decode as zero so that validation, not the decoder,
/// reports them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Engine {
    #[serde(rename = "engineId")]
    #[sqlx(rename = "id")]
    pub engine_id: Uuid,
    pub displacement: i64,
    #[serde(rename = "noOfCylinders")]
    pub no_of_cylinders: i64,
    #[serde(rename = "carRange")]
    pub car_range: i64,
}

impl Engine {
    pub fn from_request(engine_id: Uuid, req: &EngineRequest) -> Self {
        Self {
            engine_id,
            displacement: req.displacement,
            no_of_cylinders: req.no_of_cylinders,
            car_range: req.car_range,
        }
    }

    /// Engine reference carrying only the identifier; the numeric fields stay zero.
    pub fn reference(engine_id: Uuid) -> Self {
        Self {
            engine_id,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineRequest {
    pub displacement: i64,
    #[serde(rename = "noOfCylinders")]
    pub no_of_cylinders: i64,
    #[serde(rename = "carRange")]
    pub car_range: i64,
}

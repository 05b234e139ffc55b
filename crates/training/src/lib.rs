use serde::{Deserialize, Serialize};

mod run;
pub use run::*;
mod results;
pub use results::*;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BaseModel {
    /// Hosted quick-turnaround model; ignores the fine-tune parameters.
    NanoBanana,
    /// Fine-tuned on the user's own reference images.
    CustomLora,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TrainingParameters {
    pub epochs: u32,
    pub learning_rate: f64,
    pub batch_size: u32,
}

impl Default for TrainingParameters {
    fn default() -> Self {
        Self {
            epochs: 100,
            learning_rate: 1e-4,
            batch_size: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub model: BaseModel,
    pub parameters: TrainingParameters,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            model: BaseModel::NanoBanana,
            parameters: TrainingParameters::default(),
        }
    }
}

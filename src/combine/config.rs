//! Combiner configuration

use serde::{Deserialize, Serialize};

/// Options controlling a [`TreeCombiner`](super::TreeCombiner)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinerConfig {
    /// Re-validate the combined tree and panic if it is malformed.
    /// Defaults to on in debug builds.
    #[serde(default = "default_validate_output")]
    pub validate_output: bool,
}

fn default_validate_output() -> bool {
    cfg!(debug_assertions)
}

impl Default for CombinerConfig {
    fn default() -> Self {
        CombinerConfig {
            validate_output: default_validate_output(),
        }
    }
}

impl CombinerConfig {
    pub fn with_validate_output(mut self, validate_output: bool) -> Self {
        self.validate_output = validate_output;
        self
    }
}

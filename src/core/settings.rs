use std::{
    fs,
    path::PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};

use super::{
    models::FormDefinition,
    FormError,
};
use crate::persistence::load_json_or_default;

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub parse_url: String,
    pub save_url: String,
    pub request_timeout_secs: u64,
    /// JSON form definition replacing the built-in model card form.
    pub form_definition_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            parse_url: "http://localhost:5001/upload-for-form".to_string(),
            save_url: "http://localhost:5001/api/modelcard".to_string(),
            request_timeout_secs: 120,
            form_definition_file: None,
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        load_json_or_default(SETTINGS_FILE)
    }

    pub fn form_definition(&self) -> Result<FormDefinition, FormError> {
        let definition = match &self.form_definition_file {
            Some(path) => {
                let json = fs::read_to_string(path)?;
                serde_json::from_str::<FormDefinition>(&json)?
            }
            None => FormDefinition::model_card(),
        };
        definition.validate()?;
        Ok(definition)
    }
}

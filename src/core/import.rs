use std::collections::{
    BTreeSet,
    HashSet,
};

use serde_json::Value;

use super::{
    binder::FieldBinder,
    form::FormState,
    models::Record,
    records::{
        NavState,
        RecordStore,
    },
    sections::SectionTracker,
    ImportError,
    TransportError,
};
use crate::services::{
    extension_of,
    FileUpload,
    ParseService,
    RawResponse,
};

/// Extensions the parse service understands.
pub const ALLOWED_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls"];

/// What rendering one record did to the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Field ids that received a value, in record key order.
    pub bound: Vec<String>,
    /// Record keys that matched no field.
    pub unresolved: Vec<String>,
    pub open_sections: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Loaded { count: usize, report: RenderReport },
    /// The file parsed but held no data rows. Not an error.
    ParsedButEmpty,
}

/// Owns the imported records and renders the current one onto the form.
#[derive(Debug, Default)]
pub struct ImportController {
    store: RecordStore,
    binder: FieldBinder,
    in_flight: bool,
}

impl ImportController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub fn nav_state(&self) -> NavState {
        self.store.nav_state()
    }

    /// Checks the file choice and marks an import as in flight. Nothing else changes
    /// until `finish_import`.
    pub fn begin_import(&mut self, file: Option<FileUpload>) -> Result<FileUpload, ImportError> {
        let file = file.ok_or(ImportError::NoFileSelected)?;
        self.claim(&file.file_name)?;
        tracing::info!(file = %file.file_name, bytes = file.bytes.len(), "import started");
        Ok(file)
    }

    /// `begin_import` for a file that has not been read yet. Only the name is checked.
    pub fn claim(&mut self, file_name: &str) -> Result<(), ImportError> {
        if self.in_flight {
            return Err(ImportError::Busy);
        }

        let allowed = extension_of(file_name)
            .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false);
        if !allowed {
            return Err(ImportError::UnsupportedFileType(file_name.to_string()));
        }

        self.in_flight = true;
        Ok(())
    }

    /// Ends an in-flight import that never produced a parse reply.
    pub fn abort_import(&mut self) {
        self.in_flight = false;
    }

    /// Applies the parse service reply. On error the stored records and the form are
    /// left as they were.
    pub fn finish_import(
        &mut self,
        form: &mut FormState,
        response: Result<RawResponse, TransportError>,
    ) -> Result<ImportOutcome, ImportError> {
        self.in_flight = false;

        let response = response.map_err(|e| ImportError::UploadFailed(e.0))?;
        let records = interpret_upload_response(&response)?;

        if records.is_empty() {
            tracing::info!("import parsed but contained no records");
            self.store.clear();
            form.reset();
            return Ok(ImportOutcome::ParsedButEmpty);
        }

        let count = records.len();
        self.store.load(records)?;
        tracing::info!(count, "import loaded");
        let report = self.render(form);
        Ok(ImportOutcome::Loaded { count, report })
    }

    pub async fn import_file(
        &mut self,
        form: &mut FormState,
        parser: &dyn ParseService,
        file: Option<FileUpload>,
    ) -> Result<ImportOutcome, ImportError> {
        let file = self.begin_import(file)?;
        let response = parser.upload(&file).await;
        self.finish_import(form, response)
    }

    /// Shows the current record: close every section, reset the form, bind each key,
    /// then open the sections that received data.
    pub fn render(&self, form: &mut FormState) -> RenderReport {
        form.close_all_sections();
        form.reset();

        let Some(record) = self.store.current() else {
            return RenderReport::default();
        };

        let mut report = RenderReport::default();
        let mut bound = HashSet::new();
        for (key, value) in record.entries() {
            let field_id = match self.binder.resolve(form.definition(), key) {
                Some(field) => field.id().to_string(),
                None => {
                    tracing::warn!(key, "no form field matches imported key");
                    report.unresolved.push(key.to_string());
                    continue;
                }
            };
            form.set_value(&field_id, value);
            if bound.insert(field_id.clone()) {
                report.bound.push(field_id);
            }
        }

        report.open_sections = SectionTracker::apply(form, &bound);
        tracing::debug!(
            position = ?self.store.position_label(),
            bound = report.bound.len(),
            unresolved = report.unresolved.len(),
            "rendered record"
        );
        report
    }

    pub fn next(&mut self, form: &mut FormState) -> Option<RenderReport> {
        self.store.next().then(|| self.render(form))
    }

    pub fn prev(&mut self, form: &mut FormState) -> Option<RenderReport> {
        self.store.prev().then(|| self.render(form))
    }
}

/// Turns a parse service reply into records.
pub fn interpret_upload_response(response: &RawResponse) -> Result<Vec<Record>, ImportError> {
    if !response.is_success() {
        let message = response
            .message_field(&["error", "message", "detail"])
            .unwrap_or_else(|| format!("HTTP {}", response.status));
        return Err(ImportError::UploadFailed(message));
    }

    let value: Value = serde_json::from_str(&response.body)
        .map_err(|e| ImportError::FormatError(format!("invalid JSON: {e}")))?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(ImportError::FormatError(format!(
                "expected an array of records, got {}",
                kind(&other)
            )));
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(object) => record_from_object(i + 1, object),
            other => Err(ImportError::FormatError(format!(
                "record {} is {}, not an object",
                i + 1,
                kind(other)
            ))),
        })
        .collect()
}

fn record_from_object(
    row: usize,
    object: &serde_json::Map<String, Value>,
) -> Result<Record, ImportError> {
    let mut record = Record::new();
    for (key, value) in object {
        match value {
            Value::Null => {}
            Value::String(s) if s.is_empty() => {}
            Value::String(s) => record.insert(key.as_str(), s.as_str()),
            Value::Number(n) => record.insert(key.as_str(), n.to_string()),
            Value::Bool(b) => record.insert(key.as_str(), b.to_string()),
            Value::Array(_) | Value::Object(_) => {
                return Err(ImportError::FormatError(format!(
                    "field '{}' in record {} is not a flat value",
                    key, row
                )));
            }
        }
    }
    Ok(record)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

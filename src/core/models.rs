use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{
    Deserialize,
    Serialize,
};

use super::FormError;

/// One imported row: flat key → string mapping, in the order the parser sent the keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub default: String,
    #[serde(default)]
    pub multiline: bool,
}

impl FieldDef {
    pub fn text(id: &str, label: &str) -> Self {
        Self { id: id.to_string(), label: label.to_string(), default: String::new(), multiline: false }
    }

    pub fn multiline(id: &str, label: &str) -> Self {
        Self { multiline: true, ..Self::text(id, label) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDef {
    pub id: String,
    pub title: String,
    pub fields: Vec<FieldDef>,
}

/// A field together with the section that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef<'a> {
    pub section: &'a SectionDef,
    pub field: &'a FieldDef,
}

impl<'a> FieldRef<'a> {
    pub fn id(&self) -> &'a str {
        &self.field.id
    }
}

/// The static form: named sections of text fields. Field ids are unique across sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDefinition {
    pub name: String,
    pub sections: Vec<SectionDef>,
}

impl FormDefinition {
    pub fn validate(&self) -> Result<(), FormError> {
        if self.sections.is_empty() {
            return Err(FormError::InvalidDefinition(format!(
                "form '{}' has no sections",
                self.name
            )));
        }

        let mut section_ids = HashSet::new();
        let mut field_ids = HashSet::new();
        for section in &self.sections {
            if !section_ids.insert(section.id.as_str()) {
                return Err(FormError::InvalidDefinition(format!(
                    "duplicate section id '{}'",
                    section.id
                )));
            }
            for field in &section.fields {
                if field.id.is_empty() {
                    return Err(FormError::InvalidDefinition(format!(
                        "empty field id in section '{}'",
                        section.id
                    )));
                }
                if !field_ids.insert(field.id.as_str()) {
                    return Err(FormError::InvalidDefinition(format!(
                        "duplicate field id '{}'",
                        field.id
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn field(&self, id: &str) -> Option<FieldRef<'_>> {
        self.field_refs().find(|f| f.field.id == id)
    }

    pub fn section(&self, id: &str) -> Option<&SectionDef> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn field_refs(&self) -> impl Iterator<Item = FieldRef<'_>> {
        self.sections
            .iter()
            .flat_map(|section| section.fields.iter().map(move |field| FieldRef { section, field }))
    }

    /// The built-in model card form.
    pub fn model_card() -> Self {
        Self {
            name: "modelCardForm".to_string(),
            sections: vec![
                SectionDef {
                    id: "overview".to_string(),
                    title: "Overview".to_string(),
                    fields: vec![
                        FieldDef::text("name", "Model Name"),
                        FieldDef::multiline("description", "Description"),
                        FieldDef::text(
                            "custom.Overview.Name of the AI Solution",
                            "Name of the AI Solution",
                        ),
                        FieldDef::multiline(
                            "custom.Overview.Purpose of the AI Solution",
                            "Purpose of the AI Solution",
                        ),
                    ],
                },
                SectionDef {
                    id: "accountability".to_string(),
                    title: "Accountability".to_string(),
                    fields: vec![
                        FieldDef::text(
                            "custom.Accountability.Who is the business sponsor?",
                            "Who is the business sponsor?",
                        ),
                        FieldDef::text(
                            "custom.Accountability.Who is the model owner?",
                            "Who is the model owner?",
                        ),
                    ],
                },
                SectionDef {
                    id: "model_details".to_string(),
                    title: "Model Details".to_string(),
                    fields: vec![
                        FieldDef::text("modelStage", "Model Stage"),
                        FieldDef::text("custom.mocApplicationFormId", "MOC Application Form ID"),
                        FieldDef::text("custom.Model Details.Model Type", "Model Type"),
                    ],
                },
                SectionDef {
                    id: "risk".to_string(),
                    title: "Risk".to_string(),
                    fields: vec![
                        FieldDef::text("custom.Risk.Risk Tier", "Risk Tier"),
                        FieldDef::multiline("custom.Risk.Known Limitations", "Known Limitations"),
                    ],
                },
            ],
        }
    }
}

impl Default for FormDefinition {
    fn default() -> Self {
        Self::model_card()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_card_is_valid() {
        let form = FormDefinition::model_card();
        assert!(form.validate().is_ok());
        assert_eq!(form.field("modelStage").map(|f| f.section.id.as_str()), Some("model_details"));
    }

    #[test]
    fn test_duplicate_field_ids_rejected() {
        let mut form = FormDefinition::model_card();
        form.sections[1].fields.push(FieldDef::text("name", "Again"));
        let err = form.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate field id 'name'"));
    }

    #[test]
    fn test_record_keeps_insertion_order() {
        let record: Record = [("b", "2"), ("a", "1")].into_iter().collect();
        let keys: Vec<&str> = record.entries().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(record.get("a"), Some("1"));
    }
}

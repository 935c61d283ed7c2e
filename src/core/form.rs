use std::{
    collections::{
        BTreeSet,
        HashMap,
    },
    sync::Arc,
};

use indexmap::IndexMap;

use super::models::FormDefinition;

/// Live values and section visibility of a `FormDefinition`.
#[derive(Debug, Clone)]
pub struct FormState {
    definition: Arc<FormDefinition>,
    values: HashMap<String, String>,
    open_sections: BTreeSet<String>,
}

impl FormState {
    /// New form with default values and only the first section open.
    pub fn new(definition: Arc<FormDefinition>) -> Self {
        let mut state =
            Self { definition, values: HashMap::new(), open_sections: BTreeSet::new() };
        state.reset();
        if let Some(first) = state.definition.sections.first() {
            state.open_sections.insert(first.id.clone());
        }
        state
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    pub fn shared_definition(&self) -> Arc<FormDefinition> {
        Arc::clone(&self.definition)
    }

    /// Restores every field to its default value. Section visibility is left alone.
    pub fn reset(&mut self) {
        self.values = self
            .definition
            .field_refs()
            .map(|f| (f.field.id.clone(), f.field.default.clone()))
            .collect();
    }

    pub fn value(&self, id: &str) -> Option<&str> {
        self.values.get(id).map(String::as_str)
    }

    /// Overwrites a field's value. Returns false when the id is not part of this form.
    pub fn set_value(&mut self, id: &str, value: &str) -> bool {
        match self.values.get_mut(id) {
            Some(slot) => {
                slot.clear();
                slot.push_str(value);
                true
            }
            None => false,
        }
    }

    pub fn is_open(&self, section_id: &str) -> bool {
        self.open_sections.contains(section_id)
    }

    pub fn open_sections(&self) -> &BTreeSet<String> {
        &self.open_sections
    }

    pub fn set_open_sections(&mut self, open: BTreeSet<String>) {
        self.open_sections = open;
    }

    pub fn close_all_sections(&mut self) {
        self.open_sections.clear();
    }

    /// Flat id → value payload in definition order, one entry per field.
    pub fn serialize(&self) -> IndexMap<String, String> {
        self.definition
            .field_refs()
            .map(|f| {
                let value = self.values.get(&f.field.id).cloned().unwrap_or_default();
                (f.field.id.clone(), value)
            })
            .collect()
    }
}

//! Two independent section-visibility policies.
//!
//! Import rendering opens every section that received data and closes the rest, so
//! several sections may end up open. Manual header clicks behave like an accordion and
//! keep at most one section open.

use std::collections::{
    BTreeSet,
    HashSet,
};

use super::{
    form::FormState,
    models::FormDefinition,
};

pub struct SectionTracker;

impl SectionTracker {
    /// Sections owning at least one of `bound_fields`. Unknown ids are ignored.
    pub fn compute_open_sections(
        form: &FormDefinition,
        bound_fields: &HashSet<String>,
    ) -> BTreeSet<String> {
        form.sections
            .iter()
            .filter(|section| section.fields.iter().any(|f| bound_fields.contains(&f.id)))
            .map(|section| section.id.clone())
            .collect()
    }

    /// Opens exactly the sections that own a bound field.
    pub fn apply(state: &mut FormState, bound_fields: &HashSet<String>) -> BTreeSet<String> {
        let open = Self::compute_open_sections(state.definition(), bound_fields);
        state.set_open_sections(open.clone());
        open
    }
}

pub struct Accordion;

impl Accordion {
    /// Click on a section header: any other open section closes, then the clicked one
    /// flips. Returns whether the clicked section is now open.
    pub fn toggle(state: &mut FormState, section_id: &str) -> bool {
        if state.definition().section(section_id).is_none() {
            return false;
        }

        let was_open = state.is_open(section_id);
        let mut open = BTreeSet::new();
        if !was_open {
            open.insert(section_id.to_string());
        }
        state.set_open_sections(open);
        !was_open
    }
}

use super::models::{
    FieldRef,
    FormDefinition,
};

/// Namespace carried by free-text question fields. Spreadsheet headers usually omit it.
pub const CUSTOM_PREFIX: &str = "custom.";

/// Maps imported record keys onto form fields.
#[derive(Debug, Clone)]
pub struct FieldBinder {
    prefix: String,
}

impl FieldBinder {
    pub fn new() -> Self {
        Self { prefix: CUSTOM_PREFIX.to_string() }
    }

    /// Exact id first, then the prefixed id. `None` means the key is unresolved, which
    /// callers log and skip.
    pub fn resolve<'a>(&self, form: &'a FormDefinition, key: &str) -> Option<FieldRef<'a>> {
        let key = key.trim();
        if key.is_empty() {
            return None;
        }

        form.field(key).or_else(|| form.field(&format!("{}{}", self.prefix, key)))
    }
}

impl Default for FieldBinder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{
        FieldDef,
        SectionDef,
    };

    fn form() -> FormDefinition {
        FormDefinition {
            name: "test".to_string(),
            sections: vec![SectionDef {
                id: "main".to_string(),
                title: "Main".to_string(),
                fields: vec![
                    FieldDef::text("description", "Description"),
                    FieldDef::text("custom.Name", "Name"),
                    FieldDef::text("Owner", "Owner"),
                    FieldDef::text("custom.Owner", "Custom Owner"),
                ],
            }],
        }
    }

    #[test]
    fn test_exact_match() {
        let form = form();
        let binder = FieldBinder::new();
        assert_eq!(binder.resolve(&form, "description").map(|f| f.id()), Some("description"));
        assert_eq!(binder.resolve(&form, "custom.Name").map(|f| f.id()), Some("custom.Name"));
    }

    #[test]
    fn test_prefix_fallback() {
        let form = form();
        let binder = FieldBinder::new();
        assert_eq!(binder.resolve(&form, "Name").map(|f| f.id()), Some("custom.Name"));
    }

    #[test]
    fn test_exact_match_wins_over_fallback() {
        let form = form();
        assert_eq!(FieldBinder::new().resolve(&form, "Owner").map(|f| f.id()), Some("Owner"));
    }

    #[test]
    fn test_unresolved_keys() {
        let form = form();
        let binder = FieldBinder::new();
        assert!(binder.resolve(&form, "Nonexistent").is_none());
        assert!(binder.resolve(&form, "").is_none());
        assert!(binder.resolve(&form, "custom.").is_none());
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let form = form();
        assert_eq!(FieldBinder::new().resolve(&form, "  Name ").map(|f| f.id()), Some("custom.Name"));
    }
}

pub mod binder;
pub mod controller;
pub mod errors;
pub mod form;
pub mod import;
pub mod models;
pub mod records;
pub mod sections;
pub mod settings;
pub mod submit;
pub mod tasks;

pub use controller::{
    Command,
    FormController,
    Outcome,
    StatusKind,
    StatusMessage,
};
pub use errors::{
    FormError,
    ImportError,
    SubmitError,
    TransportError,
};
pub use form::FormState;
pub use models::{
    FieldDef,
    FormDefinition,
    Record,
    SectionDef,
};

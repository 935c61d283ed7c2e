use std::{
    path::{
        Path,
        PathBuf,
    },
    sync::Arc,
};

use indexmap::IndexMap;

use super::{
    form::FormState,
    import::{
        ImportController,
        ImportOutcome,
        RenderReport,
    },
    models::FormDefinition,
    records::NavState,
    sections::Accordion,
    submit::{
        SubmitController,
        SubmitOutcome,
    },
    ImportError,
    SubmitError,
    TransportError,
};
use crate::services::{
    file_name_of,
    FileUpload,
    ParseService,
    RawResponse,
    SaveService,
};

/// A user action on the form.
#[derive(Debug, Clone)]
pub enum Command {
    ImportFile(Option<FileUpload>),
    NavigatePrev,
    NavigateNext,
    Submit,
    ToggleSection(String),
    EditField { id: String, value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Error importing file: {0}")]
    Import(#[from] ImportError),

    #[error("Error submitting data: {0}")]
    Submit(#[from] SubmitError),
}

#[derive(Debug)]
pub enum Outcome {
    Imported(ImportOutcome),
    /// `None` when already at the boundary.
    Navigated(Option<RenderReport>),
    Submitted(SubmitOutcome),
    SectionToggled { id: String, open: bool },
    FieldEdited { id: String, accepted: bool },
    Failed(CommandError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// The one line shown in the message area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }
}

/// Owns the form and everything that mutates it.
#[derive(Debug)]
pub struct FormController {
    form: FormState,
    imports: ImportController,
    submits: SubmitController,
    status: Option<StatusMessage>,
}

impl FormController {
    pub fn new(definition: FormDefinition) -> Self {
        Self {
            form: FormState::new(Arc::new(definition)),
            imports: ImportController::new(),
            submits: SubmitController::new(),
            status: None,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn nav_state(&self) -> NavState {
        self.imports.nav_state()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn is_importing(&self) -> bool {
        self.imports.is_busy()
    }

    pub fn is_submitting(&self) -> bool {
        self.submits.is_busy()
    }

    pub async fn dispatch(
        &mut self,
        command: Command,
        parser: &dyn ParseService,
        saver: &dyn SaveService,
    ) -> Outcome {
        match command {
            Command::ImportFile(file) => match self.begin_import(file) {
                Ok(upload) => {
                    let response = parser.upload(&upload).await;
                    self.complete_import(response)
                }
                Err(outcome) => outcome,
            },
            Command::Submit => match self.begin_submit() {
                Ok(payload) => {
                    let response = saver.save(&payload).await;
                    self.complete_submit(response)
                }
                Err(outcome) => outcome,
            },
            Command::NavigatePrev => Outcome::Navigated(self.navigate_prev()),
            Command::NavigateNext => Outcome::Navigated(self.navigate_next()),
            Command::ToggleSection(id) => {
                let open = self.toggle_section(&id);
                Outcome::SectionToggled { id, open }
            }
            Command::EditField { id, value } => {
                let accepted = self.edit_field(&id, &value);
                Outcome::FieldEdited { id, accepted }
            }
        }
    }

    pub fn navigate_prev(&mut self) -> Option<RenderReport> {
        self.imports.prev(&mut self.form)
    }

    pub fn navigate_next(&mut self) -> Option<RenderReport> {
        self.imports.next(&mut self.form)
    }

    /// Manual header click; see `Accordion`.
    pub fn toggle_section(&mut self, id: &str) -> bool {
        Accordion::toggle(&mut self.form, id)
    }

    pub fn edit_field(&mut self, id: &str, value: &str) -> bool {
        self.form.set_value(id, value)
    }

    /// First half of an import. On success the caller uploads the returned file and
    /// hands the reply to `complete_import`.
    pub fn begin_import(&mut self, file: Option<FileUpload>) -> Result<FileUpload, Outcome> {
        if file.is_some() && self.submits.is_busy() {
            return Err(self.fail(ImportError::SubmitInProgress.into()));
        }
        match self.imports.begin_import(file) {
            Ok(upload) => {
                self.set_uploading(&upload.file_name);
                Ok(upload)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// `begin_import` for a file on disk. Only the name is checked here; the caller reads
    /// the file off the UI thread and reports a read failure through `abort_import`.
    pub fn begin_import_path(&mut self, path: Option<&Path>) -> Result<PathBuf, Outcome> {
        let Some(path) = path else {
            return Err(self.fail(ImportError::NoFileSelected.into()));
        };
        if self.submits.is_busy() {
            return Err(self.fail(ImportError::SubmitInProgress.into()));
        }

        let file_name = file_name_of(path);
        match self.imports.claim(&file_name) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "import started");
                self.set_uploading(&file_name);
                Ok(path.to_path_buf())
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Ends an in-flight import that failed before reaching the parse service.
    pub fn abort_import(&mut self, error: ImportError) -> Outcome {
        self.imports.abort_import();
        self.fail(error.into())
    }

    pub fn complete_import(&mut self, response: Result<RawResponse, TransportError>) -> Outcome {
        match self.imports.finish_import(&mut self.form, response) {
            Ok(outcome) => {
                self.status = Some(import_status(&outcome));
                Outcome::Imported(outcome)
            }
            Err(e) => self.fail(e.into()),
        }
    }

    pub fn begin_submit(&mut self) -> Result<IndexMap<String, String>, Outcome> {
        if self.imports.is_busy() {
            return Err(self.fail(SubmitError::ImportInProgress.into()));
        }
        match self.submits.begin_submit(&self.form) {
            Ok(payload) => {
                self.status = Some(StatusMessage::new(StatusKind::Info, "Submitting..."));
                Ok(payload)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    pub fn complete_submit(&mut self, response: Result<RawResponse, TransportError>) -> Outcome {
        match self.submits.finish_submit(&mut self.form, response) {
            Ok(outcome) => {
                self.status = Some(StatusMessage::new(StatusKind::Success, outcome.message.clone()));
                Outcome::Submitted(outcome)
            }
            Err(e) => self.fail(e.into()),
        }
    }

    fn set_uploading(&mut self, file_name: &str) {
        self.status = Some(StatusMessage::new(
            StatusKind::Info,
            format!("Uploading and parsing {}...", file_name),
        ));
    }

    fn fail(&mut self, error: CommandError) -> Outcome {
        tracing::warn!("{}", error);
        self.status = Some(StatusMessage::new(StatusKind::Error, error.to_string()));
        Outcome::Failed(error)
    }
}

fn import_status(outcome: &ImportOutcome) -> StatusMessage {
    match outcome {
        ImportOutcome::ParsedButEmpty => StatusMessage::new(
            StatusKind::Info,
            "File parsed successfully, but it contains no data rows.",
        ),
        ImportOutcome::Loaded { count, report } => {
            let rows = if *count == 1 { "record" } else { "records" };
            let mut text = format!("Loaded {} {} from file.", count, rows);
            if !report.unresolved.is_empty() {
                text.push_str(&format!(
                    " {} column(s) did not match a form field.",
                    report.unresolved.len()
                ));
            }
            StatusMessage::new(StatusKind::Success, text)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;

    /// Scripted collaborator: replies are popped in order.
    #[derive(Default)]
    struct Scripted {
        uploads: Mutex<Vec<RawResponse>>,
        saves: Mutex<Vec<RawResponse>>,
        saved: Mutex<Vec<IndexMap<String, String>>>,
    }

    impl Scripted {
        fn upload_reply(self, status: u16, body: &str) -> Self {
            self.uploads.lock().unwrap().push(RawResponse::new(status, body));
            self
        }

        fn save_reply(self, status: u16, body: &str) -> Self {
            self.saves.lock().unwrap().push(RawResponse::new(status, body));
            self
        }
    }

    #[async_trait]
    impl ParseService for Scripted {
        async fn upload(&self, _file: &FileUpload) -> Result<RawResponse, TransportError> {
            let mut replies = self.uploads.lock().unwrap();
            if replies.is_empty() {
                return Err(TransportError("no scripted upload reply".to_string()));
            }
            Ok(replies.remove(0))
        }
    }

    #[async_trait]
    impl SaveService for Scripted {
        async fn save(
            &self,
            payload: &IndexMap<String, String>,
        ) -> Result<RawResponse, TransportError> {
            self.saved.lock().unwrap().push(payload.clone());
            let mut replies = self.saves.lock().unwrap();
            if replies.is_empty() {
                return Err(TransportError("no scripted save reply".to_string()));
            }
            Ok(replies.remove(0))
        }
    }

    fn csv() -> Option<FileUpload> {
        Some(FileUpload::new("cards.csv", Vec::new()))
    }

    fn controller() -> FormController {
        FormController::new(FormDefinition::model_card())
    }

    #[tokio::test]
    async fn test_import_then_navigate_commands() {
        let svc = Scripted::default().upload_reply(200, r#"[{"Name":"Alpha"},{"Name":"Beta"}]"#);
        let mut ctl = FormController::new(FormDefinition {
            name: "names".to_string(),
            sections: vec![crate::core::models::SectionDef {
                id: "main".to_string(),
                title: "Main".to_string(),
                fields: vec![crate::core::models::FieldDef::text("custom.Name", "Name")],
            }],
        });

        let outcome = ctl.dispatch(Command::ImportFile(csv()), &svc, &svc).await;
        assert!(matches!(outcome, Outcome::Imported(ImportOutcome::Loaded { count: 2, .. })));
        assert_eq!(ctl.form().value("custom.Name"), Some("Alpha"));
        assert_eq!(ctl.nav_state().label, "Record 1 of 2");
        assert_eq!(ctl.status().map(|s| s.kind), Some(StatusKind::Success));

        ctl.dispatch(Command::NavigateNext, &svc, &svc).await;
        assert_eq!(ctl.form().value("custom.Name"), Some("Beta"));
        assert!(!ctl.nav_state().next_enabled);

        let outcome = ctl.dispatch(Command::NavigateNext, &svc, &svc).await;
        assert!(matches!(outcome, Outcome::Navigated(None)));

        ctl.dispatch(Command::NavigatePrev, &svc, &svc).await;
        assert_eq!(ctl.form().value("custom.Name"), Some("Alpha"));
    }

    #[tokio::test]
    async fn test_empty_import_is_info_not_error() {
        let svc = Scripted::default().upload_reply(200, "[]");
        let mut ctl = controller();

        let outcome = ctl.dispatch(Command::ImportFile(csv()), &svc, &svc).await;
        assert!(matches!(outcome, Outcome::Imported(ImportOutcome::ParsedButEmpty)));
        assert!(!ctl.nav_state().visible);
        assert_eq!(ctl.status().map(|s| s.kind), Some(StatusKind::Info));
    }

    #[tokio::test]
    async fn test_no_file_selected_sets_error_status() {
        let svc = Scripted::default();
        let mut ctl = controller();

        let outcome = ctl.dispatch(Command::ImportFile(None), &svc, &svc).await;
        assert!(matches!(outcome, Outcome::Failed(CommandError::Import(ImportError::NoFileSelected))));
        assert_eq!(
            ctl.status(),
            Some(&StatusMessage::new(
                StatusKind::Error,
                "Error importing file: Please select a file to import."
            ))
        );
    }

    #[tokio::test]
    async fn test_manual_submit_ignores_loaded_records() {
        let svc = Scripted::default()
            .upload_reply(200, r#"[{"name":"Imported"},{"name":"Second"}]"#)
            .save_reply(200, r#"{"message":"ok"}"#);
        let mut ctl = controller();
        ctl.dispatch(Command::ImportFile(csv()), &svc, &svc).await;

        ctl.dispatch(
            Command::EditField { id: "name".to_string(), value: "Typed".to_string() },
            &svc,
            &svc,
        )
        .await;
        let outcome = ctl.dispatch(Command::Submit, &svc, &svc).await;
        assert!(matches!(outcome, Outcome::Submitted(_)));

        let saved = svc.saved.lock().unwrap();
        assert_eq!(saved[0].get("name").map(String::as_str), Some("Typed"));
        assert_eq!(ctl.form().value("name"), Some(""));
        assert_eq!(ctl.nav_state().label, "Record 1 of 2");
    }

    #[tokio::test]
    async fn test_rejected_submit_shows_detail_and_keeps_values() {
        let svc = Scripted::default().save_reply(500, r#"{"detail":"DB down"}"#);
        let mut ctl = controller();
        ctl.form_mut().set_value("description", "Draft");

        let outcome = ctl.dispatch(Command::Submit, &svc, &svc).await;
        assert!(matches!(outcome, Outcome::Failed(CommandError::Submit(SubmitError::SaveRejected(_)))));
        let status = ctl.status().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.text.ends_with("DB down"));
        assert_eq!(ctl.form().value("description"), Some("Draft"));
        assert!(!ctl.is_submitting());
    }

    #[tokio::test]
    async fn test_toggle_and_edit_commands() {
        let svc = Scripted::default();
        let mut ctl = controller();

        let outcome = ctl.dispatch(Command::ToggleSection("risk".to_string()), &svc, &svc).await;
        assert!(matches!(outcome, Outcome::SectionToggled { open: true, .. }));
        assert_eq!(ctl.form().open_sections().iter().collect::<Vec<_>>(), vec!["risk"]);

        let outcome = ctl
            .dispatch(
                Command::EditField { id: "missing".to_string(), value: "x".to_string() },
                &svc,
                &svc,
            )
            .await;
        assert!(matches!(outcome, Outcome::FieldEdited { accepted: false, .. }));
    }

    #[test]
    fn test_split_import_reports_busy_while_in_flight() {
        let mut ctl = controller();
        let upload = ctl.begin_import(csv()).unwrap();
        assert_eq!(upload.file_name, "cards.csv");
        assert!(ctl.is_importing());

        let second = ctl.begin_import(csv());
        assert!(matches!(second, Err(Outcome::Failed(CommandError::Import(ImportError::Busy)))));

        ctl.complete_import(Ok(RawResponse::new(200, r#"[{"name":"A"}]"#)));
        assert!(!ctl.is_importing());
        assert_eq!(ctl.form().value("name"), Some("A"));
    }

    #[test]
    fn test_path_import_claims_without_reading() {
        let mut ctl = controller();
        let path = Path::new("/nowhere/cards.xlsx");

        let claimed = ctl.begin_import_path(Some(path)).unwrap();
        assert_eq!(claimed, path);
        assert!(ctl.is_importing());
        assert_eq!(ctl.status().map(|s| s.kind), Some(StatusKind::Info));

        let outcome = ctl.abort_import(ImportError::Io(Box::new(std::io::Error::from(
            std::io::ErrorKind::NotFound,
        ))));
        assert!(matches!(outcome, Outcome::Failed(CommandError::Import(ImportError::Io(_)))));
        assert!(!ctl.is_importing());
        assert_eq!(ctl.status().map(|s| s.kind), Some(StatusKind::Error));
    }

    #[test]
    fn test_path_import_checks_name_first() {
        let mut ctl = controller();
        let none = ctl.begin_import_path(None);
        assert!(matches!(none, Err(Outcome::Failed(CommandError::Import(ImportError::NoFileSelected)))));

        let txt = ctl.begin_import_path(Some(Path::new("notes.txt")));
        assert!(matches!(
            txt,
            Err(Outcome::Failed(CommandError::Import(ImportError::UnsupportedFileType(_))))
        ));
        assert!(!ctl.is_importing());
    }

    #[test]
    fn test_submit_waits_for_import() {
        let mut ctl = controller();
        ctl.begin_import(csv()).unwrap();

        let submit = ctl.begin_submit();
        assert!(matches!(
            submit,
            Err(Outcome::Failed(CommandError::Submit(SubmitError::ImportInProgress)))
        ));
        assert!(!ctl.is_submitting());

        ctl.complete_import(Ok(RawResponse::new(200, r#"[{"name":"A"},{"name":"B"}]"#)));
        let payload = ctl.begin_submit().unwrap();
        assert_eq!(payload.get("name").map(String::as_str), Some("A"));
    }

    #[test]
    fn test_import_waits_for_submit() {
        let mut ctl = controller();
        ctl.begin_submit().unwrap();

        let import = ctl.begin_import(csv());
        assert!(matches!(
            import,
            Err(Outcome::Failed(CommandError::Import(ImportError::SubmitInProgress)))
        ));
        let by_path = ctl.begin_import_path(Some(Path::new("cards.csv")));
        assert!(matches!(
            by_path,
            Err(Outcome::Failed(CommandError::Import(ImportError::SubmitInProgress)))
        ));
        assert!(!ctl.is_importing());

        ctl.complete_submit(Ok(RawResponse::new(200, "{}")));
        assert!(ctl.begin_import(csv()).is_ok());
    }
}

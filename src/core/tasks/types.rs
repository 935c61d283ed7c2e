use crate::{
    core::{
        ImportError,
        TransportError,
    },
    services::RawResponse,
};

pub type CollaboratorReply = Result<RawResponse, TransportError>;

#[derive(Debug)]
pub enum TaskResult {
    Upload(CollaboratorReply),
    /// The chosen file could not be read, so nothing was uploaded.
    ReadFailed(ImportError),
    Save(CollaboratorReply),
}

impl TaskResult {
    pub fn task_type(&self) -> &'static str {
        match self {
            TaskResult::Upload(_) => "upload",
            TaskResult::ReadFailed(_) => "read",
            TaskResult::Save(_) => "save",
        }
    }
}

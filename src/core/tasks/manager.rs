use std::{
    path::PathBuf,
    sync::{
        mpsc,
        Arc,
    },
};

use indexmap::IndexMap;
use tokio::runtime::Runtime;

use super::TaskResult;
use crate::{
    core::FormError,
    services::{
        FileUpload,
        ParseService,
        SaveService,
    },
};

/// Called after a result is queued, so an idle UI can wake up and poll.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Runs collaborator calls off the UI thread. Results come back through `poll_results`.
pub struct TaskManager {
    runtime: Arc<Runtime>,
    receiver: mpsc::Receiver<TaskResult>,
    sender: mpsc::Sender<TaskResult>,
    parser: Arc<dyn ParseService>,
    saver: Arc<dyn SaveService>,
    waker: Option<Waker>,
}

impl TaskManager {
    pub fn new(parser: Arc<dyn ParseService>, saver: Arc<dyn SaveService>) -> Result<Self, FormError> {
        let runtime = Arc::new(Runtime::new()?);

        let (sender, receiver) = mpsc::channel();

        Ok(Self { runtime, receiver, sender, parser, saver, waker: None })
    }

    pub fn set_waker(&mut self, waker: Waker) {
        self.waker = Some(waker);
    }

    pub fn poll_results(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();

        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }

        results
    }

    fn task_context(&self) -> (mpsc::Sender<TaskResult>, Option<Waker>) {
        (self.sender.clone(), self.waker.clone())
    }

    /// Reads `path` and sends it to the parse service, both on the runtime.
    pub fn upload(&self, path: PathBuf) {
        let (sender, waker) = self.task_context();
        let parser = Arc::clone(&self.parser);

        self.runtime.spawn(async move {
            let file = match FileUpload::read(&path).await {
                Ok(file) => file,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "could not read file: {}", e);
                    send(&sender, waker, TaskResult::ReadFailed(e));
                    return;
                }
            };

            let result = parser.upload(&file).await;
            if let Err(e) = &result {
                tracing::warn!(file = %file.file_name, "upload did not complete: {}", e);
            }
            send(&sender, waker, TaskResult::Upload(result));
        });
    }

    pub fn save(&self, payload: IndexMap<String, String>) {
        let (sender, waker) = self.task_context();
        let saver = Arc::clone(&self.saver);

        self.runtime.spawn(async move {
            let result = saver.save(&payload).await;
            if let Err(e) = &result {
                tracing::warn!("save did not complete: {}", e);
            }
            send(&sender, waker, TaskResult::Save(result));
        });
    }
}

fn send(sender: &mpsc::Sender<TaskResult>, waker: Option<Waker>, result: TaskResult) {
    let task_type = result.task_type();
    if sender.send(result).is_err() {
        tracing::debug!(task_type, "task finished after the receiver was dropped");
        return;
    }
    if let Some(wake) = waker {
        wake();
    }
}

//! Log streaming action
//!
//! The stream runs on its own task; the foreground drains decoded lines
//! from a bounded channel.

use skiff_domain::constants::LOG_CHANNEL_CAPACITY;
use skiff_domain::{Error, LogMessage, Warned, Warnings};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::instrument;

use super::Actor;

/// A running log stream.
pub struct LogStream {
    pub messages: mpsc::Receiver<LogMessage>,
    task: JoinHandle<Warned<()>>,
}

impl LogStream {
    /// Stop reading and return the stream's warnings and outcome.
    pub async fn finish(self) -> Warned<()> {
        let LogStream { messages, task } = self;
        // The producer watches for the receiver closing, even while idle.
        drop(messages);
        match task.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => Warned::err(Error::RequestAborted, Warnings::new()),
            Err(err) => Warned::err(
                Error::Request { cause: format!("log stream task failed: {err}") },
                Warnings::new(),
            ),
        }
    }

    /// Abort the streaming task.
    pub fn abort(&self) {
        self.task.abort();
    }
}

impl Actor {
    /// Resolve the application and start streaming its logs.
    #[instrument(skip(self))]
    pub async fn stream_application_logs(
        &self,
        app_name: &str,
        space_guid: &str,
    ) -> Warned<LogStream> {
        let app = self.get_application_by_name_and_space(app_name, space_guid).await;
        app.map(|app| {
            let (sink, messages) = mpsc::channel(LOG_CHANNEL_CAPACITY);
            let logs = self.logs.clone();
            let task = tokio::spawn(async move { logs.stream_logs(&app.guid, sink).await });
            LogStream { messages, task }
        })
    }
}

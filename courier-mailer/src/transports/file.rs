use crate::message::build_message;
use crate::{Delivery, Email, MailerError, Transport};
use async_trait::async_trait;
use lettre::Transport as _;
use lettre::transport::file::FileTransport as LettreFileTransport;
use std::path::{Path, PathBuf};

/// Writes every message as an `.eml` file into a directory.
#[derive(Debug, Clone)]
pub struct FileTransport {
    transport: LettreFileTransport,
    output_dir: PathBuf,
}

impl FileTransport {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Result<Self, MailerError> {
        let output_dir = output_dir.as_ref().to_path_buf();

        if !output_dir.exists() {
            std::fs::create_dir_all(&output_dir)?;
        }

        let transport = LettreFileTransport::new(&output_dir);

        Ok(Self {
            transport,
            output_dir,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[async_trait]
impl Transport for FileTransport {
    async fn send_mail(&self, email: Email) -> Result<Delivery, MailerError> {
        let message = build_message(email)?;
        let delivery = Delivery::for_message(&message);

        // lettre's FileTransport is sync, so we use spawn_blocking
        let transport = self.transport.clone();
        let id = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| MailerError::Task(format!("Failed to write email: {e}")))??;

        Ok(delivery.with_response([id]))
    }
}

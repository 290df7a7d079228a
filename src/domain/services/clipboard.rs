use anyhow::anyhow;
use anyhow::Result;
use once_cell::sync::OnceCell;
use tokio::sync::mpsc;

static COPY_QUEUE: OnceCell<mpsc::UnboundedSender<String>> = OnceCell::new();

/// Copies code blocks to the system clipboard. `start` must be running before
/// `copy` is called.
pub struct ClipboardService {}

impl ClipboardService {
    pub async fn start() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        COPY_QUEUE
            .set(tx)
            .map_err(|_| return anyhow!("Clipboard service is already running."))?;
        let mut clipboard = arboard::Clipboard::new()?;

        while let Some(code) = rx.recv().await {
            if let Err(err) = clipboard.set_text(code) {
                tracing::error!(error = ?err, "Failed to write to the clipboard");
            }
        }

        return Ok(());
    }

    /// Whether a clipboard can be opened on this system.
    pub fn is_available() -> Result<()> {
        if COPY_QUEUE.get().is_some() {
            return Ok(());
        }

        arboard::Clipboard::new()?;
        return Ok(());
    }

    pub fn copy(code: String) -> Result<()> {
        let tx = COPY_QUEUE
            .get()
            .ok_or_else(|| return anyhow!("Clipboard service is not initialized."))?;
        tracing::debug!(bytes = code.len(), "Copying code block");
        tx.send(code)?;

        return Ok(());
    }
}

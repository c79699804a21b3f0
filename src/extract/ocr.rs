use crate::error::ExtractError;
use anyhow::Context;
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Seam over the optical character recognition engine.
///
/// The engine itself is an external collaborator; clients only depend on this
/// trait, so tests can count invocations without any engine installed.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize text in raw image bytes. An image with no text yields an
    /// empty string, which callers treat as a soft failure.
    async fn recognize(&self, image: &[u8]) -> anyhow::Result<String>;
}

/// OCR via the `tesseract` binary, streamed through stdin/stdout so no
/// scratch file is needed.
pub struct TesseractOcr {
    language: String,
}

impl TesseractOcr {
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
        }
    }

    /// English model, matching the widget's bundled recognition setup.
    pub fn english() -> Self {
        Self::new("eng")
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn recognize(&self, image: &[u8]) -> anyhow::Result<String> {
        let mut child = Command::new("tesseract")
            .args(["stdin", "stdout", "-l", &self.language])
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .spawn()
            .context("failed to start tesseract (is it installed?)")?;

        let mut stdin = child
            .stdin
            .take()
            .context("tesseract stdin unavailable")?;
        stdin
            .write_all(image)
            .await
            .context("failed to feed image to tesseract")?;
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .context("tesseract did not exit cleanly")?;

        if !output.status.success() {
            return Err(ExtractError::Ocr(format!("tesseract exited with {}", output.status)).into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

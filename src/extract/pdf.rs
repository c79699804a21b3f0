use crate::error::ExtractError;
use anyhow::Context;

/// Extract concatenated per-page text from a PDF.
///
/// Extraction is CPU-bound, so it runs on the blocking pool. A PDF with no
/// extractable text layer yields an empty string, which is not an error.
pub async fn extract_text(bytes: Vec<u8>) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&bytes)
            .map_err(|e| ExtractError::Pdf(e.to_string()).into())
    })
    .await
    .context("pdf extraction task panicked")?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn garbage_bytes_fail_as_pdf_error() {
        let err = extract_text(b"definitely not a pdf".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExtractError>(),
            Some(ExtractError::Pdf(_))
        ));
    }

    #[tokio::test]
    async fn empty_input_fails() {
        assert!(extract_text(Vec::new()).await.is_err());
    }
}

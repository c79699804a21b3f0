use super::dispatch::{send_message, SendOutcome};
use super::transcript::{Speaker, Transcript};
use super::GatewayApi;
use crate::extract::{classify, AttachmentKind, OcrEngine};
use crate::utils::truncate_with_ellipsis;

/// Bound on the PDF excerpt folded into the summary prompt, to respect
/// upstream token limits.
pub const PDF_EXCERPT_CHARS: usize = 3000;

pub const INVALID_PDF_BUBBLE: &str = "⚠️ Please upload a valid PDF file.";
pub const INVALID_IMAGE_BUBBLE: &str = "⚠️ Please upload a valid image file.";
pub const PDF_ERROR_BUBBLE: &str = "❌ Error processing the PDF.";
pub const IMAGE_ERROR_BUBBLE: &str = "❌ Error processing the image.";
pub const IMAGE_STATUS_BUBBLE: &str = "🖼️ Processing image...";
pub const NO_TEXT_BUBBLE: &str = "No text found in the image.";

/// Which accept filter the upload modal picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentPick {
    Pdf,
    Image,
}

/// The widget's attachment flow: validate the media type for the picked
/// filter, extract text (gateway for PDFs, local OCR for images), then fold
/// the text into a fixed summary instruction dispatched through the standard
/// chat path. Fire-and-forget: one status bubble, no progress, no
/// cancellation.
pub async fn handle_attachment(
    gateway: &dyn GatewayApi,
    ocr: &dyn OcrEngine,
    transcript: &mut Transcript,
    pick: AttachmentPick,
    filename: &str,
    bytes: Vec<u8>,
) -> SendOutcome {
    let (_, kind) = classify(&bytes, Some(filename));

    match pick {
        AttachmentPick::Pdf => {
            if kind != AttachmentKind::Pdf {
                transcript.push(Speaker::Nova, INVALID_PDF_BUBBLE);
                return SendOutcome::Ignored;
            }
            process_pdf(gateway, transcript, filename, bytes).await
        }
        AttachmentPick::Image => {
            if kind != AttachmentKind::Image {
                transcript.push(Speaker::Nova, INVALID_IMAGE_BUBBLE);
                return SendOutcome::Ignored;
            }
            process_image(gateway, ocr, transcript, bytes).await
        }
    }
}

async fn process_pdf(
    gateway: &dyn GatewayApi,
    transcript: &mut Transcript,
    filename: &str,
    bytes: Vec<u8>,
) -> SendOutcome {
    match gateway.extract_pdf(filename, bytes).await {
        Ok(text) => {
            let excerpt = truncate_with_ellipsis(&text, PDF_EXCERPT_CHARS);
            let prompt = format!("Summarize the contents of this PDF:\n\n{excerpt}");
            send_message(gateway, transcript, &prompt).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "pdf attachment failed");
            transcript.push(Speaker::Nova, PDF_ERROR_BUBBLE);
            SendOutcome::Failed
        }
    }
}

async fn process_image(
    gateway: &dyn GatewayApi,
    ocr: &dyn OcrEngine,
    transcript: &mut Transcript,
    bytes: Vec<u8>,
) -> SendOutcome {
    transcript.push(Speaker::Nova, IMAGE_STATUS_BUBBLE);

    match ocr.recognize(&bytes).await {
        Ok(text) if text.trim().is_empty() => {
            // Soft failure: nothing to summarize, so no gateway call.
            transcript.push(Speaker::Nova, NO_TEXT_BUBBLE);
            SendOutcome::Ignored
        }
        Ok(text) => {
            let prompt = format!("Summarize this image content:\n\n{}", text.trim());
            send_message(gateway, transcript, &prompt).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "ocr failed");
            transcript.push(Speaker::Nova, IMAGE_ERROR_BUBBLE);
            SendOutcome::Failed
        }
    }
}

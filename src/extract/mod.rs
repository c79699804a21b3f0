pub mod media;
pub mod ocr;
pub mod pdf;

pub use media::{classify, AttachmentKind};
pub use ocr::{OcrEngine, TesseractOcr};

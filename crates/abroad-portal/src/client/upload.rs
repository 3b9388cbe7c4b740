use std::path::Path;

/// Shown whenever a non-PDF file is chosen for a letter upload.
pub const PDF_ONLY_MESSAGE: &str = "Only PDF files are accepted.";

const PDF_MAGIC: &[u8] = b"%PDF-";

/// A recommendation letter ready to send as the `pdf` multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfUpload {
    file_name: String,
    bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("{file_name} is not a PDF")]
    NotPdf { file_name: String },
}

impl UploadError {
    pub fn user_message(&self) -> &'static str {
        PDF_ONLY_MESSAGE
    }
}

impl PdfUpload {
    /// Accept a chosen file only if it is declared (or, lacking a declared
    /// type, named) as a PDF and starts with the PDF header.
    pub fn new(
        file_name: impl Into<String>,
        declared_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<Self, UploadError> {
        let file_name = file_name.into();
        let detected = match declared_type {
            Some(declared) => declared.parse::<mime::Mime>().ok(),
            None => mime_guess::from_path(Path::new(&file_name)).first(),
        };

        let declared_pdf = detected.is_some_and(|kind| kind == mime::APPLICATION_PDF);
        if !declared_pdf || !bytes.starts_with(PDF_MAGIC) {
            return Err(UploadError::NotPdf { file_name });
        }

        Ok(Self { file_name, bytes })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

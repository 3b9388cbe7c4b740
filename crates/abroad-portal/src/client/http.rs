use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::upload::PdfUpload;
use super::{ClientError, PortalApi};
use crate::config::ApiConfig;
use crate::domain::{
    ApplicationId, ApplicationStatusResponse, Document, LetterLink, LetterPublicInfo, NewProgram,
    NewQuestion, Program, ProgramId, Question, QuestionId, QuestionPatch,
};

/// HTTP client for the portal REST API.
#[derive(Debug, Clone)]
pub struct HttpPortalClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpPortalClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config))
    }

    /// Reuse an existing [`reqwest::Client`] and its connection pool.
    pub fn with_client(client: Client, config: &ApiConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer token when one is configured.
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Attach the bearer token, refusing to send without one.
    fn require_token(
        &self,
        request: RequestBuilder,
        operation: &'static str,
    ) -> Result<RequestBuilder, ClientError> {
        match &self.token {
            Some(token) => Ok(request.bearer_auth(token)),
            None => Err(ClientError::MissingCredentials { operation }),
        }
    }

    async fn send(request: RequestBuilder, label: &'static str) -> Result<Response, ClientError> {
        debug!(request = label, "sending portal request");
        let response = request.send().await.map_err(|err| {
            warn!(request = label, error = %err, "portal request did not complete");
            ClientError::Network(err)
        })?;
        Self::ensure_success(response, label).await
    }

    /// Map non-2xx responses to [`ClientError::Validation`], lifting the
    /// server's `detail`/`error` text when the body carries one.
    async fn ensure_success(
        response: Response,
        label: &'static str,
    ) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            debug!(request = label, status = status.as_u16(), "portal request succeeded");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = extract_detail(&body);
        warn!(
            request = label,
            status = status.as_u16(),
            detail = detail.as_deref().unwrap_or(""),
            "portal rejected request"
        );
        Err(ClientError::Validation {
            status: status.as_u16(),
            detail,
        })
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        response.json::<T>().await.map_err(ClientError::Decode)
    }
}

fn extract_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
        return None;
    };

    ["detail", "error", "message"]
        .iter()
        .find_map(|field| value.get(field))
        .and_then(detail_text)
        .or_else(|| {
            // DRF field errors: {"pdf": ["Unsupported file."]}
            value.as_object().and_then(|fields| {
                fields.values().find_map(|entry| match entry {
                    Value::Array(items) => items.first().and_then(detail_text),
                    _ => None,
                })
            })
        })
}

fn detail_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Array(items) => items.first().and_then(detail_text),
        _ => None,
    }
}

impl PortalApi for HttpPortalClient {
    async fn list_programs(&self, exclude_ended: bool) -> Result<Vec<Program>, ClientError> {
        let request = self
            .client
            .get(self.url("/api/programs/"))
            .query(&[("exclude_ended", exclude_ended)]);
        let response = Self::send(self.authorized(request), "list programs").await?;
        Self::parse(response).await
    }

    async fn application_status(
        &self,
        program: ProgramId,
    ) -> Result<ApplicationStatusResponse, ClientError> {
        let request = self
            .client
            .get(self.url(&format!("/api/programs/{program}/application_status/")));
        let response = Self::send(self.authorized(request), "application status").await?;
        Self::parse(response).await
    }

    async fn documents(&self, application: ApplicationId) -> Result<Vec<Document>, ClientError> {
        let request = self
            .client
            .get(self.url("/api/documents/"))
            .query(&[("application", application.0)]);
        let response = Self::send(self.authorized(request), "list documents").await?;
        Self::parse(response).await
    }

    async fn questions(&self, program: ProgramId) -> Result<Vec<Question>, ClientError> {
        let request = self
            .client
            .get(self.url("/api/questions/"))
            .query(&[("program", program.0)]);
        let response = Self::send(self.authorized(request), "list questions").await?;
        Self::parse(response).await
    }

    async fn create_question(&self, question: &NewQuestion) -> Result<Question, ClientError> {
        let request = self.client.post(self.url("/api/questions/")).json(question);
        let request = self.require_token(request, "create question")?;
        let response = Self::send(request, "create question").await?;
        Self::parse(response).await
    }

    async fn update_question(
        &self,
        id: QuestionId,
        patch: &QuestionPatch,
    ) -> Result<Question, ClientError> {
        let request = self
            .client
            .patch(self.url(&format!("/api/questions/{id}/")))
            .json(patch);
        let request = self.require_token(request, "update question")?;
        let response = Self::send(request, "update question").await?;
        Self::parse(response).await
    }

    async fn delete_question(&self, id: QuestionId) -> Result<(), ClientError> {
        let request = self
            .client
            .delete(self.url(&format!("/api/questions/{id}/")));
        let request = self.require_token(request, "delete question")?;
        Self::send(request, "delete question").await?;
        Ok(())
    }

    async fn create_program(&self, program: &NewProgram) -> Result<Program, ClientError> {
        let request = self.client.post(self.url("/api/programs/")).json(program);
        let request = self.require_token(request, "create program")?;
        let response = Self::send(request, "create program").await?;
        Self::parse(response).await
    }

    async fn letter_public_info(&self, link: &LetterLink) -> Result<LetterPublicInfo, ClientError> {
        // Letter routes are gated by the token alone; never send credentials.
        let request = self
            .client
            .get(self.url(&format!("/api/letters/{}/public_info/", link.id)))
            .query(&[("token", link.token.as_str())]);
        let response = Self::send(request, "letter public info").await?;
        Self::parse(response).await
    }

    async fn fulfill_letter(
        &self,
        link: &LetterLink,
        upload: &PdfUpload,
    ) -> Result<(), ClientError> {
        let part = Part::bytes(upload.bytes().to_vec())
            .file_name(upload.file_name().to_string())
            .mime_str(mime::APPLICATION_PDF.as_ref())?;
        let form = Form::new().part("pdf", part);

        let request = self
            .client
            .post(self.url(&format!("/api/letters/{}/fulfill_letter/", link.id)))
            .query(&[("token", link.token.as_str())])
            .multipart(form);
        Self::send(request, "fulfill letter").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_detail_variants() {
        assert_eq!(
            extract_detail(r#"{"detail": "Invalid token."}"#).as_deref(),
            Some("Invalid token.")
        );
        assert_eq!(
            extract_detail(r#"{"error": ["File too large."]}"#).as_deref(),
            Some("File too large.")
        );
        assert_eq!(
            extract_detail(r#"{"pdf": ["Upload a valid PDF."]}"#).as_deref(),
            Some("Upload a valid PDF.")
        );
        assert_eq!(extract_detail("<html>502</html>"), None);
        assert_eq!(extract_detail(""), None);
        assert_eq!(extract_detail(r#"{"detail": "  "}"#), None);
    }

    #[test]
    fn base_url_is_normalized() {
        let config = ApiConfig::new("http://localhost:8000/").expect("valid url");
        let client = HttpPortalClient::with_client(Client::new(), &config);
        assert_eq!(
            client.url("/api/programs/"),
            "http://localhost:8000/api/programs/"
        );
        assert!(!client.has_token());
    }
}

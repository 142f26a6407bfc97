use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

/// A binary attachment, sent as one multipart part.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// One assembled form submission, ready for the wire.
///
/// `success_statuses` travels with the request so the transport can classify
/// the response itself; callers consume the resulting [`ApiOutcome`] with an
/// exhaustive match instead of re-checking status codes.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub url: String,
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
    pub success_statuses: Vec<u16>,
}

/// Classified result of a submission attempt.
#[derive(Debug, Clone)]
pub enum ApiOutcome {
    /// Success status and a parsable JSON body.
    Success { status: u16, record: Value },
    /// Success status but the body did not parse; never treated as success.
    Unparsable { status: u16 },
    /// Status outside the success set; `detail` carries the server's own
    /// message when one could be extracted from the body.
    Rejected { status: u16, detail: Option<String> },
    /// The request never got a response.
    TransportFailed { detail: String },
}

/// The wire collaborator the submission flow talks to. Production uses the
/// HTTP client; tests substitute a scripted fake.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> ApiOutcome;
}

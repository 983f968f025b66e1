use hanguk_model::{ErrorKind, ModelError};
use hanguk_types::LookupFailure;

/// Longest provider message shown to the user
const MAX_DETAIL_CHARS: usize = 100;

/// Failure of a lookup as the user sees it. `Display` is the message shown
/// in place of the result card.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("API Key가 잘못되었습니다. (Invalid API Key)")]
    Auth(#[source] ModelError),

    #[error("하루 무료 사용량을 초과했습니다. (Quota Exceeded)")]
    QuotaExceeded(#[source] ModelError),

    #[error("모델을 찾을 수 없습니다. (Model Not Found)")]
    ModelUnavailable(#[source] ModelError),

    #[error("응답을 해석할 수 없습니다. (Malformed Response)")]
    MalformedResponse(#[source] ModelError),

    #[error("오류가 발생했습니다: {0}...")]
    Unknown(String),

    #[error("검색어를 입력해 주세요. (Empty Query)")]
    EmptyQuery,
}

impl LookupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::Auth(_) => ErrorKind::Auth,
            LookupError::QuotaExceeded(_) => ErrorKind::QuotaExceeded,
            LookupError::ModelUnavailable(_) => ErrorKind::ModelUnavailable,
            LookupError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            LookupError::Unknown(_) | LookupError::EmptyQuery => ErrorKind::Unknown,
        }
    }

    /// Event form for the front end
    pub fn to_failure(&self) -> LookupFailure {
        LookupFailure {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

impl From<ModelError> for LookupError {
    fn from(e: ModelError) -> Self {
        match e.kind() {
            ErrorKind::Auth => LookupError::Auth(e),
            ErrorKind::QuotaExceeded => LookupError::QuotaExceeded(e),
            ErrorKind::ModelUnavailable => LookupError::ModelUnavailable(e),
            ErrorKind::MalformedResponse => LookupError::MalformedResponse(e),
            ErrorKind::Unknown => LookupError::Unknown(truncate(&e.to_string(), MAX_DETAIL_CHARS)),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

use thiserror::Error;

/// Failure of a single service call. The service layer never interprets
/// these; callers classify them with [`ApiError::kind`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server responded {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("local store error: {0}")]
    Store(anyhow::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Unauthorized,
    Forbidden,
    NotFound,
    /// 422, with the server's message when it sent one.
    Validation(Option<String>),
    Server,
    Other,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(e) if e.is_connect() || e.is_timeout() || e.is_request() => {
                ErrorKind::Network
            }
            Self::Status { status, body } => match *status {
                401 => ErrorKind::Unauthorized,
                403 => ErrorKind::Forbidden,
                404 => ErrorKind::NotFound,
                422 => ErrorKind::Validation(server_message(body)),
                500..=599 => ErrorKind::Server,
                _ => ErrorKind::Other,
            },
            _ => ErrorKind::Other,
        }
    }

    pub fn user_message(&self) -> String {
        self.kind().user_message()
    }
}

impl ErrorKind {
    pub fn user_message(&self) -> String {
        match self {
            Self::Network => "Unable to reach the server. Check your connection and try again.".into(),
            Self::Unauthorized => "Your session has expired. Please sign in again.".into(),
            Self::Forbidden => "You don't have permission to do that.".into(),
            Self::NotFound => "That item no longer exists.".into(),
            Self::Validation(Some(message)) => message.clone(),
            Self::Validation(None) => "Some of the information entered is invalid.".into(),
            Self::Server => "The server ran into a problem. Please try again later.".into(),
            Self::Other => "Something went wrong. Please try again.".into(),
        }
    }

    /// Whether offering a retry makes sense for this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network | Self::Server)
    }
}

/// `message`, or else the first entry of `errors`, from a JSON error body.
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
        return Some(message.to_string());
    }
    value
        .get("errors")?
        .as_object()?
        .values()
        .find_map(|field| match field {
            serde_json::Value::Array(msgs) => msgs.first()?.as_str().map(String::from),
            serde_json::Value::String(msg) => Some(msg.clone()),
            _ => None,
        })
}

use reqwest::StatusCode;

/// Non-2xx answer from an upstream that carried no better explanation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("upstream answered {status_code}")]
pub struct ServerError {
    pub status_code: u16,
}

impl From<StatusCode> for ServerError {
    fn from(status: StatusCode) -> Self {
        Self {
            status_code: status.as_u16(),
        }
    }
}

pub fn check_status(status: StatusCode) -> Result<(), ServerError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(status.into())
    }
}

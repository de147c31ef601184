use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("Client error: status code: {status_code}, error code: {error_code:?}, error message: {error_message}")]
    ClientRequest {
        status_code: u16,
        error_code: Option<u16>,
        error_message: String,
    },
    #[error("Server error: status code: {status_code}, error message: {error_message}")]
    ServerRequest {
        status_code: u16,
        error_message: String,
    },
    #[error("Generic request error: {0}")]
    GenericRequest(String),
    #[error("Json parse error: {0}")]
    JsonParse(String),
    #[error("Float parse error for {field}: {value:?}")]
    FloatStringParse { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;

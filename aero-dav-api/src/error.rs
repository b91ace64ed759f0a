use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    /// The current element is not the one the caller tried to read,
    /// another reader can be tried on it.
    #[error("Recoverable")]
    Recoverable,
    #[error("Wrong token")]
    WrongToken,
    #[error("Utf8 Error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),
    #[error("Quick XML error: {0}")]
    QuickXml(#[from] quick_xml::Error),
    #[error("Time format error: {0}")]
    Chrono(chrono::format::ParseError),
    #[error("Not an RFC 1123 date: {0:?}")]
    TimeLayout(String),
    #[error("Number parsing error: {0}")]
    Int(#[from] std::num::ParseIntError),
    #[error("Found EOF while expecting data")]
    Eof,
}

// chrono only implements std::error::Error with its std feature
impl From<chrono::format::ParseError> for DecodeError {
    fn from(value: chrono::format::ParseError) -> Self {
        Self::Chrono(value)
    }
}

use thiserror::Error;

use crate::request::CancelReason;

/// Failure of the transport layer while talking to the gateway
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to parse response: {0}")]
    Decode(String),
    #[error("Failed to serialize request: {0}")]
    Encode(String),
}

/// Outcome error of a single call issued through a `RequestLifecycle`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Not a failure: the call was abandoned on purpose
    #[error("Request cancelled: {0}")]
    Cancelled(CancelReason),
}

impl RequestError {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, RequestError::Cancelled(_))
    }

    pub fn cancel_reason(&self) -> Option<&CancelReason> {
        match self {
            RequestError::Cancelled(reason) => Some(reason),
            RequestError::Transport(_) => None,
        }
    }
}

/// Why an upstream record could not be turned into an expense entry
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("record is not an object with `properties`")]
    NotAnObject,
    #[error("missing property `{0}`")]
    MissingProperty(String),
    #[error("invalid property `{path}`: {reason}")]
    InvalidProperty { path: String, reason: String },
    #[error("invalid date `{0}`")]
    InvalidDate(String),
}

/// Failure of a whole `fetch_all` aggregation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregationError {
    #[error(transparent)]
    Transport(TransportError),
    #[error("Request cancelled: {0}")]
    Cancelled(CancelReason),
    #[error("Invalid page {page}: {reason}")]
    InvalidPage { page: usize, reason: String },
    #[error("Malformed record {index} on page {page}: {source}")]
    MalformedRecord {
        page: usize,
        index: usize,
        #[source]
        source: RecordError,
    },
}

impl AggregationError {
    /// Cancellations are never shown to the user
    pub fn is_silent(&self) -> bool {
        matches!(self, AggregationError::Cancelled(_))
    }
}

impl From<RequestError> for AggregationError {
    fn from(error: RequestError) -> Self {
        match error {
            RequestError::Transport(e) => AggregationError::Transport(e),
            RequestError::Cancelled(reason) => AggregationError::Cancelled(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_cancellation_helpers() {
        let cancelled = RequestError::Cancelled(CancelReason::ComponentUpdate);
        assert!(cancelled.is_cancellation());
        assert_eq!(cancelled.cancel_reason(), Some(&CancelReason::ComponentUpdate));

        let failed = RequestError::from(TransportError::Network("offline".to_string()));
        assert!(!failed.is_cancellation());
        assert_eq!(failed.cancel_reason(), None);
    }

    #[test]
    fn test_aggregation_error_from_request_error() {
        let error = AggregationError::from(RequestError::Cancelled(CancelReason::ComponentUnmount));
        assert!(error.is_silent());

        let error = AggregationError::from(RequestError::Transport(TransportError::Status {
            status: 500,
            body: "Server Error".to_string(),
        }));
        assert!(!error.is_silent());
        assert_eq!(error.to_string(), "Server error 500: Server Error");
    }

    #[test]
    fn test_malformed_record_message_names_the_path() {
        let error = AggregationError::MalformedRecord {
            page: 2,
            index: 7,
            source: RecordError::MissingProperty("Date.date.start".to_string()),
        };
        assert_eq!(
            error.to_string(),
            "Malformed record 7 on page 2: missing property `Date.date.start`"
        );
    }
}

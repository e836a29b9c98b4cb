/// Failure of a single invocation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A flag value was rejected before any request was sent.
    #[error("{0}")]
    InvalidInput(String),

    /// The server answered with a status outside `200..300`.
    #[error("HTTP {status} with content {body}")]
    Http { status: u16, body: String },

    /// Transport failures, undecodable bodies and anything else.
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn invalid(message: &str) -> Self {
        Self::InvalidInput(message.to_string())
    }

    /// Process exit status for this failure. Usage mistakes share clap's code.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidInput(_) => 2,
            Self::Http { .. } | Self::Unexpected(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_mentions_status_and_body() {
        let err = Error::Http {
            status: 404,
            body: "{\n    \"errors\": []\n}".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("\"errors\""));
    }

    #[test]
    fn unexpected_keeps_context_chain() {
        let inner = anyhow::anyhow!("connection refused").context("request failed");
        let err = Error::from(inner);
        assert_eq!(format!("{err:#}"), "request failed: connection refused");
    }

    #[test]
    fn every_failure_exits_non_zero() {
        let errors = [
            Error::invalid("Base URL is not valid"),
            Error::Http {
                status: 500,
                body: String::new(),
            },
            Error::from(anyhow::anyhow!("boom")),
        ];
        for err in errors {
            assert_ne!(err.exit_code(), 0);
        }
        assert_eq!(Error::invalid("API key should not be empty").exit_code(), 2);
    }
}

use thiserror::Error;

pub const FORBIDDEN_MESSAGE: &str = "You are not authorized to view this vote.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Invalid access: the novel id is missing or not a number.")]
    InvalidNovelId,

    #[error("Login is required.")]
    MissingToken,

    #[error("Voting for this round has closed.")]
    VotingClosed,

    #[error("Proposal {0} is not part of this vote.")]
    UnknownProposal(i64),

    #[error("Could not find the chapter to continue from.")]
    ChapterUnresolved,

    #[error("Invalid closing time: {0}")]
    InvalidClosingTime(String),

    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Cannot reach the server. Please try again.")]
    Network(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    /// True for failures that never left the browser.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidNovelId
                | ClientError::MissingToken
                | ClientError::VotingClosed
                | ClientError::ChapterUnresolved
                | ClientError::UnknownProposal(_)
                | ClientError::InvalidClosingTime(_)
        )
    }

    /// Message shown inline when the proposal list could not be loaded.
    pub fn load_message(&self) -> String {
        match self {
            ClientError::Http { status: 403, .. } => FORBIDDEN_MESSAGE.to_string(),
            ClientError::Http { status, message } => {
                format!("Could not load proposals ({status}): {message}")
            }
            ClientError::Network(_) | ClientError::Decode(_) => {
                "Something went wrong while loading proposals. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_load_message_differs_from_network() {
        let forbidden = ClientError::Http {
            status: 403,
            message: "Forbidden".to_string(),
        };
        let network = ClientError::Network("TypeError: failed to fetch".to_string());
        assert!(forbidden.load_message().contains("not authorized"));
        assert_ne!(forbidden.load_message(), network.load_message());
    }

    #[test]
    fn local_errors_are_flagged() {
        assert!(ClientError::MissingToken.is_local());
        assert!(ClientError::InvalidNovelId.is_local());
        assert!(!ClientError::Network("offline".to_string()).is_local());
    }

    #[test]
    fn other_statuses_keep_server_text() {
        let err = ClientError::Http {
            status: 500,
            message: "db down".to_string(),
        };
        assert_eq!(err.load_message(), "Could not load proposals (500): db down");
    }
}

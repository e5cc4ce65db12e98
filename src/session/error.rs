/// every externally-visible session failure. refusals leave the session
/// intact; only the driver decides what to do with them.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    InvalidTurn(&'static str),
    #[error("Champion '{0}' is not available (already picked, banned, or fearless blocked)")]
    Unavailable(String),
    #[error("Request for action {requested}, current is {current}")]
    Stale { requested: usize, current: usize },
    #[error("missing data: {0}")]
    MissingData(String),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("llm timed out")]
    Timeout,
    #[error("llm response unreadable: {0}")]
    Parse(String),
}

impl SessionError {
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_message_names_current_count() {
        let error = SessionError::Stale {
            requested: 0,
            current: 2,
        };
        assert!(error.to_string().contains("current is 2"));
        assert!(error.is_stale());
    }

    #[test]
    fn unavailable_message_names_champion() {
        let error = SessionError::Unavailable("Azir".to_string());
        assert!(error.to_string().contains("Azir"));
        assert!(error.to_string().contains("not available"));
    }
}

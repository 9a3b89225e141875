/// Failure of a call to an external collaborator.
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    /// Transport-level failure (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The collaborator answered with a non-2xx status code.
    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The response could not be interpreted.
    #[error("Failed to parse {service} response: {message}")]
    Parse {
        service: &'static str,
        message: String,
    },

    /// No API key or endpoint configured for this collaborator.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

/// Ensure the response has a success status code, otherwise capture the
/// status and body text in a [`CollaboratorError::Status`].
pub(crate) async fn ensure_success(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, CollaboratorError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CollaboratorError::Status {
            service,
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_names_service() {
        let err = CollaboratorError::Status {
            service: "firecrawl",
            status: 429,
            body: "rate limited".into(),
        };
        assert_eq!(err.to_string(), "firecrawl returned HTTP 429: rate limited");
    }

    #[test]
    fn not_configured_display() {
        assert_eq!(
            CollaboratorError::NotConfigured("openrouter").to_string(),
            "openrouter is not configured"
        );
    }
}

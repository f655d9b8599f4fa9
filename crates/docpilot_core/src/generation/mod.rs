//! Text generation contract and backends.
//!
//! # Responsibility
//! - Define the `TextGenerator` seam used by section services.
//! - Build synthesis/refinement prompts.
//! - Provide the HTTP-backed Groq implementation.
//!
//! # Invariants
//! - Generator failures are returned, never swallowed or retried here.
//! - Backend configuration is injected at construction, never read from the
//!   process environment by callers of `TextGenerator`.

pub mod groq;
pub mod prompts;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Failure of the text generation backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Request did not complete within the configured timeout.
    Timeout { after_secs: u64 },
    /// Backend quota or rate limit hit.
    RateLimited { retry_after_secs: Option<u64> },
    /// Credentials were rejected.
    Authentication,
    /// Non-success HTTP status not covered by other variants.
    Http { status: u16 },
    /// Connection-level failure before a response was received.
    Transport(String),
    /// Response body could not be interpreted.
    MalformedResponse(String),
    /// Backend answered with blank text.
    EmptyResponse,
}

impl Display for GenerationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout { after_secs } => {
                write!(f, "text generation timed out after {after_secs}s")
            }
            Self::RateLimited {
                retry_after_secs: Some(seconds),
            } => write!(
                f,
                "text generation rate limited (retry after {seconds} seconds)"
            ),
            Self::RateLimited {
                retry_after_secs: None,
            } => write!(f, "text generation rate limited"),
            Self::Authentication => write!(f, "text generation credentials rejected"),
            Self::Http { status } => write!(f, "text generation failed with HTTP {status}"),
            Self::Transport(details) => write!(f, "text generation request failed: {details}"),
            Self::MalformedResponse(details) => {
                write!(f, "malformed text generation response: {details}")
            }
            Self::EmptyResponse => write!(f, "text generation returned empty content"),
        }
    }
}

impl Error for GenerationError {}

impl GenerationError {
    /// Stable error code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "generation_timeout",
            Self::RateLimited { .. } => "generation_rate_limited",
            Self::Authentication => "generation_auth_failed",
            Self::Http { .. } => "generation_http_error",
            Self::Transport(_) => "generation_transport_error",
            Self::MalformedResponse(_) => "generation_malformed_response",
            Self::EmptyResponse => "generation_empty_response",
        }
    }
}

/// Opaque text generation service.
///
/// Implementations may be non-deterministic; identical prompts can yield
/// different text.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        (**self).generate(prompt)
    }
}

impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        (**self).generate(prompt)
    }
}

impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        (**self).generate(prompt)
    }
}

/// Calls `generator` and rejects blank output.
///
/// Non-blank text is returned exactly as the backend produced it.
pub fn generate_text<G: TextGenerator + ?Sized>(
    generator: &G,
    prompt: &str,
) -> Result<String, GenerationError> {
    let text = generator.generate(prompt)?;
    if text.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::{generate_text, GenerationError, TextGenerator};
    use std::sync::Arc;

    struct Fixed(&'static str);

    impl TextGenerator for Fixed {
        fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn generate_text_keeps_output_verbatim() {
        assert_eq!(
            generate_text(&Fixed("\n  body \n"), "p").unwrap(),
            "\n  body \n"
        );
    }

    #[test]
    fn generate_text_rejects_blank_output() {
        let err = generate_text(&Fixed("  \n"), "p").unwrap_err();
        assert_eq!(err, GenerationError::EmptyResponse);
    }

    #[test]
    fn shared_generators_delegate() {
        let shared: Arc<dyn TextGenerator> = Arc::new(Fixed("x"));
        assert_eq!(generate_text(&shared, "p").unwrap(), "x");
    }

    #[test]
    fn rate_limit_display_includes_retry_hint() {
        let err = GenerationError::RateLimited {
            retry_after_secs: Some(30),
        };
        assert_eq!(
            err.to_string(),
            "text generation rate limited (retry after 30 seconds)"
        );
        assert_eq!(err.code(), "generation_rate_limited");
    }
}

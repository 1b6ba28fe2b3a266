//! Prompt answers and the cancellation guard.

use std::future::Future;

use crate::error::{Error, Result};

/// Message used when the caller does not supply one.
pub const DEFAULT_CANCEL_MESSAGE: &str = "Canceled";

/// What a prompt returned: a real answer, or the user backing out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer<T> {
    Value(T),
    Cancelled,
}

impl<T> Answer<T> {
    /// Unwrap the answer, turning the cancellation marker into
    /// [`Error::Cancelled`]. Showing the message is left to the caller.
    pub fn into_result(self, message: Option<&str>) -> Result<T> {
        match self {
            Answer::Value(value) => Ok(value),
            Answer::Cancelled => {
                let message = message.unwrap_or(DEFAULT_CANCEL_MESSAGE).to_string();
                tracing::warn!(%message, "prompt cancelled");
                Err(Error::Cancelled { message })
            }
        }
    }
}

impl<T> From<Option<T>> for Answer<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Answer::Value(v),
            None => Answer::Cancelled,
        }
    }
}

/// Await a prompt and pass its value through.
///
/// A cancelled prompt yields `Err(Error::Cancelled)` carrying `message`
/// (default [`DEFAULT_CANCEL_MESSAGE`]). Callers treat that as a clean stop,
/// not a failure; nothing already written is undone.
pub async fn cancelable<T, F>(prompt: F, message: Option<&str>) -> Result<T>
where
    F: Future<Output = Result<Answer<T>>>,
{
    prompt.await?.into_result(message)
}

/// The interactive prompt service.
pub trait Prompter {
    fn text(&mut self, prompt: &str, default: Option<&str>) -> Result<Answer<String>>;

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<Answer<bool>>;

    /// Index of the chosen item.
    fn select(&mut self, prompt: &str, items: &[&str], default: usize) -> Result<Answer<usize>>;
}

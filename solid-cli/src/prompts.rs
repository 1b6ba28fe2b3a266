use std::io;

use dialoguer::{Confirm, Input, Select};
use solid_create::prompt::{Answer, Prompter};
use solid_create::{Error, Result};

/// The message of a cancelled prompt, if that is what `err` is.
pub fn cancellation(err: &anyhow::Error) -> Option<&str> {
    match err.downcast_ref::<Error>()? {
        Error::Cancelled { message } => Some(message.as_str()),
        _ => None,
    }
}

/// [`Prompter`] backed by `dialoguer` on the controlling terminal.
///
/// Esc/`q` on a select or confirm and Ctrl-C anywhere come back as
/// [`Answer::Cancelled`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Terminal;

fn into_answer<T>(result: std::result::Result<Option<T>, dialoguer::Error>) -> Result<Answer<T>> {
    match result {
        Ok(value) => Ok(value.into()),
        Err(e) => {
            let e = io::Error::from(e);
            if e.kind() == io::ErrorKind::Interrupted {
                Ok(Answer::Cancelled)
            } else {
                Err(Error::Prompt(e))
            }
        }
    }
}

impl Prompter for Terminal {
    fn text(&mut self, prompt: &str, default: Option<&str>) -> Result<Answer<String>> {
        let mut input = Input::<String>::new().with_prompt(prompt);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        into_answer(input.interact_text().map(Some))
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<Answer<bool>> {
        into_answer(
            Confirm::new()
                .with_prompt(prompt)
                .default(default)
                .interact_opt(),
        )
    }

    fn select(&mut self, prompt: &str, items: &[&str], default: usize) -> Result<Answer<usize>> {
        into_answer(
            Select::new()
                .with_prompt(prompt)
                .items(items)
                .default(default)
                .interact_opt(),
        )
    }
}

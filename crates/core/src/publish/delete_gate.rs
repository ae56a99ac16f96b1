//! Optional confirmation phrase asked for before deleting a record.
//!
//! This is a speed bump against accidental deletes, not access control: the
//! phrase is a shared constant and anyone who knows it can delete.

use crate::errors::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct DeleteGate {
    phrase: Option<String>,
}

impl DeleteGate {
    /// Gate that lets every delete through.
    pub fn open() -> Self {
        Self::default()
    }

    pub fn with_phrase(phrase: impl Into<String>) -> Self {
        let phrase = phrase.into();
        Self {
            phrase: (!phrase.is_empty()).then_some(phrase),
        }
    }

    pub fn is_required(&self) -> bool {
        self.phrase.is_some()
    }

    pub fn check(&self, supplied: Option<&str>) -> Result<()> {
        match (&self.phrase, supplied) {
            (None, _) => Ok(()),
            (Some(expected), Some(given)) if given == expected => Ok(()),
            (Some(_), None) => Err(Error::ConfirmationRejected(
                "Delete confirmation phrase is required".into(),
            )),
            (Some(_), Some(_)) => Err(Error::ConfirmationRejected(
                "Incorrect confirmation phrase. Deletion cancelled.".into(),
            )),
        }
    }
}

//! Call status gate and building the payload of a call submission

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::bag::ValueBag;
use crate::error::MissingRequired;
use crate::field::FieldDescriptor;
use crate::validate::check_required;

/// Outcome of a call; only completed calls carry feedback
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    #[default]
    Completed,
    Failed,
    Busy,
}

impl CallStatus {
    pub const ALL: [CallStatus; 3] = [CallStatus::Completed, CallStatus::Failed, CallStatus::Busy];

    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Completed => "completed",
            CallStatus::Failed => "failed",
            CallStatus::Busy => "busy",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CallStatus::Completed => "Completed",
            CallStatus::Failed => "Failed",
            CallStatus::Busy => "Busy",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    /// Feedback fields are shown, required and submitted only for completed calls
    pub fn requires_feedback(&self) -> bool {
        matches!(self, CallStatus::Completed)
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a call form sends: the status, the feedback object and new files
#[derive(Clone, Debug, PartialEq)]
pub struct Submission<F> {
    pub status: CallStatus,
    pub feedback: Map<String, Value>,
    /// Field name and newly chosen file, one multipart part each
    pub files: Vec<(String, F)>,
}

impl<F: Clone> Submission<F> {
    /// Build the payload for `status` from the bag.
    ///
    /// A call that is not completed submits no feedback and no files whatever
    /// the bag holds. A completed call must pass the required-field check.
    pub fn prepare(
        schema: &[FieldDescriptor],
        bag: &ValueBag<F>,
        status: CallStatus,
    ) -> Result<Self, MissingRequired> {
        if !status.requires_feedback() {
            return Ok(Self {
                status,
                feedback: Map::new(),
                files: Vec::new(),
            });
        }

        check_required(schema, bag)?;

        Ok(Self {
            status,
            feedback: bag.to_feedback(schema),
            files: bag.chosen_files(schema),
        })
    }

    /// Feedback serialized for the `feedback` multipart part
    pub fn feedback_json(&self) -> String {
        Value::Object(self.feedback.clone()).to_string()
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }
}

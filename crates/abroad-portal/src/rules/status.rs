use std::collections::BTreeSet;

use crate::config::StatusConfig;

/// Anything carrying an application status label.
pub trait StatusBearing {
    fn status(&self) -> Option<&str>;
}

/// Whether a student may still act on an application in a given status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAccess {
    Editable,
    ReadOnly,
}

/// Narrows fetched application records to the statuses a view recognizes.
///
/// Labels are matched case-insensitively. Records without a status and
/// placeholders for failed per-row fetches are dropped silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFilter {
    editable: BTreeSet<String>,
    read_only: BTreeSet<String>,
}

fn fold(label: &str) -> String {
    label.trim().to_lowercase()
}

impl StatusFilter {
    pub fn new<E, R, S>(editable: E, read_only: R) -> Self
    where
        E: IntoIterator<Item = S>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            editable: editable.into_iter().map(|label| fold(label.as_ref())).collect(),
            read_only: read_only.into_iter().map(|label| fold(label.as_ref())).collect(),
        }
    }

    pub fn from_config(config: &StatusConfig) -> Self {
        Self::new(&config.editable, &config.read_only)
    }

    /// Editable wins when a label is configured in both sets.
    pub fn access(&self, status: &str) -> Option<StatusAccess> {
        let folded = fold(status);
        if self.editable.contains(&folded) {
            Some(StatusAccess::Editable)
        } else if self.read_only.contains(&folded) {
            Some(StatusAccess::ReadOnly)
        } else {
            None
        }
    }

    pub fn accepts(&self, status: Option<&str>) -> bool {
        status.is_some_and(|status| self.access(status).is_some())
    }

    /// Keep the records whose status is recognized. `None` entries stand for
    /// per-row fetches that failed.
    pub fn filter<T, I>(&self, records: I) -> Vec<T>
    where
        T: StatusBearing,
        I: IntoIterator<Item = Option<T>>,
    {
        records
            .into_iter()
            .flatten()
            .filter(|record| self.accepts(record.status()))
            .collect()
    }

    pub fn retain<T: StatusBearing>(&self, records: &mut Vec<T>) {
        records.retain(|record| self.accepts(record.status()));
    }
}

impl Default for StatusFilter {
    fn default() -> Self {
        Self::from_config(&StatusConfig::default())
    }
}

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use super::period::{Period, PeriodId};
use crate::error::SchedulerError;

/// Identifier of a task row, as assigned by the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A schedulable order shown as the main bar on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Order number, used as the row label.
    pub name: String,
    #[serde(default)]
    pub machine_unit: Option<String>,
    pub start: NaiveDate,
    /// Exclusive end of the task bar.
    pub end: NaiveDate,
    /// People assigned to the order.
    #[serde(default)]
    pub resources: Assignees,
    /// Places assigned to the order.
    #[serde(default)]
    pub places: Assignees,
    /// Trial-run periods. Mutated only through `PeriodScheduler`.
    #[serde(default)]
    pub periods: Vec<Period>,
}

impl Task {
    /// Create a task with no assignments and no periods.
    pub fn new(id: TaskId, name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id,
            name: name.into(),
            machine_unit: None,
            start,
            end: end.max(start),
            resources: Assignees::default(),
            places: Assignees::default(),
            periods: Vec::new(),
        }
    }

    pub fn period(&self, id: &PeriodId) -> Option<&Period> {
        self.periods.iter().find(|p| &p.id == id)
    }

    pub fn period_mut(&mut self, id: &PeriodId) -> Option<&mut Period> {
        self.periods.iter_mut().find(|p| &p.id == id)
    }
}

/// Ordered set of reference ids (people or places).
///
/// Stored rows carry these either as a JSON array or as a comma-delimited
/// string; both collapse into this one shape on the way in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignees(Vec<u64>);

impl Assignees {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-delimited list such as `"3, 1,2"`. Blank entries are skipped.
    pub fn parse(raw: &str) -> Result<Self, SchedulerError> {
        let mut set = Self::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let id = part
                .parse::<u64>()
                .map_err(|_| SchedulerError::Validation(format!("invalid id '{}'", part)))?;
            set.insert(id);
        }
        Ok(set)
    }

    /// Insert an id, keeping first-seen order. Returns false on duplicates.
    pub fn insert(&mut self, id: u64) -> bool {
        if self.0.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.0.len();
        self.0.retain(|x| *x != id);
        self.0.len() != before
    }

    pub fn contains(&self, id: u64) -> bool {
        self.0.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<u64> for Assignees {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl Serialize for Assignees {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.is_empty() {
            serializer.serialize_none()
        } else {
            self.0.serialize(serializer)
        }
    }
}

/// Lenient on the way in: entries that are not ids are logged and dropped so
/// one bad cell never costs the whole row.
impl<'de> Deserialize<'de> for Assignees {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            One(u64),
            Many(Vec<Value>),
            Delimited(String),
            Other(Value),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None => Self::new(),
            Some(Raw::One(id)) => std::iter::once(id).collect(),
            Some(Raw::Many(items)) => items.iter().filter_map(lenient_id).collect(),
            Some(Raw::Delimited(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .filter_map(|part| match part.parse::<u64>() {
                    Ok(id) => Some(id),
                    Err(_) => {
                        warn!("dropping invalid id '{}'", part);
                        None
                    }
                })
                .collect(),
            Some(Raw::Other(value)) => {
                warn!("ignoring unexpected id list {}", value);
                Self::new()
            }
        })
    }
}

fn lenient_id(value: &Value) -> Option<u64> {
    let id = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    if id.is_none() {
        warn!("dropping invalid id {}", value);
    }
    id
}

use crate::error::{Result, TodoError};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority or urgency of an item, always within 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(1);
    pub const MAX: Level = Level(5);

    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Level(value))
        } else {
            Err(TodoError::InvalidLevel(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::MIN
    }
}

impl TryFrom<u8> for Level {
    type Error = TodoError;

    fn try_from(value: u8) -> Result<Self> {
        Level::new(value)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Point in time as epoch seconds, kept exactly as read from the store
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Timestamp(f64);

impl Timestamp {
    /// Current time, whole seconds
    pub fn now() -> Self {
        Timestamp(Utc::now().timestamp() as f64)
    }

    /// Validate a stored value. It must name an instant chrono can represent.
    pub fn from_secs(field: &'static str, secs: f64) -> Result<Self> {
        let ts = Timestamp(secs);
        if secs.is_finite() && ts.to_datetime().is_some() {
            Ok(ts)
        } else {
            Err(TodoError::InvalidField {
                field,
                reason: format!("{secs} is not a valid timestamp"),
            })
        }
    }

    pub fn as_secs(self) -> f64 {
        self.0
    }

    /// Nearest instant, for display
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        let whole = self.0.floor();
        let nanos = ((self.0 - whole) * 1e9).round().min(999_999_999.0) as u32;
        DateTime::from_timestamp(whole as i64, nanos)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp(dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) / 1e9)
    }
}

/// A single todo entry
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    /// Creation time. Never changes after creation.
    pub date: Timestamp,
    pub completed: bool,
    pub priority: Level,
    pub urgency: Level,
    pub deadline: Option<Timestamp>,
}

/// New item input
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub priority: Level,
    pub urgency: Level,
    pub deadline: Option<DateTime<Utc>>,
}

impl Item {
    /// Build a fresh, uncompleted item stamped with the current time
    pub fn create(new: NewItem) -> Self {
        Item {
            name: new.name,
            description: new.description,
            tags: new.tags,
            date: Timestamp::now(),
            completed: false,
            priority: new.priority,
            urgency: new.urgency,
            deadline: new.deadline.map(Timestamp::from),
        }
    }

    pub fn to_record(&self) -> ItemRecord {
        ItemRecord {
            name: Some(self.name.clone()),
            tags: self.tags.clone(),
            description: self.description.clone(),
            date: Some(self.date.as_secs()),
            completed: self.completed,
            priority: self.priority.get(),
            urgency: self.urgency.get(),
            deadline: self.deadline.map(Timestamp::as_secs),
        }
    }

    pub fn from_record(record: ItemRecord) -> Result<Self> {
        let name = record
            .name
            .ok_or(TodoError::MissingField { field: "name" })?;
        let date = record
            .date
            .ok_or(TodoError::MissingField { field: "date" })?;

        Ok(Item {
            name,
            description: record.description,
            tags: record.tags,
            date: Timestamp::from_secs("date", date)?,
            completed: record.completed,
            priority: record_level("priority", record.priority)?,
            urgency: record_level("urgency", record.urgency)?,
            deadline: record
                .deadline
                .map(|secs| Timestamp::from_secs("deadline", secs))
                .transpose()?,
        })
    }

    /// `name [tag1, tag2]`, or just the name when there are no tags
    pub fn brief_label(&self) -> String {
        if self.tags.is_empty() {
            self.name.clone()
        } else {
            format!("{} [{}]", self.name, self.tags.join(", "))
        }
    }

    /// `name PxU [tags]` followed by the description on its own line
    pub fn detail_label(&self) -> String {
        let due = match self.deadline.and_then(Timestamp::to_datetime) {
            Some(deadline) => format!(" due {}", deadline.format("%Y-%m-%d")),
            None => String::new(),
        };
        format!(
            "{} {}x{} [{}]{}\n{}",
            self.name,
            self.priority,
            self.urgency,
            self.tags.join(", "),
            due,
            self.description
        )
    }
}

/// On-disk form of an item.
///
/// `name` and `date` are optional here so that a record missing them can be
/// reported as a domain error instead of a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: Option<f64>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default = "default_level")]
    pub priority: u8,
    #[serde(default = "default_level")]
    pub urgency: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<f64>,
}

/// On-disk form of a list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListRecord {
    #[serde(default)]
    pub items: Vec<ItemRecord>,
}

/// The whole store file: list name to list, in file order
pub type Document = IndexMap<String, ListRecord>;

fn default_level() -> u8 {
    Level::MIN.get()
}

fn record_level(field: &'static str, value: u8) -> Result<Level> {
    Level::new(value).map_err(|e| TodoError::InvalidField {
        field,
        reason: e.to_string(),
    })
}

/// An ordered collection of items. Position is the display number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct List {
    items: Vec<Item>,
}

impl List {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one item per record
    pub fn load(&mut self, records: Vec<ItemRecord>) -> Result<()> {
        for record in records {
            self.items.push(Item::from_record(record)?);
        }
        Ok(())
    }

    pub fn save(&self) -> Vec<ItemRecord> {
        self.items.iter().map(Item::to_record).collect()
    }

    /// Append an item, taking ownership of it
    pub fn insert(&mut self, item: Item) -> &Item {
        self.items.push(item);
        &self.items[self.items.len() - 1]
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Index of the first item with this name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name == name)
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Item> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Remove the first item with this name. Returns whether one was removed.
    pub fn delete_by_name(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => self.remove_at(index).is_some(),
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

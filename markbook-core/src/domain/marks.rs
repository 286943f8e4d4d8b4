//! Marks domain model
//!
//! A marks table is either empty (nothing submitted yet) or holds exactly one
//! row per subject in the fixed order of [`Subject::ALL`]. Both constructors
//! enforce that, so a `MarksTable` value is always in one of those two shapes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// Highest mark a subject can receive
pub const MAX_MARK: u8 = 100;

/// The fixed subject set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Subject {
    Maths,
    Physics,
    Chemistry,
    Biology,
    English,
    #[serde(rename = "ICT")]
    Ict,
    History,
}

impl Subject {
    /// Every subject, in table order
    pub const ALL: [Subject; 7] = [
        Subject::Maths,
        Subject::Physics,
        Subject::Chemistry,
        Subject::Biology,
        Subject::English,
        Subject::Ict,
        Subject::History,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Subject::Maths => "Maths",
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
            Subject::Biology => "Biology",
            Subject::English => "English",
            Subject::Ict => "ICT",
            Subject::History => "History",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Subject {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Subject::ALL
            .into_iter()
            .find(|subject| subject.name() == s)
            .ok_or_else(|| Error::validation(format!("Unknown subject: {}", s)))
    }
}

/// A single mark, 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Mark(u8);

impl Mark {
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Mark {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        if (0..=i64::from(MAX_MARK)).contains(&value) {
            Ok(Mark(value as u8))
        } else {
            Err(Error::validation(format!(
                "Mark {} is outside 0..={}",
                value, MAX_MARK
            )))
        }
    }
}

impl From<Mark> for u8 {
    fn from(mark: Mark) -> Self {
        mark.0
    }
}

impl FromStr for Mark {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| Error::validation(format!("Mark '{}' is not an integer", s.trim())))?;
        Mark::try_from(value)
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One (Subject, Marks) row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkRow {
    pub subject: Subject,
    pub marks: Mark,
}

/// A user's marks table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<MarkRow>", into = "Vec<MarkRow>")]
pub struct MarksTable {
    rows: Vec<MarkRow>,
}

impl MarksTable {
    /// A table nobody has submitted yet
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a full table from seven marks given in [`Subject::ALL`] order
    pub fn from_marks(values: &[i64]) -> Result<Self> {
        check_count(values.len())?;

        let rows = Subject::ALL
            .into_iter()
            .zip(values)
            .map(|(subject, &value)| {
                Mark::try_from(value)
                    .map(|marks| MarkRow { subject, marks })
                    .map_err(|e| for_subject(subject, e))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rows })
    }

    /// Parse seven textual marks, e.g. from a form or the command line
    pub fn parse_marks<S: AsRef<str>>(values: &[S]) -> Result<Self> {
        check_count(values.len())?;

        let parsed = values
            .iter()
            .zip(Subject::ALL)
            .map(|(raw, subject)| {
                raw.as_ref()
                    .parse::<Mark>()
                    .map(|m| i64::from(m.value()))
                    .map_err(|e| for_subject(subject, e))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_marks(&parsed)
    }

    /// Check a list of rows read back from storage
    ///
    /// Accepts zero rows or exactly the seven subjects in table order.
    pub fn from_rows(rows: Vec<MarkRow>) -> Result<Self> {
        if rows.is_empty() {
            return Ok(Self::empty());
        }

        let subjects: Vec<Subject> = rows.iter().map(|r| r.subject).collect();
        if subjects != Subject::ALL {
            let names: Vec<&str> = subjects.iter().map(Subject::name).collect();
            return Err(Error::validation(format!(
                "Expected subjects {:?} in order, got {:?}",
                Subject::ALL.map(|s| s.name()),
                names
            )));
        }

        Ok(Self { rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[MarkRow] {
        &self.rows
    }

    pub fn get(&self, subject: Subject) -> Option<Mark> {
        self.rows
            .iter()
            .find(|row| row.subject == subject)
            .map(|row| row.marks)
    }

    /// Sum of all marks (0 for an empty table)
    pub fn total(&self) -> u32 {
        self.rows.iter().map(|r| u32::from(r.marks.value())).sum()
    }
}

fn check_count(got: usize) -> Result<()> {
    if got != Subject::ALL.len() {
        return Err(Error::validation(format!(
            "Expected {} marks (one per subject), got {}",
            Subject::ALL.len(),
            got
        )));
    }
    Ok(())
}

/// Prefix a validation message with the subject it concerns
fn for_subject(subject: Subject, err: Error) -> Error {
    match err {
        Error::Validation(msg) => Error::validation(format!("{}: {}", subject, msg)),
        other => other,
    }
}

impl TryFrom<Vec<MarkRow>> for MarksTable {
    type Error = Error;

    fn try_from(rows: Vec<MarkRow>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<MarksTable> for Vec<MarkRow> {
    fn from(table: MarksTable) -> Self {
        table.rows
    }
}

//! Report service - chart data for the report page

use std::sync::Arc;

use crate::domain::result::Result;
use crate::domain::Report;
use crate::ports::MarksStore;

#[derive(Clone)]
pub struct ReportService {
    marks: Arc<dyn MarksStore>,
}

impl ReportService {
    pub fn new(marks: Arc<dyn MarksStore>) -> Self {
        Self { marks }
    }

    /// Build the report for a user (no charts if nothing was submitted)
    pub fn build(&self, user_key: &str) -> Result<Report> {
        let table = self.marks.load_table(user_key)?;
        Ok(Report::from_table(table))
    }
}

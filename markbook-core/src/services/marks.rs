//! Marks service - submitting and reading a user's marks

use std::sync::Arc;

use crate::domain::result::Result;
use crate::domain::MarksTable;
use crate::ports::MarksStore;

#[derive(Clone)]
pub struct MarksService {
    marks: Arc<dyn MarksStore>,
}

impl MarksService {
    pub fn new(marks: Arc<dyn MarksStore>) -> Self {
        Self { marks }
    }

    /// Replace the user's table with seven marks given in subject order
    pub fn submit_marks(&self, user_key: &str, marks: &[i64]) -> Result<MarksTable> {
        let table = MarksTable::from_marks(marks)?;
        self.submit_table(user_key, &table)?;
        Ok(table)
    }

    /// Replace the user's table with an already validated one
    pub fn submit_table(&self, user_key: &str, table: &MarksTable) -> Result<()> {
        self.marks.save_table(user_key, table)
    }

    /// The user's latest submission, or an empty table
    pub fn get_report_data(&self, user_key: &str) -> Result<MarksTable> {
        self.marks.load_table(user_key)
    }
}

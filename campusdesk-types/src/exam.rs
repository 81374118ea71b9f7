use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A scheduled examination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    pub id: String,
    pub name: String,
    pub course: String,
    pub date: NaiveDate,
    pub subjects: Vec<String>,
    pub published: bool,
}

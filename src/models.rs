use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Full-Time")]
    FullTime,
    #[serde(rename = "Part-Time")]
    PartTime,
    #[serde(rename = "Contract")]
    Contract,
}

impl JobType {
    /// Select options, in the order the form offers them.
    pub const ALL: [JobType; 3] = [JobType::FullTime, JobType::PartTime, JobType::Contract];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-Time",
            JobType::PartTime => "Part-Time",
            JobType::Contract => "Contract",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = ValidationError;

    // Exact match only: "full-time" or " Contract" are not accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(ValidationError::InvalidEnum)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: usize, // collection size + 1 at creation, see form::submit
    pub title: String,
    pub date_posted: DateTime<Local>,
    pub company: String,
    pub job_type: JobType,
    pub location: String,
    pub description: String,
    pub qualifications: String,
}

/// Uncommitted form values. `job_type` stays raw text until validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    pub description: String,
    pub qualifications: String,
    pub date: DateTime<Local>,
}

impl Draft {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            title: String::new(),
            company: String::new(),
            location: String::new(),
            job_type: String::new(),
            description: String::new(),
            qualifications: String::new(),
            date: now,
        }
    }

    /// True when every text field is empty, i.e. the draft is in its
    /// initial state apart from the date.
    pub fn is_blank(&self) -> bool {
        [
            &self.title,
            &self.company,
            &self.location,
            &self.job_type,
            &self.description,
            &self.qualifications,
        ]
        .iter()
        .all(|s| s.is_empty())
    }
}

impl Default for Draft {
    fn default() -> Self {
        Self::new(Local::now())
    }
}

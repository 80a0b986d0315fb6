use std::fmt;
use thiserror::Error;

/// Text fields that must be non-blank for a posting to be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Company,
    Location,
    Description,
    Qualifications,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RequiredField::Company => "Company Name",
            RequiredField::Location => "Location",
            RequiredField::Description => "Job Description",
            RequiredField::Qualifications => "Qualifications",
        };
        f.write_str(label)
    }
}

/// A failed form rule. The `Display` text is what the user sees.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title must be at least 10 characters")]
    TitleTooShort,

    #[error("{0} is required")]
    MissingField(RequiredField),

    #[error("Type must be one of the following: Full-time, Part-time, Contract")]
    InvalidEnum,

    // Today is accepted; only earlier days fail.
    #[error("Date posted must be in the future")]
    DateInPast,
}

use chrono::{DateTime, Days, Duration, Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};

use crate::error::{RequiredField, ValidationError};
use crate::models::{Draft, JobPosting, JobType};

pub const MIN_TITLE_LEN: usize = 10;

/// Check every rule against the draft and collect the failures in rule order.
/// An empty result means the draft can become a posting.
pub fn validate(draft: &Draft, today: NaiveDate) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if draft.title.chars().count() < MIN_TITLE_LEN {
        errors.push(ValidationError::TitleTooShort);
    }
    if is_blank(&draft.company) {
        errors.push(ValidationError::MissingField(RequiredField::Company));
    }
    if is_blank(&draft.location) {
        errors.push(ValidationError::MissingField(RequiredField::Location));
    }
    if draft.job_type.parse::<JobType>().is_err() {
        errors.push(ValidationError::InvalidEnum);
    }
    if is_blank(&draft.description) {
        errors.push(ValidationError::MissingField(RequiredField::Description));
    }
    if is_blank(&draft.qualifications) {
        errors.push(ValidationError::MissingField(RequiredField::Qualifications));
    }
    if draft.date.date_naive() < today {
        errors.push(ValidationError::DateInPast);
    }

    errors
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Turn a draft into a record. Values are stored as typed, untrimmed.
pub fn build_posting(draft: &Draft, id: usize) -> Result<JobPosting, ValidationError> {
    Ok(JobPosting {
        id,
        title: draft.title.clone(),
        date_posted: draft.date,
        company: draft.company.clone(),
        job_type: draft.job_type.parse()?,
        location: draft.location.clone(),
        description: draft.description.clone(),
        qualifications: draft.qualifications.clone(),
    })
}

/// Move by calendar days, keeping the wall-clock time where it exists.
/// A time that falls into a DST gap on the target day becomes that day's
/// first valid whole hour. Out-of-range results leave `date` unchanged.
pub fn shift_days(date: DateTime<Local>, days: i64) -> DateTime<Local> {
    let local = date.naive_local();
    let step = Days::new(days.unsigned_abs());
    let target = if days < 0 {
        local.checked_sub_days(step)
    } else {
        local.checked_add_days(step)
    };
    let Some(target) = target else {
        return date;
    };

    target
        .and_local_timezone(Local)
        .earliest()
        .or_else(|| {
            (0..24).find_map(|hour| {
                target
                    .date()
                    .and_hms_opt(hour, 0, 0)?
                    .and_local_timezone(Local)
                    .earliest()
            })
        })
        .unwrap_or(date)
}

/// Copy-on-write append: `jobs` is left as it was.
pub fn append_posting(jobs: &[JobPosting], posting: JobPosting) -> Vec<JobPosting> {
    let mut next = Vec::with_capacity(jobs.len() + 1);
    next.extend_from_slice(jobs);
    next.push(posting);
    next
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Accepted(JobPosting),
    Rejected(Vec<ValidationError>),
}

/// Form inputs in display order, ending with the submit button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    DatePosted,
    Company,
    JobType,
    Location,
    Description,
    Qualifications,
    Submit,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Title,
        Field::DatePosted,
        Field::Company,
        Field::JobType,
        Field::Location,
        Field::Description,
        Field::Qualifications,
        Field::Submit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Title => "Job Title",
            Field::DatePosted => "Date Posted",
            Field::Company => "Company Name",
            Field::JobType => "Job Type",
            Field::Location => "Location",
            Field::Description => "Description",
            Field::Qualifications => "Qualifications",
            Field::Submit => "Submit new Job",
        }
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self, Field::Description | Field::Qualifications)
    }

    fn index(&self) -> usize {
        Field::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Field {
        Field::ALL[(self.index() + 1) % Field::ALL.len()]
    }

    pub fn prev(&self) -> Field {
        Field::ALL[(self.index() + Field::ALL.len() - 1) % Field::ALL.len()]
    }
}

/// What a key press did to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormInput {
    Edited,
    Moved,
    SubmitRequested,
    Ignored,
}

#[derive(Debug, Clone)]
pub struct JobForm {
    draft: Draft,
    errors: Vec<ValidationError>,
    focus: Field,
}

impl JobForm {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            draft: Draft::new(now),
            errors: Vec::new(),
            focus: Field::Title,
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn set_focus(&mut self, field: Field) {
        self.focus = field;
    }

    /// Validate the draft and, if it passes, hand `set_jobs` a new collection
    /// with the posting appended. `set_jobs` runs at most once, and only on
    /// acceptance. A rejected draft keeps its values.
    pub fn submit<F>(&mut self, jobs: &[JobPosting], now: DateTime<Local>, set_jobs: F) -> Submission
    where
        F: FnOnce(Vec<JobPosting>),
    {
        self.errors.clear();

        let errors = validate(&self.draft, now.date_naive());
        if !errors.is_empty() {
            debug!(count = errors.len(), "job posting rejected");
            self.errors = errors.clone();
            return Submission::Rejected(errors);
        }

        let posting = match build_posting(&self.draft, jobs.len() + 1) {
            Ok(posting) => posting,
            Err(e) => {
                self.errors = vec![e];
                return Submission::Rejected(vec![e]);
            }
        };

        set_jobs(append_posting(jobs, posting.clone()));
        info!(id = posting.id, title = %posting.title, "job posting created");

        self.draft = Draft::new(now);
        self.focus = Field::Title;
        Submission::Accepted(posting)
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: DateTime<Local>) -> FormInput {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('s') => FormInput::SubmitRequested,
                _ => FormInput::Ignored,
            };
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = self.focus.next();
                return FormInput::Moved;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.prev();
                return FormInput::Moved;
            }
            _ => {}
        }

        match self.focus {
            Field::Submit => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => FormInput::SubmitRequested,
                _ => FormInput::Ignored,
            },
            Field::DatePosted => self.edit_date(key.code, now),
            Field::JobType => self.edit_job_type(key.code),
            field => self.edit_text(field, key.code),
        }
    }

    fn edit_text(&mut self, field: Field, code: KeyCode) -> FormInput {
        if code == KeyCode::Enter && !field.is_multiline() {
            self.focus = field.next();
            return FormInput::Moved;
        }

        let Some(value) = self.text_mut(field) else {
            return FormInput::Ignored;
        };
        match code {
            KeyCode::Char(c) => value.push(c),
            KeyCode::Enter => value.push('\n'),
            KeyCode::Backspace => {
                if value.pop().is_none() {
                    return FormInput::Ignored;
                }
            }
            _ => return FormInput::Ignored,
        }
        FormInput::Edited
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Title => Some(&mut self.draft.title),
            Field::Company => Some(&mut self.draft.company),
            Field::Location => Some(&mut self.draft.location),
            Field::Description => Some(&mut self.draft.description),
            Field::Qualifications => Some(&mut self.draft.qualifications),
            _ => None,
        }
    }

    fn edit_date(&mut self, code: KeyCode, now: DateTime<Local>) -> FormInput {
        match code {
            KeyCode::Left | KeyCode::Char('-') => self.draft.date = shift_days(self.draft.date, -1),
            KeyCode::Right | KeyCode::Char('+') => self.draft.date = shift_days(self.draft.date, 1),
            KeyCode::Char('t') => self.draft.date = now,
            KeyCode::Enter => {
                self.focus = self.focus.next();
                return FormInput::Moved;
            }
            _ => return FormInput::Ignored,
        }
        FormInput::Edited
    }

    fn edit_job_type(&mut self, code: KeyCode) -> FormInput {
        let count = JobType::ALL.len();
        let current = JobType::ALL
            .iter()
            .position(|t| t.as_str() == self.draft.job_type);

        let next = match (code, current) {
            (KeyCode::Right | KeyCode::Char(' '), None) => 0,
            (KeyCode::Right | KeyCode::Char(' '), Some(i)) => (i + 1) % count,
            (KeyCode::Left, None) => count - 1,
            (KeyCode::Left, Some(i)) => (i + count - 1) % count,
            (KeyCode::Backspace, _) => {
                self.draft.job_type.clear();
                return FormInput::Edited;
            }
            (KeyCode::Enter, _) => {
                self.focus = self.focus.next();
                return FormInput::Moved;
            }
            _ => return FormInput::Ignored,
        };
        self.draft.job_type = JobType::ALL[next].as_str().to_string();
        FormInput::Edited
    }
}

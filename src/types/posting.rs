//! Job posting data structures: dataset rows and the submitted form

use serde::{Deserialize, Serialize};
use std::fmt;

/// Free-text fields tracked by the EDA statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextField {
    Title,
    Description,
    CompanyProfile,
    Requirements,
    Benefits,
}

impl TextField {
    pub const ALL: [TextField; 5] = [
        TextField::Title,
        TextField::Description,
        TextField::CompanyProfile,
        TextField::Requirements,
        TextField::Benefits,
    ];

    /// Fields whose words feed the frequency tables
    pub const VOCABULARY: [TextField; 3] = [
        TextField::Title,
        TextField::Description,
        TextField::CompanyProfile,
    ];

    /// Column name in the dataset CSV
    pub fn as_str(&self) -> &'static str {
        match self {
            TextField::Title => "title",
            TextField::Description => "description",
            TextField::CompanyProfile => "company_profile",
            TextField::Requirements => "requirements",
            TextField::Benefits => "benefits",
        }
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the job postings dataset
///
/// Columns other than these (job_id, telecommuting, ...) are ignored.
/// Empty CSV cells deserialize to `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub company_profile: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub benefits: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    /// "1" for fraudulent postings, anything else counts as real
    #[serde(default)]
    pub fraudulent: String,
}

impl JobPosting {
    pub fn is_fake(&self) -> bool {
        self.fraudulent.trim() == "1"
    }

    pub fn field(&self, field: TextField) -> Option<&str> {
        match field {
            TextField::Title => self.title.as_deref(),
            TextField::Description => self.description.as_deref(),
            TextField::CompanyProfile => self.company_profile.as_deref(),
            TextField::Requirements => self.requirements.as_deref(),
            TextField::Benefits => self.benefits.as_deref(),
        }
    }

    /// Absent, or whitespace only
    pub fn is_missing(&self, field: TextField) -> bool {
        self.field(field).map_or(true, |value| value.trim().is_empty())
    }

    /// Non-empty values of `fields` joined with a single space
    pub fn joined(&self, fields: &[TextField]) -> String {
        fields
            .iter()
            .filter_map(|&f| self.field(f))
            .filter(|value| !value.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Text submitted for classification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostingForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary_range: String,
    #[serde(default)]
    pub company_profile: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub benefits: String,
}

impl PostingForm {
    fn values(&self) -> [&str; 7] {
        [
            &self.title,
            &self.location,
            &self.salary_range,
            &self.company_profile,
            &self.description,
            &self.requirements,
            &self.benefits,
        ]
    }

    /// True when every field is empty after trimming
    pub fn is_blank(&self) -> bool {
        self.values().iter().all(|value| value.trim().is_empty())
    }

    /// Trimmed non-empty field values joined with single spaces
    pub fn full_text(&self) -> String {
        self.values()
            .iter()
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<&JobPosting> for PostingForm {
    fn from(row: &JobPosting) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            title: text(&row.title),
            location: text(&row.location),
            salary_range: text(&row.salary_range),
            company_profile: text(&row.company_profile),
            description: text(&row.description),
            requirements: text(&row.requirements),
            benefits: text(&row.benefits),
        }
    }
}

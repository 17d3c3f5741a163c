use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub locale: String,
}

/// One entry of a list page, before the detail request has filled in benefits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobSummary {
    pub id: String,
    pub title: Option<String>,
    pub company: Option<String>,
    /// Category names joined with `", "`.
    pub job_function: String,
    /// Employment type names joined with `", "`.
    pub job_type: String,
    pub industry: Option<String>,
    pub career_level: Option<String>,
    pub years_of_experience: Option<String>,
    pub qualification: Option<String>,
}

impl JobSummary {
    pub fn into_item(self, benefits: String) -> JobItem {
        JobItem {
            job_id: self.id,
            job_title: self.title,
            company: self.company,
            job_function: self.job_function,
            job_type: self.job_type,
            industry: self.industry,
            career_level: self.career_level,
            years_of_experience: self.years_of_experience,
            qualification: self.qualification,
            benefits,
        }
    }
}

/// Output record: a summary merged with its detail response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobItem {
    pub job_id: String,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub job_function: String,
    pub job_type: String,
    pub industry: Option<String>,
    pub career_level: Option<String>,
    pub years_of_experience: Option<String>,
    pub qualification: Option<String>,
    pub benefits: String,
}

/// A fetch that will not be retried again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub url: String,
    /// `None` when the transport failed before any status arrived.
    pub status: Option<u16>,
    pub body: String,
}

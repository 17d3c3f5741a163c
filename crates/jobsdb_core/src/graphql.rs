//! Wire contract for the job board's GraphQL endpoint.
//!
//! Queries are sent as `{"query": "..."}` JSON bodies. Responses are parsed
//! leniently: absent optional fields become `None`, but a missing result
//! envelope (`data.jobs.jobs` or the benefits list) is a [`ParseError`], which
//! the crawl treats as an unreliable response.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::{JobSummary, PageQuery};

const JOB_FIELDS: &str = "id companyMeta{name}jobTitle jobUrl employmentTypes{name}\
categories{name}careerLevelName qualificationName industry{name}workExperienceName";

pub fn request_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

pub fn list_query_body(query: &PageQuery) -> String {
    let gql = format!(
        "query getJobs{{jobs(page: {}, locale: {}){{total jobs{{{JOB_FIELDS}}}}}}}",
        query.page,
        quoted(&query.locale),
    );
    json!({ "query": gql }).to_string()
}

pub fn detail_query_body(job_id: &str, locale: &str, country: &str) -> String {
    let gql = format!(
        "query getJobDetail{{jobDetail(jobId: {}, locale: {}, country: {})\
         {{jobDetail {{jobRequirement {{benefits}}}}}}}}",
        quoted(job_id),
        quoted(locale),
        quoted(country),
    );
    json!({ "query": gql }).to_string()
}

/// GraphQL string literals share JSON's escaping rules.
fn quoted(value: &str) -> String {
    Value::from(value).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("response is not valid json: {0}")]
    InvalidJson(String),
    #[error("response is missing {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPage {
    /// Only needed until the page count is settled; later pages may omit it.
    pub total: Option<u64>,
    pub jobs: Vec<JobSummary>,
    /// Entries dropped because they carried no usable id.
    pub skipped: usize,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

#[derive(Deserialize)]
struct JobsData {
    jobs: Option<JobsPayload>,
}

#[derive(Deserialize)]
struct JobsPayload {
    total: Option<u64>,
    jobs: Option<Vec<RawJob>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawJob {
    id: Option<Value>,
    job_title: Option<String>,
    company_meta: Option<Named>,
    employment_types: Option<Vec<Named>>,
    categories: Option<Vec<Named>>,
    career_level_name: Option<String>,
    qualification_name: Option<String>,
    industry: Option<Named>,
    work_experience_name: Option<String>,
}

#[derive(Deserialize)]
struct Named {
    name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailData {
    job_detail: Option<DetailOuter>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailOuter {
    job_detail: Option<DetailInner>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailInner {
    job_requirement: Option<Requirement>,
}

#[derive(Deserialize)]
struct Requirement {
    benefits: Option<Vec<Option<String>>>,
}

pub fn parse_list_response(body: &str) -> Result<ListPage, ParseError> {
    let envelope: Envelope<JobsData> =
        serde_json::from_str(body).map_err(|err| ParseError::InvalidJson(err.to_string()))?;
    let payload = envelope
        .data
        .and_then(|data| data.jobs)
        .ok_or(ParseError::MissingField("data.jobs"))?;
    let raw_jobs = payload
        .jobs
        .ok_or(ParseError::MissingField("data.jobs.jobs"))?;

    let raw_count = raw_jobs.len();
    let jobs: Vec<JobSummary> = raw_jobs.into_iter().filter_map(into_summary).collect();
    Ok(ListPage {
        total: payload.total,
        skipped: raw_count - jobs.len(),
        jobs,
    })
}

/// Returns the benefits of a detail response joined with `", "`.
pub fn parse_detail_response(body: &str) -> Result<String, ParseError> {
    let envelope: Envelope<DetailData> =
        serde_json::from_str(body).map_err(|err| ParseError::InvalidJson(err.to_string()))?;
    let benefits = envelope
        .data
        .and_then(|data| data.job_detail)
        .and_then(|outer| outer.job_detail)
        .and_then(|inner| inner.job_requirement)
        .and_then(|requirement| requirement.benefits)
        .ok_or(ParseError::MissingField(
            "data.jobDetail.jobDetail.jobRequirement.benefits",
        ))?;
    Ok(benefits.into_iter().flatten().collect::<Vec<_>>().join(", "))
}

fn into_summary(raw: RawJob) -> Option<JobSummary> {
    let id = match raw.id? {
        Value::String(id) => id.trim().to_string(),
        Value::Number(id) => id.to_string(),
        _ => return None,
    };
    if id.is_empty() {
        return None;
    }
    Some(JobSummary {
        id,
        title: raw.job_title,
        company: raw.company_meta.and_then(|meta| meta.name),
        job_function: join_names(raw.categories),
        job_type: join_names(raw.employment_types),
        industry: raw.industry.and_then(|industry| industry.name),
        career_level: raw.career_level_name,
        years_of_experience: raw.work_experience_name,
        qualification: raw.qualification_name,
    })
}

fn join_names(named: Option<Vec<Named>>) -> String {
    named
        .unwrap_or_default()
        .into_iter()
        .filter_map(|n| n.name)
        .collect::<Vec<_>>()
        .join(", ")
}

//! CloudConvert client: DOCX → PDF through the hosted job API.
//!
//! One conversion is a small state machine:
//! create job → upload DOCX → poll job status → download the exported PDF.
//! Polling is bounded by `ConversionPolicy`: at most `max_attempts` status
//! checks with `poll_interval` between them, and no wait after the last one.
//! Job-creation retries (up to 1.5 s of backoff) come on top of that budget.

use std::path::Path;

use async_trait::async_trait;
use reqwest::{multipart, Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use super::{ConversionPolicy, ConvertError, PdfConverter};

const IMPORT_TASK: &str = "import-docx";
const CONVERT_TASK: &str = "convert-to-pdf";
const EXPORT_TASK: &str = "export-pdf";
/// Job creation is retried on 429 and 5xx responses.
const MAX_CREATE_RETRIES: u32 = 3;

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Job,
}

#[derive(Debug, Deserialize)]
pub struct Job {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
pub struct Task {
    pub name: String,
    #[serde(default)]
    pub result: Option<TaskResult>,
}

#[derive(Debug, Deserialize)]
pub struct TaskResult {
    #[serde(default)]
    pub form: Option<UploadForm>,
    #[serde(default)]
    pub files: Vec<ExportedFile>,
}

#[derive(Debug, Deserialize)]
pub struct UploadForm {
    pub url: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct ExportedFile {
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Finished,
    Failed,
    Pending,
}

impl Job {
    pub fn status(&self) -> JobStatus {
        match self.status.as_str() {
            "finished" => JobStatus::Finished,
            "error" => JobStatus::Failed,
            _ => JobStatus::Pending,
        }
    }

    fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// Upload target of the import task.
    pub fn upload_form(&self) -> Result<&UploadForm, ConvertError> {
        self.task(IMPORT_TASK)
            .and_then(|t| t.result.as_ref())
            .and_then(|r| r.form.as_ref())
            .ok_or_else(|| ConvertError::Job(format!("job {} has no upload form", self.id)))
    }

    /// First file URL of the export task.
    pub fn export_url(&self) -> Result<&str, ConvertError> {
        self.task(EXPORT_TASK)
            .and_then(|t| t.result.as_ref())
            .and_then(|r| r.files.first())
            .map(|f| f.url.as_str())
            .ok_or_else(|| ConvertError::Job(format!("job {} has no exported file", self.id)))
    }
}

/// Body of `POST /v2/jobs`: upload → convert → export URL.
pub fn job_request() -> Value {
    json!({
        "tasks": {
            "import-docx": { "operation": "import/upload" },
            "convert-to-pdf": {
                "operation": "convert",
                "input": IMPORT_TASK,
                "output_format": "pdf"
            },
            "export-pdf": { "operation": "export/url", "input": CONVERT_TASK }
        }
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct CloudConvertClient {
    client: Client,
    api_key: String,
    base_url: String,
    policy: ConversionPolicy,
}

impl CloudConvertClient {
    pub fn new(
        api_key: String,
        base_url: String,
        policy: ConversionPolicy,
    ) -> Result<Self, ConvertError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            policy,
        })
    }

    async fn create_job(&self) -> Result<Job, ConvertError> {
        let body = job_request();
        let mut last_error: Option<ConvertError> = None;

        for attempt in 0..MAX_CREATE_RETRIES {
            if attempt > 0 {
                let delay = std::time::Duration::from_millis(500 * (1 << (attempt - 1)));
                warn!(
                    "Job creation attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(format!("{}/v2/jobs", self.base_url))
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(ConvertError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                last_error = Some(ConvertError::Api {
                    status: status.as_u16(),
                    message: response.text().await.unwrap_or_default(),
                });
                continue;
            }
            if status != StatusCode::CREATED {
                return Err(ConvertError::Api {
                    status: status.as_u16(),
                    message: response.text().await.unwrap_or_default(),
                });
            }

            let envelope: Envelope = response.json().await?;
            debug!("Created conversion job {}", envelope.data.id);
            return Ok(envelope.data);
        }

        Err(last_error.unwrap_or(ConvertError::Job("job creation failed".to_string())))
    }

    async fn upload(&self, form: &UploadForm, docx: &Path) -> Result<(), ConvertError> {
        let bytes = tokio::fs::read(docx).await?;
        let file_name = docx
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume.docx".to_string());

        let mut multipart_form = multipart::Form::new();
        for (key, value) in &form.parameters {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            multipart_form = multipart_form.text(key.clone(), value);
        }
        multipart_form =
            multipart_form.part("file", multipart::Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(&form.url)
            .multipart(multipart_form)
            .send()
            .await?;
        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(ConvertError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    async fn fetch_job(&self, job_id: &str) -> Result<Job, ConvertError> {
        let response = self
            .client
            .get(format!("{}/v2/jobs/{job_id}", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ConvertError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json::<Envelope>().await?.data)
    }

    async fn download(&self, url: &str, pdf: &Path) -> Result<(), ConvertError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        tokio::fs::write(pdf, &bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl PdfConverter for CloudConvertClient {
    fn name(&self) -> &'static str {
        "cloudconvert"
    }

    async fn convert(&self, docx: &Path, pdf: &Path) -> Result<(), ConvertError> {
        info!("Starting PDF conversion via CloudConvert");
        let job = self.create_job().await?;
        self.upload(job.upload_form()?, docx).await?;

        for attempt in 1..=self.policy.max_attempts {
            let current = self.fetch_job(&job.id).await?;
            match current.status() {
                JobStatus::Finished => {
                    self.download(current.export_url()?, pdf).await?;
                    info!("PDF ready after {attempt} status checks");
                    return Ok(());
                }
                JobStatus::Failed => {
                    return Err(ConvertError::Job(format!("job {} reported error", job.id)));
                }
                JobStatus::Pending => {
                    debug!("Job {} still {} (check {attempt})", job.id, current.status);
                    if attempt < self.policy.max_attempts {
                        tokio::time::sleep(self.policy.poll_interval).await;
                    }
                }
            }
        }

        Err(ConvertError::Timeout {
            attempts: self.policy.max_attempts,
        })
    }
}

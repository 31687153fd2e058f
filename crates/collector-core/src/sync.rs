use crate::batch::ChangeRequest;
use crate::error::Error;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The content manager accepted the request.
    Committed { status: u16 },
    /// The request was written to the diagnostic sink only.
    Printed,
    /// Nothing to send.
    Empty,
    /// Transport or server failure. The scan itself is unaffected.
    Failed(String),
}

enum Mode {
    Commit { client: Client, url: Url },
    Print,
}

/// Delivers a change request to the content manager, or prints it in
/// dry-run mode.
pub struct SyncExecutor {
    mode: Mode,
}

impl SyncExecutor {
    /// Build an executor that POSTs to `url`. The content manager is local,
    /// so proxy settings from the environment are ignored. An unusable URL or
    /// a failure to initialise the HTTP client is fatal for the run.
    pub fn commit(url: &str) -> Result<Self, Error> {
        let url = Url::parse(url).map_err(|err| Error::InvalidUrl {
            url: url.to_string(),
            reason: err.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl {
                reason: format!("unsupported scheme '{}'", url.scheme()),
                url: url.into(),
            });
        }

        let client = Client::builder()
            .http1_only()
            .no_proxy()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            mode: Mode::Commit { client, url },
        })
    }

    pub fn print_only() -> Self {
        Self { mode: Mode::Print }
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self.mode, Mode::Print)
    }

    /// Serialize and deliver `request`. Printed requests go to stdout.
    pub fn execute(&self, request: &ChangeRequest) -> Result<SyncOutcome, Error> {
        self.execute_with_sink(request, &mut std::io::stdout())
    }

    pub fn execute_with_sink<W: Write>(
        &self,
        request: &ChangeRequest,
        sink: &mut W,
    ) -> Result<SyncOutcome, Error> {
        let body = request.to_json()?;
        debug!("Change request: {}", body);

        match &self.mode {
            Mode::Print => {
                writeln!(sink, "{}", body)?;
                Ok(SyncOutcome::Printed)
            }
            Mode::Commit { .. } if request.is_empty() => {
                info!("No changes to commit");
                Ok(SyncOutcome::Empty)
            }
            Mode::Commit { client, url } => {
                let response = client
                    .post(url.clone())
                    .header(CONTENT_TYPE, "application/json")
                    .body(body)
                    .send()?;

                let status = response.status();
                if !status.is_success() {
                    return Err(Error::Rejected {
                        status: status.as_u16(),
                    });
                }

                info!(
                    "Committed {} command(s) to {}",
                    request.commands.len(),
                    url
                );
                Ok(SyncOutcome::Committed {
                    status: status.as_u16(),
                })
            }
        }
    }
}

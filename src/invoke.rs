use std::time::{Duration, Instant};

use anyhow::Result;
use ureq::{Agent, AgentBuilder};

use crate::errors::FnbenchError;
use crate::types::Workload;

/// Port the function endpoint listens on. Not configurable.
pub const TARGET_PORT: u16 = 10000;

/// Blocking client for the HTTP-triggered function under test.
///
/// Each invocation POSTs the workload payload as the raw request body to
/// the fixed local endpoint and discards the response body.
pub struct FunctionClient {
    agent: Agent,
    url: String,
}

impl FunctionClient {
    pub fn new() -> Self {
        Self::with_url(format!("http://localhost:{}/", TARGET_PORT))
    }

    pub(crate) fn with_url(url: String) -> Self {
        Self {
            agent: AgentBuilder::new().build(),
            url,
        }
    }

    /// Perform one blocking invocation. The call does not return until the
    /// function has produced its response; there is no timeout.
    pub fn invoke(&self, payload: &str) -> Result<()> {
        let response = self
            .agent
            .post(&self.url)
            .send_string(payload)
            .map_err(|e| FnbenchError::RequestFailed {
                url: self.url.clone(),
                source: Box::new(e),
            })?;

        // Drain the body so the connection can be reused by the agent.
        let _ = response.into_string();

        Ok(())
    }
}

impl Default for FunctionClient {
    fn default() -> Self {
        Self::new()
    }
}

/// The timing loop: run `invoke` for the fixed iteration count, recording
/// elapsed wall-clock time per call.
///
/// Returns exactly `iterations` samples on success. A failed invocation
/// aborts the loop and propagates the error; partial samples are discarded.
pub fn collect_samples<F>(iterations: usize, mut invoke: F) -> Result<Vec<Duration>>
where
    F: FnMut() -> Result<()>,
{
    let mut samples = Vec::with_capacity(iterations);

    for _ in 0..iterations {
        let start = Instant::now();
        invoke()?;
        samples.push(start.elapsed());
    }

    Ok(samples)
}

/// Sample one workload against the function endpoint.
pub fn sample_workload(
    client: &FunctionClient,
    workload: &Workload,
    iterations: usize,
) -> Result<Vec<Duration>> {
    collect_samples(iterations, || client.invoke(&workload.payload))
}

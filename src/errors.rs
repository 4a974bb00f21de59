use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum FnbenchError {
    #[error("Request to {url} failed: {source}")]
    RequestFailed {
        url: String,
        source: Box<ureq::Error>,
    },

    #[error("No samples recorded for workload '{label}'")]
    EmptySamples { label: String },

    #[error("Failed to render chart: {detail}")]
    ChartRender { detail: String },

    #[error("Failed to write chart to {path}: {detail}")]
    ChartWrite { path: PathBuf, detail: String },
}

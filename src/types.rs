use serde::Serialize;

/// A named payload sent to the function endpoint.
#[derive(Debug, Clone)]
pub struct Workload {
    pub label: String,
    pub payload: String,
}

impl Workload {
    pub fn new(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            payload: payload.into(),
        }
    }
}

/// The fixed workload pair the tool compares: a light and a heavy
/// Fibonacci invocation, identified by the argument piped to the function.
pub fn default_workloads() -> Vec<Workload> {
    vec![
        Workload::new("Fibonacci(1)", "1"),
        Workload::new("Fibonacci(10)", "10"),
    ]
}

/// Per-workload summary derived from the timing samples.
#[derive(Debug, Clone, Serialize)]
pub struct WorkloadReport {
    pub label: String,
    pub iterations: usize,
    pub mean_secs: f64,
}

impl WorkloadReport {
    pub fn new(label: impl Into<String>, iterations: usize, mean_secs: f64) -> Self {
        Self {
            label: label.into(),
            iterations,
            mean_secs,
        }
    }
}

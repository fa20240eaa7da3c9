pub mod campaign;
pub mod config;
pub mod limits;
pub mod metrics;
pub mod presets;
pub mod reference;

pub use campaign::{run_batch, BatchReport, PolicyFailure};
pub use config::BatchConfig;
pub use metrics::{merge, record, MetricsCollector, MetricsRecord, MetricsTable, RunOutcome};
pub use presets::PolicyPreset;

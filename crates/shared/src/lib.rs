pub mod env;
pub mod telemetry;
pub mod upstream;

pub use env::EnvReader;
pub use upstream::{ensure_success, UpstreamError};

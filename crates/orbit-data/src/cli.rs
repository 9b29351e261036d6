//! Logic behind the `orbit-coalesce` binary.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::codec::{parse_operations, to_json_operations};
use crate::coalesce::coalesce_record_operations;
use crate::error::OperationError;

/// Coalesces a JSON array of operations, returning the resulting JSON array.
pub fn coalesce_json(json: &str) -> Result<String, OperationError> {
    let operations = parse_operations(json)?;
    let coalesced = coalesce_record_operations(operations);
    Ok(to_json_operations(&coalesced).to_string())
}

/// Installs a stderr subscriber. Defaults to `warn`, overridable via `RUST_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // Ignore a second initialization.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

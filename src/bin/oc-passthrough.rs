//! Forwards its arguments to `oc` (or `$OC_BIN`) and exits with its status.

use std::ffi::OsString;
use std::process::ExitCode;

use tracing::error;

use collect_logs::oc::passthrough;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let program = std::env::var_os("OC_BIN").unwrap_or_else(|| OsString::from("oc"));
    match passthrough(&program, std::env::args_os().skip(1)) {
        Ok(code) => ExitCode::from(code.clamp(0, 255) as u8),
        Err(e) => {
            error!("failed to run {}: {}", program.to_string_lossy(), e);
            ExitCode::from(127)
        }
    }
}

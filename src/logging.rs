use env_logger::{Builder, Env};

/// Level used when `RUST_LOG` is unset. Unreadable stores are reported
/// at `warn`, so that is the quietest level a default run may have.
pub const DEFAULT_FILTER: &str = "warn";

fn builder(env: Env) -> Builder {
    Builder::from_env(env.default_filter_or(DEFAULT_FILTER))
}

/// Installs the logger for the binaries, honouring `RUST_LOG`.
pub fn init() {
    builder(Env::default()).init();
}

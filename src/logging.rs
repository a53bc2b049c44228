use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the stderr subscriber for the CLI.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` turns on debug output for
/// this crate.
pub fn init_cli_logger(verbose: bool) {
    let default_filter = if verbose {
        "gradewise=debug"
    } else {
        "gradewise=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

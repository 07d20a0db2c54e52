pub fn init() {
    // Logs go to stderr: stdout is reserved for workflow commands
    // (::add-mask::, ::error::) that the runner parses.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ghtoken=info".parse().unwrap()),
        )
        .init();
}

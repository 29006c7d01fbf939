pub mod cli;

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    // RUST_LOG wins; otherwise only warnings and up
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let command_line_interface = cli::CommandLineInterface::load();
    tracing::debug!(?command_line_interface, "parsed arguments");
    command_line_interface.run()
}

use arbor::cli::args::Cli;
use arbor::cli::commands::execute_command;
use arbor::cli::output;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

/// Targets kept out of `-ddd` output.
const NOISY_TARGETS: [&str; 2] = ["config", "toml"];

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    if let Err(e) = execute_command(&cli) {
        output::error(&e);
        std::process::exit(e.exit_code());
    }
}

/// `-d` steps warn → info → debug → trace; more flags stay at trace.
fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn setup_logging(verbosity: u8) {
    let level = level_for(verbosity);
    if verbosity > 3 {
        eprintln!("-d given {} times, trace is the maximum", verbosity);
    }

    let quiet_noisy = filter_fn(|metadata| {
        !NOISY_TARGETS
            .iter()
            .any(|target| metadata.target().starts_with(target))
    });

    // Spans close with timings so -dd shows where tree operations spend time
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(level)
        .with_filter(quiet_noisy);

    tracing_subscriber::registry().with(layer).init();
    tracing::debug!(%level, "logging initialized");
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor::util::testing;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        testing::init_test_setup();
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_level_for_saturates_at_trace() {
        assert_eq!(level_for(0), LevelFilter::WARN);
        assert_eq!(level_for(2), LevelFilter::DEBUG);
        assert_eq!(level_for(3), LevelFilter::TRACE);
        assert_eq!(level_for(9), LevelFilter::TRACE);
    }
}

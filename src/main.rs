use lookout_lib::agent::{AgentConfig, SensorAgent};
use lookout_lib::event::JsonLinesSink;
use lookout_lib::platform::{NativePermissions, NativeSensor};
use log::info;

fn main() {
    // Logs go to stderr so they never interleave with the JSON event
    // stream on stdout. RUST_LOG controls verbosity, defaults to info;
    // the subscriber also picks up the `log` records the library emits.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("agent started");

    let agent = SensorAgent::new(AgentConfig::default());
    let handle = agent.start(
        NativePermissions::new(),
        NativeSensor::new(),
        JsonLinesSink::new(std::io::stdout()),
    );

    // Runs until the process is terminated externally.
    if handle.join().is_err() {
        eprintln!("sensor thread panicked");
        std::process::exit(1);
    }
}

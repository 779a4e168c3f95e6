use kv_sentinel_writer::cli::Cli;
use kv_sentinel_writer::{SentinelStore, WriteLoop};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::load_config().unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    });

    kv_sentinel_writer::logging::init_logging_or_fallback(&config);

    let sentinels: Vec<String> = config.sentinels.iter().map(|s| s.to_string()).collect();
    log::info!(
        "Writing to {} of '{}' via sentinels [{}], interval {}ms",
        config.role,
        config.master_name,
        sentinels.join(", "),
        config.interval.as_millis()
    );

    let store = SentinelStore::new(&config)?;
    let mut writer = WriteLoop::new(store, config.interval);
    writer.run().await;

    Ok(())
}

use anyhow::Result;
use hwsampler::config::{AppConfig, OutputFormat};
use hwsampler::{Sampler, Status};
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

fn print_header(status: &Status) {
    println!("CPU: {} ({} cores)", status.cpu_name, status.cpu_core_count);
    println!("RAM: {} MB", status.total_memory_bytes / 1024 / 1000);
}

fn print_text(status: &Status) {
    let ram_percent = status.memory_usage_percent().unwrap_or(0.0);
    println!(
        "CPU used: {:2}%  RAM used: {:2}%  Rx: {} Kbps   Tx: {} Kbps",
        status.cpu_usage_percent as i64,
        ram_percent as u64,
        status.rx_bits_per_second / 1000,
        status.tx_bits_per_second / 1000
    );
}

fn print_json(status: &Status) -> Result<()> {
    println!("{}", serde_json::to_string(status)?);
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("{}", hwsampler::version::banner());

    let mut app_config = AppConfig::load_or_default()?;
    if let Some(interface) = std::env::args().nth(1) {
        app_config.sampler.interface = interface;
    }
    app_config.validate()?;

    let sampler = Sampler::new(app_config.sampler.clone());
    sampler.start(&app_config.sampler.interface)?;

    let format = app_config.display.format;
    let mut refresh = interval(Duration::from_secs(app_config.display.refresh_secs));
    refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut header_printed = false;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = refresh.tick() => {
                let status = sampler.snapshot();
                if !status.is_warmed_up() {
                    tracing::debug!("waiting for first memory sample");
                    continue;
                }
                match format {
                    OutputFormat::Text => {
                        if !header_printed {
                            print_header(&status);
                            header_printed = true;
                        }
                        print_text(&status);
                    }
                    OutputFormat::Json => print_json(&status)?,
                }
            }
            _ = &mut shutdown => {
                tracing::info!("Received shutdown signal");
                break;
            }
        }
    }

    sampler.stop();
    sampler.join().await;
    Ok(())
}

use super::signal::shutdown_signal;
use crate::di::DnsServices;
use reflector_dns_domain::Config;
use reflector_dns_infrastructure::dns::{Listener, WorkerOptions};
use reflector_dns_jobs::{CacheSweepJob, JobRunner};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let services = DnsServices::new(&config)?;

    if let Some(check) = &services.backend_check {
        check.execute().await?;
    }

    let settings = config.reflector_settings();
    let mut listener = Listener::bind(
        &settings,
        WorkerOptions::from(&config.workers),
        services.processor.clone(),
    )?;
    listener.listen_and_serve()?;

    let jobs_shutdown = CancellationToken::new();
    let mut runner = JobRunner::new().with_shutdown_token(jobs_shutdown.clone());
    if let Some(maintenance) = services.cache_maintenance.clone() {
        runner = runner.with_cache_sweep(
            CacheSweepJob::new(maintenance)
                .with_interval(Duration::from_secs(config.cache.sweep_interval_secs)),
        );
    }
    let job_handles = runner.start().await;

    let listener_stopped = listener.shutdown_token();
    tokio::select! {
        _ = shutdown_signal() => {}
        _ = listener_stopped.cancelled() => {
            error!("Listener stopped unexpectedly, shutting down");
        }
    }

    jobs_shutdown.cancel();
    for handle in job_handles {
        if let Err(e) = handle.await {
            error!(error = %e, "Background job failed");
        }
    }

    listener.shutdown().await;

    let cache = services.cache.stats();
    info!(
        entries = cache.len,
        capacity = cache.capacity,
        hits = cache.hits,
        misses = cache.misses,
        evictions = cache.evictions,
        hit_rate = format!("{:.1}%", cache.hit_rate()),
        "Final cache statistics"
    );
    let pool = services.upstream_pool.stats();
    info!(
        created = pool.created,
        reused = pool.reused,
        discarded = pool.discarded,
        idle = pool.idle,
        "Final upstream pool statistics"
    );

    info!("Server shutdown complete");
    Ok(())
}

use anyhow::Context;
use reflector_dns_application::use_cases::{ForwardQueryUseCase, LookupHostsUseCase};
use reflector_dns_domain::config::LookupConfig;
use reflector_dns_domain::{LookupReport, LookupSelection};
use reflector_dns_infrastructure::dns::{PooledUpstreamClient, UpstreamPool};
use reflector_dns_infrastructure::lookup::UpstreamHostResolver;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::info;

pub struct LookupRequest {
    pub hosts: Vec<String>,
    pub selection: LookupSelection,
    pub server: Option<String>,
    pub json: bool,
    pub max_attempts: u32,
}

pub async fn run_lookup(config: &LookupConfig, request: LookupRequest) -> anyhow::Result<()> {
    let server = normalize_dns_server(request.server.as_deref().unwrap_or(&config.server));
    let server_addr: SocketAddr = server
        .parse()
        .with_context(|| format!("invalid DNS server '{}'", server))?;

    info!(server = %server_addr, hosts = request.hosts.len(), "Running lookups");

    let pool = Arc::new(UpstreamPool::new(server_addr, request.hosts.len().max(1)));
    let forwarder = ForwardQueryUseCase::new(
        Arc::new(PooledUpstreamClient::new(pool)),
        request.max_attempts,
        config.timeout(),
    );
    let resolver = UpstreamHostResolver::new(Arc::new(forwarder));
    let use_case = LookupHostsUseCase::new(Arc::new(resolver));

    let reports = use_case.execute(&request.hosts, request.selection).await;
    print_reports(&reports, request.json)
}

fn print_reports(reports: &[LookupReport], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
    } else {
        for report in reports {
            print!("{}", report);
        }
    }
    Ok(())
}

/// A bare IP gets the standard DNS port appended. Anything else is returned
/// untouched.
pub fn normalize_dns_server(server: &str) -> String {
    let server = server.trim();
    match server.parse::<IpAddr>() {
        Ok(IpAddr::V4(ip)) => format!("{}:53", ip),
        Ok(IpAddr::V6(ip)) => format!("[{}]:53", ip),
        Err(_) => server.to_string(),
    }
}

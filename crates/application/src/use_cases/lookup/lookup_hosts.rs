use crate::ports::HostResolver;
use futures::future::join_all;
use reflector_dns_domain::{LookupReport, LookupSelection, RecordType};
use std::sync::Arc;
use tracing::debug;

/// Resolves a batch of hosts concurrently. Every host yields one report, in
/// input order; failures are recorded in the report instead of failing the
/// batch.
pub struct LookupHostsUseCase {
    resolver: Arc<dyn HostResolver>,
}

impl LookupHostsUseCase {
    pub fn new(resolver: Arc<dyn HostResolver>) -> Self {
        Self { resolver }
    }

    pub async fn execute(
        &self,
        hosts: &[String],
        selection: LookupSelection,
    ) -> Vec<LookupReport> {
        let lookups = hosts.iter().map(|host| self.lookup_host(host, selection));
        join_all(lookups).await
    }

    async fn lookup_host(&self, host: &str, selection: LookupSelection) -> LookupReport {
        let mut report = LookupReport::new(host);

        for record_type in selection.record_types() {
            debug!(host = %host, record_type = %record_type, "Looking up");

            match record_type {
                RecordType::A | RecordType::AAAA => {
                    match self.resolver.lookup_ips(host, record_type).await {
                        Ok(ips) => report.ips.extend(ips),
                        Err(e) => report
                            .errors
                            .push(format!("get {} record: {}", record_type, e)),
                    }
                }
                RecordType::MX => match self.resolver.lookup_mx(host).await {
                    Ok(records) => report.mx_records = records,
                    Err(e) => report.errors.push(format!("get MX record: {}", e)),
                },
                RecordType::CNAME => match self.resolver.lookup_cname(host).await {
                    Ok(cname) => report.cname = cname,
                    Err(e) => report.errors.push(format!("get CNAME record: {}", e)),
                },
                _ => {}
            }
        }

        report
    }
}

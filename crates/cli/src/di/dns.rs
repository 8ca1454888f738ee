use reflector_dns_application::ports::{CacheBackend, CacheMaintenancePort};
use reflector_dns_application::use_cases::{CheckCacheBackendUseCase, ForwardQueryUseCase};
use reflector_dns_domain::{Config, DomainError};
use reflector_dns_infrastructure::dns::{
    DnsCacheMaintenance, LruAnswerCache, PooledUpstreamClient, QueryProcessor, UpstreamPool,
};
use reflector_dns_infrastructure::persistent::RedisProbe;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info};

pub struct DnsServices {
    pub cache: Arc<LruAnswerCache>,
    pub upstream_pool: Arc<UpstreamPool>,
    pub processor: Arc<QueryProcessor>,
    pub cache_maintenance: Option<Arc<dyn CacheMaintenancePort>>,
    pub backend_check: Option<CheckCacheBackendUseCase>,
}

impl DnsServices {
    pub fn new(config: &Config) -> Result<Self, DomainError> {
        info!("Initializing DNS services");

        let cache = Arc::new(Self::build_cache(config)?);

        let upstream_addr: SocketAddr = config.upstream.address.parse().map_err(|e| {
            DomainError::ConfigurationInvalid(format!(
                "Invalid upstream address '{}': {}",
                config.upstream.address, e
            ))
        })?;
        let upstream_pool = Arc::new(UpstreamPool::new(upstream_addr, config.upstream.pool_size));
        let client = PooledUpstreamClient::new(Arc::clone(&upstream_pool));

        let forwarder = ForwardQueryUseCase::new(
            Arc::new(client),
            config.upstream.max_attempts,
            config.upstream.timeout(),
        );
        let processor = Arc::new(QueryProcessor::new(cache.clone(), Arc::new(forwarder)));

        let cache_maintenance = config.cache.max_age().map(|_| {
            Arc::new(DnsCacheMaintenance::new(Arc::clone(&cache))) as Arc<dyn CacheMaintenancePort>
        });

        let backend_check = config.persistent_cache.enabled.then(|| {
            let probe: Arc<dyn CacheBackend> =
                Arc::new(RedisProbe::from_config(&config.persistent_cache));
            CheckCacheBackendUseCase::new(probe)
        });

        Ok(Self {
            cache,
            upstream_pool,
            processor,
            cache_maintenance,
            backend_check,
        })
    }

    fn build_cache(config: &Config) -> Result<LruAnswerCache, DomainError> {
        let cache = LruAnswerCache::new(config.cache.capacity)?
            .with_max_age(config.cache.max_age())
            .with_eviction_callback(|key, answers| {
                debug!(key = %key, answers = answers.len(), "Evicted from answer cache");
            });
        Ok(cache)
    }
}

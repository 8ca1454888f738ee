mod upstream_resolver;

pub use upstream_resolver::UpstreamHostResolver;

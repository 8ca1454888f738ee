use clap::{Args, Parser, Subcommand};
use reflector_dns_domain::{CliOverrides, LookupSelection};
use tracing::info;

mod bootstrap;
mod di;
mod lookup;
mod server;

#[derive(Parser, Debug)]
#[command(name = "reflector-dns")]
#[command(version, about = "Caching DNS forwarding proxy", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the caching forwarder (default)
    Server(ServerArgs),
    /// Resolve hosts through a DNS server and print the results
    Lookup(LookupArgs),
}

#[derive(Args, Debug, Default)]
struct ServerArgs {
    /// Listen address, e.g. 0.0.0.0:53
    #[arg(short, long)]
    address: Option<String>,

    /// Upstream resolver, e.g. 1.1.1.1:53
    #[arg(short, long)]
    upstream: Option<String>,

    #[arg(long)]
    cache_capacity: Option<usize>,

    /// Reader/processor pairs, 0 for one per CPU
    #[arg(short, long)]
    workers: Option<usize>,
}

#[derive(Args, Debug)]
struct LookupArgs {
    /// Host to resolve; repeat for several
    #[arg(long = "host", default_value = "google.com")]
    hosts: Vec<String>,

    #[arg(long)]
    a: bool,

    #[arg(long)]
    aaaa: bool,

    #[arg(long)]
    mx: bool,

    #[arg(long)]
    cname: bool,

    /// DNS server to query; a bare IP gets port 53
    #[arg(long)]
    dns: Option<String>,

    /// Print reports as JSON
    #[arg(long)]
    json: bool,
}

impl LookupArgs {
    fn selection(&self) -> LookupSelection {
        let selection = LookupSelection {
            a: self.a,
            aaaa: self.aaaa,
            mx: self.mx,
            cname: self.cname,
        };
        if selection.is_empty() {
            LookupSelection::default()
        } else {
            selection
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Lookup(args)) => run_lookup(cli.config, cli.log_level, args).await,
        Some(Command::Server(args)) => run_server(cli.config, cli.log_level, args).await,
        None => run_server(cli.config, cli.log_level, ServerArgs::default()).await,
    }
}

async fn run_server(
    config_path: Option<String>,
    log_level: Option<String>,
    args: ServerArgs,
) -> anyhow::Result<()> {
    let overrides = CliOverrides {
        address: args.address,
        upstream: args.upstream,
        cache_capacity: args.cache_capacity,
        workers: args.workers,
        log_level,
    };

    let config = bootstrap::load_config(config_path.as_deref(), overrides)?;
    bootstrap::init_logging(&config.logging);

    info!("Starting Reflector DNS v{}", env!("CARGO_PKG_VERSION"));
    let settings = config.reflector_settings();
    info!(
        address = %settings.address,
        upstream = %settings.upstream_address,
        cache_capacity = settings.cache_capacity,
        workers = settings.worker_count,
        "Configuration loaded"
    );

    server::run_server(config).await
}

async fn run_lookup(
    config_path: Option<String>,
    log_level: Option<String>,
    args: LookupArgs,
) -> anyhow::Result<()> {
    let overrides = CliOverrides {
        log_level,
        ..Default::default()
    };
    let config = bootstrap::load_config(config_path.as_deref(), overrides)?;
    bootstrap::init_logging(&config.logging);

    let request = lookup::LookupRequest {
        selection: args.selection(),
        hosts: args.hosts,
        server: args.dns,
        json: args.json,
        max_attempts: config.upstream.max_attempts,
    };

    lookup::run_lookup(&config.lookup, request).await
}

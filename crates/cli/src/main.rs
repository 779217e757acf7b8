use clap::{Parser, Subcommand};
use ferrous_recursor_domain::{CliOverrides, DnsQuery, RecordType};
use std::net::{IpAddr, SocketAddr};
use tracing::info;

mod bootstrap;
mod server;

#[derive(Parser)]
#[command(name = "ferrous-recursor")]
#[command(version)]
#[command(about = "Ferrous Recursor - iterative DNS resolver")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Log level or filter directive (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// named.root file to use instead of the bundled root hints
    #[arg(long, value_name = "FILE", global = true)]
    root_hints: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer UDP queries by resolving them iteratively
    Serve {
        /// Bind address
        #[arg(short = 'b', long)]
        bind: Option<String>,

        /// DNS server port
        #[arg(short = 'd', long)]
        dns_port: Option<u16>,
    },
    /// Resolve one name from the root and print the final reply
    Query {
        domain: String,

        /// Record type (A, AAAA, MX, NS, ...)
        #[arg(short = 't', long = "type", default_value = "A")]
        record_type: RecordType,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cli_overrides = CliOverrides {
        log_level: cli.log_level.clone(),
        root_hints_path: cli.root_hints.clone(),
        ..CliOverrides::default()
    };
    if let Command::Serve { bind, dns_port } = &cli.command {
        cli_overrides.bind_address = bind.clone();
        cli_overrides.dns_port = *dns_port;
    }

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config.logging);
    bootstrap::log_config_summary(&config);

    let resolver = bootstrap::build_resolver(&config.resolver)?;

    match cli.command {
        Command::Serve { .. } => {
            let bind_ip: IpAddr = config.server.bind_address.parse()?;
            let bind_addr = SocketAddr::new(bind_ip, config.server.dns_port);
            info!("Starting Ferrous Recursor v{}", env!("CARGO_PKG_VERSION"));
            server::start_dns_server(bind_addr, resolver).await?;
        }
        Command::Query {
            domain,
            record_type,
        } => {
            let reply = resolver
                .resolve(&DnsQuery::new(&domain, record_type))
                .await?;
            println!(";; status: {}, id: {}", reply.response_code(), reply.id());
            for (title, records) in [
                ("ANSWER", &reply.answers),
                ("AUTHORITY", &reply.nameservers),
                ("ADDITIONAL", &reply.additionals),
            ] {
                if records.is_empty() {
                    continue;
                }
                println!("\n;; {} SECTION:", title);
                for record in records {
                    println!("{}", record);
                }
            }
        }
    }

    Ok(())
}

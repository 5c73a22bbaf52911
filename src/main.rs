use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use log::{debug, info};

use cf_dns::config::{self, Config, UpdateConfig};
use cf_dns::provider::cloudflare::{self, CloudflareClient};
use cf_dns::provider::RecordType;

#[derive(Parser, Debug)]
#[command(name = "cf", version)]
#[command(about = "Update Cloudflare DNS records from the command line")]
struct Args {
    /// Path to an optional TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Update a specific A record (like root or www) for a domain
    #[command(name = "update:dns", visible_alias = "update")]
    UpdateDns(UpdateArgs),
}

#[derive(clap::Args, Debug)]
struct UpdateArgs {
    /// Zone domain, e.g. example.com
    domain: String,

    /// Record type (only A is supported)
    #[arg(value_enum, ignore_case = true)]
    record_type: RecordType,

    /// Record name: "@" for the apex, a label like "www", or a full name
    key: String,

    /// New record content
    value: String,

    /// Comment stored on the record
    comment: Option<String>,

    /// Route traffic through Cloudflare's proxy
    #[arg(
        long,
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    proxied: bool,

    /// Time to live in seconds (1 means automatic)
    #[arg(long, default_value_t = config::DEFAULT_TTL, value_parser = clap::value_parser!(i16).range(1..))]
    ttl: i16,

    /// Create the record when it does not exist yet
    #[arg(long)]
    upsert: bool,

    /// Cloudflare API token [env: CF_API_TOKEN]
    #[arg(long)]
    api_token: Option<String>,

    /// Cloudflare API base URL
    #[arg(long)]
    api_base: Option<String>,
}

impl UpdateArgs {
    fn into_config(self, settings: &Config, env_token: Option<String>) -> Result<UpdateConfig> {
        let api_token =
            config::resolve_api_token(self.api_token, env_token, settings.api_token.clone())?;

        let config = UpdateConfig {
            api_base: self.api_base.unwrap_or_else(|| settings.api_base.clone()),
            api_token,
            domain: self.domain,
            record_type: self.record_type,
            key: self.key,
            content: self.value,
            ttl: self.ttl,
            proxied: self.proxied,
            upsert: self.upsert,
            comment: self.comment,
        };
        config.validate()?;

        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if !e.use_stderr() => {
            // --help / --version
            let _ = e.print();
            process::exit(0);
        }
        Err(e) => {
            println!("❌ {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(args).await {
        println!("❌ {:#}", e);
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let settings = Config::load_or_default(args.config.as_deref())?;

    // RUST_LOG takes precedence over the config file
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&settings.log_level),
    )
    .init();

    if let Some(path) = &args.config {
        info!("Loaded configuration from: {}", path.display());
    }

    let Command::UpdateDns(update) = args.command;
    let config = update.into_config(&settings, std::env::var(config::TOKEN_ENV).ok())?;
    debug!(
        "Update request: {} {} {} -> {} (ttl {}, proxied {}, upsert {})",
        config.domain,
        config.record_type,
        config.key,
        config.content,
        config.ttl,
        config.proxied,
        config.upsert
    );

    let client = CloudflareClient::new(&config.api_base, &config.api_token);
    let result = cloudflare::update_dns_record(&client, &config).await?;

    println!("✅ {}", result.message());
    if let Some(id) = &result.record_id {
        info!("Record id: {}", id);
    }

    Ok(())
}

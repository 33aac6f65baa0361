use anyhow::{bail, Context};
use clap::Parser;
use email_verifier::{Client, Config, RequestOption};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Verify an email address with the Email Verification API.
#[derive(Parser, Debug)]
#[command(name = "evapi", version, about)]
struct Cli {
    /// Email address to verify.
    email: String,

    /// API key. Overrides the one in the config file.
    #[arg(long, env = "APIKEY", hide_env_values = true)]
    api_key: Option<String>,

    /// TOML configuration file.
    #[arg(long, env = "EVAPI_CONFIG")]
    config: Option<PathBuf>,

    /// Endpoint to query instead of the default one.
    #[arg(long)]
    base_url: Option<Url>,

    /// Print the response body as received instead of the parsed result.
    #[arg(long)]
    raw: bool,

    /// Response format (JSON or XML). Only honoured with --raw.
    #[arg(long)]
    output_format: Option<String>,

    #[arg(long)]
    hard_refresh: Option<i64>,

    #[arg(long)]
    validate_dns: Option<i64>,

    #[arg(long)]
    validate_smtp: Option<i64>,

    #[arg(long)]
    check_catch_all: Option<i64>,

    #[arg(long)]
    check_free: Option<i64>,

    #[arg(long)]
    check_disposable: Option<i64>,

    /// Log request details.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> Vec<RequestOption> {
        let toggles: [(Option<i64>, fn(i64) -> RequestOption); 6] = [
            (self.hard_refresh, RequestOption::hard_refresh),
            (self.validate_dns, RequestOption::validate_dns),
            (self.validate_smtp, RequestOption::validate_smtp),
            (self.check_catch_all, RequestOption::check_catch_all),
            (self.check_free, RequestOption::check_free),
            (self.check_disposable, RequestOption::check_disposable),
        ];

        let mut options: Vec<RequestOption> = self
            .output_format
            .as_deref()
            .map(RequestOption::output_format)
            .into_iter()
            .collect();
        options.extend(
            toggles
                .into_iter()
                .filter_map(|(value, make)| value.map(make)),
        );
        options
    }

    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(api_key) = &self.api_key {
            config.api_key = api_key.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if config.api_key.is_empty() {
            bail!("Empty API key: pass --api-key, set APIKEY, or add api_key to the config file");
        }
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "evapi=debug,email_verifier=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config()?;
    tracing::debug!("Using configuration: {:?}", config);
    let client = Client::from_config(&config)?;
    let options = cli.options();

    if cli.raw {
        let response = client.get_raw(&cli.email, &options).await?;
        println!("{}", response.text());
        return Ok(());
    }

    match client.get(&cli.email, &options).await {
        Ok((result, _)) => {
            let rendered =
                serde_json::to_string_pretty(&result).context("cannot render result")?;
            println!("{rendered}");
            Ok(())
        }
        Err(err) => {
            if let Some(raw) = err.raw_response() {
                tracing::debug!("Raw response ({}): {}", raw.status(), raw.text());
            }
            Err(err.into())
        }
    }
}

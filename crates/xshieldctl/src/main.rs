// # xshieldctl - Xshield bulk policy client
//
// This binary is a THIN integration layer:
// - DO NOT add HTTP, retry or authentication logic here
// - All API logic lives in xshield-sdk and xshield-core
// - Configuration is via environment variables ONLY
//
// xshieldctl is responsible for:
// 1. Reading configuration from environment variables
// 2. Parsing one bulk command from the command line (clap)
// 3. Initializing logging and the runtime
// 4. Running the command, cancelling it on Ctrl-C
//
// ## Configuration
//
// - `XSHIELD_API_KEY`: API key (required)
// - `XSHIELD_SERVER_URL`: API server (default `https://ng.colortokens.com`)
// - `XSHIELD_TIMEOUT_SECS`: Timeout for the whole call, retries included (optional)
// - `XSHIELD_USER_AGENT`: User agent override (optional)
// - `XSHIELD_LOG_LEVEL`: trace, debug, info, warn, error (default `info`)
//
// ## Usage
//
// ```bash
// export XSHIELD_API_KEY=...
// xshieldctl templates apply <policy-id> <template-id>...
// xshieldctl namednetworks unapply <policy-id> <named-network-id>...
// ```

use anyhow::{Context as _, Result};
use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, ValueEnum};
use std::env;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use xshield_core::config::DEFAULT_SERVER_URL;
use xshield_core::{ClientConfig, Context, Credentials, Security, StaticSecurity};
use xshield_sdk::models::{NamedNetworkBulkRequest, NamedNetworkReference, TemplateBulkRequest, TemplateReference};
use xshield_sdk::{Options, SdkConfiguration, XshieldSdk};

/// Exit codes for different termination scenarios
///
/// - 0: The API accepted the request
/// - 1: Configuration or usage error
/// - 2: The call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CtlExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<CtlExitCode> for ExitCode {
    fn from(code: CtlExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    server_url: String,
    api_key: String,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let timeout_secs = match lookup("XSHIELD_TIMEOUT_SECS") {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("XSHIELD_TIMEOUT_SECS is not a number: '{}'", raw))?,
            ),
            None => None,
        };

        Ok(Self {
            server_url: lookup("XSHIELD_SERVER_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            api_key: lookup("XSHIELD_API_KEY").unwrap_or_default(),
            timeout_secs,
            user_agent: lookup("XSHIELD_USER_AGENT"),
            log_level: lookup("XSHIELD_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            anyhow::bail!(
                "XSHIELD_API_KEY is required. \
                Set it via: export XSHIELD_API_KEY=your_api_key"
            );
        }

        let key_lower = self.api_key.to_lowercase();
        if key_lower.contains("your_api_key") || key_lower.contains("replace_me") {
            anyhow::bail!(
                "XSHIELD_API_KEY appears to be a placeholder. \
                Use an actual API key from the Xshield console."
            );
        }

        if let Some(timeout) = self.timeout_secs
            && !(1..=3600).contains(&timeout)
        {
            anyhow::bail!(
                "XSHIELD_TIMEOUT_SECS must be between 1 and 3600 seconds. Got: {}",
                timeout
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "XSHIELD_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        self.client_config().validate()?;

        if self.server_url.starts_with("http://") {
            eprintln!(
                "WARNING: XSHIELD_SERVER_URL uses HTTP (not HTTPS). \
                The API key will be sent in clear text."
            );
        }

        Ok(())
    }

    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new().with_server_url(&self.server_url);
        if let Some(timeout) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(timeout));
        }
        if let Some(ref user_agent) = self.user_agent {
            config = config.with_user_agent(user_agent);
        }
        config
    }

    fn log_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// What the bulk call manipulates
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Target {
    #[value(name = "namednetworks")]
    NamedNetworks,
    Templates,
}

/// Apply or remove
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Action {
    Apply,
    #[value(name = "unapply")]
    UnApply,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Action::Apply => "apply",
            Action::UnApply => "unapply",
        }
    }
}

/// One bulk operation requested on the command line
#[derive(Parser, Debug, PartialEq, Eq)]
#[command(name = "xshieldctl", version)]
#[command(about = "Apply or remove named networks and templates on an Xshield tag-based policy")]
struct Cli {
    /// What to apply or remove
    target: Target,

    /// Apply or remove the listed ids
    action: Action,

    /// Tag-based policy to modify
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    policy_id: String,

    /// Named network or template ids
    #[arg(required = true, value_parser = NonEmptyStringValueParser::new())]
    ids: Vec<String>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                CtlExitCode::ConfigError.into()
            } else {
                CtlExitCode::Success.into()
            };
        }
    };

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return CtlExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return CtlExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level())
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return CtlExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return CtlExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run(config, cli).await {
            Ok(status) => {
                info!(status, "request accepted");
                CtlExitCode::Success
            }
            Err(e) => {
                error!("Request failed: {:#}", e);
                CtlExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Run one bulk operation, cancelling it on Ctrl-C
async fn run(config: Config, cli: Cli) -> Result<u16> {
    let security = Security::ConfigProvider(Credentials::new(config.api_key.clone()));
    let sdk_configuration = SdkConfiguration::new(config.client_config())?.with_security(StaticSecurity(security));
    let policies = XshieldSdk::new(sdk_configuration).tag_based_policies();

    let ctx = Context::background();
    let token = ctx.token().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received SIGINT, cancelling request");
            token.cancel();
        }
    });

    info!(
        target_kind = ?cli.target,
        action = cli.action.verb(),
        policy_id = %cli.policy_id,
        count = cli.ids.len(),
        "sending bulk request"
    );

    let Cli {
        target,
        action,
        policy_id,
        ids,
    } = cli;

    let response = match target {
        Target::NamedNetworks => {
            let refs = ids.into_iter().map(NamedNetworkReference::new).collect();
            let request = NamedNetworkBulkRequest::new(policy_id, refs);
            match action {
                Action::Apply => {
                    policies
                        .tag_based_policy_bulk_named_network_apply(&ctx, request, Options::new())
                        .await?
                }
                Action::UnApply => {
                    policies
                        .tag_based_policy_bulk_named_network_un_apply(&ctx, request, Options::new())
                        .await?
                }
            }
        }
        Target::Templates => {
            let refs = ids.into_iter().map(TemplateReference::new).collect();
            let request = TemplateBulkRequest::new(policy_id, refs);
            match action {
                Action::Apply => {
                    policies
                        .tag_based_policy_bulk_template_apply(&ctx, request, Options::new())
                        .await?
                }
                Action::UnApply => {
                    policies
                        .tag_based_policy_bulk_template_un_apply(&ctx, request, Options::new())
                        .await?
                }
            }
        }
    };

    Ok(response.status_code)
}

mod config;

use akamai_appsec::appsec::{
    GetActivationHistoryRequest, GetActivationsRequest, GetConfigurationRequest,
    GetConfigurationVersionsRequest, GetConfigurationsRequest, GetContractsGroupsRequest,
    GetCustomDenyListRequest, GetCustomRulesRequest, GetMatchTargetsRequest,
    GetRatePoliciesRequest, GetReputationProfilesRequest, GetSecurityPoliciesRequest,
    GetSiemSettingsRequest,
};
use akamai_appsec::{edgegrid, Appsec, Session, VERSION};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::Settings;
use serde::Serialize;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Read Akamai Application Security configurations
#[derive(Parser, Debug)]
#[command(name = "appsec", version = VERSION, about, long_about = None)]
struct Args {
    /// Credentials file (defaults to ~/.edgerc)
    #[arg(long, global = true)]
    edgerc: Option<PathBuf>,

    /// Credentials section
    #[arg(short, long, global = true)]
    section: Option<String>,

    /// Try AKAMAI_* environment variables before the credentials file
    #[arg(long, global = true)]
    env: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List security configurations
    Configs {
        /// Only the configuration with this name
        #[arg(long)]
        name: Option<String>,
    },
    /// Show one security configuration
    Config { config_id: Option<i64> },
    /// List the versions of a configuration
    Versions { config_id: Option<i64> },
    /// List security policies
    Policies {
        #[arg(long)]
        config_id: Option<i64>,
        #[arg(long)]
        config_version: i64,
        /// Only the policy with this name
        #[arg(long)]
        name: Option<String>,
    },
    /// List match targets
    MatchTargets {
        #[arg(long)]
        config_id: Option<i64>,
        #[arg(long)]
        config_version: i64,
    },
    /// List custom rules
    CustomRules {
        #[arg(long)]
        config_id: Option<i64>,
    },
    /// List custom deny actions
    CustomDeny {
        #[arg(long)]
        config_id: Option<i64>,
        #[arg(long)]
        config_version: i64,
    },
    /// List rate policies
    RatePolicies {
        #[arg(long)]
        config_id: Option<i64>,
        #[arg(long)]
        config_version: i64,
    },
    /// List reputation profiles
    ReputationProfiles {
        #[arg(long)]
        config_id: Option<i64>,
        #[arg(long)]
        config_version: i64,
    },
    /// Show SIEM settings
    Siem {
        #[arg(long)]
        config_id: Option<i64>,
        #[arg(long)]
        config_version: i64,
    },
    /// List contracts and groups
    ContractsGroups {
        #[arg(long)]
        contract: Option<String>,
        #[arg(long)]
        group: Option<i64>,
    },
    /// Show the state of an activation
    Activation { activation_id: i64 },
    /// List past activations of a configuration
    ActivationHistory { config_id: Option<i64> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Logging disabled, cannot open {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("appsec {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("appsec").join("appsec.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".appsec").join("appsec.log");
    }
    PathBuf::from("appsec.log")
}

fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    })
}

fn require_config_id(settings: &mut Settings, flag: Option<i64>) -> Result<i64> {
    let id = settings
        .effective_config_id(flag)
        .context("no configuration id given and none used before")?;
    settings.last_config_id = Some(id);
    Ok(id)
}

async fn run(args: Args, settings: &mut Settings, client: Appsec<Session>) -> Result<String> {
    let out = args.output;

    match args.command {
        Command::Configs { name } => {
            let request = GetConfigurationsRequest {
                name: name.unwrap_or_default(),
            };
            render(&client.get_configurations(&request).await?, out)
        }
        Command::Config { config_id } => {
            let config_id = require_config_id(settings, config_id)?;
            let request = GetConfigurationRequest { config_id };
            render(&client.get_configuration(&request).await?, out)
        }
        Command::Versions { config_id } => {
            let config_id = require_config_id(settings, config_id)?;
            let request = GetConfigurationVersionsRequest { config_id };
            render(&client.get_configuration_versions(&request).await?, out)
        }
        Command::Policies {
            config_id,
            config_version,
            name,
        } => {
            let request = GetSecurityPoliciesRequest {
                config_id: require_config_id(settings, config_id)?,
                version: config_version,
                policy_name: name.unwrap_or_default(),
            };
            render(&client.get_security_policies(&request).await?, out)
        }
        Command::MatchTargets {
            config_id,
            config_version,
        } => {
            let request = GetMatchTargetsRequest {
                config_id: require_config_id(settings, config_id)?,
                config_version,
                target_id: 0,
            };
            render(&client.get_match_targets(&request).await?, out)
        }
        Command::CustomRules { config_id } => {
            let request = GetCustomRulesRequest {
                config_id: require_config_id(settings, config_id)?,
                id: 0,
            };
            render(&client.get_custom_rules(&request).await?, out)
        }
        Command::CustomDeny {
            config_id,
            config_version,
        } => {
            let request = GetCustomDenyListRequest {
                config_id: require_config_id(settings, config_id)?,
                version: config_version,
                id: String::new(),
            };
            render(&client.get_custom_deny_list(&request).await?, out)
        }
        Command::RatePolicies {
            config_id,
            config_version,
        } => {
            let request = GetRatePoliciesRequest {
                config_id: require_config_id(settings, config_id)?,
                config_version,
                rate_policy_id: 0,
            };
            render(&client.get_rate_policies(&request).await?, out)
        }
        Command::ReputationProfiles {
            config_id,
            config_version,
        } => {
            let request = GetReputationProfilesRequest {
                config_id: require_config_id(settings, config_id)?,
                config_version,
                reputation_profile_id: 0,
            };
            render(&client.get_reputation_profiles(&request).await?, out)
        }
        Command::Siem {
            config_id,
            config_version,
        } => {
            let request = GetSiemSettingsRequest {
                config_id: require_config_id(settings, config_id)?,
                version: config_version,
            };
            render(&client.get_siem_settings(&request).await?, out)
        }
        Command::ContractsGroups { contract, group } => {
            let request = GetContractsGroupsRequest {
                contract_id: contract.unwrap_or_default(),
                group_id: group.unwrap_or_default(),
            };
            render(&client.get_contracts_groups(&request).await?, out)
        }
        Command::Activation { activation_id } => {
            let request = GetActivationsRequest { activation_id };
            render(&client.get_activations(&request).await?, out)
        }
        Command::ActivationHistory { config_id } => {
            let request = GetActivationHistoryRequest {
                config_id: require_config_id(settings, config_id)?,
            };
            render(&client.get_activation_history(&request).await?, out)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let mut settings = Settings::load();
    let section = settings.effective_section(args.section.as_deref());
    let edgerc = settings.effective_edgerc(args.edgerc.as_deref());

    let credentials = edgegrid::Config::load(edgerc.as_deref(), Some(&section), args.env)
        .with_context(|| format!("loading credentials for section [{}]", section))?;
    tracing::info!("Using credentials {:?}", credentials);

    let session = Session::new(credentials).context("building HTTP session")?;

    let cancel = CancellationToken::new();
    let client = Appsec::new(session).with_cancellation(cancel.clone());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling request");
            cancel.cancel();
        }
    });

    let output = run(args, &mut settings, client).await?;
    println!("{}", output);

    settings.section = Some(section);
    settings.edgerc = edgerc;
    if let Err(e) = settings.save() {
        tracing::warn!("Failed to save settings: {:#}", e);
    }

    Ok(())
}

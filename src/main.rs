use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use quorum_counter::{increment_payload, CounterResponse, MultisigCounter};
use quorum_engine::{persist, CallExecutor, ExecError, Multisig};
use quorum_store::MemStore;
use quorum_types::{AccAddress, Config, DeployConfig};

#[derive(Parser)]
#[command(name = "quorum", about = "Multi-signature authorization wallet", version, author)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run an in-process multisig + counter walkthrough")]
    Demo {
        #[arg(long, value_name = "HEX", help = "Owner address (repeatable)")]
        owner: Vec<String>,

        #[arg(long, value_name = "N", default_value_t = 1, help = "Confirmation quorum")]
        required: u32,

        #[arg(long, help = "Deploy in confidential mode")]
        confidential: bool,

        #[arg(long, value_name = "LEVEL", help = "Log level (trace, debug, info, warn, error)")]
        log_level: Option<String>,
    },

    #[command(about = "Display version information")]
    Version,

    #[command(about = "Configuration management")]
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    #[command(about = "Show current configuration")]
    Show {
        #[arg(long, value_name = "FILE", help = "Configuration file path")]
        file: Option<PathBuf>,
    },

    #[command(about = "Validate configuration")]
    Validate {
        #[arg(value_name = "FILE", help = "Configuration file path")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo {
            owner,
            required,
            confidential,
            log_level,
        } => demo_command(owner, required, confidential, log_level),
        Commands::Version => version_command(),
        Commands::Config { command } => config_command(command),
    }
}

fn setup_logging(log_level: Option<String>) -> Result<()> {
    let result = match log_level {
        Some(level) => quorum_log::init_tracing_with_level(&level),
        None => quorum_log::init_tracing(),
    };
    result.map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}

/// In-process call router standing in for the execution environment
struct LocalRouter {
    wallet_identity: AccAddress,
    counter_address: AccAddress,
    counter: MultisigCounter,
}

impl CallExecutor for LocalRouter {
    fn invoke(
        &mut self,
        destination: AccAddress,
        _value: u64,
        payload: &[u8],
        deploy: &DeployConfig,
    ) -> Result<Vec<u8>, ExecError> {
        if deploy.gas_limit == 0 {
            return Err(ExecError::Environment("empty gas budget".to_string()));
        }
        if destination != self.counter_address {
            return Err(ExecError::UnknownDestination(destination));
        }
        self.counter
            .handle_call(self.wallet_identity, payload)
            .map_err(|e| ExecError::Rejected(e.to_string()))
    }
}

fn demo_command(
    owner: Vec<String>,
    required: u32,
    confidential: bool,
    log_level: Option<String>,
) -> Result<()> {
    setup_logging(log_level)?;

    let mut config = Config::default();
    config.deploy.confidential = confidential;
    config.wallet.required = required;
    config.wallet.owners = if owner.is_empty() {
        // synthetic owners so the walkthrough runs without arguments
        (0..required.max(1))
            .map(|i| hex::encode(AccAddress::from_pubkey(format!("demo-owner-{i}").as_bytes()).as_bytes()))
            .collect()
    } else {
        owner
    };
    config.validate().context("invalid demo configuration")?;

    let owners = config.owner_addresses()?;
    let mut wallet = Multisig::new(owners.clone(), required, config.deploy.clone())?;

    let wallet_identity = AccAddress::from_pubkey(b"quorum-demo-wallet");
    let counter_address = AccAddress::from_pubkey(b"quorum-demo-counter");
    let mut router = LocalRouter {
        wallet_identity,
        counter_address,
        counter: MultisigCounter::new(wallet_identity),
    };

    println!("Deployed Multisig at {wallet_identity}");
    println!("Deployed Counter at {counter_address}");

    let submitter = owners[0];
    let id = wallet.submit_transaction(submitter, counter_address, 0, increment_payload())?;
    println!("Submitted transaction {id} -> counter/Increment");

    for owner in &owners {
        wallet.confirm_transaction(*owner, id)?;
        println!(
            "Confirmed by {owner} ({}/{})",
            wallet.get_transaction(id)?.confirmations().len(),
            wallet.get_required()
        );
        if wallet.is_confirmed(id)? {
            break;
        }
    }

    if !wallet.is_confirmed(id)? {
        bail!("quorum not reached in demo flow");
    }

    let ret = wallet.execute_transaction(submitter, id, &mut router)?;
    let response: CounterResponse = serde_json::from_slice(&ret)?;
    println!("Executed transaction {id}, counter value: {}", response.count);

    // snapshot the wallet through the store abstraction and reload it
    let mut store = MemStore::new();
    persist::save(&wallet, &mut store)?;
    let restored = persist::load(&store)?;
    println!(
        "Snapshot restored: {} transaction(s), quorum {}",
        restored.transaction_count(),
        restored.get_required()
    );

    Ok(())
}

fn version_command() -> Result<()> {
    println!("quorum {}", env!("CARGO_PKG_VERSION"));
    println!("build: {}", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn config_command(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show { file } => {
            let config = match file {
                Some(path) => Config::load_from_file(&path)?,
                None => Config::load()?,
            };
            let rendered = toml::to_string_pretty(&config)
                .map_err(|e| anyhow::anyhow!("failed to render config: {e}"))?;
            println!("{rendered}");
        }
        ConfigCommands::Validate { file } => {
            if !file.exists() {
                bail!("configuration file not found: {}", file.display());
            }
            let config = Config::load_from_file(&file)?;
            config.validate()?;
            println!("Configuration is valid");
        }
    }
    Ok(())
}

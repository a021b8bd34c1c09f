//! Quorum CLI: apply delegation-ledger operations to a snapshot file.
//!
//! Each invocation loads the ledger from `--state` (an empty ledger if the
//! file does not exist), applies one command, and writes the ledger back if
//! the command changed it.

use anyhow::{bail, Context};
use clap::Parser;
use quorum_governance::{DelegationRequest, DelegationScope, EngineConfig, GovernanceEngine};
use quorum_types::{Address, GovernancePowerType, PrivateKey, Signature, Timestamp};
use quorum_utils::LogFormat;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "quorum", about = "Governance power delegation ledger")]
struct Cli {
    /// Path to a TOML configuration file (signing domain, logging).
    #[arg(long, env = "QUORUM_CONFIG")]
    config: Option<PathBuf>,

    /// Ledger snapshot file.
    #[arg(long, default_value = "./quorum_ledger.bin", env = "QUORUM_STATE")]
    state: PathBuf,

    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Overrides the configuration file.
    #[arg(long, env = "QUORUM_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Credit new tokens to an address.
    Mint {
        #[arg(long)]
        to: Address,
        amount: u128,
    },
    /// Destroy tokens held by an address.
    Burn {
        #[arg(long)]
        from: Address,
        amount: u128,
    },
    /// Move tokens between two addresses.
    Transfer {
        #[arg(long)]
        from: Address,
        #[arg(long)]
        to: Address,
        amount: u128,
    },
    /// Delegate both powers of `caller`. The zero address or the caller
    /// itself withdraws the delegation.
    Delegate {
        #[arg(long)]
        caller: Address,
        #[arg(long)]
        to: Address,
    },
    /// Delegate one power of `caller`.
    DelegateByType {
        #[arg(long)]
        caller: Address,
        #[arg(long)]
        to: Address,
        /// "voting" or "proposition".
        #[arg(long)]
        kind: GovernancePowerType,
    },
    /// Submit a delegation signed by the delegator.
    MetaDelegate {
        #[arg(long)]
        delegator: Address,
        #[arg(long)]
        to: Address,
        /// Restrict to one power; both when omitted.
        #[arg(long)]
        kind: Option<GovernancePowerType>,
        /// Unix seconds after which the signature is void.
        #[arg(long)]
        deadline: u64,
        /// 65-byte `r || s || v` signature, hex.
        #[arg(long)]
        signature: String,
        /// Override the current time (unix seconds).
        #[arg(long)]
        now: Option<u64>,
    },
    /// Sign a delegation request with a private key, for `meta-delegate`.
    Sign {
        /// 32-byte secp256k1 private key, hex.
        #[arg(long, env = "QUORUM_SIGNING_KEY", hide_env_values = true)]
        key: String,
        #[arg(long)]
        to: Address,
        #[arg(long)]
        kind: Option<GovernancePowerType>,
        #[arg(long)]
        deadline: u64,
        /// Nonce to sign for; defaults to the signer's current nonce.
        #[arg(long)]
        nonce: Option<u64>,
    },
    /// Show current voting and proposition power.
    Power { holder: Address },
    /// Show balance and delegated power fields.
    Account { holder: Address },
    /// Show delegatees.
    Delegatee { holder: Address },
    /// Show the nonce the next signed request must use.
    Nonce { owner: Address },
    /// Show the signing domain separator.
    DomainSeparator,
    /// Recompute every delegatee's power and report disagreements.
    Audit,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => EngineConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let format: LogFormat = config.log_format.parse()?;
    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    quorum_utils::init_logging(format, &level)?;

    let engine = open_ledger(&config, &cli.state)?;
    let changed = run(&engine, cli.command)?;
    if changed {
        let bytes = engine.save_state()?;
        std::fs::write(&cli.state, bytes)
            .with_context(|| format!("writing {}", cli.state.display()))?;
        tracing::info!(path = %cli.state.display(), "ledger saved");
    }
    Ok(())
}

fn open_ledger(config: &EngineConfig, path: &Path) -> anyhow::Result<GovernanceEngine> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no ledger file, starting empty");
        return Ok(GovernanceEngine::new(config));
    }
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let engine = GovernanceEngine::load_state(config, &bytes)
        .with_context(|| format!("decoding {}", path.display()))?;
    Ok(engine)
}

/// Execute one command; returns whether the ledger must be written back.
fn run(engine: &GovernanceEngine, command: Command) -> anyhow::Result<bool> {
    match command {
        Command::Mint { to, amount } => {
            engine.mint(&to, amount)?;
        }
        Command::Burn { from, amount } => {
            engine.burn(&from, amount)?;
        }
        Command::Transfer { from, to, amount } => {
            engine.transfer(&from, &to, amount)?;
        }
        Command::Delegate { caller, to } => {
            engine.delegate(&caller, &to)?;
        }
        Command::DelegateByType { caller, to, kind } => {
            engine.delegate_by_type(&caller, &to, kind)?;
        }
        Command::MetaDelegate {
            delegator,
            to,
            kind,
            deadline,
            signature,
            now,
        } => {
            let signature = parse_signature(&signature)?;
            let now = now.map(Timestamp::new).unwrap_or_else(Timestamp::now);
            let request = DelegationRequest {
                delegator,
                delegatee: to,
                scope: scope(kind),
                deadline: Timestamp::new(deadline),
            };
            engine.submit(&request, &signature, now)?;
        }
        Command::Sign {
            key,
            to,
            kind,
            deadline,
            nonce,
        } => {
            let key = parse_private_key(&key)?;
            let delegator = quorum_crypto::address_of(&key)?;
            let nonce = match nonce {
                Some(n) => n,
                None => engine.nonces(&delegator)?,
            };
            let request = DelegationRequest {
                delegator,
                delegatee: to,
                scope: scope(kind),
                deadline: Timestamp::new(deadline),
            };
            let digest = request.digest(&engine.domain_separator(), nonce);
            let signature = quorum_crypto::sign_digest(&digest, &key)?;
            println!("delegator: {delegator}");
            println!("nonce:     {nonce}");
            println!("signature: 0x{}", hex::encode(signature.to_bytes()));
            return Ok(false);
        }
        Command::Power { holder } => {
            let (voting, proposition) = engine.get_powers_current(&holder)?;
            println!("voting:      {voting}");
            println!("proposition: {proposition}");
            return Ok(false);
        }
        Command::Account { holder } => {
            let record = engine.account(&holder)?;
            println!("balance:                   {}", record.balance);
            println!("delegated voting power:    {}", record.delegated_voting_power);
            println!("delegated proposition pwr: {}", record.delegated_proposition_power);
            println!("delegating voting:         {}", record.delegating_voting);
            println!("delegating proposition:    {}", record.delegating_proposition);
            return Ok(false);
        }
        Command::Delegatee { holder } => {
            let (voting, proposition) = engine.get_delegates(&holder)?;
            println!("voting:      {}", Address::from(voting));
            println!("proposition: {}", Address::from(proposition));
            return Ok(false);
        }
        Command::Nonce { owner } => {
            println!("{}", engine.nonces(&owner)?);
            return Ok(false);
        }
        Command::DomainSeparator => {
            println!("0x{}", hex::encode(engine.domain_separator()));
            return Ok(false);
        }
        Command::Audit => {
            let found = engine.audit()?;
            for discrepancy in &found {
                println!("{discrepancy}");
            }
            if !found.is_empty() {
                bail!("{} discrepancies", found.len());
            }
            println!("ledger consistent");
            return Ok(false);
        }
    }
    Ok(true)
}

fn scope(kind: Option<GovernancePowerType>) -> DelegationScope {
    kind.map_or(DelegationScope::All, DelegationScope::ByType)
}

fn parse_signature(s: &str) -> anyhow::Result<Signature> {
    let bytes = hex::decode(s.trim_start_matches("0x")).context("signature is not hex")?;
    Ok(Signature::from_bytes(&bytes)?)
}

fn parse_private_key(s: &str) -> anyhow::Result<PrivateKey> {
    let bytes = hex::decode(s.trim_start_matches("0x")).context("key is not hex")?;
    let key: [u8; 32] = match bytes.try_into() {
        Ok(key) => key,
        Err(bytes) => bail!("private key must be 32 bytes, got {}", bytes.len()),
    };
    Ok(PrivateKey(key))
}

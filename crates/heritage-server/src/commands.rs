//! One-shot registry operations run against the persisted ledger state.
//!
//! Each command takes the state lock, loads the state, executes a single
//! registry or token operation, and saves the state only if the operation
//! succeeded.

use crate::config::ServerConfig;
use anyhow::{bail, Context, Result};
use heritage_core::{
    Address, Amount, AssetTransferAgent, CallContext, Clock, LedgerState, LogSink, StateLock,
    SystemClock, Testament, TestamentRegistry,
};
use std::str::FromStr;

/// A parsed operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        inheritor: Address,
        token: Address,
        max_days: u32,
    },
    Update {
        inheritor: Address,
        token: Address,
        max_days: u32,
    },
    Proof,
    Inherit,
    Revoke,
    ShowTestator(Address),
    ShowInheritor(Address),
    Deploy {
        token: Address,
        symbol: String,
    },
    Mint {
        token: Address,
        to: Address,
        amount: Amount,
    },
    /// Approve the registry to spend the caller's balance
    Approve {
        token: Address,
        amount: Amount,
    },
    Balance {
        token: Address,
        owner: Address,
    },
}

impl Command {
    /// Parse a command name and its positional arguments.
    pub fn parse(name: &str, args: &[String]) -> Result<Self> {
        let arg = |i: usize, what: &str| positional(name, args, i, what);
        let address = |i: usize, what: &str| positional_address(name, args, i, what);

        let command = match name {
            "add" | "update" => {
                let inheritor = address(0, "inheritor")?;
                let token = address(1, "token")?;
                let days = arg(2, "max_days")?;
                let max_days = days
                    .parse::<u32>()
                    .with_context(|| format!("Invalid max_days: {}", days))?;
                if name == "add" {
                    Command::Add {
                        inheritor,
                        token,
                        max_days,
                    }
                } else {
                    Command::Update {
                        inheritor,
                        token,
                        max_days,
                    }
                }
            }
            "proof" => Command::Proof,
            "inherit" => Command::Inherit,
            "revoke" => Command::Revoke,
            "show-testator" => Command::ShowTestator(address(0, "testator")?),
            "show-inheritor" => Command::ShowInheritor(address(0, "inheritor")?),
            "deploy" => Command::Deploy {
                token: address(0, "token")?,
                symbol: arg(1, "symbol")?.to_string(),
            },
            "mint" => Command::Mint {
                token: address(0, "token")?,
                to: address(1, "to")?,
                amount: parse_amount(arg(2, "amount")?)?,
            },
            "approve" => Command::Approve {
                token: address(0, "token")?,
                amount: parse_amount(arg(1, "amount")?)?,
            },
            "balance" => Command::Balance {
                token: address(0, "token")?,
                owner: address(1, "owner")?,
            },
            other => bail!("Unknown command: {}", other),
        };
        Ok(command)
    }

    /// Whether the command acts on behalf of a caller.
    pub fn needs_caller(&self) -> bool {
        matches!(
            self,
            Command::Add { .. }
                | Command::Update { .. }
                | Command::Proof
                | Command::Inherit
                | Command::Revoke
                | Command::Approve { .. }
        )
    }

    /// Whether the command can change state.
    pub fn mutates(&self) -> bool {
        !matches!(
            self,
            Command::ShowTestator(_) | Command::ShowInheritor(_) | Command::Balance { .. }
        )
    }
}

fn positional<'a>(command: &str, args: &'a [String], i: usize, what: &str) -> Result<&'a str> {
    args.get(i)
        .map(String::as_str)
        .with_context(|| format!("`{}` requires <{}>", command, what))
}

fn positional_address(command: &str, args: &[String], i: usize, what: &str) -> Result<Address> {
    let s = positional(command, args, i, what)?;
    Address::from_str(s).with_context(|| format!("Invalid {} address: {}", what, s))
}

fn parse_amount(s: &str) -> Result<Amount> {
    s.parse::<Amount>()
        .with_context(|| format!("Invalid amount: {}", s))
}

/// Run a command against the state file, using the wall clock.
pub fn run(config: &ServerConfig, caller: Option<Address>, command: &Command) -> Result<String> {
    let path = config.state_path();
    let _lock = StateLock::acquire(&path)
        .with_context(|| format!("Failed to lock ledger state {}", path.display()))?;
    let mut state = LedgerState::load(&path)
        .with_context(|| format!("Failed to load ledger state from {}", path.display()))?;

    let output = execute(config, &mut state, caller, command, &SystemClock)?;

    if command.mutates() {
        state
            .save(&path)
            .with_context(|| format!("Failed to save ledger state to {}", path.display()))?;
    }
    Ok(output)
}

/// Execute a command against in-memory state.
///
/// On error `state` is left as it was.
pub fn execute(
    config: &ServerConfig,
    state: &mut LedgerState,
    caller: Option<Address>,
    command: &Command,
    clock: &dyn Clock,
) -> Result<String> {
    let caller = match (command.needs_caller(), caller) {
        (true, Some(c)) => c,
        (true, None) => bail!("This command requires --as <caller>"),
        (false, c) => c.unwrap_or(Address::ZERO),
    };
    let ctx = CallContext::at(caller, clock);
    let registry_address = config.registry_address()?;

    let mut registry = TestamentRegistry::with_sink(
        registry_address,
        std::mem::take(&mut state.testaments),
        LogSink,
    );
    let result = apply(&mut registry, &mut state.tokens, &ctx, command);
    state.testaments = registry.into_store();
    result
}

fn apply(
    registry: &mut TestamentRegistry<LogSink>,
    tokens: &mut heritage_core::TokenLedger,
    ctx: &CallContext,
    command: &Command,
) -> Result<String> {
    let output = match command {
        Command::Add {
            inheritor,
            token,
            max_days,
        } => {
            let t = registry.add_testament(ctx, &*tokens, *inheritor, *token, *max_days)?;
            describe(&t)
        }
        Command::Update {
            inheritor,
            token,
            max_days,
        } => {
            let t = registry.update_testament(ctx, *inheritor, *token, *max_days)?;
            describe(&t)
        }
        Command::Proof => describe(&registry.update_proof(ctx)?),
        Command::Inherit => {
            let event = registry.inherit(ctx, tokens)?;
            serde_json::to_string_pretty(&event)?
        }
        Command::Revoke => describe(&registry.revoke(ctx)?),
        Command::ShowTestator(testator) => describe(registry.get_by_testator(testator)?),
        Command::ShowInheritor(inheritor) => describe(registry.get_by_inheritor(inheritor)?),
        Command::Deploy { token, symbol } => {
            tokens.deploy(*token, symbol.clone());
            format!("Token {} deployed as {}", symbol, token)
        }
        Command::Mint { token, to, amount } => {
            tokens.mint(token, to, *amount)?;
            format!("Minted {} to {}", amount, to)
        }
        Command::Approve { token, amount } => {
            let spender = *registry.address();
            tokens.approve(token, &ctx.caller, &spender, *amount)?;
            format!("{} approved registry {} for {}", ctx.caller, spender, amount)
        }
        Command::Balance { token, owner } => tokens.balance_of(token, owner).to_string(),
    };
    Ok(output)
}

fn describe(testament: &Testament) -> String {
    serde_json::to_string_pretty(testament).unwrap_or_else(|_| format!("{:?}", testament))
}

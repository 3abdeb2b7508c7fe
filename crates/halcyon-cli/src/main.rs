//! Command line front end for the Halcyon wallet service
//!
//! Every invocation opens the configured storage, runs one command and
//! exits. Commands that touch wallet data unlock the wallet first:
//! - `--wallet` selects it by ID or name (default: last active wallet)
//! - `--password` is required to unlock
//!
//! Logs go to stderr, filtered by `HALCYON_LOG` (default `info`).

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use halcyon_core::ThemeMode;
use halcyon_params::NetworkType;
use halcyon_wallet_service::{AppConfig, WalletService};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "halcyon")]
#[command(about = "Halcyon wallet", long_about = None)]
struct Cli {
    #[command(flatten)]
    wallet: WalletArgs,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Wallet selection and unlock
#[derive(Args, Clone, Default)]
pub struct WalletArgs {
    /// Wallet ID or name
    #[arg(short, long, global = true)]
    pub wallet: Option<String>,

    /// Wallet password
    #[arg(short, long, global = true)]
    pub password: Option<String>,

    /// Optional BIP39 passphrase (nothing derived from it is saved)
    #[arg(long, global = true)]
    pub passphrase: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage wallets
    Wallet {
        #[command(subcommand)]
        command: WalletCommand,
    },

    /// Manage addresses
    Address {
        #[command(subcommand)]
        command: AddressCommand,
    },

    /// Manage the address book
    Contact {
        #[command(subcommand)]
        command: ContactCommand,
    },

    /// Refresh balances and history of every address
    Sync,

    /// Show the confirmed history of an address
    History {
        /// Address
        address: String,

        /// Load every page instead of the next one
        #[arg(long)]
        all: bool,
    },

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },

    /// Check explorer connectivity
    Status,

    /// Format a base-unit amount, or parse a decimal one
    Format {
        /// Amount
        amount: String,

        /// Token decimals
        #[arg(short, long, default_value = "18")]
        decimals: u32,

        /// Show every significant decimal
        #[arg(long)]
        full: bool,

        /// Parse a decimal amount into base units
        #[arg(long)]
        parse: bool,
    },
}

#[derive(Subcommand)]
enum WalletCommand {
    /// Create a wallet with a new 24-word secret recovery phrase
    Create {
        /// Wallet name
        #[arg(short, long)]
        name: String,
    },

    /// Restore a wallet from its secret recovery phrase
    Import {
        /// Wallet name
        #[arg(short, long)]
        name: String,

        /// Secret recovery phrase
        #[arg(short, long)]
        mnemonic: String,
    },

    /// List stored wallets
    List,

    /// Rename the selected wallet
    Rename {
        /// New name
        name: String,
    },

    /// Change the password of the selected wallet
    Passwd {
        /// New password
        #[arg(long)]
        new_password: String,
    },

    /// Delete the selected wallet and all its data
    Delete {
        /// Skip the confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum AddressCommand {
    /// List addresses, default first
    List,

    /// Derive a new address
    New {
        /// Address group
        #[arg(short, long)]
        group: Option<u32>,
    },

    /// Make an address the default one
    Default {
        /// Address
        address: String,
    },

    /// Label an address
    Label {
        /// Address
        address: String,

        /// Label, empty to clear
        label: String,
    },

    /// Scan the network for used addresses
    Discover,
}

#[derive(Subcommand)]
enum ContactCommand {
    /// List contacts
    List,

    /// Add a contact
    Add {
        /// Name
        name: String,

        /// Address
        address: String,
    },

    /// Remove a contact
    Remove {
        /// Contact ID
        id: String,
    },
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Show current settings
    Show,

    /// Switch to a network preset
    SetNetwork {
        /// mainnet, testnet or devnet
        network: NetworkType,
    },

    /// Change general settings
    SetGeneral {
        /// Theme
        #[arg(long)]
        theme: Option<Theme>,

        /// Locale tag, e.g. en-US
        #[arg(long)]
        language: Option<String>,

        /// Hide amounts
        #[arg(long)]
        discreet: Option<bool>,

        /// Auto-lock after N idle minutes, 0 disables
        #[arg(long)]
        lock_minutes: Option<u32>,
    },
}

/// Theme as accepted on the command line
#[derive(Clone, Copy, ValueEnum)]
pub enum Theme {
    /// Light
    Light,
    /// Dark
    Dark,
    /// Follow the operating system
    System,
}

impl From<Theme> for ThemeMode {
    fn from(theme: Theme) -> Self {
        match theme {
            Theme::Light => ThemeMode::Light,
            Theme::Dark => ThemeMode::Dark,
            Theme::System => ThemeMode::System,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("HALCYON_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Pure formatting needs no storage
    if let Commands::Format {
        amount,
        decimals,
        full,
        parse,
    } = &cli.command
    {
        println!("{}", commands::format_amount(amount, *decimals, *full, *parse)?);
        return Ok(());
    }

    let config = AppConfig::from_env()?;
    let service = WalletService::open(&config)?;
    let out = commands::Output { json: cli.json };

    let result = run(&service, &cli.wallet, cli.command, &out).await;
    if let Err(e) = &result {
        tracing::debug!("Command failed: {:?}", e);
    }
    service.shutdown().await?;
    result
}

async fn run(
    service: &WalletService,
    wallet: &WalletArgs,
    command: Commands,
    out: &commands::Output,
) -> Result<()> {
    match command {
        Commands::Wallet { command } => match command {
            WalletCommand::Create { name } => commands::create_wallet(service, wallet, &name, out).await,
            WalletCommand::Import { name, mnemonic } => {
                commands::import_wallet(service, wallet, &name, &mnemonic, out).await
            }
            WalletCommand::List => commands::list_wallets(service, out).await,
            WalletCommand::Rename { name } => commands::rename_wallet(service, wallet, &name, out).await,
            WalletCommand::Passwd { new_password } => {
                commands::change_password(service, wallet, &new_password).await
            }
            WalletCommand::Delete { yes } => commands::delete_wallet(service, wallet, yes).await,
        },
        Commands::Address { command } => {
            commands::unlock(service, wallet).await?;
            match command {
                AddressCommand::List => commands::list_addresses(service, out),
                AddressCommand::New { group } => commands::new_address(service, group, out).await,
                AddressCommand::Default { address } => commands::set_default(service, &address).await,
                AddressCommand::Label { address, label } => {
                    commands::set_label(service, &address, &label).await
                }
                AddressCommand::Discover => commands::discover(service, out).await,
            }
        }
        Commands::Contact { command } => {
            commands::unlock(service, wallet).await?;
            match command {
                ContactCommand::List => commands::list_contacts(service, out),
                ContactCommand::Add { name, address } => {
                    commands::add_contact(service, &name, &address, out).await
                }
                ContactCommand::Remove { id } => commands::remove_contact(service, &id).await,
            }
        }
        Commands::Sync => {
            commands::unlock(service, wallet).await?;
            commands::sync(service, out).await
        }
        Commands::History { address, all } => {
            commands::unlock(service, wallet).await?;
            commands::history(service, &address, all, out).await
        }
        Commands::Settings { command } => match command {
            SettingsCommand::Show => commands::show_settings(service, out),
            SettingsCommand::SetNetwork { network } => {
                commands::set_network(service, network).await
            }
            SettingsCommand::SetGeneral {
                theme,
                language,
                discreet,
                lock_minutes,
            } => {
                commands::set_general(
                    service,
                    commands::GeneralChanges {
                        theme: theme.map(ThemeMode::from),
                        language,
                        discreet,
                        lock_minutes,
                    },
                    out,
                )
                .await
            }
        },
        Commands::Status => commands::status(service).await,
        Commands::Format { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_wallet_flags() {
        let cli = Cli::try_parse_from([
            "halcyon",
            "address",
            "new",
            "--group",
            "2",
            "--wallet",
            "Main",
            "--password",
            "secret-pass-1",
        ])
        .unwrap();

        assert_eq!(cli.wallet.wallet.as_deref(), Some("Main"));
        assert_eq!(cli.wallet.password.as_deref(), Some("secret-pass-1"));
        assert!(matches!(
            cli.command,
            Commands::Address {
                command: AddressCommand::New { group: Some(2) }
            }
        ));
    }

    #[test]
    fn test_parse_network_preset() {
        let cli = Cli::try_parse_from(["halcyon", "settings", "set-network", "testnet"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Settings {
                command: SettingsCommand::SetNetwork {
                    network: NetworkType::Testnet
                }
            }
        ));
        assert!(Cli::try_parse_from(["halcyon", "settings", "set-network", "moon"]).is_err());
    }
}

//! Command handlers

use crate::WalletArgs;
use anyhow::{anyhow, bail, Context, Result};
use halcyon_core::{
    abbreviate_amount, abbreviate_amount_with, format_full, parse_amount, remove_trailing_zeros,
    AddressSettings, AmountFormat, Contact, ThemeMode, WalletMeta,
};
use halcyon_params::NetworkType;
use halcyon_state::selectors;
use halcyon_wallet_service::WalletService;
use serde::Serialize;

/// Text or JSON printing
pub struct Output {
    /// Print JSON
    pub json: bool,
}

impl Output {
    fn emit<T: Serialize + ?Sized>(&self, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text(value));
        }
        Ok(())
    }
}

/// Keep the message the UI would show
fn user(e: halcyon_wallet_service::Error) -> anyhow::Error {
    anyhow!(e.user_message())
}

// =============================================================================
// Wallets
// =============================================================================

async fn select_wallet(service: &WalletService, args: &WalletArgs) -> Result<WalletMeta> {
    let wallets = service.list_wallets().await.map_err(user)?;
    if wallets.is_empty() {
        bail!("No wallet yet, create one with `halcyon wallet create`");
    }

    if let Some(wanted) = &args.wallet {
        return wallets
            .into_iter()
            .find(|w| &w.id == wanted || w.name.eq_ignore_ascii_case(wanted))
            .with_context(|| format!("No wallet named {}", wanted));
    }

    if let Some(id) = service.storage().settings.active_wallet_id()? {
        if let Some(wallet) = wallets.iter().find(|w| w.id == id) {
            return Ok(wallet.clone());
        }
    }
    match wallets.as_slice() {
        [only] => Ok(only.clone()),
        _ => bail!("Several wallets are stored, choose one with --wallet"),
    }
}

fn password(args: &WalletArgs) -> Result<&str> {
    args.password
        .as_deref()
        .context("--password is required for this command")
}

/// Unlock the selected wallet
pub async fn unlock(service: &WalletService, args: &WalletArgs) -> Result<WalletMeta> {
    let wallet = select_wallet(service, args).await?;
    service
        .unlock_wallet(&wallet.id, password(args)?, args.passphrase.clone())
        .await
        .map_err(user)?;
    Ok(wallet)
}

/// `wallet create`
pub async fn create_wallet(
    service: &WalletService,
    args: &WalletArgs,
    name: &str,
    out: &Output,
) -> Result<()> {
    let (wallet, mnemonic) = service
        .create_wallet(name, password(args)?)
        .await
        .map_err(user)?;

    out.emit(&wallet, |w| format!("Created wallet {} ({})", w.name, w.id))?;
    eprintln!();
    eprintln!("Secret recovery phrase, write it down and keep it offline:");
    eprintln!();
    eprintln!("    {}", mnemonic.as_str());
    eprintln!();
    Ok(())
}

/// `wallet import`
pub async fn import_wallet(
    service: &WalletService,
    args: &WalletArgs,
    name: &str,
    mnemonic: &str,
    out: &Output,
) -> Result<()> {
    let wallet = service
        .import_wallet(name, password(args)?, mnemonic)
        .await
        .map_err(user)?;
    out.emit(&wallet, |w| format!("Imported wallet {} ({})", w.name, w.id))
}

/// `wallet list`
pub async fn list_wallets(service: &WalletService, out: &Output) -> Result<()> {
    let wallets = service.list_wallets().await.map_err(user)?;
    let active = service.storage().settings.active_wallet_id()?;
    out.emit(&wallets, |wallets| {
        if wallets.is_empty() {
            return "No wallets".to_string();
        }
        wallets
            .iter()
            .map(|w| {
                let marker = if active.as_ref() == Some(&w.id) { "*" } else { " " };
                format!("{} {:<24} {}", marker, w.name, w.id)
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}

/// `wallet rename`
pub async fn rename_wallet(
    service: &WalletService,
    args: &WalletArgs,
    name: &str,
    out: &Output,
) -> Result<()> {
    let wallet = select_wallet(service, args).await?;
    let renamed = service.rename_wallet(&wallet.id, name).await.map_err(user)?;
    out.emit(&renamed, |w| format!("Renamed to {}", w.name))
}

/// `wallet passwd`
pub async fn change_password(
    service: &WalletService,
    args: &WalletArgs,
    new_password: &str,
) -> Result<()> {
    let wallet = select_wallet(service, args).await?;
    service
        .change_password(&wallet.id, password(args)?, new_password)
        .await
        .map_err(user)?;
    println!("Password changed");
    Ok(())
}

/// `wallet delete`
pub async fn delete_wallet(service: &WalletService, args: &WalletArgs, yes: bool) -> Result<()> {
    let wallet = unlock(service, args).await?;
    if !yes {
        bail!(
            "This deletes {} and everything saved for it. Pass --yes to confirm",
            wallet.name
        );
    }
    service.delete_active_wallet().await.map_err(user)?;
    println!("Deleted wallet {}", wallet.name);
    Ok(())
}

// =============================================================================
// Addresses
// =============================================================================

/// `address list`
pub fn list_addresses(service: &WalletService, out: &Output) -> Result<()> {
    let state = service.state();
    let addresses = selectors::sorted_addresses(&state);
    out.emit(&addresses, |addresses| {
        addresses
            .iter()
            .map(|a| {
                format!(
                    "{} {} #{:<3} g{} {:>12} {}",
                    if a.is_default { "*" } else { " " },
                    a.hash,
                    a.index,
                    a.group,
                    abbreviate_amount(a.balance),
                    a.label.as_deref().unwrap_or("")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}

/// `address new`
pub async fn new_address(service: &WalletService, group: Option<u32>, out: &Output) -> Result<()> {
    let address = service.generate_address(group).await.map_err(user)?;
    out.emit(&address, |a| format!("{} (index {}, group {})", a.hash, a.index, a.group))
}

fn current_settings(service: &WalletService, hash: &str) -> Result<AddressSettings> {
    let state = service.state();
    let address = selectors::address_by_hash(&state, hash)
        .with_context(|| format!("{} is not an address of this wallet", hash))?;
    Ok(AddressSettings {
        label: address.label.clone(),
        color: address.color.clone(),
        is_default: address.is_default,
    })
}

/// `address default`
pub async fn set_default(service: &WalletService, hash: &str) -> Result<()> {
    let settings = AddressSettings {
        is_default: true,
        ..current_settings(service, hash)?
    };
    service
        .update_address_settings(hash, settings)
        .await
        .map_err(user)?;
    println!("Default address is now {}", hash);
    Ok(())
}

/// `address label`
pub async fn set_label(service: &WalletService, hash: &str, label: &str) -> Result<()> {
    let label = label.trim();
    let settings = AddressSettings {
        label: (!label.is_empty()).then(|| label.to_string()),
        ..current_settings(service, hash)?
    };
    service
        .update_address_settings(hash, settings)
        .await
        .map_err(user)?;
    Ok(())
}

/// `address discover`
pub async fn discover(service: &WalletService, out: &Output) -> Result<()> {
    let found = service.discover_addresses().await.map_err(user)?;
    out.emit(&found, |found| {
        if found.is_empty() {
            return "No new addresses found".to_string();
        }
        found
            .iter()
            .map(|a| format!("{} (index {})", a.hash, a.index))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

// =============================================================================
// Contacts
// =============================================================================

/// `contact list`
pub fn list_contacts(service: &WalletService, out: &Output) -> Result<()> {
    let state = service.state();
    out.emit(&state.contacts.contacts, |contacts| {
        contacts
            .iter()
            .map(|c| format!("{:<20} {} {}", c.name, c.address, c.id))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

/// `contact add`
pub async fn add_contact(
    service: &WalletService,
    name: &str,
    address: &str,
    out: &Output,
) -> Result<()> {
    let contact = service
        .save_contact(Contact {
            id: String::new(),
            name: name.to_string(),
            address: address.to_string(),
        })
        .await
        .map_err(user)?;
    out.emit(&contact, |c| format!("Saved {} ({})", c.name, c.id))
}

/// `contact remove`
pub async fn remove_contact(service: &WalletService, id: &str) -> Result<()> {
    service.delete_contact(id).await.map_err(user)?;
    Ok(())
}

// =============================================================================
// Sync and history
// =============================================================================

#[derive(Serialize)]
struct SyncSummary {
    balance: String,
    locked_balance: String,
    synced: usize,
    pending: usize,
    failures: Vec<(String, String)>,
}

/// `sync`
pub async fn sync(service: &WalletService, out: &Output) -> Result<()> {
    let outcome = service.sync_addresses().await.map_err(user)?;
    let state = service.state();
    let summary = SyncSummary {
        balance: selectors::total_balance(&state).to_string(),
        locked_balance: selectors::total_locked_balance(&state).to_string(),
        synced: outcome.synced.len(),
        pending: state.pending_transactions.transactions.len(),
        failures: outcome.failures.clone(),
    };

    out.emit(&summary, |s| {
        let mut lines = vec![
            format!(
                "Balance: {} ({} locked)",
                abbreviate_amount(selectors::total_balance(&state)),
                abbreviate_amount(selectors::total_locked_balance(&state))
            ),
            format!(
                "Synced {} address(es), {} pending transaction(s)",
                s.synced, s.pending
            ),
        ];
        for (hash, reason) in &s.failures {
            lines.push(format!("Failed {}: {}", hash, reason));
        }
        lines.join("\n")
    })?;

    if !outcome.is_complete() {
        bail!("Could not sync {} address(es)", outcome.failures.len());
    }
    Ok(())
}

/// `history`
pub async fn history(service: &WalletService, hash: &str, all: bool, out: &Output) -> Result<()> {
    let page = if all {
        service.load_all_transactions(hash).await
    } else {
        service.load_more_transactions(hash).await
    }
    .map_err(user)?;
    if page.is_none() {
        eprintln!("Every page is already loaded");
    }

    let state = service.state();
    let transactions = selectors::address_transactions(&state, hash);
    out.emit(&transactions, |transactions| {
        transactions
            .iter()
            .map(|tx| format!("{} {} {}", tx.timestamp, tx.hash, tx.block_hash))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

// =============================================================================
// Settings and network
// =============================================================================

/// `settings show`
pub fn show_settings(service: &WalletService, out: &Output) -> Result<()> {
    let state = service.state();
    out.emit(&state.settings.settings, |s| {
        format!(
            "network:  {} (node {}, explorer {})\ntheme:    {:?}\nlanguage: {}\ndiscreet: {}",
            s.network
                .network_type()
                .map(|t| t.name())
                .unwrap_or("custom"),
            s.network.node_host,
            s.network.explorer_api_host,
            s.general.theme,
            s.general.language,
            s.general.discreet_mode
        )
    })
}

/// `settings set-network`
pub async fn set_network(service: &WalletService, network: NetworkType) -> Result<()> {
    let status = service.reset_network(network).await.map_err(user)?;
    println!("Switched to {} ({:?})", network, status);
    Ok(())
}

/// Requested general settings changes
pub struct GeneralChanges {
    /// Theme
    pub theme: Option<ThemeMode>,
    /// Language
    pub language: Option<String>,
    /// Discreet mode
    pub discreet: Option<bool>,
    /// Auto-lock minutes, 0 disables
    pub lock_minutes: Option<u32>,
}

/// `settings set-general`
pub async fn set_general(
    service: &WalletService,
    changes: GeneralChanges,
    out: &Output,
) -> Result<()> {
    let mut general = service.state().settings.settings.general.clone();
    if let Some(theme) = changes.theme {
        general.theme = theme;
    }
    if let Some(language) = changes.language {
        general.language = language;
    }
    if let Some(discreet) = changes.discreet {
        general.discreet_mode = discreet;
    }
    if let Some(minutes) = changes.lock_minutes {
        general.wallet_lock_time_minutes = (minutes > 0).then_some(minutes);
    }

    let settings = service
        .update_general_settings(general)
        .await
        .map_err(user)?;
    out.emit(&settings.general, |_| "Settings saved".to_string())
}

/// `status`
pub async fn status(service: &WalletService) -> Result<()> {
    let status = service.probe_network().await.map_err(user)?;
    let state = service.state();
    match (&state.network.explorer_version, &state.network.last_error) {
        (Some(version), _) => println!("{:?} (explorer {})", status, version),
        (None, Some(reason)) => println!("{:?}: {}", status, reason),
        (None, None) => println!("{:?}", status),
    }
    Ok(())
}

/// `format`
pub fn format_amount(amount: &str, decimals: u32, full: bool, parse: bool) -> Result<String> {
    if parse {
        return Ok(parse_amount(amount, decimals)?.to_string());
    }
    let base: u128 = amount
        .trim()
        .parse()
        .context("Amount must be an integer in base units (use --parse for decimals)")?;
    Ok(if full {
        remove_trailing_zeros(&format_full(base, decimals))
    } else {
        abbreviate_amount_with(base, &AmountFormat::for_token(decimals))
    })
}

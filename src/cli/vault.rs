//! Vault commands: list, backup, restore and copy.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::cli::{output, prompt, Context};
use crate::core::store::{self, FileStore, Locator, SecretStore};
use crate::core::transfer::{self, TransferPlan, TransferStatus};
use crate::error::{Result, StoreError};

fn open(ctx: &Context, locator: &str, subscription: Option<String>) -> Result<Box<dyn SecretStore>> {
    let locator: Locator = locator.parse()?;
    let subscription = ctx.subscription(subscription);
    store::open(&locator, subscription.as_deref())
}

/// List secret names with value fingerprints.
pub fn list(ctx: &Context, locator: &str, subscription: Option<String>) -> Result<()> {
    let store = open(ctx, locator, subscription)?;
    let snapshot = store.list()?;

    output::section(&store.describe());
    if snapshot.is_empty() {
        output::dimmed("no secrets");
        return Ok(());
    }

    let width = snapshot.names().map(str::len).max().unwrap_or(0);
    for record in snapshot.iter() {
        println!(
            "  {}  {}",
            output::key(&format!("{:<width$}", record.name(), width = width)),
            record.fingerprint()
        );
    }
    output::blank();
    output::kv("secrets", snapshot.len());
    Ok(())
}

/// Write every secret of a store to a new JSON file.
pub fn backup(
    ctx: &Context,
    locator: &str,
    out: Option<PathBuf>,
    subscription: Option<String>,
) -> Result<()> {
    let store = open(ctx, locator, subscription)?;
    let path = out.unwrap_or_else(|| PathBuf::from(transfer::backup_file_name(&store.describe())));

    let count = transfer::backup(store.as_ref(), &path)?;

    output::success(&format!(
        "backed up {} secret{} from {} to {}",
        count,
        if count == 1 { "" } else { "s" },
        store.describe(),
        path.display()
    ));
    output::hint("the backup holds plaintext values; keep it somewhere safe");
    Ok(())
}

fn print_plan(plan: &TransferPlan) {
    for entry in plan.entries() {
        match entry.status {
            TransferStatus::Create => output::marked('+', &entry.name, ""),
            TransferStatus::Update => output::marked('~', &entry.name, ""),
            TransferStatus::Unchanged => {}
        }
    }
    output::blank();
    output::kv("create", plan.count(TransferStatus::Create));
    output::kv("update", plan.count(TransferStatus::Update));
    output::kv("unchanged", plan.count(TransferStatus::Unchanged));
}

fn transfer_into(
    ctx: &Context,
    source: &dyn SecretStore,
    target: &mut dyn SecretStore,
    prefix: Option<&str>,
) -> Result<()> {
    let snapshot = source.list()?;
    let plan = TransferPlan::compute(&snapshot, &target.list()?, prefix);
    info!(from = %source.describe(), to = %target.describe(), entries = plan.entries().len(), "transfer planned");

    output::section(&format!("{} → {}", source.describe(), target.describe()));
    print_plan(&plan);

    if plan.writes().is_empty() {
        output::success("target already up to date");
        return Ok(());
    }

    output::blank();
    let mut gate = prompt::gate(ctx.assume_yes);
    let written = transfer::copy_secrets(&snapshot, &plan, target, gate.as_mut())?;
    if written.is_empty() {
        output::warn("skipped: nothing written");
    } else {
        output::success(&format!(
            "wrote {} secret{} into {}",
            written.len(),
            if written.len() == 1 { "" } else { "s" },
            target.describe()
        ));
    }
    Ok(())
}

/// Write the secrets of a backup file into a store.
pub fn restore(
    ctx: &Context,
    file: &Path,
    locator: &str,
    subscription: Option<String>,
) -> Result<()> {
    if !file.is_file() {
        return Err(StoreError::InvalidSnapshot {
            path: file.to_path_buf(),
            reason: "file does not exist".to_string(),
        }
        .into());
    }
    let backup = FileStore::open(file)?;
    if let Some(origin) = backup.origin() {
        output::kv("taken from", origin);
    }

    let mut target = open(ctx, locator, subscription)?;
    transfer_into(ctx, &backup, target.as_mut(), None)
}

/// Copy secrets from one store into another.
pub fn copy(
    ctx: &Context,
    from: &str,
    to: &str,
    prefix: Option<&str>,
    subscription: Option<String>,
) -> Result<()> {
    let source = open(ctx, from, subscription.clone())?;
    let mut target = open(ctx, to, subscription)?;
    transfer_into(ctx, source.as_ref(), target.as_mut(), prefix)
}

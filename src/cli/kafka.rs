//! Kafka commands: blue/green reconciliation and Confluent inspection.

use tracing::{debug, info};

use crate::cli::{output, prompt, Context, ReconcileArgs};
use crate::core::apply::{apply, ApplyOutcome};
use crate::core::confluent;
use crate::core::domain::{fingerprint, Color, EntryStatus, Reconciliation, Snapshot};
use crate::core::reconcile::{ensure_source, reconcile, Families};
use crate::core::sanity::{compare_api_keys, verify_api_keys, KeyComparison, RotationCheck};
use crate::core::store::{self, Locator, SecretStore};
use crate::error::{ConfigError, Result};

/// Both stores of a run, opened and listed.
struct Stores {
    env: Box<dyn SecretStore>,
    env_snapshot: Snapshot,
    kafka_snapshot: Snapshot,
    color: Color,
}

fn open_stores(ctx: &Context, args: ReconcileArgs) -> Result<Stores> {
    let env_locator: Locator = args.env.parse()?;
    let kafka_locator: Locator = args.kafka.parse()?;
    let subscription = ctx.subscription(args.subscription);

    let env = store::open(&env_locator, subscription.as_deref())?;
    let kafka = store::open(&kafka_locator, subscription.as_deref())?;

    let color = match args.color {
        Some(flag) => flag.parse::<Color>()?,
        None => active_color(env.as_ref(), &ctx.config.kafka.active_color_secret)?,
    };
    info!(%color, env = %env.describe(), kafka = %kafka.describe(), "reconciling");

    let kafka_snapshot = kafka.list()?;
    ensure_source(&kafka_snapshot)?;
    let env_snapshot = env.list()?;

    Ok(Stores {
        env,
        env_snapshot,
        kafka_snapshot,
        color,
    })
}

/// Read the active color from the colorless store.
fn active_color(env: &dyn SecretStore, secret: &str) -> Result<Color> {
    let value = env.get(secret)?.ok_or_else(|| ConfigError::MissingColor {
        secret: secret.to_string(),
    })?;
    debug!(secret, value = %value, "active color from store");
    Ok(value.parse()?)
}

fn print_rotation(check: &RotationCheck, ctx: &Context) {
    let names = ctx.config.kafka.api_keys();
    for (name, result) in [
        (&names.broker, check.broker),
        (&names.schema_registry, check.schema_registry),
    ] {
        match result {
            KeyComparison::Match => {}
            KeyComparison::Mismatch => {
                output::warn(&format!("{} differs from the active cluster", name))
            }
            KeyComparison::Untracked => {
                output::dimmed(&format!("{} is not set in the environment store", name))
            }
        }
    }
}

fn print_plan(plan: &Reconciliation, stores: &Stores, families: &Families) {
    output::section(&format!(
        "{} cluster → {}",
        plan.color(),
        stores.env.describe()
    ));

    if plan.is_empty() {
        output::success("already in sync");
        return;
    }

    for entry in plan.entries() {
        match entry.status() {
            EntryStatus::New | EntryStatus::Changed => {
                let key = entry.key();
                let marker = if entry.status() == EntryStatus::New { '+' } else { '~' };
                let detail = match stores.kafka_snapshot.value(&key) {
                    Some(value) => format!("({})", fingerprint(value)),
                    None => String::new(),
                };
                output::marked(marker, &format!("{} → {}", key, entry.base()), &detail);
            }
            EntryStatus::Obsolete => {
                let family = families
                    .classify(entry.base())
                    .map(|f| format!("{} credential, ", f))
                    .unwrap_or_default();
                output::marked(
                    '-',
                    entry.base(),
                    &format!("({}not in the {} cluster)", family, plan.color()),
                );
            }
        }
    }

    output::blank();
    output::kv("new", plan.new_secrets().len());
    output::kv("changed", plan.changed().len());
    output::kv("obsolete", plan.obsolete().len());
}

fn obsolete_hint(plan: &Reconciliation) {
    let obsolete = plan.obsolete();
    if !obsolete.is_empty() {
        output::hint(&format!(
            "{} obsolete secret{} left in place; delete manually once unused",
            obsolete.len(),
            if obsolete.len() == 1 { "" } else { "s" },
        ));
    }
}

/// Show the reconciliation plan without writing anything.
pub fn diff(ctx: &Context, args: ReconcileArgs) -> Result<()> {
    let stores = open_stores(ctx, args)?;

    let check = compare_api_keys(
        &stores.env_snapshot,
        &stores.kafka_snapshot,
        stores.color,
        &ctx.config.kafka.api_keys(),
    );
    print_rotation(&check, ctx);

    let families = ctx.config.kafka.families();
    let plan = reconcile(
        &stores.env_snapshot,
        &stores.kafka_snapshot,
        stores.color,
        &families,
    )?;
    print_plan(&plan, &stores, &families);
    obsolete_hint(&plan);
    Ok(())
}

/// Reconcile and copy new and changed secrets after confirmation.
pub fn sync(ctx: &Context, args: ReconcileArgs, dry_run: bool) -> Result<()> {
    let mut stores = open_stores(ctx, args)?;
    let mut gate = prompt::gate(ctx.assume_yes);

    let api_keys = ctx.config.kafka.api_keys();
    // A dry run only reports rotation mismatches, like `diff`.
    let check = if dry_run {
        compare_api_keys(
            &stores.env_snapshot,
            &stores.kafka_snapshot,
            stores.color,
            &api_keys,
        )
    } else {
        verify_api_keys(
            &stores.env_snapshot,
            &stores.kafka_snapshot,
            stores.color,
            &api_keys,
            gate.as_mut(),
        )?
    };
    print_rotation(&check, ctx);

    let families = ctx.config.kafka.families();
    let plan = reconcile(
        &stores.env_snapshot,
        &stores.kafka_snapshot,
        stores.color,
        &families,
    )?;
    print_plan(&plan, &stores, &families);

    if dry_run {
        if !plan.is_in_sync() {
            output::hint("dry run: nothing written");
        }
        obsolete_hint(&plan);
        return Ok(());
    }

    output::blank();
    match apply(
        &plan,
        &stores.kafka_snapshot,
        stores.env.as_mut(),
        gate.as_mut(),
    )? {
        // An empty plan already reported itself.
        ApplyOutcome::InSync if plan.is_empty() => {}
        ApplyOutcome::InSync => output::success("nothing to copy, already in sync"),
        ApplyOutcome::Skipped => output::warn("skipped: nothing written"),
        ApplyOutcome::Copied(names) => output::success(&format!(
            "copied {} secret{} into {}",
            names.len(),
            if names.len() == 1 { "" } else { "s" },
            stores.env.describe()
        )),
    }
    obsolete_hint(&plan);
    Ok(())
}

/// List Kafka clusters.
pub fn clusters() -> Result<()> {
    let clusters = confluent::clusters()?;
    if clusters.is_empty() {
        output::dimmed("no clusters");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = clusters
        .into_iter()
        .map(|c| vec![c.id, c.name, c.kind, c.provider, c.region, c.status])
        .collect();
    output::table(&["ID", "NAME", "TYPE", "PROVIDER", "REGION", "STATUS"], &rows);
    Ok(())
}

/// List service accounts.
pub fn accounts() -> Result<()> {
    let accounts = confluent::service_accounts()?;
    if accounts.is_empty() {
        output::dimmed("no service accounts");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = accounts
        .into_iter()
        .map(|a| vec![a.id, a.name, a.description])
        .collect();
    output::table(&["ID", "NAME", "DESCRIPTION"], &rows);
    Ok(())
}

/// List api keys of a cluster.
pub fn keys(cluster: &str, service_account: Option<&str>) -> Result<()> {
    let keys = confluent::api_keys(cluster, service_account)?;
    if keys.is_empty() {
        output::dimmed(&format!("no api keys for {}", cluster));
        return Ok(());
    }
    let rows: Vec<Vec<String>> = keys
        .into_iter()
        .map(|k| vec![k.key, k.owner_resource_id, k.description, k.created])
        .collect();
    output::table(&["KEY", "OWNER", "DESCRIPTION", "CREATED"], &rows);
    Ok(())
}

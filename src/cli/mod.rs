//! Command-line interface.

pub mod completions;
pub mod fleet;
pub mod kafka;
pub mod output;
pub mod prompt;
pub mod vault;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::config::Config;
use crate::error::Result;

/// opskit - operator automation for Kafka credentials, Key Vaults and git fleets.
#[derive(Parser)]
#[command(
    name = "opskit",
    about = "Operator automation for blue/green Kafka credentials, Key Vaults and git fleets",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: ./.opskit.toml, then the user config dir)
    #[arg(long, global = true, env = "OPSKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Answer yes to every confirmation
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Blue/green credential reconciliation and Confluent inspection
    Kafka {
        #[command(subcommand)]
        action: KafkaAction,
    },

    /// Key Vault listing, backup, restore and copy
    Vault {
        #[command(subcommand)]
        action: VaultAction,
    },

    /// Git operations across every repository in the fleet directory
    Fleet {
        #[command(subcommand)]
        action: FleetAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Stores and color shared by `kafka diff` and `kafka sync`.
#[derive(clap::Args, Debug, Clone)]
pub struct ReconcileArgs {
    /// Colorless environment store (vault name, az:<vault> or file:<path>)
    #[arg(long)]
    pub env: String,

    /// Colored store of the Kafka clusters (vault name, az:<vault> or file:<path>)
    #[arg(long)]
    pub kafka: String,

    /// Active color; read from the environment store when omitted
    #[arg(long)]
    pub color: Option<String>,

    /// Azure subscription (overrides [azure] subscription)
    #[arg(long)]
    pub subscription: Option<String>,
}

/// Kafka subcommands.
#[derive(Subcommand)]
pub enum KafkaAction {
    /// Show new, changed and obsolete secrets without writing anything
    Diff {
        #[command(flatten)]
        args: ReconcileArgs,
    },

    /// Copy new and changed secrets into the environment store
    Sync {
        #[command(flatten)]
        args: ReconcileArgs,

        /// Print the plan and stop before copying
        #[arg(long)]
        dry_run: bool,
    },

    /// List Kafka clusters
    Clusters,

    /// List service accounts
    Accounts,

    /// List api keys of a cluster
    Keys {
        /// Cluster id (lkc-...)
        #[arg(long)]
        cluster: String,

        /// Only keys owned by this service account
        #[arg(long)]
        service_account: Option<String>,
    },
}

/// Vault subcommands.
#[derive(Subcommand)]
pub enum VaultAction {
    /// List secret names with value fingerprints
    List {
        /// Store (vault name, az:<vault> or file:<path>)
        store: String,

        /// Azure subscription (overrides [azure] subscription)
        #[arg(long)]
        subscription: Option<String>,
    },

    /// Write every secret of a store to a JSON file
    Backup {
        /// Store to back up
        store: String,

        /// Output file (default: backup-<store>-<timestamp>.json)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Azure subscription (overrides [azure] subscription)
        #[arg(long)]
        subscription: Option<String>,
    },

    /// Write the secrets of a backup file into a store
    Restore {
        /// Backup file
        file: PathBuf,

        /// Target store
        store: String,

        /// Azure subscription (overrides [azure] subscription)
        #[arg(long)]
        subscription: Option<String>,
    },

    /// Copy secrets from one store into another
    Copy {
        /// Source store
        from: String,

        /// Target store
        to: String,

        /// Only secrets whose name starts with this prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Azure subscription (overrides [azure] subscription)
        #[arg(long)]
        subscription: Option<String>,
    },
}

/// Fleet subcommands.
#[derive(Subcommand)]
pub enum FleetAction {
    /// Check out a branch in every repository that has it
    Checkout {
        /// Branch name
        branch: String,
    },

    /// Clone every Azure DevOps repository not yet present
    Clone,

    /// Delete a local branch, switching to master first where needed
    DeleteBranch {
        /// Branch name
        branch: String,
    },

    /// Fetch and prune every ssh repository
    Fetch,

    /// Print the current branch of every ssh repository
    Branches,

    /// Reset master to origin/master, overwriting local commits on master
    Reset {
        /// Comma-separated repositories to leave alone
        #[arg(long, value_delimiter = ',')]
        except: Vec<String>,
    },

    /// List modified files of every dirty ssh repository
    Status,
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Per-run settings shared by every command.
pub struct Context {
    pub config: Config,
    pub assume_yes: bool,
}

impl Context {
    /// Explicit subscription, falling back to the config file.
    pub fn subscription(&self, flag: Option<String>) -> Option<String> {
        flag.or_else(|| self.config.azure.subscription.clone())
    }
}

/// Execute a command.
pub fn execute(cli: Cli) -> Result<()> {
    let command = match cli.command {
        Command::Completions { shell } => return completions::execute(shell),
        command => command,
    };

    let ctx = Context {
        config: Config::load(cli.config.as_deref())?,
        assume_yes: cli.yes,
    };

    match command {
        Command::Kafka { action } => match action {
            KafkaAction::Diff { args } => kafka::diff(&ctx, args),
            KafkaAction::Sync { args, dry_run } => kafka::sync(&ctx, args, dry_run),
            KafkaAction::Clusters => kafka::clusters(),
            KafkaAction::Accounts => kafka::accounts(),
            KafkaAction::Keys {
                cluster,
                service_account,
            } => kafka::keys(&cluster, service_account.as_deref()),
        },
        Command::Vault { action } => match action {
            VaultAction::List {
                store,
                subscription,
            } => vault::list(&ctx, &store, subscription),
            VaultAction::Backup {
                store,
                out,
                subscription,
            } => vault::backup(&ctx, &store, out, subscription),
            VaultAction::Restore {
                file,
                store,
                subscription,
            } => vault::restore(&ctx, &file, &store, subscription),
            VaultAction::Copy {
                from,
                to,
                prefix,
                subscription,
            } => vault::copy(&ctx, &from, &to, prefix.as_deref(), subscription),
        },
        Command::Fleet { action } => match action {
            FleetAction::Checkout { branch } => fleet::checkout(&ctx, &branch),
            FleetAction::Clone => fleet::clone(&ctx),
            FleetAction::DeleteBranch { branch } => fleet::delete_branch(&ctx, &branch),
            FleetAction::Fetch => fleet::fetch(&ctx),
            FleetAction::Branches => fleet::branches(&ctx),
            FleetAction::Reset { except } => fleet::reset(&ctx, &except),
            FleetAction::Status => fleet::status(&ctx),
        },
        Command::Completions { .. } => Ok(()),
    }
}

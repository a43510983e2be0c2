use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use insight_backup::{
    ApiConfig, BackupRunner, HttpApi, KeyTransform, RestoreOptions, RestoreRun, SnapshotStore,
    UnknownAttributePolicy,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "insight-backup")]
#[command(about = "Backup or restore JSM Insight object schemas")]
struct Cli {
    /// Workspace id
    #[arg(short, long)]
    workspace_id: String,

    /// Data directory holding the snapshot files
    #[arg(short, long)]
    data_dir: PathBuf,

    /// Username (Atlassian account email)
    #[arg(short, long)]
    username: String,

    /// API token
    #[arg(short, long)]
    password: String,

    /// Schema keys, separated by comma
    #[arg(short = 'n', long, value_delimiter = ',', required = true)]
    schema_keys: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy remote schemas to snapshot files
    Backup,
    /// Recreate snapshot schemas in the target workspace
    Restore {
        /// Suffix appended to each schema key when addressing the target
        /// system; snapshots are still read from the original key's directory
        #[arg(long)]
        target_key_suffix: Option<String>,

        /// What to do with attribute types this tool does not handle
        #[arg(long, value_enum, default_value = "skip")]
        on_unknown_attribute_type: UnknownTypeArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum UnknownTypeArg {
    /// Skip the attribute and log a warning
    Skip,
    /// Abort the run
    Fail,
}

impl From<UnknownTypeArg> for UnknownAttributePolicy {
    fn from(arg: UnknownTypeArg) -> Self {
        match arg {
            UnknownTypeArg::Skip => Self::SkipAndLog,
            UnknownTypeArg::Fail => Self::Fail,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let api = HttpApi::new(ApiConfig::new(&cli.workspace_id, &cli.username, &cli.password))
        .context("building API client")?;
    let store = SnapshotStore::new(&cli.data_dir);

    match cli.command {
        Command::Backup => {
            let runner = BackupRunner::new(&api, &store);
            runner
                .backup_all(&cli.schema_keys)
                .await
                .context("backup failed")?;
        }
        Command::Restore {
            target_key_suffix,
            on_unknown_attribute_type,
        } => {
            let options = RestoreOptions {
                key_transform: match target_key_suffix {
                    Some(suffix) => KeyTransform::Suffix(suffix),
                    None => KeyTransform::None,
                },
                unknown_attributes: on_unknown_attribute_type.into(),
            };
            let mut run = RestoreRun::new(&api, &api, options);
            let report = run
                .run(&store, &cli.schema_keys)
                .await
                .context("restore failed")?;
            tracing::info!(
                schemas_created = report.schemas_created,
                schemas_found = report.schemas_found,
                object_types_created = report.object_types_created,
                object_types_found = report.object_types_found,
                attributes_created = report.attributes_created,
                attributes_skipped = report.attributes_skipped,
                "restore complete"
            );
        }
    }
    Ok(())
}

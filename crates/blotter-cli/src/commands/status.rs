//! Status command - incident counts per nature.

use std::path::PathBuf;

use clap::Args;

use blotter_core::store::IncidentStore;

/// Arguments for the status command.
#[derive(Args)]
pub struct StatusArgs {
    /// Database to read (default: store.database from the config)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Print JSON instead of `nature|count` lines
    #[arg(long)]
    json: bool,
}

pub async fn run(args: StatusArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let db_path = args.db.unwrap_or(config.store.database);

    if !db_path.exists() {
        anyhow::bail!(
            "Database not found: {}. Run 'blotter process <report> --store' first.",
            db_path.display()
        );
    }

    let store = IncidentStore::open(&db_path)?;
    let counts = store.nature_counts()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
    } else {
        for row in &counts {
            println!("{}|{}", row.nature, row.count);
        }
    }

    Ok(())
}

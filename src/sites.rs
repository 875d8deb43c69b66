use anyhow::Result;

use crate::config::Config;
use crate::db;
use crate::store;

/// `stackdump sites` — list every imported site from the store.
pub async fn list_sites(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    let sites = store::all_sites(&pool).await?;
    pool.close().await;

    if sites.is_empty() {
        println!("No sites have been imported.");
        return Ok(());
    }

    println!("{:<32} {:<32} DUMP DATE", "KEY", "NAME");
    for site in &sites {
        println!(
            "{:<32} {:<32} {}",
            site.key,
            site.name,
            site.dump_date.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}

//! CLI search against the search service.
//!
//! Shares the offset/limit contract with the web handlers: the first
//! returned document is at offset `page * rows`.

use anyhow::Result;

use crate::config::Config;
use crate::solr::{SearchBackend, SolrClient};

pub async fn run_search(
    config: &Config,
    query: &str,
    site_key: Option<&str>,
    page: u32,
    rows: u32,
) -> Result<()> {
    if query.trim().is_empty() {
        println!("No results.");
        return Ok(());
    }

    // Site scoping is expressed in the query itself; the index stores the
    // owning site key on every document.
    let query = match site_key {
        Some(key) => format!("siteKey:{} AND ({})", key, query),
        None => query.trim().to_string(),
    };

    let client = SolrClient::new(&config.search)?;
    let start = u64::from(page) * u64::from(rows);
    let results = client.search(&query, start, rows).await?;

    if results.docs.is_empty() {
        println!("No results.");
        return Ok(());
    }

    println!(
        "Showing {} of {} results from offset {}:",
        results.docs.len(),
        results.num_found,
        results.start
    );
    println!();

    for (i, doc) in results.docs.iter().enumerate() {
        let title = doc
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or("(untitled)");
        let id = doc.get("id").and_then(|v| v.as_str()).unwrap_or("-");

        println!("{}. {}", results.start + 1 + i as u64, title);
        println!("    id: {}", id);
        if let Some(site) = doc.get("siteKey").and_then(|v| v.as_str()) {
            println!("    site: {}", site);
        }
        println!();
    }

    Ok(())
}

//! # Stackdump
//!
//! A web front-end for browsing and searching offline Stack Exchange data
//! dumps. The import tooling (out of scope here) populates a read-only
//! SQLite store and a Solr search index; this crate serves the browsing and
//! search UI on top of them.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐   ┌────────────┐   ┌───────────────┐
//! │ Browser │──▶│ Dispatcher │──▶│ Page handlers │
//! └─────────┘   └────────────┘   └──────┬────────┘
//!                                       │ ensure()/get()
//!                                ┌──────▼────────┐
//!                                │   Resources   │
//!                                └──┬────┬────┬──┘
//!                                   ▼    ▼    ▼
//!                               SQLite  Solr  Tera
//!                               (sites) (search) (HTML)
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`db`] | Read-only database pool |
//! | [`store`] | Site queries |
//! | [`solr`] | Search service client |
//! | [`render`] | Tera template rendering |
//! | [`resources`] | Lazy `ensure`/`get` resource registry |
//! | [`server`] | HTTP routing and page handlers |
//! | [`search`] | CLI search command |
//! | [`sites`] | CLI site listing command |

pub mod config;
pub mod db;
pub mod models;
pub mod render;
pub mod resources;
pub mod search;
pub mod server;
pub mod sites;
pub mod solr;
pub mod store;

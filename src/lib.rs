//! Load CSV rows into FalkorDB as labeled nodes.
//!
//! Rows are read with [`source::Table`], partitioned by [`batch::plan_batches`]
//! and written by [`loader::BatchLoader`], either with one parameterized
//! `UNWIND` statement per batch or with one literal `CREATE` per row.

pub mod batch;
pub mod config;
pub mod connection;
pub mod error;
pub mod loader;
pub mod query;
pub mod source;

pub use config::{Config, GraphSettings};
pub use connection::{ConnectionManager, GraphConnection};
pub use error::{LoaderError, Result};
pub use loader::{BatchLoader, LoadReport};
pub use source::{Record, Table};

/// How a single run writes its rows.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub label: String,
    pub batch_size: usize,
    /// Use one `CREATE` statement per row instead of batched `UNWIND`
    pub per_row: bool,
    pub progress_interval: usize,
}

/// Connect, load `settings.csv_file_path`, then release the connection.
///
/// The connection is opened before the source is read, so an unreachable
/// database fails the run before any file access. The connection is released
/// on every exit path.
pub async fn run(settings: &GraphSettings, options: &LoadOptions) -> Result<LoadReport> {
    let mut conn = ConnectionManager::open(settings).await?;
    let loader = BatchLoader::new(options.progress_interval);

    let result = if options.per_row {
        loader
            .load_rows_individually(&mut conn, &settings.csv_file_path, &options.label)
            .await
    } else {
        loader
            .load_from_source(&mut conn, &settings.csv_file_path, &options.label, options.batch_size)
            .await
    };

    conn.close();
    result
}

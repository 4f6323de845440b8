use crate::batch::plan_batches;
use crate::connection::GraphConnection;
use crate::error::{LoaderError, Result};
use crate::query::{batch_params, bulk_create_statement, single_node_statement};
use crate::source::{Record, Table};
use chrono::Utc;
use log::{error, info};
use std::path::Path;
use std::time::{Duration, Instant};

pub const DEFAULT_BATCH_SIZE: usize = 1000;
pub const DEFAULT_PROGRESS_INTERVAL: usize = 1000;

/// Outcome of a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub rows: usize,
    pub batches: usize,
    pub nodes_created: usize,
    pub duration: Duration,
}

/// Loads CSV rows as nodes through a [`GraphConnection`].
///
/// Holds no state between calls: every load reads its source afresh and
/// creates new nodes, so loading the same file twice duplicates them.
pub struct BatchLoader {
    progress_interval: usize,
}

impl Default for BatchLoader {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRESS_INTERVAL)
    }
}

impl BatchLoader {
    /// `progress_interval` is the number of rows between progress lines; 0 disables them.
    pub fn new(progress_interval: usize) -> Self {
        Self { progress_interval }
    }

    /// Create one node with a literal, non-parameterized `CREATE` statement.
    pub async fn create_single_node<C: GraphConnection>(
        &self,
        conn: &mut C,
        label: &str,
        properties: &Record,
    ) -> Result<()> {
        let query = single_node_statement(label, properties);
        conn.execute(&query, None).await.map_err(|e| {
            error!("❌ Error creating node: {}", e);
            error!("Query: {}", query);
            e
        })
    }

    /// Load every row of the CSV at `path` as a `label` node, one `UNWIND`
    /// statement per batch of `batch_size` rows.
    ///
    /// Batches run in order and stop at the first failure. Batches written
    /// before it stay in the graph.
    pub async fn load_from_source<C: GraphConnection, P: AsRef<Path>>(
        &self,
        conn: &mut C,
        path: P,
        label: &str,
        batch_size: usize,
    ) -> Result<LoadReport> {
        let start_time = Instant::now();
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S");
        info!("[{}] Loading {} nodes from {:?}...", timestamp, label, path.as_ref());

        let table = Table::from_path(&path)?;
        let total_rows = table.len();
        let batches = plan_batches(total_rows, batch_size)?;
        info!("  CSV headers: {:?}", table.columns());

        let query = bulk_create_statement(label);
        info!("    Generated UNWIND query: {}", query);

        let mut total_loaded = 0;
        for (batch_index, range) in batches.iter().enumerate() {
            let batch_start_time = Instant::now();
            let rows = table.slice(range.clone());
            let params = batch_params(rows);

            conn.execute(&query, Some(&params)).await.map_err(|e| {
                error!("❌ Error loading batch {} (rows {:?}): {}", batch_index, range, e);
                LoaderError::BatchWrite {
                    batch_index,
                    cause: e.to_string(),
                }
            })?;

            let previous = total_loaded;
            total_loaded += rows.len();
            self.report_progress(previous, total_loaded, total_rows, label);

            let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S");
            info!(
                "[{}] Batch {} complete: Loaded {} nodes (Duration: {:?})",
                timestamp,
                batch_index,
                rows.len(),
                batch_start_time.elapsed()
            );
        }

        let duration = start_time.elapsed();
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S");
        info!(
            "[{}] ✅ Loaded {} {} nodes (Duration: {:?})",
            timestamp, total_loaded, label, duration
        );

        Ok(LoadReport {
            rows: total_rows,
            batches: batches.len(),
            nodes_created: total_loaded,
            duration,
        })
    }

    /// Load every row with its own `CREATE` statement via [`Self::create_single_node`].
    ///
    /// A failure reports the row index as the batch index.
    pub async fn load_rows_individually<C: GraphConnection, P: AsRef<Path>>(
        &self,
        conn: &mut C,
        path: P,
        label: &str,
    ) -> Result<LoadReport> {
        let start_time = Instant::now();
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S");
        info!("[{}] Loading {} nodes row by row from {:?}...", timestamp, label, path.as_ref());

        let table = Table::from_path(&path)?;
        let total_rows = table.len();

        for (row_index, row) in table.rows().iter().enumerate() {
            self.create_single_node(conn, label, row)
                .await
                .map_err(|e| LoaderError::BatchWrite {
                    batch_index: row_index,
                    cause: e.to_string(),
                })?;
            self.report_progress(row_index, row_index + 1, total_rows, label);
        }

        let duration = start_time.elapsed();
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S");
        info!(
            "[{}] ✅ Loaded {} {} nodes (Duration: {:?})",
            timestamp, total_rows, label, duration
        );

        Ok(LoadReport {
            rows: total_rows,
            batches: total_rows,
            nodes_created: total_rows,
            duration,
        })
    }

    /// Log when the loaded count crosses a multiple of the interval, and at the end.
    fn report_progress(&self, previous: usize, loaded: usize, total: usize, label: &str) {
        if self.progress_interval == 0 || total == 0 {
            return;
        }
        if loaded / self.progress_interval > previous / self.progress_interval || loaded == total {
            let progress = (loaded as f64 / total as f64) * 100.0;
            info!(
                "📊 Progress: {:.1}% ({}/{}) {} nodes loaded",
                progress, loaded, total, label
            );
        }
    }
}

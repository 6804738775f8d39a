//! Lookup table sync service - reconciliation logic

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use lookupsync_common::cache::{CacheKey, ResponseCache};
use lookupsync_common::sync::map_concurrent;
use lookupsync_domain::constants::{
    LOOKUP_TABLES_PATH, PACING_DELAY, SEARCH_JOBS_PATH, SEARCH_MESSAGE_LIMIT,
};
use lookupsync_domain::{
    ApiRequest, ClusterServiceRecord, Config, LookupTable, RemoteRowIndex, Result, SyncError,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use super::payload::build_search_payload;
use super::report::{FetchOutcome, PruneReport, SyncReport, UploadReport};
use super::wire::{DeleteRowRequest, SearchMessages, TableInfoResponse, UpsertRowRequest};
use crate::poller::{JobPoller, PollSchedule, SearchJobProtocol};
use crate::ports::ApiTransport;

/// Tunables of a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    pub target_cluster: String,
    pub table_ids: Vec<String>,
    /// Tables fetched in parallel. Keep at 1 unless the request budget is
    /// tracked across workers.
    pub concurrency: usize,
    /// Wait before every row mutation
    pub pacing_delay: Duration,
    /// Log and count mutations instead of issuing them
    pub dry_run: bool,
    pub message_limit: u64,
    pub poll_schedule: PollSchedule,
}

impl SyncSettings {
    pub fn new<I, S>(target_cluster: impl Into<String>, table_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target_cluster: target_cluster.into(),
            table_ids: table_ids.into_iter().map(Into::into).collect(),
            concurrency: 1,
            pacing_delay: PACING_DELAY,
            dry_run: false,
            message_limit: SEARCH_MESSAGE_LIMIT,
            poll_schedule: PollSchedule::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            concurrency: config.concurrency,
            dry_run: config.dry_run,
            ..Self::new(config.target_cluster.clone(), config.table_ids.iter().cloned())
        }
    }
}

/// Reconciles the remote lookup tables of one cluster with its local export.
pub struct LookupTableSync {
    transport: Arc<dyn ApiTransport>,
    poller: JobPoller,
    protocol: SearchJobProtocol,
    cache: ResponseCache,
    settings: SyncSettings,
}

impl LookupTableSync {
    pub fn new(transport: Arc<dyn ApiTransport>, cache: ResponseCache, settings: SyncSettings) -> Self {
        let poller =
            JobPoller::new(Arc::clone(&transport)).with_schedule(settings.poll_schedule.clone());
        let protocol = SearchJobProtocol::new(settings.message_limit);
        Self { transport, poller, protocol, cache, settings }
    }

    pub const fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    pub const fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Resolve the metadata of `table_id`, from the cache when present.
    ///
    /// # Errors
    /// `TableLookup` on a non-2xx response, `MalformedResponse` when the body
    /// lacks the name or content path.
    #[instrument(skip(self))]
    pub async fn get_table_info(&self, table_id: &str) -> Result<LookupTable> {
        let path = format!("{LOOKUP_TABLES_PATH}/{table_id}");
        let endpoint = path.as_str();
        let transport = &self.transport;

        let info: Option<TableInfoResponse> = self
            .cache
            .read_or_compute(&CacheKey::new(table_id), || async move {
                let response = transport.request(ApiRequest::get(endpoint).admin()).await?;
                if !response.is_success() {
                    return Err(SyncError::TableLookup {
                        table_id: table_id.to_string(),
                        status: response.status,
                    });
                }
                response.parse(endpoint).map(Some)
            })
            .await?;
        let info = info.ok_or_else(|| SyncError::Cache(format!("no metadata for table {table_id}")))?;

        let table = LookupTable {
            id: table_id.to_string(),
            name: info.name,
            content_path: info.content_path,
        };
        info!(name = %table.name, content_path = %table.content_path, "resolved lookup table");
        Ok(table)
    }

    /// Target-cluster rows of one table, via a search job.
    async fn fetch_table_rows(&self, table_id: &str) -> Result<Vec<ClusterServiceRecord>> {
        let table = self.get_table_info(table_id).await?;
        let payload = build_search_payload(&table, Utc::now());
        let poller = &self.poller;
        let protocol = &self.protocol;

        let search: Option<SearchMessages> = self
            .cache
            .read_or_compute(&CacheKey::scoped("search", &table.id), || async move {
                let request = ApiRequest::post(SEARCH_JOBS_PATH, payload.to_value());
                let response = poller.run(protocol, request).await?;
                response.parse(SEARCH_JOBS_PATH).map(Some)
            })
            .await?;
        let search = search.unwrap_or_default();

        let target = self.settings.target_cluster.as_str();
        let records = search
            .messages
            .iter()
            .filter(|message| message.cluster() == Some(target))
            .map(|message| message.to_record(SEARCH_JOBS_PATH))
            .collect::<Result<Vec<_>>>()?;
        debug!(
            table_id,
            messages = search.messages.len(),
            matched = records.len(),
            "filtered search messages"
        );
        Ok(records)
    }

    /// Index the target cluster's rows of every table in `table_ids`.
    ///
    /// A failing table does not stop the others; it is left out of the
    /// index and reported in [`FetchOutcome::failures`].
    #[instrument(skip(self, table_ids), fields(tables = table_ids.len()))]
    pub async fn fetch_cluster_lookups(&self, table_ids: &[String]) -> FetchOutcome {
        info!("processing {} table(s)", table_ids.len());

        let fetched = map_concurrent(
            table_ids,
            |table_id, index| async move {
                info!(table_index = index, table_id = %table_id, "fetching lookup table");
                (table_id.clone(), self.fetch_table_rows(table_id).await)
            },
            self.settings.concurrency,
        )
        .await;

        let mut outcome = FetchOutcome::default();
        for (table_id, result) in fetched {
            match result {
                Ok(records) => {
                    let kept =
                        outcome.index.insert_rows(&table_id, &self.settings.target_cluster, records);
                    info!(table_id = %table_id, rows = kept, "indexed remote rows");
                }
                Err(err) => {
                    error!(table_id = %table_id, error = %err, "failed to fetch lookup table");
                    outcome.failures.push((table_id, err));
                }
            }
        }
        outcome
    }

    /// Upsert every local record into every indexed table.
    ///
    /// Each attempted key is removed from `index` before the call is made,
    /// so afterwards `index` holds only the rows no local record matched.
    /// Records of other clusters are skipped.
    #[instrument(skip(self, records, index), fields(records = records.len()))]
    pub async fn upload_to_lookups(
        &self,
        records: &[ClusterServiceRecord],
        index: &mut RemoteRowIndex,
    ) -> UploadReport {
        let table_ids = index.table_ids();
        let mut report = UploadReport::default();

        for record in records {
            let identity_key = record.identity_key();
            if record.cluster != self.settings.target_cluster {
                warn!(identity_key = %identity_key, "skipping record of another cluster");
                report.skipped += 1;
                continue;
            }

            for table_id in &table_ids {
                index.remove(table_id, &identity_key);

                if self.settings.dry_run {
                    info!(table_id = %table_id, identity_key = %identity_key, "dry run: would upsert row");
                    report.planned += 1;
                    continue;
                }

                let path = format!("{LOOKUP_TABLES_PATH}/{table_id}/row");
                let body = UpsertRowRequest { row: record.row_columns() };
                match self.mutate(&path, &body).await {
                    Ok(()) => {
                        info!(table_id = %table_id, identity_key = %identity_key, "upserted row");
                        report.upserted += 1;
                    }
                    Err(reason) => {
                        let err = SyncError::UploadRow {
                            table_id: table_id.clone(),
                            identity_key: identity_key.to_string(),
                            reason,
                        };
                        error!(error = %err, "row upsert failed");
                        report.failures.push(err);
                    }
                }
            }
        }
        report
    }

    /// Delete every row still left in `index`, by primary key.
    #[instrument(skip(self, index), fields(rows = index.row_count()))]
    pub async fn remove_expired_entries(&self, index: RemoteRowIndex) -> PruneReport {
        let mut report = PruneReport::default();

        for (table_id, rows) in index {
            for (identity_key, record) in rows {
                if self.settings.dry_run {
                    info!(table_id = %table_id, identity_key = %identity_key, "dry run: would delete row");
                    report.planned += 1;
                    continue;
                }

                let path = format!("{LOOKUP_TABLES_PATH}/{table_id}/deleteTableRow");
                let body = DeleteRowRequest { primary_key: record.primary_key_columns() };
                match self.mutate(&path, &body).await {
                    Ok(()) => {
                        info!(table_id = %table_id, identity_key = %identity_key, "deleted row");
                        report.deleted += 1;
                    }
                    Err(reason) => {
                        let err = SyncError::DeleteRow {
                            table_id: table_id.clone(),
                            identity_key: identity_key.to_string(),
                            reason,
                        };
                        error!(error = %err, "row delete failed");
                        report.failures.push(err);
                    }
                }
            }
        }
        report
    }

    /// Fetch, upload and prune.
    ///
    /// # Errors
    /// The first fetch failure. Nothing is written when any table could not
    /// be read.
    #[instrument(skip(self, records), fields(cluster = %self.settings.target_cluster))]
    pub async fn run(&self, records: &[ClusterServiceRecord]) -> Result<SyncReport> {
        let FetchOutcome { mut index, failures } =
            self.fetch_cluster_lookups(&self.settings.table_ids).await;
        if let Some((table_id, err)) = failures.into_iter().next() {
            error!(table_id = %table_id, "aborting before any change: remote state is incomplete");
            return Err(err);
        }

        let tables = index.table_count();
        let remote_rows = index.row_count();
        let upload = self.upload_to_lookups(records, &mut index).await;
        let prune = self.remove_expired_entries(index).await;

        let report = SyncReport { tables, remote_rows, upload, prune };
        info!(
            tables,
            remote_rows,
            upserted = report.upload.upserted,
            deleted = report.prune.deleted,
            failures = report.failure_count(),
            "sync finished"
        );
        Ok(report)
    }

    /// Paced row mutation. The error is a human-readable reason.
    async fn mutate<B: Serialize>(&self, path: &str, body: &B) -> std::result::Result<(), String> {
        let payload: Value = serde_json::to_value(body).map_err(|e| e.to_string())?;
        let request =
            ApiRequest::put(path, payload).admin().with_pre_delay(self.settings.pacing_delay);
        let response = self.transport.request(request).await.map_err(|e| e.to_string())?;
        if response.is_success() {
            Ok(())
        } else {
            Err(format!("HTTP {}: {}", response.status, response.body_summary()))
        }
    }
}

impl std::fmt::Debug for LookupTableSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupTableSync")
            .field("settings", &self.settings)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

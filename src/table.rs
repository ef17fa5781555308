use crate::config::{KO, MEAN_RESPONSE_TIME, NUMBER_OF_REQUESTS, OK, TOTAL};
use crate::error::MissingMetricError;
use crate::loader::LoadedReport;
use crate::model::RequestRecord;

/// One `(run, request)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRow {
    pub run: String,
    /// Key of the request within its run's `contents`.
    pub request: String,
    pub name: String,
    pub total: u64,
    pub ok: u64,
    pub ko: u64,
    /// Mean response time in ms.
    pub mean_response_time: u64,
}

#[derive(Debug, Clone, Default)]
pub struct FlatTable {
    pub rows: Vec<FlatRow>,
    /// Rows left out because a metric was missing.
    pub dropped: Vec<MissingMetricError>,
}

impl FlatTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }
}

fn extract_row(run: &str, request: &str, record: &RequestRecord) -> Result<FlatRow, MissingMetricError> {
    let metric = |category: &str, sub: &str| -> Result<u64, MissingMetricError> {
        let missing = |what: String| MissingMetricError {
            run: run.to_string(),
            request: request.to_string(),
            metric: what,
        };
        record
            .stats
            .category(category)
            .ok_or_else(|| missing(category.to_string()))?;
        record
            .stats
            .get(category, sub)
            .ok_or_else(|| missing(format!("{}.{}", category, sub)))
    };

    Ok(FlatRow {
        run: run.to_string(),
        request: request.to_string(),
        name: record.name.clone(),
        total: metric(NUMBER_OF_REQUESTS, TOTAL)?,
        ok: metric(NUMBER_OF_REQUESTS, OK)?,
        ko: metric(NUMBER_OF_REQUESTS, KO)?,
        mean_response_time: metric(MEAN_RESPONSE_TIME, TOTAL)?,
    })
}

/// Flattens reports into one row per `(run, request)`.
///
/// Rows come out in report order, then `contents` order. A request without
/// integral `numberOfRequests.{total,ok,ko}` or `meanResponseTime.total` is dropped and
/// recorded in [`FlatTable::dropped`]; the rest of the table is unaffected.
pub fn build_table<'a>(reports: impl IntoIterator<Item = &'a LoadedReport>) -> FlatTable {
    let mut table = FlatTable::default();
    for report in reports {
        for (key, record) in &report.tree.contents {
            match extract_row(&report.run, key, record) {
                Ok(row) => table.rows.push(row),
                Err(e) => {
                    tracing::warn!(
                        run = report.run.as_str(),
                        request = key.as_str(),
                        metric = e.metric.as_str(),
                        categories = ?record.stats.categories().collect::<Vec<_>>(),
                        "dropping row with missing metric"
                    );
                    table.dropped.push(e);
                }
            }
        }
    }
    tracing::info!(rows = table.len(), dropped = table.dropped_count(), "table built");
    table
}

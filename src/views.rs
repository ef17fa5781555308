use serde::Serialize;

use crate::query::RankedRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: u64,
    pub y: u64,
    /// Run the point was taken from.
    pub run: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Series {
    pub label: String,
    pub points: Vec<Point>,
}

/// Rendering instructions for one chart; drawing is left to a [`ChartRenderer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

pub trait ChartRenderer {
    fn render(&mut self, chart: &ChartSpec) -> anyhow::Result<()>;
}

/// Sorted ascending by `load`, ties keep their ranked order.
fn by_load<'a>(rows: &'a [RankedRow], load: impl Fn(&RankedRow) -> u64) -> Vec<(u64, &'a RankedRow)> {
    let mut out: Vec<(u64, &RankedRow)> = rows.iter().map(|r| (load(r), r)).collect();
    out.sort_by_key(|(x, _)| *x);
    out
}

/// Mean response time against total request count, one series.
pub fn latency_vs_load(rows: &[RankedRow]) -> ChartSpec {
    let points = by_load(rows, |r| r.row.total)
        .into_iter()
        .map(|(x, r)| Point {
            x,
            y: r.row.mean_response_time,
            run: r.row.run.clone(),
        })
        .collect();
    ChartSpec {
        title: "Mean response time vs load".to_string(),
        x_label: "Total requests".to_string(),
        y_label: "MRT[ms]".to_string(),
        series: vec![Series {
            label: "MRT[ms]".to_string(),
            points,
        }],
    }
}

/// `ok` and `ko` counts against the derived total `ok + ko`.
pub fn outcome_vs_load(rows: &[RankedRow]) -> ChartSpec {
    let sorted = by_load(rows, |r| r.row.ok.saturating_add(r.row.ko));
    let series = |label: &str, pick: fn(&RankedRow) -> u64| Series {
        label: label.to_string(),
        points: sorted
            .iter()
            .map(|(x, r)| Point {
                x: *x,
                y: pick(r),
                run: r.row.run.clone(),
            })
            .collect(),
    };
    ChartSpec {
        title: "Request outcome vs load".to_string(),
        x_label: "Total requests (OK + KO)".to_string(),
        y_label: "Requests".to_string(),
        series: vec![series("OK", |r| r.row.ok), series("KO", |r| r.row.ko)],
    }
}

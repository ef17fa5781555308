use prettytable::{Cell, Row, Table};
use std::io::Write;

use crate::config::PERCENTILE_LABELS;
use crate::loader::LoadedReport;
use crate::model::Bucket;
use crate::query::RankedRow;
use crate::views::{ChartRenderer, ChartSpec};

fn title_row(names: &[&str]) -> Row {
    Row::new(names.iter().map(|n| Cell::new(n)).collect())
}

pub fn build_ranked_table(rows: &[RankedRow]) -> Table {
    let mut table = Table::new();
    table.set_titles(title_row(&[
        "Rank",
        "Run",
        "Name",
        "Total requests",
        "OK",
        "KO",
        "MRT[ms]",
    ]));
    for r in rows {
        table.add_row(Row::new(vec![
            Cell::new(&r.rank.to_string()),
            Cell::new(&r.row.run),
            Cell::new(&r.row.name),
            Cell::new(&r.row.total.to_string()),
            Cell::new(&r.row.ok.to_string()),
            Cell::new(&r.row.ko.to_string()),
            Cell::new(&r.row.mean_response_time.to_string()),
        ]));
    }
    table
}

fn bucket_cell(b: &Bucket) -> Cell {
    Cell::new(&format!("{}: {} ({}%)", b.name, b.count, b.percentage))
}

/// Whole-run aggregates, one row per report.
pub fn build_summary_table(reports: &[LoadedReport]) -> Table {
    let mut titles = vec!["Run", "Requests", "OK", "KO", "Mean[ms]", "Std dev"];
    titles.extend(PERCENTILE_LABELS);
    titles.extend(["Bucket 1", "Bucket 2", "Bucket 3", "Bucket 4", "Req/s", "Source"]);

    let mut table = Table::new();
    table.set_titles(title_row(&titles));
    for report in reports {
        let s = &report.tree.stats;
        let mut cells = vec![
            Cell::new(&report.run),
            Cell::new(&s.number_of_requests.total.to_string()),
            Cell::new(&s.number_of_requests.ok.to_string()),
            Cell::new(&s.number_of_requests.ko.to_string()),
            Cell::new(&s.mean_response_time.total.to_string()),
            Cell::new(&s.standard_deviation.total.to_string()),
        ];
        cells.extend(s.labelled_percentiles().map(|(_, p)| Cell::new(&p.total.to_string())));
        cells.extend(s.groups.iter().map(bucket_cell));
        cells.push(Cell::new(&s.mean_number_of_requests_per_second.total.to_string()));
        cells.push(Cell::new(&report.source.display().to_string()));
        table.add_row(Row::new(cells));
    }
    table
}

/// Prints each chart series as a table of points.
#[derive(Debug, Default)]
pub struct TextChartRenderer;

impl ChartRenderer for TextChartRenderer {
    fn render(&mut self, chart: &ChartSpec) -> anyhow::Result<()> {
        println!("{}", chart.title);
        for series in &chart.series {
            let mut table = Table::new();
            table.set_titles(title_row(&[chart.x_label.as_str(), series.label.as_str(), "Run"]));
            for p in &series.points {
                table.add_row(Row::new(vec![
                    Cell::new(&p.x.to_string()),
                    Cell::new(&p.y.to_string()),
                    Cell::new(&p.run),
                ]));
            }
            table.printstd();
        }
        Ok(())
    }
}

/// Writes each chart as one JSON document per line, for an external plotter.
pub struct JsonChartRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonChartRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> ChartRenderer for JsonChartRenderer<W> {
    fn render(&mut self, chart: &ChartSpec) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.out, chart)?;
        writeln!(self.out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::tests::request_json;
    use crate::query::{rank, Query};
    use crate::table::build_table;
    use crate::table::tests::loaded;
    use crate::views::latency_vs_load;
    use serde_json::json;

    #[test]
    fn test_ranked_table_has_one_row_per_ranked_row() {
        let reports = vec![
            loaded("run-1", json!({ "req_login": request_json("login", 100, 95, 5, 230) })),
            loaded("run-2", json!({ "req_login": request_json("login", 500, 470, 30, 410) })),
        ];
        let ranked = rank(&build_table(&reports), &Query::new("login"));
        let table = build_ranked_table(&ranked);
        assert_eq!(table.len(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("MRT[ms]"));
        assert!(rendered.contains("410"));
    }

    #[test]
    fn test_summary_table_lists_percentiles_and_buckets() {
        let reports = vec![loaded("run-1", json!({}))];
        let table = build_summary_table(&reports);
        assert_eq!(table.len(), 1);
        let rendered = table.to_string();
        assert!(rendered.contains("p95"));
        assert!(rendered.contains("failed: 10 (5%)"));
        assert!(rendered.contains("1800"));
        assert!(rendered.contains("3.3333333333333335"));
        assert!(rendered.contains("run-1/js/stats.json"));
    }

    #[test]
    fn test_json_renderer_writes_one_line_per_chart() {
        let reports = vec![loaded("run-1", json!({ "a": request_json("a", 3, 3, 0, 7) }))];
        let ranked = rank(&build_table(&reports), &Query::default());
        let chart = latency_vs_load(&ranked);
        let mut out = Vec::new();
        let mut renderer = JsonChartRenderer::new(&mut out);
        renderer.render(&chart).unwrap();
        renderer.render(&chart).unwrap();
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed["series"][0]["points"][0]["y"], 7);
    }
}

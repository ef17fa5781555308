use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

use crate::config::{GROUP_FIELDS, PERCENTILE_FIELDS, PERCENTILE_LABELS};

/// `{total, ok, ko}` breakdown of one metric. For durations the three values
/// are independent, so `ok + ko` need not equal `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Triplet {
    pub total: u64,
    pub ok: u64,
    pub ko: u64,
}

/// `{total, ok, ko}` of a rate. Values are kept exactly as the report
/// encodes them, usually fractional (`3.3333333333333335`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateTriplet {
    pub total: Number,
    pub ok: Number,
    pub ko: Number,
}

/// A named response-time range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub name: String,
    pub html_name: String,
    pub count: u64,
    pub percentage: u64,
}

/// Aggregate metrics for a whole simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStats {
    pub name: String,
    pub number_of_requests: Triplet,
    pub min_response_time: Triplet,
    pub max_response_time: Triplet,
    pub mean_response_time: Triplet,
    pub standard_deviation: Triplet,
    /// `percentiles1..4`, index 0..3
    pub percentiles: [Triplet; 4],
    /// `group1..4`, index 0..3
    pub groups: [Bucket; 4],
    pub mean_number_of_requests_per_second: RateTriplet,
}

impl GroupStats {
    /// Percentile triplets paired with their display label (`p50` ..).
    pub fn labelled_percentiles(&self) -> impl Iterator<Item = (&'static str, &Triplet)> {
        PERCENTILE_LABELS.iter().copied().zip(self.percentiles.iter())
    }
}

// Written back in the report's own numbered-field layout.
impl Serialize for GroupStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("GroupStats", 15)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("numberOfRequests", &self.number_of_requests)?;
        s.serialize_field("minResponseTime", &self.min_response_time)?;
        s.serialize_field("maxResponseTime", &self.max_response_time)?;
        s.serialize_field("meanResponseTime", &self.mean_response_time)?;
        s.serialize_field("standardDeviation", &self.standard_deviation)?;
        for (&field, p) in PERCENTILE_FIELDS.iter().zip(self.percentiles.iter()) {
            s.serialize_field(field, p)?;
        }
        for (&field, g) in GROUP_FIELDS.iter().zip(self.groups.iter()) {
            s.serialize_field(field, g)?;
        }
        s.serialize_field(
            "meanNumberOfRequestsPerSecond",
            &self.mean_number_of_requests_per_second,
        )?;
        s.end()
    }
}

/// One entry of a request's `stats`: a sub-metric object such as
/// `numberOfRequests`, or any other value (the request `name`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StatsEntry {
    Metrics(BTreeMap<String, Value>),
    Other(Value),
}

/// Open-ended per-request metrics: category -> sub-metric -> value.
///
/// Which categories appear varies between requests and report versions, so
/// nothing here is fixed-schema. Values are kept as encoded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct MetricBag(pub BTreeMap<String, StatsEntry>);

impl MetricBag {
    pub fn category(&self, name: &str) -> Option<&BTreeMap<String, Value>> {
        match self.0.get(name)? {
            StatsEntry::Metrics(m) => Some(m),
            StatsEntry::Other(_) => None,
        }
    }

    /// Integer value of `category.sub_metric`, if present and integral.
    pub fn get(&self, category: &str, sub_metric: &str) -> Option<u64> {
        self.category(category)?.get(sub_metric)?.as_u64()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Per-endpoint metrics of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub path: String,
    pub path_formatted: String,
    pub stats: MetricBag,
}

/// One simulation run's parsed report. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsTree {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub path: String,
    pub path_formatted: String,
    pub stats: GroupStats,
    /// Keyed by request identifier, unique within the run.
    pub contents: BTreeMap<String, RequestRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(name: &str, count: u64) -> Bucket {
        Bucket {
            name: name.to_string(),
            html_name: name.to_string(),
            count,
            percentage: 25,
        }
    }

    fn group_stats() -> GroupStats {
        let t = |total| Triplet { total, ok: total, ko: 0 };
        GroupStats {
            name: "All Requests".to_string(),
            number_of_requests: t(10),
            min_response_time: t(1),
            max_response_time: t(9),
            mean_response_time: t(5),
            standard_deviation: t(2),
            percentiles: [t(50), t(75), t(95), t(99)],
            groups: [bucket("a", 1), bucket("b", 2), bucket("c", 3), bucket("d", 4)],
            mean_number_of_requests_per_second: RateTriplet {
                total: Number::from_f64(3.5).unwrap(),
                ok: Number::from(3),
                ko: Number::from_f64(0.5).unwrap(),
            },
        }
    }

    #[test]
    fn test_group_stats_serializes_numbered_fields() {
        let v = serde_json::to_value(group_stats()).unwrap();
        assert_eq!(v["percentiles1"]["total"], 50);
        assert_eq!(v["percentiles4"]["total"], 99);
        assert_eq!(v["group3"]["count"], 3);
        assert_eq!(v["group1"]["htmlName"], "a");
        assert_eq!(v["meanNumberOfRequestsPerSecond"]["total"], 3.5);
        assert_eq!(v["meanNumberOfRequestsPerSecond"]["ok"], 3);
        assert!(v.get("percentiles").is_none());
    }

    #[test]
    fn test_labelled_percentiles_follow_position() {
        let stats = group_stats();
        let labelled: Vec<(&str, u64)> = stats
            .labelled_percentiles()
            .map(|(l, t)| (l, t.total))
            .collect();
        assert_eq!(labelled, vec![("p50", 50), ("p75", 75), ("p95", 95), ("p99", 99)]);
    }

    #[test]
    fn test_metric_bag_lookup() {
        let mut inner = BTreeMap::new();
        inner.insert("total".to_string(), Value::from(100));
        inner.insert("rate".to_string(), Value::from(0.5));
        let mut bag = BTreeMap::new();
        bag.insert("numberOfRequests".to_string(), StatsEntry::Metrics(inner));
        bag.insert("name".to_string(), StatsEntry::Other(Value::from("login")));
        let bag = MetricBag(bag);
        assert_eq!(bag.get("numberOfRequests", "total"), Some(100));
        assert_eq!(bag.get("numberOfRequests", "ok"), None);
        assert_eq!(bag.get("numberOfRequests", "rate"), None);
        assert_eq!(bag.get("meanResponseTime", "total"), None);
        assert!(bag.category("name").is_none());
        assert_eq!(bag.categories().collect::<Vec<_>>(), vec!["name", "numberOfRequests"]);
    }
}

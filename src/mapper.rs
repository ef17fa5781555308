use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

use crate::config::{default_html_name, GROUP_FIELDS, PERCENTILE_FIELDS};
use crate::error::SchemaError;
use crate::model::{
    Bucket, GroupStats, MetricBag, RateTriplet, RequestRecord, StatisticsTree, StatsEntry, Triplet,
};

type Object = Map<String, Value>;

const ROOT: &str = "$";

fn child(parent: &str, key: &str) -> String {
    match parent {
        ROOT => key.to_string(),
        _ => format!("{}.{}", parent, key),
    }
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Object, SchemaError> {
    value
        .as_object()
        .ok_or_else(|| SchemaError::wrong_type(path, "an object"))
}

fn field<'a>(obj: &'a Object, parent: &str, key: &str) -> Result<&'a Value, SchemaError> {
    obj.get(key)
        .ok_or_else(|| SchemaError::missing(child(parent, key)))
}

fn string_field(obj: &Object, parent: &str, key: &str) -> Result<String, SchemaError> {
    field(obj, parent, key)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| SchemaError::wrong_type(child(parent, key), "a string"))
}

fn u64_field(obj: &Object, parent: &str, key: &str) -> Result<u64, SchemaError> {
    field(obj, parent, key)?
        .as_u64()
        .ok_or_else(|| SchemaError::wrong_type(child(parent, key), "a non-negative integer"))
}

fn number_field(obj: &Object, parent: &str, key: &str) -> Result<Number, SchemaError> {
    match field(obj, parent, key)? {
        Value::Number(n) if n.as_f64().is_some_and(|v| v >= 0.0) => Ok(n.clone()),
        _ => Err(SchemaError::wrong_type(child(parent, key), "a non-negative number")),
    }
}

fn object_field<'a>(obj: &'a Object, parent: &str, key: &str) -> Result<&'a Object, SchemaError> {
    as_object(field(obj, parent, key)?, &child(parent, key))
}

fn positional<T>(
    fields: [&str; 4],
    mut map_one: impl FnMut(&str) -> Result<T, SchemaError>,
) -> Result<[T; 4], SchemaError> {
    let [a, b, c, d] = fields;
    Ok([map_one(a)?, map_one(b)?, map_one(c)?, map_one(d)?])
}

fn map_triplet(obj: &Object, parent: &str, key: &str) -> Result<Triplet, SchemaError> {
    let path = child(parent, key);
    let t = object_field(obj, parent, key)?;
    Ok(Triplet {
        total: u64_field(t, &path, "total")?,
        ok: u64_field(t, &path, "ok")?,
        ko: u64_field(t, &path, "ko")?,
    })
}

fn map_rate_triplet(obj: &Object, parent: &str, key: &str) -> Result<RateTriplet, SchemaError> {
    let path = child(parent, key);
    let t = object_field(obj, parent, key)?;
    Ok(RateTriplet {
        total: number_field(t, &path, "total")?,
        ok: number_field(t, &path, "ok")?,
        ko: number_field(t, &path, "ko")?,
    })
}

/// `htmlName` is absent in some generator versions; it falls back to
/// [`default_html_name`] of the bucket name. Everything else is required.
fn map_bucket(obj: &Object, parent: &str, key: &str) -> Result<Bucket, SchemaError> {
    let path = child(parent, key);
    let b = object_field(obj, parent, key)?;
    let name = string_field(b, &path, "name")?;
    let html_name = match b.get("htmlName") {
        None | Some(Value::Null) => default_html_name(&name),
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(SchemaError::wrong_type(child(&path, "htmlName"), "a string")),
    };
    Ok(Bucket {
        name,
        html_name,
        count: u64_field(b, &path, "count")?,
        percentage: u64_field(b, &path, "percentage")?,
    })
}

fn map_group_stats(value: &Value, path: &str) -> Result<GroupStats, SchemaError> {
    let s = as_object(value, path)?;
    Ok(GroupStats {
        name: string_field(s, path, "name")?,
        number_of_requests: map_triplet(s, path, "numberOfRequests")?,
        min_response_time: map_triplet(s, path, "minResponseTime")?,
        max_response_time: map_triplet(s, path, "maxResponseTime")?,
        mean_response_time: map_triplet(s, path, "meanResponseTime")?,
        standard_deviation: map_triplet(s, path, "standardDeviation")?,
        percentiles: positional(PERCENTILE_FIELDS, |k| map_triplet(s, path, k))?,
        groups: positional(GROUP_FIELDS, |k| map_bucket(s, path, k))?,
        mean_number_of_requests_per_second: map_rate_triplet(s, path, "meanNumberOfRequestsPerSecond")?,
    })
}

/// Copies the open-ended `category -> sub-metric -> value` bag as encoded.
/// Object categories become [`StatsEntry::Metrics`], anything else (the
/// request `name`, for one) is kept as [`StatsEntry::Other`].
fn map_metric_bag(value: &Value, path: &str) -> Result<MetricBag, SchemaError> {
    let stats = as_object(value, path)?;
    let bag = stats
        .iter()
        .map(|(category, entry)| {
            let entry = match entry {
                Value::Object(metrics) => StatsEntry::Metrics(
                    metrics.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                ),
                other => StatsEntry::Other(other.clone()),
            };
            (category.clone(), entry)
        })
        .collect();
    Ok(MetricBag(bag))
}

fn map_request(value: &Value, path: &str) -> Result<RequestRecord, SchemaError> {
    let r = as_object(value, path)?;
    Ok(RequestRecord {
        kind: string_field(r, path, "type")?,
        name: string_field(r, path, "name")?,
        path: string_field(r, path, "path")?,
        path_formatted: string_field(r, path, "pathFormatted")?,
        stats: map_metric_bag(field(r, path, "stats")?, &child(path, "stats"))?,
    })
}

/// Maps one decoded report document into a [`StatisticsTree`].
///
/// Root fields (`type`, `name`, `path`, `pathFormatted`, `stats`, `contents`)
/// are required. Errors name the dotted path of the offending field.
pub fn map_report(doc: &Value) -> Result<StatisticsTree, SchemaError> {
    let root = as_object(doc, ROOT)?;
    let kind = string_field(root, ROOT, "type")?;
    let name = string_field(root, ROOT, "name")?;
    let path = string_field(root, ROOT, "path")?;
    let path_formatted = string_field(root, ROOT, "pathFormatted")?;
    let stats = map_group_stats(field(root, ROOT, "stats")?, "stats")?;

    let mut contents = BTreeMap::new();
    for (key, value) in object_field(root, ROOT, "contents")? {
        let record = map_request(value, &child("contents", key))?;
        contents.insert(key.clone(), record);
    }

    Ok(StatisticsTree {
        kind,
        name,
        path,
        path_formatted,
        stats,
        contents,
    })
}

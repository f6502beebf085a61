//! In-process evaluation of the query model with MongoDB value semantics.

use crate::query::{Expr, Filter, Projection, SortOrder, Update};
use mongodb::bson::{Bson, Document};
use std::cmp::Ordering;

/// Value reached by a dotted path.
///
/// Arrays of sub-documents are traversed element-wise, so `topics.score`
/// on `{topics: [{score: 1}, {score: 2}]}` yields `[1, 2]`.
pub(crate) fn resolve_path(doc: &Document, path: &str) -> Option<Bson> {
    let mut segments = path.split('.');
    let mut current = doc.get(segments.next()?)?.clone();
    for segment in segments {
        current = descend(&current, segment)?;
    }
    Some(current)
}

fn descend(value: &Bson, segment: &str) -> Option<Bson> {
    match value {
        Bson::Document(doc) => doc.get(segment).cloned(),
        Bson::Array(items) => Some(Bson::Array(
            items.iter().filter_map(|item| descend(item, segment)).collect(),
        )),
        _ => None,
    }
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

/// Equality that ignores integer/double width.
pub(crate) fn values_equal(a: &Bson, b: &Bson) -> bool {
    match (as_f64(a), as_f64(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

pub(crate) fn matches(doc: &Document, filter: &Filter) -> bool {
    match filter {
        Filter::All => true,
        Filter::Eq { field, value } => match resolve_path(doc, field) {
            Some(Bson::Array(items)) => {
                values_equal(&Bson::Array(items.clone()), value)
                    || items.iter().any(|item| values_equal(item, value))
            }
            Some(found) => values_equal(&found, value),
            // `{field: null}` also matches documents without the field.
            None => matches!(value, Bson::Null),
        },
    }
}

/// Apply `update` in place; returns whether the document changed.
///
/// `$set` targets top-level fields only.
pub(crate) fn apply_update(doc: &mut Document, update: &Update) -> bool {
    let Update::Set { field, value } = update;
    if doc.get(field) == Some(value) {
        return false;
    }
    doc.insert(field.clone(), value.clone());
    true
}

/// `$avg` over the values at a path: non-numeric values are skipped and an
/// empty input yields `null`.
pub(crate) fn average(value: Option<Bson>) -> Bson {
    let numbers: Vec<f64> = match &value {
        Some(Bson::Array(items)) => items.iter().filter_map(as_f64).collect(),
        Some(other) => as_f64(other).into_iter().collect(),
        None => Vec::new(),
    };

    if numbers.is_empty() {
        Bson::Null
    } else {
        Bson::Double(numbers.iter().sum::<f64>() / numbers.len() as f64)
    }
}

pub(crate) fn project(doc: &Document, projection: &Projection) -> Document {
    let mut out = Document::new();
    if let Some(id) = doc.get("_id") {
        out.insert("_id", id.clone());
    }

    for (name, expr) in projection.fields() {
        match expr {
            Expr::Field(path) => {
                if let Some(value) = resolve_path(doc, path) {
                    out.insert(name.clone(), value);
                }
            }
            Expr::Avg(path) => {
                out.insert(name.clone(), average(resolve_path(doc, path)));
            }
        }
    }
    out
}

// BSON comparison order for the types this crate produces.
fn type_rank(value: Option<&Bson>) -> u8 {
    match value {
        None | Some(Bson::Null) | Some(Bson::Undefined) => 1,
        Some(Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_)) => 2,
        Some(Bson::String(_) | Bson::Symbol(_)) => 3,
        Some(Bson::Document(_)) => 4,
        Some(Bson::Array(_)) => 5,
        Some(Bson::Binary(_)) => 6,
        Some(Bson::ObjectId(_)) => 7,
        Some(Bson::Boolean(_)) => 8,
        Some(Bson::DateTime(_)) => 9,
        Some(Bson::Timestamp(_)) => 10,
        Some(_) => 11,
    }
}

pub(crate) fn compare_values(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }

    let (Some(a), Some(b)) = (a, b) else {
        return Ordering::Equal;
    };

    if let (Some(x), Some(y)) = (as_f64(a), as_f64(b)) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }

    match (a, b) {
        (Bson::String(x), Bson::String(y)) => x.cmp(y),
        (Bson::Boolean(x), Bson::Boolean(y)) => x.cmp(y),
        (Bson::ObjectId(x), Bson::ObjectId(y)) => x.bytes().cmp(&y.bytes()),
        (Bson::DateTime(x), Bson::DateTime(y)) => {
            x.timestamp_millis().cmp(&y.timestamp_millis())
        }
        _ => Ordering::Equal,
    }
}

/// Stable multi-key sort; documents that compare equal keep their order.
pub(crate) fn sort(documents: &mut [Document], keys: &[(String, SortOrder)]) {
    documents.sort_by(|a, b| {
        for (field, order) in keys {
            let ordering = compare_values(resolve_path(a, field).as_ref(), resolve_path(b, field).as_ref());
            let ordering = match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

// Response extraction - staged field search over parsed JSON trees

use serde_json::Value;

/// Collect the value of every object member named `field` anywhere under
/// `node`, in document order.
///
/// Arrays are searched element by element and contribute no matches of their
/// own. After a key matches, the search still descends into that member's
/// value, so a field name recurring at several depths yields one candidate
/// per occurrence.
pub fn collect_field(field: &str, node: &Value, matches: &mut Vec<Value>) {
    match node {
        Value::Array(items) => {
            for item in items {
                collect_field(field, item, matches);
            }
        }
        Value::Object(members) => {
            for (key, value) in members {
                if key == field {
                    matches.push(value.clone());
                }
                collect_field(field, value, matches);
            }
        }
        _ => {}
    }
}

/// Run an extraction pipeline against a response tree.
///
/// The first field searches the whole tree. Each subsequent field searches
/// within every candidate from the previous stage, concatenating matches in
/// candidate order. A candidate with no matches simply contributes nothing;
/// an empty final result is valid.
pub fn extract(fields: &[String], root: &Value) -> Vec<Value> {
    let mut candidates = Vec::new();
    if fields.is_empty() {
        return candidates;
    }

    collect_field(&fields[0], root, &mut candidates);

    for field in &fields[1..] {
        let mut narrowed = Vec::new();
        for candidate in &candidates {
            collect_field(field, candidate, &mut narrowed);
        }
        candidates = narrowed;
    }

    candidates
}

/// Correct the array wrapping the recursive search introduces.
///
/// A single candidate comes back unwrapped, unless the response root was
/// itself an array, in which case it is wrapped back into a one-element
/// array. With several candidates, any candidate that is itself a
/// one-element array is unwrapped in place.
pub fn normalize_brackets(mut candidates: Vec<Value>, root_was_array: bool) -> Value {
    if candidates.len() > 1 {
        let normalized = candidates
            .into_iter()
            .map(|candidate| match candidate {
                Value::Array(mut inner) if inner.len() == 1 => inner.pop().unwrap_or(Value::Null),
                other => other,
            })
            .collect();
        return Value::Array(normalized);
    }

    match candidates.pop() {
        Some(single) if root_was_array => Value::Array(vec![single]),
        Some(single) => single,
        None => Value::Array(Vec::new()),
    }
}

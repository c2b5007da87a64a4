//! The backend's `{ status, message, data, meta }` response envelope.

use serde_json::Value;

/// Normalized response envelope.
///
/// `ok` is `true` only when the server said `"status": "success"`; a 2xx
/// response with any other status still yields an envelope, the caller decides.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiEnvelope {
    pub ok: bool,
    pub message: Option<String>,
    /// The `data` member, or `Null` when absent.
    pub data: Value,
    pub meta: Option<Value>,
    /// The full response body.
    pub raw: Value,
}

impl ApiEnvelope {
    #[must_use]
    pub fn from_body(raw: Value) -> Self {
        let ok = raw.get("status").and_then(Value::as_str) == Some("success");
        let message = raw
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned);
        let data = raw.get("data").cloned().unwrap_or(Value::Null);
        let meta = raw.get("meta").filter(|m| !m.is_null()).cloned();
        Self {
            ok,
            message,
            data,
            meta,
            raw,
        }
    }

    /// `data.data` when the server double-wrapped the payload, else `data`.
    #[must_use]
    pub fn payload(&self) -> &Value {
        match self.data.get("data") {
            Some(inner) if !inner.is_null() => inner,
            _ => &self.data,
        }
    }
}

/// Follows each dotted path in order and returns the first array found.
#[must_use]
pub fn first_array<'a>(root: &'a Value, paths: &[&str]) -> Option<&'a Vec<Value>> {
    paths.iter().find_map(|path| {
        let node = if path.is_empty() {
            Some(root)
        } else {
            path.split('.').try_fold(root, |node, key| node.get(key))
        };
        node.and_then(Value::as_array)
    })
}

/// Follows each dotted path in order and returns the first non-null value.
#[must_use]
pub fn first_value<'a>(root: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths.iter().find_map(|path| {
        path.split('.')
            .try_fold(root, |node, key| node.get(key))
            .filter(|v| !v.is_null())
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn success_envelope_is_ok() {
        let env = ApiEnvelope::from_body(json!({
            "status": "success",
            "message": "listo",
            "data": {"x": 1},
            "meta": {"page": 1}
        }));
        assert!(env.ok);
        assert_eq!(env.message.as_deref(), Some("listo"));
        assert_eq!(env.data, json!({"x": 1}));
        assert_eq!(env.meta, Some(json!({"page": 1})));
    }

    #[test]
    fn non_success_status_is_not_ok() {
        let env = ApiEnvelope::from_body(json!({"status": "fail", "data": null}));
        assert!(!env.ok);
        assert_eq!(env.data, Value::Null);
        assert!(env.meta.is_none());
    }

    #[test]
    fn payload_unwraps_double_data() {
        let env = ApiEnvelope::from_body(json!({"data": {"data": {"product": {"id": 1}}}}));
        assert_eq!(env.payload(), &json!({"product": {"id": 1}}));

        let flat = ApiEnvelope::from_body(json!({"data": {"product": {"id": 1}}}));
        assert_eq!(flat.payload(), &json!({"product": {"id": 1}}));
    }

    #[test]
    fn first_array_tries_paths_in_order() {
        let body = json!({"data": {"category": [{"id": 1}]}, "category": [{"id": 2}]});
        let arr = first_array(&body, &["data.category", "category"]).unwrap();
        assert_eq!(arr[0]["id"], 1);

        let bare = json!([{"id": 3}]);
        assert_eq!(first_array(&bare, &["category", ""]).unwrap().len(), 1);
        assert!(first_array(&json!({}), &["category"]).is_none());
    }

    #[test]
    fn first_value_skips_nulls() {
        let body = json!({"data": {"token": null}, "token": "abc"});
        assert_eq!(
            first_value(&body, &["data.token", "token"]),
            Some(&json!("abc"))
        );
    }
}

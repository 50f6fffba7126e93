use serde_json::{Map, Value};
use std::collections::HashMap;

/// Query string and form fields of one browser request, merged.
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    values: HashMap<String, String>,
}

impl RequestParams {
    pub fn merged(query: HashMap<String, String>, form: Option<HashMap<String, String>>) -> Self {
        let mut values = query;
        if let Some(form) = form {
            values.extend(form);
        }
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn filled(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn first_filled(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.filled(k))
    }

    pub fn is_missing(&self, key: &str) -> bool {
        !self.values.contains_key(key)
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Value::Object(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_overrides_query() {
        let query = HashMap::from([("status".to_string(), "failed".to_string())]);
        let form = HashMap::from([("status".to_string(), "success".to_string())]);
        let params = RequestParams::merged(query, Some(form));
        assert_eq!(params.get("status"), Some("success"));
    }

    #[test]
    fn blank_values_are_not_filled() {
        let params: RequestParams = [("name", "  "), ("email", "a@b.c")].into_iter().collect();
        assert_eq!(params.filled("name"), None);
        assert!(!params.is_missing("name"));
        assert_eq!(params.first_filled(&["name", "email"]), Some("a@b.c"));
    }
}

use serde_json::Value;

/// Navigates through a JSON structure using a path array.
/// Returns all matching values at the end of the path.
/// Supports "[*]" for array iteration.
pub fn navigate_json_path<'a>(current: &'a Value, path: &[&str]) -> Vec<&'a Value> {
    if path.is_empty() {
        return vec![current];
    }

    let segment = path[0];
    let remaining_path = &path[1..];

    match segment {
        "[*]" => {
            let mut results = Vec::new();
            if let Some(array) = current.as_array() {
                for item in array {
                    results.extend(navigate_json_path(item, remaining_path));
                }
            }
            results
        }
        field_name => match current.get(field_name) {
            Some(field_value) => navigate_json_path(field_value, remaining_path),
            None => vec![],
        },
    }
}

/// Collects the `errors[*].message` strings of a GraphQL response.
/// GraphQL servers answer 200 even when the query failed, so callers must
/// check this before trusting `data`.
pub fn graphql_error_messages(document: &Value) -> Vec<String> {
    let Some(errors) = document.get("errors").and_then(Value::as_array) else {
        return vec![];
    };

    errors
        .iter()
        .map(|error| match error.get("message").and_then(Value::as_str) {
            Some(message) => message.to_string(),
            None => error.to_string(),
        })
        .collect()
}

/// Shortens a secret for log lines: keeps the length and a short prefix.
pub fn fingerprint(secret: &str) -> String {
    let prefix: String = secret.chars().take(6).collect();
    format!("{}…({} chars)", prefix, secret.chars().count())
}

use serde::{Deserialize, Deserializer};

pub const FIRST_PAGE: i64 = 1;

// `?page=abc` falls back to the first page instead of rejecting the request
pub fn deserialize_page<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(FIRST_PAGE))
}

fn first_page() -> i64 {
    FIRST_PAGE
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page", deserialize_with = "deserialize_page")]
    pub page: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> i64 {
        serde_json::from_value::<PageQuery>(value).unwrap().page
    }

    #[test]
    fn page_parsing_is_lenient() {
        assert_eq!(parse(json!({})), 1);
        assert_eq!(parse(json!({ "page": "3" })), 3);
        assert_eq!(parse(json!({ "page": "abc" })), 1);
        assert_eq!(parse(json!({ "page": "-2" })), -2);
    }
}

// src/utils/decode.rs
use serde::de::DeserializeOwned;

use crate::errors::{TawsilError, TawsilResult};

/// Result of decoding a backend list element by element
#[derive(Debug)]
pub struct Decoded<T> {
    pub items: Vec<T>,
    pub skipped: usize,
}

/// Decodes a JSON array one element at a time.
///
/// A malformed element is logged and skipped so that one bad record cannot
/// take down the whole list. A body that is not an array at all is an error.
pub fn decode_each<T: DeserializeOwned>(value: serde_json::Value, what: &str) -> TawsilResult<Decoded<T>> {
    let serde_json::Value::Array(elements) = value else {
        return Err(TawsilError::InvalidFormat(format!("expected a list of {}", what)));
    };

    let mut items = Vec::with_capacity(elements.len());
    let mut skipped = 0;

    for (index, element) in elements.into_iter().enumerate() {
        let id = element
            .get("id")
            .and_then(|id| id.as_str())
            .unwrap_or("<no id>")
            .to_string();
        match serde_json::from_value::<T>(element) {
            Ok(item) => items.push(item),
            Err(err) => {
                skipped += 1;
                tracing::warn!("Skipping malformed {} at index {} (id {}): {}", what, index, id, err);
            }
        }
    }

    Ok(Decoded { items, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: String,
        quantity: u32,
    }

    #[test]
    fn test_bad_element_is_skipped() {
        let value = serde_json::json!([
            {"id": "a", "quantity": 1},
            {"id": "b", "quantity": "lots"},
            {"id": "c", "quantity": 3}
        ]);
        let decoded: Decoded<Item> = decode_each(value, "item").unwrap();
        assert_eq!(decoded.skipped, 1);
        assert_eq!(decoded.items.len(), 2);
        assert_eq!(decoded.items[1].id, "c");
    }

    #[test]
    fn test_non_array_is_error() {
        let result: TawsilResult<Decoded<Item>> = decode_each(serde_json::json!({"id": "a"}), "item");
        assert!(matches!(result, Err(TawsilError::InvalidFormat(_))));
    }
}

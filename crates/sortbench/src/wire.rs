//! JSON request/response bodies shared by the server and its clients.
use crate::{Array, Batch};
use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /process-single` and `POST /process-concurrent`.
///
/// A missing or `null` `to_sort` is an empty batch, and a `null` inner array
/// is an empty array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortRequest {
    #[serde(default, deserialize_with = "nullable_batch")]
    pub to_sort: Batch,
}

/// Successful response body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortResponse {
    pub sorted_arrays: Batch,
    /// Wall-clock time spent sorting, in nanoseconds.
    pub time_ns: i64,
}

fn nullable_batch<'de, D>(deserializer: D) -> Result<Batch, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Option::<Vec<Option<Array>>>::deserialize(deserializer)?;
    Ok(rows
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_arrays() {
        let req: SortRequest = serde_json::from_str(r#"{"to_sort": [[3,1,2],[5,0,5],[]]}"#).unwrap();
        assert_eq!(req.to_sort, vec![vec![3, 1, 2], vec![5, 0, 5], vec![]]);
    }

    #[test]
    fn missing_or_null_fields_are_empty() {
        let req: SortRequest = serde_json::from_str("{}").unwrap();
        assert!(req.to_sort.is_empty());

        let req: SortRequest = serde_json::from_str(r#"{"to_sort": null}"#).unwrap();
        assert!(req.to_sort.is_empty());

        let req: SortRequest = serde_json::from_str(r#"{"to_sort": [[2,1], null]}"#).unwrap();
        assert_eq!(req.to_sort, vec![vec![2, 1], vec![]]);
    }

    #[test]
    fn rejects_wrong_shapes() {
        for body in [
            r#"{"to_sort": "not-an-array"}"#,
            r#"{"to_sort": [1, 2, 3]}"#,
            r#"{"to_sort": [[1.5]]}"#,
            r#"{"to_sort": [[9223372036854775808]]}"#,
            r#"{"to_sort": [["1"]]}"#,
            "[",
            "",
        ] {
            assert!(serde_json::from_str::<SortRequest>(body).is_err(), "{body}");
        }
    }

    #[test]
    fn response_uses_wire_field_names() {
        let resp = SortResponse {
            sorted_arrays: vec![vec![1, 2]],
            time_ns: 7,
        };
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            serde_json::json!({"sorted_arrays": [[1, 2]], "time_ns": 7})
        );
    }
}

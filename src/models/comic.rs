use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::models::error::{FieldIssue, ValidationError};

/// Identifier of a stored comic.
///
/// Natively a 12-byte ObjectId; clients only ever see its 24-character
/// hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComicId(ObjectId);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid comic id: {0}")]
pub struct InvalidComicId(pub String);

impl ComicId {
    pub fn new() -> Self {
        ComicId(ObjectId::new())
    }

    pub fn as_object_id(&self) -> ObjectId {
        self.0
    }
}

impl Default for ComicId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for ComicId {
    fn from(oid: ObjectId) -> Self {
        ComicId(oid)
    }
}

impl FromStr for ComicId {
    type Err = InvalidComicId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
            .map(ComicId)
            .map_err(|_| InvalidComicId(s.to_string()))
    }
}

impl fmt::Display for ComicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl Serialize for ComicId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comic {
    #[serde(rename = "_id")]
    pub id: ComicId,
    pub title: String,
    #[serde(rename = "onSaleDate")]
    pub on_sale_date: String,
    pub image: String,
}

/// Field-level merge applied by an update. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComicPatch {
    pub title: Option<String>,
    pub on_sale_date: Option<String>,
    pub image: Option<String>,
}

impl ComicPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.on_sale_date.is_none() && self.image.is_none()
    }

    /// Merges the patch into `comic`, returning whether any field changed.
    pub fn apply_to(&self, comic: &mut Comic) -> bool {
        let mut changed = false;
        changed |= merge_field(&mut comic.title, &self.title);
        changed |= merge_field(&mut comic.on_sale_date, &self.on_sale_date);
        changed |= merge_field(&mut comic.image, &self.image);
        changed
    }
}

fn merge_field(target: &mut String, value: &Option<String>) -> bool {
    match value {
        Some(v) if v != target => {
            *target = v.clone();
            true
        }
        _ => false,
    }
}

const TITLE: &str = "title";
const ON_SALE_DATE: &str = "onSaleDate";
const IMAGE: &str = "image";

/// Validates a creation payload, generating an id when none was supplied.
pub fn validate_create(payload: &Value) -> Result<Comic, ValidationError> {
    let body = as_object(payload)?;
    let mut issues = Vec::new();

    let supplied_id = body
        .get("_id")
        .filter(|v| !v.is_null())
        .or_else(|| body.get("id"));

    let id = match supplied_id {
        None | Some(Value::Null) => Some(ComicId::new()),
        Some(Value::String(raw)) => match raw.parse::<ComicId>() {
            Ok(id) => Some(id),
            Err(_) => {
                issues.push(FieldIssue::invalid_id());
                None
            }
        },
        Some(_) => {
            issues.push(FieldIssue::not_a_string("_id"));
            None
        }
    };

    let title = required_str(body, TITLE, &mut issues);
    let on_sale_date = required_str(body, ON_SALE_DATE, &mut issues);
    let image = required_str(body, IMAGE, &mut issues);

    if let Some(t) = &title {
        check_title(t, &mut issues);
    }

    match (id, title, on_sale_date, image) {
        (Some(id), Some(title), Some(on_sale_date), Some(image)) if issues.is_empty() => {
            Ok(Comic {
                id,
                title,
                on_sale_date,
                image,
            })
        }
        _ => Err(ValidationError::new(issues)),
    }
}

/// Validates an update payload. Absent and `null` fields are left out of the
/// patch; unknown fields, the identifier included, are ignored.
pub fn validate_update(payload: &Value) -> Result<ComicPatch, ValidationError> {
    let body = as_object(payload)?;
    let mut issues = Vec::new();

    let patch = ComicPatch {
        title: optional_str(body, TITLE, &mut issues),
        on_sale_date: optional_str(body, ON_SALE_DATE, &mut issues),
        image: optional_str(body, IMAGE, &mut issues),
    };

    if let Some(t) = &patch.title {
        check_title(t, &mut issues);
    }

    if issues.is_empty() {
        Ok(patch)
    } else {
        Err(ValidationError::new(issues))
    }
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>, ValidationError> {
    payload
        .as_object()
        .ok_or_else(|| ValidationError::new(vec![FieldIssue::not_an_object()]))
}

fn required_str(
    body: &Map<String, Value>,
    field: &str,
    issues: &mut Vec<FieldIssue>,
) -> Option<String> {
    match body.get(field) {
        None | Some(Value::Null) => {
            issues.push(FieldIssue::missing(field));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            issues.push(FieldIssue::not_a_string(field));
            None
        }
    }
}

fn optional_str(
    body: &Map<String, Value>,
    field: &str,
    issues: &mut Vec<FieldIssue>,
) -> Option<String> {
    match body.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            issues.push(FieldIssue::not_a_string(field));
            None
        }
    }
}

fn check_title(title: &str, issues: &mut Vec<FieldIssue>) {
    if title.is_empty() {
        issues.push(FieldIssue::too_short(TITLE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issue_types(err: &ValidationError) -> Vec<(String, String)> {
        err.issues
            .iter()
            .map(|i| (i.loc.last().cloned().unwrap_or_default(), i.kind.clone()))
            .collect()
    }

    #[test]
    fn test_comic_id_round_trips_through_string() {
        let id = ComicId::new();
        let parsed: ComicId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert_eq!(id.to_string().len(), 24);
    }

    #[test]
    fn test_comic_id_rejects_garbage() {
        assert!("not-an-id".parse::<ComicId>().is_err());
        assert!("".parse::<ComicId>().is_err());
        assert!("64b7f0c2e1a3b4c5d6e7f8a".parse::<ComicId>().is_err());
    }

    #[test]
    fn test_serialized_comic_uses_wire_names() {
        let comic = Comic {
            id: "64b7f0c2e1a3b4c5d6e7f8a9".parse().unwrap(),
            title: "Saga".to_string(),
            on_sale_date: "2029-12-31T00:00:00-0500".to_string(),
            image: "".to_string(),
        };

        let value = serde_json::to_value(&comic).unwrap();
        assert_eq!(
            value,
            json!({
                "_id": "64b7f0c2e1a3b4c5d6e7f8a9",
                "title": "Saga",
                "onSaleDate": "2029-12-31T00:00:00-0500",
                "image": ""
            })
        );
    }

    #[test]
    fn test_create_generates_id_when_absent() {
        let comic = validate_create(&json!({
            "title": "X",
            "onSaleDate": "2029-01-01T00:00:00-0500",
            "image": ""
        }))
        .unwrap();

        assert_eq!(comic.title, "X");
        assert_eq!(comic.image, "");
        assert!(!comic.id.to_string().is_empty());
    }

    #[test]
    fn test_create_accepts_id_under_either_name() {
        for key in ["_id", "id"] {
            let comic = validate_create(&json!({
                key: "64b7f0c2e1a3b4c5d6e7f8a9",
                "title": "X",
                "onSaleDate": "2029-01-01T00:00:00-0500",
                "image": "cover.png"
            }))
            .unwrap();
            assert_eq!(comic.id.to_string(), "64b7f0c2e1a3b4c5d6e7f8a9");
        }
    }

    #[test]
    fn test_create_null_underscore_id_falls_back_to_id() {
        let comic = validate_create(&json!({
            "_id": null,
            "id": "64b7f0c2e1a3b4c5d6e7f8a9",
            "title": "X",
            "onSaleDate": "2029-01-01T00:00:00-0500",
            "image": ""
        }))
        .unwrap();
        assert_eq!(comic.id.to_string(), "64b7f0c2e1a3b4c5d6e7f8a9");
    }

    #[test]
    fn test_create_reports_every_bad_field() {
        let err = validate_create(&json!({ "title": 7, "image": "" })).unwrap_err();
        assert_eq!(
            issue_types(&err),
            vec![
                ("title".to_string(), "type_error.str".to_string()),
                ("onSaleDate".to_string(), "value_error.missing".to_string()),
            ]
        );
    }

    #[test]
    fn test_create_rejects_empty_title_and_bad_id() {
        let err = validate_create(&json!({
            "_id": "nope",
            "title": "",
            "onSaleDate": "2029-01-01T00:00:00-0500",
            "image": ""
        }))
        .unwrap_err();

        let kinds = issue_types(&err);
        assert!(kinds.contains(&("_id".to_string(), "value_error".to_string())));
        assert!(kinds.contains(&(
            "title".to_string(),
            "value_error.any_str.min_length".to_string()
        )));
    }

    #[test]
    fn test_create_rejects_non_object() {
        let err = validate_create(&json!(["title"])).unwrap_err();
        assert_eq!(err.issues[0].kind, "type_error.dict");
        assert_eq!(err.issues[0].loc, vec!["body".to_string()]);
    }

    #[test]
    fn test_update_keeps_only_present_fields() {
        let patch = validate_update(&json!({
            "title": "Y",
            "image": null,
            "_id": "64b7f0c2e1a3b4c5d6e7f8a9",
            "publisher": "ignored"
        }))
        .unwrap();

        assert_eq!(
            patch,
            ComicPatch {
                title: Some("Y".to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_update_with_no_fields_is_empty_patch() {
        let patch = validate_update(&json!({})).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_update_type_checks_present_fields() {
        let err = validate_update(&json!({ "onSaleDate": 20290101 })).unwrap_err();
        assert_eq!(
            issue_types(&err),
            vec![("onSaleDate".to_string(), "type_error.str".to_string())]
        );
    }

    #[test]
    fn test_patch_apply_reports_change() {
        let mut comic = Comic {
            id: ComicId::new(),
            title: "X".to_string(),
            on_sale_date: "2029".to_string(),
            image: "".to_string(),
        };

        let same = ComicPatch {
            title: Some("X".to_string()),
            ..Default::default()
        };
        assert!(!same.apply_to(&mut comic));

        let different = ComicPatch {
            image: Some("cover.png".to_string()),
            ..Default::default()
        };
        assert!(different.apply_to(&mut comic));
        assert_eq!(comic.image, "cover.png");
        assert_eq!(comic.title, "X");
    }
}

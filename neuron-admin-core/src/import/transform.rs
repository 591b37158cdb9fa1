use neuron_admin_error::import::{RejectReason, RowRejection};
use neuron_admin_models::{
    domain::prelude::{scalar_to_string, PluginSchema, RawTagRow, TagRecord},
    enums::tag::{TagAttribute, TagType},
};
use serde_json::Value as Json;
use tracing::warn;

/// Decode one sheet row into a tag.
///
/// Checks run in a fixed order: attribute and type decode, required text
/// fields, plugin type restriction, static value. The first failing check
/// decides the rejection.
pub fn decode_row(row: &RawTagRow, schema: &PluginSchema) -> Result<TagRecord, RowRejection> {
    let reject = |reason| RowRejection::new(row.row, reason);

    let attribute = decode_attribute(row.get("attribute")).map_err(reject)?;
    let tag_type = decode_type(row.get("type")).map_err(reject)?;

    let group = required_text(row, "group").map_err(reject)?;
    let name = required_text(row, "name").map_err(reject)?;
    let address = required_text(row, "address").map_err(reject)?;

    if !schema.allows(tag_type) {
        return Err(reject(RejectReason::TypeNotAllowed {
            tag_type: tag_type.label().to_string(),
            allowed: schema.allowed_type_labels(),
        }));
    }

    let value = if attribute.is_static() {
        match row.get("value") {
            Some(Json::Number(n)) => Some(n.clone()),
            _ => return Err(reject(RejectReason::StaticWithoutValue { name })),
        }
    } else {
        None
    };

    Ok(TagRecord {
        group,
        description: row
            .get("description")
            .and_then(scalar_to_string)
            .unwrap_or_default(),
        decimal: optional_number(row, "decimal"),
        precision: optional_precision(row),
        name,
        address,
        attribute,
        r#type: tag_type,
        value,
    })
}

/// Decode rows in order, stopping at the first rejection.
pub fn transform_rows(
    rows: &[RawTagRow],
    schema: &PluginSchema,
) -> Result<Vec<TagRecord>, RowRejection> {
    rows.iter().map(|row| decode_row(row, schema)).collect()
}

fn decode_attribute(cell: Option<&Json>) -> Result<TagAttribute, RejectReason> {
    match cell {
        None => Err(RejectReason::MissingField("attribute")),
        Some(Json::String(labels)) => TagAttribute::from_labels(labels)
            .ok_or_else(|| RejectReason::UnknownAttribute(labels.clone())),
        Some(Json::Number(n)) => n
            .as_u64()
            .and_then(|bits| u8::try_from(bits).ok())
            .and_then(TagAttribute::from_bits)
            .ok_or_else(|| RejectReason::UnknownAttribute(n.to_string())),
        Some(other) => Err(RejectReason::UnknownAttribute(other.to_string())),
    }
}

fn decode_type(cell: Option<&Json>) -> Result<TagType, RejectReason> {
    match cell {
        None => Err(RejectReason::MissingField("type")),
        Some(Json::String(label)) => {
            TagType::from_label(label).ok_or_else(|| RejectReason::UnknownType(label.clone()))
        }
        Some(Json::Number(n)) => n
            .as_u64()
            .and_then(|code| u8::try_from(code).ok())
            .and_then(|code| TagType::try_from(code).ok())
            .filter(|t| TagType::CONFIGURABLE.contains(t))
            .ok_or_else(|| RejectReason::UnknownType(n.to_string())),
        Some(other) => Err(RejectReason::UnknownType(other.to_string())),
    }
}

fn required_text(row: &RawTagRow, field: &'static str) -> Result<String, RejectReason> {
    row.get(field)
        .and_then(scalar_to_string)
        .ok_or(RejectReason::MissingField(field))
}

/// Numeric cell or numeric text; anything else is ignored with a warning.
fn optional_number(row: &RawTagRow, field: &str) -> Option<f64> {
    match row.get(field)? {
        Json::Number(n) => n.as_f64(),
        Json::String(s) => match s.trim().parse::<f64>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(row = row.row, "Ignoring non-numeric {field} `{s}`");
                None
            }
        },
        other => {
            warn!(row = row.row, "Ignoring non-numeric {field} `{other}`");
            None
        }
    }
}

/// Non-negative integral precision that fits in `u32`; anything else is
/// ignored with a warning.
fn optional_precision(row: &RawTagRow) -> Option<u32> {
    let value = optional_number(row, "precision")?;
    if value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value) {
        Some(value as u32)
    } else {
        warn!(row = row.row, "Ignoring invalid precision `{value}`");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn row(n: usize, value: Json) -> RawTagRow {
        let values: Map<String, Json> = serde_json::from_value(value).unwrap();
        RawTagRow::new(n, values)
    }

    fn schema(types: &[TagType]) -> PluginSchema {
        PluginSchema {
            tag_type: Some(types.to_vec()),
            fields: Vec::new(),
        }
    }

    #[test]
    fn non_static_tag_never_carries_value() {
        let tag = decode_row(
            &row(
                2,
                json!({"group": "g1", "name": "t1", "address": "1", "attribute": "read", "type": "int", "value": 5}),
            ),
            &schema(&[TagType::Int32]),
        )
        .unwrap();
        assert_eq!(tag.attribute, TagAttribute::READ);
        assert_eq!(tag.r#type, TagType::Int32);
        assert_eq!(tag.value, None);
        assert_eq!(tag.description, "");
    }

    #[test]
    fn static_tag_keeps_numeric_value() {
        let tag = decode_row(
            &row(
                2,
                json!({"group": "g1", "name": "t1", "address": "1", "attribute": "Read,Static", "type": "INT16", "value": 7, "decimal": "0.1"}),
            ),
            &schema(&[TagType::Int16]),
        )
        .unwrap();
        assert!(tag.attribute.is_static());
        assert_eq!(tag.value, Some(7.into()));
        assert_eq!(tag.decimal, Some(0.1));
    }

    #[test]
    fn static_without_numeric_value_is_rejected() {
        for value in [json!(""), json!(null), json!("5")] {
            let err = decode_row(
                &row(
                    4,
                    json!({"group": "g1", "name": "t1", "address": "1", "attribute": "static", "type": "int", "value": value}),
                ),
                &PluginSchema::default(),
            )
            .unwrap_err();
            assert_eq!(
                err,
                RowRejection::new(4, RejectReason::StaticWithoutValue { name: "t1".into() })
            );
        }

        let missing = row(
            3,
            json!({"group": "g1", "name": "t1", "address": "1", "attribute": "static", "type": "int"}),
        );
        assert!(decode_row(&missing, &PluginSchema::default()).is_err());
    }

    #[test]
    fn unknown_labels_are_row_data_errors() {
        let err = decode_row(
            &row(
                2,
                json!({"group": "g1", "name": "t1", "address": "1", "attribute": "read,execute", "type": "int"}),
            ),
            &PluginSchema::default(),
        )
        .unwrap_err();
        assert!(err.reason.is_row_data_error());
        assert_eq!(err.reason, RejectReason::UnknownAttribute("read,execute".into()));

        let err = decode_row(
            &row(
                2,
                json!({"group": "g1", "name": "t1", "address": "1", "attribute": "read", "type": 15}),
            ),
            &PluginSchema::default(),
        )
        .unwrap_err();
        assert_eq!(err.reason, RejectReason::UnknownType("15".into()));
    }

    #[test]
    fn numeric_cells_decode_as_raw_codes() {
        let tag = decode_row(
            &row(
                2,
                json!({"group": "g1", "name": 100, "address": 40001, "attribute": 3, "type": 9}),
            ),
            &PluginSchema::default(),
        )
        .unwrap();
        assert_eq!(tag.attribute, TagAttribute::READ | TagAttribute::WRITE);
        assert_eq!(tag.r#type, TagType::Float);
        assert_eq!(tag.name, "100");
        assert_eq!(tag.address, "40001");
    }

    #[test]
    fn disallowed_type_lists_plugin_types() {
        let err = decode_row(
            &row(
                2,
                json!({"group": "g1", "name": "t1", "address": "1", "attribute": "read", "type": "bit"}),
            ),
            &schema(&[TagType::Int16, TagType::Float]),
        )
        .unwrap_err();
        assert_eq!(
            err.reason,
            RejectReason::TypeNotAllowed {
                tag_type: "BIT".into(),
                allowed: vec!["INT16".into(), "FLOAT".into()],
            }
        );
    }

    #[test]
    fn transform_stops_at_first_bad_row() {
        let rows = vec![
            row(2, json!({"group": "g1", "name": "t1", "address": "1", "attribute": "read", "type": "int"})),
            row(3, json!({"group": "g1", "name": "t2", "attribute": "read", "type": "int"})),
            row(4, json!({"group": "g1", "name": "t3", "address": "3", "attribute": "bogus", "type": "int"})),
        ];
        let err = transform_rows(&rows, &PluginSchema::default()).unwrap_err();
        assert_eq!(err, RowRejection::new(3, RejectReason::MissingField("address")));
    }

    #[test]
    fn precision_must_be_a_non_negative_integer() {
        let with_precision = |precision: Json| {
            decode_row(
                &row(
                    2,
                    json!({"group": "g1", "name": "t1", "address": "1", "attribute": "read", "type": "float", "precision": precision}),
                ),
                &PluginSchema::default(),
            )
            .unwrap()
            .precision
        };
        assert_eq!(with_precision(json!(3)), Some(3));
        assert_eq!(with_precision(json!("2")), Some(2));
        assert_eq!(with_precision(json!(-1)), None);
        assert_eq!(with_precision(json!(2.7)), None);
        assert_eq!(with_precision(json!("1e12")), None);
        assert_eq!(with_precision(json!("abc")), None);
    }
}

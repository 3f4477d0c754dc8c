//! Snapshot codec: table rows <-> JSON backing file
//!
//! The file format is a UTF-8 JSON array with one flat object per row
//! (field name -> scalar, including the reserved key field as written at
//! dump time). There is no schema or version header; column types are
//! reconstructed from the caller's pre-existing schema on re-insert.
//!
//! ## Restore keying
//!
//! `dump` writes each row's reserved `__key` field, but `restore` re-keys
//! elements by the literal `"text"` field, which is neither guaranteed to
//! exist in the schema nor to equal the reserved key. The asymmetry is kept
//! on purpose for compatibility with existing snapshot files; elements
//! without a string `"text"` field are skipped.

use slottable_core::{ColumnType, Error, Result, Row, Schema, Value, KEY_FIELD};
use tracing::debug;

/// Field restore re-keys elements by
pub const RESTORE_KEY_FIELD: &str = "text";

/// Encode rows as the snapshot file content
///
/// Fields within each object are written in sorted order, so identical row
/// sets produce identical objects regardless of in-memory map order.
pub fn encode(rows: &[Row]) -> Result<Vec<u8>> {
    let value = serde_json::to_value(rows).map_err(|e| Error::Snapshot(e.to_string()))?;
    serde_json::to_vec(&value).map_err(|e| Error::Snapshot(e.to_string()))
}

/// Decode snapshot file content into `(key, row)` insertion entries
///
/// Schema-directed: each element's fields are read at the type the schema
/// declares; fields absent from the schema and fields of the wrong JSON
/// kind are ignored (the insert path fills defaults). Elements that are not
/// objects, or that lack a string `"text"` field, are skipped.
pub fn decode(schema: &Schema, bytes: &[u8]) -> Result<Vec<(String, Row)>> {
    let parsed: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| Error::Snapshot(e.to_string()))?;
    let Some(elements) = parsed.as_array() else {
        return Err(Error::Snapshot(
            "expected a JSON array of row objects".to_string(),
        ));
    };

    let mut entries = Vec::with_capacity(elements.len());
    for element in elements {
        let Some(obj) = element.as_object() else {
            debug!("Skipping non-object snapshot element");
            continue;
        };
        let Some(key) = obj.get(RESTORE_KEY_FIELD).and_then(|v| v.as_str()) else {
            debug!(
                field = RESTORE_KEY_FIELD,
                "Skipping snapshot element without restore key field"
            );
            continue;
        };

        let mut row = Row::new();
        for column in schema.columns() {
            if column.name == KEY_FIELD {
                continue;
            }
            if let Some(jv) = obj.get(&column.name) {
                if let Some(value) = json_to_value(jv, column.ty) {
                    row.insert(column.name.clone(), value);
                }
            }
        }
        entries.push((key.to_string(), row));
    }
    Ok(entries)
}

fn json_to_value(jv: &serde_json::Value, ty: ColumnType) -> Option<Value> {
    match ty {
        ColumnType::Int8 | ColumnType::Int16 | ColumnType::Int32 | ColumnType::Int64 => {
            jv.as_i64().map(Value::Int)
        }
        ColumnType::Float => jv.as_f64().map(Value::Float),
        ColumnType::FixedString(_) => jv.as_str().map(|s| Value::Str(s.to_string())),
    }
}

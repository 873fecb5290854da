use serde::{Deserialize, Serialize};

use super::CellStyle;

/// Typed cell value as reported by the engine.
///
/// Serialized adjacently tagged, e.g. `{"type":"number","value":42}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    Str(String),
    Number(f64),
    Bool(bool),
    Error(String),
    #[default]
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Str(s) => s.is_empty(),
            _ => false,
        }
    }
}

/// A single cached cell.
///
/// Created lazily by the first patch that touches the coordinate and only
/// dropped when the whole sheet is cleared.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StandardCell {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<CellStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<CellValue>,
    #[serde(default)]
    pub formula: String,
}

/// Partial update for a cell; `None` fields keep their cached value.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CellPatch {
    pub style: Option<CellStyle>,
    pub value: Option<CellValue>,
    pub formula: Option<String>,
}

impl StandardCell {
    /// Overwrite only the fields present in `patch`.
    pub fn apply(&mut self, patch: CellPatch) {
        if let Some(style) = patch.style {
            self.style = Some(style);
        }
        if let Some(value) = patch.value {
            self.value = Some(value);
        }
        if let Some(formula) = patch.formula {
            self.formula = formula;
        }
    }
}

/// A comment (note) attached to a cell
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub text: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_value_wire_shape() {
        let v: CellValue = serde_json::from_str(r#"{"type":"number","value":42}"#).unwrap();
        assert_eq!(v, CellValue::Number(42.0));
        let s: CellValue = serde_json::from_str(r#"{"type":"str","value":"hi"}"#).unwrap();
        assert_eq!(s, CellValue::Str("hi".to_string()));
        let e: CellValue = serde_json::from_str(r#"{"type":"empty"}"#).unwrap();
        assert!(e.is_empty());
        assert_eq!(
            serde_json::to_string(&CellValue::Bool(true)).unwrap(),
            r#"{"type":"bool","value":true}"#
        );
    }

    #[test]
    fn test_apply_is_partial() {
        let mut cell = StandardCell::default();
        cell.apply(CellPatch {
            formula: Some("=1+1".to_string()),
            ..CellPatch::default()
        });
        cell.apply(CellPatch {
            value: Some(CellValue::Number(2.0)),
            ..CellPatch::default()
        });
        assert_eq!(cell.formula, "=1+1");
        assert_eq!(cell.value, Some(CellValue::Number(2.0)));
        assert!(cell.style.is_none());
    }
}

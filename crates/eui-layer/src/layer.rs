//! In-memory polygon layer with ordered, typed attribute fields.

use eui_common::{format_numeric, parse_f64, round_option};
use geo::MultiPolygon;

use crate::error::{LayerError, Result};

/// Storage type of an attribute field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
}

/// Attribute field definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
}

impl Field {
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Text,
        }
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Number,
        }
    }
}

/// One attribute cell. Missing values are explicit.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Text(Option<String>),
    Number(Option<f64>),
}

impl AttrValue {
    /// Missing value of the given kind.
    pub fn missing(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text => Self::Text(None),
            FieldKind::Number => Self::Number(None),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(Some(value.into()))
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Number(_) => FieldKind::Number,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Text(None) | Self::Number(None))
    }

    /// Text content, `None` for numbers and missing text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => value.as_deref(),
            Self::Number(_) => None,
        }
    }

    /// Numeric content. Text is parsed.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Text(value) => value.as_deref().and_then(parse_f64),
            Self::Number(value) => *value,
        }
    }

    /// Renders the value as text; numbers drop trailing zeros.
    pub fn display(&self) -> Option<String> {
        match self {
            Self::Text(value) => value.clone(),
            Self::Number(value) => value.map(format_numeric),
        }
    }

    /// Converts the value to another kind.
    pub fn coerce(self, kind: FieldKind) -> Self {
        match (self, kind) {
            (Self::Number(value), FieldKind::Text) => Self::Text(value.map(format_numeric)),
            (Self::Text(value), FieldKind::Number) => {
                Self::Number(value.as_deref().and_then(parse_f64))
            }
            (value, _) => value,
        }
    }
}

/// One polygon and its attribute values, aligned with [`Layer::fields`].
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: MultiPolygon<f64>,
    pub attributes: Vec<AttrValue>,
}

/// Polygons sharing one attribute schema. Geometry is always WGS84.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    pub fields: Vec<Field>,
    pub features: Vec<Feature>,
}

impl Layer {
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            features: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    pub fn require_field(&self, name: &str) -> Result<usize> {
        self.field_index(name)
            .ok_or_else(|| LayerError::MissingField {
                field: name.to_string(),
            })
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    /// Appends a feature; `attributes` must follow the field order.
    pub fn push(&mut self, geometry: MultiPolygon<f64>, attributes: Vec<AttrValue>) -> Result<()> {
        if attributes.len() != self.fields.len() {
            return Err(LayerError::LengthMismatch {
                target: "feature attributes".to_string(),
                expected: self.fields.len(),
                actual: attributes.len(),
            });
        }
        let attributes = attributes
            .into_iter()
            .zip(&self.fields)
            .map(|(value, field)| value.coerce(field.kind))
            .collect();
        self.features.push(Feature {
            geometry,
            attributes,
        });
        Ok(())
    }

    pub fn value(&self, feature: usize, field: &str) -> Option<&AttrValue> {
        let index = self.field_index(field)?;
        self.features.get(feature)?.attributes.get(index)
    }

    pub fn text(&self, feature: usize, field: &str) -> Option<&str> {
        self.value(feature, field).and_then(AttrValue::as_text)
    }

    pub fn number(&self, feature: usize, field: &str) -> Option<f64> {
        self.value(feature, field).and_then(AttrValue::as_number)
    }

    /// Text of `field` for every feature.
    pub fn column_text(&self, field: &str) -> Result<Vec<Option<String>>> {
        let index = self.require_field(field)?;
        Ok(self
            .features
            .iter()
            .map(|feature| feature.attributes[index].display())
            .collect())
    }

    /// Adds a field or overwrites an existing one with one value per feature.
    pub fn set_field(&mut self, field: Field, values: Vec<AttrValue>) -> Result<()> {
        if values.len() != self.features.len() {
            return Err(LayerError::LengthMismatch {
                target: field.name,
                expected: self.features.len(),
                actual: values.len(),
            });
        }
        let kind = field.kind;
        let index = match self.field_index(&field.name) {
            Some(index) => {
                self.fields[index] = field;
                index
            }
            None => {
                self.fields.push(field);
                for feature in &mut self.features {
                    feature.attributes.push(AttrValue::missing(kind));
                }
                self.fields.len() - 1
            }
        };
        for (feature, value) in self.features.iter_mut().zip(values) {
            feature.attributes[index] = value.coerce(kind);
        }
        Ok(())
    }

    /// Sets `field` to the same value on every feature.
    pub fn fill_field(&mut self, field: Field, value: &AttrValue) {
        let values = vec![value.clone(); self.features.len()];
        // Lengths match by construction.
        let _ = self.set_field(field, values);
    }

    /// Keeps the named fields in the given order.
    pub fn select(&mut self, names: &[&str]) -> Result<()> {
        let indices = names
            .iter()
            .map(|name| self.require_field(name))
            .collect::<Result<Vec<_>>>()?;
        self.fields = indices.iter().map(|&i| self.fields[i].clone()).collect();
        for feature in &mut self.features {
            feature.attributes = indices
                .iter()
                .map(|&i| feature.attributes[i].clone())
                .collect();
        }
        Ok(())
    }

    pub fn retain(&mut self, keep: impl FnMut(&Feature) -> bool) {
        self.features.retain(keep);
    }

    /// Rounds every numeric attribute half-to-even.
    pub fn round_numbers(&mut self, digits: u32) {
        for feature in &mut self.features {
            for value in &mut feature.attributes {
                if let AttrValue::Number(number) = value {
                    *number = round_option(*number, digits);
                }
            }
        }
    }
}

/// ISO prefix of a `COUNTRY` value: `TW-臺灣` → `TW`.
pub fn country_iso(country: &str) -> &str {
    country.split('-').next().unwrap_or(country).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer() -> Layer {
        let mut layer = Layer::new(vec![Field::text("COUNTRY"), Field::number("Coef_CIE")]);
        layer
            .push(
                MultiPolygon::new(vec![]),
                vec![AttrValue::text("TW-臺灣"), AttrValue::Number(Some(0.495))],
            )
            .unwrap();
        layer
            .push(
                MultiPolygon::new(vec![]),
                vec![AttrValue::text("JP-日本"), AttrValue::Text(Some("0.45".into()))],
            )
            .unwrap();
        layer
    }

    #[test]
    fn test_push_coerces_to_field_kind() {
        let layer = layer();
        assert_eq!(layer.number(1, "Coef_CIE"), Some(0.45));
        assert_eq!(
            layer.value(1, "Coef_CIE"),
            Some(&AttrValue::Number(Some(0.45)))
        );
    }

    #[test]
    fn test_push_rejects_wrong_length() {
        let mut layer = layer();
        let err = layer.push(MultiPolygon::new(vec![]), vec![AttrValue::text("x")]);
        assert!(matches!(err, Err(LayerError::LengthMismatch { .. })));
    }

    #[test]
    fn test_set_field_adds_and_overwrites() {
        let mut layer = layer();
        layer
            .set_field(
                Field::number("EUI_01"),
                vec![AttrValue::Number(Some(1.0)), AttrValue::Number(None)],
            )
            .unwrap();
        assert_eq!(layer.fields.len(), 3);
        layer.fill_field(Field::number("EUI_01"), &AttrValue::Number(Some(5.0)));
        assert_eq!(layer.fields.len(), 3);
        assert_eq!(layer.number(1, "EUI_01"), Some(5.0));
    }

    #[test]
    fn test_select_reorders() {
        let mut layer = layer();
        layer.select(&["Coef_CIE", "COUNTRY"]).unwrap();
        assert_eq!(layer.field_names().collect::<Vec<_>>(), ["Coef_CIE", "COUNTRY"]);
        assert_eq!(layer.text(0, "COUNTRY"), Some("TW-臺灣"));
        assert!(layer.select(&["REGNAME"]).is_err());
    }

    #[test]
    fn test_round_numbers() {
        let mut layer = layer();
        layer.round_numbers(1);
        assert_eq!(layer.number(0, "Coef_CIE"), Some(0.5));
        assert_eq!(layer.text(0, "COUNTRY"), Some("TW-臺灣"));
    }

    #[test]
    fn test_country_iso() {
        assert_eq!(country_iso("TW-臺灣"), "TW");
        assert_eq!(country_iso("US-美國"), "US");
        assert_eq!(country_iso("GB"), "GB");
    }

    #[test]
    fn test_coerce() {
        assert_eq!(
            AttrValue::Number(Some(5.0)).coerce(FieldKind::Text),
            AttrValue::text("5")
        );
        assert_eq!(
            AttrValue::text("n/a").coerce(FieldKind::Number),
            AttrValue::Number(None)
        );
    }
}

//! Shapefile and attribute-table reading and writing.

use std::collections::HashSet;
use std::path::Path;

use eui_common::{
    TextEncoding, float_column, frame_to_csv_bytes, optional_string_column, round_option,
};
use eui_model::columns::{CLIMATEZONE, COUNTRY};
use geo::MultiPolygon;
use polars::prelude::*;
use shapefile::dbase::{FieldName, FieldType, FieldValue, Record, TableWriterBuilder};
use shapefile::{Shape, ShapeReader};

use crate::crs::{Crs, WGS84_WKT};
use crate::error::{LayerError, Result};
use crate::layer::{AttrValue, Field, FieldKind, Layer};
use crate::sample::SampledPoint;

/// Longest DBF field name in bytes.
pub const MAX_FIELD_NAME_BYTES: usize = 10;

const MAX_CHARACTER_WIDTH: usize = 254;
const NUMERIC_WIDTH: u8 = 24;

/// Field names that DBF truncation shortens and that are restored on read.
const RESTORED_FIELDS: [&str; 1] = [CLIMATEZONE];

fn shapefile_error(path: &Path) -> impl Fn(shapefile::Error) -> LayerError + '_ {
    move |err| LayerError::Shapefile {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn dbase_error(path: &Path) -> impl Fn(shapefile::dbase::Error) -> LayerError + '_ {
    move |err| LayerError::Shapefile {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn io_error(path: &Path) -> impl Fn(std::io::Error) -> LayerError + '_ {
    move |source| LayerError::Io {
        path: path.to_path_buf(),
        source,
    }
}

// === Reading ===

/// Reads a polygon shapefile and its DBF table, normalised to WGS84.
///
/// Null shapes become empty geometries so row counts are preserved.
pub fn read_layer(path: &Path) -> Result<Layer> {
    let crs = Crs::detect(path)?;
    let shapes = ShapeReader::from_path(path)
        .map_err(shapefile_error(path))?
        .read()
        .map_err(shapefile_error(path))?;

    let dbf_path = path.with_extension("dbf");
    let mut table =
        shapefile::dbase::Reader::from_path(&dbf_path).map_err(dbase_error(&dbf_path))?;
    let fields: Vec<Field> = table
        .fields()
        .iter()
        .map(|info| Field {
            name: restore_field_name(info.name()),
            kind: field_kind(info.field_type()),
        })
        .collect();
    let source_names: Vec<String> = table
        .fields()
        .iter()
        .map(|info| info.name().to_string())
        .collect();
    let records = table.read().map_err(dbase_error(&dbf_path))?;
    if records.len() != shapes.len() {
        return Err(LayerError::LengthMismatch {
            target: dbf_path.display().to_string(),
            expected: shapes.len(),
            actual: records.len(),
        });
    }

    let mut layer = Layer::new(fields);
    for (shape, record) in shapes.into_iter().zip(records) {
        let geometry = crs.to_wgs84(shape_geometry(shape, path)?);
        let attributes = source_names
            .iter()
            .zip(&layer.fields)
            .map(|(name, field)| attr_value(record.get(name), field.kind))
            .collect();
        layer.push(geometry, attributes)?;
    }

    tracing::debug!(
        path = %path.display(),
        crs = ?crs,
        features = layer.len(),
        fields = layer.fields.len(),
        "read layer"
    );
    Ok(layer)
}

fn shape_geometry(shape: Shape, path: &Path) -> Result<MultiPolygon<f64>> {
    match shape {
        Shape::NullShape => Ok(MultiPolygon::new(Vec::new())),
        Shape::Polygon(polygon) => Ok(MultiPolygon::from(polygon)),
        Shape::PolygonM(polygon) => Ok(MultiPolygon::from(polygon)),
        Shape::PolygonZ(polygon) => Ok(MultiPolygon::from(polygon)),
        _ => Err(LayerError::Shapefile {
            path: path.to_path_buf(),
            message: "expected polygon shapes".to_string(),
        }),
    }
}

fn field_kind(field_type: FieldType) -> FieldKind {
    match field_type {
        FieldType::Numeric
        | FieldType::Float
        | FieldType::Integer
        | FieldType::Double
        | FieldType::Currency => FieldKind::Number,
        _ => FieldKind::Text,
    }
}

fn attr_value(value: Option<&FieldValue>, kind: FieldKind) -> AttrValue {
    let value = match value {
        None => return AttrValue::missing(kind),
        Some(FieldValue::Character(text)) => AttrValue::Text(
            text.as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        ),
        Some(FieldValue::Memo(text)) => AttrValue::Text(Some(text.clone())),
        Some(FieldValue::Logical(flag)) => AttrValue::Text(flag.map(|b| b.to_string())),
        Some(FieldValue::Numeric(number)) => AttrValue::Number(*number),
        Some(FieldValue::Float(number)) => AttrValue::Number(number.map(f64::from)),
        Some(FieldValue::Integer(number)) => AttrValue::Number(Some(f64::from(*number))),
        Some(FieldValue::Double(number) | FieldValue::Currency(number)) => {
            AttrValue::Number(Some(*number))
        }
        Some(other) => AttrValue::Text(Some(format!("{other:?}"))),
    };
    value.coerce(kind)
}

fn restore_field_name(name: &str) -> String {
    RESTORED_FIELDS
        .iter()
        .find(|full| truncate_field_name(full) == name)
        .map_or_else(|| name.to_string(), |full| (*full).to_string())
}

// === Writing ===

/// Truncates a field name to [`MAX_FIELD_NAME_BYTES`] at a character boundary.
pub fn truncate_field_name(name: &str) -> &str {
    truncate_bytes(name, MAX_FIELD_NAME_BYTES)
}

fn truncate_bytes(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// DBF names for `fields`, truncated and made unique with `_1`, `_2`…
pub fn dbf_field_names<'a>(fields: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut used = HashSet::new();
    let mut names = Vec::new();
    for name in fields {
        let mut candidate = truncate_field_name(name).to_string();
        let mut counter = 1;
        while used.contains(&candidate) {
            let suffix = format!("_{counter}");
            let base = truncate_bytes(name, MAX_FIELD_NAME_BYTES - suffix.len());
            candidate = format!("{base}{suffix}");
            counter += 1;
        }
        if candidate != name {
            tracing::debug!(field = name, dbf = %candidate, "shortened DBF field name");
        }
        used.insert(candidate.clone());
        names.push(candidate);
    }
    names
}

fn field_name(name: &str) -> Result<FieldName> {
    FieldName::try_from(name).map_err(|_| LayerError::InvalidFieldName {
        name: name.to_string(),
    })
}

fn character_width(layer: &Layer, index: usize) -> u8 {
    let widest = layer
        .features
        .iter()
        .filter_map(|feature| feature.attributes[index].display())
        .map(|text| text.len())
        .max()
        .unwrap_or(1);
    u8::try_from(widest.clamp(1, MAX_CHARACTER_WIDTH)).unwrap_or(u8::MAX)
}

fn field_value(value: &AttrValue, digits: u32) -> FieldValue {
    match value {
        AttrValue::Text(text) => FieldValue::Character(
            text.as_deref()
                .map(|t| truncate_bytes(t, MAX_CHARACTER_WIDTH).to_string()),
        ),
        AttrValue::Number(number) => FieldValue::Numeric(round_option(*number, digits)),
    }
}

fn write_sidecars(path: &Path) -> Result<()> {
    let prj = path.with_extension("prj");
    std::fs::write(&prj, WGS84_WKT).map_err(io_error(&prj))?;
    let cpg = path.with_extension("cpg");
    std::fs::write(&cpg, "UTF-8").map_err(io_error(&cpg))?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    Ok(())
}

/// Writes `layer` as a polygon shapefile with a WGS84 `.prj`.
///
/// Numbers are rounded half-to-even to `digits` decimals. Features with
/// empty geometry cannot be stored in a polygon file and are skipped.
pub fn write_layer(layer: &Layer, path: &Path, digits: u32) -> Result<usize> {
    ensure_parent(path)?;
    let names = dbf_field_names(layer.field_names());
    let decimals = u8::try_from(digits).unwrap_or(u8::MAX);

    let mut builder = TableWriterBuilder::new();
    for (index, (field, name)) in layer.fields.iter().zip(&names).enumerate() {
        builder = match field.kind {
            FieldKind::Text => {
                builder.add_character_field(field_name(name)?, character_width(layer, index))
            }
            FieldKind::Number => {
                builder.add_numeric_field(field_name(name)?, NUMERIC_WIDTH, decimals)
            }
        };
    }

    let mut written = 0;
    let mut skipped = 0;
    {
        let mut writer =
            shapefile::Writer::from_path(path, builder).map_err(shapefile_error(path))?;
        for feature in &layer.features {
            if feature.geometry.0.is_empty() {
                skipped += 1;
                continue;
            }
            let polygon = shapefile::Polygon::from(feature.geometry.clone());
            let mut record = Record::default();
            for (name, value) in names.iter().zip(&feature.attributes) {
                record.insert(name.clone(), field_value(value, digits));
            }
            writer
                .write_shape_and_record(&polygon, &record)
                .map_err(shapefile_error(path))?;
            written += 1;
        }
    }
    write_sidecars(path)?;

    if skipped > 0 {
        tracing::warn!(path = %path.display(), skipped, "skipped features without geometry");
    }
    tracing::info!(path = %path.display(), features = written, "wrote layer");
    Ok(written)
}

/// Writes sampled points as a point shapefile carrying `COUNTRY`.
pub fn write_points(points: &[SampledPoint], path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let width = points
        .iter()
        .map(|point| point.country.len())
        .max()
        .unwrap_or(1)
        .clamp(1, MAX_CHARACTER_WIDTH);
    let builder = TableWriterBuilder::new().add_character_field(
        field_name(COUNTRY)?,
        u8::try_from(width).unwrap_or(u8::MAX),
    );
    {
        let mut writer =
            shapefile::Writer::from_path(path, builder).map_err(shapefile_error(path))?;
        for point in points {
            let shape = shapefile::Point::new(point.x, point.y);
            let mut record = Record::default();
            record.insert(
                COUNTRY.to_string(),
                FieldValue::Character(Some(point.country.clone())),
            );
            writer
                .write_shape_and_record(&shape, &record)
                .map_err(shapefile_error(path))?;
        }
    }
    write_sidecars(path)?;
    tracing::info!(path = %path.display(), points = points.len(), "wrote point layer");
    Ok(())
}

// === Attribute Tables ===

/// Attribute table of a layer, geometry dropped.
pub fn attribute_frame(layer: &Layer, digits: u32) -> Result<DataFrame> {
    let columns = layer
        .fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let values = layer.features.iter().map(|f| &f.attributes[index]);
            match field.kind {
                FieldKind::Text => {
                    optional_string_column(&field.name, values.map(AttrValue::display).collect())
                }
                FieldKind::Number => float_column(
                    &field.name,
                    values.map(|v| round_option(v.as_number(), digits)).collect(),
                ),
            }
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Writes a frame as a UTF-8 CSV file.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let (bytes, _) = frame_to_csv_bytes(df, TextEncoding::Utf8)?;
    std::fs::write(path, bytes).map_err(io_error(path))?;
    tracing::info!(path = %path.display(), rows = df.height(), "wrote table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn square(x: f64, y: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
            (x: x, y: y),
        ]])
    }

    #[test]
    fn test_truncate_field_name_at_char_boundary() {
        assert_eq!(truncate_field_name("Coef_CIE"), "Coef_CIE");
        assert_eq!(truncate_field_name("CLIMATEZONE"), "CLIMATEZON");
        // 4 ASCII bytes + 3-byte characters: the third character would end at byte 13
        assert_eq!(truncate_field_name("EUI_溼熱氣候區"), "EUI_溼熱");
    }

    #[test]
    fn test_dbf_field_names_unique() {
        let names = dbf_field_names(["EUI_海洋性熱氣候區", "EUI_海洋性混合氣候區", "COUNTRY"]);
        assert_eq!(names[0], "EUI_海洋");
        assert_ne!(names[0], names[1]);
        assert!(names[1].len() <= MAX_FIELD_NAME_BYTES);
        assert_eq!(names[2], "COUNTRY");
    }

    #[test]
    fn test_restore_field_name() {
        assert_eq!(restore_field_name("CLIMATEZON"), "CLIMATEZONE");
        assert_eq!(restore_field_name("REGNAME"), "REGNAME");
    }

    #[test]
    fn test_write_and_read_layer() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out").join("layer.shp");

        let mut layer = Layer::new(vec![
            Field::text("COUNTRY"),
            Field::text("CLIMATEZONE"),
            Field::number("EUI_01"),
        ]);
        layer
            .push(
                square(120.0, 22.0, 1.0),
                vec![
                    AttrValue::text("TW-臺灣"),
                    AttrValue::Text(None),
                    AttrValue::Number(Some(12.345)),
                ],
            )
            .unwrap();
        layer
            .push(
                MultiPolygon::new(vec![]),
                vec![
                    AttrValue::text("XX-empty"),
                    AttrValue::Text(None),
                    AttrValue::Number(None),
                ],
            )
            .unwrap();

        let written = write_layer(&layer, &path, 1).unwrap();
        assert_eq!(written, 1);
        assert!(path.with_extension("prj").exists());

        let read = read_layer(&path).unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(
            read.field_names().collect::<Vec<_>>(),
            ["COUNTRY", "CLIMATEZONE", "EUI_01"]
        );
        assert_eq!(read.text(0, "COUNTRY"), Some("TW-臺灣"));
        let value = read.number(0, "EUI_01").unwrap();
        assert!((value - 12.3).abs() < 1e-9);
        assert_eq!(read.features[0].geometry.0.len(), 1);
    }

    #[test]
    fn test_attribute_frame() {
        let mut layer = Layer::new(vec![Field::text("COUNTRY"), Field::number("Coef_CIE")]);
        layer
            .push(
                square(0.0, 0.0, 1.0),
                vec![AttrValue::text("JP-日本"), AttrValue::Number(Some(0.4567))],
            )
            .unwrap();
        let mut df = attribute_frame(&layer, 3).unwrap();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("attrs.csv");
        write_csv(&mut df, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "COUNTRY,Coef_CIE\nJP-日本,0.457\n");
    }

    #[test]
    fn test_attribute_frame_missing_text_is_empty() {
        let mut layer = Layer::new(vec![
            Field::text("COUNTRY"),
            Field::text(CLIMATEZONE),
            Field::number("EUI_01"),
        ]);
        layer
            .push(
                square(0.0, 0.0, 1.0),
                vec![
                    AttrValue::Text(None),
                    AttrValue::Text(None),
                    AttrValue::Number(None),
                ],
            )
            .unwrap();
        let mut df = attribute_frame(&layer, 3).unwrap();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("attrs.csv");
        write_csv(&mut df, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "COUNTRY,CLIMATEZONE,EUI_01\n,,\n");
    }
}

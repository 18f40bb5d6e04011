//! Dataset readers.
//!
//! `NcksJsonReader` reads a file by running `ncks --jsn` and parsing its JSON
//! rendering of the dataset. The header is read with `-m` (metadata only) and
//! each variable's data is then read on its own with `-v`, so a reader holds
//! at most one variable's values at a time. Missing values appear as JSON
//! `null` and become masked cells.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use super::error::VerifyError;
use super::types::{AttributeValue, DataType, Dataset, Variable};

/// Reads the structure and contents of one dataset file.
#[async_trait]
pub trait DatasetReader: Send + Sync {
    /// Dimensions, global attributes and variable descriptions. Variable
    /// values may be left empty.
    async fn read_header(&self, path: &Path) -> Result<Dataset, VerifyError>;

    /// One variable, with its values.
    async fn read_variable(&self, path: &Path, name: &str) -> Result<Variable, VerifyError>;
}

/// Reader backed by NCO's JSON output.
pub struct NcksJsonReader {
    program: PathBuf,
}

impl NcksJsonReader {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }

    /// Runs `ncks --jsn {args} path` and parses its stdout in place.
    async fn dump(&self, args: &[&str], path: &Path) -> Result<Dataset, VerifyError> {
        let output = Command::new(&self.program)
            .arg("--jsn")
            .args(args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| VerifyError::read_failed(path, e.to_string()))?;

        if !output.status.success() {
            return Err(VerifyError::read_failed(
                path,
                format!(
                    "{} exited with code {:?}: {}",
                    self.program.display(),
                    output.status.code(),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        parse_ncks_json_bytes(&output.stdout)
    }
}

#[async_trait]
impl DatasetReader for NcksJsonReader {
    async fn read_header(&self, path: &Path) -> Result<Dataset, VerifyError> {
        self.dump(&["-m"], path).await
    }

    async fn read_variable(&self, path: &Path, name: &str) -> Result<Variable, VerifyError> {
        // -C keeps the dump to the named variable, without its coordinates.
        let mut dataset = self.dump(&["-C", "-v", name], path).await?;
        dataset.variables.remove(name).ok_or_else(|| {
            VerifyError::read_failed(path, format!("variable {} missing from dump", name))
        })
    }
}

/// Parses the document printed by `ncks --jsn`.
///
/// Attributes may be printed bare (`"units": "K"`) or typed
/// (`"units": {"type": "char", "data": "K"}`); both are accepted.
pub fn parse_ncks_json(text: &str) -> Result<Dataset, VerifyError> {
    parse_ncks_json_bytes(text.as_bytes())
}

fn parse_ncks_json_bytes(bytes: &[u8]) -> Result<Dataset, VerifyError> {
    let root: Value = serde_json::from_slice(bytes)
        .map_err(|e| VerifyError::parse(format!("invalid JSON: {}", e)))?;
    let root = root
        .as_object()
        .ok_or_else(|| VerifyError::parse("top level is not an object"))?;

    let mut dataset = Dataset::default();

    if let Some(dims) = root.get("dimensions") {
        for (name, len) in as_object(dims, "dimensions")? {
            let len = len
                .as_u64()
                .ok_or_else(|| VerifyError::parse(format!("dimension {} has no length", name)))?;
            dataset.dimensions.insert(name.clone(), len as usize);
        }
    }

    if let Some(attrs) = root.get("attributes") {
        dataset.attributes = parse_attributes(as_object(attrs, "attributes")?)?;
    }

    if let Some(vars) = root.get("variables") {
        for (name, var) in as_object(vars, "variables")? {
            dataset
                .variables
                .insert(name.clone(), parse_variable(name, var)?);
        }
    }

    Ok(dataset)
}

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>, VerifyError> {
    value
        .as_object()
        .ok_or_else(|| VerifyError::parse(format!("{} is not an object", what)))
}

fn parse_attributes(
    attrs: &Map<String, Value>,
) -> Result<BTreeMap<String, AttributeValue>, VerifyError> {
    attrs
        .iter()
        .map(|(name, value)| Ok::<_, VerifyError>((name.clone(), parse_attribute_value(name, value)?)))
        .collect()
}

fn parse_attribute_value(name: &str, value: &Value) -> Result<AttributeValue, VerifyError> {
    match value {
        Value::String(s) => Ok(AttributeValue::Text(s.clone())),
        Value::Number(_) | Value::Array(_) | Value::Null | Value::Bool(_) => {
            let (values, _) = flatten(value, f64::NAN);
            Ok(AttributeValue::Numbers(values))
        }
        Value::Object(obj) => match obj.get("data") {
            Some(data) => parse_attribute_value(name, data),
            None => Err(VerifyError::parse(format!("attribute {} has no data", name))),
        },
    }
}

fn parse_variable(name: &str, var: &Value) -> Result<Variable, VerifyError> {
    let obj = as_object(var, name)?;

    let dtype = match obj.get("type").and_then(Value::as_str) {
        Some(tag) => DataType::from_type_name(tag).ok_or_else(|| {
            VerifyError::parse(format!("variable {} has unsupported type {}", name, tag))
        })?,
        None => DataType::Double,
    };

    let shape = obj
        .get("shape")
        .and_then(Value::as_array)
        .map(|dims| {
            dims.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if dtype.is_character() {
        return Ok(Variable {
            dtype,
            shape,
            values: Vec::new(),
            mask: None,
        });
    }

    let fill = obj
        .get("attributes")
        .and_then(|a| a.get("_FillValue"))
        .and_then(|f| parse_attribute_value("_FillValue", f).ok())
        .and_then(|f| match f {
            AttributeValue::Numbers(v) => v.first().copied(),
            AttributeValue::Text(_) => None,
        })
        .unwrap_or(f64::NAN);

    let (values, mask) = match obj.get("data") {
        Some(data) => flatten(data, fill),
        None => (Vec::new(), Vec::new()),
    };
    let mask = mask.iter().any(|m| *m).then_some(mask);

    Ok(Variable {
        dtype,
        shape,
        values,
        mask,
    })
}

/// Flattens nested arrays row-major. `null` cells take `fill` and are masked.
fn flatten(value: &Value, fill: f64) -> (Vec<f64>, Vec<bool>) {
    fn walk(value: &Value, fill: f64, values: &mut Vec<f64>, mask: &mut Vec<bool>) {
        match value {
            Value::Array(items) => {
                for item in items {
                    walk(item, fill, values, mask);
                }
            }
            Value::Number(n) => {
                values.push(n.as_f64().unwrap_or(f64::NAN));
                mask.push(false);
            }
            Value::Bool(b) => {
                values.push(if *b { 1.0 } else { 0.0 });
                mask.push(false);
            }
            Value::Null => {
                values.push(fill);
                mask.push(true);
            }
            Value::String(_) | Value::Object(_) => {}
        }
    }

    let mut values = Vec::new();
    let mut mask = Vec::new();
    walk(value, fill, &mut values, &mut mask);
    (values, mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
      "attributes": {
        "Conventions": "CF-1.0",
        "case_id": {"type": "int", "data": 7},
        "levels": {"type": "double", "data": [1.0, 2.5]}
      },
      "dimensions": {
        "lat": 2,
        "time": 2
      },
      "variables": {
        "TS": {
          "shape": ["time", "lat"],
          "type": "float",
          "attributes": {"_FillValue": {"type": "float", "data": 1e36}},
          "data": [[280.5, null], [281.0, 282.0]]
        },
        "date_written": {
          "shape": ["time"],
          "type": "char",
          "data": ["01/01/00", "01/02/00"]
        },
        "nsteph": {
          "type": "int",
          "data": 48
        }
      }
    }"#;

    #[test]
    fn test_parse_dimensions_and_attributes() {
        let ds = parse_ncks_json(SAMPLE).unwrap();
        assert_eq!(ds.dimensions.get("lat"), Some(&2));
        assert_eq!(ds.dimensions.len(), 2);
        assert_eq!(
            ds.attributes.get("Conventions"),
            Some(&AttributeValue::Text("CF-1.0".into()))
        );
        assert_eq!(
            ds.attributes.get("case_id"),
            Some(&AttributeValue::Numbers(vec![7.0]))
        );
        assert_eq!(
            ds.attributes.get("levels"),
            Some(&AttributeValue::Numbers(vec![1.0, 2.5]))
        );
    }

    #[test]
    fn test_parse_masked_variable() {
        let ds = parse_ncks_json(SAMPLE).unwrap();
        let ts = &ds.variables["TS"];
        assert_eq!(ts.dtype, DataType::Float);
        assert_eq!(ts.shape, vec!["time".to_string(), "lat".to_string()]);
        assert_eq!(ts.values, vec![280.5, 1e36, 281.0, 282.0]);
        assert_eq!(ts.mask, Some(vec![false, true, false, false]));
    }

    #[test]
    fn test_parse_char_and_scalar_variables() {
        let ds = parse_ncks_json(SAMPLE).unwrap();
        let dw = &ds.variables["date_written"];
        assert_eq!(dw.dtype, DataType::Char);
        assert!(dw.values.is_empty());

        let n = &ds.variables["nsteph"];
        assert_eq!(n.values, vec![48.0]);
        assert!(n.mask.is_none());
        assert!(n.shape.is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_ncks_json("not json"),
            Err(VerifyError::Parse { .. })
        ));
        assert!(matches!(
            parse_ncks_json("[1, 2]"),
            Err(VerifyError::Parse { .. })
        ));
        assert!(matches!(
            parse_ncks_json(r#"{"variables": {"x": {"type": "compound"}}}"#),
            Err(VerifyError::Parse { .. })
        ));
    }

    #[test]
    fn test_parse_empty_document() {
        let ds = parse_ncks_json("{}").unwrap();
        assert_eq!(ds, Dataset::default());
    }
}

//! In-memory description of a gridded dataset, as needed for comparison.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// netCDF primitive element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Byte,
    UByte,
    Short,
    UShort,
    Int,
    UInt,
    Int64,
    UInt64,
    Float,
    Double,
    Char,
    String,
}

impl DataType {
    /// Maps an NCO/CDL type name (`float`, `int64`, `char`, ...) to a type.
    pub fn from_type_name(name: &str) -> Option<Self> {
        let dtype = match name {
            "byte" => Self::Byte,
            "ubyte" => Self::UByte,
            "short" => Self::Short,
            "ushort" => Self::UShort,
            "int" | "long" => Self::Int,
            "uint" => Self::UInt,
            "int64" => Self::Int64,
            "uint64" => Self::UInt64,
            "float" | "real" => Self::Float,
            "double" => Self::Double,
            "char" => Self::Char,
            "string" => Self::String,
            _ => return None,
        };
        Some(dtype)
    }

    /// Character data is not compared numerically.
    pub fn is_character(&self) -> bool {
        matches!(self, Self::Char | Self::String)
    }
}

/// A global or variable attribute value. Compared exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Numbers(Vec<f64>),
}

/// One variable's type and (flattened, row-major) contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub dtype: DataType,
    /// Dimension names, outermost first.
    #[serde(default)]
    pub shape: Vec<String>,
    /// Numeric contents. Empty for character variables.
    #[serde(default)]
    pub values: Vec<f64>,
    /// `true` marks a missing cell. `None` means nothing is masked.
    #[serde(default)]
    pub mask: Option<Vec<bool>>,
}

impl Variable {
    /// A numeric variable with no mask.
    pub fn numeric(dtype: DataType, values: Vec<f64>) -> Self {
        Self {
            dtype,
            shape: Vec::new(),
            values,
            mask: None,
        }
    }

    /// A character variable; its contents are never compared.
    pub fn text() -> Self {
        Self {
            dtype: DataType::Char,
            shape: Vec::new(),
            values: Vec::new(),
            mask: None,
        }
    }

    /// Attaches a mask.
    pub fn with_mask(mut self, mask: Vec<bool>) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Mask with `None` expanded to all-unmasked.
    pub fn mask_or_unmasked(&self) -> Vec<bool> {
        self.mask
            .clone()
            .unwrap_or_else(|| vec![false; self.values.len()])
    }
}

/// Dimensions, global attributes and variables of one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub dimensions: BTreeMap<String, usize>,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
    #[serde(default)]
    pub variables: BTreeMap<String, Variable>,
}

impl Dataset {
    /// Adds a dimension.
    pub fn with_dimension(mut self, name: &str, len: usize) -> Self {
        self.dimensions.insert(name.to_string(), len);
        self
    }

    /// Adds a global attribute.
    pub fn with_attribute(mut self, name: &str, value: AttributeValue) -> Self {
        self.attributes.insert(name.to_string(), value);
        self
    }

    /// Adds a variable.
    pub fn with_variable(mut self, name: &str, variable: Variable) -> Self {
        self.variables.insert(name.to_string(), variable);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(DataType::from_type_name("float"), Some(DataType::Float));
        assert_eq!(DataType::from_type_name("char"), Some(DataType::Char));
        assert_eq!(DataType::from_type_name("compound"), None);
        assert!(DataType::Char.is_character());
        assert!(DataType::String.is_character());
        assert!(!DataType::Double.is_character());
    }

    #[test]
    fn test_mask_or_unmasked() {
        let v = Variable::numeric(DataType::Float, vec![1.0, 2.0]);
        assert_eq!(v.mask_or_unmasked(), vec![false, false]);
        let v = v.with_mask(vec![true, false]);
        assert_eq!(v.mask_or_unmasked(), vec![true, false]);
    }
}

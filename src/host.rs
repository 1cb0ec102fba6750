//! Values exchanged with the host environment.

use bstr::{BString, ByteSlice};
use ndarray::Array2;

use crate::error::{Result, TrainError};
use crate::model::ModelStruct;
use crate::sparse::CscMatrix;

/// A value passed in from, or returned to, the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostArray {
    /// Dense double matrix; a `0x0` matrix is the empty result
    Double(Array2<f64>),
    /// Sparse double matrix
    Sparse(CscMatrix),
    /// Character data, not necessarily UTF-8
    Char(BString),
    /// Dense 32-bit integer matrix
    Int32(Array2<i32>),
    /// Named fields, in host order
    Struct(Vec<(String, HostArray)>),
}

impl HostArray {
    /// The empty sentinel returned on every failure.
    pub fn empty() -> Self {
        HostArray::Double(Array2::zeros((0, 0)))
    }

    /// A `1x1` double.
    pub fn scalar(value: f64) -> Self {
        HostArray::Double(Array2::from_elem((1, 1), value))
    }

    /// A column vector of doubles.
    pub fn column(values: &[f64]) -> Self {
        HostArray::Double(Array2::from_shape_fn((values.len(), 1), |(i, _)| values[i]))
    }

    pub fn text<T: Into<BString>>(text: T) -> Self {
        HostArray::Char(text.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            HostArray::Double(m) => m.is_empty(),
            HostArray::Int32(m) => m.is_empty(),
            HostArray::Sparse(m) => m.nrows() == 0 || m.ncols() == 0,
            HostArray::Char(s) => s.is_empty(),
            HostArray::Struct(fields) => fields.is_empty(),
        }
    }

    /// Double-precision values, dense or sparse.
    pub fn is_double(&self) -> bool {
        matches!(self, HostArray::Double(_) | HostArray::Sparse(_))
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, HostArray::Sparse(_))
    }

    pub fn as_sparse(&self) -> Option<&CscMatrix> {
        match self {
            HostArray::Sparse(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            HostArray::Char(s) => Some(s.as_slice()),
            _ => None,
        }
    }

    /// Look up a struct field by name.
    pub fn field(&self, name: &str) -> Option<&HostArray> {
        match self {
            HostArray::Struct(fields) => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// The scalar held by a `1x1` double.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            HostArray::Double(m) if m.dim() == (1, 1) => Some(m[[0, 0]]),
            _ => None,
        }
    }

    /// Read a dense double argument as a vector.
    ///
    /// The length is the row count; values are taken in column-major
    /// order, so a row vector contributes at most its first element.
    pub fn to_vector(&self, what: &str) -> Result<Vec<f64>> {
        match self {
            HostArray::Double(m) => Ok(m.t().iter().copied().take(m.nrows()).collect()),
            _ => Err(TrainError::Format(format!("{} vector must be dense", what))),
        }
    }
}

impl From<ModelStruct> for HostArray {
    fn from(model: ModelStruct) -> Self {
        let [parameters, nr_class, nr_feature, bias, label, w] = ModelStruct::FIELDS;
        let labels: Vec<f64> = model.label.iter().map(|&l| f64::from(l)).collect();
        HostArray::Struct(vec![
            (parameters.to_string(), HostArray::scalar(f64::from(model.parameters))),
            (nr_class.to_string(), HostArray::scalar(model.nr_class as f64)),
            (nr_feature.to_string(), HostArray::scalar(model.nr_feature as f64)),
            (bias.to_string(), HostArray::scalar(model.bias)),
            (label.to_string(), HostArray::column(&labels)),
            (w.to_string(), HostArray::Double(model.w)),
        ])
    }
}

/// Tokenize host character data on whitespace.
pub(crate) fn tokens(text: &[u8]) -> Result<Vec<&str>> {
    text.fields()
        .map(|field| {
            field
                .to_str()
                .map_err(|_| TrainError::Parse(format!("invalid option {:?}", field.as_bstr())))
        })
        .collect()
}

use ndarray::Array2;

use crate::error::{Result, TrainError};
use crate::feature::FeatureNode;
use crate::train::SolverType;

/// Read access to a trained linear model.
///
/// Implemented by the model type of a [`Solver`](crate::train::Solver).
pub trait LinearModel {
    fn solver_type(&self) -> SolverType;

    /// Number of classes seen during training
    fn nr_class(&self) -> usize;

    /// Number of features, excluding the bias feature
    fn nr_feature(&self) -> usize;

    fn bias(&self) -> f64;

    /// Class labels, in the solver's internal class order
    fn labels(&self) -> &[i32];

    /// Flat weights; the weight of feature `j` for weight vector `i`
    /// is stored at `j * nr_w + i`.
    fn weights(&self) -> &[f64];

    /// Number of weight vectors; binary problems share a single one
    /// unless the solver is Crammer-Singer.
    fn nr_w(&self) -> usize {
        let nr_class = self.nr_class();
        if nr_class == 2 && self.solver_type() != SolverType::McsvmCs {
            1
        } else {
            nr_class
        }
    }

    /// Predict the label of one instance.
    fn predict(&self, x: &[FeatureNode]) -> i32 {
        let nr_w = self.nr_w();
        let n = if self.bias() >= 0.0 {
            self.nr_feature() + 1
        } else {
            self.nr_feature()
        };
        let w = self.weights();
        let labels = self.labels();

        let mut dec_values = vec![0.0; nr_w];
        for feature in x.iter().take_while(|f| !f.is_terminator()) {
            let idx = feature.index as usize;
            if idx == 0 || idx > n {
                continue;
            }
            for (i, dec) in dec_values.iter_mut().enumerate() {
                if let Some(wk) = w.get((idx - 1) * nr_w + i) {
                    *dec += wk * feature.value;
                }
            }
        }

        let best = if nr_w == 1 {
            if dec_values[0] > 0.0 {
                0
            } else {
                1
            }
        } else {
            dec_values
                .iter()
                .enumerate()
                .fold(0, |best, (i, &v)| if v > dec_values[best] { i } else { best })
        };
        labels.get(best).copied().unwrap_or(0)
    }
}

/// A trained model converted into the host's struct layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelStruct {
    /// Solver type code
    pub parameters: i32,
    pub nr_class: usize,
    pub nr_feature: usize,
    pub bias: f64,
    pub label: Vec<i32>,
    /// One row per weight vector, one column per feature (plus bias)
    pub w: Array2<f64>,
}

impl ModelStruct {
    /// Field names, in host order
    pub const FIELDS: [&'static str; 6] =
        ["Parameters", "nr_class", "nr_feature", "bias", "Label", "w"];

    /// Copy a trained model into host layout.
    pub fn from_model<M: LinearModel + ?Sized>(model: &M) -> Result<Self> {
        let nr_class = model.nr_class();
        let labels = model.labels();
        if labels.len() != nr_class {
            return Err(TrainError::Conversion(format!(
                "model has {} labels for {} classes",
                labels.len(),
                nr_class
            )));
        }

        let nr_w = model.nr_w();
        let n = if model.bias() >= 0.0 {
            model.nr_feature() + 1
        } else {
            model.nr_feature()
        };

        let flat = model.weights();
        if flat.len() != nr_w * n {
            return Err(TrainError::Conversion(format!(
                "expected {} weights ({} x {}), found {}",
                nr_w * n,
                nr_w,
                n,
                flat.len()
            )));
        }
        let w = Array2::from_shape_fn((nr_w, n), |(i, j)| flat[j * nr_w + i]);

        Ok(Self {
            parameters: model.solver_type().code(),
            nr_class,
            nr_feature: model.nr_feature(),
            bias: model.bias(),
            label: labels.to_vec(),
            w,
        })
    }
}

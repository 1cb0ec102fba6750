//! Training problems in sparse feature-list form.

use crate::error::{Result, TrainError};
use crate::feature::FeatureNode;
use crate::sparse::CscMatrix;

/// A labeled training problem.
///
/// All feature lists live in one shared arena; instance `i` starts at
/// `offsets[i]` and runs up to and including its terminator.
#[derive(Debug, Clone)]
pub struct Problem {
    /// Feature dimension, counting the bias feature when present
    n: usize,
    bias: f64,
    labels: Vec<i32>,
    weights: Vec<f64>,
    offsets: Vec<usize>,
    x_space: Vec<FeatureNode>,
}

impl Problem {
    /// Build a problem from a matrix whose columns are instances.
    ///
    /// `weights` may be empty, meaning every instance weighs 1.0. Label
    /// values are truncated to integer class labels. When `bias >= 0`
    /// every instance gets an extra feature `nrows + 1` with value `bias`.
    pub fn from_csc(
        weights: &[f64],
        labels: &[f64],
        instances: &CscMatrix,
        bias: f64,
    ) -> Result<Self> {
        let l = instances.ncols();
        if !weights.is_empty() && weights.len() != l {
            return Err(TrainError::DimensionMismatch {
                what: "weight",
                expected: l,
                found: weights.len(),
            });
        }
        if labels.len() != l {
            return Err(TrainError::DimensionMismatch {
                what: "label",
                expected: l,
                found: labels.len(),
            });
        }

        let max_index = instances.nrows();
        let bias_index = i32::try_from(max_index + 1).map_err(|_| {
            TrainError::Format(format!("too many features: {}", max_index))
        })?;

        // One extra slot per instance for the bias, one for the terminator
        let elements = instances.nnz() + 2 * l;
        let mut x_space = Vec::with_capacity(elements);
        let mut offsets = Vec::with_capacity(l);
        let mut y = Vec::with_capacity(l);
        let mut w = Vec::with_capacity(l);

        for i in 0..l {
            offsets.push(x_space.len());
            y.push(labels[i] as i32);
            w.push(weights.get(i).copied().unwrap_or(1.0));
            // bias_index fits in i32, so every row index below it does too
            x_space.extend(
                instances
                    .column(i)
                    .map(|(row, value)| FeatureNode::new(row as i32 + 1, value)),
            );
            if bias >= 0.0 {
                x_space.push(FeatureNode::new(bias_index, bias));
            }
            x_space.push(FeatureNode::TERMINATOR);
        }
        debug_assert!(x_space.len() <= elements);

        let n = if bias >= 0.0 { max_index + 1 } else { max_index };
        log::debug!(
            "built problem: l = {}, n = {}, {} feature nodes",
            l,
            n,
            x_space.len()
        );

        Ok(Self {
            n,
            bias,
            labels: y,
            weights: w,
            offsets,
            x_space,
        })
    }

    /// Number of instances
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Feature dimension, including the bias feature when present
    pub fn num_features(&self) -> usize {
        self.n
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn labels(&self) -> &[i32] {
        &self.labels
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Features of instance `i`, including its terminator.
    pub fn nodes(&self, i: usize) -> &[FeatureNode] {
        let start = self.offsets[i];
        let end = match self.offsets.get(i + 1) {
            Some(&next) => next,
            None => self.x_space.len(),
        };
        &self.x_space[start..end]
    }

    /// Features of instance `i`, without its terminator.
    pub fn instance(&self, i: usize) -> &[FeatureNode] {
        let nodes = self.nodes(i);
        &nodes[..nodes.len() - 1]
    }

    /// Iterate over every instance's features, without terminators.
    pub fn instances(&self) -> impl Iterator<Item = &[FeatureNode]> + '_ {
        (0..self.len()).map(move |i| self.instance(i))
    }

    /// The shared feature arena
    pub fn x_space(&self) -> &[FeatureNode] {
        &self.x_space
    }

    /// Start of every instance within [`Problem::x_space`]
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// A new problem holding the given instances, in the given order.
    ///
    /// Feature dimension and bias are inherited unchanged.
    pub fn subset(&self, indices: &[usize]) -> Problem {
        let mut x_space = Vec::with_capacity(indices.iter().map(|&i| self.nodes(i).len()).sum());
        let mut offsets = Vec::with_capacity(indices.len());
        for &i in indices {
            offsets.push(x_space.len());
            x_space.extend_from_slice(self.nodes(i));
        }
        Problem {
            n: self.n,
            bias: self.bias,
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            weights: indices.iter().map(|&i| self.weights[i]).collect(),
            offsets,
            x_space,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> CscMatrix {
        CscMatrix::from_triplets(2, 3, &[(0, 0, 1.0), (1, 1, 2.0), (0, 2, 3.0)]).unwrap()
    }

    #[test]
    fn test_from_csc_without_bias() {
        let prob = Problem::from_csc(&[], &[1.0, -1.0, 1.0], &matrix(), -1.0).unwrap();
        assert_eq!(prob.len(), 3);
        assert_eq!(prob.num_features(), 2);
        assert_eq!(prob.labels(), &[1, -1, 1]);
        assert_eq!(prob.weights(), &[1.0, 1.0, 1.0]);
        assert_eq!(
            prob.nodes(0),
            &[FeatureNode::new(1, 1.0), FeatureNode::TERMINATOR]
        );
        assert_eq!(
            prob.nodes(1),
            &[FeatureNode::new(2, 2.0), FeatureNode::TERMINATOR]
        );
        assert_eq!(
            prob.nodes(2),
            &[FeatureNode::new(1, 3.0), FeatureNode::TERMINATOR]
        );
        assert_eq!(prob.offsets(), &[0, 2, 4]);
    }

    #[test]
    fn test_from_csc_with_bias() {
        let prob = Problem::from_csc(&[], &[1.0, -1.0, 1.0], &matrix(), 1.0).unwrap();
        assert_eq!(prob.num_features(), 3);
        assert_eq!(
            prob.instance(1),
            &[FeatureNode::new(2, 2.0), FeatureNode::new(3, 1.0)]
        );
        assert_eq!(prob.x_space().len(), 9);
    }

    #[test]
    fn test_labels_are_truncated() {
        let prob = Problem::from_csc(&[], &[1.9, -1.7, 0.2], &matrix(), -1.0).unwrap();
        assert_eq!(prob.labels(), &[1, -1, 0]);
    }

    #[test]
    fn test_instance_weights() {
        let prob = Problem::from_csc(&[0.5, 2.0, 1.0], &[1.0, 2.0, 3.0], &matrix(), -1.0).unwrap();
        assert_eq!(prob.weights(), &[0.5, 2.0, 1.0]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = Problem::from_csc(&[1.0], &[1.0, 2.0, 3.0], &matrix(), -1.0).unwrap_err();
        assert_eq!(
            err,
            TrainError::DimensionMismatch {
                what: "weight",
                expected: 3,
                found: 1
            }
        );
        let err = Problem::from_csc(&[], &[1.0, 2.0], &matrix(), -1.0).unwrap_err();
        assert!(matches!(
            err,
            TrainError::DimensionMismatch { what: "label", .. }
        ));
    }

    #[test]
    fn test_empty_instance_keeps_feature_space() {
        let m = CscMatrix::from_triplets(5, 2, &[(4, 1, 1.0)]).unwrap();
        let prob = Problem::from_csc(&[], &[1.0, 2.0], &m, 0.5).unwrap();
        assert_eq!(prob.num_features(), 6);
        assert_eq!(prob.instance(0), &[FeatureNode::new(6, 0.5)]);
    }

    #[test]
    fn test_subset() {
        let prob = Problem::from_csc(&[0.5, 2.0, 1.0], &[1.0, -1.0, 1.0], &matrix(), 1.0).unwrap();
        let sub = prob.subset(&[2, 0]);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.num_features(), 3);
        assert_eq!(sub.labels(), &[1, 1]);
        assert_eq!(sub.weights(), &[1.0, 0.5]);
        assert_eq!(sub.nodes(0), prob.nodes(2));
        assert_eq!(sub.nodes(1), prob.nodes(0));
    }
}

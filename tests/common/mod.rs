#![allow(dead_code)]

use std::cell::RefCell;
use std::sync::{Arc, Mutex};

use lintrain::train::{Parameter, SolverType};
use lintrain::{CscMatrix, LinearModel, Output, Problem, Solver};

/// Model whose weights are the signed sum of the training instances.
pub struct SumModel {
    solver_type: SolverType,
    labels: Vec<i32>,
    w: Vec<f64>,
    nr_feature: usize,
    bias: f64,
}

impl LinearModel for SumModel {
    fn solver_type(&self) -> SolverType {
        self.solver_type
    }

    fn nr_class(&self) -> usize {
        self.labels.len()
    }

    fn nr_feature(&self) -> usize {
        self.nr_feature
    }

    fn bias(&self) -> f64 {
        self.bias
    }

    fn labels(&self) -> &[i32] {
        &self.labels
    }

    fn weights(&self) -> &[f64] {
        &self.w
    }
}

/// One-pass solver that adds up instances per class.
///
/// Good enough to separate the well-separated toy data used in the tests,
/// and records the size of every problem it was trained on.
#[derive(Default)]
pub struct SumSolver {
    pub trained_sizes: RefCell<Vec<usize>>,
}

impl Solver for SumSolver {
    type Model = SumModel;

    fn train(&self, prob: &Problem, param: &Parameter, out: &dyn Output) -> SumModel {
        self.trained_sizes.borrow_mut().push(prob.len());
        out.emit(&format!("training on {} instances\n", prob.len()));

        let mut labels = Vec::new();
        for &y in prob.labels() {
            if !labels.contains(&y) {
                labels.push(y);
            }
        }
        let nr_w = if labels.len() == 2 && param.solver_type() != SolverType::McsvmCs {
            1
        } else {
            labels.len()
        };

        let n = prob.num_features();
        let mut w = vec![0.0; n * nr_w];
        for (i, x) in prob.instances().enumerate() {
            let y = prob.labels()[i];
            let scale = param.c_for(y) * prob.weights()[i];
            for k in 0..nr_w {
                let sign = if y == labels[k] { 1.0 } else { -1.0 };
                for f in x {
                    w[(f.index as usize - 1) * nr_w + k] += sign * scale * f.value;
                }
            }
        }

        let nr_feature = if prob.bias() >= 0.0 { n - 1 } else { n };
        SumModel {
            solver_type: param.solver_type(),
            labels,
            w,
            nr_feature,
            bias: prob.bias(),
        }
    }
}

/// Solver whose models are one weight short, so they cannot be converted.
#[derive(Default)]
pub struct ShortWeightSolver {
    pub inner: SumSolver,
}

impl Solver for ShortWeightSolver {
    type Model = SumModel;

    fn train(&self, prob: &Problem, param: &Parameter, out: &dyn Output) -> SumModel {
        let mut model = self.inner.train(prob, param, out);
        model.w.pop();
        model
    }
}

/// Sink collecting everything emitted.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<String>>);

impl Capture {
    pub fn text(&self) -> String {
        self.0.lock().unwrap().clone()
    }
}

impl Output for Capture {
    fn emit(&self, text: &str) {
        self.0.lock().unwrap().push_str(text);
    }
}

/// Two well separated classes: label 1 lives on feature 1, label -1 on feature 2.
///
/// Columns are instances.
pub fn separable(per_class: usize) -> (CscMatrix, Vec<f64>) {
    let mut triplets = Vec::new();
    let mut labels = Vec::new();
    for i in 0..per_class {
        triplets.push((0, 2 * i, 1.0 + i as f64 * 0.1));
        labels.push(1.0);
        triplets.push((1, 2 * i + 1, 1.0 + i as f64 * 0.2));
        labels.push(-1.0);
    }
    let matrix = CscMatrix::from_triplets(2, 2 * per_class, &triplets).unwrap();
    (matrix, labels)
}

use lintrain::train::{Parameter, SolverType};
use lintrain::{CscMatrix, HostArray, LinearModel, Output, Problem, Session, Solver, Stdout};

/// Perceptron model, one weight vector per class (or a single one for two classes).
struct PerceptronModel {
    solver_type: SolverType,
    labels: Vec<i32>,
    w: Vec<f64>,
    nr_feature: usize,
    bias: f64,
}

impl LinearModel for PerceptronModel {
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

/// Toy one-vs-rest perceptron standing in for a real optimizer.
struct Perceptron {
    epochs: usize,
}

impl Solver for Perceptron {
    type Model = PerceptronModel;

    fn train(&self, prob: &Problem, param: &Parameter, out: &dyn Output) -> PerceptronModel {
        let mut labels = Vec::new();
        for &y in prob.labels() {
            if !labels.contains(&y) {
                labels.push(y);
            }
        }
        let nr_w = if labels.len() == 2 { 1 } else { labels.len() };
        let n = prob.num_features();
        let mut w = vec![0.0; n * nr_w];

        for epoch in 0..self.epochs {
            let mut mistakes = 0;
            for (x, &y) in prob.instances().zip(prob.labels()) {
                for k in 0..nr_w {
                    let target = if y == labels[k] { 1.0 } else { -1.0 };
                    let score: f64 = x
                        .iter()
                        .map(|f| w[(f.index as usize - 1) * nr_w + k] * f.value)
                        .sum();
                    if score * target <= 0.0 {
                        mistakes += 1;
                        let step = target * param.c_for(y).min(1.0);
                        for f in x {
                            w[(f.index as usize - 1) * nr_w + k] += step * f.value;
                        }
                    }
                }
            }
            if mistakes == 0 {
                out.emit(&format!("converged after {} epochs\n", epoch + 1));
                break;
            }
        }

        let nr_feature = if prob.bias() >= 0.0 { n - 1 } else { n };
        PerceptronModel {
            solver_type: param.solver_type(),
            labels,
            w,
            nr_feature,
            bias: prob.bias(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Linear Training Example");
    println!("=======================\n");

    // Six instances (rows) over three features
    let instances = CscMatrix::from_triplets(
        6,
        3,
        &[
            (0, 0, 1.0),
            (0, 2, 0.2),
            (1, 0, 0.9),
            (2, 0, 1.1),
            (2, 1, 0.1),
            (3, 1, 1.0),
            (4, 1, 0.8),
            (4, 2, 0.3),
            (5, 1, 1.2),
        ],
    )?;
    let labels = HostArray::column(&[1.0, 1.0, 1.0, -1.0, -1.0, -1.0]);
    let weights = HostArray::column(&[]);

    let mut session = Session::new(Perceptron { epochs: 50 }).with_console(Stdout);

    println!("Training with bias:");
    let model = session.call(&[
        weights.clone(),
        labels.clone(),
        HostArray::Sparse(instances.clone()),
        HostArray::text("-s 2 -B 1"),
    ]);
    if let Some(w) = model.field("w") {
        println!("  w = {:?}", w);
    }

    println!("\nThree-fold cross validation:");
    let accuracy = session.call(&[
        weights,
        labels,
        HostArray::Sparse(instances),
        HostArray::text("-s 2 -B 1 -v 3 -q"),
    ]);
    println!("  accuracy = {:?}", accuracy.as_scalar());

    Ok(())
}

use std::borrow::Cow;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::cross_validation;
use super::options::{InstanceFormat, TrainOptions, USAGE};
use super::solver::Solver;
use crate::error::{Result, TrainError};
use crate::host::HostArray;
use crate::model::ModelStruct;
use crate::output::{Output, Silent};
use crate::problem::Problem;
use crate::sparse::CscMatrix;

/// Seed of the fold shuffling RNG unless configured otherwise
pub const DEFAULT_SEED: u64 = 1;

/// Progress of the current (or last) invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    ParsingOptions,
    BuildingProblem,
    Validating,
    CrossValidating,
    Training,
    Converting,
    Done,
    Failed,
}

/// Result of a successful invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Cross-validation accuracy in percent
    Accuracy(f64),
    /// Trained model, converted for the host
    Model(ModelStruct),
}

impl From<Outcome> for HostArray {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Accuracy(accuracy) => HostArray::scalar(accuracy),
            Outcome::Model(model) => model.into(),
        }
    }
}

/// Owns everything that outlives a single invocation: the solver, the
/// fold shuffling RNG and the console sink.
///
/// Problems and models are created and dropped inside each call, on
/// success and failure alike.
pub struct Session<S: Solver> {
    solver: S,
    rng: StdRng,
    console: Box<dyn Output + Send>,
    stage: Stage,
}

impl<S: Solver> Session<S> {
    /// Create a session with a silent console and the default seed.
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            rng: StdRng::seed_from_u64(DEFAULT_SEED),
            console: Box::new(Silent),
            stage: Stage::Idle,
        }
    }

    /// Reseed the fold shuffling RNG (builder pattern)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Send usage, diagnostics and reports to `console` (builder pattern)
    pub fn with_console<O: Output + Send + 'static>(mut self, console: O) -> Self {
        self.console = Box::new(console);
        self
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Stage reached by the last invocation
    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn enter(&mut self, stage: Stage) {
        log::debug!("{:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }

    /// Train a model, or estimate its accuracy when `options` request
    /// cross validation.
    pub fn run(
        &mut self,
        weights: &[f64],
        labels: &[f64],
        instances: &CscMatrix,
        format: InstanceFormat,
        options: &TrainOptions,
    ) -> Result<Outcome> {
        let result = self.run_stages(weights, labels, instances, format, options);
        match result {
            Ok(_) => self.enter(Stage::Done),
            Err(ref err) => {
                log::debug!("invocation failed in {:?}: {}", self.stage, err);
                self.enter(Stage::Failed);
            }
        }
        result
    }

    fn run_stages(
        &mut self,
        weights: &[f64],
        labels: &[f64],
        instances: &CscMatrix,
        format: InstanceFormat,
        options: &TrainOptions,
    ) -> Result<Outcome> {
        self.enter(Stage::BuildingProblem);
        let columns = match format {
            InstanceFormat::Column => Cow::Borrowed(instances),
            InstanceFormat::Row => Cow::Owned(instances.transpose()),
        };
        let prob = Problem::from_csc(weights, labels, &columns, options.bias)?;
        drop(columns);

        self.enter(Stage::Validating);
        let param = &options.param;
        self.solver
            .check_parameter(&prob, param)
            .map_err(TrainError::ParameterValidation)?;

        // `out` may borrow the console; stages below are set without `enter`
        let quiet = Silent;
        let out: &dyn Output = if options.quiet {
            &quiet
        } else {
            self.console.as_ref()
        };

        match options.nr_fold {
            Some(nr_fold) => {
                self.stage = Stage::CrossValidating;
                log::debug!("cross validating with {} folds", nr_fold);
                let accuracy = cross_validation::accuracy(
                    &self.solver,
                    &prob,
                    param,
                    nr_fold,
                    &mut self.rng,
                    self.console.as_ref(),
                    out,
                )?;
                Ok(Outcome::Accuracy(accuracy))
            }
            None => {
                self.stage = Stage::Training;
                log::debug!("training on {} instances", prob.len());
                let model = self.solver.train(&prob, param, out);
                self.enter(Stage::Converting);
                let converted = ModelStruct::from_model(&model);
                drop(model);
                Ok(Outcome::Model(converted?))
            }
        }
    }

    /// Host entry point:
    /// `(weights, labels, instances [, options [, "col"]])`.
    ///
    /// Never fails; every error is reported on the console and answered
    /// with [`HostArray::empty`].
    pub fn call(&mut self, args: &[HostArray]) -> HostArray {
        match self.invoke(args) {
            Ok(outcome) => outcome.into(),
            Err(err) => {
                self.enter(Stage::Failed);
                self.report(&err);
                HostArray::empty()
            }
        }
    }

    fn invoke(&mut self, args: &[HostArray]) -> Result<Outcome> {
        self.enter(Stage::Idle);
        if !(3..=5).contains(&args.len()) {
            return Err(TrainError::Usage(String::new()));
        }
        if !args[..3].iter().all(HostArray::is_double) {
            return Err(TrainError::Usage(
                "weight vector, label vector and instance matrix must be double".to_string(),
            ));
        }

        self.enter(Stage::ParsingOptions);
        let format = InstanceFormat::from_flag(args.get(4).and_then(HostArray::as_bytes));
        let options = match args.get(3) {
            Some(arg) => {
                let text = arg.as_bytes().ok_or_else(|| {
                    TrainError::Parse("liblinear_options must be a string".to_string())
                })?;
                TrainOptions::parse(text)?
            }
            None => TrainOptions::default(),
        };

        let instances = args[2].as_sparse().ok_or_else(|| {
            TrainError::Format("Training_instance_matrix must be sparse".to_string())
        })?;
        let weights = args[0].to_vector("weight")?;
        let labels = args[1].to_vector("label")?;

        self.run(&weights, &labels, instances, format, &options)
    }

    fn report(&self, err: &TrainError) {
        let message = err.to_string();
        match err {
            TrainError::Parse(_) => self.console.emit(&format!("{}\n", message)),
            _ if !message.is_empty() => self.console.emit(&format!("Error: {}\n", message)),
            _ => {}
        }
        if err.wants_usage() {
            self.console.emit(USAGE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinearModel;
    use crate::train::{Parameter, SolverType};

    struct Constant;

    struct ConstantModel {
        labels: Vec<i32>,
        w: Vec<f64>,
        nr_feature: usize,
        bias: f64,
    }

    impl LinearModel for ConstantModel {
        fn solver_type(&self) -> SolverType {
            SolverType::L2rLr
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

    impl Solver for Constant {
        type Model = ConstantModel;

        fn train(&self, prob: &Problem, _param: &Parameter, out: &dyn Output) -> ConstantModel {
            out.emit("training\n");
            let nr_feature = if prob.bias() >= 0.0 {
                prob.num_features() - 1
            } else {
                prob.num_features()
            };
            ConstantModel {
                labels: vec![1, -1],
                w: vec![0.0; prob.num_features()],
                nr_feature,
                bias: prob.bias(),
            }
        }
    }

    fn matrix() -> CscMatrix {
        CscMatrix::from_triplets(2, 3, &[(0, 0, 1.0), (1, 1, 2.0), (0, 2, 3.0)]).unwrap()
    }

    #[test]
    fn test_run_trains_model() {
        let mut session = Session::new(Constant);
        let opts = TrainOptions::parse("-B 1").unwrap();
        let outcome = session
            .run(&[], &[1.0, -1.0, 1.0], &matrix(), InstanceFormat::Column, &opts)
            .unwrap();
        match outcome {
            Outcome::Model(model) => {
                assert_eq!(model.nr_feature, 2);
                assert_eq!(model.w.dim(), (1, 3));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(session.stage(), Stage::Done);
    }

    #[test]
    fn test_run_transposes_rows() {
        let mut session = Session::new(Constant);
        let opts = TrainOptions::default();
        // Two rows are two instances once transposed
        let outcome = session.run(&[], &[1.0, -1.0], &matrix(), InstanceFormat::Row, &opts);
        match outcome {
            Ok(Outcome::Model(model)) => assert_eq!(model.nr_feature, 3),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_failed_validation() {
        let mut session = Session::new(Constant);
        let opts = TrainOptions::parse("-c 0").unwrap();
        let err = session
            .run(&[], &[1.0, -1.0, 1.0], &matrix(), InstanceFormat::Column, &opts)
            .unwrap_err();
        assert_eq!(err, TrainError::ParameterValidation("C <= 0".to_string()));
        assert_eq!(session.stage(), Stage::Failed);
    }

    #[test]
    fn test_cross_validation_outcome() {
        let mut session = Session::new(Constant);
        let opts = TrainOptions::parse("-v 3").unwrap();
        // The constant model always predicts -1
        let outcome = session
            .run(&[], &[1.0, -1.0, 1.0], &matrix(), InstanceFormat::Column, &opts)
            .unwrap();
        match outcome {
            Outcome::Accuracy(accuracy) => assert!((accuracy - 100.0 / 3.0).abs() < 1e-9),
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}

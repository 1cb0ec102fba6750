use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TrainError};
use crate::host;
use crate::problem::Problem;

/// Help text printed when an invocation is malformed.
pub const USAGE: &str = "\
Usage: model = train(weight_vector, training_label_vector, training_instance_matrix, 'liblinear_options', 'col');
liblinear_options:
-s type : set type of solver (default 1)
	0 -- L2-regularized logistic regression
	1 -- L2-regularized L2-loss support vector classification (dual)
	2 -- L2-regularized L2-loss support vector classification (primal)
	3 -- L2-regularized L1-loss support vector classification (dual)
	4 -- multi-class support vector classification by Crammer and Singer
	5 -- L1-regularized L2-loss support vector classification
	6 -- L1-regularized logistic regression
-c cost : set the parameter C (default 1)
-e epsilon : set tolerance of termination criterion
	-s 0 and 2
		|f'(w)|_2 <= eps*min(pos,neg)/l*|f'(w0)|_2,
		where f is the primal function, (default 0.01)
	-s 1, 3, and 4
		Dual maximal violation <= eps; similar to libsvm (default 0.1)
	-s 5 and 6
		|f'(w)|_inf <= eps*min(pos,neg)/l*|f'(w0)|_inf,
		where f is the primal function (default 0.01)
-B bias : if bias >= 0, instance x becomes [x; bias]; if < 0, no bias term added (default -1)
-wi weight: weights adjust the parameter C of different classes (see README for details)
-v n: n-fold cross validation mode
-q : quiet mode (no outputs)
col:
	if 'col' is set, training_instance_matrix is parsed in column format, otherwise is in row format
";

/// Optimization formulation used by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SolverType {
    /// L2-regularized logistic regression
    L2rLr,
    /// L2-regularized L2-loss support vector classification (dual)
    #[default]
    L2rL2lossSvcDual,
    /// L2-regularized L2-loss support vector classification (primal)
    L2rL2lossSvc,
    /// L2-regularized L1-loss support vector classification (dual)
    L2rL1lossSvcDual,
    /// Multi-class support vector classification by Crammer and Singer
    McsvmCs,
    /// L1-regularized L2-loss support vector classification
    L1rL2lossSvc,
    /// L1-regularized logistic regression
    L1rLr,
}

impl SolverType {
    /// Numeric code used on the command line and in converted models
    pub fn code(self) -> i32 {
        match self {
            Self::L2rLr => 0,
            Self::L2rL2lossSvcDual => 1,
            Self::L2rL2lossSvc => 2,
            Self::L2rL1lossSvcDual => 3,
            Self::McsvmCs => 4,
            Self::L1rL2lossSvc => 5,
            Self::L1rLr => 6,
        }
    }

    /// Termination tolerance used when none is given.
    pub fn default_epsilon(self) -> f64 {
        match self {
            Self::L2rLr | Self::L2rL2lossSvc | Self::L1rL2lossSvc | Self::L1rLr => 0.01,
            Self::L2rL2lossSvcDual | Self::L2rL1lossSvcDual | Self::McsvmCs => 0.1,
        }
    }
}

impl TryFrom<i32> for SolverType {
    type Error = TrainError;

    fn try_from(code: i32) -> Result<Self> {
        Ok(match code {
            0 => Self::L2rLr,
            1 => Self::L2rL2lossSvcDual,
            2 => Self::L2rL2lossSvc,
            3 => Self::L2rL1lossSvcDual,
            4 => Self::McsvmCs,
            5 => Self::L1rL2lossSvc,
            6 => Self::L1rLr,
            _ => return Err(TrainError::Parse(format!("unknown solver type {}", code))),
        })
    }
}

impl fmt::Display for SolverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Multiplier applied to `C` for one class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassWeight {
    pub label: i32,
    pub weight: f64,
}

/// Solver parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    solver_type: SolverType,
    c: f64,
    eps: f64,
    class_weights: Vec<ClassWeight>,
}

impl Default for Parameter {
    fn default() -> Self {
        let solver_type = SolverType::default();
        Self {
            solver_type,
            c: 1.0,
            eps: solver_type.default_epsilon(),
            class_weights: Vec::new(),
        }
    }
}

impl Parameter {
    pub fn solver_type(&self) -> SolverType {
        self.solver_type
    }

    /// Set the solver type, keeping the current tolerance.
    pub fn set_solver_type(&mut self, solver_type: SolverType) {
        self.solver_type = solver_type;
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn set_c(&mut self, c: f64) {
        self.c = c;
    }

    /// Termination tolerance
    pub fn eps(&self) -> f64 {
        self.eps
    }

    pub fn set_eps(&mut self, eps: f64) {
        self.eps = eps;
    }

    /// Per-class `C` multipliers, in the order they were given
    pub fn class_weights(&self) -> &[ClassWeight] {
        &self.class_weights
    }

    pub fn push_class_weight(&mut self, label: i32, weight: f64) {
        self.class_weights.push(ClassWeight { label, weight });
    }

    /// Effective `C` for instances of class `label`.
    pub fn c_for(&self, label: i32) -> f64 {
        self.class_weights
            .iter()
            .filter(|cw| cw.label == label)
            .fold(self.c, |c, cw| c * cw.weight)
    }

    /// Check the parameters against a problem.
    ///
    /// Returns the first violated constraint as a message.
    pub fn check(&self, prob: &Problem) -> std::result::Result<(), String> {
        if self.eps <= 0.0 {
            return Err("eps <= 0".to_string());
        }
        if self.c <= 0.0 {
            return Err("C <= 0".to_string());
        }
        if prob.is_empty() {
            return Err("no training instances".to_string());
        }
        Ok(())
    }
}

/// Layout of the instance matrix handed over by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstanceFormat {
    /// One instance per row; transposed before use
    #[default]
    Row,
    /// One instance per column
    Column,
}

impl InstanceFormat {
    /// Interpret the optional format argument; only `col` selects columns.
    pub fn from_flag(flag: Option<&[u8]>) -> Self {
        match flag {
            Some(b"col") => InstanceFormat::Column,
            _ => InstanceFormat::Row,
        }
    }
}

/// Everything configurable through the option string.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainOptions {
    pub param: Parameter,
    /// Bias feature value; negative disables the bias feature
    pub bias: f64,
    /// Number of cross-validation folds, when cross validation was requested
    pub nr_fold: Option<usize>,
    /// Suppress solver output
    pub quiet: bool,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            param: Parameter::default(),
            bias: -1.0,
            nr_fold: None,
            quiet: false,
        }
    }
}

impl TrainOptions {
    /// Parse an option string such as `-s 0 -c 10 -v 5`.
    ///
    /// Parsing stops at the first token not starting with `-`. The
    /// tolerance falls back to the solver's default unless `-e` is given.
    pub fn parse<T: AsRef<[u8]> + ?Sized>(options: &T) -> Result<Self> {
        let tokens = host::tokens(options.as_ref())?;
        let mut opts = TrainOptions::default();
        let mut eps: Option<f64> = None;

        let mut iter = tokens.into_iter();
        while let Some(flag) = iter.next() {
            let name = match flag.strip_prefix('-') {
                Some(name) => name,
                None => {
                    log::debug!("ignoring options from {:?} on", flag);
                    break;
                }
            };
            if name == "q" {
                opts.quiet = true;
                continue;
            }
            let value = iter
                .next()
                .ok_or_else(|| TrainError::Parse(format!("option {} requires a value", flag)))?;

            match name {
                "s" => {
                    let code: i32 = parse_value(flag, value)?;
                    opts.param.solver_type = SolverType::try_from(code)?;
                }
                "c" => opts.param.c = parse_value(flag, value)?,
                "e" => eps = Some(parse_value(flag, value)?),
                "B" => opts.bias = parse_value(flag, value)?,
                "v" => {
                    let nr_fold: i64 = parse_value(flag, value)?;
                    if nr_fold < 2 {
                        return Err(TrainError::Parse(
                            "n-fold cross validation: n must >= 2".to_string(),
                        ));
                    }
                    opts.nr_fold = Some(usize::try_from(nr_fold).map_err(|_| {
                        TrainError::Parse(format!("too many folds: {}", nr_fold))
                    })?);
                }
                _ if name.starts_with('w') => {
                    let label = name[1..].parse::<i32>().map_err(|_| {
                        TrainError::Parse(format!("invalid class label in option {}", flag))
                    })?;
                    let weight: f64 = parse_value(flag, value)?;
                    opts.param.push_class_weight(label, weight);
                }
                _ => return Err(TrainError::Parse(format!("unknown option {}", flag))),
            }
        }

        opts.param.eps = eps.unwrap_or_else(|| opts.param.solver_type.default_epsilon());
        Ok(opts)
    }
}

impl FromStr for TrainOptions {
    type Err = TrainError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn parse_value<T: FromStr>(flag: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| TrainError::Parse(format!("invalid value {:?} for option {}", value, flag)))
}

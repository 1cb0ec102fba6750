//! Problem construction and training orchestration for linear classifiers
//!
//! This library turns a labeled sparse matrix into liblinear-style
//! feature lists, parses liblinear option strings, and drives a
//! [`Solver`](train::Solver) through a single training run or an n-fold
//! cross validation. The optimizers themselves are supplied by the caller.
//!
//! # Examples
//!
//! ## Building a problem
//!
//! ```
//! use lintrain::{CscMatrix, FeatureNode, Problem};
//!
//! // Columns are instances, rows are features
//! let matrix = CscMatrix::from_triplets(2, 3, &[(0, 0, 1.0), (1, 1, 2.0), (0, 2, 3.0)])?;
//! let prob = Problem::from_csc(&[], &[1.0, -1.0, 1.0], &matrix, 1.0)?;
//!
//! assert_eq!(prob.num_features(), 3);
//! assert_eq!(prob.instance(1), &[FeatureNode::new(2, 2.0), FeatureNode::new(3, 1.0)]);
//! # Ok::<(), lintrain::TrainError>(())
//! ```
//!
//! ## Parsing options
//!
//! ```
//! use lintrain::train::{SolverType, TrainOptions};
//!
//! let opts: TrainOptions = "-s 0 -c 10 -v 5".parse()?;
//! assert_eq!(opts.param.solver_type(), SolverType::L2rLr);
//! assert_eq!(opts.param.eps(), 0.01);
//! assert_eq!(opts.nr_fold, Some(5));
//! # Ok::<(), lintrain::TrainError>(())
//! ```

mod error;
mod feature;
mod host;
mod model;
mod output;
mod problem;
mod sparse;

/// Training module containing option parsing, solver interface and orchestration
pub mod train;

// Re-export main types
pub use self::error::{Result, TrainError};
pub use self::feature::FeatureNode;
pub use self::host::HostArray;
pub use self::model::{LinearModel, ModelStruct};
pub use self::output::{Output, Silent, Stdout};
pub use self::problem::Problem;
pub use self::sparse::CscMatrix;

// Re-export training types for convenience
pub use self::train::{Session, Solver, TrainOptions};

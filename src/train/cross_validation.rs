use rand::rngs::StdRng;

use super::options::Parameter;
use super::solver::Solver;
use crate::error::{Result, TrainError};
use crate::output::Output;
use crate::problem::Problem;

/// Run `nr_fold`-fold cross validation and report the accuracy in percent.
///
/// The report goes to `console`, solver progress to `out`.
pub fn accuracy<S: Solver + ?Sized>(
    solver: &S,
    prob: &Problem,
    param: &Parameter,
    nr_fold: usize,
    rng: &mut StdRng,
    console: &dyn Output,
    out: &dyn Output,
) -> Result<f64> {
    if nr_fold < 2 {
        return Err(TrainError::Parse(
            "n-fold cross validation: n must >= 2".to_string(),
        ));
    }
    if prob.is_empty() {
        return Err(TrainError::ParameterValidation(
            "no training instances".to_string(),
        ));
    }

    let target = solver.cross_validation(prob, param, nr_fold, rng, out);
    if target.len() != prob.len() {
        return Err(TrainError::ParameterValidation(format!(
            "cross validation returned {} predictions for {} instances",
            target.len(),
            prob.len()
        )));
    }
    let total_correct = target
        .iter()
        .zip(prob.labels())
        .filter(|(predicted, label)| predicted == label)
        .count();

    let accuracy = 100.0 * total_correct as f64 / prob.len() as f64;
    console.emit(&format!(
        "Cross Validation Accuracy = {}%\n",
        format_general(accuracy)
    ));
    Ok(accuracy)
}

/// Six significant digits without trailing zeros.
fn format_general(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{}", value);
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (5 - magnitude).max(0) as usize;
    let text = format!("{:.*}", decimals, value);
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_general() {
        assert_eq!(format_general(100.0), "100");
        assert_eq!(format_general(200.0 / 3.0), "66.6667");
        assert_eq!(format_general(50.0), "50");
        assert_eq!(format_general(12.5), "12.5");
        assert_eq!(format_general(0.0), "0");
    }
}

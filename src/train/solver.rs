use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::options::Parameter;
use crate::model::LinearModel;
use crate::output::Output;
use crate::problem::Problem;

/// Optimization backend that turns a problem into a linear model.
pub trait Solver {
    type Model: LinearModel;

    /// Check parameters against a problem before any training happens.
    fn check_parameter(&self, prob: &Problem, param: &Parameter) -> Result<(), String> {
        param.check(prob)
    }

    /// Train a model; progress text goes to `out`.
    fn train(&self, prob: &Problem, param: &Parameter, out: &dyn Output) -> Self::Model;

    /// Predict every instance of `prob` with a model trained on the other folds.
    ///
    /// Instances are shuffled with `rng` and split into `nr_fold`
    /// contiguous folds. More folds than instances falls back to
    /// leave-one-out.
    fn cross_validation(
        &self,
        prob: &Problem,
        param: &Parameter,
        nr_fold: usize,
        rng: &mut StdRng,
        out: &dyn Output,
    ) -> Vec<i32> {
        let l = prob.len();
        if l == 0 || nr_fold == 0 {
            return Vec::new();
        }
        let nr_fold = if nr_fold > l {
            out.emit("WARNING: # folds > # data. Will use # folds = # data instead (i.e., leave-one-out cross validation)\n");
            l
        } else {
            nr_fold
        };

        let mut perm: Vec<usize> = (0..l).collect();
        perm.shuffle(rng);
        let fold_start: Vec<usize> = (0..=nr_fold).map(|i| i * l / nr_fold).collect();

        let mut target = vec![0; l];
        for fold in fold_start.windows(2) {
            let (begin, end) = (fold[0], fold[1]);
            let rest: Vec<usize> = perm[..begin]
                .iter()
                .chain(&perm[end..])
                .copied()
                .collect();
            let subprob = prob.subset(&rest);
            let submodel = self.train(&subprob, param, out);
            for &j in &perm[begin..end] {
                target[j] = submodel.predict(prob.nodes(j));
            }
        }
        target
    }
}

//! Biogas-maximizing substrate mix under blending constraints.
//!
//! ## Formulation
//!
//! With `x_i` the volatile solids used of substrate `i` (Mg VS), `y_i` its
//! yield, `dm_i`, `vs_i`, `c_i`, `n_i` its composition fractions:
//!
//! ```text
//! minimise   -Σ y_i x_i
//! subject to  x_i ≤ available_i,  -x_i ≤ 0
//!             Σ (D_min / (dm_i vs_i) - 1 / vs_i) x_i ≤ 0      blended DM ≥ D_min
//!             Σ (1 / vs_i - D_max / (dm_i vs_i)) x_i ≤ 0      blended DM ≤ D_max
//!             Σ (CN_min n_i - c_i) x_i ≤ 0                    blended C:N ≥ CN_min
//!             Σ (c_i - CN_max n_i) x_i ≤ 0                    blended C:N ≤ CN_max
//!             -Σ y_i x_i ≤ -P_min                             plant size
//! ```
//!
//! Every vector is taken from one [`Coefficients`] so row `i` of each
//! constraint refers to the same substrate.

use biogas_core::{
    BiogasError, BiogasResult, Coefficients, ParameterSet, SubstrateKey, SubstrateVector, Table,
};
use good_lp::solvers::clarabel::clarabel;
use good_lp::{
    constraint, variable, variables, Expression, ResolutionError, Solution, SolverModel, Variable,
};
use rayon::prelude::*;
use tracing::debug;

/// A per-point linear program, built once per parameter set.
#[derive(Debug, Clone)]
pub struct ProductionProblem {
    coeffs: Coefficients,
    d_min: f64,
    d_max: f64,
    cn_min: f64,
    cn_max: f64,
    p_min: f64,
}

impl ProductionProblem {
    pub fn new(params: &ParameterSet) -> BiogasResult<Self> {
        Ok(Self {
            coeffs: params.coefficients()?,
            d_min: params.d_min,
            d_max: params.d_max,
            cn_min: params.cn_min,
            cn_max: params.cn_max,
            p_min: params.p_min,
        })
    }

    pub fn coefficients(&self) -> &Coefficients {
        &self.coeffs
    }

    /// Unconstrained production of an index-ordered vector, MW.
    pub fn production(&self, amounts: &[f64]) -> f64 {
        amounts
            .iter()
            .zip(&self.coeffs.yields)
            .map(|(x, y)| x * y)
            .sum()
    }

    /// Optimal usage for index-ordered `available` amounts.
    ///
    /// An infeasible problem yields all zeros: no viable plant here. An
    /// infinite amount makes the objective unbounded and is rejected before
    /// the model is built; negative or NaN amounts are invalid input.
    pub fn solve(&self, available: &[f64]) -> BiogasResult<Vec<f64>> {
        let c = &self.coeffs;
        if available.len() != c.len() {
            return Err(BiogasError::Validation(format!(
                "point has {} substrates, index has {}",
                available.len(),
                c.len()
            )));
        }

        for (key, amount) in c.index.keys().iter().zip(available) {
            if amount.is_infinite() && *amount > 0.0 {
                return Err(BiogasError::SolverUnexpectedStatus(format!(
                    "problem is unbounded: {key} is available without limit"
                )));
            }
            if !amount.is_finite() || *amount < 0.0 {
                return Err(BiogasError::Validation(format!(
                    "available {key} must be finite and non-negative, got {amount}"
                )));
            }
        }

        let mut vars = variables!();
        let x: Vec<Variable> = available.iter().map(|_| vars.add(variable())).collect();

        let mut production = Expression::from(0.0);
        let mut negated = Expression::from(0.0);
        let mut dm_low = Expression::from(0.0);
        let mut dm_high = Expression::from(0.0);
        let mut cn_low = Expression::from(0.0);
        let mut cn_high = Expression::from(0.0);
        for (i, var) in x.iter().enumerate() {
            let (dm, vs) = (c.dm[i], c.vs[i]);
            production += c.yields[i] * *var;
            negated += -c.yields[i] * *var;
            dm_low += (self.d_min / (dm * vs) - 1.0 / vs) * *var;
            dm_high += (1.0 / vs - self.d_max / (dm * vs)) * *var;
            cn_low += (self.cn_min * c.n[i] - c.c[i]) * *var;
            cn_high += (c.c[i] - self.cn_max * c.n[i]) * *var;
        }

        let mut model = vars.minimise(negated).using(clarabel);
        for (var, amount) in x.iter().zip(available) {
            model = model.with(constraint!(*var <= *amount));
            model = model.with(constraint!(*var >= 0.0));
        }
        model = model.with(constraint!(dm_low <= 0.0));
        model = model.with(constraint!(dm_high <= 0.0));
        model = model.with(constraint!(cn_low <= 0.0));
        model = model.with(constraint!(cn_high <= 0.0));
        model = model.with(constraint!(production >= self.p_min));

        match model.solve() {
            // Interior-point solutions sit a hair outside the box.
            Ok(solution) => Ok(x
                .iter()
                .zip(available)
                .map(|(var, amount)| solution.value(*var).clamp(0.0, amount.max(0.0)))
                .collect()),
            Err(ResolutionError::Infeasible) => {
                debug!("no feasible substrate mix, usage set to zero");
                Ok(vec![0.0; available.len()])
            }
            // Clarabel reports unbounded problems as solved, so the
            // finite-bound check above is what catches them there.
            Err(ResolutionError::Unbounded) => Err(BiogasError::SolverUnexpectedStatus(
                "problem is unbounded".to_string(),
            )),
            Err(err) => {
                let message = err.to_string();
                if message.to_lowercase().contains("iteration") {
                    Err(BiogasError::SolverIterationLimit(message))
                } else {
                    Err(BiogasError::SolverUnexpectedStatus(message))
                }
            }
        }
    }

    /// Optimal usage for a keyed inventory point.
    pub fn solve_point(&self, point: &SubstrateVector) -> BiogasResult<SubstrateVector> {
        let index = &self.coeffs.index;
        let available = index.align("inventory point", point)?;
        index.to_vector(&self.solve(&available)?)
    }
}

/// Biogas-maximizing usage of one inventory point.
pub fn maximize_production(
    point: &SubstrateVector,
    params: &ParameterSet,
) -> BiogasResult<SubstrateVector> {
    ProductionProblem::new(params)?.solve_point(point)
}

/// Row-wise [`maximize_production`]. Rows are independent and solved in
/// parallel on the global rayon pool.
pub fn maximize_production_table<K>(
    table: &Table<K, SubstrateKey>,
    params: &ParameterSet,
) -> BiogasResult<Table<K, SubstrateKey>>
where
    K: Ord + Clone + Send + Sync + std::fmt::Debug,
{
    let problem = ProductionProblem::new(params)?;
    let rows: Vec<(&K, &SubstrateVector)> = table.rows().collect();
    let solved: Vec<(K, SubstrateVector)> = rows
        .into_par_iter()
        .map(|(key, point)| {
            let usage = problem.solve_point(point)?;
            debug!(row = ?key, "row optimized");
            Ok((key.clone(), usage))
        })
        .collect::<BiogasResult<_>>()?;
    Ok(Table::from_rows(solved.into_iter().collect()))
}

/// Unconstrained production of a substrate vector: `Σ amount × yield`, MW.
pub fn biogas_production(vector: &SubstrateVector, params: &ParameterSet) -> BiogasResult<f64> {
    let problem = ProductionProblem::new(params)?;
    let amounts = problem.coeffs.index.align("substrate vector", vector)?;
    Ok(problem.production(&amounts))
}

// Copyright 2026 The Sectorsim Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The discrete-time stepper: evaluates the computed-variable catalog once
//! per step against the previous step's values, then advances the two
//! productivity stocks.

use std::collections::HashMap;

use serde::Serialize;

use crate::common::{EquationError, ErrorCode, Result};
use crate::datamodel::{ModelDefinition, PRODUCTIVITY_A, PRODUCTIVITY_B};
use crate::interpreter::safe_eval;
use crate::variable::{validate_formula, ComputedVariable};

/// Productivity stocks never fall below this, no matter what the edited
/// formulas produce.
const STOCK_FLOOR: f64 = 0.1;

/// Fraction of the diffusion rate that drags on a sector's own growth.
const DIFFUSION_DRAG: f64 = 0.2;

const DEFAULT_STEPS: usize = 12;

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelState {
    pub step: usize,
    pub values: HashMap<String, f64>,
    pub sector_outputs: HashMap<String, f64>,
    pub sector_prices: HashMap<String, f64>,
    pub wage: f64,
    pub innovation_rate: f64,
    pub diffusion_rate: f64,
    pub inequality_index: f64,
    pub welfare_index: f64,
    pub alternative_welfare: f64,
    pub log: Vec<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub history: Vec<ModelState>,
    pub dependency_graph: HashMap<String, Vec<String>>,
}

/// For each catalog entry, the variables its formula references.  Formulas
/// are checked against computed-variable ids only, so entries that read
/// parameters report an empty list even though they step fine.
pub fn build_dependency_graph(catalog: &[ComputedVariable]) -> HashMap<String, Vec<String>> {
    let ids: Vec<String> = catalog.iter().map(|variable| variable.id.clone()).collect();
    catalog
        .iter()
        .map(|variable| {
            let validation = validate_formula(&variable.formula, &ids);
            (variable.id.clone(), validation.variables)
        })
        .collect()
}

fn eval_computed_variables(
    catalog: &[ComputedVariable],
    formulas: &HashMap<String, String>,
    context: &HashMap<String, f64>,
) -> (HashMap<String, f64>, Vec<String>) {
    let mut values: HashMap<String, f64> = HashMap::new();
    let mut log = Vec::new();

    for variable in catalog {
        let mut scope = context.clone();
        scope.extend(values.iter().map(|(k, v)| (k.clone(), *v)));
        let result = match formulas.get(&variable.id) {
            Some(formula) => safe_eval(formula, &scope),
            None => Err(EquationError::new(ErrorCode::MissingFormula, 0, 0)),
        };
        match result {
            Ok(value) => {
                values.insert(variable.id.clone(), value);
            }
            Err(err) => {
                log.push(format!("Formula error for {}: {}", variable.id, err.message()));
                values.insert(variable.id.clone(), 0.0);
            }
        }
    }

    (values, log)
}

pub fn create_initial_state(model: &ModelDefinition) -> ModelState {
    let param_values = model.parameter_values();
    let mut values = HashMap::new();
    values.insert(
        PRODUCTIVITY_A.to_string(),
        param_values.get(PRODUCTIVITY_A).copied().unwrap_or(1.0),
    );
    values.insert(
        PRODUCTIVITY_B.to_string(),
        param_values.get(PRODUCTIVITY_B).copied().unwrap_or(1.0),
    );
    values.extend(param_values);

    ModelState {
        step: 0,
        values,
        sector_outputs: HashMap::new(),
        sector_prices: HashMap::new(),
        wage: 0.0,
        innovation_rate: 0.0,
        diffusion_rate: 0.0,
        inequality_index: 0.0,
        welfare_index: 0.0,
        alternative_welfare: 0.0,
        log: Vec::new(),
    }
}

pub fn simulate_step(
    prev: &ModelState,
    formulas: &HashMap<String, String>,
    catalog: &[ComputedVariable],
) -> ModelState {
    let (values, log) = eval_computed_variables(catalog, formulas, &prev.values);

    let get = |map: &HashMap<String, f64>, id: &str| map.get(id).copied().unwrap_or(0.0);

    let innovation_rate = get(&values, "innovationRate");
    let diffusion_rate = get(&values, "diffusionRate");
    let prev_a = get(&prev.values, PRODUCTIVITY_A);
    let prev_b = get(&prev.values, PRODUCTIVITY_B);

    let growth = 1.0 + innovation_rate - diffusion_rate * DIFFUSION_DRAG;
    let productivity_a = prev_a * growth + diffusion_rate * (prev_b - prev_a);
    let productivity_b = prev_b * growth + diffusion_rate * (prev_a - prev_b);

    // Computed values overwrite the clamped stocks on id collision.
    let mut next_values = prev.values.clone();
    next_values.insert(PRODUCTIVITY_A.to_string(), productivity_a.max(STOCK_FLOOR));
    next_values.insert(PRODUCTIVITY_B.to_string(), productivity_b.max(STOCK_FLOOR));
    next_values.extend(values);

    let mut full_log = prev.log.clone();
    full_log.extend(log);

    ModelState {
        step: prev.step + 1,
        sector_outputs: [
            ("sectorA".to_string(), get(&next_values, "outputA")),
            ("sectorB".to_string(), get(&next_values, "outputB")),
        ]
        .into_iter()
        .collect(),
        sector_prices: [
            ("sectorA".to_string(), get(&next_values, "priceA")),
            ("sectorB".to_string(), get(&next_values, "priceB")),
        ]
        .into_iter()
        .collect(),
        wage: get(&next_values, "wage"),
        innovation_rate,
        diffusion_rate,
        inequality_index: get(&next_values, "inequalityIndex"),
        welfare_index: get(&next_values, "welfareIndex"),
        alternative_welfare: get(&next_values, "alternativeWelfare"),
        values: next_values,
        log: full_log,
    }
}

pub fn run_simulation(
    model: &ModelDefinition,
    catalog: &[ComputedVariable],
    formulas: &HashMap<String, String>,
    steps: Option<usize>,
) -> SimulationResult {
    let steps = steps.unwrap_or(DEFAULT_STEPS);
    let mut history = Vec::with_capacity(steps + 1);
    let mut current = create_initial_state(model);
    history.push(current.clone());
    for _ in 0..steps {
        current = simulate_step(&current, formulas, catalog);
        history.push(current.clone());
    }
    SimulationResult {
        history,
        dependency_graph: build_dependency_graph(catalog),
    }
}

/// Validates every catalog formula, returning a message for each id that
/// fails.  Valid formulas don't appear in the result.
pub fn validate_all_formulas(
    catalog: &[ComputedVariable],
    formulas: &HashMap<String, String>,
    allowed_variables: &[String],
) -> HashMap<String, String> {
    let mut errors = HashMap::new();
    for variable in catalog {
        match formulas.get(&variable.id) {
            Some(formula) => {
                let validation = validate_formula(formula, allowed_variables);
                if let Some(error) = validation.error {
                    errors.insert(variable.id.clone(), error);
                }
            }
            None => {
                let err = EquationError::new(ErrorCode::MissingFormula, 0, 0);
                errors.insert(variable.id.clone(), err.message());
            }
        }
    }
    errors
}

/// One-shot evaluation of the whole catalog against a fixed context, in
/// declaration order.  Unlike the stepper this propagates the first failure
/// instead of logging it.
pub fn eval_snapshot(
    catalog: &[ComputedVariable],
    formulas: &HashMap<String, String>,
    context: &HashMap<String, f64>,
) -> Result<HashMap<String, f64>> {
    let mut result: HashMap<String, f64> = HashMap::new();
    for variable in catalog {
        let mut scope = context.clone();
        scope.extend(result.iter().map(|(k, v)| (k.clone(), *v)));
        let formula = formulas
            .get(&variable.id)
            .ok_or_else(|| EquationError::new(ErrorCode::MissingFormula, 0, 0))?;
        let value = safe_eval(formula, &scope)?;
        result.insert(variable.id.clone(), value);
    }
    Ok(result)
}

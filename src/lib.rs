// Copyright 2026 The Sectorsim Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

#![forbid(unsafe_code)]

pub mod ast;
pub mod builtins;
pub mod catalog;
pub mod common;
pub mod datamodel;
pub mod interpreter;
pub mod parser;
pub mod sim;
pub mod token;
pub mod variable;

pub use crate::catalog::{computed_variables, default_formulas, default_model_definition};
pub use crate::common::{EquationError, Error, ErrorCode, ErrorKind, Result};
pub use crate::datamodel::ModelDefinition;
pub use crate::interpreter::{eval, safe_eval};
pub use crate::parser::parse;
pub use crate::sim::{
    build_dependency_graph, create_initial_state, eval_snapshot, run_simulation, simulate_step,
    validate_all_formulas, ModelState, SimulationResult,
};
pub use crate::variable::{validate_formula, ComputedVariable, FormulaValidation};

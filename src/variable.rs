// Copyright 2026 The Sectorsim Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use serde::{Deserialize, Serialize};

use crate::ast::Expr;
use crate::builtins::{UntypedBuiltinFn, is_builtin_fn};
use crate::common::{EquationError, ErrorCode};
use crate::parser::parse;

/// A computed variable: a named quantity defined by a user-editable formula
/// rather than a stored parameter.  The engine is generic over any catalog
/// of these; the default catalog lives in `crate::catalog`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedVariable {
    pub id: String,
    pub name: String,
    /// the default formula; the UI overrides it per-id at run time
    pub formula: String,
    pub description: String,
    pub unit: String,
    pub role: String,
}

/// The verdict on a single formula: parse + reference checks, plus every
/// variable name the formula mentions (in order of first appearance).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulaValidation {
    pub is_valid: bool,
    pub error: Option<String>,
    pub variables: Vec<String>,
}

/// identifier_set walks the tree and returns every distinct variable name
/// referenced, in order of first appearance.
pub fn identifier_set(expr: &Expr) -> Vec<String> {
    let mut vars: Vec<String> = Vec::new();
    collect_identifiers(expr, &mut vars);
    vars
}

fn collect_identifiers(expr: &Expr, vars: &mut Vec<String>) {
    match expr {
        Expr::Const(_, _, _) => {}
        Expr::Var(name, _) => {
            if !vars.iter().any(|v| v == name) {
                vars.push(name.clone());
            }
        }
        Expr::App(UntypedBuiltinFn(_, args), _) => {
            for arg in args {
                collect_identifiers(arg, vars);
            }
        }
        Expr::Op1(_, operand, _) => collect_identifiers(operand, vars),
        Expr::Op2(_, l, r, _) => {
            collect_identifiers(l, vars);
            collect_identifiers(r, vars);
        }
    }
}

/// first_unknown_fn returns the first call (in preorder) whose name is not
/// in the builtin set.
fn first_unknown_fn(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Const(_, _, _) | Expr::Var(_, _) => None,
        Expr::App(UntypedBuiltinFn(name, args), _) => {
            if !is_builtin_fn(name) {
                return Some(name);
            }
            args.iter().find_map(first_unknown_fn)
        }
        Expr::Op1(_, operand, _) => first_unknown_fn(operand),
        Expr::Op2(_, l, r, _) => first_unknown_fn(l).or_else(|| first_unknown_fn(r)),
    }
}

/// validate_formula checks a formula against the grammar, an allow-list of
/// variable names, and the builtin function set.  First failure wins; the
/// referenced-variable list is attached whenever parsing succeeded,
/// regardless of validity.  Pure: identical inputs give identical results.
pub fn validate_formula(input: &str, allowed_variables: &[String]) -> FormulaValidation {
    let ast = match parse(input) {
        Ok(ast) => ast,
        Err(err) => {
            return FormulaValidation {
                is_valid: false,
                error: Some(err.message()),
                variables: vec![],
            };
        }
    };

    let variables = identifier_set(&ast);

    for variable in variables.iter() {
        if !allowed_variables.iter().any(|v| v == variable) {
            let err = EquationError::with_details(ErrorCode::UnknownVariable, 0, 0, variable);
            return FormulaValidation {
                is_valid: false,
                error: Some(err.message()),
                variables,
            };
        }
    }

    if let Some(name) = first_unknown_fn(&ast) {
        let err = EquationError::with_details(ErrorCode::UnknownBuiltin, 0, 0, name);
        return FormulaValidation {
            is_valid: false,
            error: Some(err.message()),
            variables,
        };
    }

    FormulaValidation {
        is_valid: true,
        error: None,
        variables,
    }
}

// Copyright 2026 The Sectorsim Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The model definition consumed from the configuration/UI layer: sectors,
//! households, parameters, policy presets, and currency systems.  This is
//! plain data -- the engine reads parameter values out of it and nothing
//! else mutates behind its back during a run.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::common::Result;
use crate::model_err;
use crate::variable::ComputedVariable;

/// id of the sector A productivity stock
pub const PRODUCTIVITY_A: &str = "productivityA";
/// id of the sector B productivity stock
pub const PRODUCTIVITY_B: &str = "productivityB";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Household {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub id: String,
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub description: String,
    pub role: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyPreset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub parameter_overrides: HashMap<String, f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencySystem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub liquidity_multiplier: f64,
    pub velocity: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDefinition {
    pub sectors: Vec<Sector>,
    pub households: Vec<Household>,
    pub parameters: Vec<Parameter>,
    pub policy_presets: Vec<PolicyPreset>,
    pub currency_systems: Vec<CurrencySystem>,
}

impl ModelDefinition {
    /// parameter_values flattens the parameter list into an evaluation
    /// context fragment.
    pub fn parameter_values(&self) -> HashMap<String, f64> {
        self.parameters
            .iter()
            .map(|parameter| (parameter.id.clone(), parameter.value))
            .collect()
    }

    /// allowed_variables is the full universe a formula may reference:
    /// every parameter, every computed variable, and the two productivity
    /// stocks.
    pub fn allowed_variables(&self, catalog: &[ComputedVariable]) -> Vec<String> {
        let mut allowed: Vec<String> = self
            .parameters
            .iter()
            .map(|parameter| parameter.id.clone())
            .collect();
        allowed.extend(catalog.iter().map(|variable| variable.id.clone()));
        allowed.push(PRODUCTIVITY_A.to_string());
        allowed.push(PRODUCTIVITY_B.to_string());
        allowed
    }

    /// apply_preset overlays a policy preset's parameter overrides onto the
    /// current parameter values; parameters without an override keep their
    /// value.
    pub fn apply_preset(&mut self, preset_id: &str) -> Result<()> {
        let Some(preset) = self
            .policy_presets
            .iter()
            .find(|preset| preset.id == preset_id)
        else {
            return model_err!(DoesNotExist, preset_id.to_string());
        };

        let overrides = preset.parameter_overrides.clone();
        for parameter in self.parameters.iter_mut() {
            if let Some(value) = overrides.get(&parameter.id) {
                parameter.value = *value;
            }
        }

        Ok(())
    }
}

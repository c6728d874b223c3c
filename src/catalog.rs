// Copyright 2026 The Sectorsim Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Static default configuration: the computed-variable catalog and the
//! default model definition.  Loaded once, read-only for the life of the
//! process; callers copy what they want to mutate between runs.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::datamodel::{
    CurrencySystem, Household, ModelDefinition, Parameter, PolicyPreset, Sector,
};
use crate::variable::ComputedVariable;

fn computed(
    id: &str,
    name: &str,
    formula: &str,
    description: &str,
    unit: &str,
    role: &str,
) -> ComputedVariable {
    ComputedVariable {
        id: id.to_string(),
        name: name.to_string(),
        formula: formula.to_string(),
        description: description.to_string(),
        unit: unit.to_string(),
        role: role.to_string(),
    }
}

fn parameter(id: &str, name: &str, value: f64, unit: &str, description: &str, role: &str) -> Parameter {
    Parameter {
        id: id.to_string(),
        name: name.to_string(),
        value,
        unit: unit.to_string(),
        description: description.to_string(),
        role: role.to_string(),
    }
}

lazy_static! {
    static ref COMPUTED_VARIABLES: Vec<ComputedVariable> = vec![
        computed(
            "laborA",
            "Labor in sector A",
            "laborSupply * sectorShareA",
            "Labor allocated to sector A each step.",
            "labor units",
            "Drives sector A output.",
        ),
        computed(
            "laborB",
            "Labor in sector B",
            "laborSupply * (1 - sectorShareA)",
            "Labor allocated to sector B each step.",
            "labor units",
            "Drives sector B output.",
        ),
        computed(
            "innovationRate",
            "Innovation rate",
            "innovationBase * (1 + ipProtection * 0.6 + publicFunding * 0.4) * (1 - openSourceAdoption * 0.2)",
            "Rate at which frontier productivity grows.",
            "per step",
            "Drives productivity improvements.",
        ),
        computed(
            "diffusionRate",
            "Diffusion rate",
            "diffusionBase * (1 + openSourceAdoption * 0.9 + platformOpenness * 0.4 - ipProtection * 0.3)",
            "Rate of knowledge diffusion between sectors.",
            "per step",
            "Reduces productivity gaps.",
        ),
        computed(
            "marketPower",
            "Market power index",
            "1 + royaltyRate * 0.6 - antitrustStrength * 0.4 + ipProtection * 0.2",
            "Index of markups and concentration.",
            "index",
            "Shifts prices and distribution.",
        ),
        computed(
            "priceA",
            "Price: sector A",
            "marketPower / productivityA",
            "Unit price in sector A.",
            "price per unit",
            "Determines real wages and welfare.",
        ),
        computed(
            "priceB",
            "Price: sector B",
            "marketPower / productivityB",
            "Unit price in sector B.",
            "price per unit",
            "Determines real wages and welfare.",
        ),
        computed(
            "outputA",
            "Output: sector A",
            "productivityA * laborA",
            "Total output from sector A.",
            "output units",
            "Feeds total production.",
        ),
        computed(
            "outputB",
            "Output: sector B",
            "productivityB * laborB",
            "Total output from sector B.",
            "output units",
            "Feeds total production.",
        ),
        computed(
            "wage",
            "Average wage",
            "(productivityA * laborA + productivityB * laborB) / laborSupply * (1 - marketPower * 0.1)",
            "Average wage paid to workers.",
            "currency per labor",
            "Determines labor income.",
        ),
        computed(
            "inequalityIndex",
            "Inequality index",
            "max(0, min(1, royaltyRate + ipProtection * 0.3 + marketPower * 0.1 - antitrustStrength * 0.2))",
            "Simple index of distributional imbalance.",
            "index",
            "Feeds welfare metrics.",
        ),
        computed(
            "liquidityIndex",
            "Liquidity index",
            "1 + currencyMixCommons * 0.2 + currencyMixTime * 0.15",
            "Effective liquidity from multiple currency systems.",
            "index",
            "Scales effective demand.",
        ),
        computed(
            "totalOutput",
            "Total output",
            "outputA + outputB",
            "Combined output across sectors.",
            "output units",
            "Feeds welfare and growth metrics.",
        ),
        computed(
            "welfareIndex",
            "Welfare index",
            "(welfareWeightGrowth * log(1 + totalOutput) + (1 - welfareWeightGrowth) * (1 - inequalityIndex)) * (1 - inequalityAversion * inequalityIndex * 0.5)",
            "Composite welfare that trades off growth and equity.",
            "index",
            "Tracks social wellbeing.",
        ),
        computed(
            "alternativeWelfare",
            "Plural welfare index",
            "welfareIndex * (1 + currencyMixCommons * 0.3 + currencyMixTime * 0.2)",
            "Alternative welfare accounting for plural value metrics.",
            "index",
            "Shows plural value measures.",
        ),
    ];

    static ref DEFAULT_MODEL: ModelDefinition = ModelDefinition {
        sectors: vec![
            Sector {
                id: "sectorA".to_string(),
                name: "Proprietary tech".to_string(),
            },
            Sector {
                id: "sectorB".to_string(),
                name: "Commons production".to_string(),
            },
        ],
        households: vec![
            Household {
                id: "workers".to_string(),
                name: "Wage earners".to_string(),
            },
            Household {
                id: "owners".to_string(),
                name: "Capital owners".to_string(),
            },
        ],
        parameters: vec![
            parameter(
                "laborSupply",
                "Labor supply",
                100.0,
                "labor units",
                "Total labor available per step.",
                "Scales all production.",
            ),
            parameter(
                "sectorShareA",
                "Sector A labor share",
                0.6,
                "fraction",
                "Share of labor allocated to sector A.",
                "Splits labor across sectors.",
            ),
            parameter(
                "productivityA",
                "Initial productivity: sector A",
                1.0,
                "output per labor",
                "Starting productivity stock for sector A.",
                "Seeds the sector A stock.",
            ),
            parameter(
                "productivityB",
                "Initial productivity: sector B",
                0.8,
                "output per labor",
                "Starting productivity stock for sector B.",
                "Seeds the sector B stock.",
            ),
            parameter(
                "innovationBase",
                "Base innovation rate",
                0.03,
                "per step",
                "Frontier productivity growth before policy effects.",
                "Drives innovation.",
            ),
            parameter(
                "diffusionBase",
                "Base diffusion rate",
                0.05,
                "per step",
                "Knowledge diffusion before policy effects.",
                "Drives convergence.",
            ),
            parameter(
                "ipProtection",
                "IP protection strength",
                0.5,
                "index 0-1",
                "Strength of intellectual property enforcement.",
                "Raises innovation, slows diffusion.",
            ),
            parameter(
                "publicFunding",
                "Public research funding",
                0.3,
                "index 0-1",
                "Publicly funded research intensity.",
                "Raises innovation.",
            ),
            parameter(
                "openSourceAdoption",
                "Open source adoption",
                0.3,
                "index 0-1",
                "Share of production on open licenses.",
                "Raises diffusion, dampens captured innovation.",
            ),
            parameter(
                "platformOpenness",
                "Platform openness",
                0.4,
                "index 0-1",
                "Interoperability and access mandates.",
                "Raises diffusion.",
            ),
            parameter(
                "royaltyRate",
                "Royalty rate",
                0.2,
                "index 0-1",
                "Rents extracted by rights holders.",
                "Raises market power and inequality.",
            ),
            parameter(
                "antitrustStrength",
                "Antitrust strength",
                0.4,
                "index 0-1",
                "Competition policy intensity.",
                "Lowers market power.",
            ),
            parameter(
                "currencyMixCommons",
                "Commons currency mix",
                0.1,
                "fraction",
                "Share of exchange in commons credits.",
                "Raises liquidity and plural welfare.",
            ),
            parameter(
                "currencyMixTime",
                "Time currency mix",
                0.1,
                "fraction",
                "Share of exchange in time banking.",
                "Raises liquidity and plural welfare.",
            ),
            parameter(
                "welfareWeightGrowth",
                "Welfare weight on growth",
                0.6,
                "fraction",
                "Weight on output growth versus equity in welfare.",
                "Shapes the welfare index.",
            ),
            parameter(
                "inequalityAversion",
                "Inequality aversion",
                0.4,
                "index 0-1",
                "How strongly inequality discounts welfare.",
                "Shapes the welfare index.",
            ),
        ],
        policy_presets: vec![
            PolicyPreset {
                id: "default".to_string(),
                name: "Baseline".to_string(),
                description: "Mixed policy regime.".to_string(),
                parameter_overrides: HashMap::new(),
            },
            PolicyPreset {
                id: "strong-ip".to_string(),
                name: "Strong IP".to_string(),
                description: "Maximal intellectual property enforcement.".to_string(),
                parameter_overrides: [
                    ("ipProtection".to_string(), 0.9),
                    ("royaltyRate".to_string(), 0.4),
                    ("openSourceAdoption".to_string(), 0.1),
                    ("platformOpenness".to_string(), 0.2),
                ]
                .into_iter()
                .collect(),
            },
            PolicyPreset {
                id: "open-commons".to_string(),
                name: "Open commons".to_string(),
                description: "Open licensing and platform mandates.".to_string(),
                parameter_overrides: [
                    ("ipProtection".to_string(), 0.2),
                    ("royaltyRate".to_string(), 0.05),
                    ("openSourceAdoption".to_string(), 0.8),
                    ("platformOpenness".to_string(), 0.8),
                    ("publicFunding".to_string(), 0.5),
                ]
                .into_iter()
                .collect(),
            },
            PolicyPreset {
                id: "plural-value".to_string(),
                name: "Plural value".to_string(),
                description: "Diversified currency systems.".to_string(),
                parameter_overrides: [
                    ("currencyMixCommons".to_string(), 0.3),
                    ("currencyMixTime".to_string(), 0.25),
                ]
                .into_iter()
                .collect(),
            },
        ],
        currency_systems: vec![
            CurrencySystem {
                id: "fiat".to_string(),
                name: "National fiat".to_string(),
                description: "General-purpose state currency.".to_string(),
                liquidity_multiplier: 1.0,
                velocity: 1.0,
            },
            CurrencySystem {
                id: "commonsCredit".to_string(),
                name: "Commons credit".to_string(),
                description: "Mutual credit for commons production.".to_string(),
                liquidity_multiplier: 1.2,
                velocity: 1.5,
            },
            CurrencySystem {
                id: "timeBank".to_string(),
                name: "Time bank".to_string(),
                description: "Hour-denominated service exchange.".to_string(),
                liquidity_multiplier: 1.1,
                velocity: 0.8,
            },
        ],
    };
}

/// The default computed-variable catalog.  Declaration order matters: the
/// stepper evaluates formulas in exactly this order.
pub fn computed_variables() -> &'static [ComputedVariable] {
    &COMPUTED_VARIABLES
}

pub fn default_model_definition() -> ModelDefinition {
    DEFAULT_MODEL.clone()
}

/// default_formulas maps each computed-variable id to its catalog formula;
/// the UI overlays user edits onto this map.
pub fn default_formulas(catalog: &[ComputedVariable]) -> HashMap<String, String> {
    catalog
        .iter()
        .map(|variable| (variable.id.clone(), variable.formula.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::validate_formula;

    #[test]
    fn catalog_ids_are_unique() {
        let catalog = computed_variables();
        for (i, variable) in catalog.iter().enumerate() {
            assert!(
                !catalog[i + 1..].iter().any(|other| other.id == variable.id),
                "duplicate id {}",
                variable.id
            );
        }
        assert_eq!(15, catalog.len());
    }

    #[test]
    fn default_formulas_validate_against_default_model() {
        let model = default_model_definition();
        let catalog = computed_variables();
        let allowed = model.allowed_variables(catalog);
        for variable in catalog {
            let validation = validate_formula(&variable.formula, &allowed);
            assert!(
                validation.is_valid,
                "{}: {:?}",
                variable.id, validation.error
            );
        }
    }

    #[test]
    fn default_formulas_cover_the_catalog() {
        let catalog = computed_variables();
        let formulas = default_formulas(catalog);
        assert_eq!(catalog.len(), formulas.len());
        assert_eq!(
            Some(&"outputA + outputB".to_string()),
            formulas.get("totalOutput")
        );
    }
}

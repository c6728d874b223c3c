// Copyright 2026 The Sectorsim Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

/// Loc describes a location in a formula by the starting point and ending
/// point.  Formulas are strings typed by humans for a single variable --
/// u16 is long enough.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Hash)]
pub struct Loc {
    pub start: u16,
    pub end: u16,
}

impl Loc {
    pub fn new(start: usize, end: usize) -> Self {
        Loc {
            start: start as u16,
            end: end as u16,
        }
    }

    /// union takes a second Loc and returns the inclusive range from the
    /// start of the earlier token to the end of the later token.
    pub fn union(&self, rhs: &Self) -> Self {
        Loc {
            start: self.start.min(rhs.start),
            end: self.end.max(rhs.end),
        }
    }
}

#[test]
fn test_loc_basics() {
    let a = Loc { start: 3, end: 7 };
    assert_eq!(a, Loc::new(3, 7));

    let b = Loc { start: 4, end: 11 };
    assert_eq!(Loc::new(3, 11), a.union(&b));

    let c = Loc { start: 1, end: 5 };
    assert_eq!(Loc::new(1, 7), a.union(&c));
}

/// A function call as written in a formula, before the name has been
/// checked against the builtin set.
#[derive(PartialEq, Clone, Debug)]
pub struct UntypedBuiltinFn<Expr>(pub String, pub Vec<Expr>);

/// The fixed set of functions callable from formulas.  Not configurable at
/// runtime: both the validator and the evaluator check against this list.
pub const BUILTIN_FUNCTIONS: &[&str] = &["min", "max", "log", "exp", "abs"];

pub fn is_builtin_fn(name: &str) -> bool {
    matches!(name, "min" | "max" | "log" | "exp" | "abs")
}

#[test]
fn test_is_builtin_fn() {
    for name in BUILTIN_FUNCTIONS {
        assert!(is_builtin_fn(name));
    }
    assert!(!is_builtin_fn("ln"));
    assert!(!is_builtin_fn("minimum"));
    // matching is case-sensitive
    assert!(!is_builtin_fn("MAX"));
}

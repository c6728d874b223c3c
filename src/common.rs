// Copyright 2026 The Sectorsim Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::{error, fmt, result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoError, // will never be produced
    DoesNotExist,
    InvalidCharacter,
    UnrecognizedEof,
    UnrecognizedToken,
    ExtraToken,
    ExpectedNumber,
    UnclosedParen,
    MalformedArgs,
    TooComplex,
    UnknownVariable,
    UnknownBuiltin,
    MissingVariable,
    BadBuiltinArgs,
    MissingFormula,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            NoError => "no_error",
            DoesNotExist => "does_not_exist",
            InvalidCharacter => "invalid_character",
            UnrecognizedEof => "unrecognized_eof",
            UnrecognizedToken => "unrecognized_token",
            ExtraToken => "extra_token",
            ExpectedNumber => "expected_number",
            UnclosedParen => "unclosed_paren",
            MalformedArgs => "malformed_args",
            TooComplex => "too_complex",
            UnknownVariable => "unknown_variable",
            UnknownBuiltin => "unknown_builtin",
            MissingVariable => "missing_variable",
            BadBuiltinArgs => "bad_builtin_args",
            MissingFormula => "missing_formula",
        };

        write!(f, "{name}")
    }
}

/// An error produced while lexing, parsing, validating, or evaluating a
/// single formula.  `start`/`end` are byte offsets into the formula text;
/// formulas are short strings typed by humans, so u16 is plenty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EquationError {
    pub start: u16,
    pub end: u16,
    pub code: ErrorCode,
    /// the offending identifier or character, when one exists
    pub details: Option<String>,
}

impl EquationError {
    pub fn new(code: ErrorCode, start: usize, end: usize) -> Self {
        EquationError {
            start: start as u16,
            end: end as u16,
            code,
            details: None,
        }
    }

    pub fn with_details<S: Into<String>>(code: ErrorCode, start: usize, end: usize, details: S) -> Self {
        EquationError {
            start: start as u16,
            end: end as u16,
            code,
            details: Some(details.into()),
        }
    }

    /// message renders the error the way it is shown next to a formula
    /// input, e.g. `Unknown variable: frobnicate`.
    pub fn message(&self) -> String {
        use ErrorCode::*;
        let text = match self.code {
            NoError => "no error",
            DoesNotExist => "does not exist",
            InvalidCharacter => "Unexpected character",
            UnrecognizedEof => "Unexpected end of input",
            UnrecognizedToken => "Unexpected token",
            ExtraToken => "Unexpected trailing token",
            ExpectedNumber => "Invalid number literal",
            UnclosedParen => "Missing closing parenthesis",
            MalformedArgs => "Malformed function arguments",
            TooComplex => "Formula too complex",
            UnknownVariable => "Unknown variable",
            UnknownBuiltin => "Unknown function",
            MissingVariable => "Missing variable",
            BadBuiltinArgs => "Wrong number of arguments",
            MissingFormula => "Missing formula",
        };
        match &self.details {
            Some(details) => format!("{text}: {details}"),
            None => text.to_string(),
        }
    }
}

impl fmt::Display for EquationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}:{}", self.start, self.end, self.code)
    }
}

impl error::Error for EquationError {}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Model,
    Simulation,
}

/// A model- or simulation-level error, as opposed to an error scoped to a
/// single equation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub details: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, code: ErrorCode, details: Option<String>) -> Self {
        Error {
            kind,
            code,
            details,
        }
    }
}

impl From<EquationError> for Error {
    fn from(err: EquationError) -> Self {
        Error {
            kind: ErrorKind::Simulation,
            code: err.code,
            details: Some(err.message()),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::Model => "ModelError",
            ErrorKind::Simulation => "SimulationError",
        };
        match self.details {
            Some(ref details) => write!(f, "{}{{{}: {}}}", kind, self.code, details),
            None => write!(f, "{}{{{}}}", kind, self.code),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;
pub type EquationResult<T> = result::Result<T, EquationError>;

#[macro_export]
macro_rules! eqn_err(
    ($code:tt, $start:expr, $end:expr) => {{
        use $crate::common::{EquationError, ErrorCode};
        Err(EquationError::new(ErrorCode::$code, $start, $end))
    }};
    ($code:tt, $start:expr, $end:expr, $details:expr) => {{
        use $crate::common::{EquationError, ErrorCode};
        Err(EquationError::with_details(ErrorCode::$code, $start, $end, $details))
    }}
);

#[macro_export]
macro_rules! model_err(
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(
            ErrorKind::Model,
            ErrorCode::$code,
            Some($str),
        ))
    }}
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equation_error_display() {
        let err = EquationError::new(ErrorCode::ExtraToken, 4, 5);
        assert_eq!("4:5:extra_token", format!("{err}"));
    }

    #[test]
    fn equation_error_message_includes_details() {
        let err = EquationError::with_details(ErrorCode::UnknownVariable, 0, 9, "frobnicate");
        assert_eq!("Unknown variable: frobnicate", err.message());

        let err = EquationError::new(ErrorCode::UnrecognizedEof, 7, 8);
        assert_eq!("Unexpected end of input", err.message());
    }

    #[test]
    fn error_from_equation_error() {
        let eqn_err = EquationError::with_details(ErrorCode::MissingVariable, 0, 3, "foo");
        let err: Error = eqn_err.into();
        assert_eq!(ErrorKind::Simulation, err.kind);
        assert_eq!(ErrorCode::MissingVariable, err.code);
        assert_eq!(Some("Missing variable: foo".to_string()), err.details);
    }
}

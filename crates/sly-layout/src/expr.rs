//! Lazily evaluated size expressions.
//!
//! A [`SizeExpr`] is what a drag writes into a layout variable: a formula the
//! host re-resolves on every layout pass, so concurrently changing bounds or
//! referenced variables are honored. It renders as CSS-style text
//! (`clamp(100px, calc(200px + 50px * 1), 500px)`) and resolves to a
//! [`Length`] through a caller-provided variable lookup.

use std::fmt;

use sly_core::Length;

/// Maximum `var()` indirections followed before declaring a cycle.
pub const MAX_VARIABLE_DEPTH: usize = 32;

/// A size formula over lengths and layout variables.
#[derive(Debug, Clone, PartialEq)]
pub enum SizeExpr {
    /// A concrete length.
    Length(Length),
    /// Reference to another layout variable.
    Var(String),
    /// `base + delta * sign`.
    Delta {
        base: Box<SizeExpr>,
        delta: Length,
        sign: i8,
    },
    /// CSS `clamp(min, value, max)`.
    Clamp {
        min: Box<SizeExpr>,
        value: Box<SizeExpr>,
        max: Box<SizeExpr>,
    },
}

impl SizeExpr {
    /// Reference the variable `name`.
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    /// `base + delta * sign`, where only the sign of `sign` is used.
    #[must_use]
    pub fn delta(base: SizeExpr, delta: Length, sign: i8) -> Self {
        Self::Delta {
            base: Box::new(base),
            delta,
            sign: if sign < 0 { -1 } else { 1 },
        }
    }

    /// `clamp(min, value, max)`.
    #[must_use]
    pub fn clamp(min: SizeExpr, value: SizeExpr, max: SizeExpr) -> Self {
        Self::Clamp {
            min: Box::new(min),
            value: Box::new(value),
            max: Box::new(max),
        }
    }

    /// The concrete length, if this expression is already one.
    #[must_use]
    pub fn as_length(&self) -> Option<Length> {
        match self {
            Self::Length(length) => Some(*length),
            _ => None,
        }
    }

    /// Names of variables referenced anywhere in the expression.
    #[must_use]
    pub fn variables(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Length(_) => {}
            Self::Var(name) => out.push(name),
            Self::Delta { base, .. } => base.collect_variables(out),
            Self::Clamp { min, value, max } => {
                min.collect_variables(out);
                value.collect_variables(out);
                max.collect_variables(out);
            }
        }
    }

    /// Resolve without any variables in scope.
    pub fn resolve_literal(&self) -> Result<Length, ExprError> {
        let no_variables = |_: &str| -> Option<SizeExpr> { None };
        self.resolve_with(&no_variables)
    }

    /// Resolve, looking variables up through `lookup`.
    pub fn resolve_with<F>(&self, lookup: &F) -> Result<Length, ExprError>
    where
        F: Fn(&str) -> Option<SizeExpr>,
    {
        self.resolve_at_depth(lookup, 0)
    }

    fn resolve_at_depth<F>(&self, lookup: &F, depth: usize) -> Result<Length, ExprError>
    where
        F: Fn(&str) -> Option<SizeExpr>,
    {
        match self {
            Self::Length(length) => Ok(*length),
            Self::Var(name) => {
                if depth >= MAX_VARIABLE_DEPTH {
                    return Err(ExprError::Cycle { name: name.clone() });
                }
                let target = lookup(name).ok_or_else(|| ExprError::UnknownVariable {
                    name: name.clone(),
                })?;
                target.resolve_at_depth(lookup, depth + 1)
            }
            Self::Delta { base, delta, sign } => {
                let base = base.resolve_at_depth(lookup, depth)?;
                Ok(Length::px(base.get() + delta.get() * f64::from(*sign)))
            }
            Self::Clamp { min, value, max } => {
                let min = min.resolve_at_depth(lookup, depth)?;
                let value = value.resolve_at_depth(lookup, depth)?;
                let max = max.resolve_at_depth(lookup, depth)?;
                Ok(value.clamp_between(min, max))
            }
        }
    }
}

impl From<Length> for SizeExpr {
    fn from(length: Length) -> Self {
        Self::Length(length)
    }
}

impl fmt::Display for SizeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length(length) => write!(f, "{length}"),
            Self::Var(name) => write!(f, "var({name})"),
            Self::Delta { base, delta, sign } => write!(f, "calc({base} + {delta} * {sign})"),
            Self::Clamp { min, value, max } => write!(f, "clamp({min}, {value}, {max})"),
        }
    }
}

/// Resolution failures for [`SizeExpr`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    UnknownVariable { name: String },
    Cycle { name: String },
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownVariable { name } => write!(f, "layout variable {name} is not defined"),
            Self::Cycle { name } => write!(
                f,
                "layout variable {name} exceeds {MAX_VARIABLE_DEPTH} var() indirections"
            ),
        }
    }
}

impl std::error::Error for ExprError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(value: f64) -> SizeExpr {
        SizeExpr::Length(Length::px(value))
    }

    #[test]
    fn renders_css_text() {
        let expr = SizeExpr::clamp(
            px(100.0),
            SizeExpr::delta(px(200.0), Length::px(50.0), -1),
            SizeExpr::var("--pane-width-max"),
        );
        assert_eq!(
            expr.to_string(),
            "clamp(100px, calc(200px + 50px * -1), var(--pane-width-max))"
        );
    }

    #[test]
    fn clamp_resolves_within_bounds() {
        let expr = SizeExpr::clamp(
            px(100.0),
            SizeExpr::delta(px(200.0), Length::px(900.0), 1),
            px(500.0),
        );
        assert_eq!(expr.resolve_literal(), Ok(Length::px(500.0)));
    }

    #[test]
    fn variables_resolve_through_lookup() {
        let expr = SizeExpr::delta(SizeExpr::var("--a"), Length::px(5.0), 1);
        let lookup = |name: &str| match name {
            "--a" => Some(SizeExpr::var("--b")),
            "--b" => Some(px(10.0)),
            _ => None,
        };
        assert_eq!(expr.resolve_with(&lookup), Ok(Length::px(15.0)));
        assert_eq!(expr.variables(), vec!["--a"]);
    }

    #[test]
    fn unknown_variable_is_an_error() {
        assert_eq!(
            SizeExpr::var("--missing").resolve_literal(),
            Err(ExprError::UnknownVariable {
                name: "--missing".to_string()
            })
        );
    }

    #[test]
    fn self_reference_is_reported_as_cycle() {
        let lookup = |_: &str| Some(SizeExpr::var("--loop"));
        assert_eq!(
            SizeExpr::var("--loop").resolve_with(&lookup),
            Err(ExprError::Cycle {
                name: "--loop".to_string()
            })
        );
    }

    #[test]
    fn delta_normalizes_sign() {
        let expr = SizeExpr::delta(px(10.0), Length::px(3.0), -7);
        assert_eq!(expr.resolve_literal(), Ok(Length::px(7.0)));
        assert_eq!(expr.to_string(), "calc(10px + 3px * -1)");
    }
}

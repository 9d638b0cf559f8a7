//! Sandboxed scalar formulas for procedural motion
//!
//! Formulas such as `startX + 40 * cos(t * speed)` are tokenized, parsed
//! into an [`Expr`] tree and walked by a small interpreter. Identifiers
//! resolve only against the [`ExpressionContext`], the constants `PI` and
//! `E`, and the fixed function table in [`ast`]; there is no other way for a
//! formula to reach anything.
//!
//! [`ExpressionEngine::evaluate`] never fails: a formula that does not parse,
//! names an unknown variable, or produces NaN/infinity yields the context's
//! `x` and logs a warning.

pub mod ast;
pub mod context;
pub mod interpreter;
pub mod lexer;
pub mod parser;

pub use ast::{Builtin, Expr};
pub use context::ExpressionContext;

use log::warn;
use rand::Rng;

use crate::common::ExpressionError;
use crate::config::ExpressionConfig;

/// A parsed formula, reusable across ticks
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    ast: Expr,
}

impl Expression {
    pub fn parse(source: &str) -> Result<Self, ExpressionError> {
        ExpressionEngine::default().compile(source)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> &Expr {
        &self.ast
    }

    /// Evaluate and require a finite result.
    pub fn eval<R: Rng + ?Sized>(
        &self,
        ctx: &ExpressionContext,
        rng: &mut R,
    ) -> Result<f64, ExpressionError> {
        let value = interpreter::eval(&self.ast, ctx, rng)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ExpressionError::NonFinite(value))
        }
    }

    /// Like [`eval`](Self::eval) but falls back to `ctx.x()`.
    pub fn eval_or_x<R: Rng + ?Sized>(&self, ctx: &ExpressionContext, rng: &mut R) -> f64 {
        match self.eval(ctx, rng) {
            Ok(value) => value,
            Err(e) => {
                warn!("expression `{}` failed: {}", self.source, e);
                ctx.x()
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExpressionEngine {
    config: ExpressionConfig,
}

impl ExpressionEngine {
    pub fn new(config: ExpressionConfig) -> Self {
        Self { config }
    }

    pub fn compile(&self, source: &str) -> Result<Expression, ExpressionError> {
        let len = source.chars().count();
        if len > self.config.max_len {
            return Err(ExpressionError::TooLong {
                len,
                max: self.config.max_len,
            });
        }
        let ast = parser::parse(source, self.config.max_depth)?;
        Ok(Expression {
            source: source.to_string(),
            ast,
        })
    }

    pub fn try_evaluate<R: Rng + ?Sized>(
        &self,
        source: &str,
        ctx: &ExpressionContext,
        rng: &mut R,
    ) -> Result<f64, ExpressionError> {
        self.compile(source)?.eval(ctx, rng)
    }

    pub fn evaluate_with_rng<R: Rng + ?Sized>(
        &self,
        source: &str,
        ctx: &ExpressionContext,
        rng: &mut R,
    ) -> f64 {
        match self.try_evaluate(source, ctx, rng) {
            Ok(value) => value,
            Err(e) => {
                warn!("expression `{}` failed: {}", source, e);
                ctx.x()
            }
        }
    }

    pub fn evaluate(&self, source: &str, ctx: &ExpressionContext) -> f64 {
        self.evaluate_with_rng(source, ctx, &mut rand::thread_rng())
    }
}

/// Evaluate with default limits; returns `ctx.x()` on any failure.
pub fn evaluate(source: &str, ctx: &ExpressionContext) -> f64 {
    ExpressionEngine::default().evaluate(source, ctx)
}

/// Check that `source` parses, without evaluating it.
pub fn validate(source: &str) -> Result<(), ExpressionError> {
    ExpressionEngine::default().compile(source).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_documented_examples() {
        assert_eq!(evaluate("x + 1", &ExpressionContext::new().with("x", 5.0)), 6.0);
        assert_eq!(evaluate("sin(0)", &ExpressionContext::new()), 0.0);
        assert_eq!(evaluate("1/0", &ExpressionContext::new().with("x", 3.0)), 3.0);
    }

    #[test]
    fn test_failures_fall_back_to_x() {
        let ctx = ExpressionContext::new().with("x", 12.5);
        for bad in ["", "x +", "unknownVar * 2", "system(1)", "x; drop", "sqrt(-1)", "0/0", "exp(1000)"] {
            assert_eq!(evaluate(bad, &ctx), 12.5, "{:?}", bad);
        }
        assert_eq!(evaluate("nope", &ExpressionContext::new()), 0.0);
    }

    #[test]
    fn test_length_limit() {
        let engine = ExpressionEngine::new(ExpressionConfig {
            max_len: 8,
            max_depth: 64,
        });
        assert_eq!(
            engine.compile("1+1+1+1+1"),
            Err(ExpressionError::TooLong { len: 9, max: 8 })
        );
        assert!(engine.compile("1+1+1+1").is_ok());
    }

    #[test]
    fn test_compiled_expression_reuse() {
        let expr = Expression::parse("startX + 10 * t").unwrap();
        assert_eq!(expr.source(), "startX + 10 * t");
        let mut rng = StdRng::seed_from_u64(1);
        for step in 0..5 {
            let ctx = ExpressionContext::new().with("startX", 2.0).with("t", step as f64);
            assert_eq!(expr.eval(&ctx, &mut rng), Ok(2.0 + 10.0 * step as f64));
        }
    }

    #[test]
    fn test_eval_or_x() {
        let expr = Expression::parse("1 / t").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let ctx = ExpressionContext::new().with("x", 4.0).with("t", 0.0);
        assert_eq!(expr.eval_or_x(&ctx, &mut rng), 4.0);
        assert!(matches!(expr.eval(&ctx, &mut rng), Err(ExpressionError::NonFinite(_))));
    }

    #[test]
    fn test_validate() {
        assert!(validate("atan2(y - startY, x - startX)").is_ok());
        assert_eq!(validate("foo(1)"), Err(ExpressionError::UnknownFunction("foo".to_string())));
    }
}

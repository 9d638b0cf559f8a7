//! Tree-walking evaluator

use rand::Rng;

use crate::common::ExpressionError;
use crate::expression::ast::{constant, BinaryOp, Builtin, Expr, UnaryOp};
use crate::expression::context::ExpressionContext;

/// Evaluate `expr`. Intermediate infinities are allowed; the caller decides
/// whether the final value is acceptable.
pub fn eval<R: Rng + ?Sized>(
    expr: &Expr,
    ctx: &ExpressionContext,
    rng: &mut R,
) -> Result<f64, ExpressionError> {
    match expr {
        Expr::Literal(value) => Ok(*value),
        Expr::Variable(name) => ctx
            .get(name)
            .or_else(|| constant(name))
            .ok_or_else(|| ExpressionError::UnknownIdentifier(name.clone())),
        Expr::Unary { op, operand } => {
            let value = eval(operand, ctx, rng)?;
            Ok(match op {
                UnaryOp::Neg => -value,
                UnaryOp::Plus => value,
            })
        }
        Expr::Binary { op, lhs, rhs } => {
            let a = eval(lhs, ctx, rng)?;
            let b = eval(rhs, ctx, rng)?;
            Ok(match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                BinaryOp::Pow => a.powf(b),
            })
        }
        Expr::Call { func, args } => {
            let values = args
                .iter()
                .map(|arg| eval(arg, ctx, rng))
                .collect::<Result<Vec<f64>, _>>()?;
            Ok(call(*func, &values, rng))
        }
    }
}

/// Arity has already been checked by the parser.
fn call<R: Rng + ?Sized>(func: Builtin, args: &[f64], rng: &mut R) -> f64 {
    let a = args.first().copied().unwrap_or(f64::NAN);
    let b = args.get(1).copied().unwrap_or(f64::NAN);
    match func {
        Builtin::Sin => a.sin(),
        Builtin::Cos => a.cos(),
        Builtin::Tan => a.tan(),
        Builtin::Asin => a.asin(),
        Builtin::Acos => a.acos(),
        Builtin::Atan => a.atan(),
        Builtin::Atan2 => a.atan2(b),
        Builtin::Sqrt => a.sqrt(),
        Builtin::Abs => a.abs(),
        Builtin::Floor => a.floor(),
        Builtin::Ceil => a.ceil(),
        // half-up, so round(-2.5) == -2
        Builtin::Round => (a + 0.5).floor(),
        Builtin::Min => args.iter().copied().fold(f64::INFINITY, nan_min),
        Builtin::Max => args.iter().copied().fold(f64::NEG_INFINITY, nan_max),
        Builtin::Pow => a.powf(b),
        Builtin::Exp => a.exp(),
        Builtin::Log => a.ln(),
        Builtin::Sign => {
            if a > 0.0 {
                1.0
            } else if a < 0.0 {
                -1.0
            } else {
                a
            }
        }
        Builtin::Random => rng.gen::<f64>(),
    }
}

// f64::min drops NaN; a NaN argument must poison the result instead.
fn nan_min(acc: f64, v: f64) -> f64 {
    if acc.is_nan() || v.is_nan() {
        f64::NAN
    } else {
        acc.min(v)
    }
}

fn nan_max(acc: f64, v: f64) -> f64 {
    if acc.is_nan() || v.is_nan() {
        f64::NAN
    } else {
        acc.max(v)
    }
}

//! Named-variable bag a formula is evaluated against

use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpressionContext {
    vars: HashMap<String, f64>,
}

impl ExpressionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.vars.insert(name.into(), value);
    }

    /// Insert every pair, overriding names already present.
    pub fn extend<K: Into<String>>(&mut self, vars: impl IntoIterator<Item = (K, f64)>) {
        for (name, value) in vars {
            self.set(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.vars.get(name).copied()
    }

    /// Value returned when an evaluation fails.
    pub fn x(&self) -> f64 {
        self.get("x").unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ExpressionContext {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut ctx = Self::new();
        ctx.extend(iter);
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_values_override() {
        let mut ctx: ExpressionContext = [("x", 1.0), ("speed", 2.0)].into_iter().collect();
        ctx.extend([("speed", 5.0)]);
        assert_eq!(ctx.get("speed"), Some(5.0));
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn test_x_fallback_defaults_to_zero() {
        assert_eq!(ExpressionContext::new().x(), 0.0);
        assert_eq!(ExpressionContext::new().with("x", -3.5).x(), -3.5);
    }
}

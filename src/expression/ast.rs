//! Expression tree and the fixed table of callable functions

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(f64),
    Variable(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        func: Builtin,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Arity::Exact(0) => "no",
            Arity::Exact(1) => "exactly 1",
            Arity::Exact(2) => "exactly 2",
            Arity::Exact(_) => "a fixed number of",
            Arity::AtLeast(_) => "at least 1",
        }
    }
}

/// Functions a formula may call. Nothing outside this list is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sqrt,
    Abs,
    Floor,
    Ceil,
    Round,
    Min,
    Max,
    Pow,
    Exp,
    Log,
    Sign,
    Random,
}

static BUILTINS: [Builtin; 19] = [
    Builtin::Sin,
    Builtin::Cos,
    Builtin::Tan,
    Builtin::Asin,
    Builtin::Acos,
    Builtin::Atan,
    Builtin::Atan2,
    Builtin::Sqrt,
    Builtin::Abs,
    Builtin::Floor,
    Builtin::Ceil,
    Builtin::Round,
    Builtin::Min,
    Builtin::Max,
    Builtin::Pow,
    Builtin::Exp,
    Builtin::Log,
    Builtin::Sign,
    Builtin::Random,
];

impl Builtin {
    pub fn lookup(name: &str) -> Option<Builtin> {
        BUILTINS.iter().copied().find(|b| b.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Sin => "sin",
            Builtin::Cos => "cos",
            Builtin::Tan => "tan",
            Builtin::Asin => "asin",
            Builtin::Acos => "acos",
            Builtin::Atan => "atan",
            Builtin::Atan2 => "atan2",
            Builtin::Sqrt => "sqrt",
            Builtin::Abs => "abs",
            Builtin::Floor => "floor",
            Builtin::Ceil => "ceil",
            Builtin::Round => "round",
            Builtin::Min => "min",
            Builtin::Max => "max",
            Builtin::Pow => "pow",
            Builtin::Exp => "exp",
            Builtin::Log => "log",
            Builtin::Sign => "sign",
            Builtin::Random => "random",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Builtin::Random => Arity::Exact(0),
            Builtin::Atan2 | Builtin::Pow => Arity::Exact(2),
            Builtin::Min | Builtin::Max => Arity::AtLeast(1),
            Builtin::Sin
            | Builtin::Cos
            | Builtin::Tan
            | Builtin::Asin
            | Builtin::Acos
            | Builtin::Atan
            | Builtin::Sqrt
            | Builtin::Abs
            | Builtin::Floor
            | Builtin::Ceil
            | Builtin::Round
            | Builtin::Exp
            | Builtin::Log
            | Builtin::Sign => Arity::Exact(1),
        }
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        BUILTINS.iter().map(|b| b.name())
    }
}

/// Named constants, used when the context does not define the name.
pub fn constant(name: &str) -> Option<f64> {
    match name {
        "PI" => Some(std::f64::consts::PI),
        "E" => Some(std::f64::consts::E),
        _ => None,
    }
}

use std::ops::{Add, Div, Mul, Neg, Sub};

/// Type tag carried by scalar expressions.
pub const DOUBLE: &str = "double";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Constant,
    Variable,
    Add,
    Subtract,
    Multiply,
    Divide,
    Negate,
    /// `arg1` applied to `arg2`, rendered as `f(x)`.
    Apply,
    /// `arg1.name(arg2, arg3)`.
    Method,
    /// Named function of up to three operands.
    Function,
}

/// Node of an arithmetic syntax tree.
///
/// Every node exclusively owns its children, so `clone` is a deep copy and
/// siblings can be rewritten independently. Equality is structural: `kind`,
/// `type` and `name` must match and children must be pairwise equal. The
/// numeric value of a constant is folded into its name.
#[derive(Clone, Debug)]
pub struct Expression {
    name: String,
    ty: String,
    kind: Kind,
    value: f64,
    unlazy: bool,
    arg1: Option<Box<Expression>>,
    arg2: Option<Box<Expression>>,
    arg3: Option<Box<Expression>>,
}

impl Expression {
    fn leaf(kind: Kind, name: String, value: f64) -> Self {
        Self {
            name,
            ty: DOUBLE.to_string(),
            kind,
            value,
            unlazy: false,
            arg1: None,
            arg2: None,
            arg3: None,
        }
    }

    /// Constant literal.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not finite; the text form has no literal for it.
    ///
    /// ```
    /// use deft_expression::Expression;
    /// let five = Expression::constant(5.0);
    /// assert_eq!(five.depth(), 1);
    /// assert!(!five.is_unlazy());
    /// ```
    pub fn constant(value: f64) -> Self {
        assert!(value.is_finite(), "Constants must be finite, got {}.", value);
        Self::leaf(Kind::Constant, format!("{:?}", value), value)
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::leaf(Kind::Variable, name.into(), 0.0)
    }

    fn node(kind: Kind, name: String, ty: String, args: Vec<Expression>) -> Self {
        assert!(args.len() <= 3, "An expression has at most three operands.");
        let mut args = args.into_iter().map(Box::new);
        Self {
            name,
            ty,
            kind,
            value: 0.0,
            unlazy: false,
            arg1: args.next(),
            arg2: args.next(),
            arg3: args.next(),
        }
    }

    fn binary(kind: Kind, lhs: Expression, rhs: Expression) -> Self {
        let ty = if lhs.ty == DOUBLE {
            rhs.ty.clone()
        } else {
            lhs.ty.clone()
        };
        Self::node(kind, String::new(), ty, vec![lhs, rhs])
    }

    /// Named function application, `name(args...)`, with at most three
    /// operands.
    pub fn function(name: impl Into<String>, args: impl IntoIterator<Item = Expression>) -> Self {
        Self::node(
            Kind::Function,
            name.into(),
            DOUBLE.to_string(),
            args.into_iter().collect(),
        )
    }

    /// Method call on this expression, `self.name(args...)`, with at most two
    /// arguments.
    pub fn method(&self, name: impl Into<String>, args: impl IntoIterator<Item = Expression>) -> Self {
        let mut operands = vec![self.clone()];
        operands.extend(args);
        Self::node(Kind::Method, name.into(), self.ty.clone(), operands)
    }

    /// Applies this expression to `arg`, rendered as `self(arg)`.
    pub fn apply(&self, arg: &Expression) -> Self {
        Self::node(
            Kind::Apply,
            String::new(),
            self.ty.clone(),
            vec![self.clone(), arg.clone()],
        )
    }

    /// Sets the type tag of this node.
    pub fn with_type(mut self, ty: impl Into<String>) -> Self {
        self.ty = ty.into();
        self
    }

    /// Marks this node as one whose evaluation must not be deferred,
    /// reordered or elided.
    pub fn unlazy(mut self) -> Self {
        self.unlazy = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &str {
        &self.ty
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Whether this very node is flagged unlazy (descendants not considered).
    pub fn has_unlazy_flag(&self) -> bool {
        self.unlazy
    }

    pub fn is_leaf(&self) -> bool {
        self.arg1.is_none()
    }

    pub fn is_variable(&self) -> bool {
        self.kind == Kind::Variable
    }

    pub fn arg1(&self) -> Option<&Expression> {
        self.arg1.as_deref()
    }

    pub fn arg2(&self) -> Option<&Expression> {
        self.arg2.as_deref()
    }

    pub fn arg3(&self) -> Option<&Expression> {
        self.arg3.as_deref()
    }

    fn assert_well_formed(&self) {
        assert!(
            self.arg3.is_none() || (self.arg1.is_some() && self.arg2.is_some()),
            "Malformed expression: arg3 is set but arg1 or arg2 is missing."
        );
        assert!(
            self.arg2.is_none() || self.arg1.is_some(),
            "Malformed expression: arg2 is set but arg1 is missing."
        );
    }

    /// Present children in order `arg1`, `arg2`, `arg3`.
    pub fn children(&self) -> impl Iterator<Item = &Expression> {
        self.assert_well_formed();
        [&self.arg1, &self.arg2, &self.arg3]
            .into_iter()
            .flatten()
            .map(|arg| &**arg)
    }

    pub(crate) fn children_mut(&mut self) -> impl Iterator<Item = &mut Expression> {
        self.assert_well_formed();
        [&mut self.arg1, &mut self.arg2, &mut self.arg3]
            .into_iter()
            .flatten()
            .map(|arg| &mut **arg)
    }

    fn take_children(&mut self) -> impl Iterator<Item = Box<Expression>> {
        [self.arg1.take(), self.arg2.take(), self.arg3.take()]
            .into_iter()
            .flatten()
    }
}

// Dismantles the tree with a work stack, so dropping a long chain cannot
// overflow the call stack.
impl Drop for Expression {
    fn drop(&mut self) {
        let mut stack: Vec<Box<Expression>> = self.take_children().collect();
        while let Some(mut expr) = stack.pop() {
            stack.extend(expr.take_children());
        }
    }
}

/// Named function application, `name(args...)`.
///
/// ```
/// use deft_expression::{funexpr, Expression};
/// let x = Expression::variable("x");
/// assert_eq!(funexpr("exp", [x]).to_string(), "exp(x)");
/// ```
pub fn funexpr(name: &str, args: impl IntoIterator<Item = Expression>) -> Expression {
    Expression::function(name, args)
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.ty == other.ty
            && self.name == other.name
            && self.arg1 == other.arg1
            && self.arg2 == other.arg2
            && self.arg3 == other.arg3
    }
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}

impl From<&str> for Expression {
    fn from(name: &str) -> Self {
        Self::variable(name)
    }
}

impl Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        let ty = self.ty.clone();
        Expression::node(Kind::Negate, String::new(), ty, vec![self])
    }
}

impl Neg for &Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        -self.clone()
    }
}

macro_rules! impl_binary_op {
    ($op:ident, $method:ident, $kind:expr) => {
        impl $op for Expression {
            type Output = Expression;
            fn $method(self, rhs: Expression) -> Expression {
                Expression::binary($kind, self, rhs)
            }
        }

        impl $op<&Expression> for Expression {
            type Output = Expression;
            fn $method(self, rhs: &Expression) -> Expression {
                Expression::binary($kind, self, rhs.clone())
            }
        }

        impl $op<Expression> for &Expression {
            type Output = Expression;
            fn $method(self, rhs: Expression) -> Expression {
                Expression::binary($kind, self.clone(), rhs)
            }
        }

        impl $op<&Expression> for &Expression {
            type Output = Expression;
            fn $method(self, rhs: &Expression) -> Expression {
                Expression::binary($kind, self.clone(), rhs.clone())
            }
        }

        impl $op<f64> for Expression {
            type Output = Expression;
            fn $method(self, rhs: f64) -> Expression {
                Expression::binary($kind, self, Expression::constant(rhs))
            }
        }

        impl $op<f64> for &Expression {
            type Output = Expression;
            fn $method(self, rhs: f64) -> Expression {
                Expression::binary($kind, self.clone(), Expression::constant(rhs))
            }
        }

        impl $op<Expression> for f64 {
            type Output = Expression;
            fn $method(self, rhs: Expression) -> Expression {
                Expression::binary($kind, Expression::constant(self), rhs)
            }
        }

        impl $op<&Expression> for f64 {
            type Output = Expression;
            fn $method(self, rhs: &Expression) -> Expression {
                Expression::binary($kind, Expression::constant(self), rhs.clone())
            }
        }
    };
}

impl_binary_op!(Add, add, Kind::Add);
impl_binary_op!(Sub, sub, Kind::Subtract);
impl_binary_op!(Mul, mul, Kind::Multiply);
impl_binary_op!(Div, div, Kind::Divide);

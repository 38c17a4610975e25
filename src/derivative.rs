use crate::{
    error::ExpressionError,
    expression::{funexpr, Expression, Kind},
    hoist::MAX_DEPTH,
};

// Trivially zero or one constants, folded away while building derivatives.
fn is_zero(e: &Expression) -> bool {
    e.kind() == Kind::Constant && e.value() == 0.0
}

fn is_one(e: &Expression) -> bool {
    e.kind() == Kind::Constant && e.value() == 1.0
}

fn negate(a: Expression) -> Expression {
    if is_zero(&a) {
        a
    } else if a.kind() == Kind::Constant {
        Expression::constant(-a.value())
    } else {
        -a
    }
}

fn sum(a: Expression, b: Expression) -> Expression {
    if is_zero(&a) {
        b
    } else if is_zero(&b) {
        a
    } else {
        a + b
    }
}

fn difference(a: Expression, b: Expression) -> Expression {
    if is_zero(&b) {
        a
    } else if is_zero(&a) {
        negate(b)
    } else {
        a - b
    }
}

fn product(a: Expression, b: Expression) -> Expression {
    if is_zero(&a) || is_zero(&b) {
        Expression::constant(0.0)
    } else if is_one(&a) {
        b
    } else if is_one(&b) {
        a
    } else {
        a * b
    }
}

fn quotient(a: Expression, b: Expression) -> Expression {
    if is_zero(&a) {
        Expression::constant(0.0)
    } else if is_one(&b) {
        a
    } else {
        a / b
    }
}

impl Expression {
    /// Symbolic derivative with respect to the variable `var`.
    ///
    /// ```
    /// use deft_expression::parse;
    /// let e = parse("x * x + 3.0 * y").unwrap();
    /// assert_eq!(e.derive("x").unwrap().to_string(), "x + x");
    /// assert_eq!(e.derive("y").unwrap().to_string(), "3.0");
    /// ```
    pub fn derive(&self, var: &str) -> Result<Expression, ExpressionError> {
        self.check_depth(MAX_DEPTH)?;
        self.derive_unchecked(var)
    }

    fn derive_unchecked(&self, var: &str) -> Result<Expression, ExpressionError> {
        if !self.find_variable(var) {
            return Ok(Expression::constant(0.0));
        }
        let args: Vec<&Expression> = self.children().collect();
        let derivative = match self.kind() {
            Kind::Variable => Expression::constant(1.0),
            Kind::Add => sum(args[0].derive_unchecked(var)?, args[1].derive_unchecked(var)?),
            Kind::Subtract => difference(
                args[0].derive_unchecked(var)?,
                args[1].derive_unchecked(var)?,
            ),
            Kind::Multiply => {
                let (a, b) = (args[0], args[1]);
                sum(
                    product(a.derive_unchecked(var)?, b.clone()),
                    product(a.clone(), b.derive_unchecked(var)?),
                )
            }
            Kind::Divide => {
                let (a, b) = (args[0], args[1]);
                difference(
                    quotient(a.derive_unchecked(var)?, b.clone()),
                    quotient(product(a.clone(), b.derive_unchecked(var)?), product(b.clone(), b.clone())),
                )
            }
            Kind::Negate => negate(args[0].derive_unchecked(var)?),
            Kind::Function if args.len() == 1 => {
                let u = args[0];
                let outer = match self.name() {
                    "exp" => self.clone(),
                    "log" => quotient(Expression::constant(1.0), u.clone()),
                    "sqrt" => Expression::constant(0.5) / self.clone(),
                    "sqr" => Expression::constant(2.0) * u.clone(),
                    "sin" => funexpr("cos", [u.clone()]),
                    "cos" => negate(funexpr("sin", [u.clone()])),
                    _ => return Err(self.not_differentiable(var)),
                };
                product(outer, u.derive_unchecked(var)?)
            }
            _ => return Err(self.not_differentiable(var)),
        };
        Ok(derivative)
    }

    fn not_differentiable(&self, var: &str) -> ExpressionError {
        ExpressionError::NotDifferentiable(self.printme(), var.to_string())
    }
}

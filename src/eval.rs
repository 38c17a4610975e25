use crate::{
    error::ExpressionError,
    expression::{Expression, Kind},
};
use std::collections::HashMap;

/// Values of the variables an expression is evaluated with.
pub type Bindings = HashMap<String, f64>;

fn apply_function(name: &str, x: f64) -> Option<f64> {
    let y = match name {
        "exp" => x.exp(),
        "log" => x.ln(),
        "sqrt" => x.sqrt(),
        "sqr" => x * x,
        "sin" => x.sin(),
        "cos" => x.cos(),
        _ => return None,
    };
    Some(y)
}

impl Expression {
    /// Evaluates a scalar expression.
    ///
    /// ```
    /// use deft_expression::{parse, Bindings};
    /// let e = parse("sqr(x) + 2.0 * x").unwrap();
    /// let bindings = Bindings::from([("x".to_string(), 3.0)]);
    /// assert_eq!(e.evaluate(&bindings).unwrap(), 15.0);
    /// ```
    pub fn evaluate(&self, bindings: &Bindings) -> Result<f64, ExpressionError> {
        let args = self
            .children()
            .map(|arg| arg.evaluate(bindings))
            .collect::<Result<Vec<f64>, _>>();
        let value = match self.kind() {
            Kind::Constant => self.value(),
            Kind::Variable => *bindings
                .get(self.name())
                .ok_or_else(|| ExpressionError::UnboundVariable(self.name().to_string()))?,
            Kind::Add => {
                let args = args?;
                args[0] + args[1]
            }
            Kind::Subtract => {
                let args = args?;
                args[0] - args[1]
            }
            Kind::Multiply => {
                let args = args?;
                args[0] * args[1]
            }
            Kind::Divide => {
                let args = args?;
                args[0] / args[1]
            }
            Kind::Negate => -args?[0],
            Kind::Function => {
                let args = args?;
                match args[..] {
                    [x] => apply_function(self.name(), x)
                        .ok_or_else(|| ExpressionError::UnknownFunction(self.name().to_string()))?,
                    _ => return Err(ExpressionError::UnknownFunction(self.name().to_string())),
                }
            }
            Kind::Method | Kind::Apply => {
                return Err(ExpressionError::UnknownFunction(self.printme()))
            }
        };
        Ok(value)
    }
}

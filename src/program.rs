use anyhow::Result;
use std::fmt;

use crate::{
    codegen::{CodeGenerator, GeneratedCode},
    eval::Bindings,
    expression::Expression,
    parser::Parser,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
    /// `const double t0 = ...;` declarations and a `return` statement.
    Cxx,
    /// `t0 = ...` assignments and the bare result.
    Plain,
}

/// Functional formula, ready to be differentiated, evaluated or turned into
/// code.
pub struct FunctionalProgram {
    expr: Expression,
    generator: CodeGenerator,
}

impl FunctionalProgram {
    /// Compiles the text form of an expression.
    ///
    /// ```
    /// use deft_expression::{FunctionalProgram, Style};
    /// let program = FunctionalProgram::compile("sqr(n) * sqr(n) + n").unwrap();
    /// assert_eq!(
    ///     program.to_source(Style::Plain).unwrap(),
    ///     "t0 = sqr(n)\nt0 * t0 + n\n"
    /// );
    /// ```
    pub fn compile(source: &str) -> Result<Self> {
        let expr = Parser::parse(source)?;
        Ok(Self::from_expression(expr))
    }

    pub fn from_expression(expr: Expression) -> Self {
        Self {
            expr,
            generator: CodeGenerator::new(),
        }
    }

    pub fn expression(&self) -> &Expression {
        &self.expr
    }

    /// Sets the prefix of the temporaries introduced by code generation.
    pub fn set_temporary_prefix(&mut self, prefix: &str) {
        self.generator = self.generator.clone().with_prefix(prefix);
    }

    /// Replaces the formula by its derivative with respect to `var`.
    ///
    /// ```
    /// use deft_expression::FunctionalProgram;
    /// let mut program = FunctionalProgram::compile("exp(-V / kT)").unwrap();
    /// program.derive("V").unwrap();
    /// assert_eq!(program.to_string(), "exp(-V / kT) * (-1.0 / kT)");
    /// ```
    pub fn derive(&mut self, var: &str) -> Result<()> {
        self.expr = self.expr.derive(var)?;
        Ok(())
    }

    pub fn evaluate(&self, bindings: &Bindings) -> Result<f64> {
        Ok(self.expr.evaluate(bindings)?)
    }

    pub fn generate(&self) -> Result<GeneratedCode> {
        Ok(self.generator.generate(&self.expr)?)
    }

    /// Produces source code computing this formula with every common
    /// subexpression computed once.
    pub fn to_source(&self, style: Style) -> Result<String> {
        Ok(self.generate()?.to_source(style))
    }
}

impl fmt::Display for FunctionalProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.expr, f)
    }
}

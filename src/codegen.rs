use crate::{
    error::ExpressionError,
    eval::Bindings,
    expression::Expression,
    hoist::MAX_DEPTH,
    printer::StatementPrinter,
    Style,
};
use tracing::{debug, trace};

/// Assignment of a hoisted subexpression to a named temporary.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub name: String,
    pub ty: String,
    pub value: Expression,
}

/// Straight-line code: statements to run in order, then the result.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedCode {
    pub statements: Vec<Statement>,
    pub result: Expression,
}

impl GeneratedCode {
    pub fn to_source(&self, style: Style) -> String {
        StatementPrinter::new(style).print(self)
    }

    /// Runs the statements in order, then evaluates the result.
    pub fn evaluate(&self, bindings: &Bindings) -> Result<f64, ExpressionError> {
        let mut scope = bindings.clone();
        for statement in &self.statements {
            let value = statement.value.evaluate(&scope)?;
            scope.insert(statement.name.clone(), value);
        }
        self.result.evaluate(&scope)
    }
}

/// Hoists unlazy and repeated subexpressions into temporaries.
///
/// ```
/// use deft_expression::{parse, CodeGenerator, Style};
/// let e = parse("exp(a * b) + exp(a * b) + c").unwrap();
/// let code = CodeGenerator::new().generate(&e).unwrap();
/// assert_eq!(
///     code.to_source(Style::Cxx),
///     "const double t0 = exp(a * b);\nreturn t0 + t0 + c;\n"
/// );
/// ```
#[derive(Clone, Debug)]
pub struct CodeGenerator {
    prefix: String,
    max_depth: usize,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self {
            prefix: "t".to_string(),
            max_depth: MAX_DEPTH,
        }
    }

    /// Temporaries are named `<prefix>0`, `<prefix>1`, ...
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn generate(&self, expr: &Expression) -> Result<GeneratedCode, ExpressionError> {
        expr.check_depth(self.max_depth)?;
        let taken = expr.identifiers();
        let mut counter = 0;
        let mut fresh_name = || loop {
            let name = format!("{}{}", self.prefix, counter);
            counter += 1;
            if !taken.contains(&name) {
                break name;
            }
        };

        let mut result = expr.clone();
        let mut statements: Vec<Statement> = Vec::new();
        while let Some(candidate) = Self::next_candidate(&result) {
            let name = fresh_name();
            debug!("hoisting {} into {}", candidate, name);
            result.eliminate_subexpression(&candidate, &name);
            // Earlier statements may use the candidate too; it must then be
            // computed before the first of them.
            let mut position = None;
            for (i, statement) in statements.iter_mut().enumerate() {
                if statement.value.eliminate_subexpression(&candidate, &name) {
                    position.get_or_insert(i);
                }
            }
            let position = position.unwrap_or(statements.len());
            statements.insert(
                position,
                Statement {
                    name,
                    ty: candidate.ty().to_string(),
                    value: candidate,
                },
            );
        }
        debug!("generated {} statements", statements.len());
        Ok(GeneratedCode { statements, result })
    }

    fn next_candidate(tree: &Expression) -> Option<Expression> {
        if let Some(cs) = tree.find_common_subexpression() {
            // An unlazy root is already computed exactly once.
            if !std::ptr::eq(cs, tree) {
                trace!("unlazy subexpression {}", cs);
                return Some(cs.clone());
            }
        }
        let repeated = tree.find_hoistable_subexpression()?;
        trace!("repeated subexpression {}", repeated);
        Some(repeated.clone())
    }
}

use crate::{
    codegen::GeneratedCode,
    expression::{Expression, Kind},
    Style,
};
use std::fmt;

const SUM: u8 = 1;
const PRODUCT: u8 = 2;
const UNARY: u8 = 3;
const POSTFIX: u8 = 4;
const ATOM: u8 = 5;
// Forces parentheses around any operand.
const ALWAYS: u8 = ATOM + 1;

fn precedence(expr: &Expression) -> u8 {
    match expr.kind() {
        Kind::Add | Kind::Subtract => SUM,
        Kind::Multiply | Kind::Divide => PRODUCT,
        Kind::Negate => UNARY,
        Kind::Constant if expr.name().starts_with('-') => UNARY,
        Kind::Apply | Kind::Method => POSTFIX,
        Kind::Constant | Kind::Variable | Kind::Function => ATOM,
    }
}

/// Prints an expression in infix notation with as few parentheses as
/// needed to parse it back into the same tree.
pub(crate) struct InfixPrinter;

impl InfixPrinter {
    pub(crate) fn print(expr: &Expression) -> String {
        let mut output = String::new();
        Self::print_expr(expr, &mut output, 0);
        output
    }

    fn print_expr(expr: &Expression, output: &mut String, min_precedence: u8) {
        let need_paren = precedence(expr) < min_precedence;
        if need_paren {
            output.push('(');
        }
        let args: Vec<&Expression> = expr.children().collect();
        match expr.kind() {
            Kind::Constant | Kind::Variable => output.push_str(expr.name()),
            Kind::Add | Kind::Subtract | Kind::Multiply | Kind::Divide => {
                let (op, level) = match expr.kind() {
                    Kind::Add => (" + ", SUM),
                    Kind::Subtract => (" - ", SUM),
                    Kind::Multiply => (" * ", PRODUCT),
                    _ => (" / ", PRODUCT),
                };
                Self::print_expr(args[0], output, level);
                output.push_str(op);
                Self::print_expr(args[1], output, level + 1);
            }
            Kind::Negate => {
                output.push('-');
                let operand = args[0];
                if operand.kind() == Kind::Constant {
                    Self::print_expr(operand, output, ALWAYS);
                } else {
                    Self::print_expr(operand, output, POSTFIX);
                }
            }
            Kind::Apply => {
                Self::print_expr(args[0], output, ALWAYS);
                output.push('(');
                Self::print_expr(args[1], output, 0);
                output.push(')');
            }
            Kind::Method => {
                let receiver = args[0];
                if receiver.kind() == Kind::Constant {
                    Self::print_expr(receiver, output, ALWAYS);
                } else {
                    Self::print_expr(receiver, output, POSTFIX);
                }
                output.push('.');
                output.push_str(expr.name());
                Self::print_arguments(&args[1..], output);
            }
            Kind::Function => {
                output.push_str(expr.name());
                Self::print_arguments(&args, output);
            }
        }
        if need_paren {
            output.push(')');
        }
    }

    fn print_arguments(args: &[&Expression], output: &mut String) {
        output.push('(');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                output.push_str(", ");
            }
            Self::print_expr(arg, output, 0);
        }
        output.push(')');
    }
}

impl Expression {
    /// Deterministic infix rendering of this tree, accepted by
    /// [`crate::parse`].
    pub fn printme(&self) -> String {
        InfixPrinter::print(self)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.printme())
    }
}

/// Prints generated code as a sequence of assignments followed by the
/// result, substituting declarations and terminators per style.
pub(crate) struct StatementPrinter {
    declare: bool,
    terminator: &'static str,
    result_prefix: &'static str,
}

impl StatementPrinter {
    pub(crate) fn new(style: Style) -> Self {
        match style {
            Style::Cxx => Self {
                declare: true,
                terminator: ";",
                result_prefix: "return ",
            },
            Style::Plain => Self {
                declare: false,
                terminator: "",
                result_prefix: "",
            },
        }
    }

    pub(crate) fn print(&self, code: &GeneratedCode) -> String {
        let mut output = String::new();
        for statement in &code.statements {
            if self.declare {
                output.push_str("const ");
                output.push_str(&statement.ty);
                output.push(' ');
            }
            output.push_str(&statement.name);
            output.push_str(" = ");
            output.push_str(&statement.value.printme());
            output.push_str(self.terminator);
            output.push('\n');
        }
        output.push_str(self.result_prefix);
        output.push_str(&code.result.printme());
        output.push_str(self.terminator);
        output.push('\n');
        output
    }
}

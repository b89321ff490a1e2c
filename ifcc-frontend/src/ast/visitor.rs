//! Traversal contract over the syntax tree
//!
//! Implementors provide one method per node kind. `visit_statement` and
//! `visit_expression` dispatch on the node kind and rarely need overriding.

use super::expressions::{Expression, ExpressionKind};
use super::ops::{AssignOp, BinaryOp, UnaryOp};
use super::statements::{Declaration, Identifier, Program, Statement, StatementKind};
use ifcc_common::SourceLocation;

pub trait Visitor {
    /// What visiting an expression produces
    type Value;
    type Error;

    fn visit_program(&mut self, program: &Program) -> Result<(), Self::Error>;

    fn visit_declaration(
        &mut self,
        declaration: &Declaration,
        location: SourceLocation,
    ) -> Result<(), Self::Error>;

    fn visit_assignment(
        &mut self,
        target: &Identifier,
        op: AssignOp,
        value: &Expression,
        location: SourceLocation,
    ) -> Result<(), Self::Error>;

    fn visit_return(&mut self, value: &Expression, location: SourceLocation) -> Result<(), Self::Error>;

    fn visit_if(
        &mut self,
        condition: &Expression,
        then_stmt: &Statement,
        else_stmt: Option<&Statement>,
        location: SourceLocation,
    ) -> Result<(), Self::Error>;

    fn visit_while(
        &mut self,
        condition: &Expression,
        body: &Statement,
        location: SourceLocation,
    ) -> Result<(), Self::Error>;

    fn visit_break(&mut self, location: SourceLocation) -> Result<(), Self::Error>;

    fn visit_continue(&mut self, location: SourceLocation) -> Result<(), Self::Error>;

    fn visit_block(&mut self, statements: &[Statement]) -> Result<(), Self::Error> {
        for statement in statements {
            self.visit_statement(statement)?;
        }
        Ok(())
    }

    fn visit_statement(&mut self, statement: &Statement) -> Result<(), Self::Error> {
        let location = statement.location;
        match &statement.kind {
            StatementKind::Declaration(declaration) => self.visit_declaration(declaration, location),
            StatementKind::Assignment { target, op, value } => {
                self.visit_assignment(target, *op, value, location)
            }
            StatementKind::Return(value) => self.visit_return(value, location),
            StatementKind::If { condition, then_stmt, else_stmt } => {
                self.visit_if(condition, then_stmt, else_stmt.as_deref(), location)
            }
            StatementKind::While { condition, body } => self.visit_while(condition, body, location),
            StatementKind::Break => self.visit_break(location),
            StatementKind::Continue => self.visit_continue(location),
            StatementKind::Compound(statements) => self.visit_block(statements),
            StatementKind::Empty => Ok(()),
        }
    }

    fn visit_int_literal(&mut self, value: i64, location: SourceLocation) -> Result<Self::Value, Self::Error>;

    fn visit_identifier(&mut self, name: &str, location: SourceLocation) -> Result<Self::Value, Self::Error>;

    fn visit_parenthesized(&mut self, inner: &Expression) -> Result<Self::Value, Self::Error> {
        self.visit_expression(inner)
    }

    fn visit_unary(
        &mut self,
        op: UnaryOp,
        operand: &Expression,
        location: SourceLocation,
    ) -> Result<Self::Value, Self::Error>;

    fn visit_binary(
        &mut self,
        op: BinaryOp,
        left: &Expression,
        right: &Expression,
        location: SourceLocation,
    ) -> Result<Self::Value, Self::Error>;

    fn visit_expression(&mut self, expression: &Expression) -> Result<Self::Value, Self::Error> {
        let location = expression.location;
        match &expression.kind {
            ExpressionKind::IntLiteral(value) => self.visit_int_literal(*value, location),
            ExpressionKind::Identifier(name) => self.visit_identifier(name, location),
            ExpressionKind::Parenthesized(inner) => self.visit_parenthesized(inner),
            ExpressionKind::Unary { op, operand } => self.visit_unary(*op, operand, location),
            ExpressionKind::Binary { op, left, right } => self.visit_binary(*op, left, right, location),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Frontend;

    /// Renders expressions back to fully parenthesised text and counts statements
    #[derive(Default)]
    struct Printer {
        statements: Vec<String>,
    }

    impl Visitor for Printer {
        type Value = String;
        type Error = ();

        fn visit_program(&mut self, program: &Program) -> Result<(), ()> {
            self.visit_block(&program.function.body)
        }

        fn visit_declaration(&mut self, declaration: &Declaration, _: SourceLocation) -> Result<(), ()> {
            for declarator in &declaration.declarators {
                let init = match &declarator.initializer {
                    Some(expr) => format!(" = {}", self.visit_expression(expr)?),
                    None => String::new(),
                };
                self.statements
                    .push(format!("{} {}{}", declaration.decl_type, declarator.name.name, init));
            }
            Ok(())
        }

        fn visit_assignment(
            &mut self,
            target: &Identifier,
            op: AssignOp,
            value: &Expression,
            _: SourceLocation,
        ) -> Result<(), ()> {
            let value = self.visit_expression(value)?;
            self.statements.push(format!("{} {op} {value}", target.name));
            Ok(())
        }

        fn visit_return(&mut self, value: &Expression, _: SourceLocation) -> Result<(), ()> {
            let value = self.visit_expression(value)?;
            self.statements.push(format!("return {value}"));
            Ok(())
        }

        fn visit_if(
            &mut self,
            condition: &Expression,
            then_stmt: &Statement,
            else_stmt: Option<&Statement>,
            _: SourceLocation,
        ) -> Result<(), ()> {
            let condition = self.visit_expression(condition)?;
            self.statements.push(format!("if {condition}"));
            self.visit_statement(then_stmt)?;
            if let Some(else_stmt) = else_stmt {
                self.statements.push("else".to_string());
                self.visit_statement(else_stmt)?;
            }
            Ok(())
        }

        fn visit_while(&mut self, condition: &Expression, body: &Statement, _: SourceLocation) -> Result<(), ()> {
            let condition = self.visit_expression(condition)?;
            self.statements.push(format!("while {condition}"));
            self.visit_statement(body)
        }

        fn visit_break(&mut self, _: SourceLocation) -> Result<(), ()> {
            self.statements.push("break".to_string());
            Ok(())
        }

        fn visit_continue(&mut self, _: SourceLocation) -> Result<(), ()> {
            self.statements.push("continue".to_string());
            Ok(())
        }

        fn visit_int_literal(&mut self, value: i64, _: SourceLocation) -> Result<String, ()> {
            Ok(value.to_string())
        }

        fn visit_identifier(&mut self, name: &str, _: SourceLocation) -> Result<String, ()> {
            Ok(name.to_string())
        }

        fn visit_unary(&mut self, op: UnaryOp, operand: &Expression, _: SourceLocation) -> Result<String, ()> {
            Ok(format!("({op}{})", self.visit_expression(operand)?))
        }

        fn visit_binary(
            &mut self,
            op: BinaryOp,
            left: &Expression,
            right: &Expression,
            _: SourceLocation,
        ) -> Result<String, ()> {
            let left = self.visit_expression(left)?;
            let right = self.visit_expression(right)?;
            Ok(format!("({left} {op} {right})"))
        }
    }

    #[test]
    fn test_default_dispatch_walks_every_statement() {
        let program = Frontend::parse_source(
            "int main() { int a = 1, b; b = a + 2 * 3; while (a < 3) { a += 1; if (a == 2) break; else continue; } return -b; }",
        )
        .unwrap();

        let mut printer = Printer::default();
        printer.visit_program(&program).unwrap();

        assert_eq!(
            printer.statements,
            vec![
                "int a = 1",
                "int b",
                "b = (a + (2 * 3))",
                "while (a < 3)",
                "a += 1",
                "if (a == 2)",
                "break",
                "else",
                "continue",
                "return (-b)",
            ]
        );
    }
}

//! Grammar productions for J--.
//!
//! This module implements all `parse_*` methods as an extension of `Parser`.
//! Declaration and statement lists are pushed back-to-front, the way the
//! right-recursive productions reduce; `ast::normalize` restores source
//! order in a single pass after parsing. Expression children are always
//! attached in source order.

use super::{ParseError, Parser};
use crate::ast::{Node, NodeKind, Op, Type, Value};
use crate::lexer::TokenKind;

impl Parser<'_> {
    pub(super) fn parse_program(&mut self) -> Result<Node, ParseError> {
        let mut prog = Node::new(NodeKind::Prog, 1).with_name(self.file_name().to_string());

        let mut decls = Vec::new();
        while !self.at_eof() {
            decls.push(self.parse_decl()?);
        }
        decls.reverse();
        prog.children = decls;
        Ok(prog)
    }

    /// `vardecl | funcdecl | maindecl`, all starting with a type keyword.
    fn parse_decl(&mut self) -> Result<Node, ParseError> {
        let line = self.current_line();
        let ty = self.parse_type()?;

        // `void main ( )` introduces the main declaration; any other header
        // is an ordinary function or variable declaration.
        if ty == Type::Void
            && self.at(TokenKind::Ident)
            && self.current_text() == "main"
            && self.nth(1) == TokenKind::ParenOpen
            && self.nth(2) == TokenKind::ParenClose
        {
            self.bump();
            self.bump();
            self.bump();
            let block = self.parse_block()?;
            let mut main = Node::new(NodeKind::MainDecl, line).with_name("main");
            main.children.push(block);
            return Ok(main);
        }

        let name = self.current_text().to_string();
        self.expect(TokenKind::Ident, "an identifier")?;

        if self.eat(TokenKind::ParenOpen) {
            let params = self.parse_params()?;
            self.expect(TokenKind::ParenClose, "')'")?;
            let block = self.parse_block()?;

            let mut func = Node::new(NodeKind::FuncDecl, line)
                .with_name(name)
                .with_type(ty);
            func.children.push(block);
            func.children.extend(params.into_iter().rev());
            Ok(func)
        } else {
            self.expect(TokenKind::Semi, "';'")?;
            Ok(Node::new(NodeKind::VarDecl, line)
                .with_name(name)
                .with_type(ty))
        }
    }

    fn parse_type(&mut self) -> Result<Type, ParseError> {
        let ty = match self.current() {
            TokenKind::KwInt => Type::Int,
            TokenKind::KwBoolean => Type::Boolean,
            TokenKind::KwVoid => Type::Void,
            _ => return Err(self.error("expected a type")),
        };
        self.bump();
        Ok(ty)
    }

    /// Comma-separated formal parameters, possibly empty. Positional indices
    /// are 1-based in declaration order.
    fn parse_params(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut params = Vec::new();
        if self.at(TokenKind::ParenClose) {
            return Ok(params);
        }
        loop {
            let line = self.current_line();
            let ty = self.parse_type()?;
            let name = self.current_text().to_string();
            self.expect(TokenKind::Ident, "a parameter name")?;
            let mut param = Node::new(NodeKind::Param, line).with_name(name).with_type(ty);
            param.param_index = params.len() as u32 + 1;
            params.push(param);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(params)
    }

    fn parse_block(&mut self) -> Result<Node, ParseError> {
        let line = self.current_line();
        self.expect(TokenKind::BraceOpen, "'{'")?;
        let mut stmts = Vec::new();
        while !self.at(TokenKind::BraceClose) {
            if self.at_eof() {
                return Err(self.error("expected '}'"));
            }
            stmts.push(self.parse_stmt()?);
        }
        self.bump();
        stmts.reverse();
        Ok(Node::new(NodeKind::Block, line).with_children(stmts))
    }

    fn parse_stmt(&mut self) -> Result<Node, ParseError> {
        let line = self.current_line();
        match self.current() {
            TokenKind::KwInt | TokenKind::KwBoolean | TokenKind::KwVoid => {
                let ty = self.parse_type()?;
                let name = self.current_text().to_string();
                self.expect(TokenKind::Ident, "an identifier")?;
                self.expect(TokenKind::Semi, "';'")?;
                Ok(Node::new(NodeKind::VarDecl, line)
                    .with_name(name)
                    .with_type(ty))
            }
            TokenKind::KwIf => self.parse_if(),
            TokenKind::KwWhile => self.parse_while(),
            TokenKind::KwReturn => self.parse_return(),
            TokenKind::KwBreak => {
                self.bump();
                self.expect(TokenKind::Semi, "';'")?;
                Ok(Node::new(NodeKind::Break, line))
            }
            TokenKind::Semi => {
                self.bump();
                Ok(Node::new(NodeKind::Null, line))
            }
            TokenKind::Ident => {
                if self.nth(1) == TokenKind::ParenOpen {
                    let call = self.parse_func_call()?;
                    self.expect(TokenKind::Semi, "';'")?;
                    Ok(call)
                } else {
                    self.parse_assignment()
                }
            }
            _ => Err(self.error("expected a statement")),
        }
    }

    /// `ID '=' expr ';'`. The target name is stored on the node and the
    /// left-hand identifier kept as the first child for resolution.
    fn parse_assignment(&mut self) -> Result<Node, ParseError> {
        let line = self.current_line();
        let name = self.current_text().to_string();
        self.expect(TokenKind::Ident, "an identifier")?;
        self.expect(TokenKind::Eq, "'='")?;
        let rhs = self.parse_expr()?;
        self.expect(TokenKind::Semi, "';'")?;

        let lhs = Node::new(NodeKind::Id, line).with_name(name.clone());
        Ok(Node::new(NodeKind::Assn, line)
            .with_name(name)
            .with_children(vec![lhs, rhs]))
    }

    fn parse_if(&mut self) -> Result<Node, ParseError> {
        let line = self.current_line();
        self.bump();
        self.expect(TokenKind::ParenOpen, "'('")?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::ParenClose, "')'")?;
        let then_block = self.parse_block()?;

        let mut node = Node::new(NodeKind::If, line).with_children(vec![cond, then_block]);
        if self.at(TokenKind::KwElse) {
            let else_line = self.current_line();
            self.bump();
            let else_block = self.parse_block()?;
            node.children
                .push(Node::new(NodeKind::Else, else_line).with_children(vec![else_block]));
        }
        Ok(node)
    }

    fn parse_while(&mut self) -> Result<Node, ParseError> {
        let line = self.current_line();
        self.bump();
        self.expect(TokenKind::ParenOpen, "'('")?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::ParenClose, "')'")?;
        let body = self.parse_block()?;
        Ok(Node::new(NodeKind::While, line).with_children(vec![cond, body]))
    }

    fn parse_return(&mut self) -> Result<Node, ParseError> {
        let line = self.current_line();
        self.bump();
        let mut node = Node::new(NodeKind::Return, line);
        if !self.at(TokenKind::Semi) {
            node.children.push(self.parse_expr()?);
        }
        self.expect(TokenKind::Semi, "';'")?;
        Ok(node)
    }

    // Expressions: standard precedence climbing, left-associative at each
    // level: || , && , == != , < > <= >= , + - , * / % , unary ! - , primary.

    pub(super) fn parse_expr(&mut self) -> Result<Node, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Node, ParseError> {
        let mut lhs = self.parse_and()?;
        while self.at(TokenKind::PipePipe) {
            let line = self.current_line();
            self.bump();
            let rhs = self.parse_and()?;
            lhs = binary(NodeKind::Logical, Op::Or, line, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Node, ParseError> {
        let mut lhs = self.parse_equality()?;
        while self.at(TokenKind::AmpAmp) {
            let line = self.current_line();
            self.bump();
            let rhs = self.parse_equality()?;
            lhs = binary(NodeKind::Logical, Op::And, line, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> Result<Node, ParseError> {
        let mut lhs = self.parse_relational()?;
        loop {
            let op = match self.current() {
                TokenKind::EqEq => Op::Eq,
                TokenKind::BangEq => Op::Ne,
                _ => break,
            };
            let line = self.current_line();
            self.bump();
            let rhs = self.parse_relational()?;
            lhs = binary(NodeKind::Compare, op, line, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_relational(&mut self) -> Result<Node, ParseError> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = match self.current() {
                TokenKind::Lt => Op::Lt,
                TokenKind::Gt => Op::Gt,
                TokenKind::Le => Op::Le,
                TokenKind::Ge => Op::Ge,
                _ => break,
            };
            let line = self.current_line();
            self.bump();
            let rhs = self.parse_additive()?;
            lhs = binary(NodeKind::Compare, op, line, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<Node, ParseError> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.current() {
                TokenKind::Plus => Op::Add,
                TokenKind::Minus => Op::Sub,
                _ => break,
            };
            let line = self.current_line();
            self.bump();
            let rhs = self.parse_term()?;
            lhs = binary(NodeKind::Arithmetic, op, line, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Node, ParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.current() {
                TokenKind::Star => Op::Mul,
                TokenKind::Slash => Op::Div,
                TokenKind::Percent => Op::Mod,
                _ => break,
            };
            let line = self.current_line();
            self.bump();
            let rhs = self.parse_unary()?;
            lhs = binary(NodeKind::Arithmetic, op, line, lhs, rhs);
        }
        Ok(lhs)
    }

    /// Unary `!` and `-` build one-child nodes. A minus in front of a number
    /// stays a negation node; it is never folded into the literal.
    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        match self.current() {
            TokenKind::Bang => {
                let line = self.current_line();
                self.bump();
                let operand = self.parse_unary()?;
                Ok(Node::new(NodeKind::Logical, line)
                    .with_op(Op::Not)
                    .with_children(vec![operand]))
            }
            TokenKind::Minus => {
                let line = self.current_line();
                self.bump();
                let operand = self.parse_unary()?;
                Ok(Node::new(NodeKind::Arithmetic, line)
                    .with_op(Op::Sub)
                    .with_children(vec![operand]))
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let line = self.current_line();
        match self.current() {
            TokenKind::Number => {
                let value: i64 = self
                    .current_text()
                    .parse()
                    .map_err(|_| self.error("integer literal out of range"))?;
                self.bump();
                Ok(Node::new(NodeKind::Num, line)
                    .with_type(Type::Int)
                    .with_value(Value::Int(value)))
            }
            TokenKind::Str => {
                let text = self.current_text().to_string();
                self.bump();
                Ok(Node::new(NodeKind::Str, line)
                    .with_type(Type::Str)
                    .with_value(Value::Str(text)))
            }
            TokenKind::KwTrue => {
                self.bump();
                Ok(Node::new(NodeKind::Literal, line)
                    .with_type(Type::Boolean)
                    .with_value(Value::Bool(true)))
            }
            TokenKind::KwFalse => {
                self.bump();
                Ok(Node::new(NodeKind::Literal, line)
                    .with_type(Type::Boolean)
                    .with_value(Value::Bool(false)))
            }
            TokenKind::Ident => {
                if self.nth(1) == TokenKind::ParenOpen {
                    self.parse_func_call()
                } else {
                    let name = self.current_text().to_string();
                    self.bump();
                    Ok(Node::new(NodeKind::Id, line).with_name(name))
                }
            }
            TokenKind::ParenOpen => {
                self.bump();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::ParenClose, "')'")?;
                Ok(expr)
            }
            _ => Err(self.error("expected an expression")),
        }
    }

    /// `ID '(' (expr (',' expr)*)? ')'`, arguments kept in source order.
    fn parse_func_call(&mut self) -> Result<Node, ParseError> {
        let line = self.current_line();
        let name = self.current_text().to_string();
        self.expect(TokenKind::Ident, "a function name")?;
        self.expect(TokenKind::ParenOpen, "'('")?;

        let mut args = Vec::new();
        if !self.at(TokenKind::ParenClose) {
            loop {
                args.push(self.parse_expr()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::ParenClose, "')'")?;
        Ok(Node::new(NodeKind::FuncCall, line)
            .with_name(name)
            .with_children(args))
    }
}

fn binary(kind: NodeKind, op: Op, line: u32, lhs: Node, rhs: Node) -> Node {
    Node::new(kind, line).with_op(op).with_children(vec![lhs, rhs])
}

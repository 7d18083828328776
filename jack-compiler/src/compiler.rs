//! Recursive-descent parser/code generator for a single Jack class.
//!
//! Grounded in `original_source/projects/11/compiler.py`'s `Compiler` class:
//! same token-lookahead buffer, same class/subroutine symbol table split,
//! same emission rules. Restructured as explicit methods on a Rust struct
//! instead of mutable module-level state.

use std::collections::VecDeque;
use std::io::Write;

use jack_tokenizer::{Token, TokenKind, TokenValue, Tokenizer};

use crate::errors::{CompileError, JackError};
use crate::symbol_table::{SymbolRecord, SymbolTable, VarKind};

const PRIMITIVE_TYPES: &[&str] = &["int", "char", "boolean"];
const CLASS_VAR_KEYWORDS: &[&str] = &["static", "field"];
const SUBROUTINE_KEYWORDS: &[&str] = &["constructor", "function", "method"];
const STATEMENT_KEYWORDS: &[&str] = &["let", "if", "while", "do", "return"];
const KEYWORD_CONSTANTS: &[&str] = &["true", "false", "null", "this"];
const UNARY_SYMBOLS: &[char] = &['-', '~'];
const BINARY_SYMBOLS: &[char] = &['+', '-', '*', '/', '&', '|', '<', '>', '='];

fn binary_op_code(op: char) -> &'static str {
    match op {
        '+' => "add",
        '-' => "sub",
        '*' => "call Math.multiply 2",
        '/' => "call Math.divide 2",
        '&' => "and",
        '|' => "or",
        '<' => "lt",
        '>' => "gt",
        '=' => "eq",
        other => unreachable!("not a binary operator symbol: {other}"),
    }
}

fn describe(tok: &Token) -> String {
    match &tok.value {
        TokenValue::Keyword(s) | TokenValue::Ident(s) => s.clone(),
        TokenValue::Symbol(c) => c.to_string(),
        TokenValue::IntConst(n) => n.to_string(),
        TokenValue::StringConst(s) => format!("\"{s}\""),
    }
}

fn unexpected(tok: &Token, expected: &str) -> CompileError {
    JackError::UnexpectedToken {
        expected: expected.to_string(),
        found: describe(tok),
        line: tok.line,
        column: tok.column,
    }
    .into()
}

fn unexpected_eof(expected: &str) -> CompileError {
    JackError::UnexpectedToken {
        expected: expected.to_string(),
        found: "end of input".to_string(),
        line: 0,
        column: 0,
    }
    .into()
}

/// Compiles one Jack source buffer (one class) into VM text written to `W`.
pub struct Compiler<'a, W: Write> {
    tokenizer: Tokenizer<'a>,
    lookahead: VecDeque<Token>,
    class_symbols: SymbolTable,
    subroutine_symbols: SymbolTable,
    class_name: String,
    label_counter: u32,
    out: W,
}

impl<'a, W: Write> Compiler<'a, W> {
    pub fn new(source: &'a str, out: W) -> Self {
        Compiler {
            tokenizer: Tokenizer::new(source),
            lookahead: VecDeque::new(),
            class_symbols: SymbolTable::new(),
            subroutine_symbols: SymbolTable::new(),
            class_name: String::new(),
            label_counter: 0,
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &str) -> Result<(), CompileError> {
        writeln!(self.out, "{line}")?;
        Ok(())
    }

    fn make_label(&self, suffix: &str) -> String {
        format!("{}.L{}.{}", self.class_name, self.label_counter, suffix)
    }

    fn fill(&mut self, upto: usize) -> Result<(), CompileError> {
        while self.lookahead.len() <= upto {
            if self.tokenizer.has_next().map_err(JackError::from)? {
                let tok = self.tokenizer.advance().map_err(JackError::from)?;
                self.lookahead.push_back(tok);
            } else {
                break;
            }
        }
        Ok(())
    }

    fn peek(&mut self, offset: usize) -> Result<Option<&Token>, CompileError> {
        self.fill(offset)?;
        Ok(self.lookahead.get(offset))
    }

    fn bump(&mut self) -> Result<Token, CompileError> {
        self.fill(0)?;
        self.lookahead.pop_front().ok_or_else(|| unexpected_eof("a token"))
    }

    fn peek_is_keyword(&mut self, offset: usize, word: &str) -> Result<bool, CompileError> {
        Ok(matches!(self.peek(offset)?,
            Some(t) if t.kind == TokenKind::Keyword && t.as_word() == Some(word)))
    }

    fn peek_is_keyword_in(&mut self, offset: usize, words: &[&str]) -> Result<bool, CompileError> {
        Ok(matches!(self.peek(offset)?,
            Some(t) if t.kind == TokenKind::Keyword && t.as_word().is_some_and(|w| words.contains(&w))))
    }

    fn peek_is_symbol(&mut self, offset: usize, ch: char) -> Result<bool, CompileError> {
        Ok(matches!(self.peek(offset)?, Some(t) if t.as_symbol() == Some(ch)))
    }

    fn peek_is_symbol_in(&mut self, offset: usize, chars: &[char]) -> Result<bool, CompileError> {
        Ok(matches!(self.peek(offset)?,
            Some(t) if t.as_symbol().is_some_and(|c| chars.contains(&c))))
    }

    fn peek_is_kind(&mut self, offset: usize, kind: TokenKind) -> Result<bool, CompileError> {
        Ok(matches!(self.peek(offset)?, Some(t) if t.kind == kind))
    }

    fn expect_keyword(&mut self, word: &str) -> Result<(), CompileError> {
        let tok = self.bump()?;
        if tok.kind == TokenKind::Keyword && tok.as_word() == Some(word) {
            Ok(())
        } else {
            Err(unexpected(&tok, &format!("'{word}'")))
        }
    }

    fn expect_symbol(&mut self, ch: char) -> Result<(), CompileError> {
        let tok = self.bump()?;
        if tok.as_symbol() == Some(ch) {
            Ok(())
        } else {
            Err(unexpected(&tok, &ch.to_string()))
        }
    }

    fn expect_identifier(&mut self) -> Result<String, CompileError> {
        let tok = self.bump()?;
        match tok.value {
            TokenValue::Ident(s) => Ok(s),
            _ => Err(unexpected(&tok, "identifier")),
        }
    }

    fn compile_type(&mut self) -> Result<String, CompileError> {
        if self.peek_is_keyword_in(0, PRIMITIVE_TYPES)? {
            let tok = self.bump()?;
            Ok(tok.as_word().expect("checked by peek_is_keyword_in").to_string())
        } else {
            self.expect_identifier()
        }
    }

    fn lookup(&self, name: &str) -> Option<&SymbolRecord> {
        self.subroutine_symbols
            .get(name)
            .or_else(|| self.class_symbols.get(name))
    }

    /// # Errors
    /// Propagates [`CompileError`] on a malformed token stream, a duplicate
    /// symbol declaration, or a write failure.
    pub fn compile_class(&mut self) -> Result<(), CompileError> {
        self.expect_keyword("class")?;
        self.class_name = self.expect_identifier()?;
        self.expect_symbol('{')?;

        while self.peek_is_keyword_in(0, CLASS_VAR_KEYWORDS)? {
            self.compile_class_var_dec()?;
        }
        while self.peek_is_keyword_in(0, SUBROUTINE_KEYWORDS)? {
            self.compile_subroutine_dec()?;
        }
        self.expect_symbol('}')?;
        Ok(())
    }

    fn compile_class_var_dec(&mut self) -> Result<(), CompileError> {
        let kind_tok = self.bump()?;
        let kind = match kind_tok.as_word() {
            Some("static") => VarKind::Static,
            Some("field") => VarKind::Field,
            _ => return Err(unexpected(&kind_tok, "'static' or 'field'")),
        };
        let type_name = self.compile_type()?;

        let name = self.expect_identifier()?;
        self.class_symbols.add(&name, &type_name, kind)?;
        while self.peek_is_symbol(0, ',')? {
            self.bump()?;
            let name = self.expect_identifier()?;
            self.class_symbols.add(&name, &type_name, kind)?;
        }
        self.expect_symbol(';')?;
        Ok(())
    }

    fn compile_subroutine_dec(&mut self) -> Result<(), CompileError> {
        let subtype_tok = self.bump()?;
        let subtype = subtype_tok
            .as_word()
            .expect("checked by peek_is_keyword_in")
            .to_string();

        if self.peek_is_keyword(0, "void")? {
            self.bump()?;
        } else {
            self.compile_type()?;
        }

        let name = self.expect_identifier()?;
        self.subroutine_symbols = SymbolTable::new();

        if subtype == "method" {
            self.subroutine_symbols
                .add("this", &self.class_name, VarKind::Argument)?;
        }

        self.expect_symbol('(')?;
        self.compile_parameter_list()?;
        self.expect_symbol(')')?;

        self.expect_symbol('{')?;
        while self.peek_is_keyword(0, "var")? {
            self.compile_var_dec()?;
        }

        let nlocals = self.subroutine_symbols.count(VarKind::Local);
        self.emit(&format!("function {}.{name} {nlocals}", self.class_name))?;

        if subtype == "constructor" {
            let size = self.class_symbols.count(VarKind::Field);
            self.emit(&format!("push constant {size}"))?;
            self.emit("call Memory.alloc 1")?;
            self.emit("pop pointer 0")?;
        } else if subtype == "method" {
            self.emit("push argument 0")?;
            self.emit("pop pointer 0")?;
        }

        self.compile_statements()?;
        self.expect_symbol('}')?;
        Ok(())
    }

    fn compile_parameter_list(&mut self) -> Result<(), CompileError> {
        if !self.peek_is_symbol(0, ')')? {
            let ty = self.compile_type()?;
            let name = self.expect_identifier()?;
            self.subroutine_symbols.add(&name, &ty, VarKind::Argument)?;
            while self.peek_is_symbol(0, ',')? {
                self.bump()?;
                let ty = self.compile_type()?;
                let name = self.expect_identifier()?;
                self.subroutine_symbols.add(&name, &ty, VarKind::Argument)?;
            }
        }
        Ok(())
    }

    fn compile_var_dec(&mut self) -> Result<(), CompileError> {
        self.expect_keyword("var")?;
        let ty = self.compile_type()?;
        let name = self.expect_identifier()?;
        self.subroutine_symbols.add(&name, &ty, VarKind::Local)?;
        while self.peek_is_symbol(0, ',')? {
            self.bump()?;
            let name = self.expect_identifier()?;
            self.subroutine_symbols.add(&name, &ty, VarKind::Local)?;
        }
        self.expect_symbol(';')?;
        Ok(())
    }

    fn compile_statements(&mut self) -> Result<(), CompileError> {
        loop {
            if self.peek_is_keyword_in(0, STATEMENT_KEYWORDS)? {
                let word = self
                    .peek(0)?
                    .and_then(Token::as_word)
                    .expect("checked above")
                    .to_string();
                match word.as_str() {
                    "let" => self.compile_let()?,
                    "if" => self.compile_if()?,
                    "while" => self.compile_while()?,
                    "do" => self.compile_do()?,
                    "return" => self.compile_return()?,
                    _ => unreachable!(),
                }
            } else {
                break;
            }
        }
        Ok(())
    }

    fn compile_let(&mut self) -> Result<(), CompileError> {
        self.expect_keyword("let")?;
        let name = self.expect_identifier()?;
        let rec = self
            .lookup(&name)
            .cloned()
            .ok_or_else(|| JackError::UndeclaredIdentifier(name.clone()))?;
        let code = format!("{} {}", rec.kind.segment(), rec.index);

        if self.peek_is_symbol(0, '[')? {
            self.bump()?;
            self.compile_expression()?;
            self.expect_symbol(']')?;

            self.emit(&format!("push {code}"))?;
            self.emit("add")?;

            self.expect_symbol('=')?;
            self.compile_expression()?;

            // `temp 0` holds the RHS value while `pointer 1` is rebased, since
            // the RHS may itself reference another array and clobber `that`.
            self.emit("pop temp 0")?;
            self.emit("pop pointer 1")?;
            self.emit("push temp 0")?;
            self.emit("pop that 0")?;
        } else {
            self.expect_symbol('=')?;
            self.compile_expression()?;
            self.emit(&format!("pop {code}"))?;
        }
        self.expect_symbol(';')?;
        Ok(())
    }

    fn compile_if(&mut self) -> Result<(), CompileError> {
        self.expect_keyword("if")?;
        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;

        self.emit("not")?;
        self.label_counter += 1;
        let else_label = self.make_label("ELSE");
        let end_label = self.make_label("ENDIF");
        self.emit(&format!("if-goto {else_label}"))?;

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;

        self.emit(&format!("goto {end_label}"))?;
        self.emit(&format!("label {else_label}"))?;

        if self.peek_is_keyword(0, "else")? {
            self.bump()?;
            self.expect_symbol('{')?;
            self.compile_statements()?;
            self.expect_symbol('}')?;
        }
        self.emit(&format!("label {end_label}"))?;
        Ok(())
    }

    fn compile_while(&mut self) -> Result<(), CompileError> {
        self.label_counter += 1;
        let begin_label = self.make_label("WHILE");
        let end_label = self.make_label("ENDWHILE");

        self.emit(&format!("label {begin_label}"))?;
        self.expect_keyword("while")?;
        self.expect_symbol('(')?;
        self.compile_expression()?;

        self.emit("not")?;
        self.emit(&format!("if-goto {end_label}"))?;

        self.expect_symbol(')')?;
        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;

        self.emit(&format!("goto {begin_label}"))?;
        self.emit(&format!("label {end_label}"))?;
        Ok(())
    }

    fn compile_do(&mut self) -> Result<(), CompileError> {
        self.expect_keyword("do")?;
        self.compile_subroutine_call()?;
        self.expect_symbol(';')?;
        self.emit("pop temp 0")?;
        Ok(())
    }

    fn compile_return(&mut self) -> Result<(), CompileError> {
        self.expect_keyword("return")?;
        if self.peek_is_symbol(0, ';')? {
            self.emit("push constant 0")?;
        } else {
            self.compile_expression()?;
        }
        self.expect_symbol(';')?;
        self.emit("return")?;
        Ok(())
    }

    fn compile_expression(&mut self) -> Result<(), CompileError> {
        self.compile_term()?;
        while self.peek_is_symbol_in(0, BINARY_SYMBOLS)? {
            let tok = self.bump()?;
            let op = tok.as_symbol().expect("checked by peek_is_symbol_in");
            self.compile_term()?;
            self.emit(binary_op_code(op))?;
        }
        Ok(())
    }

    fn compile_term(&mut self) -> Result<(), CompileError> {
        if self.peek_is_kind(0, TokenKind::IntConst)? {
            let tok = self.bump()?;
            if let TokenValue::IntConst(n) = tok.value {
                self.emit(&format!("push constant {n}"))?;
            }
            return Ok(());
        }

        if self.peek_is_keyword_in(0, KEYWORD_CONSTANTS)? {
            let tok = self.bump()?;
            match tok.as_word().expect("checked by peek_is_keyword_in") {
                "true" => {
                    self.emit("push constant 1")?;
                    self.emit("neg")?;
                }
                "false" | "null" => self.emit("push constant 0")?,
                "this" => self.emit("push pointer 0")?,
                _ => unreachable!(),
            }
            return Ok(());
        }

        if self.peek_is_kind(0, TokenKind::StringConst)? {
            let tok = self.bump()?;
            if let TokenValue::StringConst(s) = tok.value {
                self.emit(&format!("push constant {}", s.chars().count()))?;
                self.emit("call String.new 1")?;
                for ch in s.chars() {
                    self.emit(&format!("push constant {}", ch as u32))?;
                    self.emit("call String.appendChar 2")?;
                }
            }
            return Ok(());
        }

        if self.peek_is_symbol(0, '(')? {
            self.bump()?;
            self.compile_expression()?;
            self.expect_symbol(')')?;
            return Ok(());
        }

        if self.peek_is_symbol_in(0, UNARY_SYMBOLS)? {
            let tok = self.bump()?;
            let op = tok.as_symbol().expect("checked by peek_is_symbol_in");
            self.compile_term()?;
            self.emit(if op == '-' { "neg" } else { "not" })?;
            return Ok(());
        }

        // Only identifier, identifier[expr], and subroutine-call forms remain;
        // disambiguate with one extra token of lookahead.
        if self.peek_is_symbol(1, '[')? {
            let name = self.expect_identifier()?;
            let rec = self
                .lookup(&name)
                .cloned()
                .ok_or_else(|| JackError::UndeclaredIdentifier(name.clone()))?;
            self.expect_symbol('[')?;
            self.compile_expression()?;
            self.expect_symbol(']')?;
            self.emit(&format!("push {} {}", rec.kind.segment(), rec.index))?;
            self.emit("add")?;
            self.emit("pop pointer 1")?;
            self.emit("push that 0")?;
        } else if self.peek_is_symbol(1, '.')? || self.peek_is_symbol(1, '(')? {
            self.compile_subroutine_call()?;
        } else {
            let name = self.expect_identifier()?;
            let rec = self
                .lookup(&name)
                .cloned()
                .ok_or_else(|| JackError::UndeclaredIdentifier(name.clone()))?;
            self.emit(&format!("push {} {}", rec.kind.segment(), rec.index))?;
        }
        Ok(())
    }

    fn compile_subroutine_call(&mut self) -> Result<(), CompileError> {
        let mut nargs: u16 = 0;
        let mut func_name = self.expect_identifier()?;
        let class_name;

        if self.peek_is_symbol(0, '.')? {
            self.bump()?;
            let called_name = self.expect_identifier()?;
            if let Some(rec) = self.lookup(&func_name).cloned() {
                self.emit(&format!("push {} {}", rec.kind.segment(), rec.index))?;
                nargs = 1;
                class_name = rec.type_name;
            } else {
                class_name = func_name.clone();
            }
            func_name = called_name;
        } else {
            self.emit("push pointer 0")?;
            nargs = 1;
            class_name = self.class_name.clone();
        }

        self.expect_symbol('(')?;
        nargs += self.compile_expression_list()?;
        self.expect_symbol(')')?;
        self.emit(&format!("call {class_name}.{func_name} {nargs}"))?;
        Ok(())
    }

    fn compile_expression_list(&mut self) -> Result<u16, CompileError> {
        let mut count: u16 = 0;
        if !self.peek_is_symbol(0, ')')? {
            self.compile_expression()?;
            count += 1;
            while self.peek_is_symbol(0, ',')? {
                self.bump()?;
                self.compile_expression()?;
                count += 1;
            }
        }
        Ok(count)
    }
}

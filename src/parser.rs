//! Recursive-descent parser producing the syntax tree.
//!
//! The grammar is the C subset this compiler accepts: a program is a list of
//! zero-parameter `int` functions, each with a brace-delimited statement
//! list. Expression parsing is a small precedence ladder (relational, then
//! additive, then multiplicative, then unary). Keywords are ordinary
//! identifier tokens matched by text, which keeps the tokenizer oblivious to
//! the keyword set.

use crate::error::{CompileError, CompileResult};
use crate::syntax::{BinaryKind, Syntax, UnaryKind};
use crate::tokenizer::{Token, TokenKind, describe_token, token_text};

/// Parse a whole program from the token stream.
pub fn parse(tokens: Vec<Token>, source: &str) -> CompileResult<Syntax> {
  let mut stream = TokenStream::new(tokens, source);

  if stream.is_eof() {
    return Err(CompileError::at(source, 0, "program is empty"));
  }

  let mut declarations = Vec::new();
  while !stream.is_eof() {
    declarations.push(parse_function(&mut stream)?);
  }

  Ok(Syntax::TopLevel(declarations))
}

fn parse_function(stream: &mut TokenStream) -> CompileResult<Syntax> {
  stream.skip("int")?;
  let (name, _) = stream.get_ident()?;
  stream.skip("(")?;
  stream.skip(")")?;
  let body = parse_block(stream)?;

  Ok(Syntax::function(name, body))
}

fn parse_block(stream: &mut TokenStream) -> CompileResult<Syntax> {
  stream.skip("{")?;

  let mut statements = Vec::new();
  while !stream.equal("}") {
    if stream.is_eof() {
      return Err(CompileError::at(
        stream.source,
        stream.source.len(),
        "unexpected end of input, expected \"}\"",
      ));
    }
    statements.push(parse_statement(stream)?);
  }

  Ok(Syntax::Block(statements))
}

fn parse_statement(stream: &mut TokenStream) -> CompileResult<Syntax> {
  if stream.equal("return") {
    let expression = parse_expr(stream)?;
    stream.skip(";")?;
    return Ok(Syntax::return_statement(expression));
  }

  if stream.equal("int") {
    let (name, _) = stream.get_ident()?;
    stream.skip("=")?;
    let init = parse_expr(stream)?;
    stream.skip(";")?;
    return Ok(Syntax::define_var(name, init));
  }

  if stream.equal("if") {
    stream.skip("(")?;
    let condition = parse_expr(stream)?;
    stream.skip(")")?;
    let then = parse_block(stream)?;
    return Ok(Syntax::if_statement(condition, then));
  }

  if stream.equal("while") {
    stream.skip("(")?;
    let condition = parse_expr(stream)?;
    stream.skip(")")?;
    let body = parse_block(stream)?;
    return Ok(Syntax::while_statement(condition, body));
  }

  // `name = expr;` needs one token of lookahead to tell an assignment from
  // an expression statement starting with a variable reference.
  if stream.peek_is(TokenKind::Ident) && stream.nth_is_text(1, "=") {
    let (name, _) = stream.get_ident()?;
    stream.skip("=")?;
    let expression = parse_expr(stream)?;
    stream.skip(";")?;
    return Ok(Syntax::assignment(name, expression));
  }

  let expression = parse_expr(stream)?;
  stream.skip(";")?;
  Ok(expression)
}

fn parse_expr(stream: &mut TokenStream) -> CompileResult<Syntax> {
  parse_relational(stream)
}

fn parse_relational(stream: &mut TokenStream) -> CompileResult<Syntax> {
  let mut node = parse_add(stream)?;

  loop {
    let kind = if stream.equal("<=") {
      BinaryKind::LessOrEqual
    } else if stream.equal("<") {
      BinaryKind::LessThan
    } else {
      break;
    };

    let rhs = parse_add(stream)?;
    node = Syntax::binary(kind, node, rhs);
  }

  Ok(node)
}

fn parse_add(stream: &mut TokenStream) -> CompileResult<Syntax> {
  let mut node = parse_mul(stream)?;

  loop {
    let kind = if stream.equal("+") {
      BinaryKind::Add
    } else if stream.equal("-") {
      BinaryKind::Sub
    } else {
      break;
    };

    let rhs = parse_mul(stream)?;
    node = Syntax::binary(kind, node, rhs);
  }

  Ok(node)
}

fn parse_mul(stream: &mut TokenStream) -> CompileResult<Syntax> {
  let mut node = parse_unary(stream)?;

  while stream.equal("*") {
    let rhs = parse_unary(stream)?;
    node = Syntax::binary(BinaryKind::Mul, node, rhs);
  }

  Ok(node)
}

fn parse_unary(stream: &mut TokenStream) -> CompileResult<Syntax> {
  if stream.equal("~") {
    let operand = parse_unary(stream)?;
    return Ok(Syntax::unary(UnaryKind::BitwiseNegation, operand));
  }

  if stream.equal("!") {
    let operand = parse_unary(stream)?;
    return Ok(Syntax::unary(UnaryKind::LogicalNegation, operand));
  }

  parse_primary(stream)
}

fn parse_primary(stream: &mut TokenStream) -> CompileResult<Syntax> {
  if stream.equal("(") {
    let node = parse_expr(stream)?;
    stream.skip(")")?;
    return Ok(node);
  }

  if stream.peek_is(TokenKind::Ident) {
    let (name, _) = stream.get_ident()?;
    if stream.equal("(") {
      // Calls are arity-0: the argument-list node exists in the tree but the
      // grammar accepts nothing between the parentheses.
      stream.skip(")")?;
      return Ok(Syntax::function_call(name, Syntax::FunctionArguments(Vec::new())));
    }
    return Ok(Syntax::variable(name));
  }

  let (value, loc) = stream.get_number()?;
  let value = i32::try_from(value).map_err(|_| {
    CompileError::at(
      stream.source,
      loc,
      format!("number {value} does not fit in a 32-bit int"),
    )
  })?;
  Ok(Syntax::immediate(value))
}

/// Lightweight cursor over the token vector.
struct TokenStream<'a> {
  tokens: Vec<Token>,
  source: &'a str,
  pos: usize,
}

impl<'a> TokenStream<'a> {
  /// Take ownership of the token stream; the parser will advance `pos` as it consumes input.
  fn new(tokens: Vec<Token>, source: &'a str) -> Self {
    Self {
      tokens,
      source,
      pos: 0,
    }
  }

  fn peek(&self) -> Option<&Token> {
    self.tokens.get(self.pos)
  }

  fn peek_is(&self, kind: TokenKind) -> bool {
    matches!(self.peek(), Some(token) if token.kind == kind)
  }

  /// True when the token `offset` positions ahead spells exactly `s`.
  fn nth_is_text(&self, offset: usize, s: &str) -> bool {
    matches!(
      self.tokens.get(self.pos + offset),
      Some(token)
        if token.kind != TokenKind::Eof
          && token.len == s.len()
          && token_text(token, self.source) == s
    )
  }

  /// Consume the current token if it spells exactly `s`. Matches both
  /// punctuators and identifiers so keywords need no special token kind.
  fn equal(&mut self, s: &str) -> bool {
    if self.nth_is_text(0, s) {
      self.pos += 1;
      return true;
    }
    false
  }

  fn skip(&mut self, s: &str) -> CompileResult<()> {
    if self.equal(s) {
      Ok(())
    } else {
      let (loc, got) = match self.peek() {
        Some(token) => (token.loc, describe_token(Some(token), self.source)),
        None => (self.source.len(), "EOF".to_string()),
      };
      Err(CompileError::at(
        self.source,
        loc,
        format!("expected \"{s}\", but got \"{got}\""),
      ))
    }
  }

  /// Parse the current token as an integer literal returning its value and location.
  fn get_number(&mut self) -> CompileResult<(i64, usize)> {
    if let Some(token) = self.peek()
      && token.kind == TokenKind::Num
    {
      let loc = token.loc;
      let value = token.value.ok_or_else(|| {
        CompileError::at(
          self.source,
          loc,
          "internal error: numeric token missing value",
        )
      })?;
      self.pos += 1;
      return Ok((value, loc));
    }

    let (loc, got) = match self.peek() {
      Some(token) => (token.loc, describe_token(Some(token), self.source)),
      None => (self.source.len(), "EOF".to_string()),
    };
    Err(CompileError::at(
      self.source,
      loc,
      format!("expected a number, but got \"{got}\""),
    ))
  }

  /// Parse the current token as an identifier.
  fn get_ident(&mut self) -> CompileResult<(String, usize)> {
    if let Some(token) = self.peek()
      && token.kind == TokenKind::Ident
    {
      let loc = token.loc;
      let name = token_text(token, self.source).to_string();
      self.pos += 1;
      return Ok((name, loc));
    }

    let (loc, got) = match self.peek() {
      Some(token) => (token.loc, describe_token(Some(token), self.source)),
      None => (self.source.len(), "EOF".to_string()),
    };
    Err(CompileError::at(
      self.source,
      loc,
      format!("expected an identifier, but got \"{got}\""),
    ))
  }

  fn is_eof(&self) -> bool {
    matches!(self.peek().map(|token| token.kind), Some(TokenKind::Eof))
  }
}

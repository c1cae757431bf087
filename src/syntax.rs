//! The syntax tree produced by the parser and consumed by codegen.
//!
//! Every construct in the language is one variant of [`Syntax`]; the tree is
//! a strict hierarchy of uniquely owned children, built once by the parser
//! and then walked read-only. Exhaustive `match` over the enum is what keeps
//! the code generator total – there is no "unknown node" case at run time.

/// Unary operators recognised by the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryKind {
  BitwiseNegation,
  LogicalNegation,
}

/// Binary operators recognised by the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryKind {
  Add,
  Sub,
  Mul,
  LessThan,
  LessOrEqual,
}

/// A node in the syntax tree.
#[derive(Debug, Clone)]
pub enum Syntax {
  Immediate(i32),
  Variable(String),
  Unary {
    kind: UnaryKind,
    operand: Box<Syntax>,
  },
  Binary {
    kind: BinaryKind,
    left: Box<Syntax>,
    right: Box<Syntax>,
  },
  Block(Vec<Syntax>),
  Function {
    name: String,
    /// Parameter declarations. Always empty today: the grammar only accepts
    /// zero-parameter functions, but the model keeps the slot so the dump
    /// and future growth do not need a reshaped tree.
    parameters: Vec<Syntax>,
    body: Box<Syntax>,
  },
  FunctionArguments(Vec<Syntax>),
  FunctionCall {
    name: String,
    arguments: Box<Syntax>,
  },
  DefineVar {
    name: String,
    init: Box<Syntax>,
  },
  Assignment {
    name: String,
    expression: Box<Syntax>,
  },
  If {
    condition: Box<Syntax>,
    then: Box<Syntax>,
  },
  While {
    condition: Box<Syntax>,
    body: Box<Syntax>,
  },
  Return(Box<Syntax>),
  TopLevel(Vec<Syntax>),
}

impl Syntax {
  pub fn immediate(value: i32) -> Self {
    Self::Immediate(value)
  }

  pub fn variable(name: impl Into<String>) -> Self {
    Self::Variable(name.into())
  }

  pub fn unary(kind: UnaryKind, operand: Syntax) -> Self {
    Self::Unary {
      kind,
      operand: Box::new(operand),
    }
  }

  pub fn binary(kind: BinaryKind, left: Syntax, right: Syntax) -> Self {
    Self::Binary {
      kind,
      left: Box::new(left),
      right: Box::new(right),
    }
  }

  pub fn function(name: impl Into<String>, body: Syntax) -> Self {
    Self::Function {
      name: name.into(),
      parameters: Vec::new(),
      body: Box::new(body),
    }
  }

  pub fn function_call(name: impl Into<String>, arguments: Syntax) -> Self {
    Self::FunctionCall {
      name: name.into(),
      arguments: Box::new(arguments),
    }
  }

  pub fn define_var(name: impl Into<String>, init: Syntax) -> Self {
    Self::DefineVar {
      name: name.into(),
      init: Box::new(init),
    }
  }

  pub fn assignment(name: impl Into<String>, expression: Syntax) -> Self {
    Self::Assignment {
      name: name.into(),
      expression: Box::new(expression),
    }
  }

  pub fn if_statement(condition: Syntax, then: Syntax) -> Self {
    Self::If {
      condition: Box::new(condition),
      then: Box::new(then),
    }
  }

  pub fn while_statement(condition: Syntax, body: Syntax) -> Self {
    Self::While {
      condition: Box::new(condition),
      body: Box::new(body),
    }
  }

  pub fn return_statement(expression: Syntax) -> Self {
    Self::Return(Box::new(expression))
  }

  /// Render the tree as an indented diagnostic dump, one line per node with
  /// a 4-space indent per nesting level. This is the `--dump-ast` surface.
  pub fn dump(&self) -> String {
    let mut out = String::new();
    self.dump_indented(0, &mut out);
    out
  }

  fn dump_indented(&self, indent: usize, out: &mut String) {
    let pad = " ".repeat(indent);
    match self {
      Syntax::Immediate(value) => {
        out.push_str(&format!("{pad}IMMEDIATE {value}\n"));
      }
      Syntax::Variable(name) => {
        out.push_str(&format!("{pad}VARIABLE {name}\n"));
      }
      Syntax::Unary { kind, operand } => {
        let label = match kind {
          UnaryKind::BitwiseNegation => "BITWISE_NEGATION",
          UnaryKind::LogicalNegation => "LOGICAL_NEGATION",
        };
        out.push_str(&format!("{pad}UNARY {label}\n"));
        operand.dump_indented(indent + 4, out);
      }
      Syntax::Binary { kind, left, right } => {
        let label = match kind {
          BinaryKind::Add => "ADDITION",
          BinaryKind::Sub => "SUBTRACTION",
          BinaryKind::Mul => "MULTIPLICATION",
          BinaryKind::LessThan => "LESS THAN",
          BinaryKind::LessOrEqual => "LESS THAN OR EQUAL",
        };
        out.push_str(&format!("{pad}{label} LEFT\n"));
        left.dump_indented(indent + 4, out);
        out.push_str(&format!("{pad}{label} RIGHT\n"));
        right.dump_indented(indent + 4, out);
      }
      Syntax::Block(statements) => {
        out.push_str(&format!("{pad}BLOCK\n"));
        for statement in statements {
          statement.dump_indented(indent + 4, out);
        }
      }
      Syntax::Function { name, body, .. } => {
        out.push_str(&format!("{pad}FUNCTION {name}\n"));
        body.dump_indented(indent + 4, out);
      }
      Syntax::FunctionArguments(arguments) => {
        out.push_str(&format!("{pad}FUNCTION ARGUMENTS\n"));
        for argument in arguments {
          argument.dump_indented(indent + 4, out);
        }
      }
      Syntax::FunctionCall { name, arguments } => {
        out.push_str(&format!("{pad}FUNCTION CALL {name}\n"));
        arguments.dump_indented(indent + 4, out);
      }
      Syntax::DefineVar { name, init } => {
        out.push_str(&format!("{pad}DEFINE VARIABLE {name}\n"));
        out.push_str(&format!("{pad}{name} INITIAL VALUE\n"));
        init.dump_indented(indent + 4, out);
      }
      Syntax::Assignment { name, expression } => {
        out.push_str(&format!("{pad}ASSIGNMENT '{name}'\n"));
        expression.dump_indented(indent + 4, out);
      }
      Syntax::If { condition, then } => {
        out.push_str(&format!("{pad}IF CONDITION\n"));
        condition.dump_indented(indent + 4, out);
        out.push_str(&format!("{pad}IF THEN\n"));
        then.dump_indented(indent + 4, out);
      }
      Syntax::While { condition, body } => {
        out.push_str(&format!("{pad}WHILE CONDITION\n"));
        condition.dump_indented(indent + 4, out);
        out.push_str(&format!("{pad}WHILE BODY\n"));
        body.dump_indented(indent + 4, out);
      }
      Syntax::Return(expression) => {
        out.push_str(&format!("{pad}RETURN\n"));
        expression.dump_indented(indent + 4, out);
      }
      Syntax::TopLevel(declarations) => {
        out.push_str(&format!("{pad}TOP LEVEL\n"));
        for declaration in declarations {
          declaration.dump_indented(indent + 4, out);
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dump_indents_four_spaces_per_level() {
    let tree = Syntax::TopLevel(vec![Syntax::function(
      "main",
      Syntax::Block(vec![Syntax::return_statement(Syntax::immediate(2))]),
    )]);

    assert_eq!(
      tree.dump(),
      "TOP LEVEL\n\
       \x20   FUNCTION main\n\
       \x20       BLOCK\n\
       \x20           RETURN\n\
       \x20               IMMEDIATE 2\n"
    );
  }

  #[test]
  fn dump_labels_binary_operands() {
    let tree = Syntax::binary(BinaryKind::Sub, Syntax::immediate(2), Syntax::immediate(3));

    assert_eq!(
      tree.dump(),
      "SUBTRACTION LEFT\n\
       \x20   IMMEDIATE 2\n\
       SUBTRACTION RIGHT\n\
       \x20   IMMEDIATE 3\n"
    );
  }

  #[test]
  fn dump_shows_define_initial_value() {
    let tree = Syntax::define_var("x", Syntax::immediate(5));

    assert_eq!(
      tree.dump(),
      "DEFINE VARIABLE x\n\
       x INITIAL VALUE\n\
       \x20   IMMEDIATE 5\n"
    );
  }
}

//! Code generation: lower the syntax tree into 32-bit x86 AT&T assembly.
//!
//! The generator is a single depth-first walk with no intermediate
//! representation and no register allocator. Two conventions carry the whole
//! design: every expression leaves its value in `%eax` (the accumulator), and
//! a binary expression spills its left operand to a freshly reserved stack
//! slot because the right operand may clobber `%eax` arbitrarily. Locals live
//! on the stack frame and are addressed relative to `%ebp`.

use crate::context::Context;
use crate::error::{CompileError, CompileResult};
use crate::syntax::{BinaryKind, Syntax, UnaryKind};

/// Mnemonics shorter than this are padded so operands line up.
const MAX_MNEMONIC_LENGTH: usize = 7;

/// Emit assembly for a whole program: the `.text` header, the lowered tree,
/// and the `_start` footer that calls `main` and exits.
pub fn generate(program: &Syntax) -> CompileResult<String> {
  let mut ctx = Context::new();
  let mut asm = String::new();

  write_header(&mut asm);
  write_syntax(program, &mut ctx, &mut asm)?;
  write_footer(&mut asm);

  Ok(asm)
}

/// Write instruction `op` with operands `opds`, indented and padded.
///
/// The assembler requires at least 4 spaces of indentation; the extra
/// padding aligns operands across mnemonics of different lengths and is
/// purely cosmetic.
fn emit_inst(asm: &mut String, op: &str, opds: &str) {
  let padding = MAX_MNEMONIC_LENGTH.saturating_sub(op.len()) + 4;
  asm.push_str(&format!("    {op}{}{opds}\n", " ".repeat(padding)));
}

fn emit_label(asm: &mut String, label: &str) {
  asm.push_str(&format!("{label}:\n"));
}

fn emit_func_declaration(asm: &mut String, name: &str) {
  asm.push_str(&format!("    .global {name}\n"));
  asm.push_str(&format!("{name}:\n"));
}

fn emit_func_prologue(asm: &mut String) {
  emit_inst(asm, "pushl", "%ebp");
  emit_inst(asm, "mov", "%esp, %ebp");
  asm.push('\n');
}

fn emit_return(asm: &mut String) {
  asm.push_str("    leave\n");
  asm.push_str("    ret\n");
}

fn emit_func_epilogue(asm: &mut String) {
  emit_return(asm);
  asm.push('\n');
}

fn write_header(asm: &mut String) {
  asm.push_str("    .text\n");
}

/// The process entry point: set up a frame, call the program's `main`, and
/// hand its result to the exit system call. If the program never defines
/// `main` the undefined symbol surfaces at link time, not here.
fn write_footer(asm: &mut String) {
  emit_func_declaration(asm, "_start");
  emit_func_prologue(asm);
  emit_inst(asm, "call", "main");
  emit_inst(asm, "mov", "%eax, %ebx");
  emit_inst(asm, "mov", "$1, %eax");
  emit_inst(asm, "int", "$0x80");
}

/// Lower one node. Expressions leave their result in `%eax`; statements
/// leave `%eax` unspecified.
fn write_syntax(syntax: &Syntax, ctx: &mut Context, asm: &mut String) -> CompileResult<()> {
  match syntax {
    Syntax::Immediate(value) => {
      emit_inst(asm, "mov", &format!("${value}, %eax"));
    }

    Syntax::Variable(name) => {
      let offset = ctx
        .env
        .get(name)
        .ok_or_else(|| CompileError::undefined_variable(name))?;
      emit_inst(asm, "mov", &format!("{offset}(%ebp), %eax"));
    }

    Syntax::Unary { kind, operand } => {
      write_syntax(operand, ctx, asm)?;
      match kind {
        UnaryKind::BitwiseNegation => {
          emit_inst(asm, "not", "%eax");
        }
        UnaryKind::LogicalNegation => {
          emit_inst(asm, "test", "$0xFFFFFFFF, %eax");
          emit_inst(asm, "setz", "%al");
          emit_inst(asm, "movzbl", "%al, %eax");
        }
      }
    }

    Syntax::Binary { kind, left, right } => {
      // The left result cannot survive evaluation of the right operand in a
      // register, so it always goes to a spill slot.
      let slot = ctx.reserve_slot();
      emit_inst(asm, "sub", "$4, %esp");

      write_syntax(left, ctx, asm)?;
      emit_inst(asm, "mov", &format!("%eax, {slot}(%ebp)"));

      write_syntax(right, ctx, asm)?;
      match kind {
        BinaryKind::Add => {
          emit_inst(asm, "add", &format!("{slot}(%ebp), %eax"));
        }
        BinaryKind::Sub => {
          // Left minus right: subtract the accumulator from the spilled left
          // operand, then move the result back into the accumulator.
          emit_inst(asm, "sub", &format!("%eax, {slot}(%ebp)"));
          emit_inst(asm, "mov", &format!("{slot}(%ebp), %eax"));
        }
        BinaryKind::Mul => {
          emit_inst(asm, "mull", &format!("{slot}(%ebp)"));
        }
        BinaryKind::LessThan => {
          // To compare x < y in AT&T syntax, we write CMP y,x.
          emit_inst(asm, "cmp", &format!("%eax, {slot}(%ebp)"));
          emit_inst(asm, "setl", "%al");
          emit_inst(asm, "movzbl", "%al, %eax");
        }
        BinaryKind::LessOrEqual => {
          emit_inst(asm, "cmp", &format!("%eax, {slot}(%ebp)"));
          emit_inst(asm, "setle", "%al");
          emit_inst(asm, "movzbl", "%al, %eax");
        }
      }
    }

    Syntax::Assignment { name, expression } => {
      write_syntax(expression, ctx, asm)?;
      let offset = ctx
        .env
        .get(name)
        .ok_or_else(|| CompileError::undefined_variable(name))?;
      emit_inst(asm, "mov", &format!("%eax, {offset}(%ebp)"));
    }

    Syntax::DefineVar { name, init } => {
      let slot = ctx.reserve_slot();
      ctx.env.set(name.clone(), slot);
      emit_inst(asm, "sub", "$4, %esp");

      write_syntax(init, ctx, asm)?;
      emit_inst(asm, "mov", &format!("%eax, {slot}(%ebp)"));
    }

    Syntax::Return(expression) => {
      write_syntax(expression, ctx, asm)?;
      emit_return(asm);
    }

    Syntax::FunctionCall { name, .. } => {
      // Argument passing is not implemented: the argument list exists in the
      // tree but is never materialized, so every call is effectively arity-0.
      emit_inst(asm, "call", name);
    }

    Syntax::FunctionArguments(_) => {
      // Only reachable through FunctionCall, which ignores it.
    }

    Syntax::If { condition, then } => {
      write_syntax(condition, ctx, asm)?;
      let end_label = ctx.fresh_label("if_end");

      emit_inst(asm, "test", "%eax, %eax");
      emit_inst(asm, "jz", &end_label);

      write_syntax(then, ctx, asm)?;
      emit_label(asm, &end_label);
    }

    Syntax::While { condition, body } => {
      let start_label = ctx.fresh_label("while_start");
      let end_label = ctx.fresh_label("while_end");

      emit_label(asm, &start_label);
      write_syntax(condition, ctx, asm)?;

      emit_inst(asm, "test", "%eax, %eax");
      emit_inst(asm, "jz", &end_label);

      write_syntax(body, ctx, asm)?;
      emit_inst(asm, "jmp", &start_label);
      emit_label(asm, &end_label);
    }

    Syntax::Block(statements) => {
      for statement in statements {
        write_syntax(statement, ctx, asm)?;
      }
    }

    Syntax::Function { name, body, .. } => {
      ctx.new_scope();

      emit_func_declaration(asm, name);
      emit_func_prologue(asm);
      write_syntax(body, ctx, asm)?;
      emit_func_epilogue(asm);
    }

    Syntax::TopLevel(declarations) => {
      for declaration in declarations {
        write_syntax(declaration, ctx, asm)?;
      }
    }
  }

  Ok(())
}

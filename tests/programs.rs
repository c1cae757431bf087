//! End-to-end tests: compile C sources through the public API and, when the
//! host has a 32-bit-capable `as`/`ld`, assemble, link, and execute the
//! result, asserting on process exit codes exactly as the original shell
//! harness did. When the toolchain (or 32-bit execution) is unavailable the
//! execution half is skipped; the emitted-text assertions always run.

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::sync::OnceLock;

fn compile(src: &str) -> String {
  rmcc::generate_assembly(src).expect("compilation should succeed")
}

fn scratch_dir() -> PathBuf {
  let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("rmcc_exec");
  fs::create_dir_all(&dir).expect("create scratch dir");
  dir
}

/// Probe once whether we can assemble, link, and run 32-bit programs here.
/// The probe pushes a trivial program through the whole pipeline; any
/// failure (missing binutils, no elf_i386 support, no IA-32 emulation)
/// disables execution tests for the run.
fn can_execute() -> bool {
  static PROBE: OnceLock<bool> = OnceLock::new();
  *PROBE.get_or_init(|| {
    if !cfg!(target_os = "linux") {
      return false;
    }
    matches!(execute("probe", "int main() { return 0; }"), Some(0))
  })
}

/// Assemble, link, and run a compiled program, returning its exit code.
/// Returns None when any toolchain step fails.
fn execute(name: &str, src: &str) -> Option<i32> {
  let asm = compile(src);
  let dir = scratch_dir();
  let asm_path = dir.join(format!("{name}.s"));
  let obj_path = dir.join(format!("{name}.o"));
  let exe_path = dir.join(name);
  fs::write(&asm_path, asm).ok()?;

  let assembled = Command::new("as")
    .arg("--32")
    .arg(&asm_path)
    .arg("-o")
    .arg(&obj_path)
    .status()
    .ok()?
    .success();
  if !assembled {
    return None;
  }

  let linked = Command::new("ld")
    .args(["-m", "elf_i386", "-s", "-o"])
    .arg(&exe_path)
    .arg(&obj_path)
    .status()
    .ok()?
    .success();
  if !linked {
    return None;
  }

  Command::new(&exe_path).status().ok()?.code()
}

/// Run a program and assert its exit code, or skip if the host cannot
/// execute 32-bit binaries.
fn assert_exit(name: &str, src: &str, expected: i32) {
  if !can_execute() {
    eprintln!("32-bit toolchain unavailable - skipping execution of {name}");
    return;
  }
  let code = execute(name, src).unwrap_or_else(|| panic!("{name} failed to build or run"));
  assert_eq!(code, expected, "wrong exit code for program {name}:\n{src}");
}

#[test]
fn returns_an_immediate() {
  assert_exit("ret42", "int main() { return 42; }", 42);
}

#[test]
fn arithmetic_oracle_table() {
  let pairs = [(2i32, 3i32), (5, 5), (0, 0)];
  let operators: [(&str, fn(i32, i32) -> i32); 5] = [
    ("+", |a, b| a + b),
    ("-", |a, b| a - b),
    ("*", |a, b| a * b),
    ("<", |a, b| i32::from(a < b)),
    ("<=", |a, b| i32::from(a <= b)),
  ];

  for (index, (op, eval)) in operators.iter().enumerate() {
    for (a, b) in pairs {
      let src = format!("int main() {{ return {a} {op} {b}; }}");
      let expected = eval(a, b) & 0xff;
      assert_exit(&format!("oracle_{index}_{a}_{b}"), &src, expected);
    }
  }
}

#[test]
fn evaluation_order_is_left_minus_reduced_right() {
  assert_exit("sub_mul", "int main() { return 2 - 3 * 1; }", 255);
}

#[test]
fn logical_negation_is_canonical() {
  assert_exit("lnot_0", "int main() { return !0; }", 1);
  assert_exit("lnot_1", "int main() { return !1; }", 0);
  assert_exit("lnot_42", "int main() { return !42; }", 0);
  assert_exit(
    "lnot_neg1",
    "int main() { int x = 0 - 1; return !x; }",
    0,
  );
}

#[test]
fn bitwise_negation_complements() {
  assert_exit("bnot_0", "int main() { return ~0; }", 255);
  assert_exit("bnot_1", "int main() { return ~1; }", 254);
  assert_exit(
    "bnot_neg1",
    "int main() { int x = 0 - 1; return ~x; }",
    0,
  );
}

#[test]
fn defined_variables_read_back_their_values() {
  assert_exit(
    "two_defs",
    "int main() { int a = 11; int b = 31; return a + b; }",
    42,
  );
}

#[test]
fn false_if_skips_its_branch() {
  assert_exit(
    "if_false",
    "int main() { int x = 7; if (0) { x = 1; } return x; }",
    7,
  );
}

#[test]
fn true_if_runs_its_branch_once() {
  assert_exit(
    "if_true",
    "int main() { int x = 7; if (2) { x = x + 1; } return x; }",
    8,
  );
}

#[test]
fn counting_while_loop_runs_three_times() {
  assert_exit(
    "while_count",
    "int main() { int i = 0; while (i < 3) { i = i + 1; } return i; }",
    3,
  );
}

#[test]
fn function_calls_transfer_control() {
  assert_exit(
    "call",
    "int helper() { return 42; } int main() { return helper(); }",
    42,
  );
}

#[test]
fn undefined_variable_produces_no_artifact() {
  let err = rmcc::generate_assembly("int main() { return nowhere; }").unwrap_err();
  assert_eq!(err.to_string(), "undefined variable 'nowhere'");
}

#[test]
fn labels_are_pairwise_unique_across_a_compilation() {
  let asm = compile(
    "int main() { \
       int i = 0; \
       while (i < 2) { \
         if (i) { i = i + 1; } \
         while (i < 1) { i = i + 1; } \
         if (1) { i = i + 1; } \
       } \
       return i; \
     }",
  );

  let mut defined: Vec<&str> = asm
    .lines()
    .filter(|line| line.starts_with('.') && line.ends_with(':'))
    .collect();
  let total = defined.len();
  assert!(total >= 6, "expected labels for all nested constructs:\n{asm}");
  defined.sort();
  defined.dedup();
  assert_eq!(defined.len(), total, "duplicate labels emitted:\n{asm}");
}

#[test]
fn output_obeys_the_assembler_text_contract() {
  let asm = compile("int main() { return 0; }");

  assert!(asm.starts_with("    .text\n"));
  let footer = asm.find("    .global _start\n").expect("footer present");
  assert!(footer > asm.find("main:\n").expect("main label present"));

  for line in asm.lines() {
    if line.is_empty() || line.ends_with(':') {
      continue;
    }
    assert!(
      line.starts_with("    "),
      "instruction line not indented: {line:?}"
    );
  }
  for line in asm.lines().filter(|line| line.ends_with(':')) {
    assert!(
      !line.starts_with(' '),
      "label line must not be indented: {line:?}"
    );
  }
}

//! Lowering tests: source text through the parser, the lowering driver and
//! the reference interpreter

use super::*;
use crate::blocks::Terminator;
use crate::cfg::{ENTRY_BLOCK, EPILOGUE_BLOCK, START_BLOCK};
use crate::interp::{Execution, Interpreter};
use ifcc_common::Severity;
use ifcc_frontend::Frontend;
use pretty_assertions::assert_eq;

fn lower(source: &str) -> Result<LoweredFunction, CompilerError> {
    let program = Frontend::parse_source(source)?;
    lower_program(&program)
}

fn lower_main(body: &str) -> LoweredFunction {
    let lowered = lower(&format!("int main() {{ {body} }}")).unwrap();
    lowered.cfg.validate().unwrap();
    lowered
}

fn run_main(body: &str) -> Execution {
    let lowered = lower_main(body);
    Interpreter::new(&lowered.cfg).run().unwrap()
}

fn lower_err(body: &str) -> CompilerError {
    lower(&format!("int main() {{\n{body}\n}}")).unwrap_err()
}

fn listing(cfg: &Cfg, block: BlockId) -> Vec<String> {
    cfg.blocks[block].instructions.iter().map(|i| i.to_string()).collect()
}

#[test]
fn test_assignment_goes_through_temporary() {
    let lowered = lower_main("int a; a = 2 + 3; return a;");
    assert_eq!(
        listing(&lowered.cfg, START_BLOCK),
        vec!["ldconst %t0, $5", "copy a, %t0", "ret a"]
    );
    assert_eq!(lowered.cfg.symbols.get("a").map(|s| s.offset), Some(4));
    assert!(lowered.warnings.is_empty());

    let execution = Interpreter::new(&lowered.cfg).run().unwrap();
    assert_eq!(execution.return_value, 5);
}

#[test]
fn test_arithmetic_scenario() {
    let lowered = lower_main("int a; int b = 4; a = b * 2 - 1; return a;");
    assert_eq!(
        listing(&lowered.cfg, START_BLOCK),
        vec![
            "ldconst %t0, $4",
            "copy b, %t0",
            "mul %t2, b, $2",
            "sub %t1, %t2, $1",
            "copy a, %t1",
            "ret a",
        ]
    );
    assert_eq!(Interpreter::new(&lowered.cfg).run().unwrap().return_value, 7);
}

#[test]
fn test_while_revisits_condition_block() {
    let lowered = lower_main("int i = 0; while (i < 3) { i = i + 1; } return i;");
    let cfg = &lowered.cfg;

    // start -> condition -> (body | next), body -> condition
    let condition = cfg.terminator(START_BLOCK).and_then(Terminator::exit_true).unwrap();
    let (body, next) = match cfg.terminator(condition).unwrap() {
        Terminator::Branch { on_true, on_false, .. } => (*on_true, *on_false),
        other => panic!("condition block ends with {other:?}"),
    };
    assert_eq!(cfg.terminator(body), Some(&Terminator::Jump(condition)));
    assert_eq!(cfg.terminator(next), Some(&Terminator::Jump(EPILOGUE_BLOCK)));
    assert_eq!(listing(cfg, condition), vec!["lt %t1, i, $3"]);

    let execution = Interpreter::new(cfg).run().unwrap();
    assert_eq!(execution.return_value, 3);
    assert_eq!(execution.block_visits[condition], 4);
    assert_eq!(execution.block_visits[body], 3);
    assert_eq!(execution.block_visits[next], 1);
}

#[test]
fn test_unused_variable_warning() {
    let lowered = lower_main("int x;\n return 0;");
    assert_eq!(lowered.warnings.len(), 1);
    assert_eq!(lowered.warnings[0].severity, Severity::Warning);
    assert!(lowered.warnings[0].message.contains("'x'"));
    assert_eq!(lowered.warnings[0].location, Some(SourceLocation::new(1, 18)));
}

#[test]
fn test_assigned_but_never_read_warns() {
    let lowered = lower_main("int x; x = 3; return 0;");
    assert_eq!(lowered.warnings.len(), 1);
}

#[test]
fn test_undeclared_variable() {
    let err = lower_err("return y;");
    assert_eq!(
        err,
        CompilerError::UndeclaredVariable {
            name: "y".to_string(),
            location: SourceLocation::new(2, 8),
        }
    );

    assert!(matches!(
        lower_err("z = 1; return 0;"),
        CompilerError::UndeclaredVariable { .. }
    ));
}

#[test]
fn test_break_outside_loop() {
    let err = lower_err("break;");
    assert_eq!(
        err,
        CompilerError::LoopControlOutsideLoop {
            keyword: "break".to_string(),
            location: SourceLocation::new(2, 1),
        }
    );
    assert!(matches!(
        lower_err("if (1) continue; return 0;"),
        CompilerError::LoopControlOutsideLoop { .. }
    ));
}

#[test]
fn test_use_before_initialization() {
    let err = lower_err("int a;\nreturn a + 1;");
    assert_eq!(
        err,
        CompilerError::UseBeforeInitialization {
            name: "a".to_string(),
            location: SourceLocation::new(3, 8),
        }
    );
    // A compound assignment reads its target
    assert!(matches!(
        lower_err("int a; a += 1; return 0;"),
        CompilerError::UseBeforeInitialization { .. }
    ));
    // A declaration's own initializer cannot read it
    assert!(matches!(
        lower_err("int a = a; return 0;"),
        CompilerError::UseBeforeInitialization { .. }
    ));
}

#[test]
fn test_duplicate_declaration() {
    let err = lower_err("int a;\nchar a;\nreturn 0;");
    assert_eq!(
        err,
        CompilerError::DuplicateDeclaration {
            name: "a".to_string(),
            location: SourceLocation::new(3, 6),
            first_declared: SourceLocation::new(2, 5),
        }
    );
}

#[test]
fn test_if_else_structure() {
    let lowered = lower_main("int a = 1; int r; if (a) r = 10; else r = 20; return r;");
    let cfg = &lowered.cfg;

    let condition = cfg.terminator(START_BLOCK).and_then(Terminator::exit_true).unwrap();
    let (then_block, else_block, test) = match cfg.terminator(condition).unwrap() {
        Terminator::Branch { test, on_true, on_false } => (*on_true, *on_false, test.clone()),
        other => panic!("condition block ends with {other:?}"),
    };
    assert!(!test.is_empty());
    let join = cfg.terminator(then_block).and_then(Terminator::exit_true).unwrap();
    assert_eq!(cfg.terminator(else_block), Some(&Terminator::Jump(join)));
    assert_eq!(cfg.terminator(join), Some(&Terminator::Jump(EPILOGUE_BLOCK)));
    assert_eq!(listing(cfg, join), vec!["ret r"]);

    assert_eq!(Interpreter::new(cfg).run().unwrap().return_value, 10);
    assert_eq!(
        run_main("int a = 0; int r; if (a) r = 10; else r = 20; return r;").return_value,
        20
    );
}

#[test]
fn test_if_without_else_joins_on_false() {
    let lowered = lower_main("int a = 0; int r = 1; if (a > 0) r = 2; return r;");
    let cfg = &lowered.cfg;
    let condition = cfg.terminator(START_BLOCK).and_then(Terminator::exit_true).unwrap();
    let terminator = cfg.terminator(condition).unwrap();
    let then_block = terminator.exit_true().unwrap();
    assert_eq!(cfg.terminator(then_block).and_then(Terminator::exit_true), terminator.exit_false());
    assert_eq!(Interpreter::new(cfg).run().unwrap().return_value, 1);
}

#[test]
fn test_block_invariants_hold_for_every_block() {
    let lowered = lower_main(
        "int i = 0; int s = 0;
         while (i < 10) {
             i += 1;
             if (i % 2 == 0) continue;
             if (i > 7) { break; } else { s = s + i; }
         }
         return s;",
    );

    for block in &lowered.cfg.blocks {
        match &block.terminator {
            Terminator::FallThrough => assert_eq!(block.id, EPILOGUE_BLOCK),
            Terminator::Jump(_) => {}
            Terminator::Branch { test, .. } => assert!(!test.is_empty()),
        }
    }
    assert_eq!(lowered.cfg.terminator(ENTRY_BLOCK), Some(&Terminator::Jump(START_BLOCK)));

    // 1 + 3 + 5 + 7
    assert_eq!(Interpreter::new(&lowered.cfg).run().unwrap().return_value, 16);
}

#[test]
fn test_break_and_continue_jump_to_loop_blocks() {
    let lowered = lower_main("int i = 0; while (1) { i += 1; if (i < 5) continue; break; } return i;");
    let cfg = &lowered.cfg;
    let condition = cfg.terminator(START_BLOCK).and_then(Terminator::exit_true).unwrap();
    let next = cfg.terminator(condition).and_then(Terminator::exit_false).unwrap();

    let jumps: Vec<String> = cfg
        .blocks
        .iter()
        .flat_map(|b| &b.instructions)
        .filter(|i| matches!(i, Instruction::Jump { .. }))
        .map(|i| i.to_string())
        .collect();
    assert_eq!(
        jumps,
        vec![
            format!("jmp {}", cfg.label_of(condition).unwrap()),
            format!("jmp {}", cfg.label_of(next).unwrap()),
        ]
    );
    assert_eq!(Interpreter::new(cfg).run().unwrap().return_value, 5);
}

#[test]
fn test_nested_loops() {
    let execution = run_main(
        "int i = 0; int n = 0;
         while (i < 4) {
             int j;
             j = 0;
             while (j < 3) { j += 1; n += 1; if (j == 2) break; }
             i += 1;
         }
         return n;",
    );
    assert_eq!(execution.return_value, 8);
}

#[test]
fn test_logical_operators_evaluate_both_sides() {
    assert_eq!(run_main("int a = 3; int b = 0; return a && b;").return_value, 0);
    assert_eq!(run_main("int a = 3; int b = 0; return a || b;").return_value, 1);
    assert_eq!(run_main("int a = -2; int b = 7; return a && b;").return_value, 1);
    assert_eq!(run_main("int a = 0; return !a + (a || 0);").return_value, 1);
}

#[test]
fn test_compound_assignment_operators() {
    let execution = run_main(
        "int a = 100;
         a -= 1; a *= 2; a /= 3; a %= 50; a <<= 3; a >>= 1;
         a &= 0xff; a |= 1; a ^= 3;
         return a;",
    );
    // 99, 198, 66, 16, 128, 64, 64, 65, 66
    assert_eq!(execution.return_value, 66);
}

#[test]
fn test_char_arithmetic_wraps() {
    let execution = run_main("char c = 127; c += 1; return c;");
    assert_eq!(execution.return_value, -128);
    assert_eq!(execution.exit_status(), 128);

    let lowered = lower_main("char c = 100; short s = 1000; long l = 5000000000; return c + s;");
    assert_eq!(lowered.cfg.symbols.get("c").unwrap().offset, 1);
    // Each initializer's 8-byte temporary sits between the variables
    assert_eq!(lowered.cfg.symbols.get("s").unwrap().offset, 11);
    assert_eq!(lowered.cfg.symbols.get("l").unwrap().offset, 27);
    assert_eq!(lowered.warnings.len(), 1);
    assert_eq!(Interpreter::new(&lowered.cfg).run().unwrap().return_value, 1100);
}

#[test]
fn test_signed_division_and_shift_semantics() {
    assert_eq!(run_main("int a = -7; return a / 2;").return_value, -3);
    assert_eq!(run_main("int a = -7; return a % 2;").return_value, -1);
    // Logical right shift of a negative int
    assert_eq!(run_main("int a = -1; return a >> 28;").return_value, 15);
    assert_eq!(run_main("long a = -1; a = a >> 60; return a;").return_value, 15);
}

#[test]
fn test_constant_folding_in_lowering() {
    let lowered = lower_main("int a = 1; return a * (2 + 3 * 4) - (10 / 2);");
    assert_eq!(
        listing(&lowered.cfg, START_BLOCK),
        vec![
            "ldconst %t0, $1",
            "copy a, %t0",
            "mul %t2, a, $14",
            "sub %t1, %t2, $5",
            "ret %t1",
        ]
    );
}

#[test]
fn test_literal_division_by_zero_is_kept_for_run_time() {
    let lowered = lower_main("return 1 / 0;");
    assert_eq!(
        listing(&lowered.cfg, START_BLOCK),
        vec!["div %t1, $1, $0", "copy %t0, %t1", "ret %t0"]
    );
}

#[test]
fn test_implicit_return_zero() {
    let lowered = lower_main("int a = 4;");
    assert_eq!(
        listing(&lowered.cfg, START_BLOCK),
        vec!["ldconst %t0, $4", "copy a, %t0", "ldconst %t1, $0", "ret %t1"]
    );
    assert_eq!(lowered.warnings.len(), 1);
    assert_eq!(Interpreter::new(&lowered.cfg).run().unwrap().return_value, 0);
}

#[test]
fn test_return_inside_loop_leaves_function() {
    let execution = run_main("int i = 0; while (1) { i += 1; if (i == 6) return i * 7; } return 0;");
    assert_eq!(execution.return_value, 42);
}

#[test]
fn test_offsets_follow_declaration_order() {
    let lowered = lower_main("int a = 1; long b = 2; char c = 3; return a + b + c;");
    let user: Vec<(String, u32)> = lowered
        .cfg
        .symbols
        .iter()
        .filter(|s| !s.is_temporary)
        .map(|s| (s.name.clone(), s.offset))
        .collect();
    assert_eq!(
        user,
        vec![
            ("a".to_string(), 4),
            ("b".to_string(), 20),
            ("c".to_string(), 29),
        ]
    );
    let offsets: Vec<u32> = lowered.cfg.symbols.iter().map(|s| s.offset).collect();
    assert!(offsets.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(Interpreter::new(&lowered.cfg).run().unwrap().return_value, 6);
}

#[test]
fn test_wide_literal_widens_narrow_operand() {
    let lowered = lower_main("int x = 1; long l; l = x + 5000000000; return l == 5000000001;");
    let start = listing(&lowered.cfg, START_BLOCK);
    assert!(start.contains(&"add %t1, x, $5000000000".to_string()));
    assert_eq!(lowered.cfg.symbols.width_of("%t1").unwrap(), Width::Quad);
    assert_eq!(Interpreter::new(&lowered.cfg).run().unwrap().return_value, 1);

    assert_eq!(run_main("int x = 1; return x < 4294967297;").return_value, 1);
    assert_eq!(run_main("int x = 3; return x * 4294967296 == 12884901888;").return_value, 1);

    // Literals in the 32-bit range leave the operation at int width
    let lowered = lower_main("int x = 1; int y; y = x + 7; return y;");
    assert_eq!(lowered.cfg.symbols.width_of("%t1").unwrap(), Width::Long);
}

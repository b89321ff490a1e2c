//! x86-64 Assembly Instruction Definitions
//! 
//! A small AT&T-syntax model: the scratch registers the code generator uses,
//! operands, and the instructions it emits, each printed with the suffix of
//! its operand width.

use ifcc_common::Width;
use std::fmt;

/// Registers touched by generated code.
///
/// `Rax` is the accumulator, `Rcx` holds right-hand operands and shift
/// counts, `Rdx` receives the high half for division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg {
    Rax,
    Rcx,
    Rdx,
    Rbp,
    Rsp,
}

impl Reg {
    /// Register name for an access of `width`
    pub fn name(self, width: Width) -> &'static str {
        match (self, width) {
            (Reg::Rax, Width::Byte) => "al",
            (Reg::Rax, Width::Word) => "ax",
            (Reg::Rax, Width::Long) => "eax",
            (Reg::Rax, Width::Quad) => "rax",
            (Reg::Rcx, Width::Byte) => "cl",
            (Reg::Rcx, Width::Word) => "cx",
            (Reg::Rcx, Width::Long) => "ecx",
            (Reg::Rcx, Width::Quad) => "rcx",
            (Reg::Rdx, Width::Byte) => "dl",
            (Reg::Rdx, Width::Word) => "dx",
            (Reg::Rdx, Width::Long) => "edx",
            (Reg::Rdx, Width::Quad) => "rdx",
            (Reg::Rbp, Width::Byte) => "bpl",
            (Reg::Rbp, Width::Word) => "bp",
            (Reg::Rbp, Width::Long) => "ebp",
            (Reg::Rbp, Width::Quad) => "rbp",
            (Reg::Rsp, Width::Byte) => "spl",
            (Reg::Rsp, Width::Word) => "sp",
            (Reg::Rsp, Width::Long) => "esp",
            (Reg::Rsp, Width::Quad) => "rsp",
        }
    }
}

/// AT&T operand-size suffix
pub fn suffix(width: Width) -> char {
    match width {
        Width::Byte => 'b',
        Width::Word => 'w',
        Width::Long => 'l',
        Width::Quad => 'q',
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Imm(i64),
    Reg(Reg, Width),
    /// Stack slot `-offset(%rbp)`
    Slot(u32),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Imm(value) => write!(f, "${value}"),
            Operand::Reg(reg, width) => write!(f, "%{}", reg.name(*width)),
            Operand::Slot(offset) => write!(f, "-{offset}(%rbp)"),
        }
    }
}

/// Two-operand ALU instructions: `dst = dst OP src`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Sub,
    Imul,
    And,
    Or,
    Xor,
    Cmp,
}

impl AluOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            AluOp::Add => "add",
            AluOp::Sub => "sub",
            AluOp::Imul => "imul",
            AluOp::And => "and",
            AluOp::Or => "or",
            AluOp::Xor => "xor",
            AluOp::Cmp => "cmp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftOp {
    Shl,
    Shr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryAluOp {
    Neg,
    Not,
}

/// Condition codes for `setcc`/`jcc`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cond {
    E,
    Ne,
    L,
    Le,
    G,
    Ge,
}

impl fmt::Display for Cond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Cond::E => "e",
            Cond::Ne => "ne",
            Cond::L => "l",
            Cond::Le => "le",
            Cond::G => "g",
            Cond::Ge => "ge",
        };
        write!(f, "{s}")
    }
}

/// x86-64 assembly instructions and directives
#[derive(Debug, Clone, PartialEq)]
pub enum AsmInst {
    // Directives
    Text,
    /// `.section` with its full argument list
    Section(String),
    Globl(String),
    Label(String),

    // Data movement
    Mov { width: Width, src: Operand, dst: Operand },
    /// 64-bit immediate into a register
    MovAbs { value: i64, dst: Reg },
    /// Sign-extending load from `from` to `to` bits
    Movsx { from: Width, to: Width, src: Operand, dst: Reg },
    /// Zero-extend a byte register into a 32-bit register
    Movzb { src: Reg, dst: Reg },

    // Arithmetic and logic
    Alu { op: AluOp, width: Width, src: Operand, dst: Operand },
    /// Shift `dst` by `%cl`
    Shift { op: ShiftOp, width: Width, dst: Operand },
    Unary { op: UnaryAluOp, width: Width, dst: Operand },
    /// Sign-extend the accumulator into the dividend's high half
    SignExtendAcc(Width),
    Idiv { width: Width, src: Operand },
    Set { cond: Cond, dst: Reg },

    // Control flow
    Jmp(String),
    Jcc(Cond, String),
    Push(Reg),
    Pop(Reg),
    Ret,
}

impl fmt::Display for AsmInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmInst::Text => write!(f, ".text"),
            AsmInst::Section(args) => write!(f, ".section {args}"),
            AsmInst::Globl(symbol) => write!(f, ".globl {symbol}"),
            AsmInst::Label(label) => write!(f, "{label}:"),

            AsmInst::Mov { width, src, dst } => write!(f, "mov{} {src}, {dst}", suffix(*width)),
            AsmInst::MovAbs { value, dst } => write!(f, "movabsq ${value}, %{}", dst.name(Width::Quad)),
            AsmInst::Movsx { from, to, src, dst } => {
                if *from == Width::Long && *to == Width::Quad {
                    write!(f, "movslq {src}, %{}", dst.name(*to))
                } else {
                    write!(f, "movs{}{} {src}, %{}", suffix(*from), suffix(*to), dst.name(*to))
                }
            }
            AsmInst::Movzb { src, dst } => {
                write!(f, "movzbl %{}, %{}", src.name(Width::Byte), dst.name(Width::Long))
            }

            AsmInst::Alu { op, width, src, dst } => {
                write!(f, "{}{} {src}, {dst}", op.mnemonic(), suffix(*width))
            }
            AsmInst::Shift { op, width, dst } => {
                let mnemonic = match op {
                    ShiftOp::Shl => "shl",
                    ShiftOp::Shr => "shr",
                };
                write!(f, "{mnemonic}{} %cl, {dst}", suffix(*width))
            }
            AsmInst::Unary { op, width, dst } => {
                let mnemonic = match op {
                    UnaryAluOp::Neg => "neg",
                    UnaryAluOp::Not => "not",
                };
                write!(f, "{mnemonic}{} {dst}", suffix(*width))
            }
            AsmInst::SignExtendAcc(width) => match width {
                Width::Quad => write!(f, "cqto"),
                _ => write!(f, "cltd"),
            },
            AsmInst::Idiv { width, src } => write!(f, "idiv{} {src}", suffix(*width)),
            AsmInst::Set { cond, dst } => write!(f, "set{cond} %{}", dst.name(Width::Byte)),

            AsmInst::Jmp(label) => write!(f, "jmp {label}"),
            AsmInst::Jcc(cond, label) => write!(f, "j{cond} {label}"),
            AsmInst::Push(reg) => write!(f, "pushq %{}", reg.name(Width::Quad)),
            AsmInst::Pop(reg) => write!(f, "popq %{}", reg.name(Width::Quad)),
            AsmInst::Ret => write!(f, "ret"),
        }
    }
}

impl AsmInst {
    /// Directives and labels are printed flush left
    pub fn is_directive(&self) -> bool {
        matches!(
            self,
            AsmInst::Text | AsmInst::Section(_) | AsmInst::Globl(_) | AsmInst::Label(_)
        )
    }
}

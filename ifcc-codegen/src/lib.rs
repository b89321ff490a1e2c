//! x86-64 Assembly Model
//!
//! Instruction, operand and register definitions in AT&T syntax, stack frame
//! layout, platform symbol conventions and the text emitter. Instruction
//! selection from IR lives in `ifcc-backend`.

pub mod asm;
pub mod emit;
pub mod frame;
pub mod target;

pub use asm::{suffix, AluOp, AsmInst, Cond, Operand, Reg, ShiftOp, UnaryAluOp};
pub use emit::emit;
pub use frame::{Frame, FrameError, MAX_FRAME_SIZE};
pub use target::Target;

//! Stack Frame Layout
//!
//! Every local lives in a slot below the saved frame pointer, addressed as
//! `-offset(%rbp)`. The frame is padded to a multiple of 16 so `%rsp` stays
//! aligned after the prologue.

use crate::asm::{AluOp, AsmInst, Operand, Reg};
use ifcc_common::Width;
use thiserror::Error;

/// Largest frame addressable with a 32-bit displacement
pub const MAX_FRAME_SIZE: u32 = i32::MAX as u32 & !15;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrameError {
    #[error("stack frame too large: {0} bytes")]
    FrameTooLarge(u64),

    #[error("stack slot at offset {offset} lies outside the {frame} byte frame")]
    SlotOutOfFrame { offset: u32, frame: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Bytes reserved below `%rbp`, already 16-aligned
    size: u32,
}

impl Frame {
    /// Build a frame holding `local_bytes` bytes of locals
    pub fn new(local_bytes: u64) -> Result<Self, FrameError> {
        let size = local_bytes.div_ceil(16) * 16;
        if size > MAX_FRAME_SIZE as u64 {
            return Err(FrameError::FrameTooLarge(size));
        }
        Ok(Self { size: size as u32 })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Check that a slot of `width` at `offset` fits in the frame
    pub fn slot(&self, offset: u32, width: Width) -> Result<Operand, FrameError> {
        if offset < width.bytes() || offset > self.size {
            return Err(FrameError::SlotOutOfFrame { offset, frame: self.size });
        }
        Ok(Operand::Slot(offset))
    }

    pub fn gen_prologue(&self) -> Vec<AsmInst> {
        let mut insts = vec![
            AsmInst::Push(Reg::Rbp),
            AsmInst::Mov {
                width: Width::Quad,
                src: Operand::Reg(Reg::Rsp, Width::Quad),
                dst: Operand::Reg(Reg::Rbp, Width::Quad),
            },
        ];
        if self.size > 0 {
            insts.push(AsmInst::Alu {
                op: AluOp::Sub,
                width: Width::Quad,
                src: Operand::Imm(self.size as i64),
                dst: Operand::Reg(Reg::Rsp, Width::Quad),
            });
        }
        insts
    }

    pub fn gen_epilogue(&self) -> Vec<AsmInst> {
        vec![
            AsmInst::Mov {
                width: Width::Quad,
                src: Operand::Reg(Reg::Rbp, Width::Quad),
                dst: Operand::Reg(Reg::Rsp, Width::Quad),
            },
            AsmInst::Pop(Reg::Rbp),
            AsmInst::Ret,
        ]
    }
}

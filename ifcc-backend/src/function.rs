//! Function-level code generation
//!
//! Lays the blocks of a finished CFG out in id order: the entry block under
//! the global symbol and the prologue, then every body block, then the
//! epilogue block followed by the frame teardown.

use crate::error::CodegenError;
use crate::instr;
use crate::slots::StackSlots;
use ifcc_codegen::{AsmInst, Target};
use ifcc_common::BlockId;
use ifcc_ir::{BasicBlock, Cfg, Instruction, ENTRY_BLOCK, EPILOGUE_BLOCK};
use log::{debug, trace};
use std::collections::HashMap;

pub struct FunctionBuilder<'a> {
    cfg: &'a Cfg,
    target: Target,
    slots: StackSlots<'a>,

    /// Emitted label per block id; the entry block uses the global symbol
    labels: Vec<String>,

    /// IR label to block id, for `jmp` instructions
    label_ids: HashMap<&'a str, BlockId>,

    instructions: Vec<AsmInst>,
}

impl<'a> FunctionBuilder<'a> {
    pub fn new(cfg: &'a Cfg, target: Target) -> Result<Self, CodegenError> {
        cfg.validate()?;
        let slots = StackSlots::new(&cfg.symbols)?;

        let labels = cfg
            .blocks
            .iter()
            .map(|block| {
                if block.id == ENTRY_BLOCK {
                    target.symbol(&cfg.name)
                } else {
                    block.label.clone()
                }
            })
            .collect();

        Ok(Self {
            cfg,
            target,
            slots,
            labels,
            label_ids: cfg.block_by_label(),
            instructions: Vec::new(),
        })
    }

    fn push(&mut self, insts: Vec<AsmInst>) {
        for inst in insts {
            trace!("    {inst}");
            self.instructions.push(inst);
        }
    }

    fn label(&self, id: BlockId) -> Result<String, CodegenError> {
        self.labels.get(id).cloned().ok_or(CodegenError::UnknownBlock(id))
    }

    /// Generate the whole function
    pub fn build(mut self) -> Result<Vec<AsmInst>, CodegenError> {
        let cfg = self.cfg;
        debug!(
            "generating '{}': {} blocks, {} byte frame",
            cfg.name,
            cfg.blocks.len(),
            self.slots.frame().size()
        );

        // Entry, body blocks, epilogue
        let mut layout: Vec<BlockId> = cfg.blocks.iter().map(|b| b.id).filter(|&id| id != EPILOGUE_BLOCK).collect();
        layout.push(EPILOGUE_BLOCK);

        let symbol = self.label(ENTRY_BLOCK)?;
        self.push(vec![AsmInst::Text, AsmInst::Globl(symbol)]);

        for (position, &id) in layout.iter().enumerate() {
            let block = cfg.block(id).ok_or(CodegenError::UnknownBlock(id))?;
            self.push(vec![AsmInst::Label(self.label(id)?)]);

            if id == ENTRY_BLOCK {
                let prologue = self.slots.frame().gen_prologue();
                self.push(prologue);
            }

            self.lower_block(block)?;

            if id == EPILOGUE_BLOCK {
                let epilogue = self.slots.frame().gen_epilogue();
                self.push(epilogue);
            } else {
                let next = layout.get(position + 1).copied();
                let insts = instr::lower_terminator(&self.slots, &block.terminator, &self.labels, next)?;
                self.push(insts);
            }
        }

        if let Some(section) = self.target.stack_note_section() {
            self.push(vec![AsmInst::Section(section.to_string())]);
        }

        debug!("generated {} instructions for '{}'", self.instructions.len(), cfg.name);
        Ok(self.instructions)
    }

    fn lower_block(&mut self, block: &BasicBlock) -> Result<(), CodegenError> {
        trace!("  block {} '{}'", block.id, block.label);
        for inst in &block.instructions {
            trace!("  ir: {inst}");
            let insts = self.lower_instruction(inst)?;
            self.push(insts);
        }
        Ok(())
    }

    fn lower_instruction(&self, inst: &Instruction) -> Result<Vec<AsmInst>, CodegenError> {
        let slots = &self.slots;
        match inst {
            Instruction::LoadConst { dest, value } => instr::lower_load_const(slots, dest, *value),
            Instruction::Copy { dest, src } => instr::lower_copy(slots, dest, src),
            Instruction::Binary { op, dest, lhs, rhs } => instr::lower_binary(slots, *op, dest, lhs, rhs),
            Instruction::Unary { op, dest } => instr::lower_unary(slots, *op, dest),
            Instruction::Return { value } => instr::lower_return(slots, value, &self.label(EPILOGUE_BLOCK)?),
            Instruction::Jump { label } => {
                let target = self
                    .label_ids
                    .get(label.as_str())
                    .copied()
                    .ok_or_else(|| CodegenError::UnknownLabel(label.clone()))?;
                Ok(instr::lower_jump(&self.label(target)?))
            }
        }
    }
}

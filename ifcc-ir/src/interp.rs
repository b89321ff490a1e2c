//! Reference interpreter for control-flow graphs
//!
//! Executes IR with the same width rules as the generated machine code:
//! arithmetic runs at `max(4, destination width)`, sources are read
//! sign-extended from their own width and results are narrowed to the
//! destination. Counts how often each block is entered.

use crate::blocks::Terminator;
use crate::cfg::{Cfg, ENTRY_BLOCK, EPILOGUE_BLOCK};
use crate::instructions::{Instruction, Operand};
use ifcc_common::BlockId;
use log::trace;
use std::collections::HashMap;
use thiserror::Error;

pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpError {
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("unknown label '{0}'")]
    UnknownLabel(String),

    #[error("unknown block {0}")]
    UnknownBlock(BlockId),

    #[error("arithmetic trap in '{0}'")]
    ArithmeticTrap(String),

    #[error("step limit of {0} exceeded")]
    StepLimitExceeded(usize),

    #[error("interpreter is not running")]
    NotRunning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpState {
    Running,
    Returned(i64),
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub return_value: i64,
    /// Entry count per block id
    pub block_visits: Vec<usize>,
    pub steps: usize,
}

impl Execution {
    /// Exit status a process returning this value would report
    pub fn exit_status(&self) -> u8 {
        self.return_value as u8
    }
}

pub struct Interpreter<'a> {
    cfg: &'a Cfg,
    labels: HashMap<&'a str, BlockId>,
    memory: HashMap<String, i64>,
    block: BlockId,
    index: usize,
    pub state: InterpState,
    pub block_visits: Vec<usize>,
    steps: usize,
    step_limit: usize,
}

impl<'a> Interpreter<'a> {
    pub fn new(cfg: &'a Cfg) -> Self {
        let mut block_visits = vec![0; cfg.blocks.len()];
        block_visits[ENTRY_BLOCK] = 1;
        Self {
            cfg,
            labels: cfg.block_by_label(),
            memory: HashMap::new(),
            block: ENTRY_BLOCK,
            index: 0,
            state: InterpState::Running,
            block_visits,
            steps: 0,
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }

    pub fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// Current value of a symbol; never-written slots read as 0
    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.cfg.symbols.get(name)?;
        Some(self.memory.get(name).copied().unwrap_or(0))
    }

    fn read(&self, operand: &Operand) -> Result<i64, InterpError> {
        match operand {
            Operand::Imm(value) => Ok(*value),
            Operand::Var(name) => self
                .value_of(name)
                .ok_or_else(|| InterpError::UnknownVariable(name.clone())),
        }
    }

    fn write(&mut self, name: &str, value: i64) -> Result<(), InterpError> {
        let width = self
            .cfg
            .symbols
            .get(name)
            .map(|s| s.width)
            .ok_or_else(|| InterpError::UnknownVariable(name.to_string()))?;
        self.memory.insert(name.to_string(), width.truncate(value));
        Ok(())
    }

    fn operation_width(&self, dest: &str) -> Result<ifcc_common::Width, InterpError> {
        self.cfg
            .symbols
            .get(dest)
            .map(|s| s.width.promoted())
            .ok_or_else(|| InterpError::UnknownVariable(dest.to_string()))
    }

    fn enter(&mut self, block: BlockId) -> Result<(), InterpError> {
        let visits = self
            .block_visits
            .get_mut(block)
            .ok_or(InterpError::UnknownBlock(block))?;
        *visits += 1;
        self.block = block;
        self.index = 0;
        Ok(())
    }

    /// Execute one instruction or one terminator
    pub fn step(&mut self) -> Result<(), InterpError> {
        if self.state != InterpState::Running {
            return Err(InterpError::NotRunning);
        }
        self.steps += 1;
        if self.steps > self.step_limit {
            return Err(InterpError::StepLimitExceeded(self.step_limit));
        }

        let cfg = self.cfg;
        let block = cfg.block(self.block).ok_or(InterpError::UnknownBlock(self.block))?;

        let Some(instr) = block.instructions.get(self.index) else {
            return match &block.terminator {
                Terminator::FallThrough => {
                    // Leaving the epilogue without a `ret` returns 0
                    self.state = InterpState::Returned(0);
                    Ok(())
                }
                Terminator::Jump(target) => self.enter(*target),
                Terminator::Branch { test, on_true, on_false } => {
                    let taken = if self.read(&Operand::Var(test.clone()))? != 0 {
                        *on_true
                    } else {
                        *on_false
                    };
                    self.enter(taken)
                }
            };
        };

        trace!("exec {}: {instr}", block.label);
        self.index += 1;

        match instr {
            Instruction::LoadConst { dest, value } => self.write(dest, *value)?,
            Instruction::Copy { dest, src } => {
                let value = self.read(&Operand::Var(src.clone()))?;
                self.write(dest, value)?;
            }
            Instruction::Binary { op, dest, lhs, rhs } => {
                let width = self.operation_width(dest)?;
                let result = op
                    .apply(self.read(lhs)?, self.read(rhs)?, width)
                    .ok_or_else(|| InterpError::ArithmeticTrap(instr.to_string()))?;
                self.write(dest, result)?;
            }
            Instruction::Unary { op, dest } => {
                let width = self.operation_width(dest)?;
                let value = self.read(&Operand::Var(dest.clone()))?;
                self.write(dest, op.apply(value, width))?;
            }
            Instruction::Return { value } => {
                let value = self.read(&Operand::Var(value.clone()))?;
                self.enter(EPILOGUE_BLOCK)?;
                self.state = InterpState::Returned(value);
            }
            Instruction::Jump { label } => {
                let target = *self
                    .labels
                    .get(label.as_str())
                    .ok_or_else(|| InterpError::UnknownLabel(label.clone()))?;
                self.enter(target)?;
            }
        }

        Ok(())
    }

    /// Run until the function returns
    pub fn run(mut self) -> Result<Execution, InterpError> {
        loop {
            if let InterpState::Returned(value) = self.state {
                return Ok(Execution {
                    return_value: value,
                    block_visits: self.block_visits,
                    steps: self.steps,
                });
            }
            self.step()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::START_BLOCK;
    use crate::instructions::BinaryOpcode;
    use ifcc_common::{SourceLocation, Width};

    #[test]
    fn test_widths_follow_destination() {
        let mut cfg = Cfg::new("main");
        cfg.symbols.declare("c", Width::Byte, SourceLocation::new(1, 1)).unwrap();
        cfg.add_instruction(Instruction::LoadConst { dest: "c".to_string(), value: 127 });
        cfg.add_instruction(Instruction::Binary {
            op: BinaryOpcode::Add,
            dest: "c".to_string(),
            lhs: Operand::var("c"),
            rhs: Operand::Imm(1),
        });
        cfg.add_instruction(Instruction::Return { value: "c".to_string() });

        let execution = Interpreter::new(&cfg).run().unwrap();
        assert_eq!(execution.return_value, -128);
        assert_eq!(execution.exit_status(), 128);
        assert_eq!(execution.block_visits[START_BLOCK], 1);
        assert_eq!(execution.block_visits[EPILOGUE_BLOCK], 1);
    }

    #[test]
    fn test_division_by_zero_traps() {
        let mut cfg = Cfg::new("main");
        cfg.symbols.declare("x", Width::Long, SourceLocation::new(1, 1)).unwrap();
        cfg.add_instruction(Instruction::Binary {
            op: BinaryOpcode::Div,
            dest: "x".to_string(),
            lhs: Operand::Imm(1),
            rhs: Operand::Imm(0),
        });
        assert!(matches!(
            Interpreter::new(&cfg).run(),
            Err(InterpError::ArithmeticTrap(_))
        ));
    }

    #[test]
    fn test_step_limit_stops_infinite_loops() {
        let mut cfg = Cfg::new("main");
        cfg.set_terminator(START_BLOCK, Terminator::Jump(START_BLOCK));
        let result = Interpreter::new(&cfg).with_step_limit(100).run();
        assert_eq!(result, Err(InterpError::StepLimitExceeded(100)));
    }

    #[test]
    fn test_fallthrough_to_epilogue_returns_zero() {
        let cfg = Cfg::new("main");
        let execution = Interpreter::new(&cfg).run().unwrap();
        assert_eq!(execution.return_value, 0);
    }
}

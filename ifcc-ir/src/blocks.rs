//! Basic Block Management
//! 
//! A block is a label, a straight-line run of instructions and an explicit
//! terminator describing where control goes afterwards.

use crate::instructions::Instruction;
use ifcc_common::BlockId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How control leaves a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terminator {
    /// No successor: only the epilogue ends this way
    FallThrough,

    /// Unconditional edge
    Jump(BlockId),

    /// Go to `on_true` when `test` is non-zero, otherwise to `on_false`
    Branch {
        test: String,
        on_true: BlockId,
        on_false: BlockId,
    },
}

impl Terminator {
    /// The fallthrough/unconditional successor
    pub fn exit_true(&self) -> Option<BlockId> {
        match self {
            Terminator::FallThrough => None,
            Terminator::Jump(target) => Some(*target),
            Terminator::Branch { on_true, .. } => Some(*on_true),
        }
    }

    /// The successor taken when the test variable is zero
    pub fn exit_false(&self) -> Option<BlockId> {
        match self {
            Terminator::Branch { on_false, .. } => Some(*on_false),
            _ => None,
        }
    }

    pub fn successors(&self) -> Vec<BlockId> {
        self.exit_true().into_iter().chain(self.exit_false()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicBlock {
    pub id: BlockId,
    pub label: String,
    pub instructions: Vec<Instruction>,
    pub terminator: Terminator,
}

impl BasicBlock {
    pub fn new(id: BlockId, label: String, terminator: Terminator) -> Self {
        Self {
            id,
            label,
            instructions: Vec::new(),
            terminator,
        }
    }
    
    pub fn add_instruction(&mut self, instr: Instruction) {
        self.instructions.push(instr);
    }
    
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl fmt::Display for BasicBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.label)?;
        for instr in &self.instructions {
            writeln!(f, "    {instr}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminator_edges() {
        assert_eq!(Terminator::FallThrough.successors(), Vec::<BlockId>::new());
        assert_eq!(Terminator::Jump(4).exit_true(), Some(4));
        assert_eq!(Terminator::Jump(4).exit_false(), None);

        let branch = Terminator::Branch {
            test: "%t1".to_string(),
            on_true: 3,
            on_false: 5,
        };
        assert_eq!(branch.successors(), vec![3, 5]);
    }
}

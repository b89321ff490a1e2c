//! Control-flow graph of one function
//!
//! Block 0 is the entry (prologue), block 1 the epilogue and execution
//! starts in block 2. The graph owns the function's symbol table.

use crate::blocks::{BasicBlock, Terminator};
use crate::instructions::Instruction;
use crate::symbol_table::SymbolTable;
use ifcc_common::{BlockId, CompilerError, Width};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use thiserror::Error;

pub const ENTRY_BLOCK: BlockId = 0;
pub const EPILOGUE_BLOCK: BlockId = 1;
pub const START_BLOCK: BlockId = 2;

/// Structural problems found by [`Cfg::validate`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CfgError {
    #[error("graph has {0} blocks, expected at least entry, epilogue and start")]
    MissingReservedBlocks(usize),

    #[error("block {block} is stored at index {index}")]
    MisplacedBlock { block: BlockId, index: usize },

    #[error("epilogue block must not have successors")]
    EpilogueHasSuccessor,

    #[error("block '{0}' has no successor but is not the epilogue")]
    DanglingBlock(String),

    #[error("block '{block}' branches on an empty test variable")]
    EmptyTestVariable { block: String },

    #[error("block '{block}' branches on undeclared variable '{test}'")]
    UndeclaredTestVariable { block: String, test: String },

    #[error("block '{block}' refers to missing block {target}")]
    MissingSuccessor { block: String, target: BlockId },

    #[error("block '{block}' jumps to unknown label '{label}'")]
    UnknownLabel { block: String, label: String },

    #[error("block '{block}' uses undeclared variable '{name}'")]
    UndeclaredVariable { block: String, name: String },

    #[error("block '{0}' is unreachable from the entry")]
    Unreachable(String),

    #[error("label '{0}' is used by more than one block")]
    DuplicateLabel(String),
}

impl From<CfgError> for CompilerError {
    fn from(err: CfgError) -> Self {
        CompilerError::InternalError {
            message: format!("malformed control-flow graph: {err}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cfg {
    pub name: String,
    pub blocks: Vec<BasicBlock>,
    pub symbols: SymbolTable,
    current: BlockId,
    next_label: usize,
    next_temp: usize,
}

impl Cfg {
    /// Create the graph with its reserved blocks; the start block is current
    /// and falls through to the epilogue.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut cfg = Self {
            blocks: Vec::new(),
            symbols: SymbolTable::new(),
            current: START_BLOCK,
            next_label: 0,
            next_temp: 0,
            name,
        };

        cfg.blocks.push(BasicBlock::new(
            ENTRY_BLOCK,
            cfg.name.clone(),
            Terminator::Jump(START_BLOCK),
        ));
        cfg.blocks.push(BasicBlock::new(
            EPILOGUE_BLOCK,
            format!(".L{}_epilogue", cfg.name),
            Terminator::FallThrough,
        ));
        cfg.next_label = START_BLOCK;
        cfg.new_block(Terminator::Jump(EPILOGUE_BLOCK));
        cfg
    }

    /// Append a block with a fresh label and return its id
    pub fn new_block(&mut self, terminator: Terminator) -> BlockId {
        let id = self.blocks.len();
        let label = format!(".L{}_{}", self.name, self.next_label);
        self.next_label += 1;
        debug!("created block {id} '{label}'");
        self.blocks.push(BasicBlock::new(id, label, terminator));
        id
    }

    /// Fresh temporary of the given width, declared in the symbol table
    pub fn new_temp(&mut self, width: Width) -> Result<String, CompilerError> {
        let name = format!("%t{}", self.next_temp);
        self.next_temp += 1;
        self.symbols.declare_temporary(&name, width)?;
        Ok(name)
    }

    pub fn current_block(&self) -> BlockId {
        self.current
    }

    pub fn set_current_block(&mut self, id: BlockId) {
        self.current = id;
    }

    /// Append to the current block
    pub fn add_instruction(&mut self, instr: Instruction) {
        trace!("  {}: {instr}", self.blocks[self.current].label);
        self.blocks[self.current].add_instruction(instr);
    }

    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(id)
    }

    pub fn label_of(&self, id: BlockId) -> Option<&str> {
        self.blocks.get(id).map(|b| b.label.as_str())
    }

    pub fn terminator(&self, id: BlockId) -> Option<&Terminator> {
        self.blocks.get(id).map(|b| &b.terminator)
    }

    pub fn set_terminator(&mut self, id: BlockId, terminator: Terminator) {
        if let Some(block) = self.blocks.get_mut(id) {
            block.terminator = terminator;
        }
    }

    /// Blocks emitted as code: everything from the start block on
    pub fn body_blocks(&self) -> &[BasicBlock] {
        self.blocks.get(START_BLOCK..).unwrap_or(&[])
    }

    pub fn block_by_label(&self) -> HashMap<&str, BlockId> {
        self.blocks.iter().map(|b| (b.label.as_str(), b.id)).collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check the structural invariants of a finished graph
    pub fn validate(&self) -> Result<(), CfgError> {
        if self.blocks.len() <= START_BLOCK {
            return Err(CfgError::MissingReservedBlocks(self.blocks.len()));
        }

        let labels = self.block_by_label();
        if labels.len() != self.blocks.len() {
            let mut seen = HashSet::new();
            for block in &self.blocks {
                if !seen.insert(block.label.as_str()) {
                    return Err(CfgError::DuplicateLabel(block.label.clone()));
                }
            }
        }

        for (index, block) in self.blocks.iter().enumerate() {
            if block.id != index {
                return Err(CfgError::MisplacedBlock { block: block.id, index });
            }

            match &block.terminator {
                Terminator::FallThrough if index != EPILOGUE_BLOCK => {
                    return Err(CfgError::DanglingBlock(block.label.clone()));
                }
                Terminator::Branch { test, .. } if test.is_empty() => {
                    return Err(CfgError::EmptyTestVariable { block: block.label.clone() });
                }
                Terminator::Branch { test, .. } if self.symbols.get(test).is_none() => {
                    return Err(CfgError::UndeclaredTestVariable {
                        block: block.label.clone(),
                        test: test.clone(),
                    });
                }
                _ => {}
            }

            if index == EPILOGUE_BLOCK && block.terminator != Terminator::FallThrough {
                return Err(CfgError::EpilogueHasSuccessor);
            }

            for target in block.terminator.successors() {
                if target >= self.blocks.len() {
                    return Err(CfgError::MissingSuccessor { block: block.label.clone(), target });
                }
            }

            for instr in &block.instructions {
                if let Instruction::Jump { label } = instr {
                    if !labels.contains_key(label.as_str()) {
                        return Err(CfgError::UnknownLabel {
                            block: block.label.clone(),
                            label: label.clone(),
                        });
                    }
                }
                for name in instr.symbols() {
                    if self.symbols.get(name).is_none() {
                        return Err(CfgError::UndeclaredVariable {
                            block: block.label.clone(),
                            name: name.to_string(),
                        });
                    }
                }
            }
        }

        let reachable = self.reachable_blocks();
        for block in &self.blocks {
            if block.id != EPILOGUE_BLOCK && !reachable.contains(&block.id) {
                return Err(CfgError::Unreachable(block.label.clone()));
            }
        }

        Ok(())
    }

    /// Blocks reachable from the entry by following terminator edges
    pub fn reachable_blocks(&self) -> HashSet<BlockId> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([ENTRY_BLOCK]);
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(block) = self.blocks.get(id) {
                queue.extend(block.terminator.successors());
            }
        }
        seen
    }

    fn label_or_unknown(&self, id: BlockId) -> &str {
        self.label_of(id).unwrap_or("<missing>")
    }
}

impl fmt::Display for Cfg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "function {} (frame {} bytes)", self.name, self.symbols.frame_size())?;
        for symbol in self.symbols.iter() {
            writeln!(f, "    ; {} {} @ -{}", symbol.name, symbol.width, symbol.offset)?;
        }
        for block in &self.blocks {
            write!(f, "{block}")?;
            match &block.terminator {
                Terminator::FallThrough => {}
                Terminator::Jump(target) => writeln!(f, "    jmp {}", self.label_or_unknown(*target))?,
                Terminator::Branch { test, on_true, on_false } => writeln!(
                    f,
                    "    br {test}, {}, {}",
                    self.label_or_unknown(*on_true),
                    self.label_or_unknown(*on_false)
                )?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::Operand;
    use ifcc_common::SourceLocation;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reserved_blocks() {
        let cfg = Cfg::new("main");
        assert_eq!(cfg.blocks.len(), 3);
        assert_eq!(cfg.label_of(ENTRY_BLOCK), Some("main"));
        assert_eq!(cfg.label_of(EPILOGUE_BLOCK), Some(".Lmain_epilogue"));
        assert_eq!(cfg.label_of(START_BLOCK), Some(".Lmain_2"));
        assert_eq!(cfg.current_block(), START_BLOCK);
        assert_eq!(cfg.terminator(ENTRY_BLOCK), Some(&Terminator::Jump(START_BLOCK)));
        assert_eq!(cfg.terminator(START_BLOCK), Some(&Terminator::Jump(EPILOGUE_BLOCK)));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_labels_are_unique() {
        let mut cfg = Cfg::new("main");
        let a = cfg.new_block(Terminator::Jump(EPILOGUE_BLOCK));
        let b = cfg.new_block(Terminator::Jump(EPILOGUE_BLOCK));
        assert_ne!(cfg.label_of(a), cfg.label_of(b));
        assert_eq!(cfg.label_of(b), Some(".Lmain_4"));
    }

    #[test]
    fn test_validate_rejects_bad_graphs() {
        let mut cfg = Cfg::new("main");
        let orphan = cfg.new_block(Terminator::Jump(EPILOGUE_BLOCK));
        assert_eq!(cfg.validate(), Err(CfgError::Unreachable(".Lmain_3".to_string())));

        cfg.set_terminator(START_BLOCK, Terminator::Branch {
            test: String::new(),
            on_true: orphan,
            on_false: EPILOGUE_BLOCK,
        });
        assert!(matches!(cfg.validate(), Err(CfgError::EmptyTestVariable { .. })));

        cfg.set_terminator(START_BLOCK, Terminator::Branch {
            test: "c".to_string(),
            on_true: orphan,
            on_false: EPILOGUE_BLOCK,
        });
        assert!(matches!(cfg.validate(), Err(CfgError::UndeclaredTestVariable { .. })));

        cfg.symbols.declare("c", Width::Long, SourceLocation::new(1, 1)).unwrap();
        assert_eq!(cfg.validate(), Ok(()));

        cfg.set_terminator(orphan, Terminator::FallThrough);
        assert!(matches!(cfg.validate(), Err(CfgError::DanglingBlock(_))));

        cfg.set_terminator(orphan, Terminator::Jump(99));
        assert!(matches!(cfg.validate(), Err(CfgError::MissingSuccessor { target: 99, .. })));

        cfg.set_terminator(orphan, Terminator::Jump(EPILOGUE_BLOCK));
        cfg.set_current_block(orphan);
        cfg.add_instruction(Instruction::Jump { label: ".Lnowhere".to_string() });
        assert!(matches!(cfg.validate(), Err(CfgError::UnknownLabel { .. })));
    }

    #[test]
    fn test_display_lists_blocks_and_edges() {
        let mut cfg = Cfg::new("main");
        cfg.symbols.declare("a", Width::Long, SourceLocation::new(1, 5)).unwrap();
        let t = cfg.new_temp(Width::Quad).unwrap();
        cfg.add_instruction(Instruction::LoadConst { dest: t.clone(), value: 5 });
        cfg.add_instruction(Instruction::Copy { dest: "a".to_string(), src: t.clone() });
        cfg.add_instruction(Instruction::Binary {
            op: crate::instructions::BinaryOpcode::Add,
            dest: "a".to_string(),
            lhs: Operand::var("a"),
            rhs: Operand::Imm(1),
        });
        cfg.add_instruction(Instruction::Return { value: "a".to_string() });

        let expected = "\
function main (frame 16 bytes)
    ; a i32 @ -4
    ; %t0 i64 @ -12
main:
    jmp .Lmain_2
.Lmain_epilogue:
.Lmain_2:
    ldconst %t0, $5
    copy a, %t0
    add a, a, $1
    ret a
    jmp .Lmain_epilogue
";
        assert_eq!(cfg.to_string(), expected);
    }

    #[test]
    fn test_json_contains_blocks_and_symbols() {
        let mut cfg = Cfg::new("main");
        cfg.symbols.declare("a", Width::Byte, SourceLocation::new(2, 3)).unwrap();
        let json = cfg.to_json().unwrap();
        let back: Cfg = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
        assert!(json.contains(".Lmain_epilogue"));
    }
}

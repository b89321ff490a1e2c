//! ifcc - Intermediate Representation
//! 
//! Symbol table, expression trees with constant folding, the three-address
//! instruction set, basic blocks and control-flow graphs, the syntax tree
//! lowering driver and a reference interpreter for the IR.

pub mod symbol_table;
pub mod expr;
pub mod instructions;
pub mod blocks;
pub mod cfg;
pub mod lower;
pub mod interp;

pub use symbol_table::{Symbol, SymbolStatus, SymbolTable};
pub use expr::{ExprNode, NodeClass};
pub use instructions::{BinaryOpcode, Instruction, Operand, UnaryOpcode};
pub use blocks::{BasicBlock, Terminator};
pub use cfg::{Cfg, CfgError, ENTRY_BLOCK, EPILOGUE_BLOCK, START_BLOCK};
pub use lower::{lower_program, IrGenerator, LoweredFunction};
pub use interp::{Execution, InterpError, Interpreter};

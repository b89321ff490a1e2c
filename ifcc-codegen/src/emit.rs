//! Text emission for assembled instruction streams

use crate::asm::AsmInst;

/// Render instructions as an assembler source file.
/// Directives and labels stay flush left, instructions get one tab.
pub fn emit(insts: &[AsmInst]) -> String {
    let mut output = String::new();
    for inst in insts {
        if !inst.is_directive() {
            output.push('\t');
        }
        output.push_str(&inst.to_string());
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asm::Reg;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_indentation() {
        let insts = vec![
            AsmInst::Text,
            AsmInst::Globl("main".to_string()),
            AsmInst::Label("main".to_string()),
            AsmInst::Push(Reg::Rbp),
            AsmInst::Ret,
            AsmInst::Section(".note.GNU-stack,\"\",@progbits".to_string()),
        ];
        assert_eq!(
            emit(&insts),
            ".text\n.globl main\nmain:\n\tpushq %rbp\n\tret\n.section .note.GNU-stack,\"\",@progbits\n"
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(emit(&[]), "");
    }
}

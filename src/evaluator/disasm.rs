//! Diagnostic program listing.

use std::io;

use crate::instruction::Instruction;

/// One instruction per line, in evaluation order, with its buffer index.
pub(crate) fn dump<W: io::Write>(code: &[Instruction], out: &mut W) -> io::Result<()> {
    for (i, instr) in code.iter().enumerate() {
        writeln!(out, "{i:>4}: {instr}")?;
    }
    Ok(())
}

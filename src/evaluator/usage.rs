//! Argument usage analysis.

use crate::instruction::Instruction;
use crate::CALC_NARGS;

/// Which argument slots a program touches, as bitmaps indexed by slot
/// (bit 0 = A, bit 11 = L).
///
/// A slot counts as an input only if some fetch of it can see the caller's
/// value, that is, the first fetch is not preceded by a store to the same
/// slot. Conditionals are not analyzed: a store inside a branch counts even
/// if that branch is never taken, so `inputs` may under-report for programs
/// that fetch a slot only stored conditionally. This matches a linear
/// reading of the program and keeps the scan a single pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArgUsage {
    /// Slots whose caller-provided value the program may read.
    pub inputs: u32,
    /// Slots the program assigns to.
    pub stores: u32,
}

impl ArgUsage {
    /// Does the program read the caller's value of slot `i`? Always false
    /// for slots outside the argument bank.
    pub fn reads(&self, i: u8) -> bool {
        slot_bit(i).is_some_and(|bit| self.inputs & bit != 0)
    }

    /// Does the program assign to slot `i`? Always false for slots outside
    /// the argument bank.
    pub fn writes(&self, i: u8) -> bool {
        slot_bit(i).is_some_and(|bit| self.stores & bit != 0)
    }
}

/// Bitmap bit for a slot index; `None` for indices outside the argument
/// bank, which hand-built buffers can carry.
fn slot_bit(i: u8) -> Option<u32> {
    if (i as usize) < CALC_NARGS {
        Some(1u32 << i)
    } else {
        None
    }
}

pub(crate) fn scan(code: &[Instruction]) -> ArgUsage {
    let mut usage = ArgUsage::default();
    for instr in code {
        match *instr {
            Instruction::Fetch(i) => {
                if let Some(bit) = slot_bit(i) {
                    if usage.stores & bit == 0 {
                        usage.inputs |= bit;
                    }
                }
            }
            Instruction::Store(i) => {
                if let Some(bit) = slot_bit(i) {
                    usage.stores |= bit;
                }
            }
            _ => {}
        }
    }
    usage
}

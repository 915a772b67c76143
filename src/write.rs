//! Low-level emission of SPIR-V binary form.

use thiserror::Error;

use crate::buffer::WordBuffer;
use crate::inst::Inst;
use crate::spec::Op;

/// First word of every module.
pub const MAGIC: u32 = 0x0723_0203;

/// Version 1.0, major.minor packed into the middle bytes.
pub const VERSION: u32 = 0x0001_0000;

/// Generator magic. This tool has no registered generator number; drivers
/// treat the word as opaque.
pub const GENERATOR: u32 = 0;

/// Reserved schema word.
pub const SCHEMA: u32 = 0;

pub const HEADER_WORDS: usize = 5;

/// Why a module could not be serialized.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmitError {
    /// The opcode is declared in the instruction set but has no binary
    /// encoding (the debug line markers).
    #[error("{0:?} has no binary encoding")]
    Unimplemented(Op),

    /// The instruction spans more words than the 16-bit header field can
    /// carry.
    #[error("{op:?} spans {words} words, more than a header word can carry")]
    TooLong { op: Op, words: usize },
}

/// Accumulates one module: five header words, then each instruction as a
/// `(word_count << 16) | opcode` header word followed by its operand words.
pub(crate) struct ModuleEmitter {
    buf: WordBuffer,
}

impl ModuleEmitter {
    pub(crate) fn with_header(bound: u32) -> Self {
        let mut buf = WordBuffer::with_capacity_words(HEADER_WORDS);
        for word in [MAGIC, VERSION, GENERATOR, bound, SCHEMA] {
            buf.push_u32(word);
        }
        Self { buf }
    }

    pub(crate) fn push_inst(&mut self, inst: &Inst) -> Result<(), EmitError> {
        let words = inst.word_count();
        let header = u32::from(
            u16::try_from(words).map_err(|_| EmitError::TooLong { op: inst.op(), words })?,
        ) << 16
            | u32::from(inst.op().as_u16());

        // Encode before touching the buffer, so a failing instruction
        // leaves no trace.
        let operands = inst.encode_operands()?;

        let expected_len = self.buf.len_words() + words;
        self.buf.push_u32(header);
        self.buf.push_words(&operands);

        // A successful encode must have produced the declared word count.
        assert_eq!(self.buf.len_words(), expected_len, "{:?}", inst.op());

        Ok(())
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.buf.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_words_in_order() {
        let emitter = ModuleEmitter::with_header(24);
        let expected = [MAGIC, VERSION, GENERATOR, 24, SCHEMA];
        assert_eq!(emitter.finish(), bytemuck::cast_slice::<u32, u8>(&expected));
    }

    #[test]
    fn instruction_header_packs_word_count_over_opcode() {
        let mut emitter = ModuleEmitter::with_header(5);
        emitter.push_inst(&Inst::TypeVoid { result: 2 }).unwrap();
        let bytes = emitter.finish();
        assert_eq!(bytes.len(), 4 * (HEADER_WORDS + 2));
        assert_eq!(bytes[20..24], ((2u32 << 16) | 19).to_le_bytes());
        assert_eq!(bytes[24..28], 2u32.to_le_bytes());
    }

    #[test]
    fn oversized_instruction_is_rejected() {
        // 0x10000 words of operands cannot be length-prefixed.
        let name = "x".repeat(4 * 0x10000);
        let inst = Inst::Name { target: 1, name };
        let words = inst.word_count();
        let mut emitter = ModuleEmitter::with_header(2);
        assert_eq!(
            emitter.push_inst(&inst),
            Err(EmitError::TooLong { op: Op::Name, words })
        );
    }
}

//! Hand-assembly of SPIR-V shader modules.
//!
//! A [`Module`] is an ordered sequence of typed [`Inst`]s; [`Module::compile`]
//! serializes the standard five-word header followed by each instruction's
//! length-prefixed words, yielding bytes a driver's shader-module creation
//! call accepts as-is.
//!
//! This layer is a serializer, not a validator: result IDs are plain
//! integers assigned by the caller, instructions are emitted exactly in the
//! order given (the specification's section-ordering rules are the caller's
//! to honor), and the `bound` passed to [`Module::compile`] is written to
//! the header verbatim.

mod buffer;
mod inst;
pub mod spec;
mod write;

pub use buffer::WordBuffer;
pub use inst::{IdList, Inst, Lit, LitList};
pub use write::{EmitError, GENERATOR, HEADER_WORDS, MAGIC, SCHEMA, VERSION};

/// A caller-assigned SPIR-V result ID.
pub type Id = u32;

/// An ordered instruction sequence; insertion order is emission order.
#[derive(Clone, Default)]
pub struct Module {
    pub insts: Vec<Inst>,
}

impl Module {
    pub fn new(insts: Vec<Inst>) -> Self {
        Self { insts }
    }

    pub fn push(&mut self, inst: Inst) {
        self.insts.push(inst);
    }

    /// Serializes header plus instruction stream into one fresh buffer.
    ///
    /// `bound` must be one greater than the largest ID used anywhere in the
    /// module; it is trusted, not checked. Fails only if an instruction has
    /// no binary encoding, in which case no output is produced.
    pub fn compile(&self, bound: u32) -> Result<Vec<u8>, EmitError> {
        let mut emitter = write::ModuleEmitter::with_header(bound);
        for inst in &self.insts {
            emitter.push_inst(inst)?;
        }
        Ok(emitter.finish())
    }
}

impl From<Vec<Inst>> for Module {
    fn from(insts: Vec<Inst>) -> Self {
        Self::new(insts)
    }
}

#[cfg(test)]
mod tests {
    use super::spec::{AddressingModel, Capability, MemoryModel, Op};
    use super::*;

    fn minimal() -> Module {
        Module::new(vec![
            Inst::Capability { capability: Capability::Shader },
            Inst::MemoryModel {
                addressing: AddressingModel::Logical,
                memory: MemoryModel::GLSL450,
            },
            Inst::FunctionEnd,
        ])
    }

    #[test]
    fn minimal_module_layout() {
        let bytes = minimal().compile(5).unwrap();
        // 5 header words + 2 + 3 + 1 instruction words.
        assert_eq!(bytes.len(), 44);
        let header = [MAGIC, VERSION, GENERATOR, 5, SCHEMA];
        assert_eq!(&bytes[..20], bytemuck::cast_slice::<u32, u8>(&header));
        assert_eq!(bytes[20..24], ((2u32 << 16) | 17).to_le_bytes());
        assert_eq!(bytes[24..28], 1u32.to_le_bytes());
        assert_eq!(bytes[28..32], ((3u32 << 16) | 14).to_le_bytes());
        assert_eq!(bytes[32..36], 0u32.to_le_bytes());
        assert_eq!(bytes[36..40], 1u32.to_le_bytes());
        assert_eq!(bytes[40..44], ((1u32 << 16) | 56).to_le_bytes());
    }

    #[test]
    fn compile_is_idempotent() {
        let module = minimal();
        assert_eq!(module.compile(5).unwrap(), module.compile(5).unwrap());
    }

    #[test]
    fn total_length_law() {
        let module = minimal();
        let words: usize = module.insts.iter().map(Inst::word_count).sum();
        assert_eq!(module.compile(5).unwrap().len(), 4 * (HEADER_WORDS + words));
    }

    #[test]
    fn line_marker_aborts_the_whole_compile() {
        let mut module = minimal();
        module.push(Inst::NoLine);
        assert_eq!(module.compile(5), Err(EmitError::Unimplemented(Op::NoLine)));
    }
}

//! The supported instruction set, one typed variant per opcode.
//!
//! Each variant knows its opcode, its total word count, and how to lay its
//! operands out as words. Word counts are opcode-local knowledge: fixed-arity
//! instructions declare theirs outright, the rest derive it from their string
//! and ID-list tails.

use smallvec::SmallVec;

use crate::buffer::WordBuffer;
use crate::spec::{
    AddressingModel, Capability, Decoration, Dim, ExecutionMode, ExecutionModel, FunctionControl,
    ImageDepth, ImageFormat, ImageSampling, MemoryModel, Op, SourceLanguage, StorageClass,
};
use crate::{EmitError, Id};

/// Variable-length ID operand tail (interface lists, struct members, indexes).
///
/// Inline capacity fits the reference shaders, which top out at four.
pub type IdList = SmallVec<[Id; 4]>;

/// Extra literal words trailing a decoration or execution mode.
pub type LitList = SmallVec<[u32; 2]>;

/// A single 32-bit literal operand, as carried by `OpConstant`.
///
/// The numeric type is given by the constant's result type; this only
/// records which bit pattern to write.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Lit {
    I32(i32),
    U32(u32),
    F32(f32),
}

/// One SPIR-V instruction, operands typed per its opcode.
///
/// IDs are caller-assigned integers and are written out verbatim; nothing
/// here checks them against each other or against a module's bound.
#[derive(Clone, Debug, PartialEq)]
pub enum Inst {
    /// Reserved no-op.
    Nop,
    Undef {
        result_type: Id,
        result: Id,
    },
    Source {
        language: SourceLanguage,
        version: u32,
    },
    SourceExtension {
        extension: String,
    },
    Name {
        target: Id,
        name: String,
    },
    MemberName {
        ty: Id,
        member: u32,
        name: String,
    },
    /// Debug line marker. Declared for completeness; has no encoding here.
    Line {
        file: Id,
        line: u32,
        column: u32,
    },
    /// Ends the scope of a preceding [`Inst::Line`]. Also encoding-less.
    NoLine,
    ExtInstImport {
        result: Id,
        name: String,
    },
    MemoryModel {
        addressing: AddressingModel,
        memory: MemoryModel,
    },
    EntryPoint {
        execution_model: ExecutionModel,
        entry_point: Id,
        name: String,
        interface: IdList,
    },
    ExecutionMode {
        entry_point: Id,
        mode: ExecutionMode,
        literals: LitList,
    },
    Capability {
        capability: Capability,
    },
    Decorate {
        target: Id,
        decoration: Decoration,
        /// Extra literal words some decorations take (e.g. a location number).
        literals: LitList,
    },
    MemberDecorate {
        structure_type: Id,
        member: u32,
        decoration: Decoration,
        literals: LitList,
    },
    TypeVoid {
        result: Id,
    },
    TypeInt {
        result: Id,
        width: u32,
        signed: bool,
    },
    TypeFloat {
        result: Id,
        width: u32,
    },
    TypeVector {
        result: Id,
        component_type: Id,
        component_count: u32,
    },
    TypeImage {
        result: Id,
        sampled_type: Id,
        dim: Dim,
        depth: ImageDepth,
        arrayed: bool,
        multisampled: bool,
        sampled: ImageSampling,
        format: ImageFormat,
    },
    TypeSampledImage {
        result: Id,
        image_type: Id,
    },
    TypeStruct {
        result: Id,
        member_types: IdList,
    },
    TypePointer {
        result: Id,
        storage_class: StorageClass,
        pointee: Id,
    },
    TypeFunction {
        result: Id,
        return_type: Id,
        parameter_types: IdList,
    },
    Constant {
        result_type: Id,
        result: Id,
        value: Lit,
    },
    ConstantComposite {
        result_type: Id,
        result: Id,
        constituents: IdList,
    },
    Variable {
        result_type: Id,
        result: Id,
        storage_class: StorageClass,
        initializer: Option<Id>,
    },
    Load {
        result_type: Id,
        result: Id,
        pointer: Id,
    },
    Store {
        pointer: Id,
        object: Id,
    },
    AccessChain {
        result_type: Id,
        result: Id,
        base: Id,
        indexes: IdList,
    },
    Function {
        result_type: Id,
        result: Id,
        control: FunctionControl,
        function_type: Id,
    },
    FunctionEnd,
    Label {
        result: Id,
    },
    Return,
    ImageSampleImplicitLod {
        result_type: Id,
        result: Id,
        sampled_image: Id,
        coordinate: Id,
    },
}

impl Inst {
    pub fn op(&self) -> Op {
        match self {
            Self::Nop => Op::Nop,
            Self::Undef { .. } => Op::Undef,
            Self::Source { .. } => Op::Source,
            Self::SourceExtension { .. } => Op::SourceExtension,
            Self::Name { .. } => Op::Name,
            Self::MemberName { .. } => Op::MemberName,
            Self::Line { .. } => Op::Line,
            Self::NoLine => Op::NoLine,
            Self::ExtInstImport { .. } => Op::ExtInstImport,
            Self::MemoryModel { .. } => Op::MemoryModel,
            Self::EntryPoint { .. } => Op::EntryPoint,
            Self::ExecutionMode { .. } => Op::ExecutionMode,
            Self::Capability { .. } => Op::Capability,
            Self::Decorate { .. } => Op::Decorate,
            Self::MemberDecorate { .. } => Op::MemberDecorate,
            Self::TypeVoid { .. } => Op::TypeVoid,
            Self::TypeInt { .. } => Op::TypeInt,
            Self::TypeFloat { .. } => Op::TypeFloat,
            Self::TypeVector { .. } => Op::TypeVector,
            Self::TypeImage { .. } => Op::TypeImage,
            Self::TypeSampledImage { .. } => Op::TypeSampledImage,
            Self::TypeStruct { .. } => Op::TypeStruct,
            Self::TypePointer { .. } => Op::TypePointer,
            Self::TypeFunction { .. } => Op::TypeFunction,
            Self::Constant { .. } => Op::Constant,
            Self::ConstantComposite { .. } => Op::ConstantComposite,
            Self::Variable { .. } => Op::Variable,
            Self::Load { .. } => Op::Load,
            Self::Store { .. } => Op::Store,
            Self::AccessChain { .. } => Op::AccessChain,
            Self::Function { .. } => Op::Function,
            Self::FunctionEnd => Op::FunctionEnd,
            Self::Label { .. } => Op::Label,
            Self::Return => Op::Return,
            Self::ImageSampleImplicitLod { .. } => Op::ImageSampleImplicitLod,
        }
    }

    /// Total words this instruction occupies in a module, including the
    /// word-count/opcode header word.
    pub fn word_count(&self) -> usize {
        let operand_words = match self {
            Self::Nop | Self::NoLine | Self::FunctionEnd | Self::Return => 0,
            Self::Capability { .. } | Self::TypeVoid { .. } | Self::Label { .. } => 1,
            Self::Undef { .. }
            | Self::Source { .. }
            | Self::MemoryModel { .. }
            | Self::TypeFloat { .. }
            | Self::TypeSampledImage { .. }
            | Self::Store { .. } => 2,
            Self::Line { .. }
            | Self::TypeInt { .. }
            | Self::TypeVector { .. }
            | Self::TypePointer { .. }
            | Self::Constant { .. }
            | Self::Load { .. } => 3,
            Self::Function { .. } | Self::ImageSampleImplicitLod { .. } => 4,
            Self::TypeImage { .. } => 8,
            Self::Variable { initializer, .. } => 3 + usize::from(initializer.is_some()),
            Self::SourceExtension { extension } => WordBuffer::str_word_count(extension),
            Self::Name { name, .. } | Self::ExtInstImport { name, .. } => {
                1 + WordBuffer::str_word_count(name)
            }
            Self::MemberName { name, .. } => 2 + WordBuffer::str_word_count(name),
            Self::EntryPoint { name, interface, .. } => {
                2 + WordBuffer::str_word_count(name) + interface.len()
            }
            Self::ExecutionMode { literals, .. } => 2 + literals.len(),
            Self::Decorate { literals, .. } => 2 + literals.len(),
            Self::MemberDecorate { literals, .. } => 3 + literals.len(),
            Self::TypeStruct { member_types, .. } => 1 + member_types.len(),
            Self::TypeFunction { parameter_types, .. } => 2 + parameter_types.len(),
            Self::ConstantComposite { constituents, .. } => 2 + constituents.len(),
            Self::AccessChain { indexes, .. } => 3 + indexes.len(),
        };
        1 + operand_words
    }

    /// Encodes the operand payload: exactly `word_count() - 1` words, in the
    /// field order the specification gives for this opcode (result type,
    /// result, fixed fields, variable tail).
    ///
    /// The debug line markers ([`Inst::Line`], [`Inst::NoLine`]) carry no
    /// encoding; asking for one is an error, never a guess.
    pub fn encode_operands(&self) -> Result<Vec<u8>, EmitError> {
        let mut buf = WordBuffer::with_capacity_words(self.word_count() - 1);
        match self {
            Self::Nop | Self::FunctionEnd | Self::Return => {}
            Self::Line { .. } | Self::NoLine => {
                return Err(EmitError::Unimplemented(self.op()));
            }
            Self::Undef { result_type, result } => {
                buf.push_id(*result_type);
                buf.push_id(*result);
            }
            Self::Source { language, version } => {
                buf.push_u32(*language as u32);
                buf.push_u32(*version);
            }
            Self::SourceExtension { extension } => {
                buf.push_str(extension);
            }
            Self::Name { target, name } => {
                buf.push_id(*target);
                buf.push_str(name);
            }
            Self::MemberName { ty, member, name } => {
                buf.push_id(*ty);
                buf.push_u32(*member);
                buf.push_str(name);
            }
            Self::ExtInstImport { result, name } => {
                buf.push_id(*result);
                buf.push_str(name);
            }
            Self::MemoryModel { addressing, memory } => {
                buf.push_u32(*addressing as u32);
                buf.push_u32(*memory as u32);
            }
            Self::EntryPoint { execution_model, entry_point, name, interface } => {
                buf.push_u32(*execution_model as u32);
                buf.push_id(*entry_point);
                buf.push_str(name);
                for &id in interface {
                    buf.push_id(id);
                }
            }
            Self::ExecutionMode { entry_point, mode, literals } => {
                buf.push_id(*entry_point);
                buf.push_u32(*mode as u32);
                for &lit in literals {
                    buf.push_u32(lit);
                }
            }
            Self::Capability { capability } => {
                buf.push_u32(*capability as u32);
            }
            Self::Decorate { target, decoration, literals } => {
                buf.push_id(*target);
                buf.push_u32(*decoration as u32);
                for &lit in literals {
                    buf.push_u32(lit);
                }
            }
            Self::MemberDecorate { structure_type, member, decoration, literals } => {
                buf.push_id(*structure_type);
                buf.push_u32(*member);
                buf.push_u32(*decoration as u32);
                for &lit in literals {
                    buf.push_u32(lit);
                }
            }
            Self::TypeVoid { result } => {
                buf.push_id(*result);
            }
            Self::TypeInt { result, width, signed } => {
                buf.push_id(*result);
                buf.push_u32(*width);
                buf.push_u32(u32::from(*signed));
            }
            Self::TypeFloat { result, width } => {
                buf.push_id(*result);
                buf.push_u32(*width);
            }
            Self::TypeVector { result, component_type, component_count } => {
                buf.push_id(*result);
                buf.push_id(*component_type);
                buf.push_u32(*component_count);
            }
            Self::TypeImage {
                result,
                sampled_type,
                dim,
                depth,
                arrayed,
                multisampled,
                sampled,
                format,
            } => {
                buf.push_id(*result);
                buf.push_id(*sampled_type);
                buf.push_u32(*dim as u32);
                buf.push_u32(*depth as u32);
                buf.push_u32(u32::from(*arrayed));
                buf.push_u32(u32::from(*multisampled));
                buf.push_u32(*sampled as u32);
                buf.push_u32(*format as u32);
            }
            Self::TypeSampledImage { result, image_type } => {
                buf.push_id(*result);
                buf.push_id(*image_type);
            }
            Self::TypeStruct { result, member_types } => {
                buf.push_id(*result);
                for &id in member_types {
                    buf.push_id(id);
                }
            }
            Self::TypePointer { result, storage_class, pointee } => {
                buf.push_id(*result);
                buf.push_u32(*storage_class as u32);
                buf.push_id(*pointee);
            }
            Self::TypeFunction { result, return_type, parameter_types } => {
                buf.push_id(*result);
                buf.push_id(*return_type);
                for &id in parameter_types {
                    buf.push_id(id);
                }
            }
            Self::Constant { result_type, result, value } => {
                buf.push_id(*result_type);
                buf.push_id(*result);
                match *value {
                    Lit::I32(v) => buf.push_i32(v),
                    Lit::U32(v) => buf.push_u32(v),
                    Lit::F32(v) => buf.push_f32(v),
                }
            }
            Self::ConstantComposite { result_type, result, constituents } => {
                buf.push_id(*result_type);
                buf.push_id(*result);
                for &id in constituents {
                    buf.push_id(id);
                }
            }
            Self::Variable { result_type, result, storage_class, initializer } => {
                buf.push_id(*result_type);
                buf.push_id(*result);
                buf.push_u32(*storage_class as u32);
                if let Some(init) = initializer {
                    buf.push_id(*init);
                }
            }
            Self::Load { result_type, result, pointer } => {
                buf.push_id(*result_type);
                buf.push_id(*result);
                buf.push_id(*pointer);
            }
            Self::Store { pointer, object } => {
                buf.push_id(*pointer);
                buf.push_id(*object);
            }
            Self::AccessChain { result_type, result, base, indexes } => {
                buf.push_id(*result_type);
                buf.push_id(*result);
                buf.push_id(*base);
                for &id in indexes {
                    buf.push_id(id);
                }
            }
            Self::Function { result_type, result, control, function_type } => {
                buf.push_id(*result_type);
                buf.push_id(*result);
                buf.push_u32(control.0);
                buf.push_id(*function_type);
            }
            Self::Label { result } => {
                buf.push_id(*result);
            }
            Self::ImageSampleImplicitLod { result_type, result, sampled_image, coordinate } => {
                buf.push_id(*result_type);
                buf.push_id(*result);
                buf.push_id(*sampled_image);
                buf.push_id(*coordinate);
            }
        }
        Ok(buf.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    // One valid construction per encodable variant, string/list lengths
    // deliberately off the word boundary where that matters.
    fn samples() -> Vec<Inst> {
        vec![
            Inst::Nop,
            Inst::Undef { result_type: 2, result: 40 },
            Inst::Source { language: SourceLanguage::GLSL, version: 400 },
            Inst::SourceExtension { extension: "GL_ARB_separate_shader_objects".into() },
            Inst::Name { target: 4, name: "main".into() },
            Inst::MemberName { ty: 14, member: 0, name: "gl_Position".into() },
            Inst::ExtInstImport { result: 1, name: "GLSL.std.450".into() },
            Inst::MemoryModel {
                addressing: AddressingModel::Logical,
                memory: MemoryModel::GLSL450,
            },
            Inst::EntryPoint {
                execution_model: ExecutionModel::Vertex,
                entry_point: 4,
                name: "main".into(),
                interface: smallvec![9, 11, 16, 20],
            },
            Inst::ExecutionMode {
                entry_point: 4,
                mode: ExecutionMode::OriginUpperLeft,
                literals: smallvec![],
            },
            Inst::ExecutionMode {
                entry_point: 4,
                mode: ExecutionMode::LocalSize,
                literals: smallvec![8, 8, 1],
            },
            Inst::Capability { capability: Capability::Shader },
            Inst::TypeVoid { result: 2 },
            Inst::TypeInt { result: 17, width: 32, signed: true },
            Inst::TypeFloat { result: 6, width: 32 },
            Inst::TypeVector { result: 7, component_type: 6, component_count: 4 },
            Inst::TypeImage {
                result: 10,
                sampled_type: 6,
                dim: Dim::Dim2D,
                depth: ImageDepth::Unknown,
                arrayed: false,
                multisampled: false,
                sampled: ImageSampling::Sampled,
                format: ImageFormat::Unknown,
            },
            Inst::TypeSampledImage { result: 11, image_type: 10 },
            Inst::TypeStruct { result: 14, member_types: smallvec![13] },
            Inst::TypePointer { result: 8, storage_class: StorageClass::Output, pointee: 7 },
            Inst::TypeFunction { result: 3, return_type: 2, parameter_types: smallvec![] },
            Inst::Constant { result_type: 17, result: 18, value: Lit::I32(0) },
            Inst::Constant { result_type: 6, result: 19, value: Lit::F32(1.0) },
            Inst::ConstantComposite {
                result_type: 7,
                result: 20,
                constituents: smallvec![19, 21, 21, 19],
            },
            Inst::Variable {
                result_type: 8,
                result: 9,
                storage_class: StorageClass::Output,
                initializer: None,
            },
            Inst::Variable {
                result_type: 8,
                result: 9,
                storage_class: StorageClass::Private,
                initializer: Some(19),
            },
            Inst::Load { result_type: 7, result: 12, pointer: 11 },
            Inst::Store { pointer: 9, object: 12 },
            Inst::AccessChain { result_type: 22, result: 23, base: 16, indexes: smallvec![18] },
            Inst::Decorate { target: 9, decoration: Decoration::Location, literals: smallvec![0] },
            Inst::Decorate { target: 14, decoration: Decoration::Block, literals: smallvec![] },
            Inst::MemberDecorate {
                structure_type: 14,
                member: 0,
                decoration: Decoration::BuiltIn,
                literals: smallvec![crate::spec::BuiltIn::Position as u32],
            },
            Inst::Function {
                result_type: 2,
                result: 4,
                control: FunctionControl::NONE,
                function_type: 3,
            },
            Inst::FunctionEnd,
            Inst::Label { result: 5 },
            Inst::Return,
            Inst::ImageSampleImplicitLod {
                result_type: 7,
                result: 22,
                sampled_image: 14,
                coordinate: 18,
            },
        ]
    }

    #[test]
    fn operand_bytes_match_declared_word_count() {
        for inst in samples() {
            let bytes = inst.encode_operands().unwrap();
            assert_eq!(bytes.len(), 4 * (inst.word_count() - 1), "{:?}", inst.op());
        }
    }

    #[test]
    fn entry_point_packs_name_between_ids() {
        let inst = Inst::EntryPoint {
            execution_model: ExecutionModel::Vertex,
            entry_point: 4,
            name: "main".into(),
            interface: smallvec![9, 11],
        };
        assert_eq!(inst.word_count(), 7);
        let expected = [0u32, 4, u32::from_le_bytes(*b"main"), 0, 9, 11];
        assert_eq!(inst.encode_operands().unwrap(), bytemuck::cast_slice::<u32, u8>(&expected));
    }

    #[test]
    fn variable_initializer_adds_a_word() {
        let without = Inst::Variable {
            result_type: 8,
            result: 9,
            storage_class: StorageClass::Output,
            initializer: None,
        };
        let with = Inst::Variable {
            result_type: 8,
            result: 9,
            storage_class: StorageClass::Output,
            initializer: Some(19),
        };
        assert_eq!(without.word_count(), 4);
        assert_eq!(with.word_count(), 5);
        assert_eq!(with.encode_operands().unwrap()[12..], 19u32.to_le_bytes());
    }

    #[test]
    fn float_constants_write_ieee_bits() {
        let inst = Inst::Constant { result_type: 6, result: 19, value: Lit::F32(1.0) };
        let bytes = inst.encode_operands().unwrap();
        assert_eq!(bytes[8..], 0x3f80_0000u32.to_le_bytes());
    }

    #[test]
    fn line_markers_refuse_to_encode() {
        for inst in [Inst::Line { file: 1, line: 7, column: 3 }, Inst::NoLine] {
            assert_eq!(inst.encode_operands(), Err(EmitError::Unimplemented(inst.op())));
        }
        // Their word counts are still declared, per the published table.
        assert_eq!(Inst::Line { file: 1, line: 7, column: 3 }.word_count(), 4);
        assert_eq!(Inst::NoLine.word_count(), 1);
    }
}

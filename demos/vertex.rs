//! Assembles a passthrough vertex shader by hand and writes it to
//! `vertex.spv`, ready for a shader-module creation call.

use smallvec::smallvec;
use spirv_emit::spec::{
    AddressingModel, BuiltIn, Capability, Decoration, ExecutionModel, FunctionControl, MemoryModel,
    SourceLanguage, StorageClass,
};
use spirv_emit::{Inst, Lit, Module};

/// GLSL source this was assembled from:
///
/// ```glsl
/// layout(location = 0) out vec2 texcoord;
/// layout(location = 1) in vec2 attr;
/// layout(location = 0) in vec4 pos;
/// void main() { texcoord = attr; gl_Position = pos; }
/// ```
pub fn vertex_shader() -> Module {
    Module::new(vec![
        Inst::Capability { capability: Capability::Shader },
        Inst::ExtInstImport { result: 1, name: "GLSL.std.450".into() },
        Inst::MemoryModel { addressing: AddressingModel::Logical, memory: MemoryModel::GLSL450 },
        Inst::EntryPoint {
            execution_model: ExecutionModel::Vertex,
            entry_point: 4,
            name: "main".into(),
            interface: smallvec![9, 11, 16, 20],
        },
        Inst::Source { language: SourceLanguage::GLSL, version: 400 },
        Inst::SourceExtension { extension: "GL_ARB_separate_shader_objects".into() },
        Inst::SourceExtension { extension: "GL_ARB_shading_language_420pack".into() },
        Inst::Name { target: 4, name: "main".into() },
        Inst::Name { target: 9, name: "texcoord".into() },
        Inst::Name { target: 11, name: "attr".into() },
        Inst::Name { target: 14, name: "gl_PerVertex".into() },
        Inst::MemberName { ty: 14, member: 0, name: "gl_Position".into() },
        Inst::Name { target: 16, name: "".into() },
        Inst::Name { target: 20, name: "pos".into() },
        Inst::Decorate { target: 9, decoration: Decoration::Location, literals: smallvec![0] },
        Inst::Decorate { target: 11, decoration: Decoration::Location, literals: smallvec![1] },
        Inst::MemberDecorate {
            structure_type: 14,
            member: 0,
            decoration: Decoration::BuiltIn,
            literals: smallvec![BuiltIn::Position as u32],
        },
        Inst::Decorate { target: 14, decoration: Decoration::Block, literals: smallvec![] },
        Inst::Decorate { target: 20, decoration: Decoration::Location, literals: smallvec![0] },
        Inst::TypeVoid { result: 2 },
        Inst::TypeFunction { result: 3, return_type: 2, parameter_types: smallvec![] },
        Inst::TypeFloat { result: 6, width: 32 },
        Inst::TypeVector { result: 7, component_type: 6, component_count: 2 },
        Inst::TypePointer { result: 8, storage_class: StorageClass::Output, pointee: 7 },
        Inst::Variable {
            result_type: 8,
            result: 9,
            storage_class: StorageClass::Output,
            initializer: None,
        },
        Inst::TypePointer { result: 10, storage_class: StorageClass::Input, pointee: 7 },
        Inst::Variable {
            result_type: 10,
            result: 11,
            storage_class: StorageClass::Input,
            initializer: None,
        },
        Inst::TypeVector { result: 13, component_type: 6, component_count: 4 },
        Inst::TypeStruct { result: 14, member_types: smallvec![13] },
        Inst::TypePointer { result: 15, storage_class: StorageClass::Output, pointee: 14 },
        Inst::Variable {
            result_type: 15,
            result: 16,
            storage_class: StorageClass::Output,
            initializer: None,
        },
        Inst::TypeInt { result: 17, width: 32, signed: true },
        Inst::Constant { result_type: 17, result: 18, value: Lit::I32(0) },
        Inst::TypePointer { result: 19, storage_class: StorageClass::Input, pointee: 13 },
        Inst::Variable {
            result_type: 19,
            result: 20,
            storage_class: StorageClass::Input,
            initializer: None,
        },
        Inst::TypePointer { result: 22, storage_class: StorageClass::Output, pointee: 13 },
        Inst::Function {
            result_type: 2,
            result: 4,
            control: FunctionControl::NONE,
            function_type: 3,
        },
        Inst::Label { result: 5 },
        Inst::Load { result_type: 7, result: 12, pointer: 11 },
        Inst::Store { pointer: 9, object: 12 },
        Inst::Load { result_type: 13, result: 21, pointer: 20 },
        Inst::AccessChain { result_type: 22, result: 23, base: 16, indexes: smallvec![18] },
        Inst::Store { pointer: 23, object: 21 },
        Inst::Return,
        Inst::FunctionEnd,
    ])
}

fn main() -> std::io::Result<()> {
    let bytes = vertex_shader().compile(24).expect("vertex shader should always encode");
    std::fs::write("vertex.spv", &bytes)?;
    println!("vertex.spv: {} words", bytes.len() / 4);
    Ok(())
}

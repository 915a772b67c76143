//! Assembles a textured fragment shader by hand and writes it to
//! `fragment.spv`.

use smallvec::smallvec;
use spirv_emit::spec::{
    AddressingModel, Capability, Decoration, Dim, ExecutionMode, ExecutionModel, FunctionControl,
    ImageDepth, ImageFormat, ImageSampling, MemoryModel, SourceLanguage, StorageClass,
};
use spirv_emit::{Inst, Lit, Module};

/// GLSL source this was assembled from:
///
/// ```glsl
/// layout(binding = 0) uniform sampler2D tex;
/// layout(location = 0) in vec2 texcoord;
/// layout(location = 0) out vec4 uFragColor;
/// void main() { uFragColor = texture(tex, texcoord); }
/// ```
pub fn fragment_shader() -> Module {
    Module::new(vec![
        Inst::Capability { capability: Capability::Shader },
        Inst::ExtInstImport { result: 1, name: "GLSL.std.450".into() },
        Inst::MemoryModel { addressing: AddressingModel::Logical, memory: MemoryModel::GLSL450 },
        Inst::EntryPoint {
            execution_model: ExecutionModel::Fragment,
            entry_point: 4,
            name: "main".into(),
            interface: smallvec![9, 17],
        },
        Inst::ExecutionMode {
            entry_point: 4,
            mode: ExecutionMode::OriginUpperLeft,
            literals: smallvec![],
        },
        Inst::Source { language: SourceLanguage::GLSL, version: 400 },
        Inst::SourceExtension { extension: "GL_ARB_separate_shader_objects".into() },
        Inst::SourceExtension { extension: "GL_ARB_shading_language_420pack".into() },
        Inst::Name { target: 4, name: "main".into() },
        Inst::Name { target: 9, name: "uFragColor".into() },
        Inst::Name { target: 13, name: "tex".into() },
        Inst::Name { target: 17, name: "texcoord".into() },
        Inst::Decorate { target: 9, decoration: Decoration::Location, literals: smallvec![0] },
        Inst::Decorate { target: 13, decoration: Decoration::DescriptorSet, literals: smallvec![0] },
        Inst::Decorate { target: 13, decoration: Decoration::Binding, literals: smallvec![0] },
        Inst::Decorate { target: 17, decoration: Decoration::Location, literals: smallvec![0] },
        Inst::TypeVoid { result: 2 },
        Inst::TypeFunction { result: 3, return_type: 2, parameter_types: smallvec![] },
        Inst::TypeFloat { result: 6, width: 32 },
        Inst::TypeVector { result: 7, component_type: 6, component_count: 4 },
        Inst::TypePointer { result: 8, storage_class: StorageClass::Output, pointee: 7 },
        Inst::Constant { result_type: 6, result: 19, value: Lit::F32(1.0) },
        Inst::Constant { result_type: 6, result: 21, value: Lit::F32(0.0) },
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
        Inst::TypePointer {
            result: 12,
            storage_class: StorageClass::UniformConstant,
            pointee: 11,
        },
        Inst::Variable {
            result_type: 12,
            result: 13,
            storage_class: StorageClass::UniformConstant,
            initializer: None,
        },
        Inst::TypeVector { result: 15, component_type: 6, component_count: 2 },
        Inst::TypePointer { result: 16, storage_class: StorageClass::Input, pointee: 15 },
        Inst::Variable {
            result_type: 16,
            result: 17,
            storage_class: StorageClass::Input,
            initializer: None,
        },
        Inst::Function {
            result_type: 2,
            result: 4,
            control: FunctionControl::NONE,
            function_type: 3,
        },
        Inst::Label { result: 5 },
        Inst::Load { result_type: 11, result: 14, pointer: 13 },
        Inst::Load { result_type: 15, result: 18, pointer: 17 },
        Inst::ImageSampleImplicitLod {
            result_type: 7,
            result: 22,
            sampled_image: 14,
            coordinate: 18,
        },
        Inst::Store { pointer: 9, object: 22 },
        Inst::Return,
        Inst::FunctionEnd,
    ])
}

fn main() -> std::io::Result<()> {
    let bytes = fragment_shader().compile(30).expect("fragment shader should always encode");
    std::fs::write("fragment.spv", &bytes)?;
    println!("fragment.spv: {} words", bytes.len() / 4);
    Ok(())
}

mod common;

use common::{setup, FRAGMENT, VERTEX};
use gles2_glow::{
    BindingSlot, GlError, ObjectType, Program, Shader, ShaderKind, ValueType, VertexAttribute,
};

#[test]
fn compile() {
    let (gles, _) = setup();

    let shader = Shader::new(&gles, ShaderKind::Vertex, VERTEX).unwrap();

    assert_eq!(shader.kind(), ShaderKind::Vertex);
    assert_eq!(shader.source(), VERTEX);
    assert_eq!(shader.info_log().unwrap(), "");
}

#[test]
fn compile_failure_reports_the_log() {
    let (gles, driver) = setup();

    let result = Shader::new(
        &gles,
        ShaderKind::Fragment,
        "precision mediump float;\n#error broken on purpose\nvoid main() {}",
    );

    assert_eq!(
        result.err(),
        Some(GlError::CompileFailed {
            kind: ShaderKind::Fragment,
            log: "ERROR: 0:2: '#error' : broken on purpose".to_owned(),
        })
    );

    // the failed shader doesn't leak
    assert_eq!(driver.calls("delete_shader"), 1);
    assert_eq!(gles.live_objects(ObjectType::Shader), 0);
}

#[test]
fn empty_source_fails_to_compile() {
    let (gles, _) = setup();

    match Shader::new(&gles, ShaderKind::Vertex, "  \n") {
        Err(GlError::CompileFailed { kind, log }) => {
            assert_eq!(kind, ShaderKind::Vertex);
            assert!(!log.is_empty());
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn link() {
    let (gles, _) = setup();
    let (vs, fs) = common::shaders(&gles);

    let mut program = Program::new(&gles).unwrap();
    assert!(!program.is_linked());

    program.attach_shader(&vs).unwrap();
    program.attach_shader(&fs).unwrap();
    assert_eq!(program.attached_shader_count(), 2);

    assert_eq!(program.link(), Ok(true));
    assert!(program.is_linked());
    assert_eq!(program.info_log().unwrap(), "");
    assert_eq!(program.validate(), Ok(true));
}

#[test]
fn with_shaders_fails_on_link_failure() {
    let (gles, _) = setup();
    let vs = Shader::new(&gles, ShaderKind::Vertex, VERTEX).unwrap();

    assert_eq!(
        Program::with_shaders(&gles, &[&vs]).err(),
        Some(GlError::LinkFailed(
            "no compiled fragment shader attached\n".to_owned()
        ))
    );
    assert_eq!(gles.live_objects(ObjectType::Program), 0);
}

#[cfg(any(debug_assertions, feature = "diagnostics"))]
#[test]
fn link_failure_is_an_error_with_diagnostics() {
    let (gles, _) = setup();
    let fs = Shader::new(&gles, ShaderKind::Fragment, FRAGMENT).unwrap();

    let mut program = Program::new(&gles).unwrap();
    program.attach_shader(&fs).unwrap();

    assert_eq!(
        program.link(),
        Err(GlError::LinkFailed(
            "no compiled vertex shader attached\n".to_owned()
        ))
    );
    assert!(!program.is_linked());
}

#[cfg(not(any(debug_assertions, feature = "diagnostics")))]
#[test]
fn link_failure_is_reported_as_false() {
    let (gles, _) = setup();
    let fs = Shader::new(&gles, ShaderKind::Fragment, FRAGMENT).unwrap();

    let mut program = Program::new(&gles).unwrap();
    program.attach_shader(&fs).unwrap();

    assert_eq!(program.link(), Ok(false));
    assert!(!program.is_linked());
    assert_eq!(
        program.info_log().unwrap(),
        "no compiled vertex shader attached\n"
    );
}

#[test]
fn failed_relink_stops_using_the_program() {
    let (gles, _) = setup();
    let (vs, fs) = common::shaders(&gles);

    let mut program = Program::with_shaders(&gles, &[&vs, &fs]).unwrap();
    program.use_program().unwrap();
    assert!(program.is_active());

    program.detach_shader(&fs).unwrap();
    assert_eq!(program.attached_shader_count(), 1);

    let linked = program.link();
    assert!(linked != Ok(true));

    assert!(!program.is_linked());
    assert!(!program.is_active());
    assert_eq!(gles.bound(BindingSlot::Program), 0);
}

#[test]
fn use_program_is_cached() {
    let (gles, driver) = setup();
    let program = common::program(&gles);

    let before = driver.calls("use_program");
    program.use_program().unwrap();
    program.use_program().unwrap();

    assert_eq!(driver.calls("use_program"), before + 1);
    assert_eq!(gles.bound(BindingSlot::Program), program.handle());
}

#[cfg(any(debug_assertions, feature = "diagnostics"))]
#[test]
fn using_an_unlinked_program_fails() {
    let (gles, _) = setup();
    let program = Program::new(&gles).unwrap();

    assert_eq!(
        program.use_program(),
        Err(GlError::Driver {
            op: "glUseProgram",
            code: gles2_glow::gl::INVALID_OPERATION,
        })
    );
    assert!(!program.is_active());
}

#[cfg(any(debug_assertions, feature = "diagnostics"))]
#[test]
fn validating_an_unlinked_program_fails() {
    let (gles, _) = setup();
    let program = Program::new(&gles).unwrap();

    assert_eq!(
        program.validate(),
        Err(GlError::ValidateFailed(
            "program is not successfully linked".to_owned()
        ))
    );
}

#[test]
fn active_variables() {
    let (gles, _) = setup();
    let program = common::program(&gles);

    let attributes = program.active_attributes().unwrap();
    let names: Vec<_> = attributes.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["a_position", "a_uv"]);
    assert_eq!(attributes[0].ty, ValueType::FloatVec3);
    assert_eq!(attributes[1].ty, ValueType::FloatVec2);
    assert!(attributes.iter().all(|a| a.size == 1));

    let uniforms = program.active_uniforms().unwrap();
    assert_eq!(uniforms.len(), 14);
    assert_eq!(uniforms[0].name, "u_mvp");
    assert_eq!(uniforms[0].ty, ValueType::FloatMat4);

    let weights = uniforms.iter().find(|u| u.name == "u_weights").unwrap();
    assert_eq!(weights.size, 4);
    assert_eq!(weights.ty, ValueType::Float);

    let sampler = uniforms.iter().find(|u| u.name == "u_sampler").unwrap();
    assert_eq!(sampler.ty, ValueType::Sampler2D);
}

#[test]
fn bound_attribute_locations_apply_at_link() {
    let (gles, _) = setup();
    let (vs, fs) = common::shaders(&gles);

    let mut program = Program::new(&gles).unwrap();
    program.attach_shader(&vs).unwrap();
    program.attach_shader(&fs).unwrap();
    program.bind_attribute_location(5, "a_uv").unwrap();
    assert_eq!(program.link(), Ok(true));

    let uv = VertexAttribute::new(&program, "a_uv").unwrap();
    let position = VertexAttribute::new(&program, "a_position").unwrap();

    assert_eq!(uv.location(), 5);
    assert_eq!(position.location(), 0);
}

#[test]
fn shaders_may_be_disposed_after_linking() {
    let (gles, _) = setup();

    let program = {
        let (vs, fs) = common::shaders(&gles);
        Program::with_shaders(&gles, &[&vs, &fs]).unwrap()
    };

    assert!(program.is_linked());
    assert_eq!(gles.live_objects(ObjectType::Shader), 0);
    assert_eq!(program.active_attributes().unwrap().len(), 2);
}

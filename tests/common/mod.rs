#![allow(dead_code)]

use gles2_glow::driver::mock::MockDriver;
use gles2_glow::{Context, Gles, Program, Shader, ShaderKind};

pub const VERTEX: &str = "
attribute vec3 a_position;
attribute vec2 a_uv;

uniform mat4 u_mvp;
uniform mat2 u_m2;
uniform mat3 u_m3;

varying vec2 v_uv;

void main() {
    v_uv = a_uv;
    gl_Position = u_mvp * vec4(a_position, 1.0);
}
";

pub const FRAGMENT: &str = "
precision mediump float;

uniform float u_f1;
uniform vec2 u_f2;
uniform vec3 u_f3;
uniform vec4 u_f4;
uniform int u_i1;
uniform ivec2 u_i2;
uniform ivec3 u_i3;
uniform ivec4 u_i4;
uniform bool u_flag;
uniform float u_weights[4];
uniform sampler2D u_sampler;

varying vec2 v_uv;

void main() {
    gl_FragColor = texture2D(u_sampler, v_uv) * u_f4;
}
";

/// A context over a fresh mock driver, plus a handle on the driver for inspection.
pub fn setup() -> (Gles, MockDriver) {
    let _ = env_logger::builder().is_test(true).try_init();

    let driver = MockDriver::new();
    let gles = Gles::from_context(Context::from_driver(driver.clone())).unwrap();

    (gles, driver)
}

pub fn shaders(gles: &Gles) -> (Shader, Shader) {
    let vs = Shader::new(gles, ShaderKind::Vertex, VERTEX).unwrap();
    let fs = Shader::new(gles, ShaderKind::Fragment, FRAGMENT).unwrap();
    (vs, fs)
}

/// A linked program built from [`VERTEX`] and [`FRAGMENT`].
pub fn program(gles: &Gles) -> Program {
    let (vs, fs) = shaders(gles);
    Program::with_shaders(gles, &[&vs, &fs]).unwrap()
}

//! The native driver seam.
//!
//! [`Driver`] lists every OpenGL ES 2.0 entry point the wrappers forward to. Handles are raw `u32`
//! object names (zero meaning “none”) and enums are raw `GLenum` values, exactly as the native
//! API sees them (on WebGL, names are assigned by the driver). [`GlowDriver`] forwards to
//! [glow]; [`mock::MockDriver`] is an in-memory stand-in used to exercise the wrappers without a
//! GPU.

mod glow_driver;
pub mod mock;

pub use glow_driver::{GlowDriver, ObjectName};

/// Description of an active attribute or uniform of a linked program.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActiveInfo {
    /// Name as declared in the shader source.
    pub name: String,
    /// Array size; `1` for non-array variables.
    pub size: i32,
    /// Native type (`GL_FLOAT_VEC3`, `GL_SAMPLER_2D`, …).
    pub ty: u32,
}

/// OpenGL ES 2.0 entry points.
///
/// Implementations are expected to forward each call to a context that is current on the calling
/// thread. None of the methods report errors directly: failures set the sticky error flag read by
/// [`Driver::get_error`], just like the native API.
pub trait Driver {
    // errors, state queries and general state

    fn get_error(&mut self) -> u32;
    fn get_parameter_i32(&mut self, pname: u32) -> i32;
    fn get_parameter_i32_slice(&mut self, pname: u32, out: &mut [i32]);
    fn get_parameter_f32_slice(&mut self, pname: u32, out: &mut [f32]);
    fn get_parameter_string(&mut self, pname: u32) -> String;
    fn enable(&mut self, cap: u32);
    fn disable(&mut self, cap: u32);
    fn is_enabled(&mut self, cap: u32) -> bool;
    fn hint(&mut self, target: u32, mode: u32);
    fn pixel_store_i32(&mut self, pname: u32, param: i32);
    fn flush(&mut self);
    fn finish(&mut self);

    // per-fragment operations and rasterization

    fn clear(&mut self, mask: u32);
    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32);
    fn clear_depth(&mut self, depth: f32);
    fn clear_stencil(&mut self, stencil: i32);
    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn depth_range(&mut self, near: f32, far: f32);
    fn color_mask(&mut self, red: bool, green: bool, blue: bool, alpha: bool);
    fn depth_mask(&mut self, flag: bool);
    fn depth_func(&mut self, func: u32);
    fn stencil_func_separate(&mut self, face: u32, func: u32, reference: i32, mask: u32);
    fn stencil_op_separate(&mut self, face: u32, fail: u32, depth_fail: u32, pass: u32);
    fn stencil_mask_separate(&mut self, face: u32, mask: u32);
    fn blend_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32);
    fn blend_equation_separate(&mut self, rgb: u32, alpha: u32);
    fn blend_func_separate(&mut self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32);
    fn cull_face(&mut self, face: u32);
    fn front_face(&mut self, mode: u32);
    fn line_width(&mut self, width: f32);
    fn polygon_offset(&mut self, factor: f32, units: f32);
    fn sample_coverage(&mut self, value: f32, invert: bool);
    fn draw_arrays(&mut self, mode: u32, first: i32, count: i32);
    fn draw_elements(&mut self, mode: u32, count: i32, ty: u32, offset: i32);
    #[allow(clippy::too_many_arguments)]
    fn read_pixels(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: &mut [u8],
    );

    // buffers

    fn create_buffer(&mut self) -> Result<u32, String>;
    fn delete_buffer(&mut self, buffer: u32);
    fn bind_buffer(&mut self, target: u32, buffer: u32);
    fn buffer_data_size(&mut self, target: u32, size: i32, usage: u32);
    fn buffer_data(&mut self, target: u32, data: &[u8], usage: u32);
    fn buffer_sub_data(&mut self, target: u32, offset: i32, data: &[u8]);

    // textures

    fn create_texture(&mut self) -> Result<u32, String>;
    fn delete_texture(&mut self, texture: u32);
    fn bind_texture(&mut self, target: u32, texture: u32);
    fn active_texture(&mut self, unit: u32);
    fn tex_parameter_i32(&mut self, target: u32, pname: u32, value: i32);
    fn get_tex_parameter_i32(&mut self, target: u32, pname: u32) -> i32;
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &mut self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: Option<&[u8]>,
    );
    #[allow(clippy::too_many_arguments)]
    fn tex_sub_image_2d(
        &mut self,
        target: u32,
        level: i32,
        x_offset: i32,
        y_offset: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: &[u8],
    );
    #[allow(clippy::too_many_arguments)]
    fn copy_tex_image_2d(
        &mut self,
        target: u32,
        level: i32,
        internal_format: u32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    );
    #[allow(clippy::too_many_arguments)]
    fn copy_tex_sub_image_2d(
        &mut self,
        target: u32,
        level: i32,
        x_offset: i32,
        y_offset: i32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    );
    fn generate_mipmap(&mut self, target: u32);

    // framebuffers and renderbuffers

    fn create_framebuffer(&mut self) -> Result<u32, String>;
    fn delete_framebuffer(&mut self, framebuffer: u32);
    fn bind_framebuffer(&mut self, framebuffer: u32);
    fn framebuffer_texture_2d(&mut self, attachment: u32, target: u32, texture: u32, level: i32);
    fn framebuffer_renderbuffer(&mut self, attachment: u32, renderbuffer: u32);
    fn check_framebuffer_status(&mut self) -> u32;
    fn create_renderbuffer(&mut self) -> Result<u32, String>;
    fn delete_renderbuffer(&mut self, renderbuffer: u32);
    fn bind_renderbuffer(&mut self, renderbuffer: u32);
    fn renderbuffer_storage(&mut self, internal_format: u32, width: i32, height: i32);

    // shaders and programs

    fn create_shader(&mut self, kind: u32) -> Result<u32, String>;
    fn delete_shader(&mut self, shader: u32);
    fn shader_source(&mut self, shader: u32, source: &str);
    fn compile_shader(&mut self, shader: u32);
    fn get_shader_compile_status(&mut self, shader: u32) -> bool;
    fn get_shader_info_log(&mut self, shader: u32) -> String;
    fn create_program(&mut self) -> Result<u32, String>;
    fn delete_program(&mut self, program: u32);
    fn attach_shader(&mut self, program: u32, shader: u32);
    fn detach_shader(&mut self, program: u32, shader: u32);
    fn link_program(&mut self, program: u32);
    fn get_program_link_status(&mut self, program: u32) -> bool;
    fn validate_program(&mut self, program: u32);
    fn get_program_validate_status(&mut self, program: u32) -> bool;
    fn get_program_info_log(&mut self, program: u32) -> String;
    fn use_program(&mut self, program: u32);
    fn get_active_attributes(&mut self, program: u32) -> u32;
    fn get_active_attribute(&mut self, program: u32, index: u32) -> Option<ActiveInfo>;
    fn get_active_uniforms(&mut self, program: u32) -> u32;
    fn get_active_uniform(&mut self, program: u32, index: u32) -> Option<ActiveInfo>;

    // vertex attributes

    /// Location of an active attribute, or `-1`.
    fn get_attrib_location(&mut self, program: u32, name: &str) -> i32;
    fn bind_attrib_location(&mut self, program: u32, index: u32, name: &str);
    fn enable_vertex_attrib_array(&mut self, index: u32);
    fn disable_vertex_attrib_array(&mut self, index: u32);
    #[allow(clippy::too_many_arguments)]
    fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        size: i32,
        ty: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
    /// Set the current value of a disabled attribute array from 1 to 4 floats.
    fn vertex_attrib_f32(&mut self, index: u32, values: &[f32]);
    fn get_vertex_attrib_f32(&mut self, index: u32, pname: u32, out: &mut [f32]);

    // uniforms

    /// Location of an active uniform, or `-1`.
    fn get_uniform_location(&mut self, program: u32, name: &str) -> i32;
    /// `glUniform{components}fv` on the current program.
    fn uniform_f32(&mut self, location: i32, components: usize, values: &[f32]);
    /// `glUniform{components}iv` on the current program.
    fn uniform_i32(&mut self, location: i32, components: usize, values: &[i32]);
    /// `glUniformMatrix{dim}fv` on the current program; matrices are column-major.
    fn uniform_matrix_f32(&mut self, location: i32, dim: usize, values: &[f32]);
    fn get_uniform_f32(&mut self, program: u32, location: i32, out: &mut [f32]);
    fn get_uniform_i32(&mut self, program: u32, location: i32, out: &mut [i32]);
}

//! [`Driver`] implementation forwarding to [glow].

use std::collections::HashMap;
use std::fmt;

use glow::{HasContext, PixelPackData, PixelUnpackData};

use crate::driver::{ActiveInfo, Driver};
use crate::gl;

/// The `u32` object name of a glow handle.
///
/// Native handles wrap the GL object name itself, so wrappers see the names the native API sees,
/// and objects created outside of this crate can be handed to `from_raw`. WebGL handles are
/// opaque; they get names from a counter and are only meaningful within this crate.
pub trait ObjectName: Copy {
    /// GL name behind the handle, if it has one.
    fn gl_name(self) -> Option<u32>;

    /// Handle for a GL name that wasn’t created through the driver.
    fn from_gl_name(name: u32) -> Option<Self>;
}

macro_rules! impl_object_name {
    (native $($t:ident),*) => {
        $(
            impl ObjectName for glow::$t {
                fn gl_name(self) -> Option<u32> {
                    Some(self.0.get())
                }

                fn from_gl_name(name: u32) -> Option<Self> {
                    std::num::NonZeroU32::new(name).map(glow::$t)
                }
            }
        )*
    };

    (opaque $($t:ident),*) => {
        $(
            impl ObjectName for glow::$t {
                fn gl_name(self) -> Option<u32> {
                    None
                }

                fn from_gl_name(_: u32) -> Option<Self> {
                    None
                }
            }
        )*
    };
}

#[cfg(not(wasm))]
impl_object_name!(
    native NativeBuffer,
    NativeTexture,
    NativeFramebuffer,
    NativeRenderbuffer,
    NativeShader,
    NativeProgram
);

#[cfg(wasm)]
impl_object_name!(
    opaque WebBufferKey,
    WebTextureKey,
    WebFramebufferKey,
    WebRenderbufferKey,
    WebShaderKey,
    WebProgramKey
);

/// Table mapping the `u32` object names handed out to the wrappers to glow’s typed handles.
///
/// Counter names start at 1 and are never recycled, so zero stays the “no object” sentinel and a
/// stale name can never alias a newer object.
#[derive(Debug)]
struct Names<H> {
    next: u32,
    live: HashMap<u32, H>,
}

impl<H> Names<H>
where
    H: ObjectName,
{
    fn new() -> Self {
        Names {
            next: 1,
            live: HashMap::new(),
        }
    }

    fn insert(&mut self, handle: H) -> u32 {
        let name = match handle.gl_name() {
            Some(name) => name,

            None => {
                let name = self.next;
                self.next += 1;
                name
            }
        };

        self.live.insert(name, handle);
        name
    }

    fn get(&self, name: u32) -> Option<H> {
        self.live
            .get(&name)
            .copied()
            .or_else(|| H::from_gl_name(name))
    }

    fn remove(&mut self, name: u32) -> Option<H> {
        self.live.remove(&name).or_else(|| H::from_gl_name(name))
    }
}

/// Per-program uniform locations.
///
/// glow hands out opaque uniform locations (not integers on WebGL), so the integer location seen
/// by the wrappers is an index into this list. Looking the same name up twice yields the same
/// index.
type LocationMap<L> = HashMap<u32, Vec<(String, L)>>;

fn lookup_location<L>(map: &LocationMap<L>, program: u32, location: i32) -> Option<&L> {
    if location < 0 {
        return None;
    }

    map.get(&program)
        .and_then(|locations| locations.get(location as usize))
        .map(|(_, loc)| loc)
}

// components of the largest uniform type (mat4)
const MAX_UNIFORM_COMPONENTS: usize = 16;

fn copy_prefix<T: Copy>(out: &mut [T], value: &[T]) {
    let n = out.len().min(value.len());
    out[..n].copy_from_slice(&value[..n]);
}

/// A [`Driver`] backed by a [glow] context.
pub struct GlowDriver<C>
where
    C: HasContext,
{
    ctx: C,
    buffers: Names<C::Buffer>,
    textures: Names<C::Texture>,
    framebuffers: Names<C::Framebuffer>,
    renderbuffers: Names<C::Renderbuffer>,
    shaders: Names<C::Shader>,
    programs: Names<C::Program>,
    locations: LocationMap<C::UniformLocation>,
    current_program: u32,
    // error raised on our side (unknown object name) before the driver’s own sticky error
    pending_error: u32,
}

impl<C> fmt::Debug for GlowDriver<C>
where
    C: HasContext,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("GlowDriver")
            .field("buffers", &self.buffers.live.len())
            .field("textures", &self.textures.live.len())
            .field("framebuffers", &self.framebuffers.live.len())
            .field("renderbuffers", &self.renderbuffers.live.len())
            .field("shaders", &self.shaders.live.len())
            .field("programs", &self.programs.live.len())
            .field("current_program", &self.current_program)
            .finish()
    }
}

impl<C> GlowDriver<C>
where
    C: HasContext,
    C::Buffer: ObjectName,
    C::Texture: ObjectName,
    C::Framebuffer: ObjectName,
    C::Renderbuffer: ObjectName,
    C::Shader: ObjectName,
    C::Program: ObjectName,
{
    /// Wrap a glow context.
    pub fn new(ctx: C) -> Self {
        GlowDriver {
            ctx,
            buffers: Names::new(),
            textures: Names::new(),
            framebuffers: Names::new(),
            renderbuffers: Names::new(),
            shaders: Names::new(),
            programs: Names::new(),
            locations: HashMap::new(),
            current_program: 0,
            pending_error: gl::NO_ERROR,
        }
    }

    /// The underlying glow context.
    pub fn context(&self) -> &C {
        &self.ctx
    }

    /// Resolve a name that may be zero; an unknown non-zero name flags `GL_INVALID_OPERATION`.
    fn resolve<H>(names: &Names<H>, name: u32, pending_error: &mut u32) -> Option<H>
    where
        H: ObjectName,
    {
        if name == 0 {
            return None;
        }

        let handle = names.get(name);

        if handle.is_none() && *pending_error == gl::NO_ERROR {
            *pending_error = gl::INVALID_OPERATION;
        }

        handle
    }

    fn program(&mut self, name: u32) -> Option<C::Program> {
        Self::resolve(&self.programs, name, &mut self.pending_error)
    }

    fn shader(&mut self, name: u32) -> Option<C::Shader> {
        Self::resolve(&self.shaders, name, &mut self.pending_error)
    }
}

impl<C> Driver for GlowDriver<C>
where
    C: HasContext,
    C::Buffer: ObjectName,
    C::Texture: ObjectName,
    C::Framebuffer: ObjectName,
    C::Renderbuffer: ObjectName,
    C::Shader: ObjectName,
    C::Program: ObjectName,
{
    fn get_error(&mut self) -> u32 {
        let pending = std::mem::replace(&mut self.pending_error, gl::NO_ERROR);

        if pending != gl::NO_ERROR {
            pending
        } else {
            unsafe { self.ctx.get_error() }
        }
    }

    fn get_parameter_i32(&mut self, pname: u32) -> i32 {
        unsafe { self.ctx.get_parameter_i32(pname) }
    }

    fn get_parameter_i32_slice(&mut self, pname: u32, out: &mut [i32]) {
        unsafe { self.ctx.get_parameter_i32_slice(pname, out) }
    }

    fn get_parameter_f32_slice(&mut self, pname: u32, out: &mut [f32]) {
        unsafe { self.ctx.get_parameter_f32_slice(pname, out) }
    }

    fn get_parameter_string(&mut self, pname: u32) -> String {
        unsafe { self.ctx.get_parameter_string(pname) }
    }

    fn enable(&mut self, cap: u32) {
        unsafe { self.ctx.enable(cap) }
    }

    fn disable(&mut self, cap: u32) {
        unsafe { self.ctx.disable(cap) }
    }

    fn is_enabled(&mut self, cap: u32) -> bool {
        unsafe { self.ctx.is_enabled(cap) }
    }

    fn hint(&mut self, target: u32, mode: u32) {
        unsafe { self.ctx.hint(target, mode) }
    }

    fn pixel_store_i32(&mut self, pname: u32, param: i32) {
        unsafe { self.ctx.pixel_store_i32(pname, param) }
    }

    fn flush(&mut self) {
        unsafe { self.ctx.flush() }
    }

    fn finish(&mut self) {
        unsafe { self.ctx.finish() }
    }

    fn clear(&mut self, mask: u32) {
        unsafe { self.ctx.clear(mask) }
    }

    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { self.ctx.clear_color(red, green, blue, alpha) }
    }

    fn clear_depth(&mut self, depth: f32) {
        unsafe { self.ctx.clear_depth_f32(depth) }
    }

    fn clear_stencil(&mut self, stencil: i32) {
        unsafe { self.ctx.clear_stencil(stencil) }
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.ctx.viewport(x, y, width, height) }
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.ctx.scissor(x, y, width, height) }
    }

    fn depth_range(&mut self, near: f32, far: f32) {
        unsafe { self.ctx.depth_range_f32(near, far) }
    }

    fn color_mask(&mut self, red: bool, green: bool, blue: bool, alpha: bool) {
        unsafe { self.ctx.color_mask(red, green, blue, alpha) }
    }

    fn depth_mask(&mut self, flag: bool) {
        unsafe { self.ctx.depth_mask(flag) }
    }

    fn depth_func(&mut self, func: u32) {
        unsafe { self.ctx.depth_func(func) }
    }

    fn stencil_func_separate(&mut self, face: u32, func: u32, reference: i32, mask: u32) {
        unsafe { self.ctx.stencil_func_separate(face, func, reference, mask) }
    }

    fn stencil_op_separate(&mut self, face: u32, fail: u32, depth_fail: u32, pass: u32) {
        unsafe { self.ctx.stencil_op_separate(face, fail, depth_fail, pass) }
    }

    fn stencil_mask_separate(&mut self, face: u32, mask: u32) {
        unsafe { self.ctx.stencil_mask_separate(face, mask) }
    }

    fn blend_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { self.ctx.blend_color(red, green, blue, alpha) }
    }

    fn blend_equation_separate(&mut self, rgb: u32, alpha: u32) {
        unsafe { self.ctx.blend_equation_separate(rgb, alpha) }
    }

    fn blend_func_separate(&mut self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32) {
        unsafe {
            self.ctx
                .blend_func_separate(src_rgb, dst_rgb, src_alpha, dst_alpha)
        }
    }

    fn cull_face(&mut self, face: u32) {
        unsafe { self.ctx.cull_face(face) }
    }

    fn front_face(&mut self, mode: u32) {
        unsafe { self.ctx.front_face(mode) }
    }

    fn line_width(&mut self, width: f32) {
        unsafe { self.ctx.line_width(width) }
    }

    fn polygon_offset(&mut self, factor: f32, units: f32) {
        unsafe { self.ctx.polygon_offset(factor, units) }
    }

    fn sample_coverage(&mut self, value: f32, invert: bool) {
        unsafe { self.ctx.sample_coverage(value, invert) }
    }

    fn draw_arrays(&mut self, mode: u32, first: i32, count: i32) {
        unsafe { self.ctx.draw_arrays(mode, first, count) }
    }

    fn draw_elements(&mut self, mode: u32, count: i32, ty: u32, offset: i32) {
        unsafe { self.ctx.draw_elements(mode, count, ty, offset) }
    }

    fn read_pixels(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: &mut [u8],
    ) {
        unsafe {
            self.ctx.read_pixels(
                x,
                y,
                width,
                height,
                format,
                ty,
                PixelPackData::Slice(Some(pixels)),
            )
        }
    }

    fn create_buffer(&mut self) -> Result<u32, String> {
        let handle = unsafe { self.ctx.create_buffer()? };
        Ok(self.buffers.insert(handle))
    }

    fn delete_buffer(&mut self, buffer: u32) {
        if let Some(handle) = self.buffers.remove(buffer) {
            unsafe { self.ctx.delete_buffer(handle) }
        }
    }

    fn bind_buffer(&mut self, target: u32, buffer: u32) {
        let handle = Self::resolve(&self.buffers, buffer, &mut self.pending_error);
        unsafe { self.ctx.bind_buffer(target, handle) }
    }

    fn buffer_data_size(&mut self, target: u32, size: i32, usage: u32) {
        unsafe { self.ctx.buffer_data_size(target, size, usage) }
    }

    fn buffer_data(&mut self, target: u32, data: &[u8], usage: u32) {
        unsafe { self.ctx.buffer_data_u8_slice(target, data, usage) }
    }

    fn buffer_sub_data(&mut self, target: u32, offset: i32, data: &[u8]) {
        unsafe { self.ctx.buffer_sub_data_u8_slice(target, offset, data) }
    }

    fn create_texture(&mut self) -> Result<u32, String> {
        let handle = unsafe { self.ctx.create_texture()? };
        Ok(self.textures.insert(handle))
    }

    fn delete_texture(&mut self, texture: u32) {
        if let Some(handle) = self.textures.remove(texture) {
            unsafe { self.ctx.delete_texture(handle) }
        }
    }

    fn bind_texture(&mut self, target: u32, texture: u32) {
        let handle = Self::resolve(&self.textures, texture, &mut self.pending_error);
        unsafe { self.ctx.bind_texture(target, handle) }
    }

    fn active_texture(&mut self, unit: u32) {
        unsafe { self.ctx.active_texture(unit) }
    }

    fn tex_parameter_i32(&mut self, target: u32, pname: u32, value: i32) {
        unsafe { self.ctx.tex_parameter_i32(target, pname, value) }
    }

    fn get_tex_parameter_i32(&mut self, target: u32, pname: u32) -> i32 {
        unsafe { self.ctx.get_tex_parameter_i32(target, pname) }
    }

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
    ) {
        unsafe {
            self.ctx.tex_image_2d(
                target,
                level,
                internal_format,
                width,
                height,
                0,
                format,
                ty,
                PixelUnpackData::Slice(pixels),
            )
        }
    }

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
    ) {
        unsafe {
            self.ctx.tex_sub_image_2d(
                target,
                level,
                x_offset,
                y_offset,
                width,
                height,
                format,
                ty,
                PixelUnpackData::Slice(Some(pixels)),
            )
        }
    }

    fn copy_tex_image_2d(
        &mut self,
        target: u32,
        level: i32,
        internal_format: u32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) {
        unsafe {
            self.ctx
                .copy_tex_image_2d(target, level, internal_format, x, y, width, height, 0)
        }
    }

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
    ) {
        unsafe {
            self.ctx.copy_tex_sub_image_2d(
                target, level, x_offset, y_offset, x, y, width, height,
            )
        }
    }

    fn generate_mipmap(&mut self, target: u32) {
        unsafe { self.ctx.generate_mipmap(target) }
    }

    fn create_framebuffer(&mut self) -> Result<u32, String> {
        let handle = unsafe { self.ctx.create_framebuffer()? };
        Ok(self.framebuffers.insert(handle))
    }

    fn delete_framebuffer(&mut self, framebuffer: u32) {
        if let Some(handle) = self.framebuffers.remove(framebuffer) {
            unsafe { self.ctx.delete_framebuffer(handle) }
        }
    }

    fn bind_framebuffer(&mut self, framebuffer: u32) {
        let handle = Self::resolve(&self.framebuffers, framebuffer, &mut self.pending_error);
        unsafe { self.ctx.bind_framebuffer(glow::FRAMEBUFFER, handle) }
    }

    fn framebuffer_texture_2d(&mut self, attachment: u32, target: u32, texture: u32, level: i32) {
        let handle = Self::resolve(&self.textures, texture, &mut self.pending_error);

        unsafe {
            self.ctx
                .framebuffer_texture_2d(glow::FRAMEBUFFER, attachment, target, handle, level)
        }
    }

    fn framebuffer_renderbuffer(&mut self, attachment: u32, renderbuffer: u32) {
        let handle = Self::resolve(&self.renderbuffers, renderbuffer, &mut self.pending_error);

        unsafe {
            self.ctx.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                attachment,
                glow::RENDERBUFFER,
                handle,
            )
        }
    }

    fn check_framebuffer_status(&mut self) -> u32 {
        unsafe { self.ctx.check_framebuffer_status(glow::FRAMEBUFFER) }
    }

    fn create_renderbuffer(&mut self) -> Result<u32, String> {
        let handle = unsafe { self.ctx.create_renderbuffer()? };
        Ok(self.renderbuffers.insert(handle))
    }

    fn delete_renderbuffer(&mut self, renderbuffer: u32) {
        if let Some(handle) = self.renderbuffers.remove(renderbuffer) {
            unsafe { self.ctx.delete_renderbuffer(handle) }
        }
    }

    fn bind_renderbuffer(&mut self, renderbuffer: u32) {
        let handle = Self::resolve(&self.renderbuffers, renderbuffer, &mut self.pending_error);
        unsafe { self.ctx.bind_renderbuffer(glow::RENDERBUFFER, handle) }
    }

    fn renderbuffer_storage(&mut self, internal_format: u32, width: i32, height: i32) {
        unsafe {
            self.ctx
                .renderbuffer_storage(glow::RENDERBUFFER, internal_format, width, height)
        }
    }

    fn create_shader(&mut self, kind: u32) -> Result<u32, String> {
        let handle = unsafe { self.ctx.create_shader(kind)? };
        Ok(self.shaders.insert(handle))
    }

    fn delete_shader(&mut self, shader: u32) {
        if let Some(handle) = self.shaders.remove(shader) {
            unsafe { self.ctx.delete_shader(handle) }
        }
    }

    fn shader_source(&mut self, shader: u32, source: &str) {
        if let Some(handle) = self.shader(shader) {
            unsafe { self.ctx.shader_source(handle, source) }
        }
    }

    fn compile_shader(&mut self, shader: u32) {
        if let Some(handle) = self.shader(shader) {
            unsafe { self.ctx.compile_shader(handle) }
        }
    }

    fn get_shader_compile_status(&mut self, shader: u32) -> bool {
        match self.shader(shader) {
            Some(handle) => unsafe { self.ctx.get_shader_compile_status(handle) },
            None => false,
        }
    }

    fn get_shader_info_log(&mut self, shader: u32) -> String {
        match self.shader(shader) {
            Some(handle) => unsafe { self.ctx.get_shader_info_log(handle) },
            None => String::new(),
        }
    }

    fn create_program(&mut self) -> Result<u32, String> {
        let handle = unsafe { self.ctx.create_program()? };
        Ok(self.programs.insert(handle))
    }

    fn delete_program(&mut self, program: u32) {
        if let Some(handle) = self.programs.remove(program) {
            self.locations.remove(&program);

            if self.current_program == program {
                self.current_program = 0;
            }

            unsafe { self.ctx.delete_program(handle) }
        }
    }

    fn attach_shader(&mut self, program: u32, shader: u32) {
        if let (Some(p), Some(s)) = (self.program(program), self.shader(shader)) {
            unsafe { self.ctx.attach_shader(p, s) }
        }
    }

    fn detach_shader(&mut self, program: u32, shader: u32) {
        if let (Some(p), Some(s)) = (self.program(program), self.shader(shader)) {
            unsafe { self.ctx.detach_shader(p, s) }
        }
    }

    fn link_program(&mut self, program: u32) {
        if let Some(handle) = self.program(program) {
            // locations are invalidated by a link
            self.locations.remove(&program);
            unsafe { self.ctx.link_program(handle) }
        }
    }

    fn get_program_link_status(&mut self, program: u32) -> bool {
        match self.program(program) {
            Some(handle) => unsafe { self.ctx.get_program_link_status(handle) },
            None => false,
        }
    }

    fn validate_program(&mut self, program: u32) {
        if let Some(handle) = self.program(program) {
            unsafe { self.ctx.validate_program(handle) }
        }
    }

    fn get_program_validate_status(&mut self, program: u32) -> bool {
        match self.program(program) {
            Some(handle) => unsafe { self.ctx.get_program_validate_status(handle) },
            None => false,
        }
    }

    fn get_program_info_log(&mut self, program: u32) -> String {
        match self.program(program) {
            Some(handle) => unsafe { self.ctx.get_program_info_log(handle) },
            None => String::new(),
        }
    }

    fn use_program(&mut self, program: u32) {
        let handle = self.program(program);
        self.current_program = if handle.is_some() { program } else { 0 };
        unsafe { self.ctx.use_program(handle) }
    }

    fn get_active_attributes(&mut self, program: u32) -> u32 {
        match self.program(program) {
            Some(handle) => unsafe { self.ctx.get_active_attributes(handle) },
            None => 0,
        }
    }

    fn get_active_attribute(&mut self, program: u32, index: u32) -> Option<ActiveInfo> {
        let handle = self.program(program)?;
        let attribute = unsafe { self.ctx.get_active_attribute(handle, index)? };

        Some(ActiveInfo {
            name: attribute.name,
            size: attribute.size,
            ty: attribute.atype,
        })
    }

    fn get_active_uniforms(&mut self, program: u32) -> u32 {
        match self.program(program) {
            Some(handle) => unsafe { self.ctx.get_active_uniforms(handle) },
            None => 0,
        }
    }

    fn get_active_uniform(&mut self, program: u32, index: u32) -> Option<ActiveInfo> {
        let handle = self.program(program)?;
        let uniform = unsafe { self.ctx.get_active_uniform(handle, index)? };

        Some(ActiveInfo {
            name: uniform.name,
            size: uniform.size,
            ty: uniform.utype,
        })
    }

    fn get_attrib_location(&mut self, program: u32, name: &str) -> i32 {
        self.program(program)
            .and_then(|handle| unsafe { self.ctx.get_attrib_location(handle, name) })
            .map_or(-1, |location| location as i32)
    }

    fn bind_attrib_location(&mut self, program: u32, index: u32, name: &str) {
        if let Some(handle) = self.program(program) {
            unsafe { self.ctx.bind_attrib_location(handle, index, name) }
        }
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        unsafe { self.ctx.enable_vertex_attrib_array(index) }
    }

    fn disable_vertex_attrib_array(&mut self, index: u32) {
        unsafe { self.ctx.disable_vertex_attrib_array(index) }
    }

    fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        size: i32,
        ty: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            self.ctx
                .vertex_attrib_pointer_f32(index, size, ty, normalized, stride, offset)
        }
    }

    fn vertex_attrib_f32(&mut self, index: u32, values: &[f32]) {
        unsafe {
            match *values {
                [x] => self.ctx.vertex_attrib_1_f32(index, x),
                [x, y] => self.ctx.vertex_attrib_2_f32(index, x, y),
                [x, y, z] => self.ctx.vertex_attrib_3_f32(index, x, y, z),
                [x, y, z, w] => self.ctx.vertex_attrib_4_f32(index, x, y, z, w),
                _ => self.pending_error = gl::INVALID_VALUE,
            }
        }
    }

    fn get_vertex_attrib_f32(&mut self, index: u32, pname: u32, out: &mut [f32]) {
        // the native call writes up to four values whatever the length of the slice
        let mut value = [0.; 4];

        unsafe {
            self.ctx
                .get_vertex_attrib_parameter_f32_slice(index, pname, &mut value)
        }

        copy_prefix(out, &value);
    }

    fn get_uniform_location(&mut self, program: u32, name: &str) -> i32 {
        let handle = match self.program(program) {
            Some(handle) => handle,
            None => return -1,
        };

        let locations = self.locations.entry(program).or_insert_with(Vec::new);

        if let Some(index) = locations.iter().position(|(n, _)| n == name) {
            return index as i32;
        }

        match unsafe { self.ctx.get_uniform_location(handle, name) } {
            Some(location) => {
                locations.push((name.to_owned(), location));
                locations.len() as i32 - 1
            }

            None => -1,
        }
    }

    fn uniform_f32(&mut self, location: i32, components: usize, values: &[f32]) {
        let location = lookup_location(&self.locations, self.current_program, location);

        unsafe {
            match components {
                1 => self.ctx.uniform_1_f32_slice(location, values),
                2 => self.ctx.uniform_2_f32_slice(location, values),
                3 => self.ctx.uniform_3_f32_slice(location, values),
                4 => self.ctx.uniform_4_f32_slice(location, values),
                _ => self.pending_error = gl::INVALID_VALUE,
            }
        }
    }

    fn uniform_i32(&mut self, location: i32, components: usize, values: &[i32]) {
        let location = lookup_location(&self.locations, self.current_program, location);

        unsafe {
            match components {
                1 => self.ctx.uniform_1_i32_slice(location, values),
                2 => self.ctx.uniform_2_i32_slice(location, values),
                3 => self.ctx.uniform_3_i32_slice(location, values),
                4 => self.ctx.uniform_4_i32_slice(location, values),
                _ => self.pending_error = gl::INVALID_VALUE,
            }
        }
    }

    fn uniform_matrix_f32(&mut self, location: i32, dim: usize, values: &[f32]) {
        let location = lookup_location(&self.locations, self.current_program, location);

        unsafe {
            match dim {
                2 => self.ctx.uniform_matrix_2_f32_slice(location, false, values),
                3 => self.ctx.uniform_matrix_3_f32_slice(location, false, values),
                4 => self.ctx.uniform_matrix_4_f32_slice(location, false, values),
                _ => self.pending_error = gl::INVALID_VALUE,
            }
        }
    }

    fn get_uniform_f32(&mut self, program: u32, location: i32, out: &mut [f32]) {
        let handle = self.program(program);

        if let (Some(handle), Some(location)) =
            (handle, lookup_location(&self.locations, program, location))
        {
            let mut value = [0.; MAX_UNIFORM_COMPONENTS];
            unsafe { self.ctx.get_uniform_f32(handle, location, &mut value) }
            copy_prefix(out, &value);
        }
    }

    fn get_uniform_i32(&mut self, program: u32, location: i32, out: &mut [i32]) {
        let handle = self.program(program);

        if let (Some(handle), Some(location)) =
            (handle, lookup_location(&self.locations, program, location))
        {
            let mut value = [0; MAX_UNIFORM_COMPONENTS];
            unsafe { self.ctx.get_uniform_i32(handle, location, &mut value) }
            copy_prefix(out, &value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Opaque(u64);

    impl ObjectName for Opaque {
        fn gl_name(self) -> Option<u32> {
            None
        }

        fn from_gl_name(_: u32) -> Option<Self> {
            None
        }
    }

    #[test]
    fn opaque_names_start_at_one_and_are_not_recycled() {
        let mut names = Names::<Opaque>::new();

        let a = names.insert(Opaque(10));
        let b = names.insert(Opaque(20));
        assert_eq!((a, b), (1, 2));

        assert_eq!(names.remove(a), Some(Opaque(10)));
        assert_eq!(names.get(a), None);

        let c = names.insert(Opaque(30));
        assert_eq!(c, 3);
        assert_eq!(names.get(b), Some(Opaque(20)));
    }

    #[cfg(not(wasm))]
    #[test]
    fn native_handles_keep_their_gl_name() {
        use std::num::NonZeroU32;

        let native = |name| glow::NativeProgram(NonZeroU32::new(name).unwrap());
        let mut names = Names::<glow::NativeProgram>::new();

        assert_eq!(names.insert(native(42)), 42);
        assert_eq!(names.get(42), Some(native(42)));

        // created elsewhere
        assert_eq!(names.get(7), Some(native(7)));
        assert_eq!(names.remove(7), Some(native(7)));

        assert_eq!(names.get(0), None);
    }

    #[test]
    fn queries_never_write_past_the_output() {
        let mut out = [0.; 2];
        copy_prefix(&mut out, &[1., 2., 3., 4.]);
        assert_eq!(out, [1., 2.]);

        let mut out = [0; 4];
        copy_prefix(&mut out, &[5, 6]);
        assert_eq!(out, [5, 6, 0, 0]);
    }

    #[test]
    fn locations_are_looked_up_per_program() {
        let mut map: LocationMap<&str> = HashMap::new();
        map.insert(1, vec![("u_color".to_owned(), "loc0"), ("u_mvp".to_owned(), "loc1")]);

        assert_eq!(lookup_location(&map, 1, 1), Some(&"loc1"));
        assert_eq!(lookup_location(&map, 1, 2), None);
        assert_eq!(lookup_location(&map, 1, -1), None);
        assert_eq!(lookup_location(&map, 2, 0), None);
    }
}

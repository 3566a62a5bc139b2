//! Context-wide state and draw calls.
//!
//! Everything in here isn’t tied to a single object: fragment operations, rasterization state,
//! draw calls, pixel read-back and implementation queries.

use crate::driver::Driver;
use crate::enums::{
    BlendEquation, BlendFactor, Capability, ClearBuffers, CompareFunc, ErrorCode, Face,
    FrontFace, HintMode, HintTarget, IndexType, PixelDataType, PixelFormat, PixelStore,
    PrimitiveType, StencilOp,
};
use crate::error::GlError;
use crate::gl;
use crate::state::{check_pixels, pixel_layout};
use crate::Gles;

impl Gles {
    // Issue driver calls and check the error flag afterwards.
    fn call<R, F>(&self, op: &'static str, f: F) -> Result<R, GlError>
    where
        F: FnOnce(&mut dyn Driver) -> R,
    {
        let mut state = self.state.borrow_mut();
        let r = f(&mut *state.driver);
        state.check(op)?;
        Ok(r)
    }

    /// Clear buffers of the bound framebuffer to their clear values.
    pub fn clear(&self, buffers: ClearBuffers) -> Result<(), GlError> {
        self.call("glClear", |d| d.clear(buffers.bits()))
    }

    pub fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) -> Result<(), GlError> {
        self.call("glClearColor", |d| d.clear_color(red, green, blue, alpha))
    }

    pub fn clear_depth(&self, depth: f32) -> Result<(), GlError> {
        self.call("glClearDepthf", |d| d.clear_depth(depth))
    }

    pub fn clear_stencil(&self, stencil: i32) -> Result<(), GlError> {
        self.call("glClearStencil", |d| d.clear_stencil(stencil))
    }

    pub fn viewport(&self, x: i32, y: i32, width: u32, height: u32) -> Result<(), GlError> {
        self.call("glViewport", |d| {
            d.viewport(x, y, width as i32, height as i32)
        })
    }

    /// Current viewport as `[x, y, width, height]`.
    pub fn viewport_box(&self) -> Result<[i32; 4], GlError> {
        self.call("glGetIntegerv", |d| {
            let mut viewport = [0; 4];
            d.get_parameter_i32_slice(gl::VIEWPORT, &mut viewport);
            viewport
        })
    }

    pub fn scissor(&self, x: i32, y: i32, width: u32, height: u32) -> Result<(), GlError> {
        self.call("glScissor", |d| d.scissor(x, y, width as i32, height as i32))
    }

    pub fn enable(&self, capability: Capability) -> Result<(), GlError> {
        self.call("glEnable", |d| d.enable(capability.to_gl()))
    }

    pub fn disable(&self, capability: Capability) -> Result<(), GlError> {
        self.call("glDisable", |d| d.disable(capability.to_gl()))
    }

    pub fn is_enabled(&self, capability: Capability) -> Result<bool, GlError> {
        self.call("glIsEnabled", |d| d.is_enabled(capability.to_gl()))
    }

    pub fn blend_func(&self, src: BlendFactor, dst: BlendFactor) -> Result<(), GlError> {
        self.blend_func_separate(src, dst, src, dst)
    }

    pub fn blend_func_separate(
        &self,
        src_rgb: BlendFactor,
        dst_rgb: BlendFactor,
        src_alpha: BlendFactor,
        dst_alpha: BlendFactor,
    ) -> Result<(), GlError> {
        self.call("glBlendFuncSeparate", |d| {
            d.blend_func_separate(
                src_rgb.to_gl(),
                dst_rgb.to_gl(),
                src_alpha.to_gl(),
                dst_alpha.to_gl(),
            )
        })
    }

    pub fn blend_equation(&self, equation: BlendEquation) -> Result<(), GlError> {
        self.blend_equation_separate(equation, equation)
    }

    pub fn blend_equation_separate(
        &self,
        rgb: BlendEquation,
        alpha: BlendEquation,
    ) -> Result<(), GlError> {
        self.call("glBlendEquationSeparate", |d| {
            d.blend_equation_separate(rgb.to_gl(), alpha.to_gl())
        })
    }

    /// Constant color used by the `Constant*` blend factors.
    pub fn blend_color(&self, red: f32, green: f32, blue: f32, alpha: f32) -> Result<(), GlError> {
        self.call("glBlendColor", |d| d.blend_color(red, green, blue, alpha))
    }

    pub fn depth_func(&self, func: CompareFunc) -> Result<(), GlError> {
        self.call("glDepthFunc", |d| d.depth_func(func.to_gl()))
    }

    /// Enable or disable writing into the depth buffer.
    pub fn depth_mask(&self, write: bool) -> Result<(), GlError> {
        self.call("glDepthMask", |d| d.depth_mask(write))
    }

    pub fn depth_range(&self, near: f32, far: f32) -> Result<(), GlError> {
        self.call("glDepthRangef", |d| d.depth_range(near, far))
    }

    pub fn color_mask(&self, red: bool, green: bool, blue: bool, alpha: bool) -> Result<(), GlError> {
        self.call("glColorMask", |d| d.color_mask(red, green, blue, alpha))
    }

    pub fn stencil_func(&self, func: CompareFunc, reference: i32, mask: u32) -> Result<(), GlError> {
        self.stencil_func_separate(Face::FrontAndBack, func, reference, mask)
    }

    pub fn stencil_func_separate(
        &self,
        face: Face,
        func: CompareFunc,
        reference: i32,
        mask: u32,
    ) -> Result<(), GlError> {
        self.call("glStencilFuncSeparate", |d| {
            d.stencil_func_separate(face.to_gl(), func.to_gl(), reference, mask)
        })
    }

    pub fn stencil_op(
        &self,
        fail: StencilOp,
        depth_fail: StencilOp,
        pass: StencilOp,
    ) -> Result<(), GlError> {
        self.stencil_op_separate(Face::FrontAndBack, fail, depth_fail, pass)
    }

    pub fn stencil_op_separate(
        &self,
        face: Face,
        fail: StencilOp,
        depth_fail: StencilOp,
        pass: StencilOp,
    ) -> Result<(), GlError> {
        self.call("glStencilOpSeparate", |d| {
            d.stencil_op_separate(face.to_gl(), fail.to_gl(), depth_fail.to_gl(), pass.to_gl())
        })
    }

    pub fn stencil_mask(&self, mask: u32) -> Result<(), GlError> {
        self.stencil_mask_separate(Face::FrontAndBack, mask)
    }

    pub fn stencil_mask_separate(&self, face: Face, mask: u32) -> Result<(), GlError> {
        self.call("glStencilMaskSeparate", |d| {
            d.stencil_mask_separate(face.to_gl(), mask)
        })
    }

    /// Faces discarded when [`Capability::CullFace`] is enabled.
    pub fn cull_face(&self, face: Face) -> Result<(), GlError> {
        self.call("glCullFace", |d| d.cull_face(face.to_gl()))
    }

    pub fn front_face(&self, front_face: FrontFace) -> Result<(), GlError> {
        self.call("glFrontFace", |d| d.front_face(front_face.to_gl()))
    }

    pub fn line_width(&self, width: f32) -> Result<(), GlError> {
        self.call("glLineWidth", |d| d.line_width(width))
    }

    pub fn polygon_offset(&self, factor: f32, units: f32) -> Result<(), GlError> {
        self.call("glPolygonOffset", |d| d.polygon_offset(factor, units))
    }

    pub fn sample_coverage(&self, value: f32, invert: bool) -> Result<(), GlError> {
        self.call("glSampleCoverage", |d| d.sample_coverage(value, invert))
    }

    pub fn hint(&self, target: HintTarget, mode: HintMode) -> Result<(), GlError> {
        self.call("glHint", |d| d.hint(target.to_gl(), mode.to_gl()))
    }

    /// Set the row alignment of pixel reads or texture uploads (1, 2, 4 or 8).
    ///
    /// Reads and uploads made through this crate set the alignment their data needs themselves.
    pub fn pixel_store(&self, parameter: PixelStore, alignment: u32) -> Result<(), GlError> {
        self.state
            .borrow_mut()
            .set_alignment(parameter, alignment as i32, "glPixelStorei")
    }

    /// Render primitives from the enabled vertex attribute arrays.
    pub fn draw_arrays(&self, mode: PrimitiveType, first: u32, count: u32) -> Result<(), GlError> {
        self.call("glDrawArrays", |d| {
            d.draw_arrays(mode.to_gl(), first as i32, count as i32)
        })
    }

    /// Render primitives with indices read from the bound index buffer, `offset` bytes in.
    pub fn draw_elements(
        &self,
        mode: PrimitiveType,
        count: u32,
        ty: IndexType,
        offset: usize,
    ) -> Result<(), GlError> {
        self.call("glDrawElements", |d| {
            d.draw_elements(mode.to_gl(), count as i32, ty.to_gl(), offset as i32)
        })
    }

    /// Read a block of pixels from the bound framebuffer.
    ///
    /// `pixels` must have room for `width * height` tightly packed pixels.
    #[allow(clippy::too_many_arguments)]
    pub fn read_pixels(
        &self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        format: PixelFormat,
        ty: PixelDataType,
        pixels: &mut [u8],
    ) -> Result<(), GlError> {
        let op = "glReadPixels";
        let (alignment, expected) = pixel_layout(width, height, format, ty);
        check_pixels(op, expected, pixels.len())?;

        self.state
            .borrow_mut()
            .set_alignment(PixelStore::PackAlignment, alignment, op)?;

        self.call(op, |d| {
            d.read_pixels(
                x,
                y,
                width as i32,
                height as i32,
                format.to_gl(),
                ty.to_gl(),
                pixels,
            )
        })
    }

    pub fn flush(&self) -> Result<(), GlError> {
        self.call("glFlush", |d| d.flush())
    }

    /// Block until every issued command has completed.
    pub fn finish(&self) -> Result<(), GlError> {
        self.call("glFinish", |d| d.finish())
    }

    fn string(&self, name: u32) -> Result<String, GlError> {
        self.call("glGetString", |d| d.get_parameter_string(name))
    }

    pub fn vendor(&self) -> Result<String, GlError> {
        self.string(gl::VENDOR)
    }

    pub fn renderer(&self) -> Result<String, GlError> {
        self.string(gl::RENDERER)
    }

    pub fn version(&self) -> Result<String, GlError> {
        self.string(gl::VERSION)
    }

    pub fn shading_language_version(&self) -> Result<String, GlError> {
        self.string(gl::SHADING_LANGUAGE_VERSION)
    }

    /// Names of the supported extensions.
    pub fn extensions(&self) -> Result<Vec<String>, GlError> {
        let extensions = self.string(gl::EXTENSIONS)?;
        Ok(extensions.split_whitespace().map(str::to_owned).collect())
    }

    /// Select the texture unit that texture binds and image updates apply to.
    pub fn set_active_texture_unit(&self, unit: u32) -> Result<(), GlError> {
        self.state
            .borrow_mut()
            .set_texture_unit(unit, "glActiveTexture")
    }

    pub fn active_texture_unit(&self) -> u32 {
        self.state.borrow().current_texture_unit()
    }

    pub fn max_texture_size(&self) -> Result<u32, GlError> {
        self.call("glGetIntegerv", |d| {
            d.get_parameter_i32(gl::MAX_TEXTURE_SIZE).max(0) as u32
        })
    }

    pub fn max_vertex_attributes(&self) -> u32 {
        self.state.borrow().vertex_attributes()
    }

    /// Number of texture units usable from both shader stages combined.
    pub fn max_texture_units(&self) -> u32 {
        self.state.borrow().texture_units()
    }

    /// Read and reset the driver error flag.
    ///
    /// This is the only way to see driver errors when diagnostics are off.
    pub fn error(&self) -> Option<ErrorCode> {
        let code = self.state.borrow_mut().driver.get_error();
        ErrorCode::from_gl(code)
    }
}

//! Textures.

use bytemuck::Pod;
use std::hash::{Hash, Hasher};

use crate::enums::{
    ImageTarget, MagFilter, MinFilter, PixelDataType, PixelFormat, PixelStore, TextureKind,
    WrapMode,
};
use crate::error::GlError;
use crate::gl;
use crate::object::{Object, TextureObject};
use crate::state::{check_pixels, pixel_layout, BindingSlot};
use crate::Gles;

/// A 2D or cube map texture.
///
/// Parameters and images are specified on the texture bound to the active texture unit, so every
/// operation but binding requires the texture to be bound there first.
#[derive(Debug)]
pub struct Texture {
    object: Object<TextureObject>,
    kind: TextureKind,
}

impl Texture {
    /// Create a new texture of the given kind.
    ///
    /// The kind is fixed for the texture’s whole life.
    pub fn new(gles: &Gles, kind: TextureKind) -> Result<Self, GlError> {
        let object = Object::create(&gles.state, |driver| driver.create_texture())?;
        Ok(Texture { object, kind })
    }

    /// Take ownership of a texture created outside of this crate.
    pub fn from_raw(gles: &Gles, kind: TextureKind, handle: u32) -> Self {
        Texture {
            object: Object::from_raw(&gles.state, handle),
            kind,
        }
    }

    /// Give up ownership of the native texture; it won’t be deleted.
    pub fn into_raw(self) -> u32 {
        self.object.into_raw()
    }

    /// Native handle; zero once disposed.
    pub fn handle(&self) -> u32 {
        self.object.handle()
    }

    pub fn kind(&self) -> TextureKind {
        self.kind
    }

    fn slot(&self) -> BindingSlot {
        BindingSlot::for_texture(self.kind)
    }

    /// Bind the texture to the active texture unit.
    pub fn bind(&self) -> Result<(), GlError> {
        let mut state = self.object.state().borrow_mut();
        state.check_live(self.handle(), "glBindTexture")?;
        state.bind(self.slot(), self.handle(), "glBindTexture")
    }

    /// Make `unit` the active texture unit and bind the texture to it.
    pub fn bind_to_unit(&self, unit: u32) -> Result<(), GlError> {
        let mut state = self.object.state().borrow_mut();
        state.check_live(self.handle(), "glBindTexture")?;
        state.set_texture_unit(unit, "glActiveTexture")?;
        state.bind(self.slot(), self.handle(), "glBindTexture")
    }

    /// Unbind the texture from the active texture unit if it is bound there.
    pub fn unbind(&self) -> Result<(), GlError> {
        self.object
            .state()
            .borrow_mut()
            .unbind(self.slot(), self.handle(), "glBindTexture")
    }

    /// Whether the texture is bound to the active texture unit.
    pub fn is_bound(&self) -> bool {
        let handle = self.handle();
        handle != 0 && self.object.state().borrow().bound(self.slot()) == handle
    }

    /// Whether the texture is bound to any texture unit.
    pub fn is_bound_to_any_unit(&self) -> bool {
        self.object
            .state()
            .borrow()
            .is_texture_bound(self.kind, self.handle())
    }

    fn parameter(&self, pname: u32, op: &'static str) -> Result<u32, GlError> {
        let mut state = self.object.state().borrow_mut();
        state.check_bound(self.slot(), self.handle(), op)?;
        let value = state.driver.get_tex_parameter_i32(self.kind.to_gl(), pname);
        state.check(op)?;

        Ok(value as u32)
    }

    fn set_parameter(&self, pname: u32, value: u32, op: &'static str) -> Result<(), GlError> {
        let mut state = self.object.state().borrow_mut();
        state.check_bound(self.slot(), self.handle(), op)?;
        state
            .driver
            .tex_parameter_i32(self.kind.to_gl(), pname, value as i32);
        state.check(op)
    }

    pub fn min_filter(&self) -> Result<MinFilter, GlError> {
        let op = "glGetTexParameteriv";
        let value = self.parameter(gl::TEXTURE_MIN_FILTER, op)?;
        MinFilter::from_gl(value).ok_or(GlError::UnknownValue { op, value })
    }

    pub fn set_min_filter(&self, filter: MinFilter) -> Result<(), GlError> {
        self.set_parameter(gl::TEXTURE_MIN_FILTER, filter.to_gl(), "glTexParameteri")
    }

    pub fn mag_filter(&self) -> Result<MagFilter, GlError> {
        let op = "glGetTexParameteriv";
        let value = self.parameter(gl::TEXTURE_MAG_FILTER, op)?;
        MagFilter::from_gl(value).ok_or(GlError::UnknownValue { op, value })
    }

    pub fn set_mag_filter(&self, filter: MagFilter) -> Result<(), GlError> {
        self.set_parameter(gl::TEXTURE_MAG_FILTER, filter.to_gl(), "glTexParameteri")
    }

    pub fn wrap_s(&self) -> Result<WrapMode, GlError> {
        let op = "glGetTexParameteriv";
        let value = self.parameter(gl::TEXTURE_WRAP_S, op)?;
        WrapMode::from_gl(value).ok_or(GlError::UnknownValue { op, value })
    }

    pub fn set_wrap_s(&self, wrap: WrapMode) -> Result<(), GlError> {
        self.set_parameter(gl::TEXTURE_WRAP_S, wrap.to_gl(), "glTexParameteri")
    }

    pub fn wrap_t(&self) -> Result<WrapMode, GlError> {
        let op = "glGetTexParameteriv";
        let value = self.parameter(gl::TEXTURE_WRAP_T, op)?;
        WrapMode::from_gl(value).ok_or(GlError::UnknownValue { op, value })
    }

    pub fn set_wrap_t(&self, wrap: WrapMode) -> Result<(), GlError> {
        self.set_parameter(gl::TEXTURE_WRAP_T, wrap.to_gl(), "glTexParameteri")
    }

    // the image target must belong to this texture; checking the slot of the target’s kind
    // catches a cube face uploaded through a 2D texture and vice versa
    fn check_image_target(&self, target: ImageTarget, op: &'static str) -> Result<(), GlError> {
        let state = self.object.state().borrow();
        state.check_bound(BindingSlot::for_texture(target.kind()), self.handle(), op)
    }

    /// Specify a level of detail of an image, optionally with its texels.
    ///
    /// `pixels` must hold at least `width * height` tightly packed pixels of the given format and
    /// encoding; shorter data is rejected with [`GlError::NotEnoughPixels`].
    #[allow(clippy::too_many_arguments)]
    pub fn upload<T: Pod>(
        &self,
        target: ImageTarget,
        level: u32,
        width: u32,
        height: u32,
        format: PixelFormat,
        ty: PixelDataType,
        pixels: Option<&[T]>,
    ) -> Result<(), GlError> {
        let op = "glTexImage2D";
        self.check_image_target(target, op)?;

        let (alignment, expected) = pixel_layout(width, height, format, ty);
        let pixels: Option<&[u8]> = pixels.map(bytemuck::cast_slice);

        if let Some(pixels) = pixels {
            check_pixels(op, expected, pixels.len())?;
        }

        let mut state = self.object.state().borrow_mut();
        state.set_alignment(PixelStore::UnpackAlignment, alignment, op)?;
        state.driver.tex_image_2d(
            target.to_gl(),
            level as i32,
            format.to_gl() as i32,
            width as i32,
            height as i32,
            format.to_gl(),
            ty.to_gl(),
            pixels,
        );
        state.check(op)
    }

    /// Overwrite a region of an already specified image.
    #[allow(clippy::too_many_arguments)]
    pub fn sub_upload<T: Pod>(
        &self,
        target: ImageTarget,
        level: u32,
        x_offset: u32,
        y_offset: u32,
        width: u32,
        height: u32,
        format: PixelFormat,
        ty: PixelDataType,
        pixels: &[T],
    ) -> Result<(), GlError> {
        let op = "glTexSubImage2D";
        self.check_image_target(target, op)?;

        let (alignment, expected) = pixel_layout(width, height, format, ty);
        let pixels: &[u8] = bytemuck::cast_slice(pixels);
        check_pixels(op, expected, pixels.len())?;

        let mut state = self.object.state().borrow_mut();
        state.set_alignment(PixelStore::UnpackAlignment, alignment, op)?;
        state.driver.tex_sub_image_2d(
            target.to_gl(),
            level as i32,
            x_offset as i32,
            y_offset as i32,
            width as i32,
            height as i32,
            format.to_gl(),
            ty.to_gl(),
            pixels,
        );
        state.check(op)
    }

    /// Specify a level of detail of an image from a region of the bound framebuffer.
    #[allow(clippy::too_many_arguments)]
    pub fn copy(
        &self,
        target: ImageTarget,
        level: u32,
        format: PixelFormat,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> Result<(), GlError> {
        let op = "glCopyTexImage2D";
        self.check_image_target(target, op)?;

        let mut state = self.object.state().borrow_mut();
        state.driver.copy_tex_image_2d(
            target.to_gl(),
            level as i32,
            format.to_gl(),
            x,
            y,
            width as i32,
            height as i32,
        );
        state.check(op)
    }

    /// Overwrite a region of an already specified image from the bound framebuffer.
    #[allow(clippy::too_many_arguments)]
    pub fn sub_copy(
        &self,
        target: ImageTarget,
        level: u32,
        x_offset: u32,
        y_offset: u32,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> Result<(), GlError> {
        let op = "glCopyTexSubImage2D";
        self.check_image_target(target, op)?;

        let mut state = self.object.state().borrow_mut();
        state.driver.copy_tex_sub_image_2d(
            target.to_gl(),
            level as i32,
            x_offset as i32,
            y_offset as i32,
            x,
            y,
            width as i32,
            height as i32,
        );
        state.check(op)
    }

    /// Generate the whole mipmap chain from the base level.
    pub fn generate_mipmap(&self) -> Result<(), GlError> {
        let op = "glGenerateMipmap";
        let mut state = self.object.state().borrow_mut();
        state.check_bound(self.slot(), self.handle(), op)?;
        state.driver.generate_mipmap(self.kind.to_gl());
        state.check(op)
    }

    /// Delete the native texture. Calling it again does nothing.
    pub fn dispose(&mut self) {
        self.object.dispose();
    }
}

impl PartialEq for Texture {
    fn eq(&self, rhs: &Self) -> bool {
        self.object == rhs.object
    }
}

impl Eq for Texture {}

impl Hash for Texture {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.object.hash(state);
    }
}

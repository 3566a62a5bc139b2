//! Graphics state.

use log::warn;
use std::{fmt, marker::PhantomData};

use crate::driver::Driver;
use crate::enums::{BufferKind, ErrorCode, PixelDataType, PixelFormat, PixelStore, TextureKind};
use crate::error::{GlError, StateQueryError};
use crate::gl;
use crate::object::ObjectType;

/// A binding point of the context: the implicit “current object” of a given kind.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BindingSlot {
    /// `GL_ARRAY_BUFFER`.
    ArrayBuffer,
    /// `GL_ELEMENT_ARRAY_BUFFER`.
    ElementArrayBuffer,
    /// `GL_TEXTURE_2D` of the active texture unit.
    Texture2D,
    /// `GL_TEXTURE_CUBE_MAP` of the active texture unit.
    TextureCubeMap,
    /// `GL_FRAMEBUFFER`.
    Framebuffer,
    /// `GL_RENDERBUFFER`.
    Renderbuffer,
    /// The program in use.
    Program,
}

impl BindingSlot {
    /// All binding slots.
    pub const ALL: [BindingSlot; 7] = [
        BindingSlot::ArrayBuffer,
        BindingSlot::ElementArrayBuffer,
        BindingSlot::Texture2D,
        BindingSlot::TextureCubeMap,
        BindingSlot::Framebuffer,
        BindingSlot::Renderbuffer,
        BindingSlot::Program,
    ];

    /// Slot a buffer of the given kind binds to.
    pub fn for_buffer(kind: BufferKind) -> Self {
        match kind {
            BufferKind::Vertex => BindingSlot::ArrayBuffer,
            BufferKind::Index => BindingSlot::ElementArrayBuffer,
        }
    }

    /// Slot a texture of the given kind binds to.
    pub fn for_texture(kind: TextureKind) -> Self {
        match kind {
            TextureKind::Texture2D => BindingSlot::Texture2D,
            TextureKind::CubeMap => BindingSlot::TextureCubeMap,
        }
    }
}

impl fmt::Display for BindingSlot {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match *self {
            BindingSlot::ArrayBuffer => f.write_str("array buffer"),
            BindingSlot::ElementArrayBuffer => f.write_str("element array buffer"),
            BindingSlot::Texture2D => f.write_str("2D texture"),
            BindingSlot::TextureCubeMap => f.write_str("cube map texture"),
            BindingSlot::Framebuffer => f.write_str("framebuffer"),
            BindingSlot::Renderbuffer => f.write_str("renderbuffer"),
            BindingSlot::Program => f.write_str("program"),
        }
    }
}

/// The graphics state.
///
/// This type owns the driver and mirrors what is bound to each binding point, so that binding
/// preconditions can be checked without asking the driver, and so that binding an object that is
/// already bound doesn’t issue another call.
pub(crate) struct GlesState {
    _phantom: PhantomData<*const ()>, // !Send and !Sync

    pub(crate) driver: Box<dyn Driver>,

    // binding points
    bound_array_buffer: u32,
    bound_element_array_buffer: u32,
    current_texture_unit: u32,
    // per texture unit: [2D, cube map]
    bound_textures: Vec<[u32; 2]>,
    bound_framebuffer: u32,
    bound_renderbuffer: u32,
    current_program: u32,

    // row alignments; zero until set through us
    pack_alignment: i32,
    unpack_alignment: i32,

    vertex_attributes: u32,

    // live objects per ObjectType
    live: [usize; 6],
}

impl GlesState {
    /// Create a new `GlesState` around a driver whose context is current.
    pub(crate) fn new(driver: Box<dyn Driver>) -> Result<Self, StateQueryError> {
        Self::get_from_driver(driver)
    }

    fn get_from_driver(mut driver: Box<dyn Driver>) -> Result<Self, StateQueryError> {
        let texture_units = get_ctx_texture_units(&mut *driver)?;
        let current_texture_unit = get_ctx_active_texture_unit(&mut *driver, texture_units)?;
        let vertex_attributes = get_ctx_vertex_attributes(&mut *driver)?;
        discard_ctx_pending_error(&mut *driver);

        let mut state = GlesState {
            _phantom: PhantomData,
            driver,
            bound_array_buffer: 0,
            bound_element_array_buffer: 0,
            current_texture_unit,
            bound_textures: vec![[0; 2]; texture_units as usize],
            bound_framebuffer: 0,
            bound_renderbuffer: 0,
            current_program: 0,
            pack_alignment: 0,
            unpack_alignment: 0,
            vertex_attributes,
            live: [0; 6],
        };

        state.reset_bindings();
        Ok(state)
    }

    // Objects bound before the context was wrapped are not known to us; start from a clean slate.
    fn reset_bindings(&mut self) {
        self.driver.bind_buffer(gl::ARRAY_BUFFER, 0);
        self.driver.bind_buffer(gl::ELEMENT_ARRAY_BUFFER, 0);
        self.driver.bind_texture(gl::TEXTURE_2D, 0);
        self.driver.bind_texture(gl::TEXTURE_CUBE_MAP, 0);
        self.driver.bind_framebuffer(0);
        self.driver.bind_renderbuffer(0);
        self.driver.use_program(0);
    }

    pub(crate) fn texture_units(&self) -> u32 {
        self.bound_textures.len() as u32
    }

    pub(crate) fn current_texture_unit(&self) -> u32 {
        self.current_texture_unit
    }

    pub(crate) fn vertex_attributes(&self) -> u32 {
        self.vertex_attributes
    }

    /// Handle currently occupying a binding slot.
    pub(crate) fn bound(&self, slot: BindingSlot) -> u32 {
        let unit = self.current_texture_unit as usize;

        match slot {
            BindingSlot::ArrayBuffer => self.bound_array_buffer,
            BindingSlot::ElementArrayBuffer => self.bound_element_array_buffer,
            BindingSlot::Texture2D => self.bound_textures.get(unit).map_or(0, |t| t[0]),
            BindingSlot::TextureCubeMap => self.bound_textures.get(unit).map_or(0, |t| t[1]),
            BindingSlot::Framebuffer => self.bound_framebuffer,
            BindingSlot::Renderbuffer => self.bound_renderbuffer,
            BindingSlot::Program => self.current_program,
        }
    }

    fn set_bound(&mut self, slot: BindingSlot, handle: u32) {
        let unit = self.current_texture_unit as usize;

        match slot {
            BindingSlot::ArrayBuffer => self.bound_array_buffer = handle,
            BindingSlot::ElementArrayBuffer => self.bound_element_array_buffer = handle,

            BindingSlot::Texture2D => {
                if let Some(t) = self.bound_textures.get_mut(unit) {
                    t[0] = handle;
                }
            }

            BindingSlot::TextureCubeMap => {
                if let Some(t) = self.bound_textures.get_mut(unit) {
                    t[1] = handle;
                }
            }

            BindingSlot::Framebuffer => self.bound_framebuffer = handle,
            BindingSlot::Renderbuffer => self.bound_renderbuffer = handle,
            BindingSlot::Program => self.current_program = handle,
        }
    }

    /// Bind an object (or zero) to a slot, skipping the call if it is already bound there.
    pub(crate) fn bind(
        &mut self,
        slot: BindingSlot,
        handle: u32,
        op: &'static str,
    ) -> Result<(), GlError> {
        if self.bound(slot) == handle {
            return Ok(()); // cached
        }

        match slot {
            BindingSlot::ArrayBuffer => self.driver.bind_buffer(gl::ARRAY_BUFFER, handle),
            BindingSlot::ElementArrayBuffer => {
                self.driver.bind_buffer(gl::ELEMENT_ARRAY_BUFFER, handle)
            }
            BindingSlot::Texture2D => self.driver.bind_texture(gl::TEXTURE_2D, handle),
            BindingSlot::TextureCubeMap => self.driver.bind_texture(gl::TEXTURE_CUBE_MAP, handle),
            BindingSlot::Framebuffer => self.driver.bind_framebuffer(handle),
            BindingSlot::Renderbuffer => self.driver.bind_renderbuffer(handle),
            BindingSlot::Program => self.driver.use_program(handle),
        }

        self.check(op)?;
        self.set_bound(slot, handle);

        Ok(())
    }

    /// Unbind a slot if (and only if) the given object occupies it.
    pub(crate) fn unbind(
        &mut self,
        slot: BindingSlot,
        handle: u32,
        op: &'static str,
    ) -> Result<(), GlError> {
        if handle != 0 && self.bound(slot) == handle {
            self.bind(slot, 0, op)
        } else {
            Ok(())
        }
    }

    pub(crate) fn set_texture_unit(&mut self, unit: u32, op: &'static str) -> Result<(), GlError> {
        if self.current_texture_unit == unit {
            return Ok(()); // cached
        }

        self.driver.active_texture(gl::TEXTURE0.saturating_add(unit));
        self.check(op)?;

        // an out of range unit is rejected by the driver and leaves the active one untouched
        if unit < self.texture_units() {
            self.current_texture_unit = unit;
        }

        Ok(())
    }

    /// Set the row alignment of pixel reads or uploads, skipping the call if it’s already set.
    pub(crate) fn set_alignment(
        &mut self,
        store: PixelStore,
        alignment: i32,
        op: &'static str,
    ) -> Result<(), GlError> {
        let current = match store {
            PixelStore::PackAlignment => self.pack_alignment,
            PixelStore::UnpackAlignment => self.unpack_alignment,
        };

        if current == alignment {
            return Ok(()); // cached
        }

        self.driver.pixel_store_i32(store.to_gl(), alignment);
        self.check(op)?;

        // the driver rejects anything else and keeps the previous value
        if matches!(alignment, 1 | 2 | 4 | 8) {
            match store {
                PixelStore::PackAlignment => self.pack_alignment = alignment,
                PixelStore::UnpackAlignment => self.unpack_alignment = alignment,
            }
        }

        Ok(())
    }

    /// Whether a texture is bound to its slot on any texture unit.
    pub(crate) fn is_texture_bound(&self, kind: TextureKind, handle: u32) -> bool {
        let i = match kind {
            TextureKind::Texture2D => 0,
            TextureKind::CubeMap => 1,
        };

        handle != 0 && self.bound_textures.iter().any(|t| t[i] == handle)
    }

    /// Clear the tracked slots a deleted object occupied.
    pub(crate) fn forget(&mut self, ty: ObjectType, handle: u32) {
        match ty {
            ObjectType::Texture => {
                for unit in &mut self.bound_textures {
                    for h in unit.iter_mut().filter(|h| **h == handle) {
                        *h = 0;
                    }
                }
            }

            // a deleted program stays in use until replaced, so replace it now
            ObjectType::Program if self.current_program == handle => {
                self.driver.use_program(0);
                self.current_program = 0;
            }

            _ => {
                for &slot in ty.binding_slots() {
                    if self.bound(slot) == handle {
                        self.set_bound(slot, 0);
                    }
                }
            }
        }
    }

    /// Check the driver error flag after a call.
    ///
    /// Without diagnostics, this does nothing.
    #[cfg_attr(not(diagnostics), allow(unused_variables))]
    pub(crate) fn check(&mut self, op: &'static str) -> Result<(), GlError> {
        #[cfg(diagnostics)]
        {
            let code = self.driver.get_error();

            if code != gl::NO_ERROR {
                return Err(GlError::Driver { op, code });
            }
        }

        Ok(())
    }

    /// Check that an object occupies the binding slot an operation requires.
    ///
    /// Without diagnostics, this does nothing and the driver call is issued anyway.
    #[cfg_attr(not(diagnostics), allow(unused_variables))]
    pub(crate) fn check_bound(
        &self,
        slot: BindingSlot,
        handle: u32,
        op: &'static str,
    ) -> Result<(), GlError> {
        #[cfg(diagnostics)]
        {
            self.check_live(handle, op)?;

            let current = self.bound(slot);

            if current != handle {
                return Err(GlError::NotBound {
                    op,
                    slot,
                    expected: handle,
                    current,
                });
            }
        }

        Ok(())
    }

    /// Check that an object wasn’t disposed.
    ///
    /// Without diagnostics, this does nothing.
    #[cfg_attr(not(diagnostics), allow(unused_variables))]
    pub(crate) fn check_live(&self, handle: u32, op: &'static str) -> Result<(), GlError> {
        #[cfg(diagnostics)]
        {
            if handle == 0 {
                return Err(GlError::Disposed { op });
            }
        }

        Ok(())
    }

    pub(crate) fn acquired(&mut self, ty: ObjectType) {
        self.live[ty.index()] += 1;
    }

    pub(crate) fn released(&mut self, ty: ObjectType) {
        let live = &mut self.live[ty.index()];
        *live = live.saturating_sub(1);
    }

    pub(crate) fn live(&self, ty: ObjectType) -> usize {
        self.live[ty.index()]
    }
}

impl fmt::Debug for GlesState {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        f.debug_struct("GlesState")
            .field("bound_array_buffer", &self.bound_array_buffer)
            .field("bound_element_array_buffer", &self.bound_element_array_buffer)
            .field("current_texture_unit", &self.current_texture_unit)
            .field("bound_textures", &self.bound_textures)
            .field("bound_framebuffer", &self.bound_framebuffer)
            .field("bound_renderbuffer", &self.bound_renderbuffer)
            .field("current_program", &self.current_program)
            .field("live", &self.live)
            .finish()
    }
}

/// Row alignment and byte size of a `width` × `height` image.
///
/// The alignment is the largest one the row size is a multiple of, so that rows are tightly
/// packed.
pub(crate) fn pixel_layout(
    width: u32,
    height: u32,
    format: PixelFormat,
    ty: PixelDataType,
) -> (i32, usize) {
    let row = (width as usize).saturating_mul(ty.bytes_per_pixel(format));

    let alignment = match row % 8 {
        0 => 8,
        2 => 2,
        4 => 4,
        _ => 1,
    };

    (alignment, image_bytes(row, height as usize, alignment))
}

/// Number of bytes spanned by `height` rows of `row` bytes, each but the last padded to
/// `alignment`.
pub(crate) fn image_bytes(row: usize, height: usize, alignment: i32) -> usize {
    if row == 0 || height == 0 {
        return 0;
    }

    let alignment = alignment.max(1) as usize;
    let stride = (row + alignment - 1) / alignment * alignment;

    stride.saturating_mul(height - 1).saturating_add(row)
}

/// Reject pixel data that’s too short before it reaches the driver.
///
/// This check is made with or without diagnostics.
pub(crate) fn check_pixels(
    op: &'static str,
    expected: usize,
    provided: usize,
) -> Result<(), GlError> {
    if provided < expected {
        Err(GlError::NotEnoughPixels {
            op,
            expected,
            provided,
        })
    } else {
        Ok(())
    }
}

fn get_ctx_texture_units(driver: &mut dyn Driver) -> Result<u32, StateQueryError> {
    let units = driver.get_parameter_i32(gl::MAX_COMBINED_TEXTURE_IMAGE_UNITS);

    if units > 0 {
        Ok(units as u32)
    } else {
        Err(StateQueryError::UnknownTextureUnitCount(units))
    }
}

fn get_ctx_active_texture_unit(
    driver: &mut dyn Driver,
    texture_units: u32,
) -> Result<u32, StateQueryError> {
    let active = driver.get_parameter_i32(gl::ACTIVE_TEXTURE) as u32;
    let unit = active.wrapping_sub(gl::TEXTURE0);

    if unit < texture_units {
        Ok(unit)
    } else {
        Err(StateQueryError::UnknownActiveTextureUnit(active))
    }
}

fn get_ctx_vertex_attributes(driver: &mut dyn Driver) -> Result<u32, StateQueryError> {
    let attributes = driver.get_parameter_i32(gl::MAX_VERTEX_ATTRIBS);

    if attributes > 0 {
        Ok(attributes as u32)
    } else {
        Err(StateQueryError::UnknownVertexAttributeCount(attributes))
    }
}

fn discard_ctx_pending_error(driver: &mut dyn Driver) {
    let code = driver.get_error();

    if code != gl::NO_ERROR {
        match ErrorCode::from_gl(code) {
            Some(error) => warn!("discarding pending error from the wrapped context: {}", error),
            None => warn!("discarding pending error from the wrapped context: {:#x}", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_tightly_packed() {
        let rgba = (PixelFormat::Rgba, PixelDataType::UnsignedByte);
        let rgb = (PixelFormat::Rgb, PixelDataType::UnsignedByte);
        let packed = (PixelFormat::Rgb, PixelDataType::UnsignedShort565);

        assert_eq!(pixel_layout(64, 64, rgba.0, rgba.1), (8, 64 * 64 * 4));
        assert_eq!(pixel_layout(3, 2, rgba.0, rgba.1), (4, 3 * 2 * 4));
        assert_eq!(pixel_layout(3, 3, rgb.0, rgb.1), (1, 3 * 3 * 3));
        assert_eq!(pixel_layout(5, 2, packed.0, packed.1), (2, 5 * 2 * 2));
        assert_eq!(pixel_layout(0, 16, rgba.0, rgba.1).1, 0);
    }

    #[test]
    fn padding_is_skipped_after_the_last_row() {
        assert_eq!(image_bytes(9, 3, 4), 12 + 12 + 9);
        assert_eq!(image_bytes(9, 1, 8), 9);
        assert_eq!(image_bytes(16, 2, 8), 32);
        assert_eq!(image_bytes(9, 0, 4), 0);
    }

    #[test]
    fn short_pixel_data_is_rejected() {
        assert_eq!(check_pixels("glReadPixels", 16, 16), Ok(()));
        assert_eq!(
            check_pixels("glReadPixels", 16, 4),
            Err(GlError::NotEnoughPixels {
                op: "glReadPixels",
                expected: 16,
                provided: 4,
            })
        );
    }
}

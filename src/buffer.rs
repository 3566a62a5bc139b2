//! Vertex and index buffers.

use bytemuck::Pod;
use std::hash::{Hash, Hasher};

use crate::enums::{BufferKind, BufferUsage};
use crate::error::GlError;
use crate::object::{BufferObject, Object};
use crate::state::BindingSlot;
use crate::Gles;

/// A buffer object holding vertex attributes or indices.
///
/// The kind is fixed at creation and decides which slot the buffer binds to. Size and usage of
/// the data store are tracked on the CPU side as they are specified.
#[derive(Debug)]
pub struct DataBuffer {
    object: Object<BufferObject>,
    kind: BufferKind,
    size: usize,
    usage: BufferUsage,
}

impl DataBuffer {
    /// Create a new, empty buffer.
    pub fn new(gles: &Gles, kind: BufferKind) -> Result<Self, GlError> {
        let object = Object::create(&gles.state, |driver| driver.create_buffer())?;

        Ok(DataBuffer {
            object,
            kind,
            size: 0,
            usage: BufferUsage::Static,
        })
    }

    /// Take ownership of a buffer created outside of this crate.
    ///
    /// The size and usage of an adopted buffer are unknown until its data store is respecified.
    pub fn from_raw(gles: &Gles, kind: BufferKind, handle: u32) -> Self {
        DataBuffer {
            object: Object::from_raw(&gles.state, handle),
            kind,
            size: 0,
            usage: BufferUsage::Static,
        }
    }

    /// Give up ownership of the native buffer; it won’t be deleted.
    pub fn into_raw(self) -> u32 {
        self.object.into_raw()
    }

    /// Native handle; zero once disposed.
    pub fn handle(&self) -> u32 {
        self.object.handle()
    }

    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    /// Size of the data store in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    fn slot(&self) -> BindingSlot {
        BindingSlot::for_buffer(self.kind)
    }

    pub fn bind(&self) -> Result<(), GlError> {
        let mut state = self.object.state().borrow_mut();
        state.check_live(self.handle(), "glBindBuffer")?;
        state.bind(self.slot(), self.handle(), "glBindBuffer")
    }

    /// Unbind the buffer if it is bound.
    pub fn unbind(&self) -> Result<(), GlError> {
        self.object
            .state()
            .borrow_mut()
            .unbind(self.slot(), self.handle(), "glBindBuffer")
    }

    pub fn is_bound(&self) -> bool {
        let handle = self.handle();
        handle != 0 && self.object.state().borrow().bound(self.slot()) == handle
    }

    /// Replace the data store with a copy of `data`.
    pub fn data<T: Pod>(&mut self, data: &[T], usage: BufferUsage) -> Result<(), GlError> {
        let bytes: &[u8] = bytemuck::cast_slice(data);

        {
            let mut state = self.object.state().borrow_mut();
            state.check_bound(self.slot(), self.handle(), "glBufferData")?;
            state
                .driver
                .buffer_data(self.kind.to_gl(), bytes, usage.to_gl());
            state.check("glBufferData")?;
        }

        self.size = bytes.len();
        self.usage = usage;

        Ok(())
    }

    /// Replace the data store with `size` uninitialized bytes.
    pub fn allocate(&mut self, size: usize, usage: BufferUsage) -> Result<(), GlError> {
        {
            let mut state = self.object.state().borrow_mut();
            state.check_bound(self.slot(), self.handle(), "glBufferData")?;
            state
                .driver
                .buffer_data_size(self.kind.to_gl(), size as i32, usage.to_gl());
            state.check("glBufferData")?;
        }

        self.size = size;
        self.usage = usage;

        Ok(())
    }

    /// Overwrite part of the data store, starting at `offset` bytes.
    pub fn sub_data<T: Pod>(&mut self, offset: usize, data: &[T]) -> Result<(), GlError> {
        let mut state = self.object.state().borrow_mut();
        state.check_bound(self.slot(), self.handle(), "glBufferSubData")?;
        state
            .driver
            .buffer_sub_data(self.kind.to_gl(), offset as i32, bytemuck::cast_slice(data));
        state.check("glBufferSubData")
    }

    /// Delete the native buffer. Calling it again does nothing.
    pub fn dispose(&mut self) {
        self.object.dispose();
        self.size = 0;
    }
}

impl PartialEq for DataBuffer {
    fn eq(&self, rhs: &Self) -> bool {
        self.object == rhs.object
    }
}

impl Eq for DataBuffer {}

impl Hash for DataBuffer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.object.hash(state);
    }
}

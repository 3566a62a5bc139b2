//! Lifecycle of driver-owned objects.
//!
//! Every owning wrapper ([`Program`](crate::Program), [`Texture`](crate::Texture), …) holds an
//! [`Object`], which couples a native handle to the shared graphics state and releases the
//! handle exactly once, either through an explicit `dispose` or when dropped.

use log::debug;
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::rc::Rc;

use crate::driver::Driver;
use crate::error::GlError;
use crate::state::{BindingSlot, GlesState};

/// Type of a driver-owned object.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ObjectType {
    /// Vertex or index buffer.
    Buffer,
    /// 2D or cube map texture.
    Texture,
    /// Framebuffer.
    Framebuffer,
    /// Renderbuffer.
    Renderbuffer,
    /// Vertex or fragment shader.
    Shader,
    /// Shader program.
    Program,
}

impl ObjectType {
    /// All object types.
    pub const ALL: [ObjectType; 6] = [
        ObjectType::Buffer,
        ObjectType::Texture,
        ObjectType::Framebuffer,
        ObjectType::Renderbuffer,
        ObjectType::Shader,
        ObjectType::Program,
    ];

    /// Binding slots an object of this type can occupy.
    pub fn binding_slots(self) -> &'static [BindingSlot] {
        match self {
            ObjectType::Buffer => &[BindingSlot::ArrayBuffer, BindingSlot::ElementArrayBuffer],
            ObjectType::Texture => &[BindingSlot::Texture2D, BindingSlot::TextureCubeMap],
            ObjectType::Framebuffer => &[BindingSlot::Framebuffer],
            ObjectType::Renderbuffer => &[BindingSlot::Renderbuffer],
            ObjectType::Shader => &[],
            ObjectType::Program => &[BindingSlot::Program],
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    fn delete(self, driver: &mut dyn Driver, handle: u32) {
        match self {
            ObjectType::Buffer => driver.delete_buffer(handle),
            ObjectType::Texture => driver.delete_texture(handle),
            ObjectType::Framebuffer => driver.delete_framebuffer(handle),
            ObjectType::Renderbuffer => driver.delete_renderbuffer(handle),
            ObjectType::Shader => driver.delete_shader(handle),
            ObjectType::Program => driver.delete_program(handle),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match *self {
            ObjectType::Buffer => f.write_str("buffer"),
            ObjectType::Texture => f.write_str("texture"),
            ObjectType::Framebuffer => f.write_str("framebuffer"),
            ObjectType::Renderbuffer => f.write_str("renderbuffer"),
            ObjectType::Shader => f.write_str("shader"),
            ObjectType::Program => f.write_str("program"),
        }
    }
}

/// Compile-time tag selecting the [`ObjectType`] of an [`Object`].
pub trait ObjectKind {
    /// Runtime type of the object.
    const TYPE: ObjectType;
}

macro_rules! object_kinds {
    ($($(#[$attr:meta])* $name:ident => $ty:ident,)*) => {
        $(
            $(#[$attr])*
            #[derive(Debug)]
            pub enum $name {}

            impl ObjectKind for $name {
                const TYPE: ObjectType = ObjectType::$ty;
            }
        )*
    };
}

object_kinds! {
    /// Tag of buffer objects.
    BufferObject => Buffer,
    /// Tag of texture objects.
    TextureObject => Texture,
    /// Tag of framebuffer objects.
    FramebufferObject => Framebuffer,
    /// Tag of renderbuffer objects.
    RenderbufferObject => Renderbuffer,
    /// Tag of shader objects.
    ShaderObject => Shader,
    /// Tag of program objects.
    ProgramObject => Program,
}

/// A native handle owned by a wrapper.
///
/// The handle is either a live, driver-assigned non-zero name or exactly zero once disposed.
pub(crate) struct Object<K: ObjectKind> {
    handle: u32,
    state: Rc<RefCell<GlesState>>,
    _kind: PhantomData<K>,
}

impl<K: ObjectKind> Object<K> {
    /// Allocate a new native object with the given creation entry point.
    pub(crate) fn create<F>(state: &Rc<RefCell<GlesState>>, create: F) -> Result<Self, GlError>
    where
        F: FnOnce(&mut dyn Driver) -> Result<u32, String>,
    {
        let handle = {
            let mut st = state.borrow_mut();
            let handle = create(&mut *st.driver)
                .map_err(|reason| GlError::creation_failed(K::TYPE, reason))?;

            if handle == 0 {
                return Err(GlError::creation_failed(K::TYPE, "driver returned a null name"));
            }

            st.acquired(K::TYPE);
            handle
        };

        debug!("created {} {}", K::TYPE, handle);

        Ok(Object {
            handle,
            state: state.clone(),
            _kind: PhantomData,
        })
    }

    /// Take ownership of a handle allocated elsewhere.
    pub(crate) fn from_raw(state: &Rc<RefCell<GlesState>>, handle: u32) -> Self {
        if handle != 0 {
            state.borrow_mut().acquired(K::TYPE);
        }

        Object {
            handle,
            state: state.clone(),
            _kind: PhantomData,
        }
    }

    /// Give up ownership of the handle without deleting it.
    pub(crate) fn into_raw(mut self) -> u32 {
        let handle = self.handle;

        if handle != 0 {
            self.state.borrow_mut().released(K::TYPE);
            self.handle = 0;
        }

        handle
    }

    pub(crate) fn handle(&self) -> u32 {
        self.handle
    }

    pub(crate) fn state(&self) -> &Rc<RefCell<GlesState>> {
        &self.state
    }

    /// Release the native object; later calls do nothing.
    pub(crate) fn dispose(&mut self) {
        if self.handle == 0 {
            return;
        }

        let mut state = self.state.borrow_mut();
        state.forget(K::TYPE, self.handle);
        K::TYPE.delete(&mut *state.driver, self.handle);
        state.released(K::TYPE);

        debug!("deleted {} {}", K::TYPE, self.handle);
        self.handle = 0;
    }
}

impl<K: ObjectKind> Drop for Object<K> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<K: ObjectKind> fmt::Debug for Object<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        f.debug_struct("Object")
            .field("type", &K::TYPE)
            .field("handle", &self.handle)
            .finish()
    }
}

impl<K: ObjectKind> PartialEq for Object<K> {
    fn eq(&self, rhs: &Self) -> bool {
        self.handle == rhs.handle
    }
}

impl<K: ObjectKind> Eq for Object<K> {}

impl<K: ObjectKind> Hash for Object<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.handle.hash(state);
    }
}

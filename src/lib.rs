//! Object-oriented OpenGL ES 2.0 on top of [glow]
//!
//! This crate wraps every OpenGL ES 2.0 resource (programs, shaders, textures, buffers,
//! framebuffers and renderbuffers) in an owning object that deletes it exactly once, and exposes
//! vertex attributes and uniforms as typed location descriptors. The remaining context-wide
//! state lives on [`Gles`].
//!
//! With diagnostics enabled (debug builds, or the `diagnostics` feature), the driver error flag is
//! checked after every call and operations that need an object to be bound check that it is;
//! both surface as [`GlError`]. Without diagnostics, those checks compile to nothing.
//!
//! [glow]: https://github.com/grovesNL/glow

use log::warn;
use std::cell::RefCell;
use std::rc::Rc;

mod buffer;
pub mod driver;
pub mod enums;
mod error;
mod framebuffer;
pub mod gl;
mod object;
mod pipeline;
mod renderbuffer;
mod shader;
mod state;
mod texture;
mod uniform;
mod vertex;

pub use buffer::DataBuffer;
pub use driver::{Driver, GlowDriver};
pub use enums::*;
pub use error::{GlError, StateQueryError};
pub use framebuffer::Framebuffer;
pub use object::ObjectType;
pub use renderbuffer::Renderbuffer;
pub use shader::{ActiveVariable, Program, Shader};
pub use state::BindingSlot;
pub use texture::Texture;
pub use uniform::{Uniform, UniformValue};
pub use vertex::VertexAttribute;

use state::GlesState;

/// The graphics context which must be provided to create a [`Gles`] instance
pub struct Context {
    driver: Box<dyn Driver>,
}

impl Context {
    /// Create a native context from a GL loader function
    ///
    /// # Safety
    ///
    /// The GL context the loader resolves symbols for must be current on this thread for as long as
    /// the context and anything created from it are alive.
    #[cfg(not(wasm))]
    pub unsafe fn from_loader_function<F>(loader_function: F) -> Self
    where
        F: FnMut(&str) -> *const std::os::raw::c_void,
    {
        Self::from_driver(GlowDriver::new(glow::Context::from_loader_function(
            loader_function,
        )))
    }

    /// Create a WebGL 1 context
    #[cfg(wasm)]
    pub fn from_webgl1_context(context: web_sys::WebGlRenderingContext) -> Self {
        Self::from_driver(GlowDriver::new(glow::Context::from_webgl1_context(context)))
    }

    /// Create a WebGL 2 context
    ///
    /// Only the OpenGL ES 2.0 subset of WebGL 2 is used.
    #[cfg(wasm)]
    pub fn from_webgl2_context(context: web_sys::WebGl2RenderingContext) -> Self {
        Self::from_driver(GlowDriver::new(glow::Context::from_webgl2_context(context)))
    }

    /// Create a context from any driver, such as [`driver::mock::MockDriver`]
    pub fn from_driver<D>(driver: D) -> Self
    where
        D: Driver + 'static,
    {
        Context {
            driver: Box::new(driver),
        }
    }
}

/// An OpenGL ES 2.0 context.
///
/// Objects created from it share its state and may outlive it; the native objects they own are
/// deleted when they are disposed or dropped. Dropping the context while objects are still alive
/// is reported as a leak when diagnostics are enabled.
#[derive(Debug)]
pub struct Gles {
    pub(crate) state: Rc<RefCell<GlesState>>,
}

impl Gles {
    /// Create a `Gles` instance from a [`Context`]
    pub fn from_context(ctx: Context) -> Result<Self, StateQueryError> {
        let Context { driver } = ctx;

        GlesState::new(driver).map(|state| Gles {
            state: Rc::new(RefCell::new(state)),
        })
    }

    /// Number of live objects of a given type.
    pub fn live_objects(&self, ty: ObjectType) -> usize {
        self.state.borrow().live(ty)
    }

    /// Live object counts of every type that has live objects.
    pub fn live_resources(&self) -> Vec<(ObjectType, usize)> {
        let state = self.state.borrow();

        ObjectType::ALL
            .iter()
            .map(|&ty| (ty, state.live(ty)))
            .filter(|&(_, count)| count > 0)
            .collect()
    }

    /// Handle currently occupying a binding slot.
    pub fn bound(&self, slot: BindingSlot) -> u32 {
        self.state.borrow().bound(slot)
    }
}

impl Drop for Gles {
    fn drop(&mut self) {
        if cfg!(diagnostics) {
            for (ty, count) in self.live_resources() {
                warn!("{} {} object(s) still alive when the context was dropped", count, ty);
            }
        }
    }
}

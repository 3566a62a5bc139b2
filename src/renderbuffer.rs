//! Renderbuffers.

use std::hash::{Hash, Hasher};

use crate::enums::RenderbufferFormat;
use crate::error::GlError;
use crate::object::{Object, RenderbufferObject};
use crate::state::BindingSlot;
use crate::Gles;

/// Storage for a single image, attachable to a [`Framebuffer`](crate::Framebuffer).
///
/// Format and dimensions are remembered once storage is allocated.
#[derive(Debug)]
pub struct Renderbuffer {
    object: Object<RenderbufferObject>,
    format: Option<RenderbufferFormat>,
    width: u32,
    height: u32,
}

impl Renderbuffer {
    pub fn new(gles: &Gles) -> Result<Self, GlError> {
        let object = Object::create(&gles.state, |driver| driver.create_renderbuffer())?;

        Ok(Renderbuffer {
            object,
            format: None,
            width: 0,
            height: 0,
        })
    }

    /// Take ownership of a renderbuffer created outside of this crate.
    pub fn from_raw(gles: &Gles, handle: u32) -> Self {
        Renderbuffer {
            object: Object::from_raw(&gles.state, handle),
            format: None,
            width: 0,
            height: 0,
        }
    }

    /// Give up ownership of the native renderbuffer; it won’t be deleted.
    pub fn into_raw(self) -> u32 {
        self.object.into_raw()
    }

    /// Native handle; zero once disposed.
    pub fn handle(&self) -> u32 {
        self.object.handle()
    }

    pub fn bind(&self) -> Result<(), GlError> {
        let mut state = self.object.state().borrow_mut();
        state.check_live(self.handle(), "glBindRenderbuffer")?;
        state.bind(BindingSlot::Renderbuffer, self.handle(), "glBindRenderbuffer")
    }

    pub fn unbind(&self) -> Result<(), GlError> {
        self.object.state().borrow_mut().unbind(
            BindingSlot::Renderbuffer,
            self.handle(),
            "glBindRenderbuffer",
        )
    }

    pub fn is_bound(&self) -> bool {
        let handle = self.handle();
        handle != 0 && self.object.state().borrow().bound(BindingSlot::Renderbuffer) == handle
    }

    /// Allocate storage for an image of the given format and size.
    pub fn storage(
        &mut self,
        format: RenderbufferFormat,
        width: u32,
        height: u32,
    ) -> Result<(), GlError> {
        let op = "glRenderbufferStorage";

        {
            let mut state = self.object.state().borrow_mut();
            state.check_bound(BindingSlot::Renderbuffer, self.handle(), op)?;
            state
                .driver
                .renderbuffer_storage(format.to_gl(), width as i32, height as i32);
            state.check(op)?;
        }

        self.format = Some(format);
        self.width = width;
        self.height = height;

        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Format of the storage; `None` until [`Renderbuffer::storage`] is called.
    pub fn format(&self) -> Option<RenderbufferFormat> {
        self.format
    }

    /// Delete the native renderbuffer. Calling it again does nothing.
    pub fn dispose(&mut self) {
        self.object.dispose();
        self.format = None;
        self.width = 0;
        self.height = 0;
    }
}

impl PartialEq for Renderbuffer {
    fn eq(&self, rhs: &Self) -> bool {
        self.object == rhs.object
    }
}

impl Eq for Renderbuffer {}

impl Hash for Renderbuffer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.object.hash(state);
    }
}

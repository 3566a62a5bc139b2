//! Framebuffers.

use std::hash::{Hash, Hasher};

use crate::enums::{FramebufferAttachment, FramebufferStatus, ImageTarget};
use crate::error::GlError;
use crate::object::{FramebufferObject, Object};
use crate::renderbuffer::Renderbuffer;
use crate::state::BindingSlot;
use crate::texture::Texture;
use crate::Gles;

/// An offscreen render target.
///
/// Images are attached to the bound framebuffer, so attachments and status queries require the
/// framebuffer to be bound first. Unbinding reverts to the default framebuffer.
#[derive(Debug)]
pub struct Framebuffer {
    object: Object<FramebufferObject>,
}

impl Framebuffer {
    pub fn new(gles: &Gles) -> Result<Self, GlError> {
        let object = Object::create(&gles.state, |driver| driver.create_framebuffer())?;
        Ok(Framebuffer { object })
    }

    /// Take ownership of a framebuffer created outside of this crate.
    pub fn from_raw(gles: &Gles, handle: u32) -> Self {
        Framebuffer {
            object: Object::from_raw(&gles.state, handle),
        }
    }

    /// Give up ownership of the native framebuffer; it won’t be deleted.
    pub fn into_raw(self) -> u32 {
        self.object.into_raw()
    }

    /// Native handle; zero once disposed.
    pub fn handle(&self) -> u32 {
        self.object.handle()
    }

    pub fn bind(&self) -> Result<(), GlError> {
        let mut state = self.object.state().borrow_mut();
        state.check_live(self.handle(), "glBindFramebuffer")?;
        state.bind(BindingSlot::Framebuffer, self.handle(), "glBindFramebuffer")
    }

    /// Revert to the default framebuffer if this one is bound.
    pub fn unbind(&self) -> Result<(), GlError> {
        self.object.state().borrow_mut().unbind(
            BindingSlot::Framebuffer,
            self.handle(),
            "glBindFramebuffer",
        )
    }

    pub fn is_bound(&self) -> bool {
        let handle = self.handle();
        handle != 0 && self.object.state().borrow().bound(BindingSlot::Framebuffer) == handle
    }

    /// Attach a level of a texture image.
    pub fn attach_texture(
        &self,
        attachment: FramebufferAttachment,
        texture: &Texture,
        target: ImageTarget,
        level: u32,
    ) -> Result<(), GlError> {
        let op = "glFramebufferTexture2D";
        let mut state = self.object.state().borrow_mut();
        state.check_bound(BindingSlot::Framebuffer, self.handle(), op)?;
        state.check_live(texture.handle(), op)?;
        state.driver.framebuffer_texture_2d(
            attachment.to_gl(),
            target.to_gl(),
            texture.handle(),
            level as i32,
        );
        state.check(op)
    }

    pub fn attach_renderbuffer(
        &self,
        attachment: FramebufferAttachment,
        renderbuffer: &Renderbuffer,
    ) -> Result<(), GlError> {
        let op = "glFramebufferRenderbuffer";
        let mut state = self.object.state().borrow_mut();
        state.check_bound(BindingSlot::Framebuffer, self.handle(), op)?;
        state.check_live(renderbuffer.handle(), op)?;
        state
            .driver
            .framebuffer_renderbuffer(attachment.to_gl(), renderbuffer.handle());
        state.check(op)
    }

    /// Detach whatever image is attached to an attachment point.
    pub fn detach(&self, attachment: FramebufferAttachment) -> Result<(), GlError> {
        let op = "glFramebufferRenderbuffer";
        let mut state = self.object.state().borrow_mut();
        state.check_bound(BindingSlot::Framebuffer, self.handle(), op)?;
        state.driver.framebuffer_renderbuffer(attachment.to_gl(), 0);
        state.check(op)
    }

    /// Completeness status of the framebuffer.
    pub fn status(&self) -> Result<FramebufferStatus, GlError> {
        let op = "glCheckFramebufferStatus";
        let mut state = self.object.state().borrow_mut();
        state.check_bound(BindingSlot::Framebuffer, self.handle(), op)?;
        let value = state.driver.check_framebuffer_status();
        state.check(op)?;

        FramebufferStatus::from_gl(value).ok_or(GlError::UnknownValue { op, value })
    }

    /// Fail with the reason if the framebuffer isn’t complete.
    pub fn check_complete(&self) -> Result<(), GlError> {
        match self.status()? {
            FramebufferStatus::Complete => Ok(()),
            status => Err(GlError::IncompleteFramebuffer(status)),
        }
    }

    /// Delete the native framebuffer. Calling it again does nothing.
    pub fn dispose(&mut self) {
        self.object.dispose();
    }
}

impl PartialEq for Framebuffer {
    fn eq(&self, rhs: &Self) -> bool {
        self.object == rhs.object
    }
}

impl Eq for Framebuffer {}

impl Hash for Framebuffer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.object.hash(state);
    }
}

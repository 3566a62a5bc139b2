//! Vertex attributes.

use std::cell::RefCell;
use std::rc::Rc;

use crate::buffer::DataBuffer;
use crate::enums::DataType;
use crate::error::GlError;
use crate::gl;
use crate::shader::Program;
use crate::state::{BindingSlot, GlesState};
use crate::Gles;

/// A generic vertex attribute index.
///
/// Attributes looked up by name in a program that doesn’t declare them get a location of `-1`;
/// every operation on such an attribute does nothing.
#[derive(Clone, Debug)]
pub struct VertexAttribute {
    location: i32,
    state: Rc<RefCell<GlesState>>,
}

impl VertexAttribute {
    /// Look an active attribute up by name in a linked program.
    pub fn new(program: &Program, name: &str) -> Result<Self, GlError> {
        let op = "glGetAttribLocation";
        let handle = program.handle();

        let location = {
            let mut state = program.state().borrow_mut();
            state.check_live(handle, op)?;
            let location = state.driver.get_attrib_location(handle, name);
            state.check(op)?;
            location
        };

        #[cfg(diagnostics)]
        {
            if location < 0 {
                log::warn!("vertex attribute {} not found in program {}", name, handle);
            }
        }

        Ok(VertexAttribute {
            location,
            state: program.state().clone(),
        })
    }

    /// Refer to an attribute index directly.
    pub fn from_location(gles: &Gles, location: u32) -> Self {
        VertexAttribute {
            location: location as i32,
            state: gles.state.clone(),
        }
    }

    pub fn location(&self) -> i32 {
        self.location
    }

    pub fn is_found(&self) -> bool {
        self.location >= 0
    }

    fn index(&self) -> Option<u32> {
        if self.location >= 0 {
            Some(self.location as u32)
        } else {
            None
        }
    }

    /// Source the attribute from the bound array buffer.
    pub fn enable(&self) -> Result<(), GlError> {
        if let Some(index) = self.index() {
            let mut state = self.state.borrow_mut();
            state.driver.enable_vertex_attrib_array(index);
            state.check("glEnableVertexAttribArray")?;
        }

        Ok(())
    }

    /// Use the attribute’s current value instead of an array.
    pub fn disable(&self) -> Result<(), GlError> {
        if let Some(index) = self.index() {
            let mut state = self.state.borrow_mut();
            state.driver.disable_vertex_attrib_array(index);
            state.check("glDisableVertexAttribArray")?;
        }

        Ok(())
    }

    pub fn is_enabled(&self) -> Result<bool, GlError> {
        let index = match self.index() {
            Some(index) => index,
            None => return Ok(false),
        };

        let mut enabled = [0.];
        let mut state = self.state.borrow_mut();
        state
            .driver
            .get_vertex_attrib_f32(index, gl::VERTEX_ATTRIB_ARRAY_ENABLED, &mut enabled);
        state.check("glGetVertexAttribfv")?;

        Ok(enabled[0] != 0.)
    }

    /// Describe where the attribute reads from in a vertex buffer, which must be bound.
    ///
    /// `offset` and `stride` are in bytes; a zero stride means tightly packed.
    pub fn set_buffer(
        &self,
        buffer: &DataBuffer,
        components: u32,
        ty: DataType,
        normalized: bool,
        stride: u32,
        offset: usize,
    ) -> Result<(), GlError> {
        let op = "glVertexAttribPointer";

        let index = match self.index() {
            Some(index) => index,
            None => return Ok(()),
        };

        let mut state = self.state.borrow_mut();

        state.check_bound(BindingSlot::ArrayBuffer, buffer.handle(), op)?;
        state.driver.vertex_attrib_pointer(
            index,
            components as i32,
            ty.to_gl(),
            normalized,
            stride as i32,
            offset as i32,
        );
        state.check(op)
    }

    /// Set the current value used while the attribute array is disabled.
    ///
    /// From 1 to 4 components; missing ones default to `(0, 0, 0, 1)`.
    pub fn set_value(&self, value: &[f32]) -> Result<(), GlError> {
        if let Some(index) = self.index() {
            let mut state = self.state.borrow_mut();
            state.driver.vertex_attrib_f32(index, value);
            state.check("glVertexAttrib")?;
        }

        Ok(())
    }

    /// Current value used while the attribute array is disabled.
    pub fn value(&self) -> Result<[f32; 4], GlError> {
        let mut value = [0., 0., 0., 1.];

        if let Some(index) = self.index() {
            let mut state = self.state.borrow_mut();
            state
                .driver
                .get_vertex_attrib_f32(index, gl::CURRENT_VERTEX_ATTRIB, &mut value);
            state.check("glGetVertexAttribfv")?;
        }

        Ok(value)
    }
}

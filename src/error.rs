//! Errors.

use std::error::Error;
use std::fmt;

use crate::enums::{ErrorCode, FramebufferStatus, ShaderKind};
use crate::object::ObjectType;
use crate::state::BindingSlot;

/// Error that can occur while operating on a [`Gles`](crate::Gles) context or one of its objects.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GlError {
    /// The driver raised an error flag after an entry point call.
    Driver {
        /// Operation that was being performed.
        op: &'static str,
        /// Raw `GLenum` error code.
        code: u32,
    },
    /// An object was used while not occupying the binding slot the operation requires.
    NotBound {
        /// Operation that was being performed.
        op: &'static str,
        /// Slot the object should occupy.
        slot: BindingSlot,
        /// Handle of the object.
        expected: u32,
        /// Handle currently occupying the slot.
        current: u32,
    },
    /// An object was used after having been disposed.
    Disposed {
        /// Operation that was being performed.
        op: &'static str,
    },
    /// The driver could not allocate a new object.
    CreationFailed {
        /// Type of the object.
        object: ObjectType,
        /// Reason reported by the driver.
        reason: String,
    },
    /// A shader failed to compile.
    CompileFailed {
        /// Stage of the shader.
        kind: ShaderKind,
        /// Compilation log.
        log: String,
    },
    /// A program failed to link.
    LinkFailed(String),
    /// A program failed validation.
    ValidateFailed(String),
    /// Pixel data is shorter than the image it should hold.
    NotEnoughPixels {
        /// Operation that was being performed.
        op: &'static str,
        /// Number of bytes the image takes.
        expected: usize,
        /// Number of bytes given.
        provided: usize,
    },
    /// A uniform was read back as a type that doesn’t match its declaration.
    UniformMismatch {
        /// Name the uniform was looked up with.
        name: String,
        /// Rust type it was read as.
        requested: &'static str,
    },
    /// A framebuffer isn’t complete.
    IncompleteFramebuffer(FramebufferStatus),
    /// The driver answered a query with a value outside of the known enumeration.
    UnknownValue {
        /// Operation that was being performed.
        op: &'static str,
        /// Raw value returned by the driver.
        value: u32,
    },
}

impl GlError {
    pub(crate) fn creation_failed(object: ObjectType, reason: impl Into<String>) -> Self {
        GlError::CreationFailed {
            object,
            reason: reason.into(),
        }
    }

    /// The [`ErrorCode`] of a driver error, if known.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match *self {
            GlError::Driver { code, .. } => ErrorCode::from_gl(code),
            _ => None,
        }
    }
}

impl fmt::Display for GlError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match *self {
            GlError::Driver { op, code } => match ErrorCode::from_gl(code) {
                Some(error) => write!(f, "{}: {}", op, error),
                None => write!(f, "{}: unknown driver error {:#x}", op, code),
            },

            GlError::NotBound {
                op,
                slot,
                expected,
                current,
            } => write!(
                f,
                "{}: object {} is not bound to {} (currently bound: {})",
                op, expected, slot, current
            ),

            GlError::Disposed { op } => write!(f, "{}: object was already disposed", op),

            GlError::CreationFailed {
                object,
                ref reason,
            } => write!(f, "cannot create {}: {}", object, reason),

            GlError::CompileFailed { kind, ref log } => {
                write!(f, "{:?} shader compilation failed: {}", kind, log)
            }

            GlError::LinkFailed(ref log) => write!(f, "program link failed: {}", log),

            GlError::ValidateFailed(ref log) => write!(f, "program validation failed: {}", log),

            GlError::NotEnoughPixels {
                op,
                expected,
                provided,
            } => write!(
                f,
                "{}: not enough pixel data (expected {} bytes, got {})",
                op, expected, provided
            ),

            GlError::UniformMismatch {
                ref name,
                requested,
            } => write!(f, "uniform {} can’t be read as {}", name, requested),

            GlError::IncompleteFramebuffer(status) => {
                write!(f, "incomplete framebuffer: {}", status)
            }

            GlError::UnknownValue { op, value } => {
                write!(f, "{}: unknown value {:#x} returned by the driver", op, value)
            }
        }
    }
}

impl Error for GlError {}

/// An error that might happen when the context is queried for its initial state.
#[non_exhaustive]
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum StateQueryError {
    /// The driver reported no usable texture units.
    UnknownTextureUnitCount(i32),
    /// The active texture unit is out of the reported range.
    UnknownActiveTextureUnit(u32),
    /// The driver reported no usable vertex attributes.
    UnknownVertexAttributeCount(i32),
}

impl fmt::Display for StateQueryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match *self {
            StateQueryError::UnknownTextureUnitCount(count) => {
                write!(f, "unknown texture unit count: {}", count)
            }

            StateQueryError::UnknownActiveTextureUnit(unit) => {
                write!(f, "unknown active texture unit: {:#x}", unit)
            }

            StateQueryError::UnknownVertexAttributeCount(count) => {
                write!(f, "unknown vertex attribute count: {}", count)
            }
        }
    }
}

impl Error for StateQueryError {}

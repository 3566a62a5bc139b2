//! Shaders and programs.

use log::debug;
use std::cell::RefCell;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::driver::{ActiveInfo, Driver};
use crate::enums::{ShaderKind, ValueType};
use crate::error::GlError;
use crate::object::{Object, ProgramObject, ShaderObject};
use crate::state::{BindingSlot, GlesState};
use crate::Gles;

/// A compiled shader stage.
#[derive(Debug)]
pub struct Shader {
    object: Object<ShaderObject>,
    kind: ShaderKind,
    source: String,
}

impl Shader {
    /// Create and compile a shader.
    ///
    /// A shader that fails to compile is deleted right away and its log is returned in
    /// [`GlError::CompileFailed`].
    pub fn new(gles: &Gles, kind: ShaderKind, source: &str) -> Result<Self, GlError> {
        let object = Object::create(&gles.state, |driver| driver.create_shader(kind.to_gl()))?;
        let handle = object.handle();

        let shader = Shader {
            object,
            kind,
            source: source.to_owned(),
        };

        {
            let mut state = gles.state.borrow_mut();
            state.driver.shader_source(handle, source);
            state.driver.compile_shader(handle);
            state.check("glCompileShader")?;

            if !state.driver.get_shader_compile_status(handle) {
                let log = state.driver.get_shader_info_log(handle);
                return Err(GlError::CompileFailed { kind, log });
            }
        }

        Ok(shader)
    }

    /// Native handle; zero once disposed.
    pub fn handle(&self) -> u32 {
        self.object.handle()
    }

    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    /// Source the shader was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Compilation log; usually empty for a shader that compiled cleanly.
    pub fn info_log(&self) -> Result<String, GlError> {
        let op = "glGetShaderInfoLog";
        let mut state = self.object.state().borrow_mut();
        state.check_live(self.handle(), op)?;
        let log = state.driver.get_shader_info_log(self.handle());
        state.check(op)?;

        Ok(log)
    }

    /// Delete the native shader. Calling it again does nothing.
    ///
    /// Programs the shader is attached to keep it alive on the driver side until it’s detached.
    pub fn dispose(&mut self) {
        self.object.dispose();
    }
}

impl PartialEq for Shader {
    fn eq(&self, rhs: &Self) -> bool {
        self.object == rhs.object
    }
}

impl Eq for Shader {}

impl Hash for Shader {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.object.hash(state);
    }
}

/// An active attribute or uniform of a linked program.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActiveVariable {
    /// Name as declared in the shader source.
    pub name: String,
    /// Number of array elements; `1` for non-array variables.
    pub size: usize,
    /// GLSL type.
    pub ty: ValueType,
}

/// A shader program.
///
/// A program starts unlinked. A successful [`Program::link`] makes it linked, and
/// [`Program::use_program`] makes it the active program, which uniform updates require. A failed
/// link leaves it unlinked and, if it was active, stops using it.
#[derive(Debug)]
pub struct Program {
    object: Object<ProgramObject>,
    attached: Vec<u32>,
    linked: bool,
}

impl Program {
    pub fn new(gles: &Gles) -> Result<Self, GlError> {
        let object = Object::create(&gles.state, |driver| driver.create_program())?;

        Ok(Program {
            object,
            attached: Vec::new(),
            linked: false,
        })
    }

    /// Create a program, attach the shaders and link it.
    ///
    /// Unlike [`Program::link`], a failed link is always an error here.
    pub fn with_shaders(gles: &Gles, shaders: &[&Shader]) -> Result<Self, GlError> {
        let mut program = Program::new(gles)?;

        for shader in shaders {
            program.attach_shader(shader)?;
        }

        if program.link()? {
            Ok(program)
        } else {
            Err(GlError::LinkFailed(program.info_log()?))
        }
    }

    /// Take ownership of a program created outside of this crate.
    ///
    /// `handle` is the native program name. WebGL has no such names, so there only handles given
    /// out by [`Program::into_raw`] can be adopted.
    ///
    /// The program is assumed to be unlinked until it’s linked again through this wrapper.
    pub fn from_raw(gles: &Gles, handle: u32) -> Self {
        Program {
            object: Object::from_raw(&gles.state, handle),
            attached: Vec::new(),
            linked: false,
        }
    }

    /// Give up ownership of the native program; it won’t be deleted.
    pub fn into_raw(self) -> u32 {
        self.object.into_raw()
    }

    /// Native handle; zero once disposed.
    pub fn handle(&self) -> u32 {
        self.object.handle()
    }

    pub(crate) fn state(&self) -> &Rc<RefCell<GlesState>> {
        self.object.state()
    }

    pub fn attach_shader(&mut self, shader: &Shader) -> Result<(), GlError> {
        let op = "glAttachShader";

        {
            let mut state = self.object.state().borrow_mut();
            state.check_live(self.handle(), op)?;
            state.check_live(shader.handle(), op)?;
            state.driver.attach_shader(self.handle(), shader.handle());
            state.check(op)?;
        }

        self.attached.push(shader.handle());
        Ok(())
    }

    pub fn detach_shader(&mut self, shader: &Shader) -> Result<(), GlError> {
        let op = "glDetachShader";

        {
            let mut state = self.object.state().borrow_mut();
            state.check_live(self.handle(), op)?;
            state.driver.detach_shader(self.handle(), shader.handle());
            state.check(op)?;
        }

        self.attached.retain(|&h| h != shader.handle());
        Ok(())
    }

    /// Number of shaders attached through this wrapper.
    pub fn attached_shader_count(&self) -> usize {
        self.attached.len()
    }

    /// Link the attached shaders.
    ///
    /// Returns whether linking succeeded. With diagnostics, a failure that comes with a log is
    /// returned as [`GlError::LinkFailed`] instead.
    pub fn link(&mut self) -> Result<bool, GlError> {
        let op = "glLinkProgram";
        let handle = self.handle();
        let mut state = self.object.state().borrow_mut();

        state.check_live(handle, op)?;
        state.driver.link_program(handle);
        state.check(op)?;

        self.linked = state.driver.get_program_link_status(handle);

        if self.linked {
            debug!("linked program {}", handle);
            return Ok(true);
        }

        // a program that failed to link can’t stay in use
        if state.bound(BindingSlot::Program) == handle {
            state.bind(BindingSlot::Program, 0, "glUseProgram")?;
        }

        #[cfg(diagnostics)]
        {
            let log = state.driver.get_program_info_log(handle);

            if !log.is_empty() {
                return Err(GlError::LinkFailed(log));
            }
        }

        Ok(false)
    }

    /// Whether the last link succeeded.
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Check whether the program can execute in the current state.
    ///
    /// Returns whether validation succeeded. With diagnostics, a failure that comes with a log is
    /// returned as [`GlError::ValidateFailed`] instead.
    pub fn validate(&self) -> Result<bool, GlError> {
        let op = "glValidateProgram";
        let handle = self.handle();
        let mut state = self.object.state().borrow_mut();

        state.check_live(handle, op)?;
        state.driver.validate_program(handle);
        state.check(op)?;

        if state.driver.get_program_validate_status(handle) {
            return Ok(true);
        }

        #[cfg(diagnostics)]
        {
            let log = state.driver.get_program_info_log(handle);

            if !log.is_empty() {
                return Err(GlError::ValidateFailed(log));
            }
        }

        Ok(false)
    }

    /// Make this program the active one.
    pub fn use_program(&self) -> Result<(), GlError> {
        let mut state = self.object.state().borrow_mut();
        state.check_live(self.handle(), "glUseProgram")?;
        state.bind(BindingSlot::Program, self.handle(), "glUseProgram")
    }

    pub fn is_active(&self) -> bool {
        let handle = self.handle();
        handle != 0 && self.object.state().borrow().bound(BindingSlot::Program) == handle
    }

    /// Log of the last link or validation.
    pub fn info_log(&self) -> Result<String, GlError> {
        let op = "glGetProgramInfoLog";
        let mut state = self.object.state().borrow_mut();
        state.check_live(self.handle(), op)?;
        let log = state.driver.get_program_info_log(self.handle());
        state.check(op)?;

        Ok(log)
    }

    /// Bind an attribute name to a location; it takes effect at the next link.
    pub fn bind_attribute_location(&self, index: u32, name: &str) -> Result<(), GlError> {
        let op = "glBindAttribLocation";
        let mut state = self.object.state().borrow_mut();
        state.check_live(self.handle(), op)?;
        state.driver.bind_attrib_location(self.handle(), index, name);
        state.check(op)
    }

    pub fn active_attributes(&self) -> Result<Vec<ActiveVariable>, GlError> {
        self.active_variables(
            "glGetActiveAttrib",
            |driver, program| driver.get_active_attributes(program),
            |driver, program, index| driver.get_active_attribute(program, index),
        )
    }

    pub fn active_uniforms(&self) -> Result<Vec<ActiveVariable>, GlError> {
        self.active_variables(
            "glGetActiveUniform",
            |driver, program| driver.get_active_uniforms(program),
            |driver, program, index| driver.get_active_uniform(program, index),
        )
    }

    fn active_variables<C, G>(
        &self,
        op: &'static str,
        count: C,
        get: G,
    ) -> Result<Vec<ActiveVariable>, GlError>
    where
        C: FnOnce(&mut dyn Driver, u32) -> u32,
        G: Fn(&mut dyn Driver, u32, u32) -> Option<ActiveInfo>,
    {
        let handle = self.handle();
        let mut state = self.object.state().borrow_mut();
        state.check_live(handle, op)?;

        let count = count(&mut *state.driver, handle);
        let mut variables = Vec::with_capacity(count as usize);

        for index in 0..count {
            let info = get(&mut *state.driver, handle, index);
            state.check(op)?;

            if let Some(ActiveInfo { name, size, ty }) = info {
                let ty = ValueType::from_gl(ty).ok_or(GlError::UnknownValue { op, value: ty })?;

                variables.push(ActiveVariable {
                    name,
                    size: size.max(0) as usize,
                    ty,
                });
            }
        }

        state.check(op)?;
        Ok(variables)
    }

    /// Delete the native program. Calling it again does nothing.
    ///
    /// The program stops being used if it was the active one.
    pub fn dispose(&mut self) {
        self.object.dispose();
        self.attached.clear();
        self.linked = false;
    }
}

impl PartialEq for Program {
    fn eq(&self, rhs: &Self) -> bool {
        self.object == rhs.object
    }
}

impl Eq for Program {}

impl Hash for Program {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.object.hash(state);
    }
}

//! A headless, in-memory OpenGL ES 2.0 driver.
//!
//! [`MockDriver`] keeps just enough state to behave like a conforming implementation for the
//! entry points the wrappers use: object names, bindings, texture parameters, buffer contents,
//! framebuffer completeness, shader compilation (a source containing `#error` fails), program
//! linking with `attribute` / `uniform` declarations read from the attached sources, uniform
//! storage and the sticky error flag. Every entry point call is recorded, so tests can assert
//! what actually reached the driver.
//!
//! The driver is cheaply cloneable; clones share the same state, which lets a test keep a handle
//! on it after giving one to a [`Context`](crate::Context).

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::driver::{ActiveInfo, Driver};
use crate::enums::{
    BlendEquation, BlendFactor, Capability, CompareFunc, DataType, Face, FrontFace, HintMode,
    HintTarget, ImageTarget, IndexType, MagFilter, MinFilter, PixelDataType, PixelFormat,
    PixelStore, PrimitiveType, RenderbufferFormat, StencilOp, ValueType, WrapMode,
};
use crate::gl;
use crate::state::image_bytes;

const MAX_VERTEX_ATTRIBS: usize = 8;
const MAX_TEXTURE_UNITS: usize = 8;
const MAX_TEXTURE_SIZE: i32 = 2048;

#[derive(Debug, Default)]
struct BufferObject {
    data: Vec<u8>,
    usage: u32,
}

#[derive(Debug, Default)]
struct TextureObject {
    // zero until first bound
    target: u32,
    params: HashMap<u32, i32>,
    // (image target, level) -> (width, height)
    levels: HashMap<(u32, i32), (i32, i32)>,
}

#[derive(Debug, Default)]
struct RenderbufferObject {
    format: u32,
    width: i32,
    height: i32,
}

#[derive(Debug, Default)]
struct FramebufferObject {
    // attachment point -> attached image
    attachments: HashMap<u32, Attachment>,
}

#[derive(Clone, Copy, Debug)]
enum Attachment {
    Texture { name: u32, target: u32, level: i32 },
    Renderbuffer(u32),
}

#[derive(Debug)]
struct ShaderObject {
    kind: u32,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Clone, Debug, PartialEq)]
struct Variable {
    name: String,
    ty: ValueType,
    size: i32,
}

#[derive(Clone, Debug)]
enum Value {
    Float(Vec<f32>),
    Int(Vec<i32>),
}

#[derive(Debug, Default)]
struct ProgramObject {
    attached: Vec<u32>,
    linked: bool,
    validated: bool,
    log: String,
    bound_locations: HashMap<String, u32>,
    attributes: Vec<(Variable, u32)>,
    uniforms: Vec<(Variable, Value)>,
}

#[derive(Clone, Copy, Debug)]
struct VertexAttrib {
    enabled: bool,
    current: [f32; 4],
    size: i32,
    ty: u32,
    normalized: bool,
    stride: i32,
    offset: i32,
    buffer: u32,
}

impl Default for VertexAttrib {
    fn default() -> Self {
        VertexAttrib {
            enabled: false,
            current: [0., 0., 0., 1.],
            size: 4,
            ty: gl::FLOAT,
            normalized: false,
            stride: 0,
            offset: 0,
            buffer: 0,
        }
    }
}

#[derive(Debug)]
struct MockGl {
    next_name: u32,
    error: u32,
    fail_creation: bool,
    calls: Vec<&'static str>,
    deletes: HashMap<u32, usize>,

    buffers: HashMap<u32, BufferObject>,
    textures: HashMap<u32, TextureObject>,
    framebuffers: HashMap<u32, FramebufferObject>,
    renderbuffers: HashMap<u32, RenderbufferObject>,
    shaders: HashMap<u32, ShaderObject>,
    programs: HashMap<u32, ProgramObject>,

    array_buffer: u32,
    element_array_buffer: u32,
    active_unit: usize,
    // per unit: [2D, cube map]
    texture_units: Vec<[u32; 2]>,
    framebuffer: u32,
    renderbuffer: u32,
    program: u32,
    attribs: Vec<VertexAttrib>,

    capabilities: HashSet<u32>,
    viewport: [i32; 4],
    scissor_box: [i32; 4],
    clear_color: [f32; 4],
    clear_depth: f32,
    clear_stencil: i32,
    depth_range: [f32; 2],
    depth_func: u32,
    depth_mask: bool,
    color_mask: [bool; 4],
    blend_color: [f32; 4],
    blend_equations: [u32; 2],
    blend_funcs: [u32; 4],
    cull_face: u32,
    front_face: u32,
    line_width: f32,
    pack_alignment: i32,
    unpack_alignment: i32,
    mipmap_hint: u32,
    color_buffer: [u8; 4],
}

impl Default for MockGl {
    fn default() -> Self {
        let mut capabilities = HashSet::new();
        capabilities.insert(gl::DITHER);

        MockGl {
            next_name: 1,
            error: gl::NO_ERROR,
            fail_creation: false,
            calls: Vec::new(),
            deletes: HashMap::new(),
            buffers: HashMap::new(),
            textures: HashMap::new(),
            framebuffers: HashMap::new(),
            renderbuffers: HashMap::new(),
            shaders: HashMap::new(),
            programs: HashMap::new(),
            array_buffer: 0,
            element_array_buffer: 0,
            active_unit: 0,
            texture_units: vec![[0; 2]; MAX_TEXTURE_UNITS],
            framebuffer: 0,
            renderbuffer: 0,
            program: 0,
            attribs: vec![VertexAttrib::default(); MAX_VERTEX_ATTRIBS],
            capabilities,
            viewport: [0, 0, 640, 480],
            scissor_box: [0, 0, 640, 480],
            clear_color: [0.; 4],
            clear_depth: 1.,
            clear_stencil: 0,
            depth_range: [0., 1.],
            depth_func: gl::LESS,
            depth_mask: true,
            color_mask: [true; 4],
            blend_color: [0.; 4],
            blend_equations: [gl::FUNC_ADD; 2],
            blend_funcs: [gl::ONE, gl::ZERO, gl::ONE, gl::ZERO],
            cull_face: gl::BACK,
            front_face: gl::CCW,
            line_width: 1.,
            pack_alignment: 4,
            unpack_alignment: 4,
            mipmap_hint: gl::DONT_CARE,
            color_buffer: [0; 4],
        }
    }
}

impl MockGl {
    /// Record an error; like the native flag, only the first one sticks until read.
    fn flag(&mut self, code: u32) {
        if self.error == gl::NO_ERROR {
            self.error = code;
        }
    }

    fn gen_name(&mut self) -> Result<u32, String> {
        if self.fail_creation {
            self.flag(gl::OUT_OF_MEMORY);
            return Err("mock driver is out of object names".to_owned());
        }

        let name = self.next_name;
        self.next_name += 1;
        Ok(name)
    }

    fn record_delete(&mut self, name: u32) -> bool {
        if name == 0 {
            return false;
        }

        *self.deletes.entry(name).or_insert(0) += 1;
        true
    }

    fn slot(target: u32) -> Option<usize> {
        match target {
            gl::TEXTURE_2D => Some(0),
            gl::TEXTURE_CUBE_MAP => Some(1),
            _ => None,
        }
    }

    fn bound_texture(&mut self, target: u32) -> Option<u32> {
        let slot = match Self::slot(target) {
            Some(slot) => slot,
            None => {
                self.flag(gl::INVALID_ENUM);
                return None;
            }
        };

        match self.texture_units[self.active_unit][slot] {
            0 => {
                self.flag(gl::INVALID_OPERATION);
                None
            }

            name => Some(name),
        }
    }

    fn bound_buffer(&mut self, target: u32) -> Option<u32> {
        let name = match target {
            gl::ARRAY_BUFFER => self.array_buffer,
            gl::ELEMENT_ARRAY_BUFFER => self.element_array_buffer,
            _ => {
                self.flag(gl::INVALID_ENUM);
                return None;
            }
        };

        if name == 0 {
            self.flag(gl::INVALID_OPERATION);
            None
        } else {
            Some(name)
        }
    }

    // rows but the last are padded to the alignment, as the native API does
    fn image_size(
        &mut self,
        format: u32,
        ty: u32,
        width: i32,
        height: i32,
        alignment: i32,
    ) -> Option<usize> {
        match (PixelFormat::from_gl(format), PixelDataType::from_gl(ty)) {
            (Some(format), Some(ty)) => {
                let row = width.max(0) as usize * ty.bytes_per_pixel(format);
                Some(image_bytes(row, height.max(0) as usize, alignment))
            }

            _ => {
                self.flag(gl::INVALID_ENUM);
                None
            }
        }
    }

    fn current_program_mut(&mut self) -> Option<&mut ProgramObject> {
        let program = self.program;

        if program == 0 {
            self.flag(gl::INVALID_OPERATION);
            return None;
        }

        self.programs.get_mut(&program)
    }

    fn framebuffer_status(&self) -> u32 {
        if self.framebuffer == 0 {
            return gl::FRAMEBUFFER_COMPLETE;
        }

        let fb = match self.framebuffers.get(&self.framebuffer) {
            Some(fb) => fb,
            None => return gl::FRAMEBUFFER_UNSUPPORTED,
        };

        if fb.attachments.is_empty() {
            return gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT;
        }

        let mut size = None;

        for attachment in fb.attachments.values() {
            let dims = match *attachment {
                Attachment::Texture {
                    name,
                    target,
                    level,
                } => self
                    .textures
                    .get(&name)
                    .and_then(|tex| tex.levels.get(&(target, level)))
                    .copied(),

                Attachment::Renderbuffer(name) => self
                    .renderbuffers
                    .get(&name)
                    .filter(|rb| rb.width > 0 && rb.height > 0)
                    .map(|rb| (rb.width, rb.height)),
            };

            match (dims, size) {
                (None, _) => return gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT,
                (Some(dims), Some(prev)) if dims != prev => {
                    return gl::FRAMEBUFFER_INCOMPLETE_DIMENSIONS
                }
                (Some(dims), _) => size = Some(dims),
            }
        }

        gl::FRAMEBUFFER_COMPLETE
    }

    fn link(&mut self, program: u32) {
        let attached = match self.programs.get(&program) {
            Some(p) => p.attached.clone(),
            None => {
                self.flag(gl::INVALID_VALUE);
                return;
            }
        };

        let mut vertex = None;
        let mut fragment = None;
        let mut log = String::new();

        for name in attached {
            if let Some(shader) = self.shaders.get(&name) {
                if !shader.compiled {
                    log.push_str(&format!("shader {} is not compiled\n", name));
                } else if shader.kind == gl::VERTEX_SHADER {
                    vertex = Some(shader.source.clone());
                } else {
                    fragment = Some(shader.source.clone());
                }
            }
        }

        let program = match self.programs.get_mut(&program) {
            Some(program) => program,
            None => return,
        };

        match (vertex, fragment) {
            (Some(vs), Some(fs)) if log.is_empty() => {
                let attributes = declarations(&vs, "attribute");

                let mut uniforms = declarations(&vs, "uniform");
                for uniform in declarations(&fs, "uniform") {
                    if !uniforms.iter().any(|u| u.name == uniform.name) {
                        uniforms.push(uniform);
                    }
                }

                // explicitly bound locations first, then the lowest free ones
                let mut taken: HashSet<u32> = attributes
                    .iter()
                    .filter_map(|a| program.bound_locations.get(&a.name).copied())
                    .collect();
                let mut next_free = 0;

                program.attributes = attributes
                    .into_iter()
                    .map(|a| {
                        let location = match program.bound_locations.get(&a.name) {
                            Some(&location) => location,
                            None => {
                                while taken.contains(&next_free) {
                                    next_free += 1;
                                }

                                taken.insert(next_free);
                                next_free
                            }
                        };

                        (a, location)
                    })
                    .collect();

                program.uniforms = uniforms
                    .into_iter()
                    .map(|u| {
                        let len = u.ty.components() * u.size as usize;
                        let value = if u.ty.is_float() {
                            Value::Float(vec![0.; len])
                        } else {
                            Value::Int(vec![0; len])
                        };

                        (u, value)
                    })
                    .collect();

                program.linked = true;
                program.log.clear();
            }

            (vs, fs) => {
                if vs.is_none() {
                    log.push_str("no compiled vertex shader attached\n");
                }

                if fs.is_none() {
                    log.push_str("no compiled fragment shader attached\n");
                }

                program.linked = false;
                program.attributes.clear();
                program.uniforms.clear();
                program.log = log;
            }
        }
    }

    fn set_uniform(&mut self, location: i32, components: usize, value: Value, matrix: bool) {
        if location == -1 {
            // silently ignored, as the native API does
            return;
        }

        let program = match self.current_program_mut() {
            Some(program) => program,
            None => return,
        };

        let slot = match program.uniforms.get_mut(location as usize) {
            Some(slot) if location >= 0 => slot,
            _ => {
                self.flag(gl::INVALID_OPERATION);
                return;
            }
        };

        let (var, stored) = slot;
        let is_matrix = matches!(
            var.ty,
            ValueType::FloatMat2 | ValueType::FloatMat3 | ValueType::FloatMat4
        );
        let expected = if matrix { components * components } else { components };
        let type_ok = var.ty.components() == expected
            && is_matrix == matrix
            && match value {
                Value::Float(_) => var.ty.is_float() || matches!(var.ty, ValueType::Bool | ValueType::BoolVec2 | ValueType::BoolVec3 | ValueType::BoolVec4),
                Value::Int(_) => !var.ty.is_float(),
            };

        if !type_ok {
            self.flag(gl::INVALID_OPERATION);
            return;
        }

        match (stored, value) {
            (Value::Float(dst), Value::Float(src)) => {
                let n = src.len().min(dst.len());
                dst[..n].copy_from_slice(&src[..n]);
            }

            (Value::Int(dst), Value::Int(src)) => {
                let n = src.len().min(dst.len());
                dst[..n].copy_from_slice(&src[..n]);
            }

            // floats written to a boolean uniform
            (Value::Int(dst), Value::Float(src)) => {
                for (d, s) in dst.iter_mut().zip(src) {
                    *d = (s != 0.) as i32;
                }
            }

            (Value::Float(_), Value::Int(_)) => unreachable!("rejected by the type check"),
        }
    }

    fn uniform_value(&mut self, program: u32, location: i32) -> Option<Value> {
        let value = self
            .programs
            .get(&program)
            .filter(|p| p.linked)
            .and_then(|p| p.uniforms.get(location as usize))
            .filter(|_| location >= 0)
            .map(|(_, value)| value.clone());

        if value.is_none() {
            self.flag(gl::INVALID_OPERATION);
        }

        value
    }

    fn attrib_mut(&mut self, index: u32) -> Option<&mut VertexAttrib> {
        if index as usize >= self.attribs.len() {
            self.flag(gl::INVALID_VALUE);
            return None;
        }

        self.attribs.get_mut(index as usize)
    }

    fn forget_name(&mut self, name: u32) {
        if self.array_buffer == name {
            self.array_buffer = 0;
        }

        if self.element_array_buffer == name {
            self.element_array_buffer = 0;
        }

        for unit in &mut self.texture_units {
            for slot in unit.iter_mut() {
                if *slot == name {
                    *slot = 0;
                }
            }
        }

        if self.framebuffer == name {
            self.framebuffer = 0;
        }

        if self.renderbuffer == name {
            self.renderbuffer = 0;
        }
    }
}

/// Parse the `attribute` or `uniform` declarations of a GLSL ES 1.00 source.
fn declarations(source: &str, qualifier: &str) -> Vec<Variable> {
    let mut vars = Vec::new();

    let code: String = source
        .lines()
        .map(|line| line.split("//").next().unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n");

    for statement in code.split(';') {
        // drop whatever function body precedes the declaration
        let statement = statement.rsplit(|c| c == '{' || c == '}').next().unwrap_or("");
        let mut tokens = statement
            .split_whitespace()
            .filter(|t| !matches!(*t, "lowp" | "mediump" | "highp"));

        if tokens.next() != Some(qualifier) {
            continue;
        }

        let ty = match tokens.next().and_then(ValueType::from_glsl) {
            Some(ty) => ty,
            None => continue,
        };

        for declarator in tokens.collect::<String>().split(',') {
            let declarator = declarator.trim();

            let (name, size) = match declarator.find('[') {
                Some(open) => {
                    let size = declarator[open + 1..]
                        .trim_end_matches(']')
                        .parse()
                        .unwrap_or(1);
                    (&declarator[..open], size)
                }

                None => (declarator, 1),
            };

            if !name.is_empty() {
                vars.push(Variable {
                    name: name.to_owned(),
                    ty,
                    size,
                });
            }
        }
    }

    vars
}

/// An in-memory [`Driver`].
#[derive(Clone, Debug, Default)]
pub struct MockDriver {
    gl: Rc<RefCell<MockGl>>,
}

impl MockDriver {
    /// Create a driver in the default OpenGL ES 2.0 state.
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, call: &'static str, f: impl FnOnce(&mut MockGl) -> R) -> R {
        let mut mock = self.gl.borrow_mut();
        mock.calls.push(call);
        f(&mut mock)
    }

    /// Number of times the named entry point was called (e.g. `"delete_texture"`).
    pub fn calls(&self, entry_point: &str) -> usize {
        self.gl
            .borrow()
            .calls
            .iter()
            .filter(|c| **c == entry_point)
            .count()
    }

    /// Every recorded entry point call, in order.
    pub fn call_log(&self) -> Vec<&'static str> {
        self.gl.borrow().calls.clone()
    }

    /// Forget the recorded calls.
    pub fn clear_call_log(&self) {
        self.gl.borrow_mut().calls.clear();
    }

    /// Number of delete calls that reached the driver for an object name.
    pub fn delete_count(&self, name: u32) -> usize {
        self.gl.borrow().deletes.get(&name).copied().unwrap_or(0)
    }

    /// Whether an object name is currently allocated.
    pub fn is_live(&self, name: u32) -> bool {
        let mock = self.gl.borrow();

        mock.buffers.contains_key(&name)
            || mock.textures.contains_key(&name)
            || mock.framebuffers.contains_key(&name)
            || mock.renderbuffers.contains_key(&name)
            || mock.shaders.contains_key(&name)
            || mock.programs.contains_key(&name)
    }

    /// Raise a driver error, as if the last call had failed.
    pub fn raise_error(&self, code: u32) {
        self.gl.borrow_mut().flag(code);
    }

    /// Make every following object creation fail.
    pub fn fail_creation(&self, fail: bool) {
        self.gl.borrow_mut().fail_creation = fail;
    }

    /// Contents of a buffer object.
    pub fn buffer_contents(&self, buffer: u32) -> Option<Vec<u8>> {
        self.gl.borrow().buffers.get(&buffer).map(|b| b.data.clone())
    }

    /// Size of a texture image, if it was specified.
    pub fn texture_image_size(&self, texture: u32, target: u32, level: i32) -> Option<(i32, i32)> {
        self.gl
            .borrow()
            .textures
            .get(&texture)
            .and_then(|t| t.levels.get(&(target, level)))
            .copied()
    }
}

impl Driver for MockDriver {
    fn get_error(&mut self) -> u32 {
        self.with("get_error", |mock| {
            std::mem::replace(&mut mock.error, gl::NO_ERROR)
        })
    }

    fn get_parameter_i32(&mut self, pname: u32) -> i32 {
        self.with("get_parameter_i32", |mock| match pname {
            gl::MAX_TEXTURE_SIZE | gl::MAX_CUBE_MAP_TEXTURE_SIZE | gl::MAX_RENDERBUFFER_SIZE => {
                MAX_TEXTURE_SIZE
            }
            gl::MAX_VERTEX_ATTRIBS => MAX_VERTEX_ATTRIBS as i32,
            gl::MAX_COMBINED_TEXTURE_IMAGE_UNITS | gl::MAX_TEXTURE_IMAGE_UNITS => {
                MAX_TEXTURE_UNITS as i32
            }
            gl::MAX_VERTEX_TEXTURE_IMAGE_UNITS => 0,
            gl::MAX_VERTEX_UNIFORM_VECTORS => 128,
            gl::MAX_FRAGMENT_UNIFORM_VECTORS => 16,
            gl::MAX_VARYING_VECTORS => 8,
            gl::ACTIVE_TEXTURE => (gl::TEXTURE0 + mock.active_unit as u32) as i32,
            gl::CURRENT_PROGRAM => mock.program as i32,
            gl::ARRAY_BUFFER_BINDING => mock.array_buffer as i32,
            gl::ELEMENT_ARRAY_BUFFER_BINDING => mock.element_array_buffer as i32,
            gl::TEXTURE_BINDING_2D => mock.texture_units[mock.active_unit][0] as i32,
            gl::TEXTURE_BINDING_CUBE_MAP => mock.texture_units[mock.active_unit][1] as i32,
            gl::FRAMEBUFFER_BINDING => mock.framebuffer as i32,
            gl::RENDERBUFFER_BINDING => mock.renderbuffer as i32,
            gl::DEPTH_FUNC => mock.depth_func as i32,
            gl::DEPTH_WRITEMASK => mock.depth_mask as i32,
            gl::CULL_FACE_MODE => mock.cull_face as i32,
            gl::FRONT_FACE => mock.front_face as i32,
            gl::BLEND_EQUATION_RGB => mock.blend_equations[0] as i32,
            gl::BLEND_EQUATION_ALPHA => mock.blend_equations[1] as i32,
            gl::BLEND_SRC_RGB => mock.blend_funcs[0] as i32,
            gl::BLEND_DST_RGB => mock.blend_funcs[1] as i32,
            gl::BLEND_SRC_ALPHA => mock.blend_funcs[2] as i32,
            gl::BLEND_DST_ALPHA => mock.blend_funcs[3] as i32,
            gl::STENCIL_CLEAR_VALUE => mock.clear_stencil,
            gl::PACK_ALIGNMENT => mock.pack_alignment,
            gl::UNPACK_ALIGNMENT => mock.unpack_alignment,
            gl::GENERATE_MIPMAP_HINT => mock.mipmap_hint as i32,
            _ => {
                mock.flag(gl::INVALID_ENUM);
                0
            }
        })
    }

    fn get_parameter_i32_slice(&mut self, pname: u32, out: &mut [i32]) {
        let value = match pname {
            gl::VIEWPORT => self.with("get_parameter_i32_slice", |mock| mock.viewport),
            gl::SCISSOR_BOX => self.with("get_parameter_i32_slice", |mock| mock.scissor_box),
            gl::MAX_VIEWPORT_DIMS => [MAX_TEXTURE_SIZE, MAX_TEXTURE_SIZE, 0, 0],
            gl::COLOR_WRITEMASK => self.with("get_parameter_i32_slice", |mock| {
                let m = mock.color_mask;
                [m[0] as i32, m[1] as i32, m[2] as i32, m[3] as i32]
            }),
            _ => [self.get_parameter_i32(pname), 0, 0, 0],
        };

        for (o, v) in out.iter_mut().zip(value.iter()) {
            *o = *v;
        }
    }

    fn get_parameter_f32_slice(&mut self, pname: u32, out: &mut [f32]) {
        let value = self.with("get_parameter_f32_slice", |mock| match pname {
            gl::COLOR_CLEAR_VALUE => mock.clear_color,
            gl::BLEND_COLOR => mock.blend_color,
            gl::DEPTH_RANGE => [mock.depth_range[0], mock.depth_range[1], 0., 0.],
            gl::DEPTH_CLEAR_VALUE => [mock.clear_depth, 0., 0., 0.],
            gl::LINE_WIDTH => [mock.line_width, 0., 0., 0.],
            _ => {
                mock.flag(gl::INVALID_ENUM);
                [0.; 4]
            }
        });

        for (o, v) in out.iter_mut().zip(value.iter()) {
            *o = *v;
        }
    }

    fn get_parameter_string(&mut self, pname: u32) -> String {
        self.with("get_parameter_string", |mock| match pname {
            gl::VENDOR => "gles2-glow".to_owned(),
            gl::RENDERER => "in-memory mock".to_owned(),
            gl::VERSION => "OpenGL ES 2.0 mock".to_owned(),
            gl::SHADING_LANGUAGE_VERSION => "OpenGL ES GLSL ES 1.00 mock".to_owned(),
            gl::EXTENSIONS => "GL_OES_mock_objects".to_owned(),
            _ => {
                mock.flag(gl::INVALID_ENUM);
                String::new()
            }
        })
    }

    fn enable(&mut self, cap: u32) {
        self.with("enable", |mock| match Capability::from_gl(cap) {
            Some(_) => {
                mock.capabilities.insert(cap);
            }
            None => mock.flag(gl::INVALID_ENUM),
        })
    }

    fn disable(&mut self, cap: u32) {
        self.with("disable", |mock| match Capability::from_gl(cap) {
            Some(_) => {
                mock.capabilities.remove(&cap);
            }
            None => mock.flag(gl::INVALID_ENUM),
        })
    }

    fn is_enabled(&mut self, cap: u32) -> bool {
        self.with("is_enabled", |mock| match Capability::from_gl(cap) {
            Some(_) => mock.capabilities.contains(&cap),
            None => {
                mock.flag(gl::INVALID_ENUM);
                false
            }
        })
    }

    fn hint(&mut self, target: u32, mode: u32) {
        self.with("hint", |mock| {
            match (HintTarget::from_gl(target), HintMode::from_gl(mode)) {
                (Some(_), Some(_)) => mock.mipmap_hint = mode,
                _ => mock.flag(gl::INVALID_ENUM),
            }
        })
    }

    fn pixel_store_i32(&mut self, pname: u32, param: i32) {
        self.with("pixel_store_i32", |mock| {
            if !matches!(param, 1 | 2 | 4 | 8) {
                mock.flag(gl::INVALID_VALUE);
                return;
            }

            match PixelStore::from_gl(pname) {
                Some(PixelStore::PackAlignment) => mock.pack_alignment = param,
                Some(PixelStore::UnpackAlignment) => mock.unpack_alignment = param,
                None => mock.flag(gl::INVALID_ENUM),
            }
        })
    }

    fn flush(&mut self) {
        self.with("flush", |_| ())
    }

    fn finish(&mut self) {
        self.with("finish", |_| ())
    }

    fn clear(&mut self, mask: u32) {
        self.with("clear", |mock| {
            let valid = gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT | gl::STENCIL_BUFFER_BIT;

            if mask & !valid != 0 {
                mock.flag(gl::INVALID_VALUE);
            } else if mask & gl::COLOR_BUFFER_BIT != 0 {
                let c = mock.clear_color;
                let to_byte = |x: f32| (x.max(0.).min(1.) * 255.).round() as u8;
                mock.color_buffer = [to_byte(c[0]), to_byte(c[1]), to_byte(c[2]), to_byte(c[3])];
            }
        })
    }

    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.with("clear_color", |mock| {
            mock.clear_color = [red, green, blue, alpha].map(|x| x.max(0.).min(1.))
        })
    }

    fn clear_depth(&mut self, depth: f32) {
        self.with("clear_depth", |mock| mock.clear_depth = depth.max(0.).min(1.))
    }

    fn clear_stencil(&mut self, stencil: i32) {
        self.with("clear_stencil", |mock| mock.clear_stencil = stencil)
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.with("viewport", |mock| {
            if width < 0 || height < 0 {
                mock.flag(gl::INVALID_VALUE);
            } else {
                mock.viewport = [x, y, width, height];
            }
        })
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.with("scissor", |mock| {
            if width < 0 || height < 0 {
                mock.flag(gl::INVALID_VALUE);
            } else {
                mock.scissor_box = [x, y, width, height];
            }
        })
    }

    fn depth_range(&mut self, near: f32, far: f32) {
        self.with("depth_range", |mock| {
            mock.depth_range = [near.max(0.).min(1.), far.max(0.).min(1.)]
        })
    }

    fn color_mask(&mut self, red: bool, green: bool, blue: bool, alpha: bool) {
        self.with("color_mask", |mock| mock.color_mask = [red, green, blue, alpha])
    }

    fn depth_mask(&mut self, flag: bool) {
        self.with("depth_mask", |mock| mock.depth_mask = flag)
    }

    fn depth_func(&mut self, func: u32) {
        self.with("depth_func", |mock| match CompareFunc::from_gl(func) {
            Some(_) => mock.depth_func = func,
            None => mock.flag(gl::INVALID_ENUM),
        })
    }

    fn stencil_func_separate(&mut self, face: u32, func: u32, _reference: i32, _mask: u32) {
        self.with("stencil_func_separate", |mock| {
            if Face::from_gl(face).is_none() || CompareFunc::from_gl(func).is_none() {
                mock.flag(gl::INVALID_ENUM);
            }
        })
    }

    fn stencil_op_separate(&mut self, face: u32, fail: u32, depth_fail: u32, pass: u32) {
        self.with("stencil_op_separate", |mock| {
            let ops_ok = [fail, depth_fail, pass]
                .iter()
                .all(|op| StencilOp::from_gl(*op).is_some());

            if Face::from_gl(face).is_none() || !ops_ok {
                mock.flag(gl::INVALID_ENUM);
            }
        })
    }

    fn stencil_mask_separate(&mut self, face: u32, _mask: u32) {
        self.with("stencil_mask_separate", |mock| {
            if Face::from_gl(face).is_none() {
                mock.flag(gl::INVALID_ENUM);
            }
        })
    }

    fn blend_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.with("blend_color", |mock| {
            mock.blend_color = [red, green, blue, alpha].map(|x| x.max(0.).min(1.))
        })
    }

    fn blend_equation_separate(&mut self, rgb: u32, alpha: u32) {
        self.with("blend_equation_separate", |mock| {
            match (BlendEquation::from_gl(rgb), BlendEquation::from_gl(alpha)) {
                (Some(_), Some(_)) => mock.blend_equations = [rgb, alpha],
                _ => mock.flag(gl::INVALID_ENUM),
            }
        })
    }

    fn blend_func_separate(&mut self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32) {
        self.with("blend_func_separate", |mock| {
            let funcs = [src_rgb, dst_rgb, src_alpha, dst_alpha];

            if funcs.iter().all(|f| BlendFactor::from_gl(*f).is_some()) {
                mock.blend_funcs = funcs;
            } else {
                mock.flag(gl::INVALID_ENUM);
            }
        })
    }

    fn cull_face(&mut self, face: u32) {
        self.with("cull_face", |mock| match Face::from_gl(face) {
            Some(_) => mock.cull_face = face,
            None => mock.flag(gl::INVALID_ENUM),
        })
    }

    fn front_face(&mut self, mode: u32) {
        self.with("front_face", |mock| match FrontFace::from_gl(mode) {
            Some(_) => mock.front_face = mode,
            None => mock.flag(gl::INVALID_ENUM),
        })
    }

    fn line_width(&mut self, width: f32) {
        self.with("line_width", |mock| {
            if width <= 0. {
                mock.flag(gl::INVALID_VALUE);
            } else {
                mock.line_width = width;
            }
        })
    }

    fn polygon_offset(&mut self, _factor: f32, _units: f32) {
        self.with("polygon_offset", |_| ())
    }

    fn sample_coverage(&mut self, _value: f32, _invert: bool) {
        self.with("sample_coverage", |_| ())
    }

    fn draw_arrays(&mut self, mode: u32, first: i32, count: i32) {
        self.with("draw_arrays", |mock| {
            if PrimitiveType::from_gl(mode).is_none() {
                mock.flag(gl::INVALID_ENUM);
            } else if first < 0 || count < 0 {
                mock.flag(gl::INVALID_VALUE);
            } else if mock.framebuffer_status() != gl::FRAMEBUFFER_COMPLETE {
                mock.flag(gl::INVALID_FRAMEBUFFER_OPERATION);
            }
        })
    }

    fn draw_elements(&mut self, mode: u32, count: i32, ty: u32, _offset: i32) {
        self.with("draw_elements", |mock| {
            if PrimitiveType::from_gl(mode).is_none() || IndexType::from_gl(ty).is_none() {
                mock.flag(gl::INVALID_ENUM);
            } else if count < 0 {
                mock.flag(gl::INVALID_VALUE);
            } else if mock.framebuffer_status() != gl::FRAMEBUFFER_COMPLETE {
                mock.flag(gl::INVALID_FRAMEBUFFER_OPERATION);
            }
        })
    }

    fn read_pixels(
        &mut self,
        _x: i32,
        _y: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: &mut [u8],
    ) {
        self.with("read_pixels", |mock| {
            let needed = match mock.image_size(format, ty, width, height, mock.pack_alignment) {
                Some(needed) => needed,
                None => return,
            };

            if pixels.len() < needed {
                mock.flag(gl::INVALID_VALUE);
                return;
            }

            if format == gl::RGBA && ty == gl::UNSIGNED_BYTE {
                for texel in pixels[..needed].chunks_mut(4) {
                    texel.copy_from_slice(&mock.color_buffer);
                }
            } else {
                for byte in &mut pixels[..needed] {
                    *byte = 0;
                }
            }
        })
    }

    fn create_buffer(&mut self) -> Result<u32, String> {
        self.with("create_buffer", |mock| {
            let name = mock.gen_name()?;
            mock.buffers.insert(name, BufferObject::default());
            Ok(name)
        })
    }

    fn delete_buffer(&mut self, buffer: u32) {
        self.with("delete_buffer", |mock| {
            if mock.record_delete(buffer) && mock.buffers.remove(&buffer).is_some() {
                mock.forget_name(buffer);
            }
        })
    }

    fn bind_buffer(&mut self, target: u32, buffer: u32) {
        self.with("bind_buffer", |mock| {
            if buffer != 0 && !mock.buffers.contains_key(&buffer) {
                mock.flag(gl::INVALID_OPERATION);
                return;
            }

            match target {
                gl::ARRAY_BUFFER => mock.array_buffer = buffer,
                gl::ELEMENT_ARRAY_BUFFER => mock.element_array_buffer = buffer,
                _ => mock.flag(gl::INVALID_ENUM),
            }
        })
    }

    fn buffer_data_size(&mut self, target: u32, size: i32, usage: u32) {
        self.with("buffer_data_size", |mock| {
            if size < 0 {
                mock.flag(gl::INVALID_VALUE);
                return;
            }

            if let Some(name) = mock.bound_buffer(target) {
                let buffer = mock.buffers.entry(name).or_default();
                buffer.data = vec![0; size as usize];
                buffer.usage = usage;
            }
        })
    }

    fn buffer_data(&mut self, target: u32, data: &[u8], usage: u32) {
        self.with("buffer_data", |mock| {
            if let Some(name) = mock.bound_buffer(target) {
                let buffer = mock.buffers.entry(name).or_default();
                buffer.data = data.to_vec();
                buffer.usage = usage;
            }
        })
    }

    fn buffer_sub_data(&mut self, target: u32, offset: i32, data: &[u8]) {
        self.with("buffer_sub_data", |mock| {
            if let Some(name) = mock.bound_buffer(target) {
                let buffer = mock.buffers.entry(name).or_default();
                let end = offset as usize + data.len();

                if offset < 0 || end > buffer.data.len() {
                    mock.flag(gl::INVALID_VALUE);
                } else {
                    buffer.data[offset as usize..end].copy_from_slice(data);
                }
            }
        })
    }

    fn create_texture(&mut self) -> Result<u32, String> {
        self.with("create_texture", |mock| {
            let name = mock.gen_name()?;
            mock.textures.insert(name, TextureObject::default());
            Ok(name)
        })
    }

    fn delete_texture(&mut self, texture: u32) {
        self.with("delete_texture", |mock| {
            if mock.record_delete(texture) && mock.textures.remove(&texture).is_some() {
                mock.forget_name(texture);
            }
        })
    }

    fn bind_texture(&mut self, target: u32, texture: u32) {
        self.with("bind_texture", |mock| {
            let slot = match MockGl::slot(target) {
                Some(slot) => slot,
                None => return mock.flag(gl::INVALID_ENUM),
            };

            if texture != 0 {
                match mock.textures.get_mut(&texture) {
                    Some(tex) if tex.target == 0 || tex.target == target => tex.target = target,
                    _ => return mock.flag(gl::INVALID_OPERATION),
                }
            }

            let unit = mock.active_unit;
            mock.texture_units[unit][slot] = texture;
        })
    }

    fn active_texture(&mut self, unit: u32) {
        self.with("active_texture", |mock| {
            let index = unit.wrapping_sub(gl::TEXTURE0) as usize;

            if index < mock.texture_units.len() {
                mock.active_unit = index;
            } else {
                mock.flag(gl::INVALID_ENUM);
            }
        })
    }

    fn tex_parameter_i32(&mut self, target: u32, pname: u32, value: i32) {
        self.with("tex_parameter_i32", |mock| {
            let valid = match pname {
                gl::TEXTURE_MIN_FILTER => {
                    MinFilter::from_gl(value as u32).is_some()
                }
                gl::TEXTURE_MAG_FILTER => {
                    MagFilter::from_gl(value as u32).is_some()
                }
                gl::TEXTURE_WRAP_S | gl::TEXTURE_WRAP_T => {
                    WrapMode::from_gl(value as u32).is_some()
                }
                _ => false,
            };

            if !valid {
                return mock.flag(gl::INVALID_ENUM);
            }

            if let Some(name) = mock.bound_texture(target) {
                if let Some(tex) = mock.textures.get_mut(&name) {
                    tex.params.insert(pname, value);
                }
            }
        })
    }

    fn get_tex_parameter_i32(&mut self, target: u32, pname: u32) -> i32 {
        self.with("get_tex_parameter_i32", |mock| {
            let default = match pname {
                gl::TEXTURE_MIN_FILTER => gl::NEAREST_MIPMAP_LINEAR,
                gl::TEXTURE_MAG_FILTER => gl::LINEAR,
                gl::TEXTURE_WRAP_S | gl::TEXTURE_WRAP_T => gl::REPEAT,
                _ => {
                    mock.flag(gl::INVALID_ENUM);
                    return 0;
                }
            };

            mock.bound_texture(target)
                .and_then(|name| mock.textures.get(&name))
                .map_or(0, |tex| {
                    tex.params.get(&pname).copied().unwrap_or(default as i32)
                })
        })
    }

    fn tex_image_2d(
        &mut self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: Option<&[u8]>,
    ) {
        self.with("tex_image_2d", |mock| {
            let image = match ImageTarget::from_gl(target) {
                Some(image) => image,
                None => return mock.flag(gl::INVALID_ENUM),
            };

            if internal_format as u32 != format {
                return mock.flag(gl::INVALID_OPERATION);
            }

            if level < 0 || width < 0 || height < 0 || width > MAX_TEXTURE_SIZE || height > MAX_TEXTURE_SIZE {
                return mock.flag(gl::INVALID_VALUE);
            }

            let needed = match mock.image_size(format, ty, width, height, mock.unpack_alignment) {
                Some(needed) => needed,
                None => return,
            };

            if pixels.map_or(false, |p| p.len() < needed) {
                return mock.flag(gl::INVALID_VALUE);
            }

            if let Some(name) = mock.bound_texture(image.kind().to_gl()) {
                if let Some(tex) = mock.textures.get_mut(&name) {
                    tex.levels.insert((target, level), (width, height));
                }
            }
        })
    }

    fn tex_sub_image_2d(
        &mut self,
        target: u32,
        level: i32,
        x_offset: i32,
        y_offset: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: &[u8],
    ) {
        self.with("tex_sub_image_2d", |mock| {
            let image = match ImageTarget::from_gl(target) {
                Some(image) => image,
                None => return mock.flag(gl::INVALID_ENUM),
            };

            let needed = match mock.image_size(format, ty, width, height, mock.unpack_alignment) {
                Some(needed) => needed,
                None => return,
            };

            if pixels.len() < needed {
                return mock.flag(gl::INVALID_VALUE);
            }

            let name = match mock.bound_texture(image.kind().to_gl()) {
                Some(name) => name,
                None => return,
            };

            let fits = mock
                .textures
                .get(&name)
                .and_then(|tex| tex.levels.get(&(target, level)))
                .map_or(false, |&(w, h)| {
                    x_offset >= 0
                        && y_offset >= 0
                        && x_offset + width <= w
                        && y_offset + height <= h
                });

            if !fits {
                mock.flag(gl::INVALID_VALUE);
            }
        })
    }

    fn copy_tex_image_2d(
        &mut self,
        target: u32,
        level: i32,
        internal_format: u32,
        _x: i32,
        _y: i32,
        width: i32,
        height: i32,
    ) {
        self.with("copy_tex_image_2d", |mock| {
            let image = match ImageTarget::from_gl(target) {
                Some(image) => image,
                None => return mock.flag(gl::INVALID_ENUM),
            };

            if PixelFormat::from_gl(internal_format).is_none() {
                return mock.flag(gl::INVALID_ENUM);
            }

            if mock.framebuffer_status() != gl::FRAMEBUFFER_COMPLETE {
                return mock.flag(gl::INVALID_FRAMEBUFFER_OPERATION);
            }

            if let Some(name) = mock.bound_texture(image.kind().to_gl()) {
                if let Some(tex) = mock.textures.get_mut(&name) {
                    tex.levels.insert((target, level), (width, height));
                }
            }
        })
    }

    fn copy_tex_sub_image_2d(
        &mut self,
        target: u32,
        level: i32,
        x_offset: i32,
        y_offset: i32,
        _x: i32,
        _y: i32,
        width: i32,
        height: i32,
    ) {
        self.with("copy_tex_sub_image_2d", |mock| {
            let image = match ImageTarget::from_gl(target) {
                Some(image) => image,
                None => return mock.flag(gl::INVALID_ENUM),
            };

            let name = match mock.bound_texture(image.kind().to_gl()) {
                Some(name) => name,
                None => return,
            };

            let fits = mock
                .textures
                .get(&name)
                .and_then(|tex| tex.levels.get(&(target, level)))
                .map_or(false, |&(w, h)| x_offset + width <= w && y_offset + height <= h);

            if !fits {
                mock.flag(gl::INVALID_VALUE);
            }
        })
    }

    fn generate_mipmap(&mut self, target: u32) {
        self.with("generate_mipmap", |mock| {
            let name = match mock.bound_texture(target) {
                Some(name) => name,
                None => return,
            };

            let base = if target == gl::TEXTURE_2D {
                gl::TEXTURE_2D
            } else {
                gl::TEXTURE_CUBE_MAP_POSITIVE_X
            };

            let has_base = mock
                .textures
                .get(&name)
                .map_or(false, |tex| tex.levels.contains_key(&(base, 0)));

            if !has_base {
                mock.flag(gl::INVALID_OPERATION);
            }
        })
    }

    fn create_framebuffer(&mut self) -> Result<u32, String> {
        self.with("create_framebuffer", |mock| {
            let name = mock.gen_name()?;
            mock.framebuffers.insert(name, FramebufferObject::default());
            Ok(name)
        })
    }

    fn delete_framebuffer(&mut self, framebuffer: u32) {
        self.with("delete_framebuffer", |mock| {
            if mock.record_delete(framebuffer) && mock.framebuffers.remove(&framebuffer).is_some() {
                mock.forget_name(framebuffer);
            }
        })
    }

    fn bind_framebuffer(&mut self, framebuffer: u32) {
        self.with("bind_framebuffer", |mock| {
            if framebuffer != 0 && !mock.framebuffers.contains_key(&framebuffer) {
                mock.flag(gl::INVALID_OPERATION);
            } else {
                mock.framebuffer = framebuffer;
            }
        })
    }

    fn framebuffer_texture_2d(&mut self, attachment: u32, target: u32, texture: u32, level: i32) {
        self.with("framebuffer_texture_2d", |mock| {
            if mock.framebuffer == 0 {
                return mock.flag(gl::INVALID_OPERATION);
            }

            if ImageTarget::from_gl(target).is_none() {
                return mock.flag(gl::INVALID_ENUM);
            }

            let fb = mock.framebuffer;
            let attachments = &mut mock.framebuffers.entry(fb).or_default().attachments;

            if texture == 0 {
                attachments.remove(&attachment);
            } else {
                attachments.insert(
                    attachment,
                    Attachment::Texture {
                        name: texture,
                        target,
                        level,
                    },
                );
            }
        })
    }

    fn framebuffer_renderbuffer(&mut self, attachment: u32, renderbuffer: u32) {
        self.with("framebuffer_renderbuffer", |mock| {
            if mock.framebuffer == 0 {
                return mock.flag(gl::INVALID_OPERATION);
            }

            let fb = mock.framebuffer;
            let attachments = &mut mock.framebuffers.entry(fb).or_default().attachments;

            if renderbuffer == 0 {
                attachments.remove(&attachment);
            } else {
                attachments.insert(attachment, Attachment::Renderbuffer(renderbuffer));
            }
        })
    }

    fn check_framebuffer_status(&mut self) -> u32 {
        self.with("check_framebuffer_status", |mock| mock.framebuffer_status())
    }

    fn create_renderbuffer(&mut self) -> Result<u32, String> {
        self.with("create_renderbuffer", |mock| {
            let name = mock.gen_name()?;
            mock.renderbuffers.insert(name, RenderbufferObject::default());
            Ok(name)
        })
    }

    fn delete_renderbuffer(&mut self, renderbuffer: u32) {
        self.with("delete_renderbuffer", |mock| {
            if mock.record_delete(renderbuffer) && mock.renderbuffers.remove(&renderbuffer).is_some() {
                mock.forget_name(renderbuffer);
            }
        })
    }

    fn bind_renderbuffer(&mut self, renderbuffer: u32) {
        self.with("bind_renderbuffer", |mock| {
            if renderbuffer != 0 && !mock.renderbuffers.contains_key(&renderbuffer) {
                mock.flag(gl::INVALID_OPERATION);
            } else {
                mock.renderbuffer = renderbuffer;
            }
        })
    }

    fn renderbuffer_storage(&mut self, internal_format: u32, width: i32, height: i32) {
        self.with("renderbuffer_storage", |mock| {
            if RenderbufferFormat::from_gl(internal_format).is_none() {
                return mock.flag(gl::INVALID_ENUM);
            }

            if width < 0 || height < 0 || width > MAX_TEXTURE_SIZE || height > MAX_TEXTURE_SIZE {
                return mock.flag(gl::INVALID_VALUE);
            }

            let name = mock.renderbuffer;

            match mock.renderbuffers.get_mut(&name) {
                Some(rb) if name != 0 => {
                    rb.format = internal_format;
                    rb.width = width;
                    rb.height = height;
                }
                _ => mock.flag(gl::INVALID_OPERATION),
            }
        })
    }

    fn create_shader(&mut self, kind: u32) -> Result<u32, String> {
        self.with("create_shader", |mock| {
            if kind != gl::VERTEX_SHADER && kind != gl::FRAGMENT_SHADER {
                mock.flag(gl::INVALID_ENUM);
                return Err(format!("invalid shader type {:#x}", kind));
            }

            let name = mock.gen_name()?;
            mock.shaders.insert(
                name,
                ShaderObject {
                    kind,
                    source: String::new(),
                    compiled: false,
                    log: String::new(),
                },
            );

            Ok(name)
        })
    }

    fn delete_shader(&mut self, shader: u32) {
        self.with("delete_shader", |mock| {
            if mock.record_delete(shader) {
                mock.shaders.remove(&shader);
            }
        })
    }

    fn shader_source(&mut self, shader: u32, source: &str) {
        self.with("shader_source", |mock| match mock.shaders.get_mut(&shader) {
            Some(s) => s.source = source.to_owned(),
            None => mock.flag(gl::INVALID_VALUE),
        })
    }

    fn compile_shader(&mut self, shader: u32) {
        self.with("compile_shader", |mock| {
            let s = match mock.shaders.get_mut(&shader) {
                Some(s) => s,
                None => return mock.flag(gl::INVALID_VALUE),
            };

            let error_line = s
                .source
                .lines()
                .enumerate()
                .find(|(_, line)| line.trim_start().starts_with("#error"));

            match error_line {
                Some((i, line)) => {
                    let message = line.trim_start().trim_start_matches("#error").trim();
                    s.compiled = false;
                    s.log = format!("ERROR: 0:{}: '#error' : {}", i + 1, message);
                }

                None if s.source.trim().is_empty() => {
                    s.compiled = false;
                    s.log = "ERROR: 0:0: empty shader source".to_owned();
                }

                None => {
                    s.compiled = true;
                    s.log.clear();
                }
            }
        })
    }

    fn get_shader_compile_status(&mut self, shader: u32) -> bool {
        self.with("get_shader_compile_status", |mock| {
            mock.shaders.get(&shader).map_or(false, |s| s.compiled)
        })
    }

    fn get_shader_info_log(&mut self, shader: u32) -> String {
        self.with("get_shader_info_log", |mock| {
            mock.shaders
                .get(&shader)
                .map(|s| s.log.clone())
                .unwrap_or_default()
        })
    }

    fn create_program(&mut self) -> Result<u32, String> {
        self.with("create_program", |mock| {
            let name = mock.gen_name()?;
            mock.programs.insert(name, ProgramObject::default());
            Ok(name)
        })
    }

    fn delete_program(&mut self, program: u32) {
        self.with("delete_program", |mock| {
            if mock.record_delete(program) && mock.programs.remove(&program).is_some() {
                if mock.program == program {
                    mock.program = 0;
                }
            }
        })
    }

    fn attach_shader(&mut self, program: u32, shader: u32) {
        self.with("attach_shader", |mock| {
            if !mock.shaders.contains_key(&shader) {
                return mock.flag(gl::INVALID_VALUE);
            }

            match mock.programs.get_mut(&program) {
                Some(p) if p.attached.contains(&shader) => mock.flag(gl::INVALID_OPERATION),
                Some(p) => p.attached.push(shader),
                None => mock.flag(gl::INVALID_VALUE),
            }
        })
    }

    fn detach_shader(&mut self, program: u32, shader: u32) {
        self.with("detach_shader", |mock| match mock.programs.get_mut(&program) {
            Some(p) if p.attached.contains(&shader) => p.attached.retain(|s| *s != shader),
            Some(_) => mock.flag(gl::INVALID_OPERATION),
            None => mock.flag(gl::INVALID_VALUE),
        })
    }

    fn link_program(&mut self, program: u32) {
        self.with("link_program", |mock| mock.link(program))
    }

    fn get_program_link_status(&mut self, program: u32) -> bool {
        self.with("get_program_link_status", |mock| {
            mock.programs.get(&program).map_or(false, |p| p.linked)
        })
    }

    fn validate_program(&mut self, program: u32) {
        self.with("validate_program", |mock| match mock.programs.get_mut(&program) {
            Some(p) => {
                p.validated = p.linked;

                if !p.linked {
                    p.log = "program is not successfully linked".to_owned();
                }
            }
            None => mock.flag(gl::INVALID_VALUE),
        })
    }

    fn get_program_validate_status(&mut self, program: u32) -> bool {
        self.with("get_program_validate_status", |mock| {
            mock.programs.get(&program).map_or(false, |p| p.validated)
        })
    }

    fn get_program_info_log(&mut self, program: u32) -> String {
        self.with("get_program_info_log", |mock| {
            mock.programs
                .get(&program)
                .map(|p| p.log.clone())
                .unwrap_or_default()
        })
    }

    fn use_program(&mut self, program: u32) {
        self.with("use_program", |mock| {
            if program == 0 {
                mock.program = 0;
                return;
            }

            match mock.programs.get(&program) {
                Some(p) if p.linked => mock.program = program,
                Some(_) => mock.flag(gl::INVALID_OPERATION),
                None => mock.flag(gl::INVALID_VALUE),
            }
        })
    }

    fn get_active_attributes(&mut self, program: u32) -> u32 {
        self.with("get_active_attributes", |mock| {
            mock.programs
                .get(&program)
                .map_or(0, |p| p.attributes.len() as u32)
        })
    }

    fn get_active_attribute(&mut self, program: u32, index: u32) -> Option<ActiveInfo> {
        self.with("get_active_attribute", |mock| {
            let info = mock
                .programs
                .get(&program)
                .and_then(|p| p.attributes.get(index as usize))
                .map(|(var, _)| ActiveInfo {
                    name: var.name.clone(),
                    size: var.size,
                    ty: var.ty.to_gl(),
                });

            if info.is_none() {
                mock.flag(gl::INVALID_VALUE);
            }

            info
        })
    }

    fn get_active_uniforms(&mut self, program: u32) -> u32 {
        self.with("get_active_uniforms", |mock| {
            mock.programs
                .get(&program)
                .map_or(0, |p| p.uniforms.len() as u32)
        })
    }

    fn get_active_uniform(&mut self, program: u32, index: u32) -> Option<ActiveInfo> {
        self.with("get_active_uniform", |mock| {
            let info = mock
                .programs
                .get(&program)
                .and_then(|p| p.uniforms.get(index as usize))
                .map(|(var, _)| ActiveInfo {
                    name: var.name.clone(),
                    size: var.size,
                    ty: var.ty.to_gl(),
                });

            if info.is_none() {
                mock.flag(gl::INVALID_VALUE);
            }

            info
        })
    }

    fn get_attrib_location(&mut self, program: u32, name: &str) -> i32 {
        self.with("get_attrib_location", |mock| match mock.programs.get(&program) {
            Some(p) if p.linked => p
                .attributes
                .iter()
                .find(|(var, _)| var.name == name)
                .map_or(-1, |(_, location)| *location as i32),
            Some(_) => {
                mock.flag(gl::INVALID_OPERATION);
                -1
            }
            None => {
                mock.flag(gl::INVALID_VALUE);
                -1
            }
        })
    }

    fn bind_attrib_location(&mut self, program: u32, index: u32, name: &str) {
        self.with("bind_attrib_location", |mock| {
            if index as usize >= MAX_VERTEX_ATTRIBS {
                return mock.flag(gl::INVALID_VALUE);
            }

            match mock.programs.get_mut(&program) {
                Some(p) => {
                    p.bound_locations.insert(name.to_owned(), index);
                }
                None => mock.flag(gl::INVALID_VALUE),
            }
        })
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        self.with("enable_vertex_attrib_array", |mock| {
            if let Some(attrib) = mock.attrib_mut(index) {
                attrib.enabled = true;
            }
        })
    }

    fn disable_vertex_attrib_array(&mut self, index: u32) {
        self.with("disable_vertex_attrib_array", |mock| {
            if let Some(attrib) = mock.attrib_mut(index) {
                attrib.enabled = false;
            }
        })
    }

    fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        size: i32,
        ty: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.with("vertex_attrib_pointer", |mock| {
            if DataType::from_gl(ty).is_none() {
                return mock.flag(gl::INVALID_ENUM);
            }

            if !(1..=4).contains(&size) || stride < 0 {
                return mock.flag(gl::INVALID_VALUE);
            }

            let buffer = mock.array_buffer;

            if let Some(attrib) = mock.attrib_mut(index) {
                attrib.size = size;
                attrib.ty = ty;
                attrib.normalized = normalized;
                attrib.stride = stride;
                attrib.offset = offset;
                attrib.buffer = buffer;
            }
        })
    }

    fn vertex_attrib_f32(&mut self, index: u32, values: &[f32]) {
        self.with("vertex_attrib_f32", |mock| {
            if values.is_empty() || values.len() > 4 {
                return mock.flag(gl::INVALID_VALUE);
            }

            if let Some(attrib) = mock.attrib_mut(index) {
                let mut current = [0., 0., 0., 1.];
                current[..values.len()].copy_from_slice(values);
                attrib.current = current;
            }
        })
    }

    fn get_vertex_attrib_f32(&mut self, index: u32, pname: u32, out: &mut [f32]) {
        self.with("get_vertex_attrib_f32", |mock| {
            let attrib = match mock.attrib_mut(index) {
                Some(attrib) => *attrib,
                None => return,
            };

            let value = match pname {
                gl::CURRENT_VERTEX_ATTRIB => attrib.current,
                gl::VERTEX_ATTRIB_ARRAY_ENABLED => [attrib.enabled as u8 as f32, 0., 0., 0.],
                gl::VERTEX_ATTRIB_ARRAY_SIZE => [attrib.size as f32, 0., 0., 0.],
                gl::VERTEX_ATTRIB_ARRAY_STRIDE => [attrib.stride as f32, 0., 0., 0.],
                gl::VERTEX_ATTRIB_ARRAY_TYPE => [attrib.ty as f32, 0., 0., 0.],
                gl::VERTEX_ATTRIB_ARRAY_NORMALIZED => [attrib.normalized as u8 as f32, 0., 0., 0.],
                gl::VERTEX_ATTRIB_ARRAY_BUFFER_BINDING => [attrib.buffer as f32, 0., 0., 0.],
                _ => return mock.flag(gl::INVALID_ENUM),
            };

            for (o, v) in out.iter_mut().zip(value.iter()) {
                *o = *v;
            }
        })
    }

    fn get_uniform_location(&mut self, program: u32, name: &str) -> i32 {
        self.with("get_uniform_location", |mock| match mock.programs.get(&program) {
            Some(p) if p.linked => p
                .uniforms
                .iter()
                .position(|(var, _)| var.name == name)
                .map_or(-1, |i| i as i32),
            Some(_) => {
                mock.flag(gl::INVALID_OPERATION);
                -1
            }
            None => {
                mock.flag(gl::INVALID_VALUE);
                -1
            }
        })
    }

    fn uniform_f32(&mut self, location: i32, components: usize, values: &[f32]) {
        self.with("uniform_f32", |mock| {
            mock.set_uniform(location, components, Value::Float(values.to_vec()), false)
        })
    }

    fn uniform_i32(&mut self, location: i32, components: usize, values: &[i32]) {
        self.with("uniform_i32", |mock| {
            mock.set_uniform(location, components, Value::Int(values.to_vec()), false)
        })
    }

    fn uniform_matrix_f32(&mut self, location: i32, dim: usize, values: &[f32]) {
        self.with("uniform_matrix_f32", |mock| {
            mock.set_uniform(location, dim, Value::Float(values.to_vec()), true)
        })
    }

    fn get_uniform_f32(&mut self, program: u32, location: i32, out: &mut [f32]) {
        self.with("get_uniform_f32", |mock| match mock.uniform_value(program, location) {
            Some(Value::Float(values)) => {
                for (o, v) in out.iter_mut().zip(values) {
                    *o = v;
                }
            }

            Some(Value::Int(values)) => {
                for (o, v) in out.iter_mut().zip(values) {
                    *o = v as f32;
                }
            }

            None => (),
        })
    }

    fn get_uniform_i32(&mut self, program: u32, location: i32, out: &mut [i32]) {
        self.with("get_uniform_i32", |mock| match mock.uniform_value(program, location) {
            Some(Value::Int(values)) => {
                for (o, v) in out.iter_mut().zip(values) {
                    *o = v;
                }
            }

            Some(Value::Float(values)) => {
                for (o, v) in out.iter_mut().zip(values) {
                    *o = v as i32;
                }
            }

            None => (),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declarations_skip_precision_and_comments() {
        let src = "precision mediump float;\n\
                   attribute highp vec3 a_position; // position\n\
                   attribute vec2 a_uv;\n\
                   // attribute vec4 a_commented;\n\
                   uniform mat4 u_mvp;\n\
                   uniform vec4 u_lights[4];\n\
                   void main() { gl_Position = u_mvp * vec4(a_position, 1.0); }";

        let attributes = declarations(src, "attribute");
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes[0].name, "a_position");
        assert_eq!(attributes[0].ty, ValueType::FloatVec3);
        assert_eq!(attributes[1].name, "a_uv");

        let uniforms = declarations(src, "uniform");
        assert_eq!(uniforms.len(), 2);
        assert_eq!(uniforms[1].name, "u_lights");
        assert_eq!(uniforms[1].size, 4);
    }

    #[test]
    fn errors_are_sticky_until_read() {
        let mut driver = MockDriver::new();

        driver.enable(0xdead);
        driver.viewport(0, 0, -1, -1);

        assert_eq!(driver.get_error(), gl::INVALID_ENUM);
        assert_eq!(driver.get_error(), gl::NO_ERROR);
    }

    #[test]
    fn deleting_a_bound_buffer_unbinds_it() {
        let mut driver = MockDriver::new();
        let buffer = driver.create_buffer().unwrap();

        driver.bind_buffer(gl::ARRAY_BUFFER, buffer);
        driver.delete_buffer(buffer);

        assert_eq!(driver.get_parameter_i32(gl::ARRAY_BUFFER_BINDING), 0);
        assert_eq!(driver.delete_count(buffer), 1);
        assert!(!driver.is_live(buffer));
    }
}

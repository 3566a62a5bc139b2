//! Uniforms.

use bytemuck::Zeroable;
use std::cell::RefCell;
use std::rc::Rc;

use crate::driver::Driver;
use crate::enums::ValueType;
use crate::error::GlError;
use crate::shader::Program;
use crate::state::{BindingSlot, GlesState};

/// Values that can be sent to (and read back from) a uniform.
///
/// Arrays of scalars map to vectors of the same size; arrays of arrays are column-major matrices.
pub trait UniformValue: Copy + Zeroable {
    /// Number of scalar components of one value.
    const COMPONENTS: usize;

    /// Upload one or more consecutive values starting at `location`.
    fn upload(driver: &mut dyn Driver, location: i32, values: &[Self]);

    /// Read the value back from a linked program.
    fn download(driver: &mut dyn Driver, program: u32, location: i32) -> Self;
}

macro_rules! impl_uniform_value {
    (f32 $t:ty, $n:expr) => {
        impl UniformValue for $t {
            const COMPONENTS: usize = $n;

            fn upload(driver: &mut dyn Driver, location: i32, values: &[Self]) {
                driver.uniform_f32(location, $n, bytemuck::cast_slice(values));
            }

            fn download(driver: &mut dyn Driver, program: u32, location: i32) -> Self {
                let mut value = <$t>::zeroed();
                let out = bytemuck::cast_slice_mut(std::slice::from_mut(&mut value));
                driver.get_uniform_f32(program, location, out);
                value
            }
        }
    };

    (i32 $t:ty, $n:expr) => {
        impl UniformValue for $t {
            const COMPONENTS: usize = $n;

            fn upload(driver: &mut dyn Driver, location: i32, values: &[Self]) {
                driver.uniform_i32(location, $n, bytemuck::cast_slice(values));
            }

            fn download(driver: &mut dyn Driver, program: u32, location: i32) -> Self {
                let mut value = <$t>::zeroed();
                let out = bytemuck::cast_slice_mut(std::slice::from_mut(&mut value));
                driver.get_uniform_i32(program, location, out);
                value
            }
        }
    };

    (matrix $t:ty, $dim:expr) => {
        impl UniformValue for $t {
            const COMPONENTS: usize = $dim * $dim;

            fn upload(driver: &mut dyn Driver, location: i32, values: &[Self]) {
                driver.uniform_matrix_f32(location, $dim, bytemuck::cast_slice(values));
            }

            fn download(driver: &mut dyn Driver, program: u32, location: i32) -> Self {
                let mut value = <$t>::zeroed();
                let out = bytemuck::cast_slice_mut(std::slice::from_mut(&mut value));
                driver.get_uniform_f32(program, location, out);
                value
            }
        }
    };
}

impl_uniform_value!(f32 f32, 1);
impl_uniform_value!(f32 [f32; 2], 2);
impl_uniform_value!(f32 [f32; 3], 3);
impl_uniform_value!(f32 [f32; 4], 4);

impl_uniform_value!(i32 i32, 1);
impl_uniform_value!(i32 [i32; 2], 2);
impl_uniform_value!(i32 [i32; 3], 3);
impl_uniform_value!(i32 [i32; 4], 4);

impl_uniform_value!(matrix [[f32; 2]; 2], 2);
impl_uniform_value!(matrix [[f32; 3]; 3], 3);
impl_uniform_value!(matrix [[f32; 4]; 4], 4);

impl UniformValue for bool {
    const COMPONENTS: usize = 1;

    fn upload(driver: &mut dyn Driver, location: i32, values: &[Self]) {
        let values: Vec<i32> = values.iter().map(|&b| b as i32).collect();
        driver.uniform_i32(location, 1, &values);
    }

    fn download(driver: &mut dyn Driver, program: u32, location: i32) -> Self {
        let mut value = [0];
        driver.get_uniform_i32(program, location, &mut value);
        value[0] != 0
    }
}

/// Location of a uniform in a linked program.
///
/// A uniform that the program doesn’t declare (or that the compiler optimized out) has a
/// location of `-1`; setting it does nothing and reading it gives zero.
#[derive(Clone, Debug)]
pub struct Uniform {
    name: String,
    location: i32,
    ty: Option<ValueType>,
    program: u32,
    state: Rc<RefCell<GlesState>>,
}

impl Uniform {
    /// Look a uniform up by name.
    pub fn new(program: &Program, name: &str) -> Result<Self, GlError> {
        let op = "glGetUniformLocation";
        let handle = program.handle();

        let (location, ty) = {
            let mut state = program.state().borrow_mut();
            state.check_live(handle, op)?;
            let location = state.driver.get_uniform_location(handle, name);
            state.check(op)?;

            let ty = if location >= 0 {
                declared_type(&mut *state.driver, handle, name)
            } else {
                None
            };

            state.check("glGetActiveUniform")?;
            (location, ty)
        };

        #[cfg(diagnostics)]
        {
            if location < 0 {
                log::warn!("uniform {} not found in program {}", name, handle);
            }
        }

        Ok(Uniform {
            name: name.to_owned(),
            location,
            ty,
            program: handle,
            state: program.state().clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> i32 {
        self.location
    }

    pub fn is_found(&self) -> bool {
        self.location >= 0
    }

    /// GLSL type the uniform is declared with, if it was found.
    pub fn ty(&self) -> Option<ValueType> {
        self.ty
    }

    /// Set the uniform; its program must be the active one.
    pub fn set<T: UniformValue>(&self, value: T) -> Result<(), GlError> {
        self.set_slice(&[value])
    }

    /// Set consecutive elements of an array uniform, starting with the element this uniform was
    /// looked up with.
    pub fn set_slice<T: UniformValue>(&self, values: &[T]) -> Result<(), GlError> {
        let op = "glUniform";
        let mut state = self.state.borrow_mut();
        state.check_bound(BindingSlot::Program, self.program, op)?;

        if self.location < 0 {
            return Ok(());
        }

        T::upload(&mut *state.driver, self.location, values);
        state.check(op)
    }

    /// Read the current value back.
    ///
    /// `T` must have as many components as the declared type; a uniform that wasn’t found reads
    /// as zero.
    pub fn get<T: UniformValue>(&self) -> Result<T, GlError> {
        let op = "glGetUniform";

        if self.location < 0 {
            return Ok(T::zeroed());
        }

        match self.ty {
            Some(ty) if ty.components() == T::COMPONENTS => (),

            _ => {
                return Err(GlError::UniformMismatch {
                    name: self.name.clone(),
                    requested: std::any::type_name::<T>(),
                })
            }
        }

        let mut state = self.state.borrow_mut();
        state.check_live(self.program, op)?;

        let value = T::download(&mut *state.driver, self.program, self.location);
        state.check(op)?;

        Ok(value)
    }
}

// Type of the active uniform a name refers to. Array uniforms are listed as `name[0]` by some
// drivers and may be looked up by element.
fn declared_type(driver: &mut dyn Driver, program: u32, name: &str) -> Option<ValueType> {
    let base = strip_index(name);

    (0..driver.get_active_uniforms(program))
        .filter_map(|index| driver.get_active_uniform(program, index))
        .find(|info| strip_index(&info.name) == base)
        .and_then(|info| ValueType::from_gl(info.ty))
}

fn strip_index(name: &str) -> &str {
    match name.find('[') {
        Some(i) if name.ends_with(']') => &name[..i],
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_names_match_their_base() {
        assert_eq!(strip_index("u_weights[0]"), "u_weights");
        assert_eq!(strip_index("u_weights[3]"), "u_weights");
        assert_eq!(strip_index("u_weights"), "u_weights");
        assert_eq!(strip_index("u_light.color"), "u_light.color");
    }

    #[test]
    fn components_match_glsl_types() {
        assert_eq!(f32::COMPONENTS, ValueType::Float.components());
        assert_eq!(<[i32; 3]>::COMPONENTS, ValueType::IntVec3.components());
        assert_eq!(bool::COMPONENTS, ValueType::Bool.components());
        assert_eq!(<[[f32; 2]; 2]>::COMPONENTS, ValueType::FloatMat2.components());
        assert_eq!(<[[f32; 3]; 3]>::COMPONENTS, ValueType::FloatMat3.components());
        assert_eq!(<[[f32; 4]; 4]>::COMPONENTS, ValueType::FloatMat4.components());
    }
}

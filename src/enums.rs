//! Canonical enumerations and their driver translations.
//!
//! Every enum in here is declared through [`gl_enum!`], which generates both directions of the
//! translation from a single table. `from_gl(to_gl(v)) == Some(v)` holds for every variant.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::gl;

macro_rules! gl_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $gl:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Native `GLenum` value.
            #[inline]
            pub fn to_gl(self) -> u32 {
                match self {
                    $( $name::$variant => gl::$gl ),+
                }
            }

            /// Map a native `GLenum` value back, if it belongs to this enum.
            #[inline]
            pub fn from_gl(value: u32) -> Option<Self> {
                match value {
                    $( gl::$gl => Some($name::$variant), )+
                    _ => None,
                }
            }
        }
    };
}

gl_enum! {
    /// Server-side capabilities toggled with [`Gles::enable`](crate::Gles::enable).
    pub enum Capability {
        Blend = BLEND,
        CullFace = CULL_FACE,
        DepthTest = DEPTH_TEST,
        Dither = DITHER,
        PolygonOffsetFill = POLYGON_OFFSET_FILL,
        SampleAlphaToCoverage = SAMPLE_ALPHA_TO_COVERAGE,
        SampleCoverage = SAMPLE_COVERAGE,
        ScissorTest = SCISSOR_TEST,
        StencilTest = STENCIL_TEST,
    }
}

gl_enum! {
    /// Blending factors.
    pub enum BlendFactor {
        Zero = ZERO,
        One = ONE,
        SrcColor = SRC_COLOR,
        OneMinusSrcColor = ONE_MINUS_SRC_COLOR,
        DstColor = DST_COLOR,
        OneMinusDstColor = ONE_MINUS_DST_COLOR,
        SrcAlpha = SRC_ALPHA,
        OneMinusSrcAlpha = ONE_MINUS_SRC_ALPHA,
        DstAlpha = DST_ALPHA,
        OneMinusDstAlpha = ONE_MINUS_DST_ALPHA,
        ConstantColor = CONSTANT_COLOR,
        OneMinusConstantColor = ONE_MINUS_CONSTANT_COLOR,
        ConstantAlpha = CONSTANT_ALPHA,
        OneMinusConstantAlpha = ONE_MINUS_CONSTANT_ALPHA,
        SrcAlphaSaturate = SRC_ALPHA_SATURATE,
    }
}

gl_enum! {
    /// Blending equations.
    pub enum BlendEquation {
        Add = FUNC_ADD,
        Subtract = FUNC_SUBTRACT,
        ReverseSubtract = FUNC_REVERSE_SUBTRACT,
    }
}

gl_enum! {
    /// Comparison function used by the depth and stencil tests.
    pub enum CompareFunc {
        Never = NEVER,
        Less = LESS,
        Equal = EQUAL,
        LessOrEqual = LEQUAL,
        Greater = GREATER,
        NotEqual = NOTEQUAL,
        GreaterOrEqual = GEQUAL,
        Always = ALWAYS,
    }
}

gl_enum! {
    /// Action taken on the stencil buffer.
    pub enum StencilOp {
        Keep = KEEP,
        Zero = ZERO,
        Replace = REPLACE,
        Increment = INCR,
        IncrementWrap = INCR_WRAP,
        Decrement = DECR,
        DecrementWrap = DECR_WRAP,
        Invert = INVERT,
    }
}

gl_enum! {
    /// Polygon faces, for culling and separate stencil state.
    pub enum Face {
        Front = FRONT,
        Back = BACK,
        FrontAndBack = FRONT_AND_BACK,
    }
}

gl_enum! {
    /// Winding order of front-facing polygons.
    pub enum FrontFace {
        Clockwise = CW,
        CounterClockwise = CCW,
    }
}

gl_enum! {
    /// Primitive assembly mode of draw calls.
    pub enum PrimitiveType {
        Points = POINTS,
        Lines = LINES,
        LineLoop = LINE_LOOP,
        LineStrip = LINE_STRIP,
        Triangles = TRIANGLES,
        TriangleStrip = TRIANGLE_STRIP,
        TriangleFan = TRIANGLE_FAN,
    }
}

gl_enum! {
    /// Type of the indices read by [`Gles::draw_elements`](crate::Gles::draw_elements).
    pub enum IndexType {
        UnsignedByte = UNSIGNED_BYTE,
        UnsignedShort = UNSIGNED_SHORT,
    }
}

impl IndexType {
    /// Size in bytes of one index.
    pub fn size(self) -> usize {
        match self {
            IndexType::UnsignedByte => 1,
            IndexType::UnsignedShort => 2,
        }
    }
}

gl_enum! {
    /// Kind of a texture, which selects the binding target it lives on.
    pub enum TextureKind {
        Texture2D = TEXTURE_2D,
        CubeMap = TEXTURE_CUBE_MAP,
    }
}

gl_enum! {
    /// Image target of an upload or copy: the 2D texture or one face of a cube map.
    pub enum ImageTarget {
        Texture2D = TEXTURE_2D,
        CubePositiveX = TEXTURE_CUBE_MAP_POSITIVE_X,
        CubeNegativeX = TEXTURE_CUBE_MAP_NEGATIVE_X,
        CubePositiveY = TEXTURE_CUBE_MAP_POSITIVE_Y,
        CubeNegativeY = TEXTURE_CUBE_MAP_NEGATIVE_Y,
        CubePositiveZ = TEXTURE_CUBE_MAP_POSITIVE_Z,
        CubeNegativeZ = TEXTURE_CUBE_MAP_NEGATIVE_Z,
    }
}

impl ImageTarget {
    /// Texture kind owning this image.
    pub fn kind(self) -> TextureKind {
        match self {
            ImageTarget::Texture2D => TextureKind::Texture2D,
            _ => TextureKind::CubeMap,
        }
    }
}

gl_enum! {
    /// Minification filter.
    pub enum MinFilter {
        Nearest = NEAREST,
        Linear = LINEAR,
        NearestMipmapNearest = NEAREST_MIPMAP_NEAREST,
        LinearMipmapNearest = LINEAR_MIPMAP_NEAREST,
        NearestMipmapLinear = NEAREST_MIPMAP_LINEAR,
        LinearMipmapLinear = LINEAR_MIPMAP_LINEAR,
    }
}

gl_enum! {
    /// Magnification filter.
    pub enum MagFilter {
        Nearest = NEAREST,
        Linear = LINEAR,
    }
}

gl_enum! {
    /// Texture coordinate wrapping.
    pub enum WrapMode {
        Repeat = REPEAT,
        ClampToEdge = CLAMP_TO_EDGE,
        MirroredRepeat = MIRRORED_REPEAT,
    }
}

gl_enum! {
    /// Texel formats accepted by texture uploads and pixel reads.
    pub enum PixelFormat {
        Alpha = ALPHA,
        Rgb = RGB,
        Rgba = RGBA,
        Luminance = LUMINANCE,
        LuminanceAlpha = LUMINANCE_ALPHA,
    }
}

impl PixelFormat {
    /// Number of channels of the format.
    pub fn components(self) -> usize {
        match self {
            PixelFormat::Alpha | PixelFormat::Luminance => 1,
            PixelFormat::LuminanceAlpha => 2,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

gl_enum! {
    /// Encoding of texel data.
    pub enum PixelDataType {
        UnsignedByte = UNSIGNED_BYTE,
        UnsignedShort565 = UNSIGNED_SHORT_5_6_5,
        UnsignedShort4444 = UNSIGNED_SHORT_4_4_4_4,
        UnsignedShort5551 = UNSIGNED_SHORT_5_5_5_1,
    }
}

impl PixelDataType {
    /// Size in bytes of one pixel of the given format with this encoding.
    pub fn bytes_per_pixel(self, format: PixelFormat) -> usize {
        match self {
            PixelDataType::UnsignedByte => format.components(),
            _ => 2,
        }
    }
}

gl_enum! {
    /// Kind of a data buffer, which selects the binding target it lives on.
    pub enum BufferKind {
        /// Vertex data (`GL_ARRAY_BUFFER`).
        Vertex = ARRAY_BUFFER,
        /// Index data (`GL_ELEMENT_ARRAY_BUFFER`).
        Index = ELEMENT_ARRAY_BUFFER,
    }
}

gl_enum! {
    /// Expected usage pattern of a data buffer.
    pub enum BufferUsage {
        Stream = STREAM_DRAW,
        Static = STATIC_DRAW,
        Dynamic = DYNAMIC_DRAW,
    }
}

gl_enum! {
    /// Internal formats of renderbuffer storage.
    pub enum RenderbufferFormat {
        Rgba4 = RGBA4,
        Rgb565 = RGB565,
        Rgb5A1 = RGB5_A1,
        Depth16 = DEPTH_COMPONENT16,
        Stencil8 = STENCIL_INDEX8,
    }
}

gl_enum! {
    /// Framebuffer attachment points.
    pub enum FramebufferAttachment {
        Color = COLOR_ATTACHMENT0,
        Depth = DEPTH_ATTACHMENT,
        Stencil = STENCIL_ATTACHMENT,
    }
}

gl_enum! {
    /// Completeness status of a framebuffer.
    pub enum FramebufferStatus {
        Complete = FRAMEBUFFER_COMPLETE,
        IncompleteAttachment = FRAMEBUFFER_INCOMPLETE_ATTACHMENT,
        IncompleteDimensions = FRAMEBUFFER_INCOMPLETE_DIMENSIONS,
        MissingAttachment = FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT,
        Unsupported = FRAMEBUFFER_UNSUPPORTED,
    }
}

impl fmt::Display for FramebufferStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FramebufferStatus::Complete => f.write_str("complete"),
            FramebufferStatus::IncompleteAttachment => f.write_str("incomplete attachment"),
            FramebufferStatus::IncompleteDimensions => {
                f.write_str("attachments have different dimensions")
            }
            FramebufferStatus::MissingAttachment => f.write_str("missing attachment"),
            FramebufferStatus::Unsupported => f.write_str("unsupported attachment combination"),
        }
    }
}

gl_enum! {
    /// Shader stages.
    pub enum ShaderKind {
        Vertex = VERTEX_SHADER,
        Fragment = FRAGMENT_SHADER,
    }
}

gl_enum! {
    /// Component type of vertex attribute data.
    pub enum DataType {
        Byte = BYTE,
        UnsignedByte = UNSIGNED_BYTE,
        Short = SHORT,
        UnsignedShort = UNSIGNED_SHORT,
        Float = FLOAT,
        Fixed = FIXED,
    }
}

impl DataType {
    /// Size in bytes of one component.
    pub fn size(self) -> usize {
        match self {
            DataType::Byte | DataType::UnsignedByte => 1,
            DataType::Short | DataType::UnsignedShort => 2,
            DataType::Float | DataType::Fixed => 4,
        }
    }
}

gl_enum! {
    /// GLSL type of an active attribute or uniform.
    pub enum ValueType {
        Float = FLOAT,
        FloatVec2 = FLOAT_VEC2,
        FloatVec3 = FLOAT_VEC3,
        FloatVec4 = FLOAT_VEC4,
        Int = INT,
        IntVec2 = INT_VEC2,
        IntVec3 = INT_VEC3,
        IntVec4 = INT_VEC4,
        Bool = BOOL,
        BoolVec2 = BOOL_VEC2,
        BoolVec3 = BOOL_VEC3,
        BoolVec4 = BOOL_VEC4,
        FloatMat2 = FLOAT_MAT2,
        FloatMat3 = FLOAT_MAT3,
        FloatMat4 = FLOAT_MAT4,
        Sampler2D = SAMPLER_2D,
        SamplerCube = SAMPLER_CUBE,
    }
}

impl ValueType {
    /// Number of scalar components stored by one value of this type.
    pub fn components(self) -> usize {
        match self {
            ValueType::Float
            | ValueType::Int
            | ValueType::Bool
            | ValueType::Sampler2D
            | ValueType::SamplerCube => 1,
            ValueType::FloatVec2 | ValueType::IntVec2 | ValueType::BoolVec2 => 2,
            ValueType::FloatVec3 | ValueType::IntVec3 | ValueType::BoolVec3 => 3,
            ValueType::FloatVec4 | ValueType::IntVec4 | ValueType::BoolVec4 => 4,
            ValueType::FloatMat2 => 4,
            ValueType::FloatMat3 => 9,
            ValueType::FloatMat4 => 16,
        }
    }

    /// Whether the value is stored as floats (as opposed to integers).
    pub fn is_float(self) -> bool {
        matches!(
            self,
            ValueType::Float
                | ValueType::FloatVec2
                | ValueType::FloatVec3
                | ValueType::FloatVec4
                | ValueType::FloatMat2
                | ValueType::FloatMat3
                | ValueType::FloatMat4
        )
    }

    /// Parse a GLSL ES 1.00 type name.
    pub fn from_glsl(name: &str) -> Option<Self> {
        let ty = match name {
            "float" => ValueType::Float,
            "vec2" => ValueType::FloatVec2,
            "vec3" => ValueType::FloatVec3,
            "vec4" => ValueType::FloatVec4,
            "int" => ValueType::Int,
            "ivec2" => ValueType::IntVec2,
            "ivec3" => ValueType::IntVec3,
            "ivec4" => ValueType::IntVec4,
            "bool" => ValueType::Bool,
            "bvec2" => ValueType::BoolVec2,
            "bvec3" => ValueType::BoolVec3,
            "bvec4" => ValueType::BoolVec4,
            "mat2" => ValueType::FloatMat2,
            "mat3" => ValueType::FloatMat3,
            "mat4" => ValueType::FloatMat4,
            "sampler2D" => ValueType::Sampler2D,
            "samplerCube" => ValueType::SamplerCube,
            _ => return None,
        };

        Some(ty)
    }
}

gl_enum! {
    /// Implementation hints.
    pub enum HintTarget {
        GenerateMipmap = GENERATE_MIPMAP_HINT,
    }
}

gl_enum! {
    /// Hint modes.
    pub enum HintMode {
        DontCare = DONT_CARE,
        Fastest = FASTEST,
        Nicest = NICEST,
    }
}

gl_enum! {
    /// Pixel storage parameters.
    pub enum PixelStore {
        PackAlignment = PACK_ALIGNMENT,
        UnpackAlignment = UNPACK_ALIGNMENT,
    }
}

gl_enum! {
    /// Sticky error codes reported by the driver.
    pub enum ErrorCode {
        InvalidEnum = INVALID_ENUM,
        InvalidValue = INVALID_VALUE,
        InvalidOperation = INVALID_OPERATION,
        InvalidFramebufferOperation = INVALID_FRAMEBUFFER_OPERATION,
        OutOfMemory = OUT_OF_MEMORY,
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ErrorCode::InvalidEnum => {
                f.write_str("an unacceptable value is specified for an enumerated argument")
            }
            ErrorCode::InvalidValue => f.write_str("a numeric argument is out of range"),
            ErrorCode::InvalidOperation => {
                f.write_str("the specified operation is not allowed in the current state")
            }
            ErrorCode::InvalidFramebufferOperation => {
                f.write_str("the currently bound framebuffer is not framebuffer complete")
            }
            ErrorCode::OutOfMemory => {
                f.write_str("there is not enough memory left to execute the command")
            }
        }
    }
}

/// Set of buffers to clear, combined with `|`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ClearBuffers(u32);

impl ClearBuffers {
    pub const COLOR: ClearBuffers = ClearBuffers(gl::COLOR_BUFFER_BIT);
    pub const DEPTH: ClearBuffers = ClearBuffers(gl::DEPTH_BUFFER_BIT);
    pub const STENCIL: ClearBuffers = ClearBuffers(gl::STENCIL_BUFFER_BIT);
    pub const ALL: ClearBuffers =
        ClearBuffers(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT | gl::STENCIL_BUFFER_BIT);

    /// Native bit mask.
    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: ClearBuffers) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ClearBuffers {
    type Output = ClearBuffers;

    fn bitor(self, rhs: ClearBuffers) -> ClearBuffers {
        ClearBuffers(self.0 | rhs.0)
    }
}

impl BitOrAssign for ClearBuffers {
    fn bitor_assign(&mut self, rhs: ClearBuffers) {
        self.0 |= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! assert_bijection {
        ($($ty:ident),+ $(,)?) => {
            $(
                for &v in $ty::ALL {
                    assert_eq!($ty::from_gl(v.to_gl()), Some(v), "{}::{:?}", stringify!($ty), v);
                }

                let mut natives: Vec<u32> = $ty::ALL.iter().map(|v| v.to_gl()).collect();
                natives.sort_unstable();
                natives.dedup();
                assert_eq!(natives.len(), $ty::ALL.len(), "{} maps two variants to one value", stringify!($ty));
            )+
        };
    }

    #[test]
    fn every_enum_round_trips() {
        assert_bijection!(
            Capability,
            BlendFactor,
            BlendEquation,
            CompareFunc,
            StencilOp,
            Face,
            FrontFace,
            PrimitiveType,
            IndexType,
            TextureKind,
            ImageTarget,
            MinFilter,
            MagFilter,
            WrapMode,
            PixelFormat,
            PixelDataType,
            BufferKind,
            BufferUsage,
            RenderbufferFormat,
            FramebufferAttachment,
            FramebufferStatus,
            ShaderKind,
            DataType,
            ValueType,
            HintTarget,
            HintMode,
            PixelStore,
            ErrorCode,
        );
    }

    #[test]
    fn unknown_values_are_rejected() {
        assert_eq!(Capability::from_gl(gl::TEXTURE_2D + 1), None);
        assert_eq!(BlendEquation::from_gl(0xFFFF), None);
        assert_eq!(MagFilter::from_gl(gl::NEAREST_MIPMAP_NEAREST), None);
    }

    #[test]
    fn native_values_match_gles2() {
        assert_eq!(TextureKind::Texture2D.to_gl(), 0x0DE1);
        assert_eq!(BufferKind::Index.to_gl(), 0x8893);
        assert_eq!(StencilOp::Zero.to_gl(), 0);
        assert_eq!(ImageTarget::CubeNegativeZ.to_gl(), 0x851A);
        assert_eq!(FramebufferStatus::Complete.to_gl(), 0x8CD5);
    }

    #[test]
    fn clear_buffers_combine() {
        let mask = ClearBuffers::COLOR | ClearBuffers::DEPTH;

        assert!(mask.contains(ClearBuffers::COLOR));
        assert!(!mask.contains(ClearBuffers::STENCIL));
        assert_eq!(mask.bits(), 0x4100);
        assert!(ClearBuffers::ALL.contains(mask));
    }

    #[test]
    fn image_targets_know_their_kind() {
        assert_eq!(ImageTarget::Texture2D.kind(), TextureKind::Texture2D);
        assert_eq!(ImageTarget::CubePositiveY.kind(), TextureKind::CubeMap);
    }
}

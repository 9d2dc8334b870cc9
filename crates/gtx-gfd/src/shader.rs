//! Shader header records.
//!
//! Shader header blocks hold a fixed-size GX2 shader struct followed by its
//! metadata arrays and name strings. Pointers inside the struct are relocated
//! block offsets carrying a tag in the upper bits.

use gtx_common::{BinaryReader, Endian};

use crate::{Error, Result};

/// Tag of a relocated data pointer.
pub const PTR_DATA_TAG: u32 = 0xD060_0000;
/// Tag of a relocated string pointer.
pub const PTR_STRING_TAG: u32 = 0xCA70_0000;
const PTR_TAG_MASK: u32 = 0xFFF0_0000;
const PTR_OFFSET_MASK: u32 = 0x000F_FFFF;

/// A uniform block binding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UniformBlock {
    pub name: String,
    pub offset: u32,
    pub size: u32,
}

/// A uniform variable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UniformVar {
    pub name: String,
    pub var_type: u32,
    pub count: u32,
    pub offset: u32,
    pub block_index: i32,
}

/// An initial value for a uniform register.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitialValue {
    pub value: [f32; 4],
    pub offset: u32,
}

/// A loop constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoopVar {
    pub offset: u32,
    pub value: u32,
}

/// A sampler binding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplerVar {
    pub name: String,
    pub sampler_type: u32,
    pub location: u32,
}

/// A vertex attribute binding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttribVar {
    pub name: String,
    pub var_type: u32,
    pub count: u32,
    pub location: i32,
}

/// Metadata arrays shared by all shader kinds.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShaderMetadata {
    pub uniform_blocks: Vec<UniformBlock>,
    pub uniform_vars: Vec<UniformVar>,
    pub initial_values: Vec<InitialValue>,
    pub loop_vars: Vec<LoopVar>,
    pub samplers: Vec<SamplerVar>,
    /// Vertex shaders only.
    pub attribs: Vec<AttribVar>,
}

/// Fixed fields common to every shader header.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShaderHeader {
    /// Hardware register words at the start of the record.
    pub regs: Vec<u32>,
    /// Byte size of the program block that follows.
    pub program_size: u32,
    pub mode: u32,
    pub metadata: ShaderMetadata,
    /// The header block payload as stored.
    pub raw: Vec<u8>,
}

/// Count/pointer field offsets of one metadata array.
type Table = (usize, usize);

struct Layout {
    what: &'static str,
    fixed_size: usize,
    reg_words: usize,
    program_size: usize,
    mode: usize,
    uniform_blocks: Table,
    uniform_vars: Table,
    initial_values: Table,
    loop_vars: Table,
    samplers: Table,
    attribs: Option<Table>,
}

const VERTEX_LAYOUT: Layout = Layout {
    what: "vertex shader header",
    fixed_size: VertexShader::SIZE,
    reg_words: 52,
    program_size: 0xD0,
    mode: 0xD8,
    uniform_blocks: (0xDC, 0xE0),
    uniform_vars: (0xE4, 0xE8),
    initial_values: (0xEC, 0xF0),
    loop_vars: (0xF4, 0xF8),
    samplers: (0xFC, 0x100),
    attribs: Some((0x104, 0x108)),
};

const PIXEL_LAYOUT: Layout = Layout {
    what: "pixel shader header",
    fixed_size: PixelShader::SIZE,
    reg_words: 41,
    program_size: 0xA4,
    mode: 0xAC,
    uniform_blocks: (0xB0, 0xB4),
    uniform_vars: (0xB8, 0xBC),
    initial_values: (0xC0, 0xC4),
    loop_vars: (0xC8, 0xCC),
    samplers: (0xD0, 0xD4),
    attribs: None,
};

const GEOMETRY_LAYOUT: Layout = Layout {
    what: "geometry shader header",
    fixed_size: GeometryShader::SIZE,
    reg_words: 19,
    program_size: 0x4C,
    mode: 0x5C,
    uniform_blocks: (0x60, 0x64),
    uniform_vars: (0x68, 0x6C),
    initial_values: (0x70, 0x74),
    loop_vars: (0x78, 0x7C),
    samplers: (0x80, 0x84),
    attribs: None,
};

const GEOMETRY_COPY_PROGRAM_SIZE: usize = 0x54;

/// Endian-aware random access into a header block.
struct BlockView<'a> {
    data: &'a [u8],
    endian: Endian,
}

impl<'a> BlockView<'a> {
    fn reader_at(&self, offset: usize) -> BinaryReader<'a> {
        let mut reader = BinaryReader::with_endian(self.data, self.endian);
        reader.seek(offset);
        reader
    }

    fn u32_at(&self, offset: usize) -> Result<u32> {
        Ok(self.reader_at(offset).read_u32()?)
    }

    /// Resolve a relocated pointer to a block offset. Null resolves to `None`.
    fn resolve(&self, what: &'static str, pointer: u32) -> Result<Option<usize>> {
        if pointer == 0 {
            return Ok(None);
        }
        let tag = pointer & PTR_TAG_MASK;
        let offset = (pointer & PTR_OFFSET_MASK) as usize;
        if (tag != PTR_DATA_TAG && tag != PTR_STRING_TAG) || offset >= self.data.len() {
            return Err(Error::InvalidPointer { what, pointer });
        }
        Ok(Some(offset))
    }

    fn string(&self, pointer: u32) -> Result<String> {
        match self.resolve("name", pointer)? {
            Some(offset) => Ok(self.reader_at(offset).read_cstring()?.to_owned()),
            None => Ok(String::new()),
        }
    }

    /// Decode the array described by a count/pointer pair.
    fn array<T>(
        &self,
        what: &'static str,
        (count_at, ptr_at): Table,
        elem_size: usize,
        mut decode: impl FnMut(&Self, &mut BinaryReader<'a>) -> Result<T>,
    ) -> Result<Vec<T>> {
        let count = self.u32_at(count_at)? as usize;
        let pointer = self.u32_at(ptr_at)?;
        if count == 0 {
            return Ok(Vec::new());
        }
        let offset = self
            .resolve(what, pointer)?
            .ok_or(Error::InvalidPointer { what, pointer })?;
        let fits = count
            .checked_mul(elem_size)
            .and_then(|len| len.checked_add(offset))
            .is_some_and(|end| end <= self.data.len());
        if !fits {
            return Err(Error::InvalidPointer { what, pointer });
        }

        let mut reader = self.reader_at(offset);
        (0..count).map(|_| decode(self, &mut reader)).collect()
    }
}

impl ShaderHeader {
    fn decode(layout: &Layout, data: &[u8], endian: Endian) -> Result<Self> {
        if data.len() < layout.fixed_size {
            return Err(Error::SizeMismatch {
                what: layout.what,
                expected: layout.fixed_size,
                actual: data.len(),
            });
        }
        let view = BlockView { data, endian };

        let mut reader = view.reader_at(0);
        let regs = (0..layout.reg_words)
            .map(|_| reader.read_u32())
            .collect::<gtx_common::Result<Vec<_>>>()?;

        let uniform_blocks = view.array("uniform block", layout.uniform_blocks, 12, |v, r| {
            Ok(UniformBlock {
                name: v.string(r.read_u32()?)?,
                offset: r.read_u32()?,
                size: r.read_u32()?,
            })
        })?;
        let uniform_vars = view.array("uniform variable", layout.uniform_vars, 20, |v, r| {
            Ok(UniformVar {
                name: v.string(r.read_u32()?)?,
                var_type: r.read_u32()?,
                count: r.read_u32()?,
                offset: r.read_u32()?,
                block_index: r.read_i32()?,
            })
        })?;
        let initial_values = view.array("initial value", layout.initial_values, 20, |_, r| {
            Ok(InitialValue {
                value: [r.read_f32()?, r.read_f32()?, r.read_f32()?, r.read_f32()?],
                offset: r.read_u32()?,
            })
        })?;
        let loop_vars = view.array("loop variable", layout.loop_vars, 8, |_, r| {
            Ok(LoopVar {
                offset: r.read_u32()?,
                value: r.read_u32()?,
            })
        })?;
        let samplers = view.array("sampler", layout.samplers, 12, |v, r| {
            Ok(SamplerVar {
                name: v.string(r.read_u32()?)?,
                sampler_type: r.read_u32()?,
                location: r.read_u32()?,
            })
        })?;
        let attribs = match layout.attribs {
            Some(table) => view.array("attribute", table, 16, |v, r| {
                Ok(AttribVar {
                    name: v.string(r.read_u32()?)?,
                    var_type: r.read_u32()?,
                    count: r.read_u32()?,
                    location: r.read_i32()?,
                })
            })?,
            None => Vec::new(),
        };

        Ok(Self {
            regs,
            program_size: view.u32_at(layout.program_size)?,
            mode: view.u32_at(layout.mode)?,
            metadata: ShaderMetadata {
                uniform_blocks,
                uniform_vars,
                initial_values,
                loop_vars,
                samplers,
                attribs,
            },
            raw: data.to_vec(),
        })
    }
}

/// A vertex shader record.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexShader {
    pub header: ShaderHeader,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub program: Option<Vec<u8>>,
}

impl VertexShader {
    /// Fixed record size.
    pub const SIZE: usize = 0x134;

    /// Decode a vertex shader header block payload.
    pub fn decode(data: &[u8], endian: Endian) -> Result<Self> {
        Ok(Self {
            header: ShaderHeader::decode(&VERTEX_LAYOUT, data, endian)?,
            program: None,
        })
    }
}

/// A pixel shader record.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelShader {
    pub header: ShaderHeader,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub program: Option<Vec<u8>>,
}

impl PixelShader {
    /// Fixed record size.
    pub const SIZE: usize = 0xE8;

    /// Decode a pixel shader header block payload.
    pub fn decode(data: &[u8], endian: Endian) -> Result<Self> {
        Ok(Self {
            header: ShaderHeader::decode(&PIXEL_LAYOUT, data, endian)?,
            program: None,
        })
    }
}

/// A geometry shader record with its copy program.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeometryShader {
    pub header: ShaderHeader,
    /// Byte size of the copy program block.
    pub copy_program_size: u32,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub program: Option<Vec<u8>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub copy_program: Option<Vec<u8>>,
}

impl GeometryShader {
    /// Fixed record size.
    pub const SIZE: usize = 0xC0;

    /// Decode a geometry shader header block payload.
    pub fn decode(data: &[u8], endian: Endian) -> Result<Self> {
        let header = ShaderHeader::decode(&GEOMETRY_LAYOUT, data, endian)?;
        let copy_program_size = BlockView { data, endian }.u32_at(GEOMETRY_COPY_PROGRAM_SIZE)?;
        Ok(Self {
            header,
            copy_program_size,
            program: None,
            copy_program: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put(block: &mut [u8], offset: usize, value: u32) {
        block[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
    }

    #[test]
    fn test_pixel_shader_metadata() {
        let mut block = vec![0u8; PixelShader::SIZE + 0x40];
        put(&mut block, 0xA4, 0x200);
        put(&mut block, 0xAC, 1);
        // one sampler at 0xE8, its name at 0x100
        put(&mut block, 0xD0, 1);
        put(&mut block, 0xD4, PTR_DATA_TAG | 0xE8);
        put(&mut block, 0xE8, PTR_STRING_TAG | 0x100);
        put(&mut block, 0xEC, 1);
        put(&mut block, 0xF0, 3);
        block[0x100..0x108].copy_from_slice(b"s_tex0\0\0");

        let shader = PixelShader::decode(&block, Endian::Big).unwrap();
        assert_eq!(shader.header.program_size, 0x200);
        assert_eq!(shader.header.mode, 1);
        assert_eq!(shader.header.regs.len(), 41);
        assert_eq!(
            shader.header.metadata.samplers,
            [SamplerVar {
                name: "s_tex0".to_owned(),
                sampler_type: 1,
                location: 3,
            }]
        );
        assert!(shader.program.is_none());
    }

    #[test]
    fn test_pointer_out_of_block() {
        let mut block = vec![0u8; VertexShader::SIZE];
        put(&mut block, 0x104, 1);
        put(&mut block, 0x108, PTR_DATA_TAG | 0x1000);
        assert!(matches!(
            VertexShader::decode(&block, Endian::Big),
            Err(Error::InvalidPointer {
                what: "attribute",
                ..
            })
        ));
    }

    #[test]
    fn test_header_too_small() {
        let block = vec![0u8; GeometryShader::SIZE - 4];
        assert!(matches!(
            GeometryShader::decode(&block, Endian::Big),
            Err(Error::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_geometry_copy_program_size() {
        let mut block = vec![0u8; GeometryShader::SIZE];
        put(&mut block, 0x4C, 0x80);
        put(&mut block, 0x54, 0x40);
        let shader = GeometryShader::decode(&block, Endian::Big).unwrap();
        assert_eq!(shader.header.program_size, 0x80);
        assert_eq!(shader.copy_program_size, 0x40);
    }
}

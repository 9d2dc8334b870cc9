//! GFD archive reading and writing.

use gtx_common::{BinaryReader, BinaryWriter, Endian};
use gtx_gx2::Texture;
use tracing::{debug, trace};

use crate::block::{BlockHeader, BlockType};
use crate::header::{AlignMode, GfdHeader};
use crate::shader::{GeometryShader, PixelShader, VertexShader};
use crate::{Error, Result};

/// A GFD archive with its textures and shaders.
///
/// The archive owns every buffer reachable from it. Records are appended in
/// stream order while loading, or pushed directly by the caller.
///
/// # Example
///
/// ```
/// use gtx_gfd::{AlignMode, GfdFile};
///
/// let file = GfdFile::new();
/// assert_eq!(file.header.major_version, 7);
/// assert_eq!(file.header.align_mode, AlignMode::Enabled);
///
/// let bytes = file.save_gtx().unwrap();
/// let (parsed, consumed) = GfdFile::parse(&bytes).unwrap();
/// assert_eq!(consumed, bytes.len());
/// assert!(parsed.textures.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GfdFile {
    pub header: GfdHeader,
    pub textures: Vec<Texture>,
    pub vertex_shaders: Vec<VertexShader>,
    pub pixel_shaders: Vec<PixelShader>,
    pub geometry_shaders: Vec<GeometryShader>,
}

/// Round `value` up to a multiple of `alignment`.
fn round_up(value: usize, alignment: usize) -> usize {
    value.div_ceil(alignment) * alignment
}

/// Store a program payload into an empty slot of the current record.
fn fill_slot(
    slot: Option<&mut Option<Vec<u8>>>,
    expected: u32,
    payload: &[u8],
    what: &'static str,
) -> Result<()> {
    let slot = match slot {
        Some(slot) if slot.is_none() => slot,
        _ => return Err(Error::Sequence(what)),
    };
    if payload.len() != expected as usize {
        return Err(Error::SizeMismatch {
            what,
            expected: expected as usize,
            actual: payload.len(),
        });
    }
    *slot = Some(payload.to_vec());
    Ok(())
}

impl GfdFile {
    /// Create an empty 7.1 archive with alignment enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the archive version. Only major versions 6 and 7 are accepted.
    ///
    /// Texture registers are derived when saving, so nothing else changes.
    pub fn set_version(&mut self, major: u32, minor: u32) -> Result<()> {
        if major != 6 && major != 7 {
            return Err(Error::VersionUnsupported {
                what: "file",
                major,
                minor,
            });
        }
        self.header.major_version = major;
        self.header.minor_version = minor;
        Ok(())
    }

    /// Release every record and buffer. The header is kept.
    pub fn teardown(&mut self) {
        self.textures.clear();
        self.vertex_shaders.clear();
        self.pixel_shaders.clear();
        self.geometry_shaders.clear();
    }

    /// Check if the archive holds no records.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
            && self.vertex_shaders.is_empty()
            && self.pixel_shaders.is_empty()
            && self.geometry_shaders.is_empty()
    }

    /// Parse a big-endian archive into a new value.
    pub fn parse(data: &[u8]) -> Result<(Self, usize)> {
        Self::parse_with_endian(data, Endian::Big)
    }

    /// Parse an archive in the given byte order into a new value.
    pub fn parse_with_endian(data: &[u8], endian: Endian) -> Result<(Self, usize)> {
        let mut file = Self::default();
        let consumed = file.load_with_endian(data, endian)?;
        Ok((file, consumed))
    }

    /// Load a big-endian archive, replacing the current contents.
    ///
    /// Returns the number of bytes consumed.
    pub fn load(&mut self, data: &[u8]) -> Result<usize> {
        self.load_with_endian(data, Endian::Big)
    }

    /// Load an archive in the given byte order, replacing the current contents.
    ///
    /// On failure the archive is left empty with its previous header, and the
    /// error carries the offset of the record that failed.
    pub fn load_with_endian(&mut self, data: &[u8], endian: Endian) -> Result<usize> {
        self.teardown();
        let previous = self.header;
        let mut reader = BinaryReader::with_endian(data, endian);
        match self.read_stream(&mut reader) {
            Ok(consumed) => {
                debug!(
                    major = self.header.major_version,
                    minor = self.header.minor_version,
                    align_mode = ?self.header.align_mode,
                    textures = self.textures.len(),
                    vertex_shaders = self.vertex_shaders.len(),
                    pixel_shaders = self.pixel_shaders.len(),
                    geometry_shaders = self.geometry_shaders.len(),
                    consumed,
                    "loaded GFD archive"
                );
                Ok(consumed)
            }
            Err(err) => {
                self.teardown();
                self.header = previous;
                Err(err)
            }
        }
    }

    fn read_stream(&mut self, reader: &mut BinaryReader<'_>) -> Result<usize> {
        let endian = reader.endian();
        self.header = GfdHeader::decode(reader).map_err(|e| e.at(0))?;
        let mut search_pad = self.header.is_legacy();

        loop {
            let offset = reader.position();
            let block = BlockHeader::decode(reader).map_err(|e| e.at(offset))?;
            let payload_offset = reader.position();
            let payload = reader
                .read_bytes(block.data_size as usize)
                .map_err(|e| Error::from(e).at(payload_offset))?;

            trace!(
                offset,
                block_type = ?block.block_type,
                size = block.data_size,
                "GFD block"
            );

            if block.block_type == BlockType::End {
                break;
            }
            self.dispatch(block.block_type, payload, endian, &mut search_pad)
                .map_err(|e| e.at(offset))?;
        }

        if search_pad {
            self.header.align_mode = AlignMode::Disabled;
        }
        Ok(reader.position())
    }

    fn dispatch(
        &mut self,
        block_type: BlockType,
        payload: &[u8],
        endian: Endian,
        search_pad: &mut bool,
    ) -> Result<()> {
        match block_type {
            BlockType::Pad => {
                if *search_pad {
                    self.header.align_mode = AlignMode::Enabled;
                    *search_pad = false;
                }
            }
            BlockType::VertexShaderHeader => {
                self.vertex_shaders.push(VertexShader::decode(payload, endian)?);
            }
            BlockType::VertexShaderProgram => {
                let shader = self.vertex_shaders.last_mut();
                let size = shader.as_ref().map_or(0, |s| s.header.program_size);
                fill_slot(
                    shader.map(|s| &mut s.program),
                    size,
                    payload,
                    "vertex shader program",
                )?;
            }
            BlockType::PixelShaderHeader => {
                self.pixel_shaders.push(PixelShader::decode(payload, endian)?);
            }
            BlockType::PixelShaderProgram => {
                let shader = self.pixel_shaders.last_mut();
                let size = shader.as_ref().map_or(0, |s| s.header.program_size);
                fill_slot(
                    shader.map(|s| &mut s.program),
                    size,
                    payload,
                    "pixel shader program",
                )?;
            }
            BlockType::GeometryShaderHeader => {
                self.geometry_shaders
                    .push(GeometryShader::decode(payload, endian)?);
            }
            BlockType::GeometryShaderProgram => {
                let shader = self.geometry_shaders.last_mut();
                let size = shader.as_ref().map_or(0, |s| s.header.program_size);
                fill_slot(
                    shader.map(|s| &mut s.program),
                    size,
                    payload,
                    "geometry shader program",
                )?;
            }
            BlockType::GeometryShaderCopyProgram => {
                let shader = self.geometry_shaders.last_mut();
                let size = shader.as_ref().map_or(0, |s| s.copy_program_size);
                fill_slot(
                    shader.map(|s| &mut s.copy_program),
                    size,
                    payload,
                    "geometry shader copy program",
                )?;
            }
            BlockType::TextureHeader => {
                if payload.len() != Texture::SIZE {
                    return Err(Error::SizeMismatch {
                        what: "texture header",
                        expected: Texture::SIZE,
                        actual: payload.len(),
                    });
                }
                let mut reader = BinaryReader::with_endian(payload, endian);
                self.textures.push(Texture::decode(&mut reader)?);
            }
            BlockType::TextureImageData => {
                let texture = self.textures.last_mut();
                let size = texture.as_ref().map_or(0, |t| t.surface.image_size);
                fill_slot(
                    texture.map(|t| &mut t.surface.image),
                    size,
                    payload,
                    "texture image data",
                )?;
            }
            BlockType::TextureMipData => {
                let texture = self.textures.last_mut();
                let size = texture.as_ref().map_or(0, |t| t.surface.mip_size);
                fill_slot(
                    texture.map(|t| &mut t.surface.mips),
                    size,
                    payload,
                    "texture mip data",
                )?;
            }
            BlockType::End | BlockType::Unknown(_) => {}
        }
        Ok(())
    }

    /// Serialize the textures into a big-endian GTX archive.
    pub fn save_gtx(&self) -> Result<Vec<u8>> {
        self.save_gtx_with_endian(Endian::Big)
    }

    /// Serialize the textures into a GTX archive in the given byte order.
    ///
    /// Shader records are not written.
    pub fn save_gtx_with_endian(&self, endian: Endian) -> Result<Vec<u8>> {
        let align = match self.header.align_mode {
            AlignMode::Enabled => true,
            AlignMode::Disabled => false,
            AlignMode::Undefined => {
                return Err(Error::Configuration(
                    "alignment mode must be chosen before saving",
                ))
            }
        };
        let (block_major, block_minor) = if self.header.is_legacy() { (0, 1) } else { (1, 0) };
        let gfd_v7 = self.header.is_v7();

        let mut writer = BinaryWriter::new(endian);
        self.header.encode(&mut writer)?;

        let block = |block_type, data_size: usize, type_index: usize| -> Result<BlockHeader> {
            let data_size = u32::try_from(data_size).map_err(|_| Error::SizeMismatch {
                what: "block payload",
                expected: u32::MAX as usize,
                actual: data_size,
            })?;
            let mut header = BlockHeader::new(block_major, block_minor, block_type, data_size);
            header.type_index = type_index as u32;
            Ok(header)
        };

        for (index, texture) in self.textures.iter().enumerate() {
            let surface = &texture.surface;

            block(BlockType::TextureHeader, Texture::SIZE, index)?.encode(&mut writer)?;
            texture.encode(&mut writer, gfd_v7)?;

            let image = surface
                .image
                .as_deref()
                .ok_or(gtx_gx2::Error::MissingData("image"))?;
            let image = payload_slice(image, surface.image_size, "texture image data")?;
            if align {
                write_pad(&mut writer, surface.alignment, &block)?;
            }
            block(BlockType::TextureImageData, image.len(), index)?.encode(&mut writer)?;
            writer.write_bytes(image);

            if let Some(mips) = surface.mips.as_deref() {
                let mips = payload_slice(mips, surface.mip_size, "texture mip data")?;
                if align {
                    write_pad(&mut writer, surface.alignment, &block)?;
                }
                block(BlockType::TextureMipData, mips.len(), index)?.encode(&mut writer)?;
                writer.write_bytes(mips);
            }
        }

        block(BlockType::End, 0, 0)?.encode(&mut writer)?;

        debug!(
            major = self.header.major_version,
            minor = self.header.minor_version,
            textures = self.textures.len(),
            skipped_shaders =
                self.vertex_shaders.len() + self.pixel_shaders.len() + self.geometry_shaders.len(),
            size = writer.position(),
            "saved GTX archive"
        );

        Ok(writer.into_inner())
    }
}

/// The first `size` bytes of an owned buffer.
fn payload_slice<'a>(buffer: &'a [u8], size: u32, what: &'static str) -> Result<&'a [u8]> {
    buffer.get(..size as usize).ok_or(Error::SizeMismatch {
        what,
        expected: size as usize,
        actual: buffer.len(),
    })
}

/// Write a pad block so that the payload of the block after it starts on an
/// `alignment` boundary.
fn write_pad(
    writer: &mut BinaryWriter,
    alignment: u32,
    block: &impl Fn(BlockType, usize, usize) -> Result<BlockHeader>,
) -> Result<()> {
    let data_pos = writer.position() + 2 * BlockHeader::SIZE;
    let pad = round_up(data_pos, alignment.max(1) as usize) - data_pos;
    block(BlockType::Pad, pad, 0)?.encode(writer)?;
    writer.write_zeros(pad);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtx_gx2::{Surface, SurfaceFormat, TileMode};
    use proptest::prelude::*;

    fn texture(width: u32, image: Vec<u8>, mips: Option<Vec<u8>>, alignment: u32) -> Texture {
        let num_mips = if mips.is_some() { 2 } else { 1 };
        Texture {
            surface: Surface {
                width,
                height: 4,
                num_mips,
                format: SurfaceFormat::UNORM_RGBA8,
                tile_mode: TileMode::Tiled2DThin1,
                image_size: image.len() as u32,
                mip_size: mips.as_ref().map_or(0, |m| m.len() as u32),
                alignment,
                pitch: width,
                mip_offsets: [image.len() as u32, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
                image: Some(image),
                mips,
                ..Default::default()
            },
            view_num_mips: num_mips,
            view_num_slices: 1,
            ..Default::default()
        }
    }

    fn sample_file() -> GfdFile {
        let mut file = GfdFile::new();
        file.textures.push(texture(4, vec![0x11; 64], Some(vec![0x22; 16]), 0x200));
        file.textures.push(texture(8, vec![0x33; 128], None, 0x100));
        file
    }

    /// Big-endian block header bytes.
    fn block_bytes(major: u32, code: u32, data_size: u32) -> Vec<u8> {
        [0x424C_4B7B, 0x20, major, 0, code, data_size, 0, 0]
            .iter()
            .flat_map(|w: &u32| w.to_be_bytes())
            .collect()
    }

    fn header_bytes(major: u32, minor: u32, align: u32) -> Vec<u8> {
        [0x4766_7832, 0x20, major, minor, 2, align, 0, 0]
            .iter()
            .flat_map(|w: &u32| w.to_be_bytes())
            .collect()
    }

    #[test]
    fn test_round_trip() {
        let file = sample_file();
        let bytes = file.save_gtx().unwrap();
        let (parsed, consumed) = GfdFile::parse(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(parsed, file);
    }

    #[test]
    fn test_round_trip_little_endian() {
        let file = sample_file();
        let bytes = file.save_gtx_with_endian(Endian::Little).unwrap();
        assert_eq!(&bytes[..4], &[0x32, 0x78, 0x66, 0x47]);
        let (parsed, _) = GfdFile::parse_with_endian(&bytes, Endian::Little).unwrap();
        assert_eq!(parsed, file);
    }

    #[test]
    fn test_payloads_are_aligned() {
        let file = sample_file();
        let bytes = file.save_gtx().unwrap();

        let mut reader = BinaryReader::with_endian(&bytes, Endian::Big);
        GfdHeader::decode(&mut reader).unwrap();
        let mut data_blocks = Vec::new();
        loop {
            let block = BlockHeader::decode(&mut reader).unwrap();
            if block.block_type == BlockType::End {
                break;
            }
            if matches!(
                block.block_type,
                BlockType::TextureImageData | BlockType::TextureMipData
            ) {
                data_blocks.push(reader.position());
            }
            reader.advance(block.data_size as usize);
        }
        assert_eq!(data_blocks.len(), 3);
        assert_eq!(data_blocks[0] % 0x200, 0);
        assert_eq!(data_blocks[1] % 0x200, 0);
        assert_eq!(data_blocks[2] % 0x100, 0);
    }

    #[test]
    fn test_unaligned_save_is_packed() {
        let mut file = sample_file();
        file.header.align_mode = AlignMode::Disabled;
        let bytes = file.save_gtx().unwrap();
        let blocks = 3 + 2 + 1;
        let payloads = Texture::SIZE * 2 + 64 + 16 + 128;
        assert_eq!(bytes.len(), GfdHeader::SIZE + blocks * BlockHeader::SIZE + payloads);
    }

    #[test]
    fn test_save_requires_alignment_mode() {
        let mut file = sample_file();
        file.header.align_mode = AlignMode::Undefined;
        assert!(matches!(file.save_gtx(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_legacy_alignment_with_pad() {
        let mut file = sample_file();
        file.set_version(6, 0).unwrap();
        let bytes = file.save_gtx().unwrap();
        // 6.0 archives use block header version 0
        assert_eq!(&bytes[0x28..0x2C], &[0, 0, 0, 0]);

        let (parsed, _) = GfdFile::parse(&bytes).unwrap();
        assert_eq!(parsed.header.align_mode, AlignMode::Enabled);
        assert_eq!(parsed.textures, file.textures);
    }

    #[test]
    fn test_legacy_alignment_without_pad() {
        let mut file = sample_file();
        file.set_version(6, 0).unwrap();
        file.header.align_mode = AlignMode::Disabled;
        let bytes = file.save_gtx().unwrap();

        let (parsed, _) = GfdFile::parse(&bytes).unwrap();
        assert_eq!(parsed.header.align_mode, AlignMode::Disabled);
    }

    #[test]
    fn test_image_before_texture_header() {
        let mut data = header_bytes(7, 0, 0);
        data.extend(block_bytes(1, 12, 4));
        data.extend([0; 4]);
        data.extend(block_bytes(1, 1, 0));

        let mut file = sample_file();
        let err = file.load(&data).unwrap_err();
        assert!(matches!(err.root(), Error::Sequence(_)));
        assert_eq!(err.offset(), Some(0x20));
        assert!(file.is_empty());
        assert_eq!(file.header, GfdHeader::default());
        assert!(file.save_gtx().is_ok());
    }

    #[test]
    fn test_image_size_mismatch() {
        let source = sample_file();
        let mut bytes = source.save_gtx().unwrap();
        let mut reader = BinaryReader::with_endian(&bytes, Endian::Big);
        GfdHeader::decode(&mut reader).unwrap();
        let image_block = loop {
            let at = reader.position();
            let block = BlockHeader::decode(&mut reader).unwrap();
            if block.block_type == BlockType::TextureImageData {
                break at;
            }
            reader.advance(block.data_size as usize);
        };
        // declared image size
        bytes[image_block + 20..image_block + 24].copy_from_slice(&32u32.to_be_bytes());

        let mut file = GfdFile::new();
        let err = file.load(&bytes).unwrap_err();
        assert!(matches!(
            err.root(),
            Error::SizeMismatch {
                expected: 64,
                actual: 32,
                ..
            }
        ));
        assert_eq!(err.offset(), Some(image_block));
        assert!(file.is_empty());
    }

    #[test]
    fn test_texture_header_size() {
        let mut data = header_bytes(7, 1, 0);
        data.extend(block_bytes(1, 11, 8));
        data.extend([0; 8]);
        data.extend(block_bytes(1, 1, 0));
        let err = GfdFile::parse(&data).unwrap_err();
        assert!(matches!(
            err.root(),
            Error::SizeMismatch {
                what: "texture header",
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_blocks_are_skipped() {
        let mut data = header_bytes(7, 1, 0);
        data.extend(block_bytes(1, 14, 4));
        data.extend([0xFF; 4]);
        data.extend(block_bytes(1, 1, 0));
        data.extend([0xEE; 8]);
        let (file, consumed) = GfdFile::parse(&data).unwrap();
        assert!(file.is_empty());
        assert_eq!(consumed, data.len() - 8);
    }

    #[test]
    fn test_shader_program_blocks() {
        let mut shader = vec![0u8; PixelShader::SIZE];
        shader[0xA4..0xA8].copy_from_slice(&8u32.to_be_bytes());

        let mut data = header_bytes(7, 1, 0);
        data.extend(block_bytes(1, 6, PixelShader::SIZE as u32));
        data.extend(&shader);
        data.extend(block_bytes(1, 7, 8));
        data.extend([0xAA; 8]);
        data.extend(block_bytes(1, 1, 0));

        let (file, _) = GfdFile::parse(&data).unwrap();
        assert_eq!(file.pixel_shaders.len(), 1);
        assert_eq!(file.pixel_shaders[0].program.as_deref(), Some(&[0xAA; 8][..]));

        // a second program block for the same shader is out of sequence
        let mut twice = data[..data.len() - BlockHeader::SIZE].to_vec();
        twice.extend(block_bytes(1, 7, 8));
        twice.extend([0xAA; 8]);
        twice.extend(block_bytes(1, 1, 0));
        let err = GfdFile::parse(&twice).unwrap_err();
        assert!(matches!(err.root(), Error::Sequence(_)));
    }

    #[test]
    fn test_set_version() {
        let mut file = GfdFile::new();
        assert!(file.set_version(8, 0).is_err());
        file.set_version(6, 0).unwrap();
        assert!(file.header.is_legacy());
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let mut file = sample_file();
        file.teardown();
        file.teardown();
        assert!(file.is_empty());
        assert_eq!(file.header, GfdHeader::default());
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            specs in prop::collection::vec(
                (1u32..64, 1usize..256, prop::option::of(1usize..64), 0u32..4),
                0..4,
            ),
            little in any::<bool>(),
            aligned in any::<bool>(),
        ) {
            let mut file = GfdFile::new();
            file.header.align_mode = if aligned { AlignMode::Enabled } else { AlignMode::Disabled };
            for (width, image_len, mip_len, align_pow) in specs {
                let image = (0..image_len).map(|i| i as u8).collect();
                let mips = mip_len.map(|len| vec![0x5A; len]);
                file.textures.push(texture(width, image, mips, 0x80 << align_pow));
            }

            let endian = if little { Endian::Little } else { Endian::Big };
            let bytes = file.save_gtx_with_endian(endian).unwrap();
            let (parsed, consumed) = GfdFile::parse_with_endian(&bytes, endian).unwrap();
            prop_assert_eq!(consumed, bytes.len());
            prop_assert_eq!(parsed, file);
        }
    }
}

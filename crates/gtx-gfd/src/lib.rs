//! GFD/GTX archive container.
//!
//! A GFD archive is a file header followed by a stream of tagged blocks:
//! texture headers with their image and mip payloads, and shader headers with
//! their programs. This crate reads and writes that stream:
//!
//! - [`GfdFile`] - The archive aggregate with load, save and teardown
//! - [`GfdHeader`] / [`BlockHeader`] - Record serializers with verification
//! - [`VertexShader`], [`PixelShader`], [`GeometryShader`] - Shader records
//!
//! # Example
//!
//! ```no_run
//! use gtx_gfd::GfdFile;
//!
//! let data = std::fs::read("texture.gtx").unwrap();
//! let (file, _) = GfdFile::parse(&data).unwrap();
//!
//! for texture in &file.textures {
//!     println!("{texture}");
//! }
//! ```

mod archive;
mod block;
mod error;
mod header;
mod shader;

pub use archive::GfdFile;
pub use block::{BlockHeader, BlockType, RawBlockHeader, BLOCK_MAGIC};
pub use error::{Error, Result};
pub use header::{AlignMode, GfdHeader, RawHeader, GFD_MAGIC, GPU_VERSION_GPU7};
pub use shader::{
    AttribVar, GeometryShader, InitialValue, LoopVar, PixelShader, SamplerVar, ShaderHeader,
    ShaderMetadata, UniformBlock, UniformVar, VertexShader, PTR_DATA_TAG, PTR_STRING_TAG,
};

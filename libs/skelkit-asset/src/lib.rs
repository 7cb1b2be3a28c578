//! Model loading for skelkit
//!
//! Reads JSON model documents, exposes them to `skelkit-anim` through the
//! `SourceModel` trait and builds indexed, deduplicated meshes from their
//! faces.
//!
//! # Example
//!
//! ```rust
//! use skelkit_anim::LoadOptions;
//! use skelkit_asset::{ModelDocument, build_mesh};
//!
//! let doc = ModelDocument::from_json_str(r#"{
//!     "vertices": [
//!         { "pos": [0, 0, 0, 1] }, { "pos": [1, 0, 0, 1] },
//!         { "pos": [0, 1, 0, 1] }, { "pos": [0, 0, 1, 0] }
//!     ],
//!     "bones": [{ "name": "root", "parent": -1, "pos": 0, "ori": 0 }],
//!     "faces": [{ "vertex": [0, 1, 2], "normal": [3, 3, 3] }]
//! }"#)?;
//! doc.validate()?;
//!
//! let skeleton = doc.skeleton(&LoadOptions::default())?;
//! assert_eq!(skeleton.bone_count(), 2);
//!
//! let mesh = build_mesh(&doc)?;
//! assert_eq!(mesh.element_count(), 3);
//! # Ok::<(), skelkit_asset::AssetError>(())
//! ```

pub mod error;
pub mod file;
pub mod mesh;
pub mod model;

pub use error::{AssetError, Result};
pub use file::{read_file, read_to_string};
pub use mesh::{MeshData, MeshVertices, SkinnedVertex, StaticVertex, build_mesh};
pub use model::{
    Action, DocBone, Face, Frame, FrameTransform, ModelDocument, PoolVertex, Skin, load_clips,
    load_skeleton,
};

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    assets::codec::decode_file,
    foundation::error::{SirenError, SirenResult},
    protocol::model::{DrawInstruction, InstructionSet},
    raster::blit::Placement,
};

/// Canvas size as written in a manifest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

/// One manifest entry: an image file plus its placement.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ManifestEntry {
    /// Image path, relative to the manifest's directory unless absolute.
    pub image: PathBuf,
    /// Where the image lands.
    #[serde(flatten)]
    pub placement: Placement,
}

/// JSON description of a render request that references images on disk.
///
/// ```json
/// {
///   "canvas": { "width": 800, "height": 600 },
///   "instructions": [
///     { "image": "res/map.png", "x": 400, "y": 300 },
///     { "image": "res/ship.png", "x": 256, "y": 256, "rotation": 0.45 },
///     { "image": "res/logo.png", "x": 512, "y": 256, "scale_x": 2, "scale_y": 2 }
///   ]
/// }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderManifest {
    /// Output canvas size.
    pub canvas: CanvasSize,
    /// Draw list, in draw order.
    #[serde(default)]
    pub instructions: Vec<ManifestEntry>,
}

impl RenderManifest {
    /// Read and parse a manifest file.
    pub fn from_json_file(path: &Path) -> SirenResult<Self> {
        let f = File::open(path).with_context(|| format!("open manifest '{}'", path.display()))?;
        let manifest: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse manifest JSON '{}'", path.display()))?;
        Ok(manifest)
    }

    /// Decode every referenced image and build the request.
    pub fn load_instruction_set(&self, root: &Path) -> SirenResult<InstructionSet> {
        let mut set = InstructionSet::new(self.canvas.width, self.canvas.height)?;
        for (idx, entry) in self.instructions.iter().enumerate() {
            if !entry.placement.is_drawable() {
                return Err(SirenError::validation(format!(
                    "instruction {idx} ('{}') has a non-finite or non-positive transform",
                    entry.image.display()
                )));
            }
            let path = if entry.image.is_absolute() {
                entry.image.clone()
            } else {
                root.join(&entry.image)
            };
            let image = decode_file(&path)?;
            set.push(DrawInstruction::placed(image, entry.placement));
        }
        Ok(set)
    }
}

/// Parse `path` and load its images relative to the manifest's own directory.
pub fn load_manifest(path: &Path) -> SirenResult<InstructionSet> {
    let manifest = RenderManifest::from_json_file(path)?;
    let root = path.parent().unwrap_or_else(|| Path::new("."));
    manifest.load_instruction_set(root)
}

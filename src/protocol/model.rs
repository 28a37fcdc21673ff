use crate::{
    foundation::error::{SirenError, SirenResult},
    raster::{
        blit::{Placement, blit_bitmap},
        buffer::PixelBuffer,
    },
};

/// One image together with where it lands on the canvas.
///
/// Instructions are immutable once built; the image is owned by the instruction.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawInstruction {
    image: PixelBuffer,
    placement: Placement,
}

impl DrawInstruction {
    /// Couple an image with its destination anchor, rotation (radians) and scale.
    pub fn new(
        image: PixelBuffer,
        x: f32,
        y: f32,
        rotation: f32,
        scale_x: f32,
        scale_y: f32,
    ) -> Self {
        Self::placed(
            image,
            Placement {
                x,
                y,
                rotation,
                scale_x,
                scale_y,
            },
        )
    }

    /// Couple an image with a prebuilt [`Placement`].
    pub fn placed(image: PixelBuffer, placement: Placement) -> Self {
        Self { image, placement }
    }

    /// Source image.
    pub fn image(&self) -> &PixelBuffer {
        &self.image
    }

    /// Destination transform.
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Destination x of the image center.
    pub fn x(&self) -> f32 {
        self.placement.x
    }

    /// Destination y of the image center.
    pub fn y(&self) -> f32 {
        self.placement.y
    }

    /// Rotation in radians.
    pub fn rotation(&self) -> f32 {
        self.placement.rotation
    }

    /// Horizontal scale factor.
    pub fn scale_x(&self) -> f32 {
        self.placement.scale_x
    }

    /// Vertical scale factor.
    pub fn scale_y(&self) -> f32 {
        self.placement.scale_y
    }
}

/// Canvas size plus the ordered draw list for one render request.
///
/// Draw order is list order: later instructions paint over earlier ones.
#[derive(Clone, Debug, PartialEq)]
pub struct InstructionSet {
    canvas_width: i32,
    canvas_height: i32,
    instructions: Vec<DrawInstruction>,
}

impl InstructionSet {
    /// Empty set for a `width` x `height` canvas.
    pub fn new(canvas_width: i32, canvas_height: i32) -> SirenResult<Self> {
        if canvas_width <= 0 || canvas_height <= 0 {
            return Err(SirenError::invalid_dimension(canvas_width, canvas_height));
        }
        Ok(Self {
            canvas_width,
            canvas_height,
            instructions: Vec::new(),
        })
    }

    /// Append an instruction; it draws after every instruction already present.
    pub fn push(&mut self, instruction: DrawInstruction) {
        self.instructions.push(instruction);
    }

    /// Builder-style [`InstructionSet::push`].
    pub fn with_instruction(mut self, instruction: DrawInstruction) -> Self {
        self.push(instruction);
        self
    }

    /// Canvas width in pixels.
    pub fn canvas_width(&self) -> i32 {
        self.canvas_width
    }

    /// Canvas height in pixels.
    pub fn canvas_height(&self) -> i32 {
        self.canvas_height
    }

    /// Instructions in draw order.
    pub fn instructions(&self) -> &[DrawInstruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Render onto a fresh, fully transparent canvas of the declared size.
    #[tracing::instrument(
        level = "debug",
        skip(self),
        fields(width = self.canvas_width, height = self.canvas_height, instructions = self.len())
    )]
    pub fn composite(&self) -> SirenResult<PixelBuffer> {
        let mut canvas = PixelBuffer::new(self.canvas_width, self.canvas_height)?;
        for inst in &self.instructions {
            blit_bitmap(&mut canvas, &inst.image, &inst.placement);
        }
        Ok(canvas)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/protocol/model.rs"]
mod tests;

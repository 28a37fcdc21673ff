/// PNG (and other raster format) decode/encode at the file boundary.
pub mod codec;

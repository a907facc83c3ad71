pub(crate) mod compositor;
pub(crate) mod encode;
pub(crate) mod preview;
pub(crate) mod raster;

//! Block color table and the texture pipeline that fills it.
//!
//! Every block gets ONE representative color, computed once from its
//! texture before the first frame. The render loop never waits on this again.

mod assets;
mod average;
mod table;

pub use assets::{AssetIndex, AssetResolver, FsImageSource, ImageSource, MemoryImageSource};
pub use average::{average_region, representative_color};
pub use table::{ColorTable, ColorTableBuilder, ColorTableReport};

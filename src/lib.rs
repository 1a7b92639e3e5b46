// Library exports for sociograph

pub mod binning;
pub mod chart;
pub mod csv_reader;
pub mod datasets;
pub mod error;
pub mod normalize;
pub mod palette;
pub mod parser;
pub mod select;
pub mod story;
pub mod table;
pub mod tidy;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RenderOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

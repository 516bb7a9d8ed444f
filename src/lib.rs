#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod text_metrics;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{ConfigFile, LayoutConfig, load_config, parse_config};
pub use ir::{MindMap, NodeType};
pub use layout::{
    ALGORITHM, LayoutContext, LayoutError, LayoutResult, compute_layout, layout_spec,
    layout_spec_str, try_compute_layout,
};
pub use parser::{SpecError, parse_spec, parse_spec_str};
pub use text_metrics::{NodeDimensions, estimate_dimensions};

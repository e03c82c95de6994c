pub mod banner;
pub mod config;
pub mod display;
pub mod entry_list;
pub mod export;
pub mod fields;
pub mod http_client;
pub mod model;
pub mod parsing;
pub mod pipeline;
pub mod points;
pub mod race_summary;
pub mod source;
pub mod standings;

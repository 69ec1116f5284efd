pub mod client;
pub mod normalize;
pub mod output;
pub mod page;
pub mod types;

pub use client::PraiseClient;
pub use types::AcquiredSong;

pub mod constants;
pub mod plotting;
pub mod repository;
pub mod skymap;
pub mod stackclub_errors;
pub mod taster;
pub mod where_is;

pub use plotting::chart::SkyChart;
pub use repository::{DataRepository, MemoryRepository};
pub use stackclub_errors::StackClubError;
pub use taster::{Taster, TasterConfig};

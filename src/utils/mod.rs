pub mod colors;
pub mod date;
pub mod formatting;
pub mod jwt;
pub mod path;
pub mod table;
pub mod time;

pub use formatting::or_dash;

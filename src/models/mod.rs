pub mod price;
pub mod record;
pub mod report;

pub use price::*;
pub use record::*;
pub use report::*;

pub mod table;
pub mod upload;

pub use table::{decode_utf8, parse_demand_csv, DemandRecord, DemandTable};
pub use upload::UploadedFile;

pub mod listing_file;
pub mod objdump;

pub use listing_file::ListingFileBackend;
pub use objdump::ObjdumpBackend;

pub use catalog_scan_core::{encoding, envelope, item};

//! ZIP record parsing modules.

pub mod central_header;
pub mod end_header;
pub mod le_reader;
pub mod local_header;

pub use central_header::{CentralHeader, CentralHeaderParser};
pub use end_header::{
    EndHeader, EndHeaderParser, Zip64EndHeader, Zip64EndHeaderParser, Zip64Locator,
    Zip64LocatorParser,
};
pub use le_reader::LeReader;
pub use local_header::{LocalHeader, LocalHeaderParser};

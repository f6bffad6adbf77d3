pub mod enums;
pub mod name;
pub mod rrset;

pub use enums::{RecordClass, RecordType};
pub use name::Name;
pub use rrset::{Record, Response, Rrset};

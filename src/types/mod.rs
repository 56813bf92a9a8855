mod classification;
mod device_type;
mod legacy;

pub use classification::*;
pub use device_type::*;
pub use legacy::*;

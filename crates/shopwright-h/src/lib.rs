pub mod cdp;
pub mod page;
mod script;

pub use cdp::{CdpClient, DriverError};
pub use page::ChromiumPage;

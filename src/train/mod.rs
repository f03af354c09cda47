pub(crate) mod epoch;
pub mod page;
pub(crate) mod paged;
mod scratch;

pub use page::{MemoryPageReader, Page, PageReader};

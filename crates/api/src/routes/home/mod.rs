mod index;

pub use index::{index_handler, ROUTE_LISTING};

//! Ready-made resources for collections.

mod collection;
mod paginated;

pub use collection::CollectionRepresentation;
pub use paginated::PaginatedRepresentation;

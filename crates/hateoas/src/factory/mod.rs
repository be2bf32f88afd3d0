//! Relation resolution: from class metadata to the links and embeds of one
//! object visit.

mod embedded;
mod exclusion;
mod link;
mod resolver;

pub use embedded::EmbeddedFactory;
pub use exclusion::ExclusionManager;
pub use link::LinkFactory;
pub use resolver::{RelationResolver, ResolvedRelations};

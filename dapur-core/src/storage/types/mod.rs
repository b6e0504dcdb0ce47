//! Record types stored in the durable store

mod preference;
mod recipe;
mod user;

pub use preference::Preference;
pub use recipe::{RecipeId, RecipeSummary};
pub use user::UserRecord;

use std::fmt::Debug;

/// Anything with a stable unique identifier.
///
/// Recency lists deduplicate on this id.
pub trait Identified {
    type Id: PartialEq + Debug;

    fn id(&self) -> &Self::Id;
}

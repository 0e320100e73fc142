//! Ownership-aware album hierarchy operations.
//!
//! Every operation takes the caller's [`OwnershipIndex`] explicitly; nothing
//! here reads request-global state.

mod cover;
mod guard;
mod listing;
mod ownership;
mod path;

pub use cover::{reset_album_cover, set_album_cover};
pub use guard::fetch_owned_album;
pub use listing::{build_album_query, list_albums, AlbumQuery, AlbumSortField, ListingContext};
pub use ownership::{OwnedAlbum, OwnershipIndex};
pub use path::{album_path, resolve_ancestors};

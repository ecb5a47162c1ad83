//! Entity models
//!
//! All persisted entities share the base shape: an opaque, immutable
//! record id plus `created_at`/`updated_at` Unix millis stamped by the
//! document store.

pub mod serde_helpers;

pub mod booking;
pub mod event;
pub mod gallery;
pub mod menu_item;
pub mod section;
pub mod user;

pub use booking::{Booking, BookingCreate, BookingStatus, BookingStatusUpdate};
pub use event::{Event, EventCreate, EventUpdate};
pub use gallery::{GalleryCategory, GalleryCategoryCreate, GalleryImage, GalleryImageCreate};
pub use menu_item::{MenuCategory, MenuItem, MenuItemCreate, MenuItemUpdate};
pub use section::{KNOWN_SECTIONS, Section, SectionUpsert};
pub use user::{Role, RoleUpdate, UserRecord};

// Read path for stored poems: lookup by id and full listing.

pub mod handlers;
pub mod store;

mod store;

pub use store::{Store, load_entries_file};

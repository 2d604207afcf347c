mod not_found;

pub(crate) use not_found::not_found;

pub use not_found::not_found_handler;

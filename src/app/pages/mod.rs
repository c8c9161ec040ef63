//! Dashboard pages, one per route.

mod home;
mod landing;
mod login;
mod not_found;
mod profile;

pub use home::Home;
pub use landing::Landing;
pub use login::Login;
pub use not_found::NotFound;
pub use profile::Profile;

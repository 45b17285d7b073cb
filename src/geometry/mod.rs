mod fit;

pub use fit::{aspect_fit, view_to_image};

pub mod model;
pub mod photoshoot;
pub mod product;
pub mod user;

pub use model::Model;
pub use photoshoot::{Photoshoot, PhotoshootDetail};
pub use product::Product;
pub use user::{NewUser, User};

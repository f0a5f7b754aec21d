mod category;

pub use category::{Category, CategoryDescription, CategoryWithDescription};

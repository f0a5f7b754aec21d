pub mod category_handler;

pub use category_handler::{
    __path_get_category, __path_update_category, get_category, update_category,
};

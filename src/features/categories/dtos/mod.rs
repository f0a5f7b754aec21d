pub mod category_dto;

pub use category_dto::{
    CategoryDataDto, CategoryDescriptionPatch, CategoryPatch, CategoryResponseDto, CategoryStatus,
};

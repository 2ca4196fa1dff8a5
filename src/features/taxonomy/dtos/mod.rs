mod taxonomy_dto;

pub use taxonomy_dto::{CategoryOption, DepartmentView};

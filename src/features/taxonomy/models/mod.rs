mod category;
mod department;

pub use category::Category;
pub use department::Department;

pub mod constants;
pub mod cookies;
pub mod flash;
pub mod page;
pub mod templates;
pub mod types;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;

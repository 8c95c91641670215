//! Categories for grouping expenses and incomes, and for setting budgets.

mod db;
mod domain;
mod handlers;

pub(crate) use db::map_row_with_offset;
pub use db::{
    create_category, create_category_table, delete_category, get_categories, get_category,
    get_category_by_name, update_category,
};
pub use domain::{Category, CategoryForm, CategoryId, CategoryKind, CategoryName};
pub use handlers::{
    CategoryState, create_category_endpoint, delete_category_endpoint, get_category_endpoint,
    list_categories_endpoint, update_category_endpoint,
};

use common::Category;
use serde::Serialize;

/// One category of the catalog together with its predefined tags.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryResponse {
    pub category: Category,
    /// Predefined tags offered for this category, sorted. Empty for
    /// `Miscellaneous`, which takes custom tags only.
    #[schema(example = json!(["Case Simulator (Clinical)", "Clerkship Prep"]))]
    pub predefined_tags: Vec<&'static str>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            category,
            predefined_tags: category.predefined_tags().to_vec(),
        }
    }
}

/// The full catalog in display order.
pub fn catalog() -> Vec<CategoryResponse> {
    Category::ALL.iter().copied().map(CategoryResponse::from).collect()
}

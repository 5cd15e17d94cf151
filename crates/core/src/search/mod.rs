//! Search module - aggregated search across pluggable providers.

mod providers;
mod search_model;
mod search_service;
mod search_traits;

pub use providers::{
    RecipeSearchProvider, SavingGoalSearchProvider, FINANCES_MODULE, KITCHEN_MODULE,
};
pub use search_model::{
    SearchModuleResults, SearchResponse, SearchResultItem, DEFAULT_SEARCH_LIMIT,
    MAX_SEARCH_LIMIT,
};
pub use search_service::SearchService;
pub use search_traits::{SearchProvider, SearchServiceTrait};

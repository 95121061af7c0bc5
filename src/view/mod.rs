//! Collection views: the pipeline orchestrator and its state

pub mod controller;
pub mod state;

pub use controller::{CollectionView, filter_and_sort};
pub use state::{DerivedView, ViewState};

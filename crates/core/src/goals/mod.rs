//! Goals module - goal-box categories and number generation.

mod goals_model;

pub use goals_model::GoalCategory;

//! Domain models for the recipe service.

pub mod recipe;

pub use recipe::{
    Author, InstructionSection, InstructionStep, Recipe, RecipeInstructions, RecipeYield,
};

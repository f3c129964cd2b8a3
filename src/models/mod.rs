mod entry;

pub use entry::{
    normalize_food_item, parse_calories, FoodEntry, ParseError, ValidationError,
};

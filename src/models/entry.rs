use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Field separator for the on-disk log format. Never escaped, so food
/// items must not contain it (enforced at construction).
pub const FIELD_DELIMITER: char = ',';

/// A single logged food item with its date and calorie count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub date: NaiveDate,
    pub food_item: String,
    pub calories: u32,
}

impl FoodEntry {
    /// Validates and normalizes the inputs. The food item is trimmed and
    /// title-cased; calories must be non-negative.
    pub fn new(
        date: NaiveDate,
        food_item: &str,
        calories: i64,
    ) -> Result<Self, ValidationError> {
        let food_item = normalize_food_item(food_item)?;
        if calories < 0 {
            return Err(ValidationError::NegativeCalories(calories));
        }
        let calories = u32::try_from(calories)
            .map_err(|_| ValidationError::CaloriesOutOfRange(calories))?;

        Ok(Self {
            date,
            food_item,
            calories,
        })
    }

    /// Encodes the entry as one log line: `YYYY-MM-DD,<food_item>,<calories>`.
    /// The line terminator is the caller's concern.
    pub fn to_line(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            self.date,
            self.food_item,
            self.calories,
            sep = FIELD_DELIMITER
        )
    }
}

impl fmt::Display for FoodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({} Cal)", self.date, self.food_item, self.calories)
    }
}

impl FromStr for FoodEntry {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);
        let parts: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        if parts.len() != 3 {
            return Err(ParseError::FieldCount(parts.len()));
        }

        let date = NaiveDate::parse_from_str(parts[0].trim(), "%Y-%m-%d")
            .map_err(|_| ParseError::InvalidDate(parts[0].trim().to_string()))?;

        let food_item = parts[1].trim();
        if food_item.is_empty() {
            return Err(ParseError::EmptyFoodItem);
        }

        let calories = parts[2]
            .trim()
            .parse::<u32>()
            .map_err(|_| ParseError::InvalidCalories(parts[2].trim().to_string()))?;

        Ok(Self {
            date,
            food_item: food_item.to_string(),
            calories,
        })
    }
}

/// Trims the raw input, rejects empty or delimiter-containing items, and
/// title-cases the result so "apple" and "APPLE" display identically.
pub fn normalize_food_item(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyFoodItem);
    }
    if trimmed.contains(FIELD_DELIMITER) {
        return Err(ValidationError::DelimiterInFoodItem);
    }
    Ok(title_case(trimmed))
}

/// Parses a calorie count from raw user input, rejecting non-integers and
/// negative values.
pub fn parse_calories(raw: &str) -> Result<u32, ValidationError> {
    let trimmed = raw.trim();
    match trimmed.parse::<i64>() {
        Ok(n) if n < 0 => Err(ValidationError::NegativeCalories(n)),
        Ok(n) => u32::try_from(n).map_err(|_| ValidationError::CaloriesOutOfRange(n)),
        Err(_) => Err(ValidationError::InvalidCalories(trimmed.to_string())),
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// A user-supplied field violated a constraint. Caught by the shell's
/// prompt loops and turned into a re-prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Food item empty after trimming
    EmptyFoodItem,
    /// Food item contains the field delimiter
    DelimiterInFoodItem,
    /// Calories below zero
    NegativeCalories(i64),
    /// Calories exceed the storable range
    CaloriesOutOfRange(i64),
    /// Calories not a valid integer
    InvalidCalories(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyFoodItem => {
                write!(f, "Food item must not be empty")
            }
            ValidationError::DelimiterInFoodItem => {
                write!(
                    f,
                    "Food item must not contain '{}' (used as the log field separator)",
                    FIELD_DELIMITER
                )
            }
            ValidationError::NegativeCalories(n) => {
                write!(f, "Calorie count must not be negative (got {})", n)
            }
            ValidationError::CaloriesOutOfRange(n) => {
                write!(f, "Calorie count {} is too large", n)
            }
            ValidationError::InvalidCalories(raw) => {
                write!(f, "'{}' is not a valid calorie count", raw)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// A stored line could not be decoded into a `FoodEntry`.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Line did not split into exactly three fields
    FieldCount(usize),
    /// Date field is not a valid ISO 8601 date
    InvalidDate(String),
    /// Food item field is empty
    EmptyFoodItem,
    /// Calorie field is not a non-negative integer
    InvalidCalories(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::FieldCount(n) => {
                write!(f, "Expected 3 fields, found {}", n)
            }
            ParseError::InvalidDate(raw) => {
                write!(f, "Invalid date '{}'", raw)
            }
            ParseError::EmptyFoodItem => {
                write!(f, "Food item field is empty")
            }
            ParseError::InvalidCalories(raw) => {
                write!(f, "Invalid calorie count '{}'", raw)
            }
        }
    }
}

impl std::error::Error for ParseError {}

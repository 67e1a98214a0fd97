use std::fmt;
use std::str::FromStr;

use super::error::ValueError;

/// Classification of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Source,
    Binary,
    Task,
    Data,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Source,
        Category::Binary,
        Category::Task,
        Category::Data,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Source => "source",
            Category::Binary => "binary",
            Category::Task => "task",
            Category::Data => "data",
        }
    }
}

impl FromStr for Category {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValueError::UnknownCategory(s.to_owned()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
